//! Common types and utilities for the tsz props extraction crates.
//!
//! This crate provides foundational types used across all crates:
//! - String interning (`Atom`, `Interner`)
//! - Source locations (`SourceLocation`) for error reporting
//! - Traversal limits shared by the type graph and the extractor

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;

// Line/column source locations
pub mod location;
pub use location::SourceLocation;
