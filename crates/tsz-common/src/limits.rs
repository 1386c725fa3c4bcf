//! Centralized limits for graph traversals.
//!
//! Cycles in the props classifier are neutralized by the reference table.
//! The limits here bound walks that never revisit a node: alias chains,
//! generic instantiation and generics that expand themselves.

/// Maximum number of export alias hops followed before giving up.
///
/// A well-formed module never needs more than a handful; anything deeper is
/// an alias cycle.
pub const MAX_EXPORT_ALIAS_DEPTH: u32 = 64;

/// Maximum nesting depth when substituting type arguments into a generic.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum number of nested instantiations of the same generic while
/// classifying one props tree.
///
/// `interface Nest<T> { next?: Nest<T[]> }` produces a fresh instantiation
/// at every level, so the reference table never sees a repeat.
pub const MAX_GENERIC_EXPANSION_DEPTH: u32 = 8;
