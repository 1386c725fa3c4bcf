//! React component props extraction.
//!
//! Given a resolved type graph, [`PropsFinder`] finds the classes deriving
//! from a base component marker and turns each one's props type into a
//! serializable schema ([`FinderResult`]).
//!
//! - `locator`: which declarations are components, and their props argument
//! - `classifier`: recursive conversion of a type into a `PropSpec`
//! - `ref_table`: deduplicated, cycle-safe store of record schemas
//! - `known_symbols`: framework types reported as opaque variants
//! - `shape`: the single-pass shape dispatch the classifier matches on

pub mod classifier;
pub mod error;
pub mod finder;
pub mod known_symbols;
pub mod locator;
pub mod options;
pub mod ref_table;
pub mod shape;

pub use classifier::{Site, TypeClassifier};
pub use error::{ExtractError, Result};
pub use finder::PropsFinder;
pub use known_symbols::{KnownSymbol, KnownSymbols};
pub use locator::{ComponentCandidate, ComponentLocator};
pub use options::{DEFAULT_MARKERS, ExtractOptions, FallbackPolicy};
pub use ref_table::{RefTable, Slot};
pub use shape::{TypeShape, type_shape};

pub use tsz_props_schema::{
    ComponentSpec, FinderResult, LiteralValue, ObjectMember, ObjectSpec, PropSpec, PropType,
};
