//! Wire format of extracted component props.
//!
//! A [`FinderResult`] lists the components found in one pass and a table of
//! record schemas ([`ObjectSpec`]) their props point into. Records are
//! addressed by index so recursive and shared types stay finite.

pub mod prop_type;
pub mod result;

pub use prop_type::{LiteralValue, PropSpec, PropType};
pub use result::{ComponentSpec, FinderResult, ObjectMember, ObjectSpec, SchemaError};

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod tests;
