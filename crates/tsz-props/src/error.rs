//! Extraction failures.
//!
//! A failed pass never yields a partial result: the reference table of the
//! pass is dropped together with the error.

use tsz_common::SourceLocation;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No classification rule matched and the strict policy is in effect.
    #[error(
        "cannot classify type `{type_text}`{}{}",
        .symbol.as_deref().map(|s| format!(" of `{s}`")).unwrap_or_default(),
        .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default()
    )]
    Unclassifiable {
        type_text: String,
        symbol: Option<String>,
        location: Option<SourceLocation>,
    },

    /// A member whose type the host could not resolve.
    #[error(
        "no type information for property `{property}`{}",
        .location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default()
    )]
    MissingTypeInfo {
        property: String,
        location: Option<SourceLocation>,
    },

    /// A union constituent failed to classify.
    #[error("union member #{index} of property `{property}` failed to classify")]
    UnionMember {
        property: String,
        index: usize,
        #[source]
        source: Box<ExtractError>,
    },

    /// A generic keeps producing new instantiations of itself.
    #[error("generic type `{type_text}` keeps expanding past {depth} nested instantiations")]
    GenericExpansion { type_text: String, depth: u32 },

    /// A reserved reference slot was never filled in.
    #[error("reference table slot #{index} was reserved but never filled")]
    UnpatchedRef { index: usize },

    #[error("unknown declaration id {id}")]
    UnknownDeclaration { id: u32 },

    #[error("unknown source file id {id}")]
    UnknownFile { id: u32 },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// The innermost error, looking through union wrappers.
    pub fn root_cause(&self) -> &ExtractError {
        match self {
            ExtractError::UnionMember { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
