//! Resolved TypeScript type graph.
//!
//! The graph is what a type checker leaves behind after resolving a
//! project: interned type nodes, their symbols, declarations and the export
//! lists of source files. Props extraction reads it through the
//! [`TypeGraph`] trait; [`TypeInterner`] is the in-memory store, filled
//! either through its builder methods or from a JSON [`GraphSnapshot`].

pub mod db;
pub mod format;
pub mod instantiate;
pub mod intern;
pub mod snapshot;
pub mod types;

pub use db::TypeGraph;
pub use format::TypeFormatter;
pub use instantiate::{TypeSubstitution, instantiate_type};
pub use intern::TypeInterner;
pub use snapshot::{GraphSnapshot, SnapshotError};
pub use types::{
    DeclId, DeclKind, Declaration, FileId, FunctionShape, IntrinsicKind, LiteralValue,
    ObjectShape, ParamInfo, PropertyInfo, PropertySymbol, Signature, SourceFile, SymbolData,
    SymbolId, TypeData, TypeId, TypeParamInfo,
};

pub use tsz_common::{Atom, SourceLocation};
