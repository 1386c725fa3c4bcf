//! Type representation for the host type graph.
//!
//! Types are addressed by `TypeId` handles. Structural variants are
//! hash-consed by the interner, so comparing two structural types is a
//! `TypeId` comparison. Records, functions with declarations, and type
//! parameters are nominal: every allocation gets its own identity even when
//! two of them look the same.

use ordered_float::OrderedFloat;
use serde::Serialize;
use tsz_common::SourceLocation;
use tsz_common::interner::Atom;

/// Handle to a node of the type graph.
///
/// Intrinsics live at fixed ids below `FIRST_USER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    /// The non-primitive `object` keyword type.
    pub const OBJECT: TypeId = TypeId(11);

    /// First id handed out for user types.
    pub const FIRST_USER: u32 = 16;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// `null` and `undefined`, the members stripped by nullability unwrapping.
    #[inline]
    pub fn is_nullish(self) -> bool {
        self == Self::NULL || self == Self::UNDEFINED
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Object,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 12] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::Void,
        IntrinsicKind::Undefined,
        IntrinsicKind::Null,
        IntrinsicKind::String,
        IntrinsicKind::Number,
        IntrinsicKind::Boolean,
        IntrinsicKind::Bigint,
        IntrinsicKind::Symbol,
        IntrinsicKind::Object,
    ];

    pub fn type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::Void => TypeId::VOID,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Number => TypeId::NUMBER,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Bigint => TypeId::BIGINT,
            IntrinsicKind::Symbol => TypeId::SYMBOL,
            IntrinsicKind::Object => TypeId::OBJECT,
        }
    }

    /// Keyword used to spell this intrinsic in source.
    pub fn keyword(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Bigint => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<IntrinsicKind> {
        IntrinsicKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat<f64>),
    Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplicationId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

/// Structural payload of a type-graph node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Array(TypeId),
    Tuple(TypeListId),
    /// Ordered union; members keep their declaration order.
    Union(TypeListId),
    Object(ObjectShapeId),
    Function(FunctionShapeId),
    TypeParameter(TypeParamInfo),
    /// Generic instantiation `Base<Args>`.
    Application(TypeApplicationId),
    /// `Partial<T>`: every member of `T` made optional.
    Partial(TypeId),
}

/// A generic type parameter.
///
/// `ordinal` keeps two same-named parameters of different generics apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub constraint: Option<TypeId>,
    pub ordinal: u32,
}

/// A declared member of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    /// `None` when the host could not resolve a type for the member.
    pub type_id: Option<TypeId>,
    pub optional: bool,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        PropertyInfo {
            name,
            type_id: Some(type_id),
            optional: false,
        }
    }

    pub fn opt(name: Atom, type_id: TypeId) -> Self {
        PropertyInfo {
            name,
            type_id: Some(type_id),
            optional: true,
        }
    }
}

/// Storage for a record type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectShape {
    /// Declared name; `None` for inline object literal types.
    pub name: Option<Atom>,
    pub symbol: Option<SymbolId>,
    pub type_params: Vec<TypeId>,
    pub bases: Vec<TypeId>,
    pub properties: Vec<PropertyInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
}

impl ParamInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            name,
            type_id,
            optional: false,
        }
    }
}

/// Signature of a callable type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub type_params: Vec<TypeId>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    pub base: TypeId,
    pub args: Vec<TypeId>,
}

/// A named entity a type can be associated with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolData {
    pub name: Atom,
    /// Dotted, fully-qualified name (e.g. `React.Component`).
    pub qualified_name: Atom,
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclKind {
    Class,
    Interface,
    TypeAlias,
    Variable,
    Function,
    /// `export { X as Y }` / `export default X` pointing at another declaration.
    ExportAlias(DeclId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: Atom,
    pub kind: DeclKind,
    pub type_id: Option<TypeId>,
    pub location: Option<SourceLocation>,
}

impl Declaration {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclKind::Class)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: Atom,
    pub exports: Vec<DeclId>,
}

/// A record member as seen through the accessor: instantiated and with
/// optionality folded into the type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySymbol {
    pub name: Atom,
    pub type_id: Option<TypeId>,
    pub optional: bool,
}

/// A callable signature as seen through the accessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}
