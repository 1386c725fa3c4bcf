//! Schema variants for a single prop.

use serde::{Deserialize, Serialize, Serializer};

/// Value of a literal type.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

// Integral numbers are written without a fractional part (`1`, not `1.0`).
impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LiteralValue::Boolean(b) => serializer.serialize_bool(*b),
            LiteralValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            LiteralValue::Number(n) => serializer.serialize_f64(*n),
            LiteralValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

/// Closed set of shapes a prop can take.
///
/// Serialized with a `kind` tag, e.g. `{"kind":"array","element":{"kind":"string"}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropType {
    Any,
    Void,
    String,
    Number,
    Boolean,
    Literal {
        value: LiteralValue,
    },
    /// Alternatives in declaration order.
    Union {
        options: Vec<PropType>,
    },
    Array {
        element: Box<PropType>,
    },
    Tuple {
        elements: Vec<PropType>,
    },
    /// Index into `FinderResult::refs`.
    Ref {
        index: usize,
    },
    /// Like `Ref`, with every member of the referenced record optional.
    Partial {
        index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Fn {
        args: Vec<PropSpec>,
        return_type: Box<PropSpec>,
    },
    Event,
    ReactElement,
    ReactNode,
}

impl PropType {
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        PropType::Literal {
            value: value.into(),
        }
    }

    pub fn union(options: Vec<PropType>) -> Self {
        PropType::Union { options }
    }

    pub fn array(element: PropType) -> Self {
        PropType::Array {
            element: Box::new(element),
        }
    }

    pub fn tuple(elements: Vec<PropType>) -> Self {
        PropType::Tuple { elements }
    }

    pub fn reference(index: usize) -> Self {
        PropType::Ref { index }
    }

    pub fn partial(index: usize) -> Self {
        PropType::Partial { index }
    }

    pub fn function(args: Vec<PropSpec>, return_type: PropSpec) -> Self {
        PropType::Fn {
            args,
            return_type: Box::new(return_type),
        }
    }

    /// The `kind` tag this variant serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            PropType::Any => "any",
            PropType::Void => "void",
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
            PropType::Literal { .. } => "literal",
            PropType::Union { .. } => "union",
            PropType::Array { .. } => "array",
            PropType::Tuple { .. } => "tuple",
            PropType::Ref { .. } => "ref",
            PropType::Partial { .. } => "partial",
            PropType::Fn { .. } => "fn",
            PropType::Event => "event",
            PropType::ReactElement => "reactElement",
            PropType::ReactNode => "reactNode",
        }
    }

    /// Visit every reference-table index mentioned by this type, nested
    /// ones included.
    pub fn for_each_ref(&self, f: &mut impl FnMut(usize)) {
        match self {
            PropType::Ref { index } | PropType::Partial { index } => f(*index),
            PropType::Union { options } => options.iter().for_each(|o| o.for_each_ref(f)),
            PropType::Tuple { elements } => elements.iter().for_each(|e| e.for_each_ref(f)),
            PropType::Array { element } => element.for_each_ref(f),
            PropType::Fn { args, return_type } => {
                for arg in args {
                    arg.prop_type.for_each_ref(f);
                }
                return_type.prop_type.for_each_ref(f);
            }
            PropType::Any
            | PropType::Void
            | PropType::String
            | PropType::Number
            | PropType::Boolean
            | PropType::Literal { .. }
            | PropType::Event
            | PropType::ReactElement
            | PropType::ReactNode => {}
        }
    }
}

/// A classified type together with its nullability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropSpec {
    pub prop_type: PropType,
    pub is_nullable: bool,
}

impl PropSpec {
    pub fn new(prop_type: PropType) -> Self {
        PropSpec {
            prop_type,
            is_nullable: false,
        }
    }

    /// `void` is never reported nullable.
    pub fn with_nullable(prop_type: PropType, is_nullable: bool) -> Self {
        let is_nullable = is_nullable && prop_type != PropType::Void;
        PropSpec {
            prop_type,
            is_nullable,
        }
    }
}

impl From<PropType> for PropSpec {
    fn from(prop_type: PropType) -> Self {
        PropSpec::new(prop_type)
    }
}
