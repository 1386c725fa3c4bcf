//! Type shape dispatch.
//!
//! A node is inspected once and assigned exactly one `TypeShape`. The order
//! of the checks in `type_shape` is the classification precedence: framework
//! types win over structure, callables win over records, literals win over
//! their widened primitives, and unions, arrays and tuples are recognized
//! before the generic record check (they are objects to the host too).

use crate::known_symbols::{KnownSymbol, KnownSymbols};
use std::sync::Arc;
use tsz_props_schema::LiteralValue;
use tsz_typegraph::types::LiteralValue as HostLiteral;
use tsz_typegraph::{Signature, TypeGraph, TypeId};

#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    Known(KnownSymbol),
    Callable(Signature),
    Void,
    String,
    Number,
    Boolean,
    Literal(LiteralValue),
    Tuple(Arc<[TypeId]>),
    Array(TypeId),
    Union(Arc<[TypeId]>),
    /// `Partial<T>` with its target.
    Partial(TypeId),
    Record,
    /// Explicit `any` or `unknown`.
    Any,
    /// No rule matched; subject to the fallback policy.
    Unclassified,
}

impl TypeShape {
    pub fn label(&self) -> &'static str {
        match self {
            TypeShape::Known(_) => "known",
            TypeShape::Callable(_) => "callable",
            TypeShape::Void => "void",
            TypeShape::String => "string",
            TypeShape::Number => "number",
            TypeShape::Boolean => "boolean",
            TypeShape::Literal(_) => "literal",
            TypeShape::Tuple(_) => "tuple",
            TypeShape::Array(_) => "array",
            TypeShape::Union(_) => "union",
            TypeShape::Partial(_) => "partial",
            TypeShape::Record => "record",
            TypeShape::Any => "any",
            TypeShape::Unclassified => "unclassified",
        }
    }
}

/// Classify the shape of `type_id`, an already non-nullable node.
///
/// `declared` is the node before nullability was stripped. Its name is
/// consulted for the known-symbol check when the stripped node has none,
/// since stripping builds a fresh union that no longer carries the alias.
pub fn type_shape<G: TypeGraph + ?Sized>(
    db: &G,
    known: &KnownSymbols,
    type_id: TypeId,
    declared: TypeId,
) -> TypeShape {
    let symbol = match known_symbol(db, known, type_id) {
        None if declared != type_id => known_symbol(db, known, declared),
        found => found,
    };
    if let Some(symbol) = symbol {
        return TypeShape::Known(symbol);
    }

    if let Some(signature) = db.signature(type_id) {
        return TypeShape::Callable(signature);
    }

    if db.is_void_like(type_id) {
        return TypeShape::Void;
    }
    if db.is_string(type_id) {
        return TypeShape::String;
    }
    if db.is_number(type_id) {
        return TypeShape::Number;
    }
    if db.is_boolean(type_id) {
        return TypeShape::Boolean;
    }

    if let Some(value) = db.literal_value(type_id) {
        return TypeShape::Literal(match value {
            HostLiteral::String(atom) => LiteralValue::String(db.resolve_atom(atom).to_string()),
            HostLiteral::Number(n) => LiteralValue::Number(n.into_inner()),
            HostLiteral::Boolean(b) => LiteralValue::Boolean(b),
        });
    }
    if db.is_boolean_literal(type_id) {
        return TypeShape::Literal(LiteralValue::Boolean(db.type_to_string(type_id) == "true"));
    }

    if let Some(elements) = db.tuple_elements(type_id) {
        return TypeShape::Tuple(elements);
    }
    if let Some(element) = db.array_element(type_id) {
        return TypeShape::Array(element);
    }
    if let Some(members) = db.union_members(type_id) {
        return TypeShape::Union(members);
    }
    if let Some(target) = db.partial_target(type_id) {
        return TypeShape::Partial(target);
    }
    if db.is_object(type_id) {
        return TypeShape::Record;
    }

    if db.is_any(type_id) || db.is_unknown(type_id) {
        return TypeShape::Any;
    }
    TypeShape::Unclassified
}

fn known_symbol<G: TypeGraph + ?Sized>(
    db: &G,
    known: &KnownSymbols,
    type_id: TypeId,
) -> Option<KnownSymbol> {
    known.get(&db.qualified_name(type_id)?)
}

#[cfg(test)]
#[path = "../tests/shape_tests.rs"]
mod tests;
