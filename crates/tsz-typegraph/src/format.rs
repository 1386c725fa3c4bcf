//! TypeScript-style rendering of type-graph nodes.
//!
//! Used for error messages and for the literal-boolean check, which compares
//! the rendered text against `"true"`.

use crate::intern::TypeInterner;
use crate::types::{LiteralValue, TypeData, TypeId};
use std::fmt::Write;

/// Anonymous records nested deeper than this print as `{ ... }`.
const MAX_INLINE_DEPTH: u32 = 3;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter { interner }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(type_id, 0, &mut out);
        out
    }

    fn write_type(&self, type_id: TypeId, depth: u32, out: &mut String) {
        if let Some(symbol) = self.interner.alias_symbol(type_id)
            && let Some(data) = self.interner.symbol_data(symbol)
        {
            out.push_str(&self.interner.resolve_atom(data.name));
            return;
        }

        let Some(data) = self.interner.lookup(type_id) else {
            out.push_str("error");
            return;
        };

        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.keyword()),
            TypeData::Literal(value) => self.write_literal(&value, out),
            TypeData::Array(element) => {
                let needs_parens = matches!(
                    self.interner.lookup(element),
                    Some(TypeData::Union(_) | TypeData::Function(_))
                ) && self.interner.alias_symbol(element).is_none();
                if needs_parens {
                    out.push('(');
                    self.write_type(element, depth, out);
                    out.push(')');
                } else {
                    self.write_type(element, depth, out);
                }
                out.push_str("[]");
            }
            TypeData::Tuple(list) => {
                out.push('[');
                self.write_list(&self.interner.type_list(list), ", ", depth, out);
                out.push(']');
            }
            TypeData::Union(list) => {
                self.write_list(&self.interner.type_list(list), " | ", depth, out);
            }
            TypeData::Object(shape_id) => {
                let shape = self.interner.object_shape(shape_id);
                if let Some(name) = shape.name {
                    out.push_str(&self.interner.resolve_atom(name));
                    return;
                }
                if shape.properties.is_empty() {
                    out.push_str("{}");
                    return;
                }
                if depth >= MAX_INLINE_DEPTH {
                    out.push_str("{ ... }");
                    return;
                }
                out.push_str("{ ");
                for prop in &shape.properties {
                    out.push_str(&self.interner.resolve_atom(prop.name));
                    if prop.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    match prop.type_id {
                        Some(t) => self.write_type(t, depth + 1, out),
                        None => out.push_str("any"),
                    }
                    out.push_str("; ");
                }
                out.push('}');
            }
            TypeData::Function(shape_id) => {
                let shape = self.interner.function_shape(shape_id);
                out.push('(');
                for (i, param) in shape.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.interner.resolve_atom(param.name));
                    if param.optional {
                        out.push('?');
                    }
                    out.push_str(": ");
                    self.write_type(param.type_id, depth, out);
                }
                out.push_str(") => ");
                self.write_type(shape.return_type, depth, out);
            }
            TypeData::TypeParameter(info) => {
                out.push_str(&self.interner.resolve_atom(info.name));
            }
            TypeData::Application(app_id) => {
                let app = self.interner.type_application(app_id);
                self.write_type(app.base, depth, out);
                out.push('<');
                self.write_list(&app.args, ", ", depth, out);
                out.push('>');
            }
            TypeData::Partial(target) => {
                out.push_str("Partial<");
                self.write_type(target, depth, out);
                out.push('>');
            }
        }
    }

    fn write_list(&self, members: &[TypeId], separator: &str, depth: u32, out: &mut String) {
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_type(member, depth, out);
        }
    }

    fn write_literal(&self, value: &LiteralValue, out: &mut String) {
        match value {
            LiteralValue::String(atom) => {
                let text = self.interner.resolve_atom(*atom);
                let _ = write!(out, "\"{}\"", text.replace('"', "\\\""));
            }
            LiteralValue::Number(n) => {
                let n = n.into_inner();
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    let _ = write!(out, "{}", n as i64);
                } else {
                    let _ = write!(out, "{n}");
                }
            }
            LiteralValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
