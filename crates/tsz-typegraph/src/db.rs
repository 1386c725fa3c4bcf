//! Type graph accessor abstraction.
//!
//! Props extraction only talks to the graph through this trait, so the
//! classifier and locator never reach into `TypeInterner` storage directly.

use crate::format::TypeFormatter;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::intern::TypeInterner;
use crate::types::{
    DeclId, Declaration, FileId, LiteralValue, ObjectShape, ParamInfo, PropertySymbol, Signature,
    SourceFile, SymbolData, TypeData, TypeId,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tsz_common::SourceLocation;
use tsz_common::interner::Atom;

/// Read-only query interface over a resolved type graph.
pub trait TypeGraph {
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn resolve_atom(&self, atom: Atom) -> Arc<str>;
    fn declaration(&self, id: DeclId) -> Option<Declaration>;
    fn file(&self, id: FileId) -> Option<SourceFile>;
    fn files(&self) -> Vec<FileId>;

    /// Direct base types of a class, interface or instantiated generic.
    fn base_types(&self, id: TypeId) -> Vec<TypeId>;
    /// Type arguments of an instantiated generic (`Base<A, B>` gives `[A, B]`).
    fn type_arguments(&self, id: TypeId) -> Vec<TypeId>;
    /// Generic declaration an instantiated generic applies (`Base<A>` gives `Base`).
    fn generic_base(&self, id: TypeId) -> Option<TypeId>;

    /// A union holding `null` or `undefined` next to at least one other member.
    fn is_nullable(&self, id: TypeId) -> bool;
    /// `id` without its `null` and `undefined` members.
    fn non_nullable(&self, id: TypeId) -> TypeId;

    fn is_void_like(&self, id: TypeId) -> bool;
    fn is_string(&self, id: TypeId) -> bool;
    fn is_number(&self, id: TypeId) -> bool;
    fn is_boolean(&self, id: TypeId) -> bool;
    fn is_any(&self, id: TypeId) -> bool;
    fn is_unknown(&self, id: TypeId) -> bool;

    /// String and number literal values. Boolean literals are reported by
    /// `is_boolean_literal` instead.
    fn literal_value(&self, id: TypeId) -> Option<LiteralValue>;
    fn is_boolean_literal(&self, id: TypeId) -> bool;
    fn type_to_string(&self, id: TypeId) -> String;

    fn tuple_elements(&self, id: TypeId) -> Option<Arc<[TypeId]>>;
    fn array_element(&self, id: TypeId) -> Option<TypeId>;
    fn union_members(&self, id: TypeId) -> Option<Arc<[TypeId]>>;
    /// True for every non-primitive: records, generics, callables, arrays, tuples.
    fn is_object(&self, id: TypeId) -> bool;
    /// Target of `Partial<T>`.
    fn partial_target(&self, id: TypeId) -> Option<TypeId>;

    /// Members of a record type, own members first, then inherited ones.
    ///
    /// Members read through an instantiated generic have its arguments
    /// substituted. Optional members report `T | undefined`.
    fn properties(&self, id: TypeId) -> Vec<PropertySymbol>;
    /// Call signature of a callable type.
    fn signature(&self, id: TypeId) -> Option<Signature>;

    /// Fully-qualified name of the type's symbol (`React.MouseEvent`).
    fn qualified_name(&self, id: TypeId) -> Option<Arc<str>>;
    /// Declared name of a record type; `None` for inline object literals.
    fn type_name(&self, id: TypeId) -> Option<Arc<str>>;
    /// Short name of the type's symbol, if any.
    fn symbol_name(&self, id: TypeId) -> Option<Arc<str>>;
    fn location(&self, id: TypeId) -> Option<SourceLocation>;

    fn is_type_parameter(&self, id: TypeId) -> bool;
    fn type_parameter_constraint(&self, id: TypeId) -> Option<TypeId>;
}

impl TypeInterner {
    /// Symbol that names `id`: the alias symbol if one is attached, then the
    /// record's own symbol, then the symbol of a generic's base.
    fn naming_symbol(&self, id: TypeId) -> Option<SymbolData> {
        if let Some(symbol) = self.alias_symbol(id) {
            return self.symbol_data(symbol);
        }
        match self.lookup(id)? {
            TypeData::Object(shape_id) => self
                .object_shape(shape_id)
                .symbol
                .and_then(|s| self.symbol_data(s)),
            TypeData::Application(app_id) => {
                self.naming_symbol(self.type_application(app_id).base)
            }
            _ => None,
        }
    }

    /// Substitution that maps the type parameters of `app`'s base record to
    /// `app`'s arguments, together with the base's shape.
    fn application_scope(&self, id: TypeId) -> Option<(Arc<ObjectShape>, TypeSubstitution)> {
        let TypeData::Application(app_id) = self.lookup(id)? else {
            return None;
        };
        let app = self.type_application(app_id);
        let shape = self.object_shape_of(app.base)?;
        let subst = TypeSubstitution::from_args(&shape.type_params, &app.args);
        Some((shape, subst))
    }

    fn collect_properties(
        &self,
        id: TypeId,
        force_optional: bool,
        out: &mut Vec<PropertySymbol>,
        seen: &mut FxHashSet<Atom>,
        visited: &mut FxHashSet<TypeId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        match self.lookup(id) {
            Some(TypeData::Object(shape_id)) => {
                let shape = self.object_shape(shape_id);
                let subst = TypeSubstitution::new();
                self.collect_shape(&shape, &subst, force_optional, out, seen, visited);
            }
            Some(TypeData::Application(_)) => {
                if let Some((shape, subst)) = self.application_scope(id) {
                    self.collect_shape(&shape, &subst, force_optional, out, seen, visited);
                }
            }
            Some(TypeData::Partial(target)) => {
                self.collect_properties(target, true, out, seen, visited);
            }
            _ => {}
        }
    }

    fn collect_shape(
        &self,
        shape: &ObjectShape,
        subst: &TypeSubstitution,
        force_optional: bool,
        out: &mut Vec<PropertySymbol>,
        seen: &mut FxHashSet<Atom>,
        visited: &mut FxHashSet<TypeId>,
    ) {
        for prop in &shape.properties {
            if !seen.insert(prop.name) {
                continue;
            }
            let optional = prop.optional || force_optional;
            let type_id = prop.type_id.map(|t| {
                let t = instantiate_type(self, t, subst);
                if optional { self.union2(t, TypeId::UNDEFINED) } else { t }
            });
            out.push(PropertySymbol {
                name: prop.name,
                type_id,
                optional,
            });
        }
        for &base in &shape.bases {
            let base = instantiate_type(self, base, subst);
            self.collect_properties(base, force_optional, out, seen, visited);
        }
    }
}

impl TypeGraph for TypeInterner {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        TypeInterner::lookup(self, id)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        TypeInterner::resolve_atom(self, atom)
    }

    fn declaration(&self, id: DeclId) -> Option<Declaration> {
        TypeInterner::declaration(self, id)
    }

    fn file(&self, id: FileId) -> Option<SourceFile> {
        TypeInterner::file(self, id)
    }

    fn files(&self) -> Vec<FileId> {
        TypeInterner::files(self)
    }

    fn base_types(&self, id: TypeId) -> Vec<TypeId> {
        match self.lookup(id) {
            Some(TypeData::Object(shape_id)) => self.object_shape(shape_id).bases.clone(),
            Some(TypeData::Application(_)) => match self.application_scope(id) {
                Some((shape, subst)) => shape
                    .bases
                    .iter()
                    .map(|&base| instantiate_type(self, base, &subst))
                    .collect(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn type_arguments(&self, id: TypeId) -> Vec<TypeId> {
        match self.lookup(id) {
            Some(TypeData::Application(app_id)) => self.type_application(app_id).args.clone(),
            _ => Vec::new(),
        }
    }

    fn generic_base(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Application(app_id) => Some(self.type_application(app_id).base),
            _ => None,
        }
    }

    fn is_nullable(&self, id: TypeId) -> bool {
        let Some(members) = self.union_members(id) else {
            return false;
        };
        members.iter().any(|m| m.is_nullish()) && members.iter().any(|m| !m.is_nullish())
    }

    fn non_nullable(&self, id: TypeId) -> TypeId {
        let Some(members) = self.union_members(id) else {
            return id;
        };
        let rest: Vec<TypeId> = members.iter().copied().filter(|m| !m.is_nullish()).collect();
        if rest.is_empty() {
            return id;
        }
        self.union(rest)
    }

    fn is_void_like(&self, id: TypeId) -> bool {
        id == TypeId::VOID || id == TypeId::UNDEFINED || id == TypeId::NULL
    }

    fn is_string(&self, id: TypeId) -> bool {
        id == TypeId::STRING
    }

    fn is_number(&self, id: TypeId) -> bool {
        id == TypeId::NUMBER
    }

    fn is_boolean(&self, id: TypeId) -> bool {
        id == TypeId::BOOLEAN
    }

    fn is_any(&self, id: TypeId) -> bool {
        id == TypeId::ANY
    }

    fn is_unknown(&self, id: TypeId) -> bool {
        id == TypeId::UNKNOWN
    }

    fn literal_value(&self, id: TypeId) -> Option<LiteralValue> {
        match self.lookup(id)? {
            TypeData::Literal(value @ (LiteralValue::String(_) | LiteralValue::Number(_))) => {
                Some(value)
            }
            _ => None,
        }
    }

    fn is_boolean_literal(&self, id: TypeId) -> bool {
        matches!(
            self.lookup(id),
            Some(TypeData::Literal(LiteralValue::Boolean(_)))
        )
    }

    fn type_to_string(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }

    fn tuple_elements(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Tuple(list) => Some(self.type_list(list)),
            _ => None,
        }
    }

    fn array_element(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    fn union_members(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Union(list) => Some(self.type_list(list)),
            _ => None,
        }
    }

    fn is_object(&self, id: TypeId) -> bool {
        if id == TypeId::OBJECT {
            return true;
        }
        matches!(
            self.lookup(id),
            Some(
                TypeData::Object(_)
                    | TypeData::Application(_)
                    | TypeData::Partial(_)
                    | TypeData::Function(_)
                    | TypeData::Array(_)
                    | TypeData::Tuple(_)
            )
        )
    }

    fn partial_target(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Partial(target) => Some(target),
            _ => None,
        }
    }

    fn properties(&self, id: TypeId) -> Vec<PropertySymbol> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut visited = FxHashSet::default();
        self.collect_properties(id, false, &mut out, &mut seen, &mut visited);
        out
    }

    fn signature(&self, id: TypeId) -> Option<Signature> {
        let TypeData::Function(shape_id) = self.lookup(id)? else {
            return None;
        };
        let shape = self.function_shape(shape_id);
        let params = shape
            .params
            .iter()
            .map(|p| ParamInfo {
                name: p.name,
                type_id: if p.optional {
                    self.union2(p.type_id, TypeId::UNDEFINED)
                } else {
                    p.type_id
                },
                optional: p.optional,
            })
            .collect();
        Some(Signature {
            params,
            return_type: shape.return_type,
        })
    }

    fn qualified_name(&self, id: TypeId) -> Option<Arc<str>> {
        self.naming_symbol(id)
            .map(|symbol| self.resolve_atom(symbol.qualified_name))
    }

    fn type_name(&self, id: TypeId) -> Option<Arc<str>> {
        if let Some(symbol) = self.alias_symbol(id) {
            return self.symbol_data(symbol).map(|s| self.resolve_atom(s.name));
        }
        match self.lookup(id)? {
            TypeData::Object(shape_id) => self
                .object_shape(shape_id)
                .name
                .map(|name| self.resolve_atom(name)),
            TypeData::Application(app_id) => self.type_name(self.type_application(app_id).base),
            _ => None,
        }
    }

    fn symbol_name(&self, id: TypeId) -> Option<Arc<str>> {
        self.naming_symbol(id).map(|symbol| self.resolve_atom(symbol.name))
    }

    fn location(&self, id: TypeId) -> Option<SourceLocation> {
        self.naming_symbol(id).and_then(|symbol| symbol.location)
    }

    fn is_type_parameter(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), Some(TypeData::TypeParameter(_)))
    }

    fn type_parameter_constraint(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::TypeParameter(info) => info.constraint,
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
