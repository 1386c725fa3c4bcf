//! Finding component classes among declarations.
//!
//! A component is a class whose base-type chain reaches one of the
//! configured markers (`React.Component` by default). The props type is the
//! first type argument of the direct base that leads to the marker.

use crate::error::{ExtractError, Result};
use crate::options::ExtractOptions;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;
use tsz_common::SourceLocation;
use tsz_common::limits::MAX_EXPORT_ALIAS_DEPTH;
use tsz_typegraph::{DeclId, DeclKind, Declaration, TypeGraph, TypeId};

/// A class found to derive from a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentCandidate {
    pub decl: DeclId,
    pub name: Arc<str>,
    /// Bound props argument; `None` when the marker base has no type argument.
    pub props: Option<TypeId>,
    pub location: Option<SourceLocation>,
}

pub struct ComponentLocator<'a, G: TypeGraph + ?Sized> {
    db: &'a G,
    options: &'a ExtractOptions,
}

impl<'a, G: TypeGraph + ?Sized> ComponentLocator<'a, G> {
    pub fn new(db: &'a G, options: &'a ExtractOptions) -> Self {
        ComponentLocator { db, options }
    }

    /// Whether `type_id` itself is a marker.
    pub fn is_marker(&self, type_id: TypeId) -> bool {
        self.db
            .qualified_name(type_id)
            .is_some_and(|name| self.options.is_marker(&name))
    }

    /// Whether any base of `type_id`, at any depth, is a marker.
    ///
    /// Bases without a symbol are not markers but their own bases are still
    /// searched. Cyclic base chains terminate.
    pub fn derives_from_marker(&self, type_id: TypeId) -> bool {
        let mut visited = FxHashSet::default();
        visited.insert(type_id);
        let mut pending = self.db.base_types(type_id);
        while let Some(base) = pending.pop() {
            if !visited.insert(base) {
                continue;
            }
            if self.is_marker(base) {
                return true;
            }
            pending.extend(self.db.base_types(base));
        }
        false
    }

    /// Find the direct base of `class_type` that leads to a marker.
    ///
    /// Returns `None` if the class is not a component, `Some(None)` if it is
    /// one but its marker base binds no props argument.
    pub fn props_argument(&self, class_type: TypeId) -> Option<Option<TypeId>> {
        self.db
            .base_types(class_type)
            .into_iter()
            .find(|&base| self.is_marker(base) || self.derives_from_marker(base))
            .map(|base| self.db.type_arguments(base).first().copied())
    }

    /// Follow export aliases to the declaration they name.
    ///
    /// Alias cycles resolve to `None`.
    pub fn resolve_declaration(&self, id: DeclId) -> Result<Option<(DeclId, Declaration)>> {
        let mut current = id;
        for _ in 0..MAX_EXPORT_ALIAS_DEPTH {
            let decl = self
                .db
                .declaration(current)
                .ok_or(ExtractError::UnknownDeclaration { id: current.0 })?;
            match decl.kind {
                DeclKind::ExportAlias(target) => current = target,
                _ => return Ok(Some((current, decl))),
            }
        }
        debug!(decl = id.0, "export alias chain does not terminate");
        Ok(None)
    }

    /// Component classes among `decls`, in declaration order.
    ///
    /// A class exported under several names is reported once.
    pub fn locate(&self, decls: &[DeclId]) -> Result<Vec<ComponentCandidate>> {
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        for &id in decls {
            let Some((decl_id, decl)) = self.resolve_declaration(id)? else {
                continue;
            };
            if !decl.is_class() || !seen.insert(decl_id) {
                continue;
            }
            let Some(class_type) = decl.type_id else {
                continue;
            };
            let Some(props) = self.props_argument(class_type) else {
                continue;
            };
            let name = self.db.resolve_atom(decl.name);
            debug!(
                component = &*name,
                has_props = props.is_some(),
                "found component class"
            );
            found.push(ComponentCandidate {
                decl: decl_id,
                name,
                props,
                location: decl.location.clone(),
            });
        }
        Ok(found)
    }
}

#[cfg(test)]
#[path = "../tests/locator_tests.rs"]
mod tests;
