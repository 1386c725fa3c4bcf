//! JSON description of a resolved type graph.
//!
//! A snapshot is what a host compiler dumps after checking a project: every
//! type it resolved, keyed by a string id, plus the declarations and the
//! export lists of the source files. Type references are either another
//! key of `types` or a builtin keyword (`string`, `undefined`, ...).
//!
//! Lowering happens in three phases so that records can refer to each
//! other and to themselves:
//! 1. declare every record (nominal, empty),
//! 2. resolve every other type on demand, memoized, rejecting cycles that
//!    do not pass through a record,
//! 3. fill in record members, bases and type parameters.

use crate::intern::TypeInterner;
use crate::types::{
    DeclId, DeclKind, FunctionShape, IntrinsicKind, ParamInfo, PropertyInfo, SymbolId, TypeId,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tsz_common::SourceLocation;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub types: IndexMap<String, TypeSnapshot>,
    #[serde(default)]
    pub declarations: IndexMap<String, DeclarationSnapshot>,
    #[serde(default)]
    pub files: Vec<FileSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSnapshot {
    pub name: String,
    /// Defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSnapshot {
    #[serde(flatten)]
    pub data: TypeDataSnapshot,
    /// Type alias naming this type (`type Props = { ... }`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<SymbolSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeDataSnapshot {
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        symbol: Option<SymbolSnapshot>,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        bases: Vec<String>,
        #[serde(default)]
        properties: Vec<PropertySnapshot>,
    },
    Literal {
        value: serde_json::Value,
    },
    Array {
        element: String,
    },
    Tuple {
        elements: Vec<String>,
    },
    Union {
        members: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Function {
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        params: Vec<ParamSnapshot>,
        returns: String,
    },
    TypeParameter {
        name: String,
        #[serde(default)]
        constraint: Option<String>,
    },
    Application {
        base: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Partial {
        target: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub name: String,
    /// Absent when the host could not resolve the member's type.
    #[serde(rename = "type", default)]
    pub type_ref: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKindSnapshot {
    Class,
    Interface,
    TypeAlias,
    Variable,
    Function,
    ExportAlias,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationSnapshot {
    pub name: String,
    pub kind: DeclKindSnapshot,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    /// Declaration key an export alias points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub name: String,
    #[serde(default)]
    pub exports: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid graph snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("type `{from}` refers to unknown type `{to}`")]
    DanglingType { from: String, to: String },
    #[error("`{from}` refers to unknown declaration `{to}`")]
    DanglingDeclaration { from: String, to: String },
    #[error("type id `{0}` shadows a builtin type keyword")]
    ReservedId(String),
    #[error("type `{0}` is defined in terms of itself without passing through a record")]
    StructuralCycle(String),
    #[error("literal type `{id}` has unsupported value {value}")]
    UnsupportedLiteral { id: String, value: String },
    #[error("export alias `{0}` has no target")]
    MissingAliasTarget(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

impl GraphSnapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl TypeInterner {
    /// Build a fresh graph from a snapshot.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self> {
        let interner = TypeInterner::new();
        SnapshotLowering::new(&interner, snapshot).run()?;
        Ok(interner)
    }
}

struct SnapshotLowering<'a> {
    interner: &'a TypeInterner,
    snapshot: &'a GraphSnapshot,
    resolved: FxHashMap<&'a str, TypeId>,
    in_progress: FxHashSet<&'a str>,
}

impl<'a> SnapshotLowering<'a> {
    fn new(interner: &'a TypeInterner, snapshot: &'a GraphSnapshot) -> Self {
        SnapshotLowering {
            interner,
            snapshot,
            resolved: FxHashMap::default(),
            in_progress: FxHashSet::default(),
        }
    }

    fn run(mut self) -> Result<()> {
        let snapshot = self.snapshot;
        for key in snapshot.types.keys() {
            if IntrinsicKind::from_keyword(key).is_some() {
                return Err(SnapshotError::ReservedId(key.clone()));
            }
        }

        // Phase 1: records.
        for (key, ty) in &snapshot.types {
            if let TypeDataSnapshot::Object { name, symbol, .. } = &ty.data {
                let symbol = symbol.as_ref().map(|s| self.symbol(s));
                let id = self.interner.declare_object(name.as_deref(), symbol);
                self.resolved.insert(key.as_str(), id);
            }
        }

        // Phase 2: everything else.
        for key in snapshot.types.keys() {
            self.resolve_key(key)?;
        }

        // Phase 3: record contents.
        for (key, ty) in &snapshot.types {
            let TypeDataSnapshot::Object {
                type_params,
                bases,
                properties,
                ..
            } = &ty.data
            else {
                continue;
            };
            let id = self.resolved[key.as_str()];
            let type_params = self.resolve_refs(key, type_params)?;
            let bases = self.resolve_refs(key, bases)?;
            let mut members = Vec::with_capacity(properties.len());
            for prop in properties {
                let type_id = match &prop.type_ref {
                    Some(r) => Some(self.resolve_ref(key, r)?),
                    None => None,
                };
                members.push(PropertyInfo {
                    name: self.interner.intern_string(&prop.name),
                    type_id,
                    optional: prop.optional,
                });
            }
            self.interner.set_type_params(id, type_params);
            self.interner.set_bases(id, bases);
            self.interner.set_properties(id, members);
        }

        for (key, ty) in &snapshot.types {
            if let Some(alias) = &ty.alias {
                let symbol = self.symbol(alias);
                self.interner
                    .set_alias_symbol(self.resolved[key.as_str()], symbol);
            }
        }

        let decl_ids = self.lower_declarations()?;

        for file in &snapshot.files {
            let mut exports = Vec::with_capacity(file.exports.len());
            for export in &file.exports {
                let id = decl_ids.get(export.as_str()).copied().ok_or_else(|| {
                    SnapshotError::DanglingDeclaration {
                        from: file.name.clone(),
                        to: export.clone(),
                    }
                })?;
                exports.push(id);
            }
            self.interner.add_file(&file.name, exports);
        }

        tracing::debug!(
            types = snapshot.types.len(),
            declarations = decl_ids.len(),
            files = snapshot.files.len(),
            "graph snapshot lowered"
        );
        Ok(())
    }

    fn lower_declarations(&self) -> Result<FxHashMap<&'a str, DeclId>> {
        // Export aliases may point forward, so ids are assigned up front
        // from declaration order.
        let snapshot = self.snapshot;
        let first = self.interner.declaration_count() as u32;
        let id_of = |key: &str| {
            snapshot
                .declarations
                .get_index_of(key)
                .map(|index| DeclId(first + index as u32))
        };

        let mut ids = FxHashMap::default();
        for (key, decl) in &snapshot.declarations {
            let kind = match decl.kind {
                DeclKindSnapshot::Class => DeclKind::Class,
                DeclKindSnapshot::Interface => DeclKind::Interface,
                DeclKindSnapshot::TypeAlias => DeclKind::TypeAlias,
                DeclKindSnapshot::Variable => DeclKind::Variable,
                DeclKindSnapshot::Function => DeclKind::Function,
                DeclKindSnapshot::ExportAlias => {
                    let target = decl
                        .target
                        .as_deref()
                        .ok_or_else(|| SnapshotError::MissingAliasTarget(key.clone()))?;
                    let target_id =
                        id_of(target).ok_or_else(|| SnapshotError::DanglingDeclaration {
                            from: key.clone(),
                            to: target.to_string(),
                        })?;
                    DeclKind::ExportAlias(target_id)
                }
            };
            let type_id = match &decl.type_ref {
                Some(r) => Some(self.lookup_ref(key, r)?),
                None => None,
            };
            let id = self
                .interner
                .declare(&decl.name, kind, type_id, decl.location.clone());
            ids.insert(key.as_str(), id);
        }
        Ok(ids)
    }

    fn symbol(&self, symbol: &SymbolSnapshot) -> SymbolId {
        let qualified = symbol.qualified_name.as_deref().unwrap_or(&symbol.name);
        self.interner
            .symbol_at(&symbol.name, qualified, symbol.location.clone())
    }

    /// Reference lookup once every type has been resolved.
    fn lookup_ref(&self, from: &str, reference: &str) -> Result<TypeId> {
        if let Some(kind) = IntrinsicKind::from_keyword(reference) {
            return Ok(kind.type_id());
        }
        self.resolved
            .get(reference)
            .copied()
            .ok_or_else(|| SnapshotError::DanglingType {
                from: from.to_string(),
                to: reference.to_string(),
            })
    }

    fn resolve_refs(&mut self, from: &str, references: &'a [String]) -> Result<Vec<TypeId>> {
        references
            .iter()
            .map(|r| self.resolve_ref(from, r))
            .collect()
    }

    fn resolve_ref(&mut self, from: &str, reference: &'a str) -> Result<TypeId> {
        if let Some(kind) = IntrinsicKind::from_keyword(reference) {
            return Ok(kind.type_id());
        }
        if !self.snapshot.types.contains_key(reference) {
            return Err(SnapshotError::DanglingType {
                from: from.to_string(),
                to: reference.to_string(),
            });
        }
        self.resolve_key(reference)
    }

    fn resolve_key(&mut self, key: &'a str) -> Result<TypeId> {
        if let Some(&id) = self.resolved.get(key) {
            return Ok(id);
        }
        if !self.in_progress.insert(key) {
            return Err(SnapshotError::StructuralCycle(key.to_string()));
        }
        let snapshot = self.snapshot;
        let Some(ty) = snapshot.types.get(key) else {
            return Err(SnapshotError::DanglingType {
                from: key.to_string(),
                to: key.to_string(),
            });
        };

        let id = match &ty.data {
            // Declared in phase 1.
            TypeDataSnapshot::Object { .. } => self.resolved[key],
            TypeDataSnapshot::Literal { value } => match value {
                serde_json::Value::String(s) => self.interner.literal_string(s),
                serde_json::Value::Bool(b) => self.interner.literal_boolean(*b),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(n) => self.interner.literal_number(n),
                    None => {
                        return Err(SnapshotError::UnsupportedLiteral {
                            id: key.to_string(),
                            value: value.to_string(),
                        });
                    }
                },
                other => {
                    return Err(SnapshotError::UnsupportedLiteral {
                        id: key.to_string(),
                        value: other.to_string(),
                    });
                }
            },
            TypeDataSnapshot::Array { element } => {
                let element = self.resolve_ref(key, element)?;
                self.interner.array(element)
            }
            TypeDataSnapshot::Tuple { elements } => {
                let elements = self.resolve_refs(key, elements)?;
                self.interner.tuple(elements)
            }
            TypeDataSnapshot::Union { members } => {
                let members = self.resolve_refs(key, members)?;
                self.interner.union(members)
            }
            TypeDataSnapshot::Function {
                type_params,
                params,
                returns,
            } => {
                let type_params = self.resolve_refs(key, type_params)?;
                let mut lowered = Vec::with_capacity(params.len());
                for param in params {
                    let type_id = self.resolve_ref(key, &param.type_ref)?;
                    lowered.push(ParamInfo {
                        name: self.interner.intern_string(&param.name),
                        type_id,
                        optional: param.optional,
                    });
                }
                let return_type = self.resolve_ref(key, returns)?;
                self.interner.function(FunctionShape {
                    type_params,
                    params: lowered,
                    return_type,
                })
            }
            TypeDataSnapshot::TypeParameter { name, constraint } => {
                let constraint = match constraint {
                    Some(c) => Some(self.resolve_ref(key, c)?),
                    None => None,
                };
                self.interner.type_param(name, constraint)
            }
            TypeDataSnapshot::Application { base, args } => {
                let base = self.resolve_ref(key, base)?;
                let args = self.resolve_refs(key, args)?;
                self.interner.application(base, args)
            }
            TypeDataSnapshot::Partial { target } => {
                let target = self.resolve_ref(key, target)?;
                self.interner.partial(target)
            }
        };

        self.in_progress.remove(key);
        self.resolved.insert(key, id);
        Ok(id)
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod tests;
