//! Generic instantiation.
//!
//! Replaces type parameters by type arguments inside arrays, tuples, unions,
//! signatures, applications and `Partial`. A record whose members mention a
//! substituted parameter (an inline object type inside a generic) is copied
//! with its members instantiated. Copies are memoized per record and
//! bindings, so reading `Outer<string>` twice yields the same inner record.

use crate::intern::TypeInterner;
use crate::types::{FunctionShape, ParamInfo, PropertyInfo, TypeData, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use tsz_common::limits::MAX_INSTANTIATION_DEPTH;

/// Mapping from type parameters to their arguments.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair parameters with arguments positionally.
    ///
    /// Parameters without an argument stay unsubstituted.
    pub fn from_args(params: &[TypeId], args: &[TypeId]) -> Self {
        let map = params
            .iter()
            .zip(args.iter())
            .map(|(&param, &arg)| (param, arg))
            .collect();
        TypeSubstitution { map }
    }

    pub fn insert(&mut self, param: TypeId, arg: TypeId) {
        self.map.insert(param, arg);
    }

    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Instantiate `type_id` under `substitution`.
pub fn instantiate_type(
    interner: &TypeInterner,
    type_id: TypeId,
    substitution: &TypeSubstitution,
) -> TypeId {
    if substitution.is_empty() {
        return type_id;
    }
    TypeInstantiator {
        interner,
        substitution,
        depth: 0,
    }
    .instantiate(type_id)
}

struct TypeInstantiator<'a> {
    interner: &'a TypeInterner,
    substitution: &'a TypeSubstitution,
    depth: u32,
}

impl TypeInstantiator<'_> {
    fn instantiate(&mut self, type_id: TypeId) -> TypeId {
        if let Some(arg) = self.substitution.get(type_id) {
            return arg;
        }
        if self.depth >= MAX_INSTANTIATION_DEPTH {
            tracing::debug!(type_id = type_id.0, "instantiation depth limit reached");
            return type_id;
        }
        let Some(data) = self.interner.lookup(type_id) else {
            return type_id;
        };

        self.depth += 1;
        let result = match data {
            TypeData::Array(element) => {
                let element = self.instantiate(element);
                self.interner.array(element)
            }
            TypeData::Tuple(list) => {
                let elements = self.instantiate_list(&self.interner.type_list(list));
                self.interner.tuple(elements)
            }
            TypeData::Union(list) => {
                let members = self.instantiate_list(&self.interner.type_list(list));
                self.interner.union(members)
            }
            TypeData::Partial(target) => {
                let target = self.instantiate(target);
                self.interner.partial(target)
            }
            TypeData::Application(app_id) => {
                let app = self.interner.type_application(app_id);
                let args = self.instantiate_list(&app.args);
                self.interner.application(app.base, args)
            }
            TypeData::Function(shape_id) => {
                let shape = self.interner.function_shape(shape_id);
                let params = shape
                    .params
                    .iter()
                    .map(|p| ParamInfo {
                        name: p.name,
                        type_id: self.instantiate(p.type_id),
                        optional: p.optional,
                    })
                    .collect();
                let return_type = self.instantiate(shape.return_type);
                self.interner.function(FunctionShape {
                    type_params: shape.type_params.clone(),
                    params,
                    return_type,
                })
            }
            TypeData::Object(_) => self.instantiate_record(type_id),
            TypeData::Intrinsic(_) | TypeData::Literal(_) | TypeData::TypeParameter(_) => type_id,
        };
        self.depth -= 1;
        result
    }

    fn instantiate_list(&mut self, members: &[TypeId]) -> Vec<TypeId> {
        members.iter().map(|&m| self.instantiate(m)).collect()
    }

    fn instantiate_record(&mut self, record: TypeId) -> TypeId {
        let mut mentioned = Vec::new();
        self.collect_mentions(record, &mut FxHashSet::default(), &mut mentioned);
        if mentioned.is_empty() {
            return record;
        }
        mentioned.sort_unstable();
        mentioned.dedup();
        let bindings = mentioned
            .into_iter()
            .filter_map(|param| self.substitution.get(param).map(|arg| (param, arg)))
            .collect();

        let Some(shape) = self.interner.object_shape_of(record) else {
            return record;
        };
        let Some((copy, fresh)) = self.interner.record_instantiation(record, bindings) else {
            return record;
        };
        if fresh {
            // Members referring back to `record` resolve to `copy` via the memo.
            let properties = shape
                .properties
                .iter()
                .map(|prop| PropertyInfo {
                    name: prop.name,
                    type_id: prop.type_id.map(|t| self.instantiate(t)),
                    optional: prop.optional,
                })
                .collect();
            let bases = shape.bases.iter().map(|&b| self.instantiate(b)).collect();
            self.interner.set_properties(copy, properties);
            self.interner.set_bases(copy, bases);
        }
        copy
    }

    /// Substituted parameters reachable from `type_id`.
    fn collect_mentions(
        &self,
        type_id: TypeId,
        visited: &mut FxHashSet<TypeId>,
        found: &mut Vec<TypeId>,
    ) {
        if self.substitution.get(type_id).is_some() {
            found.push(type_id);
            return;
        }
        if !visited.insert(type_id) {
            return;
        }
        let Some(data) = self.interner.lookup(type_id) else {
            return;
        };
        match data {
            TypeData::Array(inner) | TypeData::Partial(inner) => {
                self.collect_mentions(inner, visited, found);
            }
            TypeData::Tuple(list) | TypeData::Union(list) => {
                for &member in self.interner.type_list(list).iter() {
                    self.collect_mentions(member, visited, found);
                }
            }
            TypeData::Application(app_id) => {
                for &arg in &self.interner.type_application(app_id).args {
                    self.collect_mentions(arg, visited, found);
                }
            }
            TypeData::Function(shape_id) => {
                let shape = self.interner.function_shape(shape_id);
                for param in &shape.params {
                    self.collect_mentions(param.type_id, visited, found);
                }
                self.collect_mentions(shape.return_type, visited, found);
            }
            TypeData::Object(shape_id) => {
                let shape = self.interner.object_shape(shape_id);
                for prop in &shape.properties {
                    if let Some(t) = prop.type_id {
                        self.collect_mentions(t, visited, found);
                    }
                }
                for &base in &shape.bases {
                    self.collect_mentions(base, visited, found);
                }
            }
            TypeData::Intrinsic(_) | TypeData::Literal(_) | TypeData::TypeParameter(_) => {}
        }
    }
}
