//! Recursive type classification.
//!
//! `TypeClassifier` owns the reference table of one extraction pass and
//! threads it through every recursive call. Each node goes through:
//! 1. nullability: strip `null`/`undefined` and remember that they were there,
//! 2. shape dispatch (`type_shape`), in precedence order,
//! 3. recursion into elements, members, parameters or the reference table.
//!
//! The reference table stops cycles through the same type. A generic that
//! instantiates itself with ever larger arguments is stopped by counting the
//! open instantiations of each generic base.

use crate::error::{ExtractError, Result};
use crate::options::{ExtractOptions, FallbackPolicy};
use crate::ref_table::{RefTable, Slot};
use crate::shape::{TypeShape, type_shape};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use tsz_common::SourceLocation;
use tsz_common::limits::MAX_GENERIC_EXPANSION_DEPTH;
use tsz_props_schema::{ObjectMember, ObjectSpec, PropSpec, PropType};
use tsz_typegraph::{Signature, TypeGraph, TypeId};

/// Where a type is being classified, for error reporting.
#[derive(Clone, Debug, Default)]
pub struct Site {
    /// Name of the record or component that owns the type.
    pub owner: Option<Arc<str>>,
    /// Property (or parameter) the type was declared on.
    pub property: Option<Arc<str>>,
    pub location: Option<SourceLocation>,
}

impl Site {
    pub fn component(name: Arc<str>, location: Option<SourceLocation>) -> Self {
        Site {
            owner: Some(name),
            property: None,
            location,
        }
    }

    fn property_name(&self) -> String {
        match (&self.owner, &self.property) {
            (_, Some(property)) => property.to_string(),
            (Some(owner), None) => owner.to_string(),
            (None, None) => "<anonymous>".to_string(),
        }
    }
}

pub struct TypeClassifier<'a, G: TypeGraph + ?Sized> {
    db: &'a G,
    options: &'a ExtractOptions,
    refs: RefTable,
    /// Open `store_ref` frames per generic base.
    expanding: FxHashMap<TypeId, u32>,
}

impl<'a, G: TypeGraph + ?Sized> TypeClassifier<'a, G> {
    pub fn new(db: &'a G, options: &'a ExtractOptions) -> Self {
        TypeClassifier {
            db,
            options,
            refs: RefTable::new(),
            expanding: FxHashMap::default(),
        }
    }

    pub fn refs(&self) -> &RefTable {
        &self.refs
    }

    /// Completed reference table of the pass.
    pub fn finish(self) -> Result<Vec<ObjectSpec>> {
        self.refs.into_refs()
    }

    /// Classify one node into a `PropSpec`.
    pub fn classify(&mut self, type_id: TypeId, site: &Site) -> Result<PropSpec> {
        let is_nullable = self.db.is_nullable(type_id);
        let inner = if is_nullable {
            self.db.non_nullable(type_id)
        } else {
            type_id
        };
        let prop_type = self.classify_non_nullable(inner, type_id, site)?;
        Ok(PropSpec::with_nullable(prop_type, is_nullable))
    }

    /// Classify a node whose nullability is not reported (array and tuple
    /// elements, union members).
    fn classify_type(&mut self, type_id: TypeId, site: &Site) -> Result<PropType> {
        Ok(self.classify(type_id, site)?.prop_type)
    }

    fn classify_non_nullable(
        &mut self,
        type_id: TypeId,
        declared: TypeId,
        site: &Site,
    ) -> Result<PropType> {
        let shape = type_shape(self.db, &self.options.known_symbols, type_id, declared);
        trace!(type_id = type_id.0, shape = shape.label(), "classify");

        let prop_type = match shape {
            TypeShape::Known(symbol) => symbol.prop_type(),
            TypeShape::Callable(signature) => self.classify_signature(&signature, site)?,
            TypeShape::Void => PropType::Void,
            TypeShape::String => PropType::String,
            TypeShape::Number => PropType::Number,
            TypeShape::Boolean => PropType::Boolean,
            TypeShape::Literal(value) => PropType::Literal { value },
            TypeShape::Tuple(elements) => {
                let mut classified = Vec::with_capacity(elements.len());
                for &element in elements.iter() {
                    classified.push(self.classify_type(element, site)?);
                }
                PropType::tuple(classified)
            }
            TypeShape::Array(element) => PropType::array(self.classify_type(element, site)?),
            TypeShape::Union(members) => {
                let mut options = Vec::with_capacity(members.len());
                for (index, &member) in members.iter().enumerate() {
                    let option = self.classify_type(member, site).map_err(|source| {
                        ExtractError::UnionMember {
                            property: site.property_name(),
                            index,
                            source: Box::new(source),
                        }
                    })?;
                    options.push(option);
                }
                PropType::union(options)
            }
            TypeShape::Partial(target) => match self.record_ref(target, site)? {
                Some(index) => PropType::partial(index),
                None => PropType::Any,
            },
            TypeShape::Record => match self.record_ref(type_id, site)? {
                Some(index) => PropType::reference(index),
                None => PropType::Any,
            },
            TypeShape::Any => PropType::Any,
            TypeShape::Unclassified => self.fallback(type_id, site)?,
        };
        Ok(prop_type)
    }

    fn classify_signature(&mut self, signature: &Signature, site: &Site) -> Result<PropType> {
        let mut args = Vec::with_capacity(signature.params.len());
        for param in &signature.params {
            let param_site = Site {
                property: Some(self.db.resolve_atom(param.name)),
                ..site.clone()
            };
            args.push(self.classify_bound(param.type_id, &param_site)?);
        }
        let return_type = self.classify_bound(signature.return_type, site)?;
        Ok(PropType::function(args, return_type))
    }

    /// Classify a signature position, reading a type parameter as its
    /// constraint and an unconstrained one as `any`.
    fn classify_bound(&mut self, type_id: TypeId, site: &Site) -> Result<PropSpec> {
        let is_nullable = self.db.is_nullable(type_id);
        let inner = if is_nullable {
            self.db.non_nullable(type_id)
        } else {
            type_id
        };
        if !self.db.is_type_parameter(inner) {
            return self.classify(type_id, site);
        }
        let bound = match self.db.type_parameter_constraint(inner) {
            Some(constraint) => self.classify(constraint, site)?,
            None => PropSpec::new(PropType::Any),
        };
        Ok(PropSpec::with_nullable(
            bound.prop_type,
            bound.is_nullable || is_nullable,
        ))
    }

    /// `store_ref` for a member position. `None` means the generic expansion
    /// limit was hit under the lenient policy.
    fn record_ref(&mut self, type_id: TypeId, site: &Site) -> Result<Option<usize>> {
        if let Some(index) = self.refs.index_of(type_id) {
            return Ok(Some(index));
        }
        if self.options.fallback == FallbackPolicy::Lenient && self.expansion_exceeded(type_id) {
            debug!(
                type_id = type_id.0,
                depth = MAX_GENERIC_EXPANSION_DEPTH,
                "generic expansion limit reached, using any"
            );
            return Ok(None);
        }
        self.store_ref(type_id, site).map(Some)
    }

    fn expansion_exceeded(&self, type_id: TypeId) -> bool {
        self.db
            .generic_base(type_id)
            .and_then(|base| self.expanding.get(&base))
            .is_some_and(|&open| open >= MAX_GENERIC_EXPANSION_DEPTH)
    }

    /// Reference-table index for record `type_id`, classifying its members
    /// the first time it is seen.
    pub fn store_ref(&mut self, type_id: TypeId, site: &Site) -> Result<usize> {
        if self.refs.index_of(type_id).is_none() && self.expansion_exceeded(type_id) {
            return Err(ExtractError::GenericExpansion {
                type_text: self.db.type_to_string(type_id),
                depth: MAX_GENERIC_EXPANSION_DEPTH,
            });
        }
        let index = match self.refs.reserve(type_id) {
            Slot::Existing(index) => return Ok(index),
            Slot::Reserved(index) => index,
        };
        let name = self.db.type_name(type_id);
        debug!(
            type_id = type_id.0,
            index,
            name = name.as_deref().unwrap_or("<anonymous>"),
            "reserved reference slot"
        );

        let base = self.db.generic_base(type_id);
        if let Some(base) = base {
            *self.expanding.entry(base).or_default() += 1;
        }
        let members = self.classify_members(type_id, name.clone(), site);
        if let Some(open) = base.and_then(|base| self.expanding.get_mut(&base)) {
            *open -= 1;
        }

        self.refs.patch(
            index,
            ObjectSpec {
                name: name.map(|n| n.to_string()),
                members: members?,
            },
        );
        Ok(index)
    }

    fn classify_members(
        &mut self,
        type_id: TypeId,
        name: Option<Arc<str>>,
        site: &Site,
    ) -> Result<Vec<ObjectMember>> {
        let location = self.db.location(type_id).or_else(|| site.location.clone());
        let owner = name.or_else(|| site.owner.clone());
        let mut members = Vec::new();
        for prop in self.db.properties(type_id) {
            let prop_name = self.db.resolve_atom(prop.name);
            let Some(prop_type) = prop.type_id else {
                return Err(ExtractError::MissingTypeInfo {
                    property: prop_name.to_string(),
                    location,
                });
            };
            let member_site = Site {
                owner: owner.clone(),
                property: Some(prop_name.clone()),
                location: location.clone(),
            };
            let spec = self.classify(prop_type, &member_site)?;
            members.push(ObjectMember::new(prop_name.to_string(), spec));
        }
        Ok(members)
    }

    /// Reference-table index for the props type of a component.
    ///
    /// Props that are not a record fail under the strict policy and get an
    /// entry without members under the lenient one.
    pub fn classify_props(&mut self, type_id: TypeId, site: &Site) -> Result<usize> {
        let inner = if self.db.is_nullable(type_id) {
            self.db.non_nullable(type_id)
        } else {
            type_id
        };
        match type_shape(self.db, &self.options.known_symbols, inner, type_id) {
            TypeShape::Record | TypeShape::Partial(_) => self.store_ref(inner, site),
            shape => {
                if self.options.fallback == FallbackPolicy::Strict {
                    return Err(self.unclassifiable(inner, site));
                }
                debug!(
                    type_id = inner.0,
                    shape = shape.label(),
                    "props type is not a record"
                );
                Ok(match self.refs.reserve(inner) {
                    Slot::Existing(index) => index,
                    Slot::Reserved(index) => {
                        self.refs.patch(
                            index,
                            ObjectSpec {
                                name: self.db.type_name(inner).map(|n| n.to_string()),
                                members: Vec::new(),
                            },
                        );
                        index
                    }
                })
            }
        }
    }

    fn fallback(&self, type_id: TypeId, site: &Site) -> Result<PropType> {
        match self.options.fallback {
            FallbackPolicy::Strict => Err(self.unclassifiable(type_id, site)),
            FallbackPolicy::Lenient => {
                trace!(type_id = type_id.0, "no rule matched, using any");
                Ok(PropType::Any)
            }
        }
    }

    fn unclassifiable(&self, type_id: TypeId, site: &Site) -> ExtractError {
        ExtractError::Unclassifiable {
            type_text: self.db.type_to_string(type_id),
            symbol: self
                .db
                .symbol_name(type_id)
                .or_else(|| site.property.clone())
                .or_else(|| site.owner.clone())
                .map(|s| s.to_string()),
            location: self.db.location(type_id).or_else(|| site.location.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/classifier_tests.rs"]
mod tests;
