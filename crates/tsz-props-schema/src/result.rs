//! Reference-table entries and the result of one extraction pass.

use crate::prop_type::{PropSpec, PropType};
use serde::{Deserialize, Serialize};

/// A named member of a record type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMember {
    pub name: String,
    pub prop_type: PropType,
    pub is_nullable: bool,
}

impl ObjectMember {
    pub fn new(name: impl Into<String>, spec: PropSpec) -> Self {
        ObjectMember {
            name: name.into(),
            prop_type: spec.prop_type,
            is_nullable: spec.is_nullable,
        }
    }
}

/// Reference-table entry describing one record type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// Declared name; `null` for inline object literal types.
    pub name: Option<String>,
    /// Members in declaration order.
    pub members: Vec<ObjectMember>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub name: String,
    pub props_ref_index: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{context} refers to ref #{index} but only {len} refs exist")]
    DanglingRef {
        context: String,
        index: usize,
        len: usize,
    },
}

/// Components found in one pass and the records their props refer to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinderResult {
    pub components: Vec<ComponentSpec>,
    pub refs: Vec<ObjectSpec>,
}

impl FinderResult {
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Reference-table entry holding the props of component `name`.
    pub fn props_of(&self, name: &str) -> Option<&ObjectSpec> {
        self.refs.get(self.component(name)?.props_ref_index)
    }

    /// Check that every index in the result points into `refs`.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let len = self.refs.len();
        for component in &self.components {
            if component.props_ref_index >= len {
                return Err(SchemaError::DanglingRef {
                    context: format!("component `{}`", component.name),
                    index: component.props_ref_index,
                    len,
                });
            }
        }
        for (owner, spec) in self.refs.iter().enumerate() {
            for member in &spec.members {
                let mut dangling = None;
                member.prop_type.for_each_ref(&mut |index| {
                    if index >= len && dangling.is_none() {
                        dangling = Some(index);
                    }
                });
                if let Some(index) = dangling {
                    return Err(SchemaError::DanglingRef {
                        context: format!("member `{}` of ref #{owner}", member.name),
                        index,
                        len,
                    });
                }
            }
        }
        Ok(())
    }
}
