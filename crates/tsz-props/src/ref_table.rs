//! Deduplicated store of record schemas.
//!
//! Entries are keyed by type-graph identity. A slot is reserved and
//! memoized before the record's members are classified, so a member that
//! leads back to the record resolves to the reserved index instead of
//! recursing. Slots are filled in once the members are known.

use crate::error::{ExtractError, Result};
use rustc_hash::FxHashMap;
use tsz_props_schema::ObjectSpec;
use tsz_typegraph::TypeId;

/// Outcome of `RefTable::reserve`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The node already has an entry (possibly still being filled).
    Existing(usize),
    /// A fresh placeholder; the caller must `patch` it.
    Reserved(usize),
}

#[derive(Debug, Default)]
pub struct RefTable {
    memo: FxHashMap<TypeId, usize>,
    entries: Vec<Option<ObjectSpec>>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `type_id`'s entry, reserving a placeholder if it has none.
    pub fn reserve(&mut self, type_id: TypeId) -> Slot {
        if let Some(&index) = self.memo.get(&type_id) {
            return Slot::Existing(index);
        }
        let index = self.entries.len();
        self.entries.push(None);
        self.memo.insert(type_id, index);
        Slot::Reserved(index)
    }

    /// Fill in a reserved slot.
    pub fn patch(&mut self, index: usize, spec: ObjectSpec) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = Some(spec);
        }
    }

    pub fn index_of(&self, type_id: TypeId) -> Option<usize> {
        self.memo.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Completed entries, in index order.
    pub fn into_refs(self) -> Result<Vec<ObjectSpec>> {
        self.entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.ok_or(ExtractError::UnpatchedRef { index }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_is_memoized_by_identity() {
        let mut table = RefTable::new();
        let a = TypeId(100);
        let b = TypeId(101);
        assert_eq!(table.reserve(a), Slot::Reserved(0));
        assert_eq!(table.reserve(b), Slot::Reserved(1));
        assert_eq!(table.reserve(a), Slot::Existing(0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of(b), Some(1));
    }

    #[test]
    fn test_placeholder_is_visible_before_patch() {
        let mut table = RefTable::new();
        let a = TypeId(100);
        let Slot::Reserved(index) = table.reserve(a) else {
            panic!("fresh node must reserve");
        };
        // A self-reference seen while the members are being built.
        assert_eq!(table.reserve(a), Slot::Existing(index));

        table.patch(
            index,
            ObjectSpec {
                name: Some("Foo".into()),
                members: Vec::new(),
            },
        );
        let refs = table.into_refs().unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_unpatched_slot_is_an_error() {
        let mut table = RefTable::new();
        table.reserve(TypeId(100));
        table.reserve(TypeId(101));
        table.patch(0, ObjectSpec::default());
        assert!(matches!(
            table.into_refs(),
            Err(ExtractError::UnpatchedRef { index: 1 })
        ));
    }
}
