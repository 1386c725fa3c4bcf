//! Type interning and graph storage.
//!
//! This module implements the store that converts `TypeData` structures
//! into lightweight `TypeId` handles.
//!
//! - Structural types (literals, arrays, tuples, unions, applications,
//!   `Partial<T>`, function signatures) are hash-consed: building the same
//!   structure twice yields the same `TypeId`.
//! - Records and type parameters are nominal: each allocation is a distinct
//!   node. Records are declared first and defined afterwards so that
//!   self-referential graphs can be built. Instantiated copies of a record
//!   are memoized per bindings (see `record_instantiation`).
//!
//! All state sits behind `RwLock`s so graph queries can intern derived types
//! (instantiations, nullable unions) through `&self`.

use crate::types::*;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tsz_common::SourceLocation;
use tsz_common::interner::{Atom, Interner};

const TYPE_LIST_INLINE: usize = 8;

type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

// A panicking writer leaves plain data behind; keep serving it.
#[inline]
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }

        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// In-memory type graph.
pub struct TypeInterner {
    strings: RwLock<Interner>,
    /// User types, indexed by `TypeId.0 - FIRST_USER`.
    types: RwLock<Vec<TypeData>>,
    /// Hash-cons table for structural types only.
    type_map: RwLock<FxHashMap<TypeData, TypeId>>,
    type_lists: RwLock<SliceInterner<TypeId>>,
    object_shapes: RwLock<Vec<Arc<ObjectShape>>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
    applications: RwLock<ValueInterner<TypeApplication>>,
    symbols: RwLock<Vec<SymbolData>>,
    alias_symbols: RwLock<FxHashMap<TypeId, SymbolId>>,
    /// Instantiated record copies, keyed by the original record and the
    /// `(parameter, argument)` bindings it mentions.
    record_instantiations: RwLock<FxHashMap<(TypeId, Vec<(TypeId, TypeId)>), TypeId>>,
    declarations: RwLock<Vec<Declaration>>,
    files: RwLock<Vec<SourceFile>>,
    next_param_ordinal: AtomicU32,
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner").finish_non_exhaustive()
    }
}

impl TypeInterner {
    /// Create an empty graph with the intrinsics pre-registered.
    pub fn new() -> Self {
        TypeInterner {
            strings: RwLock::new({
                let mut interner = Interner::new();
                interner.intern_common();
                interner
            }),
            types: RwLock::new(Vec::new()),
            type_map: RwLock::new(FxHashMap::default()),
            type_lists: RwLock::new(SliceInterner::new()),
            object_shapes: RwLock::new(Vec::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
            applications: RwLock::new(ValueInterner::new()),
            symbols: RwLock::new(Vec::new()),
            alias_symbols: RwLock::new(FxHashMap::default()),
            record_instantiations: RwLock::new(FxHashMap::default()),
            declarations: RwLock::new(Vec::new()),
            files: RwLock::new(Vec::new()),
            next_param_ordinal: AtomicU32::new(0),
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        write(&self.strings).intern(s)
    }

    /// Resolve an Atom back to its string value.
    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        read(&self.strings).resolve_arc(atom)
    }

    // =========================================================================
    // Raw storage access
    // =========================================================================

    /// Look up the structure behind a `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return IntrinsicKind::ALL
                .get(id.0 as usize)
                .map(|&kind| TypeData::Intrinsic(kind));
        }
        read(&self.types)
            .get((id.0 - TypeId::FIRST_USER) as usize)
            .cloned()
    }

    /// Number of user types allocated so far.
    pub fn len(&self) -> usize {
        read(&self.types).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = read(&self.type_lists);
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        read(&self.object_shapes)
            .get(id.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape> {
        read(&self.function_shapes)
            .get(id.0)
            .unwrap_or_else(|| {
                Arc::new(FunctionShape {
                    type_params: Vec::new(),
                    params: Vec::new(),
                    return_type: TypeId::ANY,
                })
            })
    }

    pub fn type_application(&self, id: TypeApplicationId) -> Arc<TypeApplication> {
        read(&self.applications).get(id.0).unwrap_or_else(|| {
            Arc::new(TypeApplication {
                base: TypeId::ANY,
                args: Vec::new(),
            })
        })
    }

    /// Shape of a record type, if `id` is one.
    pub fn object_shape_of(&self, id: TypeId) -> Option<Arc<ObjectShape>> {
        match self.lookup(id)? {
            TypeData::Object(shape_id) => Some(self.object_shape(shape_id)),
            _ => None,
        }
    }

    pub fn symbol_data(&self, id: SymbolId) -> Option<SymbolData> {
        read(&self.symbols).get(id.0 as usize).cloned()
    }

    /// Alias symbol attached to a type (e.g. `ReactNode` on its union).
    pub fn alias_symbol(&self, id: TypeId) -> Option<SymbolId> {
        read(&self.alias_symbols).get(&id).copied()
    }

    pub fn declaration(&self, id: DeclId) -> Option<Declaration> {
        read(&self.declarations).get(id.0 as usize).cloned()
    }

    pub fn declaration_count(&self) -> usize {
        read(&self.declarations).len()
    }

    pub fn file(&self, id: FileId) -> Option<SourceFile> {
        read(&self.files).get(id.0 as usize).cloned()
    }

    pub fn files(&self) -> Vec<FileId> {
        (0..read(&self.files).len() as u32).map(FileId).collect()
    }

    // =========================================================================
    // Interning
    // =========================================================================

    /// Intern a structural type and return its TypeId.
    /// If the structure already exists, returns the existing TypeId.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = data {
            return kind.type_id();
        }

        if let Some(&id) = read(&self.type_map).get(&data) {
            return id;
        }

        let mut map = write(&self.type_map);
        if let Some(&id) = map.get(&data) {
            return id;
        }
        let id = self.alloc(data.clone());
        map.insert(data, id);
        id
    }

    /// Allocate a nominal node that never participates in hash-consing.
    fn alloc(&self, data: TypeData) -> TypeId {
        let mut types = write(&self.types);
        let id = TypeId(TypeId::FIRST_USER + types.len() as u32);
        types.push(data);
        id
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        TypeListId(write(&self.type_lists).intern(members))
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Boolean(value)))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        let list = self.intern_type_list(elements);
        self.intern(TypeData::Tuple(list))
    }

    /// Build a union, keeping member order.
    ///
    /// Nested unions are flattened in place and repeated members keep their
    /// first position. An empty union is `never`; a single member is
    /// returned unchanged.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat = TypeListBuffer::new();
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(list)) => {
                    for &inner in self.type_list(list).iter() {
                        if !flat.contains(&inner) {
                            flat.push(inner);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list = self.intern_type_list(flat.into_vec());
                self.intern(TypeData::Union(list))
            }
        }
    }

    pub fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.union(vec![left, right])
    }

    /// `Partial<target>`.
    pub fn partial(&self, target: TypeId) -> TypeId {
        self.intern(TypeData::Partial(target))
    }

    pub fn application(&self, base: TypeId, args: Vec<TypeId>) -> TypeId {
        let app_id = write(&self.applications).intern(TypeApplication { base, args });
        self.intern(TypeData::Application(TypeApplicationId(app_id)))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        let shape_id = write(&self.function_shapes).intern(shape);
        self.intern(TypeData::Function(FunctionShapeId(shape_id)))
    }

    /// Shorthand for a non-generic function type.
    pub fn function_of(&self, params: Vec<ParamInfo>, return_type: TypeId) -> TypeId {
        self.function(FunctionShape {
            type_params: Vec::new(),
            params,
            return_type,
        })
    }

    /// Allocate a fresh type parameter.
    pub fn type_param(&self, name: &str, constraint: Option<TypeId>) -> TypeId {
        let name = self.intern_string(name);
        let ordinal = self.next_param_ordinal.fetch_add(1, Ordering::Relaxed);
        self.alloc(TypeData::TypeParameter(TypeParamInfo {
            name,
            constraint,
            ordinal,
        }))
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Declare a record type without members.
    ///
    /// The returned id is usable immediately (including from inside its own
    /// members); fill it in with `set_properties` and friends.
    pub fn declare_object(&self, name: Option<&str>, symbol: Option<SymbolId>) -> TypeId {
        let name = name.map(|n| self.intern_string(n));
        self.alloc_object(ObjectShape {
            name,
            symbol,
            ..ObjectShape::default()
        })
    }

    fn alloc_object(&self, shape: ObjectShape) -> TypeId {
        let shape_id = {
            let mut shapes = write(&self.object_shapes);
            shapes.push(Arc::new(shape));
            ObjectShapeId(shapes.len() as u32 - 1)
        };
        self.alloc(TypeData::Object(shape_id))
    }

    /// Copy of `record` for the given parameter bindings, allocated once per
    /// distinct binding list.
    ///
    /// The flag is `true` when the copy was allocated by this call; a fresh
    /// copy carries the record's name and symbols but no members yet.
    pub(crate) fn record_instantiation(
        &self,
        record: TypeId,
        bindings: Vec<(TypeId, TypeId)>,
    ) -> Option<(TypeId, bool)> {
        let shape = self.object_shape_of(record)?;
        let mut memo = write(&self.record_instantiations);
        match memo.entry((record, bindings)) {
            Entry::Occupied(entry) => Some((*entry.get(), false)),
            Entry::Vacant(entry) => {
                let copy = self.alloc_object(ObjectShape {
                    name: shape.name,
                    symbol: shape.symbol,
                    type_params: shape.type_params.clone(),
                    ..ObjectShape::default()
                });
                if let Some(alias) = self.alias_symbol(record) {
                    self.set_alias_symbol(copy, alias);
                }
                entry.insert(copy);
                Some((copy, true))
            }
        }
    }

    /// Anonymous object literal type.
    pub fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        let id = self.declare_object(None, None);
        self.set_properties(id, properties);
        id
    }

    /// Named record type with the given members.
    pub fn named_object(
        &self,
        name: &str,
        symbol: Option<SymbolId>,
        properties: Vec<PropertyInfo>,
    ) -> TypeId {
        let id = self.declare_object(Some(name), symbol);
        self.set_properties(id, properties);
        id
    }

    /// Apply `edit` to the shape of record `id`.
    ///
    /// Returns `false` when `id` is not a record.
    fn update_object(&self, id: TypeId, edit: impl FnOnce(&mut ObjectShape)) -> bool {
        let Some(TypeData::Object(shape_id)) = self.lookup(id) else {
            return false;
        };
        let mut shapes = write(&self.object_shapes);
        let Some(slot) = shapes.get_mut(shape_id.0 as usize) else {
            return false;
        };
        edit(Arc::make_mut(slot));
        true
    }

    pub fn set_properties(&self, id: TypeId, properties: Vec<PropertyInfo>) -> bool {
        self.update_object(id, |shape| shape.properties = properties)
    }

    pub fn set_bases(&self, id: TypeId, bases: Vec<TypeId>) -> bool {
        self.update_object(id, |shape| shape.bases = bases)
    }

    pub fn set_type_params(&self, id: TypeId, type_params: Vec<TypeId>) -> bool {
        self.update_object(id, |shape| shape.type_params = type_params)
    }

    // =========================================================================
    // Symbols, declarations, files
    // =========================================================================

    pub fn symbol(&self, name: &str, qualified_name: &str) -> SymbolId {
        self.symbol_at(name, qualified_name, None)
    }

    pub fn symbol_at(
        &self,
        name: &str,
        qualified_name: &str,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        let name = self.intern_string(name);
        let qualified_name = self.intern_string(qualified_name);
        let mut symbols = write(&self.symbols);
        symbols.push(SymbolData {
            name,
            qualified_name,
            location,
        });
        SymbolId(symbols.len() as u32 - 1)
    }

    pub fn set_alias_symbol(&self, id: TypeId, symbol: SymbolId) {
        write(&self.alias_symbols).insert(id, symbol);
    }

    pub fn declare(
        &self,
        name: &str,
        kind: DeclKind,
        type_id: Option<TypeId>,
        location: Option<SourceLocation>,
    ) -> DeclId {
        let name = self.intern_string(name);
        let mut decls = write(&self.declarations);
        decls.push(Declaration {
            name,
            kind,
            type_id,
            location,
        });
        DeclId(decls.len() as u32 - 1)
    }

    pub fn add_file(&self, name: &str, exports: Vec<DeclId>) -> FileId {
        let name = self.intern_string(name);
        let mut files = write(&self.files);
        files.push(SourceFile { name, exports });
        FileId(files.len() as u32 - 1)
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
