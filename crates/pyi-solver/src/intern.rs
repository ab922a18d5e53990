//! Type interning for structural deduplication.
//!
//! This module converts `TypeData` structures into lightweight `TypeId`
//! handles. Identical structures always intern to the same id, so two
//! queries that resolve to the same stub signature produce equal results.

use crate::types::*;
use pyi_common::{Atom, Interner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

const TYPE_LIST_INLINE: usize = 8;

type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

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

struct TypeTable {
    key_to_id: FxHashMap<TypeData, TypeId>,
    id_to_key: Vec<TypeData>,
}

impl TypeTable {
    fn new() -> Self {
        let mut table = TypeTable {
            key_to_id: FxHashMap::default(),
            id_to_key: Vec::with_capacity(64),
        };
        // Intrinsics occupy the first ids, matching the TypeId constants.
        for kind in IntrinsicKind::ALL {
            let data = TypeData::Intrinsic(kind);
            let id = TypeId(table.id_to_key.len() as u32);
            debug_assert_eq!(id, kind.to_type_id());
            table.id_to_key.push(data.clone());
            table.key_to_id.insert(data, id);
        }
        table
    }
}

// Tables only ever grow; a panic mid-insert leaves them consistent, so a
// poisoned lock is still safe to read.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Type interning table.
///
/// Thread-safe via RwLock for concurrent access; every query operation of the
/// provider takes `&TypeInterner`.
pub struct TypeInterner {
    strings: Arc<Interner>,
    types: RwLock<TypeTable>,
    type_lists: RwLock<SliceInterner<TypeId>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a type interner with its own string pool.
    pub fn new() -> Self {
        Self::with_string_interner(Arc::new(Interner::new()))
    }

    /// Create a type interner sharing a string pool with the declaration
    /// trees, so class names in types and in trees are the same atoms.
    pub fn with_string_interner(strings: Arc<Interner>) -> Self {
        TypeInterner {
            strings,
            types: RwLock::new(TypeTable::new()),
            type_lists: RwLock::new(SliceInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
        }
    }

    pub fn strings(&self) -> &Interner {
        &self.strings
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.strings.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.strings.resolve(atom)
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        read(&self.types).id_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Core interning
    // =========================================================================

    /// Intern a type structure, returning its id.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = read(&self.types).key_to_id.get(&data) {
            return id;
        }
        let mut table = write(&self.types);
        if let Some(&id) = table.key_to_id.get(&data) {
            return id;
        }
        let id = TypeId(table.id_to_key.len() as u32);
        trace!(type_id = id.0, ?data, "TypeInterner::intern");
        table.id_to_key.push(data.clone());
        table.key_to_id.insert(data, id);
        id
    }

    /// Look up the structure behind a type id.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        read(&self.types).id_to_key.get(id.0 as usize).cloned()
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = read(&self.type_lists);
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    pub fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        TypeListId(write(&self.type_lists).intern(members))
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        read(&self.function_shapes).get(id.0)
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        kind.to_type_id()
    }

    /// An instance of a nominal class with generic arguments.
    pub fn instance(&self, class: Atom, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(args);
        self.intern(TypeData::Instance { class, args })
    }

    /// An instance of a class without generic arguments (`int`, `C`).
    pub fn instance_named(&self, class: &str) -> TypeId {
        let class = self.intern_string(class);
        self.instance(class, Vec::new())
    }

    /// The class object `type[C]`.
    pub fn class_object(&self, class: Atom) -> TypeId {
        self.intern(TypeData::ClassObject(class))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        let id = FunctionShapeId(write(&self.function_shapes).intern(shape));
        self.intern(TypeData::Function(id))
    }

    /// Intern a union type.
    ///
    /// Members keep their insertion order: nested unions are flattened in
    /// place, later duplicates are dropped, and `Never` members vanish. An
    /// empty result is `Never` and a single survivor is returned as-is, so a
    /// `TypeData::Union` always has at least two members.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        self.union_from_iter(members)
    }

    /// Fast path for two-member unions.
    pub fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.union_from_iter([left, right])
    }

    fn union_from_iter<I>(&self, members: I) -> TypeId
    where
        I: IntoIterator<Item = TypeId>,
    {
        let mut flat: TypeListBuffer = SmallVec::new();
        for member in members {
            self.push_union_member(&mut flat, member);
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

    fn push_union_member(&self, flat: &mut TypeListBuffer, member: TypeId) {
        if member == TypeId::NEVER {
            return;
        }
        if let Some(TypeData::Union(inner)) = self.lookup(member) {
            for &nested in self.type_list(inner).iter() {
                if !flat.contains(&nested) {
                    flat.push(nested);
                }
            }
        } else if !flat.contains(&member) {
            flat.push(member);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Members of a union type, in order. None for non-union types.
    pub fn union_members(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Union(list) => Some(self.type_list(list)),
            _ => None,
        }
    }

    /// Signature of a function type. None for non-function types.
    pub fn function_of(&self, id: TypeId) -> Option<Arc<FunctionShape>> {
        match self.lookup(id)? {
            TypeData::Function(shape) => self.function_shape(shape),
            _ => None,
        }
    }

    /// The class name of an instance or class-object type.
    pub fn class_name(&self, id: TypeId) -> Option<Atom> {
        match self.lookup(id)? {
            TypeData::Instance { class, .. } | TypeData::ClassObject(class) => Some(class),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
