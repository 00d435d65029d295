//! The struct type table.
//!
//! One table exists per compile pipeline; nothing here is process-global,
//! so independent jobs can run side by side without sharing state.

use indexmap::IndexMap;
use zong_common::SymbolId;

use crate::arena::TypeArena;
use crate::type_def::{StructType, Type, TypeId};

/// Canonical store of declared structs, keyed by name.
///
/// Registration is two-phase: every struct name is registered (with an
/// empty placeholder body) before any type expression is resolved, then
/// each body is defined in place. The canonical `TypeId` never changes, so
/// forward and recursive references stay valid across both phases.
#[derive(Debug, Default)]
pub struct TypeTable {
    entries: IndexMap<String, TypeId>,
}

impl TypeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a struct name, allocating its canonical id with a
    /// placeholder body. Returns `None` when the name is already taken.
    pub fn register(&mut self, arena: &mut TypeArena, name: &str) -> Option<TypeId> {
        if self.entries.contains_key(name) {
            return None;
        }
        let id = arena.alloc(Type::Struct(StructType::reference(name)));
        self.entries.insert(name.to_string(), id);
        Some(id)
    }

    /// Fill in the body of a registered struct: lay out the fields and
    /// write them into the canonical entry in place.
    pub fn define_struct(
        &self,
        arena: &mut TypeArena,
        name: &str,
        fields: Vec<(String, TypeId, Option<SymbolId>)>,
    ) {
        let Some(&id) = self.entries.get(name) else {
            return;
        };
        let (fields, size) = arena.layout_fields(fields);
        *arena.get_mut(id) = Type::Struct(StructType {
            name: name.to_string(),
            fields,
            size,
        });
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.entries.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Replace any empty struct reference inside `id` with its canonical
    /// entry, recursing through pointer and slice children. Types whose
    /// names are absent from the table are left as-is.
    pub fn resolve_type(&self, arena: &mut TypeArena, id: TypeId) -> TypeId {
        match arena.get(id) {
            Type::Struct(s) if s.fields.is_empty() => match self.entries.get(&s.name) {
                Some(&canonical) => canonical,
                None => id,
            },
            Type::Pointer(child) => {
                let child = *child;
                let resolved = self.resolve_type(arena, child);
                if resolved == child {
                    id
                } else {
                    arena.pointer_to(resolved)
                }
            }
            Type::Slice(child) => {
                let child = *child;
                let resolved = self.resolve_type(arena, child);
                if resolved == child {
                    id
                } else {
                    arena.slice_of(resolved)
                }
            }
            _ => id,
        }
    }

    /// Entries in declaration order, for the `types` snapshot fences.
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.entries.iter().map(|(name, &id)| (name.as_str(), id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_type_splices_canonical_structs_through_pointers() {
        let mut arena = TypeArena::new();
        let mut table = TypeTable::new();

        let canonical = table.register(&mut arena, "Point").unwrap();
        table.define_struct(
            &mut arena,
            "Point",
            vec![
                ("x".to_string(), TypeId::I64, None),
                ("y".to_string(), TypeId::I64, None),
            ],
        );

        // A dangling reference created before registration was visible.
        let dangling = arena.alloc(Type::Struct(StructType::reference("Point")));
        let ptr = arena.pointer_to(dangling);

        let resolved = table.resolve_type(&mut arena, ptr);
        let Type::Pointer(child) = arena.get(resolved) else {
            panic!("expected pointer");
        };
        assert_eq!(*child, canonical);
    }

    #[test]
    fn unknown_names_stay_unresolved() {
        let mut arena = TypeArena::new();
        let table = TypeTable::new();
        let dangling = arena.alloc(Type::Struct(StructType::reference("Missing")));
        assert_eq!(table.resolve_type(&mut arena, dangling), dangling);
    }

    #[test]
    fn define_struct_updates_the_canonical_entry_in_place() {
        let mut arena = TypeArena::new();
        let mut table = TypeTable::new();

        let id = table.register(&mut arena, "Pair").unwrap();
        table.define_struct(
            &mut arena,
            "Pair",
            vec![
                ("a".to_string(), TypeId::I64, None),
                ("b".to_string(), TypeId::I64, None),
            ],
        );

        let Type::Struct(s) = arena.get(id) else {
            panic!("expected struct");
        };
        assert_eq!(s.size, 16);
        assert_eq!(s.fields[1].offset, 8);
    }

    #[test]
    fn recursive_struct_through_pointer_lays_out_finitely() {
        let mut arena = TypeArena::new();
        let mut table = TypeTable::new();

        let id = table.register(&mut arena, "Node").unwrap();
        let self_ptr = arena.pointer_to(id);
        table.define_struct(
            &mut arena,
            "Node",
            vec![
                ("value".to_string(), TypeId::I64, None),
                ("next".to_string(), self_ptr, None),
            ],
        );

        let Type::Struct(s) = arena.get(id) else {
            panic!("expected struct");
        };
        assert_eq!(s.size, 16);
        assert_eq!(s.fields[1].offset, 8);
    }

    #[test]
    fn snapshot_preserves_declaration_order() {
        let mut arena = TypeArena::new();
        let mut table = TypeTable::new();
        table.register(&mut arena, "B").unwrap();
        table.register(&mut arena, "A").unwrap();
        let names: Vec<_> = table.snapshot().map(|(name, _)| name).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
