//! Arena storage for types.

use zong_common::SymbolId;

use crate::type_def::{Builtin, StructField, StructType, Type, TypeId};

/// Arena of types addressed by `TypeId`.
///
/// The primitives, the integer-literal type, and the poison type are
/// allocated once at construction and shared through their canonical ids;
/// `types_equal` compares everything else structurally, except structs,
/// which are nominal.
#[derive(Debug)]
pub struct TypeArena {
    types: Vec<Type>,
}

impl TypeArena {
    #[must_use]
    pub fn new() -> Self {
        // Order must match the canonical ids on `TypeId`.
        let types = vec![
            Type::Builtin(Builtin::I64),
            Type::Builtin(Builtin::Boolean),
            Type::Builtin(Builtin::U8),
            Type::IntegerLiteral,
            Type::Error,
        ];
        Self { types }
    }

    pub fn alloc(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.0 as usize]
    }

    pub fn pointer_to(&mut self, child: TypeId) -> TypeId {
        self.alloc(Type::Pointer(child))
    }

    pub fn slice_of(&mut self, child: TypeId) -> TypeId {
        self.alloc(Type::Slice(child))
    }

    /// Stack representation width of a type in bytes.
    #[must_use]
    pub fn size_of(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Builtin(builtin) => builtin.size(),
            Type::Pointer(_) => 8,
            Type::Slice(_) => 16,
            Type::Struct(s) => s.size,
            Type::IntegerLiteral | Type::Error => 8,
        }
    }

    /// Natural alignment of a type in bytes.
    #[must_use]
    pub fn align_of(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Builtin(builtin) => builtin.size(),
            Type::Pointer(_) | Type::Slice(_) => 8,
            Type::Struct(s) => s
                .fields
                .iter()
                .map(|f| self.align_of(f.ty))
                .max()
                .unwrap_or(1),
            Type::IntegerLiteral | Type::Error => 8,
        }
    }

    /// Lay out fields in declaration order, each at the running offset
    /// aligned to its own width. Returns the laid-out fields and the
    /// running offset after all of them.
    pub fn layout_fields(
        &self,
        fields: Vec<(String, TypeId, Option<SymbolId>)>,
    ) -> (Vec<StructField>, u32) {
        let mut laid_out = Vec::with_capacity(fields.len());
        let mut offset = 0u32;
        for (field_name, ty, symbol) in fields {
            let align = self.align_of(ty).max(1);
            offset = offset.next_multiple_of(align);
            laid_out.push(StructField {
                name: field_name,
                ty,
                offset,
                symbol,
            });
            offset += self.size_of(ty);
        }
        (laid_out, offset)
    }

    /// Allocate a fully laid-out struct type.
    pub fn layout_struct(
        &mut self,
        name: impl Into<String>,
        fields: Vec<(String, TypeId, Option<SymbolId>)>,
    ) -> TypeId {
        let (fields, size) = self.layout_fields(fields);
        self.alloc(Type::Struct(StructType {
            name: name.into(),
            fields,
            size,
        }))
    }

    /// Structural equality for builtins/pointers/slices, nominal equality
    /// for structs.
    #[must_use]
    pub fn types_equal(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Type::Builtin(x), Type::Builtin(y)) => x == y,
            (Type::Pointer(x), Type::Pointer(y)) | (Type::Slice(x), Type::Slice(y)) => {
                self.types_equal(*x, *y)
            }
            (Type::Struct(x), Type::Struct(y)) => x.name == y.name,
            (Type::IntegerLiteral, Type::IntegerLiteral) => true,
            (Type::Error, Type::Error) => true,
            _ => false,
        }
    }

    /// Source-style rendering: `I64`, `Point*`, `U8[]`.
    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            Type::Builtin(builtin) => builtin.name().to_string(),
            Type::Pointer(child) => format!("{}*", self.display(*child)),
            Type::Slice(child) => format!("{}[]", self.display(*child)),
            Type::Struct(s) => s.name.clone(),
            Type::IntegerLiteral => "integer literal".to_string(),
            Type::Error => "<error>".to_string(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids_point_at_the_right_primitives() {
        let arena = TypeArena::new();
        assert_eq!(arena.get(TypeId::I64), &Type::Builtin(Builtin::I64));
        assert_eq!(arena.get(TypeId::BOOLEAN), &Type::Builtin(Builtin::Boolean));
        assert_eq!(arena.get(TypeId::U8), &Type::Builtin(Builtin::U8));
        assert_eq!(arena.get(TypeId::INTEGER_LITERAL), &Type::IntegerLiteral);
        assert_eq!(arena.get(TypeId::ERROR), &Type::Error);
    }

    #[test]
    fn slice_and_pointer_sizes_are_fixed() {
        let mut arena = TypeArena::new();
        let ptr = arena.pointer_to(TypeId::U8);
        let slice = arena.slice_of(TypeId::U8);
        assert_eq!(arena.size_of(ptr), 8);
        assert_eq!(arena.size_of(slice), 16);
    }

    #[test]
    fn struct_layout_aligns_each_field_to_its_width() {
        let mut arena = TypeArena::new();
        // (flag: U8, value: I64, tail: U8) => offsets 0, 8, 16; size 17
        let id = arena.layout_struct(
            "Mixed",
            vec![
                ("flag".to_string(), TypeId::U8, None),
                ("value".to_string(), TypeId::I64, None),
                ("tail".to_string(), TypeId::U8, None),
            ],
        );
        let Type::Struct(s) = arena.get(id) else {
            panic!("expected struct");
        };
        let offsets: Vec<_> = s.fields.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, [0, 8, 16]);
        assert_eq!(s.size, 17);
    }

    #[test]
    fn pointer_equality_is_structural_and_struct_equality_is_nominal() {
        let mut arena = TypeArena::new();
        let p1 = arena.pointer_to(TypeId::I64);
        let p2 = arena.pointer_to(TypeId::I64);
        assert!(arena.types_equal(p1, p2));

        let a1 = arena.alloc(Type::Struct(StructType::reference("A")));
        let a2 = arena.alloc(Type::Struct(StructType::reference("A")));
        let b = arena.alloc(Type::Struct(StructType::reference("B")));
        assert!(arena.types_equal(a1, a2));
        assert!(!arena.types_equal(a1, b));
    }
}
