//! Core type definitions.
//!
//! Types live in a `TypeArena` and reference each other by `TypeId`, so
//! recursive struct shapes (a struct holding a pointer to itself) need no
//! special casing: the id is the indirection.

use zong_common::SymbolId;

/// Unique identifier for a type in the type arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: TypeId = TypeId(u32::MAX);

    // Canonical ids, preallocated by `TypeArena::new` in this order.
    pub const I64: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const U8: TypeId = TypeId(2);
    /// Type of an untyped numeric literal before unification.
    pub const INTEGER_LITERAL: TypeId = TypeId(3);
    /// Poison type: satisfies every constraint. Assigned to unresolved
    /// identifiers so one resolution error does not cascade.
    pub const ERROR: TypeId = TypeId(4);

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

/// The named primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    I64,
    Boolean,
    U8,
}

impl Builtin {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::I64 => "I64",
            Builtin::Boolean => "Boolean",
            Builtin::U8 => "U8",
        }
    }

    /// Stack representation width in bytes.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Builtin::I64 | Builtin::Boolean => 8,
            Builtin::U8 => 1,
        }
    }

    /// Builtin lookup by source name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Builtin> {
        Some(match name {
            "I64" => Builtin::I64,
            "Boolean" => Builtin::Boolean,
            "U8" => Builtin::U8,
            _ => return None,
        })
    }
}

/// One field of a struct type, with its computed layout offset and the
/// synthetic struct-field symbol attached by the binder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
    pub offset: u32,
    pub symbol: Option<SymbolId>,
}

/// A struct type. Identity is nominal: two structs are the same type
/// exactly when their names match.
///
/// A struct with an empty field list is a forward reference; the table's
/// `resolve_type` pass replaces it with the canonical entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<StructField>,
    /// Running layout offset after all fields.
    pub size: u32,
}

impl StructType {
    /// A forward reference to a struct that has not been resolved yet.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            size: 0,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A type is a tagged variant; compound types hold child ids into the
/// owning arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Builtin(Builtin),
    Pointer(TypeId),
    Slice(TypeId),
    Struct(StructType),
    IntegerLiteral,
    Error,
}
