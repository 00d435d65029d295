//! Cross-stage identifiers.
//!
//! `SymbolId` is defined here rather than in the binder because canonical
//! struct types carry their field symbols, and the type crate sits below
//! the binder in the dependency order.

use serde::Serialize;

/// Unique identifier for a symbol in the symbol arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}
