//! Symbol storage and the persistent scope tree.

use rustc_hash::FxHashMap;
use zong_common::SymbolId;
use zong_parser::NodeIndex;
use zong_types::TypeId;

/// What a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    StructField,
}

impl SymbolKind {
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Function => "function",
            SymbolKind::StructField => "field",
        }
    }
}

/// Call signature carried by function symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    pub params: Vec<TypeId>,
    /// `None` for functions that return nothing.
    pub return_type: Option<TypeId>,
}

/// A named declaration.
///
/// `assigned` starts true for parameters and struct fields and flips to
/// true for variables on their first definite write; the checker reads it
/// to reject uses of unassigned variables.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
    pub assigned: bool,
    /// Declaring node, or `NodeIndex::NONE` for builtins and synthetic
    /// struct-field symbols.
    pub decl: NodeIndex,
    /// Present only on `Function` symbols.
    pub signature: Option<FunctionSignature>,
}

/// Arena with exclusive ownership of all symbols. Everything else holds
/// `SymbolId`s.
#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Identifier of a scope in the persistent scope tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);
    /// The global scope is always the first one created.
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

/// One lexical scope: three namespaces, unique names per namespace.
///
/// The struct namespace carries type ids rather than symbols; struct
/// declarations introduce a type, not a value.
#[derive(Debug, Default)]
pub struct Scope {
    pub parent: ScopeId,
    pub variables: FxHashMap<String, SymbolId>,
    pub functions: FxHashMap<String, SymbolId>,
    pub structs: FxHashMap<String, TypeId>,
}

impl Scope {
    #[must_use]
    pub fn with_parent(parent: ScopeId) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }
}
