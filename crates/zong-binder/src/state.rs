//! `BinderState` - binder core: scope stack, lookups, and the entry point.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;
use zong_common::{DiagnosticBag, SymbolId};
use zong_parser::{Node, NodeArena, NodeIndex};
use zong_types::{TypeArena, TypeId, TypeTable};

use crate::symbols::{FunctionSignature, Scope, ScopeId, Symbol, SymbolArena, SymbolKind};

/// Binder state for one compile job.
///
/// Owns the symbol arena, the persistent scope tree, the type arena, and
/// the struct type table. The AST is only borrowed; resolved symbols are
/// attached through `node_symbols`, keyed by node index.
pub struct BinderState {
    /// Arena for symbol storage.
    pub symbols: SymbolArena,
    /// Persistent scopes - scope information outlives the walk, so tests
    /// and later stages can query lookups without replaying it.
    pub scopes: Vec<Scope>,
    /// Map from AST node (that creates a scope) to its `ScopeId`.
    pub node_scope_ids: FxHashMap<u32, ScopeId>,
    /// Node-to-symbol mapping.
    pub node_symbols: FxHashMap<u32, SymbolId>,
    /// Arena for type storage.
    pub types: TypeArena,
    /// Declared structs, by name.
    pub table: TypeTable,
    /// Stack of scopes surrounding the current walk position.
    pub(crate) scope_stack: SmallVec<[ScopeId; 8]>,
    pub(crate) diagnostics: DiagnosticBag,
}

impl BinderState {
    #[must_use]
    pub fn new() -> Self {
        let mut binder = Self {
            symbols: SymbolArena::new(),
            scopes: Vec::new(),
            node_scope_ids: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            types: TypeArena::new(),
            table: TypeTable::new(),
            scope_stack: SmallVec::new(),
            diagnostics: DiagnosticBag::new(),
        };
        binder.push_scope();
        binder.declare_builtins();
        binder
    }

    /// Bind a parse tree: a program, a block, or a bare expression.
    ///
    /// Call once per binder. Binding walks the tree in order, attaching a
    /// symbol to every identifier it can resolve, then resolves all
    /// recorded types so forward struct references are spliced in.
    pub fn bind(&mut self, arena: &NodeArena, root: NodeIndex) {
        match arena.get(root) {
            Some(Node::Program { statements }) => {
                self.node_scope_ids.insert(root.0, self.current_scope_id());
                self.bind_statement_list(arena, &statements.nodes);
            }
            Some(_) => self.bind_node(arena, root),
            None => {}
        }
        self.finalize_types();
        debug!(
            symbols = self.symbols.len(),
            structs = self.table.len(),
            errors = self.diagnostics.len(),
            "binding finished"
        );
    }

    #[must_use]
    pub fn get_diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Symbol attached to a node, if resolution succeeded.
    #[must_use]
    pub fn symbol_of(&self, idx: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&idx.0).copied()
    }

    // Scope plumbing

    #[must_use]
    pub fn current_scope_id(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(ScopeId::NONE)
    }

    pub(crate) fn push_scope(&mut self) -> ScopeId {
        let parent = self.current_scope_id();
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::with_parent(parent));
        self.scope_stack.push(id);
        id
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// Walk the parent chain looking for a variable.
    #[must_use]
    pub fn lookup_variable_from(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = scope;
        while !current.is_none() {
            let scope = self.scope(current);
            if let Some(&sym) = scope.variables.get(name) {
                return Some(sym);
            }
            current = scope.parent;
        }
        None
    }

    /// Walk the parent chain looking for a function.
    #[must_use]
    pub fn lookup_function_from(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = scope;
        while !current.is_none() {
            let scope = self.scope(current);
            if let Some(&sym) = scope.functions.get(name) {
                return Some(sym);
            }
            current = scope.parent;
        }
        None
    }

    /// Walk the parent chain looking for a struct.
    #[must_use]
    pub fn lookup_struct_from(&self, scope: ScopeId, name: &str) -> Option<TypeId> {
        let mut current = scope;
        while !current.is_none() {
            let scope = self.scope(current);
            if let Some(&ty) = scope.structs.get(name) {
                return Some(ty);
            }
            current = scope.parent;
        }
        None
    }

    /// Identifier resolution order: variables, then functions, then
    /// structs. Struct names introduce a type rather than a value, so a
    /// hit there attaches no symbol but is not an error either.
    pub(crate) fn resolve_identifier(&self, name: &str) -> IdentResolution {
        let scope = self.current_scope_id();
        if let Some(sym) = self.lookup_variable_from(scope, name) {
            return IdentResolution::Symbol(sym);
        }
        if let Some(sym) = self.lookup_function_from(scope, name) {
            return IdentResolution::Symbol(sym);
        }
        if self.lookup_struct_from(scope, name).is_some() {
            return IdentResolution::StructName;
        }
        IdentResolution::Unresolved
    }

    fn declare_builtins(&mut self) {
        let print = self.symbols.alloc(Symbol {
            name: "print".to_string(),
            kind: SymbolKind::Function,
            ty: TypeId::I64,
            assigned: true,
            decl: NodeIndex::NONE,
            signature: Some(FunctionSignature {
                params: vec![TypeId::I64],
                return_type: Some(TypeId::I64),
            }),
        });
        let global = self.current_scope_id();
        self.scope_mut(global)
            .functions
            .insert("print".to_string(), print);
    }
}

impl Default for BinderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of identifier resolution.
pub(crate) enum IdentResolution {
    Symbol(SymbolId),
    StructName,
    Unresolved,
}
