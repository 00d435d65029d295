//! `CheckerState` and type unification.

use rustc_hash::FxHashMap;
use tracing::debug;
use zong_binder::BinderState;
use zong_common::{DiagnosticBag, SymbolId};
use zong_parser::{NodeArena, NodeIndex};
use zong_types::{Type, TypeId};

/// Bottom-up type checker for one compile job.
///
/// Borrows the AST and the binder output; the binder stays mutable because
/// checking allocates derived types (pointers to addressed places) and
/// flips the `assigned` flag on assignment targets.
pub struct CheckerState<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) binder: &'a mut BinderState,
    /// The type of every checked expression, keyed by node index.
    pub(crate) node_types: FxHashMap<u32, TypeId>,
    pub(crate) diagnostics: DiagnosticBag,
    /// Stack of enclosing function symbols, for return checking.
    pub(crate) function_stack: Vec<SymbolId>,
}

impl<'a> CheckerState<'a> {
    #[must_use]
    pub fn new(arena: &'a NodeArena, binder: &'a mut BinderState) -> Self {
        Self {
            arena,
            binder,
            node_types: FxHashMap::default(),
            diagnostics: DiagnosticBag::new(),
            function_stack: Vec::new(),
        }
    }

    /// Check a program, block, or bare expression root.
    pub fn check(&mut self, root: NodeIndex) {
        self.check_node(root);
        debug!(
            nodes = self.node_types.len(),
            errors = self.diagnostics.len(),
            "checking finished"
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

    /// The checked type of a node.
    #[must_use]
    pub fn type_of(&self, idx: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&idx.0).copied()
    }

    pub(crate) fn error_at(&mut self, idx: NodeIndex, message: impl Into<String>) {
        self.diagnostics
            .error(self.arena.get_span(idx).start, message);
    }

    /// Unify two types, or `None` when they are incompatible.
    ///
    /// The poison type unifies with anything and yields the other side, so
    /// resolution failures do not cascade. An untyped integer literal
    /// unifies with any numeric builtin or pointer.
    #[must_use]
    pub(crate) fn unify(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let types = &self.binder.types;
        if types.types_equal(a, b) {
            return Some(a);
        }
        match (types.get(a), types.get(b)) {
            (Type::Error, _) => Some(b),
            (_, Type::Error) => Some(a),
            (Type::IntegerLiteral, other) if literal_compatible(other) => Some(b),
            (other, Type::IntegerLiteral) if literal_compatible(other) => Some(a),
            _ => None,
        }
    }

    /// Concrete type of an expression used without a target: untyped
    /// literals default to `I64`.
    #[must_use]
    pub(crate) fn defaulted(&self, ty: TypeId) -> TypeId {
        if matches!(self.binder.types.get(ty), Type::IntegerLiteral) {
            TypeId::I64
        } else {
            ty
        }
    }

    #[must_use]
    pub(crate) fn is_integer(&self, ty: TypeId) -> bool {
        matches!(
            self.binder.types.get(ty),
            Type::Builtin(zong_types::Builtin::I64)
                | Type::Builtin(zong_types::Builtin::U8)
                | Type::IntegerLiteral
                | Type::Error
        )
    }

    #[must_use]
    pub(crate) fn is_boolean(&self, ty: TypeId) -> bool {
        matches!(
            self.binder.types.get(ty),
            Type::Builtin(zong_types::Builtin::Boolean) | Type::Error
        )
    }

    /// Operand kinds comparisons accept: integers, pointers, booleans.
    #[must_use]
    pub(crate) fn is_comparable(&self, ty: TypeId) -> bool {
        self.is_integer(ty)
            || self.is_boolean(ty)
            || matches!(self.binder.types.get(ty), Type::Pointer(_))
    }

    #[must_use]
    pub(crate) fn display(&self, ty: TypeId) -> String {
        self.binder.types.display(ty)
    }
}

/// Can an untyped integer literal take on this type?
fn literal_compatible(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Builtin(zong_types::Builtin::I64)
            | Type::Builtin(zong_types::Builtin::U8)
            | Type::Pointer(_)
            | Type::IntegerLiteral
    )
}
