//! Expression type inference.

use zong_binder::SymbolKind;
use zong_parser::{BinaryOp, Node, NodeIndex, UnaryOp};
use zong_types::{StructType, Type, TypeId};

use crate::context::CheckerState;

impl CheckerState<'_> {
    /// Check an expression and return its type. Results are cached per
    /// node, so shared subtrees are inferred once.
    pub(crate) fn check_expr(&mut self, idx: NodeIndex) -> TypeId {
        if let Some(&cached) = self.node_types.get(&idx.0) {
            return cached;
        }
        let ty = self.compute_type(idx);
        self.node_types.insert(idx.0, ty);
        ty
    }

    fn compute_type(&mut self, idx: NodeIndex) -> TypeId {
        let Some(node) = self.arena.get(idx) else {
            return TypeId::ERROR;
        };
        match node {
            Node::IntegerLiteral { .. } => TypeId::INTEGER_LITERAL,
            Node::BooleanLiteral { .. } => TypeId::BOOLEAN,
            Node::StringLiteral { .. } => self.binder.types.slice_of(TypeId::U8),
            Node::Identifier { name } => self.check_identifier_read(idx, name),
            Node::Binary { op, left, right } => self.check_binary(idx, *op, *left, *right),
            Node::Unary { op, operand } => self.check_unary(idx, *op, *operand),
            Node::Call { callee, args } => self.check_call(idx, *callee, &args.nodes),
            Node::Assign { target, value } => self.check_assign(*target, *value),
            Node::FieldAccess { object, field } => self.check_field_access(idx, *object, field),
            Node::Index { object, index } => self.check_index(*object, *index),
            _ => {
                // Statement node in expression position; nothing to infer.
                self.check_node(idx);
                TypeId::ERROR
            }
        }
    }

    fn check_identifier_read(&mut self, idx: NodeIndex, name: &str) -> TypeId {
        let Some(symbol_id) = self.binder.symbol_of(idx) else {
            // Unresolved identifier: the binder already reported it.
            return TypeId::ERROR;
        };
        let Some(symbol) = self.binder.symbols.get(symbol_id) else {
            return TypeId::ERROR;
        };
        let unassigned_read = symbol.kind == SymbolKind::Variable && !symbol.assigned;
        let ty = symbol.ty;
        if unassigned_read {
            self.error_at(idx, format!("use of unassigned variable '{name}'"));
        }
        ty
    }

    fn check_binary(
        &mut self,
        idx: NodeIndex,
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
    ) -> TypeId {
        let left_ty = self.check_expr(left);
        let right_ty = self.check_expr(right);

        if op.is_logical() {
            for (operand, ty) in [(left, left_ty), (right, right_ty)] {
                if !self.is_boolean(ty) {
                    let found = self.display(ty);
                    self.error_at(
                        operand,
                        format!("type mismatch: expected Boolean, found {found}"),
                    );
                }
            }
            return TypeId::BOOLEAN;
        }

        let Some(unified) = self.unify(left_ty, right_ty) else {
            let left_ty = self.display(left_ty);
            let right_ty = self.display(right_ty);
            self.error_at(
                idx,
                format!(
                    "operator '{}' type mismatch: {left_ty} vs {right_ty}",
                    op.text()
                ),
            );
            return TypeId::ERROR;
        };

        if op.is_comparison() {
            if !self.is_comparable(unified) {
                let found = self.display(unified);
                self.error_at(
                    idx,
                    format!("operator '{}' cannot compare {found} values", op.text()),
                );
            }
            return TypeId::BOOLEAN;
        }

        // Arithmetic: the unified operand type is also the result type.
        if !self.is_integer(unified) {
            let found = self.display(unified);
            self.error_at(
                idx,
                format!(
                    "operator '{}' requires integer operands, found {found}",
                    op.text()
                ),
            );
            return TypeId::ERROR;
        }
        unified
    }

    fn check_unary(&mut self, idx: NodeIndex, op: UnaryOp, operand: NodeIndex) -> TypeId {
        match op {
            UnaryOp::Neg => {
                let ty = self.check_expr(operand);
                if !self.is_integer(ty) {
                    let found = self.display(ty);
                    self.error_at(
                        operand,
                        format!("operator '-' requires an integer operand, found {found}"),
                    );
                    return TypeId::ERROR;
                }
                ty
            }
            UnaryOp::Not => {
                let ty = self.check_expr(operand);
                if !self.is_boolean(ty) {
                    let found = self.display(ty);
                    self.error_at(
                        operand,
                        format!("type mismatch: expected Boolean, found {found}"),
                    );
                }
                TypeId::BOOLEAN
            }
            UnaryOp::AddressOf => {
                if !self.is_place(operand) {
                    self.error_at(idx, "cannot take the address of this expression");
                    let ty = self.check_expr(operand);
                    let ty = self.defaulted(ty);
                    return self.binder.types.pointer_to(ty);
                }
                let ty = self.check_place(operand);
                // The address escapes; writes through the pointer are
                // invisible to assignment tracking, so the variable counts
                // as assigned from here on.
                if let Some(Node::Identifier { .. }) = self.arena.get(operand) {
                    if let Some(symbol_id) = self.binder.symbol_of(operand) {
                        if let Some(symbol) = self.binder.symbols.get_mut(symbol_id) {
                            symbol.assigned = true;
                        }
                    }
                }
                let ty = self.defaulted(ty);
                self.binder.types.pointer_to(ty)
            }
            UnaryOp::Deref => {
                let ty = self.check_expr(operand);
                match self.pointer_child(ty) {
                    Some(child) => child,
                    None => {
                        if !matches!(self.binder.types.get(ty), Type::Error) {
                            let found = self.display(ty);
                            self.error_at(idx, format!("cannot dereference {found}"));
                        }
                        TypeId::ERROR
                    }
                }
            }
        }
    }

    fn check_call(&mut self, idx: NodeIndex, callee: NodeIndex, args: &[NodeIndex]) -> TypeId {
        let arg_types: Vec<_> = args.iter().map(|&arg| self.check_expr(arg)).collect();

        let Some(Node::Identifier { name }) = self.arena.get(callee) else {
            self.error_at(callee, "expression is not callable");
            return TypeId::ERROR;
        };

        let Some(symbol_id) = self.binder.symbol_of(callee) else {
            // Unresolved callee: the binder already reported it.
            return TypeId::ERROR;
        };
        let Some(symbol) = self.binder.symbols.get(symbol_id) else {
            return TypeId::ERROR;
        };
        let Some(signature) = symbol.signature.clone() else {
            self.error_at(callee, format!("'{name}' is not a function"));
            return TypeId::ERROR;
        };

        if signature.params.len() != args.len() {
            self.error_at(
                idx,
                format!(
                    "function '{name}' expects {} argument(s), found {}",
                    signature.params.len(),
                    args.len()
                ),
            );
            return signature.return_type.unwrap_or(TypeId::ERROR);
        }

        for ((&arg, &arg_ty), &param_ty) in args.iter().zip(&arg_types).zip(&signature.params) {
            if self.unify(param_ty, arg_ty).is_none() {
                let expected = self.display(param_ty);
                let found = self.display(arg_ty);
                self.error_at(
                    arg,
                    format!("type mismatch: expected {expected}, found {found}"),
                );
            }
        }

        signature.return_type.unwrap_or(TypeId::ERROR)
    }

    fn check_assign(&mut self, target: NodeIndex, value: NodeIndex) -> TypeId {
        let value_ty = self.check_expr(value);

        if !self.is_place(target) {
            self.error_at(target, "left side of assignment is not assignable");
            return TypeId::ERROR;
        }

        let place_ty = self.check_place(target);
        if self.unify(place_ty, value_ty).is_none() {
            let expected = self.display(place_ty);
            let found = self.display(value_ty);
            self.error_at(
                value,
                format!("type mismatch: expected {expected}, found {found}"),
            );
        }

        // A plain identifier target is a definite write.
        if let Some(Node::Identifier { .. }) = self.arena.get(target) {
            if let Some(symbol_id) = self.binder.symbol_of(target) {
                if let Some(symbol) = self.binder.symbols.get_mut(symbol_id) {
                    symbol.assigned = true;
                }
            }
        }
        place_ty
    }

    /// Type of an expression in write position.
    ///
    /// Identifiers and field-access bases are being written, not read, so
    /// the use-before-assignment check does not apply to them. Dereference
    /// and index targets still read their base (the pointer or slice
    /// value flows through).
    fn check_place(&mut self, idx: NodeIndex) -> TypeId {
        let ty = match self.arena.get(idx) {
            Some(Node::Identifier { .. }) => {
                let symbol_ty = self
                    .binder
                    .symbol_of(idx)
                    .and_then(|sym| self.binder.symbols.get(sym))
                    .map(|s| s.ty);
                match symbol_ty {
                    Some(ty) => ty,
                    None => TypeId::ERROR,
                }
            }
            Some(Node::FieldAccess { object, field }) => {
                let object_ty = self.check_place(*object);
                self.field_type(idx, object_ty, field)
            }
            _ => return self.check_expr(idx),
        };
        self.node_types.insert(idx.0, ty);
        ty
    }

    fn check_field_access(&mut self, idx: NodeIndex, object: NodeIndex, field: &str) -> TypeId {
        let object_ty = self.check_expr(object);
        self.field_type(idx, object_ty, field)
    }

    /// Resolve `field` on `object_ty`, auto-dereferencing one pointer
    /// level so `p.x` works on `Point*`.
    fn field_type(&mut self, idx: NodeIndex, object_ty: TypeId, field: &str) -> TypeId {
        let struct_ty = match self.struct_of(object_ty) {
            Some(s) => Some(s),
            None => self
                .pointer_child(object_ty)
                .and_then(|child| self.struct_of(child)),
        };

        let Some(struct_ty) = struct_ty else {
            if !matches!(self.binder.types.get(object_ty), Type::Error) {
                let found = self.display(object_ty);
                self.error_at(idx, format!("field access requires a struct, found {found}"));
            }
            return TypeId::ERROR;
        };

        match struct_ty.field(field) {
            Some(f) => f.ty,
            None => {
                self.error_at(
                    idx,
                    format!("unknown field '{field}' on struct '{}'", struct_ty.name),
                );
                TypeId::ERROR
            }
        }
    }

    fn check_index(&mut self, object: NodeIndex, index: NodeIndex) -> TypeId {
        let object_ty = self.check_expr(object);
        let index_ty = self.check_expr(index);

        if !self.is_integer(index_ty) {
            let found = self.display(index_ty);
            self.error_at(
                index,
                format!("type mismatch: expected I64, found {found}"),
            );
        }

        let element = match self.binder.types.get(object_ty) {
            Type::Slice(child) => Some(*child),
            Type::Error => Some(TypeId::ERROR),
            _ => None,
        };
        match element {
            Some(element) => element,
            None => {
                let found = self.display(object_ty);
                self.error_at(object, format!("indexing requires a slice, found {found}"));
                TypeId::ERROR
            }
        }
    }

    /// Addressable/assignable places: identifiers, dereferences, field
    /// accesses, and index expressions.
    pub(crate) fn is_place(&self, idx: NodeIndex) -> bool {
        matches!(
            self.arena.get(idx),
            Some(
                Node::Identifier { .. }
                    | Node::FieldAccess { .. }
                    | Node::Index { .. }
                    | Node::Unary {
                        op: UnaryOp::Deref,
                        ..
                    }
            )
        )
    }

    fn struct_of(&self, ty: TypeId) -> Option<StructType> {
        match self.binder.types.get(ty) {
            Type::Struct(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn pointer_child(&self, ty: TypeId) -> Option<TypeId> {
        match self.binder.types.get(ty) {
            Type::Pointer(child) => Some(*child),
            _ => None,
        }
    }
}
