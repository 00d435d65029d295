//! Statement checking.

use zong_parser::{Node, NodeIndex};
use zong_types::TypeId;

use crate::context::CheckerState;

impl CheckerState<'_> {
    pub(crate) fn check_node(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match node {
            Node::Program { statements } | Node::Block { statements } => {
                for &stmt in &statements.nodes {
                    self.check_node(stmt);
                }
            }
            Node::VarDecl { init, .. } => {
                let init = *init;
                if init.is_none() {
                    return;
                }
                let declared = self
                    .binder
                    .symbol_of(idx)
                    .and_then(|sym| self.binder.symbols.get(sym))
                    .map(|s| s.ty)
                    .unwrap_or(TypeId::ERROR);
                let value = self.check_expr(init);
                if self.unify(declared, value).is_none() {
                    let expected = self.display(declared);
                    let found = self.display(value);
                    self.error_at(
                        init,
                        format!("type mismatch: expected {expected}, found {found}"),
                    );
                }
            }
            Node::Func { body, .. } => {
                let body = *body;
                let symbol = self.binder.symbol_of(idx);
                if let Some(symbol) = symbol {
                    self.function_stack.push(symbol);
                }
                self.check_node(body);
                if symbol.is_some() {
                    self.function_stack.pop();
                }
            }
            Node::StructDecl { .. } => {}
            Node::If {
                condition,
                then_block,
                else_block,
            } => {
                let (condition, then_block, else_block) = (*condition, *then_block, *else_block);
                let cond_ty = self.check_expr(condition);
                if !self.is_boolean(cond_ty) {
                    let found = self.display(cond_ty);
                    self.error_at(
                        condition,
                        format!("type mismatch: expected Boolean, found {found}"),
                    );
                }
                self.check_node(then_block);
                if else_block.is_some() {
                    self.check_node(else_block);
                }
            }
            Node::Loop { body } => {
                let body = *body;
                self.check_node(body);
            }
            Node::Break | Node::Continue => {}
            Node::Return { value } => {
                let value = *value;
                self.check_return(idx, value);
            }
            // Everything else is an expression in statement position.
            _ => {
                self.check_expr(idx);
            }
        }
    }

    fn check_return(&mut self, idx: NodeIndex, value: NodeIndex) {
        let expected = self
            .function_stack
            .last()
            .and_then(|&sym| self.binder.symbols.get(sym))
            .and_then(|s| s.signature.as_ref())
            .and_then(|sig| sig.return_type);

        match (expected, value.is_some()) {
            (Some(expected), true) => {
                let found = self.check_expr(value);
                if self.unify(expected, found).is_none() {
                    let expected = self.display(expected);
                    let found = self.display(found);
                    self.error_at(
                        value,
                        format!("type mismatch: expected {expected}, found {found}"),
                    );
                }
            }
            (Some(expected), false) => {
                let expected = self.display(expected);
                self.error_at(idx, format!("missing return value of type {expected}"));
            }
            (None, true) => {
                self.check_expr(value);
                self.error_at(value, "unexpected return value".to_string());
            }
            (None, false) => {}
        }
    }
}
