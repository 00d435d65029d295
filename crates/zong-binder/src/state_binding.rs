//! Declaration pre-pass and the in-order binding walk.

use tracing::debug;
use zong_parser::{FieldDecl, Node, NodeArena, NodeIndex, Param, TypeExpr};
use zong_types::TypeId;

use crate::state::{BinderState, IdentResolution};
use crate::symbols::{FunctionSignature, Symbol, SymbolKind};

impl BinderState {
    /// Bind the statements of one block: pre-declare structs and
    /// functions, then visit every statement in order.
    pub(crate) fn bind_statement_list(&mut self, arena: &NodeArena, statements: &[NodeIndex]) {
        self.predeclare(arena, statements);
        for &stmt in statements {
            self.bind_node(arena, stmt);
        }
    }

    /// Register declarations ahead of the in-order visit so mutual
    /// recursion and forward references work:
    /// struct names first, then struct bodies, then function signatures.
    fn predeclare(&mut self, arena: &NodeArena, statements: &[NodeIndex]) {
        let mut registered = Vec::new();
        for &stmt in statements {
            if let Some(Node::StructDecl { name, .. }) = arena.get(stmt) {
                if self.predeclare_struct_name(arena, name, stmt) {
                    registered.push(stmt);
                }
            }
        }
        for &stmt in &registered {
            if let Some(Node::StructDecl { name, fields }) = arena.get(stmt) {
                self.define_struct_body(name, fields, stmt);
            }
        }
        for &stmt in statements {
            if let Some(Node::Func {
                name,
                params,
                return_type,
                ..
            }) = arena.get(stmt)
            {
                self.predeclare_function(arena, name, params, return_type.as_ref(), stmt);
            }
        }
    }

    fn predeclare_struct_name(&mut self, arena: &NodeArena, name: &str, idx: NodeIndex) -> bool {
        match self.table.register(&mut self.types, name) {
            Some(type_id) => {
                let scope = self.current_scope_id();
                self.scope_mut(scope)
                    .structs
                    .insert(name.to_string(), type_id);
                debug!(name, "registered struct");
                true
            }
            None => {
                self.diagnostics.error(
                    arena.get_span(idx).start,
                    format!("struct '{name}' already declared"),
                );
                false
            }
        }
    }

    fn define_struct_body(&mut self, name: &str, fields: &[FieldDecl], idx: NodeIndex) {
        let mut laid_out = Vec::with_capacity(fields.len());
        for field in fields {
            let ty = self.convert_type_expr(&field.ty);
            let symbol = self.symbols.alloc(Symbol {
                name: field.name.clone(),
                kind: SymbolKind::StructField,
                ty,
                assigned: true,
                decl: idx,
                signature: None,
            });
            laid_out.push((field.name.clone(), ty, Some(symbol)));
        }
        self.table.define_struct(&mut self.types, name, laid_out);
    }

    fn predeclare_function(
        &mut self,
        arena: &NodeArena,
        name: &str,
        params: &[Param],
        return_type: Option<&TypeExpr>,
        idx: NodeIndex,
    ) {
        let scope = self.current_scope_id();
        if self.scope(scope).functions.contains_key(name) {
            self.diagnostics.error(
                arena.get_span(idx).start,
                format!("function '{name}' already declared"),
            );
            return;
        }
        let param_types: Vec<_> = params.iter().map(|p| self.convert_type_expr(&p.ty)).collect();
        let return_type = return_type.map(|ty| self.convert_type_expr(ty));
        let symbol = self.symbols.alloc(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function,
            ty: return_type.unwrap_or(TypeId::ERROR),
            assigned: true,
            decl: idx,
            signature: Some(FunctionSignature {
                params: param_types,
                return_type,
            }),
        });
        self.scope_mut(scope)
            .functions
            .insert(name.to_string(), symbol);
        self.node_symbols.insert(idx.0, symbol);
        debug!(name, "registered function");
    }

    pub(crate) fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node {
            Node::Program { statements } | Node::Block { statements } => {
                self.push_scope();
                self.node_scope_ids.insert(idx.0, self.current_scope_id());
                self.bind_statement_list(arena, &statements.nodes);
                self.pop_scope();
            }
            Node::VarDecl { name, ty, init } => {
                if init.is_some() {
                    self.bind_node(arena, *init);
                }
                self.bind_var_decl(arena, name, ty, *init, idx);
            }
            Node::Func { body, params, .. } => {
                // Symbol was created by the pre-pass; here we bind the
                // parameters into a fresh function scope and walk the body.
                self.push_scope();
                self.node_scope_ids.insert(idx.0, self.current_scope_id());
                for param in params {
                    self.bind_param(param);
                }
                self.bind_node(arena, *body);
                self.pop_scope();
            }
            Node::StructDecl { .. } => {
                // Fully handled by the pre-pass.
            }
            Node::Identifier { name } => match self.resolve_identifier(name) {
                IdentResolution::Symbol(sym) => {
                    self.node_symbols.insert(idx.0, sym);
                }
                IdentResolution::StructName => {}
                IdentResolution::Unresolved => {
                    self.diagnostics.error(
                        arena.get_span(idx).start,
                        format!("undefined symbol '{name}'"),
                    );
                }
            },
            Node::Binary { left, right, .. } => {
                self.bind_node(arena, *left);
                self.bind_node(arena, *right);
            }
            Node::Unary { operand, .. } => {
                self.bind_node(arena, *operand);
            }
            Node::Call { callee, args } => {
                self.bind_node(arena, *callee);
                for &arg in &args.nodes {
                    self.bind_node(arena, arg);
                }
            }
            Node::If {
                condition,
                then_block,
                else_block,
            } => {
                self.bind_node(arena, *condition);
                self.bind_node(arena, *then_block);
                if else_block.is_some() {
                    self.bind_node(arena, *else_block);
                }
            }
            Node::Loop { body } => {
                self.bind_node(arena, *body);
            }
            Node::Assign { target, value } => {
                self.bind_node(arena, *target);
                self.bind_node(arena, *value);
            }
            Node::Return { value } => {
                if value.is_some() {
                    self.bind_node(arena, *value);
                }
            }
            Node::FieldAccess { object, .. } => {
                self.bind_node(arena, *object);
            }
            Node::Index { object, index } => {
                self.bind_node(arena, *object);
                self.bind_node(arena, *index);
            }
            Node::IntegerLiteral { .. }
            | Node::StringLiteral { .. }
            | Node::BooleanLiteral { .. }
            | Node::Break
            | Node::Continue => {}
        }
    }

    fn bind_var_decl(
        &mut self,
        arena: &NodeArena,
        name: &str,
        ty: &TypeExpr,
        init: NodeIndex,
        idx: NodeIndex,
    ) {
        let ty_id = self.convert_type_expr(ty);
        let scope = self.current_scope_id();
        if self.scope(scope).variables.contains_key(name) {
            self.diagnostics.error(
                arena.get_span(idx).start,
                format!("variable '{name}' already declared"),
            );
            return;
        }
        let symbol = self.symbols.alloc(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Variable,
            ty: ty_id,
            assigned: init.is_some(),
            decl: idx,
            signature: None,
        });
        self.scope_mut(scope)
            .variables
            .insert(name.to_string(), symbol);
        self.node_symbols.insert(idx.0, symbol);
    }

    fn bind_param(&mut self, param: &Param) {
        let ty = self.convert_type_expr(&param.ty);
        let scope = self.current_scope_id();
        if self.scope(scope).variables.contains_key(&param.name) {
            self.diagnostics.error(
                param.span.start,
                format!("variable '{}' already declared", param.name),
            );
            return;
        }
        let symbol = self.symbols.alloc(Symbol {
            name: param.name.clone(),
            kind: SymbolKind::Parameter,
            ty,
            assigned: true,
            decl: NodeIndex::NONE,
            signature: None,
        });
        self.scope_mut(scope)
            .variables
            .insert(param.name.clone(), symbol);
    }
}
