//! Projection of front-end output into Sexy values.
//!
//! Three views exist, one per assertion fence kind:
//! - `ast`: the parse tree, heads-and-atoms (`(binary "+" 1 2)`);
//!   identifiers render as bare symbols.
//! - `ast-sym`: the resolved tree; identifiers and declarations become
//!   `(ident "x")` / `(var "x" I64)` lists carrying symbol metadata
//!   (`^{kind: variable, type: I64, assigned: false}`).
//! - `types`: the type-table snapshot as a map from struct name to its
//!   laid-out definition.

use indexmap::IndexMap;
use zong_binder::BinderState;
use zong_common::SymbolId;
use zong_parser::{Node, NodeArena, NodeIndex, TypeExpr, TypeExprKind};
use zong_sexy::{Value, ValueKind};
use zong_types::{Type, TypeArena, TypeId};

/// Render the parser output, resolver skipped.
#[must_use]
pub fn ast_to_value(arena: &NodeArena, idx: NodeIndex) -> Value {
    render(arena, None, idx)
}

/// Render the resolver output with symbol metadata.
#[must_use]
pub fn resolved_ast_to_value(arena: &NodeArena, binder: &BinderState, idx: NodeIndex) -> Value {
    render(arena, Some(binder), idx)
}

/// Render the type-table snapshot as a map of struct definitions.
#[must_use]
pub fn type_table_to_value(binder: &BinderState) -> Value {
    let mut entries = IndexMap::new();
    for (name, id) in binder.table.snapshot() {
        entries.insert(name.to_string(), struct_def_to_value(&binder.types, id));
    }
    Value::map(entries)
}

fn render(arena: &NodeArena, binder: Option<&BinderState>, idx: NodeIndex) -> Value {
    let Some(node) = arena.get(idx) else {
        return Value::symbol("missing");
    };
    match node {
        Node::IntegerLiteral { value } => Value::integer(*value),
        Node::StringLiteral { value } => Value::string(value.clone()),
        Node::BooleanLiteral { value } => Value::symbol(if *value { "true" } else { "false" }),
        Node::Identifier { name } => match binder {
            None => Value::symbol(name.clone()),
            Some(binder) => {
                let meta = binder
                    .symbol_of(idx)
                    .map(|sym| symbol_meta(binder, sym))
                    .unwrap_or_default();
                Value::list_with_meta(
                    vec![Value::symbol("ident"), Value::string(name.clone())],
                    meta,
                )
            }
        },
        Node::Binary { op, left, right } => Value::list(vec![
            Value::symbol("binary"),
            Value::string(op.text()),
            render(arena, binder, *left),
            render(arena, binder, *right),
        ]),
        Node::Unary { op, operand } => Value::list(vec![
            Value::symbol("unary"),
            Value::string(op.text()),
            render(arena, binder, *operand),
        ]),
        Node::Call { callee, args } => {
            let mut items = vec![Value::symbol("call"), render(arena, binder, *callee)];
            items.extend(args.nodes.iter().map(|&arg| render(arena, binder, arg)));
            Value::list(items)
        }
        Node::Block { statements } => {
            let mut items = vec![Value::symbol("block")];
            items.extend(
                statements
                    .nodes
                    .iter()
                    .map(|&stmt| render(arena, binder, stmt)),
            );
            Value::list(items)
        }
        Node::VarDecl { name, ty, init } => {
            let mut items = vec![
                Value::symbol("var"),
                Value::string(name.clone()),
                type_expr_to_value(ty),
            ];
            if init.is_some() {
                items.push(render(arena, binder, *init));
            }
            let meta = binder
                .and_then(|b| b.symbol_of(idx).map(|sym| symbol_meta(b, sym)))
                .unwrap_or_default();
            Value::list_with_meta(items, meta)
        }
        Node::If {
            condition,
            then_block,
            else_block,
        } => {
            let mut items = vec![
                Value::symbol("if"),
                render(arena, binder, *condition),
                render(arena, binder, *then_block),
            ];
            if else_block.is_some() {
                items.push(render(arena, binder, *else_block));
            }
            Value::list(items)
        }
        Node::Loop { body } => {
            Value::list(vec![Value::symbol("loop"), render(arena, binder, *body)])
        }
        Node::Break => Value::list(vec![Value::symbol("break")]),
        Node::Continue => Value::list(vec![Value::symbol("continue")]),
        Node::Assign { target, value } => Value::list(vec![
            Value::symbol("assign"),
            render(arena, binder, *target),
            render(arena, binder, *value),
        ]),
        Node::Return { value } => {
            let mut items = vec![Value::symbol("return")];
            if value.is_some() {
                items.push(render(arena, binder, *value));
            }
            Value::list(items)
        }
        Node::Func {
            name,
            params,
            return_type,
            body,
        } => {
            let mut param_items = vec![Value::symbol("params")];
            param_items.extend(params.iter().map(|p| {
                Value::list(vec![
                    Value::symbol("param"),
                    Value::string(p.name.clone()),
                    type_expr_to_value(&p.ty),
                ])
            }));
            let mut items = vec![
                Value::symbol("func"),
                Value::string(name.clone()),
                Value::list(param_items),
            ];
            if let Some(ret) = return_type {
                items.push(Value::list(vec![
                    Value::symbol("returns"),
                    type_expr_to_value(ret),
                ]));
            }
            items.push(render(arena, binder, *body));
            Value::list(items)
        }
        Node::StructDecl { name, fields } => {
            let mut items = vec![Value::symbol("struct"), Value::string(name.clone())];
            items.extend(fields.iter().map(|f| {
                Value::list(vec![
                    Value::symbol("field"),
                    Value::string(f.name.clone()),
                    type_expr_to_value(&f.ty),
                ])
            }));
            Value::list(items)
        }
        Node::FieldAccess { object, field } => Value::list(vec![
            Value::symbol("field"),
            render(arena, binder, *object),
            Value::string(field.clone()),
        ]),
        Node::Index { object, index } => Value::list(vec![
            Value::symbol("index"),
            render(arena, binder, *object),
            render(arena, binder, *index),
        ]),
        Node::Program { statements } => {
            let mut items = vec![Value::symbol("program")];
            items.extend(
                statements
                    .nodes
                    .iter()
                    .map(|&stmt| render(arena, binder, stmt)),
            );
            Value::list(items)
        }
    }
}

/// `^{kind: ..., type: ..., assigned: ...}` for a resolved symbol.
fn symbol_meta(binder: &BinderState, sym: SymbolId) -> IndexMap<String, Value> {
    let mut meta = IndexMap::new();
    let Some(symbol) = binder.symbols.get(sym) else {
        return meta;
    };
    meta.insert("kind".to_string(), Value::symbol(symbol.kind.text()));
    meta.insert(
        "type".to_string(),
        type_ref_to_value(&binder.types, symbol.ty),
    );
    meta.insert(
        "assigned".to_string(),
        Value::symbol(if symbol.assigned { "true" } else { "false" }),
    );
    meta
}

/// Syntactic type expression: `I64`, `(ptr Point)`, `(slice U8)`.
fn type_expr_to_value(ty: &TypeExpr) -> Value {
    match &ty.kind {
        TypeExprKind::Named(name) => Value::symbol(name.clone()),
        TypeExprKind::Pointer(child) => {
            Value::list(vec![Value::symbol("ptr"), type_expr_to_value(child)])
        }
        TypeExprKind::Slice(child) => {
            Value::list(vec![Value::symbol("slice"), type_expr_to_value(child)])
        }
    }
}

/// Shallow canonical type reference: structs render as their name.
fn type_ref_to_value(types: &TypeArena, id: TypeId) -> Value {
    match types.get(id) {
        Type::Builtin(builtin) => Value::symbol(builtin.name()),
        Type::Pointer(child) => Value::list(vec![
            Value::symbol("ptr"),
            type_ref_to_value(types, *child),
        ]),
        Type::Slice(child) => Value::list(vec![
            Value::symbol("slice"),
            type_ref_to_value(types, *child),
        ]),
        Type::Struct(s) => Value::symbol(s.name.clone()),
        Type::IntegerLiteral => Value::symbol("integer-literal"),
        Type::Error => Value::symbol("error"),
    }
}

/// Full struct definition with field offsets and total size:
/// `(struct "Point" (field "x" I64 0) (field "y" I64 8) ^{size: 16})`.
fn struct_def_to_value(types: &TypeArena, id: TypeId) -> Value {
    let Type::Struct(s) = types.get(id) else {
        return type_ref_to_value(types, id);
    };
    let mut items = vec![Value::symbol("struct"), Value::string(s.name.clone())];
    items.extend(s.fields.iter().map(|f| {
        Value::list(vec![
            Value::symbol("field"),
            Value::string(f.name.clone()),
            type_ref_to_value(types, f.ty),
            Value::integer(i64::from(f.offset)),
        ])
    }));
    let mut meta = IndexMap::new();
    meta.insert("size".to_string(), Value::integer(i64::from(s.size)));
    Value::new(ValueKind::List { items, meta })
}
