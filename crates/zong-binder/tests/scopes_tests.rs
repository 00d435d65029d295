//! Scope construction and lookup tests.

use zong_binder::{BinderState, ScopeId};
use zong_parser::{NodeIndex, ParserState};

fn bind_program(source: &str) -> (ParserState, NodeIndex, BinderState) {
    let mut parser = ParserState::new(source);
    let root = parser.parse_program();
    assert!(
        !parser.get_diagnostics().has_errors(),
        "unexpected parse errors: {}",
        parser.get_diagnostics().render()
    );
    let mut binder = BinderState::new();
    binder.bind(parser.get_arena(), root);
    (parser, root, binder)
}

#[test]
fn shadowing_creates_two_distinct_symbols() {
    let (_, _, binder) = bind_program("{ var x: I64; { var x: I64; } }");
    assert!(!binder.has_errors(), "{}", binder.get_diagnostics().render());

    let named_x: Vec<_> = binder
        .symbols
        .iter()
        .filter(|(_, s)| s.name == "x")
        .map(|(id, _)| id)
        .collect();
    assert_eq!(named_x.len(), 2, "expected two distinct 'x' symbols");

    // Global is scope 0; the outer block is scope 1, the inner scope 2.
    let outer = ScopeId(1);
    let inner = ScopeId(2);
    let from_outer = binder.lookup_variable_from(outer, "x").unwrap();
    let from_inner = binder.lookup_variable_from(inner, "x").unwrap();
    assert_ne!(from_outer, from_inner);

    let outer_scope = &binder.scopes[outer.0 as usize];
    assert_eq!(outer_scope.variables.get("x"), Some(&from_outer));
}

#[test]
fn inner_scope_falls_back_to_the_parent_chain() {
    let (_, _, binder) = bind_program("{ var x: I64; { var y: I64; } }");
    let inner = ScopeId(2);
    assert!(binder.lookup_variable_from(inner, "x").is_some());
    assert!(binder.lookup_variable_from(inner, "y").is_some());

    let outer = ScopeId(1);
    assert!(binder.lookup_variable_from(outer, "y").is_none());
}

#[test]
fn function_parameters_live_in_the_function_scope() {
    let (parser, root, binder) = bind_program("func f(a: I64) { a; }");
    assert!(!binder.has_errors(), "{}", binder.get_diagnostics().render());

    let arena = parser.get_arena();
    let Some(zong_parser::Node::Program { statements }) = arena.get(root) else {
        panic!("expected program root");
    };
    let func_idx = statements.nodes[0];
    let func_scope = binder.node_scope_ids[&func_idx.0];
    assert!(binder.lookup_variable_from(func_scope, "a").is_some());
    assert!(binder.lookup_variable_from(ScopeId::GLOBAL, "a").is_none());
}

#[test]
fn sibling_blocks_do_not_share_variables() {
    let (_, _, binder) = bind_program("{ var x: I64; } { x; }");
    assert!(binder.has_errors());
    let rendered = binder.get_diagnostics().render();
    assert!(
        rendered.contains("undefined symbol 'x'"),
        "unexpected diagnostics: {rendered}"
    );
}
