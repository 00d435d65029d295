//! Tests for expression parsing.

use zong_parser::{BinaryOp, Node, NodeIndex, ParserState, UnaryOp};

fn parse_expr(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new(source);
    let root = parser.parse_expression_entry();
    (parser, root)
}

fn expr_diagnostics(source: &str) -> usize {
    let (parser, _) = parse_expr(source);
    parser.get_diagnostics().len()
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let (parser, root) = parse_expr("1 + 2 * 3");
    assert!(!parser.get_diagnostics().has_errors());

    let arena = parser.get_arena();
    let Some(Node::Binary { op, left, right }) = arena.get(root) else {
        panic!("expected binary root");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(arena.get(*left), Some(&Node::IntegerLiteral { value: 1 }));
    let Some(Node::Binary { op, left, right }) = arena.get(*right) else {
        panic!("expected nested multiplication");
    };
    assert_eq!(*op, BinaryOp::Mul);
    assert_eq!(arena.get(*left), Some(&Node::IntegerLiteral { value: 2 }));
    assert_eq!(arena.get(*right), Some(&Node::IntegerLiteral { value: 3 }));
}

#[test]
fn unary_minus_is_folded_into_integer_literals() {
    let (parser, root) = parse_expr("-42");
    assert_eq!(
        parser.get_arena().get(root),
        Some(&Node::IntegerLiteral { value: -42 })
    );
}

#[test]
fn unary_plus_is_the_identity() {
    let (parser, root) = parse_expr("+42");
    assert_eq!(
        parser.get_arena().get(root),
        Some(&Node::IntegerLiteral { value: 42 })
    );
}

#[test]
fn unary_minus_on_identifier_stays_a_unary_node() {
    let (parser, root) = parse_expr("-x");
    let arena = parser.get_arena();
    let Some(Node::Unary { op, operand }) = arena.get(root) else {
        panic!("expected unary root");
    };
    assert_eq!(*op, UnaryOp::Neg);
    assert!(matches!(
        arena.get(*operand),
        Some(Node::Identifier { name }) if name == "x"
    ));
}

#[test]
fn postfix_address_of_and_deref_parse_after_the_operand() {
    let (parser, root) = parse_expr("p&");
    let arena = parser.get_arena();
    assert!(matches!(
        arena.get(root),
        Some(Node::Unary {
            op: UnaryOp::AddressOf,
            ..
        })
    ));

    let (parser, root) = parse_expr("p*");
    let arena = parser.get_arena();
    assert!(matches!(
        arena.get(root),
        Some(Node::Unary {
            op: UnaryOp::Deref,
            ..
        })
    ));
}

#[test]
fn asterisk_before_an_operand_is_multiplication() {
    let (parser, root) = parse_expr("a * b");
    let arena = parser.get_arena();
    assert!(matches!(
        arena.get(root),
        Some(Node::Binary {
            op: BinaryOp::Mul,
            ..
        })
    ));
}

#[test]
fn deref_chains_with_field_access() {
    let (parser, root) = parse_expr("p*.x");
    let arena = parser.get_arena();
    let Some(Node::FieldAccess { object, field }) = arena.get(root) else {
        panic!("expected field access root");
    };
    assert_eq!(field, "x");
    assert!(matches!(
        arena.get(*object),
        Some(Node::Unary {
            op: UnaryOp::Deref,
            ..
        })
    ));
}

#[test]
fn comparison_of_logical_operands_keeps_precedence_order() {
    // a < b && c < d parses as (a < b) && (c < d)
    let (parser, root) = parse_expr("a < b && c < d");
    let arena = parser.get_arena();
    let Some(Node::Binary { op, left, right }) = arena.get(root) else {
        panic!("expected binary root");
    };
    assert_eq!(*op, BinaryOp::And);
    assert!(matches!(
        arena.get(*left),
        Some(Node::Binary {
            op: BinaryOp::Lt,
            ..
        })
    ));
    assert!(matches!(
        arena.get(*right),
        Some(Node::Binary {
            op: BinaryOp::Lt,
            ..
        })
    ));
}

#[test]
fn assignment_is_right_associative() {
    let (parser, root) = parse_expr("a = b = 1");
    let arena = parser.get_arena();
    let Some(Node::Assign { target, value }) = arena.get(root) else {
        panic!("expected assignment root");
    };
    assert!(matches!(
        arena.get(*target),
        Some(Node::Identifier { name }) if name == "a"
    ));
    assert!(matches!(arena.get(*value), Some(Node::Assign { .. })));
}

#[test]
fn call_arguments_are_comma_separated() {
    let (parser, root) = parse_expr("f(1, x, \"s\")");
    let arena = parser.get_arena();
    let Some(Node::Call { args, .. }) = arena.get(root) else {
        panic!("expected call root");
    };
    assert_eq!(args.len(), 3);
}

#[test]
fn index_parses_into_index_node() {
    let (parser, root) = parse_expr("xs[i + 1]");
    let arena = parser.get_arena();
    let Some(Node::Index { index, .. }) = arena.get(root) else {
        panic!("expected index root");
    };
    assert!(matches!(
        arena.get(*index),
        Some(Node::Binary {
            op: BinaryOp::Add,
            ..
        })
    ));
}

#[test]
fn trailing_tokens_after_an_expression_are_a_syntax_error() {
    assert_eq!(expr_diagnostics("1 + 2"), 0);
    assert!(expr_diagnostics("1 + 2 3") > 0);
}

#[test]
fn missing_operand_is_reported_once() {
    assert_eq!(expr_diagnostics("1 +"), 1);
}
