//! End-to-end checker tests over the lex-parse-bind-check pipeline.

use zong_binder::BinderState;
use zong_checker::CheckerState;
use zong_common::DiagnosticBag;
use zong_parser::ParserState;

/// Run the full front end and return the combined diagnostic rendering.
fn check_program(source: &str) -> String {
    let mut parser = ParserState::new(source);
    let root = parser.parse_program();
    let mut combined = DiagnosticBag::new();
    combined.absorb(parser.take_diagnostics());

    let mut binder = BinderState::new();
    binder.bind(parser.get_arena(), root);
    combined.absorb(binder.take_diagnostics());

    let mut checker = CheckerState::new(parser.get_arena(), &mut binder);
    checker.check(root);
    combined.absorb(checker.take_diagnostics());

    combined.render()
}

fn assert_clean(source: &str) {
    let rendered = check_program(source);
    assert!(rendered.is_empty(), "unexpected errors:\n{rendered}");
}

#[test]
fn declared_assigned_and_printed_variable_checks_clean() {
    assert_clean("{ var x: I64; x = 42; print(x); }");
}

#[test]
fn integer_literal_unifies_with_u8_and_pointer_targets() {
    assert_clean("var b: U8 = 200;");
    assert_clean("var p: I64* = 0;");
}

#[test]
fn boolean_initializer_for_integer_variable_is_a_mismatch() {
    let rendered = check_program("var x: I64 = true;");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn reading_an_unassigned_variable_is_reported() {
    let rendered = check_program("{ var x: I64; print(x); }");
    assert!(
        rendered.contains("use of unassigned variable 'x'"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn assignment_marks_the_variable_assigned_for_later_reads() {
    assert_clean("{ var x: I64; x = 1; var y: I64 = x; }");
}

#[test]
fn parameters_are_born_assigned() {
    assert_clean("func double(n: I64): I64 { return n + n; }");
}

#[test]
fn logical_operators_require_boolean_operands() {
    let rendered = check_program("var t: Boolean = 1 && true;");
    assert!(
        rendered.contains("expected Boolean"),
        "unexpected errors:\n{rendered}"
    );
    assert_clean("var t: Boolean = true && false;");
}

#[test]
fn comparison_produces_boolean() {
    assert_clean("var t: Boolean = 1 < 2;");
    let rendered = check_program("var t: I64 = 1 < 2;");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn arithmetic_on_booleans_is_rejected() {
    let rendered = check_program("var x: I64 = true + false;");
    assert!(
        rendered.contains("operator '+' requires integer operands"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn call_arity_and_argument_types_are_checked() {
    let rendered = check_program("print(1, 2);");
    assert!(
        rendered.contains("function 'print' expects 1 argument(s), found 2"),
        "unexpected errors:\n{rendered}"
    );

    let rendered = check_program("print(true);");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn call_result_takes_the_declared_return_type() {
    assert_clean("func one(): I64 { return 1; } var x: I64 = one();");
    let rendered = check_program("func yes(): Boolean { return true; } var x: I64 = yes();");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn calling_a_variable_is_rejected() {
    let rendered = check_program("{ var x: I64; x = 1; x(); }");
    assert!(
        rendered.contains("'x' is not a function"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn return_type_is_checked_against_the_signature() {
    let rendered = check_program("func f(): I64 { return true; }");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );

    let rendered = check_program("func f(): I64 { return; }");
    assert!(
        rendered.contains("missing return value"),
        "unexpected errors:\n{rendered}"
    );

    let rendered = check_program("func f() { return 1; }");
    assert!(
        rendered.contains("unexpected return value"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn address_of_requires_a_place_and_yields_a_pointer() {
    assert_clean("{ var x: I64; x = 1; var p: I64* = x&; }");
    let rendered = check_program("var p: I64* = (1 + 2)&;");
    assert!(
        rendered.contains("cannot take the address"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn deref_requires_a_pointer_and_yields_the_child_type() {
    assert_clean("{ var x: I64; x = 1; var p: I64* = x&; var y: I64 = p*; }");
    let rendered = check_program("{ var x: I64; x = 1; var y: I64 = x*; }");
    assert!(
        rendered.contains("cannot dereference I64"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn assignment_through_deref_field_and_index_is_allowed() {
    assert_clean(
        "struct Point(x: I64, y: I64);\n\
         { var pt: Point; var p: Point* = pt&; p*.x = 1; pt.y = 2; }",
    );
    assert_clean("func f(bytes: U8[]) { bytes[0] = 65; }");
}

#[test]
fn assigning_to_a_non_place_is_rejected() {
    let rendered = check_program("1 + 2 = 3;");
    assert!(
        rendered.contains("left side of assignment is not assignable"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn field_access_auto_derefs_one_pointer_level() {
    assert_clean(
        "struct Point(x: I64, y: I64);\n\
         func get(p: Point*): I64 { return p.x; }",
    );
}

#[test]
fn unknown_field_is_reported_by_name() {
    let rendered = check_program(
        "struct Point(x: I64, y: I64);\n\
         func get(p: Point): I64 { return p.z; }",
    );
    assert!(
        rendered.contains("unknown field 'z' on struct 'Point'"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn string_literals_are_u8_slices() {
    assert_clean("var s: U8[] = \"hello\"; var first: U8 = s[0];");
    let rendered = check_program("var s: I64 = \"hello\";");
    assert!(
        rendered.contains("type mismatch: expected I64, found U8[]"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn indexing_requires_a_slice_and_an_integer_index() {
    let rendered = check_program("{ var x: I64; x = 1; var y: I64 = x[0]; }");
    assert!(
        rendered.contains("indexing requires a slice, found I64"),
        "unexpected errors:\n{rendered}"
    );

    let rendered = check_program("func f(bytes: U8[]): U8 { return bytes[true]; }");
    assert!(
        rendered.contains("type mismatch: expected I64, found Boolean"),
        "unexpected errors:\n{rendered}"
    );
}

#[test]
fn if_condition_must_be_boolean() {
    let rendered = check_program("if 1 { }");
    assert!(
        rendered.contains("type mismatch: expected Boolean, found"),
        "unexpected errors:\n{rendered}"
    );
    assert_clean("if 1 < 2 { } else { }");
}

#[test]
fn unresolved_identifiers_poison_instead_of_cascading() {
    // One resolution error; the poisoned expression type-checks quietly.
    let rendered = check_program("{ var x: I64 = missing + 1; var y: Boolean = x < 2; }");
    let error_lines = rendered.lines().count();
    assert_eq!(
        error_lines, 1,
        "expected a single resolution error:\n{rendered}"
    );
    assert!(rendered.contains("undefined symbol 'missing'"));
}
