//! Sexy matcher tests.

use zong_sexy::{PathStep, is_match, match_value, parse};

fn matches(pattern: &str, value: &str) -> bool {
    let pattern = parse(pattern).expect("pattern parses");
    let value = parse(value).expect("value parses");
    is_match(&pattern, &value)
}

#[test]
fn top_level_ellipsis_matches_anything() {
    assert!(matches("...", "(a b c)"));
    assert!(matches("...", "42"));
    assert!(matches("...", "{x: 1}"));
}

#[test]
fn atoms_match_on_text() {
    assert!(matches("a", "a"));
    assert!(!matches("a", "b"));
    assert!(matches("\"+\"", "\"+\""));
    assert!(matches("42", "42"));
    assert!(!matches("42", "43"));
    // Integers compare textually, not numerically.
    assert!(!matches("042", "42"));
}

#[test]
fn list_ellipsis_absorbs_zero_or_more_consecutive_items() {
    assert!(matches("(binary \"+\" ... 3)", "(binary \"+\" 1 2 3)"));
    assert!(!matches("(binary \"+\" ... 3)", "(binary \"+\" 1 2)"));
    // Zero items is fine.
    assert!(matches("(a ... b)", "(a b)"));
    // Several ellipses in one list.
    assert!(matches("(... a ... b ...)", "(x a y z b)"));
}

#[test]
fn match_is_reflexive_for_concrete_values() {
    for source in [
        "(binary \"+\" 1 (binary \"*\" 2 3))",
        "{x: 1, y: (a b)}",
        "{1 2 3}",
        "[a \"b\" -3]",
        "(list ^{size: 2} 1 2)",
    ] {
        let value = parse(source).expect("value parses");
        assert!(is_match(&value, &value), "match(x, x) failed for {source}");
    }
}

#[test]
fn map_pattern_requires_exact_keys_unless_rest() {
    assert!(matches("{x: 1, y: 2}", "{x: 1, y: 2}"));
    assert!(matches("{y: 2, x: 1}", "{x: 1, y: 2}"));
    assert!(!matches("{x: 1}", "{x: 1, y: 2}"));
    assert!(matches("{x: 1, ...}", "{x: 1, y: 2}"));
    assert!(!matches("{x: 1, z: 3, ...}", "{x: 1, y: 2}"));
}

#[test]
fn set_pattern_matches_unordered() {
    assert!(matches("{1 2 3}", "{3 1 2}"));
    assert!(!matches("{1 2}", "{1 2 3}"));
    assert!(matches("{1 2 ...}", "{3 1 2}"));
    assert!(matches("{...}", "{1 2}"));
}

#[test]
fn labeled_ellipsis_at_a_set_tail_claims_exactly_one_element() {
    assert!(matches("{a #x=...}", "{q a}"));
    assert!(!matches("{a #x=...}", "{a}"));
    assert!(!matches("{a #x=...}", "{q r a}"));
}

#[test]
fn array_anchors_hold_at_both_ends_and_in_between() {
    // Begins with a b, ends with c d.
    assert!(matches("[a b ... c d]", "[a b x y c d]"));
    assert!(matches("[a b ... c d]", "[a b c d]"));
    assert!(!matches("[a b ... c d]", "[a b c]"));
    // Occurs somewhere.
    assert!(matches("[... c ...]", "[a c b]"));
    assert!(!matches("[... c ...]", "[a b]"));
    // Between-anchor order matters.
    assert!(matches("[... a ... b ...]", "[x a y b z]"));
    assert!(!matches("[... b ... a ...]", "[x a y]"));
}

#[test]
fn metadata_keys_mentioned_in_the_pattern_must_match() {
    assert!(matches("(f ^{size: 2})", "(f ^{size: 2, extra: 1})"));
    assert!(!matches("(f ^{size: 3})", "(f ^{size: 2})"));
    assert!(!matches("(f ^{size: 2})", "(f)"));
    // Empty metadata matches unconditionally.
    assert!(matches("(f ^{})", "(f)"));
    assert!(matches("(f ^{})", "(f ^{anything: 1})"));
}

#[test]
fn labels_constrain_positions_to_equal_subtrees() {
    assert!(matches("(#x=... #x#)", "((a b) (a b))"));
    assert!(!matches("(#x=... #x#)", "((a b) (a c))"));
    // Two references without a definition constrain each other.
    assert!(matches("(#x# #x#)", "(q q)"));
    assert!(!matches("(#x# #x#)", "(q r)"));
}

#[test]
fn labels_roll_back_across_ellipsis_backtracking() {
    // The first alignment the matcher tries binds #v= to the wrong item;
    // backtracking must discard that binding and retry.
    assert!(matches("(... #v=a #v#)", "(b a a)"));
    assert!(!matches("(... #v=a #v#)", "(b a b)"));
}

#[test]
fn failure_reports_path_and_reason() {
    let pattern = parse("(binary \"+\" {x: 1} 3)").unwrap();
    let value = parse("(binary \"+\" {x: 2} 3)").unwrap();
    let err = match_value(&pattern, &value).unwrap_err();
    assert_eq!(
        err.path,
        vec![PathStep::Item(2), PathStep::Key("x".to_string())]
    );
    assert!(err.reason.contains("expected 1"), "reason: {}", err.reason);

    let rendered = err.to_string();
    assert!(
        rendered.contains("item[2].key 'x'"),
        "rendered: {rendered}"
    );
}

#[test]
fn kind_mismatch_is_reported() {
    let pattern = parse("(a)").unwrap();
    let value = parse("{a}").unwrap();
    let err = match_value(&pattern, &value).unwrap_err();
    assert!(
        err.reason.contains("expected a list"),
        "reason: {}",
        err.reason
    );
}
