//! Round-trip and formatting tests.

use zong_sexy::{format, parse};

/// `parse(format(v))` must reproduce `v` for concrete values.
#[test]
fn parse_format_round_trips_concrete_values() {
    for source in [
        "hello",
        "-42",
        "\"a \\\"quoted\\\" b\"",
        "(binary \"+\" 1 (binary \"*\" 2 3))",
        "{x: 1, y: {a b}}",
        "{1 2 (3 4)}",
        "[a [b] \"c\"]",
        "(list ^{size: 2, kind: variable} 1 2)",
        "(#lhs=x y)",
        "()",
        "{}",
    ] {
        let value = parse(source).unwrap_or_else(|e| panic!("{source:?}: {}", e.message));
        let formatted = format(&value);
        let reparsed = parse(&formatted)
            .unwrap_or_else(|e| panic!("reparse of {formatted:?}: {}", e.message));
        assert_eq!(
            value, reparsed,
            "round trip changed {source:?} (formatted as {formatted:?})"
        );
    }
}

#[test]
fn formatting_is_canonical() {
    let value = parse("( a   b\n c )").unwrap();
    assert_eq!(format(&value), "(a b c)");

    let value = parse("{x:1,y:2}").unwrap();
    assert_eq!(format(&value), "{x: 1, y: 2}");

    let value = parse("(f ^{a: 1} ^{b: 2})").unwrap();
    assert_eq!(format(&value), "(f ^{a: 1, b: 2})");
}

#[test]
fn pattern_constructs_render_in_source_form() {
    let value = parse("(#x=a #x# ...)").unwrap();
    assert_eq!(format(&value), "(#x=a #x# ...)");
}
