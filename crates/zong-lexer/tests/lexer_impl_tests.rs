use zong_lexer::{LexerState, TokenKind};

#[test]
fn identifiers_and_keywords_are_distinguished() {
    let mut lexer = LexerState::new("var varnish");

    let token = lexer.scan();
    assert_eq!(token, TokenKind::VarKeyword);

    let token = lexer.scan();
    assert_eq!(token, TokenKind::Identifier);
    assert_eq!(lexer.token_value(), "varnish");
}

#[test]
fn string_literal_processes_quote_and_backslash_escapes() {
    let mut lexer = LexerState::new(r#""a\"b\\c""#);

    let token = lexer.scan();
    assert_eq!(token, TokenKind::StringLiteral);
    assert_eq!(lexer.token_value(), r#"a"b\c"#);
    assert!(!lexer.diagnostics().has_errors());
}

#[test]
fn string_literal_carries_multibyte_utf8_through() {
    let mut lexer = LexerState::new("\"héllo → zong\"");

    let token = lexer.scan();
    assert_eq!(token, TokenKind::StringLiteral);
    assert_eq!(lexer.token_value(), "héllo → zong");
    assert!(!lexer.diagnostics().has_errors());
}

#[test]
fn unterminated_string_is_reported_and_scanning_continues() {
    let mut lexer = LexerState::new("\"abc");

    let token = lexer.scan();
    assert_eq!(token, TokenKind::StringLiteral);
    assert_eq!(lexer.token_value(), "abc");
    assert!(lexer.diagnostics().has_errors());

    let token = lexer.scan();
    assert_eq!(token, TokenKind::EndOfFileToken);
}

#[test]
fn line_comments_are_skipped_including_trailing_comment() {
    let mut lexer = LexerState::new("1 // one\n2 // eof");

    assert_eq!(lexer.scan(), TokenKind::IntegerLiteral);
    assert_eq!(lexer.token_int(), 1);
    assert_eq!(lexer.scan(), TokenKind::IntegerLiteral);
    assert_eq!(lexer.token_int(), 2);
    assert_eq!(lexer.scan(), TokenKind::EndOfFileToken);
}

#[test]
fn two_character_operators_win_over_single() {
    let mut lexer = LexerState::new("<= < == = != ! || |");
    let expected = [
        TokenKind::LessThanEqualsToken,
        TokenKind::LessThanToken,
        TokenKind::EqualsEqualsToken,
        TokenKind::EqualsToken,
        TokenKind::ExclamationEqualsToken,
        TokenKind::ExclamationToken,
        TokenKind::BarBarToken,
        TokenKind::BarToken,
    ];
    for kind in expected {
        assert_eq!(lexer.scan(), kind);
    }
    assert_eq!(lexer.scan(), TokenKind::EndOfFileToken);
}

#[test]
fn token_offsets_track_byte_positions() {
    let mut lexer = LexerState::new("ab + 1");

    lexer.scan();
    assert_eq!((lexer.token_start(), lexer.token_end()), (0, 2));
    lexer.scan();
    assert_eq!((lexer.token_start(), lexer.token_end()), (3, 4));
    lexer.scan();
    assert_eq!((lexer.token_start(), lexer.token_end()), (5, 6));
}

#[test]
fn stray_byte_is_reported_as_unknown_token() {
    let mut lexer = LexerState::new("a @ b");

    assert_eq!(lexer.scan(), TokenKind::Identifier);
    assert_eq!(lexer.scan(), TokenKind::Unknown);
    assert!(lexer.diagnostics().has_errors());
    assert_eq!(lexer.scan(), TokenKind::Identifier);
}
