//! Lexer implementation over a NUL-terminated byte buffer.
//!
//! The buffer always carries a trailing NUL sentinel, so the hot loop can
//! read the current byte without a bounds check on every dispatch. A NUL
//! anywhere in the input terminates scanning.

use memchr::memchr;
use zong_common::DiagnosticBag;

use crate::TokenKind;

/// Saved lexer position for speculative scans. See [`LexerState::snapshot`].
#[derive(Debug, Clone)]
pub struct LexerSnapshot {
    pos: usize,
    token: TokenKind,
    token_start: usize,
    token_value: String,
    token_int: i64,
    diagnostic_count: usize,
}

/// Single-call tokenizer: `scan()` advances to the next token and returns
/// its kind; accessors expose the token's text, value, and offsets.
///
/// The parser holds a lookahead of one on top of this.
pub struct LexerState {
    source: Vec<u8>,
    pos: usize,
    token: TokenKind,
    token_start: usize,
    token_value: String,
    token_int: i64,
    diagnostics: DiagnosticBag,
}

impl LexerState {
    /// Create a lexer over `source`. The sentinel NUL is appended here;
    /// callers pass the bare source text.
    #[must_use]
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        let mut source = source.into();
        source.push(0);
        Self {
            source,
            pos: 0,
            token: TokenKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            token_int: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Kind of the current token.
    #[must_use]
    pub fn token(&self) -> TokenKind {
        self.token
    }

    /// Text of the current token: identifier spelling, keyword spelling,
    /// digit run, or the processed bytes of a string literal.
    #[must_use]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Value of the current integer literal token.
    #[must_use]
    pub fn token_int(&self) -> i64 {
        self.token_int
    }

    /// Byte offset where the current token starts.
    #[must_use]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Byte offset one past the current token.
    #[must_use]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    /// Capture the lexer position for a speculative scan.
    #[must_use]
    pub fn snapshot(&self) -> LexerSnapshot {
        LexerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            token_int: self.token_int,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Roll back to a snapshot, discarding any diagnostics the speculative
    /// scan produced.
    pub fn restore(&mut self, snapshot: LexerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.token_int = snapshot.token_int;
        self.diagnostics.truncate(snapshot.diagnostic_count);
    }

    #[inline]
    fn current(&self) -> u8 {
        self.source[self.pos]
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.source[self.pos + 1]
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> TokenKind {
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value.clear();
        self.token_int = 0;

        let kind = match self.current() {
            0 => TokenKind::EndOfFileToken,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_identifier(),
            b'0'..=b'9' => self.scan_integer(),
            b'"' => self.scan_string(),
            b'(' => self.single(TokenKind::OpenParenToken),
            b')' => self.single(TokenKind::CloseParenToken),
            b'{' => self.single(TokenKind::OpenBraceToken),
            b'}' => self.single(TokenKind::CloseBraceToken),
            b'[' => self.single(TokenKind::OpenBracketToken),
            b']' => self.single(TokenKind::CloseBracketToken),
            b';' => self.single(TokenKind::SemicolonToken),
            b',' => self.single(TokenKind::CommaToken),
            b':' => self.single(TokenKind::ColonToken),
            b'.' => self.single(TokenKind::DotToken),
            b'+' => self.single(TokenKind::PlusToken),
            b'-' => self.single(TokenKind::MinusToken),
            b'*' => self.single(TokenKind::AsteriskToken),
            b'/' => self.single(TokenKind::SlashToken),
            b'%' => self.single(TokenKind::PercentToken),
            b'=' => self.one_or_two(b'=', TokenKind::EqualsToken, TokenKind::EqualsEqualsToken),
            b'<' => self.one_or_two(b'=', TokenKind::LessThanToken, TokenKind::LessThanEqualsToken),
            b'>' => self.one_or_two(
                b'=',
                TokenKind::GreaterThanToken,
                TokenKind::GreaterThanEqualsToken,
            ),
            b'!' => self.one_or_two(
                b'=',
                TokenKind::ExclamationToken,
                TokenKind::ExclamationEqualsToken,
            ),
            b'&' => self.one_or_two(
                b'&',
                TokenKind::AmpersandToken,
                TokenKind::AmpersandAmpersandToken,
            ),
            b'|' => self.one_or_two(b'|', TokenKind::BarToken, TokenKind::BarBarToken),
            other => {
                self.pos += 1;
                self.diagnostics.error(
                    self.token_start as u32,
                    format!("unexpected character '{}'", other as char),
                );
                TokenKind::Unknown
            }
        };

        self.token = kind;
        kind
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if self.peek() == b'/' => {
                    // Line comment: jump to the newline, or to the sentinel
                    // when the comment closes the file.
                    match memchr(b'\n', &self.source[self.pos..]) {
                        Some(offset) => self.pos += offset + 1,
                        None => self.pos = self.source.len() - 1,
                    }
                }
                _ => return,
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn one_or_two(&mut self, second: u8, one: TokenKind, two: TokenKind) -> TokenKind {
        if self.peek() == second {
            self.pos += 2;
            two
        } else {
            self.pos += 1;
            one
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        while matches!(self.current(), b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_') {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[self.token_start..self.pos])
            .unwrap_or_default()
            .to_string();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.token_value = text;
        kind
    }

    fn scan_integer(&mut self) -> TokenKind {
        while self.current().is_ascii_digit() {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[self.token_start..self.pos])
            .unwrap_or_default()
            .to_string();
        match text.parse::<i64>() {
            Ok(value) => self.token_int = value,
            Err(_) => {
                self.diagnostics
                    .error(self.token_start as u32, "integer literal too large");
            }
        }
        self.token_value = text;
        TokenKind::IntegerLiteral
    }

    /// Scan a string literal. Only `\"` and `\\` are escapes; every other
    /// byte carries through, so multi-byte UTF-8 sequences are collected
    /// byte for byte rather than reinterpreted per byte.
    fn scan_string(&mut self) -> TokenKind {
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.current() {
                0 => {
                    self.diagnostics
                        .error(self.token_start as u32, "unterminated string literal");
                    break;
                }
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' if matches!(self.peek(), b'"' | b'\\') => {
                    bytes.push(self.peek());
                    self.pos += 2;
                }
                other => {
                    bytes.push(other);
                    self.pos += 1;
                }
            }
        }
        self.token_value = String::from_utf8_lossy(&bytes).into_owned();
        TokenKind::StringLiteral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = LexerState::new(source);
        let mut kinds = Vec::new();
        loop {
            let kind = lexer.scan();
            if kind == TokenKind::EndOfFileToken {
                return kinds;
            }
            kinds.push(kind);
        }
    }

    #[test]
    fn postfix_address_of_lexes_as_single_ampersand() {
        assert_eq!(
            all_kinds("x& && y&"),
            [
                TokenKind::Identifier,
                TokenKind::AmpersandToken,
                TokenKind::AmpersandAmpersandToken,
                TokenKind::Identifier,
                TokenKind::AmpersandToken,
            ]
        );
    }

    #[test]
    fn minus_is_always_an_operator_token() {
        assert_eq!(
            all_kinds("-42"),
            [TokenKind::MinusToken, TokenKind::IntegerLiteral]
        );
    }
}
