//! Sexy tokenizer.
//!
//! Same single-call shape as the Zong lexer: a NUL-terminated buffer, one
//! `scan()` call per token, accessors for the current token's text and
//! offset. Comments run from `;` to end of line.

use memchr::memchr;
use zong_common::DiagnosticBag;

/// Kind of a scanned Sexy token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SexyTokenKind {
    Unknown,
    EndOfFile,
    Symbol,
    Str,
    Integer,
    /// `...`
    Ellipsis,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    Caret,
    /// `#name=`
    LabelDef,
    /// `#name#`
    LabelRef,
}

/// Single-call tokenizer over a NUL-terminated byte buffer.
pub struct SexyLexer {
    source: Vec<u8>,
    pos: usize,
    token: SexyTokenKind,
    token_start: usize,
    token_value: String,
    diagnostics: DiagnosticBag,
}

impl SexyLexer {
    #[must_use]
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        let mut source = source.into();
        source.push(0);
        Self {
            source,
            pos: 0,
            token: SexyTokenKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    #[must_use]
    pub fn token(&self) -> SexyTokenKind {
        self.token
    }

    /// Symbol text, string contents, integer text, or label name.
    #[must_use]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[must_use]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    #[inline]
    fn current(&self) -> u8 {
        self.source[self.pos]
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.source[self.pos + 1]
    }

    #[inline]
    fn peek2(&self) -> u8 {
        self.source.get(self.pos + 2).copied().unwrap_or(0)
    }

    pub fn scan(&mut self) -> SexyTokenKind {
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value.clear();

        let kind = match self.current() {
            0 => SexyTokenKind::EndOfFile,
            b'(' => self.single(SexyTokenKind::OpenParen),
            b')' => self.single(SexyTokenKind::CloseParen),
            b'{' => self.single(SexyTokenKind::OpenBrace),
            b'}' => self.single(SexyTokenKind::CloseBrace),
            b'[' => self.single(SexyTokenKind::OpenBracket),
            b']' => self.single(SexyTokenKind::CloseBracket),
            b':' => self.single(SexyTokenKind::Colon),
            b',' => self.single(SexyTokenKind::Comma),
            b'^' => self.single(SexyTokenKind::Caret),
            b'"' => self.scan_string(),
            b'#' => self.scan_label(),
            b'.' if self.peek() == b'.' && self.peek2() == b'.' => {
                self.pos += 3;
                SexyTokenKind::Ellipsis
            }
            b'-' if self.peek().is_ascii_digit() => self.scan_integer(),
            b'0'..=b'9' => self.scan_integer(),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_symbol(),
            other => {
                self.pos += 1;
                self.diagnostics.error(
                    self.token_start as u32,
                    format!("unexpected character '{}'", other as char),
                );
                SexyTokenKind::Unknown
            }
        };

        self.token = kind;
        kind
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b';' => match memchr(b'\n', &self.source[self.pos..]) {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.source.len() - 1,
                },
                _ => return,
            }
        }
    }

    fn single(&mut self, kind: SexyTokenKind) -> SexyTokenKind {
        self.pos += 1;
        kind
    }

    fn scan_symbol(&mut self) -> SexyTokenKind {
        while matches!(self.current(), b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-') {
            self.pos += 1;
        }
        self.token_value = self.text_from(self.token_start);
        SexyTokenKind::Symbol
    }

    fn scan_integer(&mut self) -> SexyTokenKind {
        if self.current() == b'-' {
            self.pos += 1;
        }
        while self.current().is_ascii_digit() {
            self.pos += 1;
        }
        self.token_value = self.text_from(self.token_start);
        SexyTokenKind::Integer
    }

    /// Multi-byte UTF-8 content is collected byte for byte; only `\"` and
    /// `\\` are escapes.
    fn scan_string(&mut self) -> SexyTokenKind {
        self.pos += 1;
        let mut bytes = Vec::new();
        loop {
            match self.current() {
                0 => {
                    self.diagnostics
                        .error(self.token_start as u32, "unterminated string");
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
        SexyTokenKind::Str
    }

    /// `#name=` defines a label, `#name#` references one.
    fn scan_label(&mut self) -> SexyTokenKind {
        self.pos += 1;
        let name_start = self.pos;
        while matches!(self.current(), b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-') {
            self.pos += 1;
        }
        let name = self.text_from(name_start);
        if name.is_empty() {
            self.diagnostics
                .error(self.token_start as u32, "expected label name after '#'");
            return SexyTokenKind::Unknown;
        }
        self.token_value = name;
        match self.current() {
            b'=' => {
                self.pos += 1;
                SexyTokenKind::LabelDef
            }
            b'#' => {
                self.pos += 1;
                SexyTokenKind::LabelRef
            }
            _ => {
                self.diagnostics.error(
                    self.token_start as u32,
                    "expected '=' or '#' after label name",
                );
                SexyTokenKind::Unknown
            }
        }
    }

    fn text_from(&self, start: usize) -> String {
        std::str::from_utf8(&self.source[start..self.pos])
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SexyTokenKind> {
        let mut lexer = SexyLexer::new(source);
        let mut out = Vec::new();
        loop {
            let kind = lexer.scan();
            if kind == SexyTokenKind::EndOfFile {
                return out;
            }
            out.push(kind);
        }
    }

    #[test]
    fn label_def_and_ref_are_distinct_tokens() {
        assert_eq!(
            kinds("#lhs=x #lhs#"),
            [
                SexyTokenKind::LabelDef,
                SexyTokenKind::Symbol,
                SexyTokenKind::LabelRef,
            ]
        );
    }

    #[test]
    fn ellipsis_and_negative_integers_scan() {
        assert_eq!(
            kinds("... -42"),
            [SexyTokenKind::Ellipsis, SexyTokenKind::Integer]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            kinds("a ; comment\nb"),
            [SexyTokenKind::Symbol, SexyTokenKind::Symbol]
        );
    }
}
