//! Sexy parser.
//!
//! Recursive descent over the tokenizer. The one ambiguity in the grammar
//! is `{ ... }`: empty braces are an empty map; a leading symbol followed
//! by `:` makes it a map; anything else makes it a set.

use indexmap::IndexMap;
use zong_common::Diagnostic;

use crate::lexer::{SexyLexer, SexyTokenKind};
use crate::value::{Value, ValueKind};

/// Parse one datum and require the input to end there.
pub fn parse(source: &str) -> Result<Value, Diagnostic> {
    let mut parser = SexyParser::new(source);
    let value = parser.parse_datum()?;
    if parser.lexer.token() != SexyTokenKind::EndOfFile {
        return Err(parser.unexpected("end of input"));
    }
    Ok(value)
}

struct SexyParser {
    lexer: SexyLexer,
}

impl SexyParser {
    fn new(source: &str) -> Self {
        let mut lexer = SexyLexer::new(source);
        lexer.scan();
        Self { lexer }
    }

    fn bump(&mut self) {
        self.lexer.scan();
    }

    fn unexpected(&mut self, expected: &str) -> Diagnostic {
        // A lexer-level complaint (bad character, unterminated string) is
        // more precise than "unexpected token"; prefer it.
        let lexed = self.lexer.take_diagnostics();
        if let Some(first) = lexed.iter().next() {
            return first.clone();
        }
        Diagnostic::new(
            self.lexer.token_start(),
            format!("expected {expected}"),
        )
    }

    fn parse_datum(&mut self) -> Result<Value, Diagnostic> {
        // Optional label definition prefix.
        if self.lexer.token() == SexyTokenKind::LabelDef {
            let label = self.lexer.token_value().to_string();
            self.bump();
            let mut value = self.parse_datum()?;
            if value.label.is_some() {
                return Err(Diagnostic::new(
                    self.lexer.token_start(),
                    "datum already carries a label",
                ));
            }
            value.label = Some(label);
            return Ok(value);
        }

        match self.lexer.token() {
            SexyTokenKind::Symbol => {
                let value = Value::symbol(self.lexer.token_value());
                self.bump();
                Ok(value)
            }
            SexyTokenKind::Str => {
                let value = Value::string(self.lexer.token_value());
                self.bump();
                Ok(value)
            }
            SexyTokenKind::Integer => {
                let value = Value::new(ValueKind::Integer(self.lexer.token_value().to_string()));
                self.bump();
                Ok(value)
            }
            SexyTokenKind::Ellipsis => {
                self.bump();
                Ok(Value::new(ValueKind::Ellipsis))
            }
            SexyTokenKind::LabelRef => {
                let value = Value::new(ValueKind::LabelRef(self.lexer.token_value().to_string()));
                self.bump();
                Ok(value)
            }
            SexyTokenKind::OpenParen => self.parse_list(),
            SexyTokenKind::OpenBrace => self.parse_braces(),
            SexyTokenKind::OpenBracket => self.parse_array(),
            _ => Err(self.unexpected("a datum")),
        }
    }

    /// `( datum* )` with interspersed `^{...}` metadata blocks.
    fn parse_list(&mut self) -> Result<Value, Diagnostic> {
        self.bump();
        let mut items = Vec::new();
        let mut meta = IndexMap::new();
        loop {
            match self.lexer.token() {
                SexyTokenKind::CloseParen => {
                    self.bump();
                    return Ok(Value::list_with_meta(items, meta));
                }
                SexyTokenKind::EndOfFile => return Err(self.unexpected("')'")),
                SexyTokenKind::Caret => {
                    self.bump();
                    if self.lexer.token() != SexyTokenKind::OpenBrace {
                        return Err(self.unexpected("'{' after '^'"));
                    }
                    // Multiple metadata blocks merge; later keys win.
                    let block = self.parse_map_entries()?;
                    for (key, value) in block {
                        meta.insert(key, value);
                    }
                }
                _ => items.push(self.parse_datum()?),
            }
        }
    }

    /// `{ }` disambiguation: empty map, `sym :` map, otherwise set.
    fn parse_braces(&mut self) -> Result<Value, Diagnostic> {
        self.bump();
        if self.lexer.token() == SexyTokenKind::CloseBrace {
            self.bump();
            return Ok(Value::map(IndexMap::new()));
        }

        // A leading tail-ellipsis can only be a set pattern.
        if self.lexer.token() == SexyTokenKind::Ellipsis {
            return self.parse_set_items(Vec::new());
        }

        let first = self.parse_datum()?;
        if self.lexer.token() == SexyTokenKind::Colon {
            let ValueKind::Symbol(key) = &first.kind else {
                return Err(self.unexpected("a symbol map key"));
            };
            if first.label.is_some() {
                return Err(Diagnostic::new(
                    self.lexer.token_start(),
                    "map keys cannot carry labels",
                ));
            }
            let key = key.clone();
            self.bump();
            let value = self.parse_datum()?;
            let mut entries = IndexMap::new();
            entries.insert(key, value);
            return self.parse_map_tail(entries);
        }
        // A labeled ellipsis arrives here as a parsed datum rather than a
        // bare token; the tail-only rule still applies to it.
        if matches!(first.kind, ValueKind::Ellipsis)
            && self.lexer.token() != SexyTokenKind::CloseBrace
        {
            return Err(Diagnostic::new(
                self.lexer.token_start(),
                "'...' must be the last element of a set",
            ));
        }
        self.parse_set_items(vec![first])
    }

    /// Map entries after the first `key: value` pair.
    fn parse_map_tail(&mut self, mut entries: IndexMap<String, Value>) -> Result<Value, Diagnostic> {
        let mut rest = false;
        while self.lexer.token() == SexyTokenKind::Comma {
            self.bump();
            if self.lexer.token() == SexyTokenKind::Ellipsis {
                self.bump();
                rest = true;
                break;
            }
            if self.lexer.token() != SexyTokenKind::Symbol {
                return Err(self.unexpected("a symbol map key"));
            }
            let key = self.lexer.token_value().to_string();
            self.bump();
            if self.lexer.token() != SexyTokenKind::Colon {
                return Err(self.unexpected("':' after map key"));
            }
            self.bump();
            let value = self.parse_datum()?;
            entries.insert(key, value);
        }
        if self.lexer.token() != SexyTokenKind::CloseBrace {
            return Err(self.unexpected("'}'"));
        }
        self.bump();
        Ok(Value::new(ValueKind::Map { entries, rest }))
    }

    /// A whole `{k: v, ...}` block, starting at `{`. Used for metadata.
    fn parse_map_entries(&mut self) -> Result<IndexMap<String, Value>, Diagnostic> {
        self.bump();
        let mut entries = IndexMap::new();
        if self.lexer.token() == SexyTokenKind::CloseBrace {
            self.bump();
            return Ok(entries);
        }
        loop {
            if self.lexer.token() == SexyTokenKind::Ellipsis {
                // An ellipsis in metadata is inert: unmentioned keys are
                // ignored anyway.
                self.bump();
                break;
            }
            if self.lexer.token() != SexyTokenKind::Symbol {
                return Err(self.unexpected("a symbol map key"));
            }
            let key = self.lexer.token_value().to_string();
            self.bump();
            if self.lexer.token() != SexyTokenKind::Colon {
                return Err(self.unexpected("':' after map key"));
            }
            self.bump();
            let value = self.parse_datum()?;
            entries.insert(key, value);
            if self.lexer.token() != SexyTokenKind::Comma {
                break;
            }
            self.bump();
        }
        if self.lexer.token() != SexyTokenKind::CloseBrace {
            return Err(self.unexpected("'}'"));
        }
        self.bump();
        Ok(entries)
    }

    /// Set items after disambiguation, until `}`. A tail `...` sets the
    /// rest flag; anywhere else it is an error.
    fn parse_set_items(&mut self, mut items: Vec<Value>) -> Result<Value, Diagnostic> {
        let mut rest = false;
        loop {
            match self.lexer.token() {
                SexyTokenKind::CloseBrace => {
                    self.bump();
                    return Ok(Value::new(ValueKind::Set { items, rest }));
                }
                SexyTokenKind::EndOfFile => return Err(self.unexpected("'}'")),
                SexyTokenKind::Ellipsis => {
                    self.bump();
                    if self.lexer.token() != SexyTokenKind::CloseBrace {
                        return Err(Diagnostic::new(
                            self.lexer.token_start(),
                            "'...' must be the last element of a set",
                        ));
                    }
                    rest = true;
                }
                _ => {
                    let item = self.parse_datum()?;
                    // Same tail-only rule for a labeled ellipsis, which
                    // parses as a datum instead of a bare token.
                    if matches!(item.kind, ValueKind::Ellipsis)
                        && self.lexer.token() != SexyTokenKind::CloseBrace
                    {
                        return Err(Diagnostic::new(
                            self.lexer.token_start(),
                            "'...' must be the last element of a set",
                        ));
                    }
                    items.push(item);
                }
            }
        }
    }

    /// `[ datum* ]`; ellipsis items stay positional.
    fn parse_array(&mut self) -> Result<Value, Diagnostic> {
        self.bump();
        let mut items = Vec::new();
        loop {
            match self.lexer.token() {
                SexyTokenKind::CloseBracket => {
                    self.bump();
                    return Ok(Value::new(ValueKind::Array(items)));
                }
                SexyTokenKind::EndOfFile => return Err(self.unexpected("']'")),
                _ => items.push(self.parse_datum()?),
            }
        }
    }
}
