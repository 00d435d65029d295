//! `ParserState` - parser core, statement parsing, and error recovery.

use tracing::debug;
use zong_common::{DiagnosticBag, Span};
use zong_lexer::{LexerState, TokenKind};

use super::node::{FieldDecl, Node, NodeArena, Param};
use super::{NodeIndex, NodeList};

/// Recursive-descent parser over a one-token lookahead.
///
/// The parser never aborts: every syntax error is recorded in the
/// diagnostic bag, the token stream is resynchronized at the next `;` or
/// closing brace, and parsing continues so one run surfaces every error.
pub struct ParserState {
    pub(crate) lexer: LexerState,
    pub(crate) arena: NodeArena,
    pub(crate) diagnostics: DiagnosticBag,
}

impl ParserState {
    #[must_use]
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        let mut parser = Self {
            lexer: LexerState::new(source),
            arena: NodeArena::new(),
            diagnostics: DiagnosticBag::new(),
        };
        parser.lexer.scan();
        parser.drain_lexer_diagnostics();
        parser
    }

    /// Parse a whole program: `Stmt*` until end of input.
    pub fn parse_program(&mut self) -> NodeIndex {
        let start = self.token_span();
        let mut statements = Vec::new();
        while !self.at(TokenKind::EndOfFileToken) {
            let before = self.token_start();
            statements.push(self.parse_statement());
            // A statement that consumed nothing would loop forever; skip the
            // offending token and resynchronize.
            if self.token_start() == before && !self.at(TokenKind::EndOfFileToken) {
                self.bump();
                self.synchronize();
            }
        }
        let span = start.merge(self.token_span());
        debug!(statements = statements.len(), "parsed program");
        self.arena.alloc(
            Node::Program {
                statements: NodeList::new(statements),
            },
            span,
        )
    }

    /// Parse a single expression and require the input to end there.
    /// Entry point for expression-only inputs.
    pub fn parse_expression_entry(&mut self) -> NodeIndex {
        let expr = self.parse_expression(0);
        if !self.at(TokenKind::EndOfFileToken) {
            let found = self.token_text();
            self.diagnostics.error(
                self.token_start(),
                format!("unexpected token '{found}' after expression"),
            );
        }
        expr
    }

    #[must_use]
    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Take the arena out of the parser once parsing is complete.
    #[must_use]
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    #[must_use]
    pub fn get_diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    // Token plumbing

    #[must_use]
    pub(crate) fn token(&self) -> TokenKind {
        self.lexer.token()
    }

    pub(crate) fn token_start(&self) -> u32 {
        self.lexer.token_start()
    }

    pub(crate) fn token_span(&self) -> Span {
        Span::new(self.lexer.token_start(), self.lexer.token_end())
    }

    /// Display text for the current token, for diagnostics.
    pub(crate) fn token_text(&self) -> String {
        match self.token() {
            TokenKind::Identifier | TokenKind::IntegerLiteral => {
                self.lexer.token_value().to_string()
            }
            TokenKind::StringLiteral => format!("\"{}\"", self.lexer.token_value()),
            other => other.text().to_string(),
        }
    }

    pub(crate) fn bump(&mut self) {
        self.lexer.scan();
        self.drain_lexer_diagnostics();
    }

    fn drain_lexer_diagnostics(&mut self) {
        let lexed = self.lexer.take_diagnostics();
        self.diagnostics.absorb(lexed);
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.token() == kind
    }

    /// Consume the current token if it matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or report `expected X, found Y`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self.token_text();
        self.diagnostics.error(
            self.token_start(),
            format!("expected '{}', found '{found}'", kind.text()),
        );
        false
    }

    /// Skip tokens until just past the next `;`, or until a closing brace
    /// or end of input. Called after a syntax error.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.token() {
                TokenKind::SemicolonToken => {
                    self.bump();
                    return;
                }
                TokenKind::CloseBraceToken | TokenKind::EndOfFileToken => return,
                _ => self.bump(),
            }
        }
    }

    /// Expect an identifier and return its spelling.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> Option<(String, Span)> {
        if self.at(TokenKind::Identifier) {
            let name = self.lexer.token_value().to_string();
            let span = self.token_span();
            self.bump();
            Some((name, span))
        } else {
            let found = self.token_text();
            self.diagnostics.error(
                self.token_start(),
                format!("expected {what}, found '{found}'"),
            );
            None
        }
    }

    // Statements

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        match self.token() {
            TokenKind::VarKeyword => self.parse_var_decl(),
            TokenKind::FuncKeyword => self.parse_func_decl(),
            TokenKind::StructKeyword => self.parse_struct_decl(),
            TokenKind::IfKeyword => self.parse_if(),
            TokenKind::LoopKeyword => self.parse_loop(),
            TokenKind::OpenBraceToken => self.parse_block(),
            TokenKind::BreakKeyword => {
                let span = self.token_span();
                self.bump();
                self.expect_semicolon();
                self.arena.alloc(Node::Break, span)
            }
            TokenKind::ContinueKeyword => {
                let span = self.token_span();
                self.bump();
                self.expect_semicolon();
                self.arena.alloc(Node::Continue, span)
            }
            TokenKind::ReturnKeyword => self.parse_return(),
            _ => {
                let expr = self.parse_expression(0);
                self.expect_semicolon();
                expr
            }
        }
    }

    fn expect_semicolon(&mut self) {
        if !self.expect(TokenKind::SemicolonToken) {
            self.synchronize();
        }
    }

    /// `VarDecl := "var" Ident ":"? Type ("=" Expr)? ";"`
    ///
    /// The colon after the name is optional; both `var p: Point` and
    /// `var p Point` are accepted.
    fn parse_var_decl(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let Some((name, _)) = self.expect_identifier("variable name") else {
            self.synchronize();
            return self.arena.alloc(
                Node::Block {
                    statements: NodeList::default(),
                },
                start,
            );
        };
        self.eat(TokenKind::ColonToken);
        let Some(ty) = self.parse_type() else {
            self.synchronize();
            return self.arena.alloc(
                Node::Block {
                    statements: NodeList::default(),
                },
                start,
            );
        };
        let init = if self.eat(TokenKind::EqualsToken) {
            self.parse_expression(ASSIGN_RHS_BP)
        } else {
            NodeIndex::NONE
        };
        let span = start.merge(self.token_span());
        self.expect_semicolon();
        self.arena.alloc(Node::VarDecl { name, ty, init }, span)
    }

    /// `FuncDecl := "func" Ident "(" Params? ")" (":" Type)? Block`
    fn parse_func_decl(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let name = match self.expect_identifier("function name") {
            Some((name, _)) => name,
            None => {
                self.synchronize();
                return self.arena.alloc(
                    Node::Block {
                        statements: NodeList::default(),
                    },
                    start,
                );
            }
        };
        self.expect(TokenKind::OpenParenToken);
        let mut params = Vec::new();
        if !self.at(TokenKind::CloseParenToken) {
            loop {
                if let Some((param_name, span)) = self.expect_identifier("parameter name") {
                    self.eat(TokenKind::ColonToken);
                    if let Some(ty) = self.parse_type() {
                        params.push(Param {
                            name: param_name,
                            ty,
                            span,
                        });
                    }
                } else {
                    break;
                }
                if !self.eat(TokenKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParenToken);
        let return_type = if self.eat(TokenKind::ColonToken) {
            self.parse_type()
        } else {
            None
        };
        let body = self.parse_block();
        let span = start.merge(self.arena.get_span(body));
        debug!(func = %name, params = params.len(), "parsed function declaration");
        self.arena.alloc(
            Node::Func {
                name,
                params,
                return_type,
                body,
            },
            span,
        )
    }

    /// `StructDecl := "struct" Ident "(" Fields ")" ";"`
    fn parse_struct_decl(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let name = match self.expect_identifier("struct name") {
            Some((name, _)) => name,
            None => {
                self.synchronize();
                return self.arena.alloc(
                    Node::Block {
                        statements: NodeList::default(),
                    },
                    start,
                );
            }
        };
        self.expect(TokenKind::OpenParenToken);
        let mut fields = Vec::new();
        if !self.at(TokenKind::CloseParenToken) {
            loop {
                if let Some((field_name, span)) = self.expect_identifier("field name") {
                    self.eat(TokenKind::ColonToken);
                    if let Some(ty) = self.parse_type() {
                        fields.push(FieldDecl {
                            name: field_name,
                            ty,
                            span,
                        });
                    }
                } else {
                    break;
                }
                if !self.eat(TokenKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParenToken);
        let span = start.merge(self.token_span());
        self.expect_semicolon();
        self.arena.alloc(Node::StructDecl { name, fields }, span)
    }

    /// `If := "if" Expr Block ("else" (If | Block))?`
    fn parse_if(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let condition = self.parse_expression(ASSIGN_RHS_BP);
        let then_block = self.parse_block();
        let else_block = if self.eat(TokenKind::ElseKeyword) {
            if self.at(TokenKind::IfKeyword) {
                self.parse_if()
            } else {
                self.parse_block()
            }
        } else {
            NodeIndex::NONE
        };
        let end = if else_block.is_some() {
            self.arena.get_span(else_block)
        } else {
            self.arena.get_span(then_block)
        };
        self.arena.alloc(
            Node::If {
                condition,
                then_block,
                else_block,
            },
            start.merge(end),
        )
    }

    /// `Loop := "loop" Block`
    fn parse_loop(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let body = self.parse_block();
        let span = start.merge(self.arena.get_span(body));
        self.arena.alloc(Node::Loop { body }, span)
    }

    /// `Return := "return" Expr? ";"`
    fn parse_return(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.bump();
        let value = if self.at(TokenKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression(ASSIGN_RHS_BP)
        };
        let span = start.merge(self.token_span());
        self.expect_semicolon();
        self.arena.alloc(Node::Return { value }, span)
    }

    /// `Block := "{" Stmt* "}"`
    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start = self.token_span();
        self.expect(TokenKind::OpenBraceToken);
        let mut statements = Vec::new();
        while !self.at(TokenKind::CloseBraceToken) && !self.at(TokenKind::EndOfFileToken) {
            let before = self.token_start();
            statements.push(self.parse_statement());
            if self.token_start() == before {
                self.bump();
                self.synchronize();
            }
        }
        let span = start.merge(self.token_span());
        self.expect(TokenKind::CloseBraceToken);
        self.arena.alloc(
            Node::Block {
                statements: NodeList::new(statements),
            },
            span,
        )
    }
}

/// Binding power used when an expression position cannot be an assignment
/// (initializers, conditions, return values, call arguments).
pub(crate) const ASSIGN_RHS_BP: u8 = 3;
