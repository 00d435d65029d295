//! Pratt expression parsing.
//!
//! Binding powers, low to high: `=` (right-associative), `||`, `&&`,
//! comparisons, additive, multiplicative, prefix `-`/`!`, then the postfix
//! operators (`&`, `*`, `.field`, `[index]`, `(args)`).
//!
//! `*` is both infix multiplication and postfix dereference. After an
//! operand, a `*` followed by a token that can start an expression is
//! multiplication; otherwise it is a dereference. `p* - 1` therefore parses
//! as a multiplication by a negated operand; parenthesize the dereference
//! to get the other reading.

use zong_lexer::TokenKind;

use super::node::{BinaryOp, Node, UnaryOp};
use super::state::ASSIGN_RHS_BP;
use super::{NodeIndex, NodeList, ParserState};

/// Left/right binding powers for an infix operator.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, BinaryOp)> {
    Some(match kind {
        TokenKind::BarBarToken => (4, 5, BinaryOp::Or),
        TokenKind::AmpersandAmpersandToken => (6, 7, BinaryOp::And),
        TokenKind::EqualsEqualsToken => (8, 9, BinaryOp::Eq),
        TokenKind::ExclamationEqualsToken => (8, 9, BinaryOp::Ne),
        TokenKind::LessThanToken => (8, 9, BinaryOp::Lt),
        TokenKind::LessThanEqualsToken => (8, 9, BinaryOp::Le),
        TokenKind::GreaterThanToken => (8, 9, BinaryOp::Gt),
        TokenKind::GreaterThanEqualsToken => (8, 9, BinaryOp::Ge),
        TokenKind::PlusToken => (10, 11, BinaryOp::Add),
        TokenKind::MinusToken => (10, 11, BinaryOp::Sub),
        TokenKind::AsteriskToken => (12, 13, BinaryOp::Mul),
        TokenKind::SlashToken => (12, 13, BinaryOp::Div),
        TokenKind::PercentToken => (12, 13, BinaryOp::Rem),
        _ => return None,
    })
}

/// Binding power of the right operand of a prefix operator.
const PREFIX_BP: u8 = 14;

/// Binding power of the postfix operators.
const POSTFIX_BP: u8 = 16;

/// Binding powers of assignment: lowest, right-associative.
const ASSIGN_LEFT_BP: u8 = 2;
const ASSIGN_RIGHT_BP: u8 = 1;

/// Can `kind` begin an expression? Decides the infix/postfix reading of `*`.
fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::IntegerLiteral
            | TokenKind::StringLiteral
            | TokenKind::TrueKeyword
            | TokenKind::FalseKeyword
            | TokenKind::OpenParenToken
            | TokenKind::MinusToken
            | TokenKind::ExclamationToken
    )
}

impl ParserState {
    pub(crate) fn parse_expression(&mut self, min_bp: u8) -> NodeIndex {
        let mut lhs = self.parse_prefix();

        loop {
            match self.token() {
                TokenKind::EqualsToken => {
                    if ASSIGN_LEFT_BP < min_bp {
                        break;
                    }
                    self.bump();
                    let value = self.parse_expression(ASSIGN_RIGHT_BP);
                    let span = self.arena.get_span(lhs).merge(self.arena.get_span(value));
                    lhs = self.arena.alloc(Node::Assign { target: lhs, value }, span);
                }
                TokenKind::AmpersandToken => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    let span = self.arena.get_span(lhs).merge(self.token_span());
                    self.bump();
                    lhs = self.arena.alloc(
                        Node::Unary {
                            op: UnaryOp::AddressOf,
                            operand: lhs,
                        },
                        span,
                    );
                }
                TokenKind::AsteriskToken if !self.asterisk_is_multiplication() => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    let span = self.arena.get_span(lhs).merge(self.token_span());
                    self.bump();
                    lhs = self.arena.alloc(
                        Node::Unary {
                            op: UnaryOp::Deref,
                            operand: lhs,
                        },
                        span,
                    );
                }
                TokenKind::DotToken => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.bump();
                    let Some((field, field_span)) = self.expect_identifier("field name") else {
                        break;
                    };
                    let span = self.arena.get_span(lhs).merge(field_span);
                    lhs = self
                        .arena
                        .alloc(Node::FieldAccess { object: lhs, field }, span);
                }
                TokenKind::OpenBracketToken => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    self.bump();
                    let index = self.parse_expression(ASSIGN_RHS_BP);
                    let end = self.token_span();
                    self.expect(TokenKind::CloseBracketToken);
                    let span = self.arena.get_span(lhs).merge(end);
                    lhs = self.arena.alloc(Node::Index { object: lhs, index }, span);
                }
                TokenKind::OpenParenToken => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_call(lhs);
                }
                kind => {
                    let Some((left_bp, right_bp, op)) = infix_binding_power(kind) else {
                        break;
                    };
                    if left_bp < min_bp {
                        break;
                    }
                    self.bump();
                    let right = self.parse_expression(right_bp);
                    let span = self.arena.get_span(lhs).merge(self.arena.get_span(right));
                    lhs = self.arena.alloc(
                        Node::Binary {
                            op,
                            left: lhs,
                            right,
                        },
                        span,
                    );
                }
            }
        }

        lhs
    }

    /// Decide the infix/postfix reading of the current `*` by peeking one
    /// token past it.
    fn asterisk_is_multiplication(&mut self) -> bool {
        let snapshot = self.lexer.snapshot();
        let next = self.lexer.scan();
        self.lexer.restore(snapshot);
        starts_expression(next)
    }

    fn parse_prefix(&mut self) -> NodeIndex {
        match self.token() {
            TokenKind::PlusToken => {
                // Unary plus is the identity; fold it away.
                self.bump();
                self.parse_expression(PREFIX_BP)
            }
            TokenKind::MinusToken => {
                let start = self.token_span();
                self.bump();
                let operand = self.parse_expression(PREFIX_BP);
                let span = start.merge(self.arena.get_span(operand));
                // Fold unary minus into the literal, so `-42` is a single
                // integer node.
                if let Some(Node::IntegerLiteral { value }) = self.arena.get(operand) {
                    let value = *value;
                    return self
                        .arena
                        .alloc(Node::IntegerLiteral { value: -value }, span);
                }
                self.arena.alloc(
                    Node::Unary {
                        op: UnaryOp::Neg,
                        operand,
                    },
                    span,
                )
            }
            TokenKind::ExclamationToken => {
                let start = self.token_span();
                self.bump();
                let operand = self.parse_expression(PREFIX_BP);
                let span = start.merge(self.arena.get_span(operand));
                self.arena.alloc(
                    Node::Unary {
                        op: UnaryOp::Not,
                        operand,
                    },
                    span,
                )
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> NodeIndex {
        let span = self.token_span();
        match self.token() {
            TokenKind::IntegerLiteral => {
                let value = self.lexer.token_int();
                self.bump();
                self.arena.alloc(Node::IntegerLiteral { value }, span)
            }
            TokenKind::StringLiteral => {
                let value = self.lexer.token_value().to_string();
                self.bump();
                self.arena.alloc(Node::StringLiteral { value }, span)
            }
            TokenKind::TrueKeyword => {
                self.bump();
                self.arena.alloc(Node::BooleanLiteral { value: true }, span)
            }
            TokenKind::FalseKeyword => {
                self.bump();
                self.arena
                    .alloc(Node::BooleanLiteral { value: false }, span)
            }
            TokenKind::Identifier => {
                let name = self.lexer.token_value().to_string();
                self.bump();
                self.arena.alloc(Node::Identifier { name }, span)
            }
            TokenKind::OpenParenToken => {
                self.bump();
                let inner = self.parse_expression(ASSIGN_RHS_BP);
                self.expect(TokenKind::CloseParenToken);
                inner
            }
            _ => {
                let found = self.token_text();
                self.diagnostics.error(
                    self.token_start(),
                    format!("expected expression, found '{found}'"),
                );
                // Missing-expression placeholder: an integer literal
                // unifies with anything downstream, so one syntax error
                // does not cascade into type errors.
                self.arena.alloc(Node::IntegerLiteral { value: 0 }, span)
            }
        }
    }

    fn parse_call(&mut self, callee: NodeIndex) -> NodeIndex {
        self.bump();
        let mut args = Vec::new();
        if !self.at(TokenKind::CloseParenToken) {
            loop {
                args.push(self.parse_expression(ASSIGN_RHS_BP));
                if !self.eat(TokenKind::CommaToken) {
                    break;
                }
            }
        }
        let end = self.token_span();
        self.expect(TokenKind::CloseParenToken);
        let span = self.arena.get_span(callee).merge(end);
        self.arena.alloc(
            Node::Call {
                callee,
                args: NodeList::new(args),
            },
            span,
        )
    }
}
