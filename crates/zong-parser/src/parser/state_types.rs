//! Type expression parsing.
//!
//! `Type := TypeAtom ("*" | "[" "]")*` where the atom is a plain
//! identifier. Postfix markers apply left to right: `I64*[]` is a slice of
//! pointers to `I64`.

use zong_lexer::TokenKind;

use super::ParserState;
use super::node::{TypeExpr, TypeExprKind};

impl ParserState {
    /// Parse a type expression, or report `expected type name` and return
    /// `None` so the caller can resynchronize.
    pub(crate) fn parse_type(&mut self) -> Option<TypeExpr> {
        if !self.at(TokenKind::Identifier) {
            let found = self.token_text();
            self.diagnostics.error(
                self.token_start(),
                format!("expected type name, found '{found}'"),
            );
            return None;
        }
        let name = self.lexer.token_value().to_string();
        let span = self.token_span();
        self.bump();
        let mut ty = TypeExpr {
            kind: TypeExprKind::Named(name),
            span,
        };
        loop {
            if self.eat(TokenKind::AsteriskToken) {
                ty = TypeExpr {
                    kind: TypeExprKind::Pointer(Box::new(ty)),
                    span,
                };
            } else if self.at(TokenKind::OpenBracketToken) {
                self.bump();
                self.expect(TokenKind::CloseBracketToken);
                ty = TypeExpr {
                    kind: TypeExprKind::Slice(Box::new(ty)),
                    span,
                };
            } else {
                return Some(ty);
            }
        }
    }
}
