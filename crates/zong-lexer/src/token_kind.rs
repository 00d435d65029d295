//! Token vocabulary of the Zong language.

/// Kind of a scanned token.
///
/// Type names are not special-cased here; `I64`, `Boolean`, `U8`, and struct
/// names all arrive as `Identifier` and are classified later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Unknown,
    EndOfFileToken,

    // Literals
    Identifier,
    IntegerLiteral,
    StringLiteral,

    // Keywords
    VarKeyword,
    FuncKeyword,
    StructKeyword,
    ReturnKeyword,
    IfKeyword,
    ElseKeyword,
    LoopKeyword,
    BreakKeyword,
    ContinueKeyword,
    TrueKeyword,
    FalseKeyword,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    ColonToken,
    DotToken,

    // Operators
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    EqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    LessThanToken,
    LessThanEqualsToken,
    GreaterThanToken,
    GreaterThanEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,
    ExclamationToken,
    AmpersandToken,
    BarToken,
}

impl TokenKind {
    /// Keyword lookup for an identifier-shaped lexeme.
    #[must_use]
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "var" => TokenKind::VarKeyword,
            "func" => TokenKind::FuncKeyword,
            "struct" => TokenKind::StructKeyword,
            "return" => TokenKind::ReturnKeyword,
            "if" => TokenKind::IfKeyword,
            "else" => TokenKind::ElseKeyword,
            "loop" => TokenKind::LoopKeyword,
            "break" => TokenKind::BreakKeyword,
            "continue" => TokenKind::ContinueKeyword,
            "true" => TokenKind::TrueKeyword,
            "false" => TokenKind::FalseKeyword,
            _ => return None,
        })
    }

    /// Source text of a fixed-spelling token, for diagnostics.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            TokenKind::Unknown => "<unknown>",
            TokenKind::EndOfFileToken => "end of file",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::VarKeyword => "var",
            TokenKind::FuncKeyword => "func",
            TokenKind::StructKeyword => "struct",
            TokenKind::ReturnKeyword => "return",
            TokenKind::IfKeyword => "if",
            TokenKind::ElseKeyword => "else",
            TokenKind::LoopKeyword => "loop",
            TokenKind::BreakKeyword => "break",
            TokenKind::ContinueKeyword => "continue",
            TokenKind::TrueKeyword => "true",
            TokenKind::FalseKeyword => "false",
            TokenKind::OpenParenToken => "(",
            TokenKind::CloseParenToken => ")",
            TokenKind::OpenBraceToken => "{",
            TokenKind::CloseBraceToken => "}",
            TokenKind::OpenBracketToken => "[",
            TokenKind::CloseBracketToken => "]",
            TokenKind::SemicolonToken => ";",
            TokenKind::CommaToken => ",",
            TokenKind::ColonToken => ":",
            TokenKind::DotToken => ".",
            TokenKind::PlusToken => "+",
            TokenKind::MinusToken => "-",
            TokenKind::AsteriskToken => "*",
            TokenKind::SlashToken => "/",
            TokenKind::PercentToken => "%",
            TokenKind::EqualsToken => "=",
            TokenKind::EqualsEqualsToken => "==",
            TokenKind::ExclamationEqualsToken => "!=",
            TokenKind::LessThanToken => "<",
            TokenKind::LessThanEqualsToken => "<=",
            TokenKind::GreaterThanToken => ">",
            TokenKind::GreaterThanEqualsToken => ">=",
            TokenKind::AmpersandAmpersandToken => "&&",
            TokenKind::BarBarToken => "||",
            TokenKind::ExclamationToken => "!",
            TokenKind::AmpersandToken => "&",
            TokenKind::BarToken => "|",
        }
    }
}
