//! Zong parser and AST arena for the compiler front end.
//!
//! This crate provides:
//! - `NodeArena` - Arena storage for AST nodes, addressed by `NodeIndex`
//! - `ParserState` - Recursive-descent statement parser with Pratt
//!   binding powers for expressions
//!
//! The parser produces an untyped tree; symbols and types are attached by
//! later stages through side tables keyed by `NodeIndex`.

pub mod parser;

pub use parser::node::{
    BinaryOp, FieldDecl, Node, NodeArena, Param, TypeExpr, TypeExprKind, UnaryOp,
};
pub use parser::{NodeIndex, NodeList, ParserState};
