//! Zong tokenizer for the compiler front end.
//!
//! This crate provides:
//! - `TokenKind` - The token vocabulary of the language
//! - `LexerState` - A single-call `scan()` tokenizer over a NUL-terminated
//!   byte buffer

pub mod lexer_impl;
pub mod token_kind;

pub use lexer_impl::{LexerSnapshot, LexerState};
pub use token_kind::TokenKind;
