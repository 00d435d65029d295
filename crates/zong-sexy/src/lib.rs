//! Sexy: an S-expression dialect with labels, metadata, and wildcards.
//!
//! Sexy patterns assert on compiler intermediate representations inside
//! literate Markdown test files. The dialect has five containers (lists,
//! maps, sets, arrays, and metadata maps on lists), an ellipsis wildcard
//! whose meaning depends on the container, and labels that constrain two
//! positions to hold structurally equal subtrees.
//!
//! This crate provides:
//! - `parse` - Source text to `Value`
//! - `match_value` / `is_match` - Pattern against value, with a path and
//!   reason on mismatch
//! - `format` - Canonical rendering; `parse(format(v))` round-trips for
//!   any value free of pattern-only constructs

pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod printer;
pub mod value;

pub use matcher::{MatchError, PathStep, is_match, match_value};
pub use parser::parse;
pub use printer::format;
pub use value::{Value, ValueKind};
