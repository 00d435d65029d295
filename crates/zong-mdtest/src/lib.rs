//! Literate Markdown tests for the Zong front end.
//!
//! A test file is ordinary Markdown. Each test is a heading beginning with
//! `Test: `, followed by one input fence (` ```zong-expr ` or
//! ` ```zong-program `) and one or more assertion fences (` ```ast `,
//! ` ```ast-sym `, ` ```types `). Assertions are Sexy patterns matched
//! against the front end's output for the stage the fence names, or, when
//! the stage reported errors, expected error text.
//!
//! This crate provides:
//! - `extract` - Markdown to `TestCase`s
//! - `render` - AST / symbol / type-table projections into Sexy values
//! - `runner` - Executes cases and aggregates a `Report`

pub mod extract;
pub mod render;
pub mod report;
pub mod runner;

pub use extract::{Assertion, AssertionKind, InputKind, TestCase, extract_tests};
pub use report::{Report, TestOutcome, TestStatus};
pub use runner::{run_dir, run_file, run_test};
