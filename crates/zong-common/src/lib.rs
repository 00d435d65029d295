//! Common types and utilities for the Zong compiler front end.
//!
//! This crate provides foundational types used across all zong crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics - collected per stage, never thrown
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag};

// Cross-stage identifiers
pub mod ids;
pub use ids::SymbolId;
