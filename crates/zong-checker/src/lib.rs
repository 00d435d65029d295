//! Type checker for the Zong compiler.
//!
//! This crate is organized into:
//! - `context` - `CheckerState` and type unification
//! - `statements` - Statement checking
//! - `expr` - Expression type inference
//!
//! The checker runs bottom-up over a resolved AST, filling a per-node type
//! table. It owns its own diagnostic bag, separate from the binder's, and
//! tolerates unresolved identifiers by giving them the poison type.

pub mod context;
mod expr;
mod statements;

pub use context::CheckerState;
