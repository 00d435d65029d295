//! Name binder for the Zong compiler.
//!
//! This crate provides:
//! - `BinderState` - Scope construction and name resolution over the AST
//! - `SymbolArena` / `Symbol` - Symbol storage and lookup
//! - The persistent scope tree (`Scope`, `ScopeId`)
//!
//! Binding is a single in-order walk with a per-block pre-pass that
//! registers struct and function declarations first, so mutual recursion
//! and forward type references resolve without a separate pass.

pub mod state;
mod state_binding;
mod state_resolution;
pub mod symbols;

pub use state::BinderState;
pub use symbols::{FunctionSignature, Scope, ScopeId, Symbol, SymbolArena, SymbolKind};
pub use zong_common::SymbolId;
