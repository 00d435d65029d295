//! Type algebra, layout, and the struct type table for the Zong compiler.
//!
//! This crate provides:
//! - `Type` - The tagged type variant (builtins, pointers, slices, structs)
//! - `TypeArena` - Arena storage addressed by `TypeId`, with canonical ids
//!   for the primitives
//! - `TypeTable` - Per-pipeline store of declared structs, with forward
//!   reference resolution

pub mod arena;
pub mod table;
pub mod type_def;

pub use arena::TypeArena;
pub use table::TypeTable;
pub use type_def::{Builtin, StructField, StructType, Type, TypeId};
