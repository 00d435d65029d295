//! Type expression conversion and the post-walk resolution pass.

use zong_parser::{TypeExpr, TypeExprKind};
use zong_types::{Builtin, Type, TypeId};

use crate::state::BinderState;

impl BinderState {
    /// Convert a parsed type expression into a canonical `TypeId`.
    ///
    /// Builtins map to their canonical ids; struct names go through the
    /// type table (already populated by the pre-pass, so forward
    /// references land on the canonical entry directly). Unknown names are
    /// reported and poisoned.
    pub(crate) fn convert_type_expr(&mut self, ty: &TypeExpr) -> TypeId {
        match &ty.kind {
            TypeExprKind::Named(name) => {
                if let Some(builtin) = Builtin::by_name(name) {
                    return builtin_id(builtin);
                }
                if let Some(id) = self.table.get(name) {
                    return id;
                }
                self.diagnostics
                    .error(ty.span.start, format!("undefined symbol '{name}'"));
                TypeId::ERROR
            }
            TypeExprKind::Pointer(child) => {
                let child = self.convert_type_expr(child);
                self.types.pointer_to(child)
            }
            TypeExprKind::Slice(child) => {
                let child = self.convert_type_expr(child);
                self.types.slice_of(child)
            }
        }
    }

    /// Splice canonical struct definitions into every recorded type:
    /// symbol types, function signatures, and struct field types. Struct
    /// bodies are re-laid out until sizes stop changing, so by-value uses
    /// of structs declared later in the block still get correct offsets.
    pub(crate) fn finalize_types(&mut self) {
        for i in 0..self.symbols.len() {
            let id = zong_common::SymbolId(i as u32);
            let Some(symbol) = self.symbols.get(id) else {
                continue;
            };
            let ty = symbol.ty;
            let signature = symbol.signature.clone();
            let resolved = self.table.resolve_type(&mut self.types, ty);
            let resolved_signature = signature.map(|mut sig| {
                for param in &mut sig.params {
                    *param = self.table.resolve_type(&mut self.types, *param);
                }
                if let Some(ret) = sig.return_type {
                    sig.return_type = Some(self.table.resolve_type(&mut self.types, ret));
                }
                sig
            });
            if let Some(symbol) = self.symbols.get_mut(id) {
                symbol.ty = resolved;
                symbol.signature = resolved_signature;
            }
        }

        let names: Vec<String> = self
            .table
            .snapshot()
            .map(|(name, _)| name.to_string())
            .collect();
        // Re-layout to a fixpoint, bounded by the table size. By-value
        // cycles never stabilize; the bound keeps them from spinning.
        for _ in 0..names.len().max(1) {
            let mut changed = false;
            for name in &names {
                if self.relayout_struct(name) {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn relayout_struct(&mut self, name: &str) -> bool {
        let Some(id) = self.table.get(name) else {
            return false;
        };
        let Type::Struct(before) = self.types.get(id).clone() else {
            return false;
        };
        let mut fields = Vec::with_capacity(before.fields.len());
        for field in &before.fields {
            let ty = self.table.resolve_type(&mut self.types, field.ty);
            fields.push((field.name.clone(), ty, field.symbol));
        }
        self.table.define_struct(&mut self.types, name, fields);
        let Type::Struct(after) = self.types.get(id) else {
            return false;
        };
        *after != before
    }
}

/// Canonical arena id of a builtin.
const fn builtin_id(builtin: Builtin) -> TypeId {
    match builtin {
        Builtin::I64 => TypeId::I64,
        Builtin::Boolean => TypeId::BOOLEAN,
        Builtin::U8 => TypeId::U8,
    }
}
