//! Name Capture (`spec.md` §4.4).
//!
//! Decides what identifier the emitter uses to refer to "the class, from
//! outside its own body" once side effects have been relocated there, and
//! makes sure an anonymous class gets a name when one is required (a
//! decorated `export default class {}`, or a class expression whose name
//! needs to be captured into a surrounding sequence expression).

use oxc_ast::ast::*;
use oxc_span::SPAN;
use oxc_syntax::symbol::SymbolFlags;
use oxc_traverse::{BoundIdentifier, TraverseCtx};

use super::{ClassKind, ClassProperties, LowerClassContext};

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Ensure `class` has a name binding, generating `class0`-style one if
    /// it's anonymous and something downstream needs to reference it by name
    /// (stage-3 `__decoratorMetadata`, or hoisted computed keys/decorators
    /// that must read the class before its declaration completes).
    pub(super) fn ensure_class_name(
        &mut self,
        class: &mut Class<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> BoundIdentifier<'a> {
        if let Some(id) = &class.id {
            if let Some(symbol_id) = id.symbol_id() {
                return BoundIdentifier::new(id.name.clone(), symbol_id);
            }
        }

        let binding = ctx.generate_uid_in_current_scope("class", SymbolFlags::Class);
        let ident = ctx.ast.binding_identifier(SPAN, binding.name.clone());
        class.id = Some(ident);
        binding
    }

    /// Whether the lowered form needs an outer binding distinct from the
    /// class's own inner name — true once anything was relocated outside the
    /// body for a class statement (`spec.md` §4.9 point 12, §8 property 8).
    pub(super) fn needs_outer_binding(&self, class_ctx: &LowerClassContext<'a>) -> bool {
        matches!(class_ctx.kind, ClassKind::Stmt | ClassKind::ExportStmt | ClassKind::ExportDefaultStmt)
            && class_ctx.inner_name_escaped
    }
}
