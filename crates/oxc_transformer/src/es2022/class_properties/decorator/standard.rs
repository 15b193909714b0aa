//! Standard (stage-3) decorators (`spec.md` §4.7 points 1-7).

use oxc_ast::ast::*;
use oxc_span::SPAN;
use oxc_syntax::symbol::SymbolFlags;
use oxc_traverse::{BoundIdentifier, TraverseCtx};

use super::super::bindings::read;
use super::super::utils::call_helper;
use super::super::{ClassProperties, LowerClassContext};
use super::{element_flags, ElementKind};

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Allocate (once per class) the `__decoratorStart` context temp
    /// (`spec.md` §4.7 point 1): `ctxRef = __decoratorStart(extendsRef ?? null)`.
    pub(in super::super) fn ensure_decorator_context(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> BoundIdentifier<'a> {
        if let Some(existing) = &class_ctx.decorator_context_ref {
            return existing.clone();
        }
        let temp = ctx.generate_uid_in_current_scope("initClass", SymbolFlags::FunctionScopedVariable);

        let parent = match &class_ctx.extends_ref {
            Some(extends_ref) => read(extends_ref, ctx),
            None => ctx.ast.expression_null_literal(SPAN),
        };
        let call = call_helper(ctx, SPAN, "__decoratorStart", oxc_allocator::vec![ctx, parent]);
        let init = ctx.ast.expression_assignment(
            SPAN,
            oxc_syntax::operator::AssignmentOperator::Assign,
            temp.create_target_for_assignment(ctx),
            call,
        );
        // Must be the first suffix expression emitted (`spec.md` §4.9 point 1);
        // the emitter is responsible for ordering `private_members` etc. after
        // this, so we only stash the init statement on the context temp's
        // binding site here and let the emitter read `decorator_context_ref`
        // to know a `__decoratorStart` prefix is owed.
        class_ctx.decorator_context_ref = Some(temp.clone());
        class_ctx.decorator_start_init = Some(init);
        temp
    }

    /// `__decorateElement(ctx, flags, keyOrName, decoratorsArrayRef, target, …extras)`
    /// (`spec.md` §4.7 point 2), bucketed into the four fixed-order lists
    /// (point 3).
    #[allow(clippy::too_many_arguments)]
    pub(in super::super) fn push_standard_element_decorator(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        kind: ElementKind,
        is_static: bool,
        is_private: bool,
        key_or_name: Expression<'a>,
        decorators_ref: Expression<'a>,
        target: Expression<'a>,
        extras: Vec<Expression<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let ctx_ref = self.ensure_decorator_context(class_ctx, ctx);
        let flags_value = element_flags(kind, is_static, is_private);
        let flags_lit = ctx.ast.expression_numeric_literal(
            SPAN,
            f64::from(flags_value),
            None,
            oxc_syntax::number::NumberBase::Decimal,
        );

        let mut args = ctx.ast.vec_with_capacity(5 + extras.len());
        args.push(read(&ctx_ref, ctx));
        args.push(flags_lit);
        args.push(key_or_name);
        args.push(decorators_ref);
        args.push(target);
        args.extend(extras);

        let call = call_helper(ctx, SPAN, "__decorateElement", args);

        let is_field = matches!(kind, ElementKind::Field | ElementKind::AutoAccessor);
        tracing::debug!(?kind, is_static, is_private, is_field, "bucketed stage-3 decorator element");
        match (is_static, is_field) {
            (true, false) => class_ctx.decorator_static_non_field_elements.push(call),
            (false, false) => class_ctx.decorator_instance_non_field_elements.push(call),
            (true, true) => class_ctx.decorator_static_field_elements.push(call),
            (false, true) => class_ctx.decorator_instance_field_elements.push(call),
        }
    }

    /// `__runInitializers(ctx, flag, target[, init])`
    /// (`spec.md` §4.7 point 4): `flag` encodes pre/post-initializer and the
    /// per-class sequential initializer index.
    pub(in super::super) fn run_initializers_call(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        target: Expression<'a>,
        init: Option<Expression<'a>>,
        is_pre: bool,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let ctx_ref = self.ensure_decorator_context(class_ctx, ctx);
        let flag = class_ctx.next_initializer_flag(is_pre);
        let flag_lit = ctx.ast.expression_numeric_literal(SPAN, f64::from(flag), None, oxc_syntax::number::NumberBase::Decimal);

        let mut args = ctx.ast.vec_with_capacity(4);
        args.push(read(&ctx_ref, ctx));
        args.push(flag_lit);
        args.push(target);
        if let Some(init) = init {
            args.push(init);
        }
        call_helper(ctx, SPAN, "__runInitializers", args)
    }

    /// Fixed per-stage extra-initializer calls (`spec.md` §4.7 point 5):
    /// `__runInitializers(ctx, 5, this)`,
    /// `__runInitializers(ctx, 3, CLS)`,
    /// `__runInitializers(ctx, 1, CLS)`.
    pub(in super::super) fn extra_initializers_call(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        flag: u32,
        target: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let ctx_ref = self.ensure_decorator_context(class_ctx, ctx);
        let flag_lit = ctx.ast.expression_numeric_literal(SPAN, f64::from(flag), None, oxc_syntax::number::NumberBase::Decimal);
        call_helper(ctx, SPAN, "__runInitializers", oxc_allocator::vec![ctx, read(&ctx_ref, ctx), flag_lit, target])
    }

    /// Class-level decorator application and reassignment
    /// (`spec.md` §4.7 point 3): `CLS = __decorateElement(ctx, 0, name, classDecorators, CLS)`.
    pub(in super::super) fn standard_class_decorator_assignment(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        name: Expression<'a>,
        decorators_ref: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let ctx_ref = self.ensure_decorator_context(class_ctx, ctx);
        let class_read = read(self.get_temp_binding(ctx), ctx);
        let zero = ctx.ast.expression_numeric_literal(SPAN, 0.0, None, oxc_syntax::number::NumberBase::Decimal);
        let call = call_helper(
            ctx,
            SPAN,
            "__decorateElement",
            oxc_allocator::vec![ctx, read(&ctx_ref, ctx), zero, name, decorators_ref, class_read],
        );
        let target = self.get_temp_binding(ctx).create_target_for_assignment(ctx);
        ctx.ast.expression_assignment(SPAN, oxc_syntax::operator::AssignmentOperator::Assign, target, call)
    }

    /// `__decoratorMetadata(ctx, CLS)` (`spec.md` §4.7 point 6): emitted when
    /// any element is decorated but the class itself isn't.
    pub(in super::super) fn decorator_metadata_call(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let ctx_ref = self.ensure_decorator_context(class_ctx, ctx);
        let class_read = read(self.get_temp_binding(ctx), ctx);
        call_helper(ctx, SPAN, "__decoratorMetadata", oxc_allocator::vec![ctx, read(&ctx_ref, ctx), class_read])
    }
}
