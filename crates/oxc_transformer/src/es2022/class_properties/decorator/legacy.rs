//! TypeScript experimental decorators (`spec.md` §4.7 "TypeScript
//! experimental decorators").
//!
//! Each decorated member produces one
//! `__decorateClass(decoratorList, target, key, descriptorKind)` call;
//! instance calls all precede static calls; a decorated class itself
//! produces a final `CLS = __decorateClass([d1,...], CLS)` reassignment.

use oxc_ast::ast::*;
use oxc_span::SPAN;
use oxc_traverse::TraverseCtx;

use super::super::utils::call_helper;
use super::super::{ClassProperties, LowerClassContext};

/// `descriptorKind` argument: `1` for methods/accessors, `2` for plain
/// fields (`spec.md` §4.7).
#[derive(Clone, Copy)]
pub(in super::super) enum DescriptorKind {
    MethodOrAccessor = 1,
    Field = 2,
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Build and record one member's `__decorateClass` call
    /// (`spec.md` §4.7).
    pub(in super::super) fn push_legacy_member_decorator(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
        is_static: bool,
        key: Expression<'a>,
        descriptor_kind: DescriptorKind,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let decorator_array = decorator_array_expression(decorators, Vec::new(), ctx);
        let target = self.legacy_target_expression(is_static, ctx);
        let kind_lit = ctx.ast.expression_numeric_literal(
            SPAN,
            descriptor_kind as u8 as f64,
            None,
            oxc_syntax::number::NumberBase::Decimal,
        );
        let call = call_helper(
            ctx,
            SPAN,
            "__decorateClass",
            oxc_allocator::vec![ctx, decorator_array, target, key, kind_lit],
        );
        if is_static {
            class_ctx.static_experimental_decorators.push(call);
        } else {
            class_ctx.instance_experimental_decorators.push(call);
        }
    }

    /// `CLS` / `CLS.prototype` for legacy-decorator target arguments
    /// (`spec.md` §4.7: "target is CLS for static or CLS.prototype for
    /// instance").
    fn legacy_target_expression(&mut self, is_static: bool, ctx: &mut TraverseCtx<'a>) -> Expression<'a> {
        let class_read = super::super::bindings::read(self.get_temp_binding(ctx), ctx);
        if is_static {
            return class_read;
        }
        let prototype = ctx.ast.identifier_name(SPAN, "prototype");
        ctx.ast.member_expression_static(SPAN, class_read, prototype, false).into()
    }

    /// Class-level experimental decorators: `CLS = __decorateClass([d1,…,
    /// …paramDecs], CLS)` (`spec.md` §4.7). `param_decorators` holds the
    /// `__decorateParam(i, dec)` calls collected from the constructor's own
    /// decorated parameters (`spec.md` §4.6 "merge per-parameter decorator
    /// calls into ... the class's decorator list"); appended after the
    /// class's own decorator expressions.
    pub(in super::super) fn legacy_class_decorator_assignment(
        &mut self,
        decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
        param_decorators: Vec<Expression<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let decorator_array = decorator_array_expression(decorators, param_decorators, ctx);
        let class_read = super::super::bindings::read(self.get_temp_binding(ctx), ctx);
        let call = call_helper(ctx, SPAN, "__decorateClass", oxc_allocator::vec![ctx, decorator_array, class_read]);
        let target = self.get_temp_binding(ctx).create_target_for_assignment(ctx);
        ctx.ast.expression_assignment(SPAN, oxc_syntax::operator::AssignmentOperator::Assign, target, call)
    }

    /// `__decorateParam(i, dec)`, one call per decorator on a decorated
    /// constructor parameter (`spec.md` §4.6, §6).
    pub(in super::super) fn decorate_param_call(
        &mut self,
        index: u32,
        decorator: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let index_lit =
            ctx.ast.expression_numeric_literal(SPAN, f64::from(index), None, oxc_syntax::number::NumberBase::Decimal);
        call_helper(ctx, SPAN, "__decorateParam", oxc_allocator::vec![ctx, index_lit, decorator])
    }
}

fn decorator_array_expression<'a>(
    decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
    param_decorators: Vec<Expression<'a>>,
    ctx: &mut TraverseCtx<'a>,
) -> Expression<'a> {
    let mut elements = ctx.ast.vec_from_iter(decorators.into_iter().map(|d| ArrayExpressionElement::from(d.expression)));
    elements.extend(param_decorators.into_iter().map(ArrayExpressionElement::from));
    ctx.ast.expression_array(SPAN, elements)
}
