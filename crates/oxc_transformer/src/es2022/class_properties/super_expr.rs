//! Super-access rewrites (`spec.md` §4.2).
//!
//! Applies only inside code that has been relocated outside the class body
//! (today: static property initializers, via [`super::static_prop`]'s
//! visitor). `super` has no binding out there, so every form is rewritten
//! through `__superGet`/`__superSet`/`__superWrapper`.

use oxc_ast::ast::*;
use oxc_span::Span;
use oxc_syntax::operator::AssignmentOperator;
use oxc_traverse::TraverseCtx;

use super::utils::{call_helper, string_literal};
use super::ClassProperties;

/// The `CLS` argument passed to every `__super*` helper call: the inner
/// class name in static context, `InnerClassName.prototype` otherwise
/// (`spec.md` §4.2).
pub(super) fn class_ref_for_super<'a>(
    class_properties: &mut ClassProperties<'a, '_>,
    span: Span,
    is_static_context: bool,
    ctx: &mut TraverseCtx<'a>,
) -> Expression<'a> {
    let class_temp = class_properties.get_temp_binding(ctx);
    let name_read = class_temp.create_spanned_read_expression(span, ctx);
    if is_static_context {
        return name_read;
    }
    let prototype = ctx.ast.identifier_name(span, "prototype");
    ctx.ast.member_expression_static(span, name_read, prototype, false).into()
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// `super.p` / `super[e]` read (`spec.md` §4.2).
    pub(super) fn transform_super_get(
        &mut self,
        span: Span,
        key: Expression<'a>,
        is_static_context: bool,
        this_expr: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let cls = class_ref_for_super(self, span, is_static_context, ctx);
        call_helper(ctx, span, "__superGet", oxc_allocator::vec![ctx, cls, this_expr, key])
    }

    /// `super.p = v` (`spec.md` §4.2).
    pub(super) fn transform_super_set(
        &mut self,
        span: Span,
        key: Expression<'a>,
        value: Expression<'a>,
        is_static_context: bool,
        this_expr: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let cls = class_ref_for_super(self, span, is_static_context, ctx);
        call_helper(ctx, span, "__superSet", oxc_allocator::vec![ctx, cls, this_expr, key, value])
    }

    /// `super.p OP= v` → `__superSet(CLS, this, K, __superGet(CLS, this, K) OP v)`,
    /// capturing the key `K` at most twice (`spec.md` §4.2).
    pub(super) fn transform_super_compound_assignment(
        &mut self,
        span: Span,
        key: Expression<'a>,
        operator: AssignmentOperator,
        rhs: Expression<'a>,
        is_static_context: bool,
        this_expr: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let (key_a, key_b) = self.duplicate_target_at_most_twice(key, span, ctx);
        let this_a = ctx.ast.copy(&this_expr);
        let current = self.transform_super_get(span, key_a, is_static_context, this_a, ctx);
        let binary_operator = operator
            .to_binary_operator()
            .expect("compound assignment operator must map to a binary operator");
        let combined = ctx.ast.expression_binary(span, current, binary_operator, rhs);
        self.transform_super_set(span, key_b, combined, is_static_context, this_expr, ctx)
    }

    /// `super.p(args)` → `__superGet(CLS, this, 'p').call(this, args)`
    /// (`spec.md` §4.2).
    pub(super) fn transform_super_call(
        &mut self,
        span: Span,
        key: Expression<'a>,
        is_static_context: bool,
        this_expr: Expression<'a>,
        arguments: oxc_allocator::Vec<'a, Argument<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let this_for_call = ctx.ast.copy(&this_expr);
        let getter = self.transform_super_get(span, key, is_static_context, this_expr, ctx);
        let call_name = ctx.ast.identifier_name(span, "call");
        let callee = ctx.ast.member_expression_static(span, getter, call_name, false);
        let mut full_args = ctx.ast.vec_with_capacity(arguments.len() + 1);
        full_args.push(Argument::from(this_for_call));
        full_args.extend(arguments);
        ctx.ast.expression_call(span, Expression::from(callee), NONE, full_args, false)
    }

    /// Super access as a destructuring-assignment target
    /// → `__superWrapper(CLS, this, K)._` (`spec.md` §4.2).
    pub(super) fn transform_super_destructuring_target(
        &mut self,
        span: Span,
        key: Expression<'a>,
        is_static_context: bool,
        this_expr: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let cls = class_ref_for_super(self, span, is_static_context, ctx);
        let wrapper = call_helper(ctx, span, "__superWrapper", oxc_allocator::vec![ctx, cls, this_expr, key]);
        let underscore = ctx.ast.identifier_name(span, "_");
        ctx.ast.member_expression_static(span, wrapper, underscore, false).into()
    }

    /// Build the string-literal key argument for a non-computed `super.p`
    /// access (`spec.md` §4.2: `super.p` → key is the string `"p"`).
    pub(super) fn super_key_from_name(&self, span: Span, name: &str, ctx: &mut TraverseCtx<'a>) -> Expression<'a> {
        string_literal(ctx, span, name)
    }

    /// Entry point called by [`super::static_prop`]'s visitor whenever it
    /// finds a plain `super.p` / `super[e]` read in a relocated static
    /// initializer. Call/assignment/update forms are unwrapped by the
    /// visitor's other match arms before reaching here, the same way
    /// [`Self::transform_private_field_expression`] is the plain-read entry
    /// point for private fields.
    ///
    /// `this_expr` is always a read of the class temp here: within a static
    /// initializer `this` *is* the class itself, so the same substitution
    /// `spec.md` §4.2 describes for "`this` replaced by `InnerClassName`
    /// when the enclosing context is a lowered static field initializer"
    /// applies uniformly.
    pub(super) fn transform_super_member_read_in_static_initializer(
        &mut self,
        expr: &mut Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let span = expr.span();
        let key = match expr {
            Expression::StaticMemberExpression(member) if matches!(member.object, Expression::Super(_)) => {
                self.super_key_from_name(member.property.span, &member.property.name, ctx)
            }
            Expression::ComputedMemberExpression(member) if matches!(member.object, Expression::Super(_)) => {
                ctx.ast.move_expression(&mut member.expression)
            }
            _ => return,
        };
        let this_temp = self.get_temp_binding(ctx);
        let this_expr = this_temp.create_spanned_read_expression(span, ctx);
        *expr = self.transform_super_get(span, key, true, this_expr, ctx);
    }

    /// Entry point for `super.p(args)` / `super[e](args)` calls found while
    /// transforming a relocated static initializer. Must run *before*
    /// [`Self::transform_super_member_read_in_static_initializer`] would
    /// otherwise see the callee in isolation and rewrite it as a plain read,
    /// losing the `this` binding the call form requires.
    pub(super) fn transform_super_call_in_static_initializer(
        &mut self,
        expr: &mut Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let Expression::CallExpression(call) = expr else { return };
        let is_super_callee = matches!(
            &call.callee,
            Expression::StaticMemberExpression(m) if matches!(m.object, Expression::Super(_))
        ) || matches!(
            &call.callee,
            Expression::ComputedMemberExpression(m) if matches!(m.object, Expression::Super(_))
        );
        if !is_super_callee {
            return;
        }

        let span = call.span;
        let key = match &mut call.callee {
            Expression::StaticMemberExpression(member) => {
                self.super_key_from_name(member.property.span, &member.property.name, ctx)
            }
            Expression::ComputedMemberExpression(member) => ctx.ast.move_expression(&mut member.expression),
            _ => unreachable!(),
        };
        let this_temp = self.get_temp_binding(ctx);
        let this_expr = this_temp.create_spanned_read_expression(span, ctx);
        let arguments = ctx.ast.move_vec(&mut call.arguments);
        *expr = self.transform_super_call(span, key, true, this_expr, arguments, ctx);
    }
}
