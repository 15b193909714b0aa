//! Dispatch layer over [`super::private_field`]'s per-form rewrites.
//!
//! These are the entry points [`super::static_prop::StaticInitializerVisitor`]
//! (and, for non-static initializers, the property processor's own
//! traversal) call with a raw `&mut Expression`/`&mut AssignmentTarget`: each
//! one recognizes the specific private-access shape, checks whether the
//! symbol actually needs lowering, and replaces the node in place if so.
//! Nodes that don't match, or whose private symbol isn't lowered, are left
//! untouched.

use oxc_ast::ast::*;
use oxc_traverse::TraverseCtx;

use super::ClassProperties;

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// `object.#prop` plain read.
    pub(super) fn transform_private_field_expression(
        &mut self,
        expr: &mut Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let Expression::PrivateFieldExpression(_) = expr else { return };
        // Re-borrow as owned to satisfy the single-node-in-place-replace
        // pattern used throughout this dispatch layer.
        let Expression::PrivateFieldExpression(field) =
            std::mem::replace(expr, ctx.ast.expression_null_literal(expr.span()))
        else {
            unreachable!()
        };
        let PrivateFieldExpression { span, object, field: ident, .. } = *field;
        if !self.private_ident_needs_lowering(&ident, ctx) {
            *expr = ctx.ast.expression_private_field(span, object, ident);
            return;
        }
        let Some(symbol_id) = self.resolve_private_symbol(&ident, ctx) else {
            *expr = ctx.ast.expression_private_field(span, object, ident);
            return;
        };
        *expr = self.transform_private_field_get(span, symbol_id, object, ctx);
    }

    /// `object.#prop()` — method calls through a private field that aren't
    /// already handled by [`Self::transform_private_field_expression`]
    /// because the callee is consumed whole by `CallExpression`.
    pub(super) fn transform_call_expression(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        let Expression::CallExpression(call) = expr else { return };
        if !matches!(call.callee, Expression::PrivateFieldExpression(_)) {
            return;
        }
        self.transform_private_field_expression(&mut call.callee, ctx);
    }

    /// `object.#prop = v`, `object.#prop += v`, `object.#prop ??= v`, etc.
    pub(super) fn transform_assignment_expression(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        let Expression::AssignmentExpression(assignment) = expr else { return };
        let AssignmentTarget::PrivateFieldExpression(_) = &assignment.left else { return };

        let span = assignment.span;
        let operator = assignment.operator;
        let AssignmentTarget::PrivateFieldExpression(field) =
            std::mem::replace(&mut assignment.left, dummy_private_target(ctx, span))
        else {
            unreachable!()
        };
        let PrivateFieldExpression { object, field: ident, .. } = *field;
        let Some(symbol_id) = self.resolve_private_symbol(&ident, ctx) else { return };
        if !self.private_ident_needs_lowering(&ident, ctx) {
            return;
        }

        let value = ctx.ast.move_expression(&mut assignment.right);
        *expr = if operator == AssignmentOperator::Assign {
            self.transform_private_field_set(span, symbol_id, object, value, ctx)
        } else {
            self.transform_private_compound_assignment(span, symbol_id, object, operator, value, ctx)
        };
    }

    /// `object.#prop++`, `--object.#prop`.
    pub(super) fn transform_update_expression(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        let Expression::UpdateExpression(update) = expr else { return };
        let SimpleAssignmentTarget::PrivateFieldExpression(_) = &update.argument else { return };

        let span = update.span;
        let operator = update.operator;
        let prefix = update.prefix;
        let SimpleAssignmentTarget::PrivateFieldExpression(field) =
            std::mem::replace(&mut update.argument, dummy_simple_private_target(ctx, span))
        else {
            unreachable!()
        };
        let PrivateFieldExpression { object, field: ident, .. } = *field;
        let Some(symbol_id) = self.resolve_private_symbol(&ident, ctx) else { return };
        if !self.private_ident_needs_lowering(&ident, ctx) {
            return;
        }
        *expr = self.transform_private_update_expression(span, symbol_id, object, operator, prefix, ctx);
    }

    /// `object?.#prop` — unwrap the optional-chain base case, then continue
    /// normal private-field rewriting on the inner expression (the chain's
    /// short-circuiting behaviour is handled entirely by `oxc`'s
    /// `ChainExpression` wrapper and doesn't need to change here).
    pub(super) fn transform_chain_expression(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        let Expression::ChainExpression(chain) = expr else { return };
        match &mut chain.expression {
            ChainElement::CallExpression(_) => {
                let mut inner = ctx.ast.move_expression_from_chain_element(&mut chain.expression);
                self.transform_call_expression(&mut inner, ctx);
                ctx.ast.set_chain_element(&mut chain.expression, inner);
            }
            _ => {
                let mut inner = ctx.ast.move_expression_from_chain_element(&mut chain.expression);
                self.transform_private_field_expression(&mut inner, ctx);
                ctx.ast.set_chain_element(&mut chain.expression, inner);
            }
        }
    }

    /// ``object.#prop`xyz` `` — tagged templates: only the tag expression
    /// can be a private-field read.
    pub(super) fn transform_tagged_template_expression(
        &mut self,
        expr: &mut Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let Expression::TaggedTemplateExpression(tagged) = expr else { return };
        self.transform_private_field_expression(&mut tagged.tag, ctx);
    }

    /// `delete object?.#prop.xyz` — called directly by the static-initializer
    /// visitor once it already knows `expr` is `delete <chain expression>`.
    pub(super) fn transform_unary_expression_impl(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        let Expression::UnaryExpression(unary) = expr else { return };
        self.transform_chain_expression(&mut unary.argument, ctx);
    }

    /// `#prop in object` — brand check (`spec.md` §4.1 "Brand check").
    pub(super) fn transform_private_in_expression_entry(
        &mut self,
        expr: &mut Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let Expression::PrivateInExpression(_) = expr else { return };
        let Expression::PrivateInExpression(private_in) =
            std::mem::replace(expr, ctx.ast.expression_null_literal(expr.span()))
        else {
            unreachable!()
        };
        let PrivateInExpression { span, left: ident, right: target, .. } = *private_in;
        if !self.private_ident_needs_lowering(&ident, ctx) {
            *expr = ctx.ast.expression_private_in(span, ident, target);
            return;
        }
        let Some(symbol_id) = self.resolve_private_symbol(&ident, ctx) else {
            *expr = ctx.ast.expression_private_in(span, ident, target);
            return;
        };
        *expr = self.transform_private_in_expression(span, symbol_id, target, ctx);
    }

    /// `[object.#prop] = []` — private field as a destructuring-assignment
    /// target.
    pub(super) fn transform_assignment_target(&mut self, target: &mut AssignmentTarget<'a>, ctx: &mut TraverseCtx<'a>) {
        let AssignmentTarget::PrivateFieldExpression(_) = target else { return };
        let span = target.span();
        let AssignmentTarget::PrivateFieldExpression(field) =
            std::mem::replace(target, dummy_private_target(ctx, span))
        else {
            unreachable!()
        };
        let PrivateFieldExpression { object, field: ident, .. } = *field;
        let Some(symbol_id) = self.resolve_private_symbol(&ident, ctx) else { return };
        if !self.private_ident_needs_lowering(&ident, ctx) {
            return;
        }
        let wrapper = self.transform_private_destructuring_target(span, symbol_id, object, ctx);
        *target = ctx.ast.assignment_target_simple(
            ctx.ast.simple_assignment_target_from_expression(wrapper),
        );
    }
}

/// Placeholder used only to satisfy `std::mem::replace`'s "need a value to
/// put back" requirement while we pull the real node out by value; always
/// overwritten before control returns to the caller.
fn dummy_private_target<'a>(ctx: &TraverseCtx<'a>, span: oxc_span::Span) -> AssignmentTarget<'a> {
    ctx.ast.assignment_target_simple(
        ctx.ast.simple_assignment_target_identifier_reference(ctx.ast.identifier_reference(span, "_")),
    )
}

fn dummy_simple_private_target<'a>(ctx: &TraverseCtx<'a>, span: oxc_span::Span) -> SimpleAssignmentTarget<'a> {
    ctx.ast.simple_assignment_target_identifier_reference(ctx.ast.identifier_reference(span, "_"))
}
