//! Private-member rewrites (`spec.md` §4.1).
//!
//! Translates references to *lowered* private symbols into calls to the
//! runtime helpers (`__privateIn`, `__privateGet`, `__privateSet`,
//! `__privateMethod`, `__privateWrapper`). None of these helpers are
//! implemented here — the core only ever emits calls to them, by name
//! (`spec.md` §1 "Out of scope").

use oxc_ast::ast::*;
use oxc_span::Span;
use oxc_syntax::operator::{AssignmentOperator, UpdateOperator};
use oxc_traverse::TraverseCtx;

use super::bindings::{read, PrivateFieldBinding};
use super::utils::{call_helper, ident_expr, null_literal};
use super::ClassProperties;

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// A private symbol needs lowering if its feature is unsupported, or it
    /// was flagged by an earlier rule (decorators, class-lowering-info)
    /// regardless of target support (`spec.md` §4.1 opening paragraph).
    pub(super) fn private_ident_needs_lowering(
        &self,
        ident: &PrivateIdentifier,
        ctx: &TraverseCtx<'a>,
    ) -> bool {
        let Some(symbol_id) = self.resolve_private_symbol(ident, ctx) else { return false };
        self.private_props_stack.iter().rev().any(|props| props.bindings.contains_key(&symbol_id))
    }

    fn resolved_binding(&self, symbol_id: oxc_syntax::symbol::SymbolId) -> Option<&PrivateFieldBinding<'a>> {
        self.private_props_stack.iter().rev().find_map(|props| props.get(symbol_id))
    }

    /// `#f in t` → `__privateIn(#f, t)` (`spec.md` §4.1 "Brand check").
    pub(super) fn transform_private_in_expression(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let binding = self.resolved_binding(symbol_id).expect("private symbol must be lowered");
        let weak_ref = read(&binding.weak_collection, ctx);
        call_helper(ctx, span, "__privateIn", oxc_allocator::vec![ctx, weak_ref, target])
    }

    /// `t.#f` get (`spec.md` §4.1 "Get").
    pub(super) fn transform_private_field_get(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let binding = self.resolved_binding(symbol_id).expect("private symbol must be lowered").clone_refs();
        let weak_ref = read(&binding.weak_collection, ctx);

        if binding.kind.is_method_like() && !binding.kind.is_accessor() {
            let method = binding.method.as_ref().expect("method kind must have method temp");
            let fn_ref = read(method, ctx);
            return call_helper(
                ctx,
                span,
                "__privateMethod",
                oxc_allocator::vec![ctx, target, weak_ref, fn_ref],
            );
        }

        if binding.kind.is_accessor() {
            let getter = binding
                .getter
                .as_ref()
                .map(|g| read(g, ctx))
                .unwrap_or_else(|| ident_expr(ctx, span, "undefined"));
            return call_helper(
                ctx,
                span,
                "__privateGet",
                oxc_allocator::vec![ctx, target, weak_ref, getter],
            );
        }

        call_helper(ctx, span, "__privateGet", oxc_allocator::vec![ctx, target, weak_ref])
    }

    /// `t.#f = v` (`spec.md` §4.1 "Set").
    pub(super) fn transform_private_field_set(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        value: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let binding = self.resolved_binding(symbol_id).expect("private symbol must be lowered").clone_refs();
        let weak_ref = read(&binding.weak_collection, ctx);

        if binding.kind.has_setter() || (binding.kind.is_accessor() && binding.kind.has_getter()) {
            let setter = binding
                .setter
                .as_ref()
                .map(|s| read(s, ctx))
                .unwrap_or_else(|| ident_expr(ctx, span, "undefined"));
            return call_helper(
                ctx,
                span,
                "__privateSet",
                oxc_allocator::vec![ctx, target, weak_ref, value, setter],
            );
        }

        call_helper(ctx, span, "__privateSet", oxc_allocator::vec![ctx, target, weak_ref, value])
    }

    /// `t.#f OP= v` → `__privateSet(t, #f, __privateGet(t, #f) OP v)`.
    ///
    /// The target is captured with at most two reads: one for the
    /// `__privateGet` call, one for the `__privateSet` call (`spec.md`
    /// §4.1 "Compound-assign").
    pub(super) fn transform_private_compound_assignment(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        operator: AssignmentOperator,
        rhs: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let (target_a, target_b) = self.duplicate_target_at_most_twice(target, span, ctx);
        let current = self.transform_private_field_get(span, symbol_id, target_a, ctx);
        let binary_operator = operator
            .to_binary_operator()
            .expect("compound assignment operator must map to a binary operator");
        let combined = ctx.ast.expression_binary(span, current, binary_operator, rhs);
        self.transform_private_field_set(span, symbol_id, target_b, combined, ctx)
    }

    /// `t.#f++` / `t.#f--`, prefix and postfix
    /// (`spec.md` §4.1 "Unary update").
    ///
    /// `__privateWrapper(t, #f[, setFn][, null|getFn])._` with the unary
    /// operator applied to the wrapper's `_` property.
    pub(super) fn transform_private_update_expression(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        operator: UpdateOperator,
        is_prefix: bool,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let wrapper = self.private_wrapper_call(span, symbol_id, target, ctx);
        let underscore = ctx.ast.identifier_name(span, "_");
        let member = ctx.ast.member_expression_static(span, wrapper, underscore, false);
        let target = ctx.ast.simple_assignment_target_member_expression(member);
        ctx.ast.expression_update(span, operator, is_prefix, AssignmentTarget::from(target))
    }

    /// Shared helper: build `__privateWrapper(t, #f[, set][, null|get])`.
    fn private_wrapper_call(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let binding = self.resolved_binding(symbol_id).expect("private symbol must be lowered").clone_refs();
        let weak_ref = read(&binding.weak_collection, ctx);
        let mut args = oxc_allocator::vec![ctx, target, weak_ref];
        if let Some(setter) = &binding.setter {
            args.push(read(setter, ctx));
            if let Some(getter) = &binding.getter {
                args.push(read(getter, ctx));
            }
        } else if binding.getter.is_some() {
            args.push(null_literal(ctx, span));
            args.push(read(binding.getter.as_ref().unwrap(), ctx));
        }
        call_helper(ctx, span, "__privateWrapper", args)
    }

    /// A private access used as the target of a destructuring assignment is
    /// rewritten the same way as the unary-update wrapper form, because
    /// destructuring assigns through ordinary property-set semantics
    /// (`spec.md` §4.1 "Destructuring target").
    pub(super) fn transform_private_destructuring_target(
        &mut self,
        span: Span,
        symbol_id: oxc_syntax::symbol::SymbolId,
        target: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        self.private_wrapper_call(span, symbol_id, target, ctx)
    }

    /// Capture `target` so it can be read at most twice without
    /// re-evaluating side effects: if it's already side-effect-free
    /// (identifier, `this`), just clone the read; otherwise assign to a
    /// temp and return two reads of the temp.
    pub(super) fn duplicate_target_at_most_twice(
        &mut self,
        target: Expression<'a>,
        span: Span,
        ctx: &mut TraverseCtx<'a>,
    ) -> (Expression<'a>, Expression<'a>) {
        match &target {
            Expression::Identifier(_) | Expression::ThisExpression(_) => {
                let second = ctx.ast.copy(&target);
                (target, second)
            }
            _ => {
                let temp = ctx.generate_uid_in_current_scope(
                    "ref",
                    oxc_syntax::symbol::SymbolFlags::FunctionScopedVariable,
                );
                let assignment = ctx.ast.expression_assignment(
                    span,
                    AssignmentOperator::Assign,
                    temp.create_target_for_assignment(ctx),
                    target,
                );
                (assignment, read(&temp, ctx))
            }
        }
    }
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Lower a private method/getter/setter: register the shared `WeakSet`
    /// brand for this class (instance or static), bind the method body to a
    /// fresh temp, and return the registration statement plus the function
    /// binding expression to push onto `private_members`
    /// (`spec.md` §4.1 "When a private method is lowered...").
    pub(super) fn lower_private_method_binding(
        &mut self,
        class_ctx: &mut super::LowerClassContext<'a>,
        is_static: bool,
        target_read: Expression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Expression<'a> {
        let weak_set = self.ensure_private_method_weak_set(class_ctx, is_static, ctx);
        let weak_set_read = read(&weak_set, ctx);
        call_helper(
            ctx,
            oxc_span::SPAN,
            "__privateAdd",
            oxc_allocator::vec![ctx, target_read, weak_set_read],
        )
    }

    /// Return the shared instance/static private-method `WeakSet` temp,
    /// creating it (and recording its `new WeakSet()` initializer on
    /// `private_members`) on first use for this class.
    pub(super) fn ensure_private_method_weak_set(
        &mut self,
        class_ctx: &mut super::LowerClassContext<'a>,
        is_static: bool,
        ctx: &mut TraverseCtx<'a>,
    ) -> oxc_traverse::BoundIdentifier<'a> {
        let existing = {
            let props = self.private_props_stack.last().expect("private method must have PrivateProps");
            if is_static { props.static_method_weak_set.clone() } else { props.instance_method_weak_set.clone() }
        };
        if let Some(existing) = existing {
            return existing;
        }

        let base_name = if is_static { "_staticBrand" } else { "_brand" };
        let temp = ctx.generate_uid_in_current_scope(
            base_name,
            oxc_syntax::symbol::SymbolFlags::FunctionScopedVariable,
        );

        let new_weak_set = super::field::new_call(ctx, "WeakSet");
        let init = ctx.ast.expression_assignment(
            oxc_span::SPAN,
            AssignmentOperator::Assign,
            temp.create_target_for_assignment(ctx),
            new_weak_set,
        );
        class_ctx.private_members.push(init);

        let props = self.private_props_stack.last_mut().expect("private method must have PrivateProps");
        if is_static {
            props.static_method_weak_set = Some(temp.clone());
        } else {
            props.instance_method_weak_set = Some(temp.clone());
        }
        temp
    }
}

/// Helper trait extension: cheaply clone the `BoundIdentifier` references
/// inside a `PrivateFieldBinding` without cloning the whole map entry's
/// owning allocation twice (bound identifiers are small `Copy`-ish handles).
impl<'a> PrivateFieldBinding<'a> {
    pub(super) fn clone_refs(&self) -> Self {
        self.clone()
    }
}

impl<'a> Clone for PrivateFieldBinding<'a> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            original_name: self.original_name.clone(),
            weak_collection: self.weak_collection.clone(),
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            method: self.method.clone(),
        }
    }
}
