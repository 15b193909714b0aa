//! Auto-Accessor Rewrite (`spec.md` §4.10).
//!
//! Desugars `accessor x = v` into a getter/setter pair backed by a private
//! `WeakMap` storage slot, *before* the property processor's main
//! per-property routing sees it. Unlike a user-declared private field, this
//! storage slot has no `PrivateIdentifier` `SymbolId` `SemanticBuilder` ever
//! bound to it — nothing else in the program can reference it — so it's
//! wired directly onto the class's `WeakMap`/`__privateAdd`/`__privateGet`/
//! `__privateSet` bookkeeping here rather than reinserted as a plain
//! property for `analyze_property`/`route_field` to discover.

use oxc_ast::ast::*;
use oxc_span::Span;
use oxc_traverse::TraverseCtx;

use super::bindings::read;
use super::utils::call_helper;
use super::{ClassProperties, LowerClassContext};

/// The getter/setter pair an auto-accessor desugars to. The storage slot's
/// `WeakMap` and `__privateAdd` registration are pushed straight onto
/// `class_ctx` by [`ClassProperties::rewrite_auto_accessor`] rather than
/// carried here.
pub(super) struct RewrittenAccessor<'a> {
    pub getter: oxc_allocator::Box<'a, Function<'a>>,
    pub setter: oxc_allocator::Box<'a, Function<'a>>,
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Rewrite one `accessor` property into a `get`/`set` pair closing over
    /// a fresh `WeakMap` storage slot (`spec.md` §4.10). The caller splices
    /// the getter/setter into the class body in place of the original
    /// `AccessorProperty`; the storage slot itself never becomes a class
    /// element — it's a plain `WeakMap` temp, same as any other lowered
    /// private field's backing store.
    pub(super) fn rewrite_auto_accessor(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        prop: &mut AccessorProperty<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> RewrittenAccessor<'a> {
        let span = prop.span;
        let is_static = prop.r#static;

        let base_name = match &prop.key {
            PropertyKey::StaticIdentifier(ident) => ident.name.as_str().to_string(),
            PropertyKey::PrivateIdentifier(ident) => ident.name.trim_start_matches('#').to_string(),
            _ => "accessor".to_string(),
        };

        let (binding, weak_map_init) = super::field::create_field_weak_map(ctx, &base_name, is_static);
        class_ctx.private_members.push(weak_map_init);
        let weak_collection = binding.weak_collection;

        let init_value = prop.value.take();
        let add_target = self.accessor_target(is_static, span, ctx);
        let mut add_args = ctx.ast.vec_with_capacity(3);
        add_args.push(add_target);
        add_args.push(read(&weak_collection, ctx));
        if let Some(value) = init_value {
            add_args.push(value);
        }
        let add_call = call_helper(ctx, span, "__privateAdd", add_args);
        if is_static {
            class_ctx.static_members.push(add_call);
        } else {
            class_ctx.instance_members.push(ctx.ast.statement_expression(span, add_call));
        }

        let getter_body = {
            let target = self.accessor_target(is_static, span, ctx);
            let mut args = ctx.ast.vec_with_capacity(2);
            args.push(target);
            args.push(read(&weak_collection, ctx));
            let get_call = call_helper(ctx, span, "__privateGet", args);
            let ret = ctx.ast.statement_return(span, Some(get_call));
            ctx.ast.function_body(span, ctx.ast.vec(), ctx.ast.vec1(ret))
        };
        let getter = ctx.ast.function(
            span,
            FunctionType::FunctionExpression,
            None,
            false,
            false,
            false,
            NONE,
            NONE,
            ctx.ast.formal_parameters(span, FormalParameterKind::FormalParameter, ctx.ast.vec(), NONE),
            NONE,
            Some(getter_body),
        );

        let setter_body = {
            let target = self.accessor_target(is_static, span, ctx);
            let value_ref = ctx.ast.expression_identifier_reference(span, "value");
            let mut args = ctx.ast.vec_with_capacity(3);
            args.push(target);
            args.push(read(&weak_collection, ctx));
            args.push(value_ref);
            let set_call = call_helper(ctx, span, "__privateSet", args);
            ctx.ast.function_body(span, ctx.ast.vec(), ctx.ast.vec1(ctx.ast.statement_expression(span, set_call)))
        };
        let value_param = ctx.ast.formal_parameter(
            span,
            ctx.ast.vec(),
            ctx.ast.binding_pattern(
                ctx.ast.binding_pattern_kind_binding_identifier(span, "value"),
                NONE,
                false,
            ),
            None,
            false,
            false,
        );
        let mut setter_params = ctx.ast.vec_with_capacity(1);
        setter_params.push(value_param);
        let setter = ctx.ast.function(
            span,
            FunctionType::FunctionExpression,
            None,
            false,
            false,
            false,
            NONE,
            NONE,
            ctx.ast.formal_parameters(span, FormalParameterKind::FormalParameter, setter_params, NONE),
            NONE,
            Some(setter_body),
        );

        RewrittenAccessor { getter, setter }
    }

    /// Storage target for a desugared auto-accessor: `this` for an instance
    /// accessor, the class temp for a static one — a static accessor's
    /// storage lives on the class itself, never on `this`, matching
    /// `field.rs`'s `FieldTarget::Static` handling for ordinary static
    /// private fields.
    fn accessor_target(&mut self, is_static: bool, span: Span, ctx: &mut TraverseCtx<'a>) -> Expression<'a> {
        if is_static {
            let temp = self.get_temp_binding(ctx).clone();
            read(&temp, ctx)
        } else {
            ctx.ast.expression_this(span)
        }
    }
}
