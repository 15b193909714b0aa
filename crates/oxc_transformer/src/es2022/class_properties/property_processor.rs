//! Property Processor (`spec.md` §4.6).
//!
//! The forward pass that runs after computed-key hoisting (`spec.md` §4.5)
//! and class-lowering-info computation (`spec.md` §4.3): classifies each
//! property, routes it to the matching lowering helper, and either drops it
//! from the class body or keeps it in place.

use oxc_ast::ast::*;
use oxc_span::SPAN;
use oxc_syntax::{operator::AssignmentOperator, symbol::SymbolFlags};
use oxc_traverse::TraverseCtx;

use super::bindings::{read, PrivateFieldBinding, PrivateKind};
use super::decorator::{legacy::DescriptorKind, ElementKind};
use super::field::create_field_weak_map;
use super::{ClassLoweringInfo, ClassProperties, LowerClassContext};

/// Per-property precomputed facts (`spec.md` §4.6 `analyze_property`).
pub(super) struct PropertyAnalysis {
    pub is_private: bool,
    pub is_static: bool,
    pub must_lower_field: bool,
    pub should_omit_field_initializer: bool,
    pub rewrite_auto_accessor_to_get_set: bool,
    pub static_field_to_block_assign: bool,
    pub has_standard_decorators: bool,
    pub has_experimental_decorators: bool,
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Classify one property, deciding the booleans `spec.md` §4.6's
    /// `analyze_property` names.
    pub(super) fn analyze_property(
        &self,
        element: &ClassElement,
        info: &ClassLoweringInfo,
    ) -> PropertyAnalysis {
        let (is_private, is_static, has_value_or_init, has_decorators) = match element {
            ClassElement::PropertyDefinition(p) => (
                matches!(p.key, PropertyKey::PrivateIdentifier(_)),
                p.r#static,
                p.value.is_some(),
                !p.decorators.is_empty(),
            ),
            ClassElement::AccessorProperty(a) => (
                matches!(a.key, PropertyKey::PrivateIdentifier(_)),
                a.r#static,
                a.value.is_some(),
                !a.decorators.is_empty(),
            ),
            ClassElement::MethodDefinition(m) => (
                matches!(m.key, PropertyKey::PrivateIdentifier(_)),
                m.r#static,
                true,
                !m.decorators.is_empty(),
            ),
            ClassElement::StaticBlock(_) | ClassElement::TSIndexSignature(_) => {
                (false, false, false, false)
            }
        };

        let has_standard_decorators = has_decorators && self.options.should_lower_standard_decorators();
        let has_experimental_decorators = has_decorators && self.options.should_lower_experimental_decorators();

        let must_lower_field = match element {
            ClassElement::PropertyDefinition(_) => {
                if is_private {
                    self.options.is_class_field_unsupported(is_static, true)
                        || (is_static && info.lower_all_static_fields)
                        || (!is_static && info.lower_all_instance_fields)
                } else if is_static {
                    info.lower_all_static_fields
                } else {
                    info.lower_all_instance_fields
                }
            }
            _ => false,
        };

        let should_omit_field_initializer = matches!(element, ClassElement::PropertyDefinition(_))
            && self.options.typescript
            && !self.options.use_define_for_class_fields
            && !has_value_or_init
            && !(is_private && self.private_field_must_be_lowered(is_static))
            && !has_standard_decorators;

        let rewrite_auto_accessor_to_get_set = matches!(element, ClassElement::AccessorProperty(_))
            && (!has_decorators || !self.options.should_lower_standard_decorators())
            && (self.options.is_standard_decorators_unsupported()
                || self.options.is_class_field_unsupported(is_static, true)
                || is_private
                || (is_static && info.lower_all_static_fields)
                || (!is_static && info.lower_all_instance_fields));

        let static_field_to_block_assign = matches!(element, ClassElement::PropertyDefinition(_))
            && is_static
            && !is_private
            && !has_decorators
            && !self.options.use_define_for_class_fields
            && !info.lower_all_static_fields
            && self.options.is_static_blocks_unsupported();

        PropertyAnalysis {
            is_private,
            is_static,
            must_lower_field,
            should_omit_field_initializer,
            rewrite_auto_accessor_to_get_set,
            static_field_to_block_assign,
            has_standard_decorators,
            has_experimental_decorators,
        }
    }

    fn private_field_must_be_lowered(&self, is_static: bool) -> bool {
        self.options.is_class_field_unsupported(is_static, true)
    }

    /// Register a fresh private-symbol binding (the `Link` redirection,
    /// `spec.md` §3 invariant) if `symbol_id` needs lowering and doesn't
    /// already have one. Pushes the `new WeakMap()`/`new WeakSet()`
    /// initializer onto `private_members` at the same time, so by the time
    /// `field.rs`/`private_field.rs` look the binding up it's already
    /// complete.
    pub(super) fn register_private_field_symbol(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        symbol_id: oxc_syntax::symbol::SymbolId,
        original_name: &str,
        is_static: bool,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let already_registered =
            self.private_props_stack.last().is_some_and(|props| props.bindings.contains_key(&symbol_id));
        if already_registered {
            return;
        }
        let (binding, init) = create_field_weak_map(ctx, original_name.trim_start_matches('#'), is_static);
        class_ctx.private_members.push(init);
        self.private_props_stack.last_mut().expect("PrivateProps must exist").insert(symbol_id, binding);
    }

    /// Register a private method/getter/setter binding: a shared WeakSet for
    /// brand-checking plus a dedicated function temp
    /// (`spec.md` §4.1 "When a private method is lowered...").
    ///
    /// Idempotent and self-generates the function temp, so it can be called
    /// both eagerly (`mod.rs`'s `pre_register_private_symbols`, before any
    /// method body referencing this symbol is traversed) and again later
    /// from `route_method` once the method's own declaration is routed —
    /// the second call is a no-op lookup that returns the same temp rather
    /// than minting a second, disconnected one.
    pub(super) fn register_private_method_symbol(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        symbol_id: oxc_syntax::symbol::SymbolId,
        original_name: &str,
        kind: PrivateKind,
        ctx: &mut TraverseCtx<'a>,
    ) -> oxc_traverse::BoundIdentifier<'a> {
        if let Some(existing) = self.private_props_stack.last().and_then(|props| props.get(symbol_id)) {
            if let Some(method) = &existing.method {
                return method.clone();
            }
        }

        // Goes through the same shared-WeakSet bookkeeping `lower_private_method_binding`
        // uses, so a method registered here (eagerly, before its body is traversed) and
        // one registered later from `route_method` always end up sharing one brand temp
        // and one `new WeakSet()` initializer, never two.
        let weak_collection = self.ensure_private_method_weak_set(class_ctx, kind.is_static(), ctx);

        let base_name = format!("_{}", original_name.trim_start_matches('#'));
        let function_temp =
            ctx.generate_uid_in_current_scope(&base_name, oxc_syntax::symbol::SymbolFlags::FunctionScopedVariable);

        let binding = PrivateFieldBinding {
            kind,
            original_name: ctx.ast.atom(original_name.trim_start_matches('#')),
            weak_collection,
            getter: None,
            setter: None,
            method: Some(function_temp.clone()),
        };
        self.private_props_stack.last_mut().expect("PrivateProps must exist").insert(symbol_id, binding);
        function_temp
    }
}

/// Build `(() => { ...body... })()` for a static block whose statements
/// aren't all bare expression statements (`spec.md` §4.6 "Static block").
pub(super) fn static_block_iife<'a>(
    block: StaticBlock<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> Expression<'a> {
    let body = ctx.ast.function_body(block.span, ctx.ast.vec(), block.body);
    let params = ctx.ast.formal_parameters(SPAN, FormalParameterKind::ArrowFormalParameters, ctx.ast.vec(), NONE);
    let arrow = ctx.ast.expression_arrow_function(SPAN, false, false, NONE, params, NONE, body);
    ctx.ast.expression_call(SPAN, arrow, NONE, ctx.ast.vec(), false)
}


impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    /// Resolve the `SymbolId` a private member's own declaration-site
    /// `PrivateIdentifier` binds (as opposed to [`Self::resolve_private_symbol`],
    /// which resolves a *reference* to one through `reference_id`).
    pub(super) fn resolve_private_declaration_symbol(
        &self,
        ident: &PrivateIdentifier,
        _ctx: &TraverseCtx<'a>,
    ) -> Option<oxc_syntax::symbol::SymbolId> {
        ident.symbol_id()
    }

    /// Route one class element through classification to either a lowered
    /// form (folded into `class_ctx`, property removed from the body) or an
    /// unchanged kept element (`spec.md` §4.6 main routing).
    pub(super) fn route_property(
        &mut self,
        element: ClassElement<'a>,
        analysis: PropertyAnalysis,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Option<ClassElement<'a>> {
        match element {
            ClassElement::StaticBlock(block) => {
                if self.options.is_static_blocks_unsupported() {
                    self.lower_static_block(class_ctx, block.unbox(), ctx);
                    None
                } else {
                    Some(ClassElement::StaticBlock(block))
                }
            }
            ClassElement::TSIndexSignature(sig) => Some(ClassElement::TSIndexSignature(sig)),
            ClassElement::MethodDefinition(method) => {
                self.route_method(method.unbox(), analysis, class_ctx, ctx)
            }
            ClassElement::PropertyDefinition(prop) => {
                self.route_field(prop.unbox(), analysis, class_ctx, ctx)
            }
            // Only reaches here when auto-accessors are natively supported
            // by the target — `rewrite_auto_accessors` already replaced
            // every other `AccessorProperty` with a get/set pair.
            ClassElement::AccessorProperty(prop) => Some(ClassElement::AccessorProperty(prop)),
        }
    }

    /// `static { ... }` lowering (`spec.md` §4.6 "Static block"): wraps the
    /// block in an IIFE so it can be relocated after the class as a single
    /// expression, running it through the same `this`/class-name
    /// substitution as any other static initializer.
    fn lower_static_block(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        block: StaticBlock<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        let mut expr = static_block_iife(block, ctx);
        self.transform_static_initializer(&mut expr, ctx);
        class_ctx.static_members.push(expr);
    }

    fn route_method(
        &mut self,
        mut method: MethodDefinition<'a>,
        analysis: PropertyAnalysis,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Option<ClassElement<'a>> {
        if analysis.has_standard_decorators || analysis.has_experimental_decorators {
            let decorators = std::mem::replace(&mut method.decorators, ctx.ast.vec());
            let name_expr = decorator_key_name_expr(&method.key, ctx);
            let element_kind = match method.kind {
                MethodDefinitionKind::Get => ElementKind::Getter,
                MethodDefinitionKind::Set => ElementKind::Setter,
                _ => ElementKind::Method,
            };
            self.apply_element_decorators(
                class_ctx,
                decorators,
                method.r#static,
                analysis.is_private,
                element_kind,
                DescriptorKind::MethodOrAccessor,
                name_expr,
                &analysis,
                ctx,
            );
        }

        if method.kind == MethodDefinitionKind::Constructor {
            let lowered = crate::typescript::lower_parameter_properties(&mut method.value.params, ctx);
            class_ctx.parameter_fields.extend(lowered.assignments);
            if self.options.should_lower_experimental_decorators() {
                for (index, decorators) in lowered.parameter_decorators {
                    for decorator in decorators {
                        let call = self.decorate_param_call(index, decorator.expression, ctx);
                        class_ctx.constructor_parameter_decorators.push(call);
                    }
                }
            }
            return Some(ClassElement::MethodDefinition(ctx.ast.alloc(method)));
        }

        if !analysis.is_private {
            return Some(ClassElement::MethodDefinition(ctx.ast.alloc(method)));
        }

        if !self.options.is_private_method_unsupported(method.r#static) {
            return Some(ClassElement::MethodDefinition(ctx.ast.alloc(method)));
        }

        let PropertyKey::PrivateIdentifier(ident) = &method.key else {
            return Some(ClassElement::MethodDefinition(ctx.ast.alloc(method)));
        };
        let original_name = ident.name.clone();
        let symbol_id = self.resolve_private_declaration_symbol(ident, ctx);
        let is_static = method.r#static;
        let span = method.span;
        let method_kind = method.kind;

        let kind = match (method_kind, is_static) {
            (MethodDefinitionKind::Get, false) => PrivateKind::Get,
            (MethodDefinitionKind::Get, true) => PrivateKind::StaticGet,
            (MethodDefinitionKind::Set, false) => PrivateKind::Set,
            (MethodDefinitionKind::Set, true) => PrivateKind::StaticSet,
            (_, false) => PrivateKind::Method,
            (_, true) => PrivateKind::StaticMethod,
        };

        let temp = if let Some(symbol_id) = symbol_id {
            self.register_private_method_symbol(class_ctx, symbol_id, &original_name, kind, ctx)
        } else {
            let base_name = format!("_{}", original_name.trim_start_matches('#'));
            ctx.generate_uid_in_current_scope(&base_name, SymbolFlags::FunctionScopedVariable)
        };

        let MethodDefinition { value, .. } = method;
        let func_expr = Expression::FunctionExpression(value);
        let assign = ctx.ast.expression_assignment(
            span,
            AssignmentOperator::Assign,
            temp.create_target_for_assignment(ctx),
            func_expr,
        );
        class_ctx.private_members.push(assign);

        let target_read = if is_static {
            read(self.get_temp_binding(ctx), ctx)
        } else {
            ctx.ast.expression_this(span)
        };
        let add_call = self.lower_private_method_binding(class_ctx, is_static, target_read, ctx);
        if is_static {
            class_ctx.static_private_methods.push(add_call);
        } else {
            class_ctx.instance_private_methods.push(ctx.ast.statement_expression(span, add_call));
        }

        None
    }

    fn route_field(
        &mut self,
        mut prop: PropertyDefinition<'a>,
        analysis: PropertyAnalysis,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> Option<ClassElement<'a>> {
        if analysis.has_standard_decorators || analysis.has_experimental_decorators {
            let decorators = std::mem::replace(&mut prop.decorators, ctx.ast.vec());
            let name_expr = decorator_key_name_expr(&prop.key, ctx);
            self.apply_element_decorators(
                class_ctx,
                decorators,
                prop.r#static,
                analysis.is_private,
                ElementKind::Field,
                DescriptorKind::Field,
                name_expr,
                &analysis,
                ctx,
            );
        }

        let is_static = prop.r#static;
        let is_private = analysis.is_private;

        if is_private {
            if let PropertyKey::PrivateIdentifier(ident) = &prop.key {
                if let Some(symbol_id) = self.resolve_private_declaration_symbol(ident, ctx) {
                    self.register_private_field_symbol(class_ctx, symbol_id, &ident.name, is_static, ctx);
                }
            }
        }

        let needs_lowering = analysis.must_lower_field || analysis.static_field_to_block_assign || is_private;
        if !needs_lowering {
            if analysis.should_omit_field_initializer {
                return None;
            }
            return Some(ClassElement::PropertyDefinition(ctx.ast.alloc(prop)));
        }

        if is_static {
            if let Some(value) = &mut prop.value {
                self.transform_static_initializer(value, ctx);
            }
        }

        let private_symbol_id = if is_private {
            match &prop.key {
                PropertyKey::PrivateIdentifier(ident) => self.resolve_private_declaration_symbol(ident, ctx),
                _ => None,
            }
        } else {
            None
        };

        self.lower_field(
            class_ctx,
            prop.span,
            prop.key,
            prop.value,
            is_static,
            is_private,
            private_symbol_id,
            analysis.should_omit_field_initializer,
            analysis.has_standard_decorators,
            ctx,
        );
        None
    }

    /// Apply a member's decorators (`spec.md` §4.7): bucket them as either a
    /// TS experimental `__decorateClass` call or a stage-3
    /// `__decorateElement` call, depending on the active dialect. Decorator
    /// return-value substitution (a decorator replacing the member's own
    /// value) is not modelled — `DESIGN.md` records this as a deliberate
    /// reduction in scope.
    #[allow(clippy::too_many_arguments)]
    fn apply_element_decorators(
        &mut self,
        class_ctx: &mut LowerClassContext<'a>,
        decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
        is_static: bool,
        is_private: bool,
        element_kind: ElementKind,
        descriptor_kind: DescriptorKind,
        name_expr: Expression<'a>,
        analysis: &PropertyAnalysis,
        ctx: &mut TraverseCtx<'a>,
    ) {
        if decorators.is_empty() {
            return;
        }

        if analysis.has_experimental_decorators {
            self.push_legacy_member_decorator(class_ctx, decorators, is_static, name_expr, descriptor_kind, ctx);
            return;
        }

        if analysis.has_standard_decorators {
            let decorators_ref = standard_decorators_array(decorators, ctx);
            let target = name_expr;
            let key_for_call = match &target {
                Expression::StringLiteral(lit) => ctx.ast.expression_string_literal(lit.span, lit.value.clone(), None),
                _ => ctx.ast.expression_null_literal(SPAN),
            };
            self.push_standard_element_decorator(
                class_ctx,
                element_kind,
                is_static,
                is_private,
                key_for_call,
                decorators_ref,
                target,
                Vec::new(),
                ctx,
            );
        }
    }
}

fn standard_decorators_array<'a>(
    decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
    ctx: &mut TraverseCtx<'a>,
) -> Expression<'a> {
    let elements = ctx.ast.vec_from_iter(decorators.into_iter().map(|d| ArrayExpressionElement::from(d.expression)));
    ctx.ast.expression_array(SPAN, elements)
}

/// A presentable name for a decorated member, used only as the `key`
/// argument to the decorator-application calls — a string for
/// identifier/private keys, `null` for computed keys (`spec.md` §4.7 leaves
/// the exact runtime representation to the host; this crate only needs
/// something stable to pass through).
fn decorator_key_name_expr<'a>(key: &PropertyKey<'a>, ctx: &mut TraverseCtx<'a>) -> Expression<'a> {
    match key {
        PropertyKey::StaticIdentifier(ident) => ctx.ast.expression_string_literal(ident.span, ident.name.clone(), None),
        PropertyKey::PrivateIdentifier(ident) => ctx.ast.expression_string_literal(ident.span, ident.name.clone(), None),
        _ => ctx.ast.expression_null_literal(SPAN),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_kind_matches_spec_constants() {
        assert_eq!(DescriptorKind::Field as u8, 2);
        assert_eq!(DescriptorKind::MethodOrAccessor as u8, 1);
    }
}
