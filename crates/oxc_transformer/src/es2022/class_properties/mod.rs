//! ES2022: Class Properties.
//!
//! Top-level orchestration of the class-lowering subsystem (`spec.md` §2).
//! [`ClassProperties`] is invoked once per class, via [`oxc_traverse::Traverse`]:
//! nothing here re-enters a class node the pass has already produced
//! (`spec.md` §3 "A class is lowered exactly once").

mod auto_accessor;
mod bindings;
pub mod class_lowering_info;
mod class_name;
mod computed_keys;
mod constructor;
pub mod decorator;
mod emitter;
mod field;
pub mod options;
mod private_dispatch;
mod private_field;
mod property_processor;
mod static_prop;
mod super_expr;
mod utils;

pub use options::{ClassPropertiesOptions, DecoratorDialect, Mode, UnsupportedFeatures};

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::*;
use oxc_diagnostics::OxcDiagnostic;
use oxc_span::{Span, SPAN};
use oxc_syntax::symbol::SymbolId;
use oxc_traverse::{BoundIdentifier, Traverse, TraverseCtx};
use rustc_hash::FxHashMap;

pub(crate) use bindings::{read, ClassBindings, PrivateFieldBinding, PrivateKind, PrivateProps};
pub(crate) use class_lowering_info::ClassLoweringInfo;
use emitter::PendingEmission;

/// What syntactic form the class being lowered appeared in (`spec.md` §3
/// `LowerClassContext`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassKind {
    Expr,
    Stmt,
    ExportStmt,
    ExportDefaultStmt,
}

/// The mutable working set for one class lowering (`spec.md` §3
/// `LowerClassContext`). Pushed in `enter_class`, consumed and popped in
/// `exit_class`.
pub(crate) struct LowerClassContext<'a> {
    pub kind: ClassKind,
    pub span: Span,

    /// TypeScript `constructor(public x: T)` → `this.x = x` statements
    /// (`spec.md` §3 table, `parameter_fields`).
    pub parameter_fields: Vec<Statement<'a>>,
    /// Lowered instance-field initializer statements (`instance_members`).
    pub instance_members: Vec<Statement<'a>>,
    /// Statements registering instances into private-method `WeakSet`s
    /// (`instance_private_methods`).
    pub instance_private_methods: Vec<Statement<'a>>,
    /// Hoisted computed-key/decorator-array side effects, emitted before
    /// the class (`computed_property_chain`).
    pub computed_property_chain: Option<Expression<'a>>,
    /// `WeakMap`/`WeakSet` creations and private-method function
    /// assignments, emitted after the class (`private_members`).
    pub private_members: Vec<Expression<'a>>,
    /// Lowered static-field assignments, emitted after the class
    /// (`static_members`).
    pub static_members: Vec<Expression<'a>>,
    /// Static private-method `WeakSet` registrations
    /// (`static_private_methods`).
    pub static_private_methods: Vec<Expression<'a>>,
    /// `__decorateClass` calls for TS experimental decorators.
    pub instance_experimental_decorators: Vec<Expression<'a>>,
    pub static_experimental_decorators: Vec<Expression<'a>>,
    /// `__decorateParam(i, dec)` calls for a decorated constructor
    /// parameter, one per decorator, merged into the class's own decorator
    /// array when the class-level `__decorateClass` assignment is built
    /// (`spec.md` §4.6, TS experimental decorators only).
    pub constructor_parameter_decorators: Vec<Expression<'a>>,
    /// Four stage-3 decorator buckets, emitted in this fixed order
    /// (`spec.md` §4.7 point 3).
    pub decorator_static_non_field_elements: Vec<Expression<'a>>,
    pub decorator_instance_non_field_elements: Vec<Expression<'a>>,
    pub decorator_static_field_elements: Vec<Expression<'a>>,
    pub decorator_instance_field_elements: Vec<Expression<'a>>,

    /// Class-level `CLS = __decorateElement(ctx, 0, name, classDecorators,
    /// CLS)` reassignment for stage-3 decorators (`spec.md` §4.9 point 6).
    pub standard_class_decorator_assign: Option<Expression<'a>>,
    /// Class-level `CLS = __decorateClass([d1,…], CLS)` reassignment for TS
    /// experimental decorators (`spec.md` §4.9 point 11).
    pub experimental_class_decorator_assign: Option<Expression<'a>>,

    /// `__decoratorStart` context temp, allocated lazily the first time a
    /// decorated element is processed.
    pub decorator_context_ref: Option<BoundIdentifier<'a>>,
    /// The `ctxRef = __decoratorStart(...)` initializer expression, stashed
    /// here by [`decorator::standard::ensure_decorator_context`] so the
    /// emitter can place it first among the suffix expressions
    /// (`spec.md` §4.9 point 1), regardless of how many other decorator
    /// calls were pushed before the emitter runs.
    pub decorator_start_init: Option<Expression<'a>>,
    /// Temp capturing the evaluated `extends` expression, when computed-key
    /// hoisting requires evaluating it before the class (`spec.md` §4.5
    /// last rule).
    pub extends_ref: Option<BoundIdentifier<'a>>,
    /// Shared WeakSet temps (duplicated here from `PrivateProps` for
    /// classes with no other private members, e.g. a class whose only
    /// private member is a private method).
    pub private_instance_method_ref: Option<BoundIdentifier<'a>>,
    pub private_static_method_ref: Option<BoundIdentifier<'a>>,

    /// Running per-class sequential initializer index for stage-3
    /// `__runInitializers` flag computation (`spec.md` §4.7 point 4),
    /// incremented once per initializer-bearing element in pass order.
    pub next_initializer_index: u32,

    /// Whether any expression was relocated from inside the body to outside
    /// it — drives the "inner class name escape" emitter decision
    /// (`spec.md` §4.9, §8 property 8).
    pub inner_name_escaped: bool,
    /// Whether the constructor's `super()` call(s) were rewritten to route
    /// through a `__super` shim (`spec.md` §4.8).
    pub used_super_shim: bool,

    /// Whether `enter_class` pushed an entry onto `private_props_stack` for
    /// *this* class (set once, at push time). `exit_class` must pop
    /// `private_props_stack` only when this is `true` — a nested class with
    /// no private members of its own (e.g. a class expression inside a
    /// decorated static field initializer) pushes no entry, and popping
    /// unconditionally on stack non-emptiness would discard an enclosing
    /// class's still-needed `PrivateProps` instead.
    pub pushed_private_props: bool,
}

impl<'a> LowerClassContext<'a> {
    fn new(kind: ClassKind, span: Span) -> Self {
        Self {
            kind,
            span,
            parameter_fields: Vec::new(),
            instance_members: Vec::new(),
            instance_private_methods: Vec::new(),
            computed_property_chain: None,
            private_members: Vec::new(),
            static_members: Vec::new(),
            static_private_methods: Vec::new(),
            instance_experimental_decorators: Vec::new(),
            static_experimental_decorators: Vec::new(),
            constructor_parameter_decorators: Vec::new(),
            decorator_static_non_field_elements: Vec::new(),
            decorator_instance_non_field_elements: Vec::new(),
            decorator_static_field_elements: Vec::new(),
            decorator_instance_field_elements: Vec::new(),
            standard_class_decorator_assign: None,
            experimental_class_decorator_assign: None,
            decorator_context_ref: None,
            decorator_start_init: None,
            extends_ref: None,
            private_instance_method_ref: None,
            private_static_method_ref: None,
            next_initializer_index: 0,
            inner_name_escaped: false,
            used_super_shim: false,
            pushed_private_props: false,
        }
    }

    fn next_initializer_flag(&mut self, is_pre: bool) -> u32 {
        let i = self.next_initializer_index;
        if is_pre {
            (2 * i + 4) << 1
        } else {
            self.next_initializer_index += 1;
            ((2 * i + 5) << 1) | 1
        }
    }
}

/// The class-lowering pass itself.
pub struct ClassProperties<'a, 'ctx> {
    pub(crate) options: ClassPropertiesOptions,
    /// Fallback name-capture state for the current class, used when it has
    /// no entry on `private_props_stack` (no private members at all).
    pub(crate) class_bindings: ClassBindings<'a>,
    /// One entry per class currently being lowered that *has* private
    /// members, innermost last. A nested class (e.g. a class literal inside
    /// a static block) pushes its own entry so private-symbol resolution
    /// can still reach an outer class's private members while the inner one
    /// is being processed (`static_prop.rs`'s doc comment walks through
    /// why this ordering matters).
    pub(crate) private_props_stack: Vec<PrivateProps<'a>>,
    /// One entry per class currently being lowered, parallel in spirit to
    /// `private_props_stack` but always present (`spec.md` §3
    /// `LowerClassContext`).
    class_contexts: Vec<LowerClassContext<'a>>,
    /// Statements owed to a class's enclosing statement list, keyed by the
    /// class's own span, drained by [`emitter::ClassProperties::flush_pending_in_statements`]
    /// the next time this pass sees that statement list (`spec.md` §4.9).
    pending: FxHashMap<Span, PendingEmission<'a>>,
    diagnostics: Vec<OxcDiagnostic>,
    marker: std::marker::PhantomData<&'ctx ()>,
}

impl<'a, 'ctx> ClassProperties<'a, 'ctx> {
    #[must_use]
    pub fn new(options: ClassPropertiesOptions) -> Self {
        Self {
            options,
            class_bindings: ClassBindings::default(),
            private_props_stack: Vec::new(),
            class_contexts: Vec::new(),
            pending: FxHashMap::default(),
            diagnostics: Vec::new(),
            marker: std::marker::PhantomData,
        }
    }

    pub fn take_diagnostics(&mut self) -> Vec<OxcDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Resolve a `PrivateIdentifier`'s reference to the `SymbolId` of the
    /// private member it denotes, through the host's symbol table.
    pub(crate) fn resolve_private_symbol(
        &self,
        ident: &PrivateIdentifier,
        ctx: &TraverseCtx<'a>,
    ) -> Option<SymbolId> {
        let reference_id = ident.reference_id.get()?;
        ctx.scoping().get_reference(reference_id).symbol_id()
    }

    /// Whether anything in `class` requires this pass to do work at all
    /// (`SPEC_FULL.md` §2 "Empty class body fast path").
    fn class_needs_processing(&self, class: &Class<'a>) -> bool {
        !class.decorators.is_empty()
            || class.body.body.iter().any(|el| match el {
                ClassElement::StaticBlock(_) => true,
                ClassElement::PropertyDefinition(_) => true,
                ClassElement::AccessorProperty(_) => true,
                ClassElement::MethodDefinition(m) => {
                    !m.decorators.is_empty()
                        || crate::typescript::is_elided_member(el)
                        || (m.kind == MethodDefinitionKind::Constructor
                            && m.value.params.items.iter().any(|p| p.accessibility.is_some() || p.readonly))
                }
                ClassElement::TSIndexSignature(_) => false,
            })
    }

    /// Orchestrate one class's lowering end to end (`spec.md` §2): rewrite
    /// auto-accessors, compute `ClassLoweringInfo`, hoist computed keys,
    /// route every property, synthesize the constructor, apply class-level
    /// decorators, then hand everything to the emitter.
    fn lower_class(&mut self, class: &mut Class<'a>, mut class_ctx: LowerClassContext<'a>, ctx: &mut TraverseCtx<'a>) {
        self.elide_declared_members(class, ctx);

        let class_is_decorated = !class.decorators.is_empty();
        let class_decorators = std::mem::replace(&mut class.decorators, ctx.ast.vec());

        if class_is_decorated {
            let binding = self.ensure_class_name(class, ctx);
            let bindings = match self.private_props_stack.last_mut() {
                Some(props) => &mut props.class_bindings,
                None => &mut self.class_bindings,
            };
            if bindings.name.is_none() {
                bindings.name = Some(binding);
            }
        }

        self.rewrite_auto_accessors(class, &mut class_ctx, ctx);

        let any_property_decorated =
            class.body.body.iter().any(|el| element_decorators(el).is_some_and(|d| !d.is_empty()));
        let info = class_lowering_info::compute_class_lowering_info(
            class,
            &self.options,
            class_is_decorated,
            any_property_decorated,
        );

        let analyses: Vec<_> = class.body.body.iter().map(|el| self.analyze_property(el, &info)).collect();
        let property_survives: Vec<bool> = class
            .body
            .body
            .iter()
            .zip(&analyses)
            .map(|(el, analysis)| property_survives(el, analysis, &self.options))
            .collect();

        let mut hoist = self.hoist_computed_keys(class, &property_survives, ctx);

        // A moved/removed property's computed key was just replaced with a
        // placeholder and its value captured into `hoist.plans[i].key_temp`
        // (`spec.md` §4.5 fourth rule); splice a read of that temp back into
        // the key slot so the routing pass below still sees the right key
        // expression instead of the placeholder `move_expression` left.
        for (i, element) in class.body.body.iter_mut().enumerate() {
            if property_survives[i] {
                continue;
            }
            let Some(temp) = hoist.plans[i].key_temp.take() else { continue };
            if let Some(key_slot) = computed_keys::element_key_mut(element) {
                *key_slot = PropertyKey::from(read(&temp, ctx));
            }
        }

        let old_body = std::mem::replace(&mut class.body.body, ctx.ast.vec());
        let mut new_body = ctx.ast.vec_with_capacity(old_body.len());
        for (element, analysis) in old_body.into_iter().zip(analyses) {
            if let Some(kept) = self.route_property(element, analysis, &mut class_ctx, ctx) {
                new_body.push(kept);
            }
        }
        class.body.body = new_body;

        // Fixed per-stage extra-initializer calls (`spec.md` §4.7 point 5):
        // unconditional call sites whenever decorator usage established a
        // `__decoratorStart` context at all, regardless of whether any
        // decorator in this class actually calls `context.addInitializer`
        // (`SPEC_FULL.md` §2 "Decorator + private-method interaction").
        if class_ctx.decorator_context_ref.is_some() {
            let instance_target = ctx.ast.expression_this(SPAN);
            let instance_extra = self.extra_initializers_call(&mut class_ctx, 5, instance_target, ctx);
            class_ctx.instance_members.push(ctx.ast.statement_expression(SPAN, instance_extra));

            let static_target = read(self.get_temp_binding(ctx), ctx);
            let static_extra = self.extra_initializers_call(&mut class_ctx, 3, static_target, ctx);
            class_ctx.static_members.push(static_extra);
        }

        self.synthesize_constructor(class, &mut class_ctx, ctx);

        // A class with no decorators of its own still needs a
        // `__decorateClass` application when one of its constructor
        // parameters is decorated (`spec.md §4.6` "merge per-parameter
        // decorator calls into ... the class's decorator list (for the
        // constructor)"): the parameter decorators have nowhere else to go.
        let class_is_decorated = class_is_decorated || !class_ctx.constructor_parameter_decorators.is_empty();

        if class_is_decorated {
            let class_name = self
                .class_bindings
                .name
                .clone()
                .or_else(|| self.private_props_stack.last().and_then(|p| p.class_bindings.name.clone()));
            let name_expr = class_name
                .map(|binding| ctx.ast.expression_string_literal(SPAN, binding.name.clone(), None))
                .unwrap_or_else(|| ctx.ast.expression_null_literal(SPAN));

            if self.options.should_lower_experimental_decorators() {
                let param_decorators = std::mem::take(&mut class_ctx.constructor_parameter_decorators);
                let assign =
                    self.legacy_class_decorator_assignment(class_decorators, param_decorators, ctx);
                class_ctx.experimental_class_decorator_assign = Some(assign);
            } else {
                let decorators_ref = standard_class_decorators_array(class_decorators, ctx);
                let assign = self.standard_class_decorator_assignment(&mut class_ctx, name_expr, decorators_ref, ctx);
                class_ctx.standard_class_decorator_assign = Some(assign);
            };
        }

        self.emit_class(&mut class_ctx, hoist.prefix_chain, ctx);
    }

    /// Pre-register private-symbol bindings (the `Link` redirection,
    /// `spec.md` §3) for every private field/method `class` will lower,
    /// before descending into any method body.
    ///
    /// Method bodies that stay in place are rewritten by the generic
    /// `enter_expression`/`enter_assignment_target` hooks below while this
    /// class is still the innermost entry on `private_props_stack` — but
    /// those method bodies are visited by the ordinary depth-first
    /// traversal *before* `exit_class` (and therefore `lower_class`'s
    /// forward property-routing pass, which is what normally creates each
    /// private symbol's `WeakMap`/`WeakSet` binding) ever runs. Without this
    /// eager pass, `class A { #x = 1; y() { return this.#x } }`'s `y` would
    /// be visited while `#x` has no binding yet, and `this.#x` would be left
    /// unrewritten (`spec.md` §8's first concrete scenario).
    ///
    /// Mirrors `analyze_property`'s own classification exactly (by calling
    /// it), so there is exactly one place that decides "must this private
    /// member be lowered" — this pass only *acts* on that decision earlier.
    fn pre_register_private_symbols(&mut self, class: &Class<'a>, ctx: &mut TraverseCtx<'a>) {
        let class_is_decorated = !class.decorators.is_empty();
        let any_property_decorated =
            class.body.body.iter().any(|el| element_decorators(el).is_some_and(|d| !d.is_empty()));
        let info = class_lowering_info::compute_class_lowering_info(
            class,
            &self.options,
            class_is_decorated,
            any_property_decorated,
        );

        let Some(mut class_ctx) = self.class_contexts.pop() else { return };
        for element in &class.body.body {
            let analysis = self.analyze_property(element, &info);
            match element {
                ClassElement::PropertyDefinition(prop) if analysis.is_private && analysis.must_lower_field => {
                    if let PropertyKey::PrivateIdentifier(ident) = &prop.key {
                        if let Some(symbol_id) = self.resolve_private_declaration_symbol(ident, ctx) {
                            self.register_private_field_symbol(
                                &mut class_ctx,
                                symbol_id,
                                &ident.name,
                                prop.r#static,
                                ctx,
                            );
                        }
                    }
                }
                ClassElement::MethodDefinition(method)
                    if method.kind != MethodDefinitionKind::Constructor
                        && analysis.is_private
                        && self.options.is_private_method_unsupported(method.r#static) =>
                {
                    if let PropertyKey::PrivateIdentifier(ident) = &method.key {
                        if let Some(symbol_id) = self.resolve_private_declaration_symbol(ident, ctx) {
                            let kind = match (method.kind, method.r#static) {
                                (MethodDefinitionKind::Get, false) => PrivateKind::Get,
                                (MethodDefinitionKind::Get, true) => PrivateKind::StaticGet,
                                (MethodDefinitionKind::Set, false) => PrivateKind::Set,
                                (MethodDefinitionKind::Set, true) => PrivateKind::StaticSet,
                                (_, false) => PrivateKind::Method,
                                (_, true) => PrivateKind::StaticMethod,
                            };
                            self.register_private_method_symbol(&mut class_ctx, symbol_id, &ident.name, kind, ctx);
                        }
                    }
                }
                _ => {}
            }
        }
        self.class_contexts.push(class_ctx);
    }

    /// Drop every `declare`/`abstract` member before anything else sees the
    /// class body (`SPEC_FULL.md` §2): these never reach runtime, so there
    /// is nothing for the property processor, computed-key hoister, or
    /// decorator bucket to do with them.
    fn elide_declared_members(&mut self, class: &mut Class<'a>, ctx: &mut TraverseCtx<'a>) {
        if !class.body.body.iter().any(crate::typescript::is_elided_member) {
            return;
        }
        let old_body = std::mem::replace(&mut class.body.body, ctx.ast.vec());
        let mut kept = ctx.ast.vec_with_capacity(old_body.len());
        for element in old_body {
            if !crate::typescript::is_elided_member(&element) {
                kept.push(element);
            }
        }
        class.body.body = kept;
    }

    /// Desugar every `accessor` property in `class` into a getter/setter
    /// pair backed by a private storage slot (`spec.md` §4.10), in place,
    /// before any other per-property pass runs. A no-op when the target
    /// natively supports `accessor` fields: the storage slot this produces
    /// is never a real declared private member (no `PrivateIdentifier` with
    /// a bound `SymbolId` exists for it), so it's wired directly onto
    /// `class_ctx` here rather than flowing through the normal
    /// `analyze_property`/`route_field` pipeline, which only ever handles
    /// members `SemanticBuilder` already bound.
    fn rewrite_auto_accessors(
        &mut self,
        class: &mut Class<'a>,
        class_ctx: &mut LowerClassContext<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) {
        if !self.options.is_auto_accessor_unsupported() {
            return;
        }
        if !class.body.body.iter().any(|el| matches!(el, ClassElement::AccessorProperty(_))) {
            return;
        }

        let old_body = std::mem::replace(&mut class.body.body, ctx.ast.vec());
        let mut new_body = ctx.ast.vec_with_capacity(old_body.len());
        for element in old_body {
            match element {
                ClassElement::AccessorProperty(accessor) => {
                    let mut accessor = accessor.unbox();
                    let span = accessor.span;
                    let is_static = accessor.r#static;
                    let rewritten = self.rewrite_auto_accessor(class_ctx, &mut accessor, ctx);

                    let getter_name = accessor_name_key(&accessor.key, ctx);
                    let getter = ctx.ast.class_element_method_definition(
                        span,
                        MethodDefinitionType::MethodDefinition,
                        ctx.ast.vec(),
                        getter_name,
                        rewritten.getter,
                        MethodDefinitionKind::Get,
                        false,
                        is_static,
                        false,
                        false,
                        None,
                    );
                    new_body.push(getter);

                    let setter_name = accessor_name_key(&accessor.key, ctx);
                    let setter = ctx.ast.class_element_method_definition(
                        span,
                        MethodDefinitionType::MethodDefinition,
                        ctx.ast.vec(),
                        setter_name,
                        rewritten.setter,
                        MethodDefinitionKind::Set,
                        false,
                        is_static,
                        false,
                        false,
                        None,
                    );
                    new_body.push(setter);
                }
                other => new_body.push(other),
            }
        }
        class.body.body = new_body;
    }
}

fn element_decorators<'a, 'b>(element: &'b ClassElement<'a>) -> Option<&'b oxc_allocator::Vec<'a, Decorator<'a>>> {
    match element {
        ClassElement::MethodDefinition(m) => Some(&m.decorators),
        ClassElement::PropertyDefinition(p) => Some(&p.decorators),
        ClassElement::AccessorProperty(a) => Some(&a.decorators),
        ClassElement::StaticBlock(_) | ClassElement::TSIndexSignature(_) => None,
    }
}

/// Whether `element` remains in the class body after routing — mirrors the
/// decisions `ClassProperties::route_property` actually makes, computed
/// ahead of time so `hoist_computed_keys` (`spec.md` §4.5) knows which
/// computed keys are about to move. `options` provides the same
/// `is_private_method_unsupported` check `route_method` itself consults.
fn property_survives(
    element: &ClassElement,
    analysis: &property_processor::PropertyAnalysis,
    options: &ClassPropertiesOptions,
) -> bool {
    match element {
        ClassElement::StaticBlock(_) => !options.is_static_blocks_unsupported(),
        ClassElement::TSIndexSignature(_) => true,
        ClassElement::PropertyDefinition(_) => {
            let needs_lowering = analysis.must_lower_field || analysis.static_field_to_block_assign || analysis.is_private;
            !needs_lowering && !analysis.should_omit_field_initializer
        }
        ClassElement::MethodDefinition(m) => {
            m.kind == MethodDefinitionKind::Constructor
                || !analysis.is_private
                || !options.is_private_method_unsupported(m.r#static)
        }
        // Only reaches here untouched when auto-accessors are natively
        // supported (`rewrite_auto_accessors` already removed every other
        // one before this is computed), so it always stays.
        ClassElement::AccessorProperty(_) => true,
    }
}

fn accessor_name_key<'a>(original: &PropertyKey<'a>, ctx: &mut TraverseCtx<'a>) -> PropertyKey<'a> {
    match original {
        PropertyKey::StaticIdentifier(ident) => {
            PropertyKey::StaticIdentifier(ctx.ast.alloc_identifier_name(ident.span, ident.name.clone()))
        }
        PropertyKey::PrivateIdentifier(ident) => {
            PropertyKey::PrivateIdentifier(ctx.ast.alloc_private_identifier(ident.span, ident.name.clone()))
        }
        _ => PropertyKey::StaticIdentifier(ctx.ast.alloc_identifier_name(SPAN, "accessor")),
    }
}

fn standard_class_decorators_array<'a>(
    decorators: oxc_allocator::Vec<'a, Decorator<'a>>,
    ctx: &mut TraverseCtx<'a>,
) -> Expression<'a> {
    let elements = ctx.ast.vec_from_iter(decorators.into_iter().map(|d| ArrayExpressionElement::from(d.expression)));
    ctx.ast.expression_array(SPAN, elements)
}

impl<'a, 'ctx> Traverse<'a> for ClassProperties<'a, 'ctx> {
    fn enter_class(&mut self, class: &mut Class<'a>, ctx: &mut TraverseCtx<'a>) {
        if !self.class_needs_processing(class) {
            return;
        }

        let kind = classify_class(class, ctx);
        let mut class_ctx = LowerClassContext::new(kind, class.span);

        let class_name_binding = class.id.as_ref().map(|id| {
            BoundIdentifier::new(id.name.clone(), id.symbol_id().expect("class id must be bound"))
        });

        if class_has_private_members(class) {
            let mut private_props = PrivateProps::default();
            private_props.class_bindings.name = class_name_binding.clone();
            self.private_props_stack.push(private_props);
            class_ctx.pushed_private_props = true;
            self.class_contexts.push(class_ctx);
            self.pre_register_private_symbols(class, ctx);
        } else {
            self.class_bindings = ClassBindings::default();
            self.class_bindings.name = class_name_binding;
            self.class_contexts.push(class_ctx);
        }
    }

    fn exit_class(&mut self, class: &mut Class<'a>, ctx: &mut TraverseCtx<'a>) {
        let Some(class_ctx) = self.class_contexts.pop() else { return };
        let pushed_private_props = class_ctx.pushed_private_props;
        self.lower_class(class, class_ctx, ctx);

        if pushed_private_props {
            self.private_props_stack.pop();
        }
    }

    /// Rewrite private-member accesses (`spec.md` §4.1) that appear in code
    /// which *stays* inside the class body — method bodies, non-relocated
    /// field initializers, computed keys. Static-initializer expressions
    /// that get relocated outside the body are handled separately by
    /// `static_prop.rs`'s `StaticInitializerVisitor`, which runs before this
    /// generic traversal ever reaches them (they've already been spliced
    /// into `static_members` as plain expressions by the time `exit_class`
    /// returns). Guarded on `private_props_stack` being non-empty so this is
    /// a no-op everywhere outside a class that has private members.
    fn enter_expression(&mut self, expr: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) {
        if self.private_props_stack.is_empty() {
            return;
        }
        match expr {
            Expression::PrivateFieldExpression(_) => self.transform_private_field_expression(expr, ctx),
            Expression::PrivateInExpression(_) => self.transform_private_in_expression_entry(expr, ctx),
            Expression::CallExpression(_) => self.transform_call_expression(expr, ctx),
            Expression::AssignmentExpression(_) => self.transform_assignment_expression(expr, ctx),
            Expression::UpdateExpression(_) => self.transform_update_expression(expr, ctx),
            Expression::ChainExpression(_) => self.transform_chain_expression(expr, ctx),
            Expression::TaggedTemplateExpression(_) => self.transform_tagged_template_expression(expr, ctx),
            _ => {}
        }
    }

    /// `[object.#prop] = []` in code that stays inside the class body
    /// (`spec.md` §4.1 "Destructuring target"); see `enter_expression`'s
    /// doc comment for why this is separate from `static_prop.rs`.
    fn enter_assignment_target(&mut self, target: &mut AssignmentTarget<'a>, ctx: &mut TraverseCtx<'a>) {
        if self.private_props_stack.is_empty() {
            return;
        }
        self.transform_assignment_target(target, ctx);
    }

    /// Splice in any pending prefix/suffix statements for a class declared
    /// directly in the program body (`spec.md` §4.9).
    fn exit_program(&mut self, program: &mut Program<'a>, ctx: &mut TraverseCtx<'a>) {
        self.flush_pending_in_statements(&mut program.body, ctx);
    }

    /// Same as `exit_program`, for a class declared inside a block
    /// (`spec.md` §4.9).
    fn exit_block_statement(&mut self, block: &mut BlockStatement<'a>, ctx: &mut TraverseCtx<'a>) {
        self.flush_pending_in_statements(&mut block.body, ctx);
    }

    /// Same as `exit_program`, for a class declared as the last statement of
    /// a function body, or inside one (`spec.md` §4.9).
    fn exit_function_body(&mut self, body: &mut FunctionBody<'a>, ctx: &mut TraverseCtx<'a>) {
        self.flush_pending_in_statements(&mut body.statements, ctx);
    }

    /// Same as `exit_program`, for a class declared inside a `static { }`
    /// block (`spec.md` §4.9) — this class's own `static_block_iife`
    /// wrapping runs afterward (outer to inner), so a pending emission here
    /// is still drained before the static block itself is turned into an
    /// IIFE body.
    fn exit_static_block(&mut self, block: &mut StaticBlock<'a>, ctx: &mut TraverseCtx<'a>) {
        self.flush_pending_in_statements(&mut block.body, ctx);
    }
}

fn classify_class(class: &Class, ctx: &TraverseCtx) -> ClassKind {
    use oxc_traverse::Ancestor;
    match ctx.parent() {
        Ancestor::ExportNamedDeclarationDeclaration(_) => ClassKind::ExportStmt,
        Ancestor::ExportDefaultDeclarationDeclaration(_) => ClassKind::ExportDefaultStmt,
        _ if class.is_expression() => ClassKind::Expr,
        _ => ClassKind::Stmt,
    }
}

fn class_has_private_members(class: &Class) -> bool {
    class.body.body.iter().any(|el| match el {
        ClassElement::PropertyDefinition(p) => matches!(p.key, PropertyKey::PrivateIdentifier(_)),
        ClassElement::MethodDefinition(m) => matches!(m.key, PropertyKey::PrivateIdentifier(_)),
        ClassElement::AccessorProperty(a) => matches!(a.key, PropertyKey::PrivateIdentifier(_)),
        _ => false,
    })
}

