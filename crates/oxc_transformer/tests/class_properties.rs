//! End-to-end tests driving the real parser/semantic pipeline into
//! [`oxc_transformer::lower_classes`] and asserting on the resulting AST
//! shape, one scenario per testable property this subsystem promises.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{lower_classes, ClassPropertiesOptions, UnsupportedFeatures};

fn lower<'a>(
    allocator: &'a Allocator,
    source_text: &'static str,
    options: ClassPropertiesOptions,
) -> Program<'a> {
    let source_type = SourceType::default();
    let parser_ret = Parser::new(allocator, source_text, source_type).parse();
    assert!(parser_ret.errors.is_empty(), "parse errors: {:?}", parser_ret.errors);
    let mut program = parser_ret.program;

    let semantic_ret = SemanticBuilder::new().build(&program);
    assert!(semantic_ret.errors.is_empty(), "semantic errors: {:?}", semantic_ret.errors);
    let scoping = semantic_ret.semantic.into_scoping();

    let diagnostics = lower_classes(allocator, &mut program, scoping, options);
    assert!(diagnostics.is_empty(), "unexpected transform diagnostics: {diagnostics:?}");
    program
}

fn find_method<'a, 'b>(class: &'b Class<'a>, name: &str) -> &'b MethodDefinition<'a> {
    class
        .body
        .body
        .iter()
        .find_map(|el| match el {
            ClassElement::MethodDefinition(m)
                if matches!(&m.key, PropertyKey::StaticIdentifier(id) if id.name == name) =>
            {
                Some(m.as_ref())
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("expected to find method `{name}`"))
}

fn find_method_by_kind<'a, 'b>(class: &'b Class<'a>, kind: MethodDefinitionKind) -> &'b MethodDefinition<'a> {
    class
        .body
        .body
        .iter()
        .find_map(|el| match el {
            ClassElement::MethodDefinition(m) if m.kind == kind => Some(m.as_ref()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("expected to find a method of kind {kind:?}"))
}

fn call_callee_name<'a>(call: &CallExpression<'a>) -> &str {
    let Expression::Identifier(ident) = &call.callee else {
        panic!("expected callee to be a plain identifier, got {:?}", call.callee)
    };
    ident.name.as_str()
}

/// A private instance field read from a method is eagerly registered
/// (`mod.rs`'s `pre_register_private_symbols`) before that method's own
/// body is traversed, so the read rewrites correctly even though the field
/// declaration and the method appear in source order before any routing
/// pass has run.
#[test]
fn private_instance_field_read_is_lowered() {
    let allocator = Allocator::default();
    let source = "class A { #x = 1; read() { return this.#x; } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_FIELD;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };

    // The private field itself no longer survives as a class member: its
    // initializer becomes a `__privateAdd` call injected into the
    // synthesized constructor.
    assert!(
        !class.body.body.iter().any(|el| matches!(
            el,
            ClassElement::PropertyDefinition(p) if matches!(p.key, PropertyKey::PrivateIdentifier(_))
        )),
        "private field should no longer be a class member"
    );

    let ctor = find_method_by_kind(class, MethodDefinitionKind::Constructor);
    let ctor_body = ctor.value.body.as_ref().expect("constructor must have a body");
    assert_eq!(ctor_body.statements.len(), 1);
    let Statement::ExpressionStatement(stmt) = &ctor_body.statements[0] else {
        panic!("expected an expression statement")
    };
    let Expression::CallExpression(add_call) = &stmt.expression else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(add_call), "__privateAdd");
    assert_eq!(add_call.arguments.len(), 3);

    let read = find_method(class, "read");
    let read_body = read.value.body.as_ref().expect("read must have a body");
    let Statement::ReturnStatement(ret) = &read_body.statements[0] else {
        panic!("expected a return statement")
    };
    let Expression::CallExpression(get_call) = ret.argument.as_ref().expect("return must have a value") else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(get_call), "__privateGet");
    assert_eq!(get_call.arguments.len(), 2);
}

/// A private static method called from another static method goes through
/// `__privateMethod`, and its brand `WeakSet` is registered after the class.
#[test]
fn private_static_method_call_is_lowered() {
    let allocator = Allocator::default();
    let source = "class A { static #m() { return 1; } static call() { return A.#m(); } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_STATIC_METHOD;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    assert!(
        !class.body.body.iter().any(|el| matches!(
            el,
            ClassElement::MethodDefinition(m) if matches!(&m.key, PropertyKey::PrivateIdentifier(_))
        )),
        "private method should no longer be a class member"
    );

    let call_method = find_method(class, "call");
    let body = call_method.value.body.as_ref().expect("call must have a body");
    let Statement::ReturnStatement(ret) = &body.statements[0] else {
        panic!("expected a return statement")
    };
    let Expression::CallExpression(outer_call) = ret.argument.as_ref().expect("return must have a value") else {
        panic!("expected a call expression")
    };
    assert_eq!(outer_call.arguments.len(), 0, "the original empty call arguments must be preserved");
    let Expression::CallExpression(inner_call) = &outer_call.callee else {
        panic!("expected the callee itself to be a call expression (the __privateMethod wrapper)")
    };
    assert_eq!(call_callee_name(inner_call), "__privateMethod");
    assert_eq!(inner_call.arguments.len(), 3);

    // A `__privateAdd(A, _m)` registration call was emitted after the class.
    let registers_method = program.body.iter().skip(1).any(|stmt| {
        let Statement::ExpressionStatement(expr_stmt) = stmt else { return false };
        let Expression::CallExpression(call) = &expr_stmt.expression else { return false };
        matches!(&call.callee, Expression::Identifier(ident) if ident.name == "__privateAdd")
    });
    assert!(registers_method, "expected a __privateAdd(...) statement registering the static method's WeakSet");
}

/// More than one `super()` call forces the constructor body through the
/// `__super` shim, with injected statements (here, a private field's
/// `__privateAdd`) placed inside the shim rather than after just the first
/// call.
#[test]
fn multiple_super_calls_route_through_shim() {
    let allocator = Allocator::default();
    let source = "class A extends Base { #x = 1; constructor() { super(); super(); } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_FIELD;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    let ctor = find_method_by_kind(class, MethodDefinitionKind::Constructor);
    let body = ctor.value.body.as_ref().expect("constructor must have a body");

    let Statement::VariableDeclaration(decl) = &body.statements[0] else {
        panic!("expected the shim's `var _super = ...` declaration first")
    };
    assert_eq!(decl.declarations.len(), 1);
    let BindingPatternKind::BindingIdentifier(shim_ident) = &decl.declarations[0].id.kind else {
        panic!("expected a simple binding identifier for the shim")
    };
    let init = decl.declarations[0].init.as_ref().expect("shim must have an initializer");
    let Expression::ArrowFunctionExpression(arrow) = init else {
        panic!("shim initializer must be an arrow function")
    };

    assert_eq!(arrow.body.statements.len(), 3, "real super() call, injected __privateAdd, then `return this`");
    let Statement::ExpressionStatement(first) = &arrow.body.statements[0] else {
        panic!("expected the real super() call first inside the shim")
    };
    assert!(
        matches!(&first.expression, Expression::CallExpression(c) if matches!(c.callee, Expression::Super(_))),
        "first statement inside the shim must be the real super(...args) call"
    );
    let Statement::ExpressionStatement(second) = &arrow.body.statements[1] else {
        panic!("expected the injected private-field registration second")
    };
    let Expression::CallExpression(add_call) = &second.expression else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(add_call), "__privateAdd");
    let Statement::ReturnStatement(ret) = &arrow.body.statements[2] else {
        panic!("expected `return this` last inside the shim")
    };
    assert!(matches!(ret.argument, Some(Expression::ThisExpression(_))));

    // Both of the original `super()` call sites were rewritten to call the
    // shim by name, and nothing else was left in the constructor body.
    assert_eq!(body.statements.len(), 3, "shim declaration plus the two rewritten super() calls");
    let mut rewritten_calls = 0;
    for stmt in body.statements.iter().skip(1) {
        let Statement::ExpressionStatement(expr_stmt) = stmt else {
            panic!("expected an expression statement")
        };
        let Expression::CallExpression(call) = &expr_stmt.expression else {
            panic!("expected a call expression")
        };
        let Expression::Identifier(callee) = &call.callee else {
            panic!("expected the call to route through the shim identifier")
        };
        assert_eq!(callee.name.as_str(), shim_ident.name.as_str());
        rewritten_calls += 1;
    }
    assert_eq!(rewritten_calls, 2);
}

/// A `static { ... }` block is relocated after the class as a standalone
/// IIFE when the target doesn't support them natively.
#[test]
fn static_block_is_lowered_to_iife() {
    let allocator = Allocator::default();
    let source = "class A { static { A.ran = true; } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_STATIC_BLOCKS;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    assert!(
        class.body.body.is_empty(),
        "the static block should have been fully removed from the class body"
    );

    let iife = program
        .body
        .iter()
        .skip(1)
        .find_map(|stmt| match stmt {
            Statement::ExpressionStatement(e) => Some(&e.expression),
            _ => None,
        })
        .expect("expected a trailing expression statement for the static block's IIFE");
    let Expression::CallExpression(call) = iife else { panic!("expected a call expression") };
    assert_eq!(call.arguments.len(), 0);
    assert!(
        matches!(call.callee, Expression::ArrowFunctionExpression(_)),
        "the static block's IIFE callee should be its own arrow function"
    );
}

/// `accessor x = v` desugars to a `get`/`set` pair backed by a private
/// `WeakMap` slot that never becomes a class member of its own (no
/// `PrivateIdentifier` is ever synthesized for it — see `auto_accessor.rs`).
#[test]
fn auto_accessor_is_rewritten_to_weakmap_get_set() {
    let allocator = Allocator::default();
    let source = "class A { accessor x = 1; }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_AUTO_ACCESSOR;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    assert!(
        !class.body.body.iter().any(|el| matches!(el, ClassElement::AccessorProperty(_))),
        "the accessor property should be fully desugared"
    );

    let getter = find_method_by_kind(class, MethodDefinitionKind::Get);
    let getter_body = getter.value.body.as_ref().expect("getter must have a body");
    let Statement::ReturnStatement(ret) = &getter_body.statements[0] else {
        panic!("expected a return statement")
    };
    let Expression::CallExpression(get_call) = ret.argument.as_ref().expect("return must have a value") else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(get_call), "__privateGet");
    assert_eq!(get_call.arguments.len(), 2);

    let setter = find_method_by_kind(class, MethodDefinitionKind::Set);
    let setter_body = setter.value.body.as_ref().expect("setter must have a body");
    let Statement::ExpressionStatement(set_stmt) = &setter_body.statements[0] else {
        panic!("expected an expression statement")
    };
    let Expression::CallExpression(set_call) = &set_stmt.expression else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(set_call), "__privateSet");
    assert_eq!(set_call.arguments.len(), 3);

    let ctor = find_method_by_kind(class, MethodDefinitionKind::Constructor);
    let ctor_body = ctor.value.body.as_ref().expect("constructor must have a body");
    let Statement::ExpressionStatement(add_stmt) = &ctor_body.statements[0] else {
        panic!("expected an expression statement")
    };
    let Expression::CallExpression(add_call) = &add_stmt.expression else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(add_call), "__privateAdd");
    assert_eq!(add_call.arguments.len(), 3);
}

/// An accessor field left native (target supports `accessor`) is never
/// touched by the rewrite at all.
#[test]
fn auto_accessor_is_untouched_when_natively_supported() {
    let allocator = Allocator::default();
    let source = "class A { accessor x = 1; }";
    let options = ClassPropertiesOptions::default();
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    assert_eq!(class.body.body.len(), 1);
    assert!(matches!(class.body.body[0], ClassElement::AccessorProperty(_)));
}

/// A nested class with no private members of its own (here, a class
/// expression used as a static field's initializer) must not pop the
/// enclosing class's `PrivateProps` entry off the stack early: `exit_class`
/// only pops when `enter_class` actually pushed for that specific class, not
/// merely because the stack happens to be non-empty.
#[test]
fn nested_class_without_private_members_does_not_clobber_outer_private_props() {
    let allocator = Allocator::default();
    let source = "class A { #x = 1; static y = class B {}; m() { return this.#x; } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_FIELD;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };

    let m = find_method(class, "m");
    let body = m.value.body.as_ref().expect("m must have a body");
    let Statement::ReturnStatement(ret) = &body.statements[0] else {
        panic!("expected a return statement")
    };
    let Expression::CallExpression(get_call) = ret.argument.as_ref().expect("return must have a value") else {
        panic!("expected `this.#x` to have been rewritten to a __privateGet(...) call, not left as-is")
    };
    assert_eq!(call_callee_name(get_call), "__privateGet");
    assert_eq!(get_call.arguments.len(), 2);
}

/// `#f in o` becomes a call to the brand-check helper.
#[test]
fn private_in_expression_is_rewritten_to_brand_check() {
    let allocator = Allocator::default();
    let source = "class A { #x = 1; static has(o) { return #x in o; } }";
    let mut options = ClassPropertiesOptions::default();
    options.unsupported_features = UnsupportedFeatures::CLASS_PRIVATE_FIELD;
    let program = lower(&allocator, source, options);

    let Statement::ClassDeclaration(class) = &program.body[0] else {
        panic!("expected a class declaration")
    };
    let has = find_method(class, "has");
    let body = has.value.body.as_ref().expect("has must have a body");
    let Statement::ReturnStatement(ret) = &body.statements[0] else {
        panic!("expected a return statement")
    };
    let Expression::CallExpression(call) = ret.argument.as_ref().expect("return must have a value") else {
        panic!("expected a call expression")
    };
    assert_eq!(call_callee_name(call), "__privateIn");
    assert_eq!(call.arguments.len(), 2);
}
