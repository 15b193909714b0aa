//! Shared AST-construction helpers used across the class-lowering modules.
//!
//! The runtime helper call surface (`spec.md` §6) is built through
//! [`call_helper`]: every call site references the helper purely by name,
//! the way `spec.md` §1 requires — this crate never defines what
//! `__privateGet` etc. actually do.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::*;
use oxc_span::Span;
use oxc_traverse::TraverseCtx;

/// Build a call expression `name(args...)` referencing a free (global)
/// identifier — the unbound runtime-helper reference the host's runtime
/// library is expected to provide (`spec.md` §6 "Helper-function call
/// surface").
pub fn call_helper<'a>(
    ctx: &mut TraverseCtx<'a>,
    span: Span,
    name: &'static str,
    args: ArenaVec<'a, Expression<'a>>,
) -> Expression<'a> {
    let callee = ctx.ast.expression_identifier_reference(span, name);
    let arguments = args.into_iter().map(Argument::from).collect_into_arena(ctx);
    ctx.ast.expression_call(span, callee, NONE, arguments, false)
}

/// Small extension trait turning an iterator of `Argument` into an arena
/// `Vec`, without every call site having to spell out `ctx.ast.vec_from_iter`.
trait CollectIntoArena<'a> {
    fn collect_into_arena(self, ctx: &TraverseCtx<'a>) -> ArenaVec<'a, Argument<'a>>;
}

impl<'a, I: Iterator<Item = Argument<'a>>> CollectIntoArena<'a> for I {
    fn collect_into_arena(self, ctx: &TraverseCtx<'a>) -> ArenaVec<'a, Argument<'a>> {
        ctx.ast.vec_from_iter(self)
    }
}

pub fn ident_expr<'a>(ctx: &mut TraverseCtx<'a>, span: Span, name: &'static str) -> Expression<'a> {
    ctx.ast.expression_identifier_reference(span, name)
}

pub fn null_literal<'a>(ctx: &mut TraverseCtx<'a>, span: Span) -> Expression<'a> {
    ctx.ast.expression_null_literal(span)
}

pub fn string_literal<'a>(ctx: &mut TraverseCtx<'a>, span: Span, value: &str) -> Expression<'a> {
    let value = ctx.ast.atom(value);
    ctx.ast.expression_string_literal(span, value, None)
}

/// Build `a, b, c, ...` as a single comma (sequence) expression, the form
/// used for `computed_property_chain` and the prefix/suffix expression
/// chains the emitter assembles (`spec.md` §4.5, §4.9).
///
/// Returns `None` if `exprs` is empty, a bare expression if it holds
/// exactly one element, and a `SequenceExpression` otherwise — this keeps
/// single-expression chains from growing a pointless wrapper.
pub fn sequence_of<'a>(
    ctx: &mut TraverseCtx<'a>,
    span: Span,
    mut exprs: ArenaVec<'a, Expression<'a>>,
) -> Option<Expression<'a>> {
    match exprs.len() {
        0 => None,
        1 => Some(exprs.remove(0)),
        _ => Some(ctx.ast.expression_sequence(span, exprs)),
    }
}

/// Merge two optional expression chains into one comma expression
/// (`spec.md` §4.5's `computed_property_chain`, and the prefix/suffix
/// assembly in §4.9). `a` evaluates before `b`.
pub fn merge_chains<'a>(
    ctx: &mut TraverseCtx<'a>,
    span: Span,
    a: Option<Expression<'a>>,
    b: Option<Expression<'a>>,
) -> Option<Expression<'a>> {
    match (a, b) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => {
            let mut items = ctx.ast.vec_with_capacity(2);
            items.push(a);
            items.push(b);
            Some(ctx.ast.expression_sequence(span, items))
        }
    }
}
