//! `ClassBindings` (name capture, `spec.md` §4.4) and `PrivateProps` (the
//! per-class private-symbol table, `spec.md` §3 "Symbol").
//!
//! Private-symbol "redirection" (`spec.md`'s `Link` field) is modelled as a
//! side table keyed by the original private `SymbolId`, rather than by
//! mutating the symbol in the host's real symbol table: `oxc_semantic`'s
//! `Scoping` doesn't expose a mutable redirect slot on `Symbol`, so instead
//! we keep our own `FxHashMap<SymbolId, PrivateFieldBinding>` per class.
//! Reading "through the Link" is just a hash-map lookup; there's no
//! multi-hop chain because a private symbol only ever belongs to the one
//! class lowering it.

use rustc_hash::FxHashMap;

use oxc_ast::ast::Expression;
use oxc_span::{Atom, Span, SPAN};
use oxc_syntax::symbol::SymbolId;
use oxc_traverse::{BoundIdentifier, TraverseCtx};

/// The kind of a private symbol (`spec.md` §3 "Symbol").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateKind {
    Field,
    StaticField,
    Method,
    StaticMethod,
    Get,
    Set,
    GetSet,
    StaticGet,
    StaticSet,
    StaticGetSet,
}

impl PrivateKind {
    #[must_use]
    pub fn is_static(self) -> bool {
        matches!(
            self,
            Self::StaticField
                | Self::StaticMethod
                | Self::StaticGet
                | Self::StaticSet
                | Self::StaticGetSet
        )
    }

    #[must_use]
    pub fn is_method_like(self) -> bool {
        matches!(
            self,
            Self::Method
                | Self::StaticMethod
                | Self::Get
                | Self::Set
                | Self::GetSet
                | Self::StaticGet
                | Self::StaticSet
                | Self::StaticGetSet
        )
    }

    #[must_use]
    pub fn is_accessor(self) -> bool {
        matches!(
            self,
            Self::Get | Self::Set | Self::GetSet | Self::StaticGet | Self::StaticSet | Self::StaticGetSet
        )
    }

    #[must_use]
    pub fn has_getter(self) -> bool {
        matches!(self, Self::Get | Self::GetSet | Self::StaticGet | Self::StaticGetSet)
    }

    #[must_use]
    pub fn has_setter(self) -> bool {
        matches!(self, Self::Set | Self::GetSet | Self::StaticSet | Self::StaticGetSet)
    }
}

/// What a lowered private symbol's references get redirected to: the Link
/// target from `spec.md` §3.
#[derive(Debug, Clone)]
pub struct PrivateFieldBinding<'a> {
    pub kind: PrivateKind,
    /// The original source name, without the leading `#` (used for
    /// diagnostics and temp-name generation only).
    pub original_name: Atom<'a>,
    /// Temp holding the `WeakMap`/`WeakSet` (`_x` in `spec.md`'s examples).
    pub weak_collection: BoundIdentifier<'a>,
    /// Temp holding the getter function, for Get/GetSet kinds.
    pub getter: Option<BoundIdentifier<'a>>,
    /// Temp holding the setter function, for Set/GetSet kinds.
    pub setter: Option<BoundIdentifier<'a>>,
    /// Temp holding the method function, for plain Method kinds.
    pub method: Option<BoundIdentifier<'a>>,
}

/// Per-class private-symbol table plus the shared WeakSet temps used by all
/// private methods/accessors of one class (instance and static are tracked
/// separately, per `spec.md` §4.1).
#[derive(Default)]
pub struct PrivateProps<'a> {
    pub bindings: FxHashMap<SymbolId, PrivateFieldBinding<'a>>,
    /// Shared `WeakSet` temp used to brand instances that have at least one
    /// lowered private instance method/accessor.
    pub instance_method_weak_set: Option<BoundIdentifier<'a>>,
    /// Shared `WeakSet` temp used to brand the class itself, for lowered
    /// static private methods/accessors.
    pub static_method_weak_set: Option<BoundIdentifier<'a>>,
    /// `ClassBindings` for *this* class, duplicated here so static-prop
    /// initializer rewriting can always find the right name/temp without
    /// threading an extra parameter through (mirrors the teacher's
    /// `PrivateProps { class_bindings, .. }` field).
    pub class_bindings: ClassBindings<'a>,
}

impl<'a> PrivateProps<'a> {
    pub fn get(&self, symbol_id: SymbolId) -> Option<&PrivateFieldBinding<'a>> {
        self.bindings.get(&symbol_id)
    }

    pub fn insert(&mut self, symbol_id: SymbolId, binding: PrivateFieldBinding<'a>) {
        self.bindings.insert(symbol_id, binding);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Name-capture state for the class currently being lowered (`spec.md`
/// §4.4). Lazily produces a stable expression referring to the class from
/// outside its body.
#[derive(Default)]
pub struct ClassBindings<'a> {
    /// The class's own name binding, if it has one (inner name for
    /// statements, or the class-expression's own binding).
    pub name: Option<BoundIdentifier<'a>>,
    /// The outer binding the lowered form is assigned to, when the emitter
    /// decides an outer binding is required (`spec.md` §4.9 point 12).
    pub outer_name: Option<BoundIdentifier<'a>>,
    /// Lazily created temp var standing in for "the class, from outside its
    /// body" (`spec.md` §4.4). `None` until first needed.
    temp: Option<BoundIdentifier<'a>>,
    /// Set to `true` while transforming a static property initializer, so
    /// `get_or_init_temp_binding` can assert it's never called for contexts
    /// that should have used a different binding (debug-only invariant,
    /// `spec.md` §7).
    #[cfg(debug_assertions)]
    pub currently_transforming_static_property_initializers: bool,
}

impl<'a> ClassBindings<'a> {
    pub fn name_symbol_id(&self) -> Option<SymbolId> {
        self.name.as_ref().map(|b| b.symbol_id)
    }

    /// Return the existing temp binding, or create one on first use.
    pub fn get_or_init_temp_binding(&mut self, ctx: &mut TraverseCtx<'a>) -> &BoundIdentifier<'a> {
        if self.temp.is_none() {
            let base_name = self
                .name
                .as_ref()
                .map_or_else(|| "class".into(), |b| format!("_{}", b.name));
            let base_name: &str = &base_name;
            self.temp = Some(ctx.generate_uid_in_current_scope(
                base_name,
                oxc_syntax::symbol::SymbolFlags::FunctionScopedVariable,
            ));
        }
        self.temp.as_ref().unwrap()
    }

    pub fn has_temp(&self) -> bool {
        self.temp.is_some()
    }

    pub fn temp(&self) -> Option<&BoundIdentifier<'a>> {
        self.temp.as_ref()
    }
}

/// Build a read of `binding` at `span`, the same "expression capture"
/// primitive `spec.md` §4.4/§9 describes the host as supplying.
pub fn read_at<'a>(binding: &BoundIdentifier<'a>, span: Span, ctx: &TraverseCtx<'a>) -> Expression<'a> {
    binding.create_spanned_read_expression(span, ctx)
}

pub fn read<'a>(binding: &BoundIdentifier<'a>, ctx: &TraverseCtx<'a>) -> Expression<'a> {
    read_at(binding, SPAN, ctx)
}
