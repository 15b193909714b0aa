//! Feature-gate resolver (`spec.md` §2 step 1).
//!
//! Maps a target environment to the set of class-related features it does
//! *not* natively support, plus the host's TypeScript/decorator/bundling
//! switches that the rest of the pass consults.

use bitflags::bitflags;
use oxc_syntax::es_target::ESTarget;

bitflags! {
    /// Class-related JS features that may be unsupported by the configured
    /// target and therefore must be lowered.
    ///
    /// Mirrors the subset of `oxc_syntax::es_target::ESFeature` this pass
    /// cares about: everything else (optional chaining, nullish coalescing,
    /// etc.) belongs to other lowering passes outside this subsystem.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UnsupportedFeatures: u16 {
        /// Public instance fields (`class C { x = 1 }`).
        const CLASS_FIELD             = 1 << 0;
        /// Public static fields (`class C { static x = 1 }`).
        const CLASS_STATIC_FIELD      = 1 << 1;
        /// Private instance fields (`class C { #x = 1 }`).
        const CLASS_PRIVATE_FIELD     = 1 << 2;
        /// Private static fields (`class C { static #x = 1 }`).
        const CLASS_PRIVATE_STATIC_FIELD = 1 << 3;
        /// Private instance methods/accessors.
        const CLASS_PRIVATE_METHOD    = 1 << 4;
        /// Private static methods/accessors.
        const CLASS_PRIVATE_STATIC_METHOD = 1 << 5;
        /// `static { ... }` blocks.
        const CLASS_STATIC_BLOCKS     = 1 << 6;
        /// Auto-accessors (`accessor x = 1`).
        const CLASS_PRIVATE_AUTO_ACCESSOR = 1 << 7;
        /// Standard (stage-3) decorators.
        const DECORATORS              = 1 << 8;

        /// Convenience union covering every private-* flag above.
        const ANY_PRIVATE = Self::CLASS_PRIVATE_FIELD.bits()
            | Self::CLASS_PRIVATE_STATIC_FIELD.bits()
            | Self::CLASS_PRIVATE_METHOD.bits()
            | Self::CLASS_PRIVATE_STATIC_METHOD.bits();
    }
}

impl UnsupportedFeatures {
    /// Derive the unsupported-feature set from an `ESTarget` the way
    /// `oxc-browserslist`-resolved engine targets are turned into feature
    /// bitsets elsewhere in the toolchain: each feature has a minimum
    /// ES version, and anything the target predates is "unsupported".
    #[must_use]
    pub fn from_target(target: ESTarget) -> Self {
        let mut features = Self::empty();
        if target < ESTarget::ES2022 {
            features |= Self::CLASS_FIELD
                | Self::CLASS_STATIC_FIELD
                | Self::CLASS_PRIVATE_FIELD
                | Self::CLASS_PRIVATE_STATIC_FIELD
                | Self::CLASS_PRIVATE_METHOD
                | Self::CLASS_PRIVATE_STATIC_METHOD
                | Self::CLASS_STATIC_BLOCKS;
        }
        // Auto-accessors and standard decorators are newer than ES2022 and
        // are not yet broadly implemented by any shipping engine; treat them
        // as unsupported unless the target is explicitly "esnext"-like.
        if target < ESTarget::ESNext {
            features |= Self::CLASS_PRIVATE_AUTO_ACCESSOR | Self::DECORATORS;
        }
        features
    }
}

/// TypeScript decorator dialect in effect for the current compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoratorDialect {
    /// No decorators enabled at all.
    #[default]
    None,
    /// `tsconfig.json`'s `experimentalDecorators: true` (pre-stage-3 TS
    /// decorators, compiled to `__decorateClass`/`__decorateParam`).
    TypeScriptExperimental,
    /// Standard (stage-3) JavaScript decorators, compiled to
    /// `__decoratorStart`/`__decorateElement`/`__runInitializers`.
    Standard,
}

/// Bundling mode, relevant to the emitter's statement-vs-expression choice
/// (`spec.md` §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    NoBundle,
    Bundle,
}

/// Compiler options this subsystem consumes (`spec.md` §6 "Inputs").
#[derive(Debug, Clone)]
pub struct ClassPropertiesOptions {
    pub unsupported_features: UnsupportedFeatures,
    /// Whether the input is TypeScript (`ts.Parse` in `spec.md`).
    pub typescript: bool,
    pub decorator_dialect: DecoratorDialect,
    /// TypeScript's `useDefineForClassFields` compiler option.
    pub use_define_for_class_fields: bool,
    /// Preserve original function/class `.name` values even when the
    /// binding must be renamed to a temp (`keepNames`).
    pub keep_names: bool,
    pub mode: Mode,
    pub minify_syntax: bool,
    /// Whether the enclosing module will be wrapped in a `try`/`catch`
    /// because it uses the `using`/`await using` declaration form, which
    /// affects whether class statements should be emitted as lazily
    /// evaluated expressions (`spec.md` §4.9).
    pub will_wrap_module_in_try_catch_for_using: bool,
    pub should_add_key_comment: bool,
}

impl Default for ClassPropertiesOptions {
    fn default() -> Self {
        Self {
            unsupported_features: UnsupportedFeatures::empty(),
            typescript: false,
            decorator_dialect: DecoratorDialect::None,
            use_define_for_class_fields: true,
            keep_names: false,
            mode: Mode::NoBundle,
            minify_syntax: false,
            will_wrap_module_in_try_catch_for_using: false,
            should_add_key_comment: false,
        }
    }
}

impl ClassPropertiesOptions {
    #[must_use]
    pub fn is_class_field_unsupported(&self, is_static: bool, is_private: bool) -> bool {
        let flag = match (is_static, is_private) {
            (false, false) => UnsupportedFeatures::CLASS_FIELD,
            (true, false) => UnsupportedFeatures::CLASS_STATIC_FIELD,
            (false, true) => UnsupportedFeatures::CLASS_PRIVATE_FIELD,
            (true, true) => UnsupportedFeatures::CLASS_PRIVATE_STATIC_FIELD,
        };
        self.unsupported_features.contains(flag)
    }

    #[must_use]
    pub fn is_private_method_unsupported(&self, is_static: bool) -> bool {
        let flag = if is_static {
            UnsupportedFeatures::CLASS_PRIVATE_STATIC_METHOD
        } else {
            UnsupportedFeatures::CLASS_PRIVATE_METHOD
        };
        self.unsupported_features.contains(flag)
    }

    #[must_use]
    pub fn is_static_blocks_unsupported(&self) -> bool {
        self.unsupported_features.contains(UnsupportedFeatures::CLASS_STATIC_BLOCKS)
    }

    #[must_use]
    pub fn is_auto_accessor_unsupported(&self) -> bool {
        self.unsupported_features.contains(UnsupportedFeatures::CLASS_PRIVATE_AUTO_ACCESSOR)
    }

    #[must_use]
    pub fn is_standard_decorators_unsupported(&self) -> bool {
        self.unsupported_features.contains(UnsupportedFeatures::DECORATORS)
    }

    #[must_use]
    pub fn should_lower_standard_decorators(&self) -> bool {
        matches!(self.decorator_dialect, DecoratorDialect::Standard)
    }

    #[must_use]
    pub fn should_lower_experimental_decorators(&self) -> bool {
        matches!(self.decorator_dialect, DecoratorDialect::TypeScriptExperimental)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn es5_target_needs_everything_lowered() {
        let features = UnsupportedFeatures::from_target(ESTarget::ES5);
        assert!(features.contains(UnsupportedFeatures::CLASS_FIELD));
        assert!(features.contains(UnsupportedFeatures::CLASS_PRIVATE_METHOD));
        assert!(features.contains(UnsupportedFeatures::CLASS_STATIC_BLOCKS));
        assert!(features.contains(UnsupportedFeatures::DECORATORS));
    }

    #[test]
    fn es2022_target_only_needs_new_features_lowered() {
        let features = UnsupportedFeatures::from_target(ESTarget::ES2022);
        assert!(!features.contains(UnsupportedFeatures::CLASS_FIELD));
        assert!(!features.contains(UnsupportedFeatures::CLASS_STATIC_BLOCKS));
        assert!(features.contains(UnsupportedFeatures::DECORATORS));
    }

    #[test]
    fn any_private_union_covers_all_private_flags() {
        let field = UnsupportedFeatures::CLASS_PRIVATE_FIELD;
        assert!(UnsupportedFeatures::ANY_PRIVATE.contains(field));
    }
}
