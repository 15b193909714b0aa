//! Non-fatal diagnostics raised while lowering classes.
//!
//! `spec.md` §7 treats lowering as infallible in the design sense: malformed
//! input is prevented by earlier passes, and the core only ever *warns*
//! through the host's diagnostic channel. This module is that channel.

use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span;

pub struct TransformerDiagnostics;

impl TransformerDiagnostics {
    /// A class used a feature the target environment can't express and that
    /// this pass has no lowering for (the core assumes an earlier "feature
    /// not supported in target" diagnostic will already have fired upstream
    /// for truly unsupported syntax; this covers the narrower cases that are
    /// this pass's own responsibility to flag, e.g. decorators on a target
    /// that predates both decorator proposals).
    pub fn decorators_require_target_support(span: Span) -> OxcDiagnostic {
        OxcDiagnostic::warn(
            "Class and member decorators require a target that supports either TypeScript \
             experimental decorators or standard (stage 3) decorators.",
        )
        .with_label(span)
    }

    /// A `super()` shim could not find a reachable `super()` call in a
    /// derived class constructor that needs one (should be prevented by the
    /// visitor that set `shouldShimSuperCtorCall`; kept as a diagnostic
    /// rather than a panic because malformed constructors can reach this
    /// pass from recovered-from-parse-errors ASTs).
    pub fn missing_super_call_for_shim(span: Span) -> OxcDiagnostic {
        OxcDiagnostic::warn(
            "Derived class constructor requires instance field initializers to run after \
             `super()`, but no `super()` call could be found to shim.",
        )
        .with_label(span)
    }
}
