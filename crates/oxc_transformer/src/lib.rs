//! Lowering of modern JavaScript/TypeScript class syntax to a
//! target-supported subset.
//!
//! This crate implements the class-lowering subsystem of a larger
//! JS/TS compiler: given an already-parsed-and-visited class AST node
//! (statement or expression), it rewrites the class so the output uses
//! only the feature subset the configured target environment supports.
//!
//! It is invoked once per class, via [`oxc_traverse::Traverse`], by a
//! host compiler that has already run parsing, scope resolution, and
//! the earlier AST visitor that recurses into nested initializers and
//! method bodies. It does not lex, parse, resolve scopes, fold
//! constants, mangle names, or implement the runtime helpers
//! (`__privateGet`, `__decorateElement`, ...) it emits calls to.

mod diagnostics;
pub mod es2022;
pub mod typescript;

pub use diagnostics::TransformerDiagnostics;
pub use es2022::class_properties::{ClassProperties, ClassPropertiesOptions, UnsupportedFeatures};

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_diagnostics::OxcDiagnostic;
use oxc_semantic::Scoping;
use oxc_traverse::traverse_mut;

/// Run the class-lowering subsystem over an entire program.
///
/// This is the single external entry point (`spec.md` §6): the host
/// compiler hands over a fully parsed and resolved [`Program`] plus the
/// [`ClassPropertiesOptions`] derived from its compiler options, and gets
/// back any diagnostics raised while lowering. All AST mutation happens
/// in place, inside `program`'s arena.
pub fn lower_classes<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    scoping: Scoping,
    options: ClassPropertiesOptions,
) -> Vec<OxcDiagnostic> {
    let mut pass = ClassProperties::new(options);
    traverse_mut(&mut pass, allocator, program, scoping);
    pass.take_diagnostics()
}
