//! TypeScript-only surface the class-lowering subsystem depends on
//! (`SPEC_FULL.md` §3 table: "TS parameter properties / declare-abstract
//! elision / `useDefineForClassFields`").
//!
//! Everything here is a plain AST rewrite the property processor calls
//! into; it has no `Traverse` entry points of its own and never runs
//! outside a class already being lowered by
//! [`crate::es2022::class_properties::ClassProperties`].

pub mod class;

pub use class::{is_elided_member, lower_parameter_properties};
