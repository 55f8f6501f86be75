//! Scope-resolved syntax tree for the Tern type checker
//!
//! The tree is produced by a front end that has already resolved type
//! references to declarations in a [`tern_model::Model`]. Expressions may
//! still name members by string; the checker looks those up from the
//! enclosing scope.

pub mod ast;
pub mod builder;

pub use ast::*;
pub use builder::AstBuilder;

#[cfg(test)]
mod tests;
