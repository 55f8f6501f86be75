//! Declaration model and type algebra for the Tern type checker
//!
//! The model is an arena of [`Declaration`]s forming a scope tree, plus the
//! immutable [`ProducedType`] values the checker computes with:
//!
//! - [`declaration`] - declarations, type parameters, parameter lists
//! - [`model`] - the arena, scope lookup and visibility
//! - [`produced_type`] - produced, union and intersection types, substitution
//! - [`algebra`] - memoized supertype search and the subtype relation
//! - [`reference`] - members seen through a qualifying type
//! - [`hierarchy`] - the inheritance graph, cycle detection and ordering
//! - [`language`] - the bootstrapped built-in declarations

pub mod algebra;
pub mod declaration;
pub mod error;
pub mod hierarchy;
pub mod language;
pub mod model;
pub mod produced_type;
pub mod reference;

pub use algebra::{TypeQuery, DEFAULT_MAX_SUPERTYPE_DEPTH};
pub use declaration::{
    ClassInfo, DeclId, Declaration, DeclarationKind, InterfaceInfo, ParameterInfo, ParameterList,
    TypeParameterInfo, Variance,
};
pub use error::{ModelError, ModelResult};
pub use hierarchy::InheritanceGraph;
pub use language::LanguageModule;
pub use model::{Model, TypeDisplay};
pub use produced_type::{ProducedType, Substitution};
pub use reference::ProducedReference;

#[cfg(test)]
mod tests;
