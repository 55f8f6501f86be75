//! Error types for declaration model construction

use crate::declaration::DeclId;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown declaration {id}")]
    #[diagnostic(
        code(tern::model::unknown_declaration),
        help("Declaration ids are only valid for the model that allocated them")
    )]
    UnknownDeclaration { id: DeclId },

    #[error("Declaration {name} is not {expected}")]
    #[diagnostic(code(tern::model::wrong_kind))]
    WrongKind { name: String, expected: &'static str },

    #[error("Type of {name} is already set")]
    #[diagnostic(
        code(tern::model::type_already_set),
        help("A declaration's type is assigned once and then frozen")
    )]
    TypeAlreadySet { name: String },

    #[error("Circular inheritance: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(tern::model::circular_inheritance),
        help("A type may not be its own supertype")
    )]
    CircularInheritance { cycle: Vec<String> },

    #[error("Only one language module may be bootstrapped per model")]
    #[diagnostic(code(tern::model::language_module_exists))]
    LanguageModuleExists,
}

pub type ModelResult<T> = Result<T, ModelError>;
