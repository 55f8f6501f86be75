//! Error types for the Tern type checker
//!
//! Two layers, both reported through miette:
//!
//! - [`Diagnostic`]: user-facing findings attached to a tree node. Checking
//!   always continues past them.
//! - [`TypecheckError`]: a violated phase precondition (malformed input
//!   model, invalid configuration). These abort the current unit.

use std::fmt;

use miette::{LabeledSpan, SourceSpan};
use tern_ast::{NodeId, Span};
use tern_model::{DeclId, ModelError};
use thiserror::Error;

/// Unexpected state that stops checking a unit
#[derive(Error, miette::Diagnostic, Debug)]
pub enum TypecheckError {
    #[error("Declaration {name} has no parameter lists but reached the invocation checker")]
    #[diagnostic(
        code(tern::typecheck::missing_parameter_list),
        help("Functional declarations must be created with at least one parameter list")
    )]
    MissingParameterList {
        name: String,
        #[label("invoked here")]
        span: Option<SourceSpan>,
    },

    #[error("Node refers to {id}, which is not a {expected}")]
    #[diagnostic(code(tern::typecheck::wrong_declaration_kind))]
    WrongDeclarationKind {
        id: DeclId,
        expected: &'static str,
        #[label("referenced here")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid checker configuration: {message}")]
    #[diagnostic(code(tern::typecheck::invalid_config))]
    InvalidConfig { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),
}

pub type TypecheckResult<T> = Result<T, TypecheckError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// What went wrong, independent of the message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A name or member that does not resolve
    UnresolvedReference,
    /// An expression whose type is not a subtype of the required type
    Assignability,
    /// Wrong number or shape of arguments or type arguments
    Arity,
    /// A type argument outside its parameter's bounds or cases
    BoundViolation,
    /// An operand without the capability an operator needs
    MissingCapability,
    /// `this`, `super` or `outer` escaping before initialization completes
    InitializationLeak,
    /// A type less visible than the declaration exposing it
    Visibility,
    /// Constructs that are accepted but not checked yet
    Unsupported,
    /// Structural rules: misplaced returns, duplicate supertypes, cycles
    Malformed,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedReference => "tern::typecheck::unresolved_reference",
            DiagnosticKind::Assignability => "tern::typecheck::assignability",
            DiagnosticKind::Arity => "tern::typecheck::arity",
            DiagnosticKind::BoundViolation => "tern::typecheck::bound_violation",
            DiagnosticKind::MissingCapability => "tern::typecheck::missing_capability",
            DiagnosticKind::InitializationLeak => "tern::typecheck::initialization_leak",
            DiagnosticKind::Visibility => "tern::typecheck::visibility",
            DiagnosticKind::Unsupported => "tern::typecheck::unsupported",
            DiagnosticKind::Malformed => "tern::typecheck::malformed",
        }
    }
}

/// A finding attached to one node of the checked tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Diagnostic {
    pub node: NodeId,
    pub span: Span,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn error(node: NodeId, span: Span, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            node,
            span,
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(node: NodeId, span: Span, message: impl Into<String>) -> Self {
        Self {
            node,
            span,
            severity: Severity::Warning,
            kind: DiagnosticKind::Unsupported,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            None,
            SourceSpan::from(self.span),
        ))))
    }
}
