//! Tern type checker
//!
//! Semantic analysis for a language with nominal classes and interfaces,
//! union and intersection types, declaration-site variance and local type
//! inference. Checking a [`CompilationUnit`] runs two passes over the
//! scope-resolved tree:
//!
//! 1. **Expression typing** ([`checker`]): every expression gets a type,
//!    `value`/`function` declarations get their inferred types, and
//!    assignability, operators, invocations and type arguments are checked.
//! 2. **Initializer leaks** ([`self_reference`]): `this`, `super` and
//!    `outer` must not escape a class before its initializer has finished.
//!
//! Neither pass stops at a user error. Findings are collected as
//! [`Diagnostic`]s in the returned [`Analysis`]; a [`TypecheckError`] is
//! reserved for a broken input model.

pub mod analysis;
pub mod checker;
pub mod config;
pub mod error;
pub mod inference;
pub mod self_reference;
pub mod visitor;

pub use analysis::Analysis;
pub use checker::TypeChecker;
pub use config::CheckerConfig;
pub use error::{Diagnostic, DiagnosticKind, Severity, TypecheckError, TypecheckResult};
pub use inference::InferenceEngine;
pub use self_reference::SelfReferenceChecker;
pub use visitor::{Visitor, VisitorResult};

use tern_ast::CompilationUnit;
use tern_model::{LanguageModule, Model};
use tracing::{debug, instrument};

/// Check one compilation unit against the model, writing inferred
/// declaration types into it
#[instrument(skip_all, fields(unit = %unit.id))]
pub fn typecheck_unit(
    model: &Model,
    lang: &LanguageModule,
    config: &CheckerConfig,
    unit: &CompilationUnit,
) -> TypecheckResult<Analysis> {
    let mut analysis = TypeChecker::new(model, lang, config).check_unit(unit)?;
    if config.check_self_references {
        SelfReferenceChecker::new(model, &mut analysis, unit.package).visit_unit(unit)?;
    }
    debug!(
        errors = analysis.errors().count(),
        warnings = analysis.warnings().count(),
        "unit checked"
    );
    Ok(analysis)
}

/// Check several units sharing one model, in order. Types inferred in an
/// earlier unit are visible to the later ones.
pub fn typecheck_units<'u>(
    model: &Model,
    lang: &LanguageModule,
    config: &CheckerConfig,
    units: impl IntoIterator<Item = &'u CompilationUnit>,
) -> TypecheckResult<Vec<Analysis>> {
    units
        .into_iter()
        .map(|unit| typecheck_unit(model, lang, config, unit))
        .collect()
}

#[cfg(test)]
mod tests;
