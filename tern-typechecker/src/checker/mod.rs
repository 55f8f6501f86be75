//! The expression type checker
//!
//! One pass over a compilation unit that computes the type of every
//! expression, infers the types of declarations annotated with `value` or
//! `function`, and validates assignability, operator capabilities,
//! invocations and type arguments. The pass never stops at a user error:
//! each finding becomes a [`Diagnostic`](crate::Diagnostic) and the node
//! falls back to [`ProducedType::Unknown`], which is compatible with
//! everything and so cannot cascade.
//!
//! - [`context`] - scope and return-scope stacks
//! - `declarations` - classes, interfaces, attributes, methods, parameters
//! - `statements` - control flow, conditions, returns
//! - `expressions` - literals, references, `this`/`super`/`outer`, indexing
//! - `operators` - the operator table and its capability rules
//! - `invocation` - positional and named argument checks
//! - `type_arguments` - type argument inference and bound checks

pub mod context;
mod declarations;
mod expressions;
mod invocation;
mod operators;
mod statements;
mod type_arguments;

pub use context::{Callable, CheckerContext, ReturnScope};

use crate::analysis::Analysis;
use crate::config::CheckerConfig;
use crate::error::{DiagnosticKind, TypecheckResult};
use crate::inference::InferenceEngine;
use crate::visitor::Visitor;
use declarations::AnnotationCollector;
use std::collections::HashMap;
use tern_ast::{CompilationUnit, Expression, NodeId, Span, Statement, StatementKind};
use tern_model::{DeclId, LanguageModule, Model, ProducedType};
use tracing::debug;

pub struct TypeChecker<'a> {
    model: &'a Model,
    lang: &'a LanguageModule,
    config: &'a CheckerConfig,
    engine: InferenceEngine<'a>,
    context: CheckerContext,
    analysis: Analysis,
    callables: HashMap<NodeId, Callable>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(model: &'a Model, lang: &'a LanguageModule, config: &'a CheckerConfig) -> Self {
        Self {
            model,
            lang,
            config,
            engine: InferenceEngine::new(model, lang, config.max_supertype_depth),
            context: CheckerContext::new(lang.package),
            analysis: Analysis::new(),
            callables: HashMap::new(),
        }
    }

    pub fn check_unit(mut self, unit: &CompilationUnit) -> TypecheckResult<Analysis> {
        AnnotationCollector::new(self.model, self.lang).visit_unit(unit)?;

        self.context = CheckerContext::new(unit.package);
        let order = self.declaration_order(unit);
        for statement in order {
            self.check_statement(statement)?;
        }

        debug!(
            diagnostics = self.analysis.diagnostics().len(),
            errors = self.analysis.errors().count(),
            "expression pass finished"
        );
        Ok(self.analysis)
    }

    /// Source order, except that the type definitions of the unit are
    /// permuted among their own positions into supertypes-first order. A
    /// circular hierarchy is reported and leaves source order in place.
    fn declaration_order<'u>(&mut self, unit: &'u CompilationUnit) -> Vec<&'u Statement> {
        let mut ordered: Vec<&Statement> = unit.declarations.iter().collect();
        let ranks: HashMap<DeclId, usize> = match self
            .model
            .validate_hierarchy()
            .and_then(|graph| graph.supertypes_first())
        {
            Ok(order) => order
                .into_iter()
                .enumerate()
                .map(|(rank, declaration)| (declaration, rank))
                .collect(),
            Err(err) => {
                self.analysis.error(
                    unit.id,
                    unit.span,
                    DiagnosticKind::Malformed,
                    err.to_string(),
                );
                return ordered;
            }
        };

        let slots: Vec<usize> = ordered
            .iter()
            .enumerate()
            .filter(|(_, statement)| defined_type(statement).is_some())
            .map(|(index, _)| index)
            .collect();
        let mut definitions: Vec<&Statement> = slots.iter().map(|index| ordered[*index]).collect();
        definitions.sort_by_key(|statement| {
            defined_type(statement)
                .and_then(|declaration| ranks.get(&declaration).copied())
                .unwrap_or(usize::MAX)
        });
        for (slot, statement) in slots.into_iter().zip(definitions) {
            ordered[slot] = statement;
        }
        ordered
    }

    // --- shared helpers -------------------------------------------------

    fn display(&self, ty: &ProducedType) -> String {
        self.model.display(ty).to_string()
    }

    fn name(&self, declaration: DeclId) -> String {
        self.model[declaration].name().to_string()
    }

    fn error(&mut self, node: NodeId, span: Span, kind: DiagnosticKind, message: impl Into<String>) {
        self.analysis.error(node, span, kind, message);
    }

    fn error_on(&mut self, expression: &Expression, kind: DiagnosticKind, message: impl Into<String>) {
        self.analysis
            .error(expression.id, expression.span, kind, message);
    }

    /// Informational warning for constructs accepted without checking
    fn unsupported(&mut self, node: NodeId, span: Span, message: &str) {
        if self.config.report_unsupported {
            self.analysis.warning(node, span, message);
        }
    }

    fn is_subtype(&self, ty: &ProducedType, other: &ProducedType) -> bool {
        self.engine.is_subtype(ty, other)
    }

    fn supertype(&self, ty: &ProducedType, target: DeclId) -> Option<ProducedType> {
        self.engine.supertype(ty, target)
    }

    fn declared_type(&self, declaration: DeclId) -> Option<ProducedType> {
        self.model.declared_type(declaration).cloned()
    }

    /// The recorded type of an already checked node
    fn type_of_node(&self, node: NodeId) -> ProducedType {
        self.analysis
            .type_of(node)
            .cloned()
            .unwrap_or(ProducedType::Unknown)
    }

    /// Assignability of a specified expression to the type it initializes
    fn check_assignable_to(
        &mut self,
        expected: Option<&ProducedType>,
        actual: &ProducedType,
        node: NodeId,
        span: Span,
    ) {
        match expected {
            Some(expected) => {
                if !self.is_subtype(actual, expected) {
                    let message = format!(
                        "specifier expression not assignable to expected type: {} is not {}",
                        self.display(actual),
                        self.display(expected)
                    );
                    self.error(node, span, DiagnosticKind::Assignability, message);
                }
            }
            None if actual.is_unknown() => {}
            None => self.error(
                node,
                span,
                DiagnosticKind::Assignability,
                "could not determine assignability of specified expression to expected type",
            ),
        }
    }

    fn check_optional(&mut self, ty: &ProducedType, expression: &Expression) {
        if !self.engine.is_optional(ty) {
            let message = format!(
                "expression is not of optional type: {} is not a supertype of: Nothing",
                self.display(ty)
            );
            self.error_on(expression, DiagnosticKind::MissingCapability, message);
        }
    }

    fn check_empty(&mut self, ty: &ProducedType, expression: &Expression) {
        if !self.engine.is_possibly_empty(ty) {
            let message = format!(
                "expression is not of correct type: {} is not a supertype of: Empty",
                self.display(ty)
            );
            self.error_on(expression, DiagnosticKind::MissingCapability, message);
        }
    }
}

/// The class or interface a statement defines, if any
fn defined_type(statement: &Statement) -> Option<DeclId> {
    match &statement.kind {
        StatementKind::ClassDefinition(class) => Some(class.declaration),
        StatementKind::InterfaceDefinition(interface) => Some(interface.declaration),
        StatementKind::ObjectDefinition(object) => Some(object.class),
        _ => None,
    }
}
