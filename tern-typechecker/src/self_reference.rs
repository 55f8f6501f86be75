//! Initializer leak checks
//!
//! A class initializer runs every executable statement of the class body
//! in order. Until the last of them has run, the instance is incomplete:
//! `this` must not escape, and members inherited from a supertype must not
//! be touched because the supertype's own initializer may not have reached
//! them. The statements after the last executable one form the
//! declaration section, where these restrictions are lifted. `super` can
//! never escape.
//!
//! The pass runs after expression typing and reads the resolved targets
//! from the [`Analysis`] it appends to.

use crate::analysis::Analysis;
use crate::error::DiagnosticKind;
use crate::visitor::{
    walk_argument_list, walk_block, walk_expression, walk_extended_type, walk_statement, Visitor,
    VisitorResult,
};
use tern_ast::{
    ArgumentList, ArgumentListKind, Block, Expression, ExpressionKind, ExtendedType,
    NamedArgumentKind, NodeId, Statement, TypeNodeKind,
};
use tern_model::{DeclId, Model};
use tracing::debug;

/// Section flags of one class or interface body. `None` outside any body.
#[derive(Debug, Clone, Copy, Default)]
struct Sections {
    declaration: Option<bool>,
    outer: Option<bool>,
}

pub struct SelfReferenceChecker<'a> {
    model: &'a Model,
    analysis: &'a mut Analysis,
    package: DeclId,
    scopes: Vec<DeclId>,
    sections: Sections,
    last_executable: Option<NodeId>,
}

impl<'a> SelfReferenceChecker<'a> {
    pub fn new(model: &'a Model, analysis: &'a mut Analysis, package: DeclId) -> Self {
        Self {
            model,
            analysis,
            package,
            scopes: Vec::new(),
            sections: Sections::default(),
            last_executable: None,
        }
    }

    fn scope(&self) -> DeclId {
        self.scopes.last().copied().unwrap_or(self.package)
    }

    fn in_body(&self) -> bool {
        self.sections.declaration.is_some()
    }

    fn in_declaration_section(&self) -> bool {
        self.sections.declaration == Some(true)
    }

    fn in_outer_declaration_section(&self) -> bool {
        self.sections.outer == Some(true)
    }

    /// Check a body with fresh section flags, restoring the enclosing ones
    /// afterwards
    fn with_body(
        &mut self,
        scope: DeclId,
        declaration_section: bool,
        last_executable: Option<NodeId>,
        body: &Block,
    ) -> VisitorResult {
        let saved_sections = self.sections;
        let saved_last = self.last_executable;
        self.sections = Sections {
            declaration: Some(declaration_section),
            outer: saved_sections.declaration,
        };
        self.last_executable = last_executable;
        self.scopes.push(scope);

        let result = walk_block(self, body);

        self.scopes.pop();
        self.sections = saved_sections;
        self.last_executable = saved_last;
        result
    }

    /// A member that is neither top level nor declared in an enclosing
    /// scope was inherited
    fn is_inherited(&self, declaration: DeclId, scope: DeclId) -> bool {
        !self.model.is_toplevel(declaration) && !self.model.is_defined_in_scope(declaration, scope)
    }

    fn check_inherited_use(&mut self, expression: &Expression) {
        if self.in_declaration_section() {
            return;
        }
        let Some(target) = self.analysis.target(expression.id) else {
            return;
        };
        let declaration = target.declaration;
        if self.is_inherited(declaration, self.scope()) {
            let message = format!(
                "inherited member may not be used in initializer: {}",
                self.model[declaration].name()
            );
            self.analysis.error(
                expression.id,
                expression.span,
                DiagnosticKind::InitializationLeak,
                message,
            );
        }
    }

    /// An expression whose value escapes: returned, assigned, specified or
    /// passed as an argument. With `chain`, `this.x` escapes `this` too.
    fn check_escape(&mut self, expression: &Expression, chain: bool) {
        let term = expression.unparenthesized();
        if matches!(term.kind, ExpressionKind::Super) {
            self.leak(term, "leaks super reference");
            return;
        }
        let root = if chain { chain_root(term) } else { term };
        match root.kind {
            ExpressionKind::This if !self.in_declaration_section() => {
                self.leak(root, "leaks this reference")
            }
            ExpressionKind::Outer if !self.in_outer_declaration_section() => {
                self.leak(root, "leaks outer reference")
            }
            _ => {}
        }
    }

    fn leak(&mut self, expression: &Expression, message: &str) {
        self.analysis.error(
            expression.id,
            expression.span,
            DiagnosticKind::InitializationLeak,
            message,
        );
    }
}

/// The receiver at the start of a member chain: `this` in `this.a.b`
fn chain_root(expression: &Expression) -> &Expression {
    match &expression.kind {
        ExpressionKind::QualifiedMember(reference) | ExpressionKind::QualifiedType(reference) => {
            chain_root(reference.primary.unparenthesized())
        }
        _ => expression,
    }
}

fn is_self_reference(expression: &Expression) -> bool {
    matches!(expression.kind, ExpressionKind::This | ExpressionKind::Outer)
}

impl Visitor for SelfReferenceChecker<'_> {
    fn visit_statement(&mut self, statement: &Statement) -> VisitorResult {
        walk_statement(self, statement)?;
        if self.in_body() && self.last_executable == Some(statement.id) {
            self.sections.declaration = Some(true);
        }
        Ok(())
    }

    fn visit_class_body(&mut self, class: DeclId, body: &Block) -> VisitorResult {
        let last_executable = body
            .statements
            .iter()
            .filter(|statement| statement.is_executable() || statement.has_initializer())
            .map(|statement| statement.id)
            .last();
        debug!(
            class = self.model[class].name(),
            initializer_statements = last_executable.is_some(),
            "checking class body"
        );
        self.with_body(class, last_executable.is_none(), last_executable, body)
    }

    fn visit_interface_body(&mut self, interface: DeclId, body: &Block) -> VisitorResult {
        self.with_body(interface, true, None, body)
    }

    fn visit_member_body(&mut self, member: DeclId, body: &Block) -> VisitorResult {
        self.scopes.push(member);
        let result = walk_block(self, body);
        self.scopes.pop();
        result
    }

    fn visit_extended_type(&mut self, extended: &ExtendedType) -> VisitorResult {
        let saved = self.sections;
        self.sections = Sections {
            declaration: Some(false),
            outer: saved.declaration,
        };
        let result = walk_extended_type(self, extended);

        if let TypeNodeKind::Simple { declaration, .. } = &extended.type_.kind {
            if !self.in_outer_declaration_section() && self.is_inherited(*declaration, self.scope()) {
                let message = format!(
                    "inherited member class may not be extended in initializer: {}",
                    self.model[*declaration].name()
                );
                self.analysis.error(
                    extended.type_.id,
                    extended.type_.span,
                    DiagnosticKind::InitializationLeak,
                    message,
                );
            }
        }
        self.sections = saved;
        result
    }

    fn visit_specifier(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)?;
        self.check_escape(expression, true);
        Ok(())
    }

    fn visit_source(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)?;
        self.check_escape(expression, false);
        Ok(())
    }

    fn visit_return(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)?;
        self.check_escape(expression, false);
        Ok(())
    }

    fn visit_expression(&mut self, expression: &Expression) -> VisitorResult {
        walk_expression(self, expression)?;
        match &expression.kind {
            ExpressionKind::This if !self.in_body() => {
                self.leak(expression, "this appears outside a class or interface body")
            }
            ExpressionKind::Outer if self.sections.outer.is_none() => self.leak(
                expression,
                "outer appears outside a nested class or interface body",
            ),
            ExpressionKind::BaseMember(_) | ExpressionKind::BaseType(_) => {
                self.check_inherited_use(expression)
            }
            ExpressionKind::QualifiedMember(reference) | ExpressionKind::QualifiedType(reference)
                if is_self_reference(&reference.primary) =>
            {
                self.check_inherited_use(expression)
            }
            ExpressionKind::Binary(operation) if operation.operator.is_assignment() => {
                self.check_escape(&operation.right, true)
            }
            _ => {}
        }
        Ok(())
    }

    fn visit_argument_list(&mut self, arguments: &ArgumentList) -> VisitorResult {
        walk_argument_list(self, arguments)?;
        if !self.in_body() {
            return Ok(());
        }
        match &arguments.kind {
            ArgumentListKind::Positional { arguments, .. } => {
                for argument in arguments {
                    self.check_escape(argument, false);
                }
            }
            ArgumentListKind::Named { arguments, .. } => {
                for argument in arguments {
                    if let NamedArgumentKind::Specified(value) = &argument.kind {
                        self.check_escape(value, false);
                    }
                }
            }
        }
        Ok(())
    }
}
