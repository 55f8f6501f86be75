//! Statements, conditions and returns

use super::{ReturnScope, TypeChecker};
use crate::error::{DiagnosticKind, TypecheckResult};
use tern_ast::{
    Block, CatchClause, Condition, ConditionKind, Expression, ForIteratorKind,
    ForStatement, Return, SpecifierStatement, Statement, StatementKind, TryCatchStatement,
    TypeNode, TypeNodeKind, Variable,
};
use tern_model::ProducedType;

impl TypeChecker<'_> {
    pub(super) fn check_statement(&mut self, statement: &Statement) -> TypecheckResult<()> {
        match &statement.kind {
            StatementKind::ClassDefinition(class) => self.check_class(statement, class),
            StatementKind::InterfaceDefinition(interface) => {
                self.check_interface(statement, interface)
            }
            StatementKind::ObjectDefinition(object) => self.check_object(statement, object),
            StatementKind::AttributeDeclaration(attribute) => {
                self.check_attribute(statement, attribute)
            }
            StatementKind::AttributeGetter(getter) => self.check_getter(statement, getter),
            StatementKind::AttributeSetter(setter) => self.check_setter(setter),
            StatementKind::MethodDefinition(method) => self.check_method(statement, method),
            StatementKind::MethodDeclaration(method) => {
                self.check_method_declaration(statement, method)
            }
            StatementKind::Expression(expression) => self.check_expression(expression).map(|_| ()),
            StatementKind::Specifier(specifier) => self.check_specifier_statement(specifier),
            StatementKind::Return(ret) => self.check_return(statement, ret),
            StatementKind::If(if_statement) => {
                self.check_condition(&if_statement.condition)?;
                self.check_block(&if_statement.then_block)?;
                if let Some(else_block) = &if_statement.else_block {
                    self.check_block(else_block)?;
                }
                Ok(())
            }
            StatementKind::While(while_statement) => {
                self.check_condition(&while_statement.condition)?;
                self.check_block(&while_statement.body)
            }
            StatementKind::For(for_statement) => self.check_for(for_statement),
            StatementKind::TryCatch(try_catch) => self.check_try_catch(try_catch),
        }
    }

    pub(super) fn check_block(&mut self, block: &Block) -> TypecheckResult<()> {
        for statement in &block.statements {
            self.check_statement(statement)?;
        }
        Ok(())
    }

    /// `x = e;` specifies a value declared without an initializer
    fn check_specifier_statement(&mut self, specifier: &SpecifierStatement) -> TypecheckResult<()> {
        let target = self.check_expression(&specifier.target)?;
        let ty = self.check_expression(&specifier.specifier)?;
        let expected = (!target.is_unknown()).then_some(target);
        if expected.is_some() {
            self.check_assignable_to(
                expected.as_ref(),
                &ty,
                specifier.specifier.id,
                specifier.specifier.span,
            );
        }
        Ok(())
    }

    fn check_return(&mut self, statement: &Statement, ret: &Return) -> TypecheckResult<()> {
        let returned = match &ret.expression {
            Some(expression) => Some(self.check_expression(expression)?),
            None => None,
        };
        let Some(scope) = self.context.return_scope().cloned() else {
            return Ok(());
        };
        match (scope, returned) {
            (ReturnScope::Void, None) => {}
            (ReturnScope::Void, Some(_)) => self.error(
                statement.id,
                statement.span,
                DiagnosticKind::Malformed,
                "a void method, setter, or class initializer may not return a value",
            ),
            (_, None) => self.error(
                statement.id,
                statement.span,
                DiagnosticKind::Malformed,
                "a non-void method or getter must return a value",
            ),
            (ReturnScope::Declared(expected), Some(actual)) => {
                if !self.is_subtype(&actual, &expected) {
                    let message = format!(
                        "returned expression not assignable to expected return type: {} is not {}",
                        self.display(&actual),
                        self.display(&expected)
                    );
                    let (node, span) = ret
                        .expression
                        .as_ref()
                        .map_or((statement.id, statement.span), |e| (e.id, e.span));
                    self.error(node, span, DiagnosticKind::Assignability, message);
                }
            }
            (ReturnScope::Inferred(accumulated), Some(actual)) => {
                if !actual.is_unknown() {
                    let merged = self.engine.merge_return(&accumulated, &actual);
                    if let Some(scope) = self.context.return_scope_mut() {
                        *scope = ReturnScope::Inferred(merged);
                    }
                }
            }
        }
        Ok(())
    }

    // --- conditions -------------------------------------------------------

    pub(super) fn check_condition(&mut self, condition: &Condition) -> TypecheckResult<()> {
        match &condition.kind {
            ConditionKind::Boolean(expression) => {
                let ty = self.check_expression(expression)?;
                if !self.is_subtype(&ty, &self.lang.boolean_type()) {
                    let message = format!(
                        "expression is not of boolean type: {} is not Boolean",
                        self.display(&ty)
                    );
                    self.error_on(expression, DiagnosticKind::MissingCapability, message);
                }
            }
            ConditionKind::Exists {
                variable,
                specifier,
            } => {
                let ty = self.check_expression(specifier)?;
                self.check_shorthand(variable, specifier);
                self.check_optional(&ty, specifier);
                if variable.type_.is_inferred() {
                    if let Some(definite) = self.engine.exists_type(&ty) {
                        self.engine.infer(variable.declaration, definite);
                    }
                }
                let declared = self.variable_type(variable);
                let expected = declared.map(|vt| self.lang.optional(vt));
                self.check_assignable_to(expected.as_ref(), &ty, specifier.id, specifier.span);
            }
            ConditionKind::Nonempty {
                variable,
                specifier,
            } => {
                let ty = self.check_expression(specifier)?;
                self.check_shorthand(variable, specifier);
                self.check_empty(&ty, specifier);
                if variable.type_.is_inferred() {
                    if let Some(nonempty) = self.engine.nonempty_type(&ty) {
                        self.engine.infer(variable.declaration, nonempty);
                    }
                }
                let declared = self.variable_type(variable);
                let expected = declared.map(|vt| {
                    ProducedType::union([self.lang.nothing_type(), self.lang.empty_type(), vt])
                });
                self.check_assignable_to(expected.as_ref(), &ty, specifier.id, specifier.span);
            }
            ConditionKind::Is {
                type_,
                variable,
                specifier,
            } => {
                let tested = self.resolve_type(type_);
                self.check_expression(specifier)?;
                self.check_shorthand(variable, specifier);
                self.engine.infer(variable.declaration, tested.clone());
                self.variable_type(variable);
                self.check_reified(&tested, type_);
            }
            ConditionKind::Satisfies { type_, satisfied } => {
                self.resolve_type(type_);
                self.resolve_type(satisfied);
                self.unsupported(
                    condition.id,
                    condition.span,
                    "satisfies conditions not yet supported",
                );
            }
        }
        Ok(())
    }

    /// The type recorded for a condition, iterator or catch variable
    fn variable_type(&mut self, variable: &Variable) -> Option<ProducedType> {
        let ty = self.declared_type(variable.declaration);
        self.analysis.record_type(
            variable.type_.id,
            ty.clone().unwrap_or(ProducedType::Unknown),
        );
        ty
    }

    /// `exists x`, `nonempty x` and `is T x` narrow an existing value,
    /// which must not change underneath the narrowed copy
    fn check_shorthand(&mut self, variable: &Variable, specifier: &Expression) {
        if !matches!(variable.type_.kind, TypeNodeKind::Synthetic) {
            return;
        }
        let variable_reference = self
            .analysis
            .target(specifier.id)
            .is_some_and(|target| self.model[target.declaration].variable);
        if variable_reference {
            self.error_on(
                specifier,
                DiagnosticKind::Malformed,
                "referenced value is variable",
            );
        }
    }

    /// Type tests against generic types cannot be checked at runtime yet
    pub(super) fn check_reified(&mut self, ty: &ProducedType, node: &TypeNode) {
        let generic = ty.cases().iter().any(|case| {
            !case.arguments().is_empty()
                || case
                    .declaration()
                    .is_some_and(|declaration| self.model[declaration].is_type_parameter())
        });
        if generic {
            self.unsupported(
                node.id,
                node.span,
                "generic types in assignability conditions not yet supported (until we implement reified generics)",
            );
        }
    }

    // --- loops and exceptions ------------------------------------------

    fn check_for(&mut self, for_statement: &ForStatement) -> TypecheckResult<()> {
        match &for_statement.iterator.kind {
            ForIteratorKind::Value { variable, source } => {
                let ty = self.check_expression(source)?;
                let element = self.iterated_element(&ty, source);
                if variable.type_.is_inferred() {
                    if let Some(element) = element.clone() {
                        self.engine.infer(variable.declaration, element);
                    }
                }
                let expected = self
                    .variable_type(variable)
                    .map(|element| self.lang.iterable_of(element));
                if element.is_some() {
                    self.check_assignable_to(expected.as_ref(), &ty, source.id, source.span);
                }
            }
            ForIteratorKind::KeyValue { key, value, source } => {
                let ty = self.check_expression(source)?;
                let element = self.iterated_element(&ty, source);
                let entry = element
                    .as_ref()
                    .and_then(|element| self.engine.entry_types(element));
                if let Some((key_type, item_type)) = entry.clone() {
                    if key.type_.is_inferred() {
                        self.engine.infer(key.declaration, key_type);
                    }
                    if value.type_.is_inferred() {
                        self.engine.infer(value.declaration, item_type);
                    }
                }
                if let (Some(element), None) = (&element, &entry) {
                    if !element.is_unknown() {
                        let message = format!(
                            "iterated elements are not entries: {} is not Entry",
                            self.display(element)
                        );
                        self.error_on(source, DiagnosticKind::MissingCapability, message);
                    }
                }
                let expected = match (self.variable_type(key), self.variable_type(value)) {
                    (Some(key_type), Some(item_type)) => Some(
                        self.lang
                            .iterable_of(self.lang.entry_of(key_type, item_type)),
                    ),
                    _ => None,
                };
                if entry.is_some() {
                    self.check_assignable_to(expected.as_ref(), &ty, source.id, source.span);
                }
            }
        }
        self.check_block(&for_statement.body)?;
        if let Some(fail_block) = &for_statement.fail_block {
            self.check_block(fail_block)?;
        }
        Ok(())
    }

    /// The element type of an iterated source. A source that is not
    /// iterable is reported here; an unknown source is passed over.
    fn iterated_element(&mut self, ty: &ProducedType, source: &Expression) -> Option<ProducedType> {
        if ty.is_unknown() {
            return None;
        }
        let element = self.engine.iterated_type(ty);
        if element.is_none() {
            let message = format!("expression is not iterable: {} is not Iterable", self.display(ty));
            self.error_on(source, DiagnosticKind::MissingCapability, message);
        }
        element
    }

    fn check_try_catch(&mut self, try_catch: &TryCatchStatement) -> TypecheckResult<()> {
        self.check_block(&try_catch.try_block)?;
        let exception = self.lang.type_(self.lang.exception);
        let mut handled: Vec<ProducedType> = Vec::new();
        for clause in &try_catch.catch_clauses {
            if let Some(caught) = self.check_catch_variable(clause, &exception) {
                self.check_already_handled(clause, &caught, &handled);
                handled.push(caught);
            }
            self.check_block(&clause.block)?;
        }
        if let Some(finally_block) = &try_catch.finally_block {
            self.check_block(finally_block)?;
        }
        Ok(())
    }

    fn check_catch_variable(
        &mut self,
        clause: &CatchClause,
        exception: &ProducedType,
    ) -> Option<ProducedType> {
        let variable = &clause.variable;
        if variable.type_.is_inferred() {
            self.engine.infer(variable.declaration, exception.clone());
        } else {
            self.resolve_type(&variable.type_);
        }
        let caught = self.variable_type(variable)?;
        if !self.is_subtype(&caught, exception) {
            self.error(
                variable.type_.id,
                variable.type_.span,
                DiagnosticKind::Assignability,
                "must be of type: Exception",
            );
        }
        Some(caught)
    }

    fn check_already_handled(
        &mut self,
        clause: &CatchClause,
        caught: &ProducedType,
        handled: &[ProducedType],
    ) {
        let type_node = &clause.variable.type_;
        for earlier in handled {
            if self.is_subtype(caught, earlier) {
                let message = format!(
                    "exception type is already handled by earlier catch clause: {}",
                    self.display(caught)
                );
                self.error(type_node.id, type_node.span, DiagnosticKind::Malformed, message);
            } else if caught.is_union() {
                for case in caught.cases() {
                    if self.is_subtype(case, earlier) {
                        let message = format!(
                            "exception type is already handled by earlier catch clause: {}",
                            self.display(case)
                        );
                        self.error(type_node.id, type_node.span, DiagnosticKind::Malformed, message);
                    }
                }
            }
        }
    }
}
