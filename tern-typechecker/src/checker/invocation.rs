//! Invocations and their argument lists

use super::expressions::{explicit_type_arguments, is_reference};
use super::{Callable, ReturnScope, TypeChecker};
use crate::error::{DiagnosticKind, TypecheckError, TypecheckResult};
use std::collections::HashSet;
use tern_ast::{
    ArgumentList, ArgumentListKind, Ellipsis, Expression, InvocationExpression, NamedArgument,
    NamedArgumentKind, SequencedArgument,
};
use tern_model::{DeclId, ParameterList, ProducedReference, ProducedType};
use tracing::trace;

impl TypeChecker<'_> {
    /// `primary(arguments)`. The primary must denote something functional;
    /// each invocation consumes one parameter list, so `f(a)(b)` applies
    /// the second list of `f` to `b`.
    pub(super) fn check_invocation(
        &mut self,
        expression: &Expression,
        invocation: &InvocationExpression,
    ) -> TypecheckResult<ProducedType> {
        let primary = invocation.primary.as_ref();
        if is_reference(primary) {
            self.check_invoked_reference(primary, &invocation.arguments)?;
        } else {
            self.check_expression(primary)?;
            self.check_arguments(&invocation.arguments)?;
        }

        let Some(callable) = self.callables.get(&primary.id).cloned() else {
            let not_functional = self
                .analysis
                .target(primary.id)
                .is_some_and(|target| !self.model[target.declaration].is_functional());
            if not_functional {
                self.error_on(
                    expression,
                    DiagnosticKind::Malformed,
                    "receiving expression cannot be invoked",
                );
            } else if !is_reference(primary.unparenthesized())
                && !self.type_of_node(primary.id).is_unknown()
            {
                self.unsupported(
                    expression.id,
                    expression.span,
                    "direct invocation of Callable objects not yet supported",
                );
            }
            return Ok(ProducedType::Unknown);
        };

        let model = self.model;
        let declaration = callable.reference.declaration;
        let lists = model[declaration].parameter_lists();
        if lists.is_empty() {
            if model[declaration].is_class() {
                let message = format!(
                    "type cannot be instantiated: {} (or return statement is missing)",
                    self.name(declaration)
                );
                self.error_on(expression, DiagnosticKind::Malformed, message);
                return Ok(ProducedType::Unknown);
            }
            return Err(TypecheckError::MissingParameterList {
                name: self.name(declaration),
                span: Some(expression.span.into()),
            });
        }
        let Some(parameters) = lists.get(callable.list) else {
            self.error_on(
                expression,
                DiagnosticKind::Malformed,
                "receiving expression cannot be invoked",
            );
            return Ok(ProducedType::Unknown);
        };

        self.check_argument_list(&callable.reference, parameters, &invocation.arguments);
        self.analysis
            .record_target(expression.id, callable.reference.clone());
        self.analysis
            .record_target(invocation.arguments.id, callable.reference.clone());
        if callable.list + 1 < lists.len() {
            self.callables.insert(
                expression.id,
                Callable {
                    reference: callable.reference,
                    list: callable.list + 1,
                },
            );
        }
        Ok(self.type_of_node(primary.id))
    }

    /// A reference in invocation position. Omitted type arguments of a
    /// generic function or class are inferred from the arguments, so those
    /// are typed first.
    fn check_invoked_reference(
        &mut self,
        primary: &Expression,
        arguments: &ArgumentList,
    ) -> TypecheckResult<()> {
        let Some(target) = self.resolve_target(primary)? else {
            self.analysis.record_type(primary.id, ProducedType::Unknown);
            return self.check_arguments(arguments);
        };

        let model = self.model;
        let declaration = &model[target.declaration];
        let explicit = explicit_type_arguments(primary);
        let ty = if explicit.is_none() && declaration.is_generic() && declaration.is_functional() {
            self.check_arguments(arguments)?;
            let inferred = self.infer_type_arguments(target.declaration, arguments);
            self.analysis
                .record_type_arguments(primary.id, inferred.clone());
            self.complete_reference(primary, &target, inferred, None, true)
        } else {
            let type_arguments = explicit
                .map(|nodes| nodes.iter().map(|node| self.resolve_type(node)).collect())
                .unwrap_or_default();
            let ty = self.complete_reference(primary, &target, type_arguments, explicit, false);
            self.check_arguments(arguments)?;
            ty
        };
        self.analysis.record_type(primary.id, ty);
        Ok(())
    }

    /// Type every argument expression, independent of any parameter list
    pub(super) fn check_arguments(&mut self, arguments: &ArgumentList) -> TypecheckResult<()> {
        match &arguments.kind {
            ArgumentListKind::Positional { arguments, .. } => {
                for argument in arguments {
                    self.check_expression(argument)?;
                }
            }
            ArgumentListKind::Named {
                arguments,
                sequenced,
            } => {
                for argument in arguments {
                    self.check_named_argument(argument)?;
                }
                if let Some(sequenced) = sequenced {
                    for expression in &sequenced.expressions {
                        self.check_expression(expression)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_named_argument(&mut self, argument: &NamedArgument) -> TypecheckResult<()> {
        let ty = match &argument.kind {
            NamedArgumentKind::Specified(value) => self.check_expression(value)?,
            NamedArgumentKind::Attribute {
                declaration,
                type_,
                body,
            } => {
                let declared = self.resolve_declaration_type(type_, *declaration);
                let scope = if type_.is_inferred() {
                    ReturnScope::Inferred(ProducedType::Bottom)
                } else {
                    ReturnScope::Declared(declared.unwrap_or(ProducedType::Unknown))
                };
                self.check_member_body(*declaration, scope, body)?;
                self.declared_type(*declaration)
                    .unwrap_or(ProducedType::Unknown)
            }
        };
        self.analysis.record_type(argument.id, ty);
        Ok(())
    }

    /// Check already typed arguments against one parameter list of the
    /// invoked reference
    pub(super) fn check_argument_list(
        &mut self,
        reference: &ProducedReference,
        parameters: &ParameterList,
        arguments: &ArgumentList,
    ) {
        trace!(
            declaration = self.model[reference.declaration].name(),
            parameters = parameters.parameters.len(),
            "checking argument list"
        );
        match &arguments.kind {
            ArgumentListKind::Positional {
                arguments: positional,
                ellipsis,
            } => self.check_positional_arguments(
                reference,
                parameters,
                arguments,
                positional,
                ellipsis.as_ref(),
            ),
            ArgumentListKind::Named {
                arguments: named,
                sequenced,
            } => self.check_named_arguments(
                reference,
                parameters,
                arguments,
                named,
                sequenced.as_ref(),
            ),
        }
    }

    fn check_positional_arguments(
        &mut self,
        reference: &ProducedReference,
        parameters: &ParameterList,
        list: &ArgumentList,
        arguments: &[Expression],
        ellipsis: Option<&Ellipsis>,
    ) {
        let model = self.model;
        let params = &parameters.parameters;
        for (i, &parameter) in params.iter().enumerate() {
            let declaration = &model[parameter];
            let name = declaration.name();
            let Some(argument) = arguments.get(i) else {
                if !declaration.is_defaulted() && !declaration.is_sequenced() {
                    self.error(
                        list.id,
                        list.span,
                        DiagnosticKind::Arity,
                        format!("no argument to parameter: {name}"),
                    );
                }
                if declaration.is_sequenced() && ellipsis.is_some() {
                    self.error(
                        list.id,
                        list.span,
                        DiagnosticKind::Arity,
                        format!("missing argument to sequenced parameter: {name}"),
                    );
                }
                continue;
            };

            let spread_into_sequenced = declaration.is_sequenced() && ellipsis.is_none();
            let Some(parameter_type) = reference.typed_parameter(model, parameter) else {
                let message = if spread_into_sequenced {
                    format!("sequenced parameter type not known: {name}")
                } else {
                    format!("parameter type not known: {name}")
                };
                self.error_on(argument, DiagnosticKind::Malformed, message);
                if spread_into_sequenced {
                    return;
                }
                continue;
            };

            if spread_into_sequenced {
                self.check_sequenced_positional(name, &parameter_type, &arguments[i..]);
                return;
            }
            let argument_type = self.type_of_node(argument.id);
            if !self.is_subtype(&argument_type, &parameter_type) {
                let message = format!(
                    "argument not assignable to parameter type: {name} since {} is not {}",
                    self.display(&argument_type),
                    self.display(&parameter_type)
                );
                self.error_on(argument, DiagnosticKind::Assignability, message);
            }
        }

        for argument in arguments.iter().skip(params.len()) {
            self.error_on(
                argument,
                DiagnosticKind::Arity,
                "no matching parameter for argument",
            );
        }

        if let Some(ellipsis) = ellipsis {
            let sequenced = params
                .last()
                .is_some_and(|last| model[*last].is_sequenced());
            if !sequenced {
                self.error(
                    ellipsis.id,
                    ellipsis.span,
                    DiagnosticKind::Arity,
                    "parameter list does not have a sequenced parameter",
                );
            }
        }
    }

    /// The remaining arguments, one per element of the sequenced parameter
    fn check_sequenced_positional(
        &mut self,
        name: &str,
        parameter_type: &ProducedType,
        arguments: &[Expression],
    ) {
        let Some(element) = self.lang.sequenced_element_type(self.model, parameter_type) else {
            if let Some(first) = arguments.first() {
                let message = format!(
                    "sequenced parameter type is not a sequence type: {name} has type {}",
                    self.display(parameter_type)
                );
                self.error_on(first, DiagnosticKind::Malformed, message);
            }
            return;
        };
        for argument in arguments {
            let argument_type = self.type_of_node(argument.id);
            if !self.is_subtype(&argument_type, &element) {
                let message = format!(
                    "argument not assignable to sequenced parameter type: {name} since {} is not {}",
                    self.display(&argument_type),
                    self.display(&element)
                );
                self.error_on(argument, DiagnosticKind::Assignability, message);
            }
        }
    }

    fn check_named_arguments(
        &mut self,
        reference: &ProducedReference,
        parameters: &ParameterList,
        list: &ArgumentList,
        arguments: &[NamedArgument],
        sequenced: Option<&SequencedArgument>,
    ) {
        let model = self.model;
        let params = &parameters.parameters;
        let mut matched: HashSet<DeclId> = HashSet::new();

        for argument in arguments {
            let parameter = params
                .iter()
                .copied()
                .find(|parameter| model[*parameter].name() == argument.name);
            match parameter {
                Some(parameter) => {
                    matched.insert(parameter);
                    self.check_named_argument_type(reference, parameter, argument);
                }
                None => self.error(
                    argument.id,
                    argument.span,
                    DiagnosticKind::Arity,
                    format!("no matching parameter for named argument: {}", argument.name),
                ),
            }
        }

        if let Some(sequenced) = sequenced {
            let parameter = params
                .last()
                .copied()
                .filter(|last| model[*last].is_sequenced());
            match parameter {
                Some(parameter) => {
                    matched.insert(parameter);
                    self.check_sequenced_argument(reference, parameter, sequenced);
                }
                None => self.error(
                    sequenced.id,
                    sequenced.span,
                    DiagnosticKind::Arity,
                    "no matching sequenced parameter",
                ),
            }
        }

        for &parameter in params {
            let declaration = &model[parameter];
            if !matched.contains(&parameter)
                && !declaration.is_defaulted()
                && !declaration.is_sequenced()
            {
                self.error(
                    list.id,
                    list.span,
                    DiagnosticKind::Arity,
                    format!("missing named argument to parameter: {}", declaration.name()),
                );
            }
        }
    }

    fn check_named_argument_type(
        &mut self,
        reference: &ProducedReference,
        parameter: DeclId,
        argument: &NamedArgument,
    ) {
        let name = self.name(parameter);
        let Some(parameter_type) = reference.typed_parameter(self.model, parameter) else {
            self.error(
                argument.id,
                argument.span,
                DiagnosticKind::Malformed,
                format!("parameter type not known: {name}"),
            );
            return;
        };
        let argument_type = self.type_of_node(argument.id);
        if !self.is_subtype(&argument_type, &parameter_type) {
            let message = format!(
                "named argument not assignable to parameter type: {name} since {} is not {}",
                self.display(&argument_type),
                self.display(&parameter_type)
            );
            self.error(argument.id, argument.span, DiagnosticKind::Assignability, message);
        }
    }

    fn check_sequenced_argument(
        &mut self,
        reference: &ProducedReference,
        parameter: DeclId,
        sequenced: &SequencedArgument,
    ) {
        let name = self.name(parameter);
        let element = reference
            .typed_parameter(self.model, parameter)
            .and_then(|ty| {
                let element = self.lang.sequenced_element_type(self.model, &ty)?;
                Some((ty, element))
            });
        let Some((parameter_type, element)) = element else {
            self.error(
                sequenced.id,
                sequenced.span,
                DiagnosticKind::Malformed,
                format!("sequenced parameter type not known: {name}"),
            );
            return;
        };
        for expression in &sequenced.expressions {
            let argument_type = self.type_of_node(expression.id);
            if !self.is_subtype(&argument_type, &element) {
                let message = format!(
                    "sequenced argument not assignable to sequenced parameter type: {name} since {} is not {}",
                    self.display(&argument_type),
                    self.display(&parameter_type)
                );
                self.error(
                    sequenced.id,
                    sequenced.span,
                    DiagnosticKind::Assignability,
                    message,
                );
            }
        }
    }
}
