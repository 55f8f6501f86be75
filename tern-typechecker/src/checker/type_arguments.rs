//! Type argument inference and bound checking

use super::TypeChecker;
use crate::error::DiagnosticKind;
use tern_ast::{ArgumentList, ArgumentListKind, NodeId, Span, TypeNode};
use tern_model::{DeclId, ParameterList, ProducedType};
use tracing::trace;

impl TypeChecker<'_> {
    /// Infer the omitted type arguments of a generic invocation from the
    /// already typed arguments and the first parameter list. Each type
    /// parameter becomes the union of the types found in its positions,
    /// or the bottom type when it occurs nowhere.
    pub(super) fn infer_type_arguments(
        &self,
        declaration: DeclId,
        arguments: &ArgumentList,
    ) -> Vec<ProducedType> {
        let declaration = &self.model[declaration];
        let parameters = declaration.parameter_lists().first();
        declaration
            .type_parameters()
            .iter()
            .map(|&type_parameter| {
                let mut candidates = Vec::new();
                if let Some(parameters) = parameters {
                    self.collect_candidates(type_parameter, parameters, arguments, &mut candidates);
                }
                ProducedType::union(candidates)
            })
            .collect()
    }

    fn collect_candidates(
        &self,
        type_parameter: DeclId,
        parameters: &ParameterList,
        arguments: &ArgumentList,
        candidates: &mut Vec<ProducedType>,
    ) {
        let model = self.model;
        let params = &parameters.parameters;
        match &arguments.kind {
            ArgumentListKind::Positional {
                arguments,
                ellipsis,
            } => {
                for (i, &parameter) in params.iter().enumerate() {
                    if i >= arguments.len() {
                        break;
                    }
                    let Some(parameter_type) = model.declared_type(parameter) else {
                        continue;
                    };
                    if model[parameter].is_sequenced() && ellipsis.is_none() {
                        let element = self.lang.sequenced_element_type(model, parameter_type);
                        if let Some(element) = element {
                            for argument in &arguments[i..] {
                                let argument_type = self.type_of_node(argument.id);
                                self.infer_from(type_parameter, &element, &argument_type, candidates);
                            }
                        }
                        break;
                    }
                    let argument_type = self.type_of_node(arguments[i].id);
                    self.infer_from(type_parameter, parameter_type, &argument_type, candidates);
                }
            }
            ArgumentListKind::Named {
                arguments,
                sequenced,
            } => {
                for argument in arguments {
                    let parameter_type = params
                        .iter()
                        .find(|parameter| model[**parameter].name() == argument.name)
                        .and_then(|parameter| model.declared_type(*parameter));
                    if let Some(parameter_type) = parameter_type {
                        let argument_type = self.type_of_node(argument.id);
                        self.infer_from(type_parameter, parameter_type, &argument_type, candidates);
                    }
                }
                let element = sequenced.as_ref().and_then(|_| {
                    let last = params.last().filter(|last| model[**last].is_sequenced())?;
                    self.lang
                        .sequenced_element_type(model, model.declared_type(*last)?)
                });
                if let (Some(sequenced), Some(element)) = (sequenced, element) {
                    for expression in &sequenced.expressions {
                        let argument_type = self.type_of_node(expression.id);
                        self.infer_from(type_parameter, &element, &argument_type, candidates);
                    }
                }
            }
        }
    }

    /// Match a declared parameter type against an argument type, collecting
    /// the argument types found where the type parameter occurs
    fn infer_from(
        &self,
        type_parameter: DeclId,
        parameter_type: &ProducedType,
        argument_type: &ProducedType,
        candidates: &mut Vec<ProducedType>,
    ) {
        if argument_type.is_unknown() {
            return;
        }
        match parameter_type {
            ProducedType::Declared { declaration, .. } if *declaration == type_parameter => {
                trace!(
                    type_parameter = self.model[type_parameter].name(),
                    candidate = %self.model.display(argument_type),
                    "type argument candidate"
                );
                if !candidates.iter().any(|c| c.is_exactly(argument_type)) {
                    candidates.push(argument_type.clone());
                }
            }
            ProducedType::Union(cases) => {
                for case in cases {
                    self.infer_from(type_parameter, case, argument_type, candidates);
                }
            }
            _ if argument_type.is_union() => {
                for case in argument_type.cases() {
                    self.infer_from(type_parameter, parameter_type, case, candidates);
                }
            }
            ProducedType::Declared {
                declaration,
                arguments,
            } if !arguments.is_empty() => {
                if let Some(view) = self.supertype(argument_type, *declaration) {
                    for (parameter_argument, view_argument) in arguments.iter().zip(view.arguments())
                    {
                        self.infer_from(type_parameter, parameter_argument, view_argument, candidates);
                    }
                }
            }
            _ => {}
        }
    }

    /// Check a list of type arguments against the type parameters of
    /// `declaration`: their number, upper bounds and enumerated cases.
    /// Bounds are substituted with the arguments themselves and with the
    /// bindings of the receiving type. Explicit violations are attached to
    /// the offending type argument, inferred ones to `node`.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn accepts_type_arguments(
        &mut self,
        receiver: Option<&ProducedType>,
        declaration: DeclId,
        arguments: &[ProducedType],
        explicit: Option<&[TypeNode]>,
        inferred: bool,
        node: NodeId,
        span: Span,
    ) -> bool {
        let model = self.model;
        let generic = &model[declaration];
        let name = generic.name();

        if !generic.is_generic() {
            if arguments.is_empty() {
                return true;
            }
            let (id, span) = explicit_list_location(explicit).unwrap_or((node, span));
            self.error(
                id,
                span,
                DiagnosticKind::Arity,
                format!("does not accept type arguments: {name}"),
            );
            return false;
        }

        let type_parameters = generic.type_parameters();
        if type_parameters.len() != arguments.len() {
            match explicit {
                Some(nodes) if !inferred => {
                    let (id, span) = explicit_list_location(Some(nodes)).unwrap_or((node, span));
                    self.error(
                        id,
                        span,
                        DiagnosticKind::Arity,
                        format!("wrong number of type arguments to: {name}"),
                    );
                }
                _ => self.error(
                    node,
                    span,
                    DiagnosticKind::Arity,
                    format!("requires type arguments: {name}"),
                ),
            }
            return false;
        }

        let reference = model.produced_reference(declaration, receiver, arguments.to_vec());
        for (i, (&type_parameter, argument)) in type_parameters.iter().zip(arguments).enumerate() {
            let parameter = &model[type_parameter];
            let (id, span) = match explicit.and_then(|nodes| nodes.get(i)) {
                Some(type_node) if !inferred => (type_node.id, type_node.span),
                _ => (node, span),
            };

            for bound in parameter.satisfied_types() {
                let bound = reference.apply(bound);
                if !self.is_subtype(argument, &bound) {
                    let message = if inferred {
                        format!(
                            "inferred type argument {} to type parameter {} of declaration {name} not assignable to {}",
                            self.display(argument),
                            parameter.name(),
                            self.display(&bound)
                        )
                    } else {
                        format!(
                            "type parameter {} of declaration {name} has argument {} not assignable to {}",
                            parameter.name(),
                            self.display(argument),
                            self.display(&bound)
                        )
                    };
                    self.error(id, span, DiagnosticKind::BoundViolation, message);
                    return false;
                }
            }

            let cases = parameter.case_types();
            if !cases.is_empty()
                && !cases
                    .iter()
                    .any(|case| self.is_subtype(argument, &reference.apply(case)))
            {
                let message = if inferred {
                    format!(
                        "inferred type argument {} to type parameter {} of declaration {name} not one of the listed cases",
                        self.display(argument),
                        parameter.name()
                    )
                } else {
                    format!(
                        "type parameter {} of declaration {name} has argument {} not one of the listed cases",
                        parameter.name(),
                        self.display(argument)
                    )
                };
                self.error(id, span, DiagnosticKind::BoundViolation, message);
                return false;
            }
        }
        true
    }
}

/// Where a diagnostic about a whole explicit type argument list goes: the
/// first written type argument, which stands in for the list
fn explicit_list_location(explicit: Option<&[TypeNode]>) -> Option<(NodeId, Span)> {
    explicit
        .and_then(|nodes| nodes.first())
        .map(|node| (node.id, node.span))
}
