//! Expressions: literals, member and type references, `this`, `super`
//! and `outer`, string templates, sequence enumerations and indexing

use super::{Callable, TypeChecker};
use crate::error::{DiagnosticKind, TypecheckError, TypecheckResult};
use tern_ast::{
    BaseReference, Expression, ExpressionKind, IndexExpression, IndexKind, MemberOperator,
    QualifiedReference, TypeNode,
};
use tern_model::{DeclId, ProducedType};

/// How the type of a qualified reference is wrapped after lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrap {
    Plain,
    /// `x?.y` is null when `x` is
    Optional,
    /// `x[].y` collects `y` of every element
    Sequence,
}

/// A resolved reference whose type arguments are not settled yet
#[derive(Debug, Clone)]
pub(super) struct Target {
    pub declaration: DeclId,
    pub qualifying: Option<ProducedType>,
    wrap: Wrap,
}

/// The explicit type arguments written on a reference, if any
pub(super) fn explicit_type_arguments(expression: &Expression) -> Option<&[TypeNode]> {
    match &expression.kind {
        ExpressionKind::BaseMember(reference) | ExpressionKind::BaseType(reference) => {
            reference.type_arguments.as_deref()
        }
        ExpressionKind::QualifiedMember(reference) | ExpressionKind::QualifiedType(reference) => {
            reference.type_arguments.as_deref()
        }
        _ => None,
    }
}

pub(super) fn is_reference(expression: &Expression) -> bool {
    matches!(
        expression.kind,
        ExpressionKind::BaseMember(_)
            | ExpressionKind::BaseType(_)
            | ExpressionKind::QualifiedMember(_)
            | ExpressionKind::QualifiedType(_)
    )
}

impl TypeChecker<'_> {
    /// Type an expression and record the result on its node
    pub(super) fn check_expression(&mut self, expression: &Expression) -> TypecheckResult<ProducedType> {
        let lang = self.lang;
        let ty = match &expression.kind {
            ExpressionKind::NaturalLiteral(_) => lang.type_(lang.natural),
            ExpressionKind::FloatLiteral(_) => lang.type_(lang.float),
            ExpressionKind::CharacterLiteral(_) => lang.type_(lang.character),
            ExpressionKind::StringLiteral(_) => lang.type_(lang.string),
            ExpressionKind::QuotedLiteral(_) => lang.type_(lang.quoted),
            ExpressionKind::StringTemplate(parts) => self.check_template(parts)?,
            ExpressionKind::BaseMember(_)
            | ExpressionKind::BaseType(_)
            | ExpressionKind::QualifiedMember(_)
            | ExpressionKind::QualifiedType(_) => self.check_reference(expression)?,
            ExpressionKind::This => self.this_type(),
            ExpressionKind::Super => self.super_type(expression),
            ExpressionKind::Outer => self.outer_type(),
            ExpressionKind::Invocation(invocation) => {
                self.check_invocation(expression, invocation)?
            }
            ExpressionKind::Binary(operation) => self.check_binary(expression, operation)?,
            ExpressionKind::Unary(operation) => self.check_unary(expression, operation)?,
            ExpressionKind::Postfix(operation) | ExpressionKind::Prefix(operation) => {
                self.check_increment(operation)?
            }
            ExpressionKind::IsOperation(operation) => self.check_is_operation(operation)?,
            ExpressionKind::Extends(operation) => self.check_unchecked_type_operation(
                expression,
                operation,
                "extends operator not yet supported",
            )?,
            ExpressionKind::Satisfies(operation) => self.check_unchecked_type_operation(
                expression,
                operation,
                "satisfies operator not yet supported",
            )?,
            ExpressionKind::Index(index) => self.check_index(index)?,
            ExpressionKind::SequenceEnumeration(elements) => self.check_enumeration(elements)?,
            ExpressionKind::Parenthesized(inner) => {
                let ty = self.check_expression(inner)?;
                if let Some(callable) = self.callables.get(&inner.id).cloned() {
                    self.callables.insert(expression.id, callable);
                }
                ty
            }
        };
        self.analysis.record_type(expression.id, ty.clone());
        Ok(ty)
    }

    // --- references -------------------------------------------------------

    /// A reference used as a value: explicit type arguments are checked,
    /// missing ones on a generic declaration are an error
    fn check_reference(&mut self, expression: &Expression) -> TypecheckResult<ProducedType> {
        let Some(target) = self.resolve_target(expression)? else {
            return Ok(ProducedType::Unknown);
        };
        let explicit = explicit_type_arguments(expression);
        let arguments: Vec<ProducedType> = explicit
            .map(|nodes| nodes.iter().map(|node| self.resolve_type(node)).collect())
            .unwrap_or_default();
        Ok(self.complete_reference(expression, &target, arguments, explicit, false))
    }

    /// Resolve the declaration a reference names and the type it is seen
    /// through. `None` once the failure has been reported.
    pub(super) fn resolve_target(&mut self, expression: &Expression) -> TypecheckResult<Option<Target>> {
        match &expression.kind {
            ExpressionKind::BaseMember(reference) => self.resolve_base(expression, reference, false),
            ExpressionKind::BaseType(reference) => self.resolve_base(expression, reference, true),
            ExpressionKind::QualifiedMember(reference) => {
                self.resolve_qualified(expression, reference, false)
            }
            ExpressionKind::QualifiedType(reference) => {
                self.resolve_qualified(expression, reference, true)
            }
            _ => Ok(None),
        }
    }

    fn resolve_base(
        &mut self,
        expression: &Expression,
        reference: &BaseReference,
        type_expected: bool,
    ) -> TypecheckResult<Option<Target>> {
        let model = self.model;
        let kind_matches = |declaration: DeclId| {
            if type_expected {
                model[declaration].is_type_declaration()
            } else {
                model[declaration].is_typed()
            }
        };
        let declaration = match reference.declaration {
            Some(declaration) => {
                model.get(declaration)?;
                if !kind_matches(declaration) {
                    return Err(TypecheckError::WrongDeclarationKind {
                        id: declaration,
                        expected: if type_expected {
                            "type declaration"
                        } else {
                            "typed declaration"
                        },
                        span: Some(expression.span.into()),
                    });
                }
                declaration
            }
            None => match model
                .lookup(self.context.scope(), &reference.name)
                .filter(|declaration| kind_matches(*declaration))
            {
                Some(declaration) => declaration,
                None => {
                    let message = if type_expected {
                        format!("type does not exist: {}", reference.name)
                    } else {
                        format!("method or attribute does not exist: {}", reference.name)
                    };
                    self.error_on(expression, DiagnosticKind::UnresolvedReference, message);
                    return Ok(None);
                }
            },
        };
        Ok(Some(Target {
            declaration,
            qualifying: self.base_qualifying_type(declaration),
            wrap: Wrap::Plain,
        }))
    }

    /// For an unqualified member: the innermost enclosing class or
    /// interface that inherits the member's declaring type
    fn base_qualifying_type(&self, declaration: DeclId) -> Option<ProducedType> {
        let model = self.model;
        let declaring = model.declaring_type(declaration)?;
        let mut scope = model.containing_class_or_interface(self.context.scope());
        while let Some(current) = scope {
            let ty = model.type_of(current);
            if self.supertype(&ty, declaring).is_some() {
                return Some(ty);
            }
            scope = model[current]
                .container()
                .and_then(|container| model.containing_class_or_interface(container));
        }
        None
    }

    fn resolve_qualified(
        &mut self,
        expression: &Expression,
        reference: &QualifiedReference,
        type_expected: bool,
    ) -> TypecheckResult<Option<Target>> {
        let primary = &reference.primary;
        let primary_type = self.check_expression(primary)?;
        if primary_type.is_unknown() {
            return Ok(None);
        }
        let (receiver, wrap) = self.unwrap_receiver(primary, primary_type, reference.operator);

        let model = self.model;
        let member = model
            .member_of_type(&receiver, &reference.name)
            .filter(|member| {
                if type_expected {
                    model[*member].is_type_declaration()
                } else {
                    model[*member].is_typed()
                }
            });
        let Some(member) = member else {
            let message = if type_expected {
                format!("member type does not exist: {}", reference.name)
            } else {
                format!("member method or attribute does not exist: {}", reference.name)
            };
            self.error_on(expression, DiagnosticKind::UnresolvedReference, message);
            return Ok(None);
        };

        if !model.is_visible_from(member, self.context.scope()) {
            let message = if type_expected {
                format!("member type is not visible: {}", reference.name)
            } else {
                format!("member method or attribute is not visible: {}", reference.name)
            };
            self.error_on(expression, DiagnosticKind::Visibility, message);
        }
        if matches!(primary.unparenthesized().kind, ExpressionKind::Super) && model[member].formal {
            let message = if type_expected {
                "superclass member class is formal"
            } else {
                "superclass member is formal"
            };
            self.error_on(expression, DiagnosticKind::UnresolvedReference, message);
        }

        Ok(Some(Target {
            declaration: member,
            qualifying: Some(receiver),
            wrap,
        }))
    }

    /// The receiver a member is looked up on: the definite type for `?.`,
    /// the element type for `[].`
    fn unwrap_receiver(
        &mut self,
        primary: &Expression,
        primary_type: ProducedType,
        operator: MemberOperator,
    ) -> (ProducedType, Wrap) {
        match operator {
            MemberOperator::Member => (primary_type, Wrap::Plain),
            MemberOperator::Safe => {
                if self.engine.is_optional(&primary_type) {
                    (self.lang.definite(self.model, &primary_type), Wrap::Optional)
                } else {
                    self.error_on(
                        primary,
                        DiagnosticKind::MissingCapability,
                        "receiver not of optional type",
                    );
                    (primary_type, Wrap::Optional)
                }
            }
            MemberOperator::Spread => {
                match self.lang.sequenced_element_type(self.model, &primary_type) {
                    Some(element) => (element, Wrap::Sequence),
                    None => {
                        self.error_on(
                            primary,
                            DiagnosticKind::MissingCapability,
                            "receiver not of type: Sequence",
                        );
                        (primary_type, Wrap::Sequence)
                    }
                }
            }
        }
    }

    /// Bind type arguments to a resolved target and record the reference.
    /// Functional references become invocable through `callables`.
    pub(super) fn complete_reference(
        &mut self,
        expression: &Expression,
        target: &Target,
        arguments: Vec<ProducedType>,
        explicit: Option<&[TypeNode]>,
        inferred: bool,
    ) -> ProducedType {
        let declaration = target.declaration;
        let accepted = self.accepts_type_arguments(
            target.qualifying.as_ref(),
            declaration,
            &arguments,
            explicit,
            inferred,
            expression.id,
            expression.span,
        );
        if !accepted {
            return ProducedType::Unknown;
        }

        let reference =
            self.model
                .produced_reference(declaration, target.qualifying.as_ref(), arguments);
        let ty = reference.type_(self.model);
        self.analysis.record_target(expression.id, reference.clone());
        if self.model[declaration].is_functional() {
            self.callables
                .insert(expression.id, Callable { reference, list: 0 });
        }

        let Some(ty) = ty else {
            let message = format!(
                "could not determine type of method or attribute reference: {}",
                self.name(declaration)
            );
            self.error_on(expression, DiagnosticKind::Malformed, message);
            return ProducedType::Unknown;
        };
        match target.wrap {
            Wrap::Plain => ty,
            Wrap::Optional => self.lang.optional(ty),
            Wrap::Sequence => self.lang.sequence_of(ty),
        }
    }

    // --- self references --------------------------------------------------

    /// Missing context is reported by the self reference pass
    fn this_type(&self) -> ProducedType {
        self.model
            .containing_class_or_interface(self.context.scope())
            .map(|ci| self.model.type_of(ci))
            .unwrap_or(ProducedType::Unknown)
    }

    fn super_type(&mut self, expression: &Expression) -> ProducedType {
        let model = self.model;
        match model.containing_class_or_interface(self.context.scope()) {
            None => {
                self.error_on(
                    expression,
                    DiagnosticKind::Malformed,
                    "super appears outside a class definition",
                );
                ProducedType::Unknown
            }
            Some(ci) if !model[ci].is_class() => {
                self.error_on(
                    expression,
                    DiagnosticKind::Malformed,
                    "super appears inside an interface definition",
                );
                ProducedType::Unknown
            }
            Some(class) => model[class]
                .extended_type()
                .cloned()
                .unwrap_or(ProducedType::Unknown),
        }
    }

    fn outer_type(&self) -> ProducedType {
        self.model
            .outer_class_or_interface(self.context.scope())
            .map(|ci| self.model.type_of(ci))
            .unwrap_or(ProducedType::Unknown)
    }

    // --- compound expressions ---------------------------------------------

    fn check_template(&mut self, parts: &[Expression]) -> TypecheckResult<ProducedType> {
        let format = self.lang.type_(self.lang.format);
        for part in parts {
            let ty = self.check_expression(part)?;
            if !self.is_subtype(&ty, &format) {
                let message = format!(
                    "interpolated expression not formattable to a string: {} is not Format",
                    self.display(&ty)
                );
                self.error_on(part, DiagnosticKind::MissingCapability, message);
            }
        }
        Ok(self.lang.type_(self.lang.string))
    }

    /// `{}` is `Empty`; otherwise a sequence of the union of the elements
    fn check_enumeration(&mut self, elements: &[Expression]) -> TypecheckResult<ProducedType> {
        if elements.is_empty() {
            return Ok(self.lang.empty_type());
        }
        let mut types = Vec::with_capacity(elements.len());
        for element in elements {
            types.push(self.check_expression(element)?);
        }
        let element = ProducedType::union(types);
        if element.is_unknown() {
            return Ok(ProducedType::Unknown);
        }
        Ok(self.lang.sequence_of(element))
    }

    fn check_index(&mut self, index: &IndexExpression) -> TypecheckResult<ProducedType> {
        let primary = &index.primary;
        let mut receiver = self.check_expression(primary)?;
        let (element, lower, upper) = match &index.index {
            IndexKind::Element(element) => (Some(element.as_ref()), None, None),
            IndexKind::Range { lower, upper } => (None, Some(lower.as_ref()), upper.as_deref()),
        };
        let mut key_types = Vec::new();
        for expression in [element, lower, upper].into_iter().flatten() {
            key_types.push((expression, self.check_expression(expression)?));
        }
        if receiver.is_unknown() {
            return Ok(ProducedType::Unknown);
        }

        if index.safe {
            if self.engine.is_optional(&receiver) {
                receiver = self.lang.definite(self.model, &receiver);
            } else {
                let message = format!(
                    "receiving type not of optional type: {} is not Optional",
                    self.display(&receiver)
                );
                self.error_on(primary, DiagnosticKind::MissingCapability, message);
            }
        }

        let correspondence = self.lang.correspondence;
        let nonempty = self.model.minus(&receiver, self.lang.empty);
        let view = self
            .supertype(&nonempty, correspondence)
            .or_else(|| self.supertype(&receiver, correspondence));
        let Some(view) = view else {
            let message = format!(
                "illegal receiving type for index expression: {} is not of type: Correspondence",
                self.display(&receiver)
            );
            self.error_on(primary, DiagnosticKind::MissingCapability, message);
            return Ok(ProducedType::Unknown);
        };
        let [key, item] = view.arguments() else {
            return Ok(ProducedType::Unknown);
        };
        let (key, item) = (key.clone(), item.clone());

        for (position, (expression, ty)) in key_types.into_iter().enumerate() {
            if ty.is_unknown() || self.is_subtype(&ty, &key) {
                continue;
            }
            let role = match (element.is_some(), position) {
                (true, _) => "index",
                (false, 0) => "lower bound",
                (false, _) => "upper bound",
            };
            let message = format!("{role} must be of type: {}", self.display(&key));
            self.error_on(expression, DiagnosticKind::Assignability, message);
        }

        Ok(match index.index {
            IndexKind::Element(_) => self.lang.optional(item),
            IndexKind::Range { .. } => self.lang.sequence_of(item),
        })
    }
}
