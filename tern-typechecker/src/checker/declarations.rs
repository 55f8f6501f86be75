//! Declarations: classes, interfaces, objects, attributes, getters,
//! setters, methods and their parameter lists

use super::{ReturnScope, TypeChecker};
use crate::error::{DiagnosticKind, TypecheckResult};
use crate::visitor::{
    walk_argument_list, walk_parameter_list, walk_statement, walk_unit, Visitor, VisitorResult,
};
use tern_ast::{
    ArgumentList, ArgumentListKind, AttributeDeclaration, Block, ClassDefinition, CompilationUnit,
    Expression,
    ExpressionKind, ExtendedType,
    GetterDefinition, InterfaceDefinition, MethodDeclaration, MethodDefinition,
    NamedArgumentKind, ObjectDefinition, ParameterListNode, SetterDefinition, Statement,
    StatementKind, TypeNode, TypeNodeKind, Variable,
};
use tern_model::{DeclId, LanguageModule, Model, ParameterList, ProducedType};
use tracing::trace;

/// The type a type node denotes, or `None` for the inferred modifiers
pub(crate) fn node_type(lang: &LanguageModule, node: &TypeNode) -> Option<ProducedType> {
    let ty = match &node.kind {
        TypeNodeKind::Simple {
            declaration,
            arguments,
        } => ProducedType::declared(
            *declaration,
            arguments
                .iter()
                .map(|argument| node_type(lang, argument).unwrap_or(ProducedType::Unknown))
                .collect(),
        ),
        TypeNodeKind::Union(cases) => ProducedType::union(
            cases
                .iter()
                .map(|case| node_type(lang, case).unwrap_or(ProducedType::Unknown)),
        ),
        TypeNodeKind::Intersection(members) => ProducedType::intersection(
            members
                .iter()
                .map(|member| node_type(lang, member).unwrap_or(ProducedType::Unknown)),
        ),
        TypeNodeKind::Optional(inner) => {
            lang.optional(node_type(lang, inner).unwrap_or(ProducedType::Unknown))
        }
        TypeNodeKind::Sequenced(element) => lang.possibly_empty_sequence_of(
            node_type(lang, element).unwrap_or(ProducedType::Unknown),
        ),
        TypeNodeKind::Void => lang.void_type(),
        TypeNodeKind::Value | TypeNodeKind::Function | TypeNodeKind::Synthetic => return None,
    };
    Some(ty)
}

/// Records the annotated types of a unit's declarations before any
/// expression is checked, so forward references to annotated members see
/// their types. Types already present in the model are kept.
///
/// Every declaration id the tree mentions is confirmed against the model
/// on the way, so later passes may index the model freely.
pub(crate) struct AnnotationCollector<'a> {
    model: &'a Model,
    lang: &'a LanguageModule,
}

impl<'a> AnnotationCollector<'a> {
    pub fn new(model: &'a Model, lang: &'a LanguageModule) -> Self {
        Self { model, lang }
    }

    fn annotate(&self, declaration: DeclId, node: &TypeNode) -> VisitorResult {
        let name = self.model.get(declaration)?.name();
        if let Some(ty) = node_type(self.lang, node) {
            if self.model.infer_type(declaration, ty) {
                trace!(declaration = name, "annotated type recorded");
            }
        }
        Ok(())
    }
}

impl Visitor for AnnotationCollector<'_> {
    fn visit_unit(&mut self, unit: &CompilationUnit) -> VisitorResult {
        self.model.get(unit.package)?;
        walk_unit(self, unit)
    }

    fn visit_statement(&mut self, statement: &Statement) -> VisitorResult {
        match &statement.kind {
            StatementKind::AttributeDeclaration(attribute) => {
                self.annotate(attribute.declaration, &attribute.type_)?
            }
            StatementKind::AttributeGetter(getter) => {
                self.annotate(getter.declaration, &getter.type_)?
            }
            StatementKind::MethodDefinition(method) => {
                self.annotate(method.declaration, &method.type_)?
            }
            StatementKind::MethodDeclaration(method) => {
                self.annotate(method.declaration, &method.type_)?
            }
            StatementKind::ObjectDefinition(object) => {
                self.model.get(object.declaration)?;
                self.model.get(object.class)?;
                self.model
                    .infer_type(object.declaration, self.model.type_of(object.class));
            }
            _ => {}
        }
        walk_statement(self, statement)
    }

    fn visit_class_body(&mut self, class: DeclId, body: &Block) -> VisitorResult {
        self.model.get(class)?;
        self.visit_block(body)
    }

    fn visit_interface_body(&mut self, interface: DeclId, body: &Block) -> VisitorResult {
        self.model.get(interface)?;
        self.visit_block(body)
    }

    fn visit_member_body(&mut self, member: DeclId, body: &Block) -> VisitorResult {
        self.model.get(member)?;
        self.visit_block(body)
    }

    fn visit_parameter_list(&mut self, list: &ParameterListNode) -> VisitorResult {
        for parameter in &list.parameters {
            self.annotate(parameter.declaration, &parameter.type_)?;
        }
        walk_parameter_list(self, list)
    }

    fn visit_variable(&mut self, variable: &Variable) -> VisitorResult {
        self.annotate(variable.declaration, &variable.type_)?;
        self.visit_type(&variable.type_)
    }

    fn visit_argument_list(&mut self, arguments: &ArgumentList) -> VisitorResult {
        if let ArgumentListKind::Named { arguments: named, .. } = &arguments.kind {
            for argument in named {
                if let NamedArgumentKind::Attribute {
                    declaration, type_, ..
                } = &argument.kind
                {
                    self.annotate(*declaration, type_)?;
                }
            }
        }
        walk_argument_list(self, arguments)
    }

    fn visit_type(&mut self, type_node: &TypeNode) -> VisitorResult {
        match &type_node.kind {
            TypeNodeKind::Simple {
                declaration,
                arguments,
            } => {
                self.model.get(*declaration)?;
                for argument in arguments {
                    self.visit_type(argument)?;
                }
            }
            TypeNodeKind::Union(nodes) | TypeNodeKind::Intersection(nodes) => {
                for node in nodes {
                    self.visit_type(node)?;
                }
            }
            TypeNodeKind::Optional(inner) | TypeNodeKind::Sequenced(inner) => {
                self.visit_type(inner)?
            }
            TypeNodeKind::Value
            | TypeNodeKind::Function
            | TypeNodeKind::Void
            | TypeNodeKind::Synthetic => {}
        }
        Ok(())
    }
}

impl TypeChecker<'_> {
    /// Resolve a type node, validate its type arguments and record it
    pub(super) fn resolve_type(&mut self, node: &TypeNode) -> ProducedType {
        match &node.kind {
            TypeNodeKind::Simple {
                declaration,
                arguments,
            } => {
                let resolved: Vec<ProducedType> =
                    arguments.iter().map(|argument| self.resolve_type(argument)).collect();
                if !arguments.is_empty() || self.model[*declaration].is_generic() {
                    let explicit = (!arguments.is_empty()).then_some(arguments.as_slice());
                    self.accepts_type_arguments(
                        None,
                        *declaration,
                        &resolved,
                        explicit,
                        false,
                        node.id,
                        node.span,
                    );
                }
            }
            TypeNodeKind::Union(types) | TypeNodeKind::Intersection(types) => {
                for ty in types {
                    self.resolve_type(ty);
                }
            }
            TypeNodeKind::Optional(inner) | TypeNodeKind::Sequenced(inner) => {
                self.resolve_type(inner);
            }
            _ => {}
        }
        let ty = node_type(self.lang, node).unwrap_or(ProducedType::Unknown);
        self.analysis.record_type(node.id, ty.clone());
        ty
    }

    /// The type of a typed declaration, through its annotation or, for the
    /// inferred modifiers, whatever has been inferred so far
    pub(super) fn resolve_declaration_type(
        &mut self,
        node: &TypeNode,
        declaration: DeclId,
    ) -> Option<ProducedType> {
        let resolved = if node.is_inferred() {
            None
        } else {
            Some(self.resolve_type(node))
        };
        let ty = self.declared_type(declaration).or(resolved);
        self.analysis
            .record_type(node.id, ty.clone().unwrap_or(ProducedType::Unknown));
        ty
    }

    // --- type declarations ------------------------------------------------

    pub(super) fn check_class(
        &mut self,
        statement: &Statement,
        class: &ClassDefinition,
    ) -> TypecheckResult<()> {
        let declaration = class.declaration;
        self.context.enter_scope(declaration);
        if let Some(parameters) = &class.parameters {
            self.check_parameter_list(declaration, parameters)?;
        }
        if let Some(extended) = &class.extended_type {
            self.check_extended_type(extended)?;
        }
        for satisfied in &class.satisfied_types {
            self.resolve_type(satisfied);
        }
        self.check_type_declaration(declaration, statement);
        self.check_body(ReturnScope::Void, &class.body)?;
        self.context.exit_scope();
        Ok(())
    }

    pub(super) fn check_interface(
        &mut self,
        statement: &Statement,
        interface: &InterfaceDefinition,
    ) -> TypecheckResult<()> {
        let declaration = interface.declaration;
        self.context.enter_scope(declaration);
        for satisfied in &interface.satisfied_types {
            self.resolve_type(satisfied);
        }
        self.check_type_declaration(declaration, statement);
        self.check_block(&interface.body)?;
        self.context.exit_scope();
        Ok(())
    }

    pub(super) fn check_object(
        &mut self,
        statement: &Statement,
        object: &ObjectDefinition,
    ) -> TypecheckResult<()> {
        self.context.enter_scope(object.class);
        if let Some(extended) = &object.extended_type {
            self.check_extended_type(extended)?;
        }
        for satisfied in &object.satisfied_types {
            self.resolve_type(satisfied);
        }
        self.check_type_declaration(object.class, statement);
        self.check_body(ReturnScope::Void, &object.body)?;
        self.context.exit_scope();
        self.check_declaration_visibility(statement, object.declaration);
        Ok(())
    }

    /// `extends Base(args)` invokes the superclass initializer
    fn check_extended_type(&mut self, extended: &ExtendedType) -> TypecheckResult<()> {
        let ty = self.resolve_type(&extended.type_);
        self.check_arguments(&extended.arguments)?;
        let Some(superclass) = ty.declaration() else {
            return Ok(());
        };
        if !self.model[superclass].is_class() {
            return Ok(());
        }
        let reference = self
            .model
            .produced_reference(superclass, None, ty.arguments().to_vec());
        let parameters = self.model[superclass]
            .parameter_lists()
            .first()
            .cloned()
            .unwrap_or_else(ParameterList::default);
        self.analysis.record_target(extended.id, reference.clone());
        self.check_argument_list(&reference, &parameters, &extended.arguments);
        Ok(())
    }

    /// Self-type constraints, incompatible duplicate supertypes and
    /// supertype visibility
    fn check_type_declaration(&mut self, declaration: DeclId, statement: &Statement) {
        let supertypes: Vec<ProducedType> = self.model[declaration]
            .declared_supertypes()
            .cloned()
            .collect();
        for supertype in &supertypes {
            self.check_self_types(declaration, supertype, statement);
            if self.config.check_visibility
                && !self.model.is_completely_visible(declaration, supertype)
            {
                let message = format!(
                    "supertype of type is not visible everywhere type is visible: {}",
                    self.display(supertype)
                );
                self.error(statement.id, statement.span, DiagnosticKind::Visibility, message);
            }
        }

        let own_type = self.model.type_of(declaration);
        let all = self.engine.query().all_supertypes(&own_type);
        for (index, first) in all.iter().enumerate() {
            for second in &all[index + 1..] {
                if first.declaration() == second.declaration()
                    && !first.is_exactly(second)
                    && !self.is_subtype(first, second)
                    && !self.is_subtype(second, first)
                {
                    let message = format!(
                        "type {} has the same supertype twice with incompatible type arguments: {} and {}",
                        self.name(declaration),
                        self.display(first),
                        self.display(second)
                    );
                    self.error(statement.id, statement.span, DiagnosticKind::Malformed, message);
                }
            }
        }
    }

    fn check_self_types(&mut self, declaration: DeclId, supertype: &ProducedType, statement: &Statement) {
        let Some(generic) = supertype.declaration() else {
            return;
        };
        if self.model[declaration].is_type_parameter() {
            return;
        }
        let own_type = self.model.type_of(declaration);
        let parameters = self.model[generic].type_parameters().to_vec();
        for (parameter, argument) in parameters.iter().zip(supertype.arguments()) {
            if !self.model[*parameter].is_self_type() {
                continue;
            }
            let satisfied = self
                .engine
                .query()
                .is_subtype_within(&own_type, argument, Some(&own_type));
            if !satisfied {
                let message = format!(
                    "does not satisfy self type constraint on type parameter: {} of {} since {} is not {}",
                    self.name(*parameter),
                    self.name(generic),
                    self.display(&own_type),
                    self.display(argument)
                );
                self.error(statement.id, statement.span, DiagnosticKind::BoundViolation, message);
            }
        }
    }

    // --- typed declarations -----------------------------------------------

    pub(super) fn check_attribute(
        &mut self,
        statement: &Statement,
        attribute: &AttributeDeclaration,
    ) -> TypecheckResult<()> {
        let declaration = attribute.declaration;
        self.resolve_declaration_type(&attribute.type_, declaration);
        if let Some(specifier) = &attribute.specifier {
            let ty = self.check_expression(specifier)?;
            if attribute.type_.is_inferred() && !ty.is_unknown() {
                self.engine.infer(declaration, ty.clone());
            }
            let expected = self.declared_type(declaration);
            self.check_assignable_to(expected.as_ref(), &ty, specifier.id, specifier.span);
            if let Some(expected) = expected {
                self.analysis.record_type(attribute.type_.id, expected);
            }
        }
        self.check_hidden_attribute(statement, declaration);
        self.check_declaration_visibility(statement, declaration);
        Ok(())
    }

    pub(super) fn check_getter(
        &mut self,
        statement: &Statement,
        getter: &GetterDefinition,
    ) -> TypecheckResult<()> {
        let declaration = getter.declaration;
        let declared = self.resolve_declaration_type(&getter.type_, declaration);
        let scope = if getter.type_.is_inferred() {
            ReturnScope::Inferred(ProducedType::Bottom)
        } else {
            ReturnScope::Declared(declared.unwrap_or(ProducedType::Unknown))
        };
        self.check_member_body(declaration, scope, &getter.body)?;
        self.check_declaration_visibility(statement, declaration);
        Ok(())
    }

    pub(super) fn check_setter(&mut self, setter: &SetterDefinition) -> TypecheckResult<()> {
        self.check_member_body(setter.declaration, ReturnScope::Void, &setter.body)
    }

    pub(super) fn check_method(
        &mut self,
        statement: &Statement,
        method: &MethodDefinition,
    ) -> TypecheckResult<()> {
        let declaration = method.declaration;
        let declared = self.resolve_declaration_type(&method.type_, declaration);
        let scope = match &method.type_.kind {
            TypeNodeKind::Void => ReturnScope::Void,
            TypeNodeKind::Function | TypeNodeKind::Value => {
                ReturnScope::Inferred(ProducedType::Bottom)
            }
            _ => ReturnScope::Declared(declared.unwrap_or(ProducedType::Unknown)),
        };
        self.context.enter_scope(declaration);
        for list in &method.parameter_lists {
            self.check_parameter_list(declaration, list)?;
        }
        self.context.exit_scope();
        self.check_member_body(declaration, scope, &method.body)?;
        self.check_declaration_visibility(statement, declaration);
        Ok(())
    }

    pub(super) fn check_method_declaration(
        &mut self,
        statement: &Statement,
        method: &MethodDeclaration,
    ) -> TypecheckResult<()> {
        let declaration = method.declaration;
        self.resolve_declaration_type(&method.type_, declaration);
        self.context.enter_scope(declaration);
        for list in &method.parameter_lists {
            self.check_parameter_list(declaration, list)?;
        }
        if let Some(specifier) = &method.specifier {
            let ty = self.check_expression(specifier)?;
            if method.type_.is_inferred() && !ty.is_unknown() {
                self.engine.infer(declaration, ty.clone());
            }
            let expected = self.declared_type(declaration);
            self.check_assignable_to(expected.as_ref(), &ty, specifier.id, specifier.span);
        }
        self.context.exit_scope();
        self.check_declaration_visibility(statement, declaration);
        Ok(())
    }

    /// Check a body in the scope of `declaration`; an inferred return type
    /// is written to the declaration once the body is done
    pub(super) fn check_member_body(
        &mut self,
        declaration: DeclId,
        scope: ReturnScope,
        body: &Block,
    ) -> TypecheckResult<()> {
        self.context.enter_scope(declaration);
        let finished = self.check_body(scope, body)?;
        self.context.exit_scope();
        if let Some(ReturnScope::Inferred(ty)) = finished {
            self.engine.infer(declaration, ty);
        }
        Ok(())
    }

    fn check_body(&mut self, scope: ReturnScope, body: &Block) -> TypecheckResult<Option<ReturnScope>> {
        self.context.enter_return_scope(scope);
        let result = self.check_block(body);
        let finished = self.context.exit_return_scope();
        result.map(|_| finished)
    }

    fn check_parameter_list(
        &mut self,
        functional: DeclId,
        list: &ParameterListNode,
    ) -> TypecheckResult<()> {
        for parameter in &list.parameters {
            let declared = self.resolve_declaration_type(&parameter.type_, parameter.declaration);
            if let Some(default) = &parameter.default {
                let ty = self.check_expression(default)?;
                self.check_assignable_to(declared.as_ref(), &ty, default.id, default.span);
                let optional = declared
                    .as_ref()
                    .is_some_and(|declared| !declared.is_unknown() && self.engine.is_optional(declared));
                if optional && !self.is_null_reference(default) {
                    self.error_on(
                        default,
                        DiagnosticKind::Assignability,
                        "defaulted parameters of optional type must have the default value null",
                    );
                }
            }
            if let Some(declared) = &declared {
                if self.config.check_visibility
                    && !self.model.is_completely_visible(functional, declared)
                {
                    let message = format!(
                        "type of parameter is not visible everywhere declaration is visible: {}",
                        self.name(parameter.declaration)
                    );
                    self.error(
                        parameter.type_.id,
                        parameter.type_.span,
                        DiagnosticKind::Visibility,
                        message,
                    );
                }
            }
        }
        Ok(())
    }

    fn is_null_reference(&self, expression: &Expression) -> bool {
        matches!(expression.kind, ExpressionKind::BaseMember(_))
            && self
                .analysis
                .target(expression.id)
                .is_some_and(|target| target.declaration == self.lang.null)
    }

    /// A class attribute named like one of the class's parameters must be
    /// a plain copy of it
    fn check_hidden_attribute(&mut self, statement: &Statement, attribute: DeclId) {
        let model = self.model;
        let Some(class) = model[attribute].container() else {
            return;
        };
        if !model[class].is_class() {
            return;
        }
        let name = model[attribute].name();
        let Some(parameter) = model[class]
            .parameter_lists()
            .iter()
            .flat_map(|list| list.parameters.iter().copied())
            .find(|parameter| model[*parameter].name() == name)
        else {
            return;
        };
        if model[attribute].variable {
            let message = format!("member hidden by parameter may not be variable: {name}");
            self.error(statement.id, statement.span, DiagnosticKind::Malformed, message);
        }
        if let (Some(attribute_type), Some(parameter_type)) =
            (self.declared_type(attribute), self.declared_type(parameter))
        {
            if !attribute_type.is_exactly(&parameter_type) {
                let message = format!(
                    "member hidden by parameter must have same type as parameter: {name}: {} is not {}",
                    self.display(&attribute_type),
                    self.display(&parameter_type)
                );
                self.error(statement.id, statement.span, DiagnosticKind::Assignability, message);
            }
        }
    }

    fn check_declaration_visibility(&mut self, statement: &Statement, declaration: DeclId) {
        if !self.config.check_visibility {
            return;
        }
        let Some(ty) = self.declared_type(declaration) else {
            return;
        };
        if !self.model.is_completely_visible(declaration, &ty) {
            let message = format!(
                "type of declaration is not visible everywhere declaration is visible: {}",
                self.name(declaration)
            );
            self.error(statement.id, statement.span, DiagnosticKind::Visibility, message);
        }
    }
}
