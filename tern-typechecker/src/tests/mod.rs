//! Scenario tests for the type checker
//!
//! Trees are built by hand with `AstBuilder`. Callees that a test does not
//! define in its unit are added to the model with their types already set,
//! as a previously compiled declaration would be.

mod test_config;
mod test_invocation;
mod test_type_arguments;

use crate::{typecheck_unit, Analysis, CheckerConfig};
use tern_ast::{AstBuilder, Expression, ExpressionKind, NodeId, Statement};
use tern_model::{DeclId, LanguageModule, Model, ParameterInfo, ProducedType, Variance};

pub(crate) struct Fixture {
    pub model: Model,
    pub lang: LanguageModule,
    pub package: DeclId,
    pub ast: AstBuilder,
}

impl Fixture {
    pub fn new() -> Self {
        let mut model = Model::new();
        let lang = LanguageModule::bootstrap(&mut model).unwrap();
        let package = model.add_package("test");
        Self {
            model,
            lang,
            package,
            ast: AstBuilder::new(),
        }
    }

    pub fn natural(&self) -> ProducedType {
        self.lang.type_(self.lang.natural)
    }

    pub fn string(&self) -> ProducedType {
        self.lang.type_(self.lang.string)
    }

    pub fn boolean(&self) -> ProducedType {
        self.lang.boolean_type()
    }

    /// A toplevel value of a known type
    pub fn value(&mut self, name: &str, ty: ProducedType) -> DeclId {
        let value = self.model.add_value(self.package, name).unwrap();
        self.model.set_type(value, ty).unwrap();
        value
    }

    /// A toplevel function with one parameter list of plain parameters
    pub fn function(
        &mut self,
        name: &str,
        returns: ProducedType,
        parameters: &[(&str, ProducedType)],
    ) -> DeclId {
        let function = self.model.add_function(self.package, name).unwrap();
        self.model.set_type(function, returns).unwrap();
        self.model.add_parameter_list(function).unwrap();
        for (parameter, ty) in parameters {
            self.parameter(function, parameter, ty.clone(), ParameterInfo::default());
        }
        function
    }

    pub fn parameter(
        &mut self,
        functional: DeclId,
        name: &str,
        ty: ProducedType,
        info: ParameterInfo,
    ) -> DeclId {
        let parameter = self.model.add_parameter(functional, name, info).unwrap();
        self.model.set_type(parameter, ty).unwrap();
        parameter
    }

    /// `T name<T>(T x)`
    pub fn identity(&mut self, name: &str) -> (DeclId, DeclId) {
        let function = self.model.add_function(self.package, name).unwrap();
        let t = self
            .model
            .add_type_parameter(function, "T", Variance::Invariant)
            .unwrap();
        self.model.set_type(function, ProducedType::simple(t)).unwrap();
        self.parameter(function, "x", ProducedType::simple(t), ParameterInfo::default());
        (function, t)
    }

    /// A toplevel `value name = specifier;` whose type is inferred
    pub fn inferred(&mut self, name: &str, specifier: Expression) -> (DeclId, Statement) {
        let value = self.model.add_value(self.package, name).unwrap();
        let type_ = self.ast.value_modifier();
        let statement = self.ast.attribute(value, type_, Some(specifier));
        (value, statement)
    }

    pub fn check(&mut self, declarations: Vec<Statement>) -> Analysis {
        self.check_with(&CheckerConfig::default(), declarations)
    }

    pub fn check_with(&mut self, config: &CheckerConfig, declarations: Vec<Statement>) -> Analysis {
        let unit = self.ast.unit(self.package, declarations);
        typecheck_unit(&self.model, &self.lang, config, &unit).unwrap()
    }
}

/// Messages of all errors, in report order
pub(crate) fn errors(analysis: &Analysis) -> Vec<String> {
    analysis.errors().map(|d| d.message.clone()).collect()
}

pub(crate) fn errors_on(analysis: &Analysis, node: NodeId) -> Vec<String> {
    analysis
        .diagnostics_for(node)
        .filter(|d| d.is_error())
        .map(|d| d.message.clone())
        .collect()
}

pub(crate) fn warnings(analysis: &Analysis) -> Vec<String> {
    analysis.warnings().map(|d| d.message.clone()).collect()
}

/// The argument list node of an invocation
pub(crate) fn argument_list_id(invocation: &Expression) -> NodeId {
    match &invocation.kind {
        ExpressionKind::Invocation(invocation) => invocation.arguments.id,
        _ => panic!("expected an invocation"),
    }
}

/// The primary node of an invocation
pub(crate) fn primary_id(invocation: &Expression) -> NodeId {
    match &invocation.kind {
        ExpressionKind::Invocation(invocation) => invocation.primary.id,
        _ => panic!("expected an invocation"),
    }
}
