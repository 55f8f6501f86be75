//! Visitor trait for traversing the Tern syntax tree
//!
//! Default methods perform a depth-first walk through the matching
//! `walk_*` function. Passes override the nodes they care about and call
//! the walker themselves to keep descending.

use crate::error::TypecheckError;
use tern_ast::{
    ArgumentList, ArgumentListKind, Block, CatchClause, CompilationUnit, Condition, ConditionKind,
    Expression, ExpressionKind, ExtendedType, ForIteratorKind, IndexKind, NamedArgumentKind,
    ParameterListNode, Statement, StatementKind, TypeNode, Variable,
};
use tern_model::DeclId;

/// Result type for visitor methods that can fail
pub type VisitorResult<T = ()> = Result<T, TypecheckError>;

pub trait Visitor: Sized {
    fn visit_unit(&mut self, unit: &CompilationUnit) -> VisitorResult {
        walk_unit(self, unit)
    }

    fn visit_statement(&mut self, statement: &Statement) -> VisitorResult {
        walk_statement(self, statement)
    }

    fn visit_block(&mut self, block: &Block) -> VisitorResult {
        walk_block(self, block)
    }

    /// The body of a class, or of the anonymous class of an object
    fn visit_class_body(&mut self, _class: DeclId, body: &Block) -> VisitorResult {
        walk_block(self, body)
    }

    fn visit_interface_body(&mut self, _interface: DeclId, body: &Block) -> VisitorResult {
        walk_block(self, body)
    }

    /// The body of a method, getter, setter or attribute argument
    fn visit_member_body(&mut self, _member: DeclId, body: &Block) -> VisitorResult {
        walk_block(self, body)
    }

    fn visit_extended_type(&mut self, extended: &ExtendedType) -> VisitorResult {
        walk_extended_type(self, extended)
    }

    fn visit_parameter_list(&mut self, list: &ParameterListNode) -> VisitorResult {
        walk_parameter_list(self, list)
    }

    /// An expression whose value is stored: an attribute specifier, a
    /// parameter default, or the right-hand side of a specifier statement
    fn visit_specifier(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)
    }

    /// An expression read to bind a condition or iterator variable
    fn visit_source(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)
    }

    /// A value yielded by a return statement or a method's `=>` specifier
    fn visit_return(&mut self, expression: &Expression) -> VisitorResult {
        self.visit_expression(expression)
    }

    fn visit_condition(&mut self, condition: &Condition) -> VisitorResult {
        walk_condition(self, condition)
    }

    fn visit_variable(&mut self, variable: &Variable) -> VisitorResult {
        self.visit_type(&variable.type_)
    }

    fn visit_catch_clause(&mut self, clause: &CatchClause) -> VisitorResult {
        self.visit_variable(&clause.variable)?;
        self.visit_block(&clause.block)
    }

    fn visit_expression(&mut self, expression: &Expression) -> VisitorResult {
        walk_expression(self, expression)
    }

    fn visit_argument_list(&mut self, arguments: &ArgumentList) -> VisitorResult {
        walk_argument_list(self, arguments)
    }

    /// One positional, named or sequenced argument value
    fn visit_argument(&mut self, argument: &Expression) -> VisitorResult {
        self.visit_expression(argument)
    }

    fn visit_type(&mut self, _type_node: &TypeNode) -> VisitorResult {
        // Leaf: type nodes hold no expressions
        Ok(())
    }
}

pub fn walk_unit<V: Visitor>(visitor: &mut V, unit: &CompilationUnit) -> VisitorResult {
    for statement in &unit.declarations {
        visitor.visit_statement(statement)?;
    }
    Ok(())
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) -> VisitorResult {
    for statement in &block.statements {
        visitor.visit_statement(statement)?;
    }
    Ok(())
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, statement: &Statement) -> VisitorResult {
    match &statement.kind {
        StatementKind::ClassDefinition(class) => {
            if let Some(parameters) = &class.parameters {
                visitor.visit_parameter_list(parameters)?;
            }
            if let Some(extended) = &class.extended_type {
                visitor.visit_extended_type(extended)?;
            }
            for satisfied in &class.satisfied_types {
                visitor.visit_type(satisfied)?;
            }
            visitor.visit_class_body(class.declaration, &class.body)
        }
        StatementKind::InterfaceDefinition(interface) => {
            for satisfied in &interface.satisfied_types {
                visitor.visit_type(satisfied)?;
            }
            visitor.visit_interface_body(interface.declaration, &interface.body)
        }
        StatementKind::ObjectDefinition(object) => {
            if let Some(extended) = &object.extended_type {
                visitor.visit_extended_type(extended)?;
            }
            for satisfied in &object.satisfied_types {
                visitor.visit_type(satisfied)?;
            }
            visitor.visit_class_body(object.class, &object.body)
        }
        StatementKind::AttributeDeclaration(attribute) => {
            visitor.visit_type(&attribute.type_)?;
            if let Some(specifier) = &attribute.specifier {
                visitor.visit_specifier(specifier)?;
            }
            Ok(())
        }
        StatementKind::AttributeGetter(getter) => {
            visitor.visit_type(&getter.type_)?;
            visitor.visit_member_body(getter.declaration, &getter.body)
        }
        StatementKind::AttributeSetter(setter) => {
            visitor.visit_member_body(setter.declaration, &setter.body)
        }
        StatementKind::MethodDefinition(method) => {
            visitor.visit_type(&method.type_)?;
            for list in &method.parameter_lists {
                visitor.visit_parameter_list(list)?;
            }
            visitor.visit_member_body(method.declaration, &method.body)
        }
        StatementKind::MethodDeclaration(method) => {
            visitor.visit_type(&method.type_)?;
            for list in &method.parameter_lists {
                visitor.visit_parameter_list(list)?;
            }
            if let Some(specifier) = &method.specifier {
                visitor.visit_return(specifier)?;
            }
            Ok(())
        }
        StatementKind::Expression(expression) => visitor.visit_expression(expression),
        StatementKind::Specifier(specifier) => {
            visitor.visit_expression(&specifier.target)?;
            visitor.visit_specifier(&specifier.specifier)
        }
        StatementKind::Return(ret) => match &ret.expression {
            Some(expression) => visitor.visit_return(expression),
            None => Ok(()),
        },
        StatementKind::If(if_statement) => {
            visitor.visit_condition(&if_statement.condition)?;
            visitor.visit_block(&if_statement.then_block)?;
            if let Some(else_block) = &if_statement.else_block {
                visitor.visit_block(else_block)?;
            }
            Ok(())
        }
        StatementKind::While(while_statement) => {
            visitor.visit_condition(&while_statement.condition)?;
            visitor.visit_block(&while_statement.body)
        }
        StatementKind::For(for_statement) => {
            match &for_statement.iterator.kind {
                ForIteratorKind::Value { variable, source } => {
                    visitor.visit_variable(variable)?;
                    visitor.visit_source(source)?;
                }
                ForIteratorKind::KeyValue { key, value, source } => {
                    visitor.visit_variable(key)?;
                    visitor.visit_variable(value)?;
                    visitor.visit_source(source)?;
                }
            }
            visitor.visit_block(&for_statement.body)?;
            if let Some(fail_block) = &for_statement.fail_block {
                visitor.visit_block(fail_block)?;
            }
            Ok(())
        }
        StatementKind::TryCatch(try_catch) => {
            visitor.visit_block(&try_catch.try_block)?;
            for clause in &try_catch.catch_clauses {
                visitor.visit_catch_clause(clause)?;
            }
            if let Some(finally_block) = &try_catch.finally_block {
                visitor.visit_block(finally_block)?;
            }
            Ok(())
        }
    }
}

pub fn walk_extended_type<V: Visitor>(visitor: &mut V, extended: &ExtendedType) -> VisitorResult {
    visitor.visit_type(&extended.type_)?;
    visitor.visit_argument_list(&extended.arguments)
}

pub fn walk_parameter_list<V: Visitor>(
    visitor: &mut V,
    list: &ParameterListNode,
) -> VisitorResult {
    for parameter in &list.parameters {
        visitor.visit_type(&parameter.type_)?;
        if let Some(default) = &parameter.default {
            visitor.visit_specifier(default)?;
        }
    }
    Ok(())
}

pub fn walk_condition<V: Visitor>(visitor: &mut V, condition: &Condition) -> VisitorResult {
    match &condition.kind {
        ConditionKind::Boolean(expression) => visitor.visit_expression(expression),
        ConditionKind::Exists {
            variable,
            specifier,
        }
        | ConditionKind::Nonempty {
            variable,
            specifier,
        } => {
            visitor.visit_variable(variable)?;
            visitor.visit_source(specifier)
        }
        ConditionKind::Is {
            type_,
            variable,
            specifier,
        } => {
            visitor.visit_type(type_)?;
            visitor.visit_variable(variable)?;
            visitor.visit_source(specifier)
        }
        ConditionKind::Satisfies { type_, satisfied } => {
            visitor.visit_type(type_)?;
            visitor.visit_type(satisfied)
        }
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expression: &Expression) -> VisitorResult {
    match &expression.kind {
        ExpressionKind::NaturalLiteral(_)
        | ExpressionKind::FloatLiteral(_)
        | ExpressionKind::CharacterLiteral(_)
        | ExpressionKind::StringLiteral(_)
        | ExpressionKind::QuotedLiteral(_)
        | ExpressionKind::This
        | ExpressionKind::Super
        | ExpressionKind::Outer => Ok(()),
        ExpressionKind::BaseMember(reference) | ExpressionKind::BaseType(reference) => {
            if let Some(arguments) = &reference.type_arguments {
                for argument in arguments {
                    visitor.visit_type(argument)?;
                }
            }
            Ok(())
        }
        ExpressionKind::QualifiedMember(reference) | ExpressionKind::QualifiedType(reference) => {
            visitor.visit_expression(&reference.primary)?;
            if let Some(arguments) = &reference.type_arguments {
                for argument in arguments {
                    visitor.visit_type(argument)?;
                }
            }
            Ok(())
        }
        ExpressionKind::StringTemplate(parts) | ExpressionKind::SequenceEnumeration(parts) => {
            for part in parts {
                visitor.visit_expression(part)?;
            }
            Ok(())
        }
        ExpressionKind::Invocation(invocation) => {
            visitor.visit_expression(&invocation.primary)?;
            visitor.visit_argument_list(&invocation.arguments)
        }
        ExpressionKind::Binary(operation) => {
            visitor.visit_expression(&operation.left)?;
            visitor.visit_expression(&operation.right)
        }
        ExpressionKind::Unary(operation) => visitor.visit_expression(&operation.operand),
        ExpressionKind::Postfix(operation) | ExpressionKind::Prefix(operation) => {
            visitor.visit_expression(&operation.operand)
        }
        ExpressionKind::IsOperation(operation)
        | ExpressionKind::Extends(operation)
        | ExpressionKind::Satisfies(operation) => {
            visitor.visit_expression(&operation.operand)?;
            visitor.visit_type(&operation.type_)
        }
        ExpressionKind::Index(index) => {
            visitor.visit_expression(&index.primary)?;
            match &index.index {
                IndexKind::Element(element) => visitor.visit_expression(element),
                IndexKind::Range { lower, upper } => {
                    visitor.visit_expression(lower)?;
                    if let Some(upper) = upper {
                        visitor.visit_expression(upper)?;
                    }
                    Ok(())
                }
            }
        }
        ExpressionKind::Parenthesized(inner) => visitor.visit_expression(inner),
    }
}

pub fn walk_argument_list<V: Visitor>(visitor: &mut V, arguments: &ArgumentList) -> VisitorResult {
    match &arguments.kind {
        ArgumentListKind::Positional { arguments, .. } => {
            for argument in arguments {
                visitor.visit_argument(argument)?;
            }
        }
        ArgumentListKind::Named {
            arguments,
            sequenced,
        } => {
            for argument in arguments {
                match &argument.kind {
                    NamedArgumentKind::Specified(value) => visitor.visit_argument(value)?,
                    NamedArgumentKind::Attribute {
                        declaration,
                        type_,
                        body,
                    } => {
                        visitor.visit_type(type_)?;
                        visitor.visit_member_body(*declaration, body)?;
                    }
                }
            }
            if let Some(sequenced) = sequenced {
                for expression in &sequenced.expressions {
                    visitor.visit_argument(expression)?;
                }
            }
        }
    }
    Ok(())
}
