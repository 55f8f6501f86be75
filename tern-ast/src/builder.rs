//! Programmatic tree construction
//!
//! [`AstBuilder`] hands out node ids and synthetic, strictly increasing spans
//! so trees can be assembled without a parser.

use crate::ast::*;
use tern_model::DeclId;

#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
    offset: usize,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn span(&mut self) -> Span {
        let start = self.offset;
        self.offset += 1;
        Span::new(start, self.offset)
    }

    pub fn unit(&mut self, package: DeclId, declarations: Vec<Statement>) -> CompilationUnit {
        CompilationUnit {
            id: self.id(),
            package,
            declarations,
            span: self.span(),
        }
    }

    // --- types ------------------------------------------------------------

    fn type_node(&mut self, kind: TypeNodeKind) -> TypeNode {
        TypeNode {
            id: self.id(),
            kind,
            span: self.span(),
        }
    }

    pub fn simple_type(&mut self, declaration: DeclId) -> TypeNode {
        self.generic_type(declaration, Vec::new())
    }

    pub fn generic_type(&mut self, declaration: DeclId, arguments: Vec<TypeNode>) -> TypeNode {
        self.type_node(TypeNodeKind::Simple {
            declaration,
            arguments,
        })
    }

    pub fn union_type(&mut self, cases: Vec<TypeNode>) -> TypeNode {
        self.type_node(TypeNodeKind::Union(cases))
    }

    pub fn intersection_type(&mut self, members: Vec<TypeNode>) -> TypeNode {
        self.type_node(TypeNodeKind::Intersection(members))
    }

    pub fn optional_type(&mut self, inner: TypeNode) -> TypeNode {
        self.type_node(TypeNodeKind::Optional(Box::new(inner)))
    }

    pub fn sequenced_type(&mut self, element: TypeNode) -> TypeNode {
        self.type_node(TypeNodeKind::Sequenced(Box::new(element)))
    }

    pub fn value_modifier(&mut self) -> TypeNode {
        self.type_node(TypeNodeKind::Value)
    }

    pub fn function_modifier(&mut self) -> TypeNode {
        self.type_node(TypeNodeKind::Function)
    }

    pub fn void_modifier(&mut self) -> TypeNode {
        self.type_node(TypeNodeKind::Void)
    }

    pub fn synthetic_type(&mut self) -> TypeNode {
        self.type_node(TypeNodeKind::Synthetic)
    }

    // --- statements ---------------------------------------------------------

    pub fn statement(&mut self, kind: StatementKind) -> Statement {
        Statement {
            id: self.id(),
            kind,
            span: self.span(),
        }
    }

    pub fn block(&mut self, statements: Vec<Statement>) -> Block {
        Block {
            id: self.id(),
            statements,
            span: self.span(),
        }
    }

    pub fn parameter(
        &mut self,
        declaration: DeclId,
        type_: TypeNode,
        default: Option<Expression>,
    ) -> ParameterNode {
        ParameterNode {
            id: self.id(),
            declaration,
            type_,
            default,
            span: self.span(),
        }
    }

    pub fn parameter_list(&mut self, parameters: Vec<ParameterNode>) -> ParameterListNode {
        ParameterListNode {
            id: self.id(),
            parameters,
            span: self.span(),
        }
    }

    pub fn extended_type(&mut self, type_: TypeNode, arguments: Vec<Expression>) -> ExtendedType {
        let arguments = self.positional_arguments(arguments, false);
        ExtendedType {
            id: self.id(),
            type_,
            arguments,
            span: self.span(),
        }
    }

    pub fn class(
        &mut self,
        declaration: DeclId,
        parameters: Option<ParameterListNode>,
        extended_type: Option<ExtendedType>,
        satisfied_types: Vec<TypeNode>,
        body: Vec<Statement>,
    ) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::ClassDefinition(ClassDefinition {
            declaration,
            parameters,
            extended_type,
            satisfied_types,
            body,
        }))
    }

    pub fn interface(
        &mut self,
        declaration: DeclId,
        satisfied_types: Vec<TypeNode>,
        body: Vec<Statement>,
    ) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::InterfaceDefinition(InterfaceDefinition {
            declaration,
            satisfied_types,
            body,
        }))
    }

    pub fn object(
        &mut self,
        declaration: DeclId,
        class: DeclId,
        extended_type: Option<ExtendedType>,
        body: Vec<Statement>,
    ) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::ObjectDefinition(ObjectDefinition {
            declaration,
            class,
            extended_type,
            satisfied_types: Vec::new(),
            body,
        }))
    }

    pub fn attribute(
        &mut self,
        declaration: DeclId,
        type_: TypeNode,
        specifier: Option<Expression>,
    ) -> Statement {
        self.statement(StatementKind::AttributeDeclaration(AttributeDeclaration {
            declaration,
            type_,
            specifier,
        }))
    }

    pub fn getter(&mut self, declaration: DeclId, type_: TypeNode, body: Vec<Statement>) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::AttributeGetter(GetterDefinition {
            declaration,
            type_,
            body,
        }))
    }

    pub fn setter(&mut self, declaration: DeclId, body: Vec<Statement>) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::AttributeSetter(SetterDefinition { declaration, body }))
    }

    pub fn method(
        &mut self,
        declaration: DeclId,
        type_: TypeNode,
        parameter_lists: Vec<ParameterListNode>,
        body: Vec<Statement>,
    ) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::MethodDefinition(MethodDefinition {
            declaration,
            type_,
            parameter_lists,
            body,
        }))
    }

    pub fn method_declaration(
        &mut self,
        declaration: DeclId,
        type_: TypeNode,
        parameter_lists: Vec<ParameterListNode>,
        specifier: Option<Expression>,
    ) -> Statement {
        self.statement(StatementKind::MethodDeclaration(MethodDeclaration {
            declaration,
            type_,
            parameter_lists,
            specifier,
        }))
    }

    pub fn expression_statement(&mut self, expression: Expression) -> Statement {
        self.statement(StatementKind::Expression(expression))
    }

    pub fn specify(&mut self, target: Expression, specifier: Expression) -> Statement {
        self.statement(StatementKind::Specifier(SpecifierStatement { target, specifier }))
    }

    pub fn return_(&mut self, expression: Option<Expression>) -> Statement {
        self.statement(StatementKind::Return(Return { expression }))
    }

    pub fn if_(
        &mut self,
        condition: Condition,
        then_block: Vec<Statement>,
        else_block: Option<Vec<Statement>>,
    ) -> Statement {
        let then_block = self.block(then_block);
        let else_block = else_block.map(|statements| self.block(statements));
        self.statement(StatementKind::If(IfStatement {
            condition,
            then_block,
            else_block,
        }))
    }

    pub fn while_(&mut self, condition: Condition, body: Vec<Statement>) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::While(WhileStatement { condition, body }))
    }

    pub fn for_value(
        &mut self,
        variable: Variable,
        source: Expression,
        body: Vec<Statement>,
    ) -> Statement {
        let iterator = ForIterator {
            id: self.id(),
            kind: ForIteratorKind::Value { variable, source },
            span: self.span(),
        };
        self.for_statement(iterator, body)
    }

    pub fn for_key_value(
        &mut self,
        key: Variable,
        value: Variable,
        source: Expression,
        body: Vec<Statement>,
    ) -> Statement {
        let iterator = ForIterator {
            id: self.id(),
            kind: ForIteratorKind::KeyValue { key, value, source },
            span: self.span(),
        };
        self.for_statement(iterator, body)
    }

    fn for_statement(&mut self, iterator: ForIterator, body: Vec<Statement>) -> Statement {
        let body = self.block(body);
        self.statement(StatementKind::For(ForStatement {
            iterator,
            body,
            fail_block: None,
        }))
    }

    pub fn catch(&mut self, variable: Variable, body: Vec<Statement>) -> CatchClause {
        let block = self.block(body);
        CatchClause {
            id: self.id(),
            variable,
            block,
            span: self.span(),
        }
    }

    pub fn try_catch(&mut self, body: Vec<Statement>, catch_clauses: Vec<CatchClause>) -> Statement {
        let try_block = self.block(body);
        self.statement(StatementKind::TryCatch(TryCatchStatement {
            try_block,
            catch_clauses,
            finally_block: None,
        }))
    }

    pub fn variable(&mut self, declaration: DeclId, type_: TypeNode) -> Variable {
        Variable {
            id: self.id(),
            declaration,
            type_,
            span: self.span(),
        }
    }

    // --- conditions ---------------------------------------------------------

    fn condition(&mut self, kind: ConditionKind) -> Condition {
        Condition {
            id: self.id(),
            kind,
            span: self.span(),
        }
    }

    pub fn boolean_condition(&mut self, expression: Expression) -> Condition {
        self.condition(ConditionKind::Boolean(expression))
    }

    pub fn exists(&mut self, variable: Variable, specifier: Expression) -> Condition {
        self.condition(ConditionKind::Exists {
            variable,
            specifier,
        })
    }

    pub fn nonempty(&mut self, variable: Variable, specifier: Expression) -> Condition {
        self.condition(ConditionKind::Nonempty {
            variable,
            specifier,
        })
    }

    pub fn is_condition(
        &mut self,
        type_: TypeNode,
        variable: Variable,
        specifier: Expression,
    ) -> Condition {
        self.condition(ConditionKind::Is {
            type_,
            variable,
            specifier,
        })
    }

    pub fn satisfies_condition(&mut self, type_: TypeNode, satisfied: TypeNode) -> Condition {
        self.condition(ConditionKind::Satisfies { type_, satisfied })
    }

    // --- expressions --------------------------------------------------------

    pub fn expression(&mut self, kind: ExpressionKind) -> Expression {
        Expression {
            id: self.id(),
            kind,
            span: self.span(),
        }
    }

    pub fn natural(&mut self, value: u64) -> Expression {
        self.expression(ExpressionKind::NaturalLiteral(value))
    }

    pub fn float(&mut self, value: f64) -> Expression {
        self.expression(ExpressionKind::FloatLiteral(value))
    }

    pub fn character(&mut self, value: char) -> Expression {
        self.expression(ExpressionKind::CharacterLiteral(value))
    }

    pub fn string(&mut self, value: &str) -> Expression {
        self.expression(ExpressionKind::StringLiteral(value.to_string()))
    }

    pub fn quoted(&mut self, value: &str) -> Expression {
        self.expression(ExpressionKind::QuotedLiteral(value.to_string()))
    }

    pub fn template(&mut self, parts: Vec<Expression>) -> Expression {
        self.expression(ExpressionKind::StringTemplate(parts))
    }

    /// An unresolved base member reference, looked up by name
    pub fn base(&mut self, name: &str) -> Expression {
        self.expression(ExpressionKind::BaseMember(BaseReference {
            name: name.to_string(),
            declaration: None,
            type_arguments: None,
        }))
    }

    /// A base member reference already resolved to `declaration`
    pub fn resolved(&mut self, name: &str, declaration: DeclId) -> Expression {
        self.expression(ExpressionKind::BaseMember(BaseReference {
            name: name.to_string(),
            declaration: Some(declaration),
            type_arguments: None,
        }))
    }

    pub fn base_with_type_arguments(&mut self, name: &str, type_arguments: Vec<TypeNode>) -> Expression {
        self.expression(ExpressionKind::BaseMember(BaseReference {
            name: name.to_string(),
            declaration: None,
            type_arguments: Some(type_arguments),
        }))
    }

    pub fn base_type(&mut self, name: &str) -> Expression {
        self.expression(ExpressionKind::BaseType(BaseReference {
            name: name.to_string(),
            declaration: None,
            type_arguments: None,
        }))
    }

    pub fn base_type_with_arguments(&mut self, name: &str, type_arguments: Vec<TypeNode>) -> Expression {
        self.expression(ExpressionKind::BaseType(BaseReference {
            name: name.to_string(),
            declaration: None,
            type_arguments: Some(type_arguments),
        }))
    }

    fn qualified(&mut self, primary: Expression, operator: MemberOperator, name: &str) -> Expression {
        self.expression(ExpressionKind::QualifiedMember(QualifiedReference {
            primary: Box::new(primary),
            operator,
            name: name.to_string(),
            type_arguments: None,
        }))
    }

    pub fn member(&mut self, primary: Expression, name: &str) -> Expression {
        self.qualified(primary, MemberOperator::Member, name)
    }

    pub fn safe_member(&mut self, primary: Expression, name: &str) -> Expression {
        self.qualified(primary, MemberOperator::Safe, name)
    }

    pub fn spread_member(&mut self, primary: Expression, name: &str) -> Expression {
        self.qualified(primary, MemberOperator::Spread, name)
    }

    pub fn qualified_type(&mut self, primary: Expression, name: &str) -> Expression {
        self.expression(ExpressionKind::QualifiedType(QualifiedReference {
            primary: Box::new(primary),
            operator: MemberOperator::Member,
            name: name.to_string(),
            type_arguments: None,
        }))
    }

    pub fn this(&mut self) -> Expression {
        self.expression(ExpressionKind::This)
    }

    pub fn super_(&mut self) -> Expression {
        self.expression(ExpressionKind::Super)
    }

    pub fn outer(&mut self) -> Expression {
        self.expression(ExpressionKind::Outer)
    }

    pub fn positional_arguments(&mut self, arguments: Vec<Expression>, spread: bool) -> ArgumentList {
        let ellipsis = spread.then(|| Ellipsis {
            id: self.id(),
            span: self.span(),
        });
        ArgumentList {
            id: self.id(),
            kind: ArgumentListKind::Positional {
                arguments,
                ellipsis,
            },
            span: self.span(),
        }
    }

    pub fn invoke(&mut self, primary: Expression, arguments: Vec<Expression>) -> Expression {
        let arguments = self.positional_arguments(arguments, false);
        self.invocation(primary, arguments)
    }

    /// Positional invocation whose last argument is spread with `...`
    pub fn invoke_spread(&mut self, primary: Expression, arguments: Vec<Expression>) -> Expression {
        let arguments = self.positional_arguments(arguments, true);
        self.invocation(primary, arguments)
    }

    pub fn invoke_named(
        &mut self,
        primary: Expression,
        arguments: Vec<NamedArgument>,
        sequenced: Option<Vec<Expression>>,
    ) -> Expression {
        let sequenced = sequenced.map(|expressions| SequencedArgument {
            id: self.id(),
            expressions,
            span: self.span(),
        });
        let arguments = ArgumentList {
            id: self.id(),
            kind: ArgumentListKind::Named {
                arguments,
                sequenced,
            },
            span: self.span(),
        };
        self.invocation(primary, arguments)
    }

    pub fn invocation(&mut self, primary: Expression, arguments: ArgumentList) -> Expression {
        self.expression(ExpressionKind::Invocation(InvocationExpression {
            primary: Box::new(primary),
            arguments,
        }))
    }

    pub fn named(&mut self, name: &str, value: Expression) -> NamedArgument {
        NamedArgument {
            id: self.id(),
            name: name.to_string(),
            kind: NamedArgumentKind::Specified(value),
            span: self.span(),
        }
    }

    pub fn named_attribute(
        &mut self,
        name: &str,
        declaration: DeclId,
        type_: TypeNode,
        body: Vec<Statement>,
    ) -> NamedArgument {
        let body = self.block(body);
        NamedArgument {
            id: self.id(),
            name: name.to_string(),
            kind: NamedArgumentKind::Attribute {
                declaration,
                type_,
                body,
            },
            span: self.span(),
        }
    }

    pub fn binary(&mut self, left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
        self.expression(ExpressionKind::Binary(BinaryOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    pub fn assign(&mut self, left: Expression, right: Expression) -> Expression {
        self.binary(left, BinaryOperator::Assign, right)
    }

    pub fn unary(&mut self, operator: UnaryOperator, operand: Expression) -> Expression {
        self.expression(ExpressionKind::Unary(UnaryOperation {
            operator,
            operand: Box::new(operand),
        }))
    }

    pub fn postfix(&mut self, operator: IncrementOperator, operand: Expression) -> Expression {
        self.expression(ExpressionKind::Postfix(IncrementOperation {
            operator,
            operand: Box::new(operand),
        }))
    }

    pub fn prefix(&mut self, operator: IncrementOperator, operand: Expression) -> Expression {
        self.expression(ExpressionKind::Prefix(IncrementOperation {
            operator,
            operand: Box::new(operand),
        }))
    }

    pub fn is_op(&mut self, operand: Expression, type_: TypeNode) -> Expression {
        self.expression(ExpressionKind::IsOperation(TypeOperation {
            operand: Box::new(operand),
            type_,
        }))
    }

    pub fn extends_op(&mut self, operand: Expression, type_: TypeNode) -> Expression {
        self.expression(ExpressionKind::Extends(TypeOperation {
            operand: Box::new(operand),
            type_,
        }))
    }

    pub fn satisfies_op(&mut self, operand: Expression, type_: TypeNode) -> Expression {
        self.expression(ExpressionKind::Satisfies(TypeOperation {
            operand: Box::new(operand),
            type_,
        }))
    }

    pub fn index(&mut self, primary: Expression, index: Expression) -> Expression {
        self.index_expression(primary, false, IndexKind::Element(Box::new(index)))
    }

    pub fn safe_index(&mut self, primary: Expression, index: Expression) -> Expression {
        self.index_expression(primary, true, IndexKind::Element(Box::new(index)))
    }

    pub fn range_index(
        &mut self,
        primary: Expression,
        lower: Expression,
        upper: Option<Expression>,
    ) -> Expression {
        self.index_expression(
            primary,
            false,
            IndexKind::Range {
                lower: Box::new(lower),
                upper: upper.map(Box::new),
            },
        )
    }

    fn index_expression(&mut self, primary: Expression, safe: bool, index: IndexKind) -> Expression {
        self.expression(ExpressionKind::Index(IndexExpression {
            primary: Box::new(primary),
            safe,
            index,
        }))
    }

    pub fn sequence(&mut self, elements: Vec<Expression>) -> Expression {
        self.expression(ExpressionKind::SequenceEnumeration(elements))
    }

    pub fn parenthesized(&mut self, inner: Expression) -> Expression {
        self.expression(ExpressionKind::Parenthesized(Box::new(inner)))
    }
}
