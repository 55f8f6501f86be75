//! Syntax tree nodes
//!
//! Every node that can carry a type or a diagnostic has a [`NodeId`], unique
//! within one compilation unit, and a [`Span`]. Declaring nodes refer to
//! their [`DeclId`] in the model; references either carry a pre-resolved
//! declaration or a name looked up from the enclosing scope.

use std::fmt;
use tern_model::DeclId;

/// Source location with byte offsets and optional line/column info
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line_col: Option<(usize, usize)>,
    pub end_line_col: Option<(usize, usize)>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            start_line_col: None,
            end_line_col: None,
        }
    }

    pub fn with_line_col(
        start: usize,
        end: usize,
        start_line_col: (usize, usize),
        end_line_col: (usize, usize),
    ) -> Self {
        Self {
            start,
            end,
            start_line_col: Some(start_line_col),
            end_line_col: Some(end_line_col),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.len())
    }
}

/// Identity of a node within its compilation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A source file's worth of toplevel declarations
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub package: DeclId,
    pub declarations: Vec<Statement>,
    pub span: Span,
}

// --- types -------------------------------------------------------------

/// A syntactic type reference
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub id: NodeId,
    pub kind: TypeNodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    /// `String`, `Sequence<Natural>`
    Simple {
        declaration: DeclId,
        arguments: Vec<TypeNode>,
    },
    /// `A | B`
    Union(Vec<TypeNode>),
    /// `A & B`
    Intersection(Vec<TypeNode>),
    /// `T?`
    Optional(Box<TypeNode>),
    /// `T...`, the type of a sequenced parameter
    Sequenced(Box<TypeNode>),
    /// `value`: infer from the specifier or the returns
    Value,
    /// `function`: infer the return type
    Function,
    /// `void`
    Void,
    /// The type of an `exists x` style condition variable, taken from `x`
    Synthetic,
}

impl TypeNode {
    /// Local modifiers whose type is inferred
    pub fn is_inferred(&self) -> bool {
        matches!(
            self.kind,
            TypeNodeKind::Value | TypeNodeKind::Function | TypeNodeKind::Synthetic
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeNodeKind::Void)
    }
}

// --- declarations and statements -----------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub id: NodeId,
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    ClassDefinition(ClassDefinition),
    InterfaceDefinition(InterfaceDefinition),
    ObjectDefinition(ObjectDefinition),
    AttributeDeclaration(AttributeDeclaration),
    AttributeGetter(GetterDefinition),
    AttributeSetter(SetterDefinition),
    MethodDefinition(MethodDefinition),
    MethodDeclaration(MethodDeclaration),
    Expression(Expression),
    Specifier(SpecifierStatement),
    Return(Return),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    TryCatch(TryCatchStatement),
}

impl Statement {
    /// Statements that run code while an instance is being initialized
    pub fn is_executable(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::Expression(_)
                | StatementKind::Specifier(_)
                | StatementKind::Return(_)
                | StatementKind::If(_)
                | StatementKind::While(_)
                | StatementKind::For(_)
                | StatementKind::TryCatch(_)
        )
    }

    /// Declarations that evaluate a specifier during initialization
    pub fn has_initializer(&self) -> bool {
        match &self.kind {
            StatementKind::AttributeDeclaration(attribute) => attribute.specifier.is_some(),
            StatementKind::MethodDeclaration(method) => method.specifier.is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub id: NodeId,
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub default: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterListNode {
    pub id: NodeId,
    pub parameters: Vec<ParameterNode>,
    pub span: Span,
}

/// `extends Base(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedType {
    pub id: NodeId,
    pub type_: TypeNode,
    pub arguments: ArgumentList,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub declaration: DeclId,
    pub parameters: Option<ParameterListNode>,
    pub extended_type: Option<ExtendedType>,
    pub satisfied_types: Vec<TypeNode>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDefinition {
    pub declaration: DeclId,
    pub satisfied_types: Vec<TypeNode>,
    pub body: Block,
}

/// `object name extends ... { }`: an anonymous class and its single value
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinition {
    pub declaration: DeclId,
    pub class: DeclId,
    pub extended_type: Option<ExtendedType>,
    pub satisfied_types: Vec<TypeNode>,
    pub body: Block,
}

/// `T x = e;`, `value x = e;`, `variable T x := e;`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDeclaration {
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub specifier: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetterDefinition {
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetterDefinition {
    pub declaration: DeclId,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub parameter_lists: Vec<ParameterListNode>,
    pub body: Block,
}

/// A method whose body is a single specifier expression
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub parameter_lists: Vec<ParameterListNode>,
    pub specifier: Option<Expression>,
}

/// `x = e;` specifying a value declared earlier
#[derive(Debug, Clone, PartialEq)]
pub struct SpecifierStatement {
    pub target: Expression,
    pub specifier: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Condition,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Condition,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub iterator: ForIterator,
    pub body: Block,
    pub fail_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForIterator {
    pub id: NodeId,
    pub kind: ForIteratorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForIteratorKind {
    /// `for (x in xs)`
    Value {
        variable: Variable,
        source: Expression,
    },
    /// `for (k -> v in entries)`
    KeyValue {
        key: Variable,
        value: Variable,
        source: Expression,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchStatement {
    pub try_block: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub id: NodeId,
    pub variable: Variable,
    pub block: Block,
    pub span: Span,
}

/// A local introduced by a condition, iterator or catch clause
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: NodeId,
    pub declaration: DeclId,
    pub type_: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub id: NodeId,
    pub kind: ConditionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    Boolean(Expression),
    /// `exists T x = e` or the shorthand `exists x`
    Exists {
        variable: Variable,
        specifier: Expression,
    },
    /// `nonempty T x = e` or the shorthand `nonempty x`
    Nonempty {
        variable: Variable,
        specifier: Expression,
    },
    /// `is T x = e` or the shorthand `is T x`
    Is {
        type_: TypeNode,
        variable: Variable,
        specifier: Expression,
    },
    /// `satisfies A B`
    Satisfies {
        type_: TypeNode,
        satisfied: TypeNode,
    },
}

// --- expressions -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    /// The expression inside any number of parentheses
    pub fn unparenthesized(&self) -> &Expression {
        match &self.kind {
            ExpressionKind::Parenthesized(inner) => inner.unparenthesized(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    NaturalLiteral(u64),
    FloatLiteral(f64),
    CharacterLiteral(char),
    StringLiteral(String),
    QuotedLiteral(String),
    /// Interpolated expressions between string literal parts
    StringTemplate(Vec<Expression>),
    BaseMember(BaseReference),
    BaseType(BaseReference),
    QualifiedMember(QualifiedReference),
    QualifiedType(QualifiedReference),
    This,
    Super,
    Outer,
    Invocation(InvocationExpression),
    Binary(BinaryOperation),
    Unary(UnaryOperation),
    Postfix(IncrementOperation),
    Prefix(IncrementOperation),
    IsOperation(TypeOperation),
    Extends(TypeOperation),
    Satisfies(TypeOperation),
    Index(IndexExpression),
    SequenceEnumeration(Vec<Expression>),
    Parenthesized(Box<Expression>),
}

/// An unqualified reference to a member or type
#[derive(Debug, Clone, PartialEq)]
pub struct BaseReference {
    pub name: String,
    /// Set when name resolution already happened upstream
    pub declaration: Option<DeclId>,
    pub type_arguments: Option<Vec<TypeNode>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberOperator {
    /// `x.y`
    #[default]
    Member,
    /// `x?.y`
    Safe,
    /// `x[].y`
    Spread,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedReference {
    pub primary: Box<Expression>,
    pub operator: MemberOperator,
    pub name: String,
    pub type_arguments: Option<Vec<TypeNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationExpression {
    pub primary: Box<Expression>,
    pub arguments: ArgumentList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentList {
    pub id: NodeId,
    pub kind: ArgumentListKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentListKind {
    /// `f(a, b)`; with an ellipsis the last argument is spread: `f(a, xs...)`
    Positional {
        arguments: Vec<Expression>,
        ellipsis: Option<Ellipsis>,
    },
    /// `f { a = 1; b = 2; "x", "y" }`
    Named {
        arguments: Vec<NamedArgument>,
        sequenced: Option<SequencedArgument>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsis {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub id: NodeId,
    pub name: String,
    pub kind: NamedArgumentKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamedArgumentKind {
    /// `name = expression;`
    Specified(Expression),
    /// `T name { return ...; }`
    Attribute {
        declaration: DeclId,
        type_: TypeNode,
        body: Block,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencedArgument {
    pub id: NodeId,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Sum,        // +
    Difference, // -
    Product,    // *
    Quotient,   // /
    Power,      // **
    Remainder,  // %

    // Arithmetic assignment
    AddAssign,       // +=
    SubtractAssign,  // -=
    MultiplyAssign,  // *=
    DivideAssign,    // /=
    RemainderAssign, // %=

    // Bitwise on slots
    Union,        // |
    Intersection, // &
    XOr,          // ^
    Complement,   // ~

    // Bitwise assignment
    UnionAssign,        // |=
    IntersectionAssign, // &=
    XOrAssign,          // ^=
    ComplementAssign,   // ~=

    // Logical
    And, // &&
    Or,  // ||

    // Logical assignment
    AndAssign, // &&=
    OrAssign,  // ||=

    // Equality and identity
    Equal,     // ==
    NotEqual,  // !=
    Identical, // ===

    // Comparison
    Smaller, // <
    Larger,  // >
    SmallAs, // <=
    LargeAs, // >=
    Compare, // <=>

    Range,   // ..
    Entry,   // ->
    In,      // in
    Default, // ?
    Assign,  // :=
}

impl BinaryOperator {
    /// `:=` and the compound assignments, which write their left operand
    pub fn is_assignment(self) -> bool {
        use BinaryOperator::*;
        matches!(
            self,
            Assign
                | AddAssign
                | SubtractAssign
                | MultiplyAssign
                | DivideAssign
                | RemainderAssign
                | UnionAssign
                | IntersectionAssign
                | XOrAssign
                | ComplementAssign
                | AndAssign
                | OrAssign
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::*;
        let symbol = match self {
            Sum => "+",
            Difference => "-",
            Product => "*",
            Quotient => "/",
            Power => "**",
            Remainder => "%",
            AddAssign => "+=",
            SubtractAssign => "-=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            RemainderAssign => "%=",
            Union => "|",
            Intersection => "&",
            XOr => "^",
            Complement => "~",
            UnionAssign => "|=",
            IntersectionAssign => "&=",
            XOrAssign => "^=",
            ComplementAssign => "~=",
            And => "&&",
            Or => "||",
            AndAssign => "&&=",
            OrAssign => "||=",
            Equal => "==",
            NotEqual => "!=",
            Identical => "===",
            Smaller => "<",
            Larger => ">",
            SmallAs => "<=",
            LargeAs => ">=",
            Compare => "<=>",
            Range => "..",
            Entry => "->",
            In => "in",
            Default => "?",
            Assign => ":=",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negative, // -x
    Positive, // +x
    Flip,     // ~x
    Not,      // !x
    Format,   // $x
    Exists,   // x exists
    Nonempty, // x nonempty
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            UnaryOperator::Negative => "-",
            UnaryOperator::Positive => "+",
            UnaryOperator::Flip => "~",
            UnaryOperator::Not => "!",
            UnaryOperator::Format => "$",
            UnaryOperator::Exists => "exists",
            UnaryOperator::Nonempty => "nonempty",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOperator {
    Increment, // ++
    Decrement, // --
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementOperation {
    pub operator: IncrementOperator,
    pub operand: Box<Expression>,
}

/// `x is T`, `x extends T`, `x satisfies T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeOperation {
    pub operand: Box<Expression>,
    pub type_: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub primary: Box<Expression>,
    /// `x?[i]`
    pub safe: bool,
    pub index: IndexKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexKind {
    /// `x[i]`
    Element(Box<Expression>),
    /// `x[a..b]` or the open-ended `x[a...]`
    Range {
        lower: Box<Expression>,
        upper: Option<Box<Expression>>,
    },
}
