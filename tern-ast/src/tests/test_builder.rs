use crate::{
    ArgumentListKind, AstBuilder, ExpressionKind, MemberOperator, Span, StatementKind,
    TypeNodeKind,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use tern_model::Model;

#[test]
fn test_node_ids_are_unique() {
    let mut model = Model::new();
    let package = model.add_package("test");
    let mut b = AstBuilder::new();

    let one = b.natural(1);
    let two = b.natural(2);
    let sum = b.binary(one, crate::BinaryOperator::Sum, two);
    let statement = b.expression_statement(sum);
    let unit = b.unit(package, vec![statement]);

    let mut ids = HashSet::new();
    let StatementKind::Expression(expression) = &unit.declarations[0].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Binary(operation) = &expression.kind else {
        panic!("expected a binary operation");
    };
    for id in [
        unit.id,
        unit.declarations[0].id,
        expression.id,
        operation.left.id,
        operation.right.id,
    ] {
        assert!(ids.insert(id), "duplicate node id {id}");
    }
}

#[test]
fn test_spans_increase() {
    let mut b = AstBuilder::new();
    let first = b.string("a");
    let second = b.string("b");

    assert!(first.span.end <= second.span.start);
    assert_eq!(first.span.len(), 1);
}

#[test]
fn test_spread_invocation_has_ellipsis() {
    let mut b = AstBuilder::new();
    let callee = b.base("print");
    let argument = b.base("lines");
    let call = b.invoke_spread(callee, vec![argument]);

    let ExpressionKind::Invocation(invocation) = &call.kind else {
        panic!("expected an invocation");
    };
    match &invocation.arguments.kind {
        ArgumentListKind::Positional {
            arguments,
            ellipsis,
        } => {
            assert_eq!(arguments.len(), 1);
            assert!(ellipsis.is_some());
        }
        other => panic!("unexpected argument list {other:?}"),
    }
}

#[test]
fn test_member_operators() {
    let mut b = AstBuilder::new();
    let receiver = b.base("name");
    let safe = b.safe_member(receiver, "size");
    let ExpressionKind::QualifiedMember(reference) = &safe.kind else {
        panic!("expected a qualified member");
    };
    assert_eq!(reference.operator, MemberOperator::Safe);
    assert_eq!(reference.name, "size");
}

#[test]
fn test_inferred_type_modifiers() {
    let mut b = AstBuilder::new();
    assert!(b.value_modifier().is_inferred());
    assert!(b.function_modifier().is_inferred());
    assert!(!b.void_modifier().is_inferred());
    assert!(b.void_modifier().is_void());
    assert!(matches!(b.synthetic_type().kind, TypeNodeKind::Synthetic));
}

#[test]
fn test_span_converts_to_source_span() {
    let span = Span::with_line_col(4, 10, (1, 5), (1, 11));
    let source: miette::SourceSpan = span.into();

    assert_eq!(source.offset(), 4);
    assert_eq!(source.len(), 6);
}
