//! Positional, named, sequenced and curried invocations

use super::{argument_list_id, errors, errors_on, Fixture};
use crate::DiagnosticKind;
use pretty_assertions::assert_eq;
use tern_model::{ParameterInfo, ProducedType};

const SEQUENCED: ParameterInfo = ParameterInfo {
    defaulted: false,
    sequenced: true,
};

fn with_pair() -> Fixture {
    let mut f = Fixture::new();
    let natural = f.natural();
    f.function(
        "pair",
        natural.clone(),
        &[("a", natural.clone()), ("b", natural)],
    );
    f
}

/// `Natural total(Natural... values)`
fn with_total() -> Fixture {
    let mut f = Fixture::new();
    let natural = f.natural();
    let total = f.function("total", natural.clone(), &[]);
    let values = f.lang.possibly_empty_sequence_of(natural);
    f.parameter(total, "values", values, SEQUENCED);
    f
}

#[test]
fn test_missing_positional_argument() {
    let mut f = with_pair();
    let primary = f.ast.base("pair");
    let one = f.ast.natural(1);
    let call = f.ast.invoke(primary, vec![one]);
    let list = argument_list_id(&call);
    let (result, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert_eq!(errors(&analysis), vec!["no argument to parameter: b"]);
    assert_eq!(errors_on(&analysis, list), vec!["no argument to parameter: b"]);
    assert_eq!(f.model.declared_type(result), Some(&f.natural()));
}

#[test]
fn test_extra_positional_argument() {
    let mut f = with_pair();
    let primary = f.ast.base("pair");
    let arguments = vec![f.ast.natural(1), f.ast.natural(2), f.ast.natural(3)];
    let third = arguments[2].id;
    let call = f.ast.invoke(primary, arguments);
    let (_, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert_eq!(errors(&analysis), vec!["no matching parameter for argument"]);
    assert_eq!(errors_on(&analysis, third), vec!["no matching parameter for argument"]);
    assert_eq!(analysis.errors().next().map(|d| d.kind), Some(DiagnosticKind::Arity));
}

#[test]
fn test_argument_not_assignable() {
    let mut f = with_pair();
    let primary = f.ast.base("pair");
    let arguments = vec![f.ast.natural(1), f.ast.string("two")];
    let call = f.ast.invoke(primary, arguments);
    let (_, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert_eq!(
        errors(&analysis),
        vec!["argument not assignable to parameter type: b since String is not Natural"]
    );
}

#[test]
fn test_defaulted_parameter_may_be_omitted() {
    let mut f = Fixture::new();
    let natural = f.natural();
    let function = f.function("scale", natural.clone(), &[("value", natural.clone())]);
    f.parameter(
        function,
        "factor",
        natural,
        ParameterInfo {
            defaulted: true,
            sequenced: false,
        },
    );
    let primary = f.ast.base("scale");
    let one = f.ast.natural(1);
    let call = f.ast.invoke(primary, vec![one]);
    let (_, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
}

#[test]
fn test_sequenced_arguments() {
    let mut f = with_total();
    let primary = f.ast.base("total");
    let arguments = vec![f.ast.natural(1), f.ast.natural(2), f.ast.string("three")];
    let third = arguments[2].id;
    let call = f.ast.invoke(primary, arguments);
    let none = f.ast.base("total");
    let empty_call = f.ast.invoke(none, vec![]);
    let (_, first) = f.inferred("sum", call);
    let (_, second) = f.inferred("nothing", empty_call);

    let analysis = f.check(vec![first, second]);

    assert_eq!(
        errors_on(&analysis, third),
        vec!["argument not assignable to sequenced parameter type: values since String is not Natural"]
    );
    assert_eq!(errors(&analysis).len(), 1);
}

#[test]
fn test_spread_argument() {
    let mut f = with_total();
    let primary = f.ast.base("total");
    let elements = vec![f.ast.natural(1), f.ast.natural(2)];
    let numbers = f.ast.sequence(elements);
    let call = f.ast.invoke_spread(primary, vec![numbers]);
    let (_, statement) = f.inferred("sum", call);

    let analysis = f.check(vec![statement]);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
}

#[test]
fn test_spread_without_sequenced_parameter() {
    let mut f = with_pair();
    let primary = f.ast.base("pair");
    let one = f.ast.natural(1);
    let elements = vec![f.ast.natural(2)];
    let rest = f.ast.sequence(elements);
    let call = f.ast.invoke_spread(primary, vec![one, rest]);
    let (_, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert!(errors(&analysis)
        .contains(&"parameter list does not have a sequenced parameter".to_string()));
}

#[test]
fn test_named_arguments() {
    let mut f = with_pair();

    let primary = f.ast.base("pair");
    let value = f.ast.natural(1);
    let a = f.ast.named("a", value);
    let missing = f.ast.invoke_named(primary, vec![a], None);
    let missing_list = argument_list_id(&missing);

    let primary = f.ast.base("pair");
    let arguments = vec![
        {
            let value = f.ast.natural(1);
            f.ast.named("a", value)
        },
        {
            let value = f.ast.string("two");
            f.ast.named("b", value)
        },
        {
            let value = f.ast.natural(3);
            f.ast.named("c", value)
        },
    ];
    let (b_argument, c_argument) = (arguments[1].id, arguments[2].id);
    let wrong = f.ast.invoke_named(primary, arguments, None);

    let (_, first) = f.inferred("first", missing);
    let (_, second) = f.inferred("second", wrong);
    let analysis = f.check(vec![first, second]);

    assert_eq!(
        errors_on(&analysis, missing_list),
        vec!["missing named argument to parameter: b"]
    );
    assert_eq!(
        errors_on(&analysis, b_argument),
        vec!["named argument not assignable to parameter type: b since String is not Natural"]
    );
    assert_eq!(
        errors_on(&analysis, c_argument),
        vec!["no matching parameter for named argument: c"]
    );
    assert_eq!(errors(&analysis).len(), 3);
}

#[test]
fn test_named_sequenced_argument() {
    let mut f = with_total();
    let primary = f.ast.base("total");
    let values = vec![f.ast.natural(1), f.ast.natural(2)];
    let call = f.ast.invoke_named(primary, vec![], Some(values));
    let (_, good) = f.inferred("sum", call);

    f.function("zero", ProducedType::simple(f.lang.natural), &[]);
    let primary = f.ast.base("zero");
    let values = vec![f.ast.natural(1)];
    let call = f.ast.invoke_named(primary, vec![], Some(values));
    let (_, bad) = f.inferred("none", call);

    let analysis = f.check(vec![good, bad]);

    assert_eq!(errors(&analysis), vec!["no matching sequenced parameter"]);
}

#[test]
fn test_named_attribute_argument() {
    let mut f = with_pair();
    let first = f.model.add_getter(f.package, "a").unwrap();
    let primary = f.ast.base("pair");
    let returned = f.ast.natural(1);
    let body = vec![f.ast.return_(Some(returned))];
    let type_ = f.ast.value_modifier();
    let a = f.ast.named_attribute("a", first, type_, body);
    let value = f.ast.natural(2);
    let b = f.ast.named("b", value);
    let call = f.ast.invoke_named(primary, vec![a, b], None);
    let (_, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
    assert_eq!(f.model.declared_type(first), Some(&f.natural()));
}

#[test]
fn test_curried_invocation() {
    let mut f = Fixture::new();
    let natural = f.natural();
    let adder = f.function("adder", natural.clone(), &[("x", natural.clone())]);
    f.model.add_parameter_list(adder).unwrap();
    f.parameter(adder, "y", f.string(), ParameterInfo::default());

    let primary = f.ast.base("adder");
    let one = f.ast.natural(1);
    let partial = f.ast.invoke(primary, vec![one]);
    let two = f.ast.natural(2);
    let call = f.ast.invoke(partial, vec![two]);
    let second = call.id;
    let (result, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert_eq!(
        errors(&analysis),
        vec!["argument not assignable to parameter type: y since Natural is not String"]
    );
    assert_eq!(analysis.target(second).map(|t| t.declaration), Some(adder));
    assert_eq!(f.model.declared_type(result), Some(&natural));
}

#[test]
fn test_value_cannot_be_invoked() {
    let mut f = Fixture::new();
    let natural = f.natural();
    f.value("count", natural);
    let primary = f.ast.base("count");
    let call = f.ast.invoke(primary, vec![]);
    let call_id = call.id;
    let statement = f.ast.expression_statement(call);

    let analysis = f.check(vec![statement]);

    assert_eq!(
        errors_on(&analysis, call_id),
        vec!["receiving expression cannot be invoked"]
    );
}

#[test]
fn test_class_instantiation() {
    let mut f = Fixture::new();
    let point = f.model.add_class(f.package, "Point").unwrap();
    f.model.add_parameter_list(point).unwrap();
    f.parameter(point, "x", f.natural(), ParameterInfo::default());
    f.model.add_class(f.package, "Shape").unwrap();

    let primary = f.ast.base_type("Point");
    let one = f.ast.natural(1);
    let call = f.ast.invoke(primary, vec![one]);
    let (origin, first) = f.inferred("origin", call);

    let primary = f.ast.base_type("Shape");
    let call = f.ast.invoke(primary, vec![]);
    let call_id = call.id;
    let (_, second) = f.inferred("shape", call);

    let analysis = f.check(vec![first, second]);

    assert_eq!(f.model.declared_type(origin), Some(&ProducedType::simple(point)));
    assert_eq!(
        errors_on(&analysis, call_id),
        vec!["type cannot be instantiated: Shape (or return statement is missing)"]
    );
}

#[test]
fn test_function_without_parameter_lists_is_a_precondition_error() {
    let mut f = Fixture::new();
    let broken = f.model.add_function(f.package, "broken").unwrap();
    f.model.set_type(broken, f.natural()).unwrap();
    let primary = f.ast.base("broken");
    let call = f.ast.invoke(primary, vec![]);
    let statement = f.ast.expression_statement(call);
    let unit = f.ast.unit(f.package, vec![statement]);

    let result = crate::typecheck_unit(&f.model, &f.lang, &crate::CheckerConfig::default(), &unit);

    assert!(matches!(
        result,
        Err(crate::TypecheckError::MissingParameterList { ref name, .. }) if name == "broken"
    ));
}
