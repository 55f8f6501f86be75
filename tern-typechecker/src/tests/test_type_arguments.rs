//! Type argument inference, arity and bounds

use super::{errors, errors_on, primary_id, Fixture};
use pretty_assertions::assert_eq;
use tern_model::{ParameterInfo, ProducedType, Variance};

/// `T name<T>(T first, T second)`
fn with_pick(f: &mut Fixture) {
    let pick = f.model.add_function(f.package, "pick").unwrap();
    let t = f
        .model
        .add_type_parameter(pick, "T", Variance::Invariant)
        .unwrap();
    f.model.set_type(pick, ProducedType::simple(t)).unwrap();
    f.parameter(pick, "first", ProducedType::simple(t), ParameterInfo::default());
    f.parameter(pick, "second", ProducedType::simple(t), ParameterInfo::default());
}

/// `T largest<T>(T value) given T satisfies Comparable<T>`
fn with_largest(f: &mut Fixture) {
    let largest = f.model.add_function(f.package, "largest").unwrap();
    let t = f
        .model
        .add_type_parameter(largest, "T", Variance::Invariant)
        .unwrap();
    let bound = ProducedType::declared(f.lang.comparable, vec![ProducedType::simple(t)]);
    f.model.add_satisfied_type(t, bound).unwrap();
    f.model.set_type(largest, ProducedType::simple(t)).unwrap();
    f.parameter(largest, "value", ProducedType::simple(t), ParameterInfo::default());
}

#[test]
fn test_identity_infers_argument_type() {
    let mut f = Fixture::new();
    f.identity("id");
    let primary = f.ast.base("id");
    let answer = f.ast.natural(42);
    let call = f.ast.invoke(primary, vec![answer]);
    let (call_id, primary) = (call.id, primary_id(&call));
    let (result, statement) = f.inferred("result", call);

    let analysis = f.check(vec![statement]);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
    assert_eq!(analysis.inferred_type_arguments(primary), Some(&[f.natural()][..]));
    assert_eq!(analysis.type_of(call_id), Some(&f.natural()));
    assert_eq!(f.model.declared_type(result), Some(&f.natural()));
}

#[test]
fn test_inference_joins_candidates() {
    let mut f = Fixture::new();
    with_pick(&mut f);
    let primary = f.ast.base("pick");
    let arguments = vec![f.ast.natural(1), f.ast.string("one")];
    let call = f.ast.invoke(primary, arguments);
    let call_id = call.id;
    let statement = f.ast.expression_statement(call);

    let analysis = f.check(vec![statement]);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
    assert_eq!(
        analysis.type_of(call_id),
        Some(&ProducedType::union([f.natural(), f.string()]))
    );
}

#[test]
fn test_inference_through_sequenced_and_generic_parameters() {
    let mut f = Fixture::new();

    let head = f.model.add_function(f.package, "head").unwrap();
    let t = f
        .model
        .add_type_parameter(head, "T", Variance::Invariant)
        .unwrap();
    f.model.set_type(head, ProducedType::simple(t)).unwrap();
    let values = f.lang.possibly_empty_sequence_of(ProducedType::simple(t));
    f.parameter(
        head,
        "values",
        values,
        ParameterInfo {
            defaulted: false,
            sequenced: true,
        },
    );

    let first = f.model.add_function(f.package, "firstOf").unwrap();
    let e = f
        .model
        .add_type_parameter(first, "E", Variance::Invariant)
        .unwrap();
    f.model.set_type(first, ProducedType::simple(e)).unwrap();
    let iterable = f.lang.iterable_of(ProducedType::simple(e));
    f.parameter(first, "elements", iterable, ParameterInfo::default());

    let primary = f.ast.base("head");
    let arguments = vec![f.ast.natural(1), f.ast.natural(2)];
    let sequenced_call = f.ast.invoke(primary, arguments);
    let sequenced_id = sequenced_call.id;

    let primary = f.ast.base("firstOf");
    let elements = vec![f.ast.string("a"), f.ast.string("b")];
    let strings = f.ast.sequence(elements);
    let generic_call = f.ast.invoke(primary, vec![strings]);
    let generic_id = generic_call.id;

    let statements = vec![
        f.ast.expression_statement(sequenced_call),
        f.ast.expression_statement(generic_call),
    ];
    let analysis = f.check(statements);

    assert!(!analysis.has_errors(), "{:?}", errors(&analysis));
    assert_eq!(analysis.type_of(sequenced_id), Some(&f.natural()));
    assert_eq!(analysis.type_of(generic_id), Some(&f.string()));
}

#[test]
fn test_explicit_type_arguments() {
    let mut f = Fixture::new();
    f.identity("id");
    let string = f.ast.simple_type(f.lang.string);
    let primary = f.ast.base_with_type_arguments("id", vec![string]);
    let answer = f.ast.natural(42);
    let call = f.ast.invoke(primary, vec![answer]);
    let statement = f.ast.expression_statement(call);

    let analysis = f.check(vec![statement]);

    assert_eq!(
        errors(&analysis),
        vec!["argument not assignable to parameter type: x since Natural is not String"]
    );
}

#[test]
fn test_type_argument_count() {
    let mut f = Fixture::new();
    f.identity("id");
    let types = vec![f.ast.simple_type(f.lang.string), f.ast.simple_type(f.lang.natural)];
    let primary = f.ast.base_with_type_arguments("id", types);
    let answer = f.ast.natural(42);
    let call = f.ast.invoke(primary, vec![answer]);
    let call_id = call.id;
    let first = f.ast.expression_statement(call);

    let reference = f.ast.base("id");
    let reference_id = reference.id;
    let (_, second) = f.inferred("function", reference);

    let natural = f.natural();
    f.function("plain", natural, &[]);
    let types = vec![f.ast.simple_type(f.lang.string)];
    let primary = f.ast.base_with_type_arguments("plain", types);
    let call = f.ast.invoke(primary, vec![]);
    let third = f.ast.expression_statement(call);

    let analysis = f.check(vec![first, second, third]);

    assert_eq!(
        errors(&analysis),
        vec![
            "wrong number of type arguments to: id",
            "requires type arguments: id",
            "does not accept type arguments: plain",
        ]
    );
    assert_eq!(analysis.type_of(call_id), Some(&ProducedType::Unknown));
    assert_eq!(analysis.type_of(reference_id), Some(&ProducedType::Unknown));
}

#[test]
fn test_upper_bound_violations() {
    let mut f = Fixture::new();
    with_largest(&mut f);

    let primary = f.ast.base("largest");
    let argument = f.ast.base("true");
    let inferred = f.ast.invoke(primary, vec![argument]);
    let inferred_primary = primary_id(&inferred);

    let boolean = f.ast.simple_type(f.lang.boolean);
    let boolean_id = boolean.id;
    let primary = f.ast.base_with_type_arguments("largest", vec![boolean]);
    let argument = f.ast.base("false");
    let explicit = f.ast.invoke(primary, vec![argument]);

    let primary = f.ast.base("largest");
    let argument = f.ast.natural(3);
    let accepted = f.ast.invoke(primary, vec![argument]);
    let accepted_id = accepted.id;

    let statements = vec![
        f.ast.expression_statement(inferred),
        f.ast.expression_statement(explicit),
        f.ast.expression_statement(accepted),
    ];
    let analysis = f.check(statements);

    assert_eq!(
        errors_on(&analysis, inferred_primary),
        vec!["inferred type argument Boolean to type parameter T of declaration largest not assignable to Comparable<Boolean>"]
    );
    assert_eq!(
        errors_on(&analysis, boolean_id),
        vec!["type parameter T of declaration largest has argument Boolean not assignable to Comparable<Boolean>"]
    );
    assert_eq!(errors(&analysis).len(), 2);
    assert_eq!(analysis.type_of(accepted_id), Some(&f.natural()));
}

#[test]
fn test_case_constraint() {
    let mut f = Fixture::new();
    let choose = f.model.add_function(f.package, "choose").unwrap();
    let t = f
        .model
        .add_type_parameter(choose, "T", Variance::Invariant)
        .unwrap();
    f.model.add_case_type(t, f.natural()).unwrap();
    f.model.add_case_type(t, f.string()).unwrap();
    f.model.set_type(choose, ProducedType::simple(t)).unwrap();
    f.parameter(choose, "value", ProducedType::simple(t), ParameterInfo::default());

    let primary = f.ast.base("choose");
    let argument = f.ast.float(1.5);
    let call = f.ast.invoke(primary, vec![argument]);
    let statement = f.ast.expression_statement(call);

    let analysis = f.check(vec![statement]);

    assert_eq!(
        errors(&analysis),
        vec!["inferred type argument Float to type parameter T of declaration choose not one of the listed cases"]
    );
}

#[test]
fn test_self_type_argument_must_be_the_satisfying_type() {
    let mut f = Fixture::new();
    let ordered = f.model.add_interface(f.package, "Ordered").unwrap();
    let other = f
        .model
        .add_type_parameter(ordered, "Other", Variance::Invariant)
        .unwrap();
    f.model.set_self_type(other, true).unwrap();

    let pear = f.model.add_class(f.package, "Pear").unwrap();
    let apple = f.model.add_class(f.package, "Apple").unwrap();
    let wrong = ProducedType::declared(ordered, vec![ProducedType::simple(pear)]);
    f.model.add_satisfied_type(apple, wrong).unwrap();
    let right = ProducedType::declared(ordered, vec![ProducedType::simple(pear)]);
    f.model.add_satisfied_type(pear, right).unwrap();

    let apple_class = f.ast.class(apple, None, None, vec![], vec![]);
    let apple_id = apple_class.id;
    let pear_class = f.ast.class(pear, None, None, vec![], vec![]);
    let pear_id = pear_class.id;

    let analysis = f.check(vec![apple_class, pear_class]);

    assert_eq!(
        errors_on(&analysis, apple_id),
        vec!["does not satisfy self type constraint on type parameter: Other of Ordered since Apple is not Pear"]
    );
    assert_eq!(errors_on(&analysis, pear_id), Vec::<String>::new());
    assert_eq!(errors(&analysis).len(), 1);
}

#[test]
fn test_same_supertype_twice_with_different_arguments() {
    let mut f = Fixture::new();
    let holder = f.model.add_interface(f.package, "Holder").unwrap();
    f.model
        .add_type_parameter(holder, "T", Variance::Invariant)
        .unwrap();

    let numbers = f.model.add_interface(f.package, "Numbers").unwrap();
    let holds_natural = ProducedType::declared(holder, vec![f.natural()]);
    f.model.add_satisfied_type(numbers, holds_natural).unwrap();
    let words = f.model.add_interface(f.package, "Words").unwrap();
    let holds_string = ProducedType::declared(holder, vec![f.string()]);
    f.model.add_satisfied_type(words, holds_string).unwrap();

    let both = f.model.add_class(f.package, "Both").unwrap();
    f.model
        .add_satisfied_type(both, ProducedType::simple(numbers))
        .unwrap();
    f.model
        .add_satisfied_type(both, ProducedType::simple(words))
        .unwrap();
    let definition = f.ast.class(both, None, None, vec![], vec![]);

    let analysis = f.check(vec![definition]);

    let reported = errors(&analysis);
    assert_eq!(reported.len(), 1, "{reported:?}");
    assert!(reported[0]
        .starts_with("type Both has the same supertype twice with incompatible type arguments: "));
    assert!(reported[0].contains("Holder<Natural>"));
    assert!(reported[0].contains("Holder<String>"));
}
