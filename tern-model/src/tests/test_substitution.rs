//! Substitution of type parameters

use super::{create_test_model, simple};
use crate::{ProducedType, Substitution, Variance};
use pretty_assertions::assert_eq;

#[test]
fn test_empty_substitution_is_identity() {
    let (_, lang, _) = create_test_model();
    for ty in [
        simple(lang.string),
        lang.optional(simple(lang.natural)),
        lang.entry_of(simple(lang.string), simple(lang.float)),
    ] {
        assert!(ty.substitute(&Substitution::new()).is_exactly(&ty));
    }
}

#[test]
fn test_substitute_replaces_parameter_occurrences() {
    let (mut model, lang, package) = create_test_model();
    let function = model.add_function(package, "first").unwrap();
    let t = model
        .add_type_parameter(function, "T", Variance::Invariant)
        .unwrap();

    let ty = lang.optional(lang.sequence_of(simple(t)));
    let substitution = Substitution::from_arguments(&[t], &[simple(lang.string)]);

    assert_eq!(
        ty.substitute(&substitution),
        lang.optional(lang.sequence_of(simple(lang.string)))
    );
}

#[test]
fn test_parameters_with_the_same_name_do_not_capture() {
    let (mut model, lang, package) = create_test_model();
    let outer = model.add_class(package, "Outer").unwrap();
    let outer_t = model
        .add_type_parameter(outer, "T", Variance::Invariant)
        .unwrap();
    let inner = model.add_function(outer, "inner").unwrap();
    let inner_t = model
        .add_type_parameter(inner, "T", Variance::Invariant)
        .unwrap();

    let ty = lang.entry_of(simple(outer_t), simple(inner_t));
    let substitution = Substitution::from_arguments(&[outer_t], &[simple(lang.natural)]);

    assert_eq!(
        ty.substitute(&substitution),
        lang.entry_of(simple(lang.natural), simple(inner_t))
    );
}

#[test]
fn test_substituting_into_a_union_recanonicalises() {
    let (mut model, lang, package) = create_test_model();
    let function = model.add_function(package, "orNull").unwrap();
    let t = model
        .add_type_parameter(function, "T", Variance::Invariant)
        .unwrap();

    let ty = lang.optional(simple(t));
    let substitution = Substitution::from_arguments(&[t], &[lang.nothing_type()]);

    assert_eq!(ty.substitute(&substitution), lang.nothing_type());

    let bottom = Substitution::from_arguments(&[t], &[ProducedType::Bottom]);
    assert_eq!(ty.substitute(&bottom), lang.nothing_type());
}

#[test]
fn test_extend_keeps_existing_bindings() {
    let (mut model, lang, package) = create_test_model();
    let function = model.add_function(package, "pair").unwrap();
    let a = model
        .add_type_parameter(function, "A", Variance::Invariant)
        .unwrap();
    let b = model
        .add_type_parameter(function, "B", Variance::Invariant)
        .unwrap();

    let mut substitution = Substitution::from_arguments(&[a], &[simple(lang.string)]);
    substitution.extend(&Substitution::from_arguments(
        &[a, b],
        &[simple(lang.float), simple(lang.natural)],
    ));

    assert_eq!(substitution.len(), 2);
    assert_eq!(substitution.get(a), Some(&simple(lang.string)));
    assert_eq!(substitution.get(b), Some(&simple(lang.natural)));
}
