//! Union, intersection and bottom laws

use super::{create_test_model, simple};
use crate::ProducedType;
use pretty_assertions::assert_eq;

#[test]
fn test_cases_are_subtypes_of_their_union() {
    let (model, lang, _) = create_test_model();
    let pairs = [
        (simple(lang.string), simple(lang.natural)),
        (simple(lang.boolean), lang.sequence_of(simple(lang.float))),
        (lang.nothing_type(), simple(lang.exception)),
    ];

    for (a, b) in pairs {
        let union = ProducedType::union([a.clone(), b.clone()]);
        assert!(model.is_subtype_of(&a, &union));
        assert!(model.is_subtype_of(&b, &union));
        assert!(model.is_supertype_of(&union, &a));
    }
}

#[test]
fn test_intersection_is_subtype_of_its_members() {
    let (model, lang, _) = create_test_model();
    let a = simple(lang.format);
    let b = lang.comparable_of(simple(lang.string));
    let intersection = ProducedType::intersection([a.clone(), b.clone()]);

    assert!(model.is_subtype_of(&intersection, &a));
    assert!(model.is_subtype_of(&intersection, &b));
    assert!(!model.is_subtype_of(&a, &intersection));
}

#[test]
fn test_union_is_subtype_only_when_every_case_is() {
    let (model, lang, _) = create_test_model();
    let union = ProducedType::union([simple(lang.natural), simple(lang.string)]);

    assert!(model.is_subtype_of(&union, &simple(lang.object)));
    assert!(model.is_subtype_of(&union, &simple(lang.format)));
    assert!(!model.is_subtype_of(&union, &simple(lang.string)));
}

#[test]
fn test_bottom_is_subtype_of_everything() {
    let (model, lang, _) = create_test_model();
    for ty in [
        simple(lang.void),
        simple(lang.string),
        lang.nothing_type(),
        lang.sequence_of(simple(lang.natural)),
        ProducedType::union([simple(lang.string), simple(lang.float)]),
    ] {
        assert!(model.is_subtype_of(&ProducedType::Bottom, &ty));
        assert!(!model.is_subtype_of(&ty, &ProducedType::Bottom));
    }
}

#[test]
fn test_union_with_bottom_degenerates() {
    let (_, lang, _) = create_test_model();
    let string = simple(lang.string);

    let union = ProducedType::union([ProducedType::Bottom, string.clone()]);
    assert!(union.is_exactly(&string));
    assert_eq!(ProducedType::union([]), ProducedType::Bottom);
    assert_eq!(
        ProducedType::intersection([string, ProducedType::Bottom]),
        ProducedType::Bottom
    );
}

#[test]
fn test_optional_wrapping_is_idempotent() {
    let (_, lang, _) = create_test_model();
    let optional = lang.optional(simple(lang.string));
    let twice = lang.optional(optional.clone());

    assert!(twice.is_exactly(&optional));
    assert_eq!(twice.cases().len(), 2);
}

#[test]
fn test_nested_unions_are_flattened() {
    let (_, lang, _) = create_test_model();
    let inner = ProducedType::union([simple(lang.natural), simple(lang.integer)]);
    let outer = ProducedType::union([simple(lang.float), inner]);

    assert_eq!(
        outer,
        ProducedType::Union(vec![
            simple(lang.float),
            simple(lang.natural),
            simple(lang.integer)
        ])
    );
}

#[test]
fn test_exact_equality_ignores_case_order() {
    let (_, lang, _) = create_test_model();
    let left = ProducedType::union([simple(lang.natural), simple(lang.string)]);
    let right = ProducedType::union([simple(lang.string), simple(lang.natural)]);

    assert!(left.is_exactly(&right));
    assert!(!left.is_exactly(&simple(lang.string)));
}

#[test]
fn test_variance_of_type_arguments() {
    let (model, lang, _) = create_test_model();
    let naturals = lang.sequence_of(simple(lang.natural));
    let objects = lang.sequence_of(simple(lang.object));

    assert!(model.is_subtype_of(&naturals, &objects));
    assert!(!model.is_subtype_of(&objects, &naturals));

    // Castable is contravariant in its argument
    let wide = lang.castable_of(ProducedType::union([
        simple(lang.natural),
        simple(lang.integer),
    ]));
    let narrow = lang.castable_of(simple(lang.natural));
    assert!(model.is_subtype_of(&wide, &narrow));
    assert!(!model.is_subtype_of(&narrow, &wide));
}

#[test]
fn test_self_typed_capabilities() {
    let (model, lang, _) = create_test_model();
    let summable = |ty| ProducedType::declared(lang.summable, vec![ty]);

    assert!(model.is_subtype_of(&simple(lang.natural), &summable(simple(lang.natural))));
    assert!(model.is_subtype_of(&simple(lang.string), &summable(simple(lang.string))));
    assert!(!model.is_subtype_of(&simple(lang.natural), &summable(simple(lang.integer))));
}

#[test]
fn test_minus_strips_cases() {
    let (model, lang, _) = create_test_model();
    let string = simple(lang.string);
    let optional = lang.optional(string.clone());

    assert!(lang.is_optional(&model, &optional));
    assert!(!lang.is_optional(&model, &string));
    assert!(lang.definite(&model, &optional).is_exactly(&string));

    let strings = lang.sequence_of(string.clone());
    let possibly_empty = lang.optional(lang.possibly_empty_sequence_of(string));
    assert!(lang.is_possibly_empty(&model, &possibly_empty));
    assert!(lang.nonempty(&model, &possibly_empty).is_exactly(&strings));
}

#[test]
fn test_unknown_is_compatible_both_ways() {
    let (model, lang, _) = create_test_model();
    let string = simple(lang.string);

    assert!(model.is_subtype_of(&ProducedType::Unknown, &string));
    assert!(model.is_subtype_of(&string, &ProducedType::Unknown));
    assert_eq!(
        ProducedType::union([string, ProducedType::Unknown]),
        ProducedType::Unknown
    );
}

#[test]
fn test_display() {
    let (model, lang, _) = create_test_model();
    let ty = lang.optional(lang.entry_of(simple(lang.string), simple(lang.natural)));

    assert_eq!(
        model.display(&ty).to_string(),
        "Nothing|Entry<String, Natural>"
    );
}
