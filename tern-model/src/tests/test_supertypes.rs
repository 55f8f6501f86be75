//! Supertype search along the declared hierarchy

use super::{create_test_model, simple};
use crate::{ProducedType, Substitution, TypeQuery, Variance};
use pretty_assertions::assert_eq;

#[test]
fn test_supertype_substitutes_along_the_path() {
    let (model, lang, _) = create_test_model();

    assert_eq!(
        model.supertype(&simple(lang.natural), lang.summable),
        Some(ProducedType::declared(lang.summable, vec![simple(lang.natural)]))
    );
    assert_eq!(
        model.supertype(&lang.range_of(simple(lang.character)), lang.iterable),
        Some(lang.iterable_of(simple(lang.character)))
    );
    assert_eq!(
        model.supertype(&lang.sequence_of(simple(lang.string)), lang.correspondence),
        Some(ProducedType::declared(
            lang.correspondence,
            vec![simple(lang.natural), simple(lang.string)]
        ))
    );
}

#[test]
fn test_no_supertype_outside_the_hierarchy() {
    let (model, lang, _) = create_test_model();

    assert_eq!(model.supertype(&simple(lang.string), lang.integral), None);
    assert_eq!(model.supertype(&lang.nothing_type(), lang.object), None);
    assert_eq!(model.supertype(&ProducedType::Bottom, lang.object), None);
}

#[test]
fn test_every_type_reaches_the_root() {
    let (model, lang, _) = create_test_model();
    for ty in [simple(lang.string), lang.nothing_type(), simple(lang.equality)] {
        assert_eq!(model.supertype(&ty, lang.void), Some(lang.void_type()));
    }
}

#[test]
fn test_union_view_joins_covariant_arguments() {
    let (model, lang, _) = create_test_model();
    let union = ProducedType::union([
        lang.sequence_of(simple(lang.string)),
        lang.sequence_of(simple(lang.natural)),
    ]);

    let view = model.supertype(&union, lang.iterable).unwrap();
    assert!(view.is_exactly(&lang.iterable_of(ProducedType::union([
        simple(lang.string),
        simple(lang.natural)
    ]))));
}

#[test]
fn test_union_view_requires_every_case() {
    let (model, lang, _) = create_test_model();
    let union = ProducedType::union([lang.sequence_of(simple(lang.string)), simple(lang.natural)]);

    assert_eq!(model.supertype(&union, lang.iterable), None);
}

#[test]
fn test_round_trip_through_substitution() {
    let (mut model, lang, package) = create_test_model();
    let bag = model.add_class(package, "Bag").unwrap();
    let element = model
        .add_type_parameter(bag, "Element", Variance::Covariant)
        .unwrap();
    model
        .add_satisfied_type(bag, lang.sequence_of(simple(element)))
        .unwrap();

    let generic_view = model
        .supertype(&model.type_of(bag), lang.iterable)
        .unwrap();
    let arguments = [simple(lang.string)];
    let substituted = generic_view.substitute(&Substitution::from_arguments(&[element], &arguments));
    let direct = model
        .supertype(&ProducedType::declared(bag, arguments.to_vec()), lang.iterable)
        .unwrap();

    assert!(substituted.is_exactly(&direct));
}

#[test]
fn test_memoized_and_fresh_queries_agree() {
    let (model, lang, _) = create_test_model();
    let ty = lang.range_of(simple(lang.natural));

    let mut query = TypeQuery::new(&model);
    let first = query.supertype(&ty, lang.comparable);
    let cached = query.supertype(&ty, lang.comparable);
    let fresh = model.supertype(&ty, lang.comparable);

    assert_eq!(first, cached);
    assert_eq!(first, fresh);
}

#[test]
fn test_depth_cut_off_is_not_remembered() {
    let (mut model, _, package) = create_test_model();
    let chain: Vec<_> = (0..6)
        .map(|index| model.add_interface(package, &format!("Level{index}")).unwrap())
        .collect();
    for pair in chain.windows(2) {
        model.add_satisfied_type(pair[0], simple(pair[1])).unwrap();
    }
    let top = chain[5];

    let mut query = TypeQuery::new(&model).with_max_depth(3);
    assert_eq!(query.supertype(&simple(chain[0]), top), None);
    assert_eq!(query.supertype(&simple(chain[2]), top), Some(simple(top)));
    assert_eq!(query.supertype(&simple(chain[0]), top), None);
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let (mut model, lang, package) = create_test_model();
    let a = model.add_interface(package, "A").unwrap();
    let b = model.add_interface(package, "B").unwrap();
    model.add_satisfied_type(a, simple(b)).unwrap();
    model.add_satisfied_type(b, simple(a)).unwrap();

    assert_eq!(model.supertype(&simple(a), lang.string), None);
    assert!(!model.is_subtype_of(&simple(a), &simple(lang.string)));
    assert!(model.is_subtype_of(&simple(a), &simple(b)));
}

#[test]
fn test_all_supertypes_follows_every_path() {
    let (model, lang, _) = create_test_model();
    let all = model.query().all_supertypes(&simple(lang.natural));

    let summable = ProducedType::declared(lang.summable, vec![simple(lang.natural)]);
    let invertable = ProducedType::declared(lang.invertable, vec![simple(lang.integer)]);
    assert!(all.iter().any(|ty| ty.is_exactly(&summable)));
    assert!(all.iter().any(|ty| ty.is_exactly(&invertable)));
    assert!(all[0].is_exactly(&simple(lang.natural)));
}
