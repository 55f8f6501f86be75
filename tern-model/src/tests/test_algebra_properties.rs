//! Property-based tests for unions, intersections and subtyping
//!
//! Types are drawn from a fixed pool of language module types so every
//! generated case is well formed against a bootstrapped model.

use super::{create_test_model, simple};
use crate::{LanguageModule, ProducedType};
use proptest::prelude::*;

/// Runs fewer cases during development, full cases in CI
fn proptest_config() -> ProptestConfig {
    if std::env::var("CI").is_ok() {
        ProptestConfig::default()
    } else {
        ProptestConfig {
            cases: 32,
            max_shrink_iters: 100,
            ..ProptestConfig::default()
        }
    }
}

fn pool(lang: &LanguageModule) -> Vec<ProducedType> {
    vec![
        simple(lang.natural),
        simple(lang.string),
        simple(lang.float),
        simple(lang.character),
        lang.boolean_type(),
        lang.nothing_type(),
        simple(lang.object),
        lang.sequence_of(simple(lang.natural)),
        lang.iterable_of(simple(lang.string)),
        lang.optional(simple(lang.string)),
    ]
}

fn picks() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..10, 1..5)
}

fn chosen(pool: &[ProducedType], picks: &[usize]) -> Vec<ProducedType> {
    picks.iter().map(|index| pool[*index].clone()).collect()
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn test_union_ignores_case_order(indices in picks()) {
        let (_, lang, _) = create_test_model();
        let types = chosen(&pool(&lang), &indices);
        let forward = ProducedType::union(types.clone());
        let backward = ProducedType::union(types.into_iter().rev());
        prop_assert!(forward.is_exactly(&backward), "{:?} vs {:?}", forward, backward);
    }

    #[test]
    fn test_every_case_is_a_subtype_of_the_union(indices in picks()) {
        let (model, lang, _) = create_test_model();
        let types = chosen(&pool(&lang), &indices);
        let union = ProducedType::union(types.clone());
        for case in &types {
            prop_assert!(model.is_subtype_of(case, &union), "{:?} is not within {:?}", case, union);
        }
    }

    #[test]
    fn test_intersection_is_a_subtype_of_every_member(indices in picks()) {
        let (model, lang, _) = create_test_model();
        let types = chosen(&pool(&lang), &indices);
        let intersection = ProducedType::intersection(types.clone());
        for member in &types {
            prop_assert!(model.is_subtype_of(&intersection, member));
        }
    }

    #[test]
    fn test_union_with_itself_changes_nothing(indices in picks()) {
        let (model, lang, _) = create_test_model();
        let union = ProducedType::union(chosen(&pool(&lang), &indices));
        let doubled = ProducedType::union([union.clone(), union.clone()]);
        prop_assert!(doubled.is_exactly(&union));
        prop_assert!(model.is_subtype_of(&union, &union));
    }
}
