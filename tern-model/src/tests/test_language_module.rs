//! Built-in declarations and the helpers derived from them

use super::{create_test_model, simple};
use crate::{LanguageModule, ModelError, ProducedType};
use pretty_assertions::assert_eq;

#[test]
fn test_bootstrap_only_once() {
    let (mut model, _, _) = create_test_model();
    assert_eq!(
        LanguageModule::bootstrap(&mut model),
        Err(ModelError::LanguageModuleExists)
    );
}

#[test]
fn test_literal_values_are_typed() {
    let (model, lang, _) = create_test_model();

    assert_eq!(model.declared_type(lang.null), Some(&lang.nothing_type()));
    assert_eq!(model.declared_type(lang.true_value), Some(&lang.boolean_type()));
}

#[test]
fn test_iterated_type() {
    let (model, lang, _) = create_test_model();

    assert_eq!(
        lang.iterated_type(&model, &simple(lang.string)),
        Some(simple(lang.character))
    );
    assert_eq!(
        lang.iterated_type(&model, &lang.range_of(simple(lang.natural))),
        Some(simple(lang.natural))
    );
    assert_eq!(
        lang.iterated_type(&model, &lang.empty_type()),
        Some(ProducedType::Bottom)
    );
    assert_eq!(lang.iterated_type(&model, &simple(lang.natural)), None);
}

#[test]
fn test_sequenced_element_type() {
    let (model, lang, _) = create_test_model();

    assert_eq!(
        lang.sequenced_element_type(&model, &lang.possibly_empty_sequence_of(simple(lang.string))),
        Some(simple(lang.string))
    );
    assert_eq!(
        lang.sequenced_element_type(&model, &simple(lang.string)),
        None
    );
}

#[test]
fn test_language_names_resolve_from_user_scopes() {
    let (mut model, lang, package) = create_test_model();
    let class = model.add_class(package, "Widget").unwrap();

    assert_eq!(model.lookup(class, "String"), Some(lang.string));
    assert_eq!(model.lookup(class, "null"), Some(lang.null));
    assert_eq!(model.lookup(class, "Widget"), Some(class));
    assert_eq!(model.lookup(class, "Gadget"), None);
}
