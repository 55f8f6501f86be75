//! Unit tests for the declaration model and type algebra

use crate::{DeclId, LanguageModule, Model, ProducedType};

mod test_algebra_properties;
mod test_hierarchy;
mod test_language_module;
mod test_substitution;
mod test_supertypes;
mod test_type_algebra;

/// A model with the language module and an empty user package
pub(crate) fn create_test_model() -> (Model, LanguageModule, DeclId) {
    let mut model = Model::new();
    let language = LanguageModule::bootstrap(&mut model).unwrap();
    let package = model.add_package("test");
    (model, language, package)
}

pub(crate) fn simple(id: DeclId) -> ProducedType {
    ProducedType::simple(id)
}
