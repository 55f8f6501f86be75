//! The built-in language module
//!
//! Bootstraps the declarations every program can see: the root `Void`,
//! `Object`, the null type `Nothing`, the capability interfaces used by the
//! operators, the numeric and text classes, and the collection interfaces.
//! The capability interfaces constrain their parameter to the implementing
//! type (`Summable<Other> given Other satisfies Summable<Other>`).

use crate::declaration::{DeclId, ParameterInfo, Variance};
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::produced_type::ProducedType;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageModule {
    pub package: DeclId,
    pub void: DeclId,
    pub object: DeclId,
    pub nothing: DeclId,
    pub null: DeclId,
    pub identifiable_object: DeclId,
    pub equality: DeclId,
    pub format: DeclId,
    pub boolean: DeclId,
    pub true_value: DeclId,
    pub false_value: DeclId,
    pub comparison: DeclId,
    pub comparable: DeclId,
    pub summable: DeclId,
    pub invertable: DeclId,
    pub numeric: DeclId,
    pub ordinal: DeclId,
    pub integral: DeclId,
    pub slots: DeclId,
    pub castable: DeclId,
    pub natural: DeclId,
    pub integer: DeclId,
    pub float: DeclId,
    pub character: DeclId,
    pub string: DeclId,
    pub quoted: DeclId,
    pub category: DeclId,
    pub iterable: DeclId,
    pub correspondence: DeclId,
    pub empty: DeclId,
    pub sequence: DeclId,
    pub entry: DeclId,
    pub range: DeclId,
    pub exception: DeclId,
}

struct Bootstrap<'a> {
    model: &'a mut Model,
    package: DeclId,
}

impl Bootstrap<'_> {
    fn class(&mut self, name: &str, extends: Option<DeclId>) -> ModelResult<DeclId> {
        let id = self.model.add_class(self.package, name)?;
        self.model.set_shared(id, true)?;
        if let Some(extends) = extends {
            self.model
                .set_extended_type(id, ProducedType::simple(extends))?;
        }
        Ok(id)
    }

    fn interface(&mut self, name: &str) -> ModelResult<DeclId> {
        let id = self.model.add_interface(self.package, name)?;
        self.model.set_shared(id, true)?;
        Ok(id)
    }

    /// A type parameter `Other` constrained to `Self<Other>`
    fn self_type_parameter(
        &mut self,
        generic: DeclId,
        name: &str,
        variance: Variance,
    ) -> ModelResult<DeclId> {
        let tp = self.model.add_type_parameter(generic, name, variance)?;
        self.model.set_self_type(tp, true)?;
        self.model.add_satisfied_type(
            tp,
            ProducedType::declared(generic, vec![ProducedType::simple(tp)]),
        )?;
        Ok(tp)
    }

    fn satisfies(&mut self, id: DeclId, supertype: DeclId, args: Vec<ProducedType>) -> ModelResult<()> {
        self.model
            .add_satisfied_type(id, ProducedType::declared(supertype, args))
    }

    fn value(&mut self, container: DeclId, name: &str, ty: ProducedType) -> ModelResult<DeclId> {
        let id = self.model.add_value(container, name)?;
        self.model.set_shared(id, true)?;
        self.model.set_type(id, ty)?;
        Ok(id)
    }
}

impl LanguageModule {
    pub fn bootstrap(model: &mut Model) -> ModelResult<Self> {
        if model.root().is_some() {
            return Err(ModelError::LanguageModuleExists);
        }
        let package = model.add_package("tern.language");
        let mut b = Bootstrap {
            model: &mut *model,
            package,
        };
        let simple = ProducedType::simple;

        let void = b.class("Void", None)?;
        b.model.set_root(void)?;
        b.model.set_abstract(void, true)?;
        let object = b.class("Object", Some(void))?;
        b.model.set_abstract(object, true)?;
        let nothing = b.class("Nothing", Some(void))?;
        let null = b.value(package, "null", simple(nothing))?;
        let identifiable_object = b.class("IdentifiableObject", Some(object))?;

        let equality = b.interface("Equality")?;
        let format = b.interface("Format")?;

        let boolean = b.class("Boolean", Some(object))?;
        b.satisfies(boolean, equality, vec![])?;
        b.satisfies(boolean, format, vec![])?;
        let true_value = b.value(package, "true", simple(boolean))?;
        let false_value = b.value(package, "false", simple(boolean))?;

        let comparison = b.class("Comparison", Some(object))?;
        b.satisfies(comparison, equality, vec![])?;
        b.satisfies(comparison, format, vec![])?;

        let comparable = b.interface("Comparable")?;
        b.self_type_parameter(comparable, "Other", Variance::Contravariant)?;
        b.satisfies(comparable, equality, vec![])?;

        let summable = b.interface("Summable")?;
        b.self_type_parameter(summable, "Other", Variance::Invariant)?;

        let invertable = b.interface("Invertable")?;
        b.model
            .add_type_parameter(invertable, "Inverse", Variance::Covariant)?;

        let numeric = b.interface("Numeric")?;
        let numeric_other = b.self_type_parameter(numeric, "Other", Variance::Invariant)?;
        b.satisfies(numeric, summable, vec![simple(numeric_other)])?;
        b.satisfies(numeric, comparable, vec![simple(numeric_other)])?;

        let ordinal = b.interface("Ordinal")?;
        b.self_type_parameter(ordinal, "Other", Variance::Covariant)?;

        let integral = b.interface("Integral")?;
        let integral_other = b.self_type_parameter(integral, "Other", Variance::Invariant)?;
        b.satisfies(integral, numeric, vec![simple(integral_other)])?;
        b.satisfies(integral, ordinal, vec![simple(integral_other)])?;

        let slots = b.interface("Slots")?;
        b.self_type_parameter(slots, "Other", Variance::Invariant)?;

        let castable = b.interface("Castable")?;
        b.model
            .add_type_parameter(castable, "Types", Variance::Contravariant)?;

        let natural = b.class("Natural", Some(object))?;
        let integer = b.class("Integer", Some(object))?;
        let float = b.class("Float", Some(object))?;

        b.satisfies(natural, invertable, vec![simple(integer)])?;
        b.satisfies(natural, integral, vec![simple(natural)])?;
        b.satisfies(natural, slots, vec![simple(natural)])?;
        b.satisfies(
            natural,
            castable,
            vec![ProducedType::union([simple(natural), simple(integer), simple(float)])],
        )?;
        b.satisfies(natural, format, vec![])?;

        b.satisfies(integer, invertable, vec![simple(integer)])?;
        b.satisfies(integer, integral, vec![simple(integer)])?;
        b.satisfies(
            integer,
            castable,
            vec![ProducedType::union([simple(integer), simple(float)])],
        )?;
        b.satisfies(integer, format, vec![])?;

        b.satisfies(float, invertable, vec![simple(float)])?;
        b.satisfies(float, numeric, vec![simple(float)])?;
        b.satisfies(float, castable, vec![simple(float)])?;
        b.satisfies(float, format, vec![])?;

        let character = b.class("Character", Some(object))?;
        b.satisfies(character, ordinal, vec![simple(character)])?;
        b.satisfies(character, comparable, vec![simple(character)])?;
        b.satisfies(character, format, vec![])?;

        let category = b.interface("Category")?;

        let iterable = b.interface("Iterable")?;
        b.model
            .add_type_parameter(iterable, "Element", Variance::Covariant)?;
        b.value(iterable, "empty", simple(boolean))?;

        let correspondence = b.interface("Correspondence")?;
        b.model
            .add_type_parameter(correspondence, "Key", Variance::Contravariant)?;
        b.model
            .add_type_parameter(correspondence, "Item", Variance::Covariant)?;

        let empty = b.interface("Empty")?;
        b.satisfies(empty, iterable, vec![ProducedType::Bottom])?;
        b.satisfies(empty, correspondence, vec![simple(natural), ProducedType::Bottom])?;
        b.satisfies(empty, category, vec![])?;

        let sequence = b.interface("Sequence")?;
        let sequence_element = b
            .model
            .add_type_parameter(sequence, "Element", Variance::Covariant)?;
        b.satisfies(sequence, iterable, vec![simple(sequence_element)])?;
        b.satisfies(
            sequence,
            correspondence,
            vec![simple(natural), simple(sequence_element)],
        )?;
        b.satisfies(sequence, category, vec![])?;
        b.value(sequence, "first", simple(sequence_element))?;
        b.value(sequence, "size", simple(natural))?;

        let string = b.class("String", Some(object))?;
        b.satisfies(string, comparable, vec![simple(string)])?;
        b.satisfies(string, summable, vec![simple(string)])?;
        b.satisfies(string, castable, vec![simple(string)])?;
        b.satisfies(string, iterable, vec![simple(character)])?;
        b.satisfies(string, correspondence, vec![simple(natural), simple(character)])?;
        b.satisfies(string, category, vec![])?;
        b.satisfies(string, format, vec![])?;
        b.value(string, "size", simple(natural))?;

        let quoted = b.class("Quoted", Some(object))?;

        let entry = b.class("Entry", Some(object))?;
        let entry_key = b.model.add_type_parameter(entry, "Key", Variance::Covariant)?;
        let entry_item = b
            .model
            .add_type_parameter(entry, "Item", Variance::Covariant)?;
        b.model
            .add_satisfied_type(entry_key, simple(equality))?;
        b.model
            .add_satisfied_type(entry_item, simple(equality))?;
        b.satisfies(entry, equality, vec![])?;
        b.value(entry, "key", simple(entry_key))?;
        b.value(entry, "item", simple(entry_item))?;

        let range = b.class("Range", Some(object))?;
        let range_element = b
            .model
            .add_type_parameter(range, "Element", Variance::Invariant)?;
        b.model.add_satisfied_type(
            range_element,
            ProducedType::declared(comparable, vec![simple(range_element)]),
        )?;
        b.model.add_satisfied_type(
            range_element,
            ProducedType::declared(ordinal, vec![simple(range_element)]),
        )?;
        b.satisfies(range, sequence, vec![simple(range_element)])?;
        b.satisfies(range, category, vec![])?;
        b.value(range, "first", simple(range_element))?;
        b.value(range, "last", simple(range_element))?;

        let exception = b.class("Exception", Some(identifiable_object))?;
        b.value(exception, "message", simple(string))?;
        let description = b.model.add_parameter(
            exception,
            "description",
            ParameterInfo {
                defaulted: true,
                sequenced: false,
            },
        )?;
        b.model.set_type(
            description,
            ProducedType::union([simple(nothing), simple(string)]),
        )?;

        debug!(declarations = model.len(), "language module bootstrapped");

        Ok(Self {
            package,
            void,
            object,
            nothing,
            null,
            identifiable_object,
            equality,
            format,
            boolean,
            true_value,
            false_value,
            comparison,
            comparable,
            summable,
            invertable,
            numeric,
            ordinal,
            integral,
            slots,
            castable,
            natural,
            integer,
            float,
            character,
            string,
            quoted,
            category,
            iterable,
            correspondence,
            empty,
            sequence,
            entry,
            range,
            exception,
        })
    }

    pub fn type_(&self, declaration: DeclId) -> ProducedType {
        ProducedType::simple(declaration)
    }

    pub fn nothing_type(&self) -> ProducedType {
        ProducedType::simple(self.nothing)
    }

    pub fn void_type(&self) -> ProducedType {
        ProducedType::simple(self.void)
    }

    pub fn boolean_type(&self) -> ProducedType {
        ProducedType::simple(self.boolean)
    }

    pub fn empty_type(&self) -> ProducedType {
        ProducedType::simple(self.empty)
    }

    /// `T?`, the union of `T` with the null type
    pub fn optional(&self, ty: ProducedType) -> ProducedType {
        ProducedType::union([self.nothing_type(), ty])
    }

    /// `T` without its null case
    pub fn definite(&self, model: &Model, ty: &ProducedType) -> ProducedType {
        model.minus(ty, self.nothing)
    }

    /// `T` without its null and empty cases
    pub fn nonempty(&self, model: &Model, ty: &ProducedType) -> ProducedType {
        model.minus(&model.minus(ty, self.nothing), self.empty)
    }

    /// Does `ty` admit the null value?
    pub fn is_optional(&self, model: &Model, ty: &ProducedType) -> bool {
        model.is_subtype_of(&self.nothing_type(), ty)
    }

    /// Does `ty` admit the empty sequence?
    pub fn is_possibly_empty(&self, model: &Model, ty: &ProducedType) -> bool {
        model.is_subtype_of(&self.empty_type(), ty)
    }

    pub fn sequence_of(&self, element: ProducedType) -> ProducedType {
        ProducedType::declared(self.sequence, vec![element])
    }

    /// `Empty | Sequence<T>`, the type of a sequenced parameter
    pub fn possibly_empty_sequence_of(&self, element: ProducedType) -> ProducedType {
        ProducedType::union([self.empty_type(), self.sequence_of(element)])
    }

    pub fn iterable_of(&self, element: ProducedType) -> ProducedType {
        ProducedType::declared(self.iterable, vec![element])
    }

    pub fn entry_of(&self, key: ProducedType, item: ProducedType) -> ProducedType {
        ProducedType::declared(self.entry, vec![key, item])
    }

    pub fn range_of(&self, element: ProducedType) -> ProducedType {
        ProducedType::declared(self.range, vec![element])
    }

    pub fn castable_of(&self, types: ProducedType) -> ProducedType {
        ProducedType::declared(self.castable, vec![types])
    }

    pub fn comparable_of(&self, other: ProducedType) -> ProducedType {
        ProducedType::declared(self.comparable, vec![other])
    }

    /// The single type argument of `ty`'s view as an iterable, if it has
    /// one
    pub fn iterated_type(&self, model: &Model, ty: &ProducedType) -> Option<ProducedType> {
        single_argument(model.supertype(ty, self.iterable)?)
    }

    /// Element type of a sequenced parameter type: the argument of its
    /// nonempty part's view as a sequence
    pub fn sequenced_element_type(&self, model: &Model, ty: &ProducedType) -> Option<ProducedType> {
        let nonempty = model.minus(ty, self.empty);
        single_argument(model.supertype(&nonempty, self.sequence)?)
    }
}

fn single_argument(view: ProducedType) -> Option<ProducedType> {
    match view.arguments() {
        [argument] => Some(argument.clone()),
        _ => None,
    }
}
