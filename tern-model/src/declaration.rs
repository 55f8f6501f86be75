//! Declarations in the scope tree
//!
//! Every named entity (package, class, interface, type parameter, value,
//! getter, function, parameter) is a [`Declaration`] stored in the
//! [`Model`](crate::Model) arena and addressed by a [`DeclId`]. Declarations
//! form a tree through their container links.

use crate::produced_type::ProducedType;
use indexmap::IndexMap;
use std::fmt;
use std::sync::OnceLock;

/// Arena index of a declaration inside one [`Model`](crate::Model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// Declaration-site variance of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variance {
    Covariant,
    Contravariant,
    #[default]
    Invariant,
}

/// Constraints carried by a type parameter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeParameterInfo {
    pub variance: Variance,
    /// Upper bounds (`given T satisfies ...`), may mention sibling parameters
    pub satisfied_types: Vec<ProducedType>,
    /// Closed enumeration of admissible arguments (`given T of A | B`)
    pub case_types: Vec<ProducedType>,
    /// Implementors must pass their own type for this parameter
    pub self_type: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassInfo {
    pub extended_type: Option<ProducedType>,
    pub satisfied_types: Vec<ProducedType>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceInfo {
    pub satisfied_types: Vec<ProducedType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterInfo {
    pub defaulted: bool,
    pub sequenced: bool,
}

/// What kind of entity a declaration names
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Package,
    Class(ClassInfo),
    Interface(InterfaceInfo),
    TypeParameter(TypeParameterInfo),
    /// Attribute or local value; `getter` marks a computed attribute
    Value { getter: bool },
    /// Method or toplevel function
    Function,
    Parameter(ParameterInfo),
}

/// Ordered parameters of one parameter list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    pub parameters: Vec<DeclId>,
}

impl ParameterList {
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    id: DeclId,
    name: String,
    container: Option<DeclId>,
    pub kind: DeclarationKind,
    pub shared: bool,
    pub formal: bool,
    pub variable: bool,
    pub(crate) type_parameters: Vec<DeclId>,
    pub(crate) parameter_lists: Vec<ParameterList>,
    pub(crate) members: IndexMap<String, DeclId>,
    declared_type: OnceLock<ProducedType>,
}

impl Declaration {
    pub(crate) fn new(
        id: DeclId,
        name: impl Into<String>,
        container: Option<DeclId>,
        kind: DeclarationKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            container,
            kind,
            shared: false,
            formal: false,
            variable: false,
            type_parameters: Vec::new(),
            parameter_lists: Vec::new(),
            members: IndexMap::new(),
            declared_type: OnceLock::new(),
        }
    }

    pub fn id(&self) -> DeclId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> Option<DeclId> {
        self.container
    }

    pub fn type_parameters(&self) -> &[DeclId] {
        &self.type_parameters
    }

    pub fn parameter_lists(&self) -> &[ParameterList] {
        &self.parameter_lists
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, DeclId)> {
        self.members.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn own_member(&self, name: &str) -> Option<DeclId> {
        self.members.get(name).copied()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, DeclarationKind::Package)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, DeclarationKind::Class(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, DeclarationKind::Interface(_))
    }

    pub fn is_class_or_interface(&self) -> bool {
        self.is_class() || self.is_interface()
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self.kind, DeclarationKind::TypeParameter(_))
    }

    /// Classes, interfaces and type parameters
    pub fn is_type_declaration(&self) -> bool {
        self.is_class_or_interface() || self.is_type_parameter()
    }

    /// Values, getters, functions and parameters
    pub fn is_typed(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Value { .. } | DeclarationKind::Function | DeclarationKind::Parameter(_)
        )
    }

    /// Values, getters and parameters: the things an assignment may target
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Value { .. } | DeclarationKind::Parameter(_)
        )
    }

    pub fn is_getter(&self) -> bool {
        matches!(self.kind, DeclarationKind::Value { getter: true })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclarationKind::Function)
    }

    /// Functions and classes may be invoked
    pub fn is_functional(&self) -> bool {
        self.is_function() || self.is_class()
    }

    pub fn type_parameter_info(&self) -> Option<&TypeParameterInfo> {
        match &self.kind {
            DeclarationKind::TypeParameter(info) => Some(info),
            _ => None,
        }
    }

    pub fn parameter_info(&self) -> Option<ParameterInfo> {
        match &self.kind {
            DeclarationKind::Parameter(info) => Some(*info),
            _ => None,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.parameter_info().is_some_and(|p| p.defaulted)
    }

    pub fn is_sequenced(&self) -> bool {
        self.parameter_info().is_some_and(|p| p.sequenced)
    }

    pub fn is_self_type(&self) -> bool {
        self.type_parameter_info().is_some_and(|tp| tp.self_type)
    }

    pub fn extended_type(&self) -> Option<&ProducedType> {
        match &self.kind {
            DeclarationKind::Class(info) => info.extended_type.as_ref(),
            _ => None,
        }
    }

    /// Satisfied interfaces, or the upper bounds of a type parameter
    pub fn satisfied_types(&self) -> &[ProducedType] {
        match &self.kind {
            DeclarationKind::Class(info) => &info.satisfied_types,
            DeclarationKind::Interface(info) => &info.satisfied_types,
            DeclarationKind::TypeParameter(info) => &info.satisfied_types,
            _ => &[],
        }
    }

    pub fn case_types(&self) -> &[ProducedType] {
        match &self.kind {
            DeclarationKind::TypeParameter(info) => &info.case_types,
            _ => &[],
        }
    }

    /// Extended type followed by satisfied types, in declaration order
    pub fn declared_supertypes(&self) -> impl Iterator<Item = &ProducedType> {
        self.extended_type()
            .into_iter()
            .chain(self.satisfied_types().iter())
    }

    /// The annotated or inferred type of a typed declaration, once known
    pub fn declared_type(&self) -> Option<&ProducedType> {
        self.declared_type.get()
    }

    /// Freeze the type slot; returns `false` when it was already set
    pub(crate) fn set_type(&self, ty: ProducedType) -> bool {
        self.declared_type.set(ty).is_ok()
    }
}
