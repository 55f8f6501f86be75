//! The declaration arena
//!
//! [`Model`] owns every declaration of a program, including the built-in
//! language module. Declarations are created once through the `add_*`
//! builders and read through shared references afterwards; the only state
//! written during checking is the set-once type slot of each declaration.

use crate::declaration::{
    ClassInfo, DeclId, Declaration, DeclarationKind, InterfaceInfo, ParameterInfo, ParameterList,
    TypeParameterInfo, Variance,
};
use crate::error::{ModelError, ModelResult};
use crate::produced_type::ProducedType;
use std::fmt;
use std::ops::Index;

#[derive(Debug, Clone, Default)]
pub struct Model {
    declarations: Vec<Declaration>,
    root: Option<DeclId>,
}

impl Index<DeclId> for Model {
    type Output = Declaration;

    fn index(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.index()]
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, id: DeclId) -> ModelResult<&Declaration> {
        self.declarations
            .get(id.index())
            .ok_or(ModelError::UnknownDeclaration { id })
    }

    fn get_mut(&mut self, id: DeclId) -> ModelResult<&mut Declaration> {
        self.declarations
            .get_mut(id.index())
            .ok_or(ModelError::UnknownDeclaration { id })
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// The root of the declared hierarchy, a supertype of every declared type
    pub fn root(&self) -> Option<DeclId> {
        self.root
    }

    pub fn set_root(&mut self, root: DeclId) -> ModelResult<()> {
        self.get(root)?;
        self.root = Some(root);
        Ok(())
    }

    // --- construction -------------------------------------------------

    fn push(
        &mut self,
        container: Option<DeclId>,
        name: &str,
        kind: DeclarationKind,
    ) -> ModelResult<DeclId> {
        if let Some(container) = container {
            self.get(container)?;
        }
        let id = DeclId::new(self.declarations.len());
        self.declarations
            .push(Declaration::new(id, name, container, kind));
        Ok(id)
    }

    fn push_member(
        &mut self,
        container: DeclId,
        name: &str,
        kind: DeclarationKind,
    ) -> ModelResult<DeclId> {
        let id = self.push(Some(container), name, kind)?;
        self.get_mut(container)?.members.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn add_package(&mut self, name: &str) -> DeclId {
        let id = DeclId::new(self.declarations.len());
        self.declarations
            .push(Declaration::new(id, name, None, DeclarationKind::Package));
        id
    }

    pub fn add_class(&mut self, container: DeclId, name: &str) -> ModelResult<DeclId> {
        self.push_member(container, name, DeclarationKind::Class(ClassInfo::default()))
    }

    pub fn add_interface(&mut self, container: DeclId, name: &str) -> ModelResult<DeclId> {
        self.push_member(
            container,
            name,
            DeclarationKind::Interface(InterfaceInfo::default()),
        )
    }

    pub fn add_value(&mut self, container: DeclId, name: &str) -> ModelResult<DeclId> {
        self.push_member(container, name, DeclarationKind::Value { getter: false })
    }

    pub fn add_getter(&mut self, container: DeclId, name: &str) -> ModelResult<DeclId> {
        self.push_member(container, name, DeclarationKind::Value { getter: true })
    }

    pub fn add_function(&mut self, container: DeclId, name: &str) -> ModelResult<DeclId> {
        self.push_member(container, name, DeclarationKind::Function)
    }

    /// Type parameters are scoped to their generic declaration but are not
    /// members of it
    pub fn add_type_parameter(
        &mut self,
        generic: DeclId,
        name: &str,
        variance: Variance,
    ) -> ModelResult<DeclId> {
        let info = TypeParameterInfo {
            variance,
            ..TypeParameterInfo::default()
        };
        let id = self.push(Some(generic), name, DeclarationKind::TypeParameter(info))?;
        self.get_mut(generic)?.type_parameters.push(id);
        Ok(id)
    }

    /// Open a new parameter list on a function or class, returning its index
    pub fn add_parameter_list(&mut self, functional: DeclId) -> ModelResult<usize> {
        let declaration = self.get_mut(functional)?;
        if !declaration.is_functional() {
            return Err(ModelError::WrongKind {
                name: declaration.name().to_string(),
                expected: "a function or class",
            });
        }
        declaration.parameter_lists.push(ParameterList::default());
        Ok(declaration.parameter_lists.len() - 1)
    }

    /// Append a parameter to the last parameter list of `functional`,
    /// opening the first list if there is none yet
    pub fn add_parameter(
        &mut self,
        functional: DeclId,
        name: &str,
        info: ParameterInfo,
    ) -> ModelResult<DeclId> {
        if self.get(functional)?.parameter_lists.is_empty() {
            self.add_parameter_list(functional)?;
        }
        let id = self.push(Some(functional), name, DeclarationKind::Parameter(info))?;
        if let Some(list) = self.get_mut(functional)?.parameter_lists.last_mut() {
            list.parameters.push(id);
        }
        Ok(id)
    }

    pub fn set_extended_type(&mut self, class: DeclId, ty: ProducedType) -> ModelResult<()> {
        let declaration = self.get_mut(class)?;
        match &mut declaration.kind {
            DeclarationKind::Class(info) => {
                info.extended_type = Some(ty);
                Ok(())
            }
            _ => Err(ModelError::WrongKind {
                name: declaration.name().to_string(),
                expected: "a class",
            }),
        }
    }

    /// Satisfied interface of a class or interface, or an upper bound of a
    /// type parameter
    pub fn add_satisfied_type(&mut self, id: DeclId, ty: ProducedType) -> ModelResult<()> {
        let declaration = self.get_mut(id)?;
        match &mut declaration.kind {
            DeclarationKind::Class(ClassInfo {
                satisfied_types, ..
            })
            | DeclarationKind::Interface(InterfaceInfo { satisfied_types })
            | DeclarationKind::TypeParameter(TypeParameterInfo {
                satisfied_types, ..
            }) => {
                satisfied_types.push(ty);
                Ok(())
            }
            _ => Err(ModelError::WrongKind {
                name: declaration.name().to_string(),
                expected: "a type declaration",
            }),
        }
    }

    fn type_parameter_mut(&mut self, id: DeclId) -> ModelResult<&mut TypeParameterInfo> {
        let declaration = self.get_mut(id)?;
        let name = declaration.name().to_string();
        match &mut declaration.kind {
            DeclarationKind::TypeParameter(info) => Ok(info),
            _ => Err(ModelError::WrongKind {
                name,
                expected: "a type parameter",
            }),
        }
    }

    pub fn add_case_type(&mut self, type_parameter: DeclId, ty: ProducedType) -> ModelResult<()> {
        self.type_parameter_mut(type_parameter)?.case_types.push(ty);
        Ok(())
    }

    pub fn set_self_type(&mut self, type_parameter: DeclId, self_type: bool) -> ModelResult<()> {
        self.type_parameter_mut(type_parameter)?.self_type = self_type;
        Ok(())
    }

    pub fn set_abstract(&mut self, class: DeclId, is_abstract: bool) -> ModelResult<()> {
        let declaration = self.get_mut(class)?;
        match &mut declaration.kind {
            DeclarationKind::Class(info) => {
                info.is_abstract = is_abstract;
                Ok(())
            }
            _ => Err(ModelError::WrongKind {
                name: declaration.name().to_string(),
                expected: "a class",
            }),
        }
    }

    pub fn set_shared(&mut self, id: DeclId, shared: bool) -> ModelResult<()> {
        self.get_mut(id)?.shared = shared;
        Ok(())
    }

    pub fn set_formal(&mut self, id: DeclId, formal: bool) -> ModelResult<()> {
        self.get_mut(id)?.formal = formal;
        Ok(())
    }

    pub fn set_variable(&mut self, id: DeclId, variable: bool) -> ModelResult<()> {
        self.get_mut(id)?.variable = variable;
        Ok(())
    }

    /// Record the annotated type of a typed declaration
    pub fn set_type(&self, id: DeclId, ty: ProducedType) -> ModelResult<()> {
        let declaration = self.get(id)?;
        if declaration.set_type(ty) {
            Ok(())
        } else {
            Err(ModelError::TypeAlreadySet {
                name: declaration.name().to_string(),
            })
        }
    }

    /// Single-assignment inference: writes the type only when the slot is
    /// still empty. Returns whether this call set it.
    pub fn infer_type(&self, id: DeclId, ty: ProducedType) -> bool {
        self.declarations
            .get(id.index())
            .is_some_and(|declaration| declaration.set_type(ty))
    }

    // --- types ---------------------------------------------------------

    /// The declaration applied to its own type parameters
    pub fn type_of(&self, id: DeclId) -> ProducedType {
        ProducedType::declared(
            id,
            self[id]
                .type_parameters
                .iter()
                .map(|tp| ProducedType::simple(*tp))
                .collect(),
        )
    }

    /// `None` for untyped declarations and for ids this model never issued
    pub fn declared_type(&self, id: DeclId) -> Option<&ProducedType> {
        self.declarations
            .get(id.index())
            .and_then(|declaration| declaration.declared_type())
    }

    pub fn display<'a>(&'a self, ty: &'a ProducedType) -> TypeDisplay<'a> {
        TypeDisplay { model: self, ty }
    }

    // --- scopes ----------------------------------------------------------

    /// Resolve a simple name from `scope` outward through its containers.
    /// At each level: members, parameters, type parameters, then members
    /// inherited by a class or interface.
    pub fn lookup(&self, scope: DeclId, name: &str) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let declaration = &self[id];
            if let Some(found) = declaration.own_member(name) {
                return Some(found);
            }
            let parameter = declaration
                .parameter_lists
                .iter()
                .flat_map(|list| list.parameters.iter())
                .chain(declaration.type_parameters.iter())
                .find(|p| self[**p].name() == name);
            if let Some(found) = parameter {
                return Some(*found);
            }
            if declaration.is_class_or_interface() {
                if let Some(found) = self.member(id, name) {
                    return Some(found);
                }
            }
            current = declaration.container();
        }
        // The language module is imported implicitly.
        self.root
            .and_then(|root| self[root].container())
            .and_then(|package| self[package].own_member(name))
    }

    /// A member of a type declaration, own members first, then members of
    /// its supertypes in declaration order
    pub fn member(&self, type_declaration: DeclId, name: &str) -> Option<DeclId> {
        let mut visited = Vec::new();
        self.find_member(type_declaration, name, &mut visited)
    }

    fn find_member(&self, id: DeclId, name: &str, visited: &mut Vec<DeclId>) -> Option<DeclId> {
        if visited.contains(&id) {
            return None;
        }
        visited.push(id);
        let declaration = &self[id];
        if let Some(found) = declaration.own_member(name) {
            return Some(found);
        }
        let supertypes: Vec<DeclId> = declaration
            .declared_supertypes()
            .flat_map(|ty| ty.cases().iter().filter_map(ProducedType::declaration))
            .collect();
        supertypes
            .into_iter()
            .find_map(|supertype| self.find_member(supertype, name, visited))
            .or_else(|| {
                self.root
                    .filter(|root| *root != id)
                    .and_then(|root| self.find_member(root, name, visited))
            })
    }

    /// A member of an arbitrary produced type. Union receivers must resolve
    /// every case to the same declaration.
    pub fn member_of_type(&self, ty: &ProducedType, name: &str) -> Option<DeclId> {
        match ty {
            ProducedType::Declared { declaration, .. } => self.member(*declaration, name),
            ProducedType::Union(cases) => {
                let mut found = None;
                for case in cases {
                    let member = self.member_of_type(case, name)?;
                    if found.is_some_and(|f| f != member) {
                        return None;
                    }
                    found = Some(member);
                }
                found
            }
            ProducedType::Intersection(members) => members
                .iter()
                .find_map(|member| self.member_of_type(member, name)),
            ProducedType::Bottom | ProducedType::Unknown => None,
        }
    }

    /// Is `inner` the scope `outer` or nested inside it?
    pub fn contains_scope(&self, outer: DeclId, inner: DeclId) -> bool {
        let mut current = Some(inner);
        while let Some(id) = current {
            if id == outer {
                return true;
            }
            current = self[id].container();
        }
        false
    }

    /// Is `declaration` declared directly in `scope` or one of the scopes
    /// enclosing it?
    pub fn is_defined_in_scope(&self, declaration: DeclId, scope: DeclId) -> bool {
        self[declaration]
            .container()
            .is_some_and(|container| self.contains_scope(container, scope))
    }

    pub fn is_toplevel(&self, id: DeclId) -> bool {
        self[id]
            .container()
            .is_none_or(|container| self[container].is_package())
    }

    /// The nearest class or interface that is `scope` or encloses it
    pub fn containing_class_or_interface(&self, scope: DeclId) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self[id].is_class_or_interface() {
                return Some(id);
            }
            current = self[id].container();
        }
        None
    }

    /// The class or interface enclosing the nearest one, as seen by `outer`
    pub fn outer_class_or_interface(&self, scope: DeclId) -> Option<DeclId> {
        let inner = self.containing_class_or_interface(scope)?;
        self[inner]
            .container()
            .and_then(|container| self.containing_class_or_interface(container))
    }

    /// The class or interface a member belongs to, if any
    pub fn declaring_type(&self, member: DeclId) -> Option<DeclId> {
        self[member]
            .container()
            .filter(|container| self[*container].is_type_declaration())
    }

    // --- visibility -----------------------------------------------------

    /// The scope a declaration is visible within; `None` means everywhere
    pub fn visible_scope(&self, id: DeclId) -> Option<DeclId> {
        let declaration = &self[id];
        let container = declaration.container()?;
        if declaration.is_type_parameter() {
            return Some(container);
        }
        if !declaration.shared {
            return Some(container);
        }
        if self[container].is_package() {
            None
        } else {
            self.visible_scope(container)
        }
    }

    pub fn is_visible_from(&self, id: DeclId, scope: DeclId) -> bool {
        self.visible_scope(id)
            .is_none_or(|visible| self.contains_scope(visible, scope))
    }

    /// Is every class and interface named inside `ty` visible wherever
    /// `member` is visible? Type parameters are always in scope.
    pub fn is_completely_visible(&self, member: DeclId, ty: &ProducedType) -> bool {
        let member_scope = self.visible_scope(member);
        ty.referenced_declarations().into_iter().all(|declaration| {
            if self[declaration].is_type_parameter() {
                return true;
            }
            match (self.visible_scope(declaration), member_scope) {
                (None, _) => true,
                (Some(_), None) => false,
                (Some(type_scope), Some(member_scope)) => {
                    self.contains_scope(type_scope, member_scope)
                }
            }
        })
    }
}

/// Renders a produced type with declaration names
pub struct TypeDisplay<'a> {
    model: &'a Model,
    ty: &'a ProducedType,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.model, self.ty, f)
    }
}

fn write_type(model: &Model, ty: &ProducedType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        ProducedType::Declared {
            declaration,
            arguments,
        } => {
            let name = model
                .get(*declaration)
                .map(Declaration::name)
                .unwrap_or("<unknown declaration>");
            write!(f, "{name}")?;
            if !arguments.is_empty() {
                write!(f, "<")?;
                write_joined(model, arguments, ", ", f)?;
                write!(f, ">")?;
            }
            Ok(())
        }
        ProducedType::Union(cases) => write_joined(model, cases, "|", f),
        ProducedType::Intersection(members) if members.is_empty() => write!(f, "Void"),
        ProducedType::Intersection(members) => write_joined(model, members, "&", f),
        ProducedType::Bottom => write!(f, "Bottom"),
        ProducedType::Unknown => write!(f, "unknown"),
    }
}

fn write_joined(
    model: &Model,
    types: &[ProducedType],
    separator: &str,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            write!(f, "{separator}")?;
        }
        write_type(model, ty, f)?;
    }
    Ok(())
}
