//! Produced references: a member or type declaration seen through a
//! qualifying type and explicit or inferred type arguments

use crate::declaration::DeclId;
use crate::model::Model;
use crate::produced_type::{ProducedType, Substitution};

#[derive(Debug, Clone, PartialEq)]
pub struct ProducedReference {
    pub declaration: DeclId,
    pub qualifying_type: Option<ProducedType>,
    pub type_arguments: Vec<ProducedType>,
    substitution: Substitution,
}

impl ProducedReference {
    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// The type of the referenced declaration under this reference's
    /// bindings: a produced type for type declarations, the substituted
    /// declared type for typed ones. `None` while a typed declaration's
    /// type has not been determined.
    pub fn type_(&self, model: &Model) -> Option<ProducedType> {
        let declaration = &model[self.declaration];
        if declaration.is_type_declaration() {
            return Some(ProducedType::declared(
                self.declaration,
                self.type_arguments.clone(),
            ));
        }
        declaration
            .declared_type()
            .map(|ty| ty.substitute(&self.substitution))
    }

    /// The declared type of one of the referenced function's parameters,
    /// with this reference's bindings applied
    pub fn typed_parameter(&self, model: &Model, parameter: DeclId) -> Option<ProducedType> {
        model
            .declared_type(parameter)
            .map(|ty| ty.substitute(&self.substitution))
    }

    /// Apply this reference's bindings to an arbitrary type mentioning the
    /// declaration's type parameters
    pub fn apply(&self, ty: &ProducedType) -> ProducedType {
        ty.substitute(&self.substitution)
    }
}

impl Model {
    /// Build a reference to `declaration`. Type parameters of the
    /// enclosing type come from the qualifying type's view of that type;
    /// the declaration's own type parameters are bound to `type_arguments`.
    pub fn produced_reference(
        &self,
        declaration: DeclId,
        qualifying_type: Option<&ProducedType>,
        type_arguments: Vec<ProducedType>,
    ) -> ProducedReference {
        let mut substitution =
            Substitution::from_arguments(self[declaration].type_parameters(), &type_arguments);
        if let (Some(qualifying), Some(container)) =
            (qualifying_type, self.declaring_type(declaration))
        {
            if let Some(view) = self.supertype(qualifying, container) {
                substitution.extend(&Substitution::from_arguments(
                    self[container].type_parameters(),
                    view.arguments(),
                ));
            }
        }
        ProducedReference {
            declaration,
            qualifying_type: qualifying_type.cloned(),
            type_arguments,
            substitution,
        }
    }
}
