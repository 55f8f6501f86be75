//! Type inference for declarations without an annotation
//!
//! Types come from the immediate context only: a specifier, a narrowing
//! condition, an iterated source or the returns of a body. Every rule
//! writes through the model's single-assignment slot, so a declaration
//! reached again while its type is being derived keeps the first result.

use tern_model::{DeclId, LanguageModule, Model, ProducedType, TypeQuery};
use tracing::debug;

pub struct InferenceEngine<'m> {
    model: &'m Model,
    lang: &'m LanguageModule,
    max_depth: usize,
}

impl<'m> InferenceEngine<'m> {
    pub fn new(model: &'m Model, lang: &'m LanguageModule, max_depth: usize) -> Self {
        Self {
            model,
            lang,
            max_depth,
        }
    }

    /// A fresh memoizing query; dropped by the caller once answered
    pub fn query(&self) -> TypeQuery<'m> {
        TypeQuery::new(self.model).with_max_depth(self.max_depth)
    }

    pub fn is_subtype(&self, ty: &ProducedType, other: &ProducedType) -> bool {
        self.query().is_subtype(ty, other)
    }

    pub fn supertype(&self, ty: &ProducedType, target: DeclId) -> Option<ProducedType> {
        self.query().supertype(ty, target)
    }

    pub fn is_optional(&self, ty: &ProducedType) -> bool {
        self.is_subtype(&self.lang.nothing_type(), ty)
    }

    pub fn is_possibly_empty(&self, ty: &ProducedType) -> bool {
        self.is_subtype(&self.lang.empty_type(), ty)
    }

    /// Fold one more returned type into a body's inferred return type.
    /// The fold starts at `Bottom`; a type already covered is absorbed.
    pub fn merge_return(&self, accumulated: &ProducedType, returned: &ProducedType) -> ProducedType {
        if self.is_subtype(accumulated, returned) {
            returned.clone()
        } else if self.is_subtype(returned, accumulated) {
            accumulated.clone()
        } else {
            ProducedType::union([accumulated.clone(), returned.clone()])
        }
    }

    /// The narrowed type of an `exists` variable, if the source is optional
    pub fn exists_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        self.is_optional(ty)
            .then(|| self.lang.definite(self.model, ty))
    }

    /// The narrowed type of a `nonempty` variable, if the source may be
    /// empty
    pub fn nonempty_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        self.is_possibly_empty(ty)
            .then(|| self.lang.nonempty(self.model, ty))
    }

    /// Element type of an iterated source
    pub fn iterated_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        match self.supertype(ty, self.lang.iterable)?.arguments() {
            [element] => Some(element.clone()),
            _ => None,
        }
    }

    /// Key and item types of an entry-typed element
    pub fn entry_types(&self, element: &ProducedType) -> Option<(ProducedType, ProducedType)> {
        match self.supertype(element, self.lang.entry)?.arguments() {
            [key, item] => Some((key.clone(), item.clone())),
            _ => None,
        }
    }

    /// Record an inferred type unless the declaration already has one
    pub fn infer(&self, declaration: DeclId, ty: ProducedType) -> bool {
        let shown = self.model.display(&ty).to_string();
        let inferred = self.model.infer_type(declaration, ty);
        if inferred {
            debug!(
                declaration = self.model[declaration].name(),
                ty = %shown,
                "inferred declaration type"
            );
        }
        inferred
    }
}
