//! Supertype and subtype queries
//!
//! A [`TypeQuery`] borrows the model and memoizes supertype searches per
//! `(type, declaration)` pair for its own lifetime. Checkers create one per
//! unit of work and drop it afterwards; nothing is cached across queries.

use crate::declaration::{DeclId, Variance};
use crate::model::Model;
use crate::produced_type::{ProducedType, Substitution};
use std::collections::HashMap;
use tracing::trace;

pub const DEFAULT_MAX_SUPERTYPE_DEPTH: usize = 64;

pub struct TypeQuery<'m> {
    model: &'m Model,
    memo: HashMap<(ProducedType, DeclId), Option<ProducedType>>,
    depth: usize,
    max_depth: usize,
    /// Set when a search below the current frame hit `max_depth`
    truncated: bool,
}

impl<'m> TypeQuery<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            memo: HashMap::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_SUPERTYPE_DEPTH,
            truncated: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// The produced form of `target` that is a supertype of `ty`, with type
    /// arguments substituted along the inheritance path
    pub fn supertype(&mut self, ty: &ProducedType, target: DeclId) -> Option<ProducedType> {
        match ty {
            ProducedType::Declared { declaration, .. } => {
                if *declaration == target {
                    return Some(ty.clone());
                }
                let key = (ty.clone(), target);
                if let Some(cached) = self.memo.get(&key) {
                    trace!(target_decl = %target, "supertype cache hit");
                    return cached.clone();
                }
                if self.depth >= self.max_depth {
                    trace!(target_decl = %target, depth = self.depth, "supertype search cut off");
                    self.truncated = true;
                    return None;
                }
                // Seed the entry so a cyclic hierarchy terminates.
                self.memo.insert(key.clone(), None);
                let outer_truncated = std::mem::replace(&mut self.truncated, false);
                self.depth += 1;
                let result = self.declared_supertype(ty, *declaration, target);
                self.depth -= 1;
                if self.truncated {
                    // Only a shallower search may answer this pair.
                    self.memo.remove(&key);
                } else {
                    self.memo.insert(key, result.clone());
                }
                self.truncated |= outer_truncated;
                result
            }
            ProducedType::Union(cases) => {
                let mut views = Vec::with_capacity(cases.len());
                for case in cases {
                    views.push(self.supertype(case, target)?);
                }
                self.join_views(target, views, false)
            }
            ProducedType::Intersection(members) => {
                let views: Vec<ProducedType> = members
                    .iter()
                    .filter_map(|member| self.supertype(member, target))
                    .collect();
                if views.is_empty() {
                    return None;
                }
                self.join_views(target, views, true)
            }
            ProducedType::Bottom | ProducedType::Unknown => None,
        }
    }

    fn declared_supertype(
        &mut self,
        ty: &ProducedType,
        declaration: DeclId,
        target: DeclId,
    ) -> Option<ProducedType> {
        let model = self.model;
        let decl = &model[declaration];
        let substitution = Substitution::from_arguments(decl.type_parameters(), ty.arguments());
        let supertypes: Vec<ProducedType> = decl
            .declared_supertypes()
            .map(|st| st.substitute(&substitution))
            .collect();
        for supertype in &supertypes {
            if let Some(found) = self.supertype(supertype, target) {
                return Some(found);
            }
        }
        if model.root() == Some(target) {
            return Some(ProducedType::simple(target));
        }
        None
    }

    /// Combine per-case views of one generic declaration. A join (union
    /// receiver) unions covariant and intersects contravariant arguments;
    /// a meet (intersection receiver) does the opposite. Differing
    /// invariant arguments have no join.
    fn join_views(
        &mut self,
        target: DeclId,
        mut views: Vec<ProducedType>,
        meet: bool,
    ) -> Option<ProducedType> {
        if views.len() == 1 {
            return views.pop();
        }
        let first = views.first()?.clone();
        let parameters = self.model[target].type_parameters().to_vec();
        let mut arguments = Vec::with_capacity(first.arguments().len());
        for (index, argument) in first.arguments().iter().enumerate() {
            let column: Vec<ProducedType> = views
                .iter()
                .map(|view| {
                    view.arguments()
                        .get(index)
                        .cloned()
                        .unwrap_or(ProducedType::Unknown)
                })
                .collect();
            if column.iter().all(|a| a.is_exactly(argument)) {
                arguments.push(argument.clone());
                continue;
            }
            let variance = parameters
                .get(index)
                .and_then(|p| self.model[*p].type_parameter_info())
                .map(|info| info.variance)
                .unwrap_or_default();
            let joined = match (variance, meet) {
                (Variance::Covariant, false) | (Variance::Contravariant, true) => {
                    ProducedType::union(column)
                }
                (Variance::Covariant, true) | (Variance::Contravariant, false) => {
                    ProducedType::intersection(column)
                }
                (Variance::Invariant, true) => argument.clone(),
                (Variance::Invariant, false) => return None,
            };
            arguments.push(joined);
        }
        Some(ProducedType::declared(target, arguments))
    }

    pub fn is_subtype(&mut self, ty: &ProducedType, other: &ProducedType) -> bool {
        self.is_subtype_within(ty, other, None)
    }

    /// Subtyping with self-type parameters in `other` resolved against
    /// `containing`
    pub fn is_subtype_within(
        &mut self,
        ty: &ProducedType,
        other: &ProducedType,
        containing: Option<&ProducedType>,
    ) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        let result = self.subtype_inner(ty, other, containing);
        self.depth -= 1;
        result
    }

    fn subtype_inner(
        &mut self,
        ty: &ProducedType,
        other: &ProducedType,
        containing: Option<&ProducedType>,
    ) -> bool {
        use ProducedType::*;
        match (ty, other) {
            (Unknown, _) | (_, Unknown) | (Bottom, _) => true,
            (_, Bottom) => false,
            (Union(cases), _) => cases
                .iter()
                .all(|case| self.is_subtype_within(case, other, containing)),
            (_, Intersection(members)) => members
                .iter()
                .all(|member| self.is_subtype_within(ty, member, containing)),
            (_, Union(cases)) => {
                cases
                    .iter()
                    .any(|case| self.is_subtype_within(ty, case, containing))
                    || self.cases_are_subtypes(ty, other, containing)
                    || match ty {
                        Intersection(members) => members
                            .iter()
                            .any(|member| self.is_subtype_within(member, other, containing)),
                        _ => false,
                    }
            }
            (Intersection(members), Declared { .. }) => members
                .iter()
                .any(|member| self.is_subtype_within(member, other, containing)),
            (Declared { .. }, Declared { .. }) => self.declared_subtype(ty, other, containing),
        }
    }

    /// A type parameter with an enumerated case list is a subtype of
    /// whatever every one of its cases is a subtype of
    fn cases_are_subtypes(
        &mut self,
        ty: &ProducedType,
        other: &ProducedType,
        containing: Option<&ProducedType>,
    ) -> bool {
        let Some(declaration) = ty.declaration() else {
            return false;
        };
        let cases = self.model[declaration].case_types().to_vec();
        !cases.is_empty()
            && cases
                .iter()
                .all(|case| self.is_subtype_within(case, other, containing))
    }

    fn declared_subtype(
        &mut self,
        ty: &ProducedType,
        other: &ProducedType,
        containing: Option<&ProducedType>,
    ) -> bool {
        let Some(target) = other.declaration() else {
            return false;
        };
        let model = self.model;
        if model.root() == Some(target) {
            return true;
        }
        if let Some(containing) = containing {
            if model[target].is_self_type() && !ty.is_exactly(other) {
                return self.is_subtype_within(ty, containing, None);
            }
        }
        let Some(view) = self.supertype(ty, target) else {
            return self.cases_are_subtypes(ty, other, containing);
        };
        let parameters = model[target].type_parameters().to_vec();
        view.arguments()
            .iter()
            .zip(other.arguments())
            .enumerate()
            .all(|(index, (actual, required))| {
                let variance = parameters
                    .get(index)
                    .and_then(|p| model[*p].type_parameter_info())
                    .map(|info| info.variance)
                    .unwrap_or_default();
                match variance {
                    Variance::Covariant => self.is_subtype_within(actual, required, containing),
                    Variance::Contravariant => {
                        self.is_subtype_within(required, actual, containing)
                    }
                    Variance::Invariant => {
                        actual.is_exactly(required)
                            || (self.is_subtype_within(actual, required, containing)
                                && self.is_subtype_within(required, actual, containing))
                    }
                }
            })
    }

    /// Remove the cases produced from `declaration`
    pub fn minus(&self, ty: &ProducedType, declaration: DeclId) -> ProducedType {
        match ty {
            ProducedType::Declared { declaration: d, .. } if *d == declaration => {
                ProducedType::Bottom
            }
            ProducedType::Union(cases) => {
                ProducedType::union(cases.iter().map(|case| self.minus(case, declaration)))
            }
            other => other.clone(),
        }
    }

    /// Every supertype reachable from a declared type, along every path,
    /// the type itself first. Used to spot a supertype inherited twice
    /// with different arguments.
    pub fn all_supertypes(&mut self, ty: &ProducedType) -> Vec<ProducedType> {
        let mut found = Vec::new();
        self.collect_supertypes(ty, &mut found, 0);
        found
    }

    fn collect_supertypes(&mut self, ty: &ProducedType, found: &mut Vec<ProducedType>, depth: usize) {
        if depth >= self.max_depth {
            return;
        }
        let Some(declaration) = ty.declaration() else {
            return;
        };
        if found.iter().any(|seen| seen.is_exactly(ty)) {
            return;
        }
        found.push(ty.clone());
        let model = self.model;
        let decl = &model[declaration];
        if decl.is_type_parameter() {
            return;
        }
        let substitution = Substitution::from_arguments(decl.type_parameters(), ty.arguments());
        let supertypes: Vec<ProducedType> = decl
            .declared_supertypes()
            .map(|st| st.substitute(&substitution))
            .collect();
        for supertype in &supertypes {
            self.collect_supertypes(supertype, found, depth + 1);
        }
    }
}

impl Model {
    pub fn query(&self) -> TypeQuery<'_> {
        TypeQuery::new(self)
    }

    pub fn supertype(&self, ty: &ProducedType, target: DeclId) -> Option<ProducedType> {
        self.query().supertype(ty, target)
    }

    pub fn is_subtype_of(&self, ty: &ProducedType, other: &ProducedType) -> bool {
        self.query().is_subtype(ty, other)
    }

    pub fn is_supertype_of(&self, ty: &ProducedType, other: &ProducedType) -> bool {
        self.query().is_subtype(other, ty)
    }

    pub fn minus(&self, ty: &ProducedType, declaration: DeclId) -> ProducedType {
        self.query().minus(ty, declaration)
    }
}
