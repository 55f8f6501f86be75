//! Produced types and substitutions
//!
//! A [`ProducedType`] is an immutable value: a declaration applied to type
//! arguments, or an anonymous union/intersection of other produced types.
//! Construction through [`ProducedType::union`] and
//! [`ProducedType::intersection`] always yields the canonical flattened form.

use crate::declaration::DeclId;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProducedType {
    /// A class, interface or type parameter with positional type arguments
    Declared {
        declaration: DeclId,
        arguments: Vec<ProducedType>,
    },
    /// Anonymous union, at least two cases after canonicalisation
    Union(Vec<ProducedType>),
    /// Anonymous intersection; the empty intersection is the top type
    Intersection(Vec<ProducedType>),
    /// The algebraic bottom: subtype of every type, no values
    Bottom,
    /// Sentinel for an irrecoverable type; compatible with everything
    Unknown,
}

impl ProducedType {
    pub fn declared(declaration: DeclId, arguments: Vec<ProducedType>) -> Self {
        Self::Declared {
            declaration,
            arguments,
        }
    }

    /// A non-generic declaration, or a type parameter reference
    pub fn simple(declaration: DeclId) -> Self {
        Self::declared(declaration, Vec::new())
    }

    /// Canonical union: nested unions are flattened, `Bottom` cases are
    /// dropped and exact duplicates removed. One case yields that case and
    /// no cases yield `Bottom`. `Unknown` absorbs the whole union.
    pub fn union(types: impl IntoIterator<Item = ProducedType>) -> Self {
        let mut cases: Vec<ProducedType> = Vec::new();
        for ty in types {
            match ty {
                Self::Unknown => return Self::Unknown,
                Self::Bottom => {}
                Self::Union(inner) => {
                    for case in inner {
                        push_distinct(&mut cases, case);
                    }
                }
                other => push_distinct(&mut cases, other),
            }
        }
        match cases.len() {
            0 => Self::Bottom,
            1 => cases.pop().unwrap_or(Self::Bottom),
            _ => Self::Union(cases),
        }
    }

    /// Canonical intersection: nested intersections are flattened and exact
    /// duplicates removed. `Bottom` and `Unknown` absorb the intersection.
    pub fn intersection(types: impl IntoIterator<Item = ProducedType>) -> Self {
        let mut members: Vec<ProducedType> = Vec::new();
        for ty in types {
            match ty {
                Self::Unknown => return Self::Unknown,
                Self::Bottom => return Self::Bottom,
                Self::Intersection(inner) => {
                    for member in inner {
                        push_distinct(&mut members, member);
                    }
                }
                other => push_distinct(&mut members, other),
            }
        }
        if members.len() == 1 {
            members.pop().unwrap_or(Self::Intersection(Vec::new()))
        } else {
            Self::Intersection(members)
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Bottom)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            Self::Declared { declaration, .. } => Some(*declaration),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[ProducedType] {
        match self {
            Self::Declared { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Cases of a union, or the type itself
    pub fn cases(&self) -> &[ProducedType] {
        match self {
            Self::Union(cases) => cases,
            other => std::slice::from_ref(other),
        }
    }

    /// Exact equality: same declaration with pairwise exactly-equal
    /// arguments. Union and intersection members compare as sets.
    pub fn is_exactly(&self, other: &ProducedType) -> bool {
        match (self, other) {
            (
                Self::Declared {
                    declaration: d1,
                    arguments: a1,
                },
                Self::Declared {
                    declaration: d2,
                    arguments: a2,
                },
            ) => {
                d1 == d2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(x, y)| x.is_exactly(y))
            }
            (Self::Union(xs), Self::Union(ys))
            | (Self::Intersection(xs), Self::Intersection(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().all(|x| ys.iter().any(|y| x.is_exactly(y)))
                    && ys.iter().all(|y| xs.iter().any(|x| x.is_exactly(y)))
            }
            (Self::Bottom, Self::Bottom) | (Self::Unknown, Self::Unknown) => true,
            _ => false,
        }
    }

    /// Replace type-parameter occurrences by the types bound in
    /// `substitution`. Parameters are keyed by declaration identity, so
    /// two parameters sharing a name never capture each other.
    pub fn substitute(&self, substitution: &Substitution) -> ProducedType {
        if substitution.is_empty() {
            return self.clone();
        }
        match self {
            Self::Declared {
                declaration,
                arguments,
            } => {
                if arguments.is_empty() {
                    if let Some(replacement) = substitution.get(*declaration) {
                        return replacement.clone();
                    }
                }
                Self::declared(
                    *declaration,
                    arguments.iter().map(|a| a.substitute(substitution)).collect(),
                )
            }
            Self::Union(cases) => Self::union(cases.iter().map(|c| c.substitute(substitution))),
            Self::Intersection(members) => {
                Self::intersection(members.iter().map(|m| m.substitute(substitution)))
            }
            Self::Bottom => Self::Bottom,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Does any `Declared` node inside this type refer to `declaration`?
    pub fn mentions(&self, declaration: DeclId) -> bool {
        match self {
            Self::Declared {
                declaration: d,
                arguments,
            } => *d == declaration || arguments.iter().any(|a| a.mentions(declaration)),
            Self::Union(types) | Self::Intersection(types) => {
                types.iter().any(|t| t.mentions(declaration))
            }
            Self::Bottom | Self::Unknown => false,
        }
    }

    /// Every declaration referenced anywhere inside this type
    pub fn referenced_declarations(&self) -> Vec<DeclId> {
        let mut out = Vec::new();
        self.collect_declarations(&mut out);
        out
    }

    fn collect_declarations(&self, out: &mut Vec<DeclId>) {
        match self {
            Self::Declared {
                declaration,
                arguments,
            } => {
                if !out.contains(declaration) {
                    out.push(*declaration);
                }
                for argument in arguments {
                    argument.collect_declarations(out);
                }
            }
            Self::Union(types) | Self::Intersection(types) => {
                for ty in types {
                    ty.collect_declarations(out);
                }
            }
            Self::Bottom | Self::Unknown => {}
        }
    }
}

fn push_distinct(types: &mut Vec<ProducedType>, ty: ProducedType) {
    if !types.iter().any(|existing| existing.is_exactly(&ty)) {
        types.push(ty);
    }
}

/// Type-parameter bindings, keyed by the parameter's declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: IndexMap<DeclId, ProducedType>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `parameters` positionally to `arguments`; surplus entries on
    /// either side are ignored
    pub fn from_arguments(parameters: &[DeclId], arguments: &[ProducedType]) -> Self {
        let mut substitution = Self::new();
        for (parameter, argument) in parameters.iter().zip(arguments) {
            substitution.insert(*parameter, argument.clone());
        }
        substitution
    }

    pub fn insert(&mut self, parameter: DeclId, ty: ProducedType) {
        self.bindings.insert(parameter, ty);
    }

    pub fn get(&self, parameter: DeclId) -> Option<&ProducedType> {
        self.bindings.get(&parameter)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &ProducedType)> {
        self.bindings.iter().map(|(k, v)| (*k, v))
    }

    /// Add every binding of `other` that this substitution does not already
    /// bind
    pub fn extend(&mut self, other: &Substitution) {
        for (parameter, ty) in other.iter() {
            self.bindings.entry(parameter).or_insert_with(|| ty.clone());
        }
    }
}
