//! Results of checking one compilation unit
//!
//! The tree itself is never mutated. Everything the checker learns about a
//! node (its type, the declaration it resolved to, inferred type arguments,
//! diagnostics) is recorded here keyed by [`NodeId`].

use indexmap::IndexMap;
use tern_ast::{NodeId, Span};
use tern_model::{ProducedReference, ProducedType};

use crate::error::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    types: IndexMap<NodeId, ProducedType>,
    targets: IndexMap<NodeId, ProducedReference>,
    type_arguments: IndexMap<NodeId, Vec<ProducedType>>,
    diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// The type computed for an expression or type node
    pub fn type_of(&self, node: NodeId) -> Option<&ProducedType> {
        self.types.get(&node)
    }

    /// The resolved member or type reference of a reference, invocation or
    /// argument list node
    pub fn target(&self, node: NodeId) -> Option<&ProducedReference> {
        self.targets.get(&node)
    }

    /// Type arguments inferred for a generic reference invoked without
    /// explicit ones
    pub fn inferred_type_arguments(&self, node: NodeId) -> Option<&[ProducedType]> {
        self.type_arguments.get(&node).map(Vec::as_slice)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for(&self, node: NodeId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.node == node)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Code generation should be skipped iff this holds
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub(crate) fn record_type(&mut self, node: NodeId, ty: ProducedType) {
        self.types.insert(node, ty);
    }

    pub(crate) fn record_target(&mut self, node: NodeId, target: ProducedReference) {
        self.targets.insert(node, target);
    }

    pub(crate) fn record_type_arguments(&mut self, node: NodeId, arguments: Vec<ProducedType>) {
        self.type_arguments.insert(node, arguments);
    }

    pub(crate) fn error(
        &mut self,
        node: NodeId,
        span: Span,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) {
        self.diagnostics
            .push(Diagnostic::error(node, span, kind, message));
    }

    pub(crate) fn warning(&mut self, node: NodeId, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(node, span, message));
    }
}
