//! Lexical state of the expression checker
//!
//! Two stacks, pushed and popped around the bodies that own them:
//! - the scope stack, used for name lookup, visibility and `this`/`outer`
//! - the return-scope stack, which decides what a `return` statement may
//!   carry and accumulates the returns of bodies whose type is inferred

use tern_model::{DeclId, ProducedReference, ProducedType};

/// What a `return` inside the current body is checked against
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnScope {
    /// Class and object initializers, setters and `void` methods
    Void,
    /// An annotated method or getter
    Declared(ProducedType),
    /// A `function` or `value` modifier: the union of the returns so far
    Inferred(ProducedType),
}

/// A functional reference waiting for the argument list at `list`
#[derive(Debug, Clone)]
pub struct Callable {
    pub reference: ProducedReference,
    pub list: usize,
}

#[derive(Debug, Clone)]
pub struct CheckerContext {
    package: DeclId,
    scopes: Vec<DeclId>,
    returns: Vec<ReturnScope>,
}

impl CheckerContext {
    pub fn new(package: DeclId) -> Self {
        Self {
            package,
            scopes: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// The innermost declaration enclosing the node being checked
    pub fn scope(&self) -> DeclId {
        self.scopes.last().copied().unwrap_or(self.package)
    }

    pub fn enter_scope(&mut self, scope: DeclId) {
        self.scopes.push(scope);
    }

    pub fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn enter_return_scope(&mut self, scope: ReturnScope) {
        self.returns.push(scope);
    }

    pub fn exit_return_scope(&mut self) -> Option<ReturnScope> {
        self.returns.pop()
    }

    pub fn return_scope(&self) -> Option<&ReturnScope> {
        self.returns.last()
    }

    pub fn return_scope_mut(&mut self) -> Option<&mut ReturnScope> {
        self.returns.last_mut()
    }
}
