//! Inheritance graph over type declarations using petgraph
//!
//! Edges run from a supertype declaration to each declaration that extends
//! or satisfies it, so a topological order visits supertypes first.

use crate::declaration::DeclId;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct InheritanceGraph {
    graph: DiGraph<DeclId, ()>,
    nodes: HashMap<DeclId, NodeIndex>,
}

impl InheritanceGraph {
    pub fn build(model: &Model) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for declaration in model.declarations() {
            if declaration.is_class_or_interface() {
                let index = graph.add_node(declaration.id());
                nodes.insert(declaration.id(), index);
            }
        }

        for declaration in model.declarations() {
            let Some(&subtype) = nodes.get(&declaration.id()) else {
                continue;
            };
            for supertype in declaration.declared_supertypes() {
                for case in supertype.cases() {
                    if let Some(&node) = case.declaration().and_then(|d| nodes.get(&d)) {
                        graph.add_edge(node, subtype, ());
                    }
                }
            }
        }

        Self { graph, nodes }
    }

    pub fn contains(&self, declaration: DeclId) -> bool {
        self.nodes.contains_key(&declaration)
    }

    /// Every cycle in the declared hierarchy, as declaration ids
    pub fn cycles(&self) -> Vec<Vec<DeclId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|node| self.graph.contains_edge(*node, *node))
            })
            .map(|component| component.into_iter().map(|n| self.graph[n]).collect())
            .collect()
    }

    /// Type declarations ordered supertypes first
    pub fn supertypes_first(&self) -> ModelResult<Vec<DeclId>> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|n| self.graph[n]).collect())
            .map_err(|cycle| ModelError::CircularInheritance {
                cycle: vec![format!("{}", self.graph[cycle.node_id()])],
            })
    }
}

impl Model {
    /// Reject circular inheritance, naming the declarations of the first
    /// cycle found
    pub fn validate_hierarchy(&self) -> ModelResult<InheritanceGraph> {
        let graph = InheritanceGraph::build(self);
        if let Some(cycle) = graph.cycles().into_iter().next() {
            let names = cycle
                .iter()
                .map(|id| self[*id].name().to_string())
                .collect();
            return Err(ModelError::CircularInheritance { cycle: names });
        }
        debug!(types = graph.nodes.len(), "inheritance graph validated");
        Ok(graph)
    }
}
