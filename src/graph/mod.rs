//! Org relationship graph
//!
//! [`OrgGraphBuilder`] is a traversal visitor that records every visited
//! node and its parent edge in a directed graph; [`OrgGraph`] wraps the
//! petgraph structure with id-based lookups and Graphviz DOT rendering.

use crate::org::types::OrgNode;
use crate::walker::traits::{NodeVisitor, SourceError};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::sync::Mutex;

/// Directed parent-to-child graph of the organization, with nodes labelled
/// by their ids.
#[derive(Debug, Clone, Default)]
pub struct OrgGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl OrgGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, id: &str) -> NodeIndex {
        match self.indices.get(id) {
            Some(&index) => index,
            None => {
                let index = self.graph.add_node(id.to_string());
                self.indices.insert(id.to_string(), index);
                index
            }
        }
    }

    /// Record a node, without an edge
    pub fn add_node(&mut self, id: &str) {
        self.intern(id);
    }

    /// Record a parent-to-child edge, interning both endpoints
    pub fn add_edge(&mut self, parent_id: &str, child_id: &str) {
        let parent = self.intern(parent_id);
        let child = self.intern(child_id);
        self.graph.add_edge(parent, child, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.indices.contains_key(id)
    }

    pub fn has_edge(&self, parent_id: &str, child_id: &str) -> bool {
        match (self.indices.get(parent_id), self.indices.get(child_id)) {
            (Some(&parent), Some(&child)) => self.graph.find_edge(parent, child).is_some(),
            _ => false,
        }
    }

    /// Render as Graphviz DOT, suitable for `dot -Tpng`
    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}

/// Traversal visitor that accumulates visited nodes into an [`OrgGraph`].
#[derive(Debug, Default)]
pub struct OrgGraphBuilder {
    graph: Mutex<OrgGraph>,
}

impl OrgGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and take the accumulated graph
    pub fn into_graph(self) -> OrgGraph {
        self.graph.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl NodeVisitor for OrgGraphBuilder {
    type Node = OrgNode;

    fn visit(&self, node: &OrgNode, parent: Option<&OrgNode>) -> Result<(), SourceError> {
        let mut graph = self.graph.lock().unwrap_or_else(|e| e.into_inner());
        match parent {
            Some(parent) => graph.add_edge(parent.id(), node.id()),
            None => graph.add_node(node.id()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::types::{Account, OrgUnit, Root};

    #[test]
    fn test_builder_records_nodes_and_edges() {
        let builder = OrgGraphBuilder::new();
        let root: OrgNode = Root::new("r-1").into();
        let unit: OrgNode = OrgUnit::new("ou-1", "One").into();
        let account: OrgNode = Account::new("a-1", "one").into();

        builder.visit(&root, None).unwrap();
        builder.visit(&unit, Some(&root)).unwrap();
        builder.visit(&account, Some(&unit)).unwrap();

        let graph = builder.into_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains("r-1"));
        assert!(graph.has_edge("r-1", "ou-1"));
        assert!(graph.has_edge("ou-1", "a-1"));
        assert!(!graph.has_edge("r-1", "a-1"));
    }

    #[test]
    fn test_dot_output_mentions_every_node() {
        let mut graph = OrgGraph::new();
        graph.add_edge("r-1", "ou-1");

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("r-1"));
        assert!(dot.contains("ou-1"));
    }
}
