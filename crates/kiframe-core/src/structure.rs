//! Structure - a set of node ids, undirected edges between them, and a root.
//!
//! Payloads (value, resolved flag) live in the [`NodeArena`]; a structure only
//! records membership. Node and edge order is first-seen order so every scan
//! over a structure is deterministic.

use crate::error::{Error, Result};
use crate::node::{Node, NodeArena, NodeId};
use indexmap::IndexSet;
use petgraph::algo::is_isomorphic;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Unordered pair of node ids. `(a, b)` and `(b, a)` are the same edge.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize)]
pub struct Edge(NodeId, NodeId);

impl Edge {
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Build an edge from a list of ids, rejecting anything but a pair.
    pub fn try_from_ids<I, T>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        let mut ids: Vec<NodeId> = ids.into_iter().map(Into::into).collect();
        if ids.len() != 2 {
            return Err(Error::MalformedEdge { arity: ids.len() });
        }
        let b = ids.pop();
        let a = ids.pop();
        match (a, b) {
            (Some(a), Some(b)) => Ok(Self::new(a, b)),
            _ => Err(Error::MalformedEdge { arity: 0 }),
        }
    }

    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.0, &self.1)
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> From<(A, B)> for Edge {
    fn from((a, b): (A, B)) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Graph container over arena node ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Structure {
    nodes: IndexSet<NodeId>,
    edges: IndexSet<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<NodeId>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a structure from an initial node and edge list.
    ///
    /// Nodes are interned into `arena`. When `root` is given it must be one of
    /// `nodes`; when it is not, the structure has no root.
    pub fn from_parts<N, E>(
        arena: &mut NodeArena,
        nodes: N,
        edges: E,
        root: Option<NodeId>,
    ) -> Result<Self>
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut structure = Self::new();
        for node in nodes {
            let id = arena.intern(node)?;
            structure.nodes.insert(id);
        }
        if let Some(root) = root {
            if !structure.nodes.contains(&root) {
                return Err(Error::RootNotInStructure { id: root });
            }
            structure.root = Some(root);
        }
        for edge in edges {
            structure.add_edge(edge)?;
        }
        Ok(structure)
    }

    /// Add a node, optionally with an edge.
    ///
    /// The first node added to an empty structure becomes its root. Adding an
    /// id that is already present is a no-op for membership; the arena still
    /// merges the payload. An edge endpoint other than `node` must already be
    /// known to the arena and is inserted when the structure lacks it.
    pub fn add_node(
        &mut self,
        arena: &mut NodeArena,
        node: Node,
        edge: Option<Edge>,
    ) -> Result<NodeId> {
        if let Some(edge) = &edge {
            let (a, b) = edge.endpoints();
            for end in [a, b] {
                if end != &node.id && !arena.contains(end) {
                    return Err(Error::unknown_node(end));
                }
            }
        }

        let id = arena.intern(node)?;
        self.insert(arena, id.clone())?;
        if let Some(edge) = edge {
            let (a, b) = edge.endpoints();
            for end in [a, b] {
                if !self.nodes.contains(end) {
                    self.nodes.insert(end.clone());
                }
            }
            self.edges.insert(edge);
        }
        Ok(id)
    }

    /// Add a node that is already registered in the arena.
    ///
    /// Returns `false` when the structure already contained it.
    pub fn insert(&mut self, arena: &NodeArena, id: NodeId) -> Result<bool> {
        if !arena.contains(&id) {
            return Err(Error::unknown_node(id));
        }
        if self.nodes.is_empty() {
            self.root = Some(id.clone());
        }
        Ok(self.nodes.insert(id))
    }

    /// Add an edge between two nodes that are both already in the structure.
    pub fn add_edge(&mut self, edge: impl Into<Edge>) -> Result<()> {
        let edge = edge.into();
        let (a, b) = edge.endpoints();
        for end in [a, b] {
            if !self.nodes.contains(end) {
                return Err(Error::unknown_node(end));
            }
        }
        self.edges.insert(edge);
        Ok(())
    }

    /// Union `other` into this structure. The root is kept, or adopted from
    /// `other` when this structure has none.
    pub fn compose(&mut self, other: &Structure) {
        self.nodes.extend(other.nodes.iter().cloned());
        self.edges.extend(other.edges.iter().cloned());
        if self.root.is_none() {
            self.root = other.root.clone();
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// True when both structures have isomorphic underlying graphs.
    /// Ids and values are ignored.
    pub fn compare(&self, other: &Structure) -> bool {
        is_isomorphic(&self.to_graph(), &other.to_graph())
    }

    fn to_graph(&self) -> UnGraph<(), ()> {
        let mut graph: UnGraph<(), ()> =
            UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: HashMap<&NodeId, NodeIndex> = self
            .nodes
            .iter()
            .map(|id| (id, graph.add_node(())))
            .collect();
        for edge in &self.edges {
            let (a, b) = edge.endpoints();
            if let (Some(&a), Some(&b)) = (indices.get(a), indices.get(b)) {
                graph.add_edge(a, b, ());
            }
        }
        graph
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn has_edge(&self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> bool {
        self.edges.contains(&Edge::new(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<&str> = self.nodes.iter().map(NodeId::as_str).collect();
        let edges: Vec<String> = self.edges.iter().map(Edge::to_string).collect();
        match &self.root {
            Some(root) => write!(f, "root={} ", root)?,
            None => write!(f, "root=- ")?,
        }
        write!(f, "nodes=[{}] edges=[{}]", nodes.join(", "), edges.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_unordered() {
        assert_eq!(Edge::new("a", "b"), Edge::new("b", "a"));
        assert_eq!(Edge::from(("b", "a")).to_string(), "a-b");
    }

    #[test]
    fn edge_from_ids_checks_arity() {
        assert!(Edge::try_from_ids(["a", "b"]).is_ok());
        assert_eq!(
            Edge::try_from_ids(["a"]).unwrap_err(),
            Error::MalformedEdge { arity: 1 }
        );
        assert_eq!(
            Edge::try_from_ids(["a", "b", "c"]).unwrap_err(),
            Error::MalformedEdge { arity: 3 }
        );
    }

    #[test]
    fn display_lists_root_nodes_and_edges() {
        let mut arena = NodeArena::new();
        let s = Structure::from_parts(
            &mut arena,
            [Node::new("A"), Node::new("B")],
            [Edge::new("A", "B")],
            Some("A".into()),
        )
        .unwrap();
        assert_eq!(s.to_string(), "root=A nodes=[A, B] edges=[A-B]");
    }
}
