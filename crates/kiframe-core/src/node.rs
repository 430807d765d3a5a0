//! Nodes and the arena that gives every node id a single shared entry.
//!
//! Structures never hold node payloads. They hold [`NodeId`]s and look the
//! payload up in a [`NodeArena`], so raising a node's resolved flag once is
//! seen by every structure that contains it.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Node identifier - cheaply cloneable
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0.to_string()
    }
}

/// A typed point in the graph: identity, optional value, resolution status.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    resolved: bool,
}

impl Node {
    /// A node whose value is not known yet.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            value: None,
            resolved: false,
        }
    }

    /// A node with a known value. Known values are resolved from the start.
    pub fn with_value(id: impl Into<NodeId>, value: f64) -> Self {
        Self {
            id: id.into(),
            value: Some(value),
            resolved: true,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidNode("node id must not be empty".into()));
        }
        if let Some(v) = self.value {
            if v.is_nan() {
                return Err(Error::InvalidNode(format!("node {} has a NaN value", self.id)));
            }
        }
        Ok(())
    }
}

/// One entry per node id, shared by every structure built against it.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: IndexMap<NodeId, Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, merging into the existing entry when the id is known.
    ///
    /// A present value fills an absent one and resolved flags are OR-ed.
    /// Two different present values for one id are rejected.
    pub fn intern(&mut self, node: Node) -> Result<NodeId> {
        node.validate()?;
        let Some(existing) = self.nodes.get_mut(&node.id) else {
            let id = node.id.clone();
            self.nodes.insert(id.clone(), node);
            return Ok(id);
        };

        match (existing.value, node.value) {
            (Some(current), Some(incoming)) if current != incoming => {
                return Err(Error::ConflictingValue {
                    id: node.id,
                    existing: current,
                    incoming,
                });
            }
            (None, Some(incoming)) => existing.value = Some(incoming),
            _ => {}
        }
        existing.resolved |= node.resolved || existing.value.is_some();
        Ok(existing.id.clone())
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| Error::unknown_node(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Unknown ids are never resolved.
    pub fn is_resolved(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_resolved)
    }

    /// Raise the resolved flag. There is no way to lower it again.
    pub fn mark_resolved(&mut self, id: &NodeId) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::unknown_node(id))?;
        if !node.resolved {
            trace!(node = %id, "resolved");
            node.resolved = true;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_implies_resolved() {
        assert!(Node::with_value("a", 1.0).is_resolved());
        assert!(!Node::new("a").is_resolved());
    }

    #[test]
    fn intern_fills_missing_value() {
        let mut arena = NodeArena::new();
        arena.intern(Node::new("TN")).unwrap();
        assert!(!arena.is_resolved(&"TN".into()));

        arena.intern(Node::with_value("TN", 1.0)).unwrap();
        let node = arena.node(&"TN".into()).unwrap();
        assert_eq!(node.value, Some(1.0));
        assert!(node.is_resolved());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn intern_keeps_value_when_later_copy_has_none() {
        let mut arena = NodeArena::new();
        arena.intern(Node::with_value("b", 2.0)).unwrap();
        arena.intern(Node::new("b")).unwrap();
        assert_eq!(arena.node(&"b".into()).unwrap().value, Some(2.0));
        assert!(arena.is_resolved(&"b".into()));
    }

    #[test]
    fn intern_rejects_conflicting_values() {
        let mut arena = NodeArena::new();
        arena.intern(Node::with_value("x", 1.0)).unwrap();
        let err = arena.intern(Node::with_value("x", 2.0)).unwrap_err();
        assert!(matches!(err, Error::ConflictingValue { .. }));
        assert_eq!(arena.node(&"x".into()).unwrap().value, Some(1.0));
    }

    #[test]
    fn intern_rejects_empty_id() {
        let mut arena = NodeArena::new();
        let err = arena.intern(Node::new("")).unwrap_err();
        assert!(matches!(err, Error::InvalidNode(_)));
        assert!(arena.is_empty());
    }

    #[test]
    fn resolved_flag_survives_reintern() {
        let mut arena = NodeArena::new();
        let id = arena.intern(Node::new("a")).unwrap();
        arena.mark_resolved(&id).unwrap();
        arena.intern(Node::new("a")).unwrap();
        assert!(arena.is_resolved(&id));
    }

    #[test]
    fn mark_resolved_unknown_is_referential_error() {
        let mut arena = NodeArena::new();
        let err = arena.mark_resolved(&"ghost".into()).unwrap_err();
        assert_eq!(err, Error::unknown_node("ghost"));
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let id = NodeId::new("T1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""T1""#);
        let back: NodeId = serde_json::from_str(r#""T1""#).unwrap();
        assert_eq!(back, id);
    }
}
