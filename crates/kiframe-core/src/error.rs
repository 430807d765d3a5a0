//! Error types for kiframe

use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("malformed edge: expected 2 endpoints, got {arity}")]
    MalformedEdge { arity: usize },

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },

    #[error("root {id} is not a node of the structure")]
    RootNotInStructure { id: NodeId },

    #[error("no structure rooted at {root}")]
    StructureNotFound { root: NodeId },

    #[error("no agent owns node {node}")]
    NoOwningAgent { node: NodeId },

    #[error("{node} is not an interface node")]
    NotInterface { node: NodeId },

    #[error("duplicate root: {root}")]
    DuplicateRoot { root: NodeId },

    #[error("two agents publish the same root: {root}")]
    DuplicateAgentRoot { root: NodeId },

    #[error("structure has no root")]
    MissingRoot,

    #[error("agent #{index} has no root")]
    AgentWithoutRoot { index: usize },

    #[error("conflicting values for {id}: {existing} vs {incoming}")]
    ConflictingValue {
        id: NodeId,
        existing: f64,
        incoming: f64,
    },

    #[error("growth from {seed} exceeded {steps} steps")]
    StepLimitExceeded { seed: NodeId, steps: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy: every error is reported at the call that violates the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong argument shape, e.g. an edge that is not a pair.
    Shape,
    /// A lookup or edge names an id that is not where it should be.
    Referential,
    /// The supplied inputs contradict each other.
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape => write!(f, "shape"),
            Self::Referential => write!(f, "referential"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

impl Error {
    pub fn unknown_node(id: impl Into<NodeId>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    pub fn structure_not_found(root: impl Into<NodeId>) -> Self {
        Self::StructureNotFound { root: root.into() }
    }

    pub fn no_owning_agent(node: impl Into<NodeId>) -> Self {
        Self::NoOwningAgent { node: node.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedEdge { .. } | Self::InvalidNode(_) => ErrorKind::Shape,
            Self::UnknownNode { .. }
            | Self::RootNotInStructure { .. }
            | Self::StructureNotFound { .. }
            | Self::NoOwningAgent { .. }
            | Self::NotInterface { .. } => ErrorKind::Referential,
            Self::DuplicateRoot { .. }
            | Self::DuplicateAgentRoot { .. }
            | Self::MissingRoot
            | Self::AgentWithoutRoot { .. }
            | Self::ConflictingValue { .. }
            | Self::StepLimitExceeded { .. } => ErrorKind::Configuration,
        }
    }
}
