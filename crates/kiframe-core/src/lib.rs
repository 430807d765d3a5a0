//! kiframe core - nodes, the shared node arena, and the graph container

pub mod error;
pub mod node;
pub mod structure;

pub use error::{Error, ErrorKind, Result};
pub use node::{Node, NodeArena, NodeId};
pub use structure::{Edge, Structure};
