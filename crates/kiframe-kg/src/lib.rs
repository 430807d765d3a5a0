//! kiframe-kg: local and global knowledge layers
//!
//! Agents merge their own fragments into local knowledge; global information
//! grows one structure per interface node by resolving dependencies across
//! agents; global knowledge projects that down to the interface nodes.

pub mod config;
pub mod global_information;
pub mod global_knowledge;
pub mod local_information;
pub mod local_knowledge;
pub mod scenario;

pub use config::{GrowthConfig, KiConfig, LogConfig};
pub use global_information::GlobalInformation;
pub use global_knowledge::GlobalKnowledge;
pub use local_information::LocalInformation;
pub use local_knowledge::LocalKnowledge;
pub use scenario::{AgentSpec, FragmentSpec, NodeSpec, Scenario};

pub use kiframe_core::{Edge, Error, ErrorKind, Node, NodeArena, NodeId, Result, Structure};
