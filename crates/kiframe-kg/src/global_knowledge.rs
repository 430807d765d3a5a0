//! Global knowledge: the interface-only projection of grown global information.
//!
//! Two interface nodes are connected when they sit in the same grown
//! structure, however far apart they are inside it.

use crate::global_information::GlobalInformation;
use kiframe_core::{Edge, Node, NodeArena, NodeId, Result, Structure};
use tracing::debug;

pub struct GlobalKnowledge {
    nodes: Vec<NodeId>,
    structure: Structure,
}

impl GlobalKnowledge {
    /// Interface nodes only. The projection has no root, and no edges until
    /// [`Self::add_edges`] runs.
    pub fn new(arena: &mut NodeArena, init_nodes: Vec<Node>) -> Result<Self> {
        let structure =
            Structure::from_parts(arena, init_nodes, std::iter::empty::<Edge>(), None)?;
        let nodes = structure.nodes().cloned().collect();
        Ok(Self { nodes, structure })
    }

    /// Other interface nodes sharing the first grown structure that holds `id`.
    pub fn find_connections(&self, id: &NodeId, global: &GlobalInformation) -> Vec<NodeId> {
        global
            .structures()
            .values()
            .find(|grown| grown.contains(id))
            .map(|grown| {
                grown
                    .nodes()
                    .filter(|n| *n != id && self.structure.contains(n))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn add_edges(&mut self, global: &GlobalInformation) -> Result<()> {
        for id in &self.nodes {
            let connections = self.find_connections(id, global);
            debug!(node = %id, connections = connections.len(), "projecting");
            for other in connections {
                self.structure.add_edge((id.clone(), other))?;
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }
}
