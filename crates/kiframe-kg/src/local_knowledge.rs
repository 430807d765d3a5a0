//! Local knowledge: one agent's single merged structure.
//!
//! An agent is addressed by one published root. `expand` closes over
//! fragment roots: a node that roots another fragment in the agent's local
//! information pulls that fragment in, breadth first, each root at most once.

use crate::local_information::LocalInformation;
use kiframe_core::{NodeId, Result, Structure};
use std::collections::VecDeque;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct LocalKnowledge {
    structure: Option<Structure>,
    root: Option<NodeId>,
    roots: Vec<NodeId>,
}

impl LocalKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// An agent whose merged structure is already known.
    pub fn from_structure(structure: Structure) -> Self {
        let mut agent = Self::new();
        agent.add_structure(structure);
        agent
    }

    /// The first structure seeds the agent and its root; later ones are
    /// composed into it.
    pub fn add_structure(&mut self, structure: Structure) {
        match &mut self.structure {
            Some(merged) => merged.compose(&structure),
            None => {
                if self.root.is_none() {
                    self.root = structure.root().cloned();
                }
                self.structure = Some(structure);
            }
        }
    }

    /// Narrow ownership check: true only for this agent's published root.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.structure.is_some() && self.root.as_ref() == Some(id)
    }

    /// Absorb the fragment rooted at `root` and, transitively, every fragment
    /// whose root appears in an absorbed fragment.
    pub fn expand(&mut self, info: &LocalInformation, root: &NodeId) -> Result<()> {
        self.root = Some(root.clone());
        if !self.roots.contains(root) {
            self.roots.push(root.clone());
        }

        let mut queue = VecDeque::from([root.clone()]);
        while let Some(current) = queue.pop_front() {
            let fragment = info.get_structure(&current)?;
            debug!(root = %current, nodes = fragment.node_count(), "absorbing fragment");
            self.add_structure(fragment.clone());

            for id in fragment.nodes() {
                if info.is_root(id) && !self.roots.contains(id) {
                    self.roots.push(id.clone());
                    queue.push_back(id.clone());
                }
            }
        }

        info!(
            root = %root,
            fragments = self.roots.len(),
            nodes = self.structure.as_ref().map_or(0, Structure::node_count),
            "expanded local knowledge"
        );
        Ok(())
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    /// Fragment roots absorbed by `expand`, in discovery order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }
}
