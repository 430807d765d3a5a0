//! Global information: demand-driven growth across agents.
//!
//! Every interface node is grown into one structure. Growth walks an explicit
//! stack of `(node, from)` pairs:
//!
//! - unresolved top: ask the owning agent which of its nodes are other agents'
//!   roots or interface nodes, push each as a dependency of the top. A node with
//!   no such dependency is resolved in place.
//! - resolved top: draw the edge back to `from`, resolve `from`, pop. The seed
//!   (`from == node`) is popped without an edge.
//!
//! Resolution is written to the shared [`NodeArena`], so a node resolved while
//! growing one seed stays resolved for every later seed.

use crate::config::GrowthConfig;
use crate::local_knowledge::LocalKnowledge;
use indexmap::IndexMap;
use kiframe_core::{Error, Node, NodeArena, NodeId, Result, Structure};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub struct GlobalInformation {
    init_nodes: Vec<NodeId>,
    interface_index: HashMap<NodeId, usize>,
    visited: Vec<bool>,
    agents: Vec<LocalKnowledge>,
    /// Published root → index into `agents`.
    owners: HashMap<NodeId, usize>,
    roots: HashSet<NodeId>,
    structures: IndexMap<NodeId, Structure>,
    /// Interface node → seed of the structure it was grown in.
    grown_in: HashMap<NodeId, NodeId>,
    config: GrowthConfig,
}

impl GlobalInformation {
    pub fn new(
        arena: &mut NodeArena,
        init_nodes: Vec<Node>,
        agents: Vec<LocalKnowledge>,
    ) -> Result<Self> {
        Self::with_config(arena, init_nodes, agents, GrowthConfig::default())
    }

    pub fn with_config(
        arena: &mut NodeArena,
        init_nodes: Vec<Node>,
        agents: Vec<LocalKnowledge>,
        config: GrowthConfig,
    ) -> Result<Self> {
        let mut ids = Vec::with_capacity(init_nodes.len());
        let mut interface_index = HashMap::new();
        for node in init_nodes {
            let id = arena.intern(node)?;
            if !interface_index.contains_key(&id) {
                interface_index.insert(id.clone(), ids.len());
                ids.push(id);
            }
        }

        let mut owners = HashMap::new();
        for (index, agent) in agents.iter().enumerate() {
            let root = agent
                .root()
                .filter(|_| agent.structure().is_some())
                .ok_or(Error::AgentWithoutRoot { index })?;
            if owners.insert(root.clone(), index).is_some() {
                return Err(Error::DuplicateAgentRoot { root: root.clone() });
            }
        }
        let roots = owners.keys().cloned().collect();

        Ok(Self {
            visited: vec![false; ids.len()],
            init_nodes: ids,
            interface_index,
            agents,
            owners,
            roots,
            structures: IndexMap::new(),
            grown_in: HashMap::new(),
            config,
        })
    }

    pub fn is_interface(&self, id: &NodeId) -> bool {
        self.interface_index.contains_key(id)
    }

    pub fn is_visited(&self, id: &NodeId) -> Result<bool> {
        self.interface_index
            .get(id)
            .map(|&i| self.visited[i])
            .ok_or_else(|| Error::NotInterface { node: id.clone() })
    }

    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    /// Take the first unvisited interface node, marking it visited.
    pub fn next_unvisited(&mut self) -> Option<NodeId> {
        let index = self.visited.iter().position(|&v| !v)?;
        self.visited[index] = true;
        Some(self.init_nodes[index].clone())
    }

    /// The agent publishing `id` as its root.
    pub fn find_agent(&self, id: &NodeId) -> Option<&LocalKnowledge> {
        self.owners
            .get(id)
            .map(|&i| &self.agents[i])
            .filter(|agent| agent.contains(id))
    }

    /// Grow a structure for every interface node not yet visited.
    ///
    /// A seed whose dependency has no owning agent aborts with
    /// [`Error::NoOwningAgent`]; its partial structure is discarded and the
    /// visited flags it raised are cleared, so a later call fails the same way.
    pub fn grow(&mut self, arena: &mut NodeArena) -> Result<()> {
        while let Some(seed) = self.next_unvisited() {
            let mut absorbed = Vec::new();
            let structure = match self.grow_seed(arena, &seed, &mut absorbed) {
                Ok(structure) => structure,
                Err(e) => {
                    warn!(seed = %seed, error = %e, "growth failed");
                    for id in absorbed.iter().chain([&seed]) {
                        if let Some(&i) = self.interface_index.get(id) {
                            self.visited[i] = false;
                        }
                    }
                    return Err(e);
                }
            };
            info!(
                seed = %seed,
                nodes = structure.node_count(),
                edges = structure.edge_count(),
                "grew structure"
            );
            for id in absorbed {
                self.grown_in.entry(id).or_insert_with(|| seed.clone());
            }
            self.grown_in.insert(seed.clone(), seed.clone());
            self.structures.insert(seed, structure);
        }
        Ok(())
    }

    /// Interface nodes whose visited flag this seed raised are pushed to
    /// `absorbed`, also when growth fails.
    fn grow_seed(
        &mut self,
        arena: &mut NodeArena,
        seed: &NodeId,
        absorbed: &mut Vec<NodeId>,
    ) -> Result<Structure> {
        let mut structure = Structure::new();
        structure.insert(arena, seed.clone())?;
        let mut stack = vec![(seed.clone(), seed.clone())];
        let mut steps = 0usize;

        while let Some((current, from)) = stack.last().cloned() {
            steps += 1;
            if self.config.max_steps > 0 && steps > self.config.max_steps {
                return Err(Error::StepLimitExceeded {
                    seed: seed.clone(),
                    steps: self.config.max_steps,
                });
            }

            if !arena.is_resolved(&current) {
                let dependencies = self.dependencies_of(&current)?;
                if dependencies.is_empty() {
                    debug!(node = %current, "no open dependencies, resolved");
                    arena.mark_resolved(&current)?;
                    continue;
                }
                for dependency in dependencies {
                    debug!(node = %current, dependency = %dependency, "pushing dependency");
                    structure.insert(arena, dependency.clone())?;
                    if let Some(&i) = self.interface_index.get(&dependency) {
                        if !self.visited[i] {
                            self.visited[i] = true;
                            absorbed.push(dependency.clone());
                        }
                    }
                    stack.push((dependency, current.clone()));
                }
            } else {
                if current != from {
                    structure.add_edge((current.clone(), from.clone()))?;
                    arena.mark_resolved(&from)?;
                }
                stack.pop();
            }
        }

        Ok(structure)
    }

    /// Nodes of the owning agent's structure that `current` depends on: other
    /// agents' roots and interface nodes, excluding `current` itself.
    fn dependencies_of(&self, current: &NodeId) -> Result<Vec<NodeId>> {
        let agent = self
            .find_agent(current)
            .ok_or_else(|| Error::no_owning_agent(current))?;
        let Some(owned) = agent.structure() else {
            return Err(Error::no_owning_agent(current));
        };
        Ok(owned
            .nodes()
            .filter(|id| *id != current && (self.roots.contains(*id) || self.is_interface(id)))
            .cloned()
            .collect())
    }

    /// Grown structures keyed by seed, in growth order.
    pub fn structures(&self) -> &IndexMap<NodeId, Structure> {
        &self.structures
    }

    /// The structure an interface node was seeded or discovered in.
    pub fn structure_for(&self, id: &NodeId) -> Option<&Structure> {
        self.grown_in
            .get(id)
            .and_then(|seed| self.structures.get(seed))
    }

    pub fn init_nodes(&self) -> &[NodeId] {
        &self.init_nodes
    }

    pub fn agents(&self) -> &[LocalKnowledge] {
        &self.agents
    }

    pub fn roots(&self) -> &HashSet<NodeId> {
        &self.roots
    }
}
