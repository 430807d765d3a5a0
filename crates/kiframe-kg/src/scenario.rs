//! Scenario files: plain node and edge lists describing interface nodes and
//! agents, turned into [`LocalKnowledge`] agents over one [`NodeArena`].
//!
//! ```toml
//! interface = [{ id = "T1" }, { id = "TK", value = 1.0 }]
//!
//! [[agents]]
//! name = "agent-1"
//!
//! [[agents.fragments]]
//! nodes = [{ id = "T1" }, { id = "a" }]
//! edges = [["T1", "a"]]
//! ```

use crate::local_information::LocalInformation;
use crate::local_knowledge::LocalKnowledge;
use anyhow::Context;
use kiframe_core::{Edge, Node, NodeArena, NodeId, Result, Structure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl NodeSpec {
    pub fn to_node(&self) -> Node {
        match self.value {
            Some(v) => Node::with_value(self.id.as_str(), v),
            None => Node::new(self.id.as_str()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragmentSpec {
    /// Defaults to the first node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Each edge is a list of exactly two node ids.
    #[serde(default)]
    pub edges: Vec<Vec<String>>,
    pub nodes: Vec<NodeSpec>,
}

impl FragmentSpec {
    pub fn build(&self, arena: &mut NodeArena) -> Result<Structure> {
        let edges = self
            .edges
            .iter()
            .map(|pair| Edge::try_from_ids(pair.iter().map(String::as_str)))
            .collect::<Result<Vec<_>>>()?;
        let root = self
            .root
            .as_deref()
            .or_else(|| self.nodes.first().map(|n| n.id.as_str()))
            .map(NodeId::from);
        Structure::from_parts(arena, self.nodes.iter().map(NodeSpec::to_node), edges, root)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    /// When set, fragments become the agent's local information and are
    /// absorbed by expanding from this root. Otherwise they are merged in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_from: Option<String>,
    pub fragments: Vec<FragmentSpec>,
}

impl AgentSpec {
    pub fn build(&self, arena: &mut NodeArena) -> Result<LocalKnowledge> {
        debug!(
            agent = %self.name,
            fragments = self.fragments.len(),
            expand_from = self.expand_from.as_deref().unwrap_or("-"),
            "building agent"
        );
        let fragments = self
            .fragments
            .iter()
            .map(|f| f.build(arena))
            .collect::<Result<Vec<_>>>()?;

        let mut agent = LocalKnowledge::new();
        match &self.expand_from {
            Some(root) => {
                let info = LocalInformation::from_structures(fragments)?;
                agent.expand(&info, &NodeId::from(root.as_str()))?;
            }
            None => {
                for fragment in fragments {
                    agent.add_structure(fragment);
                }
            }
        }
        Ok(agent)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub interface: Vec<NodeSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

impl Scenario {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid scenario")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn interface_nodes(&self) -> Vec<Node> {
        self.interface.iter().map(NodeSpec::to_node).collect()
    }

    /// Intern every fragment into `arena` and build the agents in file order.
    ///
    /// A failing agent is logged by name before the error is returned.
    pub fn build_agents(&self, arena: &mut NodeArena) -> Result<Vec<LocalKnowledge>> {
        self.agents
            .iter()
            .map(|agent| {
                agent.build(arena).inspect_err(|e| {
                    warn!(agent = %agent.name, error = %e, "agent rejected");
                })
            })
            .collect()
    }
}
