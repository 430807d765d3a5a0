//! Local information: one agent's raw fragments, keyed by fragment root.

use indexmap::IndexMap;
use kiframe_core::{Error, NodeId, Result, Structure};

#[derive(Clone, Debug, Default)]
pub struct LocalInformation {
    structures: IndexMap<NodeId, Structure>,
}

impl LocalInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_structures(structures: impl IntoIterator<Item = Structure>) -> Result<Self> {
        let mut info = Self::new();
        for structure in structures {
            info.add_structure(structure)?;
        }
        Ok(info)
    }

    /// Register a fragment under its root. Duplicate roots are rejected,
    /// never overwritten.
    pub fn add_structure(&mut self, structure: Structure) -> Result<()> {
        let root = structure.root().cloned().ok_or(Error::MissingRoot)?;
        if self.structures.contains_key(&root) {
            return Err(Error::DuplicateRoot { root });
        }
        self.structures.insert(root, structure);
        Ok(())
    }

    pub fn get_structure(&self, root: &NodeId) -> Result<&Structure> {
        self.structures
            .get(root)
            .ok_or_else(|| Error::structure_not_found(root))
    }

    pub fn is_root(&self, id: &NodeId) -> bool {
        self.structures.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &NodeId> {
        self.structures.keys()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
