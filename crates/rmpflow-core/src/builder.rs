//! Validated tree assembly.
//!
//! The tree is assembled up front and checked as it grows; the first
//! `solve` can only ever see a well-formed tree.  Because nodes are owned
//! by their parent and parents are referenced by name, cycles and orphan
//! nodes are unrepresentable, so [`RmpTreeBuilder::build`] itself cannot
//! fail – all rejection happens at the `add_*` call that would have
//! malformed the tree.
//!
//! # Example
//!
//! ```rust
//! use rmpflow_core::builder::RmpTreeBuilder;
//! use rmpflow_core::policy::IdentityMap;
//!
//! let mut builder = RmpTreeBuilder::new("root");
//! builder.add_node("root", "avoidance", Box::new(IdentityMap)).unwrap();
//! // Attaching under a name that was never added is a configuration error.
//! assert!(builder.add_node("nowhere", "lost", Box::new(IdentityMap)).is_err());
//! let _root = builder.build();
//! ```

use std::collections::HashSet;

use rmpflow_types::TreeError;
use tracing::debug;

use crate::policy::{Policy, TaskMap};
use crate::tree::{RmpNode, RmpRoot};

/// Assembles an [`RmpRoot`] one node at a time, parent referenced by name.
pub struct RmpTreeBuilder {
    root_name: String,
    children: Vec<RmpNode>,
    names: HashSet<String>,
}

impl std::fmt::Debug for RmpTreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RmpTreeBuilder")
            .field("root_name", &self.root_name)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl RmpTreeBuilder {
    /// Start a tree whose root (identity task map, configuration space)
    /// carries the given diagnostic name.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        let mut names = HashSet::new();
        names.insert(root_name.clone());
        Self {
            root_name,
            children: Vec::new(),
            names,
        }
    }

    /// Attach an internal fusion node under `parent`.
    pub fn add_node(
        &mut self,
        parent: &str,
        name: impl Into<String>,
        map: Box<dyn TaskMap>,
    ) -> Result<&mut Self, TreeError> {
        let name = name.into();
        self.attach(
            parent,
            RmpNode::Fusion {
                name,
                map,
                children: Vec::new(),
            },
        )?;
        Ok(self)
    }

    /// Attach a policy leaf under `parent`.
    pub fn add_leaf(
        &mut self,
        parent: &str,
        name: impl Into<String>,
        policy: Box<dyn Policy>,
    ) -> Result<&mut Self, TreeError> {
        let name = name.into();
        self.attach(parent, RmpNode::Leaf { name, policy })?;
        Ok(self)
    }

    /// Finish assembly.  Infallible: every structural invariant was
    /// enforced when the offending node would have been attached.
    pub fn build(self) -> RmpRoot {
        debug!(root = %self.root_name, nodes = self.names.len() - 1, "policy tree built");
        RmpRoot::new(self.root_name, self.children)
    }

    fn attach(&mut self, parent: &str, node: RmpNode) -> Result<(), TreeError> {
        if self.names.contains(node.name()) {
            return Err(TreeError::DuplicateName(node.name().to_string()));
        }
        let child_name = node.name().to_string();

        if parent == self.root_name {
            self.names.insert(child_name);
            self.children.push(node);
            return Ok(());
        }

        match find_mut(&mut self.children, parent) {
            None => Err(TreeError::UnknownParent {
                parent: parent.to_string(),
                child: child_name,
            }),
            Some(RmpNode::Leaf { .. }) => Err(TreeError::LeafParent {
                parent: parent.to_string(),
                child: child_name,
            }),
            Some(RmpNode::Fusion { children, .. }) => {
                self.names.insert(child_name);
                children.push(node);
                Ok(())
            }
        }
    }
}

/// Depth-first search for a node by name.
fn find_mut<'a>(nodes: &'a mut [RmpNode], name: &str) -> Option<&'a mut RmpNode> {
    for node in nodes {
        if node.name() == name {
            return Some(node);
        }
        if let RmpNode::Fusion { children, .. } = node {
            if let Some(found) = find_mut(children, name) {
                return Some(found);
            }
        }
    }
    None
}
