//! Org tree accumulation
//!
//! [`OrgTreeBuilder`] is the traversal visitor that records (node, parent)
//! pairs as they are discovered; [`OrgTree`] is the finished structure.
//! Nodes live in an arena and an id-to-slot index makes the parent lookup
//! on insert O(1) regardless of tree size.

pub mod export;
pub mod render;

pub use export::{to_flat_json, to_nested_json};
pub use render::{render_text_tree, NodeFormat, DEFAULT_NODE_FORMAT};

use crate::error::TreeError;
use crate::org::types::OrgNode;
use crate::walker::traits::{NodeVisitor, SourceError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct TreeSlot {
    node: OrgNode,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A built organization hierarchy.
///
/// Child order is insertion order, which under a single-worker traversal is
/// the listing order of the provider.
#[derive(Debug, Clone, Default)]
pub struct OrgTree {
    slots: Vec<TreeSlot>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl OrgTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&OrgNode> {
        self.index.get(id).map(|&slot| &self.slots[slot].node)
    }

    /// The parent of `id`, or None for roots and unknown ids
    pub fn parent_of(&self, id: &str) -> Option<&OrgNode> {
        let slot = *self.index.get(id)?;
        let parent = self.slots[slot].parent?;
        Some(&self.slots[parent].node)
    }

    /// Insert a node under an already-inserted parent (None for roots).
    pub fn insert(&mut self, node: OrgNode, parent_id: Option<&str>) -> Result<(), TreeError> {
        if self.index.contains_key(node.id()) {
            return Err(TreeError::DuplicateNode {
                id: node.id().to_string(),
            });
        }
        let parent_slot = match parent_id {
            None => None,
            Some(pid) => Some(*self.index.get(pid).ok_or_else(|| TreeError::UnknownParent {
                id: pid.to_string(),
            })?),
        };

        let slot = self.slots.len();
        self.index.insert(node.id().to_string(), slot);
        self.slots.push(TreeSlot {
            node,
            parent: parent_slot,
            children: Vec::new(),
        });

        match parent_slot {
            Some(parent) => self.slots[parent].children.push(slot),
            None => self.roots.push(slot),
        }
        Ok(())
    }

    pub fn roots(&self) -> impl Iterator<Item = &OrgNode> + '_ {
        self.roots.iter().map(move |&slot| &self.slots[slot].node)
    }

    /// Direct children of `id`, in insertion order
    pub fn children_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a OrgNode> + 'a {
        let children = self
            .index
            .get(id)
            .map(|&slot| self.slots[slot].children.as_slice())
            .unwrap_or(&[]);
        children.iter().map(move |&slot| &self.slots[slot].node)
    }

    /// Level-order (node, parent) pairs across all roots
    pub fn iter_level_order(&self) -> impl Iterator<Item = (&OrgNode, Option<&OrgNode>)> + '_ {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut fifo: VecDeque<usize> = self.roots.iter().copied().collect();
        while let Some(slot) = fifo.pop_front() {
            order.push(slot);
            fifo.extend(self.slots[slot].children.iter().copied());
        }
        order.into_iter().map(move |slot| {
            let entry = &self.slots[slot];
            (&entry.node, entry.parent.map(|p| &self.slots[p].node))
        })
    }
}

/// Traversal visitor that accumulates visited nodes into an [`OrgTree`].
///
/// Shared across workers; inserts are serialized by an internal lock. A
/// node always arrives after its parent, because children are only
/// discovered once their parent's visit has completed.
#[derive(Debug, Default)]
pub struct OrgTreeBuilder {
    tree: Mutex<OrgTree>,
}

impl OrgTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and take the accumulated tree
    pub fn into_tree(self) -> OrgTree {
        self.tree.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl NodeVisitor for OrgTreeBuilder {
    type Node = OrgNode;

    fn visit(&self, node: &OrgNode, parent: Option<&OrgNode>) -> Result<(), SourceError> {
        let mut tree = self.tree.lock().unwrap_or_else(|e| e.into_inner());
        tree.insert(node.clone(), parent.map(OrgNode::id))?;
        Ok(())
    }
}
