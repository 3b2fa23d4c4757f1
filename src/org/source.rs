//! Engine collaborators over the Organizations API
//!
//! Adapts [`OrgApi`] listings to the traversal engine's collaborator
//! contracts: roots seed the walk, and each root or organizational unit
//! expands to its child accounts followed by its child units. Accounts are
//! leaves and are never listed against.

use crate::org::api::{iter_accounts, iter_roots, iter_units, OrgApi};
use crate::org::types::OrgNode;
use crate::walker::traits::{ChildSource, RootSource, SourceError};
use std::sync::Arc;

/// Seeds a traversal with the organization's roots.
pub struct OrgRootSource<A> {
    api: Arc<A>,
}

impl<A: OrgApi> OrgRootSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A: OrgApi> RootSource for OrgRootSource<A> {
    type Node = OrgNode;

    fn roots(&self) -> Result<Vec<OrgNode>, SourceError> {
        iter_roots(self.api.as_ref())
            .map(|root| root.map(OrgNode::Root).map_err(SourceError::from))
            .collect()
    }
}

/// Expands a root or organizational unit into its direct children.
pub struct OrgChildSource<A> {
    api: Arc<A>,
}

impl<A: OrgApi> OrgChildSource<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A: OrgApi> ChildSource for OrgChildSource<A> {
    type Node = OrgNode;

    fn children(&self, node: &OrgNode) -> Result<Vec<OrgNode>, SourceError> {
        if node.is_leaf() {
            return Ok(Vec::new());
        }
        let parent_id = node.id();

        let mut children = Vec::new();
        for account in iter_accounts(self.api.as_ref(), parent_id) {
            children.push(OrgNode::Account(account?));
        }
        for unit in iter_units(self.api.as_ref(), parent_id) {
            children.push(OrgNode::OrganizationalUnit(unit?));
        }
        Ok(children)
    }
}
