//! AWS Organizations domain model and enumeration sources
//!
//! Node types, the paginated listing boundary, and the adapters that plug
//! organization listings into the traversal engine.

pub mod api;
pub mod snapshot;
pub mod source;
pub mod types;

pub use api::{iter_accounts, iter_roots, iter_units, OrgApi, Page, PageIter};
pub use snapshot::{OrgDescription, SnapshotOrg, DEFAULT_PAGE_SIZE};
pub use source::{OrgChildSource, OrgRootSource};
pub use types::{Account, NodeType, OrgNode, OrgUnit, Root};
