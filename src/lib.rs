//! org-walker - Parallel AWS Organizations Hierarchy Walker
//!
//! Walks an organization's root/unit/account hierarchy through a paginated
//! listing API with a pool of worker threads, handing every discovered
//! (node, parent) pair to a visitor exactly once. Visitors build the
//! output structures: an indented text tree, flat or nested JSON, or a
//! Graphviz DOT graph.
//!
//! # Architecture
//!
//! ```text
//!   roots ──► ┌────────────────────────┐
//!             │       Work Queue       │ ◄──────────────┐
//!             │  (node, parent) FIFO   │                │
//!             │   + pending counter    │                │ children
//!             └───────────┬────────────┘                │
//!                         │ dequeue                     │
//!          ┌──────────────┼──────────────┐              │
//!    ┌─────▼────┐   ┌─────▼────┐   ┌─────▼────┐         │
//!    │ Worker 1 │   │ Worker 2 │   │ Worker N │ ────────┘
//!    └─────┬────┘   └─────┬────┘   └─────┬────┘
//!          │   visit      │              │
//!          ▼              ▼              ▼
//!    ┌─────────────────────────────────────────┐
//!    │     Visitor (tree / graph builder)      │
//!    └─────────────────────────────────────────┘
//! ```
//!
//! The pending counter reaches zero exactly when every enqueued node's
//! visit-and-expand unit of work has finished; that is the completion
//! signal the driving thread waits on before stopping the workers.
//!
//! # Example
//!
//! ```bash
//! # Text tree with custom labels
//! org-walker org.json --node-name-format '{Name} ({Id})'
//!
//! # Flat JSON, eight workers
//! org-walker org.json --tree-format json-flat -w 8
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod org;
pub mod tree;
pub mod walker;

pub use config::{CliArgs, TreeFormat, WalkConfig};
pub use error::{ConfigError, OrgApiError, Result, TraverseError, TreeError, WalkerError};
pub use graph::{OrgGraph, OrgGraphBuilder};
pub use org::{OrgApi, OrgChildSource, OrgNode, OrgRootSource, SnapshotOrg};
pub use tree::{OrgTree, OrgTreeBuilder};
pub use walker::{traverse, Traversal, TraversalReport, TraverseOptions};
