//! Concurrent hierarchy traversal engine
//!
//! Generic over the node type: collaborators supply the roots, each node's
//! children, and the per-node visit; the engine guarantees every reachable
//! node is handed to the visitor exactly once, without losing nodes,
//! double-visiting them, or deadlocking.
//!
//! Ordering: a node is always visited after its parent. With one worker the
//! FIFO queue yields strict level order; with more workers, sibling and
//! cross-branch order is unspecified.

pub mod coordinator;
pub mod queue;
pub mod traits;
pub mod worker;

pub use coordinator::{
    traverse, Traversal, TraversalReport, TraverseOptions, DEFAULT_POLL_TIMEOUT,
    DEFAULT_WORKER_COUNT,
};
pub use queue::{DoneGuard, QueueHandle, WorkItem, WorkQueue};
pub use traits::{
    ChildSource, FailureStage, NodeFailure, NodeVisitor, RootSource, SourceError,
};
pub use worker::WorkerStats;
