//! Worker loop for parallel hierarchy traversal
//!
//! Each worker pulls (node, parent) items from the shared queue, invokes the
//! visitor, asks the child source for the node's children, and enqueues each
//! child with the node as its parent. The item is marked done only after all
//! of that has happened, via a guard that also fires on failure paths.

use crate::walker::queue::{DoneGuard, QueueHandle, WorkItem};
use crate::walker::traits::{ChildSource, FailureStage, NodeFailure, NodeVisitor};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Nodes visited
    pub visited: AtomicU64,

    /// Children discovered and enqueued
    pub discovered: AtomicU64,

    /// Per-node failures recorded
    pub failures: AtomicU64,
}

impl WorkerStats {
    fn record_visit(&self) {
        self.visited.fetch_add(1, Ordering::Relaxed);
    }

    fn record_discovered(&self, count: u64) {
        self.discovered.fetch_add(count, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Aggregate (visited, discovered, failures) across all workers
pub fn aggregate_stats(stats: &[WorkerStats]) -> (u64, u64, u64) {
    let mut visited = 0u64;
    let mut discovered = 0u64;
    let mut failures = 0u64;

    for s in stats {
        visited += s.visited.load(Ordering::Relaxed);
        discovered += s.discovered.load(Ordering::Relaxed);
        failures += s.failures.load(Ordering::Relaxed);
    }

    (visited, discovered, failures)
}

/// Main worker loop: poll for work until the shutdown flag is observed.
///
/// The flag is only raised after the pending count has drained (or the
/// traversal was cancelled), so exiting on a timed-out poll is safe.
#[allow(clippy::too_many_arguments)]
pub(crate) fn worker_loop<N, C, V>(
    id: usize,
    queue: QueueHandle<N>,
    children: &C,
    visitor: &V,
    shutdown: &AtomicBool,
    failures: &Mutex<Vec<NodeFailure<N>>>,
    stats: &WorkerStats,
    poll_timeout: Duration,
) where
    N: Clone + Send,
    C: ChildSource<Node = N>,
    V: NodeVisitor<Node = N>,
{
    debug!(worker = id, "worker starting");

    while !shutdown.load(Ordering::Relaxed) {
        let item = match queue.dequeue(poll_timeout) {
            Some(item) => item,
            None => continue, // timeout, re-check shutdown
        };

        // Marks the item done on every exit path below
        let _done = DoneGuard::new(&queue);

        process_item(id, item, &queue, children, visitor, failures, stats);
    }

    debug!(
        worker = id,
        visited = stats.visited.load(Ordering::Relaxed),
        "worker stopping"
    );
}

/// One unit of work: visit, expand, enqueue children.
fn process_item<N, C, V>(
    worker_id: usize,
    item: WorkItem<N>,
    queue: &QueueHandle<N>,
    children: &C,
    visitor: &V,
    failures: &Mutex<Vec<NodeFailure<N>>>,
    stats: &WorkerStats,
) where
    N: Clone + Send,
    C: ChildSource<Node = N>,
    V: NodeVisitor<Node = N>,
{
    if let Err(error) = visitor.visit(&item.node, item.parent.as_ref()) {
        stats.record_failure();
        warn!(worker = worker_id, error = %error, "visit failed, abandoning subtree");
        record_failure(failures, item.node, FailureStage::Visit, error);
        return;
    }
    stats.record_visit();

    match children.children(&item.node) {
        Ok(kids) => {
            stats.record_discovered(kids.len() as u64);
            trace!(worker = worker_id, children = kids.len(), "node expanded");
            for child in kids {
                queue.enqueue(child, Some(item.node.clone()));
            }
        }
        Err(error) => {
            stats.record_failure();
            warn!(worker = worker_id, error = %error, "child enumeration failed, abandoning subtree");
            record_failure(failures, item.node, FailureStage::Expand, error);
        }
    }
}

fn record_failure<N>(
    failures: &Mutex<Vec<NodeFailure<N>>>,
    node: N,
    stage: FailureStage,
    error: crate::walker::traits::SourceError,
) {
    failures
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(NodeFailure { node, stage, error });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record_visit();
        stats.record_discovered(10);
        stats.record_failure();

        assert_eq!(stats.visited.load(Ordering::Relaxed), 1);
        assert_eq!(stats.discovered.load(Ordering::Relaxed), 10);
        assert_eq!(stats.failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_aggregate_stats() {
        let a = WorkerStats::default();
        let b = WorkerStats::default();
        a.record_visit();
        a.record_discovered(3);
        b.record_visit();
        b.record_failure();

        let (visited, discovered, failures) = aggregate_stats(&[a, b]);
        assert_eq!(visited, 2);
        assert_eq!(discovered, 3);
        assert_eq!(failures, 1);
    }
}
