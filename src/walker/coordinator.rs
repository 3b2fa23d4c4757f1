//! Traversal coordinator - orchestrates the concurrent hierarchy walk
//!
//! The coordinator seeds the work queue from the root source, spawns the
//! worker pool, waits for the pending count to drain, signals shutdown, and
//! joins the workers before handing the caller a report of what happened.

use crate::error::TraverseError;
use crate::walker::queue::WorkQueue;
use crate::walker::traits::{ChildSource, NodeFailure, NodeVisitor, RootSource};
use crate::walker::worker::{aggregate_stats, worker_loop, WorkerStats};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Default degree of parallelism
pub const DEFAULT_WORKER_COUNT: usize = 2;

/// Default bound on a worker's idle dequeue wait
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// How often the completion wait re-checks the cancel flag
const COMPLETION_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Tuning knobs for a traversal
#[derive(Debug, Clone)]
pub struct TraverseOptions {
    /// Degree of parallelism
    pub worker_count: usize,

    /// Bound on each worker's idle dequeue wait before it re-checks the
    /// shutdown flag
    pub poll_timeout: Duration,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl TraverseOptions {
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }
}

/// Result of a finished traversal
#[derive(Debug)]
pub struct TraversalReport<N> {
    /// Nodes handed to the visitor
    pub visited: u64,

    /// Children discovered and enqueued
    pub discovered: u64,

    /// Per-node failures; each one abandoned the subtree below it
    pub failures: Vec<NodeFailure<N>>,

    /// Wall-clock time of the traversal
    pub duration: Duration,

    /// Whether the traversal drained (vs was cancelled)
    pub completed: bool,
}

impl<N> TraversalReport<N> {
    /// True when the traversal drained with no recorded failures
    pub fn is_clean(&self) -> bool {
        self.completed && self.failures.is_empty()
    }
}

/// Coordinates a concurrent traversal over one hierarchy.
pub struct Traversal {
    options: TraverseOptions,
    cancel: Arc<AtomicBool>,
}

impl Traversal {
    pub fn new(options: TraverseOptions) -> Self {
        Self {
            options,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the cancel flag (for signal handlers).
    ///
    /// Setting it makes [`run`](Self::run) return early with
    /// `completed == false`; in-flight collaborator calls finish first.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the traversal to completion.
    ///
    /// The root source is consulted exactly once, before any worker starts;
    /// a failure there aborts synchronously. Per-node collaborator failures
    /// do not abort the run and are returned in the report.
    pub fn run<N, R, C, V>(
        &self,
        roots: &R,
        children: &C,
        visitor: &V,
    ) -> Result<TraversalReport<N>, TraverseError>
    where
        N: Clone + Send,
        R: RootSource<Node = N>,
        C: ChildSource<Node = N>,
        V: NodeVisitor<Node = N>,
    {
        let start = Instant::now();
        let queue: WorkQueue<N> = WorkQueue::new();

        let seeds = roots.roots().map_err(TraverseError::Roots)?;
        let seeded = seeds.len();
        for root in seeds {
            queue.enqueue(root, None);
        }

        info!(
            roots = seeded,
            workers = self.options.worker_count,
            "starting traversal"
        );

        let shutdown = AtomicBool::new(false);
        let failures: Mutex<Vec<NodeFailure<N>>> = Mutex::new(Vec::new());
        let stats: Vec<WorkerStats> = (0..self.options.worker_count)
            .map(|_| WorkerStats::default())
            .collect();

        let completed = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.options.worker_count);

            for (id, worker_stats) in stats.iter().enumerate() {
                let handle = queue.handle();
                let poll_timeout = self.options.poll_timeout;
                let shutdown = &shutdown;
                let failures = &failures;
                let spawned = thread::Builder::new()
                    .name(format!("walker-{}", id))
                    .spawn_scoped(scope, move || {
                        worker_loop(
                            id,
                            handle,
                            children,
                            visitor,
                            shutdown,
                            failures,
                            worker_stats,
                            poll_timeout,
                        )
                    });

                match spawned {
                    Ok(h) => handles.push(h),
                    Err(e) => {
                        shutdown.store(true, Ordering::SeqCst);
                        for h in handles {
                            let _ = h.join();
                        }
                        return Err(TraverseError::WorkerSpawn {
                            id,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            let completed = queue.wait_interruptible(&self.cancel, COMPLETION_CHECK_INTERVAL);

            // The stop flag may only be raised after the completion wait has
            // unblocked: at that point no unprocessed items remain, so a
            // worker's timeout-bounded poll loop is safe to exit as soon as
            // it observes the flag.
            shutdown.store(true, Ordering::SeqCst);

            for (id, h) in handles.into_iter().enumerate() {
                if h.join().is_err() {
                    warn!(worker = id, "worker thread panicked");
                }
            }

            Ok(completed)
        })?;

        let (visited, discovered, failure_count) = aggregate_stats(&stats);
        let failures = {
            let mut guard = failures.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };
        debug_assert_eq!(failure_count, failures.len() as u64);

        let duration = start.elapsed();
        info!(
            visited,
            discovered,
            failures = failures.len(),
            duration_ms = duration.as_millis() as u64,
            completed,
            "traversal finished"
        );

        Ok(TraversalReport {
            visited,
            discovered,
            failures,
            duration,
            completed,
        })
    }
}

/// Traverse a hierarchy with a fixed pool of concurrent workers, invoking
/// `visitor` exactly once per discovered (node, parent) pair.
pub fn traverse<N, R, C, V>(
    roots: &R,
    children: &C,
    visitor: &V,
    options: TraverseOptions,
) -> Result<TraversalReport<N>, TraverseError>
where
    N: Clone + Send,
    R: RootSource<Node = N>,
    C: ChildSource<Node = N>,
    V: NodeVisitor<Node = N>,
{
    Traversal::new(options).run(roots, children, visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::traits::SourceError;
    use std::collections::HashSet;

    fn no_children(_n: &u32) -> Result<Vec<u32>, SourceError> {
        Ok(Vec::new())
    }

    #[test]
    fn test_empty_roots_completes_immediately() {
        let roots = || Ok::<_, SourceError>(Vec::<u32>::new());
        let seen: Mutex<Vec<u32>> = Mutex::new(Vec::new());
        let visit = |n: &u32, _p: Option<&u32>| {
            seen.lock().unwrap().push(*n);
            Ok::<(), SourceError>(())
        };

        let report = traverse(&roots, &no_children, &visit, TraverseOptions::default()).unwrap();

        assert!(report.completed);
        assert_eq!(report.visited, 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_childless_roots_visited_once_each() {
        let roots = || Ok::<_, SourceError>(vec![10u32, 20, 30]);
        let seen: Mutex<Vec<u32>> = Mutex::new(Vec::new());
        let visit = |n: &u32, p: Option<&u32>| {
            assert!(p.is_none());
            seen.lock().unwrap().push(*n);
            Ok::<(), SourceError>(())
        };

        let report = traverse(&roots, &no_children, &visit, TraverseOptions::default()).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.visited, 3);
        let seen: HashSet<u32> = seen.lock().unwrap().iter().copied().collect();
        assert_eq!(seen, HashSet::from([10, 20, 30]));
    }

    #[test]
    fn test_root_source_failure_is_fatal() {
        let roots = || Err::<Vec<u32>, SourceError>("listing roots denied".into());
        let visit = |_n: &u32, _p: Option<&u32>| Ok::<(), SourceError>(());

        let err = traverse(&roots, &no_children, &visit, TraverseOptions::default()).unwrap_err();
        assert!(matches!(err, TraverseError::Roots(_)));
    }
}
