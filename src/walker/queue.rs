//! Work queue with completion detection
//!
//! The queue is a thread-safe FIFO of (node, parent) work items paired with
//! a pending-item counter. The counter is raised on enqueue and lowered only
//! when a dequeued item's full unit of work (visit + enumerate + enqueue
//! children) has finished, so a count of zero is the sole authoritative
//! signal that the traversal is complete.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// A unit of traversal work: a discovered node and the node it was
/// discovered under. Roots carry no parent.
#[derive(Debug, Clone)]
pub struct WorkItem<N> {
    pub node: N,
    pub parent: Option<N>,
}

impl<N> WorkItem<N> {
    pub fn new(node: N, parent: Option<N>) -> Self {
        Self { node, parent }
    }

    /// Create a root item
    pub fn root(node: N) -> Self {
        Self { node, parent: None }
    }
}

/// Pending-item counter with completion notification.
#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn increment(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(*count > 0, "pending count underflow");
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn current(&self) -> usize {
        *self.count.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn wait(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        while *count > 0 {
            count = self.drained.wait(count).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Wait for the count to reach zero, re-checking `cancel` every
    /// `interval`. Returns true if the queue drained, false if cancelled.
    fn wait_interruptible(&self, cancel: &AtomicBool, interval: Duration) -> bool {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if *count == 0 {
                return true;
            }
            if cancel.load(Ordering::Relaxed) {
                return false;
            }
            let (guard, _) = self
                .drained
                .wait_timeout(count, interval)
                .unwrap_or_else(|e| e.into_inner());
            count = guard;
        }
    }
}

/// FIFO work queue shared by the driving thread and the worker pool.
///
/// Enqueueing never blocks. Dequeueing is bounded by a timeout so idle
/// workers can periodically re-check the shutdown flag.
pub struct WorkQueue<N> {
    sender: Sender<WorkItem<N>>,
    receiver: Receiver<WorkItem<N>>,
    pending: Arc<Pending>,
}

impl<N> WorkQueue<N> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: Arc::new(Pending::default()),
        }
    }

    /// Get a handle for this queue (clone one per worker)
    pub fn handle(&self) -> QueueHandle<N> {
        QueueHandle {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            pending: Arc::clone(&self.pending),
        }
    }

    /// Append an item and raise the pending count.
    ///
    /// The count is raised before the item becomes visible so a concurrent
    /// `wait` cannot observe zero while the item is still in flight.
    pub fn enqueue(&self, node: N, parent: Option<N>) {
        self.pending.increment();
        // The queue holds a receiver for its whole lifetime, so the channel
        // cannot be disconnected here.
        let _ = self.sender.send(WorkItem::new(node, parent));
    }

    /// Number of enqueued items whose unit of work has not finished
    pub fn pending(&self) -> usize {
        self.pending.current()
    }

    /// Number of items currently queued (not yet dequeued)
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Block the driving thread until the pending count reaches zero.
    ///
    /// Returns immediately when nothing was ever enqueued.
    pub fn wait(&self) {
        self.pending.wait();
    }

    /// Like [`wait`](Self::wait), but gives up when `cancel` is set.
    /// Returns true if the traversal drained, false if cancelled.
    pub fn wait_interruptible(&self, cancel: &AtomicBool, interval: Duration) -> bool {
        self.pending.wait_interruptible(cancel, interval)
    }
}

impl<N> Default for WorkQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker-side handle: dequeue items, enqueue discovered children, and mark
/// finished units of work done.
pub struct QueueHandle<N> {
    sender: Sender<WorkItem<N>>,
    receiver: Receiver<WorkItem<N>>,
    pending: Arc<Pending>,
}

impl<N> Clone for QueueHandle<N> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<N> QueueHandle<N> {
    /// Append an item; never blocks
    pub fn enqueue(&self, node: N, parent: Option<N>) {
        self.pending.increment();
        let _ = self.sender.send(WorkItem::new(node, parent));
    }

    /// Dequeue with a bounded wait. Returns None on timeout so the caller
    /// can re-check shutdown state.
    pub fn dequeue(&self, timeout: Duration) -> Option<WorkItem<N>> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Lower the pending count for one fully processed item.
    ///
    /// Must be called only after the item's children have been enumerated
    /// and enqueued; lowering the count at dequeue time would let `wait`
    /// observe zero while children are still in flight.
    pub fn mark_done(&self) {
        self.pending.decrement();
    }
}

/// Guard that marks a dequeued item's unit of work done on drop.
///
/// Ensures `mark_done` runs on every exit path, including collaborator
/// failures and panics; a missed `mark_done` would leave the pending count
/// above zero and `wait` blocked forever.
pub struct DoneGuard<'a, N> {
    handle: &'a QueueHandle<N>,
}

impl<'a, N> DoneGuard<'a, N> {
    pub fn new(handle: &'a QueueHandle<N>) -> Self {
        Self { handle }
    }
}

impl<N> Drop for DoneGuard<'_, N> {
    fn drop(&mut self) {
        self.handle.mark_done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_queue_fifo() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.enqueue(1, None);
        queue.enqueue(2, Some(1));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pending(), 2);

        let handle = queue.handle();
        let first = handle.dequeue(Duration::from_millis(10)).unwrap();
        assert_eq!(first.node, 1);
        assert_eq!(first.parent, None);

        let second = handle.dequeue(Duration::from_millis(10)).unwrap();
        assert_eq!(second.node, 2);
        assert_eq!(second.parent, Some(1));
    }

    #[test]
    fn test_dequeue_timeout_on_empty() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        let handle = queue.handle();
        assert!(handle.dequeue(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_wait_returns_immediately_when_nothing_enqueued() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.wait();
    }

    #[test]
    fn test_pending_drains_only_on_mark_done() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        let handle = queue.handle();

        queue.enqueue(1, None);
        let _item = handle.dequeue(Duration::from_millis(10)).unwrap();

        // Dequeued but not done yet
        assert_eq!(queue.pending(), 1);

        handle.mark_done();
        assert_eq!(queue.pending(), 0);
        queue.wait();
    }

    #[test]
    fn test_wait_blocks_until_worker_finishes() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.enqueue(1, None);

        let handle = queue.handle();
        let worker = thread::spawn(move || {
            let item = handle.dequeue(Duration::from_millis(500)).unwrap();
            let _done = DoneGuard::new(&handle);
            // Child discovered mid-unit keeps the queue pending
            handle.enqueue(item.node + 1, Some(item.node));
        });

        worker.join().unwrap();
        assert_eq!(queue.pending(), 1);

        let handle = queue.handle();
        let child = handle.dequeue(Duration::from_millis(10)).unwrap();
        assert_eq!(child.node, 2);
        handle.mark_done();
        queue.wait();
    }

    #[test]
    fn test_done_guard_marks_done_on_early_exit() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.enqueue(1, None);

        let handle = queue.handle();
        let _item = handle.dequeue(Duration::from_millis(10)).unwrap();
        {
            let _done = DoneGuard::new(&handle);
            // Simulated collaborator failure: leave the unit of work early
        }
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_wait_interruptible_cancel() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.enqueue(1, None);

        let cancel = AtomicBool::new(true);
        let drained = queue.wait_interruptible(&cancel, Duration::from_millis(5));
        assert!(!drained);
    }

    #[test]
    fn test_wait_interruptible_drains() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        queue.enqueue(1, None);

        let handle = queue.handle();
        let worker = thread::spawn(move || {
            let _item = handle.dequeue(Duration::from_millis(500)).unwrap();
            handle.mark_done();
        });

        let cancel = AtomicBool::new(false);
        assert!(queue.wait_interruptible(&cancel, Duration::from_millis(5)));
        worker.join().unwrap();
    }
}
