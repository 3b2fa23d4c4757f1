//! Collaborator contracts for the traversal engine
//!
//! The engine is generic over the node type and knows nothing about the
//! remote API. Callers supply three collaborators: a root source consulted
//! once to seed the traversal, a child source consulted per node to expand
//! it, and a visitor invoked exactly once per discovered node.

use std::error::Error;
use std::fmt;

/// Error raised inside a collaborator.
///
/// Collaborators wrap remote APIs with their own error types; the engine only
/// needs to carry them through to the final report.
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

/// Produces the initial set of nodes, which have no parent.
///
/// Called exactly once, synchronously, before any worker starts consuming.
/// A failure here aborts the traversal before it begins.
pub trait RootSource {
    type Node;

    fn roots(&self) -> Result<Vec<Self::Node>, SourceError>;
}

/// Produces the children of a node.
///
/// Called concurrently by multiple workers for different nodes.
/// Implementations page through the remote listing themselves and must not
/// assume a fixed page size or a maximum child count.
pub trait ChildSource: Send + Sync {
    type Node;

    fn children(&self, node: &Self::Node) -> Result<Vec<Self::Node>, SourceError>;
}

/// Invoked exactly once per discovered `(node, parent)` pair.
///
/// Called concurrently by multiple workers. A visitor that mutates shared
/// output state must synchronize that state itself; the engine provides no
/// locking around visitor side effects.
pub trait NodeVisitor: Send + Sync {
    type Node;

    fn visit(&self, node: &Self::Node, parent: Option<&Self::Node>) -> Result<(), SourceError>;
}

impl<N, F> RootSource for F
where
    F: Fn() -> Result<Vec<N>, SourceError>,
{
    type Node = N;

    fn roots(&self) -> Result<Vec<N>, SourceError> {
        self()
    }
}

impl<N, F> ChildSource for F
where
    F: Fn(&N) -> Result<Vec<N>, SourceError> + Send + Sync,
{
    type Node = N;

    fn children(&self, node: &N) -> Result<Vec<N>, SourceError> {
        self(node)
    }
}

impl<N, F> NodeVisitor for F
where
    F: Fn(&N, Option<&N>) -> Result<(), SourceError> + Send + Sync,
{
    type Node = N;

    fn visit(&self, node: &N, parent: Option<&N>) -> Result<(), SourceError> {
        self(node, parent)
    }
}

/// Stage of a worker's unit of work that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The visitor rejected the node.
    Visit,
    /// The child source failed while enumerating children.
    Expand,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Visit => write!(f, "visit"),
            FailureStage::Expand => write!(f, "expand"),
        }
    }
}

/// A recorded per-node failure.
///
/// Failures are isolated: the subtree below the failed node is abandoned
/// while sibling branches continue. All failures are surfaced in the final
/// traversal report.
#[derive(Debug)]
pub struct NodeFailure<N> {
    /// The node whose unit of work failed.
    pub node: N,

    /// Which stage failed.
    pub stage: FailureStage,

    /// The collaborator's error.
    pub error: SourceError,
}

impl<N> fmt::Display for NodeFailure<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_collaborators() {
        let roots = || Ok::<_, SourceError>(vec![1u32, 2]);
        assert_eq!(RootSource::roots(&roots).unwrap(), vec![1, 2]);

        let children = |n: &u32| Ok::<_, SourceError>(vec![n * 10]);
        assert_eq!(ChildSource::children(&children, &3).unwrap(), vec![30]);

        let visit = |_n: &u32, _p: Option<&u32>| Ok::<(), SourceError>(());
        assert!(NodeVisitor::visit(&visit, &1, None).is_ok());
    }

    #[test]
    fn test_failure_stage_display() {
        assert_eq!(FailureStage::Visit.to_string(), "visit");
        assert_eq!(FailureStage::Expand.to_string(), "expand");
    }
}
