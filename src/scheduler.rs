//! Joint scheduler
//!
//! Orders joints by how many of their members are still unsolved, so the
//! solver always picks the joint closest to being statically determinate.
//!
//! The underlying binary heap cannot change the priority of an entry in
//! place. When a joint's unknown count drops, a fresh entry is pushed and the
//! old one is left behind. Consumers must treat the popped count as a hint and
//! recompute the live count before acting on it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::NodeIndex;

/// A queued joint together with the unknown count it had when queued.
///
/// Entries order by `unknowns` first and by joint index second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledJoint {
    /// Number of unsolved members at the time of queueing.
    pub unknowns: usize,
    /// The joint to visit.
    pub joint: NodeIndex,
}

/// Min-priority queue of joints with a fixed pop budget.
#[derive(Clone, Debug)]
pub struct JointScheduler {
    heap: BinaryHeap<Reverse<ScheduledJoint>>,
    pops_remaining: usize,
}

impl JointScheduler {
    /// Seed the queue with `entries`; at most `budget` entries will be popped.
    pub fn new<I>(entries: I, budget: usize) -> Self
    where
        I: IntoIterator<Item = (NodeIndex, usize)>,
    {
        let heap = entries
            .into_iter()
            .map(|(joint, unknowns)| Reverse(ScheduledJoint { unknowns, joint }))
            .collect();
        Self {
            heap,
            pops_remaining: budget,
        }
    }

    /// Queue `joint` again with a refreshed unknown count.
    ///
    /// Older entries for the same joint are not removed.
    pub fn push(&mut self, joint: NodeIndex, unknowns: usize) {
        self.heap.push(Reverse(ScheduledJoint { unknowns, joint }));
    }

    /// Take the entry with the fewest unknowns.
    ///
    /// Returns `None` once the budget is spent or nothing is queued.
    pub fn pop(&mut self) -> Option<ScheduledJoint> {
        if self.pops_remaining == 0 {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        self.pops_remaining -= 1;
        Some(entry)
    }

    /// Number of pops still allowed.
    #[must_use]
    pub fn pops_remaining(&self) -> usize {
        self.pops_remaining
    }

    /// Number of entries queued, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
