//! Symmetric bookkeeping of solved member forces.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

/// Unordered pair of joints identifying a member.
///
/// The pair is normalised on construction so `(a, b)` and `(b, a)` compare
/// equal and hash identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberKey {
    low: NodeIndex,
    high: NodeIndex,
}

impl MemberKey {
    /// Key for the member between `a` and `b`, in either orientation.
    #[must_use]
    pub fn new(a: NodeIndex, b: NodeIndex) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Endpoint with the lower index.
    #[must_use]
    pub fn low(&self) -> NodeIndex {
        self.low
    }

    /// Endpoint with the higher index.
    #[must_use]
    pub fn high(&self) -> NodeIndex {
        self.high
    }

    /// Whether `joint` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, joint: NodeIndex) -> bool {
        self.low == joint || self.high == joint
    }
}

/// Map from member to signed axial force; positive is tension.
///
/// A member is in the ledger exactly when its force has been solved, so the
/// ledger doubles as the solved flag of every member.
///
/// # Examples
/// ```
/// use petgraph::graph::NodeIndex;
/// use trussjoint::ForceLedger;
///
/// let (a, b) = (NodeIndex::new(0), NodeIndex::new(4));
/// let mut ledger = ForceLedger::new();
/// ledger.record(b, a, 11.18);
/// assert_eq!(ledger.force(a, b), Some(11.18));
/// assert!(ledger.is_solved(b, a));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceLedger {
    forces: BTreeMap<MemberKey, f64>,
}

impl ForceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the force of the member between `a` and `b`, marking it solved.
    ///
    /// Returns the previously recorded force, if any.
    pub fn record(&mut self, a: NodeIndex, b: NodeIndex, force: f64) -> Option<f64> {
        self.forces.insert(MemberKey::new(a, b), force)
    }

    /// Force of the member between `a` and `b`, if solved.
    #[must_use]
    pub fn force(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        self.forces.get(&MemberKey::new(a, b)).copied()
    }

    /// Whether the member between `a` and `b` has been solved.
    #[must_use]
    pub fn is_solved(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.forces.contains_key(&MemberKey::new(a, b))
    }

    /// Solved members with their forces, each once, ordered by lower then
    /// higher endpoint.
    pub fn iter(&self) -> impl Iterator<Item = (MemberKey, f64)> + '_ {
        self.forces.iter().map(|(key, force)| (*key, *force))
    }

    /// Solved members attached to `joint`.
    pub fn attached_to(&self, joint: NodeIndex) -> impl Iterator<Item = (MemberKey, f64)> + '_ {
        self.iter().filter(move |(key, _)| key.touches(joint))
    }

    /// Number of solved members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Whether no member has been solved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }
}
