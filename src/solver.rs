//! Method-of-joints solve loop.
//!
//! Joints are visited in order of fewest unsolved members. Each visit
//! resolves one or two member forces from the joint's equilibrium and pushes
//! them onto the neighbors' accumulated loads, which in turn lowers the
//! neighbors' unknown counts. See
//! <https://en.wikipedia.org/wiki/Structural_analysis#Method_of_joints>.

use nalgebra::{Matrix2, Vector2};
use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, trace, warn};

use crate::equations::{member_force, solve_one_unknown, solve_two_unknowns};
use crate::errors::AnalysisError;
use crate::geometry::{unit_direction, Force};
use crate::labels::{joint_label, member_label};
use crate::ledger::ForceLedger;
use crate::scheduler::JointScheduler;
use crate::truss::Truss;

/// How the solve loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every scheduled pop was processed without meeting an indeterminate joint.
    Complete,
    /// The loop stopped at a joint with more than two unsolved members.
    Indeterminate {
        /// The joint that could not be resolved.
        joint: NodeIndex,
        /// Its unsolved member count when popped.
        unknowns: usize,
    },
}

/// One pop of the scheduler, as seen by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointVisit {
    /// The popped joint.
    pub joint: NodeIndex,
    /// Unknown count stored in the queue entry.
    pub queued_unknowns: usize,
    /// Unknown count recomputed when the entry was popped.
    pub live_unknowns: usize,
}

impl JointVisit {
    /// Whether the queue entry was out of date when popped.
    #[must_use]
    pub fn was_stale(&self) -> bool {
        self.queued_unknowns != self.live_unknowns
    }
}

/// Outcome of a method-of-joints solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Solved member forces.
    ledger: ForceLedger,
    /// Load accumulated at each joint, indexed like the joints.
    accumulated_loads: Vec<Force>,
    /// How the loop ended.
    status: SolveStatus,
    /// Every scheduler pop, in order.
    visits: Vec<JointVisit>,
}

impl Solution {
    /// Solved member forces; positive is tension.
    #[must_use]
    pub fn ledger(&self) -> &ForceLedger {
        &self.ledger
    }

    /// How the loop ended.
    #[must_use]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Whether the loop ran to the end without an indeterminate joint.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SolveStatus::Complete
    }

    /// External load plus the pull of every member solved from the far end.
    #[must_use]
    pub fn accumulated_load(&self, joint: NodeIndex) -> Option<Force> {
        self.accumulated_loads.get(joint.index()).copied()
    }

    /// Scheduler pops in the order they happened.
    #[must_use]
    pub fn visits(&self) -> &[JointVisit] {
        &self.visits
    }

    /// Signed force of the member between `a` and `b`, if solved.
    #[must_use]
    pub fn force(&self, a: NodeIndex, b: NodeIndex) -> Option<f64> {
        self.ledger.force(a, b)
    }

    /// Hand the ledger over, dropping the rest of the outcome.
    #[must_use]
    pub fn into_ledger(self) -> ForceLedger {
        self.ledger
    }
}

/// Mutable state of one solve.
struct JointSolver<'a> {
    truss: &'a Truss,
    ledger: ForceLedger,
    accumulated: Vec<Vector2<f64>>,
    scheduler: JointScheduler,
}

impl<'a> JointSolver<'a> {
    fn new(truss: &'a Truss) -> Self {
        let ledger = ForceLedger::new();
        let accumulated = truss
            .joints()
            .map(|joint| truss.joint_load(joint).unwrap_or_default().to_vector())
            .collect();
        let scheduler = JointScheduler::new(
            truss
                .joints()
                .map(|joint| (joint, unsolved_members(truss, &ledger, joint).len())),
            truss.joint_count(),
        );
        Self {
            truss,
            ledger,
            accumulated,
            scheduler,
        }
    }

    fn unsolved(&self, joint: NodeIndex) -> Vec<(NodeIndex, EdgeIndex)> {
        unsolved_members(self.truss, &self.ledger, joint)
    }

    /// Unit vector from `from` towards `to` along `member`.
    fn direction(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        member: EdgeIndex,
    ) -> Result<Vector2<f64>, AnalysisError> {
        let length = self.truss.member_length(member).unwrap_or_default();
        if length == 0.0 {
            return Err(AnalysisError::ZeroLengthMember(member));
        }
        let start = self.truss.joint_position(from).unwrap_or_default();
        let end = self.truss.joint_position(to).unwrap_or_default();
        Ok(unit_direction(start, end, length))
    }

    fn run(mut self) -> Result<Solution, AnalysisError> {
        let mut status = SolveStatus::Complete;
        let mut visits = Vec::with_capacity(self.truss.joint_count());

        while let Some(entry) = self.scheduler.pop() {
            let unsolved = self.unsolved(entry.joint);
            let visit = JointVisit {
                joint: entry.joint,
                queued_unknowns: entry.unknowns,
                live_unknowns: unsolved.len(),
            };
            if visit.was_stale() {
                trace!(
                    joint = %joint_label(entry.joint.index()),
                    queued = entry.unknowns,
                    live = unsolved.len(),
                    "stale scheduler entry"
                );
            }
            visits.push(visit);

            match unsolved.as_slice() {
                [] => continue,
                [neighbor] => self.resolve_one(entry.joint, *neighbor)?,
                [first, second] => self.resolve_two(entry.joint, *first, *second)?,
                _ => {
                    warn!(
                        joint = %joint_label(entry.joint.index()),
                        unknowns = unsolved.len(),
                        "joint is statically indeterminate, stopping"
                    );
                    status = SolveStatus::Indeterminate {
                        joint: entry.joint,
                        unknowns: unsolved.len(),
                    };
                    break;
                }
            }
        }

        Ok(Solution {
            ledger: self.ledger,
            accumulated_loads: self.accumulated.into_iter().map(Force::from).collect(),
            status,
            visits,
        })
    }

    /// Resolve a joint with one unsolved member from the X equation.
    fn resolve_one(
        &mut self,
        joint: NodeIndex,
        (neighbor, member): (NodeIndex, EdgeIndex),
    ) -> Result<(), AnalysisError> {
        let direction = self.direction(joint, neighbor, member)?;
        let raw = solve_one_unknown(self.accumulated[joint.index()].x, direction.x);
        self.settle(joint, neighbor, direction, raw);
        Ok(())
    }

    /// Resolve a joint with two unsolved members from both equations.
    fn resolve_two(
        &mut self,
        joint: NodeIndex,
        (first, first_member): (NodeIndex, EdgeIndex),
        (second, second_member): (NodeIndex, EdgeIndex),
    ) -> Result<(), AnalysisError> {
        let u1 = self.direction(joint, first, first_member)?;
        let u2 = self.direction(joint, second, second_member)?;
        let coefficients = Matrix2::from_columns(&[u1, u2]);
        let raw = solve_two_unknowns(&coefficients, &self.accumulated[joint.index()]).map_err(
            |source| AnalysisError::DegenerateGeometry {
                joint,
                neighbors: [first, second],
                source,
            },
        )?;
        self.settle(joint, first, u1, raw.x);
        self.settle(joint, second, u2, raw.y);
        Ok(())
    }

    /// Record a solved member and hand its pull on to the far joint.
    fn settle(&mut self, joint: NodeIndex, neighbor: NodeIndex, direction: Vector2<f64>, raw: f64) {
        let force = member_force(raw);
        self.ledger.record(joint, neighbor, force);
        debug!(
            member = %member_label(joint.index(), neighbor.index()),
            force,
            "member force resolved"
        );
        self.accumulated[neighbor.index()] += direction * raw;
        let unknowns = self.unsolved(neighbor).len();
        self.scheduler.push(neighbor, unknowns);
    }
}

/// Members at `joint` not yet in the ledger, with their far joints.
fn unsolved_members(
    truss: &Truss,
    ledger: &ForceLedger,
    joint: NodeIndex,
) -> Vec<(NodeIndex, EdgeIndex)> {
    truss
        .attached_members(joint)
        .into_iter()
        .filter(|(neighbor, _)| !ledger.is_solved(joint, *neighbor))
        .collect()
}

/// Solve member forces of `truss` joint by joint.
///
/// Member lengths must already be computed; [`Truss::solve`] takes care of
/// that and is the usual entry point.
///
/// # Errors
///
/// Returns [`AnalysisError::ZeroLengthMember`] when a member has no length and
/// [`AnalysisError::DegenerateGeometry`] when a two-unknown joint has collinear
/// members.
pub(crate) fn solve_joints(truss: &Truss) -> Result<Solution, AnalysisError> {
    JointSolver::new(truss).run()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{force, point};

    /// Triangle A(0,0), B(10,0), C(5,5) with a load at the apex and the
    /// matching support reactions.
    fn loaded_triangle() -> Truss {
        let mut truss = Truss::new(3);
        let [a, b, c] = [0, 1, 2].map(NodeIndex::new);
        truss.place_joint(b, point(10.0, 0.0)).unwrap();
        truss.place_joint(c, point(5.0, 5.0)).unwrap();
        truss.add_member(a, b).unwrap();
        truss.add_member(a, c).unwrap();
        truss.add_member(b, c).unwrap();
        truss.set_load(a, force(0.0, 5.0)).unwrap();
        truss.set_load(b, force(0.0, 5.0)).unwrap();
        truss.set_load(c, force(0.0, -10.0)).unwrap();
        truss
    }

    #[test]
    fn triangle_is_fully_resolved() {
        let mut truss = loaded_triangle();
        let solution = truss.solve().expect("solvable");
        let [a, b, c] = [0, 1, 2].map(NodeIndex::new);

        assert!(solution.is_complete());
        assert_relative_eq!(solution.force(a, b).unwrap(), 5.0, epsilon = 1.0e-9);
        assert_relative_eq!(
            solution.force(c, a).unwrap(),
            -50.0_f64.sqrt(),
            epsilon = 1.0e-9
        );
        assert_relative_eq!(
            solution.force(b, c).unwrap(),
            -50.0_f64.sqrt(),
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn scheduler_pops_exactly_once_per_joint() {
        let mut truss = loaded_triangle();
        let solution = truss.solve().expect("solvable");
        let visited: Vec<(usize, usize, usize)> = solution
            .visits()
            .iter()
            .map(|visit| {
                (
                    visit.joint.index(),
                    visit.queued_unknowns,
                    visit.live_unknowns,
                )
            })
            .collect();
        // A first, then B and C are requeued with a single unknown each. C's
        // last member is solved from B, so its visit is a pass-through.
        assert_eq!(visited, vec![(0, 2, 2), (1, 1, 1), (2, 0, 0)]);
    }

    #[test]
    fn accumulated_loads_hold_member_pulls() {
        let mut truss = loaded_triangle();
        let solution = truss.solve().expect("solvable");
        // B received the pull of AB (raw -5 along +X).
        let b = solution.accumulated_load(NodeIndex::new(1)).unwrap();
        assert_relative_eq!(b.x, -5.0, epsilon = 1.0e-9);
        assert_relative_eq!(b.y, 5.0, epsilon = 1.0e-9);
        // The truss keeps its original loads.
        assert_eq!(truss.joint_load(NodeIndex::new(1)), Some(force(0.0, 5.0)));
    }

    #[test]
    fn stale_entry_is_a_pass_through() {
        // A lone member A-B next to a loaded triangle C, D, E. B's member is
        // solved from A, so B's original entry is popped after it no longer
        // has any unknowns.
        let mut truss = Truss::new(5);
        let joints = [0, 1, 2, 3, 4].map(NodeIndex::new);
        let positions = [(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0), (25.0, 5.0)];
        for (joint, (x, y)) in joints.iter().zip(positions) {
            truss.place_joint(*joint, point(x, y)).unwrap();
        }
        for (i, j) in [(0, 1), (2, 3), (2, 4), (3, 4)] {
            truss.add_member(joints[i], joints[j]).unwrap();
        }
        truss.set_load(joints[2], force(0.0, 5.0)).unwrap();
        truss.set_load(joints[3], force(0.0, 5.0)).unwrap();
        truss.set_load(joints[4], force(0.0, -10.0)).unwrap();

        let solution = truss.solve().expect("solvable");
        let stale: Vec<&JointVisit> = solution
            .visits()
            .iter()
            .filter(|visit| visit.was_stale())
            .collect();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].joint, joints[1]);
        assert_eq!((stale[0].queued_unknowns, stale[0].live_unknowns), (1, 0));

        assert!(solution.is_complete());
        assert_eq!(solution.visits().len(), 5);
        assert_eq!(solution.ledger().len(), 4);
        assert_relative_eq!(
            solution.force(joints[2], joints[3]).unwrap(),
            5.0,
            epsilon = 1.0e-9
        );
    }

    /// Run `truss` with every joint queued at `queued` unknowns instead of
    /// its real count.
    fn solve_with_overstated_queue(truss: &Truss, queued: usize) -> Solution {
        let mut solver = JointSolver::new(truss);
        solver.scheduler =
            JointScheduler::new(truss.joints().map(|joint| (joint, queued)), truss.joint_count());
        solver.run().expect("solvable")
    }

    #[test]
    fn stale_entry_with_two_live_unknowns_is_resolved() {
        let mut truss = loaded_triangle();
        truss.compute_lengths().unwrap();
        let solution = solve_with_overstated_queue(&truss, 3);

        // A is popped with a count of 3 but only 2 live unknowns, so it is
        // solved instead of halting the loop.
        assert_eq!(
            solution.visits()[0],
            JointVisit {
                joint: NodeIndex::new(0),
                queued_unknowns: 3,
                live_unknowns: 2
            }
        );
        assert!(solution.is_complete());
        assert_eq!(solution.ledger().len(), 3);
        assert_relative_eq!(
            solution.force(NodeIndex::new(0), NodeIndex::new(1)).unwrap(),
            5.0,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn stale_entry_with_one_live_unknown_is_resolved() {
        let mut truss = Truss::new(2);
        let [a, b] = [0, 1].map(NodeIndex::new);
        truss.place_joint(b, point(4.0, 3.0)).unwrap();
        truss.add_member(a, b).unwrap();
        truss.set_load(a, force(4.0, 3.0)).unwrap();
        truss.compute_lengths().unwrap();
        let solution = solve_with_overstated_queue(&truss, 2);

        assert!(solution.visits()[0].was_stale());
        assert_eq!(solution.visits()[0].live_unknowns, 1);
        assert!(solution.is_complete());
        // Fx / cos = 4 / 0.8, stored with the sign flipped.
        assert_relative_eq!(solution.force(a, b).unwrap(), -5.0, epsilon = 1.0e-9);
    }

    #[test]
    fn four_joints_all_with_three_members_halt_immediately() {
        let mut truss = Truss::new(4);
        let joints = [0, 1, 2, 3].map(NodeIndex::new);
        let positions = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        for (joint, (x, y)) in joints.iter().zip(positions) {
            truss.place_joint(*joint, point(x, y)).unwrap();
        }
        for (i, j) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)] {
            truss.add_member(joints[i], joints[j]).unwrap();
        }

        let solution = truss.solve().expect("no numerical failure");
        assert_eq!(
            solution.status(),
            SolveStatus::Indeterminate {
                joint: joints[0],
                unknowns: 3
            }
        );
        assert!(solution.ledger().is_empty());
        assert_eq!(solution.visits().len(), 1);
    }

    #[test]
    fn collinear_pair_raises_degenerate_geometry() {
        let mut truss = Truss::new(3);
        let [middle, left, right] = [0, 1, 2].map(NodeIndex::new);
        truss.place_joint(middle, point(10.0, 0.0)).unwrap();
        truss.place_joint(right, point(20.0, 0.0)).unwrap();
        truss.add_member(middle, left).unwrap();
        truss.add_member(middle, right).unwrap();
        truss.add_member(left, right).unwrap();
        truss.set_load(middle, force(0.0, -10.0)).unwrap();

        match truss.solve() {
            Err(AnalysisError::DegenerateGeometry {
                joint, neighbors, ..
            }) => {
                assert_eq!(joint, middle);
                assert_eq!(neighbors, [left, right]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn vertical_single_member_gets_zero_force() {
        // B hangs straight below A; with one unknown only the X equation is used.
        let mut truss = Truss::new(2);
        let [a, b] = [0, 1].map(NodeIndex::new);
        truss.place_joint(b, point(0.0, -5.0)).unwrap();
        truss.add_member(a, b).unwrap();
        truss.set_load(a, force(0.0, 3.0)).unwrap();

        let solution = truss.solve().expect("guarded division");
        assert_eq!(solution.force(a, b), Some(0.0));
        assert!(solution.is_complete());
    }
}
