//! Core data structures for pin-jointed planar trusses.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::warn;

use crate::errors::{AnalysisError, TrussEditError};
use crate::geometry::{BoundingBox, Force, Point};
use crate::labels::member_label;
use crate::solver::{self, Solution};

/// Member length limit used when none is configured.
pub const DEFAULT_MAX_MEMBER_LENGTH: f64 = 9_999_999.0;

/// Internal representation of a truss joint.
#[derive(Clone, Debug, Default)]
struct Joint {
    /// Position of the joint.
    position: Point,
    /// External load applied to the joint.
    load: Force,
}

/// Internal representation of a truss member.
#[derive(Clone, Debug, Default)]
struct Member {
    /// Cached length, zero until computed.
    length: f64,
    /// Optional declared width or capacity.
    width: Option<f64>,
}

/// Member whose computed length exceeds the configured maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverLengthMember {
    /// The offending member.
    pub member: EdgeIndex,
    /// Endpoints of the member, lower index first.
    pub joints: (NodeIndex, NodeIndex),
    /// Computed length.
    pub length: f64,
    /// Limit that was exceeded.
    pub limit: f64,
}

/// Container for a pin-jointed planar truss with a fixed number of joints.
///
/// Joints are created up front and addressed by their integer index. Members
/// are undirected, so the adjacency and every per-member quantity is
/// symmetric by construction.
///
/// Member lengths are computed once and cached. Moving a joint with
/// [`Truss::place_joint`] discards the cached lengths of its members, so the
/// next [`Truss::compute_lengths`] measures them again from the new position.
#[derive(Clone, Debug)]
pub struct Truss {
    /// Underlying graph storage for joints and members.
    graph: UnGraph<Joint, Member>,
    /// Longest member accepted without a warning.
    max_member_length: f64,
}

impl Truss {
    /// Create a truss with `joint_count` joints at the origin and no members.
    ///
    /// # Examples
    /// ```
    /// use trussjoint::Truss;
    ///
    /// let truss = Truss::new(4);
    /// assert_eq!(truss.joint_count(), 4);
    /// assert_eq!(truss.member_count(), 0);
    /// ```
    #[must_use]
    pub fn new(joint_count: usize) -> Self {
        Self::with_max_member_length(joint_count, DEFAULT_MAX_MEMBER_LENGTH)
    }

    /// Create a truss that warns about members longer than `max_member_length`.
    #[must_use]
    pub fn with_max_member_length(joint_count: usize, max_member_length: f64) -> Self {
        let mut graph = UnGraph::with_capacity(joint_count, 2 * joint_count);
        for _ in 0..joint_count {
            graph.add_node(Joint::default());
        }
        Self {
            graph,
            max_member_length,
        }
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Longest member accepted without a warning.
    #[must_use]
    pub fn max_member_length(&self) -> f64 {
        self.max_member_length
    }

    /// Change the member length limit.
    ///
    /// Only lengths computed afterwards are checked against the new limit.
    pub fn set_max_member_length(&mut self, max_member_length: f64) {
        self.max_member_length = max_member_length;
    }

    /// Index of the joint numbered `index`, if the truss has that many joints.
    #[must_use]
    pub fn joint(&self, index: usize) -> Option<NodeIndex> {
        (index < self.joint_count()).then(|| NodeIndex::new(index))
    }

    /// Iterate over all joints in index order.
    pub fn joints(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Iterate over all members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = EdgeIndex> {
        self.graph.edge_indices()
    }

    /// Set the position of a joint.
    ///
    /// Cached lengths of the members attached to the joint are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn place_joint(
        &mut self,
        joint: NodeIndex,
        position: Point,
    ) -> Result<(), TrussEditError> {
        let node = self
            .graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))?;
        node.position = position;

        let attached: Vec<EdgeIndex> = self.graph.edges(joint).map(|edge| edge.id()).collect();
        for member in attached {
            self.graph[member].length = 0.0;
        }
        Ok(())
    }

    /// Connect two joints with a member.
    ///
    /// Connecting an already connected pair returns the existing member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either joint is not part of
    /// this truss and [`TrussEditError::SelfConnectedMember`] when `start == end`.
    pub fn add_member(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<EdgeIndex, TrussEditError> {
        self.connect(start, end, None)
    }

    /// Connect two joints with a member of declared width.
    ///
    /// The width does not influence the solve; it is carried to the sizing output.
    ///
    /// # Errors
    ///
    /// Same as [`Truss::add_member`].
    pub fn add_member_with_width(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
        width: f64,
    ) -> Result<EdgeIndex, TrussEditError> {
        self.connect(start, end, Some(width))
    }

    /// Shared implementation of the member constructors.
    fn connect(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
        width: Option<f64>,
    ) -> Result<EdgeIndex, TrussEditError> {
        for joint in [start, end] {
            if self.graph.node_weight(joint).is_none() {
                return Err(TrussEditError::UnknownJoint(joint));
            }
        }
        if start == end {
            return Err(TrussEditError::SelfConnectedMember(start));
        }
        if let Some(existing) = self.graph.find_edge(start, end) {
            if width.is_some() {
                self.graph[existing].width = width;
            }
            return Ok(existing);
        }
        Ok(self.graph.add_edge(start, end, Member { length: 0.0, width }))
    }

    /// Apply an external load to a joint, replacing any previous load.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_load(&mut self, joint: NodeIndex, load: Force) -> Result<(), TrussEditError> {
        let node = self
            .graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))?;
        node.load = load;
        Ok(())
    }

    /// Position of a joint.
    #[must_use]
    pub fn joint_position(&self, joint: NodeIndex) -> Option<Point> {
        self.graph.node_weight(joint).map(|joint| joint.position)
    }

    /// External load applied to a joint before solving.
    #[must_use]
    pub fn joint_load(&self, joint: NodeIndex) -> Option<Force> {
        self.graph.node_weight(joint).map(|joint| joint.load)
    }

    /// Joints connected to `joint` by a member, in ascending index order.
    #[must_use]
    pub fn neighbors(&self, joint: NodeIndex) -> Vec<NodeIndex> {
        self.attached_members(joint)
            .into_iter()
            .map(|(neighbor, _)| neighbor)
            .collect()
    }

    /// Members attached to `joint`, each paired with the joint at its far end
    /// and ordered by that joint's index.
    #[must_use]
    pub fn attached_members(&self, joint: NodeIndex) -> Vec<(NodeIndex, EdgeIndex)> {
        let mut attached: Vec<(NodeIndex, EdgeIndex)> = self
            .graph
            .edges(joint)
            .map(|edge| {
                let far = if edge.source() == joint {
                    edge.target()
                } else {
                    edge.source()
                };
                (far, edge.id())
            })
            .collect();
        attached.sort_unstable();
        attached
    }

    /// Member connecting `a` and `b`, in either orientation.
    #[must_use]
    pub fn member_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    /// Endpoints of a member, lower index first.
    #[must_use]
    pub fn member_endpoints(&self, member: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph
            .edge_endpoints(member)
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
    }

    /// Cached length of a member; zero until [`Truss::compute_lengths`] has run.
    #[must_use]
    pub fn member_length(&self, member: EdgeIndex) -> Option<f64> {
        self.graph.edge_weight(member).map(|member| member.length)
    }

    /// Declared width of a member, if one was given.
    #[must_use]
    pub fn member_width(&self, member: EdgeIndex) -> Option<f64> {
        self.graph.edge_weight(member).and_then(|member| member.width)
    }

    /// Smallest rectangle containing every joint.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.graph.node_weights().map(|joint| joint.position))
    }

    /// Compute and cache the length of every member that has none yet.
    ///
    /// Members longer than the configured maximum are logged and returned; they
    /// do not prevent solving. Calling this again only visits members whose
    /// length was discarded by [`Truss::place_joint`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ZeroLengthMember`] when both endpoints of a
    /// member coincide.
    pub fn compute_lengths(&mut self) -> Result<Vec<OverLengthMember>, AnalysisError> {
        let mut over_length = Vec::new();
        for member in self.graph.edge_indices() {
            if self.graph[member].length != 0.0 {
                continue;
            }
            let Some((start, end)) = self.member_endpoints(member) else {
                continue;
            };
            let length = self.graph[start]
                .position
                .distance_to(self.graph[end].position);
            if length == 0.0 {
                return Err(AnalysisError::ZeroLengthMember(member));
            }
            self.graph[member].length = length;

            if length > self.max_member_length {
                warn!(
                    member = %member_label(start.index(), end.index()),
                    length,
                    limit = self.max_member_length,
                    "member exceeds the maximum allowed length"
                );
                over_length.push(OverLengthMember {
                    member,
                    joints: (start, end),
                    length,
                    limit: self.max_member_length,
                });
            }
        }
        Ok(over_length)
    }

    /// Solve every member force by the method of joints.
    ///
    /// Lengths are computed first if needed. The truss itself is left
    /// untouched apart from that cache: forces and the loads accumulated at
    /// each joint live in the returned [`Solution`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when a member has zero length or a joint with
    /// two unknowns has collinear members.
    ///
    /// # Examples
    /// ```
    /// use trussjoint::{force, point, Truss};
    ///
    /// let mut truss = Truss::new(3);
    /// let a = truss.joint(0).unwrap();
    /// let b = truss.joint(1).unwrap();
    /// let c = truss.joint(2).unwrap();
    /// truss.place_joint(b, point(10.0, 0.0))?;
    /// truss.place_joint(c, point(5.0, 5.0))?;
    /// truss.add_member(a, b)?;
    /// truss.add_member(a, c)?;
    /// truss.add_member(b, c)?;
    /// truss.set_load(a, force(0.0, 5.0))?;
    /// truss.set_load(b, force(0.0, 5.0))?;
    /// truss.set_load(c, force(0.0, -10.0))?;
    ///
    /// let solution = truss.solve()?;
    /// assert!(solution.is_complete());
    /// assert_eq!(solution.ledger().len(), 3);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn solve(&mut self) -> Result<Solution, AnalysisError> {
        self.compute_lengths()?;
        solver::solve_joints(self)
    }
}
