//! Error types produced while building, solving or sizing trusses.

use std::path::PathBuf;

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when the joint-by-joint solve cannot continue.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a member spans zero distance.
    #[error("member {0:?} has zero length")]
    ZeroLengthMember(EdgeIndex),
    /// Returned when the two unknown members at a joint are collinear.
    #[error("joint {joint:?} has collinear unknown members towards {neighbors:?}: {source}")]
    DegenerateGeometry {
        /// Joint whose equilibrium could not be resolved.
        joint: NodeIndex,
        /// The two neighbors at the far end of the unknown members.
        neighbors: [NodeIndex; 2],
        /// Details of the singular system.
        #[source]
        source: DegenerateGeometryError,
    },
}

/// Error returned by the closed-form 2x2 solver when the system is singular.
///
/// # Examples
/// ```
/// use nalgebra::{Matrix2, Vector2};
/// use trussjoint::equations::solve_two_unknowns;
///
/// // Both members lie along the X axis.
/// let coefficients = Matrix2::new(-1.0, 1.0, 0.0, 0.0);
/// let error = solve_two_unknowns(&coefficients, &Vector2::new(0.0, -10.0))
///     .expect_err("collinear members rejected");
/// assert_eq!(error.determinant, 0.0);
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("member directions are collinear (determinant {determinant:e})")]
pub struct DegenerateGeometryError {
    /// Determinant of the rejected coefficient matrix.
    pub determinant: f64,
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid indices.
///
/// Attempting to mutate the structure with a joint that is not part of the
/// truss returns a descriptive variant so callers can decide how to recover.
///
/// # Examples
///
/// ```
/// use petgraph::graph::NodeIndex;
/// use trussjoint::{point, Truss, TrussEditError};
///
/// let mut truss = Truss::new(2);
/// let missing = NodeIndex::new(7);
/// let error = truss
///     .place_joint(missing, point(1.0, 0.0))
///     .expect_err("unknown joint is rejected");
/// assert_eq!(error, TrussEditError::UnknownJoint(missing));
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a member would connect a joint to itself.
    #[error("member cannot connect joint {0:?} to itself")]
    SelfConnectedMember(NodeIndex),
}

/// Error returned when design criteria for the sizing pass are not meaningful.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum CriteriaError {
    /// Returned when the allowable stress is zero, negative or not finite.
    #[error("allowable stress must be positive (received {0})")]
    NonPositiveAllowableStress(f64),
    /// Returned when the unit weight is negative or not finite.
    #[error("unit weight must not be negative (received {0})")]
    NegativeUnitWeight(f64),
}

/// Error returned when a truss description cannot be turned into a [`Truss`](crate::Truss).
///
/// Every variant is fatal: nothing is solved from a malformed description.
#[derive(Debug, Error)]
pub enum InputError {
    /// Returned when the description file cannot be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when the description is not valid JSON for the expected shape.
    #[error("failed to parse truss description: {0}")]
    Parse(#[from] serde_json::Error),
    /// Returned when a declared count disagrees with the data provided.
    #[error("{what}: declared {declared} but found {found}")]
    CountMismatch {
        /// Which section of the description is inconsistent.
        what: &'static str,
        /// Count stated in the description.
        declared: usize,
        /// Number of entries actually present.
        found: usize,
    },
    /// Returned when a joint label cannot be interpreted.
    #[error("`{0}` is not a valid joint label")]
    InvalidLabel(String),
    /// Returned when a member or load refers to a joint outside the truss.
    #[error("{context} refers to joint {label}, but the truss has {joint_count} joints")]
    JointOutOfRange {
        /// Where the reference appeared.
        context: &'static str,
        /// Display label of the offending reference.
        label: String,
        /// Number of joints declared.
        joint_count: usize,
    },
    /// Returned when the description builds an invalid truss.
    #[error(transparent)]
    Edit(#[from] TrussEditError),
    /// Returned when the embedded design criteria are invalid.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}
