#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod equations;
mod errors;
mod geometry;
pub mod input;
pub mod labels;
mod ledger;
pub mod scheduler;
mod sizing;
mod solver;
mod truss;

pub use errors::{
    AnalysisError, CriteriaError, DegenerateGeometryError, InputError, TrussEditError,
};
pub use geometry::{force, point, unit_direction, BoundingBox, Force, Point};
pub use input::{read_description, TrussDescription};
pub use ledger::{ForceLedger, MemberKey};
pub use sizing::{
    buckling_factor, size_members, DesignCriteria, GoverningMember, MemberClass, MemberDesign,
    SizingReport, BUCKLING_REFERENCE_LENGTH, DEFAULT_ALLOWABLE_STRESS, DEFAULT_UNIT_WEIGHT,
    ZERO_FORCE_DESIGN_FRACTION, ZERO_FORCE_THRESHOLD,
};
pub use solver::{JointVisit, Solution, SolveStatus};
pub use truss::{OverLengthMember, Truss, DEFAULT_MAX_MEMBER_LENGTH};
