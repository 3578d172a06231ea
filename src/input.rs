//! JSON truss descriptions.
//!
//! A description lists the joint count, the joint positions, the members and
//! the external loads, in that order. Joints are referred to either by letter
//! label (`"A"`, `"B"`, ...) or by zero-based index:
//!
//! ```json
//! {
//!   "node_count": 3,
//!   "max_member_length": 12.0,
//!   "nodes": [
//!     { "joint": "A", "x": 0.0, "y": 0.0 },
//!     { "joint": "B", "x": 10.0, "y": 0.0 },
//!     { "joint": "C", "x": 5.0, "y": 5.0 }
//!   ],
//!   "members": [["A", "B"], ["A", "C"], { "joints": ["B", "C"], "width": 2.0 }],
//!   "loads": [
//!     { "joint": "A", "fx": 0.0, "fy": 5.0 },
//!     { "joint": "B", "fx": 0.0, "fy": 5.0 },
//!     { "joint": "C", "fx": 0.0, "fy": -10.0 }
//!   ]
//! }
//! ```
//!
//! Only counts are validated. Repeated members and loads are not rejected.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CriteriaError, InputError};
use crate::geometry::{force, point};
use crate::labels::{joint_label, parse_joint_label};
use crate::sizing::{DesignCriteria, DEFAULT_ALLOWABLE_STRESS, DEFAULT_UNIT_WEIGHT};
use crate::truss::{Truss, DEFAULT_MAX_MEMBER_LENGTH};

/// Reference to a joint by label or index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JointRef {
    /// Zero-based joint index.
    Index(usize),
    /// Letter label such as `"A"` or `"AB"`.
    Label(String),
}

impl JointRef {
    /// Zero-based index this reference names.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidLabel`] for text that is not a joint label.
    pub fn index(&self) -> Result<usize, InputError> {
        match self {
            JointRef::Index(index) => Ok(*index),
            JointRef::Label(label) => {
                parse_joint_label(label).ok_or_else(|| InputError::InvalidLabel(label.clone()))
            }
        }
    }

    /// Text used in diagnostics.
    fn display(&self) -> String {
        match self {
            JointRef::Index(index) => joint_label(*index),
            JointRef::Label(label) => label.clone(),
        }
    }
}

/// Position of one joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    /// The joint being placed.
    pub joint: JointRef,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// A member, either as a bare pair or with a declared width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberEntry {
    /// `["A", "B"]`
    Pair([JointRef; 2]),
    /// `{ "joints": ["A", "B"], "width": 2.0 }`
    Detailed {
        /// The two endpoints.
        joints: [JointRef; 2],
        /// Declared width or capacity.
        #[serde(default)]
        width: Option<f64>,
    },
}

impl MemberEntry {
    fn joints(&self) -> &[JointRef; 2] {
        match self {
            MemberEntry::Pair(joints) | MemberEntry::Detailed { joints, .. } => joints,
        }
    }

    fn width(&self) -> Option<f64> {
        match self {
            MemberEntry::Pair(_) => None,
            MemberEntry::Detailed { width, .. } => *width,
        }
    }
}

/// External load on one joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadEntry {
    /// The loaded joint.
    pub joint: JointRef,
    /// X component.
    pub fx: f64,
    /// Y component.
    pub fy: f64,
}

/// Complete truss description as read from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrussDescription {
    /// Number of joints in the truss.
    pub node_count: usize,
    /// Longest member accepted without a warning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_member_length: Option<f64>,
    /// Allowable stress for the sizing pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowable_stress: Option<f64>,
    /// Weight per unit volume for the sizing pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<f64>,
    /// One position per joint.
    pub nodes: Vec<NodeEntry>,
    /// Declared member count, checked against `members` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
    /// Members between joints.
    #[serde(default)]
    pub members: Vec<MemberEntry>,
    /// Declared load count, checked against `loads` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_count: Option<usize>,
    /// External loads.
    #[serde(default)]
    pub loads: Vec<LoadEntry>,
}

impl FromStr for TrussDescription {
    type Err = InputError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Read a truss description from a JSON file.
///
/// # Errors
///
/// Returns [`InputError::Io`] when the file cannot be read and
/// [`InputError::Parse`] when it is not a valid description.
pub fn read_description(path: &Path) -> Result<TrussDescription, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    text.parse()
}

/// Fail unless `declared` matches `found`.
fn check_count(what: &'static str, declared: usize, found: usize) -> Result<(), InputError> {
    if declared == found {
        Ok(())
    } else {
        Err(InputError::CountMismatch {
            what,
            declared,
            found,
        })
    }
}

impl TrussDescription {
    /// Index of `joint`, which must exist in a truss of `node_count` joints.
    fn resolve(&self, joint: &JointRef, context: &'static str) -> Result<usize, InputError> {
        let index = joint.index()?;
        if index < self.node_count {
            Ok(index)
        } else {
            Err(InputError::JointOutOfRange {
                context,
                label: joint.display(),
                joint_count: self.node_count,
            })
        }
    }

    /// Check that every declared count matches the data provided.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::CountMismatch`] naming the first inconsistent section.
    pub fn validate_counts(&self) -> Result<(), InputError> {
        check_count("nodes", self.node_count, self.nodes.len())?;
        if let Some(declared) = self.member_count {
            check_count("members", declared, self.members.len())?;
        }
        if let Some(declared) = self.load_count {
            check_count("loads", declared, self.loads.len())?;
        }
        Ok(())
    }

    /// Build the truss: joints first, then members, then loads.
    ///
    /// A joint position naming a joint outside the truss is logged and
    /// skipped, leaving that joint at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when counts disagree with the data, a label is
    /// malformed, or a member or load refers to a joint outside the truss.
    pub fn build(&self) -> Result<Truss, InputError> {
        self.validate_counts()?;
        let mut truss = Truss::with_max_member_length(
            self.node_count,
            self.max_member_length.unwrap_or(DEFAULT_MAX_MEMBER_LENGTH),
        );

        for node in &self.nodes {
            match truss.joint(node.joint.index()?) {
                Some(joint) => truss.place_joint(joint, point(node.x, node.y))?,
                None => warn!(
                    joint = %node.joint.display(),
                    joint_count = self.node_count,
                    "failed to place joint, out of bounds"
                ),
            }
        }

        for member in &self.members {
            let [start, end] = member.joints();
            let start = NodeIndex::new(self.resolve(start, "member")?);
            let end = NodeIndex::new(self.resolve(end, "member")?);
            match member.width() {
                Some(width) => truss.add_member_with_width(start, end, width)?,
                None => truss.add_member(start, end)?,
            };
        }

        for load in &self.loads {
            let joint = NodeIndex::new(self.resolve(&load.joint, "load")?);
            truss.set_load(joint, force(load.fx, load.fy))?;
        }

        Ok(truss)
    }

    /// Design criteria embedded in the description, with defaults filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError`] when a given value is out of range.
    pub fn design_criteria(&self) -> Result<DesignCriteria, CriteriaError> {
        DesignCriteria::new(
            self.allowable_stress.unwrap_or(DEFAULT_ALLOWABLE_STRESS),
            self.unit_weight.unwrap_or(DEFAULT_UNIT_WEIGHT),
        )
    }
}
