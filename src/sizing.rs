//! Allowable-stress sizing of solved members.
//!
//! Every solved member gets the smallest cross-section area that keeps its
//! stress within the allowable value:
//!
//! * tension members: `area = |force| / allowable_stress`
//! * compression members: the allowable stress is derated for buckling by
//!   `10 / (length + 10)`
//! * zero-force members: designed for a fraction of the largest force in any
//!   member sharing one of their joints
//!
//! Volume is area times length and weight is volume times the unit weight.

use petgraph::graph::NodeIndex;

use crate::errors::CriteriaError;
use crate::ledger::{ForceLedger, MemberKey};
use crate::truss::Truss;

/// Allowable stress used when none is configured.
pub const DEFAULT_ALLOWABLE_STRESS: f64 = 0.25;
/// Weight per unit volume used when none is configured.
pub const DEFAULT_UNIT_WEIGHT: f64 = 0.000_078;
/// Forces below this magnitude mark a zero-force member.
pub const ZERO_FORCE_THRESHOLD: f64 = 0.01;
/// Share of the largest attached force a zero-force member is designed for.
pub const ZERO_FORCE_DESIGN_FRACTION: f64 = 0.02;
/// Length scale of the buckling derating factor.
pub const BUCKLING_REFERENCE_LENGTH: f64 = 10.0;

/// Material constants for the sizing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesignCriteria {
    allowable_stress: f64,
    unit_weight: f64,
}

impl Default for DesignCriteria {
    fn default() -> Self {
        Self {
            allowable_stress: DEFAULT_ALLOWABLE_STRESS,
            unit_weight: DEFAULT_UNIT_WEIGHT,
        }
    }
}

impl DesignCriteria {
    /// Validate and build design criteria.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError`] when the allowable stress is not strictly
    /// positive or the unit weight is negative.
    ///
    /// # Examples
    /// ```
    /// use trussjoint::{CriteriaError, DesignCriteria};
    ///
    /// assert!(DesignCriteria::new(0.25, 0.000078).is_ok());
    /// assert_eq!(
    ///     DesignCriteria::new(0.0, 0.000078),
    ///     Err(CriteriaError::NonPositiveAllowableStress(0.0))
    /// );
    /// ```
    pub fn new(allowable_stress: f64, unit_weight: f64) -> Result<Self, CriteriaError> {
        if !(allowable_stress.is_finite() && allowable_stress > 0.0) {
            return Err(CriteriaError::NonPositiveAllowableStress(allowable_stress));
        }
        if !(unit_weight.is_finite() && unit_weight >= 0.0) {
            return Err(CriteriaError::NegativeUnitWeight(unit_weight));
        }
        Ok(Self {
            allowable_stress,
            unit_weight,
        })
    }

    /// Largest stress a member may carry.
    #[must_use]
    pub fn allowable_stress(&self) -> f64 {
        self.allowable_stress
    }

    /// Weight per unit volume.
    #[must_use]
    pub fn unit_weight(&self) -> f64 {
        self.unit_weight
    }
}

/// Reduction of the allowable compressive stress for a member of `length`.
#[must_use]
pub fn buckling_factor(length: f64) -> f64 {
    BUCKLING_REFERENCE_LENGTH / (length + BUCKLING_REFERENCE_LENGTH)
}

/// The attached member that governs a zero-force member's size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoverningMember {
    /// Joint shared with the zero-force member.
    pub shared: NodeIndex,
    /// Joint at the far end of the governing member.
    pub other: NodeIndex,
    /// Signed force of the governing member.
    pub force: f64,
}

/// Which sizing rule applied to a member.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MemberClass {
    /// Positive force.
    Tension,
    /// Negative force, sized with the buckling derating.
    Compression {
        /// Factor applied to the allowable stress.
        buckling_factor: f64,
    },
    /// Negligible force, sized from its neighbors.
    ZeroForce {
        /// Largest attached member, if any member shares a joint.
        governing: Option<GoverningMember>,
    },
}

/// Sizing result for one member.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberDesign {
    /// The member, lower joint index first.
    pub key: MemberKey,
    /// Member length.
    pub length: f64,
    /// Signed axial force; positive is tension.
    pub force: f64,
    /// Declared width, if the member was given one.
    pub width: Option<f64>,
    /// Sizing rule that applied.
    pub class: MemberClass,
    /// Required cross-section area.
    pub area: f64,
    /// Material volume.
    pub volume: f64,
    /// Material weight.
    pub weight: f64,
}

/// Sizing results for every solved member.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SizingReport {
    /// Per-member results, ordered by lower then higher joint index.
    pub members: Vec<MemberDesign>,
    /// Sum of all member volumes.
    pub total_volume: f64,
    /// Sum of all member weights.
    pub total_weight: f64,
}

impl SizingReport {
    /// Result for the member between `a` and `b`.
    #[must_use]
    pub fn member(&self, a: NodeIndex, b: NodeIndex) -> Option<&MemberDesign> {
        let key = MemberKey::new(a, b);
        self.members.iter().find(|design| design.key == key)
    }
}

/// Largest attached force among members sharing a joint with `key`.
fn governing_member(ledger: &ForceLedger, key: MemberKey) -> Option<GoverningMember> {
    let mut governing: Option<GoverningMember> = None;
    for shared in [key.low(), key.high()] {
        for (other_key, force) in ledger.attached_to(shared) {
            if other_key == key {
                continue;
            }
            let larger = governing.map_or(true, |current| force.abs() > current.force.abs());
            if larger {
                let other = if other_key.low() == shared {
                    other_key.high()
                } else {
                    other_key.low()
                };
                governing = Some(GoverningMember {
                    shared,
                    other,
                    force,
                });
            }
        }
    }
    governing
}

/// Size every member recorded in `ledger`.
///
/// Members that were not solved are absent from the ledger and therefore
/// from the report.
#[must_use]
pub fn size_members(
    truss: &Truss,
    ledger: &ForceLedger,
    criteria: &DesignCriteria,
) -> SizingReport {
    let mut report = SizingReport::default();
    for (key, force) in ledger.iter() {
        let member = truss.member_between(key.low(), key.high());
        let length = member
            .and_then(|member| truss.member_length(member))
            .unwrap_or_default();
        let width = member.and_then(|member| truss.member_width(member));

        let (class, area) = if force.abs() < ZERO_FORCE_THRESHOLD {
            let governing = governing_member(ledger, key);
            let design_force =
                ZERO_FORCE_DESIGN_FRACTION * governing.map_or(0.0, |member| member.force.abs());
            (
                MemberClass::ZeroForce { governing },
                design_force / criteria.allowable_stress,
            )
        } else if force > 0.0 {
            (MemberClass::Tension, force.abs() / criteria.allowable_stress)
        } else {
            let factor = buckling_factor(length);
            (
                MemberClass::Compression {
                    buckling_factor: factor,
                },
                force.abs() / (criteria.allowable_stress * factor),
            )
        };

        let volume = area * length;
        let weight = volume * criteria.unit_weight;
        report.total_volume += volume;
        report.total_weight += weight;
        report.members.push(MemberDesign {
            key,
            length,
            force,
            width,
            class,
            area,
            volume,
            weight,
        });
    }
    report
}
