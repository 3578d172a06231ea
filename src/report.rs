use crate::analysis::AnalysisSummary;
use serde::Serialize;
use std::fmt::Write;
use trussjoint::labels::{joint_label, member_label};
use trussjoint::{MemberClass, MemberDesign, SolveStatus, Truss};

/// Render the truss as given, before anything is solved.
///
/// Each joint is listed with its position and the joints it connects to,
/// followed by the external loads.
#[must_use]
pub fn render_truss(truss: &Truss) -> String {
    let mut output = String::new();

    output.push_str("Given a truss defined by the following:\n");
    for joint in truss.joints() {
        let position = truss.joint_position(joint).unwrap_or_default();
        let neighbors: Vec<String> = truss
            .neighbors(joint)
            .into_iter()
            .map(|neighbor| joint_label(neighbor.index()))
            .collect();
        writeln!(
            &mut output,
            "{} ({:.3}, {:.3}): {}",
            joint_label(joint.index()),
            position.x,
            position.y,
            neighbors.join(" ")
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nGiven external forces:\n");
    for joint in truss.joints() {
        let load = truss.joint_load(joint).unwrap_or_default();
        writeln!(
            &mut output,
            "{}: ({:.2}, {:.2})",
            joint_label(joint.index()),
            load.x,
            load.y
        )
        .expect("writing to string cannot fail");
    }
    output.push('\n');

    output
}

/// Append the report block of one sized member.
fn render_member(output: &mut String, design: &MemberDesign) {
    writeln!(
        output,
        "Member {}",
        member_label(design.key.low().index(), design.key.high().index())
    )
    .expect("writing to string cannot fail");
    writeln!(output, "\tLength: {:.2} m", design.length).expect("writing to string cannot fail");
    if let Some(width) = design.width {
        writeln!(output, "\tWidth: {width:.2}").expect("writing to string cannot fail");
    }

    match design.class {
        MemberClass::Tension => {
            writeln!(output, "\tForce: {:.2} kN (T)", design.force)
                .expect("writing to string cannot fail");
        }
        MemberClass::Compression { buckling_factor } => {
            writeln!(
                output,
                "\tForce: {:.2} kN (C)\n\tBuckling factor: {buckling_factor:.3}",
                design.force
            )
            .expect("writing to string cannot fail");
        }
        MemberClass::ZeroForce { governing } => {
            writeln!(output, "\tForce: {:.2} kN\n\tZero-force member", design.force)
                .expect("writing to string cannot fail");
            match governing {
                Some(governing) => writeln!(
                    output,
                    "\tMaximum attached member: {} ({:.3} kN)",
                    member_label(governing.shared.index(), governing.other.index()),
                    governing.force
                )
                .expect("writing to string cannot fail"),
                None => output.push_str("\tMaximum attached member: none\n"),
            }
        }
    }

    writeln!(output, "\tArea: {:.2} mm^2", design.area).expect("writing to string cannot fail");
    writeln!(output, "\tVolume: {:.3} mm^3", design.volume)
        .expect("writing to string cannot fail");
    writeln!(output, "\tWeight: {:.3} kN", design.weight).expect("writing to string cannot fail");
}

/// Render the solved forces and member sizes as text.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();

    for member in &summary.over_length {
        writeln!(
            &mut output,
            "Member {} is {:.3} long, must not exceed {:.3}",
            member_label(member.joints.0.index(), member.joints.1.index()),
            member.length,
            member.limit
        )
        .expect("writing to string cannot fail");
    }

    if let SolveStatus::Indeterminate { joint, unknowns } = summary.solution.status() {
        writeln!(
            &mut output,
            "Joint {} is unsolvable ({unknowns} unknown members), stopping",
            joint_label(joint.index())
        )
        .expect("writing to string cannot fail");
    }

    for design in &summary.sizing.members {
        render_member(&mut output, design);
    }

    writeln!(
        &mut output,
        "\nTotal Volume: {:.3} mm^3\nTotal Weight: {:.3} kN",
        summary.sizing.total_volume, summary.sizing.total_weight
    )
    .expect("writing to string cannot fail");

    output
}

/// JSON view of one sized member.
#[derive(Debug, Serialize)]
struct MemberRecord {
    member: String,
    length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    force: f64,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckling_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    governing_member: Option<String>,
    area: f64,
    volume: f64,
    weight: f64,
}

impl From<&MemberDesign> for MemberRecord {
    fn from(design: &MemberDesign) -> Self {
        let (kind, buckling_factor, governing_member) = match design.class {
            MemberClass::Tension => ("tension", None, None),
            MemberClass::Compression { buckling_factor } => {
                ("compression", Some(buckling_factor), None)
            }
            MemberClass::ZeroForce { governing } => (
                "zero-force",
                None,
                governing.map(|g| member_label(g.shared.index(), g.other.index())),
            ),
        };
        Self {
            member: member_label(design.key.low().index(), design.key.high().index()),
            length: design.length,
            width: design.width,
            force: design.force,
            kind,
            buckling_factor,
            governing_member,
            area: design.area,
            volume: design.volume,
            weight: design.weight,
        }
    }
}

/// JSON view of an over-length member.
#[derive(Debug, Serialize)]
struct OverLengthRecord {
    member: String,
    length: f64,
    limit: f64,
}

/// JSON view of a whole run.
#[derive(Debug, Serialize)]
struct ReportRecord {
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    unsolvable_joint: Option<String>,
    allowable_stress: f64,
    unit_weight: f64,
    over_length: Vec<OverLengthRecord>,
    members: Vec<MemberRecord>,
    total_volume: f64,
    total_weight: f64,
}

/// Render the solved forces and member sizes as pretty-printed JSON.
pub fn render_json(summary: &AnalysisSummary) -> Result<String, serde_json::Error> {
    let unsolvable_joint = match summary.solution.status() {
        SolveStatus::Complete => None,
        SolveStatus::Indeterminate { joint, .. } => Some(joint_label(joint.index())),
    };
    let record = ReportRecord {
        complete: summary.solution.is_complete(),
        unsolvable_joint,
        allowable_stress: summary.criteria.allowable_stress(),
        unit_weight: summary.criteria.unit_weight(),
        over_length: summary
            .over_length
            .iter()
            .map(|member| OverLengthRecord {
                member: member_label(member.joints.0.index(), member.joints.1.index()),
                length: member.length,
                limit: member.limit,
            })
            .collect(),
        members: summary.sizing.members.iter().map(MemberRecord::from).collect(),
        total_volume: summary.sizing.total_volume,
        total_weight: summary.sizing.total_weight,
    };
    serde_json::to_string_pretty(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use crate::analysis::tests::loaded_triangle;
    use trussjoint::DesignCriteria;

    fn summary() -> AnalysisSummary {
        let mut truss = loaded_triangle();
        run_analysis(&mut truss, DesignCriteria::default()).expect("analysis runs")
    }

    #[test]
    fn echoes_the_truss_before_solving() {
        let report = render_truss(&loaded_triangle());
        assert!(report.starts_with("Given a truss defined by the following:\n"));
        assert!(report.contains("C (5.000, 5.000): A B\n"));
        assert!(report.contains("Given external forces:\nA: (0.00, 5.00)\n"));
        assert!(report.contains("C: (0.00, -10.00)\n"));
    }

    #[test]
    fn formats_human_readable_report() {
        let report = render_summary(&summary());
        assert!(report.contains("Member AB is 10.000 long, must not exceed 8.000"));
        assert!(report.contains("Member AB\n\tLength: 10.00 m\n\tForce: 5.00 kN (T)\n"));
        assert!(report.contains("\tForce: -7.07 kN (C)\n"));
        assert!(report.contains("\tArea: 20.00 mm^2\n"));
        assert!(report.contains("Total Volume:"));
        assert!(!report.contains("unsolvable"));
    }

    #[test]
    fn json_report_uses_labels() {
        let json = render_json(&summary()).expect("serialisable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["complete"], true);
        assert!(value.get("unsolvable_joint").is_none());
        let members = value["members"].as_array().expect("member list");
        assert_eq!(members.len(), 3);
        assert_eq!(members[0]["member"], "AB");
        assert_eq!(members[0]["kind"], "tension");
        assert_eq!(members[2]["member"], "BC");
        assert_eq!(members[2]["kind"], "compression");
        assert_eq!(value["over_length"][0]["member"], "AB");
    }
}
