use petgraph::graph::NodeIndex;
use std::fmt::Write;
use trussjoint::labels::joint_label;
use trussjoint::{point, BoundingBox, ForceLedger, Point, Truss};

/// Pixels per unit of truss length.
const SCALE: f64 = 60.0;
/// Blank border around the drawing, in pixels.
const MARGIN: f64 = 50.0;
/// Diameter of a joint marker, in pixels.
const JOINT_SIZE: f64 = 10.0;

/// Maps truss coordinates onto the SVG canvas with the y axis pointing up.
struct Canvas {
    bounds: BoundingBox,
}

impl Canvas {
    fn width(&self) -> f64 {
        self.bounds.width() * SCALE + 2.0 * MARGIN
    }

    fn height(&self) -> f64 {
        self.bounds.height() * SCALE + 2.0 * MARGIN
    }

    fn project(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.bounds.min.x) * SCALE + MARGIN,
            (self.bounds.max.y - p.y) * SCALE + MARGIN,
        )
    }
}

/// Text shown at the middle of a solved member.
fn force_label(force: f64) -> String {
    if force == 0.0 {
        "Zero-force".to_owned()
    } else if force > 0.0 {
        format!("{force:.2}kN (T)")
    } else {
        format!("{force:.2}kN (C)")
    }
}

/// Render members, joints and solved forces as an SVG document.
///
/// Members are drawn as lines, joints as labelled dots and every member in
/// `ledger` gets its force written at its midpoint.
#[must_use]
pub fn render_svg(truss: &Truss, ledger: &ForceLedger) -> String {
    let origin = point(0.0, 0.0);
    let canvas = Canvas {
        bounds: truss.bounding_box().unwrap_or(BoundingBox {
            min: origin,
            max: origin,
        }),
    };
    let position = |joint: NodeIndex| truss.joint_position(joint).unwrap_or_default();
    let mut output = String::new();

    writeln!(
        &mut output,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        canvas.width(),
        canvas.height(),
        canvas.width(),
        canvas.height()
    )
    .expect("writing to string cannot fail");

    output.push_str(r#"<g stroke="black" stroke-width="2">"#);
    output.push('\n');
    for member in truss.members() {
        let Some((start, end)) = truss.member_endpoints(member) else {
            continue;
        };
        let (x1, y1) = canvas.project(position(start));
        let (x2, y2) = canvas.project(position(end));
        writeln!(
            &mut output,
            r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}"/>"#
        )
        .expect("writing to string cannot fail");
    }
    output.push_str("</g>\n");

    output.push_str(r#"<g font-family="sans-serif" font-size="12">"#);
    output.push('\n');
    for joint in truss.joints() {
        let location = position(joint);
        let (x, y) = canvas.project(location);
        // Labels sit below joints under the x axis and above the rest.
        let shift = if location.y < 0.0 { 22.0 } else { -2.0 };
        writeln!(
            &mut output,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="{:.1}" fill="black"/>"#,
            JOINT_SIZE / 2.0
        )
        .expect("writing to string cannot fail");
        writeln!(
            &mut output,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            x - JOINT_SIZE / 2.0,
            y - JOINT_SIZE / 2.0 + shift,
            joint_label(joint.index())
        )
        .expect("writing to string cannot fail");
    }

    for (key, force) in ledger.iter() {
        let (a, b) = (position(key.low()), position(key.high()));
        let (x, y) = canvas.project(point((a.x + b.x) / 2.0, (a.y + b.y) / 2.0));
        writeln!(
            &mut output,
            r#"<text x="{x:.1}" y="{y:.1}" fill="red">{}</text>"#,
            force_label(force)
        )
        .expect("writing to string cannot fail");
    }
    output.push_str("</g>\n</svg>\n");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::loaded_triangle;

    #[test]
    fn force_labels_follow_sign() {
        assert_eq!(force_label(0.0), "Zero-force");
        assert_eq!(force_label(5.0), "5.00kN (T)");
        assert_eq!(force_label(-10.3078), "-10.31kN (C)");
    }

    #[test]
    fn canvas_flips_y_and_fits_bounds() {
        let truss = loaded_triangle();
        let svg = render_svg(&truss, &ForceLedger::new());

        // 10 x 5 truss units at 60 px each, plus a 50 px margin on every side.
        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="700" height="400""#
        ));
        // A at (0, 0) lands on the bottom margin, C at (5, 5) on the top one.
        assert!(svg.contains(r#"<circle cx="50.0" cy="350.0""#));
        assert!(svg.contains(r#"<circle cx="350.0" cy="50.0""#));
        assert_eq!(svg.matches("<line ").count(), 3);
        assert!(!svg.contains("fill=\"red\""));
    }

    #[test]
    fn solved_members_are_annotated() {
        let truss = loaded_triangle();
        let mut ledger = ForceLedger::new();
        ledger.record(NodeIndex::new(0), NodeIndex::new(1), 5.0);
        ledger.record(NodeIndex::new(1), NodeIndex::new(2), 0.0);
        let svg = render_svg(&truss, &ledger);

        assert!(svg.contains(r#"<text x="350.0" y="350.0" fill="red">5.00kN (T)</text>"#));
        assert!(svg.contains(">Zero-force</text>"));
    }

    #[test]
    fn empty_truss_is_just_the_margin() {
        let svg = render_svg(&Truss::new(0), &ForceLedger::new());
        assert!(svg.contains(r#"width="100" height="100""#));
        assert_eq!(svg.matches("<circle").count(), 0);
    }
}
