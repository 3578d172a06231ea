use trussjoint::labels::member_label;
use trussjoint::{size_members, DesignCriteria, TrussDescription};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Seven joints carrying 20 kN at mid-span, held up at both ends
    let description: TrussDescription = include_str!("seven_joint.json").parse()?;
    let mut truss = description.build()?;

    let solution = truss.solve()?;
    let sizing = size_members(&truss, solution.ledger(), &DesignCriteria::default());

    for design in &sizing.members {
        println!(
            "{}: {:+8.3} kN, area {:8.3} mm^2",
            member_label(design.key.low().index(), design.key.high().index()),
            design.force,
            design.area
        );
    }
    println!("Total weight: {:.6} kN", sizing.total_weight);

    Ok(())
}
