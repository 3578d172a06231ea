mod analysis;
mod drawing;
mod report;

use analysis::run_analysis;
use clap::{Parser, ValueEnum};
use drawing::render_svg;
use report::{render_json, render_summary, render_truss};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trussjoint::{read_description, TrussDescription};

/// How the results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable member report
    Text,
    /// Machine-readable JSON report
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "trussjoint", version)]
#[command(about = "Solve a planar truss by the method of joints and size its members", long_about = None)]
struct Cli {
    /// Path to the JSON truss description
    input: PathBuf,
    /// Longest member accepted without a warning
    #[arg(long)]
    max_member_length: Option<f64>,
    /// Allowable stress used to size members
    #[arg(long)]
    allowable_stress: Option<f64>,
    /// Weight per unit volume of the member material
    #[arg(long)]
    unit_weight: Option<f64>,
    /// Output format for the results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Also write an SVG drawing of the solved truss to this path
    #[arg(long)]
    svg: Option<PathBuf>,
}

impl Cli {
    /// Replace values from the description with those given on the command line.
    fn apply_overrides(&self, description: &mut TrussDescription) {
        if let Some(limit) = self.max_member_length {
            description.max_member_length = Some(limit);
        }
        if let Some(stress) = self.allowable_stress {
            description.allowable_stress = Some(stress);
        }
        if let Some(weight) = self.unit_weight {
            description.unit_weight = Some(weight);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut description = read_description(&cli.input)?;
    cli.apply_overrides(&mut description);
    let mut truss = description.build()?;
    let criteria = description.design_criteria()?;

    if cli.format == OutputFormat::Text {
        print!("{}", render_truss(&truss));
    }

    let summary = run_analysis(&mut truss, criteria)?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_summary(&summary)),
        OutputFormat::Json => println!("{}", render_json(&summary)?),
    }

    if let Some(path) = &cli.svg {
        fs::write(path, render_svg(&truss, summary.solution.ledger()))?;
        info!(path = %path.display(), "wrote truss drawing");
    }

    Ok(())
}
