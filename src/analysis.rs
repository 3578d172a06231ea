use trussjoint::{
    size_members, AnalysisError, DesignCriteria, OverLengthMember, SizingReport, Solution, Truss,
};
use tracing::info;

/// Everything the report and drawing need from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Members longer than the configured limit.
    pub over_length: Vec<OverLengthMember>,
    /// Solved forces and how the solve ended.
    pub solution: Solution,
    /// Sizing of every solved member.
    pub sizing: SizingReport,
    /// Criteria the sizing used.
    pub criteria: DesignCriteria,
}

/// Compute member lengths, solve the truss by the method of joints and size
/// the solved members.
///
/// An indeterminate joint is not an error: the summary then holds the
/// members solved before the loop stopped.
pub fn run_analysis(
    truss: &mut Truss,
    criteria: DesignCriteria,
) -> Result<AnalysisSummary, AnalysisError> {
    // Lengths are cached, so the pass inside `solve` finds nothing left to do.
    let over_length = truss.compute_lengths()?;
    let solution = truss.solve()?;
    let sizing = size_members(truss, solution.ledger(), &criteria);

    info!(
        solved = solution.ledger().len(),
        members = truss.member_count(),
        complete = solution.is_complete(),
        "analysis finished"
    );

    Ok(AnalysisSummary {
        over_length,
        solution,
        sizing,
        criteria,
    })
}
