use crate::analysis::{AnalysisSummary, MemberSummary};
use pondx::ConvergenceStatus;
use std::fmt::Write;

/// Append one line per member.
fn render_members(output: &mut String, title: &str, members: &[MemberSummary]) {
    writeln!(output, "{title}:").expect("writing to string cannot fail");
    for (index, member) in members.iter().enumerate() {
        let reactions = member
            .reactions
            .iter()
            .map(|reaction| format!("{reaction:.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            output,
            "  {index}: {:<8} deflection = {:.3} in, moment = {:.1} k-in, reactions = [{reactions}] k",
            member.section, member.max_deflection, member.max_moment
        )
        .expect("writing to string cannot fail");
    }
}

/// Render a textual summary of the ponding analysis.
///
/// The report starts with the iteration outcome, then compares the ponded water
/// with the water the undeflected roof would hold, and finally lists the
/// response of every member.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();
    let result = &summary.result;

    // State the outcome first; a bay that does not converge needs attention
    // before any of the numbers below mean anything.
    let outcome = match result.status {
        ConvergenceStatus::Converged => "converged",
        ConvergenceStatus::IterationLimit => "stopped at the iteration limit",
        ConvergenceStatus::Diverging => "diverging (possible ponding instability)",
    };
    writeln!(
        &mut output,
        "Ponding analysis {outcome} after {} iterations",
        result.iterations
    )
    .expect("writing to string cannot fail");
    if let Some(&last) = result.depth_changes.last() {
        writeln!(&mut output, "Final depth change: {last:.2e} in")
            .expect("writing to string cannot fail");
    }

    // Geometry of the bay as seen by the water.
    writeln!(
        &mut output,
        "Secondary spacing: {:.2} in, static depth at drain: {:.3} in",
        summary.secondary_spacing, summary.design_depth
    )
    .expect("writing to string cannot fail");

    // The amplification is the headline number of a ponding check.
    writeln!(
        &mut output,
        "Impounded water: {:.3} k (static {:.3} k)",
        result.impounded_weight, result.static_impounded_weight
    )
    .expect("writing to string cannot fail");
    if let Some(amplification) = result.amplification() {
        writeln!(&mut output, "Amplification: {amplification:.3}")
            .expect("writing to string cannot fail");
    }

    render_members(&mut output, "Primary members", &summary.primary);
    render_members(&mut output, "Secondary members", &summary.secondary);

    output
}
