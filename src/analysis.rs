use pondx::{PondingAnalysis, PondingConfig, PondingError, PondingResult, RoofBay};

/// Response of one member at the end of the ponding analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSummary {
    /// Section designation.
    pub section: String,
    /// Largest downward deflection in inches.
    pub max_deflection: f64,
    /// Largest sagging moment in kip-inches.
    pub max_moment: f64,
    /// Transverse reaction at each support in kips.
    pub reactions: Vec<f64>,
}

/// Summary of the results from the ponding analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    /// Outcome of the iteration.
    pub result: PondingResult,
    /// Distance between secondary members in inches.
    pub secondary_spacing: f64,
    /// Static water depth at the drain in inches.
    pub design_depth: f64,
    /// Girder responses.
    pub primary: Vec<MemberSummary>,
    /// Beam and joist responses.
    pub secondary: Vec<MemberSummary>,
}

/// Run the ponding iteration for `bay` and extract key response metrics.
///
/// Every iteration re-solves each member with the stiffness method described at
/// <https://en.wikipedia.org/wiki/Direct_stiffness_method>.
pub fn run_analysis(bay: RoofBay, config: PondingConfig) -> Result<AnalysisSummary, PondingError> {
    let secondary_spacing = bay.secondary_spacing();
    let design_depth = bay.design_depth();
    let mut analysis = PondingAnalysis::new(bay, config)?;
    let result = analysis.run()?;

    let model = analysis.model();
    let summarize = |models: &[pondx::BeamModel]| {
        models
            .iter()
            .map(|member| -> Result<MemberSummary, PondingError> {
                let max_deflection = member
                    .deflected_shape()
                    .map_err(|error| PondingError::RoofBay(error.into()))?
                    .iter()
                    .fold(0.0_f64, |max, &(_, v)| max.max(-v));
                let max_moment = member
                    .moment_diagram()
                    .map_err(|error| PondingError::RoofBay(error.into()))?
                    .iter()
                    .fold(0.0_f64, |max, &(_, m)| max.max(m));
                let reactions = member
                    .reactions_at_supports()
                    .map_err(|error| PondingError::RoofBay(error.into()))?
                    .iter()
                    .map(|reaction| reaction.transverse)
                    .collect();
                Ok(MemberSummary {
                    section: member.member().section_name().to_owned(),
                    max_deflection,
                    max_moment,
                    reactions,
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(AnalysisSummary {
        primary: summarize(model.primary_models())?,
        secondary: summarize(model.secondary_models())?,
        result,
        secondary_spacing,
        design_depth,
    })
}
