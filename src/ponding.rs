//! Iterative ponding analysis of a roof bay.
//!
//! Each iteration solves the bay under the current rain load, recomputes the
//! impounded depth on the deflected roof and turns that depth back into rain
//! load. The loop stops when the largest nodal depth change drops below the
//! stop criterion, when the changes keep growing, or when the iteration budget
//! runs out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::beam_model::DEFAULT_MAX_NODE_SPACING;
use crate::errors::PondingError;
use crate::roof_bay::{RoofBay, WATER_PRESSURE_PER_DEPTH};
use crate::roof_bay_model::{ImpoundedDepth, RoofBayModel};

/// Ponding analysis settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PondingConfig {
    /// Maximum distance between beam model nodes in inches.
    pub max_node_spacing: f64,
    /// Largest nodal depth change in inches accepted as converged.
    pub stop_criterion: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Consecutive non-shrinking depth changes treated as divergence; 0 disables the check.
    pub divergence_patience: usize,
}

impl Default for PondingConfig {
    fn default() -> Self {
        Self {
            max_node_spacing: DEFAULT_MAX_NODE_SPACING,
            stop_criterion: 0.001,
            max_iterations: 50,
            divergence_patience: 3,
        }
    }
}

impl PondingConfig {
    /// Check the iteration settings.
    ///
    /// The node spacing is checked when the beam models are built.
    ///
    /// # Errors
    ///
    /// Returns [`PondingError`] for a non-positive stop criterion or a zero
    /// iteration budget.
    pub fn validate(&self) -> Result<(), PondingError> {
        if !(self.stop_criterion.is_finite() && self.stop_criterion > 0.0) {
            return Err(PondingError::InvalidStopCriterion(self.stop_criterion));
        }
        if self.max_iterations == 0 {
            return Err(PondingError::NoIterations);
        }
        Ok(())
    }
}

/// How a ponding analysis ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConvergenceStatus {
    /// The depth change fell below the stop criterion.
    Converged,
    /// The iteration budget ran out first.
    IterationLimit,
    /// The depth change kept growing or became non-finite.
    Diverging,
}

/// Outcome of [`PondingAnalysis::run`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PondingResult {
    /// How the loop ended.
    pub status: ConvergenceStatus,
    /// Number of bay solves performed.
    pub iterations: usize,
    /// Largest nodal depth change of each iteration in inches.
    pub depth_changes: Vec<f64>,
    /// Depth field of the last iteration.
    pub impounded_depth: ImpoundedDepth,
    /// Water volume of the last depth field in in³.
    pub impounded_volume: f64,
    /// Water weight of the last depth field in kips.
    pub impounded_weight: f64,
    /// Water weight on the undeflected roof in kips.
    pub static_impounded_weight: f64,
}

impl PondingResult {
    /// Whether the analysis converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }

    /// Ratio of the ponded water weight to the static water weight.
    ///
    /// Returns `None` when no water sits on the undeflected roof.
    #[must_use]
    pub fn amplification(&self) -> Option<f64> {
        (self.static_impounded_weight > 0.0)
            .then(|| self.impounded_weight / self.static_impounded_weight)
    }
}

/// Driver of the ponding iteration for one roof bay.
#[derive(Clone, Debug)]
pub struct PondingAnalysis {
    model: RoofBayModel,
    config: PondingConfig,
}

impl PondingAnalysis {
    /// Build the bay model.
    ///
    /// # Errors
    ///
    /// Returns [`PondingError`] when the configuration is invalid or the bay model
    /// cannot be built.
    pub fn new(roof_bay: RoofBay, config: PondingConfig) -> Result<Self, PondingError> {
        config.validate()?;
        let model = RoofBayModel::new(roof_bay, config.max_node_spacing)?;
        Ok(Self { model, config })
    }

    /// The bay model in its most recent state.
    #[must_use]
    pub fn model(&self) -> &RoofBayModel {
        &self.model
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &PondingConfig {
        &self.config
    }

    /// Solve the bay under the rain load of `depth` and return the resulting depth.
    ///
    /// # Errors
    ///
    /// Returns [`PondingError`] when `depth` does not fit the bay or a member
    /// cannot be solved.
    pub fn iterate(&mut self, depth: &ImpoundedDepth) -> Result<ImpoundedDepth, PondingError> {
        let rain_loads = self.model.rain_loads(depth)?;
        self.model.analyze(&rain_loads)?;
        Ok(self.model.depth_from_deflections()?)
    }

    /// Iterate from the static depth profile until the depth field settles.
    ///
    /// Non-convergence is reported through [`PondingResult::status`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`PondingError`] when a member cannot be solved.
    pub fn run(&mut self) -> Result<PondingResult, PondingError> {
        let stop_criterion = self.config.stop_criterion;
        let patience = self.config.divergence_patience;
        let mut depth = self.model.initial_depth().clone();
        let mut depth_changes: Vec<f64> = Vec::new();
        let mut growing = 0;
        let mut status = ConvergenceStatus::IterationLimit;

        for iteration in 1..=self.config.max_iterations {
            let next = self.iterate(&depth)?;
            let change = next.max_difference(&depth);
            debug!(iteration, change, max_depth = next.max_depth(), "ponding iteration");
            depth = next;

            if !change.is_finite() || !depth.is_finite() {
                depth_changes.push(change);
                status = ConvergenceStatus::Diverging;
                break;
            }
            if let Some(&previous) = depth_changes.last() {
                growing = if change >= previous { growing + 1 } else { 0 };
            }
            depth_changes.push(change);
            if change < stop_criterion {
                status = ConvergenceStatus::Converged;
                break;
            }
            if patience > 0 && growing >= patience {
                status = ConvergenceStatus::Diverging;
                break;
            }
        }

        let impounded_volume = self.model.impounded_volume(&depth);
        let result = PondingResult {
            status,
            iterations: depth_changes.len(),
            depth_changes,
            impounded_volume,
            impounded_weight: impounded_volume * WATER_PRESSURE_PER_DEPTH,
            static_impounded_weight: self.model.impounded_weight(self.model.initial_depth()),
            impounded_depth: depth,
        };
        match result.status {
            ConvergenceStatus::Converged => info!(
                iterations = result.iterations,
                weight = result.impounded_weight,
                "ponding analysis converged"
            ),
            ConvergenceStatus::IterationLimit => warn!(
                iterations = result.iterations,
                "ponding analysis reached the iteration limit without converging"
            ),
            ConvergenceStatus::Diverging => warn!(
                iterations = result.iterations,
                "ponding analysis is diverging; the bay may be unstable"
            ),
        }
        Ok(result)
    }
}
