//! Beam models for every member of a roof bay, coupled through secondary reactions.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::beam_model::{interpolate, BeamModel};
use crate::errors::{MemberError, RoofBayError};
use crate::integrate::simpson;
use crate::loads::{DistLoad, LoadMode, PointLoad};
use crate::roof_bay::{RoofBay, WATER_PRESSURE_PER_DEPTH};

/// Impounded water depth in inches at every node of every member.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImpoundedDepth {
    /// Depth at each node of each primary member.
    pub primary: Vec<Vec<f64>>,
    /// Depth at each node of each secondary member.
    pub secondary: Vec<Vec<f64>>,
}

impl ImpoundedDepth {
    fn values(&self) -> impl Iterator<Item = &f64> {
        self.primary.iter().chain(&self.secondary).flatten()
    }

    /// Largest absolute nodal difference to `other`.
    ///
    /// Fields of different shape are infinitely far apart.
    #[must_use]
    pub fn max_difference(&self, other: &Self) -> f64 {
        let same_shape = |a: &[Vec<f64>], b: &[Vec<f64>]| {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.len() == b.len())
        };
        if !same_shape(&self.primary, &other.primary) || !same_shape(&self.secondary, &other.secondary) {
            return f64::INFINITY;
        }
        self.values()
            .zip(other.values())
            .fold(0.0, |max, (a, b)| max.max((a - b).abs()))
    }

    /// Deepest nodal depth.
    #[must_use]
    pub fn max_depth(&self) -> f64 {
        self.values().fold(0.0, |max, &depth| max.max(depth))
    }

    /// Whether every depth is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values().all(|depth| depth.is_finite())
    }
}

/// Analysis model of a [`RoofBay`].
///
/// Secondary models carry the dead load and the current rain load. Primary
/// models carry their self-weight and the negated transverse reactions of the
/// secondary members as point loads at the secondary positions.
#[derive(Clone, Debug)]
pub struct RoofBayModel {
    roof_bay: RoofBay,
    max_node_spacing: f64,
    primary_models: Vec<BeamModel>,
    secondary_models: Vec<BeamModel>,
    initial_depth: ImpoundedDepth,
    initial_rain_loads: Vec<Vec<DistLoad>>,
}

impl RoofBayModel {
    /// Build and initialise one beam model per member.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError`] when the node spacing is invalid or a derived load
    /// does not fit on its member.
    pub fn new(roof_bay: RoofBay, max_node_spacing: f64) -> Result<Self, RoofBayError> {
        let secondary_models = roof_bay
            .secondary_framing()
            .members()
            .iter()
            .zip(roof_bay.secondary_dead_loads())
            .map(|(member, dead_load)| -> Result<BeamModel, RoofBayError> {
                let mut model = BeamModel::new(member.clone(), max_node_spacing, false)?;
                model.add_dist_loads(vec![*dead_load], LoadMode::Append)?;
                Ok(model)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let intersections = roof_bay
            .secondary_positions()
            .into_iter()
            .map(|x| PointLoad::new(x, [0.0; 3]))
            .collect::<Result<Vec<_>, _>>()
            .map_err(MemberError::from)?;
        let primary_models = roof_bay
            .primary_framing()
            .members()
            .iter()
            .zip(roof_bay.primary_self_weights())
            .map(|(member, self_weight)| -> Result<BeamModel, RoofBayError> {
                let mut model = BeamModel::new(member.clone(), max_node_spacing, false)?;
                model.add_dist_loads(vec![*self_weight], LoadMode::Append)?;
                model.add_point_loads(intersections.clone(), LoadMode::Replace)?;
                Ok(model)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut model = Self {
            roof_bay,
            max_node_spacing,
            primary_models,
            secondary_models,
            initial_depth: ImpoundedDepth::default(),
            initial_rain_loads: Vec::new(),
        };
        model.initial_depth = model.depth_field(false)?;
        model.initial_rain_loads = model.rain_loads(&model.initial_depth)?;
        Ok(model)
    }

    /// The modelled bay.
    #[must_use]
    pub fn roof_bay(&self) -> &RoofBay {
        &self.roof_bay
    }

    /// Maximum node spacing of every beam model.
    #[must_use]
    pub fn max_node_spacing(&self) -> f64 {
        self.max_node_spacing
    }

    /// Models of the primary members.
    #[must_use]
    pub fn primary_models(&self) -> &[BeamModel] {
        &self.primary_models
    }

    /// Models of the secondary members.
    #[must_use]
    pub fn secondary_models(&self) -> &[BeamModel] {
        &self.secondary_models
    }

    /// Static depth profile on the undeflected roof.
    #[must_use]
    pub fn initial_depth(&self) -> &ImpoundedDepth {
        &self.initial_depth
    }

    /// Rain loads produced by [`RoofBayModel::initial_depth`].
    #[must_use]
    pub fn initial_rain_loads(&self) -> &[Vec<DistLoad>] {
        &self.initial_rain_loads
    }

    /// Whether every member model is assembled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.models().all(BeamModel::is_ready)
    }

    /// Whether every member model is solved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.models().all(BeamModel::is_complete)
    }

    fn models(&self) -> impl Iterator<Item = &BeamModel> {
        self.primary_models.iter().chain(&self.secondary_models)
    }

    /// Element-wise rain loads on every secondary member for a depth field.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError`] when the depth field does not match the secondary
    /// model nodes or holds non-finite values.
    pub fn rain_loads(&self, depth: &ImpoundedDepth) -> Result<Vec<Vec<DistLoad>>, RoofBayError> {
        if depth.secondary.len() != self.secondary_models.len() {
            return Err(RoofBayError::RainLoadMismatch {
                expected: self.secondary_models.len(),
                received: depth.secondary.len(),
            });
        }
        self.secondary_models
            .iter()
            .zip(&depth.secondary)
            .zip(self.roof_bay.tributary_widths())
            .enumerate()
            .map(|(member, ((model, depths), width))| -> Result<Vec<DistLoad>, RoofBayError> {
                let nodes = model.nodes();
                if depths.len() != nodes.len() {
                    return Err(RoofBayError::DepthFieldMismatch {
                        member,
                        expected: nodes.len(),
                        received: depths.len(),
                    });
                }
                let intensity = |depth: f64| -depth * WATER_PRESSURE_PER_DEPTH * width;
                nodes
                    .windows(2)
                    .zip(depths.windows(2))
                    .map(|(x, d)| {
                        DistLoad::transverse((x[0], x[1]), intensity(d[0]), intensity(d[1]))
                            .map_err(|error| RoofBayError::Member(error.into()))
                    })
                    .collect()
            })
            .collect()
    }

    /// Solve the bay under the dead loads plus `rain_loads`, one set per secondary member.
    ///
    /// Every secondary model is solved before any primary model is loaded.
    /// Primary member *k* then carries the negated transverse reaction at support
    /// *k* of every secondary member. Axial and moment reactions of the secondary
    /// members are not transferred, so end moments of fixed-end secondaries are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError`] when the load sets do not match the secondary
    /// members or a member model cannot be solved.
    pub fn analyze(&mut self, rain_loads: &[Vec<DistLoad>]) -> Result<(), RoofBayError> {
        if rain_loads.len() != self.secondary_models.len() {
            return Err(RoofBayError::RainLoadMismatch {
                expected: self.secondary_models.len(),
                received: rain_loads.len(),
            });
        }

        let dead_loads = self.roof_bay.secondary_dead_loads();
        self.secondary_models
            .par_iter_mut()
            .zip(rain_loads.par_iter())
            .zip(dead_loads.par_iter())
            .try_for_each(|((model, rain), dead)| -> Result<(), RoofBayError> {
                let mut loads = Vec::with_capacity(rain.len() + 1);
                loads.push(*dead);
                loads.extend_from_slice(rain);
                model.add_dist_loads(loads, LoadMode::Replace)?;
                model.analyze()?;
                Ok(())
            })?;

        let reactions = self
            .secondary_models
            .iter()
            .map(BeamModel::reactions_at_supports)
            .collect::<Result<Vec<_>, _>>()?;
        let positions = self.roof_bay.secondary_positions();
        let primary_loads = (0..self.primary_models.len())
            .map(|primary| {
                positions
                    .iter()
                    .zip(&reactions)
                    .map(|(&x, reactions)| {
                        PointLoad::new(x, [0.0, -reactions[primary].transverse, 0.0])
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(MemberError::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.primary_models
            .par_iter_mut()
            .zip(primary_loads.into_par_iter())
            .try_for_each(|(model, loads)| -> Result<(), RoofBayError> {
                model.add_point_loads(loads, LoadMode::Replace)?;
                model.analyze()?;
                Ok(())
            })?;

        debug!(
            primary = self.primary_models.len(),
            secondary = self.secondary_models.len(),
            "solved roof bay"
        );
        Ok(())
    }

    /// Impounded depth on the deflected roof.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError::Analysis`] when the bay has not been solved.
    pub fn depth_from_deflections(&self) -> Result<ImpoundedDepth, RoofBayError> {
        self.depth_field(true)
    }

    /// Depth at every node, `max(0, d − s·x − v)`, with `v` taken from the
    /// solved models when `deflected` is set and zero otherwise.
    fn depth_field(&self, deflected: bool) -> Result<ImpoundedDepth, RoofBayError> {
        let design_depth = self.roof_bay.design_depth();
        let slope = self.roof_bay.slope_ratio();
        let depth_at = |x: f64, deflection: f64| (design_depth - slope * x - deflection).max(0.0);

        let primary_shapes = self
            .primary_models
            .iter()
            .map(|model| {
                if deflected {
                    model.deflected_shape()
                } else {
                    Ok(model.nodes().iter().map(|&x| (x, 0.0)).collect())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let primary_positions = self.roof_bay.primary_positions();
        let primary = primary_shapes
            .iter()
            .zip(&primary_positions)
            .map(|(shape, &x)| shape.iter().map(|&(_, v)| depth_at(x, v)).collect())
            .collect();

        let positions = self.roof_bay.secondary_positions();
        let mut secondary: Vec<Vec<f64>> = Vec::with_capacity(self.secondary_models.len());
        for (model, &position) in self.secondary_models.iter().zip(&positions) {
            let settlement: Vec<(f64, f64)> = model
                .member()
                .supports()
                .iter()
                .zip(&primary_shapes)
                .map(|(support, shape)| (support.location, interpolate(shape, position)))
                .collect();
            let own = if deflected {
                model.deflected_shape()?
            } else {
                model.nodes().iter().map(|&x| (x, 0.0)).collect()
            };
            secondary.push(
                own.iter()
                    .map(|&(x, v)| depth_at(x, v + interpolate(&settlement, x)))
                    .collect(),
            );
        }

        Ok(ImpoundedDepth { primary, secondary })
    }

    /// Volume of water in in³: depth integrated along each secondary member and
    /// then across the secondary positions.
    #[must_use]
    pub fn impounded_volume(&self, depth: &ImpoundedDepth) -> f64 {
        let areas: Vec<f64> = self
            .secondary_models
            .iter()
            .zip(&depth.secondary)
            .map(|(model, depths)| simpson(model.nodes(), depths))
            .collect();
        simpson(&self.roof_bay.secondary_positions(), &areas)
    }

    /// Weight of water in kips.
    #[must_use]
    pub fn impounded_weight(&self, depth: &ImpoundedDepth) -> f64 {
        self.impounded_volume(depth) * WATER_PRESSURE_PER_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::AnalysisError;
    use crate::member::{simple_supports, Member};
    use crate::roof_bay::{Loading, Mirroring, PrimaryFraming, SecondaryFraming};
    use crate::section::SteelBeamSize;

    fn bay(include_self_weight: bool) -> RoofBay {
        let w16x26 = SteelBeamSize::new("W16X26", 301.0, 7.68, 26.0);
        let w12x16 = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
        let primary = (0..2)
            .map(|_| Member::new(240.0, &w16x26, simple_supports(240.0)).expect("valid member"))
            .collect();
        let secondary = (0..3)
            .map(|_| Member::new(240.0, &w12x16, simple_supports(240.0)).expect("valid member"))
            .collect();
        RoofBay::new(
            PrimaryFraming::new(primary).expect("primary members"),
            SecondaryFraming::new(secondary, 0.25).expect("secondary members"),
            Loading::new(20.0 / 144_000.0, 22.4 / 144_000.0, include_self_weight),
            Mirroring::default(),
        )
        .expect("valid bay")
    }

    #[test]
    fn construction_initialises_every_model() {
        let model = RoofBayModel::new(bay(true), 6.0).expect("valid model");
        assert!(model.is_ready());
        assert!(!model.is_complete());
        assert_eq!(model.secondary_models()[0].nodes().len(), 41);
        assert_eq!(model.initial_rain_loads().len(), 3);
        assert_eq!(model.initial_rain_loads()[0].len(), 40);
        for primary in model.primary_models() {
            for x in [0.0, 120.0, 240.0] {
                assert!(primary.nodes().contains(&x));
            }
        }
    }

    #[test]
    fn initial_depth_matches_static_profile() {
        let model = RoofBayModel::new(bay(false), 6.0).expect("valid model");
        let bay = model.roof_bay();
        let depth = bay.design_depth();
        let run_out = depth / bay.slope_ratio();
        let initial = model.initial_depth();
        assert!(initial.primary[0].iter().all(|&d| (d - depth).abs() < 1.0e-12));
        assert!(initial.primary[1].iter().all(|&d| d == 0.0));
        let nodes = model.secondary_models()[1].nodes();
        for (&x, &d) in nodes.iter().zip(&initial.secondary[1]) {
            let expected = if x <= run_out { depth - bay.slope_ratio() * x } else { 0.0 };
            assert_relative_eq!(d, expected.max(0.0), epsilon = 1.0e-12);
        }
    }

    #[test]
    fn secondary_reactions_balance_applied_load() {
        let mut model = RoofBayModel::new(bay(true), 6.0).expect("valid model");
        let rain = model.initial_rain_loads().to_vec();
        model.analyze(&rain).expect("solvable");
        assert!(model.is_complete());
        for (index, secondary) in model.secondary_models().iter().enumerate() {
            let applied: f64 = secondary
                .member()
                .dist_loads()
                .iter()
                .map(|load| load.resultant().transverse)
                .sum();
            let reactions: f64 = secondary
                .reactions_at_supports()
                .expect("solved")
                .iter()
                .map(|reaction| reaction.transverse)
                .sum();
            assert_relative_eq!(reactions, -applied, max_relative = 1.0e-9);
            assert_eq!(secondary.member().dist_loads().len(), 1 + rain[index].len());
        }
    }

    #[test]
    fn primary_reactions_carry_the_whole_bay() {
        let mut model = RoofBayModel::new(bay(true), 6.0).expect("valid model");
        let rain = model.initial_rain_loads().to_vec();
        model.analyze(&rain).expect("solvable");
        let applied: f64 = model
            .secondary_models()
            .iter()
            .chain(model.primary_models())
            .flat_map(|model| model.member().dist_loads())
            .map(|load| -load.resultant().transverse)
            .sum();
        let primary_reactions: f64 = model
            .primary_models()
            .iter()
            .flat_map(|model| model.reactions_at_supports().expect("solved"))
            .map(|reaction| reaction.transverse)
            .sum();
        assert_relative_eq!(primary_reactions, applied, max_relative = 1.0e-9);
    }

    #[test]
    fn mismatched_rain_loads_are_rejected() {
        let mut model = RoofBayModel::new(bay(false), 6.0).expect("valid model");
        assert_eq!(
            model.analyze(&[]),
            Err(RoofBayError::RainLoadMismatch {
                expected: 3,
                received: 0
            })
        );
        assert_eq!(
            model.depth_from_deflections(),
            Err(RoofBayError::Analysis(AnalysisError::NotSolved))
        );
    }

    #[test]
    fn deflection_deepens_the_pond() {
        let mut model = RoofBayModel::new(bay(true), 6.0).expect("valid model");
        let rain = model.initial_rain_loads().to_vec();
        model.analyze(&rain).expect("solvable");
        let deflected = model.depth_from_deflections().expect("solved");
        assert!(deflected.max_depth() > model.initial_depth().max_depth());
        assert!(model.impounded_volume(&deflected) > model.impounded_volume(model.initial_depth()));
        assert!(deflected.max_difference(model.initial_depth()) > 0.0);
        assert_eq!(deflected.max_difference(&ImpoundedDepth::default()), f64::INFINITY);
    }

    #[test]
    fn flat_static_volume_matches_prism() {
        let model = RoofBayModel::new(bay(false), 6.0).expect("valid model");
        let depth = ImpoundedDepth {
            primary: model.initial_depth().primary.clone(),
            secondary: model
                .secondary_models()
                .iter()
                .map(|secondary| vec![2.0; secondary.nodes().len()])
                .collect(),
        };
        assert_relative_eq!(model.impounded_volume(&depth), 2.0 * 240.0 * 240.0, max_relative = 1.0e-12);
    }
}
