#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use pondx::{
    simple_supports, ConvergenceStatus, Loading, Member, Mirroring, PondingAnalysis,
    PondingConfig, PrimaryFraming, RoofBay, RoofBayModel, SecondaryFraming, SteelBeamSize,
    DEFAULT_ROOF_SLOPE,
};

const SPAN: f64 = 240.0;
const DEAD_LOAD: f64 = 20.0 / 144_000.0;
const RAIN_LOAD: f64 = 25.2 / 144_000.0;

fn member(section: &SteelBeamSize) -> Member {
    Member::new(SPAN, section, simple_supports(SPAN)).expect("simply supported member is valid")
}

/// Two girders spanning `SPAN` carrying `secondaries` evenly spaced members.
fn bay(secondary: &SteelBeamSize, secondaries: usize, mirroring: Mirroring) -> RoofBay {
    let girder = SteelBeamSize::new("W16X26", 301.0, 7.68, 26.0);
    let primary = PrimaryFraming::new(vec![member(&girder), member(&girder)])
        .expect("two primary members");
    let secondary = SecondaryFraming::new(
        (0..secondaries).map(|_| member(secondary)).collect(),
        DEFAULT_ROOF_SLOPE,
    )
    .expect("enough secondary members");
    let loading = Loading::new(DEAD_LOAD, RAIN_LOAD, false);
    RoofBay::new(primary, secondary, loading, mirroring).expect("consistent bay")
}

fn stiff_bay() -> RoofBay {
    bay(&SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0), 3, Mirroring::default())
}

#[test]
fn two_secondary_bay_geometry() {
    let section = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);

    let open = bay(&section, 2, Mirroring::default());
    assert_relative_eq!(open.secondary_spacing(), 240.0);
    assert_eq!(open.tributary_widths(), &[120.0, 120.0]);

    let mirrored = bay(&section, 2, Mirroring::new(true, true));
    assert_eq!(mirrored.tributary_widths(), &[240.0, 240.0]);

    let dead = mirrored.secondary_dead_loads();
    assert_relative_eq!(dead[0].resultant().transverse, -DEAD_LOAD * 240.0 * SPAN);
}

#[test]
fn primary_reactions_carry_the_whole_bay() {
    let roof_bay = stiff_bay();
    let mut model = RoofBayModel::new(roof_bay, 6.0).expect("bay discretises");
    let rain = model.initial_rain_loads().to_vec();
    model.analyze(&rain).expect("members are stable");

    let dead: f64 = DEAD_LOAD * SPAN * SPAN;
    let water: f64 = model.impounded_weight(model.initial_depth());
    let reaction: f64 = model
        .primary_models()
        .iter()
        .map(|primary| {
            primary
                .reactions_at_supports()
                .expect("primary is solved")
                .iter()
                .map(|action| action.transverse)
                .sum::<f64>()
        })
        .sum();
    // Rain loads follow the nodal depths linearly while the weight is
    // integrated with Simpson's rule, so the two agree only closely.
    assert_relative_eq!(reaction, dead + water, max_relative = 1.0e-3);
}

#[test]
fn stiff_bay_converges_above_static_weight() {
    let config = PondingConfig::default();
    let mut analysis = PondingAnalysis::new(stiff_bay(), config).expect("valid configuration");
    let result = analysis.run().expect("members are stable");

    assert_eq!(result.status, ConvergenceStatus::Converged);
    assert!(result.iterations > 1);
    assert!(*result.depth_changes.last().expect("at least one iteration") < config.stop_criterion);
    assert!(result.impounded_weight > result.static_impounded_weight);
    assert!(result.amplification().expect("static water exists") > 1.0);

    // Feeding the converged field back in reproduces it.
    let again = analysis
        .iterate(&result.impounded_depth)
        .expect("members are stable");
    assert!(again.max_difference(&result.impounded_depth) < config.stop_criterion);
}

#[test]
fn flexible_secondaries_diverge() {
    let flexible = SteelBeamSize::new("FLEX", 1.0, 1.0, 0.0);
    let roof_bay = bay(&flexible, 3, Mirroring::default());
    let mut analysis =
        PondingAnalysis::new(roof_bay, PondingConfig::default()).expect("valid configuration");
    let result = analysis.run().expect("members are stable");

    assert_eq!(result.status, ConvergenceStatus::Diverging);
    assert!(!result.is_converged());
    let changes = &result.depth_changes;
    assert!(changes[changes.len() - 1] > changes[0]);
}

#[test]
fn zero_patience_keeps_iterating_a_growing_bay() {
    let flexible = SteelBeamSize::new("FLEX", 1.0, 1.0, 0.0);
    let config = PondingConfig {
        max_iterations: 8,
        divergence_patience: 0,
        ..PondingConfig::default()
    };
    let roof_bay = bay(&flexible, 3, Mirroring::default());
    let mut analysis = PondingAnalysis::new(roof_bay, config).expect("valid configuration");
    let result = analysis.run().expect("members are stable");

    assert_eq!(result.status, ConvergenceStatus::IterationLimit);
    assert_eq!(result.iterations, 8);
    assert!(result.depth_changes.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn single_iteration_hits_the_limit() {
    let config = PondingConfig {
        max_iterations: 1,
        stop_criterion: 1.0e-12,
        ..PondingConfig::default()
    };
    let mut analysis = PondingAnalysis::new(stiff_bay(), config).expect("valid configuration");
    let result = analysis.run().expect("members are stable");

    assert_eq!(result.status, ConvergenceStatus::IterationLimit);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.depth_changes.len(), 1);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = PondingConfig {
        stop_criterion: -1.0,
        ..PondingConfig::default()
    };
    assert!(PondingAnalysis::new(stiff_bay(), config).is_err());
}
