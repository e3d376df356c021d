#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod beam_model;
pub mod errors;
pub mod geometry;
pub mod integrate;
pub mod loads;
pub mod member;
pub mod ponding;
pub mod roof_bay;
pub mod roof_bay_model;
pub mod section;

pub use beam_model::{
    element_stiffness, fixed_end_forces_of, AnalysisState, BeamModel, ElementForces,
    ElementStiffness, DEFAULT_MAX_NODE_SPACING,
};
pub use errors::{
    AnalysisError, LoadError, MemberError, ModelError, PondingError, RoofBayError, SectionError,
};
pub use geometry::{action, Action, Displacement, Restraint};
pub use integrate::simpson;
pub use loads::{DistLoad, LoadMode, PointLoad};
pub use member::{simple_supports, Member, Support};
pub use ponding::{ConvergenceStatus, PondingAnalysis, PondingConfig, PondingResult};
pub use roof_bay::{
    Loading, Mirroring, PrimaryFraming, RoofBay, SecondaryFraming, DEFAULT_ROOF_SLOPE,
    WATER_PRESSURE_PER_DEPTH,
};
pub use roof_bay_model::{ImpoundedDepth, RoofBayModel};
pub use section::{
    SectionProperties, SteelBeamSize, SteelJoistSize, STEEL_ELASTIC_MODULUS, STEEL_UNIT_WEIGHT,
};
