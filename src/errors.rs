//! Error types produced while building or analysing beam and roof bay models.

use thiserror::Error;

/// Error returned when a load primitive is constructed from invalid values.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LoadError {
    /// Returned when a load location is NaN or infinite.
    #[error("load location must be finite (received {0})")]
    NonFiniteLocation(f64),
    /// Returned when a distributed load interval ends before it starts.
    #[error("distributed load interval is reversed ({start} > {end})")]
    ReversedInterval {
        /// Start of the rejected interval in inches.
        start: f64,
        /// End of the rejected interval in inches.
        end: f64,
    },
    /// Returned when a load intensity is NaN or infinite.
    #[error("load magnitude must be finite (received {0})")]
    NonFiniteMagnitude(f64),
}

/// Error returned when a section property bundle is not physically meaningful.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SectionError {
    /// Returned when a stiffness or weight property is zero, negative or not finite.
    #[error("section {name} has an invalid {property} (received {value})")]
    NonPositiveProperty {
        /// Display name of the section.
        name: String,
        /// Name of the rejected property.
        property: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a span-dependent moment of inertia is requested outside its table.
    #[error("section {name} has no moment of inertia tabulated for a {span} ft span")]
    SpanOutOfRange {
        /// Display name of the section.
        name: String,
        /// Requested span in feet.
        span: f64,
    },
}

/// Error returned when constructing or editing a [`Member`](crate::Member).
///
/// # Examples
///
/// ```
/// use pondx::{Member, MemberError, SteelBeamSize};
///
/// let section = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
/// let error = Member::new(-1.0, &section, Vec::new()).expect_err("negative length rejected");
/// assert_eq!(error, MemberError::NonPositiveLength(-1.0));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MemberError {
    /// Returned when the member length is zero, negative or not finite.
    #[error("member length must be positive (received {0})")]
    NonPositiveLength(f64),
    /// Returned when a support lies outside the member.
    #[error("support at {location} lies outside the member span [0, {length}]")]
    SupportOutOfRange {
        /// Rejected support location in inches.
        location: f64,
        /// Member length in inches.
        length: f64,
    },
    /// Returned when a load lies outside the member.
    #[error("load at {location} lies outside the member span [0, {length}]")]
    LoadOutOfRange {
        /// Rejected load location in inches.
        location: f64,
        /// Member length in inches.
        length: f64,
    },
    /// Returned when a restraint flag is neither 0 nor 1.
    #[error("restraint flags must be 0 or 1 (received {0})")]
    InvalidRestraintFlag(u8),
    /// Returned when the section properties are invalid.
    #[error(transparent)]
    Section(#[from] SectionError),
    /// Returned when a load primitive is invalid.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Error returned when a [`BeamModel`](crate::BeamModel) cannot be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ModelError {
    /// Returned when the maximum node spacing is zero, negative or not finite.
    #[error("maximum node spacing must be positive (received {0})")]
    InvalidNodeSpacing(f64),
}

/// Error returned when a beam analysis is requested in the wrong state or cannot be solved.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// Returned when solving a model that has not been discretised and assembled.
    #[error("analysis has not been initialized")]
    NotInitialized,
    /// Returned when reading results from a model that has not been solved.
    #[error("analysis results are not available until the model is solved")]
    NotSolved,
    /// Returned when the stiffness matrix cannot be inverted.
    #[error("stiffness matrix is singular; check supports")]
    SingularStiffness,
}

/// Error returned when building or analysing a roof bay.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RoofBayError {
    /// Returned when the primary framing is empty.
    #[error("a roof bay needs at least one primary member")]
    NoPrimaryMembers,
    /// Returned when fewer than two secondary members are supplied.
    #[error("a roof bay needs at least two secondary members (received {0})")]
    TooFewSecondaryMembers(usize),
    /// Returned when a secondary member cannot bear on every primary member.
    #[error(
        "secondary member {member} has {supports} supports but the bay has {primaries} primary members"
    )]
    SupportCountMismatch {
        /// Index of the offending secondary member.
        member: usize,
        /// Number of supports on that member.
        supports: usize,
        /// Number of primary members in the bay.
        primaries: usize,
    },
    /// Returned when a surface load intensity is negative or not finite.
    #[error("{field} must be finite and non-negative (received {value})")]
    InvalidLoading {
        /// Name of the rejected loading field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the secondary framing slope is negative or not finite.
    #[error("roof slope must be finite and non-negative (received {0})")]
    InvalidSlope(f64),
    /// Returned when the rain load sets do not match the secondary members.
    #[error("expected {expected} rain load sets, one per secondary member (received {received})")]
    RainLoadMismatch {
        /// Number of secondary members.
        expected: usize,
        /// Number of load sets supplied.
        received: usize,
    },
    /// Returned when a depth field does not match the nodes of a secondary member.
    #[error("depth field for secondary member {member} has {received} values but the member has {expected} nodes")]
    DepthFieldMismatch {
        /// Index of the secondary member.
        member: usize,
        /// Number of nodes in the member's model.
        expected: usize,
        /// Number of depth values supplied.
        received: usize,
    },
    /// Returned when a member rejects a derived load.
    #[error(transparent)]
    Member(#[from] MemberError),
    /// Returned when a beam model cannot be built.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Returned when a beam analysis fails.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Error returned by the ponding analysis driver.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PondingError {
    /// Returned when the stop criterion is zero, negative or not finite.
    #[error("stop criterion must be positive (received {0})")]
    InvalidStopCriterion(f64),
    /// Returned when the iteration budget is zero.
    #[error("at least one ponding iteration is required")]
    NoIterations,
    /// Returned when the roof bay cannot be built or analysed.
    #[error(transparent)]
    RoofBay(#[from] RoofBayError),
}
