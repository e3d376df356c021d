//! Roof bay geometry and the dead loads derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{MemberError, RoofBayError};
use crate::loads::DistLoad;
use crate::member::Member;

/// Pressure of one inch of water in k/in² (62.4 lb/ft³).
pub const WATER_PRESSURE_PER_DEPTH: f64 = 62.4 / 1728.0 / 1000.0;

/// Default slope of the secondary framing in inches of rise per 12 inches of run.
pub const DEFAULT_ROOF_SLOPE: f64 = 0.25;

fn default_include_self_weight() -> bool {
    true
}

/// Surface loads shared by every member of a bay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loading {
    /// Surface dead load in k/in².
    pub dead_load: f64,
    /// Static rain load at the drain inlet in k/in².
    pub rain_load: f64,
    /// Whether member self-weight is added to the dead load.
    #[serde(default = "default_include_self_weight")]
    pub include_self_weight: bool,
}

impl Loading {
    /// Create a [`Loading`].
    ///
    /// # Examples
    /// ```
    /// use pondx::Loading;
    ///
    /// let loading = Loading::new(20.0 / 144_000.0, 22.4 / 144_000.0, true);
    /// assert!(loading.validate().is_ok());
    /// assert!(Loading::new(-1.0, 0.0, true).validate().is_err());
    /// ```
    #[must_use]
    pub const fn new(dead_load: f64, rain_load: f64, include_self_weight: bool) -> Self {
        Self {
            dead_load,
            rain_load,
            include_self_weight,
        }
    }

    /// Check that both intensities are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError::InvalidLoading`] naming the offending field.
    pub fn validate(&self) -> Result<(), RoofBayError> {
        for (field, value) in [("dead load", self.dead_load), ("rain load", self.rain_load)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RoofBayError::InvalidLoading { field, value });
            }
        }
        Ok(())
    }
}

/// Whether the bay continues beyond its first or last secondary member.
///
/// A mirrored edge gives the edge member a full tributary width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mirroring {
    /// The bay is mirrored beyond the first secondary member.
    pub left: bool,
    /// The bay is mirrored beyond the last secondary member.
    pub right: bool,
}

impl Mirroring {
    /// Create a [`Mirroring`].
    #[must_use]
    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }
}

/// Write `label: [a, b, c]` using the section names of `members`.
fn write_members(f: &mut fmt::Formatter<'_>, label: &str, members: &[Member]) -> fmt::Result {
    write!(f, "{label}: [")?;
    for (index, member) in members.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        f.write_str(member.section_name())?;
    }
    f.write_str("]")
}

/// Girders carrying the secondary framing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimaryFraming {
    members: Vec<Member>,
}

impl PrimaryFraming {
    /// Group primary members.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError::NoPrimaryMembers`] when `members` is empty.
    pub fn new(members: Vec<Member>) -> Result<Self, RoofBayError> {
        if members.is_empty() {
            return Err(RoofBayError::NoPrimaryMembers);
        }
        Ok(Self { members })
    }

    /// Primary members in order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

impl fmt::Display for PrimaryFraming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, "Primary framing members", &self.members)
    }
}

/// Evenly spaced beams or joists spanning between the primary members.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SecondaryFraming {
    members: Vec<Member>,
    slope: f64,
}

impl SecondaryFraming {
    /// Group secondary members sloping `slope` inches per 12 inches towards the drain.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError::TooFewSecondaryMembers`] for fewer than two members
    /// and [`RoofBayError::InvalidSlope`] for a negative or non-finite slope.
    pub fn new(members: Vec<Member>, slope: f64) -> Result<Self, RoofBayError> {
        if members.len() < 2 {
            return Err(RoofBayError::TooFewSecondaryMembers(members.len()));
        }
        if !(slope.is_finite() && slope >= 0.0) {
            return Err(RoofBayError::InvalidSlope(slope));
        }
        Ok(Self { members, slope })
    }

    /// Secondary members in order from the left edge of the bay.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Slope in inches per 12 inches.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }
}

impl fmt::Display for SecondaryFraming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, "Secondary framing members", &self.members)
    }
}

/// A rectangular roof bay and the dead loads acting on its members.
///
/// Secondary member `j` sits at `secondary_spacing · j` along every primary
/// member, and support `k` of each secondary member bears on primary member `k`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoofBay {
    primary: PrimaryFraming,
    secondary: SecondaryFraming,
    loading: Loading,
    mirroring: Mirroring,
    secondary_spacing: f64,
    tributary_widths: Vec<f64>,
    secondary_dead_loads: Vec<DistLoad>,
    primary_self_weights: Vec<DistLoad>,
}

impl RoofBay {
    /// Build a bay and derive its member loads.
    ///
    /// # Errors
    ///
    /// Returns [`RoofBayError`] when the loading is invalid or a secondary member
    /// does not have one support per primary member.
    ///
    /// # Examples
    /// ```
    /// use pondx::{
    ///     simple_supports, Loading, Member, Mirroring, PrimaryFraming, RoofBay, SecondaryFraming,
    ///     SteelBeamSize,
    /// };
    ///
    /// let section = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
    /// let member = || Member::new(240.0, &section, simple_supports(240.0)).expect("valid member");
    /// let primary = PrimaryFraming::new(vec![member(), member()]).expect("primary members");
    /// let secondary = SecondaryFraming::new(vec![member(), member()], 0.25).expect("secondary members");
    /// let loading = Loading::new(20.0 / 144_000.0, 25.2 / 144_000.0, false);
    /// let bay = RoofBay::new(primary, secondary, loading, Mirroring::default()).expect("valid bay");
    /// assert_eq!(bay.secondary_spacing(), 240.0);
    /// assert_eq!(bay.tributary_widths(), &[120.0, 120.0]);
    /// ```
    pub fn new(
        primary: PrimaryFraming,
        secondary: SecondaryFraming,
        loading: Loading,
        mirroring: Mirroring,
    ) -> Result<Self, RoofBayError> {
        loading.validate()?;
        let primaries = primary.members().len();
        for (index, member) in secondary.members().iter().enumerate() {
            if member.supports().len() != primaries {
                return Err(RoofBayError::SupportCountMismatch {
                    member: index,
                    supports: member.supports().len(),
                    primaries,
                });
            }
        }

        let count = secondary.members().len();
        let secondary_spacing = primary.members()[0].length() / (count - 1) as f64;

        let mut tributary_widths = vec![secondary_spacing; count];
        if !mirroring.left {
            tributary_widths[0] /= 2.0;
        }
        if !mirroring.right {
            tributary_widths[count - 1] /= 2.0;
        }

        let self_weight = |member: &Member| {
            if loading.include_self_weight {
                member.self_weight()
            } else {
                0.0
            }
        };
        let full_span = |member: &Member, intensity: f64| {
            DistLoad::transverse((0.0, member.length()), -intensity, -intensity)
                .map_err(MemberError::from)
        };

        let secondary_dead_loads = secondary
            .members()
            .iter()
            .zip(&tributary_widths)
            .map(|(member, width)| {
                full_span(member, loading.dead_load * width + self_weight(member))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let primary_self_weights = primary
            .members()
            .iter()
            .map(|member| full_span(member, self_weight(member)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            primary,
            secondary,
            loading,
            mirroring,
            secondary_spacing,
            tributary_widths,
            secondary_dead_loads,
            primary_self_weights,
        })
    }

    /// Primary framing group.
    #[must_use]
    pub fn primary_framing(&self) -> &PrimaryFraming {
        &self.primary
    }

    /// Secondary framing group.
    #[must_use]
    pub fn secondary_framing(&self) -> &SecondaryFraming {
        &self.secondary
    }

    /// Surface loading.
    #[must_use]
    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    /// Edge mirroring.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Distance between adjacent secondary members in inches.
    #[must_use]
    pub fn secondary_spacing(&self) -> f64 {
        self.secondary_spacing
    }

    /// Location of each secondary member along the primary members.
    #[must_use]
    pub fn secondary_positions(&self) -> Vec<f64> {
        (0..self.secondary.members().len())
            .map(|index| self.secondary_spacing * index as f64)
            .collect()
    }

    /// Location of each primary member along the secondary members.
    #[must_use]
    pub fn primary_positions(&self) -> Vec<f64> {
        self.secondary.members()[0]
            .supports()
            .iter()
            .map(|support| support.location)
            .collect()
    }

    /// Tributary width of each secondary member in inches.
    #[must_use]
    pub fn tributary_widths(&self) -> &[f64] {
        &self.tributary_widths
    }

    /// Full-span dead load on each secondary member.
    #[must_use]
    pub fn secondary_dead_loads(&self) -> &[DistLoad] {
        &self.secondary_dead_loads
    }

    /// Full-span self-weight on each primary member; zero when self-weight is excluded.
    #[must_use]
    pub fn primary_self_weights(&self) -> &[DistLoad] {
        &self.primary_self_weights
    }

    /// Static water depth at the drain inlet in inches.
    #[must_use]
    pub fn design_depth(&self) -> f64 {
        self.loading.rain_load / WATER_PRESSURE_PER_DEPTH
    }

    /// Roof slope as a unitless ratio.
    #[must_use]
    pub fn slope_ratio(&self) -> f64 {
        self.secondary.slope() / 12.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::member::simple_supports;
    use crate::section::SteelBeamSize;

    fn w12x16() -> SteelBeamSize {
        SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0)
    }

    fn members(count: usize) -> Vec<Member> {
        (0..count)
            .map(|_| Member::new(240.0, &w12x16(), simple_supports(240.0)).expect("valid member"))
            .collect()
    }

    fn bay(secondaries: usize, loading: Loading, mirroring: Mirroring) -> RoofBay {
        let primary = PrimaryFraming::new(members(2)).expect("primary members");
        let secondary = SecondaryFraming::new(members(secondaries), DEFAULT_ROOF_SLOPE)
            .expect("secondary members");
        RoofBay::new(primary, secondary, loading, mirroring).expect("valid bay")
    }

    fn loading(include_self_weight: bool) -> Loading {
        Loading::new(20.0 / 144_000.0, 25.2 / 144_000.0, include_self_weight)
    }

    #[test]
    fn unmirrored_edges_halve_tributary_width() {
        let bay = bay(2, loading(false), Mirroring::default());
        assert_relative_eq!(bay.secondary_spacing(), 240.0);
        assert_eq!(bay.tributary_widths(), &[120.0, 120.0]);
    }

    #[test]
    fn mirrored_edges_keep_full_width() {
        let both = bay(2, loading(false), Mirroring::new(true, true));
        assert_eq!(both.tributary_widths(), &[240.0, 240.0]);
        let one_side = bay(3, loading(false), Mirroring::new(true, false));
        assert_eq!(one_side.tributary_widths(), &[120.0, 120.0, 60.0]);
    }

    #[test]
    fn dead_loads_follow_tributary_width_and_self_weight() {
        let bay = bay(5, loading(true), Mirroring::default());
        let spacing = bay.secondary_spacing();
        assert_relative_eq!(spacing, 60.0);
        let edge = bay.secondary_dead_loads()[0].magnitude()[1].0;
        let interior = bay.secondary_dead_loads()[2].magnitude()[1].1;
        let self_weight = 16.0 / 12_000.0;
        assert_relative_eq!(edge, -(20.0 / 144_000.0 * 30.0 + self_weight));
        assert_relative_eq!(interior, -(20.0 / 144_000.0 * 60.0 + self_weight));
        assert_relative_eq!(bay.primary_self_weights()[1].magnitude()[1].0, -self_weight);
    }

    #[test]
    fn excluded_self_weight_gives_zero_primary_load() {
        let bay = bay(2, loading(false), Mirroring::default());
        assert_eq!(bay.primary_self_weights()[0].magnitude()[1], (0.0, 0.0));
        assert_eq!(bay.primary_self_weights()[0].end(), 240.0);
    }

    #[test]
    fn design_depth_and_slope() {
        let bay = bay(2, loading(false), Mirroring::default());
        assert_relative_eq!(bay.design_depth(), 25.2 / 144_000.0 / WATER_PRESSURE_PER_DEPTH);
        assert_relative_eq!(bay.slope_ratio(), 0.25 / 12.0);
        assert_eq!(bay.secondary_positions(), vec![0.0, 240.0]);
        assert_eq!(bay.primary_positions(), vec![0.0, 240.0]);
    }

    #[test]
    fn framing_validation() {
        assert_eq!(PrimaryFraming::new(Vec::new()), Err(RoofBayError::NoPrimaryMembers));
        assert_eq!(
            SecondaryFraming::new(members(1), 0.25),
            Err(RoofBayError::TooFewSecondaryMembers(1))
        );
        assert_eq!(
            SecondaryFraming::new(members(2), -0.25),
            Err(RoofBayError::InvalidSlope(-0.25))
        );
    }

    #[test]
    fn support_count_must_match_primaries() {
        let primary = PrimaryFraming::new(members(3)).expect("primary members");
        let secondary = SecondaryFraming::new(members(2), 0.25).expect("secondary members");
        let error = RoofBay::new(primary, secondary, loading(false), Mirroring::default())
            .expect_err("two supports, three primaries");
        assert_eq!(
            error,
            RoofBayError::SupportCountMismatch {
                member: 0,
                supports: 2,
                primaries: 3
            }
        );
    }

    #[test]
    fn framing_display_lists_sections() {
        let primary = PrimaryFraming::new(members(2)).expect("primary members");
        assert_eq!(primary.to_string(), "Primary framing members: [W12X16, W12X16]");
    }
}
