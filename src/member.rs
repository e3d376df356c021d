//! Structural members: span, supports, loads and derived stiffness inputs.

use serde::Serialize;

use crate::errors::{MemberError, SectionError};
use crate::geometry::Restraint;
use crate::loads::{DistLoad, LoadMode, PointLoad};
use crate::section::SectionProperties;

/// A support at a location along a member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Support {
    /// Distance from the start of the member in inches.
    pub location: f64,
    /// Restrained degrees of freedom.
    pub restraint: Restraint,
}

impl Support {
    /// Create a [`Support`].
    #[must_use]
    pub const fn new(location: f64, restraint: Restraint) -> Self {
        Self {
            location,
            restraint,
        }
    }
}

/// Convenience helper returning pinned supports at both ends of a span.
///
/// # Examples
/// ```
/// use pondx::{simple_supports, Restraint};
///
/// let supports = simple_supports(240.0);
/// assert_eq!(supports[1].location, 240.0);
/// assert_eq!(supports[0].restraint, Restraint::PINNED);
/// ```
#[must_use]
pub fn simple_supports(length: f64) -> Vec<Support> {
    vec![
        Support::new(0.0, Restraint::PINNED),
        Support::new(length, Restraint::PINNED),
    ]
}

/// Check that a section property is a positive, finite number.
fn positive(name: &str, property: &'static str, value: f64) -> Result<f64, SectionError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SectionError::NonPositiveProperty {
            name: name.to_owned(),
            property,
            value,
        })
    }
}

/// A straight member with its supports and applied loads.
///
/// Geometry and section properties are fixed at construction; the load lists may
/// be replaced or extended between analyses.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Member {
    /// Span in inches.
    length: f64,
    /// Name of the section the stiffness was derived from.
    section_name: String,
    /// Elastic modulus in ksi.
    elastic_modulus: f64,
    /// Cross-sectional area in in².
    area: f64,
    /// Moment of inertia in in⁴.
    moment_of_inertia: f64,
    /// Self-weight in k/in.
    self_weight: f64,
    /// Supports sorted by location.
    supports: Vec<Support>,
    /// Concentrated loads.
    point_loads: Vec<PointLoad>,
    /// Distributed loads.
    dist_loads: Vec<DistLoad>,
}

impl Member {
    /// Create an unloaded member spanning `length` inches.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError`] when the length is not positive, a support lies
    /// outside `[0, length]`, or the section properties are invalid.
    ///
    /// # Examples
    /// ```
    /// use pondx::{simple_supports, Member, SteelBeamSize};
    ///
    /// let section = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
    /// let member = Member::new(240.0, &section, simple_supports(240.0)).expect("valid member");
    /// assert_eq!(member.moment_of_inertia(), 103.0);
    /// assert!((member.self_weight() - 16.0 / 12_000.0).abs() < 1.0e-15);
    /// ```
    pub fn new<S>(length: f64, section: &S, mut supports: Vec<Support>) -> Result<Self, MemberError>
    where
        S: SectionProperties + ?Sized,
    {
        if !(length.is_finite() && length > 0.0) {
            return Err(MemberError::NonPositiveLength(length));
        }
        for support in &supports {
            check_in_span(support.location, length).map_err(|_| {
                MemberError::SupportOutOfRange {
                    location: support.location,
                    length,
                }
            })?;
        }
        supports.sort_by(|a, b| a.location.total_cmp(&b.location));

        let name = section.name();
        let elastic_modulus = positive(name, "elastic modulus", section.elastic_modulus())?;
        let area = positive(name, "area", section.area())?;
        let moment_of_inertia = positive(
            name,
            "moment of inertia",
            section.moment_of_inertia(length)?,
        )?;
        let weight = section.weight();
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(SectionError::NonPositiveProperty {
                name: name.to_owned(),
                property: "weight",
                value: weight,
            }
            .into());
        }

        Ok(Self {
            length,
            section_name: name.to_owned(),
            elastic_modulus,
            area,
            moment_of_inertia,
            self_weight: weight / 1000.0 / 12.0,
            supports,
            point_loads: Vec::new(),
            dist_loads: Vec::new(),
        })
    }

    /// Add point loads while building a member.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::LoadOutOfRange`] when a load lies outside the member.
    pub fn with_point_loads(mut self, loads: Vec<PointLoad>) -> Result<Self, MemberError> {
        self.set_point_loads(loads, LoadMode::Append)?;
        Ok(self)
    }

    /// Add distributed loads while building a member.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::LoadOutOfRange`] when a load lies outside the member.
    pub fn with_dist_loads(mut self, loads: Vec<DistLoad>) -> Result<Self, MemberError> {
        self.set_dist_loads(loads, LoadMode::Append)?;
        Ok(self)
    }

    /// Replace or extend the point loads. The member is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::LoadOutOfRange`] when a load lies outside the member.
    pub fn set_point_loads(
        &mut self,
        loads: Vec<PointLoad>,
        mode: LoadMode,
    ) -> Result<(), MemberError> {
        for load in &loads {
            check_in_span(load.location(), self.length)?;
        }
        match mode {
            LoadMode::Replace => self.point_loads = loads,
            LoadMode::Append => self.point_loads.extend(loads),
        }
        Ok(())
    }

    /// Replace or extend the distributed loads. The member is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::LoadOutOfRange`] when a load lies outside the member.
    pub fn set_dist_loads(
        &mut self,
        loads: Vec<DistLoad>,
        mode: LoadMode,
    ) -> Result<(), MemberError> {
        for load in &loads {
            check_in_span(load.start(), self.length)?;
            check_in_span(load.end(), self.length)?;
        }
        match mode {
            LoadMode::Replace => self.dist_loads = loads,
            LoadMode::Append => self.dist_loads.extend(loads),
        }
        Ok(())
    }

    /// Span in inches.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Name of the section.
    #[must_use]
    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Elastic modulus in ksi.
    #[must_use]
    pub fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    /// Cross-sectional area in in².
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Moment of inertia in in⁴.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    /// Self-weight in k/in.
    #[must_use]
    pub fn self_weight(&self) -> f64 {
        self.self_weight
    }

    /// Supports sorted by location.
    #[must_use]
    pub fn supports(&self) -> &[Support] {
        &self.supports
    }

    /// Applied point loads.
    #[must_use]
    pub fn point_loads(&self) -> &[PointLoad] {
        &self.point_loads
    }

    /// Applied distributed loads.
    #[must_use]
    pub fn dist_loads(&self) -> &[DistLoad] {
        &self.dist_loads
    }
}

/// Check that `location` lies on a member of the given length.
fn check_in_span(location: f64, length: f64) -> Result<(), MemberError> {
    let tolerance = 1.0e-9 * length;
    if location >= -tolerance && location <= length + tolerance {
        Ok(())
    } else {
        Err(MemberError::LoadOutOfRange { location, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{SteelBeamSize, SteelJoistSize};

    fn w12x16() -> SteelBeamSize {
        SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0)
    }

    #[test]
    fn supports_outside_span_are_rejected() {
        let supports = vec![Support::new(0.0, Restraint::PINNED), Support::new(250.0, Restraint::PINNED)];
        let error = Member::new(240.0, &w12x16(), supports).expect_err("support beyond end");
        assert_eq!(
            error,
            MemberError::SupportOutOfRange {
                location: 250.0,
                length: 240.0
            }
        );
    }

    #[test]
    fn supports_are_sorted_by_location() {
        let supports = vec![Support::new(240.0, Restraint::ROLLER), Support::new(0.0, Restraint::PINNED)];
        let member = Member::new(240.0, &w12x16(), supports).expect("valid member");
        assert_eq!(member.supports()[0].location, 0.0);
        assert_eq!(member.supports()[1].restraint, Restraint::ROLLER);
    }

    #[test]
    fn invalid_section_properties_are_rejected() {
        let section = SteelBeamSize::new("BAD", 0.0, 4.71, 16.0);
        let error = Member::new(240.0, &section, simple_supports(240.0)).expect_err("zero inertia");
        assert!(matches!(
            error,
            MemberError::Section(SectionError::NonPositiveProperty {
                property: "moment of inertia",
                ..
            })
        ));
    }

    #[test]
    fn joist_properties_depend_on_span() {
        let joist = SteelJoistSize::new("14K1", 4.9, vec![(16.0, 40.0), (24.0, 80.0)]);
        let member = Member::new(240.0, &joist, simple_supports(240.0)).expect("valid member");
        assert!((member.moment_of_inertia() - 60.0).abs() < 1.0e-12);
        assert!((member.area() - 4.9 / 490.0 * 144.0).abs() < 1.0e-12);
    }

    #[test]
    fn load_modes_replace_or_append() {
        let mut member = Member::new(240.0, &w12x16(), simple_supports(240.0)).expect("valid member");
        let load = PointLoad::new(120.0, [0.0, -5.0, 0.0]).expect("valid load");
        member.set_point_loads(vec![load], LoadMode::Append).expect("in span");
        member.set_point_loads(vec![load], LoadMode::Append).expect("in span");
        assert_eq!(member.point_loads().len(), 2);
        member.set_point_loads(vec![load], LoadMode::Replace).expect("in span");
        assert_eq!(member.point_loads().len(), 1);

        let outside = DistLoad::transverse((200.0, 260.0), -1.0, -1.0).expect("valid load");
        let error = member
            .set_dist_loads(vec![outside], LoadMode::Append)
            .expect_err("load beyond end");
        assert_eq!(
            error,
            MemberError::LoadOutOfRange {
                location: 260.0,
                length: 240.0
            }
        );
        assert!(member.dist_loads().is_empty());
    }
}
