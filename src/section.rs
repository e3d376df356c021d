//! Section property bundles consumed by [`Member`](crate::Member).
//!
//! Catalog lookups live outside this crate; callers hand in property bundles
//! through the [`SectionProperties`] trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SectionError;

/// Default elastic modulus for structural steel in ksi.
pub const STEEL_ELASTIC_MODULUS: f64 = 29_000.0;

/// Unit weight of structural steel in lb/ft³.
pub const STEEL_UNIT_WEIGHT: f64 = 490.0;

/// Properties the beam solver needs from a cross-section.
pub trait SectionProperties {
    /// Display name, e.g. `W12X16` or `14K1`.
    fn name(&self) -> &str;

    /// Elastic modulus in ksi.
    fn elastic_modulus(&self) -> f64;

    /// Moment of inertia in in⁴ for a member spanning `span` inches.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] when no value is defined for `span`.
    fn moment_of_inertia(&self, span: f64) -> Result<f64, SectionError>;

    /// Cross-sectional area in in².
    fn area(&self) -> f64;

    /// Self-weight in lb/ft.
    fn weight(&self) -> f64;
}

/// Rolled steel shape with a span-independent moment of inertia.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteelBeamSize {
    /// Designation of the shape.
    pub name: String,
    /// Elastic modulus in ksi.
    pub elastic_modulus: f64,
    /// Strong-axis moment of inertia in in⁴.
    pub moment_of_inertia: f64,
    /// Cross-sectional area in in².
    pub area: f64,
    /// Self-weight in lb/ft.
    pub weight: f64,
}

impl SteelBeamSize {
    /// Create a steel shape using [`STEEL_ELASTIC_MODULUS`].
    ///
    /// # Examples
    /// ```
    /// use pondx::{SectionProperties, SteelBeamSize};
    ///
    /// let w12x16 = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
    /// assert_eq!(w12x16.to_string(), "W12X16");
    /// assert_eq!(w12x16.moment_of_inertia(240.0), Ok(103.0));
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, moment_of_inertia: f64, area: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            elastic_modulus: STEEL_ELASTIC_MODULUS,
            moment_of_inertia,
            area,
            weight,
        }
    }

    /// Replace the elastic modulus.
    #[must_use]
    pub fn with_elastic_modulus(mut self, elastic_modulus: f64) -> Self {
        self.elastic_modulus = elastic_modulus;
        self
    }
}

impl SectionProperties for SteelBeamSize {
    fn name(&self) -> &str {
        &self.name
    }

    fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    fn moment_of_inertia(&self, _span: f64) -> Result<f64, SectionError> {
        Ok(self.moment_of_inertia)
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for SteelBeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Open-web steel joist whose effective moment of inertia depends on its span.
///
/// The inertia table holds `(span in ft, I in in⁴)` pairs sorted by span and is
/// interpolated linearly. The equivalent area is derived from the joist weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteelJoistSize {
    /// Joist designation.
    pub name: String,
    /// Elastic modulus in ksi.
    pub elastic_modulus: f64,
    /// Self-weight in lb/ft.
    pub weight: f64,
    /// Effective moment of inertia by span.
    pub inertia_by_span: Vec<(f64, f64)>,
}

impl SteelJoistSize {
    /// Create a joist from an explicit `(span in ft, I in in⁴)` table.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, mut inertia_by_span: Vec<(f64, f64)>) -> Self {
        inertia_by_span.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            name: name.into(),
            elastic_modulus: STEEL_ELASTIC_MODULUS,
            weight,
            inertia_by_span,
        }
    }

    /// Create a joist from a live-load table of `(span in ft, W_LL in plf)` pairs.
    ///
    /// `W_LL` is the uniform live load producing a deflection of span/360. The
    /// effective moment of inertia is `26.767 · W_LL · (span − 0.33)³ · 10⁻⁶`.
    ///
    /// # Examples
    /// ```
    /// use pondx::{SectionProperties, SteelJoistSize};
    ///
    /// let joist = SteelJoistSize::from_live_load_table("14K1", 5.2, &[(20.0, 200.0)]);
    /// let inertia = joist.moment_of_inertia(240.0).expect("tabulated span");
    /// assert!((inertia - 26.767 * 200.0 * 19.67_f64.powi(3) * 1.0e-6).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn from_live_load_table(
        name: impl Into<String>,
        weight: f64,
        live_load_by_span: &[(f64, f64)],
    ) -> Self {
        let inertia_by_span = live_load_by_span
            .iter()
            .map(|&(span, live_load)| (span, 26.767 * live_load * (span - 0.33).powi(3) * 1.0e-6))
            .collect();
        Self::new(name, weight, inertia_by_span)
    }

    /// Replace the elastic modulus.
    #[must_use]
    pub fn with_elastic_modulus(mut self, elastic_modulus: f64) -> Self {
        self.elastic_modulus = elastic_modulus;
        self
    }
}

impl SectionProperties for SteelJoistSize {
    fn name(&self) -> &str {
        &self.name
    }

    fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    fn moment_of_inertia(&self, span: f64) -> Result<f64, SectionError> {
        let span_ft = span / 12.0;
        let out_of_range = || SectionError::SpanOutOfRange {
            name: self.name.clone(),
            span: span_ft,
        };
        let table = &self.inertia_by_span;
        let (first, last) = match (table.first(), table.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(out_of_range()),
        };
        let tolerance = 1.0e-9 * span_ft.abs().max(1.0);
        if span_ft < first.0 - tolerance || span_ft > last.0 + tolerance {
            return Err(out_of_range());
        }
        let upper = table
            .partition_point(|&(tabulated, _)| tabulated < span_ft)
            .min(table.len() - 1);
        if upper == 0 {
            return Ok(first.1);
        }
        let (span_a, inertia_a) = table[upper - 1];
        let (span_b, inertia_b) = table[upper];
        if span_b - span_a <= 0.0 {
            return Ok(inertia_b);
        }
        let ratio = ((span_ft - span_a) / (span_b - span_a)).clamp(0.0, 1.0);
        Ok(inertia_a + ratio * (inertia_b - inertia_a))
    }

    fn area(&self) -> f64 {
        self.weight / STEEL_UNIT_WEIGHT * 144.0
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for SteelJoistSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
