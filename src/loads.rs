//! Concentrated and linearly varying loads applied along a member.

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;
use crate::geometry::Action;

/// Reject NaN and infinite locations.
fn finite_location(value: f64) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::NonFiniteLocation(value))
    }
}

/// Reject NaN and infinite intensities.
fn finite_magnitude(value: f64) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::NonFiniteMagnitude(value))
    }
}

/// A concentrated load at a single location along a member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointLoad {
    /// Distance from the start of the member in inches.
    location: f64,
    /// Force and moment components in kips and kip-inches.
    magnitude: Action,
}

impl PointLoad {
    /// Create a point load from a location and one magnitude per degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the location or any component is not finite.
    ///
    /// # Examples
    /// ```
    /// use pondx::PointLoad;
    ///
    /// let load = PointLoad::new(120.0, [0.0, -5.0, 0.0]).expect("valid load");
    /// assert_eq!(load.magnitude().transverse, -5.0);
    /// assert!(PointLoad::new(f64::NAN, [0.0, -5.0, 0.0]).is_err());
    /// ```
    pub fn new(location: f64, magnitude: [f64; 3]) -> Result<Self, LoadError> {
        let location = finite_location(location)?;
        for component in magnitude {
            finite_magnitude(component)?;
        }
        Ok(Self {
            location,
            magnitude: Action::from(magnitude),
        })
    }

    /// Location of the load in inches.
    #[must_use]
    pub const fn location(&self) -> f64 {
        self.location
    }

    /// Magnitude of the load.
    #[must_use]
    pub const fn magnitude(&self) -> Action {
        self.magnitude
    }
}

/// A load whose intensity varies linearly over an interval.
///
/// Each degree of freedom carries its own `(start, end)` intensity pair in kips
/// per inch (or kip-inches per inch for the rotational component).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DistLoad {
    /// Start of the loaded interval in inches.
    start: f64,
    /// End of the loaded interval in inches.
    end: f64,
    /// Start and end intensity for each degree of freedom.
    magnitude: [(f64, f64); 3],
}

impl DistLoad {
    /// Create a distributed load over `location = (start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when a value is not finite or the interval is reversed.
    ///
    /// # Examples
    /// ```
    /// use pondx::DistLoad;
    ///
    /// let load = DistLoad::new((0.0, 10.0), [(0.0, 0.0), (-2.0, -2.0), (0.0, 0.0)])
    ///     .expect("valid load");
    /// assert_eq!(load.resultant().transverse, -20.0);
    /// assert!(DistLoad::new((10.0, 0.0), [(0.0, 0.0); 3]).is_err());
    /// ```
    pub fn new(location: (f64, f64), magnitude: [(f64, f64); 3]) -> Result<Self, LoadError> {
        let start = finite_location(location.0)?;
        let end = finite_location(location.1)?;
        if start > end {
            return Err(LoadError::ReversedInterval { start, end });
        }
        for (at_start, at_end) in magnitude {
            finite_magnitude(at_start)?;
            finite_magnitude(at_end)?;
        }
        Ok(Self {
            start,
            end,
            magnitude,
        })
    }

    /// Create a load acting only in the transverse direction.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] under the same conditions as [`DistLoad::new`].
    pub fn transverse(
        location: (f64, f64),
        at_start: f64,
        at_end: f64,
    ) -> Result<Self, LoadError> {
        Self::new(location, [(0.0, 0.0), (at_start, at_end), (0.0, 0.0)])
    }

    /// Start of the loaded interval in inches.
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// End of the loaded interval in inches.
    #[must_use]
    pub const fn end(&self) -> f64 {
        self.end
    }

    /// Intensity pairs in degree-of-freedom order.
    #[must_use]
    pub const fn magnitude(&self) -> [(f64, f64); 3] {
        self.magnitude
    }

    /// Length of the loaded interval.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Intensity of each component at `x`, interpolated along the load's own ramp.
    #[must_use]
    pub fn intensity_at(&self, x: f64) -> [f64; 3] {
        let length = self.length();
        let ratio = if length > 0.0 {
            (x - self.start) / length
        } else {
            0.0
        };
        self.magnitude
            .map(|(at_start, at_end)| at_start + (at_end - at_start) * ratio)
    }

    /// Whether the load fully covers the interval `[x_i, x_j]` within `tolerance`.
    #[must_use]
    pub fn covers(&self, x_i: f64, x_j: f64, tolerance: f64) -> bool {
        self.start <= x_i + tolerance && self.end >= x_j - tolerance
    }

    /// Total force (and distributed moment) represented by the load.
    #[must_use]
    pub fn resultant(&self) -> Action {
        let length = self.length();
        Action::from(
            self.magnitude
                .map(|(at_start, at_end)| 0.5 * (at_start + at_end) * length),
        )
    }
}

/// How a new set of loads combines with the loads already on a member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadMode {
    /// Discard existing loads of the same kind first.
    Replace,
    /// Keep existing loads and add the new ones.
    #[default]
    Append,
}
