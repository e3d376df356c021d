//! Three degree-of-freedom value types shared by loads, supports and results.
//!
//! Every node of a beam model carries an axial translation, a transverse
//! translation and an in-plane rotation, in that order.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::errors::MemberError;

/// Force and moment components acting at a node, in kips and kip-inches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Force along the member axis.
    pub axial: f64,
    /// Force perpendicular to the member axis, positive upwards.
    pub transverse: f64,
    /// In-plane moment, positive counter-clockwise.
    pub moment: f64,
}

impl Action {
    /// Create an [`Action`] with explicit components.
    #[must_use]
    pub const fn new(axial: f64, transverse: f64, moment: f64) -> Self {
        Self {
            axial,
            transverse,
            moment,
        }
    }

    /// Return the components in degree-of-freedom order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.axial, self.transverse, self.moment]
    }

    /// Convert the action into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.axial, self.transverse, self.moment)
    }
}

impl From<[f64; 3]> for Action {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Vector3<f64>> for Action {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Action> for Vector3<f64> {
    fn from(value: Action) -> Self {
        value.to_vector()
    }
}

/// Nodal displacement in inches and radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Translation along the member axis.
    pub axial: f64,
    /// Translation perpendicular to the member axis, positive upwards.
    pub transverse: f64,
    /// In-plane rotation, positive counter-clockwise.
    pub rotation: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(axial: f64, transverse: f64, rotation: f64) -> Self {
        Self {
            axial,
            transverse,
            rotation,
        }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.axial, self.transverse, self.rotation)
    }
}

impl From<[f64; 3]> for Displacement {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Vector3<f64>> for Displacement {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Displacement> for Vector3<f64> {
    fn from(value: Displacement) -> Self {
        value.to_vector()
    }
}

/// Fixity of the three nodal degrees of freedom. `true` means restrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Restraint {
    /// Axial translation is restrained.
    pub axial: bool,
    /// Transverse translation is restrained.
    pub transverse: bool,
    /// Rotation is restrained.
    pub rotation: bool,
}

impl Restraint {
    /// No restraint at all.
    pub const FREE: Self = Self::new(false, false, false);
    /// Pin: both translations restrained, rotation free.
    pub const PINNED: Self = Self::new(true, true, false);
    /// Roller: transverse translation restrained only.
    pub const ROLLER: Self = Self::new(false, true, false);
    /// Full fixity.
    pub const FIXED: Self = Self::new(true, true, true);

    /// Create a [`Restraint`] with explicit flags.
    #[must_use]
    pub const fn new(axial: bool, transverse: bool, rotation: bool) -> Self {
        Self {
            axial,
            transverse,
            rotation,
        }
    }

    /// Build a restraint from `0`/`1` flags in degree-of-freedom order.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::InvalidRestraintFlag`] when a flag is neither 0 nor 1.
    ///
    /// # Examples
    /// ```
    /// use pondx::Restraint;
    ///
    /// let pin = Restraint::from_flags([1, 1, 0]).expect("valid flags");
    /// assert_eq!(pin, Restraint::PINNED);
    /// assert!(Restraint::from_flags([2, 1, 0]).is_err());
    /// ```
    pub fn from_flags(flags: [u8; 3]) -> Result<Self, MemberError> {
        let mut fixed = [false; 3];
        for (slot, flag) in fixed.iter_mut().zip(flags) {
            *slot = match flag {
                0 => false,
                1 => true,
                other => return Err(MemberError::InvalidRestraintFlag(other)),
            };
        }
        Ok(Self::new(fixed[0], fixed[1], fixed[2]))
    }

    /// Return the flags in degree-of-freedom order.
    #[must_use]
    pub const fn to_array(self) -> [bool; 3] {
        [self.axial, self.transverse, self.rotation]
    }

    /// Combine two restraints so that a degree of freedom fixed by either stays fixed.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self::new(
            self.axial || other.axial,
            self.transverse || other.transverse,
            self.rotation || other.rotation,
        )
    }
}

/// Convenience helper for creating [`Action`] instances.
///
/// # Examples
/// ```
/// use pondx::action;
///
/// let load = action(0.0, -5.0, 0.0);
/// assert_eq!(load.transverse, -5.0);
/// ```
#[must_use]
pub const fn action(axial: f64, transverse: f64, moment: f64) -> Action {
    Action::new(axial, transverse, moment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_to_vector_roundtrip() {
        let load = Action::new(1.0, -2.0, 3.0);
        let vector: Vector3<f64> = load.into();
        assert_eq!(vector, Vector3::new(1.0, -2.0, 3.0));
        assert_eq!(Action::from(vector), load);
    }

    #[test]
    fn displacement_from_nodal_components() {
        let displacement = Displacement::from([0.5, -1.25, 0.01]);
        assert_eq!(displacement, Displacement::new(0.5, -1.25, 0.01));
        assert_eq!(displacement.to_vector(), Vector3::new(0.5, -1.25, 0.01));
    }

    #[test]
    fn displacement_defaults_to_zero() {
        assert_eq!(Displacement::default(), Displacement::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn restraint_flags_map_to_named_supports() {
        assert_eq!(Restraint::from_flags([1, 1, 1]), Ok(Restraint::FIXED));
        assert_eq!(Restraint::from_flags([0, 1, 0]), Ok(Restraint::ROLLER));
        assert_eq!(Restraint::from_flags([0, 0, 0]), Ok(Restraint::FREE));
        assert_eq!(
            Restraint::from_flags([1, 0, 7]),
            Err(MemberError::InvalidRestraintFlag(7))
        );
    }

    #[test]
    fn restraint_union_keeps_fixity() {
        let combined = Restraint::ROLLER.union(Restraint::new(true, false, false));
        assert_eq!(combined, Restraint::PINNED);
    }
}
