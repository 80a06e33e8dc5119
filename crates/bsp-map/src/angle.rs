//! Heading angles in degrees.

use std::cmp::Ordering;
use std::ops;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing angles for equality.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// An angle in degrees, always normalized to `[0, 360)`.
///
/// Map-space convention: 0° points along +x, 90° along +y.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle(f64);

impl Angle {
    /// Creates a normalized angle from any value in degrees.
    pub fn new(degrees: f64) -> Self {
        let mut angle = Angle(degrees);
        angle.normalize();
        angle
    }

    /// Creates an angle from radians.
    pub fn from_radians(radians: f64) -> Self {
        Self::new(radians.to_degrees())
    }

    fn normalize(&mut self) {
        self.0 = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if self.0 >= 360.0 {
            self.0 = 0.0;
        }
    }

    /// Returns the angle in `[0, 360)`.
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Returns the angle in `(-180, 180]`.
    #[inline]
    pub fn signed(&self) -> f64 {
        if self.0 > 180.0 { self.0 - 360.0 } else { self.0 }
    }

    #[inline]
    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }

    /// Unit direction vector `(cos, sin)` of this heading.
    #[inline]
    pub fn direction(&self) -> (f64, f64) {
        let (sin, cos) = self.radians().sin_cos();
        (cos, sin)
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Angle::new(degrees)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

impl ops::Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl ops::Add<f64> for Angle {
    type Output = Self;

    fn add(self, rhs: f64) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}

impl ops::AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::AddAssign<f64> for Angle {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl ops::Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0 - rhs.0)
    }
}

impl ops::Sub<f64> for Angle {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self::Output {
        Self::new(self.0 - rhs)
    }
}

impl ops::SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl ops::SubAssign<f64> for Angle {
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}

impl ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.0)
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        let diff = (self.0 - other.0).abs();
        diff < ANGLE_EPSILON || (360.0 - diff) < ANGLE_EPSILON
    }
}

impl PartialEq<f64> for Angle {
    fn eq(&self, other: &f64) -> bool {
        *self == Angle::new(*other)
    }
}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else {
            self.0.partial_cmp(&other.0)
        }
    }
}
