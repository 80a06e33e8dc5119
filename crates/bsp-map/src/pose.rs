//! The viewpoint fed to the traversal each frame.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::Angle;

/// Player position and heading in map space.
///
/// Owned and moved by the simulation; the traversal only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub angle: Angle,
}

impl Pose {
    pub fn new(x: f64, y: f64, angle: Angle) -> Self {
        Self { x, y, angle }
    }

    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Heading from this pose towards `target`.
    pub fn angle_to(&self, target: Point2<f64>) -> Angle {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        Angle::from_radians(dy.atan2(dx))
    }
}
