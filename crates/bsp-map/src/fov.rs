//! View cone of the player.

use nalgebra::{Point2, Vector2};

use crate::{Angle, Line, Pose};

/// A horizontal view cone centered on the pose heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub width_degrees: f64,
    /// Length of the rays drawn for the cone edges.
    pub ray_length: f64,
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            width_degrees: 90.0,
            ray_length: 1024.0,
        }
    }
}

impl FieldOfView {
    pub fn new(width_degrees: f64, ray_length: f64) -> Self {
        Self {
            width_degrees,
            ray_length,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width_degrees / 2.0
    }

    /// The two edge rays of the cone, left edge first.
    pub fn rays(&self, pose: &Pose) -> [Line; 2] {
        let origin = pose.position();
        let ray = |angle: Angle| {
            let (x, y) = angle.direction();
            Line::new(origin, origin + Vector2::new(x, y) * self.ray_length)
        };
        [
            ray(pose.angle + self.half_width()),
            ray(pose.angle - self.half_width()),
        ]
    }

    /// Whether the wall from `v1` to `v2` is at least partly inside the cone.
    ///
    /// True when either endpoint is inside, or when the endpoints lie on
    /// opposite sides of the heading and the wall crosses in front of the
    /// viewer rather than behind.
    pub fn contains(&self, pose: &Pose, v1: Point2<f64>, v2: Point2<f64>) -> bool {
        let half = self.half_width();
        let a1 = (pose.angle_to(v1) - pose.angle).signed();
        let a2 = (pose.angle_to(v2) - pose.angle).signed();

        if a1.abs() <= half || a2.abs() <= half {
            return true;
        }
        a1.signum() != a2.signum() && (a1 - a2).abs() < 180.0
    }

    pub fn contains_line(&self, pose: &Pose, line: &Line) -> bool {
        self.contains(pose, line.start, line.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn pose_facing(degrees: f64) -> Pose {
        Pose::new(0.0, 0.0, Angle::new(degrees))
    }

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn rays_span_the_cone() {
        let fov = FieldOfView::new(90.0, 10.0);
        let [left, right] = fov.rays(&pose_facing(90.0));

        assert_eq!(left.start, p(0.0, 0.0));
        assert_approx_eq!(left.end.x, -10.0 / 2f64.sqrt());
        assert_approx_eq!(left.end.y, 10.0 / 2f64.sqrt());
        assert_approx_eq!(right.end.x, 10.0 / 2f64.sqrt());
        assert_approx_eq!(right.end.y, 10.0 / 2f64.sqrt());
        assert_approx_eq!(left.length(), 10.0);
    }

    #[test]
    fn wall_ahead_is_visible() {
        let fov = FieldOfView::default();
        assert!(fov.contains(&pose_facing(0.0), p(10.0, -1.0), p(10.0, 1.0)));
    }

    #[test]
    fn wall_behind_is_hidden() {
        let fov = FieldOfView::default();
        assert!(!fov.contains(&pose_facing(0.0), p(-10.0, -1.0), p(-10.0, 1.0)));
        // spans from behind-left to behind-right
        assert!(!fov.contains(&pose_facing(0.0), p(-10.0, 20.0), p(-10.0, -20.0)));
    }

    #[test]
    fn wide_wall_crossing_the_view_is_visible() {
        let fov = FieldOfView::new(60.0, 100.0);
        // both endpoints outside the 60 degree cone, wall right in front
        assert!(fov.contains(&pose_facing(0.0), p(1.0, -100.0), p(1.0, 100.0)));
    }

    #[test]
    fn visibility_wraps_around_zero() {
        let fov = FieldOfView::default();
        let pose = pose_facing(350.0);
        assert!(fov.contains(&pose, p(10.0, 0.0), p(10.0, 1.0)));
        assert!(fov.contains_line(&pose, &Line::new(p(10.0, -3.0), p(10.0, -2.0))));
    }

    #[test]
    fn wall_to_the_side_is_hidden() {
        let fov = FieldOfView::default();
        assert!(!fov.contains(&pose_facing(0.0), p(0.0, 10.0), p(1.0, 20.0)));
    }
}
