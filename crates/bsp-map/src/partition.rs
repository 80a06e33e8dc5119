//! Partition lines, side classification and axis-aligned boxes.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Which side of a partition line a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A splitting line, given by a point on it and a direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    origin: Point2<f64>,
    direction: Vector2<f64>,
}

impl Partition {
    pub fn new(origin: Point2<f64>, direction: Vector2<f64>) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn origin(&self) -> Point2<f64> {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    /// The same line with its direction reversed.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }

    /// Signed 2D cross product of the direction with `point - origin`,
    /// using the map's sign convention (`dx * dir.y - dy * dir.x`).
    #[inline]
    pub fn cross(&self, point: Point2<f64>) -> f64 {
        let d = point - self.origin;
        d.x * self.direction.y - d.y * self.direction.x
    }

    /// Classifies `point` against the line.
    ///
    /// A point exactly on the line (cross product of zero) is `Left`.
    #[inline]
    pub fn side_of(&self, point: Point2<f64>) -> Side {
        if self.cross(point) <= 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// The stored segment `origin .. origin + direction`.
    pub fn line(&self) -> Line {
        Line::new(self.origin, self.origin + self.direction)
    }
}

/// A line segment between two map-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Line {
    #[inline]
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }
}

/// Axis-aligned bounds stored on a node for each child.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl BoundingBox {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Returns true if `point` lies inside or on the box.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.left, self.top),
            Point2::new(self.right, self.top),
            Point2::new(self.right, self.bottom),
            Point2::new(self.left, self.bottom),
        ]
    }

    /// The four edges of the box as a closed outline.
    pub fn outline(&self) -> Vec<Line> {
        let c = self.corners();
        (0..4).map(|i| Line::new(c[i], c[(i + 1) % 4])).collect()
    }
}
