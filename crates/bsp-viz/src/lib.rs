//! Macroquad front end for the BSP map driver.

use bsp_map::{BoundingBox, Line, MemoryScene, Role, Scene, Shape};
use macroquad::prelude::*;
use nalgebra::Point2;

pub mod controller;
pub use controller::{PlayerController, PlayerInput};

/// Draw color of each role.
pub fn role_color(role: Role) -> Color {
    match role {
        Role::Map => Color::from_hex(0x77c9f9),
        Role::Player => YELLOW,
        Role::Fov => GRAY,
        Role::PartitionLeft => RED,
        Role::PartitionRight => GREEN,
        Role::PartitionLine => ORANGE,
        Role::VisibleSegments => WHITE,
    }
}

fn role_thickness(role: Role) -> f32 {
    match role {
        Role::VisibleSegments | Role::PartitionLine => 3.0,
        _ => 1.5,
    }
}

/// Fits map space into the window, keeping the aspect ratio.
///
/// Map y grows upwards, screen y downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: BoundingBox,
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    pub fn fit(bounds: BoundingBox, width: f32, height: f32, margin: f32) -> Self {
        let map_width = ((bounds.right - bounds.left) as f32).max(1.0);
        let map_height = ((bounds.top - bounds.bottom) as f32).max(1.0);
        let scale = ((width - 2.0 * margin) / map_width)
            .min((height - 2.0 * margin) / map_height)
            .max(f32::EPSILON);

        // center the unused space
        let offset = vec2(
            (width - map_width * scale) / 2.0,
            (height - map_height * scale) / 2.0,
        );
        Self {
            bounds,
            scale,
            offset,
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, point: Point2<f64>) -> Vec2 {
        let x = (point.x - self.bounds.left) as f32;
        let y = (self.bounds.top - point.y) as f32;
        self.offset + vec2(x, y) * self.scale
    }
}

/// A scene drawn with macroquad's immediate-mode shapes every frame.
///
/// Storage is delegated to [`MemoryScene`]; this type only adds drawing.
#[derive(Debug, Default)]
pub struct MacroquadScene {
    objects: MemoryScene,
}

impl MacroquadScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Draws every object, in role order so markers end up on top of the map.
    pub fn draw(&self, viewport: &Viewport) {
        for role in Role::ALL {
            let color = role_color(role);
            for (_, shape) in self.objects.iter().filter(|(tag, _)| *tag == role) {
                match shape {
                    Shape::Lines(lines) => draw_lines(viewport, lines, role_thickness(role), color),
                    Shape::Marker { center, radius } => {
                        let center = viewport.to_screen(*center);
                        let radius = (*radius as f32 * viewport.scale()).max(3.0);
                        draw_circle_lines(center.x, center.y, radius, 2.0, color);
                    }
                }
            }
        }
    }
}

fn draw_lines(viewport: &Viewport, lines: &[Line], thickness: f32, color: Color) {
    for line in lines {
        let start = viewport.to_screen(line.start);
        let end = viewport.to_screen(line.end);
        draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
}

impl Scene for MacroquadScene {
    type Handle = usize;

    fn insert(&mut self, role: Role, shape: Shape) -> usize {
        self.objects.insert(role, shape)
    }

    fn replace(&mut self, handle: usize, shape: Shape) {
        self.objects.replace(handle, shape);
    }

    fn remove(&mut self, handle: usize) {
        self.objects.remove(handle);
    }
}
