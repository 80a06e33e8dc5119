//! Keyboard movement of the player pose and the status overlay.

use bsp_map::{Angle, FrameDriver, Mode, Pose, TickReport, VisibilityScope};
use macroquad::prelude::*;

/// Map units moved per second when a movement key is held.
pub const MOVE_SPEED: f64 = 1200.0;
/// Degrees turned per second when a rotation key is held.
pub const TURN_SPEED: f64 = 225.0;

/// Movement requested for one frame, each axis in `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub forward: f64,
    /// Positive strafes to the right.
    pub strafe: f64,
    /// Positive turns counter-clockwise.
    pub turn: f64,
}

impl PlayerInput {
    /// Reads the held movement keys.
    pub fn from_keyboard() -> Self {
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        Self {
            forward: axis(is_key_down(KeyCode::W), is_key_down(KeyCode::S)),
            strafe: axis(is_key_down(KeyCode::D), is_key_down(KeyCode::A)),
            turn: axis(
                is_key_down(KeyCode::Q) || is_key_down(KeyCode::Left),
                is_key_down(KeyCode::E) || is_key_down(KeyCode::Right),
            ),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns the player pose and moves it from keyboard input.
pub struct PlayerController {
    pose: Pose,
    move_speed: f64,
    turn_speed: f64,
}

impl PlayerController {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
        }
    }

    /// Sets movement and rotation speeds (units and degrees per second).
    pub fn with_speeds(mut self, move_speed: f64, turn_speed: f64) -> Self {
        self.move_speed = move_speed;
        self.turn_speed = turn_speed;
        self
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Reads the keyboard and moves the pose. Returns true if it moved.
    pub fn update(&mut self, dt: f32) -> bool {
        self.apply(PlayerInput::from_keyboard(), dt as f64)
    }

    /// Moves the pose by `input` held for `dt` seconds.
    pub fn apply(&mut self, input: PlayerInput, dt: f64) -> bool {
        if input.is_idle() {
            return false;
        }

        self.pose.angle += input.turn * self.turn_speed * dt;

        let (cos, sin) = self.pose.angle.direction();
        let step = self.move_speed * dt;
        // right of the heading is (sin, -cos)
        self.pose.x += (cos * input.forward + sin * input.strafe) * step;
        self.pose.y += (sin * input.forward - cos * input.strafe) * step;
        true
    }

    /// Draws the status overlay.
    pub fn draw_ui<H: Copy>(
        &self,
        driver: &FrameDriver<H>,
        report: Option<TickReport>,
        error: Option<&str>,
        y_offset: f32,
    ) {
        let config = driver.config();
        let mode = match config.mode {
            Mode::Live => "live",
            Mode::Explore => "explore",
        };
        let scope = match config.scope {
            VisibilityScope::CurrentLeaf => "current leaf",
            VisibilityScope::FieldOfView => "field of view",
        };

        draw_text(
            &format!("Mode: {mode} | Scope: {scope} | {} FPS", get_fps()),
            10.0,
            y_offset,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Pose: ({:.0}, {:.0}) heading {:.1}",
                self.pose.x,
                self.pose.y,
                self.pose.angle.degrees()
            ),
            10.0,
            y_offset + 20.0,
            18.0,
            GRAY,
        );
        if let Some(report) = report {
            draw_text(
                &format!(
                    "Subsector: {} | Visible segments: {}",
                    report.leaf, report.visible_segments
                ),
                10.0,
                y_offset + 40.0,
                18.0,
                YELLOW,
            );
        }
        if let Some(exploration) = driver.exploration() {
            draw_text(
                &format!("Explored leaves: {:?}", exploration.leaves()),
                10.0,
                y_offset + 60.0,
                18.0,
                GREEN,
            );
        }
        if let Some(error) = error {
            draw_text(&format!("Error: {error}"), 10.0, y_offset + 80.0, 18.0, RED);
        }
        draw_text(
            "W/S move | A/D strafe | Q/E turn | Tab mode | V scope | Esc quit",
            10.0,
            screen_height() - 15.0,
            16.0,
            DARKGRAY,
        );
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(Pose::new(0.0, 0.0, Angle::new(90.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn controller() -> PlayerController {
        PlayerController::new(Pose::new(0.0, 0.0, Angle::new(90.0))).with_speeds(10.0, 90.0)
    }

    #[test]
    fn idle_input_does_not_move() {
        let mut controller = controller();
        assert!(!controller.apply(PlayerInput::default(), 1.0));
        assert_eq!(controller.pose(), &Pose::new(0.0, 0.0, Angle::new(90.0)));
    }

    #[test]
    fn forward_follows_heading() {
        let mut controller = controller();
        let input = PlayerInput {
            forward: 1.0,
            ..Default::default()
        };
        assert!(controller.apply(input, 0.5));
        assert_approx_eq!(controller.pose().x, 0.0);
        assert_approx_eq!(controller.pose().y, 5.0);
    }

    #[test]
    fn strafe_right_is_clockwise_of_heading() {
        let mut controller = controller();
        let input = PlayerInput {
            strafe: 1.0,
            ..Default::default()
        };
        controller.apply(input, 1.0);
        assert_approx_eq!(controller.pose().x, 10.0);
        assert_approx_eq!(controller.pose().y, 0.0);
    }

    #[test]
    fn turning_left_increases_heading() {
        let mut controller = controller();
        let input = PlayerInput {
            turn: 1.0,
            ..Default::default()
        };
        controller.apply(input, 1.0);
        assert_approx_eq!(controller.pose().angle.degrees(), 180.0);
        // no translation while only turning
        assert_approx_eq!(controller.pose().y, 0.0);
    }
}
