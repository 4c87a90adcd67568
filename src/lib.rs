//! Carrom Shot - prediction and outcome core for a carrom coin shot
//!
//! Core modules:
//! - `sim`: Shot geometry (aiming, raycast bounce prediction, hole outcomes)
//! - `scenario`: Table layouts (standard board, seeded random boards)
//! - `settings`: Data-driven tuning
//! - `error`: Recoverable per-attempt errors
//!
//! The host owns rendering, input devices and physics stepping. It feeds
//! pointer positions and typed text in, and gets preview geometry, launch
//! velocities and terminal body updates back.

pub mod error;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::ShotError;
pub use scenario::Scenario;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Maximum reflective casts per coin path prediction
    pub const MAX_BOUNCES: usize = 3;
    /// Range of each coin path cast (world units)
    pub const CAST_RANGE: f32 = 6.0;
    /// Gap left past the coin edge where the predicted path starts
    pub const PATH_START_MARGIN: f32 = 0.1;
    /// Step off a bounce point before the next cast
    pub const BOUNCE_OFFSET: f32 = 0.1;

    /// World units to meters
    pub const DISTANCE_SCALE: f32 = 0.1;

    /// Drags shorter than this have no direction
    pub const MIN_DRAG_LENGTH: f32 = 1e-5;
    /// Pointer must press this close to the striker to start a drag
    pub const GRAB_RADIUS: f32 = 0.5;

    /// Striker baseline (y) the slider moves along
    pub const STRIKER_BASELINE_Y: f32 = -1.9;
    /// Slider range for the striker x position
    pub const STRIKER_MIN_X: f32 = -3.0;
    pub const STRIKER_MAX_X: f32 = 3.0;

    /// Gravity magnitude used to derive the sink threshold (world units/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Speed a too-fast body keeps as it rolls past the hole
    pub const OVERSHOOT_SPEED: f32 = 5.0;
    /// Allowed speed error when sinking with a tolerance rule
    pub const VELOCITY_MARGIN: f32 = 1.0;
}

/// Angle of the segment `from -> to` in degrees, measured as `180 - atan2(dy, dx)`.
///
/// This is the convention the shot readout uses for both striker→coin and
/// coin→hole angles, so a segment pointing straight up reads 90° and one
/// pointing right reads 180°.
#[inline]
pub fn readout_angle_deg(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    180.0 - delta.y.atan2(delta.x).to_degrees()
}

/// Convert a world-unit distance to meters
#[inline]
pub fn to_meters(world_distance: f32, scale: f32) -> f32 {
    world_distance * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_meters() {
        let meters = to_meters(10.0, 0.1);
        assert_eq!(format!("{:.2}", meters), "1.00");
    }

    #[test]
    fn test_readout_angle_axes() {
        let origin = Vec2::ZERO;
        assert!((readout_angle_deg(origin, Vec2::new(1.0, 0.0)) - 180.0).abs() < 1e-4);
        assert!((readout_angle_deg(origin, Vec2::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
        assert!((readout_angle_deg(origin, Vec2::new(0.0, -1.0)) - 270.0).abs() < 1e-4);
    }
}
