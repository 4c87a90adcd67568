//! Aim prediction
//!
//! The striker is pulled back to aim: the launch direction points from the
//! release point back toward where the drag started.

use glam::Vec2;

use crate::consts::MIN_DRAG_LENGTH;
use crate::error::ShotError;

/// Unit launch direction for a pull-back drag
///
/// Rejects drags too short to define a direction instead of returning NaN.
pub fn compute_aim(drag_start: Vec2, drag_end: Vec2) -> Result<Vec2, ShotError> {
    let pull = drag_start - drag_end;
    let length = pull.length();
    if !length.is_finite() || length < MIN_DRAG_LENGTH {
        return Err(ShotError::ZeroLengthDrag);
    }
    Ok(pull / length)
}

/// Straight preview line from the striker, as long as the drag
pub fn aim_line(striker: Vec2, direction: Vec2, drag_length: f32) -> [Vec2; 2] {
    [striker, striker + direction * drag_length]
}

/// Launch velocity handed to the host physics
#[inline]
pub fn launch_velocity(direction: Vec2, speed: f32) -> Vec2 {
    direction * speed
}
