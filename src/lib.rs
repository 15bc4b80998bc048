//! Paddleball - ball motion core for a paddle-and-brick arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball state machine, collisions, paddle, bricks)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics step)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Ball defaults
    pub const BALL_START_SPEED: f32 = 8.0;
    pub const BALL_SPEED_INCREMENT: f32 = 0.1;
    pub const BALL_RADIUS: f32 = 0.15;
    /// Seconds after a launch during which the paddle cannot catch the ball
    pub const REATTACH_COOLDOWN: f32 = 0.25;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 1.6;
    pub const PADDLE_HEIGHT: f32 = 0.3;
    pub const PADDLE_SPEED: f32 = 10.0;
    /// Where the ball rests relative to the paddle center after a respawn
    pub const PADDLE_REST_OFFSET_Y: f32 = 0.4;
    /// Half-arc of the aim sweep in degrees (90 => full 180 degree sweep)
    pub const MAX_AIM_ANGLE: f32 = 90.0;
    pub const AIM_SWEEP_SPEED: f32 = 2.2;

    /// Arena defaults (origin at the bottom-center of the play field)
    pub const ARENA_WIDTH: f32 = 12.0;
    pub const ARENA_HEIGHT: f32 = 16.0;
    /// Paddle center height above the lost floor
    pub const PADDLE_Y: f32 = 1.0;

    /// A contact normal must point at least this far up to count as the paddle top (~53 degrees)
    pub const TOP_NORMAL_MIN_Y: f32 = 0.6;
    /// Fraction of the paddle height that forms the catchable top band
    pub const TOP_BAND_FRACTION: f32 = 0.15;
    /// Minimum catchable band thickness for very thin paddles
    pub const TOP_BAND_MIN: f32 = 0.01;

    /// Reflections whose dot with the surface normal stays above this get nudged
    pub const NUDGE_DOT_THRESHOLD: f32 = -0.98;
    /// How far a nudged reflection is blended toward the surface normal
    pub const NUDGE_BLEND: f32 = 0.1125;
    /// Vertical component forced onto launches that would not head upward
    pub const LAUNCH_MIN_Y: f32 = 1.0e-4;
}

/// Rotate the up vector counter-clockwise by `angle_deg` degrees
#[inline]
pub fn up_rotated(angle_deg: f32) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec2::new(-sin, cos)
}

/// Whole fixed steps needed to cover `secs` (rounded up, never negative)
///
/// A small tolerance absorbs the f32 error in `SIM_DT` so exact multiples do
/// not round up an extra tick.
pub fn secs_to_ticks(secs: f32) -> u64 {
    let ticks = (secs / consts::SIM_DT - 1.0e-3).ceil();
    if ticks.is_finite() && ticks > 0.0 { ticks as u64 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_rotated_quarter_turns() {
        let up = up_rotated(0.0);
        assert!((up - Vec2::Y).length() < 1e-6);

        let left = up_rotated(90.0);
        assert!((left - Vec2::NEG_X).length() < 1e-6);

        let right = up_rotated(-90.0);
        assert!((right - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(0.25), 13);
        assert_eq!(secs_to_ticks(0.2), 10);
        assert_eq!(secs_to_ticks(1.0), 50);
        assert_eq!(secs_to_ticks(0.0), 0);
        assert_eq!(secs_to_ticks(-1.0), 0);
        assert_eq!(secs_to_ticks(f32::NAN), 0);
    }
}
