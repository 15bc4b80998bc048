//! Game tuning and startup configuration
//!
//! Loaded once at startup from JSON. Missing keys fall back to the defaults in
//! [`crate::consts`]. Values that make no physical sense are clamped to a safe
//! minimum by [`Settings::sanitized`]; non-finite values are rejected.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Smallest value any speed, size or duration is clamped to
const MIN_POSITIVE: f32 = 1.0e-3;

/// Errors raised while loading settings
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read
    Io(std::io::Error),
    /// The settings text is not valid JSON for [`Settings`]
    Parse(serde_json::Error),
    /// A tuning value is NaN or infinite
    NonFinite {
        /// Dotted name of the offending field
        field: &'static str,
        value: f32,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "invalid settings JSON: {}", e),
            SettingsError::NonFinite { field, value } => {
                write!(f, "setting '{}' must be finite, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::NonFinite { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Ball tuning consumed by the motion core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Speed the ball is reset to on every launch (units/s)
    pub initial_speed: f32,
    /// Speed added by every non-catching collision (units/s)
    pub speed_increment: f32,
    /// Seconds after a launch before the paddle may catch again
    pub reattach_cooldown: f32,
    /// Collision radius of the ball
    pub radius: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            initial_speed: BALL_START_SPEED,
            speed_increment: BALL_SPEED_INCREMENT,
            reattach_cooldown: REATTACH_COOLDOWN,
            radius: BALL_RADIUS,
        }
    }
}

/// Paddle/controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    /// Horizontal movement speed (units/s at full axis)
    pub movement_speed: f32,
    pub width: f32,
    pub height: f32,
    /// Ball offset from the paddle center after a respawn
    pub rest_offset: Vec2,
    /// Half-arc of the aim sweep (degrees)
    pub max_aim_angle: f32,
    /// Angular frequency of the aim sweep (rad/s)
    pub aim_sweep_speed: f32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            movement_speed: PADDLE_SPEED,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            rest_offset: Vec2::new(0.0, PADDLE_REST_OFFSET_Y),
            max_aim_angle: MAX_AIM_ANGLE,
            aim_sweep_speed: AIM_SWEEP_SPEED,
        }
    }
}

/// Play field used by the headless arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    /// Paddle center height above the lost floor
    pub paddle_y: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            paddle_y: PADDLE_Y,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ball: BallTuning,
    pub paddle: PaddleTuning,
    pub arena: ArenaTuning,
}

impl Settings {
    /// Parse settings from JSON text and sanitize them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.sanitized()
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject non-finite values and clamp non-positive ones to a safe minimum
    pub fn sanitized(mut self) -> Result<Self, SettingsError> {
        let fields: [(&'static str, &mut f32); 12] = [
            ("ball.initial_speed", &mut self.ball.initial_speed),
            ("ball.speed_increment", &mut self.ball.speed_increment),
            ("ball.reattach_cooldown", &mut self.ball.reattach_cooldown),
            ("ball.radius", &mut self.ball.radius),
            ("paddle.movement_speed", &mut self.paddle.movement_speed),
            ("paddle.width", &mut self.paddle.width),
            ("paddle.height", &mut self.paddle.height),
            ("paddle.max_aim_angle", &mut self.paddle.max_aim_angle),
            ("paddle.aim_sweep_speed", &mut self.paddle.aim_sweep_speed),
            ("arena.width", &mut self.arena.width),
            ("arena.height", &mut self.arena.height),
            ("arena.paddle_y", &mut self.arena.paddle_y),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite {
                    field,
                    value: *value,
                });
            }
            if *value <= 0.0 {
                log::warn!("Setting '{}' = {} is not positive, clamping to {}", field, value, MIN_POSITIVE);
                *value = MIN_POSITIVE;
            }
        }

        if !self.paddle.rest_offset.is_finite() {
            return Err(SettingsError::NonFinite {
                field: "paddle.rest_offset",
                value: f32::NAN,
            });
        }

        Ok(self)
    }
}
