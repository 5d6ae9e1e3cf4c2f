//! Session configuration
//!
//! Every section defaults to the tuned values; the page may send a partial
//! JSON override, e.g. `{"gesture": {"enter_threshold": 60}}`.

use serde::Deserialize;
use thiserror::Error;

use super::clock::FrameConfig;
use super::intent::IntentMode;
use crate::character::{PhysicsConfig, RunCycleConfig};
use crate::gesture::{CalibrationConfig, GestureConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite value >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("min_confidence must be within [0, 1), got {0}")]
    ConfidenceOutOfRange(f32),

    #[error("release_threshold ({release}) must be below enter_threshold ({enter})")]
    HysteresisInverted { enter: f32, release: f32 },

    #[error("debounce_frames must be at least 1")]
    ZeroDebounce,

    #[error("run cycle needs at least one frame")]
    EmptyRunCycle,

    #[error("lateral window is inverted: min_x {min_x} > max_x {max_x}")]
    InvertedWindow { min_x: f32, max_x: f32 },

    #[error("unknown intent source '{0}'")]
    UnknownIntent(String),

    #[error("malformed config JSON: {0}")]
    Json(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRunnerConfig {
    calibration: CalibrationConfig,
    gesture: GestureConfig,
    physics: PhysicsConfig,
    animation: RunCycleConfig,
    frame: FrameConfig,
    intent: Option<String>,
}

/// All tunables for one session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunnerConfig {
    pub calibration: CalibrationConfig,
    pub gesture: GestureConfig,
    pub physics: PhysicsConfig,
    pub animation: RunCycleConfig,
    pub frame: FrameConfig,
    pub intent: IntentMode,
}

impl RunnerConfig {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawRunnerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;

        let intent: IntentMode = match raw.intent {
            Some(name) => name.parse().map_err(ConfigError::UnknownIntent)?,
            None => IntentMode::default(),
        };

        let config = Self {
            calibration: raw.calibration,
            gesture: raw.gesture,
            physics: raw.physics,
            animation: raw.animation,
            frame: raw.frame,
            intent,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("calibration.delay_ms", self.calibration.delay_ms)?;
        confidence(self.calibration.min_confidence)?;
        confidence(self.gesture.min_confidence)?;

        let gesture = &self.gesture;
        positive("gesture.enter_threshold", gesture.enter_threshold.into())?;
        non_negative("gesture.release_threshold", gesture.release_threshold.into())?;
        if gesture.release_threshold >= gesture.enter_threshold {
            return Err(ConfigError::HysteresisInverted {
                enter: gesture.enter_threshold,
                release: gesture.release_threshold,
            });
        }
        if gesture.debounce_frames == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if let Some(window) = gesture.lateral_window {
            if !(window.min_x <= window.max_x) {
                return Err(ConfigError::InvertedWindow {
                    min_x: window.min_x,
                    max_x: window.max_x,
                });
            }
        }

        positive("physics.jump_speed", self.physics.jump_speed.into())?;
        positive("physics.gravity", self.physics.gravity.into())?;
        non_negative("physics.crouch_depth", self.physics.crouch_depth.into())?;

        positive("animation.frame_time_ms", self.animation.frame_time_ms.into())?;
        if self.animation.frame_count == 0 {
            return Err(ConfigError::EmptyRunCycle);
        }

        positive("frame.max_delta_ms", self.frame.max_delta_ms.into())?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn confidence(value: f32) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ConfidenceOutOfRange(value))
    }
}
