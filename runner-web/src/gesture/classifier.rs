//! Shoulder-height gesture classification
//!
//! Compares live shoulder height against the calibrated baseline.
//! Rules, in priority order, with `delta = baseline - current` (image y grows
//! downward, so a jump makes delta positive):
//! - `delta > enter` -> Jumping
//! - `delta < -enter` -> Ducking
//! - already Jumping and `delta > release` -> Jumping (same for Ducking)
//! - otherwise Standing
//!
//! The raw result then goes through a frame-count debounce.

use serde::Deserialize;

use super::calibrator::CalibrationBaseline;
use super::debounce::Debouncer;
use crate::pose::{BodyPart, PoseSample};

/// Discrete body gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Standing,
    Jumping,
    Ducking,
}

impl GestureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureState::Standing => "standing",
            GestureState::Jumping => "jumping",
            GestureState::Ducking => "ducking",
        }
    }
}

/// Horizontal band the player's nose must be inside for a frame to count.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LateralWindow {
    pub min_x: f32,
    pub max_x: f32,
}

impl LateralWindow {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Configuration for gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum keypoint confidence (strictly above).
    pub min_confidence: f32,
    /// Shoulder displacement needed to enter Jumping/Ducking (source pixels).
    pub enter_threshold: f32,
    /// Displacement below which a held Jumping/Ducking is released.
    pub release_threshold: f32,
    /// Consecutive frames a new gesture must persist before it is emitted.
    pub debounce_frames: u32,
    /// Frames without a shoulder measurement before falling back to Standing.
    pub hold_limit_frames: u32,
    /// Optional nose-x gate; frames outside it hold the previous gesture.
    pub lateral_window: Option<LateralWindow>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            enter_threshold: 70.0,
            release_threshold: 50.0,
            debounce_frames: 2,
            hold_limit_frames: 15, // ~0.5s at 30Hz detection
            lateral_window: Some(LateralWindow {
                min_x: 100.0,
                max_x: 550.0,
            }),
        }
    }
}

pub struct GestureClassifier {
    config: GestureConfig,
    debouncer: Debouncer<GestureState>,
    /// Consecutive frames without a shoulder measurement
    missed_frames: u32,
    /// Most recent shoulder delta, for the debug overlay
    last_delta: Option<f32>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(GestureState::Standing, config.debounce_frames),
            missed_frames: 0,
            last_delta: None,
        }
    }

    /// Classify one frame against the baseline
    pub fn classify(
        &mut self,
        sample: Option<&PoseSample>,
        baseline: &CalibrationBaseline,
    ) -> GestureState {
        if !baseline.is_calibrated() {
            self.reset();
            return GestureState::Standing;
        }

        let Some(shoulder_y) = sample.and_then(|s| self.measure(s)) else {
            return self.hold();
        };
        self.missed_frames = 0;

        let delta = baseline.reference_shoulder_y - shoulder_y;
        self.last_delta = Some(delta);

        let previous = self.debouncer.stable();
        let raw = self.raw_state(delta, previous);
        let gesture = self.debouncer.update(raw);
        if gesture != previous {
            tracing::debug!(
                from = previous.as_str(),
                to = gesture.as_str(),
                delta,
                "gesture changed"
            );
        }
        gesture
    }

    /// Last emitted gesture
    pub fn current(&self) -> GestureState {
        self.debouncer.stable()
    }

    pub fn last_delta(&self) -> Option<f32> {
        self.last_delta
    }

    pub fn reset(&mut self) {
        self.debouncer.reset(GestureState::Standing);
        self.missed_frames = 0;
        self.last_delta = None;
    }

    /// Shoulder y if the frame is usable and inside the lateral window
    fn measure(&self, sample: &PoseSample) -> Option<f32> {
        let min_confidence = self.config.min_confidence;
        if !sample.is_usable(min_confidence) {
            return None;
        }

        if let (Some(window), Some(nose)) = (
            self.config.lateral_window,
            sample.confident(BodyPart::Nose, min_confidence),
        ) {
            if !window.contains(nose.x) {
                return None;
            }
        }

        sample.shoulder_y(min_confidence)
    }

    /// No measurement this frame: keep the previous gesture for a while
    fn hold(&mut self) -> GestureState {
        self.missed_frames = self.missed_frames.saturating_add(1);
        if self.missed_frames > self.config.hold_limit_frames
            && self.debouncer.stable() != GestureState::Standing
        {
            tracing::debug!(frames = self.missed_frames, "tracking lost, releasing gesture");
            self.debouncer.reset(GestureState::Standing);
        }
        self.debouncer.stable()
    }

    fn raw_state(&self, delta: f32, previous: GestureState) -> GestureState {
        let enter = self.config.enter_threshold;
        let release = self.config.release_threshold;

        if delta > enter {
            GestureState::Jumping
        } else if delta < -enter {
            GestureState::Ducking
        } else {
            match previous {
                GestureState::Jumping if delta > release => GestureState::Jumping,
                GestureState::Ducking if delta < -release => GestureState::Ducking,
                _ => GestureState::Standing,
            }
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
