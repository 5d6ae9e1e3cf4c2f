//! Intent sources - where the per-tick gesture comes from
//!
//! Body gestures and the keyboard both produce a `GestureState` per tick and
//! drive the same controller. A session picks one.

use std::str::FromStr;

use crate::gesture::{
    CalibrationBaseline, CalibrationConfig, CalibrationState, Calibrator, GestureClassifier,
    GestureConfig, GestureState,
};
use crate::pose::PoseRead;

/// Anything that can turn a tick into a gesture
pub trait IntentSource {
    /// Gesture for this tick; `now_ms` is simulated session time
    fn next_intent(&mut self, pose: PoseRead<'_>, now_ms: f64) -> GestureState;

    /// Forget per-session state
    fn reset(&mut self);
}

/// Which source drives the session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntentMode {
    #[default]
    Gesture,
    Keyboard,
}

impl IntentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentMode::Gesture => "gesture",
            IntentMode::Keyboard => "keyboard",
        }
    }
}

impl FromStr for IntentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gesture" | "pose" => Ok(IntentMode::Gesture),
            "keyboard" => Ok(IntentMode::Keyboard),
            other => Err(other.to_string()),
        }
    }
}

// ============================================================================
// BODY GESTURES
// ============================================================================

/// Calibrator + classifier: the pose-driven source
pub struct GestureIntent {
    calibrator: Calibrator,
    classifier: GestureClassifier,
}

impl GestureIntent {
    pub fn new(calibration: CalibrationConfig, gesture: GestureConfig) -> Self {
        Self {
            calibrator: Calibrator::new(calibration),
            classifier: GestureClassifier::new(gesture),
        }
    }

    pub fn baseline(&self) -> &CalibrationBaseline {
        self.calibrator.baseline()
    }

    pub fn calibration_state(&self) -> CalibrationState {
        self.calibrator.state()
    }

    pub fn last_delta(&self) -> Option<f32> {
        self.classifier.last_delta()
    }
}

impl IntentSource for GestureIntent {
    fn next_intent(&mut self, pose: PoseRead<'_>, now_ms: f64) -> GestureState {
        self.calibrator.submit(pose.sample, now_ms);
        // Debounce and dropout hold count detector frames, not refreshes
        if pose.fresh || !self.calibrator.baseline().is_calibrated() {
            self.classifier.classify(pose.sample, self.calibrator.baseline())
        } else {
            self.classifier.current()
        }
    }

    fn reset(&mut self) {
        self.calibrator.reset();
        self.classifier.reset();
    }
}

impl Default for GestureIntent {
    fn default() -> Self {
        Self::new(CalibrationConfig::default(), GestureConfig::default())
    }
}

// ============================================================================
// KEYBOARD
// ============================================================================

/// Held-key source: Space/ArrowUp jump, ArrowDown ducks
#[derive(Default)]
pub struct KeyboardIntent {
    jump_held: bool,
    duck_held: bool,
}

impl KeyboardIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one we handle (`KeyboardEvent.code`)
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set_key(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.set_key(code, false)
    }

    fn set_key(&mut self, code: &str, held: bool) -> bool {
        match code {
            "Space" | "ArrowUp" | "KeyW" => self.jump_held = held,
            "ArrowDown" | "KeyS" => self.duck_held = held,
            _ => return false,
        }
        true
    }
}

impl IntentSource for KeyboardIntent {
    fn next_intent(&mut self, _pose: PoseRead<'_>, _now_ms: f64) -> GestureState {
        if self.jump_held {
            GestureState::Jumping
        } else if self.duck_held {
            GestureState::Ducking
        } else {
            GestureState::Standing
        }
    }

    fn reset(&mut self) {
        self.jump_held = false;
        self.duck_held = false;
    }
}
