//! Session storage and JS bridge
//!
//! Receives PoseNet detections and frame ticks from JavaScript, drives the
//! control loop, and hands back a snapshot the page draws from.

use std::cell::RefCell;

use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::control::{ConfigError, ControlLoop, FrameOutput, IntentMode, RunnerConfig};
use crate::pose::{decode_flat, decode_ml5_json, PoseDecodeError};

/// Errors surfaced to JavaScript
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Pose(#[from] PoseDecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown intent source '{0}' (expected 'gesture' or 'keyboard')")]
    UnknownIntent(String),
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<ControlLoop> = RefCell::new(ControlLoop::default());
}

pub(crate) fn with_session<R>(f: impl FnOnce(&mut ControlLoop) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

// ============================================================================
// FRAME SNAPSHOT
// ============================================================================

/// One tick's renderable state
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct RunnerFrame {
    output: FrameOutput,
}

#[wasm_bindgen]
impl RunnerFrame {
    /// "running" | "jumping" | "ducking"
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.output.character.mode.as_str().to_string()
    }

    /// Height above ground, feeds the sprite's `--bottom`
    #[wasm_bindgen(getter)]
    pub fn vertical_offset(&self) -> f32 {
        self.output.character.vertical_offset
    }

    #[wasm_bindgen(getter)]
    pub fn crouch_depth(&self) -> f32 {
        self.output.character.crouch_depth
    }

    #[wasm_bindgen(getter)]
    pub fn animation_phase(&self) -> u32 {
        self.output.character.animation_phase
    }

    /// Asset name: run-0, run-1, stationary, crouch, lose
    #[wasm_bindgen(getter)]
    pub fn sprite(&self) -> String {
        self.output.sprite.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn gesture(&self) -> String {
        self.output.gesture.as_str().to_string()
    }

    /// "uncalibrated" | "calibrating" | "calibrated"
    #[wasm_bindgen(getter)]
    pub fn calibration(&self) -> String {
        self.output.calibration.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn delta_ms(&self) -> f32 {
        self.output.delta_ms
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from the detector callback with a flat Float32Array of 51 values
/// (17 keypoints x [x, y, score])
#[wasm_bindgen]
pub fn update_pose(data: &[f32]) {
    match decode_flat(data, js_sys::Date::now()) {
        Ok(sample) => with_session(|s| s.publish_pose(sample)),
        Err(err) => web_sys::console::warn_1(&err.to_string().into()),
    }
}

/// Same as `update_pose`, taking ml5's `pose.keypoints` serialized as JSON
#[wasm_bindgen]
pub fn update_pose_json(json: &str) -> Result<(), JsValue> {
    let sample = decode_ml5_json(json, js_sys::Date::now()).map_err(BridgeError::from)?;
    with_session(|s| s.publish_pose(sample));
    Ok(())
}

/// Detector returned no person
#[wasm_bindgen]
pub fn clear_pose() {
    with_session(|s| s.clear_pose());
}

/// Called once per requestAnimationFrame with its timestamp
#[wasm_bindgen]
pub fn tick(now_ms: f64) -> RunnerFrame {
    RunnerFrame {
        output: with_session(|s| s.tick(now_ms)),
    }
}

#[wasm_bindgen]
pub fn reset_calibration() {
    with_session(|s| s.reset_calibration());
    web_sys::console::log_1(&"🧍 Calibration reset - stand still to recalibrate".into());
}

/// Start a new round; `recalibrate` also drops the baseline
#[wasm_bindgen]
pub fn restart_run(recalibrate: bool) {
    with_session(|s| s.restart_run(recalibrate));
}

/// Collision reported by the page
#[wasm_bindgen]
pub fn mark_lost() {
    with_session(|s| s.mark_lost());
}

#[wasm_bindgen]
pub fn get_calibration_state() -> String {
    with_session(|s| s.calibration_state().as_str().to_string())
}

/// "gesture" or "keyboard"
#[wasm_bindgen]
pub fn set_intent_source(name: &str) -> Result<(), JsValue> {
    let mode: IntentMode = name.parse().map_err(BridgeError::UnknownIntent)?;
    with_session(|s| s.set_intent_mode(mode));
    Ok(())
}

/// `KeyboardEvent.code`; returns true if handled
#[wasm_bindgen]
pub fn key_down(code: &str) -> bool {
    with_session(|s| s.keyboard_mut().key_down(code))
}

#[wasm_bindgen]
pub fn key_up(code: &str) -> bool {
    with_session(|s| s.keyboard_mut().key_up(code))
}

/// Run-cycle speed multiplier as the game accelerates
#[wasm_bindgen]
pub fn set_speed_scale(scale: f32) {
    with_session(|s| s.set_speed_scale(scale));
}

/// Replace the session with one built from a (partial) JSON config
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let session = build_session(json)?;
    with_session(|s| *s = session);
    web_sys::console::log_1(&"✅ Runner session configured".into());
    Ok(())
}

fn build_session(json: &str) -> Result<ControlLoop, BridgeError> {
    let config = RunnerConfig::from_json(json)?;
    Ok(ControlLoop::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::CalibrationState;

    #[test]
    fn test_build_session_from_json() {
        let session = build_session(r#"{"intent": "keyboard"}"#).unwrap();
        assert_eq!(session.intent_mode(), IntentMode::Keyboard);
        assert_eq!(session.calibration_state(), CalibrationState::Uncalibrated);
    }

    #[test]
    fn test_build_session_rejects_bad_config() {
        let err = build_session(r#"{"physics": {"gravity": -1.0}}"#).err().unwrap();
        assert!(matches!(err, BridgeError::Config(ConfigError::NotPositive { .. })));
    }

    #[test]
    fn test_error_messages() {
        let err = BridgeError::UnknownIntent("mouse".into());
        assert_eq!(
            err.to_string(),
            "unknown intent source 'mouse' (expected 'gesture' or 'keyboard')"
        );
        let err = BridgeError::from(PoseDecodeError::WrongLength { expected: 51, actual: 3 });
        assert_eq!(err.to_string(), "invalid pose data length: 3 (expected 51)");
    }

    #[test]
    fn test_session_storage_round_trip() {
        with_session(|s| {
            s.restart_run(true);
            s.tick(0.0);
        });
        let ticks = with_session(|s| s.ticks());
        assert!(ticks >= 1);
    }
}
