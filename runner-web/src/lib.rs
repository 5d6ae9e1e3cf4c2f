//! Runner Web - pose-controlled side-scroller core
//!
//! Jump, duck and stand in front of the webcam to steer the runner.
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod character;
pub mod control;
pub mod gesture;
pub mod pose;

mod bridge;

#[cfg(test)]
mod scenarios;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{tick, update_pose, BridgeError, RunnerFrame};

pub use character::{CharacterController, CharacterMode, CharacterState, SpriteFrame};
pub use control::{ControlLoop, FrameOutput, IntentMode, RunnerConfig};
pub use gesture::{CalibrationBaseline, CalibrationState, Calibrator, GestureClassifier, GestureState};
pub use pose::{BodyPart, Keypoint, PoseSample};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    console_log!("✅ Runner core loaded - step into frame to calibrate");
}
