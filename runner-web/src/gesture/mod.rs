//! Gesture module - baseline calibration and shoulder-height classification
//!
//! Re-exports only. All logic in submodules.

mod calibrator;
mod classifier;
mod debounce;

pub use calibrator::{CalibrationBaseline, CalibrationConfig, CalibrationState, Calibrator};
pub use classifier::{GestureClassifier, GestureConfig, GestureState, LateralWindow};
pub use debounce::Debouncer;
