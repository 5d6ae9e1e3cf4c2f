//! Control module - frame clock, intent sources, session config, per-frame loop
//!
//! Re-exports only. All logic in submodules.

mod clock;
mod config;
mod control_loop;
mod intent;

pub use clock::{FrameClock, FrameConfig};
pub use config::{ConfigError, RunnerConfig};
pub use control_loop::{ControlLoop, FrameOutput};
pub use intent::{GestureIntent, IntentMode, IntentSource, KeyboardIntent};
