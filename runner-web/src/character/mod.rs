//! Character module - run/jump/duck state machine, run-cycle clock, sprite selection
//!
//! Re-exports only. All logic in submodules.

mod animation;
mod controller;
mod sprite;

pub use animation::{RunCycle, RunCycleConfig};
pub use controller::{CharacterController, CharacterMode, CharacterState, PhysicsConfig, MAX_SPEED_SCALE};
pub use sprite::SpriteFrame;
