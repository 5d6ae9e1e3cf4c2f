//! Character state machine with gravity integration
//!
//! Running -> Jumping on a jump gesture (launch velocity, then gravity).
//! Running -> Ducking on a duck gesture (fixed crouch, no integration).
//! Ducking ignores jump gestures and returns to Running on Standing.
//! A duck gesture while airborne only takes effect on the landing tick.

use serde::Deserialize;

use super::animation::{RunCycle, RunCycleConfig};
use crate::gesture::GestureState;

/// Upper bound for `set_speed_scale`
pub const MAX_SPEED_SCALE: f32 = 10.0;

/// Configuration for character physics.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Upward launch velocity (offset units per ms).
    pub jump_speed: f32,
    /// Downward acceleration (offset units per ms²).
    pub gravity: f32,
    /// Visual drop applied while ducking (offset units).
    pub crouch_depth: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            jump_speed: 0.45,
            gravity: 0.0015,
            crouch_depth: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharacterMode {
    #[default]
    Running,
    Jumping,
    Ducking,
}

impl CharacterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterMode::Running => "running",
            CharacterMode::Jumping => "jumping",
            CharacterMode::Ducking => "ducking",
        }
    }
}

/// Renderable character state, one snapshot per tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterState {
    pub mode: CharacterMode,
    /// Height above ground, never negative
    pub vertical_offset: f32,
    /// Positive is upward
    pub vertical_velocity: f32,
    /// Crouch drop while ducking, 0 otherwise
    pub crouch_depth: f32,
    /// Run-cycle frame index
    pub animation_phase: u32,
}

pub struct CharacterController {
    config: PhysicsConfig,
    state: CharacterState,
    run_cycle: RunCycle,
    /// Multiplier on run-cycle time as the game speeds up
    speed_scale: f32,
    /// Frozen after a collision until restart
    lost: bool,
}

impl CharacterController {
    pub fn new(config: PhysicsConfig, animation: RunCycleConfig) -> Self {
        Self {
            config,
            state: CharacterState::default(),
            run_cycle: RunCycle::new(animation),
            speed_scale: 1.0,
            lost: false,
        }
    }

    /// Resume from an existing state (replays, tests)
    pub fn from_state(config: PhysicsConfig, animation: RunCycleConfig, state: CharacterState) -> Self {
        let mut controller = Self::new(config, animation);
        controller.state = sanitize_state(state);
        controller
    }

    /// Advance one tick with the current gesture and elapsed time in ms
    pub fn advance(&mut self, gesture: GestureState, dt_ms: f32) -> CharacterState {
        if self.lost {
            return self.state;
        }
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        match self.state.mode {
            CharacterMode::Running => {
                self.state.animation_phase = self.run_cycle.advance(dt * self.speed_scale);
                match gesture {
                    GestureState::Jumping => self.start_jump(),
                    GestureState::Ducking => self.start_duck(),
                    GestureState::Standing => {}
                }
            }
            CharacterMode::Jumping => self.integrate(gesture, dt),
            CharacterMode::Ducking => {
                if gesture == GestureState::Standing {
                    self.state.mode = CharacterMode::Running;
                    self.state.crouch_depth = 0.0;
                }
            }
        }

        self.state
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    /// Run-cycle speed multiplier, clamped to `[0, MAX_SPEED_SCALE]`
    pub fn set_speed_scale(&mut self, scale: f32) {
        self.speed_scale = if scale.is_finite() {
            scale.clamp(0.0, MAX_SPEED_SCALE)
        } else {
            1.0
        };
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Freeze the character in place until `restart`
    pub fn mark_lost(&mut self) {
        self.lost = true;
        tracing::info!(mode = self.state.mode.as_str(), "run lost");
    }

    /// Back on the ground, running, for a new round
    pub fn restart(&mut self) {
        self.state = CharacterState::default();
        self.run_cycle.reset();
        self.speed_scale = 1.0;
        self.lost = false;
    }

    /// Launch tick: mode and velocity change but the offset is still 0.
    /// Integration starts on the next tick with a nonzero delta, so for one
    /// snapshot `Jumping` is reported on the ground.
    fn start_jump(&mut self) {
        self.state.mode = CharacterMode::Jumping;
        self.state.vertical_velocity = self.config.jump_speed;
        tracing::debug!(velocity = self.config.jump_speed, "jump");
    }

    fn start_duck(&mut self) {
        self.state.mode = CharacterMode::Ducking;
        self.state.crouch_depth = self.config.crouch_depth;
    }

    /// Semi-implicit Euler step, landing when the offset reaches the ground
    fn integrate(&mut self, gesture: GestureState, dt: f32) {
        if dt == 0.0 {
            return;
        }

        let state = &mut self.state;
        state.vertical_offset += state.vertical_velocity * dt;
        state.vertical_velocity -= self.config.gravity * dt;

        if state.vertical_offset <= 0.0 {
            state.vertical_offset = 0.0;
            state.vertical_velocity = 0.0;
            state.mode = CharacterMode::Running;
            tracing::debug!(duck = gesture == GestureState::Ducking, "landed");
            if gesture == GestureState::Ducking {
                self.start_duck();
            }
        }
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), RunCycleConfig::default())
    }
}

/// Keep externally supplied states inside the invariants
fn sanitize_state(mut state: CharacterState) -> CharacterState {
    if !state.vertical_offset.is_finite() || state.vertical_offset < 0.0 {
        state.vertical_offset = 0.0;
    }
    if !state.vertical_velocity.is_finite() {
        state.vertical_velocity = 0.0;
    }
    if state.mode == CharacterMode::Jumping && state.vertical_offset == 0.0 && state.vertical_velocity <= 0.0 {
        state.mode = CharacterMode::Running;
        state.vertical_velocity = 0.0;
    }
    state
}
