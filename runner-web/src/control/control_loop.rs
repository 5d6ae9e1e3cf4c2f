//! Per-frame driver
//!
//! One tick: read the latest pose (possibly stale, possibly none), turn it
//! into a gesture through the active intent source, advance the character by
//! the clamped frame delta, hand back a snapshot for rendering.

use super::clock::FrameClock;
use super::config::{ConfigError, RunnerConfig};
use super::intent::{GestureIntent, IntentMode, IntentSource, KeyboardIntent};
use crate::character::{CharacterController, CharacterState, SpriteFrame};
use crate::gesture::{CalibrationBaseline, CalibrationState, GestureState};
use crate::pose::{PoseSample, PoseSlot};

/// What the renderer gets every tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    pub character: CharacterState,
    pub sprite: SpriteFrame,
    pub gesture: GestureState,
    pub calibration: CalibrationState,
    /// Clamped delta used for this tick (ms)
    pub delta_ms: f32,
}

pub struct ControlLoop {
    config: RunnerConfig,
    slot: PoseSlot,
    clock: FrameClock,
    gesture: GestureIntent,
    keyboard: KeyboardIntent,
    mode: IntentMode,
    controller: CharacterController,
    last_output: Option<FrameOutput>,
    ticks: u64,
}

impl ControlLoop {
    pub fn new(config: RunnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            slot: PoseSlot::new(),
            clock: FrameClock::new(config.frame),
            gesture: GestureIntent::new(config.calibration, config.gesture),
            keyboard: KeyboardIntent::new(),
            mode: config.intent,
            controller: CharacterController::new(config.physics, config.animation),
            last_output: None,
            ticks: 0,
            config,
        })
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// Detector delivered a pose; overwrites whatever was there
    pub fn publish_pose(&mut self, sample: PoseSample) {
        self.slot.publish(sample);
    }

    /// Detector found nobody
    pub fn clear_pose(&mut self) {
        self.slot.clear();
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardIntent {
        &mut self.keyboard
    }

    pub fn set_intent_mode(&mut self, mode: IntentMode) {
        if mode != self.mode {
            tracing::info!(from = self.mode.as_str(), to = mode.as_str(), "intent source switched");
            self.mode = mode;
            self.keyboard.reset();
        }
    }

    pub fn set_speed_scale(&mut self, scale: f32) {
        self.controller.set_speed_scale(scale);
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Advance one display refresh at wall-clock `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> FrameOutput {
        let delta_ms = self.clock.tick(now_ms);
        let session_ms = self.clock.elapsed_ms();
        let pose = self.slot.read();

        let source: &mut dyn IntentSource = match self.mode {
            IntentMode::Gesture => &mut self.gesture,
            IntentMode::Keyboard => &mut self.keyboard,
        };
        let gesture = source.next_intent(pose, session_ms);

        let character = self.controller.advance(gesture, delta_ms);
        let output = FrameOutput {
            character,
            sprite: SpriteFrame::select(&character, self.controller.is_lost()),
            gesture,
            calibration: self.gesture.calibration_state(),
            delta_ms,
        };

        self.ticks += 1;
        self.last_output = Some(output);
        output
    }

    // ------------------------------------------------------------------------
    // Session control
    // ------------------------------------------------------------------------

    /// Drop the baseline; the next usable pose starts a new calibration
    pub fn reset_calibration(&mut self) {
        self.gesture.reset();
    }

    /// New round: character back on the ground, optionally recalibrate
    pub fn restart_run(&mut self, recalibrate: bool) {
        self.controller.restart();
        self.keyboard.reset();
        if recalibrate {
            self.gesture.reset();
        }
        tracing::info!(recalibrate, "run restarted");
    }

    pub fn mark_lost(&mut self) {
        self.controller.mark_lost();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn intent_mode(&self) -> IntentMode {
        self.mode
    }

    pub fn calibration_state(&self) -> CalibrationState {
        self.gesture.calibration_state()
    }

    pub fn baseline(&self) -> &CalibrationBaseline {
        self.gesture.baseline()
    }

    pub fn character(&self) -> &CharacterState {
        self.controller.state()
    }

    pub fn last_output(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }

    pub fn last_delta(&self) -> Option<f32> {
        self.gesture.last_delta()
    }

    pub fn pose_writes(&self) -> u64 {
        self.slot.writes()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for ControlLoop {
    fn default() -> Self {
        // Default config always validates
        Self {
            config: RunnerConfig::default(),
            slot: PoseSlot::new(),
            clock: FrameClock::default(),
            gesture: GestureIntent::default(),
            keyboard: KeyboardIntent::new(),
            mode: IntentMode::default(),
            controller: CharacterController::default(),
            last_output: None,
            ticks: 0,
        }
    }
}
