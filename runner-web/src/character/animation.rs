//! Run-cycle clock
//!
//! Swaps between run frames on a fixed cadence. Cosmetic only, never
//! feeds back into physics.

use serde::Deserialize;

/// Configuration for the run-cycle sprite swap.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunCycleConfig {
    /// Time each run frame stays on screen (ms).
    pub frame_time_ms: f32,
    /// Number of frames in the run cycle.
    pub frame_count: u32,
}

impl Default for RunCycleConfig {
    fn default() -> Self {
        Self {
            frame_time_ms: 100.0,
            frame_count: 2,
        }
    }
}

pub struct RunCycle {
    config: RunCycleConfig,
    frame: u32,
    elapsed_ms: f32,
}

impl RunCycle {
    pub fn new(config: RunCycleConfig) -> Self {
        Self {
            config,
            frame: 0,
            elapsed_ms: 0.0,
        }
    }

    /// Accumulate scaled time, returns the current frame index
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        let frame_time = self.config.frame_time_ms;
        let frame_count = self.config.frame_count.max(1);
        if frame_time <= 0.0 || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return self.frame;
        }

        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= frame_time {
            let steps = (self.elapsed_ms / frame_time).floor();
            let advance = (steps as u64 % u64::from(frame_count)) as u32;
            self.frame = (self.frame + advance) % frame_count;
            // Remainder stays in [0, frame_time) even when steps is huge
            self.elapsed_ms = (self.elapsed_ms - steps * frame_time).clamp(0.0, frame_time);
            if self.elapsed_ms >= frame_time {
                self.elapsed_ms = 0.0;
            }
        }
        self.frame
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.elapsed_ms = 0.0;
    }
}

impl Default for RunCycle {
    fn default() -> Self {
        Self::new(RunCycleConfig::default())
    }
}
