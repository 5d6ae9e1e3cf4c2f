//! Frame clock - turns display-refresh timestamps into clamped deltas
//!
//! A backgrounded tab can stall for seconds; feeding that straight into the
//! integrator would launch the character off-screen.

use serde::Deserialize;

/// Configuration for frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Largest delta handed to physics (ms).
    pub max_delta_ms: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_delta_ms: 100.0 }
    }
}

pub struct FrameClock {
    config: FrameConfig,
    last_ms: Option<f64>,
    /// Sum of clamped deltas: simulated session time
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            last_ms: None,
            elapsed_ms: 0.0,
        }
    }

    /// Record a refresh at `now_ms`, returns the clamped delta
    ///
    /// The first tick, clock rewinds and non-finite stamps yield 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }

        let raw = self.last_ms.map_or(0.0, |last| now_ms - last);
        self.last_ms = Some(now_ms);

        let max = f64::from(self.config.max_delta_ms);
        let delta = if raw <= 0.0 {
            0.0
        } else if raw > max {
            tracing::debug!(raw_ms = raw, max_ms = max, "frame delta clamped");
            max
        } else {
            raw
        };

        self.elapsed_ms += delta;
        delta as f32
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}
