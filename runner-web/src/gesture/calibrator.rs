//! Baseline calibration
//!
//! The first usable frame arms a one-shot capture. When the delay runs out
//! the frame available at that moment becomes the neutral-stance reference.
//! The delay gives the player time to step back and stand still.

use serde::Deserialize;

use crate::pose::{BodyPart, PoseSample};

/// Configuration for baseline capture.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Delay between the first usable frame and the capture (ms of tick time).
    pub delay_ms: f64,
    /// Minimum keypoint confidence for a frame to count as usable.
    pub min_confidence: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 7000.0,
            min_confidence: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationState {
    Uncalibrated,
    Calibrating,
    Calibrated,
}

impl CalibrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationState::Uncalibrated => "uncalibrated",
            CalibrationState::Calibrating => "calibrating",
            CalibrationState::Calibrated => "calibrated",
        }
    }
}

/// Neutral-posture reference
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationBaseline {
    /// Mean shoulder y at capture time
    pub reference_shoulder_y: f32,
    /// Nose y at capture time, kept for diagnostics only
    pub reference_nose_y: Option<f32>,
    pub state: CalibrationState,
}

impl CalibrationBaseline {
    pub fn uncalibrated() -> Self {
        Self {
            reference_shoulder_y: 0.0,
            reference_nose_y: None,
            state: CalibrationState::Uncalibrated,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.state == CalibrationState::Calibrated
    }
}

impl Default for CalibrationBaseline {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

pub struct Calibrator {
    config: CalibrationConfig,
    baseline: CalibrationBaseline,
    /// Tick time at which the armed capture fires
    deadline_ms: Option<f64>,
    /// Captures that expired without a usable frame
    failed_attempts: u32,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            baseline: CalibrationBaseline::uncalibrated(),
            deadline_ms: None,
            failed_attempts: 0,
        }
    }

    /// Offer the current frame (or `None` for no detection) at tick time `now_ms`
    pub fn submit(&mut self, sample: Option<&PoseSample>, now_ms: f64) -> CalibrationState {
        let usable = sample.filter(|s| s.is_usable(self.config.min_confidence));

        match self.baseline.state {
            CalibrationState::Calibrated => {}
            CalibrationState::Uncalibrated => {
                if usable.is_some() {
                    self.arm(now_ms);
                    self.baseline.state = CalibrationState::Calibrating;
                }
            }
            CalibrationState::Calibrating => match self.deadline_ms {
                // Previous capture failed: next usable frame re-arms
                None => {
                    if usable.is_some() {
                        self.arm(now_ms);
                    }
                }
                Some(deadline) if now_ms >= deadline => self.capture(usable),
                Some(_) => {}
            },
        }

        self.baseline.state
    }

    /// Back to Uncalibrated; cancels any armed capture
    pub fn reset(&mut self) {
        self.baseline = CalibrationBaseline::uncalibrated();
        self.deadline_ms = None;
        self.failed_attempts = 0;
        tracing::info!("calibration reset");
    }

    pub fn baseline(&self) -> &CalibrationBaseline {
        &self.baseline
    }

    pub fn state(&self) -> CalibrationState {
        self.baseline.state
    }

    /// Pending capture time, if armed
    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    fn arm(&mut self, now_ms: f64) {
        let deadline = now_ms + self.config.delay_ms;
        self.deadline_ms = Some(deadline);
        tracing::debug!(deadline_ms = deadline, "calibration armed");
    }

    fn capture(&mut self, sample: Option<&PoseSample>) {
        self.deadline_ms = None;
        let min_confidence = self.config.min_confidence;

        let Some((sample, shoulder_y)) =
            sample.and_then(|s| s.shoulder_y(min_confidence).map(|y| (s, y)))
        else {
            self.failed_attempts += 1;
            tracing::warn!(
                attempts = self.failed_attempts,
                "calibration expired without usable shoulders, waiting to retry"
            );
            return;
        };

        self.baseline = CalibrationBaseline {
            reference_shoulder_y: shoulder_y,
            reference_nose_y: sample.confident(BodyPart::Nose, min_confidence).map(|kp| kp.y),
            state: CalibrationState::Calibrated,
        };
        tracing::info!(shoulder_y, "calibrated");
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn standing(shoulder_y: f32) -> PoseSample {
        PoseSample::new(0.0)
            .with_keypoint(BodyPart::Nose, Keypoint::new(320.0, shoulder_y - 150.0, 0.9))
            .with_keypoint(BodyPart::LeftShoulder, Keypoint::new(260.0, shoulder_y - 4.0, 0.9))
            .with_keypoint(BodyPart::RightShoulder, Keypoint::new(380.0, shoulder_y + 4.0, 0.9))
    }

    fn nose_only() -> PoseSample {
        PoseSample::new(0.0).with_keypoint(BodyPart::Nose, Keypoint::new(320.0, 150.0, 0.9))
    }

    #[test]
    fn test_no_detection_keeps_uncalibrated() {
        let mut cal = Calibrator::default();
        assert_eq!(cal.submit(None, 0.0), CalibrationState::Uncalibrated);
        assert_eq!(cal.submit(Some(&PoseSample::new(0.0)), 10.0), CalibrationState::Uncalibrated);
        assert_eq!(cal.deadline_ms(), None);
    }

    #[test]
    fn test_first_usable_frame_arms_capture() {
        let mut cal = Calibrator::default();
        assert_eq!(cal.submit(Some(&standing(300.0)), 100.0), CalibrationState::Calibrating);
        assert_eq!(cal.deadline_ms(), Some(7100.0));
    }

    #[test]
    fn test_capture_uses_frame_at_expiry() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&standing(250.0)), 0.0);
        cal.submit(Some(&standing(260.0)), 6999.0);
        assert_eq!(cal.state(), CalibrationState::Calibrating);

        assert_eq!(cal.submit(Some(&standing(300.0)), 7000.0), CalibrationState::Calibrated);
        let baseline = cal.baseline();
        assert!((baseline.reference_shoulder_y - 300.0).abs() < 1e-4);
        assert_eq!(baseline.reference_nose_y, Some(150.0));
    }

    #[test]
    fn test_calibrated_is_sticky() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&standing(300.0)), 0.0);
        cal.submit(Some(&standing(300.0)), 7000.0);

        for i in 0..20 {
            cal.submit(Some(&standing(100.0 + i as f32)), 8000.0 + i as f64 * 7000.0);
        }
        assert!((cal.baseline().reference_shoulder_y - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_expiry_without_usable_sample_retries() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&standing(300.0)), 0.0);

        assert_eq!(cal.submit(None, 7000.0), CalibrationState::Calibrating);
        assert_eq!(cal.deadline_ms(), None);
        assert_eq!(cal.failed_attempts(), 1);

        // Fresh delay from the next usable frame
        cal.submit(Some(&standing(310.0)), 7500.0);
        assert_eq!(cal.deadline_ms(), Some(14500.0));
        assert_eq!(cal.submit(Some(&standing(310.0)), 14500.0), CalibrationState::Calibrated);
    }

    #[test]
    fn test_expiry_with_shoulders_missing_retries() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&nose_only()), 0.0);
        assert_eq!(cal.submit(Some(&nose_only()), 7000.0), CalibrationState::Calibrating);
        assert_eq!(cal.failed_attempts(), 1);
    }

    #[test]
    fn test_reset_cancels_pending_capture() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&standing(300.0)), 0.0);
        cal.reset();
        assert_eq!(cal.state(), CalibrationState::Uncalibrated);
        assert_eq!(cal.deadline_ms(), None);

        // The old deadline must not fire
        assert_eq!(cal.submit(None, 7000.0), CalibrationState::Uncalibrated);
    }

    #[test]
    fn test_reset_after_calibrated_clears_baseline() {
        let mut cal = Calibrator::default();
        cal.submit(Some(&standing(300.0)), 0.0);
        cal.submit(Some(&standing(300.0)), 7000.0);
        cal.reset();
        assert_eq!(*cal.baseline(), CalibrationBaseline::uncalibrated());
    }
}
