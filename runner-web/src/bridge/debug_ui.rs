//! Debug overlay - frame timing plus calibration and gesture readout
//!
//! The page pushes timing each frame and pulls a text block to show under
//! the game canvas.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use super::session::with_session;
use crate::control::ControlLoop;

/// Smoothed timing metrics
#[derive(Default)]
struct FrameMetrics {
    fps: f32,
    frame_time_ms: f32,
    /// Detector latency (capture to callback)
    pose_latency_ms: f32,
}

impl FrameMetrics {
    /// Exponential moving average for a steady readout
    fn record_frame(&mut self, fps: f32, frame_time_ms: f32) {
        // Sanity check: ignore invalid times (tab backgrounded or first frame)
        if !(1.0..=200.0).contains(&frame_time_ms) {
            return;
        }
        self.fps = self.fps * 0.9 + fps * 0.1;
        self.frame_time_ms = self.frame_time_ms * 0.9 + frame_time_ms * 0.1;
    }

    fn record_pose_latency(&mut self, ms: f32) {
        if ms.is_finite() && ms >= 0.0 {
            self.pose_latency_ms = self.pose_latency_ms * 0.9 + ms * 0.1;
        }
    }
}

thread_local! {
    static METRICS: RefCell<FrameMetrics> = RefCell::new(FrameMetrics::default());
}

fn overlay_text(metrics: &FrameMetrics, session: &ControlLoop) -> String {
    let baseline = session.baseline();
    let character = session.character();
    let gesture = session
        .last_output()
        .map_or("-", |out| out.gesture.as_str());
    let delta = session
        .last_delta()
        .map_or_else(|| "-".to_string(), |d| format!("{:+.0}px", d));
    let reference = if baseline.is_calibrated() {
        format!("{:.0}", baseline.reference_shoulder_y)
    } else {
        "-".to_string()
    };

    format!(
        "FPS: {:.0} | Frame: {:.1}ms | Pose: {:.0}ms ({} frames)\n\
         Input: {} | Calibration: {} (shoulder y {})\n\
         Delta: {} | Gesture: {}\n\
         Mode: {} | Offset: {:.1} | v {:+.3}",
        metrics.fps,
        metrics.frame_time_ms,
        metrics.pose_latency_ms,
        session.pose_writes(),
        session.intent_mode().as_str(),
        baseline.state.as_str(),
        reference,
        delta,
        gesture,
        character.mode.as_str(),
        character.vertical_offset,
        character.vertical_velocity,
    )
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Set frame timing (called from JS each frame)
#[wasm_bindgen]
pub fn set_frame_metrics(fps: f32, frame_time_ms: f32) {
    METRICS.with(|m| m.borrow_mut().record_frame(fps, frame_time_ms));
}

/// Set PoseNet detection latency
#[wasm_bindgen]
pub fn set_pose_latency(ms: f32) {
    METRICS.with(|m| m.borrow_mut().record_pose_latency(ms));
}

/// Get formatted overlay text (called from JS to update HTML)
#[wasm_bindgen]
pub fn get_debug_overlay_text() -> String {
    METRICS.with(|m| {
        let metrics = m.borrow();
        with_session(|session| overlay_text(&metrics, session))
    })
}
