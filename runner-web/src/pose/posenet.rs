//! PoseNet payload decoding
//!
//! Two wire shapes arrive from the page:
//! - flat Float32Array of 51 values (17 keypoints x [x, y, score])
//! - ml5 keypoint list: `[{ "part": "nose", "position": {"x":..,"y":..}, "score":.. }, ...]`

use serde::Deserialize;
use thiserror::Error;

use super::keypoint::{BodyPart, Keypoint, PoseSample, KEYPOINT_COUNT};

/// Values per keypoint in the flat layout
pub const VALUES_PER_KEYPOINT: usize = 3;

/// Expected flat payload length
pub const FLAT_POSE_LEN: usize = KEYPOINT_COUNT * VALUES_PER_KEYPOINT;

#[derive(Debug, Error)]
pub enum PoseDecodeError {
    #[error("invalid pose data length: {actual} (expected {expected})")]
    WrongLength { expected: usize, actual: usize },

    #[error("malformed keypoint JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Ml5Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct Ml5Keypoint {
    part: String,
    position: Ml5Position,
    score: f32,
}

/// Decode the flat `[x, y, score] x 17` layout
///
/// Out-of-range scores are clamped into [0, 1]; non-finite scores become 0 so
/// the keypoint is simply treated as undetected.
pub fn decode_flat(data: &[f32], timestamp_ms: f64) -> Result<PoseSample, PoseDecodeError> {
    if data.len() != FLAT_POSE_LEN {
        return Err(PoseDecodeError::WrongLength {
            expected: FLAT_POSE_LEN,
            actual: data.len(),
        });
    }

    let mut sample = PoseSample::new(timestamp_ms);
    for (slot, chunk) in sample
        .keypoints
        .iter_mut()
        .zip(data.chunks_exact(VALUES_PER_KEYPOINT))
    {
        *slot = Keypoint::new(chunk[0], chunk[1], sanitize_score(chunk[2]));
    }
    Ok(sample)
}

/// Decode an ml5 keypoint list; unknown part names are skipped
pub fn decode_ml5_json(json: &str, timestamp_ms: f64) -> Result<PoseSample, PoseDecodeError> {
    let keypoints: Vec<Ml5Keypoint> = serde_json::from_str(json)?;

    let mut sample = PoseSample::new(timestamp_ms);
    for kp in keypoints {
        match BodyPart::from_name(&kp.part) {
            Some(part) => sample.set(
                part,
                Keypoint::new(kp.position.x, kp.position.y, sanitize_score(kp.score)),
            ),
            None => tracing::debug!(part = %kp.part, "skipping unknown keypoint"),
        }
    }
    Ok(sample)
}

fn sanitize_score(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
