//! Pose module - keypoint data model and detector payload decoding
//!
//! Re-exports only. All logic in submodules.

mod keypoint;
mod posenet;
mod slot;

pub use keypoint::{BodyPart, Keypoint, PoseSample, KEYPOINT_COUNT, LEFT_SHOULDER, NOSE, RIGHT_SHOULDER};
pub use posenet::{decode_flat, decode_ml5_json, PoseDecodeError, FLAT_POSE_LEN};
pub use slot::{PoseRead, PoseSlot};
