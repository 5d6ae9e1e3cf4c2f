//! Keypoint layout and per-frame pose snapshot
//!
//! PoseNet emits 17 keypoints per detected person. Coordinates are in
//! source-frame pixels (640x480 webcam), y grows downward.

// ============================================================================
// KEYPOINT INDICES (PoseNet - 17 total)
// ============================================================================

pub const KEYPOINT_COUNT: usize = 17;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 5;
pub const RIGHT_SHOULDER: usize = 6;

/// Named body landmarks in PoseNet order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const ALL: [BodyPart; KEYPOINT_COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// Position in the PoseNet keypoint array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name as reported by ml5/PoseNet (`part` field)
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "leftEye",
            BodyPart::RightEye => "rightEye",
            BodyPart::LeftEar => "leftEar",
            BodyPart::RightEar => "rightEar",
            BodyPart::LeftShoulder => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow => "leftElbow",
            BodyPart::RightElbow => "rightElbow",
            BodyPart::LeftWrist => "leftWrist",
            BodyPart::RightWrist => "rightWrist",
            BodyPart::LeftHip => "leftHip",
            BodyPart::RightHip => "rightHip",
            BodyPart::LeftKnee => "leftKnee",
            BodyPart::RightKnee => "rightKnee",
            BodyPart::LeftAnkle => "leftAnkle",
            BodyPart::RightAnkle => "rightAnkle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|part| part.name() == name)
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 2D keypoint with detector confidence in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Strictly above the threshold, matching PoseNet's `score > t` convention
    pub fn is_confident(&self, min_confidence: f32) -> bool {
        self.confidence > min_confidence && self.x.is_finite() && self.y.is_finite()
    }
}

/// One detection frame
#[derive(Clone, Debug, PartialEq)]
pub struct PoseSample {
    pub keypoints: [Keypoint; KEYPOINT_COUNT],
    /// Monotonic capture time in milliseconds
    pub timestamp_ms: f64,
}

impl PoseSample {
    /// Empty sample: every keypoint has zero confidence
    pub fn new(timestamp_ms: f64) -> Self {
        Self {
            keypoints: [Keypoint::default(); KEYPOINT_COUNT],
            timestamp_ms,
        }
    }

    pub fn with_keypoint(mut self, part: BodyPart, keypoint: Keypoint) -> Self {
        self.set(part, keypoint);
        self
    }

    pub fn set(&mut self, part: BodyPart, keypoint: Keypoint) {
        self.keypoints[part.index()] = keypoint;
    }

    pub fn get(&self, part: BodyPart) -> Keypoint {
        self.keypoints[part.index()]
    }

    /// Keypoint if its confidence clears the threshold
    pub fn confident(&self, part: BodyPart, min_confidence: f32) -> Option<Keypoint> {
        let keypoint = self.get(part);
        keypoint.is_confident(min_confidence).then_some(keypoint)
    }

    /// A sample with no confident keypoint counts as "no detection"
    pub fn is_usable(&self, min_confidence: f32) -> bool {
        self.keypoints.iter().any(|kp| kp.is_confident(min_confidence))
    }

    /// Mean y of whichever shoulders are confident
    pub fn shoulder_y(&self, min_confidence: f32) -> Option<f32> {
        let left = self.confident(BodyPart::LeftShoulder, min_confidence);
        let right = self.confident(BodyPart::RightShoulder, min_confidence);
        match (left, right) {
            (Some(l), Some(r)) => Some((l.y + r.y) / 2.0),
            (Some(only), None) | (None, Some(only)) => Some(only.y),
            (None, None) => None,
        }
    }
}
