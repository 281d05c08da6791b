// Data models for pose landmark detection

use serde::{Deserialize, Serialize};

// ==============================================================================
// Body Landmarks (33 keypoints)
// ==============================================================================

/// MediaPipe Pose Landmark indices (33 total)
///
/// This enumeration is the fixed contract with the upstream skeletal model's
/// output ordering. Indices are declared here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// Number of landmarks in a complete set
    pub const COUNT: usize = 33;

    /// Position of this landmark in the model's output sequence
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A 3D world landmark in meters, origin at the hip midpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Detection confidence [0, 1]; not all backends report one
    #[serde(default)]
    pub visibility: f32,
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }
}

// ==============================================================================
// Detection Result
// ==============================================================================

/// Result of running the pose landmarker over a single image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseDetection {
    /// World landmark sets, one per detected body; empty when no pose was found
    pub world_landmarks: Vec<Vec<Keypoint3D>>,
    pub processing_time_ms: u64,
}

impl PoseDetection {
    /// A detection with no bodies
    pub fn empty(processing_time_ms: u64) -> Self {
        Self {
            world_landmarks: vec![],
            processing_time_ms,
        }
    }

    /// Landmark set of the first detected body, if any
    pub fn primary(&self) -> Option<&[Keypoint3D]> {
        self.world_landmarks.first().map(|set| set.as_slice())
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Pose landmarker not initialized")]
    NotInitialized,

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Not supported in this build")]
    NotSupported,
}

pub type PoseResult<T> = Result<T, PoseError>;
