// Measurement extraction - derives tailor measurements from pose world landmarks

use crate::models::measurement::{
    MeasureError, MeasureResult, MeasurementReport, DEFAULT_CALIBRATION_FACTOR,
};
use crate::models::pose::{BodyLandmark, Keypoint3D};

/// Euclidean distance between two world landmarks, in centimeters.
///
/// World landmarks are metric (meters); the result is scaled to centimeters
/// before any calibration is applied.
pub fn distance_cm(a: &Keypoint3D, b: &Keypoint3D) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt() * 100.0
}

/// Derives the fixed set of tailor measurements from one body's world landmarks.
///
/// Pure and stateless apart from the calibration factor; safe to share across
/// concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementExtractor {
    calibration_factor: f32,
}

impl MeasurementExtractor {
    pub fn new(calibration_factor: f32) -> Self {
        Self { calibration_factor }
    }

    pub fn calibration_factor(&self) -> f32 {
        self.calibration_factor
    }

    /// Compute all ten named measurements from a landmark set.
    ///
    /// Fails with `MissingPose` on an empty set and `MalformedLandmarks` when
    /// a required index is absent; never returns a partial report.
    pub fn extract(&self, landmarks: &[Keypoint3D]) -> MeasureResult<MeasurementReport> {
        use BodyLandmark::*;

        if landmarks.is_empty() {
            return Err(MeasureError::MissingPose);
        }

        let span = |from: BodyLandmark, to: BodyLandmark| -> MeasureResult<f32> {
            let a = Self::landmark(landmarks, from)?;
            let b = Self::landmark(landmarks, to)?;
            Ok(distance_cm(a, b) * self.calibration_factor)
        };

        Ok(MeasurementReport {
            shoulder_width_cm: span(LeftShoulder, RightShoulder)?,
            // Same pair as shoulder width; the upstream contract keeps both keys
            chest_approximation_cm: span(LeftShoulder, RightShoulder)?,
            right_sleeve_length_cm: span(RightShoulder, RightWrist)?,
            left_sleeve_length_cm: span(LeftShoulder, LeftWrist)?,
            right_arm_length_cm: span(RightShoulder, RightElbow)?,
            left_arm_length_cm: span(LeftShoulder, LeftElbow)?,
            torso_length_cm: span(RightShoulder, RightHip)?,
            hip_width_cm: span(LeftHip, RightHip)?,
            inseam_length_cm: span(RightHip, RightAnkle)?,
            height_cm: span(Nose, RightAnkle)?,
        })
    }

    fn landmark(landmarks: &[Keypoint3D], which: BodyLandmark) -> MeasureResult<&Keypoint3D> {
        landmarks
            .get(which.index())
            .ok_or(MeasureError::MalformedLandmarks(which))
    }
}

impl Default for MeasurementExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CALIBRATION_FACTOR)
    }
}
