// Data models for the body measurement report

use serde::{Deserialize, Serialize};

use crate::models::pose::BodyLandmark;

/// Empirical correction multiplier applied uniformly to every raw
/// landmark-to-landmark distance. Tuned against tape measurements.
pub const DEFAULT_CALIBRATION_FACTOR: f32 = 1.19;

// ==============================================================================
// Measurement Report
// ==============================================================================

/// Named body measurements in centimeters.
///
/// Modeled as a struct rather than a map so a successful extraction always
/// carries exactly this key set; there is no partial report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    pub shoulder_width_cm: f32,
    /// Proxy value; currently the same landmark pair as shoulder width
    pub chest_approximation_cm: f32,
    pub right_sleeve_length_cm: f32,
    pub left_sleeve_length_cm: f32,
    pub right_arm_length_cm: f32,
    pub left_arm_length_cm: f32,
    pub torso_length_cm: f32,
    pub hip_width_cm: f32,
    pub inseam_length_cm: f32,
    pub height_cm: f32,
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("no pose landmarks were detected")]
    MissingPose,

    #[error("landmark set has no entry for {0:?}")]
    MalformedLandmarks(BodyLandmark),
}

pub type MeasureResult<T> = Result<T, MeasureError>;
