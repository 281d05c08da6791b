// Response envelope and boundary error taxonomy

use serde::{Deserialize, Serialize};

use crate::models::measurement::MeasureError;
use crate::models::pose::PoseError;

// ==============================================================================
// Response Envelope
// ==============================================================================

/// Uniform response envelope returned for every request, success or failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub resolution: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            resolution: None,
        }
    }

    pub fn error(message: impl Into<String>, resolution: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            resolution,
        }
    }
}

// ==============================================================================
// Upload
// ==============================================================================

/// An uploaded image as received from the routing layer's multipart `image` field
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// ==============================================================================
// Error Types
// ==============================================================================

/// Everything that can go wrong between receiving an upload and returning a
/// report. Each variant maps to one HTTP status and one envelope.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid image type: {0}")]
    InvalidMediaType(String),

    #[error("Could not decode image: {0}")]
    ImageDecode(String),

    #[error("Upload of {got} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { got: usize, limit: usize },

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error("Pose detection failed: {0}")]
    Landmarker(#[from] PoseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidMediaType(_) | ServiceError::ImageDecode(_) => 400,
            ServiceError::PayloadTooLarge { .. } => 413,
            ServiceError::Measure(MeasureError::MissingPose) => 422,
            // Upstream contract violation, not something the client can fix
            ServiceError::Measure(MeasureError::MalformedLandmarks(_)) => 500,
            ServiceError::Landmarker(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Hint for user-correctable failures; `None` for internal ones
    pub fn resolution(&self) -> Option<String> {
        match self {
            ServiceError::InvalidMediaType(_) => {
                Some("Please send a valid image of type .png or .jpg".to_string())
            }
            ServiceError::ImageDecode(_) => {
                Some("The uploaded file could not be read as an image. Please try a different photo".to_string())
            }
            ServiceError::PayloadTooLarge { limit, .. } => {
                Some(format!("Please upload an image smaller than {} bytes", limit))
            }
            ServiceError::Measure(MeasureError::MissingPose) => {
                Some("No person was detected. Please resubmit a clearer full-body photo".to_string())
            }
            ServiceError::Measure(MeasureError::MalformedLandmarks(_)) => None,
            ServiceError::Landmarker(_) => {
                Some("Something went wrong while processing the image. Please try again".to_string())
            }
        }
    }

    /// Map this error to its status code and envelope
    pub fn into_response<T>(self) -> (u16, ApiResponse<T>) {
        let status = self.status_code();
        let resolution = self.resolution();
        (status, ApiResponse::error(self.to_string(), resolution))
    }
}
