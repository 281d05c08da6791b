// Request handling - validate, decode, detect, extract, respond

use std::time::Instant;

use uuid::Uuid;

use crate::core::config::ServiceConfig;
use crate::core::extractor::MeasurementExtractor;
use crate::core::image_input::{self, MediaType};
use crate::core::landmarker::PoseLandmarker;
use crate::models::api::{ApiResponse, ImageUpload, ServiceError, ServiceResult};
use crate::models::measurement::{MeasureError, MeasurementReport};

/// HTTP status code paired with the uniform response envelope
pub type HandlerReply = (u16, ApiResponse<MeasurementReport>);

/// Full pose-detection pipeline for one uploaded image.
///
/// The external routing layer hands the multipart `image` field here and
/// writes the returned envelope back under the returned status code. Every
/// failure produces the same envelope shape; nothing escapes as a bare error.
pub async fn handle_pose_detection(
    landmarker: &dyn PoseLandmarker,
    config: &ServiceConfig,
    upload: ImageUpload,
) -> HandlerReply {
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let result = run_pipeline(landmarker, config, &upload).await;

    let (status, body) = match result {
        Ok(report) => (
            200,
            ApiResponse::ok(report, "Successfully retrieved the tailor measurements"),
        ),
        Err(err) => {
            if !err.is_client_error() {
                eprintln!("[{}] pipeline error: {}", request_id, err);
            }
            err.into_response()
        }
    };

    println!(
        "{} - {} - POST /api/v1/posedetection/ - {} - completed after {:.3}s",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        request_id,
        status,
        started.elapsed().as_secs_f64()
    );

    (status, body)
}

async fn run_pipeline(
    landmarker: &dyn PoseLandmarker,
    config: &ServiceConfig,
    upload: &ImageUpload,
) -> ServiceResult<MeasurementReport> {
    // Boundary validation happens before any pipeline work
    MediaType::from_content_type(&upload.content_type)?;

    if upload.bytes.len() > config.max_upload_bytes {
        return Err(ServiceError::PayloadTooLarge {
            got: upload.bytes.len(),
            limit: config.max_upload_bytes,
        });
    }

    let image = image_input::decode_rgb(&upload.bytes)?;

    let detection = landmarker.detect(&image).await?;

    let landmarks = detection
        .primary()
        .ok_or(ServiceError::Measure(MeasureError::MissingPose))?;

    let extractor = MeasurementExtractor::new(config.calibration_factor);
    let report = extractor.extract(landmarks)?;

    Ok(report)
}
