pub mod core;
pub mod models;

use std::sync::{Arc, Mutex};

use crate::core::config::ServiceConfig;
use crate::core::handler;
use crate::core::landmarker::{DefaultLandmarker, LandmarkerOptions, PoseLandmarker};
use crate::core::model_assets::{mediapipe, ModelManager};
use crate::models::api::{ApiResponse, ImageUpload};
use crate::models::measurement::MeasurementReport;

// Application state
pub struct AppState {
    pub landmarker: Arc<dyn PoseLandmarker>,
    pub config: Mutex<ServiceConfig>,
}

impl AppState {
    /// Initialize the service: load configuration, make sure the model asset
    /// is present, and construct the default landmarker backend.
    ///
    /// Called once at process startup; the landmarker handle is expensive to
    /// create and is shared read-only for the process lifetime.
    pub async fn initialize() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ServiceConfig::load()?;

        let model_path = if config.model_path.exists() {
            config.model_path.clone()
        } else {
            let manager = ModelManager::new(config.model_cache_dir.clone())?;
            manager.ensure_model(&mediapipe::pose_landmarker_full()).await?
        };

        let landmarker = DefaultLandmarker::new(&LandmarkerOptions {
            model_path,
            min_detection_confidence: config.min_detection_confidence,
        })?;
        println!("Pose landmarker ready: {}", landmarker.model_info());

        Ok(Self {
            landmarker: Arc::new(landmarker),
            config: Mutex::new(config),
        })
    }

    /// Build state around an existing landmarker handle
    pub fn with_landmarker(landmarker: Arc<dyn PoseLandmarker>, config: ServiceConfig) -> Self {
        Self {
            landmarker,
            config: Mutex::new(config),
        }
    }

    /// Boundary seam for the external routing layer: one uploaded image in,
    /// status code and response envelope out.
    pub async fn handle_pose_detection(
        &self,
        upload: ImageUpload,
    ) -> (u16, ApiResponse<MeasurementReport>) {
        let config = match self.config.lock() {
            Ok(config) => config.clone(),
            Err(e) => {
                eprintln!("Configuration lock poisoned: {}", e);
                return (
                    500,
                    ApiResponse::error(
                        "Service configuration is unavailable",
                        Some("Please try again".to_string()),
                    ),
                );
            }
        };

        handler::handle_pose_detection(self.landmarker.as_ref(), &config, upload).await
    }
}
