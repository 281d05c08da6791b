// Pose landmarker integration
// Provides an abstraction over the pose-landmark model
// Can be implemented using PyO3 (Python MediaPipe) or ONNX Runtime (Rust native)

use std::path::PathBuf;

use async_trait::async_trait;
use image::RgbImage;

use crate::models::pose::{PoseDetection, PoseResult};

/// Options for constructing a landmarker backend
#[derive(Debug, Clone)]
pub struct LandmarkerOptions {
    /// Pose landmarker model asset (.task file)
    pub model_path: PathBuf,
    /// Minimum confidence for a body to be reported (0.0-1.0)
    pub min_detection_confidence: f32,
}

impl Default for LandmarkerOptions {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/pose_landmarker_full.task"),
            min_detection_confidence: 0.5,
        }
    }
}

/// Pose landmarker capability trait.
///
/// The pipeline and its tests depend only on this interface, never on a
/// concrete detection library. The handle is created once per process (model
/// loading is expensive) and shared read-only afterwards.
#[async_trait]
pub trait PoseLandmarker: Send + Sync {
    /// Load the model and construct the backend
    fn new(options: &LandmarkerOptions) -> PoseResult<Self>
    where
        Self: Sized;

    /// Run pose detection over a decoded RGB image.
    ///
    /// An empty `world_landmarks` list means no body was found; that is a
    /// normal outcome, not an error.
    async fn detect(&self, image: &RgbImage) -> PoseResult<PoseDetection>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn model_info(&self) -> String;
}

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::pose::{Keypoint3D, PoseError};
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};

    /// World-landmark payload returned by the Python bridge
    #[derive(serde::Deserialize)]
    struct DetectionPayload {
        world_landmarks: Vec<Vec<Keypoint3D>>,
    }

    pub struct PyO3Landmarker {
        // Python bridge module wrapping mediapipe.tasks.vision.PoseLandmarker
        bridge_module: PyObject,
        options: LandmarkerOptions,
        initialized: bool,
    }

    #[async_trait]
    impl PoseLandmarker for PyO3Landmarker {
        fn new(options: &LandmarkerOptions) -> PoseResult<Self> {
            Python::with_gil(|py| {
                let sys = py.import("sys")
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to import sys: {}", e)))?;

                let path_list = sys.getattr("path")
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to get sys.path: {}", e)))?;

                // Bridge module lives in the repo's python directory
                let python_dir = std::env::current_dir().unwrap_or_default().join("python");

                path_list
                    .call_method1("insert", (0, python_dir.to_string_lossy().into_owned()))
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to extend sys.path: {}", e)))?;

                let bridge_module = py.import("pose_landmarker_bridge")
                    .map_err(|e| PoseError::ModelLoadFailed(format!(
                        "Failed to import pose_landmarker_bridge: {}. Make sure Python dependencies are installed (pip install -r requirements.txt)",
                        e
                    )))?;

                println!(
                    "PyO3Landmarker initialized with model {:?}",
                    options.model_path
                );

                Ok(Self {
                    bridge_module: bridge_module.into(),
                    options: options.clone(),
                    initialized: true,
                })
            })
        }

        async fn detect(&self, image: &RgbImage) -> PoseResult<PoseDetection> {
            let start_time = std::time::Instant::now();

            Python::with_gil(|py| {
                let module = self.bridge_module.as_ref(py);

                let detect_fn = module.getattr("detect_world_landmarks")
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to get detect_world_landmarks: {}", e)))?;

                let pixels = PyBytes::new(py, image.as_raw());

                let kwargs = PyDict::new(py);
                kwargs.set_item("rgb_bytes", pixels)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set rgb_bytes: {}", e)))?;
                kwargs.set_item("width", image.width())
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set width: {}", e)))?;
                kwargs.set_item("height", image.height())
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set height: {}", e)))?;
                kwargs.set_item("model_path", self.options.model_path.to_string_lossy().into_owned())
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set model_path: {}", e)))?;
                kwargs.set_item("min_detection_confidence", self.options.min_detection_confidence)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set min_detection_confidence: {}", e)))?;

                let result_json = detect_fn.call((), Some(kwargs))
                    .map_err(|e| PoseError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))?;

                let json_str: String = result_json.extract()
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to extract JSON: {}", e)))?;

                let payload: DetectionPayload = serde_json::from_str(&json_str)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to parse JSON: {}", e)))?;

                Ok(PoseDetection {
                    world_landmarks: payload.world_landmarks,
                    processing_time_ms: start_time.elapsed().as_millis() as u64,
                })
            })
        }

        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe PoseLandmarker (Python backend) - model: {}, min confidence: {}",
                self.options.model_path.display(),
                self.options.min_detection_confidence
            )
        }
    }
}

// ==============================================================================
// ONNX Runtime Implementation (Pure Rust)
// ==============================================================================

#[cfg(feature = "ml-onnx")]
pub mod onnx_backend {
    use super::*;
    use crate::models::pose::PoseError;

    pub struct OnnxLandmarker {
        // ONNX Runtime session
        // session: ort::session::Session,
        options: LandmarkerOptions,
    }

    #[async_trait]
    impl PoseLandmarker for OnnxLandmarker {
        fn new(options: &LandmarkerOptions) -> PoseResult<Self> {
            if !options.model_path.exists() {
                return Err(PoseError::ModelLoadFailed(format!(
                    "model asset not found at {}",
                    options.model_path.display()
                )));
            }

            // TODO: Build the session once the exported ONNX graph is vendored
            // let session = ort::session::Session::builder()?
            //     .with_optimization_level(GraphOptimizationLevel::Level3)?
            //     .commit_from_file(&options.model_path)?;

            println!("OnnxLandmarker initialized (inference not yet wired)");
            Ok(Self {
                options: options.clone(),
            })
        }

        async fn detect(&self, _image: &RgbImage) -> PoseResult<PoseDetection> {
            // TODO: Preprocess to the model's input tensor, run the session,
            // and postprocess world landmarks
            Ok(PoseDetection::empty(0))
        }

        fn is_initialized(&self) -> bool {
            false
        }

        fn model_info(&self) -> String {
            format!(
                "ONNX Runtime PoseLandmarker (Rust native) - model: {}",
                self.options.model_path.display()
            )
        }
    }
}

// ==============================================================================
// Null Implementation (for builds without an inference backend)
// ==============================================================================

#[cfg(not(any(feature = "ml-pyo3", feature = "ml-onnx")))]
pub struct NullLandmarker {
    options: LandmarkerOptions,
}

#[cfg(not(any(feature = "ml-pyo3", feature = "ml-onnx")))]
#[async_trait]
impl PoseLandmarker for NullLandmarker {
    fn new(options: &LandmarkerOptions) -> PoseResult<Self> {
        println!("Using null pose landmarker (no inference)");
        println!("Enable 'ml-pyo3' or 'ml-onnx' feature for actual ML inference");
        Ok(Self {
            options: options.clone(),
        })
    }

    async fn detect(&self, _image: &RgbImage) -> PoseResult<PoseDetection> {
        Ok(PoseDetection::empty(0))
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn model_info(&self) -> String {
        format!(
            "Null landmarker (no ML inference - enable 'ml-pyo3' or 'ml-onnx' feature) - model: {}",
            self.options.model_path.display()
        )
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub type DefaultLandmarker = pyo3_backend::PyO3Landmarker;

#[cfg(all(feature = "ml-onnx", not(feature = "ml-pyo3")))]
pub type DefaultLandmarker = onnx_backend::OnnxLandmarker;

#[cfg(not(any(feature = "ml-pyo3", feature = "ml-onnx")))]
pub type DefaultLandmarker = NullLandmarker;
