pub mod config;
pub mod extractor;
pub mod image_input;
pub mod model_assets;

// Pose landmarker backends and request orchestration
pub mod handler;
pub mod landmarker;
