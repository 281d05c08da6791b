use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::measurement::DEFAULT_CALIBRATION_FACTOR;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Pose landmarker model asset (.task file)
    pub model_path: PathBuf,
    /// Where downloaded model assets are cached
    pub model_cache_dir: PathBuf,
    /// Correction multiplier applied to every raw landmark distance
    pub calibration_factor: f32,
    /// Minimum confidence for the landmarker to report a body (0.0-1.0)
    pub min_detection_confidence: f32,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());

        let mut model_cache_dir = PathBuf::from(home);
        model_cache_dir.push(".tailor_measure");
        model_cache_dir.push("models");

        let model_path = model_cache_dir.join("pose_landmarker_full.task");

        Self {
            model_path,
            model_cache_dir,
            calibration_factor: DEFAULT_CALIBRATION_FACTOR,
            min_detection_confidence: 0.5,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from file, creating with defaults if it doesn't exist
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: ServiceConfig = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            // Create default config and save it
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.calibration_factor.is_finite()
            || self.calibration_factor <= 0.0
            || self.calibration_factor > 10.0
        {
            return Err(format!(
                "Invalid calibration factor: {}. Must be a positive number no greater than 10",
                self.calibration_factor
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(format!(
                "Invalid detection confidence: {}. Must be between 0.0 and 1.0",
                self.min_detection_confidence
            )
            .into());
        }

        if self.max_upload_bytes == 0 || self.max_upload_bytes > 50 * 1024 * 1024 {
            return Err(format!(
                "Invalid max upload size: {}. Must be between 1 byte and 50 MiB",
                self.max_upload_bytes
            )
            .into());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err("Model path cannot be empty".into());
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Get the configuration file path
    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".tailor_measure");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
