// Model asset loader and cache
// Handles downloading and caching of pose landmarker model files

use std::fs;
use std::path::{Path, PathBuf};

/// Model source configuration
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// Local file path
    LocalFile(PathBuf),
    /// Direct URL
    Url(String),
}

/// Model asset metadata
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub source: ModelSource,
    pub size_bytes: Option<u64>,
}

/// Manager for caching and fetching model assets
pub struct ModelManager {
    cache_dir: PathBuf,
}

impl ModelManager {
    /// Create a new model manager with cache directory
    pub fn new(cache_dir: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Check if a model is cached
    pub fn is_cached(&self, model: &ModelInfo) -> bool {
        self.get_model_path(&model.name).exists()
    }

    /// Get the local path for a model
    pub fn get_model_path(&self, model_name: &str) -> PathBuf {
        self.cache_dir.join(model_name)
    }

    /// Fetch a model if not cached, returning its local path
    pub async fn ensure_model(&self, model: &ModelInfo) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let model_path = self.get_model_path(&model.name);

        if self.is_cached(model) {
            println!("Model {} already cached at {:?}", model.name, model_path);
            return Ok(model_path);
        }

        println!("Fetching model {} from {:?}", model.name, model.source);

        match &model.source {
            ModelSource::LocalFile(path) => {
                fs::copy(path, &model_path)?;
            }
            ModelSource::Url(url) => {
                let url = url.clone();
                let dest = model_path.clone();
                // reqwest's blocking client must stay off the async runtime
                tokio::task::spawn_blocking(move || download_to(&url, &dest))
                    .await?
                    .map_err(|e| -> Box<dyn std::error::Error> { e })?;
            }
        }

        Ok(model_path)
    }

    /// Clear the model cache
    pub fn clear_cache(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Get cache size in bytes
    pub fn get_cache_size(&self) -> Result<u64, Box<dyn std::error::Error>> {
        let mut total_size = 0u64;

        if self.cache_dir.exists() {
            for entry in fs::read_dir(&self.cache_dir)? {
                let entry = entry?;
                let metadata = entry.metadata()?;
                if metadata.is_file() {
                    total_size += metadata.len();
                }
            }
        }

        Ok(total_size)
    }
}

fn download_to(url: &str, dest: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(format!("Download failed with status {}", response.status()).into());
    }

    let bytes = response.bytes()?;
    // Write to a temp name first so a failed download never looks cached
    let partial = dest.with_extension("partial");
    fs::write(&partial, &bytes)?;
    fs::rename(&partial, dest)?;

    Ok(())
}

// ==============================================================================
// Predefined Model Configurations
// ==============================================================================

/// MediaPipe pose landmarker model configurations
pub mod mediapipe {
    use super::*;

    pub fn pose_landmarker_lite() -> ModelInfo {
        ModelInfo {
            name: "pose_landmarker_lite.task".to_string(),
            version: "v1".to_string(),
            source: ModelSource::Url(
                "https://storage.googleapis.com/mediapipe-models/pose_landmarker/pose_landmarker_lite/float16/latest/pose_landmarker_lite.task".to_string()
            ),
            size_bytes: Some(5_500_000), // ~5.5 MB
        }
    }

    pub fn pose_landmarker_full() -> ModelInfo {
        ModelInfo {
            name: "pose_landmarker_full.task".to_string(),
            version: "v1".to_string(),
            source: ModelSource::Url(
                "https://storage.googleapis.com/mediapipe-models/pose_landmarker/pose_landmarker_full/float16/latest/pose_landmarker_full.task".to_string()
            ),
            size_bytes: Some(9_000_000), // ~9 MB
        }
    }

    pub fn pose_landmarker_heavy() -> ModelInfo {
        ModelInfo {
            name: "pose_landmarker_heavy.task".to_string(),
            version: "v1".to_string(),
            source: ModelSource::Url(
                "https://storage.googleapis.com/mediapipe-models/pose_landmarker/pose_landmarker_heavy/float16/latest/pose_landmarker_heavy.task".to_string()
            ),
            size_bytes: Some(13_000_000), // ~13 MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_model_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("models");
        let manager = ModelManager::new(cache.clone()).unwrap();
        assert_eq!(manager.cache_dir(), cache.as_path());
        assert!(cache.exists());
    }

    #[test]
    fn test_pose_landmarker_catalogue() {
        let lite = mediapipe::pose_landmarker_lite();
        let full = mediapipe::pose_landmarker_full();
        let heavy = mediapipe::pose_landmarker_heavy();

        assert_eq!(full.name, "pose_landmarker_full.task");
        assert!(lite.size_bytes.unwrap() < full.size_bytes.unwrap());
        assert!(full.size_bytes.unwrap() < heavy.size_bytes.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_model_copies_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.task");
        fs::write(&source, b"model bytes").unwrap();

        let manager = ModelManager::new(temp_dir.path().join("cache")).unwrap();
        let model = ModelInfo {
            name: "source.task".to_string(),
            version: "v1".to_string(),
            source: ModelSource::LocalFile(source),
            size_bytes: None,
        };

        assert!(!manager.is_cached(&model));
        let path = manager.ensure_model(&model).await.unwrap();
        assert!(manager.is_cached(&model));
        assert_eq!(fs::read(path).unwrap(), b"model bytes");
        assert_eq!(manager.get_cache_size().unwrap(), 11);

        manager.clear_cache().unwrap();
        assert!(!manager.is_cached(&model));
    }
}
