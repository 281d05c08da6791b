//! CLI driver for the tailor measurement pipeline.
//!
//! Runs the same validate -> decode -> detect -> extract path the HTTP
//! boundary uses and prints the response envelope as JSON.
//!
//! Usage:
//!   measure <image>                          # envelope JSON on stdout
//!   measure <image> --pretty
//!   measure <image> --content-type image/png

use std::path::{Path, PathBuf};

use clap::Parser;

use tailor_measure::core::config::ServiceConfig;
use tailor_measure::core::handler::handle_pose_detection;
use tailor_measure::core::landmarker::{DefaultLandmarker, LandmarkerOptions, PoseLandmarker};
use tailor_measure::models::api::ImageUpload;

#[derive(Parser, Debug)]
#[command(name = "measure")]
#[command(author, version, about = "Body measurements from a full-body photo", long_about = None)]
struct Args {
    /// Input image file (.jpg or .png)
    #[arg(required = true)]
    image: PathBuf,

    /// Content type reported for the upload (inferred from the extension by default)
    #[arg(long)]
    content_type: Option<String>,

    /// Pose landmarker model asset
    #[arg(long)]
    model: Option<PathBuf>,

    /// Calibration factor override
    #[arg(long)]
    calibration: Option<f32>,

    /// Pretty-print the response envelope
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults plus flag overrides; services use AppState::initialize instead
    let mut config = ServiceConfig::default();
    if let Some(factor) = args.calibration {
        config.calibration_factor = factor;
    }
    if let Some(model) = args.model {
        config.model_path = model;
    }
    config.validate()?;

    let landmarker = DefaultLandmarker::new(&LandmarkerOptions {
        model_path: config.model_path.clone(),
        min_detection_confidence: config.min_detection_confidence,
    })?;
    if !landmarker.is_initialized() {
        eprintln!("warning: {}", landmarker.model_info());
    }

    let content_type = args
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(&args.image));
    let bytes = std::fs::read(&args.image)?;

    let upload = ImageUpload {
        filename: args
            .image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        content_type,
        bytes,
    };

    let (status, body) = handle_pose_detection(&landmarker, &config, upload).await;

    let json = if args.pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{}", json);

    if status >= 400 {
        std::process::exit(1);
    }
    Ok(())
}

fn guess_content_type(path: &Path) -> String {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("png") => "image/png".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}
