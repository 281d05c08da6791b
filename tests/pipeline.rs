// End-to-end pipeline tests driven through the public API with a
// deterministic fixture landmarker, no concrete detection library.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbImage;

use tailor_measure::core::config::ServiceConfig;
use tailor_measure::core::landmarker::{LandmarkerOptions, PoseLandmarker};
use tailor_measure::models::api::ImageUpload;
use tailor_measure::models::pose::{BodyLandmark, Keypoint3D, PoseDetection, PoseResult};
use tailor_measure::AppState;

struct FixtureLandmarker {
    world_landmarks: Vec<Vec<Keypoint3D>>,
}

#[async_trait]
impl PoseLandmarker for FixtureLandmarker {
    fn new(_options: &LandmarkerOptions) -> PoseResult<Self> {
        Ok(Self {
            world_landmarks: vec![],
        })
    }

    async fn detect(&self, _image: &RgbImage) -> PoseResult<PoseDetection> {
        Ok(PoseDetection {
            world_landmarks: self.world_landmarks.clone(),
            processing_time_ms: 3,
        })
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn model_info(&self) -> String {
        "fixture".to_string()
    }
}

fn app_with(world_landmarks: Vec<Vec<Keypoint3D>>) -> AppState {
    AppState::with_landmarker(
        Arc::new(FixtureLandmarker { world_landmarks }),
        ServiceConfig::default(),
    )
}

fn standing_landmarks() -> Vec<Keypoint3D> {
    let mut set = vec![Keypoint3D::new(0.0, 0.0, 0.0, 1.0); BodyLandmark::COUNT];
    set[BodyLandmark::Nose.index()] = Keypoint3D::new(0.0, 0.0, 0.0, 1.0);
    set[BodyLandmark::LeftShoulder.index()] = Keypoint3D::new(-0.2, -0.15, 0.0, 1.0);
    set[BodyLandmark::RightShoulder.index()] = Keypoint3D::new(0.2, -0.15, 0.0, 1.0);
    set[BodyLandmark::LeftElbow.index()] = Keypoint3D::new(-0.25, -0.45, 0.0, 1.0);
    set[BodyLandmark::RightElbow.index()] = Keypoint3D::new(0.25, -0.45, 0.0, 1.0);
    set[BodyLandmark::LeftWrist.index()] = Keypoint3D::new(-0.28, -0.7, 0.0, 1.0);
    set[BodyLandmark::RightWrist.index()] = Keypoint3D::new(0.28, -0.7, 0.0, 1.0);
    set[BodyLandmark::LeftHip.index()] = Keypoint3D::new(-0.12, -0.65, 0.0, 1.0);
    set[BodyLandmark::RightHip.index()] = Keypoint3D::new(0.12, -0.65, 0.0, 1.0);
    set[BodyLandmark::RightAnkle.index()] = Keypoint3D::new(0.12, -1.7, 0.0, 1.0);
    set
}

fn png_upload() -> ImageUpload {
    let image = image::DynamicImage::ImageRgb8(RgbImage::new(16, 16));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    ImageUpload {
        filename: Some("person.png".to_string()),
        content_type: "image/png".to_string(),
        bytes,
    }
}

#[tokio::test]
async fn text_plain_upload_gets_400_envelope() {
    let app = app_with(vec![standing_landmarks()]);
    let mut upload = png_upload();
    upload.content_type = "text/plain".to_string();
    upload.filename = Some("notes.txt".to_string());

    let (status, body) = app.handle_pose_detection(upload).await;

    assert_eq!(status, 400);
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["data"].is_null());
    assert!(value["message"].as_str().unwrap().contains("text/plain"));
    assert!(value["resolution"].as_str().unwrap().contains(".png or .jpg"));
}

#[tokio::test]
async fn no_detection_gets_422_envelope() {
    let app = app_with(vec![]);

    let (status, body) = app.handle_pose_detection(png_upload()).await;

    assert_eq!(status, 422);
    assert!(!body.success);
    assert!(body.data.is_none());
    assert!(body.resolution.is_some());
}

#[tokio::test]
async fn successful_extraction_has_exactly_ten_keys() {
    let app = app_with(vec![standing_landmarks()]);

    let (status, body) = app.handle_pose_detection(png_upload()).await;

    assert_eq!(status, 200);
    assert!(body.success);

    let value = serde_json::to_value(body.data.unwrap()).unwrap();
    let report = value.as_object().unwrap();
    assert_eq!(report.len(), 10);
    for key in [
        "shoulder_width_cm",
        "chest_approximation_cm",
        "right_sleeve_length_cm",
        "left_sleeve_length_cm",
        "right_arm_length_cm",
        "left_arm_length_cm",
        "torso_length_cm",
        "hip_width_cm",
        "inseam_length_cm",
        "height_cm",
    ] {
        assert!(report.contains_key(key), "missing key {}", key);
        assert!(report[key].as_f64().unwrap() >= 0.0);
    }
}

#[tokio::test]
async fn calibrated_height_scales_nose_to_ankle_distance() {
    let app = app_with(vec![standing_landmarks()]);

    let (_, body) = app.handle_pose_detection(png_upload()).await;
    let report = body.data.unwrap();

    // nose at origin, right ankle 1.7 m below: 1.7 * 100 * 1.19
    let nose_to_ankle = (0.12f32 * 0.12 + 1.7 * 1.7).sqrt();
    let expected = nose_to_ankle * 100.0 * 1.19;
    assert!((report.height_cm - expected).abs() < 1e-2);
    assert_eq!(report.shoulder_width_cm, report.chest_approximation_cm);
}

#[tokio::test]
async fn repeated_requests_are_deterministic() {
    let app = app_with(vec![standing_landmarks()]);

    let (_, first) = app.handle_pose_detection(png_upload()).await;
    let (_, second) = app.handle_pose_detection(png_upload()).await;

    assert_eq!(first.data.unwrap(), second.data.unwrap());
}

#[tokio::test]
async fn concurrent_requests_share_one_landmarker() {
    let app = Arc::new(app_with(vec![standing_landmarks()]));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.handle_pose_detection(png_upload()).await
        }));
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, 200);
        assert!(body.success);
    }
}
