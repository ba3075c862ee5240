use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use facekeeper_core::notification::domain::notification_sink::NotificationSink;
use facekeeper_core::pipeline::engine_error::EngineError;
use facekeeper_core::pipeline::greet_use_case::GreetUseCase;
use facekeeper_core::pipeline::identity_engine::IdentityEngine;
use facekeeper_core::preprocessing::CanonicalImage;
use facekeeper_core::recognition::domain::embedding_extractor::{
    EmbeddingExtractor, ExtractionError,
};
use facekeeper_core::recognition::domain::match_verdict::MatchVerdict;
use facekeeper_core::recognition::infrastructure::signature_codec::{
    artifact_paths, PersistenceError,
};
use facekeeper_core::shared::face_image::FaceImage;
use facekeeper_core::shared::recognition_config::RecognitionConfig;
use tempfile::TempDir;

/// Mean intensity of each image quadrant (TL, TR, BL, BR).
struct QuadrantExtractor;

impl EmbeddingExtractor for QuadrantExtractor {
    fn extract(&mut self, image: &CanonicalImage) -> Result<Vec<f32>, ExtractionError> {
        let pixels = image.as_ndarray();
        let half = image.size() as usize / 2;
        let mut sums = [0f32; 4];
        for ((y, x, _), &v) in pixels.indexed_iter() {
            let quadrant = usize::from(y >= half) * 2 + usize::from(x >= half);
            sums[quadrant] += v;
        }
        let count = (half * half * 3) as f32;
        Ok(sums.iter().map(|s| s / count).collect())
    }
}

struct RecordingSink {
    delivered: Arc<Mutex<Vec<String>>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, identity: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.delivered.lock().unwrap().push(identity.to_string());
        Ok(())
    }
}

/// 40×40 grayscale face stand-in, bright wherever `bright(x, y)` holds.
fn pattern(bright: impl Fn(u32, u32) -> bool) -> FaceImage {
    let img = image::GrayImage::from_fn(40, 40, |x, y| {
        image::Luma([if bright(x, y) { 200 } else { 40 }])
    });
    FaceImage::from_luma(img)
}

fn alice() -> FaceImage {
    pattern(|x, _| x < 20)
}

fn bob() -> FaceImage {
    pattern(|_, y| y < 20)
}

fn stranger() -> FaceImage {
    pattern(|x, y| (x < 20) == (y < 20))
}

fn engine() -> IdentityEngine {
    let config = RecognitionConfig::new(0.9).unwrap();
    IdentityEngine::new(Box::new(QuadrantExtractor), config)
}

fn enrolled_engine() -> IdentityEngine {
    let mut engine = engine();
    engine.enroll_image("Alice", &alice()).unwrap();
    engine.enroll_image("Bob", &bob()).unwrap();
    engine
}

#[test]
fn recognizes_enrolled_faces_with_self_similarity() {
    let mut engine = enrolled_engine();

    let verdict = engine.recognize_image(&alice()).unwrap();
    assert_eq!(verdict.name(), Some("Alice"));
    approx::assert_abs_diff_eq!(verdict.score().unwrap(), 1.0, epsilon = 1e-6);

    assert_eq!(engine.recognize_image(&bob()).unwrap().name(), Some("Bob"));
}

#[test]
fn unknown_face_is_unrecognized() {
    let mut engine = enrolled_engine();
    let verdict = engine.recognize_image(&stranger()).unwrap();
    assert!(matches!(verdict, MatchVerdict::Unrecognized { best_score } if best_score < 0.9));
}

#[test]
fn empty_engine_reports_empty() {
    let mut engine = engine();
    assert_eq!(engine.recognize_image(&alice()).unwrap(), MatchVerdict::Empty);
}

#[test]
fn greets_recognized_faces_once_per_cooldown() {
    let mut engine = enrolled_engine();
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink {
        delivered: delivered.clone(),
    };
    let mut greeter = GreetUseCase::new(Box::new(sink), engine.config().cooldown());

    let t0 = Instant::now();
    let frames = [
        (alice(), 0),
        (alice(), 500),
        (stranger(), 600),
        (bob(), 700),
        (alice(), 10_000),
    ];
    for (image, offset_ms) in &frames {
        let verdict = engine.recognize_image(image).unwrap();
        greeter.handle(&verdict, t0 + Duration::from_millis(*offset_ms));
    }

    assert_eq!(*delivered.lock().unwrap(), vec!["Alice", "Bob", "Alice"]);
}

#[test]
fn saved_database_recognizes_after_reload() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("db").join("faces");
    enrolled_engine().save(&base).unwrap();

    let mut restored = engine();
    assert_eq!(restored.load(&base).unwrap(), 2);
    assert_eq!(restored.recognize_image(&bob()).unwrap().name(), Some("Bob"));
}

#[test]
fn inconsistent_database_leaves_engine_untouched() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("faces");
    enrolled_engine().save(&base).unwrap();
    let (names, _) = artifact_paths(&base);
    fs::write(&names, "Alice\n").unwrap();

    let mut engine = engine();
    engine.enroll_image("Carol", &stranger()).unwrap();
    let before = engine.store().clone();

    let err = engine.load(&base).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Persistence(PersistenceError::Inconsistent { names: 1, vectors: 2 })
    ));
    assert_eq!(engine.store(), &before);
}

#[test]
fn saving_empty_engine_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("faces");

    let err = engine().save(&base).unwrap_err();
    assert!(matches!(err, EngineError::Persistence(PersistenceError::EmptyStore)));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn names_from_another_save_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("faces");
    let other = tmp.path().join("other");
    enrolled_engine().save(&base).unwrap();

    let mut renamed = engine();
    renamed.enroll_image("Bobby", &bob()).unwrap();
    renamed.enroll_image("Alicia", &alice()).unwrap();
    renamed.save(&other).unwrap();
    fs::copy(artifact_paths(&other).0, artifact_paths(&base).0).unwrap();

    let mut engine = enrolled_engine();
    let before = engine.store().clone();
    let err = engine.load(&base).unwrap_err();
    assert!(matches!(err, EngineError::Persistence(PersistenceError::Unpaired)));
    assert_eq!(engine.store(), &before);
}
