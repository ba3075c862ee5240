pub const SFACE_MODEL_NAME: &str = "face_recognition_sface_2021dec.onnx";
pub const SFACE_MODEL_URL: &str =
    "https://github.com/opencv/opencv_zoo/raw/main/models/face_recognition_sface/face_recognition_sface_2021dec.onnx";

/// Side length of the canonical image handed to the embedding extractor.
pub const CANONICAL_SIZE: u32 = 224;

pub const DEFAULT_COOLDOWN_MS: u64 = 10_000;

pub const NAMES_EXTENSION: &str = "names";
pub const FEATURES_EXTENSION: &str = "features";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
