pub mod constants;
pub mod face_image;
pub mod model_resolver;
pub mod recognition_config;
