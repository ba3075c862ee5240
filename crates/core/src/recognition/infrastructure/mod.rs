mod features_file;
mod names_file;
pub mod onnx_sface_extractor;
pub mod signature_codec;
