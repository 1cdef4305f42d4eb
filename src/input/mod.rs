//! Input processing module
//! Handles file detection, text extraction, and locating uploads

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{InputManager, ResumeUpload};
pub use text_extractor::{DocumentExtractor, UploadExtractor};
