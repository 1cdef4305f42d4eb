//! Input manager: locating uploads on disk and reading them

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{DocumentExtractor, UploadExtractor};
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// One uploaded file, as bytes, identified by its file name. A file that
/// could not be read carries the error instead and is skipped by the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub read_error: Option<String>,
}

impl ResumeUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            read_error: None,
        }
    }

    pub fn unreadable(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bytes: Vec::new(),
            read_error: Some(error.into()),
        }
    }
}

#[derive(Default)]
pub struct InputManager {
    extractor: UploadExtractor,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand files and directories into the supported files they name.
    /// Directory entries are taken in file-name order; explicit files keep
    /// the order given.
    pub async fn collect_paths(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for input in inputs {
            if !input.exists() {
                return Err(ScreenerError::InvalidInput(format!(
                    "File does not exist: {}",
                    input.display()
                )));
            }

            if input.is_dir() {
                let mut entries = Vec::new();
                let mut dir = fs::read_dir(input).await?;
                while let Some(entry) = dir.next_entry().await? {
                    let path = entry.path();
                    if path.is_file() && FileType::from_path(&path).is_supported() {
                        entries.push(path);
                    }
                }
                entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
                info!("Found {} resume files in {}", entries.len(), input.display());
                paths.extend(entries);
            } else {
                paths.push(input.clone());
            }
        }

        Ok(paths)
    }

    /// Read files as uploads without extracting them. Read and extraction
    /// failures both belong to the screening run, so one unreadable file
    /// never stops the batch.
    pub async fn read_uploads(&self, paths: &[PathBuf]) -> Vec<ResumeUpload> {
        let mut uploads = Vec::with_capacity(paths.len());
        for path in paths {
            let upload = match fs::read(path).await {
                Ok(bytes) => ResumeUpload::new(display_name(path), bytes),
                Err(e) => {
                    warn!("Could not read {}: {}", path.display(), e);
                    ResumeUpload::unreadable(display_name(path), format!("failed to read file: {}", e))
                }
            };
            uploads.push(upload);
        }
        uploads
    }

    /// Read and extract a single document, e.g. the job description.
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if !file_type.is_supported() {
            return Err(ScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        info!("Extracting {:?} text from: {}", file_type, path.display());
        let bytes = fs::read(path).await?;
        self.extractor.extract(&display_name(path), &bytes)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_directories_expand_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), "B").unwrap();
        std::fs::write(temp_dir.path().join("a.md"), "A").unwrap();
        std::fs::write(temp_dir.path().join("c.docx"), "C").unwrap();
        let extra = temp_dir.path().join("a.md");

        let manager = InputManager::new();
        let paths = manager
            .collect_paths(&[temp_dir.path().to_path_buf(), extra])
            .await
            .unwrap();

        let names: Vec<String> = paths.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.md", "b.txt", "a.md"]);
    }

    #[tokio::test]
    async fn test_missing_input_is_rejected() {
        let manager = InputManager::new();
        let result = manager.collect_paths(&[PathBuf::from("no/such/dir")]).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_read_uploads_and_extract_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("job.txt");
        std::fs::write(&path, "Rust engineer").unwrap();

        let manager = InputManager::new();
        let uploads = manager.read_uploads(&[path.clone()]).await;

        assert_eq!(uploads, vec![ResumeUpload::new("job.txt", "Rust engineer")]);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Rust engineer");
    }

    #[tokio::test]
    async fn test_unreadable_file_becomes_failed_upload() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("a.txt");
        std::fs::write(&present, "Alice").unwrap();
        let vanished = temp_dir.path().join("gone.txt");

        let manager = InputManager::new();
        let uploads = manager.read_uploads(&[present, vanished]).await;

        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].read_error, None);
        assert_eq!(uploads[1].filename, "gone.txt");
        assert!(uploads[1].read_error.as_deref().unwrap().starts_with("failed to read file"));
        assert!(uploads[1].bytes.is_empty());
    }
}
