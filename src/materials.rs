// ABOUTME: Client-side checks and progress tracking for course material uploads

use crate::config::MaterialsConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("File is empty: {0}")]
    Empty(PathBuf),

    #[error("File is {size} bytes, the limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("Files of type '{0}' cannot be uploaded")]
    UnsupportedType(String),

    #[error("Failed to inspect file: {0}")]
    Io(#[from] std::io::Error),
}

/// A file that passed client-side validation and is ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub title: String,
    pub size: u64,
    pub mime: &'static str,
}

/// Bytes handed to the transport so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn new(sent: u64, total: u64) -> Self {
        Self { sent, total }
    }

    /// Percentage in `0..=100`
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.sent.min(self.total).saturating_mul(100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }

    pub fn is_complete(&self) -> bool {
        self.sent >= self.total
    }
}

/// Validate a file for upload against the configured size and type limits
pub fn validate_material(
    path: &Path,
    title: Option<&str>,
    config: &MaterialsConfig,
) -> Result<MaterialUpload, MaterialError> {
    if !path.exists() {
        return Err(MaterialError::NotFound(path.to_path_buf()));
    }

    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(MaterialError::NotAFile(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !config.allowed_extensions.iter().any(|allowed| *allowed == extension) {
        let shown = if extension.is_empty() {
            "no extension".to_string()
        } else {
            extension
        };
        return Err(MaterialError::UnsupportedType(shown));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(MaterialError::Empty(path.to_path_buf()));
    }
    if size > config.max_upload_bytes {
        return Err(MaterialError::TooLarge {
            size,
            max: config.max_upload_bytes,
        });
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let title = match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone()),
    };

    Ok(MaterialUpload {
        path: path.to_path_buf(),
        file_name,
        title,
        size,
        mime: mime_for_extension(&extension),
    })
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
