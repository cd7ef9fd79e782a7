//! Menu image upload helpers
//!
//! Images are validated, then stored once under the uploads dir with a
//! content-hash filename.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::utils::{AppError, ErrorCode};

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Public URL prefix of the uploads dir
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Image part of a menu form
#[derive(Debug)]
pub struct ImageField {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Extension from the file name, else from the declared content type
fn resolve_extension(field: &ImageField) -> Result<String, AppError> {
    let from_name = field
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    if let Some(ext) = from_name {
        return Ok(ext);
    }

    field
        .content_type
        .as_deref()
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| exts.iter().find(|e| SUPPORTED_FORMATS.contains(*e)))
        .map(|e| e.to_string())
        .ok_or_else(|| AppError::new(ErrorCode::NoFilename))
}

/// Validate image file
fn validate_image(data: &[u8], ext: &str, max_size: usize) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > max_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {} bytes ({}MB)", max_size, max_size / 1024 / 1024),
        ));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported file format '{}'. Supported: {}", ext, SUPPORTED_FORMATS.join(", ")),
        ));
    }

    // Verify it's actually an image by trying to load it
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext}): {e}"),
        ));
    }

    Ok(())
}

/// Validate and store an uploaded image, returning its public path
/// (`/uploads/<sha256>.<ext>`). Identical content is stored once.
pub async fn store_image(uploads_dir: &Path, field: ImageField, max_size: usize) -> Result<String, AppError> {
    let ext = resolve_extension(&field)?;
    validate_image(&field.data, &ext, max_size)?;

    let filename = format!("{}.{}", calculate_hash(&field.data), ext);
    let path: PathBuf = uploads_dir.join(&filename);

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::debug!(file = %filename, "Image already stored, reusing");
    } else {
        tokio::fs::create_dir_all(uploads_dir).await.map_err(|e| {
            AppError::with_message(ErrorCode::FileStorageFailed, format!("Failed to create uploads dir: {e}"))
        })?;
        tokio::fs::write(&path, &field.data).await.map_err(|e| {
            AppError::with_message(ErrorCode::FileStorageFailed, format!("Failed to save image: {e}"))
        })?;
        tracing::info!(file = %filename, size = field.data.len(), "Image stored");
    }

    Ok(format!("{UPLOADS_URL_PREFIX}/{filename}"))
}
