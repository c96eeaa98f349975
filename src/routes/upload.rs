//! Upload handling
//!
//! Receives an image over multipart, validates and decodes it, runs the
//! OCR engine, stores the bytes, and records the recognized words.
//!
//! Duplicate display names are refused with 409 unless the client asks
//! for a copy (`?action=new_copy`), in which case a record id is
//! reserved first and the stored filename is derived from it.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::annotations::WordAnnotation;
use crate::db::ImageRepository;
use crate::ocr::TextRegion;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

// ============================================================================
// Error
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file part in request")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed: {0}")]
    InvalidFileType(String),

    #[error("Failed to read image file: {0}")]
    UnreadableImage(String),

    #[error("A file named '{0}' already exists")]
    DuplicateName(String),

    #[error("OCR failed to process image: {0}")]
    OcrFailed(#[from] crate::ocr::OcrError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Malformed multipart request: {0}")]
    Multipart(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // Record store failures keep their own response mapping
    #[error(transparent)]
    App(#[from] crate::error::AppError),
}

impl UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::EmptyFilename
            | Self::InvalidFileType(_)
            | Self::UnreadableImage(_)
            | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateName(_) => StatusCode::CONFLICT,
            Self::OcrFailed(e) => e.status_code(),
            Self::Storage(_) | Self::Internal(_) | Self::App(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> axum::response::Response {
        // Application errors already know their response shape
        let this = match self {
            UploadError::App(e) => return e.into_response(),
            other => other,
        };

        let status = this.status_code();
        let code = match &this {
            UploadError::MissingFile => "MISSING_FILE",
            UploadError::EmptyFilename => "EMPTY_FILENAME",
            UploadError::InvalidFileType(_) => "INVALID_FILE_TYPE",
            UploadError::UnreadableImage(_) => "UNREADABLE_IMAGE",
            UploadError::DuplicateName(_) => "DUPLICATE_NAME",
            UploadError::OcrFailed(_) => "OCR_FAILED",
            UploadError::Storage(_) => "STORAGE_ERROR",
            UploadError::Multipart(_) => "MALFORMED_MULTIPART",
            UploadError::Internal(_) => "INTERNAL_ERROR",
            UploadError::App(_) => unreachable!(),
        };

        let body = Json(ErrorResponse {
            error: this.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// `new_copy` stores a duplicate display name under a fresh id
    pub action: Option<String>,
}

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: i64,
    pub display_name: String,
    pub internal_filename: String,
    pub word_count: usize,
}

/// POST /api/v1/images
///
/// Multipart upload of one image under the `file` field.
pub async fn upload_image(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), UploadError> {
    let (display_name, data) = read_file_field(&mut multipart).await?;

    if display_name.is_empty() {
        return Err(UploadError::EmptyFilename);
    }
    let Some((stem, extension)) = split_allowed_name(&display_name) else {
        return Err(UploadError::InvalidFileType(display_name.clone()));
    };

    // Decode up front so undecodable uploads fail before OCR or storage
    // see any bytes.
    image::load_from_memory(&data).map_err(|e| UploadError::UnreadableImage(e.to_string()))?;

    let repo = ImageRepository::new(state.db());

    if params.action.as_deref() == Some("new_copy") {
        // Reserve the id first; the stored filename embeds it so copies
        // of the same display name never collide.
        let id = repo.insert_placeholder(&display_name).await?;
        let internal_filename = format!("{}_{}.{}", stem, id, extension);

        let processed = match process_image(&state, &internal_filename, &data).await {
            Ok(p) => p,
            Err(e) => {
                if let Err(rollback) = repo.delete(id).await {
                    tracing::error!(id, "Failed to roll back reserved record: {}", rollback);
                }
                return Err(e);
            }
        };

        repo.finalize(id, &internal_filename, &processed.full_text, &processed.words_json)
            .await?;

        tracing::info!(id, file = %display_name, "Stored image as new copy");

        Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                id,
                display_name,
                internal_filename,
                word_count: processed.word_count,
            }),
        ))
    } else {
        if repo.display_name_exists(&display_name).await? {
            return Err(UploadError::DuplicateName(display_name));
        }

        let internal_filename = display_name.clone();
        let processed = process_image(&state, &internal_filename, &data).await?;

        let id = repo
            .insert(&display_name, &internal_filename, &processed.full_text, &processed.words_json)
            .await?;

        tracing::info!(id, file = %display_name, words = processed.word_count, "Stored image");

        Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                id,
                display_name,
                internal_filename,
                word_count: processed.word_count,
            }),
        ))
    }
}

// ============================================================================
// Pipeline
// ============================================================================

struct ProcessedImage {
    full_text: String,
    words_json: String,
    word_count: usize,
}

/// Run OCR and persist the raw bytes.
///
/// Bytes are only written after the engine succeeds, so a failed OCR
/// pass leaves no orphaned object behind.
async fn process_image(
    state: &AppState,
    internal_filename: &str,
    data: &[u8],
) -> Result<ProcessedImage, UploadError> {
    let regions = state.ocr().recognize(data).await?;

    state.store().put(internal_filename, data).await?;

    let (full_text, words) = annotate(&regions);
    let words_json = serde_json::to_string(&words)
        .map_err(|e| UploadError::Internal(format!("Failed to encode word list: {}", e)))?;

    Ok(ProcessedImage {
        full_text,
        word_count: words.len(),
        words_json,
    })
}

/// Convert engine regions to stored form: space-joined lowercase full
/// text in engine order, plus the word annotations.
fn annotate(regions: &[TextRegion]) -> (String, Vec<WordAnnotation>) {
    let full_text = regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let words = regions.iter().map(TextRegion::annotation).collect();

    (full_text, words)
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
            return Ok((file_name, data.to_vec()));
        }
    }

    Err(UploadError::MissingFile)
}

/// Split `name.ext` when the extension is an allowed image type.
fn split_allowed_name(display_name: &str) -> Option<(&str, String)> {
    let (stem, extension) = display_name.rsplit_once('.')?;
    let extension = extension.to_lowercase();
    if stem.is_empty() || !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    Some((stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::BoundingBox;
    use crate::ocr::TextRegion;

    #[test]
    fn extension_allow_list() {
        assert!(split_allowed_name("photo.png").is_some());
        assert!(split_allowed_name("photo.JPG").is_some());
        assert!(split_allowed_name("archive.tar.webp").is_some());

        assert!(split_allowed_name("photo.gif").is_none());
        assert!(split_allowed_name("noextension").is_none());
        assert!(split_allowed_name(".png").is_none());
    }

    #[test]
    fn annotate_builds_full_text_in_engine_order() {
        let regions = vec![
            TextRegion::from_rect(0.0, 0.0, 60.0, 20.0, "Coffee".to_string(), 95.0),
            TextRegion::from_rect(0.0, 30.0, 50.0, 20.0, "TOTAL".to_string(), 90.0),
        ];

        let (full_text, words) = annotate(&regions);
        assert_eq!(full_text, "coffee total");
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "coffee");
        assert_eq!(words[0].bbox, BoundingBox::new(0, 0, 60, 20));
    }
}
