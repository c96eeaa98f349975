//! Gallery routes
//!
//! Listing, upload, and deletion of stored images.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::db::{ImageRepository, ImageSummary};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::upload;

/// Create the images router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images).post(upload::upload_image))
        .route("/:id", delete(delete_image))
}

/// Gallery listing, newest first
///
/// GET /api/v1/images
async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageSummary>>> {
    let listing = ImageRepository::new(state.db()).list().await?;
    Ok(Json(listing))
}

/// Delete an image record and its stored bytes
///
/// DELETE /api/v1/images/:id
async fn delete_image(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let repo = ImageRepository::new(state.db());

    let record = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))?;

    repo.delete(id).await?;

    // The record is authoritative; bytes already gone is only worth a log line.
    match state.store().delete(&record.internal_filename).await {
        Ok(true) => tracing::info!(id, file = %record.internal_filename, "Deleted image"),
        Ok(false) => {
            tracing::warn!(id, file = %record.internal_filename, "File already missing on disk")
        }
        Err(e) => tracing::error!(id, "Failed to delete stored file: {}", e),
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum_test::TestServer;

    async fn test_server() -> (TestServer, AppState) {
        let state = test_state(Vec::new()).await;
        let app = Router::new()
            .nest("/api/v1/images", router())
            .with_state(state.clone());
        (TestServer::new(app).unwrap(), state)
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let (server, state) = test_server().await;
        let repo = ImageRepository::new(state.db());
        repo.insert("a.png", "a.png", "", "[]").await.unwrap();
        repo.insert("b.png", "b.png", "", "[]").await.unwrap();

        let response = server.get("/api/v1/images").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body[0]["displayName"], "b.png");
        assert_eq!(body[1]["displayName"], "a.png");
    }

    #[tokio::test]
    async fn delete_removes_record_and_bytes() {
        let (server, state) = test_server().await;
        let repo = ImageRepository::new(state.db());
        let id = repo.insert("a.png", "a.png", "", "[]").await.unwrap();
        state.store().put("a.png", b"bytes").await.unwrap();

        let response = server.delete(&format!("/api/v1/images/{}", id)).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(!state.store().exists("a.png").await.unwrap());
    }

    #[tokio::test]
    async fn delete_tolerates_missing_file() {
        let (server, state) = test_server().await;
        let repo = ImageRepository::new(state.db());
        let id = repo.insert("a.png", "a.png", "", "[]").await.unwrap();

        let response = server.delete(&format!("/api/v1/images/{}", id)).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (server, _state) = test_server().await;
        let response = server.delete("/api/v1/images/42").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn upload_runs_ocr_and_persists() {
        use axum_test::multipart::{MultipartForm, Part};
        use crate::ocr::TextRegion;

        let regions = vec![
            TextRegion::from_rect(10.0, 10.0, 80.0, 20.0, "Hello".to_string(), 93.0),
            TextRegion::from_rect(100.0, 10.0, 80.0, 20.0, "World".to_string(), 91.0),
        ];
        let state = test_state(regions).await;
        let app = Router::new()
            .nest("/api/v1/images", router())
            .with_state(state.clone());
        let server = TestServer::new(app).unwrap();

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(tiny_png()).file_name("greeting.png").mime_type("image/png"),
        );

        let response = server.post("/api/v1/images").multipart(form).await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["wordCount"], 2);

        let id = body["id"].as_i64().unwrap();
        let record = ImageRepository::new(state.db())
            .get(id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.full_text.as_deref(), Some("hello world"));
        assert!(state.store().exists("greeting.png").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_unless_copying() {
        use axum_test::multipart::{MultipartForm, Part};

        let (server, _state) = test_server().await;

        let upload = |name: &'static str| {
            MultipartForm::new().add_part(
                "file",
                Part::bytes(tiny_png()).file_name(name).mime_type("image/png"),
            )
        };

        let first = server.post("/api/v1/images").multipart(upload("dup.png")).await;
        first.assert_status(axum::http::StatusCode::CREATED);

        let second = server.post("/api/v1/images").multipart(upload("dup.png")).await;
        second.assert_status(axum::http::StatusCode::CONFLICT);

        let copy = server
            .post("/api/v1/images")
            .add_query_param("action", "new_copy")
            .multipart(upload("dup.png"))
            .await;
        copy.assert_status(axum::http::StatusCode::CREATED);

        let body: serde_json::Value = copy.json();
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["internalFilename"], format!("dup_{}.png", id));
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        use axum_test::multipart::{MultipartForm, Part};

        let (server, _state) = test_server().await;
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(tiny_png()).file_name("anim.gif").mime_type("image/gif"),
        );

        let response = server.post("/api/v1/images").multipart(form).await;
        response.assert_status_bad_request();
    }

    /// A real 2x2 PNG so the decode-validation step passes
    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }
}
