//! Shared test fixtures

use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::ocr::{MockEngine, TextRegion};
use crate::state::AppState;
use crate::storage::ImageStore;

/// Build an `AppState` over throwaway storage with a mock OCR engine
/// that recognizes the given regions.
pub async fn test_state(regions: Vec<TextRegion>) -> AppState {
    // into_path keeps the directory on disk for the life of the test run
    let data_dir = tempfile::tempdir().unwrap().into_path();

    let store = ImageStore::open(&data_dir).await.unwrap();
    let pool = db::create_pool(&format!("sqlite:{}/glimpse.db", data_dir.display()))
        .await
        .unwrap();
    let ocr = Arc::new(MockEngine {
        regions,
        available: true,
    });

    AppState::new(Config::default(), store, pool, ocr)
}
