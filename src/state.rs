//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::ocr::OcrEngine;
use crate::storage::ImageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: ImageStore,
    db: SqlitePool,
    // Built once at startup; engines can be expensive to initialize and
    // are reused across all requests.
    ocr: Arc<dyn OcrEngine>,
}

impl AppState {
    pub fn new(config: Config, store: ImageStore, db: SqlitePool, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                db,
                ocr,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the image store
    pub fn store(&self) -> &ImageStore {
        &self.inner.store
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the OCR engine
    pub fn ocr(&self) -> &Arc<dyn OcrEngine> {
        &self.inner.ocr
    }
}
