//! OCR Engines
//!
//! Defines the engine trait, the remote HTTP backend, and the
//! configuration-driven constructor used at startup.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{OcrBackend, OcrConfig};

use super::tesseract::TesseractEngine;
use super::types::{OcrError, TextRegion};

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Check if the engine can currently serve requests
    async fn is_available(&self) -> bool;

    /// Recognize text regions in raw image bytes
    async fn recognize(&self, image_data: &[u8]) -> Result<Vec<TextRegion>, OcrError>;
}

/// Build the process-wide engine from configuration.
///
/// Called once at startup; the returned handle lives in `AppState` for
/// the process lifetime.
pub fn build_engine(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    match config.backend {
        OcrBackend::Tesseract => Arc::new(TesseractEngine::new(&config.language)),
        OcrBackend::Remote => match config.remote_url.as_deref() {
            Some(url) => Arc::new(RemoteEngine::new(url, &config.language)),
            None => {
                tracing::warn!("OCR_BACKEND=remote but OCR_REMOTE_URL unset, using tesseract");
                Arc::new(TesseractEngine::new(&config.language))
            }
        },
    }
}

/// Remote OCR service backend
///
/// POSTs base64-encoded image bytes to `{base_url}/ocr` and expects a
/// JSON body of recognized regions back.
pub struct RemoteEngine {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RemoteOcrResponse {
    regions: Vec<TextRegion>,
}

impl RemoteEngine {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl OcrEngine for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8]) -> Result<Vec<TextRegion>, OcrError> {
        use base64::Engine;

        let url = format!("{}/ocr", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = serde_json::json!({
            "image": image_base64,
            "language": self.language,
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call OCR service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "OCR service returned {}: {}",
                status, body
            )));
        }

        let parsed: RemoteOcrResponse = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse OCR response: {}", e)))?;

        Ok(parsed.regions)
    }
}

/// Mock engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub regions: Vec<TextRegion>,
    pub available: bool,
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8]) -> Result<Vec<TextRegion>, OcrError> {
        if !self.available {
            return Err(OcrError::EngineNotAvailable("mock is offline".to_string()));
        }
        Ok(self.regions.clone())
    }
}
