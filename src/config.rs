//! Configuration management for the Glimpse server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the uploaded image bytes
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub backend: OcrBackend,
    /// Language passed to the engine (Tesseract language code)
    pub language: String,
    /// Endpoint for the remote backend
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    Tesseract,
    Remote,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                data_dir: "./uploads".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite:./glimpse.db".to_string(),
            },
            ocr: OcrConfig {
                backend: OcrBackend::Tesseract,
                language: "eng".to_string(),
                remote_url: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:./glimpse.db".to_string()),
            },
            ocr: OcrConfig {
                backend: match env::var("OCR_BACKEND")
                    .unwrap_or_else(|_| "tesseract".to_string())
                    .as_str()
                {
                    "remote" => OcrBackend::Remote,
                    _ => OcrBackend::Tesseract,
                },
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                remote_url: env::var("OCR_REMOTE_URL").ok(),
            },
        })
    }
}
