//! OCR Module
//!
//! Turns raw image bytes into recognized text regions with pixel
//! coordinates. Backends:
//! - Tesseract (local, shells out to the `tesseract` binary)
//! - Remote (HTTP service speaking a small JSON protocol)
//!
//! The engine is built once at startup from configuration and held in
//! the application state for the life of the process; it is never
//! re-instantiated per request.

mod engine;
mod tesseract;
mod types;

pub use engine::{build_engine, OcrEngine, RemoteEngine};
pub use tesseract::TesseractEngine;
pub use types::{OcrError, TextRegion};

#[cfg(test)]
pub use engine::MockEngine;
