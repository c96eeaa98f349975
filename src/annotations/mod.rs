//! Word annotation model
//!
//! The stored shape of one OCR-recognized word: lowercase text plus the
//! pixel bounding box used for client-side highlighting.

mod types;

pub use types::{BoundingBox, WordAnnotation};
