//! Annotation types

use serde::{Deserialize, Serialize};

/// Pixel-space bounding box, top-left origin.
///
/// Serialized as the 4-integer array `[x, y, w, h]`, which is the shape
/// persisted in each image record's word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// One recognized word with its highlight region.
///
/// Invariant: `text` is lowercased at construction, before it is ever
/// stored or matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAnnotation {
    pub text: String,
    pub bbox: BoundingBox,
}

impl WordAnnotation {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into().to_lowercase(),
            bbox,
        }
    }
}
