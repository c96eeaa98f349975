//! OCR Types

use serde::{Deserialize, Serialize};

use crate::annotations::{BoundingBox, WordAnnotation};

/// One recognized text region.
///
/// `quad` holds the region's corner points in pixel space, clockwise
/// from the top-left. Engines that only produce axis-aligned boxes fill
/// in a degenerate quad via [`TextRegion::from_rect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    pub quad: [[f32; 2]; 4],
    pub text: String,
    /// Engine-reported confidence (0-100)
    pub confidence: f32,
}

impl TextRegion {
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32, text: String, confidence: f32) -> Self {
        Self {
            quad: [
                [x, y],
                [x + width, y],
                [x + width, y + height],
                [x, y + height],
            ],
            text,
            confidence,
        }
    }

    /// Axis-aligned pixel box from the top-left and bottom-right corners.
    pub fn bounding_box(&self) -> BoundingBox {
        let [tl_x, tl_y] = self.quad[0];
        let [br_x, br_y] = self.quad[2];
        BoundingBox::new(
            tl_x as i32,
            tl_y as i32,
            (br_x - tl_x) as i32,
            (br_y - tl_y) as i32,
        )
    }

    /// The stored annotation for this region (text lowercased there).
    pub fn annotation(&self) -> WordAnnotation {
        WordAnnotation::new(self.text.clone(), self.bounding_box())
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("OCR API error: {0}")]
    ApiError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::EngineNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            Self::ProcessingError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_collapses_to_corner_box() {
        let region = TextRegion {
            quad: [[10.0, 20.0], [110.0, 22.0], [112.0, 52.0], [11.0, 50.0]],
            text: "Total".to_string(),
            confidence: 91.0,
        };

        let bbox = region.bounding_box();
        assert_eq!(bbox.x, 10);
        assert_eq!(bbox.y, 20);
        assert_eq!(bbox.width, 102);
        assert_eq!(bbox.height, 32);
    }

    #[test]
    fn annotation_lowercases_text() {
        let region = TextRegion::from_rect(0.0, 0.0, 50.0, 20.0, "Invoice".to_string(), 80.0);
        assert_eq!(region.annotation().text, "invoice");
    }
}
