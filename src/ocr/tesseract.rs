//! Tesseract OCR backend
//!
//! Shells out to the `tesseract` binary and reads word-level boxes from
//! its TSV output (level 5 rows).

use async_trait::async_trait;

use super::engine::OcrEngine;
use super::types::{OcrError, TextRegion};

pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        std::process::Command::new("tesseract")
            .arg("--version")
            .output()
            .is_ok()
    }

    async fn recognize(&self, image_data: &[u8]) -> Result<Vec<TextRegion>, OcrError> {
        use std::process::Command;

        let temp_dir = std::env::temp_dir();
        let input_path = temp_dir.join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));
        let output_base = temp_dir.join(format!("ocr_output_{}", uuid::Uuid::new_v4()));

        std::fs::write(&input_path, image_data)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let output = Command::new("tesseract")
            .arg(&input_path)
            .arg(&output_base)
            .arg("-l")
            .arg(&self.language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .arg("tsv")
            .output()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)));

        let _ = std::fs::remove_file(&input_path);
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr
            )));
        }

        let tsv_path = format!("{}.tsv", output_base.display());
        let tsv = std::fs::read_to_string(&tsv_path)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to read output: {}", e)))?;
        let _ = std::fs::remove_file(&tsv_path);

        Ok(parse_tsv(&tsv))
    }
}

/// Parse tesseract TSV output into word regions.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Word rows have level 5 and a
/// non-negative confidence.
fn parse_tsv(tsv: &str) -> Vec<TextRegion> {
    let mut regions = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        if fields[0] != "5" {
            continue;
        }

        let (Ok(left), Ok(top), Ok(width), Ok(height), Ok(conf)) = (
            fields[6].parse::<f32>(),
            fields[7].parse::<f32>(),
            fields[8].parse::<f32>(),
            fields[9].parse::<f32>(),
            fields[10].parse::<f32>(),
        ) else {
            continue;
        };

        let text = fields[11].trim();
        if conf < 0.0 || text.is_empty() {
            continue;
        }

        regions.push(TextRegion::from_rect(
            left,
            top,
            width,
            height,
            text.to_string(),
            conf,
        ));
    }

    regions
}
