//! OCR aggregation across page images, backed by `tesseract`.

use std::path::{Path, PathBuf};
use std::process::Command;

use lease_types::{OcrLine, OcrOutput};
use tracing::info;

use crate::error::IngestError;

/// Runs OCR across an ordered list of page images.
pub trait OcrEngine: Send + Sync {
    fn recognize_images(&self, images: &[PathBuf]) -> Result<OcrOutput, IngestError>;
}

/// Shells out to the `tesseract` binary and parses its TSV output, which
/// carries per-word confidences we fold into line confidences.
pub struct TesseractOcr {
    language: String,
}

impl TesseractOcr {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<Vec<OcrLine>, IngestError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language, "tsv"])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(IngestError::CommandFailed(format!(
                    "tesseract failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IngestError::ToolMissing(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(IngestError::Io(e)),
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_images(&self, images: &[PathBuf]) -> Result<OcrOutput, IngestError> {
        let mut lines = Vec::new();
        for image in images {
            lines.extend(self.run_tesseract(image)?);
        }

        let full_text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "OCR extracted {} line(s) across {} page(s)",
            lines.len(),
            images.len()
        );

        Ok(OcrOutput {
            full_text,
            lines,
            page_count: images.len() as u32,
        })
    }
}

/// Fold tesseract's word-level TSV rows into lines with mean confidence.
///
/// TSV columns: level page block par line word left top width height conf
/// text. Word rows have level 5; conf is 0-100, or -1 for layout rows.
fn parse_tsv(tsv: &str) -> Vec<OcrLine> {
    let mut lines = Vec::new();
    let mut current_key: Option<(u32, u32, u32)> = None;
    let mut words: Vec<String> = Vec::new();
    let mut confs: Vec<f64> = Vec::new();

    let flush = |words: &mut Vec<String>, confs: &mut Vec<f64>, lines: &mut Vec<OcrLine>| {
        if words.is_empty() {
            return;
        }
        let confidence = if confs.is_empty() {
            0.0
        } else {
            (confs.iter().sum::<f64>() / confs.len() as f64 / 100.0).clamp(0.0, 1.0)
        };
        lines.push(OcrLine {
            text: words.join(" "),
            confidence,
        });
        words.clear();
        confs.clear();
    };

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        if current_key != Some(key) {
            flush(&mut words, &mut confs, &mut lines);
            current_key = Some(key);
        }
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }
        words.push(text.to_string());
        if let Ok(conf) = cols[10].parse::<f64>() {
            if conf >= 0.0 {
                confs.push(conf);
            }
        }
    }
    flush(&mut words, &mut confs, &mut lines);

    lines
}
