//! PDF rasterization via poppler's `pdftoppm`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::IngestError;
use crate::kind::{detect_kind, DocumentKind};

/// Converts an uploaded PDF into one ordered image per page.
pub trait Rasterizer: Send + Sync {
    fn is_pdf(&self, path: &Path) -> bool;
    fn is_image(&self, path: &Path) -> bool;

    /// Rasterize every page of `pdf_path` into `out_dir`, returning page
    /// images in page order. `out_dir` must be reserved for rendered pages;
    /// implementations may discover their output by file name.
    fn pdf_to_images(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, IngestError>;
}

/// Shells out to `pdftoppm` (poppler-utils).
pub struct PopplerRasterizer {
    /// Render resolution in DPI. 300 is the usual OCR sweet spot.
    dpi: u32,
}

impl PopplerRasterizer {
    pub fn new() -> Self {
        Self { dpi: 300 }
    }

    fn sniff(&self, path: &Path) -> DocumentKind {
        let mut header = [0u8; 16];
        let n = fs::File::open(path)
            .and_then(|mut f| std::io::Read::read(&mut f, &mut header))
            .unwrap_or(0);
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        detect_kind(&header[..n], name)
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for PopplerRasterizer {
    fn is_pdf(&self, path: &Path) -> bool {
        self.sniff(path) == DocumentKind::Pdf
    }

    fn is_image(&self, path: &Path) -> bool {
        self.sniff(path) == DocumentKind::Image
    }

    fn pdf_to_images(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
        let output_prefix = out_dir.join("page");

        let status = Command::new("pdftoppm")
            .args(["-png", "-r", &self.dpi.to_string()])
            .arg(pdf_path)
            .arg(&output_prefix)
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(_) => {
                return Err(IngestError::CommandFailed(
                    "pdftoppm failed to convert PDF".to_string(),
                ))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IngestError::ToolMissing(
                    "pdftoppm not found (install poppler-utils)".to_string(),
                ))
            }
            Err(e) => return Err(IngestError::Io(e)),
        }

        // pdftoppm names files page-1.png, page-01.png, ... depending on the
        // page count; lexicographic sort of the zero-padded names is page
        // order.
        let mut pages: Vec<PathBuf> = fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension().and_then(|e| e.to_str()) == Some("png")
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("page-"))
            })
            .collect();
        pages.sort();

        info!("rasterized {} page(s) from {}", pages.len(), pdf_path.display());
        Ok(pages)
    }
}
