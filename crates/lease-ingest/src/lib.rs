//! Document ingestion: kind detection, PDF rasterization, and OCR.
//!
//! The rasterizer and OCR engine are external collaborators behind traits.
//! The shipped implementations shell out to poppler's `pdftoppm` and to
//! `tesseract`; tests substitute stubs.

mod error;
mod kind;
mod ocr;
mod rasterize;

pub use error::IngestError;
pub use kind::{detect_kind, DocumentKind};
pub use ocr::{OcrEngine, TesseractOcr};
pub use rasterize::{PopplerRasterizer, Rasterizer};
