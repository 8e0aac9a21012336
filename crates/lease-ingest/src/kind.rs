//! Uploaded document kind detection.

use std::path::Path;

/// What the uploaded bytes turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Unsupported,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Detect the document kind from file content, falling back to the filename
/// extension when the magic bytes are inconclusive.
pub fn detect_kind(bytes: &[u8], filename: &str) -> DocumentKind {
    if bytes.starts_with(b"%PDF-") {
        return DocumentKind::Pdf;
    }
    if is_image_magic(bytes) {
        return DocumentKind::Image;
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("pdf") => DocumentKind::Pdf,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => DocumentKind::Image,
        _ => DocumentKind::Unsupported,
    }
}

fn is_image_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(b"\x89PNG\r\n\x1a\n")
        || bytes.starts_with(&[0xFF, 0xD8, 0xFF])          // JPEG
        || bytes.starts_with(b"II*\x00")                   // TIFF LE
        || bytes.starts_with(b"MM\x00*")                   // TIFF BE
        || bytes.starts_with(b"BM")                        // BMP
        || (bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
}
