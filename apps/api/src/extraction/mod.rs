//! Resume text extraction: PDF text layer first, OCR of rendered pages as fallback.
//!
//! Both backends are traits so `AppState` can hold `Arc<dyn ...>` and tests can
//! substitute stubs. Everything here is blocking; async callers must run
//! `TextExtractor::extract` inside `tokio::task::spawn_blocking`.

pub mod ocr;
pub mod pdf;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use ocr::TesseractCliOcr;
pub use pdf::PdfTextLayer;

/// A PDF header must start within this many bytes.
const PDF_HEADER_WINDOW: usize = 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("The uploaded file is not a PDF document")]
    NotPdf,

    #[error("The PDF text layer could not be read: {0}")]
    TextLayer(String),

    #[error("No text layer found and OCR is unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("No text could be extracted from the resume. Check the file or upload a text-based PDF")]
    NoText,

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Which path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    TextLayer,
    Ocr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Whitespace-trimmed, never empty.
    pub text: String,
    pub method: ExtractionMethod,
}

/// Direct extraction of embedded text.
pub trait TextLayer: Send + Sync {
    /// Text of all pages, concatenated in page order.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Optical character recognition over rendered pages.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the engine's tooling can be invoked at all.
    fn is_available(&self) -> bool;

    /// Recognized text, one entry per page, in page order.
    fn recognize_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

#[derive(Clone)]
pub struct TextExtractor {
    text_layer: Arc<dyn TextLayer>,
    ocr: Arc<dyn OcrEngine>,
    /// Probed once at construction; the tooling is not re-checked per request.
    ocr_available: bool,
}

impl TextExtractor {
    pub fn new(text_layer: Arc<dyn TextLayer>, ocr: Arc<dyn OcrEngine>) -> Self {
        let ocr_available = ocr.is_available();
        Self {
            text_layer,
            ocr,
            ocr_available,
        }
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr_available
    }

    pub fn ocr_name(&self) -> &'static str {
        self.ocr.name()
    }

    /// Extracts resume text, trying the text layer once and OCR at most once.
    ///
    /// OCR runs when the text layer is blank or unreadable. Page texts are joined
    /// with a newline after each page.
    pub fn extract(&self, pdf_bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        if !looks_like_pdf(pdf_bytes) {
            return Err(ExtractionError::NotPdf);
        }

        let text_layer_error = match self.text_layer.extract_text(pdf_bytes) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Text layer produced {} chars", text.len());
                return Ok(ExtractedText {
                    text: text.trim().to_string(),
                    method: ExtractionMethod::TextLayer,
                });
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Text layer extraction failed: {e}");
                Some(e)
            }
        };

        info!("No text detected. Attempting OCR ({})", self.ocr.name());

        if !self.ocr_available {
            let reason = format!("{} tooling not found", self.ocr.name());
            return Err(match text_layer_error {
                Some(e) => ExtractionError::TextLayer(format!("{e}; OCR fallback: {reason}")),
                None => ExtractionError::OcrUnavailable(reason),
            });
        }

        let pages = self.ocr.recognize_pages(pdf_bytes)?;
        let mut text = String::new();
        for page in &pages {
            text.push_str(page);
            text.push('\n');
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::NoText);
        }

        info!("OCR recovered {} chars from {} pages", trimmed.len(), pages.len());
        Ok(ExtractedText {
            text: trimmed.to_string(),
            method: ExtractionMethod::Ocr,
        })
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}
