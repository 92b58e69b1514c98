//! Text-layer extraction via pdf-extract.

use std::panic;

use tracing::debug;

use super::{ExtractionError, TextLayer};

/// Reads embedded text with pdf-extract. Pages come back concatenated in page order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextLayer;

impl TextLayer for PdfTextLayer {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed documents instead of returning Err.
        let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes));

        match outcome {
            Ok(Ok(text)) => {
                debug!("pdf-extract returned {} chars", text.len());
                Ok(text)
            }
            Ok(Err(e)) => Err(ExtractionError::TextLayer(e.to_string())),
            Err(_) => Err(ExtractionError::TextLayer(
                "PDF parser aborted on a malformed document".to_string(),
            )),
        }
    }
}
