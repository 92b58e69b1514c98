//! OCR fallback: `pdftoppm` renders each page to PNG, `tesseract` reads each image.
//!
//! Requires poppler-utils and tesseract-ocr on the host. CPU-bound and slow
//! (seconds per page at 300 dpi).

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use super::{ExtractionError, OcrEngine};
use crate::config::OcrConfig;

#[derive(Debug, Clone)]
pub struct TesseractCliOcr {
    pdftoppm_path: String,
    tesseract_path: String,
    language: String,
    dpi: u32,
}

impl TesseractCliOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            pdftoppm_path: config.pdftoppm_path.clone(),
            tesseract_path: config.tesseract_path.clone(),
            language: config.language.clone(),
            dpi: config.dpi,
        }
    }

    /// Renders every page into `dir`, returning the images in page order.
    fn render_pages(&self, pdf_path: &Path, dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let output = Command::new(&self.pdftoppm_path)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(dir.join("page"))
            .output()
            .map_err(|e| ExtractionError::Ocr(format!("Failed to run pdftoppm: {e}")))?;
        ensure_success("pdftoppm", &output)?;

        // pdftoppm zero-pads page numbers, so lexical order is page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(ExtractionError::Ocr("pdftoppm produced no images".to_string()));
        }
        Ok(images)
    }

    fn recognize_image(&self, image: &Path, page_num: usize) -> Result<String, ExtractionError> {
        let output = Command::new(&self.tesseract_path)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                ExtractionError::Ocr(format!("Failed to run tesseract on page {page_num}: {e}"))
            })?;
        ensure_success("tesseract", &output)?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractCliOcr {
    fn name(&self) -> &'static str {
        "pdftoppm+tesseract"
    }

    fn is_available(&self) -> bool {
        let pdftoppm = Command::new(&self.pdftoppm_path).arg("-v").output().is_ok();
        let tesseract = Command::new(&self.tesseract_path)
            .arg("--version")
            .output()
            .is_ok();

        if !pdftoppm {
            debug!("pdftoppm not found at '{}'", self.pdftoppm_path);
        }
        if !tesseract {
            debug!("tesseract not found at '{}'", self.tesseract_path);
        }
        pdftoppm && tesseract
    }

    fn recognize_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let workdir = tempfile::tempdir()?;
        let pdf_path = workdir.path().join("resume.pdf");
        std::fs::write(&pdf_path, pdf_bytes)?;

        let images_dir = workdir.path().join("pages");
        std::fs::create_dir(&images_dir)?;

        let images = self.render_pages(&pdf_path, &images_dir)?;
        info!(
            "Rendered {} pages at {} dpi, running OCR (lang={})",
            images.len(),
            self.dpi,
            self.language
        );

        images
            .iter()
            .enumerate()
            .map(|(i, image)| self.recognize_image(image, i + 1))
            .collect()
    }
}

fn ensure_success(tool: &str, output: &Output) -> Result<(), ExtractionError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ExtractionError::Ocr(format!(
        "{tool} exited with {}: {}",
        output.status,
        stderr.trim()
    )))
}
