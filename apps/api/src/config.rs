use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analysis::keywords::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upload limit for resume PDFs.
    pub max_upload_bytes: usize,
    /// Number of job-description keywords the scorer ranks.
    pub keyword_top_n: usize,
    pub extraction_timeout_secs: u64,
    pub ocr: OcrConfig,
    /// Extra stop words, one per line, merged into the built-in English list.
    pub stop_words_path: Option<PathBuf>,
}

/// Settings for the pdftoppm + tesseract OCR fallback.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub language: String,
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            dpi: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 2 * 1024 * 1024,
            keyword_top_n: DEFAULT_TOP_N,
            extraction_timeout_secs: 120,
            ocr: OcrConfig::default(),
            stop_words_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            keyword_top_n: parse_env("KEYWORD_TOP_N", defaults.keyword_top_n)?,
            extraction_timeout_secs: parse_env(
                "EXTRACTION_TIMEOUT_SECS",
                defaults.extraction_timeout_secs,
            )?,
            ocr: OcrConfig {
                pdftoppm_path: std::env::var("PDFTOPPM_PATH")
                    .unwrap_or(defaults.ocr.pdftoppm_path),
                tesseract_path: std::env::var("TESSERACT_PATH")
                    .unwrap_or(defaults.ocr.tesseract_path),
                language: std::env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                dpi: parse_env("OCR_DPI", defaults.ocr.dpi)?,
            },
            stop_words_path: std::env::var("STOP_WORDS_PATH").ok().map(PathBuf::from),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
