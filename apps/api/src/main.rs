mod analysis;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::{AtsAnalyzer, Lexicon};
use crate::config::Config;
use crate::extraction::{PdfTextLayer, TesseractCliOcr, TextExtractor};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Ensure stop-word resources are present before the first request
    let lexicon = Arc::new(Lexicon::load(config.stop_words_path.as_deref())?);
    let analyzer = Arc::new(AtsAnalyzer::new(lexicon, config.keyword_top_n));
    info!("Analyzer ready (top {} keywords)", config.keyword_top_n);

    // Text layer first, pdftoppm + tesseract as the scanned-PDF fallback
    let ocr = Arc::new(TesseractCliOcr::new(&config.ocr));
    let extractor = TextExtractor::new(Arc::new(PdfTextLayer), ocr);
    if extractor.ocr_available() {
        info!(
            "OCR fallback enabled ({}, lang={})",
            extractor.ocr_name(),
            config.ocr.language
        );
    } else {
        warn!("OCR tooling not found; image-only PDFs will fail extraction");
    }

    let state = AppState {
        config: config.clone(),
        analyzer,
        extractor,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
