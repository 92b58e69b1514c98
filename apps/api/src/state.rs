use std::sync::Arc;

use crate::analysis::AtsAnalyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<AtsAnalyzer>,
    /// Text layer + OCR fallback. Backends are swappable for tests.
    pub extractor: TextExtractor,
}
