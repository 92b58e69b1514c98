// ATS analysis engine: keyword ranking, section detection, weighted scoring, export.
// Pure and synchronous; HTTP handlers run it inside spawn_blocking.

pub mod export;
pub mod handlers;
pub mod keywords;
pub mod lexicon;
pub mod scorer;
pub mod sections;

// Re-export the public API consumed by other modules (state, main, handlers).
pub use lexicon::Lexicon;
pub use scorer::{AnalysisReport, AtsAnalyzer};
