//! Stop-word lexicon used by the keyword ranker.
//!
//! Loaded once at startup via `Lexicon::load` and shared read-only through `AppState`.
//! Loading is idempotent: the same inputs always produce the same lexicon.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Standard English stop-word list.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

#[derive(Debug, Clone)]
pub struct Lexicon {
    stop_words: HashSet<String>,
}

impl Lexicon {
    /// The built-in English lexicon with no additions.
    pub fn english() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Builds the lexicon, merging an optional extra stop-word file (one word per line,
    /// `#` starts a comment). Fails only if the file is configured but unreadable.
    pub fn load(extra_stop_words: Option<&Path>) -> Result<Self> {
        let mut lexicon = Self::english();

        if let Some(path) = extra_stop_words {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stop-word file {}", path.display()))?;
            let added = lexicon.extend_from_lines(&contents);
            info!("Loaded {added} extra stop words from {}", path.display());
        }

        info!("Lexicon ready ({} stop words)", lexicon.len());
        Ok(lexicon)
    }

    fn extend_from_lines(&mut self, contents: &str) -> usize {
        let before = self.stop_words.len();
        for line in contents.lines() {
            let word = line.split('#').next().unwrap_or("").trim();
            if !word.is_empty() {
                self.stop_words.insert(word.to_lowercase());
            }
        }
        self.stop_words.len() - before
    }

    /// `word` must already be lower-cased.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}
