//! Keyword ranking. Tokenizes text and ranks significant words by frequency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::lexicon::Lexicon;

/// Default number of keywords ranked from a job description.
pub const DEFAULT_TOP_N: usize = 20;

/// Characters always split off as standalone punctuation.
const SPLIT_CHARS: &[char] = &[
    ';', '@', '#', '$', '%', '&', '?', '!', '(', ')', '[', ']', '{', '}', '<', '>', '"', '`',
    '*', '|',
];

/// Clitics split off the end of a word ("don't" -> "do" + "n't").
const CONTRACTION_SUFFIXES: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// A ranked keyword and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
}

/// Splits text into word tokens using Treebank-style rules.
///
/// Whitespace separates chunks; punctuation in `SPLIT_CHARS` is split off everywhere,
/// commas and colons unless they sit between two digits ("1,000", "10:30"), trailing
/// periods and quotes are stripped, and contractions are split from their stem.
/// Punctuation-only pieces are dropped since they can never rank as keywords.
/// Tokens keep internal punctuation ("node.js", "ci/cd"), so callers filter them.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        for piece in split_punctuation(chunk) {
            push_word(piece, &mut tokens);
        }
    }
    tokens
}

fn split_punctuation(chunk: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = chunk.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let is_separator = match c {
            ',' | ':' => {
                let prev_digit = i > 0 && chars[i - 1].1.is_ascii_digit();
                let next_digit = chars
                    .get(i + 1)
                    .is_some_and(|(_, next)| next.is_ascii_digit());
                !(prev_digit && next_digit)
            }
            _ => SPLIT_CHARS.contains(&c),
        };

        if is_separator {
            if start < pos {
                pieces.push(&chunk[start..pos]);
            }
            start = pos + c.len_utf8();
        }
    }

    if start < chunk.len() {
        pieces.push(&chunk[start..]);
    }
    pieces
}

fn push_word(piece: &str, tokens: &mut Vec<String>) {
    // A leading single quote stays attached, so "'quoted" never ranks.
    let word = piece.trim_end_matches(|c| c == '.' || c == '\'');

    if word.is_empty() {
        return;
    }

    for suffix in CONTRACTION_SUFFIXES {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            tokens.push(word[..word.len() - suffix.len()].to_string());
            return;
        }
    }

    tokens.push(word.to_string());
}

/// Ranks the `top_n` most frequent significant words in `text`.
///
/// A token is significant when it is entirely alphanumeric, longer than two characters,
/// and not a stop word. Counts are sorted descending; equal counts keep the order in
/// which the words first appeared.
pub fn extract_keywords(text: &str, lexicon: &Lexicon, top_n: usize) -> Vec<KeywordEntry> {
    let lowered = text.to_lowercase();

    let mut ranked: Vec<KeywordEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for token in tokenize(&lowered) {
        if !is_significant(&token, lexicon) {
            continue;
        }
        match positions.get(&token) {
            Some(&idx) => ranked[idx].frequency += 1,
            None => {
                positions.insert(token.clone(), ranked.len());
                ranked.push(KeywordEntry {
                    keyword: token,
                    frequency: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranked.truncate(top_n);
    ranked
}

fn is_significant(token: &str, lexicon: &Lexicon) -> bool {
    token.chars().count() > 2
        && token.chars().all(char::is_alphanumeric)
        && !lexicon.is_stop_word(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(text: &str, top_n: usize) -> Vec<(String, u32)> {
        extract_keywords(text, &Lexicon::english(), top_n)
            .into_iter()
            .map(|k| (k.keyword, k.frequency))
            .collect()
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(
            tokenize("python, sql; (aws) rust!"),
            vec!["python", "sql", "aws", "rust"]
        );
    }

    #[test]
    fn test_tokenize_email_splits_at_sign() {
        assert_eq!(tokenize("a@b.com"), vec!["a", "b.com"]);
    }

    #[test]
    fn test_tokenize_keeps_numbers_with_separators() {
        assert_eq!(tokenize("1,000 users at 10:30"), vec!["1,000", "users", "at", "10:30"]);
    }

    #[test]
    fn test_tokenize_strips_sentence_periods() {
        assert_eq!(tokenize("Experience: 5 years."), vec!["Experience", "5", "years"]);
    }

    #[test]
    fn test_tokenize_splits_contractions() {
        assert_eq!(
            tokenize("don't team's we're 'quoted'"),
            vec!["do", "team", "we", "'quoted"]
        );
    }

    #[test]
    fn test_leading_single_quote_is_not_a_keyword() {
        let result = keywords("'quoted 'kafka' rust", 20);
        assert_eq!(result, vec![("rust".to_string(), 1)]);
    }

    #[test]
    fn test_tokenize_keeps_internal_punctuation() {
        assert_eq!(tokenize("node.js ci/cd c++"), vec!["node.js", "ci/cd", "c++"]);
    }

    #[test]
    fn test_extract_counts_and_ranks() {
        let result = keywords("Python SQL python, Docker. PYTHON sql", 20);
        assert_eq!(
            result,
            vec![
                ("python".to_string(), 3),
                ("sql".to_string(), 2),
                ("docker".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let result = keywords("kafka rust python rust kafka python", 20);
        let words: Vec<&str> = result.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["kafka", "rust", "python"]);
    }

    #[test]
    fn test_filters_stop_words_short_and_non_alnum_tokens() {
        let result = keywords("the and of go ai node.js ci/cd kubernetes", 20);
        assert_eq!(result, vec![("kubernetes".to_string(), 1)]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let text = "alpha beta gamma delta epsilon zeta alpha beta";
        let result = keywords(text, 3);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].0, "alpha");
        assert_eq!(result[1].0, "beta");
        assert_eq!(result[2].0, "gamma");
    }

    #[test]
    fn test_empty_and_stop_word_only_input() {
        assert!(keywords("", 20).is_empty());
        assert!(keywords("   \n\t ", 20).is_empty());
        assert!(keywords("the and of to with from", 20).is_empty());
    }

    #[test]
    fn test_result_is_sorted_and_counts_positive() {
        let text = "Senior Rust engineer. Rust, Tokio, async Rust; distributed systems. \
                    Systems thinking, Tokio runtime, observability and systems design.";
        let result = extract_keywords(text, &Lexicon::english(), 5);
        assert!(result.len() <= 5);
        assert!(result.iter().all(|k| k.frequency >= 1));
        assert!(result
            .windows(2)
            .all(|pair| pair[0].frequency >= pair[1].frequency));
    }

    #[test]
    fn test_unicode_words_are_alphanumeric() {
        let result = keywords("Café résumé naïve", 20);
        let words: Vec<&str> = result.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["café", "résumé", "naïve"]);
    }

    #[test]
    fn test_custom_lexicon_is_respected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"candidate\n").unwrap();
        let lexicon = Lexicon::load(Some(file.path())).unwrap();

        let result = extract_keywords("ideal candidate knows rust", &lexicon, 20);
        assert!(result.iter().all(|k| k.keyword != "candidate"));
        assert!(result.iter().any(|k| k.keyword == "rust"));
    }
}
