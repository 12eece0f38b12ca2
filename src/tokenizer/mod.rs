//! Per-language, per-algorithm tokenization of raw document text.
//!
//! [`tokenize`] is the single entry point: it selects a splitting algorithm
//! by name, then applies language-specific postprocessing. The output token
//! sequence is what the indexer joins with single spaces and stores as the
//! document's content.
//!
//! Two algorithms are recognized:
//!
//! - [`WHITESPACE`] - split on Unicode whitespace; tokens keep punctuation
//! - [`WORD`] - Unicode word-boundary segmentation; punctuation never
//!   becomes a token
//!
//! Unrecognized algorithm names produce an empty token sequence rather than
//! an error.

mod stop_words;

pub use stop_words::ENGLISH_STOP_WORDS;

use regex::Regex;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Algorithm name selecting plain whitespace splitting.
pub const WHITESPACE: &str = "Whitespace";

/// Algorithm name selecting Unicode word-boundary segmentation.
pub const WORD: &str = "Word";

/// Runs of word characters, used for the Arabic re-tokenization pass.
static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Tokenize raw document text under the given language and algorithm.
///
/// English text is filtered against [`ENGLISH_STOP_WORDS`] (matched on the
/// lowercased token, original case preserved). Arabic text discards the
/// algorithm's output entirely and re-tokenizes the raw content as runs of
/// word characters; that override applies even when the algorithm name is
/// unrecognized. All other languages pass the algorithm's output through
/// unchanged.
pub fn tokenize(content: &str, language: &str, algorithm: &str) -> Vec<String> {
    if language == "arabic" {
        return word_runs(content);
    }

    let tokens: Vec<String> = match algorithm {
        WHITESPACE => content.split_whitespace().map(str::to_owned).collect(),
        WORD => content.unicode_words().map(str::to_owned).collect(),
        _ => Vec::new(),
    };

    if language == "english" {
        tokens
            .into_iter()
            .filter(|t| !ENGLISH_STOP_WORDS.contains(t.to_lowercase().as_str()))
            .collect()
    } else {
        tokens
    }
}

fn word_runs(content: &str) -> Vec<String> {
    WORD_RUN
        .find_iter(content)
        .map(|m| m.as_str().to_owned())
        .collect()
}
