// src/tokenize.rs
//! Shared tokenizer for training and scoring.
//!
//! Both sides of the reranker must split text identically, otherwise tokens
//! learned at training time silently stop matching at scoring time. Keep this
//! the single tokenization entry point.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// \w covers [A-Za-z0-9_]; (?u) enables Unicode
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w+\b").expect("tokenizer regex"));

/// Split `input` into lower-cased word tokens, in order of appearance.
/// Repeated words are kept; callers that need per-text uniqueness use
/// [`unique_tokens`].
pub fn tokenize(input: &str) -> Vec<String> {
    WORD_RE
        .find_iter(input)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Distinct lower-cased tokens of `input`.
///
/// Training counts a token at most once per review so long or repetitive
/// texts cannot dominate an average through sheer frequency.
pub fn unique_tokens(input: &str) -> HashSet<String> {
    tokenize(input).into_iter().collect()
}
