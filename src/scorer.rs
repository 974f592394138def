// src/scorer.rs
//! Scoring: weighted composite of per-criterion token-average lookups.
//!
//! Neutrality (0.5) is the explicit "no evidence" value at both levels: a
//! criterion whose map matched no token scores 0.5, and a text that matched
//! nothing anywhere scores 0.5 overall. An untrained reranker degrades to
//! indifference, never to arbitrary bias.

use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::config::RerankConfig;
use crate::model::TokenModels;
use crate::tokenize::tokenize;

/// "No evidence either way."
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Composite score plus the per-criterion sub-scores behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Weighted composite in [0, 1].
    pub composite: f32,
    /// Sub-score per criterion in [0, 1]; 0.5 where nothing matched.
    pub per_criterion: HashMap<String, f32>,
    /// Criteria whose token map matched at least one token of the text.
    pub matched: Vec<String>,
}

impl ScoreResult {
    fn neutral(cfg: &RerankConfig) -> Self {
        let per_criterion = cfg
            .criteria()
            .iter()
            .map(|c| (c.clone(), NEUTRAL_SCORE))
            .collect();
        Self {
            composite: NEUTRAL_SCORE,
            per_criterion,
            matched: Vec::new(),
        }
    }
}

// Dev logging gate: RERANK_DEV_LOG=1 AND a debug build (or the `debug` feature)
fn dev_logging_enabled() -> bool {
    let on = std::env::var("RERANK_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    cfg!(debug_assertions) || cfg!(feature = "debug")
}

pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Minimal, anonymized dev logger for scoring events.
fn dev_log_score(text: &str, result: &ScoreResult) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    // Never log raw candidate text. Only hashed id + numbers.
    info!(
        target: "rerank",
        %id,
        score = result.composite,
        matched = ?result.matched
    );
}

/// Normalize a supplied weight mapping over the configured criterion set.
///
/// Missing, non-finite, and negative entries count as 0. When the usable sum
/// is ≤ 0 (or no mapping was supplied at all) every criterion gets an equal
/// share. The result always has an entry for every criterion and sums to 1.
pub fn normalize_weights(
    cfg: &RerankConfig,
    weights: Option<&HashMap<String, f32>>,
) -> HashMap<String, f32> {
    fn usable(w: Option<&f32>) -> f32 {
        match w {
            Some(&v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        }
    }

    let criteria = cfg.criteria();
    if let Some(ws) = weights {
        let total: f32 = criteria.iter().map(|c| usable(ws.get(c))).sum();
        if total > 0.0 {
            return criteria
                .iter()
                .map(|c| (c.clone(), usable(ws.get(c)) / total))
                .collect();
        }
    }
    let equal = 1.0 / criteria.len() as f32;
    criteria.iter().map(|c| (c.clone(), equal)).collect()
}

/// Score one candidate text against trained models under optional weights.
/// Returns the composite plus per-criterion diagnostics.
pub fn score_detailed(
    cfg: &RerankConfig,
    text: &str,
    models: &TokenModels,
    weights: Option<&HashMap<String, f32>>,
) -> ScoreResult {
    // Unlike training, occurrences are NOT deduplicated here: every token of
    // the candidate is a lookup.
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return ScoreResult::neutral(cfg);
    }

    let w = normalize_weights(cfg, weights);

    let mut per_criterion = HashMap::new();
    let mut matched = Vec::new();

    for criterion in cfg.criteria() {
        let mut sum = 0.0f64;
        let mut hits = 0u32;
        if let Some(map) = models.criterion(criterion) {
            for token in &tokens {
                if let Some(&avg) = map.get(token.as_str()) {
                    sum += f64::from(avg);
                    hits += 1;
                }
            }
        }

        let sub = if hits > 0 {
            matched.push(criterion.clone());
            let avg = sum / f64::from(hits);
            // normalize 1–5 -> 0..1
            (((avg - 1.0) / 4.0) as f32).clamp(0.0, 1.0)
        } else {
            NEUTRAL_SCORE
        };
        per_criterion.insert(criterion.clone(), sub);
    }

    // Nothing matched anywhere: a composite made purely of neutral defaults
    // must not look like an informed 0.5-per-criterion verdict.
    if matched.is_empty() {
        return ScoreResult::neutral(cfg);
    }

    let composite = cfg
        .criteria()
        .iter()
        .map(|c| per_criterion[c.as_str()] * w[c.as_str()])
        .sum::<f32>()
        .clamp(0.0, 1.0);

    let result = ScoreResult {
        composite,
        per_criterion,
        matched,
    };
    dev_log_score(text, &result);
    result
}

/// Composite-only convenience wrapper around [`score_detailed`].
pub fn score(
    cfg: &RerankConfig,
    text: &str,
    models: &TokenModels,
    weights: Option<&HashMap<String, f32>>,
) -> f32 {
    score_detailed(cfg, text, models, weights).composite
}
