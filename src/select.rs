// src/select.rs
//! Candidate selection: score N candidate replies under one weight vector
//! and pick the winner.
//!
//! Pure logic, no I/O. The embedding application requests candidates from
//! its generator, hands them here, and sends the chosen reply back.

use serde::Serialize;
use std::collections::HashMap;

use crate::config::RerankConfig;
use crate::model::TokenModels;
use crate::scorer::{score, NEUTRAL_SCORE};

/// Deterministic stand-in reply when the upstream generator produced no
/// usable candidate at all.
pub const FALLBACK_REPLY: &str = "Sorry, no reply is available right now.";

/// Outcome of reranking one candidate batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// The winning candidate text.
    pub reply: String,
    /// Composite score of the winner.
    pub score: f32,
    /// All candidates, in the order they were supplied.
    pub replies: Vec<String>,
    /// Index of the winner within `replies`.
    pub best_index: usize,
}

/// Score every candidate and select the strictly greatest composite; on a
/// tie the earliest candidate wins. Zero candidates yield the fallback reply
/// at index 0 with the neutral score.
pub fn pick_best(
    cfg: &RerankConfig,
    candidates: Vec<String>,
    models: &TokenModels,
    weights: Option<&HashMap<String, f32>>,
) -> Selection {
    if candidates.is_empty() {
        return Selection {
            reply: FALLBACK_REPLY.to_string(),
            score: NEUTRAL_SCORE,
            replies: vec![FALLBACK_REPLY.to_string()],
            best_index: 0,
        };
    }

    let mut best_index = 0usize;
    let mut best_score = f32::NEG_INFINITY;
    for (i, text) in candidates.iter().enumerate() {
        let s = score(cfg, text, models, weights);
        if s > best_score {
            best_score = s;
            best_index = i;
        }
    }

    Selection {
        reply: candidates[best_index].clone(),
        score: best_score,
        replies: candidates,
        best_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewRecord;
    use crate::trainer::train;

    fn cfg() -> RerankConfig {
        RerankConfig::default_seed()
    }

    fn trained() -> TokenModels {
        let reviews: Vec<ReviewRecord> = [
            r#"{"assistantText":"clear helpful answer","rating":5}"#,
            r#"{"assistantText":"rude evasive rant","rating":1}"#,
        ]
        .iter()
        .map(|j| serde_json::from_str(j).unwrap())
        .collect();
        train(&cfg(), &reviews)
    }

    #[test]
    fn picks_the_highest_scoring_candidate() {
        let sel = pick_best(
            &cfg(),
            vec![
                "rude evasive rant".to_string(),
                "clear helpful answer".to_string(),
            ],
            &trained(),
            None,
        );
        assert_eq!(sel.best_index, 1);
        assert_eq!(sel.reply, "clear helpful answer");
        assert!(sel.score > NEUTRAL_SCORE);
        assert_eq!(sel.replies.len(), 2);
    }

    #[test]
    fn first_candidate_wins_ties() {
        // Nothing trained: every candidate scores the neutral 0.5.
        let models = TokenModels::empty(&cfg());
        let sel = pick_best(
            &cfg(),
            vec!["first".to_string(), "second".to_string()],
            &models,
            None,
        );
        assert_eq!(sel.best_index, 0);
        assert_eq!(sel.reply, "first");
        assert_eq!(sel.score, NEUTRAL_SCORE);
    }

    #[test]
    fn empty_batch_falls_back_deterministically() {
        let sel = pick_best(&cfg(), Vec::new(), &trained(), None);
        assert_eq!(sel.reply, FALLBACK_REPLY);
        assert_eq!(sel.best_index, 0);
        assert_eq!(sel.score, NEUTRAL_SCORE);
        assert_eq!(sel.replies, vec![FALLBACK_REPLY.to_string()]);
    }

    #[test]
    fn single_candidate_is_returned_as_is() {
        let sel = pick_best(&cfg(), vec!["only option".to_string()], &trained(), None);
        assert_eq!(sel.best_index, 0);
        assert_eq!(sel.reply, "only option");
    }

    #[test]
    fn selection_serializes_with_wire_names() {
        let sel = pick_best(&cfg(), vec!["hi".to_string()], &TokenModels::empty(&cfg()), None);
        let json = serde_json::to_value(&sel).unwrap();
        for key in ["reply", "score", "replies", "best_index"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
