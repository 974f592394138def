// src/trainer.rs
//! Training: fold the review corpus into per-criterion token averages.
//!
//! For each criterion, every review contributes its rating once per distinct
//! token of its text. The resulting map holds, per token, the plain average
//! of all contributed ratings on the original 1–5 scale. No smoothing, no
//! frequency weighting: the model stays a transparent, explainable average.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::config::RerankConfig;
use crate::model::{TokenModel, TokenModels};
use crate::review::{load_reviews, ReviewRecord};
use crate::tokenize::unique_tokens;

/// Build token models for every configured criterion from `reviews`.
///
/// Pure over its inputs. Reviews without usable text or ratings simply
/// contribute nothing; the output always carries an entry (possibly empty)
/// for each criterion.
pub fn train(cfg: &RerankConfig, reviews: &[ReviewRecord]) -> TokenModels {
    // criterion -> token -> (rating sum, contribution count)
    let mut acc: HashMap<String, HashMap<String, (f64, u32)>> = cfg
        .criteria()
        .iter()
        .map(|c| (c.clone(), HashMap::new()))
        .collect();

    for review in reviews {
        // A token counts at most once per review, however often it repeats.
        let tokens = unique_tokens(review.text());
        if tokens.is_empty() {
            continue;
        }

        for (criterion, bucket) in acc.iter_mut() {
            let Some(rating) = review.rating_for(criterion) else {
                continue;
            };
            for token in &tokens {
                let entry = bucket.entry(token.clone()).or_insert((0.0, 0));
                entry.0 += f64::from(rating);
                entry.1 += 1;
            }
        }
    }

    let by_criterion = acc
        .into_iter()
        .map(|(criterion, bucket)| {
            let model: TokenModel = bucket
                .into_iter()
                .map(|(token, (sum, count))| (token, (sum / f64::from(count)) as f32))
                .collect();
            (criterion, model)
        })
        .collect();

    TokenModels::from_map(by_criterion)
}

/// Load the review corpus at `path` and train on it.
///
/// An absent or unreadable corpus yields empty models: "no evidence
/// anywhere" is a valid trained state, not an error.
pub fn train_from_path<P: AsRef<Path>>(cfg: &RerankConfig, path: P) -> TokenModels {
    let reviews = load_reviews(path.as_ref());
    debug!(reviews = reviews.len(), "training reranker models");
    train(cfg, &reviews)
}
