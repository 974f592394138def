// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod model;
pub mod review;
pub mod scorer;
pub mod select;
pub mod tokenize;
pub mod trainer;

// ---- Re-exports for stable public API ----
pub use crate::config::RerankConfig;
pub use crate::model::{start_retrain_thread, ModelHandle, TokenModel, TokenModels};
pub use crate::review::{load_reviews, ReviewRecord};
pub use crate::scorer::{normalize_weights, score, score_detailed, ScoreResult, NEUTRAL_SCORE};
pub use crate::select::{pick_best, Selection, FALLBACK_REPLY};
pub use crate::trainer::{train, train_from_path};

use std::path::Path;
use tracing::info;

/// One-call bootstrap: load configuration (env-aware), train from the review
/// corpus at `reviews_path`, and wrap the result in a shared [`ModelHandle`].
///
/// The handle starts with whatever the corpus currently supports, possibly
/// nothing at all; an untrained snapshot scores everything neutral.
pub fn bootstrap<P: AsRef<Path>>(reviews_path: P) -> (RerankConfig, ModelHandle) {
    let cfg = RerankConfig::load();
    let models = trainer::train_from_path(&cfg, reviews_path);
    info!(
        criteria = ?cfg.criteria(),
        trained = models.is_trained(),
        "reranker bootstrapped"
    );
    (cfg, ModelHandle::new(models))
}
