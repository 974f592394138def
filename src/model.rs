// src/model.rs
//! Trained token models and the shared, atomically swappable handle.
//!
//! A `TokenModels` value is immutable once built: retraining produces a fresh
//! value and replaces the whole snapshot through [`ModelHandle`], so
//! concurrent scorers never observe a half-updated map.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use crate::config::RerankConfig;
use crate::review::load_reviews;
use crate::trainer::train;

/// Per-criterion map from lower-cased token to its average rating (1–5).
pub type TokenModel = HashMap<String, f32>;

/// The full trained state: one [`TokenModel`] per configured criterion.
///
/// Every configured criterion is present, possibly with an empty map; an
/// untrained criterion is "no evidence", not a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenModels {
    by_criterion: HashMap<String, TokenModel>,
}

impl TokenModels {
    /// Empty models carrying an entry for each configured criterion.
    pub fn empty(cfg: &RerankConfig) -> Self {
        let by_criterion = cfg
            .criteria()
            .iter()
            .map(|c| (c.clone(), TokenModel::new()))
            .collect();
        Self { by_criterion }
    }

    pub(crate) fn from_map(by_criterion: HashMap<String, TokenModel>) -> Self {
        Self { by_criterion }
    }

    /// Token map for one criterion.
    pub fn criterion(&self, name: &str) -> Option<&TokenModel> {
        self.by_criterion.get(name)
    }

    /// True when at least one criterion has learned at least one token.
    pub fn is_trained(&self) -> bool {
        self.by_criterion.values().any(|m| !m.is_empty())
    }

    /// Criterion names present in this snapshot.
    pub fn criteria(&self) -> impl Iterator<Item = &str> {
        self.by_criterion.keys().map(String::as_str)
    }
}

/* ----------------------------
Thread-safe handle + retraining
---------------------------- */

/// Shared handle over the active model snapshot.
///
/// Readers are lock-free; [`ModelHandle::swap`] replaces the snapshot
/// wholesale. Clones share the same underlying slot.
#[derive(Clone)]
pub struct ModelHandle {
    inner: Arc<ArcSwap<TokenModels>>,
}

impl ModelHandle {
    pub fn new(models: TokenModels) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(models)),
        }
    }

    /// Untrained handle for the given criterion set.
    pub fn empty(cfg: &RerankConfig) -> Self {
        Self::new(TokenModels::empty(cfg))
    }

    /// Current snapshot. Cheap; safe to hold across a scoring pass.
    pub fn current(&self) -> Arc<TokenModels> {
        self.inner.load_full()
    }

    /// Replace the active snapshot atomically.
    pub fn swap(&self, models: TokenModels) {
        self.inner.store(Arc::new(models));
    }

    /// Retrain from the review file at `path` and swap the result in.
    pub fn retrain_from_path(&self, cfg: &RerankConfig, path: &std::path::Path) {
        let reviews = load_reviews(path);
        let models = train(cfg, &reviews);
        info!(
            reviews = reviews.len(),
            trained = models.is_trained(),
            "reranker models rebuilt"
        );
        self.swap(models);
    }
}

/// Start a polling watcher on the review file that retrains and swaps the
/// handle whenever the file's mtime changes. Polls every 2s. Uses only std,
/// no external watcher deps.
pub fn start_retrain_thread(handle: ModelHandle, cfg: RerankConfig, path: PathBuf) {
    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        handle.retrain_from_path(&cfg, &path);
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                    if last_mtime.take().is_some() {
                        warn!(path = %path.display(), "review file disappeared; keeping last models");
                    }
                }
            }
            thread::sleep(poll);
        }
    });
}
