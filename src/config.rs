// src/config.rs
//! Reranker configuration: the fixed criterion set, candidate count, and
//! optional default criterion weights.
//!
//! Loaded from TOML (`config/rerank.toml` by default), with env overrides:
//! - `RERANK_CONFIG_PATH`: alternate config file location
//! - `RERANK_N`: candidate count to request upstream
//! - `RERANK_WEIGHT_<CRITERION>`: default weight for one criterion
//!
//! A missing or unparsable config file falls back to the built-in seed; the
//! reranker must stay usable with zero deployment configuration.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

// --- env defaults & names ---
pub const DEFAULT_RERANK_CONFIG_PATH: &str = "config/rerank.toml";
pub const DEFAULT_CANDIDATES: usize = 5;

pub const ENV_RERANK_CONFIG_PATH: &str = "RERANK_CONFIG_PATH";
pub const ENV_RERANK_CANDIDATES: &str = "RERANK_N";
pub const ENV_WEIGHT_PREFIX: &str = "RERANK_WEIGHT_";

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct RerankRoot {
    rerank: RerankSection,
    #[serde(default)]
    weights: HashMap<String, f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RerankSection {
    criteria: Vec<String>,
    #[serde(default = "default_candidates")]
    candidates: usize,
}

fn default_candidates() -> usize {
    DEFAULT_CANDIDATES
}

/* ----------------------------
Resolved configuration
---------------------------- */

/// The criterion set shared by trainer and scorer, plus orchestration knobs.
///
/// The criterion list is closed: every trained model collection and every
/// normalized weight vector carries exactly these names.
#[derive(Debug, Clone)]
pub struct RerankConfig {
    criteria: Vec<String>,
    candidates: usize,
    default_weights: HashMap<String, f32>,
}

impl RerankConfig {
    /// Built-in seed used when no config file is present.
    pub fn default_seed() -> Self {
        Self {
            criteria: vec![
                "factuality".to_string(),
                "clarity".to_string(),
                "ethics".to_string(),
            ],
            candidates: DEFAULT_CANDIDATES,
            default_weights: HashMap::new(),
        }
    }

    /// Parse from a TOML string. Criterion names are trimmed and deduplicated
    /// preserving first occurrence; an empty list falls back to the seed set.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: RerankRoot = toml::from_str(toml_str)?;

        let mut criteria: Vec<String> = Vec::new();
        for name in root.rerank.criteria {
            let name = name.trim().to_string();
            if !name.is_empty() && !criteria.contains(&name) {
                criteria.push(name);
            }
        }
        if criteria.is_empty() {
            criteria = Self::default_seed().criteria;
        }

        let candidates = root.rerank.candidates.max(1);

        // Keep only weights for known criteria; negatives are clamped later
        // during normalization, not here, so the table mirrors the file.
        let default_weights = root
            .weights
            .into_iter()
            .filter(|(k, _)| criteria.iter().any(|c| c == k))
            .collect();

        Ok(Self {
            criteria,
            candidates,
            default_weights,
        })
    }

    /// Load from the configured path, falling back to [`Self::default_seed`]
    /// when the file is missing or malformed, then apply env overrides.
    pub fn load() -> Self {
        let path = std::env::var(ENV_RERANK_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_RERANK_CONFIG_PATH));

        let mut cfg = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid rerank config, using seed");
                Self::default_seed()
            }),
            Err(_) => Self::default_seed(),
        };

        cfg.apply_env_overrides();
        cfg
    }

    /// Apply `RERANK_N` and `RERANK_WEIGHT_<CRITERION>` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(n) = std::env::var(ENV_RERANK_CANDIDATES)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
        {
            if n >= 1 {
                self.candidates = n;
            }
        }

        for criterion in self.criteria.clone() {
            let var = format!("{}{}", ENV_WEIGHT_PREFIX, criterion.to_uppercase());
            if let Some(w) = std::env::var(&var)
                .ok()
                .and_then(|s| s.trim().parse::<f32>().ok())
            {
                if w.is_finite() && w >= 0.0 {
                    self.default_weights.insert(criterion, w);
                }
            }
        }
    }

    /// The closed criterion set, in configured order.
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    /// How many candidates the orchestrator should request upstream.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// Default weight vector for scoring calls that supply none.
    /// `None` when the config carries no weights (scorer falls back to
    /// equal weighting).
    pub fn default_weights(&self) -> Option<&HashMap<String, f32>> {
        if self.default_weights.is_empty() {
            None
        } else {
            Some(&self.default_weights)
        }
    }
}
