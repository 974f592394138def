//! Demo that trains from the local review corpus and reranks the candidate
//! texts given as CLI arguments, printing the selection as JSON.
//!
//! ```text
//! cargo run --bin rerank_demo -- "candidate one" "candidate two"
//! ```

use reply_reranker::{bootstrap, pick_best, review::reviews_path, score_detailed};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Load .env in local/dev; no-op elsewhere. Enables RERANK_* overrides.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let path = reviews_path();
    let (cfg, handle) = bootstrap(&path);
    tracing::info!(
        reviews_path = %path.display(),
        request_candidates = cfg.candidates(),
        "reranker ready"
    );

    let candidates: Vec<String> = std::env::args().skip(1).collect();
    let models = handle.current();

    for (i, text) in candidates.iter().enumerate() {
        let r = score_detailed(&cfg, text, &models, cfg.default_weights());
        tracing::info!(candidate = i, score = r.composite, matched = ?r.matched);
    }

    let selection = pick_best(&cfg, candidates, &models, cfg.default_weights());
    println!(
        "{}",
        serde_json::to_string_pretty(&selection).expect("selection serializes")
    );
}
