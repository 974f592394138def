// tests/rerank_e2e.rs
//
// End-to-end: review corpus on disk -> training -> scoring -> candidate
// selection, all through the public API.

use reply_reranker::{pick_best, score, train_from_path, RerankConfig, NEUTRAL_SCORE};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Create a unique temporary directory in std::env::temp_dir().
fn unique_tmp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("rerank_e2e_{}", nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn review_corpus_to_selected_reply() {
    let tmpdir = unique_tmp_dir();
    let path = tmpdir.join("reviews.json");
    fs::write(
        &path,
        r#"[{"assistantText": "great clear answer",
             "criteria": {"clarity": 5, "factuality": 3, "ethics": 3}}]"#,
    )
    .unwrap();

    let cfg = RerankConfig::default_seed();
    let models = train_from_path(&cfg, &path);

    let clarity = models.criterion("clarity").unwrap();
    for t in ["great", "clear", "answer"] {
        assert_eq!(clarity[t], 5.0);
    }
    for c in ["factuality", "ethics"] {
        let m = models.criterion(c).unwrap();
        for t in ["great", "clear", "answer"] {
            assert_eq!(m[t], 3.0);
        }
    }

    let mut weights = HashMap::new();
    weights.insert("clarity".to_string(), 1.0f32);
    weights.insert("factuality".to_string(), 0.0);
    weights.insert("ethics".to_string(), 0.0);

    // clarity sub-score (5-1)/4 = 1.0 under full clarity weight
    assert_eq!(score(&cfg, "clear answer", &models, Some(&weights)), 1.0);
    // no learned token at all -> neutral
    assert_eq!(
        score(&cfg, "unseen words only", &models, Some(&weights)),
        NEUTRAL_SCORE
    );

    let sel = pick_best(
        &cfg,
        vec!["unseen words only".to_string(), "clear answer".to_string()],
        &models,
        Some(&weights),
    );
    assert_eq!(sel.best_index, 1);
    assert_eq!(sel.reply, "clear answer");
    assert_eq!(sel.score, 1.0);

    let _ = fs::remove_dir_all(&tmpdir);
}

#[test]
fn retraining_on_a_grown_corpus_changes_the_pick() {
    let tmpdir = unique_tmp_dir();
    let path = tmpdir.join("reviews.json");

    let cfg = RerankConfig::default_seed();

    // Round 1: nothing on disk yet, every candidate ties and the first wins.
    let models = train_from_path(&cfg, &path);
    let sel = pick_best(
        &cfg,
        vec!["short evasive reply".to_string(), "thorough answer".to_string()],
        &models,
        None,
    );
    assert_eq!(sel.best_index, 0);
    assert_eq!(sel.score, NEUTRAL_SCORE);

    // Round 2: reviewers praised thorough answers and panned evasive ones.
    fs::write(
        &path,
        r#"[{"assistantText": "thorough answer", "rating": 5},
            {"assistantText": "evasive reply", "rating": 1}]"#,
    )
    .unwrap();
    let models = train_from_path(&cfg, &path);
    let sel = pick_best(
        &cfg,
        vec!["short evasive reply".to_string(), "thorough answer".to_string()],
        &models,
        None,
    );
    assert_eq!(sel.best_index, 1);
    assert_eq!(sel.reply, "thorough answer");

    let _ = fs::remove_dir_all(&tmpdir);
}
