//! Analysis time grows linearly with the number of clause hits

use std::time::{Duration, Instant};

use clause_engine::ClauseEngine;

const CLAUSE: &str = "All claims go to binding arbitration and mandatory arbitration ";

/// Best of three runs, to keep scheduler noise out of the ratio
fn time_analysis(engine: &ClauseEngine, text: &str) -> Duration {
    (0..3)
        .map(|_| {
            let started = Instant::now();
            let report = engine.analyze_text(text);
            let elapsed = started.elapsed();
            assert!(report.total_flags > 0);
            elapsed
        })
        .min()
        .unwrap()
}

#[test]
fn test_hit_dense_text_scales_linearly() {
    let engine = ClauseEngine::new().unwrap();
    // compile the catalog before timing
    engine.analyze_text(CLAUSE);

    let small = CLAUSE.repeat(500);
    let large = CLAUSE.repeat(2000);
    let small_time = time_analysis(&engine, &small);
    let large_time = time_analysis(&engine, &large);

    let ratio = large_time.as_secs_f64() / small_time.as_secs_f64().max(1e-6);
    assert!(
        ratio < 6.0,
        "4x input took {:.1}x time ({:?} vs {:?})",
        ratio,
        large_time,
        small_time
    );
}

#[test]
fn test_sentence_dense_text_scales_linearly() {
    let engine = ClauseEngine::new().unwrap();
    engine.analyze_text(CLAUSE);

    let sentence = "We may share your personal information with third parties. ";
    let small = sentence.repeat(500);
    let large = sentence.repeat(2000);
    let small_time = time_analysis(&engine, &small);
    let large_time = time_analysis(&engine, &large);

    let ratio = large_time.as_secs_f64() / small_time.as_secs_f64().max(1e-6);
    assert!(ratio < 6.0, "4x input took {:.1}x time", ratio);
}
