//! End-to-end tests: data directory -> snapshot -> egress and chart series

use franchise_pulse::domain::types::{Metric, MovieId};
use franchise_pulse::infra::{Config, RunStats};
use franchise_pulse::io::{load_inputs, Egress};
use franchise_pulse::services::joiner::InsufficientReason;
use franchise_pulse::services::{
    chart_series, ChartMetric, ChartOptions, PerformanceCell, Pipeline, SentimentCell,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAGA_MOVIES: &str = "\
title,release_date,production_budget,box_office,poster_url
Saga Begins,\"Mar 01, 2001\",\"$100\",\"$200\",https://img/1.jpg
Saga Returns,2004-03-01,100,300,
Saga Forever,\"Mar 01, 2008\",100,400,
Saga Lost Cut,,100,n/a,
";

const SAGA_COMMENTS: &str = r#"{
  "saga-begins": ["I loved it!!", "Worst trailer ever"],
  "saga-returns": ["<b>Great</b> trailer, can't wait", "   ", "<br>"],
  "saga-forever": []
}"#;

const ALIEN_MOVIES: &str = "\
title,release_date,production_budget,box_office
Alien,\"May 25, 1979\",11000000,106285522
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("star_saga_movies.csv"), SAGA_MOVIES).unwrap();
    fs::write(dir.join("star_saga_comments.json"), SAGA_COMMENTS).unwrap();
    fs::write(dir.join("alien_movies.csv"), ALIEN_MOVIES).unwrap();
}

#[test]
fn test_full_run_over_data_dir() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());

    let inputs = load_inputs(dir.path(), None).unwrap();
    assert_eq!(inputs.len(), 2);

    let snapshot = Pipeline::default().run(inputs);
    assert_eq!(snapshot.franchise_names(), vec!["Alien", "Star Saga"]);

    // Single-movie franchise is flagged, never scored
    let alien = snapshot.franchise("alien").unwrap();
    assert_eq!(
        alien.rows[0].performance,
        PerformanceCell::InsufficientData { reason: InsufficientReason::FranchiseSize }
    );
    assert!(matches!(alien.rows[0].sentiment, SentimentCell::NoData { .. }));

    let saga = snapshot.franchise("Star Saga").unwrap();
    let ids: Vec<&str> = saga.rows.iter().map(|r| r.movie.as_str()).collect();
    assert_eq!(ids, vec!["saga-begins", "saga-returns", "saga-forever", "saga-lost-cut"]);

    // Profits 100/200/300 and ROI 1/2/3: symmetric z-scores, increasing coefficients
    for stats in &saga.metric_stats {
        assert_eq!(stats.samples, 3);
        let lowest = match stats.metric {
            Metric::Profit => 100.0,
            Metric::Roi => 1.0,
            Metric::BoxOffice => unreachable!("box office has weight 0"),
        };
        assert!((stats.z_score(lowest) + 1.2247).abs() < 1e-3);
    }
    let perf: Vec<f64> = saga.rows[..3]
        .iter()
        .map(|r| r.performance.score().unwrap().value())
        .collect();
    assert!(perf[0] < perf[1] && perf[1] < perf[2]);
    assert_eq!(perf[1], 0.5);
    assert!(perf.iter().all(|v| *v > 0.0 && *v < 1.0));
    assert_eq!(
        saga.rows[3].performance,
        PerformanceCell::InsufficientData { reason: InsufficientReason::FinancialData }
    );

    // Opposing comments pull the aggregate toward neutral
    match &saga.rows[0].sentiment {
        SentimentCell::Scored(s) => {
            assert_eq!(s.comments_used, 2);
            assert!((s.score.value() - 0.5).abs() < 0.3);
        }
        other => panic!("expected a sentiment score, got {:?}", other),
    }
    // Markup-only and blank comments are skipped, not scored as neutral
    match &saga.rows[1].sentiment {
        SentimentCell::Scored(s) => {
            assert_eq!(s.comments_used, 1);
            assert_eq!(s.comments_skipped, 2);
            assert!(s.score.value() > 0.5);
        }
        other => panic!("expected a sentiment score, got {:?}", other),
    }
    assert_eq!(saga.rows[2].sentiment, SentimentCell::NoData { comments_skipped: 0 });

    // Malformed gross is reported against the movie
    assert!(saga
        .issues
        .iter()
        .any(|r| r.movie == Some(MovieId::new("saga-lost-cut")) && r.issue.kind() == "malformed"));

    let mut stats = RunStats::new();
    for report in &snapshot.reports {
        stats.record_report(report);
    }
    let summary = stats.summary();
    assert_eq!(summary.franchises, 2);
    assert_eq!(summary.movies, 5);
    assert_eq!(summary.performance_scored, 3);
    assert_eq!(summary.sentiment_scored, 2);
}

#[test]
fn test_egress_and_chart_from_snapshot() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let out = dir.path().join("out").join("scores.jsonl");

    let config = Config::default()
        .with_data_dir(dir.path().to_str().unwrap())
        .with_franchise("star_saga")
        .with_egress_file(out.to_str().unwrap());

    let inputs = load_inputs(config.data_dir(), config.franchise()).unwrap();
    let snapshot = Pipeline::from_config(&config).run(inputs);
    assert_eq!(snapshot.reports.len(), 1);

    let written = Egress::new(config.egress_file()).write_snapshot(&snapshot).unwrap();
    assert_eq!(written, 4);
    let content = fs::read_to_string(&out).unwrap();
    let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(first["franchise"], "star_saga");
    assert_eq!(first["poster_url"], "https://img/1.jpg");
    assert_eq!(first["performance"]["status"], "scored");

    let report = snapshot.franchise("star_saga").unwrap();
    let options = ChartOptions { smoothing: config.chart_smoothing(), samples: 40 };

    let perf = chart_series(report, ChartMetric::Performance, options);
    assert!(perf.smoothed);
    assert_eq!(perf.points.len(), 3);
    assert_eq!(perf.line.len(), 40);
    assert_eq!(perf.gaps.len(), 1);
    assert_eq!(perf.gaps[0].reason, "no_release_date");

    let sentiment = chart_series(report, ChartMetric::Sentiment, options);
    assert!(!sentiment.smoothed);
    assert_eq!(sentiment.points.len(), 2);
    let reasons: Vec<&str> = sentiment.gaps.iter().map(|g| g.reason).collect();
    assert_eq!(reasons, vec!["no_data", "no_release_date"]);
}

const HALLOWEEN_MOVIES: &str = "\
title,release_date,production_budget,box_office
Halloween,1978-10-25,325000,70000000
Halloween II,1981-10-30,2500000,25500000
Halloween,2007-08-31,15000000,80000000
";

const HALLOWEEN_COMMENTS: &str = r#"{
  "halloween": ["Great classic trailer"],
  "halloween-ii": null,
  "halloween-2007": ["Terrible remake"]
}"#;

#[test]
fn test_remakes_and_bad_comment_entry_recovered_per_movie() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("halloween_movies.csv"), HALLOWEEN_MOVIES).unwrap();
    fs::write(dir.path().join("halloween_comments.json"), HALLOWEEN_COMMENTS).unwrap();

    let inputs = load_inputs(dir.path(), Some("halloween")).unwrap();
    assert!(inputs[0].comments.is_available());
    let snapshot = Pipeline::default().run(inputs);
    let report = snapshot.franchise("Halloween").unwrap();

    let ids: Vec<&str> = report.rows.iter().map(|r| r.movie.as_str()).collect();
    assert_eq!(ids, vec!["halloween", "halloween-ii", "halloween-2007"]);

    // Each remake keeps its own financial score
    let composites: Vec<f64> = report
        .rows
        .iter()
        .map(|r| match r.performance {
            PerformanceCell::Scored { composite, .. } => composite,
            ref other => panic!("expected a score, got {:?}", other),
        })
        .collect();
    assert_ne!(composites[0], composites[2]);
    assert!(composites[0] > composites[2]);

    // The null entry only costs its own movie
    assert!(report.rows[0].sentiment.score().unwrap().value() > 0.5);
    assert!(matches!(report.rows[1].sentiment, SentimentCell::NoData { .. }));
    assert!(report.rows[2].sentiment.score().unwrap().value() < 0.5);
    assert!(report
        .issues
        .iter()
        .any(|r| r.movie == Some(MovieId::new("halloween-ii")) && r.issue.kind() == "malformed"));
}
