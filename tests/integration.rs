//! End-to-end integration tests for the seshat preparation flow.
//!
//! These tests exercise the full pipeline from a persisted raw dataset through
//! partitioning, encoding, and reloading the written splits, validating the
//! alignment and ordering contracts across the whole flow.

use seshat::encode::{EncodedExample, EncodingPipeline};
use seshat::pool::WorkerPool;
use seshat::prepare::{PrepareConfig, prepare};
use seshat::series::{Snapshot, TimeSeries};
use seshat::store;

/// A series over `num_nodes` nodes whose chain edges churn with a per-series
/// phase, so every series and every timestep is structurally distinct.
fn churn_series(num_nodes: usize, t: usize, phase: usize) -> TimeSeries {
    let snapshots = (0..t)
        .map(|step| {
            let edges = (0..num_nodes as u32 - 1)
                .filter(|i| (*i as usize + step + phase) % 4 != 0)
                .map(|i| (i, i + 1));
            Snapshot::with_edges(num_nodes, edges).unwrap()
        })
        .collect();
    TimeSeries::new(snapshots).unwrap()
}

fn dataset(count: usize, t: usize) -> Vec<TimeSeries> {
    (0..count).map(|phase| churn_series(8, t, phase)).collect()
}

fn prepared_config(dir: &std::path::Path, num_workers: usize) -> PrepareConfig {
    let mut config = PrepareConfig::new(dir, "synthetic");
    config.num_workers = num_workers;
    config.split.train_p = 0.8;
    config.split.val_p = 0.2;
    config.split.randomize = false;
    config
}

#[test]
fn full_run_produces_aligned_splits() {
    let dir = tempfile::TempDir::new().unwrap();
    let series = dataset(10, 5);

    let config = prepared_config(dir.path(), 2);
    store::save(&series, &config.dataset_path()).unwrap();

    let report = prepare(&config).unwrap();
    assert_eq!(report.train_series, 7);
    assert_eq!(report.val_series, 1);
    assert_eq!(report.test_series, 2);
    assert_eq!(report.series_len, 5);
    assert_eq!(report.train_examples, 7 * 4);
    assert_eq!(report.val_examples, 4);

    // All five split files exist; test is raw-only by policy.
    for stem in [
        "train_graphs_raw",
        "val_graphs_raw",
        "test_graphs",
        "train_graphs",
        "val_graphs",
    ] {
        assert!(config.split_path(stem).exists(), "missing {stem}");
    }

    // Unshuffled slicing: val is the first series, test the last two.
    let raw_val: Vec<TimeSeries> = store::load(&config.split_path("val_graphs_raw")).unwrap();
    assert_eq!(raw_val, series[..1].to_vec());
    let raw_test: Vec<TimeSeries> = store::load(&config.split_path("test_graphs")).unwrap();
    assert_eq!(raw_test, series[8..].to_vec());

    // The persisted encoded split matches re-encoding its raw counterpart.
    let raw_train: Vec<TimeSeries> = store::load(&config.split_path("train_graphs_raw")).unwrap();
    let encoded_train: Vec<EncodedExample> =
        store::load(&config.split_path("train_graphs")).unwrap();
    let reencoded = EncodingPipeline::new(WorkerPool::new(1))
        .encode(&raw_train)
        .unwrap();
    assert_eq!(encoded_train, reencoded);
}

#[test]
fn worker_count_does_not_change_the_output() {
    let series = dataset(6, 4);

    let mut encoded_runs = Vec::new();
    for workers in [1, 4] {
        let dir = tempfile::TempDir::new().unwrap();
        let config = prepared_config(dir.path(), workers);
        store::save(&series, &config.dataset_path()).unwrap();
        prepare(&config).unwrap();

        let train: Vec<EncodedExample> =
            store::load(&config.split_path("train_graphs")).unwrap();
        let val: Vec<EncodedExample> = store::load(&config.split_path("val_graphs")).unwrap();
        encoded_runs.push((train, val));
    }

    assert_eq!(encoded_runs[0], encoded_runs[1]);
}

#[test]
fn seeded_shuffles_reproduce_identical_splits() {
    let series = dataset(12, 3);

    let mut raw_runs = Vec::new();
    for _ in 0..2 {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = prepared_config(dir.path(), 1);
        config.split.randomize = true;
        config.split.seed = Some(7);
        store::save(&series, &config.dataset_path()).unwrap();
        prepare(&config).unwrap();

        let train: Vec<TimeSeries> =
            store::load(&config.split_path("train_graphs_raw")).unwrap();
        let test: Vec<TimeSeries> = store::load(&config.split_path("test_graphs")).unwrap();
        raw_runs.push((train, test));
    }

    assert_eq!(raw_runs[0], raw_runs[1]);
}

#[test]
fn tiny_dataset_reuses_splits_for_debugging() {
    let dir = tempfile::TempDir::new().unwrap();
    let series = dataset(2, 3);

    let mut config = prepared_config(dir.path(), 1);
    config.split.train_p = 0.0;
    config.split.val_p = 0.0;
    store::save(&series, &config.dataset_path()).unwrap();

    let report = prepare(&config).unwrap();
    assert_eq!(report.train_series, 2);
    assert_eq!(report.val_series, 2);
    assert_eq!(report.test_series, 2);
    assert_eq!(report.series_len, 3);
    // Both series contribute T - 1 = 2 examples to each encoded split.
    assert_eq!(report.train_examples, 4);
    assert_eq!(report.val_examples, 4);

    let raw_test: Vec<TimeSeries> = store::load(&config.split_path("test_graphs")).unwrap();
    assert_eq!(raw_test, series);
}
