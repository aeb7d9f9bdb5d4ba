//! End-to-end dataset preparation: load, partition, encode, persist.
//!
//! [`prepare`] is the orchestrator: it loads a raw dataset by name, partitions
//! it, persists the raw splits, then encodes train and validation and persists
//! those too. Test stays raw by policy: evaluation-time consumers run the
//! encoding pipeline themselves.
//!
//! Failures are terminal: nothing is written for a split whose encoding
//! failed, and the empty-test check runs before any file is touched. Large
//! intermediates are dropped as soon as their output is on disk, since
//! datasets can be large relative to memory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embed::Embed;
use crate::encode::EncodingPipeline;
use crate::error::{SeshatResult, SplitError};
use crate::pool::{DEFAULT_CHUNK_SIZE, WorkerPool};
use crate::series::TimeSeries;
use crate::split::{SplitConfig, Splits, partition};
use crate::store;

/// Configuration for a [`prepare`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    /// Directory holding `{dataset}.bin` and receiving the split files.
    pub data_dir: PathBuf,
    /// Dataset name, without extension.
    pub dataset: String,
    /// Worker bound for delta computation and embedding.
    pub num_workers: usize,
    /// Items dispatched to a worker at a time.
    pub chunk_size: usize,
    /// Signed (`+1`/`-1`) vs absolute (magnitude-only) deltas.
    pub signed: bool,
    /// Partitioning policy.
    pub split: SplitConfig,
}

impl PrepareConfig {
    /// Configuration with default worker, chunking, and split settings.
    pub fn new(data_dir: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            dataset: dataset.into(),
            num_workers: 1,
            chunk_size: DEFAULT_CHUNK_SIZE,
            signed: true,
            split: SplitConfig::default(),
        }
    }

    /// Path of the raw input dataset.
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.bin", self.dataset))
    }

    /// Path of a named split file.
    pub fn split_path(&self, stem: &str) -> PathBuf {
        self.data_dir.join(format!("{}_{stem}.bin", self.dataset))
    }
}

/// Split sizes and example counts from a completed [`prepare`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareReport {
    pub train_series: usize,
    pub val_series: usize,
    pub test_series: usize,
    /// Snapshot count (T) of the first test series.
    pub series_len: usize,
    pub train_examples: usize,
    pub val_examples: usize,
}

fn encode_and_save<E: Embed>(
    pipeline: &EncodingPipeline<E>,
    series: Vec<TimeSeries>,
    path: &Path,
) -> SeshatResult<usize> {
    let encoded = pipeline.encode(&series)?;
    drop(series);
    let count = encoded.len();
    store::save(&encoded, path)?;
    Ok(count)
}

/// Run the full preparation flow for one dataset.
pub fn prepare(config: &PrepareConfig) -> SeshatResult<PrepareReport> {
    let dataset_path = config.dataset_path();
    tracing::info!(path = %dataset_path.display(), "loading time series");
    let series: Vec<TimeSeries> = store::load(&dataset_path)?;

    let Splits { train, val, test } = partition(series, &config.split)?;

    // Report before writing anything: an empty test split cannot report its
    // series length, and failing here leaves the data directory untouched.
    let series_len = test
        .first()
        .map(TimeSeries::len)
        .ok_or_else(|| SplitError::InsufficientData {
            message: "test split is empty, nothing to report".into(),
        })?;
    let (train_series, val_series, test_series) = (train.len(), val.len(), test.len());
    tracing::info!(
        train = train_series,
        val = val_series,
        test = test_series,
        series_len,
        "partitioned time series"
    );

    store::save(&train, &config.split_path("train_graphs_raw"))?;
    store::save(&val, &config.split_path("val_graphs_raw"))?;
    store::save(&test, &config.split_path("test_graphs"))?;
    // Test needs no preprocessing; release it before encoding starts.
    drop(test);

    let pool = WorkerPool::new(config.num_workers).with_chunk_size(config.chunk_size);
    let pipeline = EncodingPipeline::new(pool).signed(config.signed);

    let train_examples =
        encode_and_save(&pipeline, train, &config.split_path("train_graphs"))?;
    tracing::info!(examples = train_examples, "encoded training split");

    let val_examples = encode_and_save(&pipeline, val, &config.split_path("val_graphs"))?;
    tracing::info!(examples = val_examples, "encoded validation split");

    Ok(PrepareReport {
        train_series,
        val_series,
        test_series,
        series_len,
        train_examples,
        val_examples,
    })
}
