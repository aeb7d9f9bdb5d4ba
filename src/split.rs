//! Train/validation/test partitioning of time series collections.
//!
//! Splitting is entity-level: whole time series move between splits, never
//! individual snapshots. Slicing is floor-based, and two deliberate
//! degenerate rules make tiny debug datasets usable instead of producing
//! empty splits:
//!
//! - a zero-length train slice reuses the *entire* input as both train and
//!   test;
//! - a zero-length validation slice reuses the *entire* training slice as
//!   validation.
//!
//! Both shortcuts are gated behind [`SplitConfig::reuse_on_empty`] (on by
//! default); turning the flag off surfaces the first as an error and makes
//! the second an honest empty split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::SplitError;
use crate::series::TimeSeries;

/// Result type for split operations.
pub type SplitResult<T> = std::result::Result<T, SplitError>;

/// Configuration for [`partition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Proportion of all series used for training; the rest become test.
    pub train_p: f64,
    /// Proportion of the *training* slice carved off for validation.
    pub val_p: f64,
    /// Shuffle series order before slicing.
    pub randomize: bool,
    /// Seed for the shuffle; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Reuse full slices when a requested slice rounds down to zero length.
    pub reuse_on_empty: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_p: 0.8,
            val_p: 0.1,
            randomize: true,
            seed: None,
            reuse_on_empty: true,
        }
    }
}

/// The three partitions produced by [`partition`].
///
/// Train and validation are later encoded by the pipeline; test stays raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splits {
    pub train: Vec<TimeSeries>,
    pub val: Vec<TimeSeries>,
    pub test: Vec<TimeSeries>,
}

fn check_proportion(name: &'static str, value: f64) -> SplitResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SplitError::InvalidProportion { name, value })
    }
}

/// Partition a collection of time series into train/validation/test.
///
/// Slicing order matches the preparation convention: the first
/// `floor(n * train_p)` series are train, the rest test; the first
/// `floor(len(train) * val_p)` training series are moved to validation.
/// With `randomize` the list is shuffled first, so "first" means first in
/// shuffled order.
pub fn partition(mut series: Vec<TimeSeries>, config: &SplitConfig) -> SplitResult<Splits> {
    check_proportion("train_p", config.train_p)?;
    check_proportion("val_p", config.val_p)?;

    if series.is_empty() {
        return Err(SplitError::InsufficientData {
            message: "no time series to partition".into(),
        });
    }

    if config.randomize {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        series.shuffle(&mut rng);
    }

    let train_ix = (series.len() as f64 * config.train_p).floor() as usize;

    let (mut train, test) = if train_ix == 0 {
        if !config.reuse_on_empty {
            return Err(SplitError::InsufficientData {
                message: format!(
                    "train_p = {} selects 0 of {} series",
                    config.train_p,
                    series.len()
                ),
            });
        }
        // Debug shortcut: the whole list doubles as train and test.
        tracing::debug!(
            count = series.len(),
            "train slice is empty, reusing the full list for train and test"
        );
        (series.clone(), series)
    } else {
        let test = series.split_off(train_ix);
        (series, test)
    };

    let val_len = (train.len() as f64 * config.val_p).floor() as usize;
    let val = if val_len > 0 {
        // Carve validation off the front; train keeps the remainder.
        train.drain(..val_len).collect()
    } else if config.reuse_on_empty {
        // Debug shortcut: the whole training slice doubles as validation.
        tracing::debug!(
            count = train.len(),
            "validation slice is empty, reusing the full training slice"
        );
        train.clone()
    } else {
        Vec::new()
    };

    Ok(Splits { train, val, test })
}
