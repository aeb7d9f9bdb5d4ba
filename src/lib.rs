//! # seshat
//!
//! Temporal graph dataset preparation: turns collections of graph time series
//! into train/validation/test splits of tensor-ready (prior graph, delta)
//! examples for downstream learning.
//!
//! ## Architecture
//!
//! - **Series** (`series`): fixed-node-set snapshots and per-entity time series
//! - **Deltas** (`delta`): edge-wise structural change between adjacent snapshots
//! - **Worker pool** (`pool`): bounded, order-preserving parallel map via `rayon`
//! - **Partitioning** (`split`): seedable entity-level train/val/test splits
//! - **Encoding** (`embed`, `encode`): COO edge-index tensors (`ndarray`) with
//!   one-hot node-identity features, flattened in strict temporal alignment
//! - **Persistence** (`store`): opaque bincode save/load of splits
//! - **Orchestration** (`prepare`): the full load → split → encode → persist flow
//!
//! ## Library usage
//!
//! ```
//! use seshat::encode::EncodingPipeline;
//! use seshat::pool::WorkerPool;
//! use seshat::series::{Snapshot, TimeSeries};
//!
//! let series = TimeSeries::new(vec![
//!     Snapshot::with_edges(3, [(0, 1)]).unwrap(),
//!     Snapshot::with_edges(3, [(0, 1), (1, 2)]).unwrap(),
//!     Snapshot::with_edges(3, [(1, 2)]).unwrap(),
//! ])
//! .unwrap();
//!
//! let pipeline = EncodingPipeline::new(WorkerPool::new(2));
//! let examples = pipeline.encode(&[series]).unwrap();
//! assert_eq!(examples.len(), 2); // one example per adjacent snapshot pair
//! assert_eq!(examples[0].delta.change(1, 2), 1);
//! assert_eq!(examples[1].delta.change(0, 1), -1);
//! ```

pub mod delta;
pub mod embed;
pub mod encode;
pub mod error;
pub mod pool;
pub mod prepare;
pub mod series;
pub mod split;
pub mod store;
