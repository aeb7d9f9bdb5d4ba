//! The encoding pipeline: deltas, flattening, and tensor conversion.
//!
//! [`EncodingPipeline::encode`] turns a collection of time series into a flat,
//! order-preserving list of [`EncodedExample`]s:
//!
//! 1. compute per-series deltas on the worker pool;
//! 2. trim each series' final snapshot (it has no successor to diff against)
//!    and flatten into positionally aligned (prior graph, delta) pairs;
//! 3. embed every prior graph on the worker pool;
//! 4. attach one-hot node-identity features;
//! 5. zip embedded graphs with their deltas, positionally.
//!
//! The output ordering is the contract downstream consumers rely on: series in
//! input order, timesteps in temporal order, independent of worker count. A
//! series of length `T` contributes exactly `T - 1` examples.

use serde::{Deserialize, Serialize};

use crate::delta::{Delta, compute_delta};
use crate::embed::{EdgeIndexEmbedder, Embed, TensorGraph};
use crate::error::PipelineError;
use crate::pool::WorkerPool;
use crate::series::{Snapshot, TimeSeries};

/// Result type for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// A ready-to-batch training example: tensor-encoded prior graph plus the
/// structural delta leading to the next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub graph: TensorGraph,
    pub delta: Delta,
}

/// Trim the final snapshot of each series and flatten into aligned pairs.
///
/// Series are concatenated in input order, timesteps in temporal order.
/// Alignment is derived purely from list lengths; a length disagreement means
/// the delta lists were not produced from these series in this order, and is
/// rejected before any pair is emitted.
pub fn flatten(
    series: &[TimeSeries],
    deltas: Vec<Vec<Delta>>,
) -> PipelineResult<Vec<(&Snapshot, Delta)>> {
    if series.len() != deltas.len() {
        return Err(PipelineError::MisalignedCollection {
            series_lists: series.len(),
            delta_lists: deltas.len(),
        });
    }

    let mut pairs = Vec::with_capacity(deltas.iter().map(Vec::len).sum());
    for (i, (ts, ds)) in series.iter().zip(deltas).enumerate() {
        let prior_count = ts.len().saturating_sub(1);
        if ds.len() != prior_count {
            return Err(PipelineError::Misaligned {
                series: i,
                graphs: prior_count,
                deltas: ds.len(),
            });
        }
        for (snapshot, delta) in ts.snapshots()[..prior_count].iter().zip(ds) {
            pairs.push((snapshot, delta));
        }
    }
    Ok(pairs)
}

/// Orchestrates delta computation, flattening, and embedding over a pool.
#[derive(Debug, Clone)]
pub struct EncodingPipeline<E = EdgeIndexEmbedder> {
    pool: WorkerPool,
    embedder: E,
    signed: bool,
}

impl EncodingPipeline<EdgeIndexEmbedder> {
    /// Pipeline with the built-in edge-index embedder and signed deltas.
    pub fn new(pool: WorkerPool) -> Self {
        Self::with_embedder(pool, EdgeIndexEmbedder)
    }
}

impl<E: Embed> EncodingPipeline<E> {
    /// Pipeline with a custom embedding backend.
    pub fn with_embedder(pool: WorkerPool, embedder: E) -> Self {
        Self {
            pool,
            embedder,
            signed: true,
        }
    }

    /// Select signed (`+1`/`-1`) or absolute (magnitude-only) deltas.
    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Encode a collection of series into aligned examples.
    ///
    /// Does not mutate `series`; the output length is exactly
    /// `sum(len(s) - 1)` over all series. Any failing unit of work aborts the
    /// whole encoding with no partial output.
    pub fn encode(&self, series: &[TimeSeries]) -> PipelineResult<Vec<EncodedExample>> {
        tracing::debug!(series = series.len(), "computing deltas");
        let deltas = self
            .pool
            .map(series, |ts| compute_delta(ts, self.signed))?;

        let pairs = flatten(series, deltas)?;

        tracing::debug!(examples = pairs.len(), "embedding prior graphs");
        let mut graphs = self
            .pool
            .map(&pairs, |(snapshot, _)| self.embedder.embed(snapshot))?;

        for graph in &mut graphs {
            graph.attach_identity_features();
        }

        debug_assert_eq!(graphs.len(), pairs.len());
        Ok(graphs
            .into_iter()
            .zip(pairs)
            .map(|(graph, (_, delta))| EncodedExample { graph, delta })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmbedError, PoolError};
    use crate::series::Snapshot;
    use ndarray::Array2;

    /// A ring-ish series over `n` nodes whose edge set rotates each step.
    fn rotating_series(n: usize, t: usize) -> TimeSeries {
        let snapshots = (0..t)
            .map(|step| {
                let edges = (0..n as u32 - 1)
                    .filter(|i| (*i as usize + step) % 3 != 0)
                    .map(|i| (i, i + 1));
                Snapshot::with_edges(n, edges).unwrap()
            })
            .collect();
        TimeSeries::new(snapshots).unwrap()
    }

    #[test]
    fn example_count_is_sum_of_lengths_minus_one() {
        let series = vec![
            rotating_series(5, 1),
            rotating_series(5, 2),
            rotating_series(5, 4),
        ];
        let pipeline = EncodingPipeline::new(WorkerPool::new(1));
        let examples = pipeline.encode(&series).unwrap();
        // 0 + 1 + 3 examples from lengths 1, 2, 4.
        assert_eq!(examples.len(), 4);
    }

    #[test]
    fn examples_align_with_directly_computed_deltas() {
        let series = vec![rotating_series(6, 4)];
        let pipeline = EncodingPipeline::new(WorkerPool::new(1));
        let examples = pipeline.encode(&series).unwrap();

        let expected = compute_delta(&series[0], true).unwrap();
        assert_eq!(examples.len(), 3);
        for (i, example) in examples.iter().enumerate() {
            assert_eq!(example.delta, expected[i]);
            let direct = EdgeIndexEmbedder.embed(&series[0][i]).unwrap();
            assert_eq!(example.graph.edge_index(), direct.edge_index());
        }
    }

    #[test]
    fn output_is_invariant_under_worker_count() {
        let series: Vec<_> = (0..6).map(|i| rotating_series(4 + i % 3, 3)).collect();

        let baseline = EncodingPipeline::new(WorkerPool::new(1))
            .encode(&series)
            .unwrap();
        for workers in [2, 4, 8] {
            let pool = WorkerPool::new(workers).with_chunk_size(1);
            let encoded = EncodingPipeline::new(pool).encode(&series).unwrap();
            assert_eq!(encoded, baseline, "workers = {workers}");
        }
    }

    #[test]
    fn identity_features_match_node_count() {
        let series = vec![rotating_series(5, 2), rotating_series(7, 2)];
        let examples = EncodingPipeline::new(WorkerPool::new(1))
            .encode(&series)
            .unwrap();
        assert_eq!(examples[0].graph.features(), &Array2::<f32>::eye(5));
        assert_eq!(examples[1].graph.features(), &Array2::<f32>::eye(7));
    }

    #[test]
    fn flatten_rejects_per_series_length_disagreement() {
        let series = vec![rotating_series(4, 3)];
        let err = flatten(&series, vec![vec![]]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Misaligned {
                series: 0,
                graphs: 2,
                deltas: 0,
            }
        ));
    }

    #[test]
    fn flatten_rejects_collection_length_disagreement() {
        let series = vec![rotating_series(4, 2)];
        let err = flatten(&series, vec![]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MisalignedCollection {
                series_lists: 1,
                delta_lists: 0,
            }
        ));
    }

    /// Embedder that fails on any snapshot with at least one edge.
    struct RejectEdges;

    impl Embed for RejectEdges {
        fn embed(&self, snapshot: &Snapshot) -> Result<TensorGraph, EmbedError> {
            if snapshot.num_edges() > 0 {
                return Err(EmbedError::Failed {
                    message: "edges not supported".into(),
                });
            }
            EdgeIndexEmbedder.embed(snapshot)
        }
    }

    #[test]
    fn embedding_failure_aborts_with_failing_index() {
        // Second prior graph (index 1) has edges; the first does not.
        let a = TimeSeries::new(vec![Snapshot::new(3), Snapshot::new(3)]).unwrap();
        let b = TimeSeries::new(vec![
            Snapshot::with_edges(3, [(0, 1)]).unwrap(),
            Snapshot::new(3),
        ])
        .unwrap();

        let pipeline = EncodingPipeline::with_embedder(WorkerPool::new(1), RejectEdges);
        let err = pipeline.encode(&[a, b]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Pool(PoolError::Task { index: 1, .. })
        ));
    }
}
