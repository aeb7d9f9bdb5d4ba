//! Tensor-ready graph encodings and the embedding capability seam.
//!
//! [`Embed`] is the boundary to whatever turns a [`Snapshot`] into a
//! [`TensorGraph`]; the pipeline only requires that node ordering and count
//! survive the conversion, so the identity feature matrix attached afterwards
//! stays valid. [`EdgeIndexEmbedder`] is the built-in backend: a COO
//! edge-index encoding with both directions per undirected edge, the layout
//! batched graph learners consume.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::EmbedError;
use crate::series::Snapshot;

/// Result type for embedding operations.
pub type EmbedResult<T> = std::result::Result<T, EmbedError>;

/// A graph in tensor form: COO edge index plus per-node feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorGraph {
    num_nodes: usize,
    /// `2 x num_directed_edges`: row 0 sources, row 1 targets.
    edge_index: Array2<i64>,
    /// `num_nodes x feature_dim`; empty until features are attached.
    features: Array2<f32>,
}

impl TensorGraph {
    /// Build a tensor graph from an edge-index array.
    ///
    /// The array must have exactly two rows and every endpoint must lie in
    /// `0..num_nodes`.
    pub fn new(num_nodes: usize, edge_index: Array2<i64>) -> EmbedResult<Self> {
        if edge_index.nrows() != 2 {
            return Err(EmbedError::Failed {
                message: format!("edge index must have 2 rows, got {}", edge_index.nrows()),
            });
        }
        if let Some(&node) = edge_index
            .iter()
            .find(|&&n| n < 0 || n >= num_nodes as i64)
        {
            return Err(EmbedError::Failed {
                message: format!("edge endpoint {node} out of range for {num_nodes} nodes"),
            });
        }
        Ok(Self {
            num_nodes,
            edge_index,
            features: Array2::zeros((0, 0)),
        })
    }

    /// Node count of the underlying snapshot.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of directed edges in the COO encoding.
    pub fn num_directed_edges(&self) -> usize {
        self.edge_index.ncols()
    }

    /// The `2 x E` edge-index array.
    pub fn edge_index(&self) -> &Array2<i64> {
        &self.edge_index
    }

    /// The per-node feature matrix (empty until attached).
    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    /// Attach one-hot node-identity features: the `n x n` identity matrix.
    pub fn attach_identity_features(&mut self) {
        self.features = Array2::eye(self.num_nodes);
    }
}

/// The embedding capability: snapshot in, tensor graph out.
///
/// Implementations must preserve node ordering and count. `Sync` because the
/// pipeline fans embedding out across a worker pool.
pub trait Embed: Sync {
    fn embed(&self, snapshot: &Snapshot) -> EmbedResult<TensorGraph>;
}

/// Built-in embedder producing a COO edge index via the petgraph view.
///
/// Each undirected edge contributes both directions (self-loops once), in the
/// snapshot's canonical edge order, so the encoding is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeIndexEmbedder;

impl Embed for EdgeIndexEmbedder {
    fn embed(&self, snapshot: &Snapshot) -> EmbedResult<TensorGraph> {
        let graph = snapshot.to_petgraph();

        let mut sources = Vec::with_capacity(graph.edge_count() * 2);
        let mut targets = Vec::with_capacity(graph.edge_count() * 2);
        for edge in graph.edge_indices() {
            let (a, b) = graph
                .edge_endpoints(edge)
                .expect("edge index from this graph");
            let (a, b) = (graph[a] as i64, graph[b] as i64);
            sources.push(a);
            targets.push(b);
            if a != b {
                sources.push(b);
                targets.push(a);
            }
        }

        let columns = sources.len();
        let mut flat = sources;
        flat.extend(targets);
        let edge_index =
            Array2::from_shape_vec((2, columns), flat).map_err(|e| EmbedError::Failed {
                message: format!("edge index shape: {e}"),
            })?;

        TensorGraph::new(snapshot.num_nodes(), edge_index)
    }
}
