//! Graph snapshots and per-entity time series.
//!
//! A [`Snapshot`] is a relational structure over a fixed node set: `num_nodes`
//! identity-carrying nodes (indices `0..num_nodes`) and an unordered edge set.
//! A [`TimeSeries`] is an ordered sequence of snapshots for one entity, with a
//! constant node count across all snapshots, the invariant that makes
//! edge-wise deltas and one-hot node identity encodings well defined.

use std::collections::BTreeSet;

use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Result type for series operations.
pub type SeriesResult<T> = std::result::Result<T, SeriesError>;

/// A single graph snapshot: fixed node set, undirected edges.
///
/// Edges are stored normalized (`(min, max)` endpoint order) so that the edge
/// set is canonical and two snapshots compare equal iff they have the same
/// structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    num_nodes: usize,
    edges: BTreeSet<(u32, u32)>,
}

impl Snapshot {
    /// Create an empty snapshot with `num_nodes` isolated nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            edges: BTreeSet::new(),
        }
    }

    /// Create a snapshot from an edge list.
    pub fn with_edges(
        num_nodes: usize,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> SeriesResult<Self> {
        let mut snapshot = Self::new(num_nodes);
        for (a, b) in edges {
            snapshot.add_edge(a, b)?;
        }
        Ok(snapshot)
    }

    fn check_node(&self, node: u32) -> SeriesResult<()> {
        if (node as usize) < self.num_nodes {
            Ok(())
        } else {
            Err(SeriesError::NodeOutOfRange {
                node,
                num_nodes: self.num_nodes,
            })
        }
    }

    /// Insert an undirected edge. Returns whether the edge was new.
    pub fn add_edge(&mut self, a: u32, b: u32) -> SeriesResult<bool> {
        self.check_node(a)?;
        self.check_node(b)?;
        Ok(self.edges.insert((a.min(b), a.max(b))))
    }

    /// Remove an undirected edge. Returns whether the edge existed.
    pub fn remove_edge(&mut self, a: u32, b: u32) -> bool {
        self.edges.remove(&(a.min(b), a.max(b)))
    }

    /// Whether an edge exists between `a` and `b`.
    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// Number of nodes in the fixed node set.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over edges in canonical (sorted, normalized) order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().copied()
    }

    /// Canonical edge set.
    pub fn edge_set(&self) -> &BTreeSet<(u32, u32)> {
        &self.edges
    }

    /// Build a `petgraph` view of this snapshot.
    ///
    /// Node weights are the snapshot's node indices, so graph algorithms can
    /// map results back to the fixed node set.
    pub fn to_petgraph(&self) -> UnGraph<u32, ()> {
        let mut graph = UnGraph::with_capacity(self.num_nodes, self.edges.len());
        let indices: Vec<_> = (0..self.num_nodes as u32)
            .map(|i| graph.add_node(i))
            .collect();
        for &(a, b) in &self.edges {
            graph.add_edge(indices[a as usize], indices[b as usize], ());
        }
        graph
    }
}

/// An ordered sequence of snapshots for one entity.
///
/// Non-empty, with a constant node count across snapshots. A series of length
/// `T` yields `T - 1` (prior graph, delta) examples downstream; `T >= 2` is
/// required for delta computation to produce anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    snapshots: Vec<Snapshot>,
}

impl TimeSeries {
    /// Build a series, validating the constant-node-count invariant.
    pub fn new(snapshots: Vec<Snapshot>) -> SeriesResult<Self> {
        let first = snapshots.first().ok_or(SeriesError::Empty)?;
        let expected = first.num_nodes();
        for (i, snapshot) in snapshots.iter().enumerate() {
            if snapshot.num_nodes() != expected {
                return Err(SeriesError::NodeCountDrift {
                    snapshot: i,
                    expected,
                    actual: snapshot.num_nodes(),
                });
            }
        }
        Ok(Self { snapshots })
    }

    /// Number of snapshots (T).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a series holds at least one snapshot by construction.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The series-wide constant node count.
    pub fn num_nodes(&self) -> usize {
        self.snapshots[0].num_nodes()
    }

    /// The snapshots in temporal order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Iterate over snapshots in temporal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }
}

impl std::ops::Index<usize> for TimeSeries {
    type Output = Snapshot;

    fn index(&self, index: usize) -> &Snapshot {
        &self.snapshots[index]
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
