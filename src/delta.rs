//! Structural deltas between consecutive snapshots.
//!
//! A [`Delta`] encodes, per node pair, what changed from snapshot `t` to
//! snapshot `t + 1`: `+1` for an appearing edge, `-1` for a disappearing edge,
//! absent for unchanged pairs. [`compute_delta`] produces one delta per
//! adjacent snapshot pair, so a series of length `T` yields `T - 1` deltas.
//!
//! Deltas are graph-like structures in their own right (fixed node set,
//! weighted changed pairs) so downstream consumers can treat them uniformly
//! with snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DeltaError;
use crate::series::TimeSeries;

/// Result type for delta operations.
pub type DeltaResult<T> = std::result::Result<T, DeltaError>;

/// Edge-wise structural change between two snapshots of equal node count.
///
/// Only changed pairs are stored; unchanged pairs are implicitly zero.
/// Computed once per adjacent snapshot pair and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    num_nodes: usize,
    changes: BTreeMap<(u32, u32), i8>,
}

impl Delta {
    /// The fixed node count this delta is defined over.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of changed node pairs.
    pub fn num_changes(&self) -> usize {
        self.changes.len()
    }

    /// The change value for a node pair: `+1`, `-1`, or `0` if unchanged.
    pub fn change(&self, a: u32, b: u32) -> i8 {
        self.changes
            .get(&(a.min(b), a.max(b)))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate over changed pairs in canonical order.
    pub fn changes(&self) -> impl Iterator<Item = ((u32, u32), i8)> + '_ {
        self.changes.iter().map(|(&pair, &sign)| (pair, sign))
    }

    /// Split a signed delta into positive-only and negative-only layers.
    ///
    /// Both layers carry magnitude `1` per changed pair, so each is a plain
    /// binary change mask. An absolute-mode delta has no negative entries and
    /// splits into `(self, empty)`.
    pub fn split_channels(&self) -> (Delta, Delta) {
        let positive = self
            .changes
            .iter()
            .filter(|&(_, &sign)| sign > 0)
            .map(|(&pair, _)| (pair, 1))
            .collect();
        let negative = self
            .changes
            .iter()
            .filter(|&(_, &sign)| sign < 0)
            .map(|(&pair, _)| (pair, 1))
            .collect();
        (
            Delta {
                num_nodes: self.num_nodes,
                changes: positive,
            },
            Delta {
                num_nodes: self.num_nodes,
                changes: negative,
            },
        )
    }
}

/// Compute the deltas along a time series.
///
/// Returns `len(series) - 1` deltas, where delta `i` captures the change from
/// snapshot `i` to snapshot `i + 1`. With `signed` false (absolute mode) every
/// changed pair is recorded with magnitude `1` regardless of direction.
///
/// Pure and side-effect-free; safe to run concurrently over disjoint series.
pub fn compute_delta(series: &TimeSeries, signed: bool) -> DeltaResult<Vec<Delta>> {
    let snapshots = series.snapshots();
    let mut deltas = Vec::with_capacity(snapshots.len().saturating_sub(1));

    for (step, pair) in snapshots.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        // The series constructor enforces a constant node count, but data
        // loaded from disk bypasses it; re-check before diffing.
        if prev.num_nodes() != next.num_nodes() {
            return Err(DeltaError::ShapeMismatch {
                step,
                expected: prev.num_nodes(),
                actual: next.num_nodes(),
            });
        }

        let mut changes = BTreeMap::new();
        for &edge in next.edge_set().difference(prev.edge_set()) {
            changes.insert(edge, 1);
        }
        let removal = if signed { -1 } else { 1 };
        for &edge in prev.edge_set().difference(next.edge_set()) {
            changes.insert(edge, removal);
        }

        deltas.push(Delta {
            num_nodes: prev.num_nodes(),
            changes,
        });
    }

    Ok(deltas)
}
