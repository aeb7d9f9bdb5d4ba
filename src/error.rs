//! Rich diagnostic error types for the seshat pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the seshat pipeline.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SeshatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Delta(#[from] DeltaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Series errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SeriesError {
    #[error("node {node} out of range for snapshot with {num_nodes} nodes")]
    #[diagnostic(
        code(seshat::series::node_out_of_range),
        help(
            "Edge endpoints must be node indices in 0..num_nodes. \
             Check the edge list, or create the snapshot with a larger node count."
        )
    )]
    NodeOutOfRange { node: u32, num_nodes: usize },

    #[error("time series is empty")]
    #[diagnostic(
        code(seshat::series::empty),
        help("A time series must contain at least one snapshot.")
    )]
    Empty,

    #[error("node count drifts within series: snapshot {snapshot} has {actual} nodes, expected {expected}")]
    #[diagnostic(
        code(seshat::series::node_count_drift),
        help(
            "All snapshots in one time series must share the same node set. \
             Pad smaller snapshots with isolated nodes before building the series."
        )
    )]
    NodeCountDrift {
        snapshot: usize,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Delta errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DeltaError {
    #[error("shape mismatch at step {step}: snapshot has {actual} nodes, expected {expected}")]
    #[diagnostic(
        code(seshat::delta::shape_mismatch),
        help(
            "Adjacent snapshots must have equal node counts for an edge-wise delta \
             to be defined. Fix the series so the node set stays constant over time."
        )
    )]
    ShapeMismatch {
        step: usize,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Worker pool errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PoolError {
    #[error("worker task {index} failed: {source}")]
    #[diagnostic(
        code(seshat::pool::task_failed),
        help(
            "A unit of work raised an error and the whole batch was aborted. \
             No partial results were returned. The index identifies the failing \
             input; re-run with num_workers = 1 for a deterministic first-failure."
        )
    )]
    Task {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("worker pool construction failed: {message}")]
    #[diagnostic(
        code(seshat::pool::build),
        help("The thread pool could not be created. Check num_workers and system limits.")
    )]
    Build { message: String },
}

// ---------------------------------------------------------------------------
// Split errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SplitError {
    #[error("insufficient data: {message}")]
    #[diagnostic(
        code(seshat::split::insufficient_data),
        help(
            "The dataset is too small for the requested partitioning. \
             Provide more time series, adjust train_p/val_p, or enable \
             reuse_on_empty to reuse splits on tiny debug datasets."
        )
    )]
    InsufficientData { message: String },

    #[error("invalid proportion {name} = {value} (must be in [0, 1])")]
    #[diagnostic(
        code(seshat::split::invalid_proportion),
        help("train_p and val_p are fractions of the dataset and must lie in [0, 1].")
    )]
    InvalidProportion { name: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Embedding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EmbedError {
    #[error("embedding failed: {message}")]
    #[diagnostic(
        code(seshat::embed::failed),
        help(
            "The embedding backend could not convert this snapshot to tensor form. \
             The snapshot is unchanged; fix the backend or the reported condition."
        )
    )]
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("misaligned series {series}: {graphs} prior graphs but {deltas} deltas")]
    #[diagnostic(
        code(seshat::pipeline::misaligned),
        help(
            "After trimming the final snapshot, each series must supply exactly one \
             delta per remaining graph. This indicates corrupted input or a delta \
             list produced from a different series ordering."
        )
    )]
    Misaligned {
        series: usize,
        graphs: usize,
        deltas: usize,
    },

    #[error("misaligned collections: {series_lists} series but {delta_lists} delta lists")]
    #[diagnostic(
        code(seshat::pipeline::misaligned_collection),
        help(
            "Flattening pairs each series with its own delta list; the two \
             collections must have equal length and identical ordering."
        )
    )]
    MisalignedCollection {
        series_lists: usize,
        delta_lists: usize,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pool(#[from] PoolError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(seshat::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(seshat::store::serde),
        help(
            "Failed to serialize or deserialize data. \
             This usually means the stored data format has changed between versions. \
             Re-run the preparation step to regenerate the file."
        )
    )]
    Serialization { message: String },
}

/// Convenience alias for functions returning seshat results.
pub type SeshatResult<T> = std::result::Result<T, SeshatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_error_converts_to_seshat_error() {
        let err = DeltaError::ShapeMismatch {
            step: 3,
            expected: 10,
            actual: 12,
        };
        let top: SeshatError = err.into();
        assert!(matches!(
            top,
            SeshatError::Delta(DeltaError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn pool_error_wraps_task_source() {
        let inner = DeltaError::ShapeMismatch {
            step: 0,
            expected: 4,
            actual: 5,
        };
        let err = PoolError::Task {
            index: 7,
            source: Box::new(inner),
        };
        let msg = format!("{err}");
        assert!(msg.contains("task 7"));
        assert!(msg.contains("shape mismatch"));
    }

    #[test]
    fn pipeline_error_wraps_pool_error() {
        let pool_err = PoolError::Build {
            message: "too many threads".into(),
        };
        let pipe: PipelineError = pool_err.into();
        assert!(matches!(pipe, PipelineError::Pool(PoolError::Build { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = SplitError::InvalidProportion {
            name: "train_p",
            value: 1.5,
        };
        let msg = format!("{err}");
        assert!(msg.contains("train_p"));
        assert!(msg.contains("1.5"));
    }
}
