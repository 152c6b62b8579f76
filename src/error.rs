use thiserror::Error;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, NnError>;

/// Everything that can stop a network from being built, run or trained.
///
/// None of these are transient: each one points at a bad configuration, bad
/// input data or a bug in the gradient computation, so callers are expected
/// to surface them rather than retry.
#[derive(Error, Debug)]
pub enum NnError {
    /// Layer sizes, learning rate, batch size, epochs or reducer threshold
    /// are out of their valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A vector handed to the network does not have the expected length.
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// The analytic gradient disagrees with the finite-difference estimate.
    #[error(
        "gradient check failed at layer {layer}, row {row}, col {col}: \
         expected {expected}, actual {actual} [{trace}]"
    )]
    GradientCheckFailure {
        layer: usize,
        row: usize,
        col: usize,
        expected: f64,
        actual: f64,
        trace: String,
    },

    /// A layer or neuron index outside the parameter shapes.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A dataset file that does not follow the IDX layout.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
