// =============================================================================
// Error Types
// =============================================================================
//
// A single error enum is shared by the whole crate. Most mismatches between a
// prior and the scaling routine that looks at it are NOT errors: the term is
// simply skipped so users can mix hand-written and auto-scaled priors. The
// variants below are reserved for input that cannot produce a sensible prior.
//
// =============================================================================

use thiserror::Error;

/// Errors raised while deriving default priors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutoPriorError {
    /// A predictor column has zero or non-finite spread (or a non-finite
    /// mean), so no finite width can be derived from it.
    #[error("degenerate predictor: column {column} of term '{term}' has zero or non-finite standard deviation")]
    DegeneratePredictor { term: String, column: usize },

    /// Array shapes don't line up (e.g. predictor rows vs response length).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Statistics were requested from an empty array.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A value is outside the range the computation can work with.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AutoPriorError>;
