use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can escape the engine.
///
/// Business data never produces one of these: missing sub-models, negative
/// drivers and zero denominators are absorbed as zeros, clamps and warnings.
/// What remains are solver failures, reader failures and shape problems.
#[derive(Debug, Error)]
pub enum ProformaError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Deal reader failure: {0}")]
    Reader(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProformaError {
    fn from(e: serde_json::Error) -> Self {
        ProformaError::SerializationError(e.to_string())
    }
}
