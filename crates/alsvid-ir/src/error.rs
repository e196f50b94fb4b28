//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Input pattern width does not match the circuit.
    #[error("Input pattern has {got} bits, circuit has {expected} lines")]
    WidthMismatch {
        /// Number of lines in the circuit.
        expected: usize,
        /// Number of bits supplied.
        got: usize,
    },

    /// A referenced line is outside the circuit.
    #[error("Line {line} out of range for circuit with {lines} lines")]
    LineOutOfRange {
        /// The offending line.
        line: u32,
        /// Number of lines in the circuit.
        lines: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
