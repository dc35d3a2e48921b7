use thiserror::Error;

/// Failures raised by addressing, history recording and text codes.
///
/// Absent cells are not an error: lookups return `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A key element is label-like, or a range was used where only a single
    /// cell can be addressed (writes, single-cell attribute queries).
    #[error("unsupported addressing: {0}")]
    UnsupportedAddressing(String),

    /// An undo/redo operand does not pair a callable with a matching argument list.
    #[error("malformed undo/redo operand '{command}': expected {expected} argument(s), got {got}")]
    MalformedUnRedoOperand {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    /// A replayed command received an argument of the wrong kind.
    #[error("invalid argument {index} for '{command}'")]
    InvalidEditArgument { command: &'static str, index: usize },

    /// Key or axis does not fit the grid's dimensionality.
    #[error("dimension mismatch: expected {expected} axes, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Every axis of a grid holds at least one slice.
    #[error("axis {axis} has a zero bound")]
    ZeroBound { axis: usize },

    /// Slices cannot step by zero.
    #[error("slice step cannot be zero")]
    ZeroSliceStep,

    /// Colour code text is not a 3-tuple of floats.
    #[error("invalid colour code: {0}")]
    InvalidColorCode(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
