//! Error types for arithmetic coding.

use thiserror::Error;

/// Error variants for coding operations.
///
/// Every variant is either a *domain* error (caller misuse, see
/// [`Error::is_domain`]) or a *logic* error (an internal invariant was
/// violated, see [`Error::is_logic`]), except [`Error::Io`] which merely
/// wraps a transport failure. Errors are terminal for the current stream;
/// nothing inside the core catches and recovers.
#[derive(Debug, Error)]
pub enum Error {
    /// The number of state bits is outside the supported range [1, 63].
    #[error("invalid number of state bits: {0}")]
    InvalidStateSize(u32),

    /// A symbol at or above the table's symbol limit was requested.
    #[error("symbol {symbol} out of range (limit {limit})")]
    SymbolOutOfRange {
        /// The offending symbol.
        symbol: u32,
        /// The table's symbol limit.
        limit: u32,
    },

    /// The symbol to be coded has zero frequency.
    #[error("symbol {0} has zero frequency")]
    ZeroFrequency(u32),

    /// The frequency table's total exceeds the maximum the coder can
    /// handle at the current state size.
    #[error("frequency total {total} exceeds maximum {maximum}")]
    TotalTooLarge {
        /// The table's total.
        total: u64,
        /// The largest total the coder accepts.
        maximum: u64,
    },

    /// A frequency total would exceed the 32-bit unsigned range.
    #[error("arithmetic overflow in frequency total")]
    ArithmeticOverflow,

    /// The operation is not supported by this frequency table.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A constructor argument was out of its legal range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A bit outside {0, 1} was passed to the bit writer.
    #[error("bit must be 0 or 1, got {0}")]
    InvalidBit(u8),

    /// The PPM history window is longer than the model order allows.
    #[error("history of length {length} exceeds model order {order}")]
    HistoryTooLong {
        /// Length of the offending history.
        length: usize,
        /// The model's order.
        order: i32,
    },

    /// The PPM model order is below the minimum of -1.
    #[error("invalid model order: {0}")]
    InvalidOrder(i32),

    /// The encoder's underflow counter reached its representable maximum.
    #[error("maximum underflow reached")]
    MaximumUnderflow,

    /// The bit stream ended where more bits were required.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// An internal invariant of the coder was violated.
    #[error("internal inconsistency: {0}")]
    Logic(&'static str),

    /// An I/O error occurred on the underlying byte stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error signals caller misuse.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::InvalidStateSize(_)
                | Error::SymbolOutOfRange { .. }
                | Error::ZeroFrequency(_)
                | Error::TotalTooLarge { .. }
                | Error::ArithmeticOverflow
                | Error::Unsupported(_)
                | Error::InvalidArgument(_)
                | Error::InvalidBit(_)
                | Error::HistoryTooLong { .. }
                | Error::InvalidOrder(_)
                | Error::MaximumUnderflow
        )
    }

    /// Whether this error signals a violated internal invariant.
    pub fn is_logic(&self) -> bool {
        matches!(self, Error::Logic(_) | Error::UnexpectedEof)
    }
}

/// A specialized Result type for coding operations.
pub type Result<T> = std::result::Result<T, Error>;
