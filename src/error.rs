//! Error types for clrtables.

use thiserror::Error;

use crate::tables::Diagnostic;

/// Result type alias for clrtables operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or decoding the tables stream.
#[derive(Debug, Error)]
pub enum Error {
    /// A read ran past the end of the buffer.
    #[error("read of {needed} bytes at offset {offset} exceeds buffer length {len}")]
    OutOfBounds {
        /// Offset where the read was attempted.
        offset: usize,
        /// Number of bytes needed.
        needed: usize,
        /// Length of the underlying buffer.
        len: usize,
    },

    /// The row count of a present table could not be read.
    ///
    /// Every later offset depends on this value, so no table definitions are
    /// produced.
    #[error("row count for table slot 0x{index:02X} could not be read")]
    RowCount {
        /// Table slot (bit index in the valid mask).
        index: u8,
        /// The underlying read failure.
        #[source]
        source: Box<Error>,
    },

    /// The running table offset no longer fits in 32 bits.
    #[error("tables region overflows 32 bits at table slot 0x{table:02X}")]
    TableSizeOverflow {
        /// First table slot whose size could not be accumulated.
        table: u8,
    },

    /// A table row could not be decoded.
    #[error("failed to decode row {row} of table {table}")]
    Row {
        /// Table name.
        table: &'static str,
        /// 1-based row index.
        row: u32,
        /// The underlying read failure.
        #[source]
        source: Box<Error>,
    },

    /// Invalid BSJB signature (expected 0x424A5342).
    #[error("invalid metadata signature: expected 0x424A5342, got 0x{0:08X}")]
    InvalidSignature(u32),

    /// Invalid or malformed string in the metadata root.
    #[error("invalid string at offset {0}")]
    InvalidString(usize),

    /// Stream not found by name.
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// Invalid table ID.
    #[error("invalid table ID: 0x{0:02X}")]
    InvalidTableId(u8),

    /// Table row index out of bounds.
    #[error("table {table} row index {index} out of bounds (max {max})")]
    RowIndexOutOfBounds {
        /// Table name.
        table: &'static str,
        /// Requested index.
        index: u32,
        /// Maximum valid index.
        max: u32,
    },

    /// A non-fatal condition promoted to an error by strict validation.
    #[error("strict validation failed: {0}")]
    Diagnostic(Diagnostic),
}
