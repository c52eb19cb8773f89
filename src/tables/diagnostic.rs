//! Non-fatal conditions found while resolving the tables header.

use thiserror::Error;

/// A malformed-but-parseable condition in the tables header.
///
/// Diagnostics never stop resolution of the known tables. They are collected
/// on [`TableDefinitions`](crate::tables::TableDefinitions) and can be turned
/// into errors with
/// [`TablesHeader::validate_strict`](crate::tables::TablesHeader::validate_strict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A bit is set in `valid` for a slot with no ECMA-335 table kind.
    #[error("valid mask marks reserved table slot 0x{index:02X} present ({row_count} rows)")]
    UnknownTableKind {
        /// Table slot (bit index in the valid mask).
        index: u8,
        /// Row count read for the slot.
        row_count: u32,
    },

    /// A reserved header field does not hold its required value.
    #[error("reserved field {field} is {actual}, expected {expected}")]
    InconsistentReservedField {
        /// Field name.
        field: &'static str,
        /// Value required by the format.
        expected: u32,
        /// Value found in the header.
        actual: u32,
    },
}
