//! Table presence and row counts.

use tracing::warn;

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::tables::{Diagnostic, TABLE_SLOTS, TableId, present_table_names};

/// Row counts of all 64 table slots, in slot order.
///
/// Absent slots hold 0. Built either from the header bytes ([`RowCounts::read`])
/// or from an explicit count array ([`RowCounts::from_counts`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCounts {
    valid: u64,
    counts: [u32; TABLE_SLOTS],
    names: [Option<&'static str>; TABLE_SLOTS],
    diagnostics: Vec<Diagnostic>,
}

impl RowCounts {
    /// Read one 4-byte row count per set bit of `valid`, starting at `start`.
    ///
    /// Counts are stored densely: only present tables consume header bytes.
    /// `slot` walks the bit positions and picks the destination, `ordinal`
    /// counts the set bits seen so far and picks both the source position and
    /// the display name.
    pub fn read(data: &[u8], start: usize, valid: u64) -> Result<Self> {
        let present_names = present_table_names(valid);
        let mut counts = [0u32; TABLE_SLOTS];
        let mut names = [None; TABLE_SLOTS];
        let mut diagnostics = Vec::new();

        let mut ordinal = 0usize;
        for slot in 0..TABLE_SLOTS {
            if valid & (1u64 << slot) == 0 {
                continue;
            }

            let index = slot as u8;
            let position = start.saturating_add(ordinal * 4);
            let row_count = Reader::at(data, position)
                .and_then(|mut reader| reader.read_u32())
                .map_err(|source| Error::RowCount {
                    index,
                    source: Box::new(source),
                })?;

            counts[slot] = row_count;
            if TableId::from_u8(index).is_ok() {
                names[slot] = present_names.get(ordinal).copied();
            } else {
                warn!(slot = index, row_count, "reserved table slot marked present");
                diagnostics.push(Diagnostic::UnknownTableKind { index, row_count });
            }
            ordinal += 1;
        }

        Ok(Self {
            valid,
            counts,
            names,
            diagnostics,
        })
    }

    /// Build row counts directly. Slots with a nonzero count are present.
    #[must_use]
    pub fn from_counts(counts: [u32; TABLE_SLOTS]) -> Self {
        let mut valid = 0u64;
        let mut names = [None; TABLE_SLOTS];
        for (slot, &count) in counts.iter().enumerate() {
            if count != 0 {
                valid |= 1u64 << slot;
                names[slot] = TableId::from_u8(slot as u8).ok().map(TableId::name);
            }
        }

        Self {
            valid,
            counts,
            names,
            diagnostics: Vec::new(),
        }
    }

    /// The `valid` mask these counts were read for.
    #[must_use]
    pub fn valid(&self) -> u64 {
        self.valid
    }

    /// Row count of a known table.
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.counts[table.index()]
    }

    /// Row count of a slot, 0 for slots past the end.
    #[must_use]
    pub fn get(&self, slot: usize) -> u32 {
        self.counts.get(slot).copied().unwrap_or(0)
    }

    /// Whether the slot's bit is set in `valid`.
    #[must_use]
    pub fn is_present(&self, slot: usize) -> bool {
        slot < TABLE_SLOTS && self.valid & (1u64 << slot) != 0
    }

    /// Display name of a present known table.
    #[must_use]
    pub fn name(&self, slot: usize) -> Option<&'static str> {
        self.names.get(slot).copied().flatten()
    }

    /// All 64 counts in slot order.
    #[must_use]
    pub fn counts(&self) -> &[u32; TABLE_SLOTS] {
        &self.counts
    }

    /// Number of row counts stored in the header.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.valid.count_ones() as usize
    }

    /// Conditions found while reading.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
