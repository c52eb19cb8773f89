//! Index widths handed to row decoders.

use crate::tables::{CodedIndexKind, HeapSizes, IndexSizes, TableId};

/// Heap and table index widths for decoding rows.
/// Built once from resolved [`TableDefinitions`](crate::tables::TableDefinitions).
#[derive(Debug, Clone)]
pub struct TableContext {
    /// Heap index widths.
    pub heap_sizes: HeapSizes,
    /// Simple and coded index widths.
    pub index_sizes: IndexSizes,
}

impl TableContext {
    /// Create a new table context.
    #[must_use]
    pub fn new(heap_sizes: HeapSizes, index_sizes: IndexSizes) -> Self {
        Self {
            heap_sizes,
            index_sizes,
        }
    }

    /// Get the size of a string index (2 or 4 bytes).
    #[must_use]
    pub fn string_index_size(&self) -> u32 {
        self.heap_sizes.string
    }

    /// Get the size of a GUID index (2 or 4 bytes).
    #[must_use]
    pub fn guid_index_size(&self) -> u32 {
        self.heap_sizes.guid
    }

    /// Get the size of a blob index (2 or 4 bytes).
    #[must_use]
    pub fn blob_index_size(&self) -> u32 {
        self.heap_sizes.blob
    }

    /// Get the size of a table index (2 or 4 bytes).
    #[must_use]
    pub fn table_index_size(&self, table: TableId) -> u32 {
        self.index_sizes.table(table)
    }

    /// Get the size of a coded index (2 or 4 bytes).
    #[must_use]
    pub fn coded_index_size(&self, kind: CodedIndexKind) -> u32 {
        self.index_sizes.coded(kind)
    }

    /// Calculate the row size for a given table.
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        table.row_size(&self.heap_sizes, &self.index_sizes)
    }
}
