//! Metadata tables stream: header, layout resolution and row decoding.

mod coded_index;
mod context;
mod decoder;
mod diagnostic;
mod header;
mod heap_sizes;
mod index_sizes;
mod layout;
mod row_counts;
mod rows;
mod table_id;

pub use coded_index::{CodedIndex, CodedIndexKind};
pub use context::TableContext;
pub use decoder::decode_rows;
pub use diagnostic::Diagnostic;
pub use header::{ROW_COUNTS_OFFSET, TablesHeader};
pub use heap_sizes::{HeapSizes, WIDE_BLOBS, WIDE_GUIDS, WIDE_STRINGS};
pub use index_sizes::{IndexSizes, MAX_SMALL_TABLE_ROWS, coded_index_size, simple_index_size};
pub use layout::{Column, TableDefinition, TableDefinitions, row_sizes, table_offsets};
pub use row_counts::RowCounts;
pub use rows::*;
pub use table_id::{TABLE_SLOTS, TableId, present_table_names};
