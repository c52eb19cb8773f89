//! Layout-driven decoding of table rows.

use tracing::trace;

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::tables::{TableContext, TableDefinition, TableId, TableRow, row_decoder};

/// Decode every row of `table`.
///
/// Row `i` starts at `tables_base + definition.offset + definition.bytes_per_row * i`.
/// A table without rows decodes to an empty list.
pub fn decode_rows(
    data: &[u8],
    tables_base: usize,
    table: TableId,
    definition: &TableDefinition,
    ctx: &TableContext,
) -> Result<Vec<TableRow>> {
    if definition.row_count == 0 {
        return Ok(Vec::new());
    }

    let decoder = row_decoder(table);
    let table_start = tables_base.saturating_add(definition.offset as usize);
    let bytes_per_row = definition.bytes_per_row as usize;

    let mut rows = Vec::with_capacity(definition.row_count.min(0x1_0000) as usize);
    for row in 0..definition.row_count {
        let position = table_start.saturating_add(bytes_per_row.saturating_mul(row as usize));
        let decoded = Reader::at(data, position)
            .and_then(|mut reader| decoder(&mut reader, ctx))
            .map_err(|source| Error::Row {
                table: table.name(),
                row: row + 1,
                source: Box::new(source),
            })?;
        rows.push(decoded);
    }

    trace!(table = table.name(), rows = rows.len(), "decoded table rows");
    Ok(rows)
}
