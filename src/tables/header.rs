//! Tables stream (#~) header.

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::root::MetadataRoot;
use crate::tables::{
    Diagnostic, HeapSizes, RowCounts, TABLE_SLOTS, TableDefinitions, TableId, TableRow,
    TableRowType, decode_rows,
};

/// Offset of the row-count array from the start of the header.
pub const ROW_COUNTS_OFFSET: usize = 0x18;

/// Read-only view of the tables stream header over a borrowed buffer.
///
/// Construction reads only the fixed 24-byte header. Table definitions and
/// rows are resolved on first access and cached for the lifetime of the view;
/// concurrent first accesses initialize each cache exactly once.
#[derive(Debug)]
pub struct TablesHeader<'a> {
    data: &'a [u8],
    offset: usize,
    reserved: u32,
    major_version: u8,
    minor_version: u8,
    heap_size_flags: u8,
    reserved2: u8,
    valid: u64,
    sorted: u64,
    diagnostics: Vec<Diagnostic>,
    definitions: OnceCell<TableDefinitions>,
    rows: [OnceCell<Vec<TableRow>>; TABLE_SLOTS],
}

impl<'a> TablesHeader<'a> {
    /// Parse the fixed header fields at `offset` in `data`.
    pub fn parse(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut reader = Reader::at(data, offset)?;
        let reserved = reader.read_u32()?;
        let major_version = reader.read_u8()?;
        let minor_version = reader.read_u8()?;
        let heap_size_flags = reader.read_u8()?;
        let reserved2 = reader.read_u8()?;
        let valid = reader.read_u64()?;
        let sorted = reader.read_u64()?;

        let mut diagnostics = Vec::new();
        if reserved != 0 {
            diagnostics.push(Diagnostic::InconsistentReservedField {
                field: "reserved",
                expected: 0,
                actual: reserved,
            });
        }
        if reserved2 != 1 {
            diagnostics.push(Diagnostic::InconsistentReservedField {
                field: "reserved2",
                expected: 1,
                actual: u32::from(reserved2),
            });
        }
        for diagnostic in &diagnostics {
            warn!(%diagnostic, "tables header");
        }

        debug!(
            offset,
            version = %format!("{major_version}.{minor_version}"),
            heap_size_flags,
            valid = %format!("0x{valid:016X}"),
            "parsed tables header"
        );

        Ok(Self {
            data,
            offset,
            reserved,
            major_version,
            minor_version,
            heap_size_flags,
            reserved2,
            valid,
            sorted,
            diagnostics,
            definitions: OnceCell::new(),
            rows: std::array::from_fn(|_| OnceCell::new()),
        })
    }

    /// Locate the `#~` (or `#-`) stream through the metadata root and parse
    /// its header. Reads are confined to the stream's extent.
    pub fn from_metadata(data: &'a [u8]) -> Result<Self> {
        let root = MetadataRoot::parse(data)?;
        let stream = root.tables_stream_data(data)?;
        Self::parse(stream, 0)
    }

    /// Reserved (should be 0).
    #[must_use]
    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Major version (typically 2).
    #[must_use]
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// Minor version (typically 0).
    #[must_use]
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    /// Raw heap size flags.
    /// - Bit 0: #Strings uses 4-byte indices
    /// - Bit 1: #GUID uses 4-byte indices
    /// - Bit 2: #Blob uses 4-byte indices
    #[must_use]
    pub fn heap_size_flags(&self) -> u8 {
        self.heap_size_flags
    }

    /// Reserved (should be 1).
    #[must_use]
    pub fn reserved2(&self) -> u8 {
        self.reserved2
    }

    /// Bitmask of valid (present) tables.
    #[must_use]
    pub fn valid(&self) -> u64 {
        self.valid
    }

    /// Bitmask of sorted tables. Informational only.
    #[must_use]
    pub fn sorted(&self) -> u64 {
        self.sorted
    }

    /// Heap index widths.
    #[must_use]
    pub fn heap_sizes(&self) -> HeapSizes {
        HeapSizes::from_flags(self.heap_size_flags)
    }

    /// Size of the header including the row-count array.
    #[must_use]
    pub fn size(&self) -> usize {
        ROW_COUNTS_OFFSET + self.valid.count_ones() as usize * 4
    }

    /// Absolute position of the first table row in the buffer.
    #[must_use]
    pub fn tables_base(&self) -> usize {
        self.offset + self.size()
    }

    /// Check if a table is present.
    #[must_use]
    pub fn has_table(&self, table: TableId) -> bool {
        self.valid & table.mask() != 0
    }

    /// Resolved layout of all table slots, computed once.
    pub fn table_definitions(&self) -> Result<&TableDefinitions> {
        self.definitions.get_or_try_init(|| {
            let row_counts = RowCounts::read(
                self.data,
                self.offset.saturating_add(ROW_COUNTS_OFFSET),
                self.valid,
            )?;
            TableDefinitions::resolve(row_counts, self.heap_sizes(), self.tables_base())
        })
    }

    /// Get the row count for a table.
    pub fn row_count(&self, table: TableId) -> Result<u32> {
        Ok(self.table_definitions()?[table].row_count)
    }

    /// Iterate over present known tables with their row counts.
    pub fn tables(&self) -> Result<impl Iterator<Item = (TableId, u32)> + '_> {
        let definitions = self.table_definitions()?;
        Ok(definitions
            .present()
            .filter_map(|def| def.table.map(|table| (table, def.row_count))))
    }

    /// Decoded rows of a table, computed once per table. Absent tables
    /// yield an empty slice.
    pub fn rows(&self, table: TableId) -> Result<&[TableRow]> {
        self.rows[table.index()]
            .get_or_try_init(|| {
                let definitions = self.table_definitions()?;
                decode_rows(
                    self.data,
                    definitions.tables_base(),
                    table,
                    &definitions[table],
                    &definitions.context(),
                )
            })
            .map(Vec::as_slice)
    }

    /// Typed rows of the table `R` belongs to.
    pub fn table<R: TableRowType>(&self) -> Result<impl Iterator<Item = &R> + '_> {
        Ok(self.rows(R::TABLE)?.iter().filter_map(R::from_row))
    }

    /// Get a row by 1-based row index.
    pub fn row(&self, table: TableId, rid: u32) -> Result<&TableRow> {
        let rows = self.rows(table)?;
        rid.checked_sub(1)
            .and_then(|index| rows.get(index as usize))
            .ok_or(Error::RowIndexOutOfBounds {
                table: table.name(),
                index: rid,
                max: rows.len() as u32,
            })
    }

    /// All non-fatal conditions: reserved-field drift and unknown table
    /// kinds.
    pub fn diagnostics(&self) -> Result<Vec<Diagnostic>> {
        let definitions = self.table_definitions()?;
        Ok(self
            .diagnostics
            .iter()
            .chain(definitions.diagnostics())
            .cloned()
            .collect())
    }

    /// Fail on the first diagnostic.
    pub fn validate_strict(&self) -> Result<()> {
        match self.diagnostics()?.into_iter().next() {
            Some(diagnostic) => Err(Error::Diagnostic(diagnostic)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ModuleRow, TypeDefRow, TypeRefRow};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Build a tables stream: header, row counts for the given slots in
    /// ascending order, then the raw row bytes.
    fn build_stream(heap_flags: u8, tables: &[(u8, u32)], rows: &[u8]) -> Vec<u8> {
        let mut tables = tables.to_vec();
        tables.sort_by_key(|&(slot, _)| slot);
        let valid = tables
            .iter()
            .fold(0u64, |mask, &(slot, _)| mask | (1u64 << slot));

        let mut data = Vec::new();
        data.extend(0u32.to_le_bytes());
        data.extend([2, 0, heap_flags, 1]);
        data.extend(valid.to_le_bytes());
        data.extend(0u64.to_le_bytes());
        for &(_, count) in &tables {
            data.extend(count.to_le_bytes());
        }
        data.extend_from_slice(rows);
        data
    }

    fn module_row_bytes(name: u16) -> [u8; 10] {
        let [lo, hi] = name.to_le_bytes();
        [0, 0, lo, hi, 1, 0, 0, 0, 0, 0]
    }

    #[test]
    fn test_module_only_stream() {
        let data = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(0x0A));
        let header = TablesHeader::parse(&data, 0).unwrap();

        assert_eq!(header.major_version(), 2);
        assert_eq!(header.valid(), 1);
        assert_eq!(header.size(), 28);

        let defs = header.table_definitions().unwrap();
        let module = &defs[TableId::Module];
        assert_eq!(module.row_count, 1);
        assert_eq!(module.bytes_per_row, 10);
        assert_eq!(module.offset, 0);
        assert_eq!(module.name, Some("Module"));

        let rows: Vec<&ModuleRow> = header.table::<ModuleRow>().unwrap().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, 0x0A);
        assert_eq!(rows[0].mvid, 1);
        assert!(header.validate_strict().is_ok());
    }

    #[test]
    fn test_header_at_offset() {
        let mut data = vec![0xCC; 16];
        data.extend(build_stream(0x00, &[(0x00, 1)], &module_row_bytes(7)));
        let header = TablesHeader::parse(&data, 16).unwrap();

        assert_eq!(header.tables_base(), 16 + 28);
        match header.row(TableId::Module, 1).unwrap() {
            TableRow::Module(module) => assert_eq!(module.name, 7),
            other => panic!("unexpected row {other:?}"),
        }
    }

    #[test]
    fn test_multiple_tables() {
        let mut rows = Vec::new();
        rows.extend(module_row_bytes(1));
        // Two TypeRef rows: ResolutionScope, name, namespace.
        rows.extend([0x06, 0x00, 0x10, 0x00, 0x20, 0x00]);
        rows.extend([0x0A, 0x00, 0x11, 0x00, 0x21, 0x00]);
        // One TypeDef row.
        rows.extend([0x00, 0x00, 0x10, 0x00, 0x30, 0x00, 0x40, 0x00, 0x05, 0x00, 0x01, 0x00, 0x01, 0x00]);

        let data = build_stream(0x00, &[(0x00, 1), (0x01, 2), (0x02, 1)], &rows);
        let header = TablesHeader::parse(&data, 0).unwrap();
        let defs = header.table_definitions().unwrap();

        assert_eq!(defs[TableId::TypeRef].offset, 10);
        assert_eq!(defs[TableId::TypeDef].offset, 10 + 2 * 6);
        assert_eq!(defs.total_size() as usize, rows.len());

        let type_refs: Vec<&TypeRefRow> = header.table::<TypeRefRow>().unwrap().collect();
        assert_eq!(type_refs.len(), 2);
        // 0x06 = AssemblyRef (tag 2), row 1
        assert_eq!(type_refs[0].resolution_scope.table, Some(TableId::AssemblyRef));
        assert_eq!(type_refs[0].resolution_scope.row, 1);
        assert_eq!(type_refs[1].resolution_scope.row, 2);
        assert_eq!(type_refs[1].type_name, 0x11);

        let type_def = header.table::<TypeDefRow>().unwrap().next().unwrap();
        assert_eq!(type_def.type_name, 0x30);
        assert_eq!(type_def.extends.table, Some(TableId::TypeRef));
        assert_eq!(type_def.extends.row, 1);

        let present: Vec<_> = header.tables().unwrap().collect();
        assert_eq!(
            present,
            vec![
                (TableId::Module, 1),
                (TableId::TypeRef, 2),
                (TableId::TypeDef, 1)
            ]
        );
        assert!(header.rows(TableId::Field).unwrap().is_empty());
    }

    #[test]
    fn test_from_metadata() {
        let stream = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(5));

        // BSJB root with a single "#~" stream right after it.
        let mut data = Vec::new();
        data.extend(crate::root::METADATA_SIGNATURE.to_le_bytes());
        data.extend([1, 0, 1, 0, 0, 0, 0, 0]);
        data.extend(4u32.to_le_bytes());
        data.extend(b"v4\0\0");
        data.extend([0, 0, 1, 0]);
        let stream_offset = data.len() as u32 + 12;
        data.extend(stream_offset.to_le_bytes());
        data.extend((stream.len() as u32).to_le_bytes());
        data.extend(b"#~\0\0");
        data.extend(&stream);
        // Trailing bytes past the stream are not visible to the header.
        data.extend([0xFF; 8]);

        let header = TablesHeader::from_metadata(&data).unwrap();
        assert_eq!(header.tables_base(), 28);
        let module = header.table::<ModuleRow>().unwrap().next().unwrap();
        assert_eq!(module.name, 5);
    }

    #[test]
    fn test_truncated_row_counts() {
        let mut data = build_stream(0x00, &[(0x00, 1), (0x02, 1), (0x04, 1)], &[]);
        data.truncate(ROW_COUNTS_OFFSET + 4 + 2);
        let header = TablesHeader::parse(&data, 0).unwrap();

        match header.table_definitions() {
            Err(Error::RowCount { index, .. }) => assert_eq!(index, TableId::TypeDef as u8),
            other => panic!("expected RowCount error, got {other:?}"),
        }
        assert!(header.rows(TableId::Module).is_err());
        assert!(header.row_count(TableId::Module).is_err());
    }

    #[test]
    fn test_truncated_fixed_header() {
        let data = build_stream(0x00, &[], &[]);
        assert!(matches!(
            TablesHeader::parse(&data[..20], 0),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_definitions_are_memoized() {
        let data = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(1));
        let header = TablesHeader::parse(&data, 0).unwrap();

        let first = header.table_definitions().unwrap();
        let second = header.table_definitions().unwrap();
        assert!(std::ptr::eq(first, second));

        let rows_first = header.rows(TableId::Module).unwrap();
        let rows_second = header.rows(TableId::Module).unwrap();
        assert!(std::ptr::eq(rows_first, rows_second));
    }

    #[test]
    fn test_concurrent_first_access() {
        let data = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(3));
        let header = TablesHeader::parse(&data, 0).unwrap();

        let pointers: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let rows = header.rows(TableId::Module).unwrap();
                        assert_eq!(rows.len(), 1);
                        header.table_definitions().unwrap() as *const TableDefinitions as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_reserved_field_drift() {
        let mut data = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(1));
        data[0] = 0x01;
        data[7] = 0x00;
        let header = TablesHeader::parse(&data, 0).unwrap();

        assert_eq!(header.rows(TableId::Module).unwrap().len(), 1);
        let diagnostics = header.diagnostics().unwrap();
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::InconsistentReservedField {
                    field: "reserved",
                    expected: 0,
                    actual: 1
                },
                Diagnostic::InconsistentReservedField {
                    field: "reserved2",
                    expected: 1,
                    actual: 0
                },
            ]
        );
        assert!(matches!(
            header.validate_strict(),
            Err(Error::Diagnostic(Diagnostic::InconsistentReservedField {
                field: "reserved",
                ..
            }))
        ));
    }

    #[test]
    fn test_unknown_table_kind_is_not_fatal() {
        // Slot 0x30 is reserved; its row count still occupies header bytes.
        let data = build_stream(0x00, &[(0x00, 1), (0x30, 4)], &module_row_bytes(9));
        let header = TablesHeader::parse(&data, 0).unwrap();
        let defs = header.table_definitions().unwrap();

        let unknown = defs.get(0x30).unwrap();
        assert!(unknown.present);
        assert_eq!(unknown.row_count, 4);
        assert_eq!(unknown.name, None);
        assert_eq!(unknown.bytes_per_row, 0);

        assert_eq!(header.tables_base(), ROW_COUNTS_OFFSET + 8);
        let module = header.table::<ModuleRow>().unwrap().next().unwrap();
        assert_eq!(module.name, 9);

        assert_eq!(
            header.diagnostics().unwrap(),
            vec![Diagnostic::UnknownTableKind {
                index: 0x30,
                row_count: 4
            }]
        );
        assert!(header.validate_strict().is_err());
    }

    #[test]
    fn test_row_index_bounds() {
        let data = build_stream(0x00, &[(0x00, 1)], &module_row_bytes(1));
        let header = TablesHeader::parse(&data, 0).unwrap();

        assert!(header.row(TableId::Module, 1).is_ok());
        assert!(matches!(
            header.row(TableId::Module, 0),
            Err(Error::RowIndexOutOfBounds { index: 0, max: 1, .. })
        ));
        assert!(matches!(
            header.row(TableId::Module, 2),
            Err(Error::RowIndexOutOfBounds { index: 2, .. })
        ));
    }

    #[test]
    fn test_random_valid_masks_consume_popcount_counts() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..256 {
            let valid: u64 = rng.r#gen();
            let tables: Vec<(u8, u32)> = (0..64u8)
                .filter(|&slot| valid & (1u64 << slot) != 0)
                .map(|slot| (slot, rng.gen_range(0..50_000)))
                .collect();

            let data = build_stream(rng.gen_range(0..8), &tables, &[]);
            let header = TablesHeader::parse(&data, 0).unwrap();
            let defs = header.table_definitions().unwrap();

            assert_eq!(header.tables_base(), data.len());
            for slot in 0..TABLE_SLOTS {
                let def = defs.get(slot).unwrap();
                let expected = tables
                    .iter()
                    .find(|&&(s, _)| s as usize == slot)
                    .map(|&(_, count)| count)
                    .unwrap_or(0);
                assert_eq!(def.row_count, expected, "slot 0x{slot:02X}");
                assert_eq!(def.present, valid & (1u64 << slot) != 0);
                if slot > 0 {
                    let prev = defs.get(slot - 1).unwrap();
                    assert_eq!(def.offset, prev.offset + prev.size());
                }
            }
        }
    }
}
