//! Row sizes and offsets of every table in the tables stream.

use std::fmt;
use std::ops::Index;

use tracing::debug;

use crate::error::{Error, Result};
use crate::tables::{
    CodedIndexKind, Diagnostic, HeapSizes, IndexSizes, RowCounts, TABLE_SLOTS, TableContext,
    TableId,
};

/// One column of a table row, as far as its byte width is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// A fixed-width field of the given number of bytes.
    Fixed(u32),
    /// Index into `#Strings`.
    String,
    /// Index into `#GUID`.
    Guid,
    /// Index into `#Blob`.
    Blob,
    /// Coded index of the given kind.
    Coded(CodedIndexKind),
    /// Simple index into one table.
    Table(TableId),
}

impl Column {
    /// Width of this column in bytes.
    #[must_use]
    pub fn size(self, heap_sizes: &HeapSizes, index_sizes: &IndexSizes) -> u32 {
        match self {
            Self::Fixed(size) => size,
            Self::String => heap_sizes.string,
            Self::Guid => heap_sizes.guid,
            Self::Blob => heap_sizes.blob,
            Self::Coded(kind) => index_sizes.coded(kind),
            Self::Table(table) => index_sizes.table(table),
        }
    }
}

impl TableId {
    /// Columns of a row of this table, in storage order (ECMA-335 II.22).
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        use CodedIndexKind as K;
        use Column as C;

        match self {
            Self::Module => &[C::Fixed(2), C::String, C::Guid, C::Guid, C::Guid],
            Self::TypeRef => &[C::Coded(K::ResolutionScope), C::String, C::String],
            Self::TypeDef => &[
                C::Fixed(4),
                C::String,
                C::String,
                C::Coded(K::TypeDefOrRef),
                C::Table(TableId::Field),
                C::Table(TableId::MethodDef),
            ],
            Self::FieldPtr => &[C::Table(TableId::Field)],
            Self::Field => &[C::Fixed(2), C::String, C::Blob],
            Self::MethodPtr => &[C::Table(TableId::MethodDef)],
            Self::MethodDef => &[
                C::Fixed(4),
                C::Fixed(2),
                C::Fixed(2),
                C::String,
                C::Blob,
                C::Table(TableId::Param),
            ],
            Self::ParamPtr => &[C::Table(TableId::Param)],
            Self::Param => &[C::Fixed(2), C::Fixed(2), C::String],
            Self::InterfaceImpl => &[C::Table(TableId::TypeDef), C::Coded(K::TypeDefOrRef)],
            Self::MemberRef => &[C::Coded(K::MemberRefParent), C::String, C::Blob],
            Self::Constant => &[C::Fixed(1), C::Fixed(1), C::Coded(K::HasConstant), C::Blob],
            Self::CustomAttribute => &[
                C::Coded(K::HasCustomAttribute),
                C::Coded(K::CustomAttributeType),
                C::Blob,
            ],
            Self::FieldMarshal => &[C::Coded(K::HasFieldMarshal), C::Blob],
            Self::DeclSecurity => &[C::Fixed(2), C::Coded(K::HasDeclSecurity), C::Blob],
            Self::ClassLayout => &[C::Fixed(2), C::Fixed(4), C::Table(TableId::TypeDef)],
            Self::FieldLayout => &[C::Fixed(4), C::Table(TableId::Field)],
            Self::StandAloneSig => &[C::Blob],
            Self::EventMap => &[C::Table(TableId::TypeDef), C::Table(TableId::Event)],
            Self::EventPtr => &[C::Table(TableId::Event)],
            Self::Event => &[C::Fixed(2), C::String, C::Coded(K::TypeDefOrRef)],
            Self::PropertyMap => &[C::Table(TableId::TypeDef), C::Table(TableId::Property)],
            Self::PropertyPtr => &[C::Table(TableId::Property)],
            Self::Property => &[C::Fixed(2), C::String, C::Blob],
            Self::MethodSemantics => &[
                C::Fixed(2),
                C::Table(TableId::MethodDef),
                C::Coded(K::HasSemantics),
            ],
            Self::MethodImpl => &[
                C::Table(TableId::TypeDef),
                C::Coded(K::MethodDefOrRef),
                C::Coded(K::MethodDefOrRef),
            ],
            Self::ModuleRef => &[C::String],
            Self::TypeSpec => &[C::Blob],
            Self::ImplMap => &[
                C::Fixed(2),
                C::Coded(K::MemberForwarded),
                C::String,
                C::Table(TableId::ModuleRef),
            ],
            Self::FieldRva => &[C::Fixed(4), C::Table(TableId::Field)],
            Self::EncLog => &[C::Fixed(4), C::Fixed(4)],
            Self::EncMap => &[C::Fixed(4)],
            Self::Assembly => &[
                C::Fixed(4),
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(4),
                C::Blob,
                C::String,
                C::String,
            ],
            Self::AssemblyProcessor => &[C::Fixed(4)],
            Self::AssemblyOs => &[C::Fixed(4), C::Fixed(4), C::Fixed(4)],
            Self::AssemblyRef => &[
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(2),
                C::Fixed(4),
                C::Blob,
                C::String,
                C::String,
                C::Blob,
            ],
            Self::AssemblyRefProcessor => &[C::Fixed(4), C::Table(TableId::AssemblyRef)],
            Self::AssemblyRefOs => &[
                C::Fixed(4),
                C::Fixed(4),
                C::Fixed(4),
                C::Table(TableId::AssemblyRef),
            ],
            Self::File => &[C::Fixed(4), C::String, C::Blob],
            Self::ExportedType => &[
                C::Fixed(4),
                C::Fixed(4),
                C::String,
                C::String,
                C::Coded(K::Implementation),
            ],
            Self::ManifestResource => &[
                C::Fixed(4),
                C::Fixed(4),
                C::String,
                C::Coded(K::Implementation),
            ],
            Self::NestedClass => &[C::Table(TableId::TypeDef), C::Table(TableId::TypeDef)],
            Self::GenericParam => &[
                C::Fixed(2),
                C::Fixed(2),
                C::Coded(K::TypeOrMethodDef),
                C::String,
            ],
            Self::MethodSpec => &[C::Coded(K::MethodDefOrRef), C::Blob],
            Self::GenericParamConstraint => &[
                C::Table(TableId::GenericParam),
                C::Coded(K::TypeDefOrRef),
            ],
        }
    }

    /// Bytes per row of this table under the given index widths.
    #[must_use]
    pub fn row_size(self, heap_sizes: &HeapSizes, index_sizes: &IndexSizes) -> u32 {
        self.columns()
            .iter()
            .map(|column| column.size(heap_sizes, index_sizes))
            .sum()
    }
}

/// Bytes per row of every slot. Reserved slots get 0.
#[must_use]
pub fn row_sizes(heap_sizes: &HeapSizes, index_sizes: &IndexSizes) -> [u32; TABLE_SLOTS] {
    std::array::from_fn(|slot| {
        TableId::from_u8(slot as u8)
            .map(|table| table.row_size(heap_sizes, index_sizes))
            .unwrap_or(0)
    })
}

/// Start offset of every slot relative to the first row of the first table.
///
/// Returns the offsets together with the total size of all tables.
pub fn table_offsets(
    row_counts: &RowCounts,
    row_sizes: &[u32; TABLE_SLOTS],
) -> Result<([u32; TABLE_SLOTS], u32)> {
    let mut offsets = [0u32; TABLE_SLOTS];
    let mut offset = 0u32;

    for (slot, &bytes_per_row) in row_sizes.iter().enumerate() {
        offsets[slot] = offset;
        offset = bytes_per_row
            .checked_mul(row_counts.get(slot))
            .and_then(|size| offset.checked_add(size))
            .ok_or(Error::TableSizeOverflow { table: slot as u8 })?;
    }

    Ok((offsets, offset))
}

/// Resolved layout of one table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefinition {
    /// Slot index (bit in the valid mask).
    pub index: u8,
    /// The table kind, `None` for reserved slots.
    pub table: Option<TableId>,
    /// Whether the slot's bit is set in `valid`.
    pub present: bool,
    /// Display name, set for present known tables.
    pub name: Option<&'static str>,
    /// Number of rows.
    pub row_count: u32,
    /// Size of one row in bytes.
    pub bytes_per_row: u32,
    /// Offset of the first row from the start of the tables region.
    pub offset: u32,
}

impl TableDefinition {
    /// Total bytes occupied by the table.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.bytes_per_row * self.row_count
    }

    /// Offset of a 0-based row from the start of the tables region.
    #[must_use]
    pub fn row_offset(&self, row: u32) -> u32 {
        self.offset + self.bytes_per_row * row
    }
}

impl fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{name:<24}")?,
            None => write!(f, "{:<24}", format!("0x{:02X}", self.index))?,
        }
        write!(
            f,
            " rows: {:>8}  bytes/row: {:>3}  offset: 0x{:08X}",
            self.row_count, self.bytes_per_row, self.offset
        )
    }
}

/// The resolved layout of all 64 table slots.
#[derive(Debug, Clone)]
pub struct TableDefinitions {
    entries: [TableDefinition; TABLE_SLOTS],
    heap_sizes: HeapSizes,
    index_sizes: IndexSizes,
    tables_base: usize,
    total_size: u32,
    diagnostics: Vec<Diagnostic>,
}

impl TableDefinitions {
    /// Resolve the layout from row counts and heap widths.
    ///
    /// Phases run in a fixed order, each a pure function of the previous
    /// ones: row counts, index widths, row sizes, offsets. `tables_base` is
    /// the absolute position of the first row of the first table.
    pub fn resolve(
        row_counts: RowCounts,
        heap_sizes: HeapSizes,
        tables_base: usize,
    ) -> Result<Self> {
        let index_sizes = IndexSizes::resolve(&row_counts);
        let sizes = row_sizes(&heap_sizes, &index_sizes);
        let (offsets, total_size) = table_offsets(&row_counts, &sizes)?;

        let entries = std::array::from_fn(|slot| TableDefinition {
            index: slot as u8,
            table: TableId::from_u8(slot as u8).ok(),
            present: row_counts.is_present(slot),
            name: row_counts.name(slot),
            row_count: row_counts.get(slot),
            bytes_per_row: sizes[slot],
            offset: offsets[slot],
        });

        debug!(
            present = row_counts.present_count(),
            total_size, tables_base, "resolved table definitions"
        );

        Ok(Self {
            entries,
            heap_sizes,
            index_sizes,
            tables_base,
            total_size,
            diagnostics: row_counts.diagnostics().to_vec(),
        })
    }

    /// Definition of a slot, `None` past slot 63.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&TableDefinition> {
        self.entries.get(slot)
    }

    /// All 64 definitions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &TableDefinition> {
        self.entries.iter()
    }

    /// Definitions whose bit is set in `valid`.
    pub fn present(&self) -> impl Iterator<Item = &TableDefinition> {
        self.entries.iter().filter(|def| def.present)
    }

    /// Heap index widths the layout was computed with.
    #[must_use]
    pub fn heap_sizes(&self) -> &HeapSizes {
        &self.heap_sizes
    }

    /// Index widths the layout was computed with.
    #[must_use]
    pub fn index_sizes(&self) -> &IndexSizes {
        &self.index_sizes
    }

    /// Absolute position of the tables region in the buffer.
    #[must_use]
    pub fn tables_base(&self) -> usize {
        self.tables_base
    }

    /// Total bytes of all table rows.
    #[must_use]
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Conditions found while resolving.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Width context for row decoders.
    #[must_use]
    pub fn context(&self) -> TableContext {
        TableContext::new(self.heap_sizes, self.index_sizes.clone())
    }
}

impl Index<TableId> for TableDefinitions {
    type Output = TableDefinition;

    fn index(&self, table: TableId) -> &Self::Output {
        &self.entries[table.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strum::IntoEnumIterator;

    fn narrow() -> (HeapSizes, IndexSizes) {
        let counts = RowCounts::from_counts([0; TABLE_SLOTS]);
        (HeapSizes::from_flags(0), IndexSizes::resolve(&counts))
    }

    #[test]
    fn test_module_row_size() {
        let (heap, index) = narrow();
        assert_eq!(TableId::Module.row_size(&heap, &index), 2 + 2 + 2 * 3);

        let wide = HeapSizes::from_flags(0x07);
        assert_eq!(TableId::Module.row_size(&wide, &index), 2 + 4 + 4 * 3);
    }

    #[test]
    fn test_narrow_row_sizes() {
        let (heap, index) = narrow();
        let expected = [
            (TableId::TypeRef, 6),
            (TableId::TypeDef, 14),
            (TableId::Field, 6),
            (TableId::MethodDef, 14),
            (TableId::Param, 6),
            (TableId::Constant, 6),
            (TableId::ClassLayout, 8),
            (TableId::Assembly, 22),
            (TableId::AssemblyRef, 20),
            (TableId::AssemblyOs, 12),
            (TableId::EncLog, 8),
            (TableId::ExportedType, 14),
            (TableId::NestedClass, 4),
            (TableId::GenericParam, 8),
        ];
        for (table, size) in expected {
            assert_eq!(table.row_size(&heap, &index), size, "{table}");
        }
    }

    #[test]
    fn test_row_size_follows_foreign_row_counts() {
        let mut raw = [0u32; TABLE_SLOTS];
        // TypeSpec comes after TypeDef in slot order but still widens its
        // TypeDefOrRef column.
        raw[TableId::TypeSpec.index()] = 1 << 14;
        raw[TableId::Field.index()] = 70_000;
        let counts = RowCounts::from_counts(raw);
        let index = IndexSizes::resolve(&counts);
        let heap = HeapSizes::from_flags(0);

        assert_eq!(TableId::TypeDef.row_size(&heap, &index), 4 + 2 + 2 + 4 + 4 + 2);
    }

    #[test]
    fn test_reserved_slots_have_zero_size() {
        let (heap, index) = narrow();
        let sizes = row_sizes(&heap, &index);
        for (slot, size) in sizes.iter().enumerate() {
            if TableId::from_u8(slot as u8).is_ok() {
                assert!(*size > 0, "slot 0x{slot:02X}");
            } else {
                assert_eq!(*size, 0, "slot 0x{slot:02X}");
            }
        }
    }

    #[test]
    fn test_offsets_are_running_sum() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let mut raw = [0u32; TABLE_SLOTS];
            for table in TableId::iter() {
                if rng.gen_bool(0.5) {
                    raw[table.index()] = rng.gen_range(1..100_000);
                }
            }
            let counts = RowCounts::from_counts(raw);
            let defs =
                TableDefinitions::resolve(counts, HeapSizes::from_flags(rng.gen_range(0..8)), 0)
                    .unwrap();

            assert_eq!(defs.get(0).unwrap().offset, 0);
            for slot in 1..TABLE_SLOTS {
                let prev = defs.get(slot - 1).unwrap();
                let def = defs.get(slot).unwrap();
                assert_eq!(def.offset, prev.offset + prev.bytes_per_row * prev.row_count);
                assert_eq!(def.row_count, raw[slot]);
                assert_eq!(def.present, raw[slot] != 0);
            }
            let last = defs.get(TABLE_SLOTS - 1).unwrap();
            assert_eq!(defs.total_size(), last.offset + last.size());
        }
    }

    #[test]
    fn test_offset_overflow_names_slot() {
        let mut raw = [0u32; TABLE_SLOTS];
        raw[TableId::Module.index()] = 1;
        raw[TableId::TypeDef.index()] = u32::MAX;
        let counts = RowCounts::from_counts(raw);

        match TableDefinitions::resolve(counts, HeapSizes::default(), 0) {
            Err(Error::TableSizeOverflow { table }) => assert_eq!(table, TableId::TypeDef as u8),
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let mut raw = [0u32; TABLE_SLOTS];
        raw[TableId::Module.index()] = 1;
        let defs =
            TableDefinitions::resolve(RowCounts::from_counts(raw), HeapSizes::default(), 0)
                .unwrap();
        let text = defs[TableId::Module].to_string();
        assert!(text.starts_with("Module"));
        assert!(text.contains("bytes/row:  10"));
        assert!(defs.get(0x30).unwrap().to_string().starts_with("0x30"));
    }
}
