//! Widths of simple and coded table indices.

use strum::{EnumCount, IntoEnumIterator};

use crate::tables::{CodedIndexKind, RowCounts, TABLE_SLOTS, TableId};

/// Largest row count addressable by a 2-byte simple index.
pub const MAX_SMALL_TABLE_ROWS: u32 = 0xFFFF;

/// Resolved byte widths (2 or 4) of every simple and coded index kind.
///
/// Only constructible from a complete [`RowCounts`], so no width can be
/// observed before every row count is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSizes {
    coded: [u32; CodedIndexKind::COUNT],
    tables: [u32; TABLE_SLOTS],
}

impl IndexSizes {
    /// Resolve all index widths from the row counts.
    #[must_use]
    pub fn resolve(row_counts: &RowCounts) -> Self {
        let mut coded = [2u32; CodedIndexKind::COUNT];
        for kind in CodedIndexKind::iter() {
            coded[kind.index()] = coded_index_size(kind, row_counts);
        }

        let mut tables = [2u32; TABLE_SLOTS];
        for (slot, size) in tables.iter_mut().enumerate() {
            *size = simple_index_size(row_counts.get(slot));
        }

        Self { coded, tables }
    }

    /// Width of a coded index of the given kind.
    #[must_use]
    pub fn coded(&self, kind: CodedIndexKind) -> u32 {
        self.coded[kind.index()]
    }

    /// Width of a simple index into the given table.
    #[must_use]
    pub fn table(&self, table: TableId) -> u32 {
        self.tables[table.index()]
    }
}

/// Width of a simple index into a table with `row_count` rows.
#[must_use]
pub const fn simple_index_size(row_count: u32) -> u32 {
    if row_count > MAX_SMALL_TABLE_ROWS { 4 } else { 2 }
}

/// Width of a coded index: 4 when the largest candidate table has more rows
/// than fit beside the tag bits in 16 bits.
#[must_use]
pub fn coded_index_size(kind: CodedIndexKind, row_counts: &RowCounts) -> u32 {
    let max_rows = kind
        .tables()
        .iter()
        .flatten()
        .map(|&table| row_counts.row_count(table))
        .max()
        .unwrap_or(0);

    if max_rows > kind.max_small_rows() - 1 { 4 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_with(entries: &[(TableId, u32)]) -> RowCounts {
        let mut raw = [0u32; TABLE_SLOTS];
        for &(table, count) in entries {
            raw[table.index()] = count;
        }
        RowCounts::from_counts(raw)
    }

    #[test]
    fn test_empty_tables_are_narrow() {
        let sizes = IndexSizes::resolve(&counts_with(&[]));
        for kind in CodedIndexKind::iter() {
            assert_eq!(sizes.coded(kind), 2);
        }
        for table in TableId::iter() {
            assert_eq!(sizes.table(table), 2);
        }
    }

    #[test]
    fn test_simple_index_boundary() {
        assert_eq!(simple_index_size(65535), 2);
        assert_eq!(simple_index_size(65536), 4);

        let sizes = IndexSizes::resolve(&counts_with(&[
            (TableId::Field, 65535),
            (TableId::MethodDef, 65536),
        ]));
        assert_eq!(sizes.table(TableId::Field), 2);
        assert_eq!(sizes.table(TableId::MethodDef), 4);
    }

    #[test]
    fn test_coded_index_boundary_per_kind() {
        // One candidate table at exactly 2^(16-b) - 1 rows stays narrow; one
        // more row widens it.
        for kind in CodedIndexKind::iter() {
            let table = kind.tables().iter().flatten().copied().next().unwrap();
            let limit = kind.max_small_rows() - 1;

            let narrow = counts_with(&[(table, limit)]);
            assert_eq!(coded_index_size(kind, &narrow), 2, "{}", kind.name());

            let wide = counts_with(&[(table, limit + 1)]);
            assert_eq!(coded_index_size(kind, &wide), 4, "{}", kind.name());
        }
    }

    #[test]
    fn test_coded_index_uses_largest_candidate() {
        // HasCustomAttribute has 5 tag bits: 2^11 = 2048 rows is the limit.
        let sizes = IndexSizes::resolve(&counts_with(&[
            (TableId::MethodDef, 10),
            (TableId::GenericParamConstraint, 2048),
        ]));
        assert_eq!(sizes.coded(CodedIndexKind::HasCustomAttribute), 4);
        // MethodDefOrRef only has one tag bit.
        assert_eq!(sizes.coded(CodedIndexKind::MethodDefOrRef), 2);
        assert_eq!(sizes.coded(CodedIndexKind::TypeDefOrRef), 2);
    }

    #[test]
    fn test_non_candidates_do_not_widen() {
        let sizes = IndexSizes::resolve(&counts_with(&[(TableId::Constant, 1_000_000)]));
        for kind in CodedIndexKind::iter() {
            assert_eq!(sizes.coded(kind), 2, "{}", kind.name());
        }
        assert_eq!(sizes.table(TableId::Constant), 4);
    }
}
