//! Coded index types for metadata tables (ECMA-335 II.24.2.6).

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::tables::TableId;

/// Kinds of coded indices used in metadata tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum CodedIndexKind {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedIndexKind {
    /// Get the number of tag bits for this coded index kind.
    #[must_use]
    pub const fn tag_bits(self) -> u8 {
        match self {
            Self::TypeDefOrRef => 2,
            Self::HasConstant => 2,
            Self::HasCustomAttribute => 5,
            Self::HasFieldMarshal => 1,
            Self::HasDeclSecurity => 2,
            Self::MemberRefParent => 3,
            Self::HasSemantics => 1,
            Self::MethodDefOrRef => 1,
            Self::MemberForwarded => 1,
            Self::Implementation => 2,
            Self::CustomAttributeType => 3,
            Self::ResolutionScope => 2,
            Self::TypeOrMethodDef => 1,
        }
    }

    /// Get the tables that can be referenced by this coded index kind, in tag
    /// order. `None` marks a tag value the format leaves unused.
    #[must_use]
    pub const fn tables(self) -> &'static [Option<TableId>] {
        match self {
            Self::TypeDefOrRef => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::TypeSpec),
            ],
            Self::HasConstant => &[
                Some(TableId::Field),
                Some(TableId::Param),
                Some(TableId::Property),
            ],
            Self::HasCustomAttribute => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                // Listed as "Permission" in the standard; the table is DeclSecurity.
                Some(TableId::DeclSecurity),
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
            ],
            Self::HasFieldMarshal => &[Some(TableId::Field), Some(TableId::Param)],
            Self::HasDeclSecurity => &[
                Some(TableId::TypeDef),
                Some(TableId::MethodDef),
                Some(TableId::Assembly),
            ],
            Self::MemberRefParent => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::ModuleRef),
                Some(TableId::MethodDef),
                Some(TableId::TypeSpec),
            ],
            Self::HasSemantics => &[Some(TableId::Event), Some(TableId::Property)],
            Self::MethodDefOrRef => &[Some(TableId::MethodDef), Some(TableId::MemberRef)],
            Self::MemberForwarded => &[Some(TableId::Field), Some(TableId::MethodDef)],
            Self::Implementation => &[
                Some(TableId::File),
                Some(TableId::AssemblyRef),
                Some(TableId::ExportedType),
            ],
            Self::CustomAttributeType => &[
                None,
                None,
                Some(TableId::MethodDef),
                Some(TableId::MemberRef),
                None,
            ],
            Self::ResolutionScope => &[
                Some(TableId::Module),
                Some(TableId::ModuleRef),
                Some(TableId::AssemblyRef),
                Some(TableId::TypeRef),
            ],
            Self::TypeOrMethodDef => &[Some(TableId::TypeDef), Some(TableId::MethodDef)],
        }
    }

    /// Smallest row count that forces a 4-byte encoding, `2^(16 - tag_bits)`.
    #[must_use]
    pub const fn max_small_rows(self) -> u32 {
        1u32 << (16 - self.tag_bits())
    }

    /// Position of this kind in [`strum::IntoEnumIterator::iter`] order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name of the coded index kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A decoded coded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodedIndex {
    /// The table this index refers to, `None` for an unused tag.
    pub table: Option<TableId>,
    /// The row index (1-based, 0 means null).
    pub row: u32,
}

impl CodedIndex {
    /// Create a null coded index.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            table: None,
            row: 0,
        }
    }

    /// Check if this is a null index.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.row == 0
    }

    /// Decode a raw coded index value: the low `tag_bits` select the table,
    /// the remaining bits are the row.
    #[must_use]
    pub fn decode(kind: CodedIndexKind, value: u32) -> Self {
        let tag_bits = kind.tag_bits();
        let tag = (value & ((1u32 << tag_bits) - 1)) as usize;

        Self {
            table: kind.tables().get(tag).copied().flatten(),
            row: value >> tag_bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tag_bits_cover_candidates() {
        for kind in CodedIndexKind::iter() {
            let slots = 1usize << kind.tag_bits();
            assert!(
                kind.tables().len() <= slots,
                "{} has more candidates than tag values",
                kind.name()
            );
        }
    }

    #[test]
    fn test_max_small_rows() {
        assert_eq!(CodedIndexKind::HasCustomAttribute.max_small_rows(), 1 << 11);
        assert_eq!(CodedIndexKind::TypeDefOrRef.max_small_rows(), 1 << 14);
        assert_eq!(CodedIndexKind::HasSemantics.max_small_rows(), 1 << 15);
    }

    #[test]
    fn test_decode_type_def_or_ref() {
        // TypeRef (tag 1), row 5
        let index = CodedIndex::decode(CodedIndexKind::TypeDefOrRef, (5 << 2) | 1);
        assert_eq!(index.table, Some(TableId::TypeRef));
        assert_eq!(index.row, 5);
        assert!(!index.is_null());
    }

    #[test]
    fn test_decode_unused_tag() {
        let index = CodedIndex::decode(CodedIndexKind::CustomAttributeType, (7 << 3) | 1);
        assert_eq!(index.table, None);
        assert_eq!(index.row, 7);

        let index = CodedIndex::decode(CodedIndexKind::CustomAttributeType, (7 << 3) | 3);
        assert_eq!(index.table, Some(TableId::MemberRef));
    }

    #[test]
    fn test_null_index() {
        assert!(CodedIndex::null().is_null());
        assert!(CodedIndex::decode(CodedIndexKind::HasConstant, 2).is_null());
    }
}
