//! Metadata table identifiers.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::error::{Error, Result};

/// Number of table slots addressable by the `valid` bitmask.
pub const TABLE_SLOTS: usize = 64;

/// Identifiers of the metadata tables defined by ECMA-335 II.22.
///
/// The discriminant is the table's bit index in the `valid` and `sorted`
/// masks of the tables header. Slots `0x2D..=0x3F` are reserved and have no
/// variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, IntoStaticStr,
)]
#[repr(u8)]
pub enum TableId {
    Module = 0x00,
    TypeRef = 0x01,
    TypeDef = 0x02,
    /// Only present in unoptimized (`#-`) streams.
    FieldPtr = 0x03,
    Field = 0x04,
    /// Only present in unoptimized (`#-`) streams.
    MethodPtr = 0x05,
    MethodDef = 0x06,
    /// Only present in unoptimized (`#-`) streams.
    ParamPtr = 0x07,
    Param = 0x08,
    InterfaceImpl = 0x09,
    MemberRef = 0x0A,
    Constant = 0x0B,
    CustomAttribute = 0x0C,
    FieldMarshal = 0x0D,
    DeclSecurity = 0x0E,
    ClassLayout = 0x0F,
    FieldLayout = 0x10,
    StandAloneSig = 0x11,
    EventMap = 0x12,
    /// Only present in unoptimized (`#-`) streams.
    EventPtr = 0x13,
    Event = 0x14,
    PropertyMap = 0x15,
    /// Only present in unoptimized (`#-`) streams.
    PropertyPtr = 0x16,
    Property = 0x17,
    MethodSemantics = 0x18,
    MethodImpl = 0x19,
    ModuleRef = 0x1A,
    TypeSpec = 0x1B,
    ImplMap = 0x1C,
    #[strum(serialize = "FieldRVA")]
    FieldRva = 0x1D,
    /// Edit-and-Continue log.
    EncLog = 0x1E,
    /// Edit-and-Continue token map.
    EncMap = 0x1F,
    Assembly = 0x20,
    AssemblyProcessor = 0x21,
    #[strum(serialize = "AssemblyOS")]
    AssemblyOs = 0x22,
    AssemblyRef = 0x23,
    AssemblyRefProcessor = 0x24,
    #[strum(serialize = "AssemblyRefOS")]
    AssemblyRefOs = 0x25,
    File = 0x26,
    ExportedType = 0x27,
    ManifestResource = 0x28,
    NestedClass = 0x29,
    GenericParam = 0x2A,
    MethodSpec = 0x2B,
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Convert a table slot index into a table ID.
    pub fn from_u8(value: u8) -> Result<Self> {
        use TableId::*;
        Ok(match value {
            0x00 => Module,
            0x01 => TypeRef,
            0x02 => TypeDef,
            0x03 => FieldPtr,
            0x04 => Field,
            0x05 => MethodPtr,
            0x06 => MethodDef,
            0x07 => ParamPtr,
            0x08 => Param,
            0x09 => InterfaceImpl,
            0x0A => MemberRef,
            0x0B => Constant,
            0x0C => CustomAttribute,
            0x0D => FieldMarshal,
            0x0E => DeclSecurity,
            0x0F => ClassLayout,
            0x10 => FieldLayout,
            0x11 => StandAloneSig,
            0x12 => EventMap,
            0x13 => EventPtr,
            0x14 => Event,
            0x15 => PropertyMap,
            0x16 => PropertyPtr,
            0x17 => Property,
            0x18 => MethodSemantics,
            0x19 => MethodImpl,
            0x1A => ModuleRef,
            0x1B => TypeSpec,
            0x1C => ImplMap,
            0x1D => FieldRva,
            0x1E => EncLog,
            0x1F => EncMap,
            0x20 => Assembly,
            0x21 => AssemblyProcessor,
            0x22 => AssemblyOs,
            0x23 => AssemblyRef,
            0x24 => AssemblyRefProcessor,
            0x25 => AssemblyRefOs,
            0x26 => File,
            0x27 => ExportedType,
            0x28 => ManifestResource,
            0x29 => NestedClass,
            0x2A => GenericParam,
            0x2B => MethodSpec,
            0x2C => GenericParamConstraint,
            _ => return Err(Error::InvalidTableId(value)),
        })
    }

    /// The table's slot index in the header bitmasks.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The bit for this table in the `valid`/`sorted` masks.
    #[must_use]
    pub const fn mask(self) -> u64 {
        1u64 << (self as u8)
    }

    /// Display name of the table as used by ECMA-335.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Names of the known tables whose bits are set in `valid`, in ascending bit
/// order.
///
/// The list is dense: entry `n` names the `n`-th present table, not the table
/// in slot `n`. Reserved slots contribute no entry.
#[must_use]
pub fn present_table_names(valid: u64) -> Vec<&'static str> {
    (0..TABLE_SLOTS as u8)
        .filter(|&slot| valid & (1u64 << slot) != 0)
        .filter_map(|slot| TableId::from_u8(slot).ok())
        .map(TableId::name)
        .collect()
}
