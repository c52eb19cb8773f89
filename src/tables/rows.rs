//! Table row structures and the per-table decoder catalog.

use crate::error::Result;
use crate::reader::Reader;
use crate::tables::{CodedIndex, CodedIndexKind, TableContext, TableId};

fn read_string(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<u32> {
    reader.read_index(ctx.string_index_size())
}

fn read_guid(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<u32> {
    reader.read_index(ctx.guid_index_size())
}

fn read_blob(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<u32> {
    reader.read_index(ctx.blob_index_size())
}

fn read_table(reader: &mut Reader<'_>, ctx: &TableContext, table: TableId) -> Result<u32> {
    reader.read_index(ctx.table_index_size(table))
}

fn read_coded(
    reader: &mut Reader<'_>,
    ctx: &TableContext,
    kind: CodedIndexKind,
) -> Result<CodedIndex> {
    let value = reader.read_index(ctx.coded_index_size(kind))?;
    Ok(CodedIndex::decode(kind, value))
}

/// Module table row (0x00).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRow {
    /// Generation (reserved, should be 0).
    pub generation: u16,
    /// Module name index into #Strings.
    pub name: u32,
    /// Module GUID index into #GUID.
    pub mvid: u32,
    /// EncId GUID index (reserved).
    pub enc_id: u32,
    /// EncBaseId GUID index (reserved).
    pub enc_base_id: u32,
}

impl ModuleRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            generation: reader.read_u16()?,
            name: read_string(reader, ctx)?,
            mvid: read_guid(reader, ctx)?,
            enc_id: read_guid(reader, ctx)?,
            enc_base_id: read_guid(reader, ctx)?,
        })
    }
}

/// TypeRef table row (0x01).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRefRow {
    /// ResolutionScope coded index.
    pub resolution_scope: CodedIndex,
    /// Type name index into #Strings.
    pub type_name: u32,
    /// Type namespace index into #Strings.
    pub type_namespace: u32,
}

impl TypeRefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            resolution_scope: read_coded(reader, ctx, CodedIndexKind::ResolutionScope)?,
            type_name: read_string(reader, ctx)?,
            type_namespace: read_string(reader, ctx)?,
        })
    }
}

/// TypeDef table row (0x02).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefRow {
    /// Type attributes (flags).
    pub flags: u32,
    /// Type name index into #Strings.
    pub type_name: u32,
    /// Type namespace index into #Strings.
    pub type_namespace: u32,
    /// Extends coded index (TypeDefOrRef).
    pub extends: CodedIndex,
    /// First field index into Field table.
    pub field_list: u32,
    /// First method index into MethodDef table.
    pub method_list: u32,
}

impl TypeDefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u32()?,
            type_name: read_string(reader, ctx)?,
            type_namespace: read_string(reader, ctx)?,
            extends: read_coded(reader, ctx, CodedIndexKind::TypeDefOrRef)?,
            field_list: read_table(reader, ctx, TableId::Field)?,
            method_list: read_table(reader, ctx, TableId::MethodDef)?,
        })
    }
}

/// FieldPtr table row (0x03).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPtrRow {
    /// Field index.
    pub field: u32,
}

impl FieldPtrRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            field: read_table(reader, ctx, TableId::Field)?,
        })
    }
}

/// Field table row (0x04).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRow {
    /// Field attributes (flags).
    pub flags: u16,
    /// Field name index into #Strings.
    pub name: u32,
    /// Signature index into #Blob.
    pub signature: u32,
}

impl FieldRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u16()?,
            name: read_string(reader, ctx)?,
            signature: read_blob(reader, ctx)?,
        })
    }
}

/// MethodPtr table row (0x05).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodPtrRow {
    /// MethodDef index.
    pub method: u32,
}

impl MethodPtrRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            method: read_table(reader, ctx, TableId::MethodDef)?,
        })
    }
}

/// MethodDef table row (0x06).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDefRow {
    /// RVA of the method body.
    pub rva: u32,
    /// Implementation flags.
    pub impl_flags: u16,
    /// Method flags.
    pub flags: u16,
    /// Method name index into #Strings.
    pub name: u32,
    /// Signature index into #Blob.
    pub signature: u32,
    /// First parameter index into Param table.
    pub param_list: u32,
}

impl MethodDefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            rva: reader.read_u32()?,
            impl_flags: reader.read_u16()?,
            flags: reader.read_u16()?,
            name: read_string(reader, ctx)?,
            signature: read_blob(reader, ctx)?,
            param_list: read_table(reader, ctx, TableId::Param)?,
        })
    }
}

/// ParamPtr table row (0x07).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPtrRow {
    /// Param index.
    pub param: u32,
}

impl ParamPtrRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            param: read_table(reader, ctx, TableId::Param)?,
        })
    }
}

/// Param table row (0x08).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamRow {
    /// Parameter flags.
    pub flags: u16,
    /// Parameter sequence number.
    pub sequence: u16,
    /// Parameter name index into #Strings.
    pub name: u32,
}

impl ParamRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u16()?,
            sequence: reader.read_u16()?,
            name: read_string(reader, ctx)?,
        })
    }
}

/// InterfaceImpl table row (0x09).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceImplRow {
    /// TypeDef index of the class implementing the interface.
    pub class: u32,
    /// TypeDefOrRef coded index of the interface.
    pub interface: CodedIndex,
}

impl InterfaceImplRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            class: read_table(reader, ctx, TableId::TypeDef)?,
            interface: read_coded(reader, ctx, CodedIndexKind::TypeDefOrRef)?,
        })
    }
}

/// MemberRef table row (0x0A).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberRefRow {
    /// Class coded index (MemberRefParent).
    pub class: CodedIndex,
    /// Member name index into #Strings.
    pub name: u32,
    /// Signature index into #Blob.
    pub signature: u32,
}

impl MemberRefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            class: read_coded(reader, ctx, CodedIndexKind::MemberRefParent)?,
            name: read_string(reader, ctx)?,
            signature: read_blob(reader, ctx)?,
        })
    }
}

/// Constant table row (0x0B).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantRow {
    /// Element type (one of ELEMENT_TYPE_*).
    pub constant_type: u8,
    /// Padding byte.
    pub padding: u8,
    /// HasConstant coded index (Field, Param, or Property).
    pub parent: CodedIndex,
    /// Value index into #Blob.
    pub value: u32,
}

impl ConstantRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            constant_type: reader.read_u8()?,
            padding: reader.read_u8()?,
            parent: read_coded(reader, ctx, CodedIndexKind::HasConstant)?,
            value: read_blob(reader, ctx)?,
        })
    }
}

/// CustomAttribute table row (0x0C).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomAttributeRow {
    /// Parent coded index (HasCustomAttribute).
    pub parent: CodedIndex,
    /// Type coded index (CustomAttributeType).
    pub attr_type: CodedIndex,
    /// Value index into #Blob.
    pub value: u32,
}

impl CustomAttributeRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            parent: read_coded(reader, ctx, CodedIndexKind::HasCustomAttribute)?,
            attr_type: read_coded(reader, ctx, CodedIndexKind::CustomAttributeType)?,
            value: read_blob(reader, ctx)?,
        })
    }
}

/// FieldMarshal table row (0x0D).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMarshalRow {
    /// HasFieldMarshal coded index.
    pub parent: CodedIndex,
    /// Native type index into #Blob.
    pub native_type: u32,
}

impl FieldMarshalRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            parent: read_coded(reader, ctx, CodedIndexKind::HasFieldMarshal)?,
            native_type: read_blob(reader, ctx)?,
        })
    }
}

/// DeclSecurity table row (0x0E).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclSecurityRow {
    /// Security action.
    pub action: u16,
    /// HasDeclSecurity coded index.
    pub parent: CodedIndex,
    /// Permission set index into #Blob.
    pub permission_set: u32,
}

impl DeclSecurityRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            action: reader.read_u16()?,
            parent: read_coded(reader, ctx, CodedIndexKind::HasDeclSecurity)?,
            permission_set: read_blob(reader, ctx)?,
        })
    }
}

/// ClassLayout table row (0x0F).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassLayoutRow {
    /// Packing size.
    pub packing_size: u16,
    /// Class size in bytes.
    pub class_size: u32,
    /// TypeDef index.
    pub parent: u32,
}

impl ClassLayoutRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            packing_size: reader.read_u16()?,
            class_size: reader.read_u32()?,
            parent: read_table(reader, ctx, TableId::TypeDef)?,
        })
    }
}

/// FieldLayout table row (0x10).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLayoutRow {
    /// Field offset.
    pub offset: u32,
    /// Field index.
    pub field: u32,
}

impl FieldLayoutRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            offset: reader.read_u32()?,
            field: read_table(reader, ctx, TableId::Field)?,
        })
    }
}

/// StandAloneSig table row (0x11).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandAloneSigRow {
    /// Signature index into #Blob.
    pub signature: u32,
}

impl StandAloneSigRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            signature: read_blob(reader, ctx)?,
        })
    }
}

/// EventMap table row (0x12).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMapRow {
    /// TypeDef index.
    pub parent: u32,
    /// Event list start index.
    pub event_list: u32,
}

impl EventMapRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            parent: read_table(reader, ctx, TableId::TypeDef)?,
            event_list: read_table(reader, ctx, TableId::Event)?,
        })
    }
}

/// EventPtr table row (0x13).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPtrRow {
    /// Event index.
    pub event: u32,
}

impl EventPtrRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            event: read_table(reader, ctx, TableId::Event)?,
        })
    }
}

/// Event table row (0x14).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRow {
    /// Event flags.
    pub event_flags: u16,
    /// Event name index into #Strings.
    pub name: u32,
    /// TypeDefOrRef coded index for the event type.
    pub event_type: CodedIndex,
}

impl EventRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            event_flags: reader.read_u16()?,
            name: read_string(reader, ctx)?,
            event_type: read_coded(reader, ctx, CodedIndexKind::TypeDefOrRef)?,
        })
    }
}

/// PropertyMap table row (0x15).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMapRow {
    /// TypeDef index.
    pub parent: u32,
    /// Property list start index.
    pub property_list: u32,
}

impl PropertyMapRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            parent: read_table(reader, ctx, TableId::TypeDef)?,
            property_list: read_table(reader, ctx, TableId::Property)?,
        })
    }
}

/// PropertyPtr table row (0x16).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPtrRow {
    /// Property index.
    pub property: u32,
}

impl PropertyPtrRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            property: read_table(reader, ctx, TableId::Property)?,
        })
    }
}

/// Property table row (0x17).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRow {
    /// Property flags.
    pub flags: u16,
    /// Property name index into #Strings.
    pub name: u32,
    /// Property signature index into #Blob.
    pub property_type: u32,
}

impl PropertyRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u16()?,
            name: read_string(reader, ctx)?,
            property_type: read_blob(reader, ctx)?,
        })
    }
}

/// MethodSemantics table row (0x18).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSemanticsRow {
    /// Semantics flags (setter, getter, other, addon, removeon, fire).
    pub semantics: u16,
    /// MethodDef index.
    pub method: u32,
    /// HasSemantics coded index (Event or Property).
    pub association: CodedIndex,
}

impl MethodSemanticsRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            semantics: reader.read_u16()?,
            method: read_table(reader, ctx, TableId::MethodDef)?,
            association: read_coded(reader, ctx, CodedIndexKind::HasSemantics)?,
        })
    }
}

/// MethodImpl table row (0x19).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodImplRow {
    /// TypeDef index of the class.
    pub class: u32,
    /// MethodDefOrRef coded index of the implementation.
    pub method_body: CodedIndex,
    /// MethodDefOrRef coded index of the declaration.
    pub method_declaration: CodedIndex,
}

impl MethodImplRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            class: read_table(reader, ctx, TableId::TypeDef)?,
            method_body: read_coded(reader, ctx, CodedIndexKind::MethodDefOrRef)?,
            method_declaration: read_coded(reader, ctx, CodedIndexKind::MethodDefOrRef)?,
        })
    }
}

/// ModuleRef table row (0x1A).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRefRow {
    /// Module name index into #Strings.
    pub name: u32,
}

impl ModuleRefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            name: read_string(reader, ctx)?,
        })
    }
}

/// TypeSpec table row (0x1B).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSpecRow {
    /// Signature index into #Blob.
    pub signature: u32,
}

impl TypeSpecRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            signature: read_blob(reader, ctx)?,
        })
    }
}

/// ImplMap table row (0x1C).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplMapRow {
    /// Mapping flags.
    pub mapping_flags: u16,
    /// MemberForwarded coded index (Field or MethodDef).
    pub member_forwarded: CodedIndex,
    /// Import name index into #Strings.
    pub import_name: u32,
    /// ModuleRef index.
    pub import_scope: u32,
}

impl ImplMapRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            mapping_flags: reader.read_u16()?,
            member_forwarded: read_coded(reader, ctx, CodedIndexKind::MemberForwarded)?,
            import_name: read_string(reader, ctx)?,
            import_scope: read_table(reader, ctx, TableId::ModuleRef)?,
        })
    }
}

/// FieldRva table row (0x1D).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRvaRow {
    /// RVA of field data.
    pub rva: u32,
    /// Field index.
    pub field: u32,
}

impl FieldRvaRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            rva: reader.read_u32()?,
            field: read_table(reader, ctx, TableId::Field)?,
        })
    }
}

/// EncLog table row (0x1E).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncLogRow {
    /// Metadata token of the edited entity.
    pub token: u32,
    /// Edit operation code.
    pub func_code: u32,
}

impl EncLogRow {
    pub fn parse(reader: &mut Reader<'_>, _ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            token: reader.read_u32()?,
            func_code: reader.read_u32()?,
        })
    }
}

/// EncMap table row (0x1F).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncMapRow {
    /// Metadata token.
    pub token: u32,
}

impl EncMapRow {
    pub fn parse(reader: &mut Reader<'_>, _ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            token: reader.read_u32()?,
        })
    }
}

/// Assembly table row (0x20).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRow {
    /// Hash algorithm ID.
    pub hash_alg_id: u32,
    /// Major version.
    pub major_version: u16,
    /// Minor version.
    pub minor_version: u16,
    /// Build number.
    pub build_number: u16,
    /// Revision number.
    pub revision_number: u16,
    /// Assembly flags.
    pub flags: u32,
    /// Public key index into #Blob.
    pub public_key: u32,
    /// Assembly name index into #Strings.
    pub name: u32,
    /// Culture index into #Strings.
    pub culture: u32,
}

impl AssemblyRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            hash_alg_id: reader.read_u32()?,
            major_version: reader.read_u16()?,
            minor_version: reader.read_u16()?,
            build_number: reader.read_u16()?,
            revision_number: reader.read_u16()?,
            flags: reader.read_u32()?,
            public_key: read_blob(reader, ctx)?,
            name: read_string(reader, ctx)?,
            culture: read_string(reader, ctx)?,
        })
    }

    /// Version as `(major, minor, build, revision)`.
    #[must_use]
    pub fn version(&self) -> (u16, u16, u16, u16) {
        (
            self.major_version,
            self.minor_version,
            self.build_number,
            self.revision_number,
        )
    }
}

/// AssemblyProcessor table row (0x21).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyProcessorRow {
    pub processor: u32,
}

impl AssemblyProcessorRow {
    pub fn parse(reader: &mut Reader<'_>, _ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            processor: reader.read_u32()?,
        })
    }
}

/// AssemblyOS table row (0x22).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyOsRow {
    pub os_platform_id: u32,
    pub os_major_version: u32,
    pub os_minor_version: u32,
}

impl AssemblyOsRow {
    pub fn parse(reader: &mut Reader<'_>, _ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            os_platform_id: reader.read_u32()?,
            os_major_version: reader.read_u32()?,
            os_minor_version: reader.read_u32()?,
        })
    }
}

/// AssemblyRef table row (0x23).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRefRow {
    /// Major version.
    pub major_version: u16,
    /// Minor version.
    pub minor_version: u16,
    /// Build number.
    pub build_number: u16,
    /// Revision number.
    pub revision_number: u16,
    /// Assembly flags.
    pub flags: u32,
    /// Public key or token index into #Blob.
    pub public_key_or_token: u32,
    /// Assembly name index into #Strings.
    pub name: u32,
    /// Culture index into #Strings.
    pub culture: u32,
    /// Hash value index into #Blob.
    pub hash_value: u32,
}

impl AssemblyRefRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            major_version: reader.read_u16()?,
            minor_version: reader.read_u16()?,
            build_number: reader.read_u16()?,
            revision_number: reader.read_u16()?,
            flags: reader.read_u32()?,
            public_key_or_token: read_blob(reader, ctx)?,
            name: read_string(reader, ctx)?,
            culture: read_string(reader, ctx)?,
            hash_value: read_blob(reader, ctx)?,
        })
    }
}

/// AssemblyRefProcessor table row (0x24).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRefProcessorRow {
    pub processor: u32,
    /// AssemblyRef index.
    pub assembly_ref: u32,
}

impl AssemblyRefProcessorRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            processor: reader.read_u32()?,
            assembly_ref: read_table(reader, ctx, TableId::AssemblyRef)?,
        })
    }
}

/// AssemblyRefOS table row (0x25).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRefOsRow {
    pub os_platform_id: u32,
    pub os_major_version: u32,
    pub os_minor_version: u32,
    /// AssemblyRef index.
    pub assembly_ref: u32,
}

impl AssemblyRefOsRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            os_platform_id: reader.read_u32()?,
            os_major_version: reader.read_u32()?,
            os_minor_version: reader.read_u32()?,
            assembly_ref: read_table(reader, ctx, TableId::AssemblyRef)?,
        })
    }
}

/// File table row (0x26).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRow {
    /// File attributes (ContainsMetaData / ContainsNoMetaData).
    pub flags: u32,
    /// File name index into #Strings.
    pub name: u32,
    /// Hash value index into #Blob.
    pub hash_value: u32,
}

impl FileRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u32()?,
            name: read_string(reader, ctx)?,
            hash_value: read_blob(reader, ctx)?,
        })
    }
}

/// ExportedType table row (0x27).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedTypeRow {
    /// Type attributes (flags).
    pub flags: u32,
    /// TypeDef row hint in the defining module.
    pub type_def_id: u32,
    /// Type name index into #Strings.
    pub type_name: u32,
    /// Type namespace index into #Strings.
    pub type_namespace: u32,
    /// Implementation coded index.
    pub implementation: CodedIndex,
}

impl ExportedTypeRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            flags: reader.read_u32()?,
            type_def_id: reader.read_u32()?,
            type_name: read_string(reader, ctx)?,
            type_namespace: read_string(reader, ctx)?,
            implementation: read_coded(reader, ctx, CodedIndexKind::Implementation)?,
        })
    }
}

/// ManifestResource table row (0x28).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestResourceRow {
    /// Offset of the resource within its container.
    pub offset: u32,
    /// Visibility flags.
    pub flags: u32,
    /// Resource name index into #Strings.
    pub name: u32,
    /// Implementation coded index; null for resources in this file.
    pub implementation: CodedIndex,
}

impl ManifestResourceRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            offset: reader.read_u32()?,
            flags: reader.read_u32()?,
            name: read_string(reader, ctx)?,
            implementation: read_coded(reader, ctx, CodedIndexKind::Implementation)?,
        })
    }
}

/// NestedClass table row (0x29).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedClassRow {
    /// TypeDef index of the nested class.
    pub nested_class: u32,
    /// TypeDef index of the enclosing class.
    pub enclosing_class: u32,
}

impl NestedClassRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            nested_class: read_table(reader, ctx, TableId::TypeDef)?,
            enclosing_class: read_table(reader, ctx, TableId::TypeDef)?,
        })
    }
}

/// GenericParam table row (0x2A).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericParamRow {
    /// Generic parameter index (0-based within the owner's list).
    pub number: u16,
    /// Generic parameter flags.
    pub flags: u16,
    /// TypeOrMethodDef coded index (owner of this generic param).
    pub owner: CodedIndex,
    /// Parameter name index into #Strings.
    pub name: u32,
}

impl GenericParamRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            number: reader.read_u16()?,
            flags: reader.read_u16()?,
            owner: read_coded(reader, ctx, CodedIndexKind::TypeOrMethodDef)?,
            name: read_string(reader, ctx)?,
        })
    }
}

/// MethodSpec table row (0x2B).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSpecRow {
    /// MethodDefOrRef coded index.
    pub method: CodedIndex,
    /// Instantiation signature index into #Blob.
    pub instantiation: u32,
}

impl MethodSpecRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            method: read_coded(reader, ctx, CodedIndexKind::MethodDefOrRef)?,
            instantiation: read_blob(reader, ctx)?,
        })
    }
}

/// GenericParamConstraint table row (0x2C).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericParamConstraintRow {
    /// GenericParam index.
    pub owner: u32,
    /// TypeDefOrRef coded index (the constraint type).
    pub constraint: CodedIndex,
}

impl GenericParamConstraintRow {
    pub fn parse(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<Self> {
        Ok(Self {
            owner: read_table(reader, ctx, TableId::GenericParam)?,
            constraint: read_coded(reader, ctx, CodedIndexKind::TypeDefOrRef)?,
        })
    }
}

/// Decodes one row of a table from a reader positioned at its first byte.
pub type RowDecoder = fn(&mut Reader<'_>, &TableContext) -> Result<TableRow>;

/// A row struct tied to its table kind.
pub trait TableRowType: Sized + 'static {
    /// The table this row type belongs to.
    const TABLE: TableId;

    /// Decode one row and wrap it in [`TableRow`].
    fn decode_row(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<TableRow>;

    /// Borrow the typed row out of a [`TableRow`] of the same table.
    fn from_row(row: &TableRow) -> Option<&Self>;
}

macro_rules! row_catalog {
    ($($table:ident => $row:ident),+ $(,)?) => {
        /// A decoded row of any table.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum TableRow {
            $($table($row),)+
        }

        impl TableRow {
            /// The table this row was decoded from.
            #[must_use]
            pub fn table(&self) -> TableId {
                match self {
                    $(Self::$table(_) => TableId::$table,)+
                }
            }
        }

        $(
            impl TableRowType for $row {
                const TABLE: TableId = TableId::$table;

                fn decode_row(reader: &mut Reader<'_>, ctx: &TableContext) -> Result<TableRow> {
                    $row::parse(reader, ctx).map(TableRow::$table)
                }

                fn from_row(row: &TableRow) -> Option<&Self> {
                    match row {
                        TableRow::$table(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+

        /// The row decoder for a table.
        #[must_use]
        pub fn row_decoder(table: TableId) -> RowDecoder {
            match table {
                $(TableId::$table => <$row as TableRowType>::decode_row as RowDecoder,)+
            }
        }
    };
}

row_catalog! {
    Module => ModuleRow,
    TypeRef => TypeRefRow,
    TypeDef => TypeDefRow,
    FieldPtr => FieldPtrRow,
    Field => FieldRow,
    MethodPtr => MethodPtrRow,
    MethodDef => MethodDefRow,
    ParamPtr => ParamPtrRow,
    Param => ParamRow,
    InterfaceImpl => InterfaceImplRow,
    MemberRef => MemberRefRow,
    Constant => ConstantRow,
    CustomAttribute => CustomAttributeRow,
    FieldMarshal => FieldMarshalRow,
    DeclSecurity => DeclSecurityRow,
    ClassLayout => ClassLayoutRow,
    FieldLayout => FieldLayoutRow,
    StandAloneSig => StandAloneSigRow,
    EventMap => EventMapRow,
    EventPtr => EventPtrRow,
    Event => EventRow,
    PropertyMap => PropertyMapRow,
    PropertyPtr => PropertyPtrRow,
    Property => PropertyRow,
    MethodSemantics => MethodSemanticsRow,
    MethodImpl => MethodImplRow,
    ModuleRef => ModuleRefRow,
    TypeSpec => TypeSpecRow,
    ImplMap => ImplMapRow,
    FieldRva => FieldRvaRow,
    EncLog => EncLogRow,
    EncMap => EncMapRow,
    Assembly => AssemblyRow,
    AssemblyProcessor => AssemblyProcessorRow,
    AssemblyOs => AssemblyOsRow,
    AssemblyRef => AssemblyRefRow,
    AssemblyRefProcessor => AssemblyRefProcessorRow,
    AssemblyRefOs => AssemblyRefOsRow,
    File => FileRow,
    ExportedType => ExportedTypeRow,
    ManifestResource => ManifestResourceRow,
    NestedClass => NestedClassRow,
    GenericParam => GenericParamRow,
    MethodSpec => MethodSpecRow,
    GenericParamConstraint => GenericParamConstraintRow,
}
