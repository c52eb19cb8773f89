//! # clrtables
//!
//! Resolver and row decoder for the ECMA-335 metadata tables stream (`#~`).
//!
//! The crate works on raw metadata bytes and is PE-agnostic: given the
//! position of the tables stream header it computes, for every table slot,
//! the row count, the bytes per row and the offset of the first row, then
//! decodes rows on demand.
//!
//! ## Example
//!
//! ```ignore
//! use clrtables::{TableId, TablesHeader, TypeDefRow};
//!
//! let header = TablesHeader::parse(&stream_bytes, 0)?;
//!
//! for def in header.table_definitions()?.present() {
//!     println!("{def}");
//! }
//!
//! for type_def in header.table::<TypeDefRow>()? {
//!     println!("TypeDef name index: {}", type_def.type_name);
//! }
//!
//! let module = header.row(TableId::Module, 1)?;
//! ```

pub mod error;
pub mod reader;
pub mod root;
pub mod tables;

pub use error::{Error, Result};
pub use reader::Reader;
pub use root::{MetadataRoot, StreamHeader};

pub use tables::{
    CodedIndex, CodedIndexKind, Diagnostic, HeapSizes, TableDefinition, TableDefinitions,
    TableId, TableRow, TableRowType, TablesHeader,
};

// Re-export table rows
pub use tables::{
    AssemblyOsRow, AssemblyProcessorRow, AssemblyRefOsRow, AssemblyRefProcessorRow,
    AssemblyRefRow, AssemblyRow, ClassLayoutRow, ConstantRow, CustomAttributeRow,
    DeclSecurityRow, EncLogRow, EncMapRow, EventMapRow, EventPtrRow, EventRow, ExportedTypeRow,
    FieldLayoutRow, FieldMarshalRow, FieldPtrRow, FieldRow, FieldRvaRow, FileRow,
    GenericParamConstraintRow, GenericParamRow, ImplMapRow, InterfaceImplRow,
    ManifestResourceRow, MemberRefRow, MethodDefRow, MethodImplRow, MethodPtrRow,
    MethodSemanticsRow, MethodSpecRow, ModuleRefRow, ModuleRow, NestedClassRow, ParamPtrRow,
    ParamRow, PropertyMapRow, PropertyPtrRow, PropertyRow, StandAloneSigRow, TypeDefRow,
    TypeRefRow, TypeSpecRow,
};
