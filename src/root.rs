//! Metadata root (BSJB header) and stream header parsing.
//!
//! Only enough of the root is read to locate the tables stream.

use tracing::debug;

use crate::error::{Error, Result};
use crate::reader::Reader;

/// BSJB signature (0x424A5342 = "BSJB" in little-endian).
pub const METADATA_SIGNATURE: u32 = 0x424A5342;

/// A metadata stream header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset from the start of the metadata root.
    pub offset: u32,
    /// Size of the stream in bytes.
    pub size: u32,
    /// Stream name (e.g., "#~", "#Strings").
    pub name: String,
}

impl StreamHeader {
    /// Optimized tables stream.
    pub const TABLES: &'static str = "#~";
    /// Uncompressed (edit-and-continue) tables stream.
    pub const TABLES_UNCOMPRESSED: &'static str = "#-";

    /// Parse a stream header from the reader.
    pub fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let offset = reader.read_u32()?;
        let size = reader.read_u32()?;

        let name_start = reader.position();
        let name = reader.read_null_str()?.to_string();

        // Names are padded to 4 bytes including the terminator
        let consumed = reader.position() - name_start;
        let padding = (4 - consumed % 4) % 4;
        reader.read_bytes(padding)?;

        Ok(Self { offset, size, name })
    }

    /// Check if this is the tables stream (#~ or #-).
    #[must_use]
    pub fn is_tables(&self) -> bool {
        self.name == Self::TABLES || self.name == Self::TABLES_UNCOMPRESSED
    }

    /// The stream's bytes within the metadata blob.
    pub fn data<'a>(&self, metadata: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize);
        end.and_then(|end| metadata.get(start..end))
            .ok_or(Error::OutOfBounds {
                offset: start,
                needed: self.size as usize,
                len: metadata.len(),
            })
    }
}

/// The metadata root header (BSJB header).
#[derive(Debug, Clone)]
pub struct MetadataRoot {
    /// Major version (typically 1).
    pub major_version: u16,
    /// Minor version (typically 1).
    pub minor_version: u16,
    /// Runtime version string (e.g., "v4.0.30319").
    pub version: String,
    /// Flags (reserved, should be 0).
    pub flags: u16,
    /// Stream headers.
    pub streams: Vec<StreamHeader>,
}

impl MetadataRoot {
    /// Parse the metadata root from raw bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);

        let signature = reader.read_u32()?;
        if signature != METADATA_SIGNATURE {
            return Err(Error::InvalidSignature(signature));
        }

        let major_version = reader.read_u16()?;
        let minor_version = reader.read_u16()?;
        let _reserved = reader.read_u32()?;

        // Length includes padding to a 4-byte boundary
        let version_len = reader.read_u32()? as usize;
        let version_start = reader.position();
        let version_bytes = reader.read_bytes(version_len)?;
        let version = version_bytes
            .iter()
            .position(|&b| b == 0)
            .map_or(version_bytes, |end| &version_bytes[..end]);
        let version = std::str::from_utf8(version)
            .map_err(|_| Error::InvalidString(version_start))?
            .to_string();

        let flags = reader.read_u16()?;
        let stream_count = reader.read_u16()?;

        let streams = (0..stream_count)
            .map(|_| StreamHeader::parse(&mut reader))
            .collect::<Result<Vec<_>>>()?;

        debug!(%version, streams = streams.len(), "parsed metadata root");

        Ok(Self {
            major_version,
            minor_version,
            version,
            flags,
            streams,
        })
    }

    /// Find a stream by name.
    #[must_use]
    pub fn find_stream(&self, name: &str) -> Option<&StreamHeader> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// Find the tables stream (#~ or #-).
    #[must_use]
    pub fn tables_stream(&self) -> Option<&StreamHeader> {
        self.streams.iter().find(|s| s.is_tables())
    }

    /// Bytes of the tables stream within `data`, the blob this root was
    /// parsed from.
    pub fn tables_stream_data<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        self.tables_stream()
            .ok_or_else(|| Error::StreamNotFound(StreamHeader::TABLES.to_string()))?
            .data(data)
    }
}
