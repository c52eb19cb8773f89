//! Heap index widths from the `HeapSizes` flag byte.

/// Bit 0 of the `HeapSizes` flags: `#Strings` uses 4-byte indices.
pub const WIDE_STRINGS: u8 = 0x01;
/// Bit 1 of the `HeapSizes` flags: `#GUID` uses 4-byte indices.
pub const WIDE_GUIDS: u8 = 0x02;
/// Bit 2 of the `HeapSizes` flags: `#Blob` uses 4-byte indices.
pub const WIDE_BLOBS: u8 = 0x04;

/// Byte widths of indices into the `#Strings`, `#GUID` and `#Blob` heaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapSizes {
    /// Width of a `#Strings` index (2 or 4).
    pub string: u32,
    /// Width of a `#GUID` index (2 or 4).
    pub guid: u32,
    /// Width of a `#Blob` index (2 or 4).
    pub blob: u32,
}

impl HeapSizes {
    /// Decode the flag byte. Bits 3-7 carry no width information and are
    /// ignored.
    #[must_use]
    pub const fn from_flags(flags: u8) -> Self {
        const fn width(flags: u8, bit: u8) -> u32 {
            if flags & bit != 0 { 4 } else { 2 }
        }

        Self {
            string: width(flags, WIDE_STRINGS),
            guid: width(flags, WIDE_GUIDS),
            blob: width(flags, WIDE_BLOBS),
        }
    }
}

impl Default for HeapSizes {
    fn default() -> Self {
        Self::from_flags(0)
    }
}
