//! Bounds-checked little-endian reader over a borrowed byte buffer.

use crate::error::{Error, Result};

/// A cursor over a byte slice that reads little-endian integers.
///
/// Every read is checked against the end of the buffer and fails with
/// [`Error::OutOfBounds`] instead of panicking or zero-filling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a new reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a reader positioned at an absolute offset.
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.seek(pos)?;
        Ok(reader)
    }

    /// Get the current position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the total length of the data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the reader is at the end.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get remaining bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seek to an absolute position. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(self.out_of_bounds(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a slice of bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(self.pos, len))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read a null-terminated UTF-8 string.
    pub fn read_null_str(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let rest = &self.data[start.min(self.data.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.out_of_bounds(start, rest.len() + 1))?;
        let slice = self.read_bytes(len)?;
        self.pos += 1;
        std::str::from_utf8(slice).map_err(|_| Error::InvalidString(start))
    }

    /// Read a 2 or 4 byte index, widening to u32.
    ///
    /// Any size other than 4 reads two bytes.
    pub fn read_index(&mut self, size: u32) -> Result<u32> {
        if size == 4 {
            self.read_u32()
        } else {
            self.read_u16().map(u32::from)
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn out_of_bounds(&self, offset: usize, needed: usize) -> Error {
        Error::OutOfBounds {
            offset,
            needed,
            len: self.data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [
            0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02,
            0x01,
        ];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_past_end_is_out_of_bounds() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut reader = Reader::new(&data);
        reader.read_u16().unwrap();
        match reader.read_u32() {
            Err(Error::OutOfBounds {
                offset,
                needed,
                len,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 4);
                assert_eq!(len, 3);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_at_positions_absolutely() {
        let data = [0, 0, 0, 0, 0x2A, 0x00];
        let mut reader = Reader::at(&data, 4).unwrap();
        assert_eq!(reader.read_u16().unwrap(), 42);
        assert!(Reader::at(&data, 6).is_ok());
        assert!(Reader::at(&data, 7).is_err());
    }

    #[test]
    fn test_read_index_width() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_index(2).unwrap(), 1);
        assert_eq!(reader.read_index(4).unwrap(), 0x0003_0002);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_null_str() {
        let data = b"#~\0#Strings\0";
        let mut reader = Reader::new(data);
        assert_eq!(reader.read_null_str().unwrap(), "#~");
        assert_eq!(reader.read_null_str().unwrap(), "#Strings");
        assert!(reader.is_empty());

        let mut unterminated = Reader::new(b"#GUID");
        assert!(unterminated.read_null_str().is_err());
    }
}
