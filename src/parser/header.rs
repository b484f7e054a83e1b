use std::borrow::Cow;

use super::byteorder::{read_i32, read_u16, slice_at, validate_size};
use super::encoding::read_string;
use crate::error::{Error, Result};
use crate::metadata::Charset;

const COLUMN_TAG_SIZE: usize = 8;
const MIN_COLUMN_NAME_LEN: i32 = 1;
const MAX_COLUMN_NAME_LEN: i32 = 255;

/// Prologue shared by every column child block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Opaque leading bytes. Byte 0 is the dispatch code and bytes 2..8 hold
    /// the child block signature.
    pub tag: [u8; COLUMN_TAG_SIZE],
    pub name: String,
    /// Field code, resolved against the current table's field catalog.
    pub type_code: u16,
    pub flags: u16,
}

impl ColumnHeader {
    /// Parses the header at `start` and returns it with the offset of the
    /// first byte after the flags.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the name length is outside `1..=255` or
    /// the header runs past the buffer.
    pub fn read(buffer: &[u8], start: usize, charset: Charset) -> Result<(Self, usize)> {
        let mut tag = [0u8; COLUMN_TAG_SIZE];
        tag.copy_from_slice(slice_at(buffer, start, COLUMN_TAG_SIZE)?);
        let mut offset = start + COLUMN_TAG_SIZE;

        let declared = read_i32(buffer, offset)?;
        if !(MIN_COLUMN_NAME_LEN..=MAX_COLUMN_NAME_LEN).contains(&declared) {
            return Err(Error::structural(
                offset,
                Cow::Owned(format!(
                    "column name length {declared} outside {MIN_COLUMN_NAME_LEN}..={MAX_COLUMN_NAME_LEN}"
                )),
            ));
        }
        let name_len = validate_size(declared, offset)?;
        offset += 4;

        let name = read_string(buffer, offset, name_len, charset)?;
        offset += name_len;

        let type_code = read_u16(buffer, offset)?;
        offset += 2;
        let flags = read_u16(buffer, offset)?;
        offset += 2;

        Ok((
            Self {
                tag,
                name,
                type_code,
                flags,
            },
            offset,
        ))
    }

    /// First byte of the block, used to select the decoder.
    #[must_use]
    pub const fn dispatch_code(&self) -> u8 {
        self.tag[0]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn column_header(code: u8, name: &str, type_code: u16) -> Vec<u8> {
        let mut out = vec![code, 0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00];
        out.extend_from_slice(&i32::try_from(name.len()).unwrap().to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&type_code.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    #[test]
    fn reads_name_and_codes() {
        let mut bytes = column_header(0x68, "Activity Name", 2);
        bytes.extend_from_slice(&[0xAA; 4]);
        let (header, end) = ColumnHeader::read(&bytes, 0, Charset::Utf8).unwrap();
        assert_eq!(header.name, "Activity Name");
        assert_eq!(header.type_code, 2);
        assert_eq!(header.flags, 0);
        assert_eq!(header.dispatch_code(), 0x68);
        assert_eq!(end, bytes.len() - 4);
    }

    #[test]
    fn rejects_empty_and_oversized_names() {
        let mut bytes = column_header(0x68, "x", 2);
        bytes[8..12].copy_from_slice(&0i32.to_le_bytes());
        assert!(ColumnHeader::read(&bytes, 0, Charset::Utf8).unwrap_err().is_structural());

        bytes[8..12].copy_from_slice(&256i32.to_le_bytes());
        assert!(ColumnHeader::read(&bytes, 0, Charset::Utf8).unwrap_err().is_structural());
    }

    #[test]
    fn name_trailing_controls_are_stripped() {
        let bytes = column_header(0x68, "Notes\0\0", 170);
        let (header, _) = ColumnHeader::read(&bytes, 0, Charset::Utf8).unwrap();
        assert_eq!(header.name, "Notes");
    }
}
