//! Bounds-checked little-endian reads over the raw file buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Largest count or length accepted from the file before a block is treated
/// as a misidentified match.
pub const MAX_DECLARED_SIZE: i32 = 100_000;

/// Bit pattern FastTrack writes for an empty numeric cell.
pub const NULL_DOUBLE_BITS: u64 = 0x3949_F623_D5A8_A733;

#[inline]
pub fn slice_at(buffer: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buffer.get(offset..end))
        .ok_or_else(|| {
            Error::structural(
                offset,
                format!("read of {len} bytes runs past end of buffer ({})", buffer.len()),
            )
        })
}

#[inline]
pub fn read_u8(buffer: &[u8], offset: usize) -> Result<u8> {
    buffer
        .get(offset)
        .copied()
        .ok_or_else(|| Error::structural(offset, "offset beyond end of buffer"))
}

#[inline]
pub fn read_u16(buffer: &[u8], offset: usize) -> Result<u16> {
    slice_at(buffer, offset, 2).map(LittleEndian::read_u16)
}

#[inline]
pub fn read_i32(buffer: &[u8], offset: usize) -> Result<i32> {
    slice_at(buffer, offset, 4).map(LittleEndian::read_i32)
}

#[inline]
pub fn read_u64(buffer: &[u8], offset: usize) -> Result<u64> {
    slice_at(buffer, offset, 8).map(LittleEndian::read_u64)
}

/// Reads an 8-byte double, mapping the FastTrack null pattern and NaN to `None`.
#[inline]
pub fn read_f64(buffer: &[u8], offset: usize) -> Result<Option<f64>> {
    let bits = read_u64(buffer, offset)?;
    if bits == NULL_DOUBLE_BITS {
        return Ok(None);
    }
    let value = f64::from_bits(bits);
    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Reads an `i32` count or length and checks it against [`MAX_DECLARED_SIZE`].
pub fn read_size(buffer: &[u8], offset: usize) -> Result<usize> {
    let raw = read_i32(buffer, offset)?;
    validate_size(raw, offset)
}

/// Ensures a declared size falls within sensible bounds.
pub fn validate_size(size: i32, offset: usize) -> Result<usize> {
    match usize::try_from(size) {
        Ok(value) if size <= MAX_DECLARED_SIZE => Ok(value),
        _ => Err(Error::structural(
            offset,
            format!("declared size {size} outside 0..={MAX_DECLARED_SIZE}"),
        )),
    }
}

/// Scans forward from `offset` for a little-endian `u16` equal to `marker`
/// and returns the offset just past it.
///
/// The marker must occur before the end of `buffer`; running out of bytes is
/// reported as a structural error rather than looping.
pub fn skip_to_next_matching_short(buffer: &[u8], offset: usize, marker: u16) -> Result<usize> {
    let mut cursor = offset;
    while cursor + 2 <= buffer.len() {
        if LittleEndian::read_u16(&buffer[cursor..cursor + 2]) == marker {
            return Ok(cursor + 2);
        }
        cursor += 1;
    }
    Err(Error::structural(
        offset,
        format!("marker 0x{marker:04X} not found before end of buffer"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_reads() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(read_u16(&bytes, 0).unwrap(), 0x0201);
        assert_eq!(read_i32(&bytes, 0).unwrap(), 0x0403_0201);
        assert_eq!(read_i32(&[0xFF, 0xFF, 0xFF, 0xFF], 0).unwrap(), -1);
    }

    #[test]
    fn reads_past_end_are_structural() {
        let bytes = [0u8; 3];
        assert!(read_i32(&bytes, 0).unwrap_err().is_structural());
        assert!(read_u8(&bytes, 3).unwrap_err().is_structural());
        assert!(slice_at(&bytes, usize::MAX, 2).is_err());
    }

    #[test]
    fn null_double_patterns_map_to_none() {
        let null = NULL_DOUBLE_BITS.to_le_bytes();
        assert_eq!(read_f64(&null, 0).unwrap(), None);
        let nan = f64::NAN.to_le_bytes();
        assert_eq!(read_f64(&nan, 0).unwrap(), None);
        let value = 2.5f64.to_le_bytes();
        assert_eq!(read_f64(&value, 0).unwrap(), Some(2.5));
    }

    #[test]
    fn size_validation_bounds() {
        assert_eq!(validate_size(0, 0).unwrap(), 0);
        assert_eq!(validate_size(100_000, 0).unwrap(), 100_000);
        assert!(validate_size(100_001, 0).is_err());
        assert!(validate_size(-1, 0).is_err());
    }

    #[test]
    fn skip_to_marker_returns_offset_after_marker() {
        let bytes = [0x00, 0x01, 0x0F, 0x00, 0xAA];
        assert_eq!(skip_to_next_matching_short(&bytes, 0, 0x000F).unwrap(), 4);
        assert!(skip_to_next_matching_short(&bytes, 0, 0x1234).is_err());
    }
}
