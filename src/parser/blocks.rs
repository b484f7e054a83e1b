//! Payload structures shared by several column encodings.

use smallvec::SmallVec;

use super::byteorder::{read_i32, read_size, read_u16, slice_at, validate_size};
use super::encoding::read_string;
use crate::error::{Error, Result};
use crate::metadata::Charset;

/// A count followed by `{2 reserved, i32 length, text}` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringsWithLength {
    pub items: Vec<String>,
    pub end: usize,
}

impl StringsWithLength {
    /// Reads the block at `offset`. When `inclusive` is set the stored count
    /// is the index of the last entry, so one more entry than declared follows.
    ///
    /// # Errors
    ///
    /// Returns a structural error if a count or length is out of range or the
    /// block runs past the buffer.
    pub fn read(buffer: &[u8], offset: usize, inclusive: bool, charset: Charset) -> Result<Self> {
        let mut count = read_size(buffer, offset)?;
        let mut cursor = offset + 4;
        if inclusive {
            count += 1;
        }

        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            cursor += 2;
            let length = read_size(buffer, cursor)?;
            cursor += 4;
            items.push(read_string(buffer, cursor, length, charset)?);
            cursor += length;
        }

        Ok(Self { items, end: cursor })
    }

    /// Walks the block structure without decoding any text and returns the
    /// offset just past it.
    ///
    /// # Errors
    ///
    /// Returns a structural error under the same conditions as [`Self::read`].
    pub fn skip(buffer: &[u8], offset: usize, inclusive: bool) -> Result<usize> {
        let mut count = read_size(buffer, offset)?;
        let mut cursor = offset + 4;
        if inclusive {
            count += 1;
        }
        for _ in 0..count {
            cursor += 2;
            let length = read_size(buffer, cursor)?;
            cursor += 4;
            slice_at(buffer, cursor, length)?;
            cursor += length;
        }
        Ok(cursor)
    }
}

/// `2 reserved, i32 count, i16 width, 4 reserved` then `count * width` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeItems<'a> {
    data: &'a [u8],
    count: usize,
    width: usize,
    pub end: usize,
}

impl<'a> FixedSizeItems<'a> {
    /// # Errors
    ///
    /// Returns a structural error if the count or width is out of range or
    /// the items extend past the buffer.
    pub fn read(buffer: &'a [u8], offset: usize) -> Result<Self> {
        let mut cursor = offset + 2;
        let count = read_size(buffer, cursor)?;
        cursor += 4;
        let width = validate_size(i32::from(read_u16(buffer, cursor)?), cursor)?;
        cursor += 2;
        cursor += 4;

        let total = count
            .checked_mul(width)
            .ok_or_else(|| Error::structural(offset, "fixed-size item block overflows"))?;
        let data = slice_at(buffer, cursor, total)?;

        Ok(Self {
            data,
            count,
            width,
            end: cursor + total,
        })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Fails unless every item is at least `min` bytes wide.
    ///
    /// # Errors
    ///
    /// Returns a structural error naming the observed width.
    pub fn require_width(self, min: usize) -> Result<Self> {
        if self.width < min && self.count > 0 {
            return Err(Error::structural(
                self.end,
                format!("item width {} smaller than {min}", self.width),
            ));
        }
        Ok(self)
    }

    pub fn items(self) -> impl Iterator<Item = &'a [u8]> {
        let Self {
            data, count, width, ..
        } = self;
        (0..count).map(move |index| &data[index * width..(index + 1) * width])
    }
}

/// `i32 count, i32 marker, (count + 1) i32 offsets, i32 data size`, then the
/// string data sliced by consecutive offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetStrings {
    pub marker: i32,
    pub items: Vec<String>,
    pub end: usize,
}

impl OffsetStrings {
    /// # Errors
    ///
    /// Returns a structural error if the offsets are not monotonic, exceed
    /// the declared data size, or the block runs past the buffer.
    pub fn read(buffer: &[u8], offset: usize, charset: Charset) -> Result<Self> {
        let count = read_size(buffer, offset)?;
        let marker = read_i32(buffer, offset + 4)?;
        let mut cursor = offset + 8;

        let mut offsets = SmallVec::<[usize; 32]>::with_capacity(count + 1);
        for _ in 0..=count {
            offsets.push(read_size(buffer, cursor)?);
            cursor += 4;
        }

        let data_size = read_size(buffer, cursor)?;
        cursor += 4;
        slice_at(buffer, cursor, data_size)?;

        let mut items = Vec::with_capacity(count);
        for pair in offsets.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if start > end || end > data_size {
                return Err(Error::structural(
                    cursor,
                    format!("string offsets {start}..{end} outside data of {data_size} bytes"),
                ));
            }
            items.push(read_string(buffer, cursor + start, end - start, charset)?);
        }

        Ok(Self {
            marker,
            items,
            end: cursor + data_size,
        })
    }
}
