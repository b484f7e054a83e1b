//! Fixed-width numeric columns.

use byteorder::{ByteOrder, LittleEndian};

use super::Payload;
use crate::error::Result;
use crate::metadata::Charset;
use crate::parser::blocks::{FixedSizeItems, StringsWithLength};
use crate::parser::byteorder::read_f64;
use crate::value::Value;

pub(super) fn read_short(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = FixedSizeItems::read(buffer, offset)?.require_width(2)?;
    let values = items
        .items()
        .map(|item| Value::Integer(i64::from(LittleEndian::read_i16(item))))
        .collect();
    Ok(Payload::new(values, items.end))
}

/// Identifier and integer columns share a 4-byte signed layout.
pub(super) fn read_integer(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = FixedSizeItems::read(buffer, offset)?.require_width(4)?;
    let values = items
        .items()
        .map(|item| Value::Integer(i64::from(LittleEndian::read_i32(item))))
        .collect();
    Ok(Payload::new(values, items.end))
}

pub(super) fn read_number(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = FixedSizeItems::read(buffer, offset)?.require_width(8)?;
    let values = doubles(items)?;
    Ok(Payload::new(values, items.end))
}

/// Calendar references; zero means the project default calendar.
pub(super) fn read_calendar(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = FixedSizeItems::read(buffer, offset)?.require_width(2)?;
    let values = items
        .items()
        .map(|item| match LittleEndian::read_u16(item) {
            0 => Value::Missing,
            id => Value::Integer(i64::from(id)),
        })
        .collect();
    Ok(Payload::new(values, items.end))
}

/// Doubles preceded by a list of display formats.
pub(super) fn read_double(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    let formats = StringsWithLength::read(buffer, offset, false, charset)?;
    let items = FixedSizeItems::read(buffer, formats.end)?.require_width(8)?;
    let values = doubles(items)?;
    Ok(Payload::new(values, items.end).with_options(formats.items))
}

pub(super) fn doubles(items: FixedSizeItems<'_>) -> Result<Vec<Value>> {
    items
        .items()
        .map(|item| read_f64(item, 0).map(Value::from_double))
        .collect()
}
