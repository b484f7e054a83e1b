//! Columns whose cells pick from a small set of values.

use byteorder::{ByteOrder, LittleEndian};

use super::Payload;
use crate::error::Result;
use crate::metadata::Charset;
use crate::parser::blocks::{FixedSizeItems, StringsWithLength};
use crate::parser::byteorder::skip_to_next_matching_short;
use crate::value::Value;

const BOOLEAN_ITEMS_MARKER: u16 = 0x000F;
const ENUM_RESERVED: usize = 4;

/// Tri-state flags: 1 true, 0 false, anything else null.
pub(super) fn read_boolean(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    let options = StringsWithLength::read(buffer, offset, false, charset)?;
    let items_start = skip_to_next_matching_short(buffer, options.end, BOOLEAN_ITEMS_MARKER)?;
    let items = FixedSizeItems::read(buffer, items_start)?.require_width(2)?;
    let values = items
        .items()
        .map(|item| match LittleEndian::read_u16(item) {
            1 => Value::Boolean(true),
            0 => Value::Boolean(false),
            _ => Value::Missing,
        })
        .collect();
    Ok(Payload::new(values, items.end).with_options(options.items))
}

/// Option labels followed by 1-based indices into them.
pub(super) fn read_enum(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    let options = StringsWithLength::read(buffer, offset, false, charset)?;
    let items = FixedSizeItems::read(buffer, options.end + ENUM_RESERVED)?.require_width(2)?;
    let values = items
        .items()
        .map(|item| {
            let index = usize::from(LittleEndian::read_u16(item));
            index
                .checked_sub(1)
                .and_then(|slot| options.items.get(slot))
                .map_or(Value::Missing, |label| Value::Text(label.clone()))
        })
        .collect();
    Ok(Payload::new(values, items.end).with_options(options.items))
}
