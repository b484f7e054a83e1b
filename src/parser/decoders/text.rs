//! Free-text, relation and resource-assignment columns.

use super::Payload;
use crate::error::Result;
use crate::logger::log_warn;
use crate::metadata::Charset;
use crate::parser::blocks::{OffsetStrings, StringsWithLength};
use crate::parser::byteorder::{read_i32, read_u8};
use crate::value::Value;

const RELATION_RESERVED: usize = 4;
/// An assignment column starting with this value carries a fixed preamble.
const ASSIGNMENT_PREAMBLE_MARKER: i32 = -1;
const ASSIGNMENT_PREAMBLE_SIZE: usize = 20;

fn into_text(items: Vec<String>) -> Vec<Value> {
    items.into_iter().map(Value::Text).collect()
}

pub(super) fn read_strings(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    let block = StringsWithLength::read(buffer, offset, false, charset)?;
    Ok(Payload::new(into_text(block.items), block.end))
}

pub(super) fn read_offset_strings(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    let block = OffsetStrings::read(buffer, offset, charset)?;
    Ok(Payload::new(into_text(block.items), block.end))
}

/// Predecessor and successor lists, one formatted string per row.
pub(super) fn read_relation(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    read_strings(buffer, offset + RELATION_RESERVED, charset)
}

pub(super) fn read_assignment(buffer: &[u8], offset: usize, charset: Charset) -> Result<Payload> {
    read_assignment_rows(buffer, offset, charset, false)
}

/// Older writers may insert an extra string block between the options and
/// the rows, flagged by a non-zero byte.
pub(super) fn read_assignment_with_embedded(
    buffer: &[u8],
    offset: usize,
    charset: Charset,
) -> Result<Payload> {
    read_assignment_rows(buffer, offset, charset, true)
}

fn read_assignment_rows(
    buffer: &[u8],
    offset: usize,
    charset: Charset,
    embedded_marker: bool,
) -> Result<Payload> {
    let mut cursor = offset;
    if read_i32(buffer, cursor)? == ASSIGNMENT_PREAMBLE_MARKER {
        cursor += ASSIGNMENT_PREAMBLE_SIZE;
    }

    let options = StringsWithLength::read(buffer, cursor, false, charset)?;
    cursor = options.end;

    let mut embedded_skipped = false;
    if embedded_marker {
        let marker = read_u8(buffer, cursor)?;
        cursor += 1;
        if marker != 0 {
            cursor = StringsWithLength::skip(buffer, cursor, false)?;
            embedded_skipped = true;
        }
    }

    let rows = StringsWithLength::read(buffer, cursor, true, charset).inspect_err(|err| {
        if embedded_skipped {
            log_warn(&format!(
                "assignment rows unreadable after skipping embedded string block at {offset}: {err}"
            ));
        }
    })?;

    let mut payload = Payload::new(into_text(rows.items), rows.end).with_options(options.items);
    payload.embedded_skipped = embedded_skipped;
    Ok(payload)
}
