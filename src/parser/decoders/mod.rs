//! Column decoders, one family per on-disk encoding.
//!
//! Every column child block starts with a [`ColumnHeader`]; the decoder kind
//! selected from the dispatch table decides how many bytes follow the header
//! before the payload and how the payload is laid out.

mod choice;
mod numeric;
mod temporal;
mod text;

use std::ops::Range;

use super::header::ColumnHeader;
use super::version::DecoderKind;
use crate::error::{Error, Result, Section};
use crate::logger::log_warn;
use crate::metadata::{Charset, FieldType, TableKind};
use crate::value::Value;

/// Signature shared by every payload reader.
pub(crate) type PayloadReader = fn(&[u8], usize, Charset) -> Result<Payload>;

/// Values produced by a payload reader and the offset just past them.
#[derive(Debug, Default)]
pub(crate) struct Payload {
    values: Vec<Value>,
    options: Vec<String>,
    unit_code: Option<u8>,
    embedded_skipped: bool,
    end: usize,
}

impl Payload {
    const fn new(values: Vec<Value>, end: usize) -> Self {
        Self {
            values,
            options: Vec::new(),
            unit_code: None,
            embedded_skipped: false,
            end,
        }
    }

    fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }
}

impl DecoderKind {
    pub(crate) fn payload_reader(self) -> Option<PayloadReader> {
        Some(match self {
            Self::Boolean => choice::read_boolean,
            Self::Enum => choice::read_enum,
            Self::Date => temporal::read_date,
            Self::Time => temporal::read_time,
            Self::Duration1 | Self::Duration2 => temporal::read_duration,
            Self::Short1 | Self::Short2 => numeric::read_short,
            Self::Identifier1 | Self::Identifier2 | Self::Integer => numeric::read_integer,
            Self::Percent | Self::Number1 | Self::Number2 => numeric::read_number,
            Self::Calendar1 | Self::Calendar2 => numeric::read_calendar,
            Self::Double1 | Self::Double2 => numeric::read_double,
            Self::String1 => text::read_strings,
            Self::String2 => text::read_offset_strings,
            Self::Relation1 | Self::Relation2 => text::read_relation,
            Self::Assignment1 => text::read_assignment_with_embedded,
            Self::Assignment2 => text::read_assignment,
            Self::Unknown => return None,
        })
    }
}

/// A decoded column child block.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub kind: DecoderKind,
    /// Absolute offset of the child block.
    pub offset: usize,
    pub length: usize,
    /// Absent when the dispatch code had no decoder.
    pub header: Option<ColumnHeader>,
    /// Semantic field resolved from the header's type code and the table.
    pub field: Option<FieldType>,
    /// Enum, boolean or format options listed before the values.
    pub options: Vec<String>,
    pub values: Vec<Value>,
    /// Raw column-wide unit code carried by duration columns.
    pub unit_code: Option<u8>,
    /// Bytes after the payload up to the end of the child block.
    pub trailer: Range<usize>,
    /// Bytes the payload ran past the end of the child block. Non-zero when a
    /// spurious child signature inside the data cut the block short.
    pub overrun: usize,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        self.header.as_ref().map_or("", |header| header.name.as_str())
    }

    #[must_use]
    pub fn type_code(&self) -> Option<u16> {
        self.header.as_ref().map(|header| header.type_code)
    }

    fn skipped(kind: DecoderKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            header: None,
            field: None,
            options: Vec::new(),
            values: Vec::new(),
            unit_code: None,
            trailer: offset + length..offset + length,
            overrun: 0,
        }
    }
}

/// Decodes the child block `start..start + length` as a column of `table`.
///
/// Unknown decoder kinds produce an empty column without touching the bytes.
///
/// A payload running past the child block end is kept and reported through
/// [`Column::overrun`], except for assignment columns whose embedded string
/// block was skipped.
///
/// # Errors
///
/// Returns a structural error, labelled with the column section, when the
/// header or payload does not fit the expected layout, or when an assignment
/// column with a skipped embedded block runs past the child block end.
pub fn decode_column(
    kind: DecoderKind,
    table: TableKind,
    buffer: &[u8],
    start: usize,
    length: usize,
    charset: Charset,
) -> Result<Column> {
    let section = Section::Column {
        offset: start,
        kind,
    };
    let Some(reader) = kind.payload_reader() else {
        return Ok(Column::skipped(kind, start, length));
    };
    let end = start + length;

    let (header, payload_start) =
        ColumnHeader::read(buffer, start, charset).map_err(|err| err.in_section(section.clone()))?;
    let payload = reader(buffer, payload_start + kind.post_header_skip(), charset)
        .map_err(|err| err.in_section(section.clone()))?;

    if payload.end > end && payload.embedded_skipped {
        log_warn(&format!(
            "assignment column '{}' at offset {start}: skipping the embedded string block \
             moved the payload end to {} past the child block end {end}",
            header.name, payload.end
        ));
        return Err(Error::structural(
            payload.end,
            format!("payload ends past child block end {end}"),
        )
        .in_section(section));
    }

    let field = FieldType::resolve(table, header.type_code);
    Ok(Column {
        kind,
        offset: start,
        length,
        header: Some(header),
        field,
        options: payload.options,
        values: payload.values,
        unit_code: payload.unit_code,
        trailer: payload.end.min(end)..end,
        overrun: payload.end.saturating_sub(end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ActivityField;
    use crate::parser::blocks::tests::{fixed_items, strings_with_length};
    use crate::parser::header::tests::column_header;

    fn string_column(type_code: u16, rows: &[&str]) -> Vec<u8> {
        let mut bytes = column_header(0x68, "Activity Name", type_code);
        bytes.extend_from_slice(&[0; 14]);
        bytes.extend_from_slice(&strings_with_length(rows, false));
        bytes
    }

    #[test]
    fn decodes_string_column_and_resolves_field() {
        let mut bytes = string_column(2, &["Task A", "Task B"]);
        bytes.extend_from_slice(&[0xEE; 3]);
        let column = decode_column(
            DecoderKind::String1,
            TableKind::Activities,
            &bytes,
            0,
            bytes.len(),
            Charset::Utf8,
        )
        .unwrap();
        assert_eq!(column.name(), "Activity Name");
        assert_eq!(
            column.field,
            Some(FieldType::Activity(ActivityField::ActivityName))
        );
        assert_eq!(
            column.values,
            vec![Value::Text("Task A".into()), Value::Text("Task B".into())]
        );
        assert_eq!(column.trailer.len(), 3);
    }

    #[test]
    fn payload_past_child_end_is_kept_as_overrun() {
        let bytes = string_column(2, &["Task A"]);
        let column = decode_column(
            DecoderKind::String1,
            TableKind::Activities,
            &bytes,
            0,
            bytes.len() - 2,
            Charset::Utf8,
        )
        .unwrap();
        assert_eq!(column.values, vec![Value::Text("Task A".into())]);
        assert_eq!(column.overrun, 2);
        assert!(column.trailer.is_empty());
    }

    fn assignment_column(embedded: Option<&[&str]>) -> Vec<u8> {
        let mut bytes = column_header(0x49, "Resources Assigned", 10);
        bytes.extend_from_slice(&strings_with_length(&["Crew"], false));
        match embedded {
            Some(items) => {
                bytes.push(1);
                bytes.extend_from_slice(&strings_with_length(items, false));
            }
            None => bytes.push(0),
        }
        bytes.extend_from_slice(&strings_with_length(&["Alice", "Bob"], true));
        bytes
    }

    #[test]
    fn skipped_embedded_block_reads_following_rows() {
        let bytes = assignment_column(Some(&["ignored"]));
        let column = decode_column(
            DecoderKind::Assignment1,
            TableKind::ActBars,
            &bytes,
            0,
            bytes.len(),
            Charset::Utf8,
        )
        .unwrap();
        assert_eq!(
            column.values,
            vec![Value::Text("Alice".into()), Value::Text("Bob".into())]
        );
        assert_eq!(column.options, vec!["Crew"]);
    }

    #[test]
    fn overrun_after_skipped_embedded_block_is_structural() {
        let bytes = assignment_column(Some(&["ignored"]));
        let err = decode_column(
            DecoderKind::Assignment1,
            TableKind::ActBars,
            &bytes,
            0,
            bytes.len() - 3,
            Charset::Utf8,
        )
        .unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("Assignment1 column at offset 0"));

        let plain = assignment_column(None);
        let column = decode_column(
            DecoderKind::Assignment1,
            TableKind::ActBars,
            &plain,
            0,
            plain.len() - 3,
            Charset::Utf8,
        )
        .unwrap();
        assert_eq!(column.overrun, 3);
    }

    #[test]
    fn unknown_kind_is_a_no_op() {
        let bytes = [0xFFu8; 40];
        let column = decode_column(
            DecoderKind::Unknown,
            TableKind::Resources,
            &bytes,
            4,
            30,
            Charset::Utf8,
        )
        .unwrap();
        assert!(column.values.is_empty());
        assert_eq!(column.field, None);
        assert_eq!(column.header, None);
    }

    #[test]
    fn unknown_type_code_leaves_field_unresolved() {
        let mut bytes = column_header(0x6D, "Mystery", 9_999);
        bytes.extend_from_slice(&[0; 14]);
        bytes.extend_from_slice(&fixed_items(4, &[&7i32.to_le_bytes()]));
        let column = decode_column(
            DecoderKind::Identifier1,
            TableKind::Activities,
            &bytes,
            0,
            bytes.len(),
            Charset::Utf8,
        )
        .unwrap();
        assert_eq!(column.values, vec![Value::Integer(7)]);
        assert_eq!(column.field, None);
    }
}
