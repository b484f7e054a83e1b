//! File version detection and the per-generation decoder dispatch tables.

use serde::Serialize;

use super::byteorder::read_i32;
use crate::error::{Result, Section};
use crate::metadata::{Charset, ColumnLayout, FormatVersion};

/// Offset of the little-endian version code in the file header.
pub const VERSION_OFFSET: usize = 4;

/// Maps the first byte of a column child block to its decoder.
pub type DispatchTable = [Option<DecoderKind>; 256];

/// Column encodings understood by the reader.
///
/// Kinds suffixed `1`/`2` share a decoded shape but differ in the number of
/// bytes between the header and the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecoderKind {
    Boolean,
    Date,
    Time,
    Duration1,
    Duration2,
    Percent,
    Short1,
    Short2,
    Identifier1,
    Identifier2,
    Integer,
    Number1,
    Number2,
    Calendar1,
    Calendar2,
    Double1,
    Double2,
    Enum,
    String1,
    String2,
    Relation1,
    Relation2,
    Assignment1,
    Assignment2,
    /// Dispatch code with no known decoder; the column is skipped.
    Unknown,
}

impl DecoderKind {
    /// Bytes between the end of the column header and the start of the payload.
    #[must_use]
    pub const fn post_header_skip(self) -> usize {
        match self {
            Self::Boolean
            | Self::Date
            | Self::Time
            | Self::Double1
            | Self::Enum
            | Self::Assignment1
            | Self::Unknown => 0,
            Self::Duration1
            | Self::Percent
            | Self::Short1
            | Self::Identifier1
            | Self::Number1
            | Self::Calendar1
            | Self::String1
            | Self::Relation1
            | Self::Assignment2 => 14,
            Self::Double2 => 20,
            Self::Short2
            | Self::Identifier2
            | Self::Integer
            | Self::Number2
            | Self::Calendar2
            | Self::String2
            | Self::Relation2
            | Self::Duration2 => 34,
        }
    }

    #[must_use]
    pub const fn is_duration(self) -> bool {
        matches!(self, Self::Duration1 | Self::Duration2)
    }
}

static FIRST_GENERATION: DispatchTable = build_dispatch(ColumnLayout::First);
static SECOND_GENERATION: DispatchTable = build_dispatch(ColumnLayout::Second);

const fn build_dispatch(layout: ColumnLayout) -> DispatchTable {
    let second = matches!(layout, ColumnLayout::Second);
    let mut table: DispatchTable = [None; 256];

    table[0x53] = Some(DecoderKind::Boolean);
    table[0x6E] = Some(DecoderKind::Date);
    table[0x6F] = Some(DecoderKind::Time);
    table[0x59] = Some(DecoderKind::Enum);
    table[0x4B] = Some(DecoderKind::Integer);
    table[0x46] = Some(DecoderKind::Percent);

    table[0x71] = Some(pick(second, DecoderKind::Duration1, DecoderKind::Duration2));
    table[0x6C] = Some(pick(second, DecoderKind::Short1, DecoderKind::Short2));
    table[0x73] = Some(pick(second, DecoderKind::Short1, DecoderKind::Short2));
    table[0x6D] = Some(pick(second, DecoderKind::Identifier1, DecoderKind::Identifier2));
    table[0x70] = Some(pick(second, DecoderKind::Number1, DecoderKind::Number2));
    table[0x5C] = Some(pick(second, DecoderKind::Calendar1, DecoderKind::Calendar2));
    table[0x5B] = Some(pick(second, DecoderKind::Double1, DecoderKind::Double2));
    table[0x4A] = Some(pick(second, DecoderKind::Double1, DecoderKind::Double2));
    table[0x54] = Some(pick(second, DecoderKind::Double1, DecoderKind::Double2));
    table[0x68] = Some(pick(second, DecoderKind::String1, DecoderKind::String2));
    table[0x69] = Some(pick(second, DecoderKind::String1, DecoderKind::String2));
    table[0x57] = Some(pick(second, DecoderKind::Relation1, DecoderKind::Relation2));
    table[0x58] = Some(pick(second, DecoderKind::Relation1, DecoderKind::Relation2));
    table[0x49] = Some(pick(second, DecoderKind::Assignment1, DecoderKind::Assignment2));

    table
}

const fn pick(second: bool, first: DecoderKind, later: DecoderKind) -> DecoderKind {
    if second { later } else { first }
}

/// Returns the dispatch table for a layout generation.
#[must_use]
pub fn dispatch_table(layout: ColumnLayout) -> &'static DispatchTable {
    match layout {
        ColumnLayout::First => &FIRST_GENERATION,
        ColumnLayout::Second => &SECOND_GENERATION,
    }
}

/// Looks up the decoder for a dispatch code, falling back to [`DecoderKind::Unknown`].
#[must_use]
pub fn decoder_for(table: &DispatchTable, code: u8) -> DecoderKind {
    table[usize::from(code)].unwrap_or(DecoderKind::Unknown)
}

/// Maps a header version code to its charset and column layout.
#[must_use]
pub const fn resolve_version(code: i32) -> Option<FormatVersion> {
    let (charset, layout) = match code {
        139 => (Charset::Utf16Le, ColumnLayout::First),
        144 | 145 => (Charset::Utf8, ColumnLayout::First),
        146 => (Charset::Utf8, ColumnLayout::Second),
        _ => return None,
    };
    Some(FormatVersion {
        code,
        charset,
        layout,
    })
}

/// Reads the raw version code from the file header.
///
/// # Errors
///
/// Returns a structural error if the buffer is too short to hold a header.
pub fn read_version_code(buffer: &[u8]) -> Result<i32> {
    read_i32(buffer, VERSION_OFFSET).map_err(|err| err.in_section(Section::FileHeader))
}
