//! Optional tracing of the scan, used to investigate files the reader
//! mis-handles.
//!
//! A [`TraceSink`] observes every block, table name and column the scanner
//! touches. Sinks are write-only: nothing they do feeds back into the scan.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::error::Error;
use crate::metadata::TableKind;
use crate::parser::{Column, DecoderKind};

/// Bytes per line of [`hexdump`] output.
pub const HEXDUMP_COLUMNS: usize = 16;

/// Why a successfully decoded column was not attached to its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    UnknownField,
    Duplicate,
}

/// Observer for the block scanner. Every method defaults to doing nothing.
pub trait TraceSink {
    fn block(&mut self, _index: usize, _offset: usize, _bytes: &[u8]) {}

    fn table_name(&mut self, _offset: usize, _name: &str, _table: Option<TableKind>) {}

    fn column_bytes(&mut self, _offset: usize, _bytes: &[u8]) {}

    fn column_decoded(&mut self, _table: TableKind, _column: &Column) {}

    /// The column's payload ran [`Column::overrun`] bytes past its child block.
    fn column_overrun(&mut self, _table: TableKind, _column: &Column) {}

    fn column_dropped(&mut self, _offset: usize, _kind: DecoderKind, _error: &Error) {}

    fn column_discarded(&mut self, _table: TableKind, _column: &Column, _reason: DiscardReason) {}
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {}

/// Writes a human-readable dump of the scan.
///
/// Write errors are remembered and surfaced by [`WriterTrace::finish`] so a
/// failing trace never interrupts parsing.
pub struct WriterTrace<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterTrace<W> {
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_none()
            && let Err(err) = self.out.write_all(text.as_bytes())
        {
            self.error = Some(err);
        }
    }

    /// Flushes the writer and returns it.
    ///
    /// # Errors
    ///
    /// Returns the first write error seen during the scan, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TraceSink for WriterTrace<W> {
    fn block(&mut self, index: usize, offset: usize, bytes: &[u8]) {
        let text = format!(
            "Block Index: {index}\nLength: {len} ({len:x})\n\n{dump}\n",
            len = bytes.len(),
            dump = hexdump(bytes, offset, HEXDUMP_COLUMNS)
        );
        self.emit(&text);
    }

    fn table_name(&mut self, offset: usize, name: &str, table: Option<TableKind>) {
        let status = if table.is_some() { "" } else { " (skipped)" };
        self.emit(&format!("TABLE NAME at {offset}: {name}{status}\n\n"));
    }

    fn column_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.emit(&format!("\n{}\n", hexdump(bytes, offset, HEXDUMP_COLUMNS)));
    }

    fn column_decoded(&mut self, table: TableKind, column: &Column) {
        self.emit(&format!("TABLE: {table}\n{}\n", describe_column(column)));
    }

    fn column_overrun(&mut self, table: TableKind, column: &Column) {
        self.emit(&format!(
            "TABLE: {table}\nCOLUMN OVERRUN: {:?} at {} ran {} bytes past its block\n",
            column.kind, column.offset, column.overrun
        ));
    }

    fn column_dropped(&mut self, offset: usize, kind: DecoderKind, error: &Error) {
        self.emit(&format!(
            "ABORTED COLUMN - unexpected structure: {kind:?} at {offset}: {error}\n"
        ));
    }

    fn column_discarded(&mut self, table: TableKind, column: &Column, reason: DiscardReason) {
        let reason = match reason {
            DiscardReason::UnknownField => "unknown field type",
            DiscardReason::Duplicate => "duplicate field type",
        };
        self.emit(&format!(
            "TABLE: {table}\nDISCARDED COLUMN ({reason}):\n{}\n",
            describe_column(column)
        ));
    }
}

fn describe_column(column: &Column) -> String {
    let mut text = format!(
        "[{:?}] name={} type={} field={} offset={} length={}\n",
        column.kind,
        column.name(),
        column.type_code().map_or_else(|| "-".to_owned(), |code| code.to_string()),
        column.field.map_or_else(|| "-".to_owned(), |field| field.to_string()),
        column.offset,
        column.length,
    );
    if !column.options.is_empty() {
        let _ = writeln!(text, "options: {:?}", column.options);
    }
    if let Some(code) = column.unit_code {
        let _ = writeln!(text, "unit code: {code}");
    }
    for (index, value) in column.values.iter().enumerate() {
        let _ = writeln!(text, "  {index}: {value}");
    }
    if !column.trailer.is_empty() {
        let _ = writeln!(text, "trailer: {} bytes", column.trailer.len());
    }
    if column.overrun > 0 {
        let _ = writeln!(text, "overrun: {} bytes", column.overrun);
    }
    text
}

/// Renders `bytes` as hex, `columns` bytes per line. Each line is prefixed
/// with the absolute offset of its first byte (starting at `offset`) and
/// followed by a printable-ASCII gutter.
#[must_use]
pub fn hexdump(bytes: &[u8], offset: usize, columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::with_capacity(bytes.len() * 4 + bytes.len() / columns * 12);
    for (line, chunk) in bytes.chunks(columns).enumerate() {
        let _ = write!(out, "{:06}:", offset + line * columns);
        for byte in chunk {
            let _ = write!(out, " {byte:02X}");
        }
        for _ in chunk.len()..columns {
            out.push_str("   ");
        }
        out.push_str("   ");
        out.extend(chunk.iter().map(|&byte| {
            if byte.is_ascii_graphic() || byte == b' ' {
                char::from(byte)
            } else {
                '.'
            }
        }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexdump_pads_short_lines() {
        let dump = hexdump(b"ABC\x00\x01", 32, 4);
        assert_eq!(
            dump,
            "000032: 41 42 43 00   ABC.\n000036: 01            .\n"
        );
    }

    #[test]
    fn hexdump_of_nothing_is_empty() {
        assert!(hexdump(&[], 0, HEXDUMP_COLUMNS).is_empty());
    }

    #[test]
    fn writer_trace_formats_blocks_and_drops() {
        let mut trace = WriterTrace::new(Vec::new());
        trace.block(3, 100, &[0xFB, 0x01]);
        trace.column_dropped(
            140,
            DecoderKind::String1,
            &Error::structural(150, "declared size 100001 outside 0..=100000"),
        );
        let text = String::from_utf8(trace.finish().unwrap()).unwrap();
        assert!(text.starts_with("Block Index: 3\nLength: 2 (2)\n\n000100: FB 01"));
        assert!(text.contains("ABORTED COLUMN - unexpected structure: String1 at 140"));
    }
}
