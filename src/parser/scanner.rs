//! Signature-driven block discovery and table assembly.
//!
//! The file carries no directory. Parent blocks are found by scanning for a
//! fixed signature; short blocks name the table that the following column
//! blocks belong to, long blocks hold one child block per column. Column
//! failures are recovered locally, framing failures abort the scan.

use std::collections::HashSet;
use std::iter;

use smallvec::SmallVec;

use super::byteorder::{read_i32, read_size};
use super::decoders::{Column, decode_column};
use super::encoding::read_string;
use super::signature::{
    CHILD_BLOCK_BACKOFF, CHILD_BLOCK_SIGNATURES, PARENT_BLOCK_SIGNATURES, PARENT_SCAN_START,
    SCAN_TAIL, TABLE_NAME_BLOCK_LIMIT, TABLE_NAME_SIGNATURES, matches_any,
};
use super::version::{DispatchTable, decoder_for, dispatch_table, read_version_code, resolve_version};
use crate::diagnostics::{DiscardReason, NoTrace, TraceSink};
use crate::error::{Result, Section};
use crate::metadata::{FieldType, FormatVersion, TableKind, TimeUnit};
use crate::table::TableSet;

/// Exclusive upper bound on the name length that follows a child signature.
const CHILD_NAME_LIMIT: i32 = 100;
const TABLE_NAME_SIGNATURE_LEN: usize = 7;

/// Scans `buffer` and returns the decoded tables.
///
/// An unsupported version code yields an empty [`TableSet`] rather than an
/// error.
///
/// # Errors
///
/// Returns a structural error when the file header or a table-name block is
/// malformed.
pub fn scan(buffer: &[u8]) -> Result<TableSet> {
    scan_with_trace(buffer, &mut NoTrace)
}

/// Like [`scan`], reporting every block and column to `trace`.
///
/// # Errors
///
/// See [`scan`].
pub fn scan_with_trace(buffer: &[u8], trace: &mut dyn TraceSink) -> Result<TableSet> {
    let code = read_version_code(buffer)?;
    let Some(version) = resolve_version(code) else {
        return Ok(TableSet::unsupported(code));
    };
    let mut scanner = Scanner::new(buffer, version, trace);
    scanner.run()?;
    Ok(scanner.finish())
}

/// Returns the offsets of every parent block signature past the file header.
#[must_use]
pub fn parent_block_offsets(buffer: &[u8]) -> Vec<usize> {
    (PARENT_SCAN_START..buffer.len().saturating_sub(SCAN_TAIL))
        .filter(|&offset| matches_any(buffer, offset, &PARENT_BLOCK_SIGNATURES))
        .collect()
}

struct Scanner<'a, 't> {
    buffer: &'a [u8],
    version: FormatVersion,
    dispatch: &'static DispatchTable,
    trace: &'t mut dyn TraceSink,
    tables: TableSet,
    current: Option<TableKind>,
    seen: HashSet<FieldType>,
}

impl<'a, 't> Scanner<'a, 't> {
    fn new(buffer: &'a [u8], version: FormatVersion, trace: &'t mut dyn TraceSink) -> Self {
        Self {
            buffer,
            version,
            dispatch: dispatch_table(version.layout),
            trace,
            tables: TableSet::new(version),
            current: None,
            seen: HashSet::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let ends = parent_block_offsets(self.buffer);
        let mut start = 0;
        for (index, end) in ends.into_iter().chain(iter::once(self.buffer.len())).enumerate() {
            self.read_block(index, start, end)?;
            start = end;
        }
        Ok(())
    }

    fn read_block(&mut self, index: usize, start: usize, end: usize) -> Result<()> {
        let length = end - start;
        self.trace.block(index, start, &self.buffer[start..end]);
        if length < TABLE_NAME_BLOCK_LIMIT {
            self.read_table_name(start, end)
                .map_err(|err| err.in_section(Section::TableName { offset: start }))
        } else {
            self.read_column_block(start, end);
            Ok(())
        }
    }

    fn read_table_name(&mut self, start: usize, end: usize) -> Result<()> {
        let Some(signature) = (start..end.saturating_sub(SCAN_TAIL))
            .find(|&offset| matches_any(self.buffer, offset, &TABLE_NAME_SIGNATURES))
        else {
            return Ok(());
        };

        let length_offset = signature + TABLE_NAME_SIGNATURE_LEN;
        let length = read_size(self.buffer, length_offset)?;
        let name = read_string(self.buffer, length_offset + 4, length, self.version.charset)?
            .to_uppercase();

        self.current = TableKind::from_name(&name);
        if let Some(kind) = self.current {
            self.tables.reset(kind);
        }
        self.seen.clear();
        self.trace.table_name(signature, &name, self.current);
        Ok(())
    }

    fn read_column_block(&mut self, start: usize, end: usize) {
        let mut bounds: SmallVec<[usize; 64]> = (start..end.saturating_sub(SCAN_TAIL))
            .filter(|&offset| self.is_child_signature(offset))
            .filter_map(|offset| offset.checked_sub(CHILD_BLOCK_BACKOFF))
            .collect();
        bounds.push(end);

        for pair in bounds.windows(2) {
            self.read_column(pair[0], pair[1]);
        }
    }

    /// Child signatures are common byte patterns, so a match only counts when
    /// a plausible name length follows it.
    fn is_child_signature(&self, offset: usize) -> bool {
        matches_any(self.buffer, offset, &CHILD_BLOCK_SIGNATURES)
            && read_i32(self.buffer, offset + CHILD_BLOCK_SIGNATURES[0].len())
                .is_ok_and(|length| length > 0 && length < CHILD_NAME_LIMIT)
    }

    fn read_column(&mut self, start: usize, end: usize) {
        let Some(table) = self.current else {
            return;
        };
        let bytes = &self.buffer[start..end];
        self.trace.column_bytes(start, bytes);

        let kind = decoder_for(self.dispatch, bytes[0]);
        match decode_column(kind, table, self.buffer, start, end - start, self.version.charset) {
            Ok(column) => {
                if column.overrun > 0 {
                    self.trace.column_overrun(table, &column);
                }
                self.attach(table, column);
            }
            Err(err) => self.trace.column_dropped(start, kind, &err),
        }
    }

    fn attach(&mut self, table: TableKind, column: Column) {
        let Some(field) = column.field else {
            self.trace.column_discarded(table, &column, DiscardReason::UnknownField);
            return;
        };
        if !self.seen.insert(field) {
            self.trace.column_discarded(table, &column, DiscardReason::Duplicate);
            return;
        }

        self.infer_units(&column);
        self.trace.column_decoded(table, &column);
        self.tables.table_mut(table).add_column(field, column);
    }

    /// The first duration column naming a unit other than the document
    /// default fixes the unit for every duration or work value. A name
    /// mentioning both sets both.
    fn infer_units(&mut self, column: &Column) {
        if !column.kind.is_duration() {
            return;
        }
        let Some(unit) = column
            .unit_code
            .filter(|&code| code != 1)
            .and_then(TimeUnit::from_code)
        else {
            return;
        };

        let name = column.name();
        if name.contains("Duration") && self.tables.duration_unit.is_none() {
            self.tables.duration_unit = Some(unit);
        }
        if name.contains("Work") && self.tables.work_unit.is_none() {
            self.tables.work_unit = Some(unit);
        }
    }

    fn finish(self) -> TableSet {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_offsets_ignore_file_header() {
        let mut buffer = vec![0u8; 200];
        buffer[10..21].copy_from_slice(&PARENT_BLOCK_SIGNATURES[0]);
        buffer[80..91].copy_from_slice(&PARENT_BLOCK_SIGNATURES[2]);
        buffer[150..161].copy_from_slice(&PARENT_BLOCK_SIGNATURES[1]);
        assert_eq!(parent_block_offsets(&buffer), vec![80, 150]);
    }

    #[test]
    fn signature_in_scan_tail_is_ignored() {
        let mut buffer = vec![0xEEu8; 100];
        buffer[89..100].copy_from_slice(&PARENT_BLOCK_SIGNATURES[0]);
        assert!(parent_block_offsets(&buffer).is_empty());
    }

    #[test]
    fn unsupported_version_returns_empty_tables() {
        let mut buffer = vec![0u8; 256];
        buffer[4..8].copy_from_slice(&999i32.to_le_bytes());
        let tables = scan(&buffer).unwrap();
        assert!(!tables.is_supported());
        assert_eq!(tables.version_code(), 999);
        for kind in TableKind::ALL {
            assert!(tables.table(kind).is_empty());
        }
    }

    #[test]
    fn child_signature_requires_plausible_name_length() {
        let mut buffer = vec![0u8; 64];
        buffer[10..16].copy_from_slice(&CHILD_BLOCK_SIGNATURES[1]);
        buffer[16..20].copy_from_slice(&12i32.to_le_bytes());
        buffer[30..36].copy_from_slice(&CHILD_BLOCK_SIGNATURES[0]);
        buffer[36..40].copy_from_slice(&100i32.to_le_bytes());

        let mut trace = NoTrace;
        let scanner = Scanner::new(&buffer, resolve_version(144).unwrap(), &mut trace);
        assert!(scanner.is_child_signature(10));
        assert!(!scanner.is_child_signature(30));
        assert!(!scanner.is_child_signature(11));
    }
}
