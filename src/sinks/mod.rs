mod csv;

use crate::error::Result;
use crate::metadata::TableKind;
use crate::table::{ColumnSummary, Row, Table};

pub use csv::CsvSink;

/// Describes the table being written to a sink.
pub struct SinkContext<'a> {
    pub table: TableKind,
    pub columns: &'a [ColumnSummary],
}

impl<'a> SinkContext<'a> {
    #[must_use]
    pub fn new(table: &'a Table) -> Self {
        Self {
            table: table.kind(),
            columns: table.columns(),
        }
    }
}

/// Trait implemented by sinks that consume table rows.
pub trait RowSink {
    /// Called before any rows are written to allow the sink to initialise internal state.
    fn begin(&mut self, context: SinkContext<'_>) -> Result<()>;

    /// Invoked for every row of the table, in row order.
    fn write_row(&mut self, row: &Row) -> Result<()>;

    /// Called once all rows have been forwarded to the sink.
    fn finish(&mut self) -> Result<()>;
}

/// Streams every row of `table` through `sink`.
///
/// # Errors
///
/// Propagates the first error reported by the sink.
pub fn write_table<S: RowSink + ?Sized>(sink: &mut S, table: &Table) -> Result<()> {
    sink.begin(SinkContext::new(table))?;
    for row in table {
        sink.write_row(row)?;
    }
    sink.finish()
}
