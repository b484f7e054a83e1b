pub mod api;
pub mod diagnostics;
pub mod error;
pub mod logger;
pub mod metadata;
pub mod parser;
pub mod sinks;
pub mod table;
pub mod value;
pub use crate::error::{Error, Result};
pub use api::{FtsFile, ReadOptions};
pub use diagnostics::{NoTrace, TraceSink, WriterTrace};
pub use metadata::{FieldType, TableKind, TimeUnit};
pub use sinks::{CsvSink, RowSink, SinkContext, write_table};
pub use table::{Row, Table, TableSet};
pub use value::{Duration, Value};

/// Scans a FastTrack file held in memory and returns its tables.
///
/// # Errors
///
/// Returns an error if the file header or a table-name block is malformed.
pub fn read_tables(buffer: &[u8]) -> Result<TableSet> {
    parser::scan(buffer)
}
