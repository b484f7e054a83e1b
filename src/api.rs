use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::diagnostics::WriterTrace;
use crate::error::{Error, Result};
use crate::logger::{log_warn, set_log_prefix};
use crate::metadata::{FormatVersion, TableKind, TimeUnit};
use crate::parser::{scan, scan_with_trace};
use crate::table::{Table, TableSet};

/// Controls how a FastTrack file is read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    trace_file: Option<PathBuf>,
    strict_version: bool,
}

impl ReadOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trace_file: None,
            strict_version: false,
        }
    }

    /// Writes a block-by-block dump of the scan to `path`.
    #[must_use]
    pub fn with_trace_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_file = Some(path.into());
        self
    }

    /// Treat an unknown version code as an error instead of returning empty
    /// tables.
    #[must_use]
    pub const fn with_strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }

    fn trace_file(&self) -> Option<&Path> {
        self.trace_file.as_deref()
    }
}

/// Tables read from one FastTrack schedule.
#[derive(Debug, Clone)]
pub struct FtsFile {
    path: Option<PathBuf>,
    tables: TableSet,
}

impl FtsFile {
    /// Reads and scans the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its framing is broken.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &ReadOptions::new())
    }

    /// # Errors
    ///
    /// See [`FtsFile::open`]. With strict versions enabled, an unknown version
    /// code is reported as [`Error::Unsupported`].
    pub fn open_with_options(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let _prefix = set_log_prefix(path.display().to_string());
        let buffer = fs::read(path)?;
        let mut file = Self::from_bytes_with_options(&buffer, options)?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Scans an in-memory copy of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file header or a table-name block is malformed.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(buffer, &ReadOptions::new())
    }

    /// # Errors
    ///
    /// See [`FtsFile::from_bytes`] and [`FtsFile::open_with_options`].
    pub fn from_bytes_with_options(buffer: &[u8], options: &ReadOptions) -> Result<Self> {
        let tables = match options.trace_file() {
            Some(path) => {
                let mut trace = WriterTrace::new(BufWriter::new(File::create(path)?));
                let tables = scan_with_trace(buffer, &mut trace)?;
                trace.finish()?;
                tables
            }
            None => scan(buffer)?,
        };

        if !tables.is_supported() {
            let code = tables.version_code();
            if options.strict_version {
                return Err(Error::Unsupported {
                    feature: format!("file version code {code}").into(),
                });
            }
            log_warn(&format!("unsupported file version code {code}; no tables read"));
        }

        Ok(Self { path: None, tables })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn version(&self) -> Option<FormatVersion> {
        self.tables.version()
    }

    #[must_use]
    pub const fn table(&self, kind: TableKind) -> &Table {
        self.tables.table(kind)
    }

    #[must_use]
    pub fn duration_unit(&self) -> TimeUnit {
        self.tables.duration_unit()
    }

    #[must_use]
    pub fn work_unit(&self) -> TimeUnit {
        self.tables.work_unit()
    }

    #[must_use]
    pub const fn tables(&self) -> &TableSet {
        &self.tables
    }

    #[must_use]
    pub fn into_tables(self) -> TableSet {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_only(code: i32) -> Vec<u8> {
        let mut buffer = vec![0u8; 96];
        buffer[4..8].copy_from_slice(&code.to_le_bytes());
        buffer
    }

    #[test]
    fn unsupported_version_is_empty_by_default() {
        let file = FtsFile::from_bytes(&header_only(999)).unwrap();
        assert_eq!(file.version(), None);
        assert!(file.table(TableKind::Activities).is_empty());
    }

    #[test]
    fn strict_version_rejects_unknown_codes() {
        let options = ReadOptions::new().with_strict_version(true);
        let err = FtsFile::from_bytes_with_options(&header_only(999), &options).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
        assert!(FtsFile::from_bytes_with_options(&header_only(146), &options).is_ok());
    }
}
