use std::borrow::Cow;
use std::fmt;
use std::io;

use crate::parser::DecoderKind;

/// Result type used across the FastTrack reader.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type surfaced by the FastTrack reader.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure while reading the source file.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The bytes do not have the layout expected at this point of the file.
    #[error("unexpected structure while processing {section}: {details}")]
    Structural {
        section: Section,
        details: Cow<'static, str>,
    },

    /// File version or feature that the reader does not handle.
    #[error("unsupported FastTrack feature: {feature}")]
    Unsupported { feature: Cow<'static, str> },

    /// Failure while writing decoded tables to an external format.
    #[error("export failed: {details}")]
    Export { details: Cow<'static, str> },
}

impl Error {
    /// Helper constructor for structural failures at a raw buffer offset.
    #[must_use]
    pub fn structural(offset: usize, details: impl Into<Cow<'static, str>>) -> Self {
        Self::Structural {
            section: Section::Offset { offset },
            details: details.into(),
        }
    }

    /// Returns true when the error describes a layout mismatch rather than an
    /// I/O or configuration problem.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }

    /// Re-labels a structural error with the section being processed. A raw
    /// byte offset carried by the error moves into its details.
    #[must_use]
    pub fn in_section(self, section: Section) -> Self {
        match self {
            Self::Structural {
                section: Section::Offset { offset },
                details,
            } => Self::Structural {
                section,
                details: Cow::Owned(format!("{details} (byte {offset})")),
            },
            Self::Structural { details, .. } => Self::Structural { section, details },
            other => other,
        }
    }
}

/// Logical region of the file used for diagnostic reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    FileHeader,
    Offset { offset: usize },
    TableName { offset: usize },
    Column { offset: usize, kind: DecoderKind },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileHeader => write!(f, "file header"),
            Self::Offset { offset } => write!(f, "offset {offset}"),
            Self::TableName { offset } => write!(f, "table name block at offset {offset}"),
            Self::Column { offset, kind } => {
                write!(f, "{kind:?} column at offset {offset}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_section_relabels_structural_errors_only() {
        let err = Error::structural(12, "short read").in_section(Section::TableName { offset: 4 });
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "unexpected structure while processing table name block at offset 4: short read (byte 12)"
        );

        let relabelled = err.in_section(Section::FileHeader);
        assert_eq!(
            relabelled.to_string(),
            "unexpected structure while processing file header: short read (byte 12)"
        );

        let io = Error::from(io::Error::other("boom")).in_section(Section::FileHeader);
        assert!(!io.is_structural());
    }
}
