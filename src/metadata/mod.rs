mod fields;

use std::fmt;

use encoding_rs::{Encoding, UTF_8, UTF_16LE};
use serde::Serialize;

pub use fields::{ActBarField, ActivityField, FieldType, ResourceField};

/// Character set used for every string stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Charset {
    Utf8,
    Utf16Le,
}

impl Charset {
    #[must_use]
    pub fn encoding(self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::Utf16Le => UTF_16LE,
        }
    }
}

/// On-disk layout generation of the column encodings.
///
/// Several column kinds changed their byte layout between major releases
/// while keeping the same decoded shape; the generation picks which family
/// of decoders handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnLayout {
    First,
    Second,
}

/// Version information derived from the 4-byte code in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatVersion {
    pub code: i32,
    pub charset: Charset,
    pub layout: ColumnLayout,
}

/// Tables recovered from the file. Any other table is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TableKind {
    ActBars,
    Activities,
    Resources,
}

impl TableKind {
    pub const ALL: [Self; 3] = [Self::ActBars, Self::Activities, Self::Resources];

    /// Matches an upper-cased table name against the tables we decode.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ACTBARS" => Some(Self::ActBars),
            "ACTIVITIES" => Some(Self::Activities),
            "RESOURCES" => Some(Self::Resources),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ActBars => "ACTBARS",
            Self::Activities => "ACTIVITIES",
            Self::Resources => "RESOURCES",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Units attached to duration and work values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeUnit {
    /// Code 1, which appears to mean "use the document format".
    ElapsedDays,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub const DEFAULT_DURATION: Self = Self::Days;
    pub const DEFAULT_WORK: Self = Self::Hours;

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::ElapsedDays),
            2 => Some(Self::Hours),
            4 => Some(Self::Days),
            6 => Some(Self::Weeks),
            8 | 10 => Some(Self::Months),
            12 => Some(Self::Years),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_matched_exactly() {
        assert_eq!(TableKind::from_name("ACTIVITIES"), Some(TableKind::Activities));
        assert_eq!(TableKind::from_name("ACTBARS"), Some(TableKind::ActBars));
        assert_eq!(TableKind::from_name("RESOURCES"), Some(TableKind::Resources));
        assert_eq!(TableKind::from_name("Activities"), None);
        assert_eq!(TableKind::from_name("CALENDARS"), None);
    }

    #[test]
    fn time_unit_codes() {
        assert_eq!(TimeUnit::from_code(4), Some(TimeUnit::Days));
        assert_eq!(TimeUnit::from_code(10), Some(TimeUnit::Months));
        assert_eq!(TimeUnit::from_code(3), None);
    }
}
