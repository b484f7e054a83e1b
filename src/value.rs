use std::fmt;

use time::{Date, Time};

use crate::metadata::TimeUnit;

/// Represents a single cell value decoded from a FastTrack column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, already converted from the file charset.
    Text(String),
    /// Short, identifier, integer and calendar columns.
    Integer(i64),
    /// Number, percent, double and duration columns.
    Float(f64),
    Boolean(bool),
    /// Calendar date, validated to fall within 1980..=2099.
    Date(Date),
    /// Time of day.
    Time(Time),
    /// Null sentinel, tri-state null, out-of-range date or enum index.
    Missing,
}

impl Value {
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub(crate) fn from_double(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Float)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Date(date) => write!(f, "{date}"),
            Self::Time(time) => write!(f, "{time}"),
            Self::Missing => f.write_str("<null>"),
        }
    }
}

/// A duration or work amount together with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Duration {
    pub value: f64,
    pub unit: TimeUnit,
}

impl Duration {
    #[must_use]
    pub const fn new(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.value, self.unit)
    }
}
