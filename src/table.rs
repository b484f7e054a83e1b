//! Row-aligned tables assembled from decoded columns.
//!
//! Rows carry no key on disk: value `i` of every column belongs to row `i`.

use std::collections::HashMap;

use serde::Serialize;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::metadata::{FieldType, FormatVersion, TableKind, TimeUnit};
use crate::parser::{Column, DecoderKind};
use crate::value::{Duration, Value};

/// Describes a column that contributed values to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub field: FieldType,
    pub kind: DecoderKind,
    pub offset: usize,
    pub values: usize,
}

/// One record of a table, keyed by semantic field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<FieldType, Value>,
}

impl Row {
    /// Raw value for `field`, if any column populated it for this row.
    #[must_use]
    pub fn get(&self, field: impl Into<FieldType>) -> Option<&Value> {
        self.values.get(&field.into())
    }

    #[must_use]
    pub fn contains(&self, field: impl Into<FieldType>) -> bool {
        self.values.contains_key(&field.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get_string(&self, field: impl Into<FieldType>) -> Option<&str> {
        match self.get(field)? {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer value; doubles are accepted when they hold an exact integer.
    #[must_use]
    pub fn get_int(&self, field: impl Into<FieldType>) -> Option<i64> {
        match self.get(field)? {
            Value::Integer(value) => Some(*value),
            Value::Float(value) => exact_integer(*value),
            _ => None,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get_double(&self, field: impl Into<FieldType>) -> Option<f64> {
        match self.get(field)? {
            Value::Float(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_bool(&self, field: impl Into<FieldType>) -> Option<bool> {
        match self.get(field)? {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_date(&self, field: impl Into<FieldType>) -> Option<Date> {
        match self.get(field)? {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_time(&self, field: impl Into<FieldType>) -> Option<Time> {
        match self.get(field)? {
            Value::Time(time) => Some(*time),
            _ => None,
        }
    }

    /// Combines a date field with a time-of-day field; a missing time means
    /// midnight.
    #[must_use]
    pub fn get_timestamp(
        &self,
        date: impl Into<FieldType>,
        time: impl Into<FieldType>,
    ) -> Option<PrimitiveDateTime> {
        let date = self.get_date(date)?;
        let time = self.get_time(time).unwrap_or(Time::MIDNIGHT);
        Some(PrimitiveDateTime::new(date, time))
    }

    #[must_use]
    pub fn get_duration(&self, field: impl Into<FieldType>, unit: TimeUnit) -> Option<Duration> {
        self.get_double(field).map(|value| Duration::new(value, unit))
    }

    /// Parses a GUID stored as text, with or without surrounding braces.
    #[must_use]
    pub fn get_uuid(&self, field: impl Into<FieldType>) -> Option<Uuid> {
        let text = self.get_string(field)?.trim();
        let text = text
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(text);
        Uuid::parse_str(text).ok()
    }

    /// Fields populated for this row, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldType, &Value)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    fn set(&mut self, field: FieldType, value: Value) {
        self.values.insert(field, value);
    }
}

/// Rows and column descriptions for one table kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    kind: TableKind,
    columns: Vec<ColumnSummary>,
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub const fn new(kind: TableKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// Columns in the order they were attached.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSummary] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Spreads the column's values over rows `0..n`, creating rows as needed.
    pub fn add_column(&mut self, field: FieldType, column: Column) {
        self.columns.push(ColumnSummary {
            name: column.name().to_owned(),
            field,
            kind: column.kind,
            offset: column.offset,
            values: column.values.len(),
        });
        for (index, value) in column.values.into_iter().enumerate() {
            if index == self.rows.len() {
                self.rows.push(Row::default());
            }
            self.rows[index].set(field, value);
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Everything recovered from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSet {
    version_code: i32,
    version: Option<FormatVersion>,
    actbars: Table,
    activities: Table,
    resources: Table,
    pub(crate) duration_unit: Option<TimeUnit>,
    pub(crate) work_unit: Option<TimeUnit>,
}

impl TableSet {
    #[must_use]
    pub const fn new(version: FormatVersion) -> Self {
        Self::with_version(version.code, Some(version))
    }

    /// Empty result for a version code the reader cannot handle.
    #[must_use]
    pub const fn unsupported(code: i32) -> Self {
        Self::with_version(code, None)
    }

    const fn with_version(version_code: i32, version: Option<FormatVersion>) -> Self {
        Self {
            version_code,
            version,
            actbars: Table::new(TableKind::ActBars),
            activities: Table::new(TableKind::Activities),
            resources: Table::new(TableKind::Resources),
            duration_unit: None,
            work_unit: None,
        }
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.version.is_some()
    }

    #[must_use]
    pub const fn version_code(&self) -> i32 {
        self.version_code
    }

    #[must_use]
    pub const fn version(&self) -> Option<FormatVersion> {
        self.version
    }

    #[must_use]
    pub const fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::ActBars => &self.actbars,
            TableKind::Activities => &self.activities,
            TableKind::Resources => &self.resources,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        TableKind::ALL.into_iter().map(|kind| self.table(kind))
    }

    /// Unit inferred from the first duration column naming one.
    #[must_use]
    pub const fn inferred_duration_unit(&self) -> Option<TimeUnit> {
        self.duration_unit
    }

    #[must_use]
    pub const fn inferred_work_unit(&self) -> Option<TimeUnit> {
        self.work_unit
    }

    /// Unit for duration values, falling back to days.
    #[must_use]
    pub fn duration_unit(&self) -> TimeUnit {
        self.duration_unit.unwrap_or(TimeUnit::DEFAULT_DURATION)
    }

    /// Unit for work values, falling back to hours.
    #[must_use]
    pub fn work_unit(&self) -> TimeUnit {
        self.work_unit.unwrap_or(TimeUnit::DEFAULT_WORK)
    }

    pub(crate) fn table_mut(&mut self, kind: TableKind) -> &mut Table {
        match kind {
            TableKind::ActBars => &mut self.actbars,
            TableKind::Activities => &mut self.activities,
            TableKind::Resources => &mut self.resources,
        }
    }

    /// A repeated table name starts the table over.
    pub(crate) fn reset(&mut self, kind: TableKind) {
        *self.table_mut(kind) = Table::new(kind);
    }
}

/// Returns `value` as an integer when it has no fractional part and fits.
#[allow(clippy::cast_possible_truncation)]
fn exact_integer(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value.fract().abs() > 0.0 || !(-LIMIT..LIMIT).contains(&value) {
        return None;
    }
    Some(value as i64)
}
