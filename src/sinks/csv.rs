use std::borrow::Cow;
use std::io::Write;

use csv::{ByteRecord, Writer, WriterBuilder};
use itoa::Buffer as ItoaBuffer;
use ryu::Buffer as RyuBuffer;
use time::{Date, Time};

use crate::error::{Error, Result};
use crate::metadata::FieldType;
use crate::sinks::{RowSink, SinkContext};
use crate::table::Row;
use crate::value::Value;

/// Writes table rows as delimited text (CSV/TSV).
pub struct CsvSink<W: Write> {
    output: Option<W>,
    writer: Option<Writer<W>>,
    delimiter: u8,
    write_headers: bool,
    fields: Vec<FieldType>,
    record: ByteRecord,
    scratch: Vec<Vec<u8>>,
}

impl<W: Write> CsvSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            output: Some(writer),
            writer: None,
            delimiter: b',',
            write_headers: true,
            fields: Vec::new(),
            record: ByteRecord::new(),
            scratch: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_headers(mut self, headers: bool) -> Self {
        self.write_headers = headers;
        self
    }

    /// Returns the underlying writer once [`RowSink::finish`] has run.
    pub fn into_inner(self) -> Option<W> {
        self.output
    }

    fn build_writer(&mut self) -> Result<()> {
        let output = self.output.take().ok_or_else(|| Error::Export {
            details: Cow::from("CSV sink output already taken"),
        })?;
        let writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(output);
        self.writer = Some(writer);
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut Writer<W>> {
        self.writer.as_mut().ok_or_else(|| Error::Export {
            details: Cow::from("CSV sink used before begin"),
        })
    }

    fn write_headers(&mut self, context: &SinkContext<'_>) -> Result<()> {
        if !self.write_headers {
            return Ok(());
        }
        let mut header = ByteRecord::new();
        for column in context.columns {
            header.push_field(column.name.as_bytes());
        }
        self.writer()?
            .write_byte_record(&header)
            .map_err(|e| Error::Export {
                details: Cow::Owned(format!("csv header write failed: {e}")),
            })
    }

    fn encode_value(value: &Value, out: &mut Vec<u8>, ryu: &mut RyuBuffer, itoa: &mut ItoaBuffer) {
        out.clear();
        match value {
            Value::Missing => {}
            Value::Float(v) => out.extend_from_slice(ryu.format(*v).as_bytes()),
            Value::Integer(v) => out.extend_from_slice(itoa.format(*v).as_bytes()),
            Value::Text(text) => out.extend_from_slice(text.as_bytes()),
            Value::Boolean(v) => out.extend_from_slice(if *v { b"true" } else { b"false" }),
            Value::Date(date) => write_date(*date, out),
            Value::Time(time) => write_time(*time, out),
        }
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn begin(&mut self, context: SinkContext<'_>) -> Result<()> {
        if self.writer.is_some() {
            return Err(Error::Unsupported {
                feature: Cow::from("CSV sink cannot be reused without finishing"),
            });
        }
        self.build_writer()?;
        self.fields = context.columns.iter().map(|column| column.field).collect();
        self.record = ByteRecord::with_capacity(self.fields.len(), 0);
        self.scratch = (0..self.fields.len()).map(|_| Vec::with_capacity(64)).collect();
        self.write_headers(&context)
    }

    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.record.clear();
        let mut ryu = RyuBuffer::new();
        let mut itoa = ItoaBuffer::new();

        for (field, buf) in self.fields.iter().zip(self.scratch.iter_mut()) {
            match row.get(*field) {
                Some(value) => Self::encode_value(value, buf, &mut ryu, &mut itoa),
                None => buf.clear(),
            }
            self.record.push_field(buf);
        }
        let record = std::mem::take(&mut self.record);
        let written = self.writer()?.write_byte_record(&record);
        self.record = record;
        written.map_err(|e| Error::Export {
            details: Cow::Owned(format!("csv write failed: {e}")),
        })
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            let out = writer.into_inner().map_err(|e| Error::Export {
                details: Cow::Owned(format!("csv into_inner failed: {e}")),
            })?;
            self.output = Some(out);
        }
        self.fields.clear();
        self.scratch.clear();
        self.record.clear();
        Ok(())
    }
}

fn write_date(date: Date, out: &mut Vec<u8>) {
    out.extend_from_slice(date.to_string().as_bytes());
}

/// Renders `HH:MM:SS`; stored times have whole-second precision.
fn write_time(time: Time, out: &mut Vec<u8>) {
    write_two(time.hour(), out);
    out.push(b':');
    write_two(time.minute(), out);
    out.push(b':');
    write_two(time.second(), out);
}

#[inline]
fn write_two(v: u8, out: &mut Vec<u8>) {
    out.push(b'0' + (v / 10));
    out.push(b'0' + (v % 10));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ActivityField, TableKind};
    use crate::parser::{Column, ColumnHeader, DecoderKind};
    use crate::sinks::write_table;
    use crate::table::Table;

    fn column(name: &str, kind: DecoderKind, values: Vec<Value>) -> Column {
        Column {
            kind,
            offset: 0,
            length: 0,
            header: Some(ColumnHeader {
                tag: [0; 8],
                name: name.to_owned(),
                type_code: 0,
                flags: 0,
            }),
            field: None,
            options: Vec::new(),
            values,
            unit_code: None,
            trailer: 0..0,
            overrun: 0,
        }
    }

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let mut table = Table::new(TableKind::Activities);
        table.add_column(
            ActivityField::ActivityName.into(),
            column(
                "Activity Name",
                DecoderKind::String1,
                vec![Value::Text("Task, A".into()), Value::Text("Task B".into())],
            ),
        );
        table.add_column(
            ActivityField::Number1.into(),
            column("Number 1", DecoderKind::Number1, vec![Value::Float(1.5)]),
        );
        table.add_column(
            ActivityField::Flag1.into(),
            column(
                "Flag 1",
                DecoderKind::Boolean,
                vec![Value::Missing, Value::Boolean(true)],
            ),
        );

        let mut sink = CsvSink::new(Vec::new());
        write_table(&mut sink, &table).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Activity Name,Number 1,Flag 1\n\"Task, A\",1.5,\nTask B,,true\n"
        );
    }

    #[test]
    fn tab_delimiter_without_headers() {
        let mut table = Table::new(TableKind::Activities);
        table.add_column(
            ActivityField::ActivityRowId.into(),
            column("ID", DecoderKind::Identifier1, vec![Value::Integer(7)]),
        );
        table.add_column(
            ActivityField::Text1.into(),
            column(
                "Start",
                DecoderKind::Time,
                vec![Value::Time(Time::from_hms(7, 5, 0).unwrap())],
            ),
        );
        let mut sink = CsvSink::new(Vec::new())
            .with_delimiter(b'\t')
            .with_headers(false);
        write_table(&mut sink, &table).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(text, "7\t07:05:00\n");
    }
}
