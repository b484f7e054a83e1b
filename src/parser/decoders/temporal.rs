//! Date, time-of-day and duration columns.

use byteorder::{ByteOrder, LittleEndian};
use time::{Date, Month, Time};

use super::Payload;
use super::numeric::doubles;
use crate::error::Result;
use crate::metadata::Charset;
use crate::parser::blocks::FixedSizeItems;
use crate::parser::byteorder::{read_u8, skip_to_next_matching_short};
use crate::value::Value;

/// Fixed bytes between the end of a date header and the marker search.
const DATE_PREAMBLE: usize = 10;
/// Short that opens the binary item block of date and time columns.
const DATE_ITEMS_MARKER: u16 = 0x000A;
/// Unit code whose values are stored in thirds.
const THIRDS_UNIT_CODE: u8 = 10;

const FIRST_VALID_YEAR: i32 = 1980;
const LAST_VALID_YEAR: i32 = 2099;
const SECONDS_PER_DAY: i32 = 86_400;

/// Some writers store a stringified copy of the dates before the binary
/// block; searching for the marker steps over it. The marker doubles as the
/// reserved prefix of the fixed-size items, hence the back-off.
fn locate_items(buffer: &[u8], offset: usize) -> Result<FixedSizeItems<'_>> {
    let after_marker =
        skip_to_next_matching_short(buffer, offset + DATE_PREAMBLE, DATE_ITEMS_MARKER)?;
    FixedSizeItems::read(buffer, after_marker - 2)?.require_width(4)
}

pub(super) fn read_date(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = locate_items(buffer, offset)?;
    let values = items
        .items()
        .map(|item| date_from_days(LittleEndian::read_i32(item)).map_or(Value::Missing, Value::Date))
        .collect();
    Ok(Payload::new(values, items.end))
}

pub(super) fn read_time(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = locate_items(buffer, offset)?;
    let values = items
        .items()
        .map(|item| time_from_seconds(LittleEndian::read_i32(item)).map_or(Value::Missing, Value::Time))
        .collect();
    Ok(Payload::new(values, items.end))
}

/// Doubles followed by a single column-wide unit code.
pub(super) fn read_duration(buffer: &[u8], offset: usize, _charset: Charset) -> Result<Payload> {
    let items = FixedSizeItems::read(buffer, offset)?.require_width(8)?;
    let unit_code = read_u8(buffer, items.end)?;
    let mut values = doubles(items)?;
    if unit_code == THIRDS_UNIT_CODE {
        for value in &mut values {
            if let Value::Float(amount) = value {
                *amount *= 3.0;
            }
        }
    }

    let mut payload = Payload::new(values, items.end + 1);
    payload.unit_code = Some(unit_code);
    Ok(payload)
}

/// Converts a day offset from 1979-12-31; years outside 1980..=2099 come from
/// misidentified blocks and are dropped.
pub(crate) fn date_from_days(days: i32) -> Option<Date> {
    let epoch = Date::from_calendar_date(1979, Month::December, 31).ok()?;
    let date = epoch.checked_add(time::Duration::days(i64::from(days)))?;
    (FIRST_VALID_YEAR..=LAST_VALID_YEAR)
        .contains(&date.year())
        .then_some(date)
}

pub(crate) fn time_from_seconds(seconds: i32) -> Option<Time> {
    if !(0..SECONDS_PER_DAY).contains(&seconds) {
        return None;
    }
    let hours = u8::try_from(seconds / 3600).ok()?;
    let minutes = u8::try_from(seconds % 3600 / 60).ok()?;
    let secs = u8::try_from(seconds % 60).ok()?;
    Time::from_hms(hours, minutes, secs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::tests::fixed_items;

    fn dated_block(stringified: &[u8], items: &[i32]) -> Vec<u8> {
        let mut bytes = vec![0x11; DATE_PREAMBLE];
        bytes.extend_from_slice(stringified);
        let encoded: Vec<[u8; 4]> = items.iter().map(|value| value.to_le_bytes()).collect();
        let slices: Vec<&[u8]> = encoded.iter().map(<[u8; 4]>::as_slice).collect();
        let mut block = fixed_items(4, &slices);
        block[..2].copy_from_slice(&DATE_ITEMS_MARKER.to_le_bytes());
        bytes.extend_from_slice(&block);
        bytes
    }

    #[test]
    fn date_epoch_and_bounds() {
        assert_eq!(
            date_from_days(1),
            Some(Date::from_calendar_date(1980, Month::January, 1).unwrap())
        );
        assert_eq!(date_from_days(0), None);
        assert_eq!(
            date_from_days(43_829),
            Some(Date::from_calendar_date(2099, Month::December, 30).unwrap())
        );
        assert_eq!(
            date_from_days(43_830),
            Some(Date::from_calendar_date(2099, Month::December, 31).unwrap())
        );
        assert_eq!(date_from_days(43_831), None);
        assert_eq!(date_from_days(-500), None);
        assert_eq!(date_from_days(60_000), None);
    }

    #[test]
    fn dates_skip_stringified_copy() {
        let bytes = dated_block(b"2001-02-03 junk", &[7_705, 0]);
        let payload = read_date(&bytes, 0, Charset::Utf8).unwrap();
        assert_eq!(
            payload.values,
            vec![
                Value::Date(Date::from_calendar_date(2001, Month::February, 3).unwrap()),
                Value::Missing,
            ]
        );
        assert_eq!(payload.end, bytes.len());
    }

    #[test]
    fn missing_date_marker_is_structural() {
        let bytes = vec![0x11; 40];
        assert!(read_date(&bytes, 0, Charset::Utf8).unwrap_err().is_structural());
    }

    #[test]
    fn times_of_day() {
        let bytes = dated_block(b"", &[9 * 3600 + 30 * 60, 86_400, -1]);
        let payload = read_time(&bytes, 0, Charset::Utf8).unwrap();
        assert_eq!(
            payload.values,
            vec![
                Value::Time(Time::from_hms(9, 30, 0).unwrap()),
                Value::Missing,
                Value::Missing,
            ]
        );
    }

    #[test]
    fn duration_in_thirds_is_scaled() {
        let mut bytes = fixed_items(8, &[&2.0f64.to_le_bytes(), &0.5f64.to_le_bytes()]);
        bytes.push(THIRDS_UNIT_CODE);
        let payload = read_duration(&bytes, 0, Charset::Utf8).unwrap();
        assert_eq!(payload.values, vec![Value::Float(6.0), Value::Float(1.5)]);
        assert_eq!(payload.unit_code, Some(THIRDS_UNIT_CODE));
        assert_eq!(payload.end, bytes.len());
    }

    #[test]
    fn duration_without_unit_byte_is_structural() {
        let bytes = fixed_items(8, &[&2.0f64.to_le_bytes()]);
        assert!(read_duration(&bytes, 0, Charset::Utf8).is_err());
    }
}
