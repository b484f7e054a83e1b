use std::borrow::Cow;

use simdutf8::basic;

use super::byteorder::slice_at;
use crate::error::Result;
use crate::metadata::Charset;

/// Decodes `length` bytes at `offset` using the file's charset and strips
/// trailing control characters other than CR, LF and TAB.
///
/// # Errors
///
/// Returns a structural error when the range lies outside the buffer.
pub fn read_string(buffer: &[u8], offset: usize, length: usize, charset: Charset) -> Result<String> {
    let bytes = slice_at(buffer, offset, length)?;
    let decoded = decode_bytes(bytes, charset);
    Ok(trim_trailing_controls(&decoded).to_owned())
}

fn decode_bytes(bytes: &[u8], charset: Charset) -> Cow<'_, str> {
    if charset == Charset::Utf8
        && let Ok(text) = basic::from_utf8(bytes)
    {
        return Cow::Borrowed(text);
    }
    let (decoded, _) = charset.encoding().decode_without_bom_handling(bytes);
    decoded
}

pub fn trim_trailing_controls(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_control() && !matches!(c, '\r' | '\n' | '\t'))
}
