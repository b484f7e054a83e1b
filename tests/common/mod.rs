#![allow(dead_code)]
//! Builds small synthetic FastTrack files for integration tests.

/// Parent block signature used in front of every generated block.
const PARENT_SIGNATURE: [u8; 11] = [
    0xFB, 0x01, 0x02, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00,
];
const TABLE_SIGNATURE: [u8; 7] = [0x00, 0x00, 0x00, 0x65, 0x00, 0x01, 0x00];
const CHILD_SIGNATURE: [u8; 6] = [0x05, 0x00, 0x00, 0x00, 0x01, 0x00];
const HEADER_SIZE: usize = 64;
/// Keeps column blocks above the table-name size threshold.
const COLUMN_BLOCK_PREAMBLE: usize = 128;

pub const NULL_DOUBLE: u64 = 0x3949_F623_D5A8_A733;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Utf8,
    Utf16,
}

impl Text {
    pub const fn for_version(code: i32) -> Self {
        if code == 139 { Self::Utf16 } else { Self::Utf8 }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16 => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

fn le_i32(value: usize) -> [u8; 4] {
    i32::try_from(value).unwrap().to_le_bytes()
}

/// Assembles parent blocks behind a 64-byte file header.
pub struct FtsBuilder {
    version: i32,
    text: Text,
    blocks: Vec<Vec<u8>>,
}

impl FtsBuilder {
    pub fn new(version: i32) -> Self {
        Self {
            version,
            text: Text::for_version(version),
            blocks: Vec::new(),
        }
    }

    pub const fn text(&self) -> Text {
        self.text
    }

    /// Adds a table-name block.
    pub fn table(mut self, name: &str) -> Self {
        let encoded = self.text.encode(name);
        let mut block = PARENT_SIGNATURE.to_vec();
        block.extend_from_slice(&[0x00; 4]);
        block.extend_from_slice(&TABLE_SIGNATURE);
        block.extend_from_slice(&le_i32(encoded.len()));
        block.extend_from_slice(&encoded);
        block.extend_from_slice(&[0x00; 16]);
        assert!(block.len() < 128, "table-name block too long");
        self.blocks.push(block);
        self
    }

    /// Adds a table-name block whose name length field holds `declared`.
    pub fn table_with_declared_length(mut self, declared: i32) -> Self {
        let mut block = PARENT_SIGNATURE.to_vec();
        block.extend_from_slice(&[0x00; 4]);
        block.extend_from_slice(&TABLE_SIGNATURE);
        block.extend_from_slice(&declared.to_le_bytes());
        block.extend_from_slice(&[0x41; 24]);
        self.blocks.push(block);
        self
    }

    /// Adds a column-data block holding the given child blocks in order.
    pub fn columns(mut self, children: &[Vec<u8>]) -> Self {
        let mut block = PARENT_SIGNATURE.to_vec();
        block.extend_from_slice(&[0x00; COLUMN_BLOCK_PREAMBLE]);
        for child in children {
            block.extend_from_slice(child);
        }
        block.extend_from_slice(&[0x00; 16]);
        self.blocks.push(block);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buffer = vec![0u8; HEADER_SIZE];
        buffer[4..8].copy_from_slice(&self.version.to_le_bytes());
        for block in self.blocks {
            buffer.extend_from_slice(&block);
        }
        buffer.extend_from_slice(&[0x00; 16]);
        buffer
    }
}

/// One column child block: header, decoder-specific skip, payload.
pub struct ColumnBuilder {
    code: u8,
    name: String,
    type_code: u16,
    skip: usize,
    payload: Vec<u8>,
}

impl ColumnBuilder {
    pub fn new(code: u8, name: &str, type_code: u16) -> Self {
        Self {
            code,
            name: name.to_owned(),
            type_code,
            skip: 0,
            payload: Vec::new(),
        }
    }

    pub const fn skip(mut self, bytes: usize) -> Self {
        self.skip = bytes;
        self
    }

    pub fn payload(mut self, bytes: &[u8]) -> Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn build(self, text: Text) -> Vec<u8> {
        let name = text.encode(&self.name);
        let mut out = vec![self.code, 0x00];
        out.extend_from_slice(&CHILD_SIGNATURE);
        out.extend_from_slice(&le_i32(name.len()));
        out.extend_from_slice(&name);
        out.extend_from_slice(&self.type_code.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&vec![0x00; self.skip]);
        out.extend_from_slice(&self.payload);
        // opaque trailer
        out.extend_from_slice(&[0x00; 4]);
        out
    }
}

pub fn strings_with_length(text: Text, items: &[&str], inclusive: bool) -> Vec<u8> {
    let declared = if inclusive { items.len() - 1 } else { items.len() };
    let mut out = le_i32(declared).to_vec();
    for item in items {
        let encoded = text.encode(item);
        out.extend_from_slice(&[0x00, 0x00]);
        out.extend_from_slice(&le_i32(encoded.len()));
        out.extend_from_slice(&encoded);
    }
    out
}

/// Same framing as [`strings_with_length`] with an arbitrary declared count.
pub fn strings_with_declared_count(count: i32) -> Vec<u8> {
    let mut out = count.to_le_bytes().to_vec();
    out.extend_from_slice(&[0x00; 8]);
    out
}

pub fn fixed_items(width: u16, items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x00, 0x00];
    out.extend_from_slice(&le_i32(items.len()));
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&[0x00; 4]);
    for item in items {
        assert_eq!(item.len(), usize::from(width));
        out.extend_from_slice(item);
    }
    out
}

pub fn offset_strings(text: Text, items: &[&str]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = items.iter().map(|item| text.encode(item)).collect();
    let mut out = le_i32(items.len()).to_vec();
    out.extend_from_slice(&0i32.to_le_bytes());
    let mut offset = 0;
    out.extend_from_slice(&le_i32(offset));
    for item in &encoded {
        offset += item.len();
        out.extend_from_slice(&le_i32(offset));
    }
    out.extend_from_slice(&le_i32(offset));
    for item in &encoded {
        out.extend_from_slice(item);
    }
    out
}

pub fn doubles(values: &[Option<f64>]) -> Vec<Vec<u8>> {
    values
        .iter()
        .map(|value| match value {
            Some(v) => v.to_le_bytes().to_vec(),
            None => NULL_DOUBLE.to_le_bytes().to_vec(),
        })
        .collect()
}

pub fn i32s(values: &[i32]) -> Vec<Vec<u8>> {
    values.iter().map(|v| v.to_le_bytes().to_vec()).collect()
}

pub fn u16s(values: &[u16]) -> Vec<Vec<u8>> {
    values.iter().map(|v| v.to_le_bytes().to_vec()).collect()
}

/// Payload of a date or time column: 10 fixed bytes, then items opened by
/// the 0x000A marker.
pub fn dated_items(values: &[i32]) -> Vec<u8> {
    let mut out = vec![0x11; 10];
    let mut items = fixed_items(4, &i32s(values));
    items[..2].copy_from_slice(&0x000Au16.to_le_bytes());
    out.extend_from_slice(&items);
    out
}

/// Payload of a boolean column.
pub fn boolean_items(text: Text, codes: &[u16]) -> Vec<u8> {
    let mut out = strings_with_length(text, &["No", "Yes"], false);
    out.extend_from_slice(&0x000Fu16.to_le_bytes());
    out.extend_from_slice(&fixed_items(2, &u16s(codes)));
    out
}

/// Payload of a duration column: doubles then the unit code byte.
pub fn duration_items(values: &[Option<f64>], unit: u8) -> Vec<u8> {
    let mut out = fixed_items(8, &doubles(values));
    out.push(unit);
    out
}
