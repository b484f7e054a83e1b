//! Byte signatures used to locate blocks in a file that has no directory.

/// Marks the start of a parent block. The four variants share a common tail
/// and differ only in the leading byte.
pub const PARENT_BLOCK_SIGNATURES: [[u8; 11]; 4] = [
    [0xFB, 0x01, 0x02, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00],
    [0xFC, 0x01, 0x02, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00],
    [0xFD, 0x01, 0x02, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00],
];

/// Precedes the length-prefixed name inside a table-name block.
pub const TABLE_NAME_SIGNATURES: [[u8; 7]; 2] = [
    [0x00, 0x00, 0x00, 0x65, 0x00, 0x01, 0x00],
    [0x00, 0x00, 0x00, 0x65, 0x00, 0x02, 0x00],
];

/// Found two bytes into every column child block, just before the column name.
pub const CHILD_BLOCK_SIGNATURES: [[u8; 6]; 3] = [
    [0x05, 0x00, 0x00, 0x00, 0x01, 0x00],
    [0x05, 0x00, 0x00, 0x00, 0x02, 0x00],
    [0x06, 0x00, 0x00, 0x00, 0x02, 0x00],
];

/// Parent blocks are only searched for past the fixed file header.
pub const PARENT_SCAN_START: usize = 64;

/// Distance from a child signature back to the first byte of its block.
pub const CHILD_BLOCK_BACKOFF: usize = 2;

/// Blocks shorter than this hold a table name; longer ones hold columns.
pub const TABLE_NAME_BLOCK_LIMIT: usize = 128;

/// Scan windows stop this many bytes before the end of a range.
pub const SCAN_TAIL: usize = 11;

/// Returns true when any of `patterns` occurs in `buffer` at `offset`.
#[must_use]
pub fn matches_any<const N: usize>(buffer: &[u8], offset: usize, patterns: &[[u8; N]]) -> bool {
    buffer
        .get(offset..offset.saturating_add(N))
        .is_some_and(|window| patterns.iter().any(|pattern| window == pattern))
}
