mod blocks;
mod byteorder;
mod decoders;
mod encoding;
mod header;
mod scanner;
mod signature;
mod version;

pub use blocks::{FixedSizeItems, OffsetStrings, StringsWithLength};
pub use byteorder::{
    MAX_DECLARED_SIZE, NULL_DOUBLE_BITS, read_f64, read_i32, read_size, read_u8, read_u16,
    read_u64, skip_to_next_matching_short, validate_size,
};
pub use decoders::{Column, decode_column};
pub use encoding::read_string;
pub use header::ColumnHeader;
pub use scanner::{parent_block_offsets, scan, scan_with_trace};
pub use signature::{
    CHILD_BLOCK_SIGNATURES, PARENT_BLOCK_SIGNATURES, TABLE_NAME_SIGNATURES, matches_any,
};
pub use version::{
    DecoderKind, DispatchTable, VERSION_OFFSET, decoder_for, dispatch_table, read_version_code,
    resolve_version,
};
