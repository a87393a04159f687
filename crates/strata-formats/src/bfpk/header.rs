//! BFPK header and file table records

use crate::cursor::{ByteCursor, Encoding};
use crate::error::{Result, recover};
use binrw::BinRead;

/// BFPK archive magic
pub const BFPK_MAGIC: [u8; 4] = *b"BFPK";

/// Archive header (12 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Magic signature, always "BFPK"
    #[br(assert(magic == BFPK_MAGIC, "expected 'BFPK', got {:?}", magic))]
    pub magic: [u8; 4],

    /// Format version
    pub version: i32,

    /// Number of entries in the file table
    pub files: i32,
}

/// File table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Length of the name in bytes
    pub name_size: i32,
    /// File name
    pub name: String,
    /// Size of the file once decompressed
    pub uncompressed_size: i32,
    /// Offset of the compressed data block, relative to the archive start
    pub offset: i32,
    /// Size stored at the head of the data block, absent when unreadable
    pub compressed_size: Option<i32>,
}

impl FileEntry {
    /// Read one entry and follow its offset to the compressed size
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>, base: u64) -> Result<Self> {
        let name_size = cursor.read_i32_le()?;
        let name_length = u64::try_from(name_size).unwrap_or(0);
        let name = cursor.read_fixed_string(name_length, Encoding::Latin1)?;
        let uncompressed_size = cursor.read_i32_le()?;
        let offset = cursor.read_i32_le()?;

        let compressed_size = match u64::try_from(offset) {
            Ok(offset) => recover(
                "bfpk compressed size",
                ByteCursor::at(cursor.data(), base + offset).and_then(|mut c| c.read_i32_le()),
            )?,
            Err(_) => None,
        };

        Ok(Self {
            name_size,
            name,
            uncompressed_size,
            offset,
            compressed_size,
        })
    }
}
