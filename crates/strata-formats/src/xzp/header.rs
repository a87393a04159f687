//! XZP header, footer and table records

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;

/// Header signature
pub const XZP_SIGNATURE: [u8; 4] = *b"piZx";

/// Footer signature
pub const XZP_FOOTER_SIGNATURE: [u8; 4] = *b"tFzX";

/// Size of the footer at the end of the file
pub const FOOTER_SIZE: u64 = 8;

/// Package header (36 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Signature, always `piZx`
    #[br(assert(signature == XZP_SIGNATURE, "expected piZx, got {:?}", signature))]
    pub signature: [u8; 4],
    /// Format version
    pub version: u32,
    /// Number of preload directory entries
    pub preload_directory_entry_count: u32,
    /// Number of directory entries
    pub directory_entry_count: u32,
    /// Number of preloaded bytes
    pub preload_bytes: u32,
    /// Length of this header
    pub header_length: u32,
    /// Number of directory items
    pub directory_item_count: u32,
    /// Offset of the directory item table
    pub directory_item_offset: u32,
    /// Length of the directory item table
    pub directory_item_length: u32,
}

/// Directory entry, also used for preload entries (12 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryEntry {
    /// CRC of the file name
    pub file_name_crc: u32,
    /// Length of the file data
    pub entry_length: u32,
    /// Offset of the file data
    pub entry_offset: u32,
}

/// Preload mapping, one per preload directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryMapping {
    /// Index into the preload directory entries
    pub preload_directory_entry_index: u16,
}

/// Named directory item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryItem {
    /// CRC of the file name
    pub file_name_crc: u32,
    /// Offset of the name, relative to the package start
    pub name_offset: u32,
    /// Name read from `name_offset`
    pub name: Option<String>,
    /// Creation time
    pub time_created: u32,
}

impl DirectoryItem {
    /// Read the fixed record, then its name when it can be reached
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>, base: u64) -> Result<Self> {
        let file_name_crc = cursor.read_u32_le()?;
        let name_offset = cursor.read_u32_le()?;
        let time_created = cursor.read_u32_le()?;

        let resume = cursor.position();
        let name = cursor
            .seek_to(base + u64::from(name_offset))
            .and_then(|()| cursor.read_cstring(Encoding::Ascii))
            .ok();
        cursor.seek_to(resume)?;

        Ok(Self {
            file_name_crc,
            name_offset,
            name,
            time_created,
        })
    }
}

/// Package footer (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Footer {
    /// Length of the whole package
    pub file_length: u32,
    /// Signature, always `tFzX`
    #[br(assert(signature == XZP_FOOTER_SIGNATURE, "expected tFzX, got {:?}", signature))]
    pub signature: [u8; 4],
}
