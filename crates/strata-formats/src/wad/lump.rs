//! WAD3 header, lump directory and miptex records

use crate::cursor::Encoding;
use binrw::BinRead;

/// Package magic
pub const WAD_MAGIC: [u8; 4] = *b"WAD3";

/// Lump type of a mip-mapped texture
pub const LUMP_TYPE_MIPTEX: u8 = 0x43;

/// Package header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Magic signature, always "WAD3"
    #[br(assert(signature == WAD_MAGIC, "expected 'WAD3', got {:?}", signature))]
    pub signature: [u8; 4],
    /// Number of lumps stated by the header
    pub lump_count: u32,
    /// Offset of the lump directory
    pub lump_offset: u32,
}

/// Lump directory entry (32 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Lump {
    /// Offset of the lump data
    pub offset: u32,
    /// Size of the lump data on disk
    pub disk_length: u32,
    /// Size of the lump data once decompressed
    pub length: u32,
    /// Lump type
    pub lump_type: u8,
    /// Compression mode, 0 when stored
    pub compression: u8,
    /// Padding
    pub padding0: u8,
    /// Padding
    pub padding1: u8,
    /// Lump name
    #[br(map = |raw: [u8; 16]| Encoding::Ascii.decode_fixed(&raw))]
    pub name: String,
}

impl Lump {
    /// Whether the lump starts with a miptex header this crate understands
    pub fn has_info(&self) -> bool {
        self.lump_type == LUMP_TYPE_MIPTEX && self.compression == 0
    }
}

/// Miptex header at the start of a texture lump
///
/// Pixel and palette data follow the header and are not decoded.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct LumpInfo {
    /// Texture name
    #[br(map = |raw: [u8; 16]| Encoding::Ascii.decode_fixed(&raw))]
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Offsets of the four mip levels, relative to the lump start
    pub mip_offsets: [u32; 4],
}
