//! ExeFS and RomFS headers

use crate::cursor::Encoding;
use binrw::BinRead;

/// RomFS magic
pub const IVFC_MAGIC: [u8; 4] = *b"IVFC";

/// Number of file slots in an ExeFS header
pub const EXEFS_FILE_COUNT: usize = 10;

/// ExeFS file header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExeFsFileHeader {
    /// File name, e.g. `.code`
    #[br(map = |raw: [u8; 8]| Encoding::Ascii.decode_fixed(&raw))]
    pub file_name: String,
    /// Offset after the ExeFS header
    pub file_offset: u32,
    /// Size in bytes
    pub file_size: u32,
}

/// ExeFS header (0x200 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExeFsHeader {
    /// File headers
    #[br(count = EXEFS_FILE_COUNT)]
    pub file_headers: Vec<ExeFsFileHeader>,
    /// SHA-256 of every file, stored in reverse slot order
    #[br(pad_before = 0x20, count = EXEFS_FILE_COUNT)]
    pub file_hashes: Vec<[u8; 0x20]>,
}

/// One level of the RomFS hash tree
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct RomFsLevel {
    /// Logical offset
    pub logical_offset: u64,
    /// Hash data size
    pub hash_data_size: u64,
    /// Block size as a power of two
    #[br(pad_after = 4)]
    pub block_size_log2: u32,
}

/// RomFS IVFC header (0x5C bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct RomFsHeader {
    /// Magic, always `IVFC`
    #[br(assert(magic == IVFC_MAGIC, "expected IVFC, got {:?}", magic))]
    pub magic: [u8; 4],
    /// Magic number, 0x10000
    pub magic_number: u32,
    /// Master hash size
    pub master_hash_size: u32,
    /// Level 1
    pub level_1: RomFsLevel,
    /// Level 2
    pub level_2: RomFsLevel,
    /// Level 3
    pub level_3: RomFsLevel,
    /// Optional info size
    #[br(pad_before = 4)]
    pub optional_info_size: u32,
}
