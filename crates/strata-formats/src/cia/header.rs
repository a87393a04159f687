//! CIA header and meta block (little-endian)

use binrw::BinRead;

/// Size of the content index bitmap
pub const CONTENT_INDEX_SIZE: usize = 0x2000;

/// Every section starts on this boundary
pub const SECTION_ALIGNMENT: u64 = 64;

/// Number of dependency slots in the meta block
pub const DEPENDENCY_COUNT: usize = 0x30;

/// CIA header (0x2020 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CiaHeader {
    /// Header size, usually 0x2020
    pub header_size: u32,
    /// Type
    pub cia_type: u16,
    /// Version
    pub version: u16,
    /// Certificate chain size
    pub certificate_chain_size: u32,
    /// Ticket size
    pub ticket_size: u32,
    /// Title metadata size
    pub tmd_file_size: u32,
    /// Meta size, 0 when there is no meta block
    pub meta_size: u32,
    /// Total content size
    pub content_size: u64,
    /// Bitmap of contents present in the archive
    #[br(count = CONTENT_INDEX_SIZE)]
    pub content_index: Vec<u8>,
}

/// Meta block (0x3AC0 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct MetaData {
    /// Title IDs this title depends on
    pub title_id_dependency_list: [u64; DEPENDENCY_COUNT],
    /// Core version
    #[br(pad_before = 0x180)]
    pub core_version: u32,
    /// SMDH icon
    #[br(pad_before = 0xFC, count = 0x36C0)]
    pub icon_data: Vec<u8>,
}
