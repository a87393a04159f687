//! VPK header records

use binrw::BinRead;

/// Directory file signature
pub const VPK_SIGNATURE: u32 = 0x55AA_1234;

/// Terminator stored after every directory entry
pub const ENTRY_TERMINATOR: u16 = 0xFFFF;

/// Archive index marking data stored in the directory file itself
pub const DIRECTORY_ARCHIVE_INDEX: u16 = 0x7FFF;

/// Directory file header (12 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Signature, always `0x55AA1234`
    #[br(assert(signature == VPK_SIGNATURE, "expected 0x55AA1234, got {:#010x}", signature))]
    pub signature: u32,
    /// Format version, 1 or 2
    pub version: u32,
    /// Size of the directory tree in bytes
    pub directory_length: u32,
}

impl Header {
    /// Size of the header, including the version 2 extension
    pub fn size(&self) -> u64 {
        if self.version == 2 { 28 } else { 12 }
    }
}

/// Version 2 header extension (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExtendedHeader {
    /// Size of the file data section stored after the tree
    pub dummy0: u32,
    /// Size of the archive hash section
    pub archive_hash_length: u32,
    /// Size of the section holding other hashes
    pub extra_length: u32,
    /// Size of the signature section
    pub dummy1: u32,
}

/// Archive hash record (28 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ArchiveHash {
    /// Archive the hashed range lives in
    pub archive_index: u32,
    /// Start of the hashed range
    pub archive_offset: u32,
    /// Length of the hashed range
    pub length: u32,
    /// MD5 of the range
    pub hash: [u8; 16],
}

/// Size of one archive hash record
pub const ARCHIVE_HASH_SIZE: u32 = 28;
