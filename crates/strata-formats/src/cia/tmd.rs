//! Title metadata (big-endian)

use super::certificate::Signature;
use crate::cursor::Encoding;
use binrw::BinRead;

/// Number of content info records in every TMD
pub const CONTENT_INFO_RECORD_COUNT: usize = 64;

/// Content info record (0x24 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct ContentInfoRecord {
    /// Index of the first content chunk record covered
    pub content_index_offset: u16,
    /// Number of content chunk records covered
    pub content_command_count: u16,
    /// SHA-256 of the covered content chunk records
    pub unhashed_content_records_sha256_hash: [u8; 0x20],
}

/// Content chunk record (0x30 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct ContentChunkRecord {
    /// Content ID
    pub content_id: u32,
    /// Content index
    pub content_index: u16,
    /// Content type flags
    pub content_type: u16,
    /// Content size in bytes
    pub content_size: u64,
    /// SHA-256 of the content
    pub sha256_hash: [u8; 0x20],
}

/// Title metadata
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big, import(max_entries: usize))]
pub struct TitleMetadata {
    /// Signature over the metadata
    pub signature: Signature,
    /// Issuer
    #[br(map = |raw: [u8; 0x40]| Encoding::Ascii.decode_fixed(&raw))]
    pub issuer: String,
    /// Format version
    pub version: u8,
    /// CA CRL version
    pub ca_crl_version: u8,
    /// Signer CRL version
    pub signer_crl_version: u8,
    /// Reserved
    pub reserved_1: u8,
    /// Required system version
    pub system_version: u64,
    /// Title ID
    pub title_id: u64,
    /// Title type
    pub title_type: u32,
    /// Group ID
    pub group_id: u16,
    /// Save data size
    pub save_data_size: u32,
    /// SRL private save data size
    pub srl_private_save_data_size: u32,
    /// Reserved
    pub reserved_2: [u8; 4],
    /// SRL flag
    pub srl_flag: u8,
    /// Reserved
    pub reserved_3: [u8; 0x31],
    /// Access rights
    pub access_rights: u32,
    /// Title version
    pub title_version: u16,
    /// Number of content chunk records
    pub content_count: u16,
    /// Boot content index
    pub boot_content: u16,
    /// Padding
    pub padding: [u8; 2],
    /// SHA-256 of the content info records
    pub sha256_hash_content_info_records: [u8; 0x20],
    /// Content info records
    #[br(count = CONTENT_INFO_RECORD_COUNT)]
    pub content_info_records: Vec<ContentInfoRecord>,
    /// Content chunk records
    #[br(count = usize::from(content_count).min(max_entries))]
    pub content_chunk_records: Vec<ContentChunkRecord>,
}
