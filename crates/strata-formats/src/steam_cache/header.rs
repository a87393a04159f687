//! Common header and fixed records shared by GCF and NCF

use binrw::BinRead;

/// Cache file header (44 bytes)
///
/// Both cache kinds share the layout and differ only in the major version,
/// which the caller passes in as the expected value.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(expected_major: u32))]
pub struct Header {
    /// Always 1
    #[br(assert(dummy0 == 1, "expected header marker 1, got {}", dummy0))]
    pub dummy0: u32,
    /// Format major version
    #[br(assert(major_version == expected_major, "expected major version {}, got {}", expected_major, major_version))]
    pub major_version: u32,
    /// Format minor version
    pub minor_version: u32,
    /// Cache identifier
    pub cache_id: u32,
    /// Last version played
    pub last_version_played: u32,
    /// Unknown
    pub dummy1: u32,
    /// Unknown
    pub dummy2: u32,
    /// Total file size
    pub file_size: u32,
    /// Size of one data block
    pub block_size: u32,
    /// Number of data blocks
    pub block_count: u32,
    /// Unknown
    pub dummy3: u32,
}

/// Directory header (56 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryHeader {
    /// Always 4
    pub dummy0: u32,
    /// Cache identifier
    pub cache_id: u32,
    /// Last version played
    pub last_version_played: u32,
    /// Number of directory items
    pub item_count: u32,
    /// Number of files
    pub file_count: u32,
    /// Unknown
    pub dummy1: u32,
    /// Size of the directory section, header included
    pub directory_size: u32,
    /// Size of the name blob
    pub name_size: u32,
    /// Number of info 1 entries
    pub info1_count: u32,
    /// Number of copy entries
    pub copy_count: u32,
    /// Number of local entries
    pub local_count: u32,
    /// Unknown
    pub dummy2: u32,
    /// Unknown
    pub dummy3: u32,
    /// Header checksum
    pub checksum: u32,
}

/// Directory entry (28 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryEntry {
    /// Offset of the name in the name blob
    pub name_offset: u32,
    /// Size of the item
    pub item_size: u32,
    /// Checksum index
    pub checksum_index: u32,
    /// Directory flags
    pub directory_flags: u32,
    /// Index of the parent entry
    pub parent_index: u32,
    /// Index of the next sibling
    pub next_index: u32,
    /// Index of the first child
    pub first_index: u32,
}

/// Checksum section header (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChecksumHeader {
    /// Always 1
    pub dummy0: u32,
    /// Size of the checksum section after this header
    pub checksum_size: u32,
}

/// Checksum map header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChecksumMapHeader {
    /// Always `0x14893721`
    pub dummy0: u32,
    /// Always 1
    pub dummy1: u32,
    /// Number of map entries
    pub item_count: u32,
    /// Number of checksums
    pub checksum_count: u32,
}

/// Checksum map entry (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ChecksumMapEntry {
    /// Number of checksums for the item
    pub checksum_count: u32,
    /// First checksum of the item
    pub first_checksum_index: u32,
}
