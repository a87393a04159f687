//! GCF block allocation records

use binrw::BinRead;

/// Block entry header (32 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BlockEntryHeader {
    /// Number of block entries
    pub block_count: u32,
    /// Number of block entries in use
    pub blocks_used: u32,
    /// Unknown
    pub dummy0: u32,
    /// Unknown
    pub dummy1: u32,
    /// Unknown
    pub dummy2: u32,
    /// Unknown
    pub dummy3: u32,
    /// Unknown
    pub dummy4: u32,
    /// Header checksum
    pub checksum: u32,
}

/// Block entry (28 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BlockEntry {
    /// Entry flags
    pub entry_flags: u32,
    /// Offset of the data inside the file
    pub file_data_offset: u32,
    /// Size of the data
    pub file_data_size: u32,
    /// First data block
    pub first_data_block_index: u32,
    /// Next block entry
    pub next_block_entry_index: u32,
    /// Previous block entry
    pub previous_block_entry_index: u32,
    /// Owning directory entry
    pub directory_index: u32,
}

/// Fragmentation map header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FragmentationMapHeader {
    /// Number of data blocks
    pub block_count: u32,
    /// First unused map entry
    pub first_unused_entry: u32,
    /// Chain terminator, `0x0000FFFF` or `0xFFFFFFFF`
    pub terminator: u32,
    /// Header checksum
    pub checksum: u32,
}

/// Block entry map header, present before minor version 6 (20 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BlockEntryMapHeader {
    /// Number of block entries
    pub block_count: u32,
    /// First block entry
    pub first_block_entry_index: u32,
    /// Last block entry
    pub last_block_entry_index: u32,
    /// Unknown
    pub dummy0: u32,
    /// Header checksum
    pub checksum: u32,
}

/// Block entry map entry (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct BlockEntryMap {
    /// Previous block entry
    pub previous_block_entry_index: u32,
    /// Next block entry
    pub next_block_entry_index: u32,
}

/// Directory map header, present from minor version 5 (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryMapHeader {
    /// Always 1
    pub dummy0: u32,
    /// Always 0
    pub dummy1: u32,
}

/// Data block header
///
/// Minor version 3 files omit the leading last-version-played field.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(minor_version: u32))]
pub struct DataBlockHeader {
    /// Last version played
    #[br(if(minor_version != 3))]
    pub last_version_played: Option<u32>,
    /// Number of data blocks
    pub block_count: u32,
    /// Size of one data block
    pub block_size: u32,
    /// Offset of the first data block
    pub first_block_offset: u32,
    /// Number of data blocks in use
    pub blocks_used: u32,
    /// Header checksum
    pub checksum: u32,
}
