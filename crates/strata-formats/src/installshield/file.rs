//! File descriptors

use binrw::BinRead;

/// Size of a file descriptor after major version 5
pub const FILE_DESCRIPTOR_V6_SIZE: u64 = 0x57;

/// File is split across volumes
pub const FILE_SPLIT: u16 = 0x0001;
/// File data is obfuscated
pub const FILE_OBFUSCATED: u16 = 0x0002;
/// File data is compressed
pub const FILE_COMPRESSED: u16 = 0x0004;
/// File is not present in any volume
pub const FILE_INVALID: u16 = 0x0008;

/// File descriptor up to major version 5
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(major_version: u32))]
pub struct FileDescriptorV5 {
    /// Name offset, relative to the file table
    pub name_offset: u32,
    /// Directory index
    pub directory_index: u32,
    /// File flags
    pub flags: u16,
    /// Expanded size
    pub expanded_size: u32,
    /// Compressed size
    pub compressed_size: u32,
    /// Reserved
    pub reserved: [u8; 0x14],
    /// Data offset
    pub data_offset: u32,
    /// MD5 of the expanded data, major version 5 only
    #[br(if(major_version == 5))]
    pub md5: Option<[u8; 0x10]>,
}

/// File descriptor from major version 6 (0x57 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FileDescriptorV6 {
    /// File flags
    pub flags: u16,
    /// Expanded size
    pub expanded_size: u64,
    /// Compressed size
    pub compressed_size: u64,
    /// Data offset
    pub data_offset: u64,
    /// MD5 of the expanded data
    pub md5: [u8; 0x10],
    /// Reserved
    pub reserved_0: [u8; 0x10],
    /// Name offset, relative to the file table
    pub name_offset: u32,
    /// Directory index
    pub directory_index: u16,
    /// Reserved
    pub reserved_1: [u8; 0x0C],
    /// Previous file in a link chain
    pub link_previous: u32,
    /// Next file in a link chain
    pub link_next: u32,
    /// Link flags
    pub link_flags: u8,
    /// Volume holding the data
    pub volume: u16,
}

/// File descriptor in the layout selected by the major version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDescriptor {
    /// Major version 5 and below
    V5(FileDescriptorV5),
    /// Major version 6 and above
    V6(FileDescriptorV6),
}

impl FileDescriptor {
    /// Name offset, relative to the file table
    pub fn name_offset(&self) -> u32 {
        match self {
            Self::V5(fd) => fd.name_offset,
            Self::V6(fd) => fd.name_offset,
        }
    }

    /// Directory index
    pub fn directory_index(&self) -> u32 {
        match self {
            Self::V5(fd) => fd.directory_index,
            Self::V6(fd) => u32::from(fd.directory_index),
        }
    }

    /// File flags
    pub fn flags(&self) -> u16 {
        match self {
            Self::V5(fd) => fd.flags,
            Self::V6(fd) => fd.flags,
        }
    }

    /// Expanded size
    pub fn expanded_size(&self) -> u64 {
        match self {
            Self::V5(fd) => u64::from(fd.expanded_size),
            Self::V6(fd) => fd.expanded_size,
        }
    }

    /// Compressed size
    pub fn compressed_size(&self) -> u64 {
        match self {
            Self::V5(fd) => u64::from(fd.compressed_size),
            Self::V6(fd) => fd.compressed_size,
        }
    }

    /// Data offset
    pub fn data_offset(&self) -> u64 {
        match self {
            Self::V5(fd) => u64::from(fd.data_offset),
            Self::V6(fd) => fd.data_offset,
        }
    }

    /// Whether the file is absent from every volume
    pub fn is_invalid(&self) -> bool {
        self.flags() & FILE_INVALID != 0
    }
}
