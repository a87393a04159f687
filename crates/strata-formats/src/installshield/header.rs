//! Common header, volume header and cabinet descriptor

use binrw::BinRead;

/// Signature at the start of every cabinet and header file
pub const SIGNATURE: [u8; 4] = *b"ISc(";

/// Number of file group and component list heads in the descriptor
pub const MAX_FILE_GROUP_COUNT: usize = 71;

/// Major version from which strings are stored as UTF-16
pub const UTF16_MAJOR_VERSION: u32 = 17;

/// Common header (20 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CommonHeader {
    /// Signature, always `ISc(`
    #[br(assert(signature == SIGNATURE, "expected ISc(, got {:?}", signature))]
    pub signature: [u8; 4],
    /// Encoded version
    pub version: u32,
    /// Volume information
    pub volume_info: u32,
    /// Descriptor offset
    pub descriptor_offset: u32,
    /// Descriptor size
    pub descriptor_size: u32,
}

impl CommonHeader {
    /// Major version decoded from [`CommonHeader::version`]
    pub fn major_version(&self) -> u32 {
        major_version(self.version)
    }
}

/// Decode the major version from an encoded version word
///
/// A top byte of 1 stores the major version in bits 12 to 15. A top byte
/// of 2 or 4 stores it in the low word, multiplied by 100. Any other top
/// byte yields 0.
pub fn major_version(version: u32) -> u32 {
    match version >> 24 {
        1 => (version >> 12) & 0x0F,
        2 | 4 => (version & 0xFFFF) / 100,
        _ => 0,
    }
}

/// Volume header, 32-bit up to major version 5 and 64-bit afterwards
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(major_version: u32))]
pub enum VolumeHeader {
    /// Major version 5 and below
    #[br(pre_assert(major_version <= 5))]
    V5 {
        /// Data offset
        data_offset: u32,
        /// Unknown
        unknown: u32,
        /// First file index
        first_file_index: u32,
        /// Last file index
        last_file_index: u32,
        /// First file offset
        first_file_offset: u32,
        /// First file expanded size
        first_file_size_expanded: u32,
        /// First file compressed size
        first_file_size_compressed: u32,
        /// Last file offset
        last_file_offset: u32,
        /// Last file expanded size
        last_file_size_expanded: u32,
        /// Last file compressed size
        last_file_size_compressed: u32,
    },
    /// Major version 6 and above; wide fields are stored low word first
    #[br(pre_assert(major_version > 5))]
    V6 {
        /// Data offset
        data_offset: u64,
        /// First file index
        first_file_index: u32,
        /// Last file index
        last_file_index: u32,
        /// First file offset
        first_file_offset: u64,
        /// First file expanded size
        first_file_size_expanded: u64,
        /// First file compressed size
        first_file_size_compressed: u64,
        /// Last file offset
        last_file_offset: u64,
        /// Last file expanded size
        last_file_size_expanded: u64,
        /// Last file compressed size
        last_file_size_compressed: u64,
    },
}

/// Cabinet descriptor
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Descriptor {
    /// Offset of the string table
    pub strings_offset: u32,
    /// Reserved
    pub reserved_0: [u8; 4],
    /// Offset of the component list
    pub component_list_offset: u32,
    /// Offset of the file table, relative to the descriptor
    pub file_table_offset: u32,
    /// Reserved
    pub reserved_1: [u8; 4],
    /// File table size
    pub file_table_size: u32,
    /// Redundant file table size
    pub file_table_size_2: u32,
    /// Number of directories
    pub directory_count: u16,
    /// Reserved
    pub reserved_2: [u8; 4],
    /// Reserved
    pub reserved_3: [u8; 2],
    /// Reserved
    pub reserved_4: [u8; 4],
    /// Number of files
    pub file_count: u32,
    /// Offset of the file descriptors after major version 5, relative to
    /// the file table
    pub file_table_offset_2: u32,
    /// Number of component table infos
    pub component_table_info_count: u16,
    /// Component table offset
    pub component_table_offset: u32,
    /// Reserved
    pub reserved_5: [u8; 4],
    /// Reserved
    pub reserved_6: [u8; 4],
    /// Heads of the file group lists
    pub file_group_offsets: [u32; MAX_FILE_GROUP_COUNT],
    /// Heads of the component lists
    pub component_offsets: [u32; MAX_FILE_GROUP_COUNT],
    /// Setup types offset
    pub setup_types_offset: u32,
    /// Setup table offset
    pub setup_table_offset: u32,
    /// Reserved
    pub reserved_7: [u8; 4],
    /// Reserved
    pub reserved_8: [u8; 4],
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cursor::ByteCursor;
    use crate::test_utils::SampleBuilder;

    #[test]
    fn test_major_version_from_bits() {
        assert_eq!(major_version(0x0100_3000), 3);
        assert_eq!(major_version(0x0100_5000), 5);
    }

    #[test]
    fn test_major_version_from_low_word() {
        assert_eq!(major_version(0x0200_0258), 6);
        assert_eq!(major_version(0x0400_0708), 18);
        assert_eq!(major_version(0x0200_0000), 0);
    }

    #[test]
    fn test_unknown_top_byte() {
        assert_eq!(major_version(0x0900_0258), 0);
    }

    #[test]
    fn test_volume_header_width() {
        let data = SampleBuilder::new()
            .u32le(0x200)
            .u32le(0)
            .u32le(1)
            .u32le(9)
            .zeros(48)
            .build();
        let v5: VolumeHeader = ByteCursor::new(&data).read_with(binrw::Endian::Little, (5,)).unwrap();
        assert!(matches!(
            v5,
            VolumeHeader::V5 { data_offset: 0x200, first_file_index: 1, last_file_index: 9, .. }
        ));

        let v6: VolumeHeader = ByteCursor::new(&data).read_with(binrw::Endian::Little, (6,)).unwrap();
        assert!(matches!(
            v6,
            VolumeHeader::V6 { data_offset: 0x200, first_file_index: 1, last_file_index: 9, .. }
        ));
    }
}
