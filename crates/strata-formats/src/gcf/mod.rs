//! Steam game cache (GCF) support
//!
//! Sections are stored back to back after the header:
//!
//! - **Block Entries**: header and one entry per block
//! - **Fragmentation Map**: header and one next-block index per data block
//! - **Block Entry Map** (minor version < 6)
//! - **Directory**: shared with NCF
//! - **Directory Map** (header from minor version 5) with one entry per item
//! - **Checksums**: shared with NCF
//! - **Data Block Header**, at the end of the checksum section

mod block;
mod print;

pub use block::{
    BlockEntry, BlockEntryHeader, BlockEntryMap, BlockEntryMapHeader, DataBlockHeader,
    DirectoryMapHeader, FragmentationMapHeader,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::steam_cache::{self, ChecksumSection, DirectorySection, Header, is_complete};
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;

/// Major version stored in every GCF header
pub const GCF_MAJOR_VERSION: u32 = 1;

/// Complete GCF file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// File header
    pub header: Option<Header>,
    /// Block entry header
    pub block_entry_header: Option<BlockEntryHeader>,
    /// Block entries
    pub block_entries: Vec<BlockEntry>,
    /// Fragmentation map header
    pub fragmentation_map_header: Option<FragmentationMapHeader>,
    /// Next data block index per data block
    pub fragmentation_maps: Vec<u32>,
    /// Block entry map header
    pub block_entry_map_header: Option<BlockEntryMapHeader>,
    /// Block entry maps
    pub block_entry_maps: Vec<BlockEntryMap>,
    /// Directory section
    pub directory: DirectorySection,
    /// Directory map header
    pub directory_map_header: Option<DirectoryMapHeader>,
    /// First data block index per directory item
    pub directory_map_entries: Vec<u32>,
    /// Checksum section
    pub checksums: ChecksumSection,
    /// Data block header
    pub data_block_header: Option<DataBlockHeader>,
}

impl File {
    fn read_sections(&mut self, cursor: &mut ByteCursor<'_>, minor: u32, limit: usize) -> Result<()> {
        let Some(block_header) = recover("block entry header", cursor.read::<BlockEntryHeader>())?
        else {
            return Ok(());
        };
        let count = block_header.block_count;
        self.block_entry_header = Some(block_header);
        self.block_entries = cursor.read_counted(u64::from(count), limit, |c| c.read())?;
        if !is_complete(&self.block_entries, count) {
            return Ok(());
        }

        let Some(map_header) = recover(
            "fragmentation map header",
            cursor.read::<FragmentationMapHeader>(),
        )?
        else {
            return Ok(());
        };
        let count = map_header.block_count;
        self.fragmentation_map_header = Some(map_header);
        self.fragmentation_maps = steam_cache::read_u32_list(cursor, count, limit)?;
        if !is_complete(&self.fragmentation_maps, count) {
            return Ok(());
        }

        if minor < 6 {
            let Some(map_header) =
                recover("block entry map header", cursor.read::<BlockEntryMapHeader>())?
            else {
                return Ok(());
            };
            let count = map_header.block_count;
            self.block_entry_map_header = Some(map_header);
            self.block_entry_maps = cursor.read_counted(u64::from(count), limit, |c| c.read())?;
            if !is_complete(&self.block_entry_maps, count) {
                return Ok(());
            }
        }

        let (directory, complete) = DirectorySection::read(cursor, limit)?;
        let item_count = directory.item_count();
        self.directory = directory;
        if !complete {
            return Ok(());
        }

        if minor >= 5 {
            let Some(map_header) =
                recover("directory map header", cursor.read::<DirectoryMapHeader>())?
            else {
                return Ok(());
            };
            self.directory_map_header = Some(map_header);
        }
        self.directory_map_entries = steam_cache::read_u32_list(cursor, item_count, limit)?;
        if !is_complete(&self.directory_map_entries, item_count) {
            return Ok(());
        }

        let (checksums, end) = ChecksumSection::read(cursor, limit)?;
        self.checksums = checksums;
        if let Some(end) = end
            && cursor.seek_to(end).is_ok()
        {
            self.data_block_header = recover(
                "data block header",
                cursor.read_with::<DataBlockHeader>(Endian::Little, (minor,)),
            )?;
        }
        Ok(())
    }
}

impl BinaryFormat for File {
    const NAME: &'static str = "Game Cache File";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read_with(Endian::Little, (GCF_MAJOR_VERSION,))?;
        let minor = header.minor_version;

        let mut file = Self {
            header: Some(header),
            ..Self::default()
        };
        file.read_sections(&mut cursor, minor, options.max_table_entries)?;
        Ok(file)
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::steam_cache::tests::{checksum_section, directory_section};
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    fn header(minor: u32) -> SampleBuilder {
        SampleBuilder::new()
            .u32le(1)
            .u32le(GCF_MAJOR_VERSION)
            .u32le(minor)
            .u32le(7)
            .u32le(1)
            .u32le(0)
            .u32le(0)
            .u32le(0x1000)
            .u32le(0x2000)
            .u32le(1)
            .u32le(0)
    }

    fn sample(minor: u32) -> Vec<u8> {
        let mut builder = header(minor)
            // block entries
            .u32le(1)
            .u32le(1)
            .zeros(20)
            .u32le(0)
            .u32le(0x8000)
            .u32le(0)
            .u32le(3)
            .u32le(0)
            .u32le(0)
            .u32le(0)
            .u32le(1)
            // fragmentation map
            .u32le(1)
            .u32le(1)
            .u32le(0xFFFF_FFFF)
            .u32le(0)
            .u32le(0xFFFF_FFFF);
        if minor < 6 {
            builder = builder
                .u32le(1)
                .u32le(0)
                .u32le(0)
                .u32le(0)
                .u32le(0)
                .u32le(0xFFFF_FFFF)
                .u32le(0xFFFF_FFFF);
        }
        builder = builder.bytes(&directory_section().build());
        if minor >= 5 {
            builder = builder.u32le(1).u32le(0);
        }
        builder = builder.u32le(0).u32le(0xFFFF_FFFF);
        builder = builder.bytes(&checksum_section().build());
        if minor != 3 {
            builder = builder.u32le(1);
        }
        builder
            .u32le(1)
            .u32le(0x2000)
            .u32le(0x1000)
            .u32le(1)
            .u32le(0)
            .build()
    }

    #[test]
    fn test_decode_v6() {
        let file = File::decode(&sample(6), 0).unwrap();
        assert_eq!(file.block_entries.len(), 1);
        assert_eq!(file.block_entries[0].file_data_size, 3);
        assert_eq!(file.fragmentation_maps, vec![0xFFFF_FFFF]);
        assert!(file.block_entry_map_header.is_none());
        assert_eq!(file.directory.directory_entries.len(), 2);
        assert!(file.directory_map_header.is_some());
        assert_eq!(file.directory_map_entries, vec![0, 0xFFFF_FFFF]);
        assert_eq!(file.checksums.checksum_entries, vec![0xDEAD_BEEF]);
        let data_block = file.data_block_header.as_ref().unwrap();
        assert_eq!(data_block.last_version_played, Some(1));
        assert_eq!(data_block.first_block_offset, 0x1000);
    }

    #[test]
    fn test_decode_v3_layout() {
        let file = File::decode(&sample(3), 0).unwrap();
        assert_eq!(file.block_entry_maps.len(), 1);
        assert!(file.directory_map_header.is_none());
        assert_eq!(file.directory_map_entries.len(), 2);
        let data_block = file.data_block_header.as_ref().unwrap();
        assert_eq!(data_block.last_version_played, None);
        assert_eq!(data_block.block_size, 0x2000);
    }

    #[test]
    fn test_wrong_major_version_fails() {
        let mut data = sample(6);
        data[4] = 2;
        assert!(File::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let file = File::decode(&sample(6), 0).unwrap();
        let report = assert_idempotent(&file);
        assert!(report.starts_with("Game Cache File Information:\n"));
        assert!(report.contains("    Name: file.txt\n"));
        assert!(report.contains("No block entry map header"));
        assert!(report.contains("  Last version played: 1 (0x00000001)\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = File::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No block entries"));
        assert!(report.contains("No directory header"));
        assert!(report.contains("No data block header"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<File>(&sample(6));
        assert_truncation_safe::<File>(&sample(3));
    }
}
