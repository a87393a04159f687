//! Steam no-cache (NCF) support
//!
//! An NCF file carries the directory of a game cache without the file data:
//! header, directory section, an unknown header with one entry per item and
//! the checksum section.

mod print;

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::steam_cache::{self, ChecksumSection, DirectorySection, Header, is_complete};
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::{BinRead, Endian};

/// Major version stored in every NCF header
pub const NCF_MAJOR_VERSION: u32 = 2;

/// Header of the per-item unknown table (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct UnknownHeader {
    /// Always 1
    pub dummy0: u32,
    /// Always 0
    pub dummy1: u32,
}

/// Complete NCF file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// File header
    pub header: Option<Header>,
    /// Directory section
    pub directory: DirectorySection,
    /// Unknown header
    pub unknown_header: Option<UnknownHeader>,
    /// Unknown value per directory item
    pub unknown_entries: Vec<u32>,
    /// Checksum section
    pub checksums: ChecksumSection,
}

impl File {
    fn read_sections(&mut self, cursor: &mut ByteCursor<'_>, limit: usize) -> Result<()> {
        let (directory, complete) = DirectorySection::read(cursor, limit)?;
        let item_count = directory.item_count();
        self.directory = directory;
        if !complete {
            return Ok(());
        }

        let Some(unknown_header) = recover("unknown header", cursor.read::<UnknownHeader>())? else {
            return Ok(());
        };
        self.unknown_header = Some(unknown_header);
        self.unknown_entries = steam_cache::read_u32_list(cursor, item_count, limit)?;
        if !is_complete(&self.unknown_entries, item_count) {
            return Ok(());
        }

        let (checksums, _) = ChecksumSection::read(cursor, limit)?;
        self.checksums = checksums;
        Ok(())
    }
}

impl BinaryFormat for File {
    const NAME: &'static str = "No Cache File";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read_with(Endian::Little, (NCF_MAJOR_VERSION,))?;

        let mut file = Self {
            header: Some(header),
            ..Self::default()
        };
        file.read_sections(&mut cursor, options.max_table_entries)?;
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

    fn sample() -> Vec<u8> {
        SampleBuilder::new()
            .u32le(1)
            .u32le(NCF_MAJOR_VERSION)
            .u32le(1)
            .u32le(7)
            .u32le(1)
            .zeros(24)
            .bytes(&directory_section().build())
            .u32le(1)
            .u32le(0)
            .u32le(5)
            .u32le(6)
            .bytes(&checksum_section().build())
            .build()
    }

    #[test]
    fn test_decode() {
        let file = File::decode(&sample(), 0).unwrap();
        assert_eq!(file.header.as_ref().unwrap().cache_id, 7);
        assert_eq!(file.directory.directory_entries.len(), 2);
        assert_eq!(file.unknown_entries, vec![5, 6]);
        assert_eq!(file.checksums.checksum_entries, vec![0xDEAD_BEEF]);
    }

    #[test]
    fn test_gcf_header_is_rejected() {
        let mut data = sample();
        data[4] = 1;
        assert!(File::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let file = File::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&file);
        assert!(report.starts_with("No Cache File Information:\n"));
        assert!(report.contains("  Unknown Entry 1\n    Dummy 0: 6 (0x00000006)\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = File::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No unknown header"));
        assert!(report.contains("No checksum entries"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<File>(&sample());
    }
}
