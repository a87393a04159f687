//! Valve pack (VPK) directory file support
//!
//! - **Header** (12 bytes): signature, version, tree length
//! - **Extended Header** (version 2, 16 bytes): section sizes
//! - **Directory Tree**: extension/path/name levels with entry records
//! - **Archive Hashes** (version 2): MD5s of archive ranges

mod directory;
mod header;
mod print;

pub use directory::{DirectoryEntry, DirectoryItem};
pub use header::{
    ARCHIVE_HASH_SIZE, ArchiveHash, DIRECTORY_ARCHIVE_INDEX, ENTRY_TERMINATOR, ExtendedHeader,
    Header, VPK_SIGNATURE,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Complete VPK directory file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// Directory header
    pub header: Option<Header>,
    /// Version 2 header extension
    pub extended_header: Option<ExtendedHeader>,
    /// Files listed in the directory tree
    pub directory_items: Vec<DirectoryItem>,
    /// Archive hash records
    pub archive_hashes: Vec<ArchiveHash>,
}

impl BinaryFormat for File {
    const NAME: &'static str = "Valve Package";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let extended_header = if header.version == 2 {
            recover("vpk extended header", cursor.read::<ExtendedHeader>())?
        } else {
            None
        };

        let tree_start = offset + header.size();
        let directory_items = match cursor.seek_to(tree_start) {
            Ok(()) => directory::read_tree(&mut cursor, options.max_table_entries)?,
            Err(_) => Vec::new(),
        };

        let mut archive_hashes = Vec::new();
        if let Some(extended) = &extended_header {
            let hashes_start =
                tree_start + u64::from(header.directory_length) + u64::from(extended.dummy0);
            if cursor.seek_to(hashes_start).is_ok() {
                archive_hashes = cursor.read_counted(
                    u64::from(extended.archive_hash_length / ARCHIVE_HASH_SIZE),
                    options.max_table_entries,
                    |c| c.read::<ArchiveHash>(),
                )?;
            }
        }

        Ok(Self {
            header: Some(header),
            extended_header,
            directory_items,
            archive_hashes,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    fn tree() -> SampleBuilder {
        SampleBuilder::new()
            .cstr("txt")
            .cstr("docs")
            .cstr("readme")
            .u32le(0xDEAD_BEEF)
            .u16le(2)
            .u16le(DIRECTORY_ARCHIVE_INDEX)
            .u32le(0)
            .u32le(10)
            .u16le(ENTRY_TERMINATOR)
            .bytes(b"hi")
            .cstr("license")
            .u32le(1)
            .u16le(0)
            .u16le(0)
            .u32le(10)
            .u32le(20)
            .u16le(ENTRY_TERMINATOR)
            .u8(0)
            .u8(0)
            .u8(0)
    }

    fn sample_v1() -> Vec<u8> {
        let tree = tree().build();
        SampleBuilder::new()
            .u32le(VPK_SIGNATURE)
            .u32le(1)
            .u32le(tree.len() as u32)
            .bytes(&tree)
            .build()
    }

    fn sample_v2() -> Vec<u8> {
        let tree = tree().build();
        SampleBuilder::new()
            .u32le(VPK_SIGNATURE)
            .u32le(2)
            .u32le(tree.len() as u32)
            .u32le(4)
            .u32le(ARCHIVE_HASH_SIZE)
            .u32le(0)
            .u32le(0)
            .bytes(&tree)
            .zeros(4)
            .u32le(0)
            .u32le(0)
            .u32le(512)
            .bytes(&[0xAB; 16])
            .build()
    }

    #[test]
    fn test_decode_v1() {
        let file = File::decode(&sample_v1(), 0).unwrap();
        assert!(file.extended_header.is_none());
        assert_eq!(file.directory_items.len(), 2);
        let first = &file.directory_items[0];
        assert_eq!(first.extension, "txt");
        assert_eq!(first.path, "docs");
        assert_eq!(first.name, "readme");
        assert_eq!(first.preload_data, b"hi");
        assert!(first.directory_entry.is_terminated());
        assert_eq!(file.directory_items[1].name, "license");
    }

    #[test]
    fn test_decode_v2() {
        let file = File::decode(&sample_v2(), 0).unwrap();
        assert_eq!(file.extended_header.as_ref().unwrap().dummy0, 4);
        assert_eq!(file.directory_items.len(), 2);
        assert_eq!(file.archive_hashes.len(), 1);
        assert_eq!(file.archive_hashes[0].length, 512);
    }

    #[test]
    fn test_truncated_tree_keeps_complete_items() {
        let data = sample_v1();
        let file = File::decode(&data[..60], 0).unwrap();
        assert_eq!(file.directory_items.len(), 1);
    }

    #[test]
    fn test_print() {
        let file = File::decode(&sample_v2(), 0).unwrap();
        let report = assert_idempotent(&file);
        assert!(report.contains("  Signature: 1437209140 (0x55AA1234)\n"));
        assert!(report.contains("    Preload data: 68 69\n"));
        assert!(report.contains("    Hash: AB AB"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = File::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No extended header"));
        assert!(report.contains("No directory items"));
        assert!(report.contains("No archive hashes"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<File>(&sample_v1());
        assert_truncation_safe::<File>(&sample_v2());
    }
}
