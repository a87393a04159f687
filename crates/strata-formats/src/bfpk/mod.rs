//! BFPK archive support
//!
//! BFPK archives are a flat header followed by a file table. Each table
//! entry points at a data block that starts with the block's compressed size.
//!
//! - **Header** (12 bytes): magic "BFPK", version, file count
//! - **File Table**: length-prefixed names, uncompressed size, data offset

mod header;
mod print;

pub use header::{BFPK_MAGIC, FileEntry, Header};

use crate::cursor::ByteCursor;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Complete BFPK archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Archive header
    pub header: Option<Header>,
    /// File table, in on-disk order
    pub files: Vec<FileEntry>,
}

impl BinaryFormat for Archive {
    const NAME: &'static str = "BFPK";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let count = u64::try_from(header.files).unwrap_or(0);
        let files = cursor.read_counted(count, options.max_table_entries, |c| {
            FileEntry::read_from(c, offset)
        })?;

        Ok(Self {
            header: Some(header),
            files,
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

    fn sample() -> Vec<u8> {
        SampleBuilder::new()
            .bytes(b"BFPK")
            .u32le(1)
            .u32le(2)
            // entry 0: data at 48
            .u32le(5)
            .bytes(b"a.bin")
            .u32le(100)
            .u32le(48)
            // entry 1: data past the end
            .u32le(1)
            .bytes(b"b")
            .u32le(7)
            .u32le(0x1000)
            .pad_to(48)
            .u32le(64)
            .build()
    }

    #[test]
    fn test_decode_sample() {
        let archive = Archive::decode(&sample(), 0).unwrap();
        let header = archive.header.as_ref().unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(archive.files.len(), 2);
        assert_eq!(archive.files[0].name, "a.bin");
        assert_eq!(archive.files[0].compressed_size, Some(64));
        assert_eq!(archive.files[1].compressed_size, None);
    }

    #[test]
    fn test_bad_magic_fails() {
        let mut data = sample();
        data[0] = b'X';
        assert!(Archive::decode(&data, 0).is_err());
    }

    #[test]
    fn test_truncated_table_keeps_prefix() {
        let data = sample();
        let archive = Archive::decode(&data[..30], 0).unwrap();
        assert_eq!(archive.files.len(), 1);
    }

    #[test]
    fn test_print() {
        let archive = Archive::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&archive);
        assert!(report.starts_with("BFPK Information:\n"));
        assert!(report.contains("  Magic: BFPK\n"));
        assert!(report.contains("    Name: a.bin\n"));
        assert!(report.contains("    Compressed size: [NULL]\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Archive::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No file table items"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Archive>(&sample());
    }
}
