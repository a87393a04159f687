//! Quantum compressed archive support
//!
//! - **Header** (8 bytes): signature "DS", version, file count and the
//!   compression parameters
//! - **File list**: descriptors whose name and comment lengths take one
//!   byte, or two when the first byte's top bit is set
//! - **Compressed data**: starts right after the file list

mod header;
mod print;

pub use header::{FileDescriptor, Header, SIGNATURE, UNKNOWN_FIELD_MINOR_VERSION};

use crate::cursor::ByteCursor;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;

/// Complete archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Archive header
    pub header: Option<Header>,
    /// File descriptors
    pub file_list: Vec<FileDescriptor>,
    /// Absolute offset of the compressed stream, known once the whole list is read
    pub compressed_data_offset: Option<u64>,
}

impl BinaryFormat for Archive {
    const NAME: &'static str = "Quantum Archive";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let minor_version = header.minor_version;
        let file_list = cursor.read_counted(
            u64::from(header.file_count),
            options.max_table_entries,
            |c| c.read_with::<FileDescriptor>(Endian::Little, (minor_version,)),
        )?;

        let compressed_data_offset =
            (file_list.len() == usize::from(header.file_count)).then(|| cursor.position());

        Ok(Self {
            header: Some(header),
            file_list,
            compressed_data_offset,
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

    fn sample(minor_version: u8) -> Vec<u8> {
        let long_name = "n".repeat(200);
        let mut builder = SampleBuilder::new()
            .bytes(b"DS")
            .u8(0)
            .u8(minor_version)
            .u16le(2)
            .u8(20)
            .u8(0);
        // One-byte lengths
        builder = builder.u8(5).bytes(b"a.txt").u8(2).bytes(b"hi").u32le(100).u16le(1).u16le(2);
        if minor_version >= UNKNOWN_FIELD_MINOR_VERSION {
            builder = builder.u16le(0xBEEF);
        }
        // Two-byte name length: 0x80 | 0x00, 200
        builder = builder
            .u8(0x80)
            .u8(200)
            .bytes(long_name.as_bytes())
            .u8(0)
            .u32le(7)
            .u16le(3)
            .u16le(4);
        if minor_version >= UNKNOWN_FIELD_MINOR_VERSION {
            builder = builder.u16le(0xCAFE);
        }
        builder.bytes(&[0x5A; 4]).build()
    }

    #[test]
    fn test_decode_old_minor_version() {
        let data = sample(21);
        let archive = Archive::decode(&data, 0).unwrap();
        assert_eq!(archive.file_list.len(), 2);
        let first = &archive.file_list[0];
        assert_eq!(first.file_name, "a.txt");
        assert_eq!(first.comment_field, "hi");
        assert_eq!(first.expanded_file_size, 100);
        assert!(first.unknown.is_none());
        assert_eq!(archive.file_list[1].file_name_size, 200);
        assert_eq!(archive.file_list[1].file_name.len(), 200);
        assert_eq!(archive.compressed_data_offset, Some(data.len() as u64 - 4));
    }

    #[test]
    fn test_decode_unknown_field_from_minor_22() {
        let data = sample(22);
        let archive = Archive::decode(&data, 0).unwrap();
        assert_eq!(archive.file_list[0].unknown, Some(0xBEEF));
        assert_eq!(archive.file_list[1].unknown, Some(0xCAFE));
        assert_eq!(archive.compressed_data_offset, Some(data.len() as u64 - 4));
    }

    #[test]
    fn test_truncated_list_has_no_data_offset() {
        let data = sample(22);
        let archive = Archive::decode(&data[..30], 0).unwrap();
        assert_eq!(archive.file_list.len(), 1);
        assert!(archive.compressed_data_offset.is_none());
    }

    #[test]
    fn test_bad_signature_fails() {
        let mut data = sample(22);
        data[1] = b'X';
        assert!(Archive::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let archive = Archive::decode(&sample(22), 0).unwrap();
        let report = assert_idempotent(&archive);
        assert!(report.contains("  Signature: DS\n"));
        assert!(report.contains("    File name: a.txt\n"));
        assert!(report.contains("    Comment: [EMPTY]\n"));
        assert!(report.contains("    Unknown: 51966 (0xCAFE)\n"));

        let archive = Archive::decode(&sample(21), 0).unwrap();
        assert!(archive.report().contains("    Unknown: [NULL]\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Archive::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No files"));
        assert!(report.contains("Compressed data offset: [NULL]"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Archive>(&sample(22));
    }
}
