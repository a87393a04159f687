//! Half-Life package (PAK) support
//!
//! - **Header** (12 bytes): magic "PACK", directory offset, directory length
//! - **Directory**: 64-byte items (56-byte name, offset, length)

mod print;

use crate::cursor::{ByteCursor, Encoding};
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::BinRead;

/// Package magic
pub const PAK_MAGIC: [u8; 4] = *b"PACK";

/// Size of one directory item on disk
pub const DIRECTORY_ITEM_SIZE: u32 = 64;

/// Package header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Magic signature, always "PACK"
    #[br(assert(signature == PAK_MAGIC, "expected 'PACK', got {:?}", signature))]
    pub signature: [u8; 4],
    /// Offset of the directory, relative to the package start
    pub directory_offset: u32,
    /// Length of the directory in bytes
    pub directory_length: u32,
}

/// One directory item
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryItem {
    /// Item path
    #[br(map = |raw: [u8; 56]| Encoding::Latin1.decode_fixed(&raw))]
    pub item_name: String,
    /// Offset of the item data
    pub item_offset: u32,
    /// Length of the item data
    pub item_length: u32,
}

/// Complete package file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Package header
    pub header: Option<Header>,
    /// Directory items
    pub directory_items: Vec<DirectoryItem>,
}

impl BinaryFormat for Package {
    const NAME: &'static str = "Half-Life Package";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let count = header.directory_length / DIRECTORY_ITEM_SIZE;
        let directory_items = match cursor.seek_to(offset + u64::from(header.directory_offset)) {
            Ok(()) => cursor.read_counted(u64::from(count), options.max_table_entries, |c| {
                c.read::<DirectoryItem>()
            })?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            header: Some(header),
            directory_items,
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
            .bytes(b"PACK")
            .u32le(16)
            .u32le(128)
            .zeros(4)
            .text("maps/c1a0.bsp", 56)
            .u32le(144)
            .u32le(10)
            .text("sound/a.wav", 56)
            .u32le(154)
            .u32le(2)
            .zeros(12)
            .build()
    }

    #[test]
    fn test_decode_sample() {
        let package = Package::decode(&sample(), 0).unwrap();
        assert_eq!(package.directory_items.len(), 2);
        assert_eq!(package.directory_items[0].item_name, "maps/c1a0.bsp");
        assert_eq!(package.directory_items[1].item_offset, 154);
    }

    #[test]
    fn test_directory_past_end_is_empty() {
        let data = SampleBuilder::new()
            .bytes(b"PACK")
            .u32le(0x1000)
            .u32le(64)
            .build();
        let package = Package::decode(&data, 0).unwrap();
        assert!(package.directory_items.is_empty());
        assert!(package.report().contains("No directory items"));
    }

    #[test]
    fn test_print() {
        let package = Package::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&package);
        assert!(report.contains("  Directory offset: 16 (0x00000010)\n"));
        assert!(report.contains("  Directory Item 1\n    Item name: sound/a.wav\n"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Package>(&sample());
    }
}
