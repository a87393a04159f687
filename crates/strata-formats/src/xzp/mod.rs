//! Xbox package (XZP) support
//!
//! - **Header** (36 bytes): `piZx`, counts and the directory item locator
//! - **Directory Entries**: CRC, length and offset of every file
//! - **Preload Entries** and **Preload Mappings**
//! - **Directory Items**: CRC, name offset and creation time
//! - **Footer** (8 bytes): file length and `tFzX`

mod header;
mod print;

pub use header::{
    DirectoryEntry, DirectoryItem, DirectoryMapping, FOOTER_SIZE, Footer, Header,
    XZP_FOOTER_SIGNATURE, XZP_SIGNATURE,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Complete XZP package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// Package header
    pub header: Option<Header>,
    /// Directory entries
    pub directory_entries: Vec<DirectoryEntry>,
    /// Preload directory entries
    pub preload_directory_entries: Vec<DirectoryEntry>,
    /// Preload directory mappings
    pub preload_directory_mappings: Vec<DirectoryMapping>,
    /// Named directory items
    pub directory_items: Vec<DirectoryItem>,
    /// Package footer
    pub footer: Option<Footer>,
}

impl BinaryFormat for File {
    const NAME: &'static str = "Xbox Package";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;
        let limit = options.max_table_entries;

        // Entry tables follow the header back to back
        let mut directory_entries = Vec::new();
        let mut preload_directory_entries = Vec::new();
        let mut preload_directory_mappings = Vec::new();
        if cursor.seek_to(offset + u64::from(header.header_length)).is_ok() {
            directory_entries = cursor.read_counted(
                u64::from(header.directory_entry_count),
                limit,
                |c| c.read::<DirectoryEntry>(),
            )?;
            preload_directory_entries = cursor.read_counted(
                u64::from(header.preload_directory_entry_count),
                limit,
                |c| c.read::<DirectoryEntry>(),
            )?;
            preload_directory_mappings = cursor.read_counted(
                u64::from(header.preload_directory_entry_count),
                limit,
                |c| c.read::<DirectoryMapping>(),
            )?;
        }

        let mut directory_items = Vec::new();
        if header.directory_item_count > 0
            && cursor.seek_to(offset + u64::from(header.directory_item_offset)).is_ok()
        {
            directory_items = cursor.read_counted(
                u64::from(header.directory_item_count),
                limit,
                |c| DirectoryItem::read_from(c, offset),
            )?;
        }

        let footer = match (cursor.len() - offset).checked_sub(FOOTER_SIZE) {
            Some(relative) if cursor.seek_to(offset + relative).is_ok() => {
                recover("xzp footer", cursor.read::<Footer>())?
            }
            _ => None,
        };

        Ok(Self {
            header: Some(header),
            directory_entries,
            preload_directory_entries,
            preload_directory_mappings,
            directory_items,
            footer,
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
        let body = SampleBuilder::new()
            .bytes(&XZP_SIGNATURE)
            .u32le(6)
            .u32le(1)
            .u32le(2)
            .u32le(16)
            .u32le(36)
            .u32le(1)
            .u32le(74)
            .u32le(12)
            // directory entries
            .u32le(0x1111)
            .u32le(4)
            .u32le(120)
            .u32le(0x2222)
            .u32le(4)
            .u32le(124)
            // preload entry and mapping
            .u32le(0x1111)
            .u32le(4)
            .u32le(0)
            .u16le(0)
            // directory item at 74
            .u32le(0x1111)
            .u32le(86)
            .u32le(0x5F00_0000)
            .cstr("data.bin")
            .pad_to(128);
        let length = body.len() as u32 + 8;
        body.u32le(length).bytes(&XZP_FOOTER_SIGNATURE).build()
    }

    #[test]
    fn test_decode() {
        let file = File::decode(&sample(), 0).unwrap();
        assert_eq!(file.header.as_ref().unwrap().version, 6);
        assert_eq!(file.directory_entries.len(), 2);
        assert_eq!(file.directory_entries[1].entry_offset, 124);
        assert_eq!(file.preload_directory_entries.len(), 1);
        assert_eq!(file.preload_directory_mappings.len(), 1);
        assert_eq!(file.directory_items[0].name.as_deref(), Some("data.bin"));
        assert_eq!(file.footer.as_ref().unwrap().file_length, 136);
    }

    #[test]
    fn test_missing_footer() {
        let mut data = sample();
        let len = data.len();
        data[len - 1] = b'?';
        let file = File::decode(&data, 0).unwrap();
        assert!(file.footer.is_none());
        assert_eq!(file.directory_entries.len(), 2);
    }

    #[test]
    fn test_print() {
        let file = File::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&file);
        assert!(report.starts_with("Xbox Package File Information:\n"));
        assert!(report.contains("    Name: data.bin\n"));
        assert!(report.contains("  Signature: tFzX\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = File::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No directory entries"));
        assert!(report.contains("No footer"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<File>(&sample());
    }
}
