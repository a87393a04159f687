//! Relic SGA archive support
//!
//! - **Header**: `_ARCHIVE`, version, then the version-specific fields
//! - **Directory Header**: offset/count pairs, relative to its own start
//! - **Sections**, **Folders**, **Files**
//! - **String Table**: names, looked up by the folder and file name offsets

mod directory;
mod header;
mod print;

pub use directory::{FileCommon, FileEntry, Folder, Section};
pub use header::{DirectoryHeader, Header, HeaderVersion, SGA_SIGNATURE};

use crate::cursor::{ByteCursor, Encoding};
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;
use std::collections::BTreeMap;

/// Complete SGA archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Archive header
    pub header: Option<Header>,
    /// Directory header
    pub directory_header: Option<DirectoryHeader>,
    /// Sections
    pub sections: Vec<Section>,
    /// Folders
    pub folders: Vec<Folder>,
    /// Files
    pub files: Vec<FileEntry>,
    /// Names keyed by their offset in the string table
    pub string_table: BTreeMap<u32, String>,
}

impl Archive {
    /// Name stored at `name_offset`, if it was read
    pub fn name(&self, name_offset: u32) -> Option<&str> {
        self.string_table.get(&name_offset).map(String::as_str)
    }
}

impl BinaryFormat for Archive {
    const NAME: &'static str = "SGA";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;
        let major = header.major_version;
        let limit = options.max_table_entries;

        let base = offset + header.size();
        let Some(directory_header) = recover(
            "sga directory header",
            cursor.read_with::<DirectoryHeader>(Endian::Little, (major,)),
        )?
        else {
            return Ok(Self {
                header: Some(header),
                ..Self::default()
            });
        };

        let mut sections = Vec::new();
        if cursor.seek_to(base + u64::from(directory_header.section_offset)).is_ok() {
            sections = cursor.read_counted(
                u64::from(directory_header.section_count),
                limit,
                |c| c.read_with::<Section>(Endian::Little, (major,)),
            )?;
        }

        let mut folders = Vec::new();
        if cursor.seek_to(base + u64::from(directory_header.folder_offset)).is_ok() {
            folders = cursor.read_counted(
                u64::from(directory_header.folder_count),
                limit,
                |c| c.read_with::<Folder>(Endian::Little, (major,)),
            )?;
        }

        let mut files = Vec::new();
        if cursor.seek_to(base + u64::from(directory_header.file_offset)).is_ok() {
            files = cursor.read_counted(
                u64::from(directory_header.file_count),
                limit,
                |c| c.read_with::<FileEntry>(Endian::Little, (major,)),
            )?;
        }

        let strings_base = base + u64::from(directory_header.string_table_offset);
        let name_offsets = folders
            .iter()
            .map(|folder| folder.name_offset)
            .chain(files.iter().map(|file| file.common().name_offset));
        let mut string_table = BTreeMap::new();
        for name_offset in name_offsets {
            if string_table.contains_key(&name_offset) {
                continue;
            }
            let name = cursor
                .seek_to(strings_base + u64::from(name_offset))
                .and_then(|()| cursor.read_cstring(Encoding::Ascii));
            if let Some(name) = recover("sga name", name)? {
                string_table.insert(name_offset, name);
            }
        }

        Ok(Self {
            header: Some(header),
            directory_header: Some(directory_header),
            sections,
            folders,
            files,
            string_table,
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

    fn utf16_name(text: &str) -> Vec<u8> {
        let mut raw: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        raw.resize(128, 0);
        raw
    }

    /// Version 7 archive: one section, one folder, one file, two names
    fn sample_v7() -> Vec<u8> {
        // Directory header at 152; tables follow its 32 bytes
        SampleBuilder::new()
            .bytes(&SGA_SIGNATURE)
            .u16le(7)
            .u16le(0)
            .bytes(&utf16_name("test archive"))
            .u32le(0)
            .u32le(0)
            .u32le(0)
            // directory header
            .u32le(32)
            .u32le(1)
            .u32le(32 + 148)
            .u32le(1)
            .u32le(32 + 148 + 20)
            .u32le(1)
            .u32le(32 + 148 + 20 + 30)
            .u32le(2)
            // section
            .text("data", 64)
            .text("All data", 64)
            .u32le(0)
            .u32le(1)
            .u32le(0)
            .u32le(1)
            .u32le(0)
            // folder
            .u32le(0)
            .u32le(0)
            .u32le(0)
            .u32le(0)
            .u32le(1)
            // file
            .u32le(5)
            .u32le(0)
            .u32le(3)
            .u32le(3)
            .u32le(0x5000_0000)
            .u8(0)
            .u8(0)
            .u32le(0xCAFE_F00D)
            .u32le(0)
            // string table
            .cstr("root")
            .cstr("a.txt")
            .build()
    }

    fn sample_v4() -> Vec<u8> {
        SampleBuilder::new()
            .bytes(&SGA_SIGNATURE)
            .u16le(4)
            .u16le(0)
            .bytes(&[0x11; 16])
            .bytes(&utf16_name("old"))
            .bytes(&[0x22; 16])
            .u32le(0)
            .u32le(0)
            .u32le(0)
            // directory header with 16-bit counts
            .u32le(24)
            .u16le(0)
            .u32le(24)
            .u16le(1)
            .u32le(36)
            .u16le(0)
            .u32le(36)
            .u16le(0)
            // folder
            .u32le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .cstr("root")
            .build()
    }

    #[test]
    fn test_decode_v7() {
        let archive = Archive::decode(&sample_v7(), 0).unwrap();
        let header = archive.header.as_ref().unwrap();
        assert!(matches!(&header.version, HeaderVersion::V6 { name, .. } if name == "test archive"));
        assert_eq!(archive.sections[0].alias, "data");
        assert_eq!(archive.folders.len(), 1);
        assert!(matches!(
            archive.files[0],
            FileEntry::V7 {
                crc32: 0xCAFE_F00D,
                ..
            }
        ));
        assert_eq!(archive.name(0), Some("root"));
        assert_eq!(archive.name(5), Some("a.txt"));
    }

    #[test]
    fn test_decode_v4_uses_short_counts() {
        let archive = Archive::decode(&sample_v4(), 0).unwrap();
        let header = archive.header.as_ref().unwrap();
        assert!(matches!(header.version, HeaderVersion::V4 { file_md5, .. } if file_md5 == [0x11; 16]));
        let directory = archive.directory_header.as_ref().unwrap();
        assert_eq!(directory.folder_count, 1);
        assert_eq!(archive.folders.len(), 1);
        assert_eq!(archive.name(0), Some("root"));
    }

    #[test]
    fn test_bad_signature_fails() {
        let mut data = sample_v7();
        data[0] = b'X';
        assert!(Archive::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let archive = Archive::decode(&sample_v7(), 0).unwrap();
        let report = assert_idempotent(&archive);
        assert!(report.contains("  Name: test archive\n"));
        assert!(report.contains("    Name: a.txt\n"));
        assert!(report.contains("    Hash offset: 0 (0x00000000)\n"));
        assert!(!report.contains("File MD5"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Archive::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No directory header"));
        assert!(report.contains("No files"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Archive>(&sample_v7());
        assert_truncation_safe::<Archive>(&sample_v4());
    }
}
