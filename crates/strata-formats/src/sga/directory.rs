//! SGA section, folder and file records

use super::header::read_index;
use crate::cursor::Encoding;
use binrw::{BinRead, BinResult, Endian};
use std::io::{Read, Seek};

/// Section record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Short alias, such as `data`
    pub alias: String,
    /// Display name
    pub name: String,
    /// First folder of the section
    pub folder_start_index: u32,
    /// One past the last folder
    pub folder_end_index: u32,
    /// First file of the section
    pub file_start_index: u32,
    /// One past the last file
    pub file_end_index: u32,
    /// Root folder of the section
    pub folder_root_index: u32,
}

impl BinRead for Section {
    type Args<'a> = (u16,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        (major_version,): Self::Args<'_>,
    ) -> BinResult<Self> {
        let alias = <[u8; 64]>::read_options(reader, Endian::Little, ())?;
        let name = <[u8; 64]>::read_options(reader, Endian::Little, ())?;
        Ok(Self {
            alias: Encoding::Ascii.decode_fixed(&alias),
            name: Encoding::Ascii.decode_fixed(&name),
            folder_start_index: read_index(reader, major_version)?,
            folder_end_index: read_index(reader, major_version)?,
            file_start_index: read_index(reader, major_version)?,
            file_end_index: read_index(reader, major_version)?,
            folder_root_index: read_index(reader, major_version)?,
        })
    }
}

/// Folder record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Offset of the name in the string table
    pub name_offset: u32,
    /// First child folder
    pub folder_start_index: u32,
    /// One past the last child folder
    pub folder_end_index: u32,
    /// First file
    pub file_start_index: u32,
    /// One past the last file
    pub file_end_index: u32,
}

impl BinRead for Folder {
    type Args<'a> = (u16,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        (major_version,): Self::Args<'_>,
    ) -> BinResult<Self> {
        Ok(Self {
            name_offset: u32::read_options(reader, Endian::Little, ())?,
            folder_start_index: read_index(reader, major_version)?,
            folder_end_index: read_index(reader, major_version)?,
            file_start_index: read_index(reader, major_version)?,
            file_end_index: read_index(reader, major_version)?,
        })
    }
}

/// Fields shared by every file record version
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FileCommon {
    /// Offset of the name in the string table
    pub name_offset: u32,
    /// Offset of the data, relative to the file data offset
    pub offset: u32,
    /// Stored size
    pub size_on_disk: u32,
    /// Uncompressed size
    pub size: u32,
    /// Modification time
    pub time_modified: u32,
    /// Unused
    pub dummy0: u8,
    /// Storage type
    pub file_type: u8,
}

/// File record, shaped by the major version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Versions 4 and 5
    V4(FileCommon),
    /// Version 6, adds a CRC
    V6 {
        /// Shared fields
        common: FileCommon,
        /// CRC32 of the data
        crc32: u32,
    },
    /// Version 7, adds a CRC and a hash offset
    V7 {
        /// Shared fields
        common: FileCommon,
        /// CRC32 of the data
        crc32: u32,
        /// Offset of the data hash
        hash_offset: u32,
    },
}

impl FileEntry {
    /// Fields present in every version
    pub fn common(&self) -> &FileCommon {
        match self {
            Self::V4(common) | Self::V6 { common, .. } | Self::V7 { common, .. } => common,
        }
    }
}

impl BinRead for FileEntry {
    type Args<'a> = (u16,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        (major_version,): Self::Args<'_>,
    ) -> BinResult<Self> {
        let common = FileCommon::read_options(reader, endian, ())?;
        Ok(match major_version {
            6 => Self::V6 {
                common,
                crc32: u32::read_options(reader, Endian::Little, ())?,
            },
            7 => Self::V7 {
                common,
                crc32: u32::read_options(reader, Endian::Little, ())?,
                hash_offset: u32::read_options(reader, Endian::Little, ())?,
            },
            _ => Self::V4(common),
        })
    }
}
