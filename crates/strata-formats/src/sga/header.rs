//! SGA archive headers
//!
//! Versions 4 and 5 carry MD5 digests of the file and of the header,
//! versions 6 and 7 drop them. The directory header that follows stores its
//! counts as 16-bit values in version 4 and as 32-bit values afterwards.

use crate::cursor::Encoding;
use binrw::{BinRead, BinResult, Endian};
use std::io::{Read, Seek};

/// Archive signature
pub const SGA_SIGNATURE: [u8; 8] = *b"_ARCHIVE";

fn read_name<R: Read + Seek>(reader: &mut R) -> BinResult<String> {
    let raw = <[u8; 128]>::read_options(reader, Endian::Little, ())?;
    Ok(Encoding::Utf16Le.decode_fixed(&raw))
}

/// Version-specific part of the archive header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderVersion {
    /// Versions 4 and 5
    V4 {
        /// MD5 of the whole file
        file_md5: [u8; 16],
        /// Archive name
        name: String,
        /// MD5 of the header
        header_md5: [u8; 16],
        /// Length of the header data
        header_length: u32,
        /// Offset of the file data
        file_data_offset: u32,
        /// Unused
        dummy0: u32,
    },
    /// Versions 6 and 7
    V6 {
        /// Archive name
        name: String,
        /// Length of the header data
        header_length: u32,
        /// Offset of the file data
        file_data_offset: u32,
        /// Unused
        dummy0: u32,
    },
}

/// Archive header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Signature, always `_ARCHIVE`
    pub signature: [u8; 8],
    /// Major version, 4 to 7
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Version-specific fields
    pub version: HeaderVersion,
}

impl Header {
    /// Size of the header on disk
    pub fn size(&self) -> u64 {
        match self.version {
            HeaderVersion::V4 { .. } => 184,
            HeaderVersion::V6 { .. } => 152,
        }
    }
}

impl BinRead for Header {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let start = reader.stream_position()?;
        let signature = <[u8; 8]>::read_options(reader, Endian::Little, ())?;
        if signature != SGA_SIGNATURE {
            return Err(binrw::Error::AssertFail {
                pos: start,
                message: format!("expected _ARCHIVE, got {signature:?}"),
            });
        }
        let major_version = u16::read_options(reader, Endian::Little, ())?;
        let minor_version = u16::read_options(reader, Endian::Little, ())?;

        let version = match major_version {
            4 | 5 => {
                let file_md5 = <[u8; 16]>::read_options(reader, Endian::Little, ())?;
                let name = read_name(reader)?;
                let header_md5 = <[u8; 16]>::read_options(reader, Endian::Little, ())?;
                HeaderVersion::V4 {
                    file_md5,
                    name,
                    header_md5,
                    header_length: u32::read_options(reader, Endian::Little, ())?,
                    file_data_offset: u32::read_options(reader, Endian::Little, ())?,
                    dummy0: u32::read_options(reader, Endian::Little, ())?,
                }
            }
            6 | 7 => HeaderVersion::V6 {
                name: read_name(reader)?,
                header_length: u32::read_options(reader, Endian::Little, ())?,
                file_data_offset: u32::read_options(reader, Endian::Little, ())?,
                dummy0: u32::read_options(reader, Endian::Little, ())?,
            },
            other => {
                return Err(binrw::Error::AssertFail {
                    pos: start,
                    message: format!("unsupported SGA major version {other}"),
                });
            }
        };

        Ok(Self {
            signature,
            major_version,
            minor_version,
            version,
        })
    }
}

/// Directory header, counts widened to 32 bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHeader {
    /// Offset of the section table, relative to the directory header
    pub section_offset: u32,
    /// Number of sections
    pub section_count: u32,
    /// Offset of the folder table
    pub folder_offset: u32,
    /// Number of folders
    pub folder_count: u32,
    /// Offset of the file table
    pub file_offset: u32,
    /// Number of files
    pub file_count: u32,
    /// Offset of the string table
    pub string_table_offset: u32,
    /// Number of strings
    pub string_table_count: u32,
}

/// Read a count that is 16 bits wide in version 4 and 32 bits later
pub(crate) fn read_index<R: Read + Seek>(reader: &mut R, major_version: u16) -> BinResult<u32> {
    if major_version == 4 {
        u16::read_options(reader, Endian::Little, ()).map(u32::from)
    } else {
        u32::read_options(reader, Endian::Little, ())
    }
}

impl BinRead for DirectoryHeader {
    type Args<'a> = (u16,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        (major_version,): Self::Args<'_>,
    ) -> BinResult<Self> {
        let pair = |reader: &mut R| -> BinResult<(u32, u32)> {
            let offset = u32::read_options(reader, Endian::Little, ())?;
            let count = read_index(reader, major_version)?;
            Ok((offset, count))
        };
        let (section_offset, section_count) = pair(reader)?;
        let (folder_offset, folder_count) = pair(reader)?;
        let (file_offset, file_count) = pair(reader)?;
        let (string_table_offset, string_table_count) = pair(reader)?;
        Ok(Self {
            section_offset,
            section_count,
            folder_offset,
            folder_count,
            file_offset,
            file_count,
            string_table_offset,
            string_table_count,
        })
    }
}
