//! Quantum archive header and file descriptors

use crate::cursor::Encoding;
use binrw::{BinRead, BinReaderExt, BinResult, Endian};

/// Signature at the start of every archive
pub const SIGNATURE: [u8; 2] = *b"DS";

/// First minor version whose file descriptors carry the trailing word
pub const UNKNOWN_FIELD_MINOR_VERSION: u8 = 22;

/// Archive header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Signature, always `DS`
    #[br(assert(signature == SIGNATURE, "expected DS, got {:?}", signature))]
    pub signature: [u8; 2],
    /// Major version
    pub major_version: u8,
    /// Minor version
    pub minor_version: u8,
    /// Number of files
    pub file_count: u16,
    /// Compression table size
    pub table_size: u8,
    /// Compression flags
    pub compression_flags: u8,
}

/// Length stored in one byte, or two when the top bit of the first is set
fn parse_variable_length<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    _endian: Endian,
    _args: (),
) -> BinResult<u16> {
    let first = reader.read_le::<u8>()?;
    if first & 0x80 == 0 {
        return Ok(u16::from(first));
    }
    let second = reader.read_le::<u8>()?;
    Ok((u16::from(first & 0x7F) << 8) | u16::from(second))
}

/// File descriptor
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(minor_version: u8))]
pub struct FileDescriptor {
    /// Length of the file name
    #[br(parse_with = parse_variable_length)]
    pub file_name_size: u16,
    /// File name
    #[br(count = file_name_size, map = |raw: Vec<u8>| Encoding::Latin1.decode(&raw))]
    pub file_name: String,
    /// Length of the comment
    #[br(parse_with = parse_variable_length)]
    pub comment_field_size: u16,
    /// Comment
    #[br(count = comment_field_size, map = |raw: Vec<u8>| Encoding::Latin1.decode(&raw))]
    pub comment_field: String,
    /// Uncompressed size
    pub expanded_file_size: u32,
    /// MS-DOS time
    pub file_time: u16,
    /// MS-DOS date
    pub file_date: u16,
    /// Unknown, present from minor version 22
    #[br(if(minor_version >= UNKNOWN_FIELD_MINOR_VERSION))]
    pub unknown: Option<u16>,
}
