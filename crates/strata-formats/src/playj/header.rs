//! PlayJ audio headers and the records around them

use crate::cursor::Encoding;
use binrw::{BinRead, BinReaderExt, BinResult, Endian};

/// Signature at the start of every audio file (`FF 9D 53 4B`)
pub const SIGNATURE: u32 = 0x4B53_9DFF;

/// Version value of the first header layout
pub const VERSION_1: u32 = 0;
/// Version value of the second header layout
pub const VERSION_2: u32 = 10;

/// Size of the opaque playlist header payload
pub const PLAYLIST_DATA_SIZE: usize = 52;

fn parse_prefixed_string<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    _endian: Endian,
    _args: (),
) -> BinResult<String> {
    let length = reader.read_le::<u16>()?;
    let mut bytes = vec![0; usize::from(length)];
    reader.read_exact(&mut bytes)?;
    Ok(Encoding::Latin1.decode(&bytes))
}

/// Track metadata strings, each prefixed with a 16-bit length
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct TrackStrings {
    /// Track title
    #[br(parse_with = parse_prefixed_string)]
    pub track: String,
    /// Artist
    #[br(parse_with = parse_prefixed_string)]
    pub artist: String,
    /// Album
    #[br(parse_with = parse_prefixed_string)]
    pub album: String,
    /// Writer
    #[br(parse_with = parse_prefixed_string)]
    pub writer: String,
    /// Publisher
    #[br(parse_with = parse_prefixed_string)]
    pub publisher: String,
    /// Label
    #[br(parse_with = parse_prefixed_string)]
    pub label: String,
    /// Comments
    #[br(parse_with = parse_prefixed_string)]
    pub comments: String,
}

/// First audio header layout
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct AudioHeaderV1 {
    /// Signature
    #[br(assert(signature == SIGNATURE))]
    pub signature: u32,
    /// Version, always 0
    #[br(assert(version == VERSION_1))]
    pub version: u32,
    /// Track ID
    pub track_id: u32,
    /// Unknown offset
    pub unknown_offset_1: u32,
    /// Unknown offset
    pub unknown_offset_2: u32,
    /// Unknown offset
    pub unknown_offset_3: u32,
    /// Unknown
    pub unknown_1: u32,
    /// Unknown
    pub unknown_2: u32,
    /// Release year
    pub year: u32,
    /// Metadata strings
    pub strings: TrackStrings,
}

/// Second audio header layout
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct AudioHeaderV2 {
    /// Signature
    #[br(assert(signature == SIGNATURE))]
    pub signature: u32,
    /// Version, always 10
    #[br(assert(version == VERSION_2))]
    pub version: u32,
    /// Unknown words
    pub unknown: [u32; 8],
    /// Track ID
    pub track_id: u32,
    /// Unknown offset
    pub unknown_offset_1: u32,
    /// Unknown offset
    pub unknown_offset_2: u32,
    /// Release year
    pub year: u32,
    /// Track number
    pub track_number: u32,
    /// Metadata strings
    pub strings: TrackStrings,
}

/// Audio header, keyed by the version field
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub enum AudioHeader {
    /// Version 0
    V1(AudioHeaderV1),
    /// Version 10
    V2(AudioHeaderV2),
}

impl AudioHeader {
    /// Version field
    pub fn version(&self) -> u32 {
        match self {
            Self::V1(header) => header.version,
            Self::V2(header) => header.version,
        }
    }

    /// Metadata strings
    pub fn strings(&self) -> &TrackStrings {
        match self {
            Self::V1(header) => &header.strings,
            Self::V2(header) => &header.strings,
        }
    }
}

/// Length-prefixed block of unknown purpose
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct UnknownBlock {
    /// Length of the data
    pub length: u32,
    /// Block data
    #[br(count = length)]
    pub data: Vec<u8>,
}

/// File embedded in a version 10 audio file
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DataFile {
    /// File name
    #[br(parse_with = parse_prefixed_string)]
    pub file_name: String,
    /// Length of the file data
    pub data_length: u32,
    /// File data
    #[br(count = data_length)]
    pub data: Vec<u8>,
}

/// Playlist header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct PlaylistHeader {
    /// Number of audio files that follow
    pub track_count: u32,
    /// Opaque header payload
    pub data: [u8; PLAYLIST_DATA_SIZE],
}
