//! PlayJ audio file and playlist support
//!
//! - **Audio file**: signature `FF 9D 53 4B`, a version-keyed header
//!   (0 or 10) with length-prefixed metadata strings, an unknown
//!   length-prefixed block and, for version 10, a table of embedded files
//! - **Playlist**: track count, 52 opaque bytes, then the audio file
//!   headers of every track back to back

mod header;
mod print;

pub use header::{
    AudioHeader, AudioHeaderV1, AudioHeaderV2, DataFile, PLAYLIST_DATA_SIZE, PlaylistHeader,
    SIGNATURE, TrackStrings, UnknownBlock, VERSION_1, VERSION_2,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Complete audio file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioFile {
    /// Audio header
    pub header: Option<AudioHeader>,
    /// Block following the header
    pub unknown_block_1: Option<UnknownBlock>,
    /// Number of embedded files, version 10 only
    pub data_files_count: Option<u32>,
    /// Embedded files, version 10 only
    pub data_files: Vec<DataFile>,
}

impl AudioFile {
    /// Read one audio file at the cursor, leaving the cursor after it
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, options: &DecodeOptions) -> Result<Self> {
        let header: AudioHeader = cursor.read()?;
        let unknown_block_1 = recover("playj unknown block", cursor.read::<UnknownBlock>())?;

        let mut data_files_count = None;
        let mut data_files = Vec::new();
        if matches!(header, AudioHeader::V2(_)) && unknown_block_1.is_some() {
            data_files_count = recover("playj data file count", cursor.read_u32_le())?;
            if let Some(count) = data_files_count {
                data_files = cursor.read_counted(u64::from(count), options.max_table_entries, |c| {
                    c.read::<DataFile>()
                })?;
            }
        }

        Ok(Self {
            header: Some(header),
            unknown_block_1,
            data_files_count,
            data_files,
        })
    }
}

impl BinaryFormat for AudioFile {
    const NAME: &'static str = "PlayJ Audio File";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        Self::read(&mut cursor, options)
    }

    fn print(&self, builder: &mut String) {
        print::print_audio_file(builder, self);
    }
}

/// Complete playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    /// Playlist header
    pub header: Option<PlaylistHeader>,
    /// One audio file per track
    pub audio_files: Vec<AudioFile>,
}

impl BinaryFormat for Playlist {
    const NAME: &'static str = "PlayJ Playlist";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: PlaylistHeader = cursor.read()?;
        let audio_files = cursor.read_counted(
            u64::from(header.track_count),
            options.max_table_entries,
            |c| AudioFile::read(c, options),
        )?;

        Ok(Self {
            header: Some(header),
            audio_files,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print_playlist(builder, self);
    }
}
