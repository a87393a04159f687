//! NE entry and name tables

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::Endian;

/// Segment indicator of a bundle of unused entries
pub const UNUSED_SEGMENT: u8 = 0x00;

/// Segment indicator of a bundle of movable entries
pub const MOVABLE_SEGMENT: u8 = 0xFF;

/// One entry point, shaped by the bundle's segment indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Entry in a fixed segment (3 bytes)
    Fixed {
        /// Entry flags
        flag_word: u8,
        /// Offset inside the segment
        offset: u16,
    },
    /// Entry in a movable segment (6 bytes)
    Movable {
        /// Entry flags
        flag_word: u8,
        /// `INT 3Fh` instruction
        int3f: u16,
        /// Segment number
        segment_number: u8,
        /// Offset inside the segment
        offset: u16,
    },
}

/// Run of entries sharing a segment indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTableBundle {
    /// Number of entries in the bundle
    pub entry_count: u8,
    /// `0x00` unused, `0xFF` movable, otherwise the fixed segment number
    pub segment_indicator: u8,
    /// Entries, empty for unused bundles
    pub entries: Vec<Entry>,
}

impl EntryTableBundle {
    /// Read one bundle, `None` at the terminating zero count
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        let entry_count = cursor.read_u8()?;
        if entry_count == 0 {
            return Ok(None);
        }
        let segment_indicator = cursor.read_u8()?;
        let mut entries = Vec::with_capacity(usize::from(entry_count));
        if segment_indicator != UNUSED_SEGMENT {
            for _ in 0..entry_count {
                let flag_word = cursor.read_u8()?;
                let entry = if segment_indicator == MOVABLE_SEGMENT {
                    Entry::Movable {
                        flag_word,
                        int3f: cursor.read_u16_le()?,
                        segment_number: cursor.read_u8()?,
                        offset: cursor.read_u16_le()?,
                    }
                } else {
                    Entry::Fixed {
                        flag_word,
                        offset: cursor.read_u16_le()?,
                    }
                };
                entries.push(entry);
            }
        }
        Ok(Some(Self {
            entry_count,
            segment_indicator,
            entries,
        }))
    }
}

/// Resident or non-resident name table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTableEntry {
    /// Length of the name
    pub length: u8,
    /// Name
    pub name: String,
    /// Ordinal of the exported entry
    pub ordinal_number: u16,
}

impl NameTableEntry {
    /// Read one entry, `None` at the terminating zero length
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        Self::read_endian(cursor, Endian::Little)
    }

    /// Like [`NameTableEntry::read_from`], with the ordinal in `endian` order
    pub(crate) fn read_endian(cursor: &mut ByteCursor<'_>, endian: Endian) -> Result<Option<Self>> {
        let length = cursor.read_u8()?;
        if length == 0 {
            return Ok(None);
        }
        let name = cursor.read_fixed_string(u64::from(length), Encoding::Ascii)?;
        let ordinal_number = cursor.read_u16(endian)?;
        Ok(Some(Self {
            length,
            name,
            ordinal_number,
        }))
    }
}
