//! VPK directory tree
//!
//! The tree is three nested levels of NUL-terminated strings: extension,
//! path, then file name. An empty string closes the current level. Every
//! file name is followed by a fixed entry record and its preload bytes.

use super::header::ENTRY_TERMINATOR;
use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;
use tracing::trace;

/// Fixed record stored after every file name (18 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DirectoryEntry {
    /// CRC32 of the file data
    pub crc: u32,
    /// Number of preload bytes stored inline after the record
    pub preload_bytes: u16,
    /// Archive holding the file data
    pub archive_index: u16,
    /// Offset of the file data in its archive
    pub entry_offset: u32,
    /// Length of the file data in its archive
    pub entry_length: u32,
    /// Terminator, always `0xFFFF`
    pub dummy0: u16,
}

impl DirectoryEntry {
    /// Whether the record ends with the expected terminator
    pub fn is_terminated(&self) -> bool {
        self.dummy0 == ENTRY_TERMINATOR
    }
}

/// One file in the directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryItem {
    /// File extension
    pub extension: String,
    /// Directory path
    pub path: String,
    /// File name without extension
    pub name: String,
    /// Location record
    pub directory_entry: DirectoryEntry,
    /// Inline preload bytes
    pub preload_data: Vec<u8>,
}

/// Walk the tree, keeping every item read before a failure
pub(crate) fn read_tree(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<Vec<DirectoryItem>> {
    let mut items = Vec::new();
    match walk(cursor, limit, &mut items) {
        Ok(()) => {}
        Err(err) if err.is_recoverable() => {
            trace!(read = items.len(), %err, "directory tree ended early");
        }
        Err(err) => return Err(err),
    }
    Ok(items)
}

fn walk(cursor: &mut ByteCursor<'_>, limit: usize, items: &mut Vec<DirectoryItem>) -> Result<()> {
    loop {
        let extension = cursor.read_cstring(Encoding::Utf8)?;
        if extension.is_empty() {
            return Ok(());
        }
        loop {
            let path = cursor.read_cstring(Encoding::Utf8)?;
            if path.is_empty() {
                break;
            }
            loop {
                let name = cursor.read_cstring(Encoding::Utf8)?;
                if name.is_empty() {
                    break;
                }
                if items.len() >= limit {
                    return Ok(());
                }
                let directory_entry: DirectoryEntry = cursor.read()?;
                let preload_data = cursor.read_bytes(u64::from(directory_entry.preload_bytes))?;
                items.push(DirectoryItem {
                    extension: extension.clone(),
                    path: path.clone(),
                    name,
                    directory_entry,
                    preload_data,
                });
            }
        }
    }
}
