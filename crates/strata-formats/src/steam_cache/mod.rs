//! Directory and checksum structures shared by the Steam cache formats
//!
//! GCF and NCF files both carry a directory section (header, entries, a
//! name blob and four index lists) and a checksum section (header, map
//! header, map entries and checksums). The sections are stored back to
//! back, so a section that cannot be read completely ends the decode.

mod header;
pub(crate) mod print;

pub use header::{
    ChecksumHeader, ChecksumMapEntry, ChecksumMapHeader, DirectoryEntry, DirectoryHeader, Header,
};

use crate::cursor::{ByteCursor, Encoding};
use crate::error::{Result, recover};
use std::collections::BTreeMap;

/// Directory section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySection {
    /// Directory header
    pub directory_header: Option<DirectoryHeader>,
    /// Directory entries, one per item
    pub directory_entries: Vec<DirectoryEntry>,
    /// Names keyed by their offset in the name blob
    pub directory_names: BTreeMap<u32, String>,
    /// Info 1 entries
    pub info1_entries: Vec<u32>,
    /// Info 2 entries, one per item
    pub info2_entries: Vec<u32>,
    /// Copy entries (directory indexes)
    pub copy_entries: Vec<u32>,
    /// Local entries (directory indexes)
    pub local_entries: Vec<u32>,
}

impl DirectorySection {
    /// Name of a directory entry, if it was read
    pub fn name(&self, entry: &DirectoryEntry) -> Option<&str> {
        self.directory_names.get(&entry.name_offset).map(String::as_str)
    }

    /// Number of directory items, zero without a header
    pub fn item_count(&self) -> u32 {
        self.directory_header.as_ref().map_or(0, |h| h.item_count)
    }

    /// Read the directory section at the cursor
    ///
    /// Returns the section and whether it was read completely.
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<(Self, bool)> {
        let mut section = Self::default();
        let Some(header) = recover("directory header", cursor.read::<DirectoryHeader>())? else {
            return Ok((section, false));
        };
        let header = section.directory_header.insert(header).clone();

        section.directory_entries =
            cursor.read_counted(u64::from(header.item_count), limit, |c| c.read())?;
        if !is_complete(&section.directory_entries, header.item_count) {
            return Ok((section, false));
        }

        let Some(blob) = recover("directory names", cursor.take(u64::from(header.name_size)))? else {
            return Ok((section, false));
        };
        for entry in &section.directory_entries {
            if let Some(raw) = usize::try_from(entry.name_offset)
                .ok()
                .and_then(|start| blob.get(start..))
            {
                let mut names = ByteCursor::new(raw);
                if let Ok(name) = names.read_cstring(Encoding::Utf8) {
                    section.directory_names.insert(entry.name_offset, name);
                }
            }
        }

        let counts = [
            header.info1_count,
            header.item_count,
            header.copy_count,
            header.local_count,
        ];
        let mut lists: [Vec<u32>; 4] = Default::default();
        let mut complete = true;
        for (list, count) in lists.iter_mut().zip(counts) {
            *list = read_u32_list(cursor, count, limit)?;
            if !is_complete(list, count) {
                complete = false;
                break;
            }
        }
        let [info1, info2, copy, local] = lists;
        section.info1_entries = info1;
        section.info2_entries = info2;
        section.copy_entries = copy;
        section.local_entries = local;

        Ok((section, complete))
    }
}

/// Checksum section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSection {
    /// Checksum header
    pub checksum_header: Option<ChecksumHeader>,
    /// Checksum map header
    pub checksum_map_header: Option<ChecksumMapHeader>,
    /// Checksum map entries
    pub checksum_map_entries: Vec<ChecksumMapEntry>,
    /// Checksums
    pub checksum_entries: Vec<u32>,
}

impl ChecksumSection {
    /// Read the checksum section at the cursor
    ///
    /// Returns the section and the offset just past it, when known.
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<(Self, Option<u64>)> {
        let mut section = Self::default();
        let Some(header) = recover("checksum header", cursor.read::<ChecksumHeader>())? else {
            return Ok((section, None));
        };
        let end = cursor.position() + u64::from(header.checksum_size);
        section.checksum_header = Some(header);

        let Some(map_header) = recover("checksum map header", cursor.read::<ChecksumMapHeader>())?
        else {
            return Ok((section, Some(end)));
        };
        section.checksum_map_entries =
            cursor.read_counted(u64::from(map_header.item_count), limit, |c| c.read())?;
        if is_complete(&section.checksum_map_entries, map_header.item_count) {
            section.checksum_entries = read_u32_list(cursor, map_header.checksum_count, limit)?;
        }
        section.checksum_map_header = Some(map_header);

        Ok((section, Some(end)))
    }
}

/// Read `count` little-endian `u32` values
pub(crate) fn read_u32_list(
    cursor: &mut ByteCursor<'_>,
    count: u32,
    limit: usize,
) -> Result<Vec<u32>> {
    cursor.read_counted(u64::from(count), limit, |c| c.read_u32_le())
}

/// Whether a table read every entry its header announced
pub(crate) fn is_complete<T>(entries: &[T], count: u32) -> bool {
    entries.len() as u64 == u64::from(count)
}
