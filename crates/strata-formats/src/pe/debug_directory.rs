//! Debug directory

use super::{DataDirectory, Image};
use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;

/// Size of one debug directory entry
pub const DEBUG_DIRECTORY_ENTRY_SIZE: u32 = 28;

/// Debug type of CodeView records
pub const IMAGE_DEBUG_TYPE_CODEVIEW: u32 = 2;

/// Signature of PDB 7.0 CodeView records
pub const RSDS_SIGNATURE: [u8; 4] = *b"RSDS";

/// Debug directory entry (28 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DebugDirectoryEntry {
    /// Reserved, must be 0
    pub characteristics: u32,
    /// Time the debug data was created
    pub time_date_stamp: u32,
    /// Major version of the debug data format
    pub major_version: u16,
    /// Minor version of the debug data format
    pub minor_version: u16,
    /// Format of the debug data
    pub debug_type: u32,
    /// Size of the debug data
    pub size_of_data: u32,
    /// RVA of the debug data once loaded
    pub address_of_raw_data: u32,
    /// File offset of the debug data
    pub pointer_to_raw_data: u32,
}

/// PDB 7.0 CodeView record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeViewPdb70 {
    /// `RSDS`
    pub signature: [u8; 4],
    /// PDB GUID
    pub guid: [u8; 16],
    /// PDB age
    pub age: u32,
    /// Path of the PDB file
    pub path: String,
}

/// Data referenced by a debug directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugData {
    /// CodeView PDB 7.0 record
    CodeView(CodeViewPdb70),
    /// Any other format, kept raw
    Raw(Vec<u8>),
}

/// Debug directory entry with its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    /// Directory entry
    pub entry: DebugDirectoryEntry,
    /// Referenced data, absent when it lies outside the file
    pub data: Option<DebugData>,
}

/// Read the debug directory and the data of every entry
pub(crate) fn read_debug_directory(
    image: &Image<'_>,
    location: &DataDirectory,
) -> Result<Vec<DebugEntry>> {
    let Some(mut cursor) = image.cursor_at(location.virtual_address) else {
        return Ok(Vec::new());
    };
    let count = location.size / DEBUG_DIRECTORY_ENTRY_SIZE;
    let entries = cursor.read_counted(u64::from(count), image.limit, |c| {
        c.read::<DebugDirectoryEntry>()
    })?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            let data = read_debug_data(image, &entry);
            DebugEntry { entry, data }
        })
        .collect())
}

fn read_debug_data(image: &Image<'_>, entry: &DebugDirectoryEntry) -> Option<DebugData> {
    if entry.pointer_to_raw_data == 0 || entry.size_of_data == 0 {
        return None;
    }
    let mut cursor =
        ByteCursor::at(image.data, image.file_start + u64::from(entry.pointer_to_raw_data)).ok()?;
    let bytes = cursor.take(u64::from(entry.size_of_data)).ok()?;
    if entry.debug_type == IMAGE_DEBUG_TYPE_CODEVIEW && bytes.starts_with(&RSDS_SIGNATURE) {
        let mut record = ByteCursor::new(bytes);
        let read = |c: &mut ByteCursor<'_>| -> Result<CodeViewPdb70> {
            Ok(CodeViewPdb70 {
                signature: c.read_array()?,
                guid: c.read_array()?,
                age: c.read_u32_le()?,
                path: c.read_cstring(Encoding::Utf8)?,
            })
        };
        if let Ok(codeview) = read(&mut record) {
            return Some(DebugData::CodeView(codeview));
        }
    }
    Some(DebugData::Raw(bytes.to_vec()))
}
