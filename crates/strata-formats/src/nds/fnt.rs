//! File name table and file allocation table

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;

/// Folder IDs start here; file IDs are below
pub const FOLDER_ID_BASE: u16 = 0xF000;

/// Length byte flag marking a sub-folder entry
const FOLDER_FLAG: u8 = 0x80;

/// Folder allocation table entry (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FolderAllocationTableEntry {
    /// Offset of the folder's name list, relative to the table
    pub start_offset: u32,
    /// ID of the first file in the folder
    pub first_file_index: u16,
    /// Parent folder ID; the root entry stores the folder count here
    pub parent_folder_index: u16,
}

/// One entry of a folder's name list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameListEntry {
    /// File, identified by position
    File {
        /// File name
        name: String,
    },
    /// Sub-folder with its folder ID
    Folder {
        /// Folder name
        name: String,
        /// Folder ID
        index: u16,
    },
}

impl NameListEntry {
    /// Entry name
    pub fn name(&self) -> &str {
        match self {
            Self::File { name } | Self::Folder { name, .. } => name,
        }
    }

    /// Read one entry, `None` at the end of the list
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Option<Self>> {
        let flag_length = cursor.read_u8()?;
        if flag_length == 0 {
            return Ok(None);
        }
        let length = flag_length & !FOLDER_FLAG;
        let name = cursor.read_fixed_string(u64::from(length), Encoding::Latin1)?;
        if flag_length & FOLDER_FLAG == 0 {
            return Ok(Some(Self::File { name }));
        }
        let index = cursor.read_u16_le()?;
        Ok(Some(Self::Folder { name, index }))
    }
}

/// File name table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    /// One entry per folder, root first
    pub folder_allocation_table: Vec<FolderAllocationTableEntry>,
    /// Name list of each folder, in folder order
    pub name_lists: Vec<Vec<NameListEntry>>,
}

impl NameTable {
    /// Read the table at `start`
    pub(crate) fn read(data: &[u8], start: u64, limit: usize) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, start)?;
        let root: FolderAllocationTableEntry = cursor.read()?;
        let folder_count = u64::from(root.parent_folder_index).max(1);

        let mut folder_allocation_table = vec![root];
        folder_allocation_table.extend(cursor.read_counted(folder_count - 1, limit, |c| {
            c.read::<FolderAllocationTableEntry>()
        })?);

        let mut name_lists = Vec::with_capacity(folder_allocation_table.len());
        for folder in &folder_allocation_table {
            let list = match ByteCursor::at(data, start + u64::from(folder.start_offset)) {
                Ok(mut c) => c.read_until(limit, NameListEntry::read)?,
                Err(_) => Vec::new(),
            };
            name_lists.push(list);
        }

        Ok(Self {
            folder_allocation_table,
            name_lists,
        })
    }
}

/// File allocation table entry (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FileAllocationTableEntry {
    /// Start offset of the file
    pub start_offset: u32,
    /// End offset of the file, exclusive
    pub end_offset: u32,
}

impl FileAllocationTableEntry {
    /// File size in bytes
    pub fn size(&self) -> u32 {
        self.end_offset.saturating_sub(self.start_offset)
    }
}
