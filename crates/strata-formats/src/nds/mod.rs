//! Nintendo DS and DSi cart image support
//!
//! The common header describes where every other region lives. DSi-enhanced
//! and DSi-exclusive carts (unit codes 2 and 3) follow it with an extended
//! header. The file name table and file allocation table are located through
//! offsets in the common header; the secure area is only measured.

mod fnt;
mod header;
mod print;

pub use fnt::{
    FOLDER_ID_BASE, FileAllocationTableEntry, FolderAllocationTableEntry, NameListEntry,
    NameTable,
};
pub use header::{
    COMMON_HEADER_SIZE, CommonHeader, ExtendedDsiHeader, Header, UNIT_CODE_DSI, UNIT_CODE_NDS,
    UNIT_CODE_NDS_DSI,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Start of the secure area
pub const SECURE_AREA_OFFSET: u64 = 0x4000;

/// Size of the secure area
pub const SECURE_AREA_SIZE: u64 = 0x4000;

/// Size of one file allocation table entry
const FAT_ENTRY_SIZE: u64 = 8;

/// DS or DSi cart image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    /// Cart header
    pub header: Option<Header>,
    /// Number of secure area bytes present in the image
    pub secure_area_length: Option<u64>,
    /// File name table
    pub name_table: Option<NameTable>,
    /// File allocation table
    pub file_allocation_table: Vec<FileAllocationTableEntry>,
}

impl BinaryFormat for Cart {
    const NAME: &'static str = "Nintendo DS Cart Image";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let common: CommonHeader = cursor.read()?;
        let limit = options.max_table_entries;

        let header = if common.has_dsi_header() {
            let extended = recover("dsi extended header", cursor.read::<ExtendedDsiHeader>())?;
            Header::Dsi {
                common,
                extended: extended.map(Box::new),
            }
        } else {
            Header::Nds(common)
        };
        let common = header.common();

        let secure_start = offset + SECURE_AREA_OFFSET;
        let secure_area_length = (data.len() as u64 > secure_start)
            .then(|| (data.len() as u64 - secure_start).min(SECURE_AREA_SIZE));

        let name_table = if common.file_name_table_offset == 0 {
            None
        } else {
            recover(
                "nds file name table",
                NameTable::read(data, offset + u64::from(common.file_name_table_offset), limit),
            )?
        };

        let file_allocation_table = if common.file_allocation_table_offset == 0 {
            Vec::new()
        } else {
            let start = offset + u64::from(common.file_allocation_table_offset);
            let count = u64::from(common.file_allocation_table_length) / FAT_ENTRY_SIZE;
            match ByteCursor::at(data, start) {
                Ok(mut c) => c.read_counted(count, limit, |c| c.read::<FileAllocationTableEntry>())?,
                Err(_) => Vec::new(),
            }
        };

        Ok(Self {
            header: Some(header),
            secure_area_length,
            name_table,
            file_allocation_table,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}
