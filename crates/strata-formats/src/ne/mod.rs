//! New Executable (NE) support
//!
//! An MS-DOS stub points at the NE header, whose tables are located relative
//! to the header itself:
//!
//! - **Segment Table**: one entry per segment
//! - **Resource Table**: type blocks, resources and their names
//! - **Resident Name Table**: exported names, zero-length terminated
//! - **Module Reference Table**: offsets into the imported names table
//! - **Imported Name Table**: names keyed by offset
//! - **Entry Table**: bundles of fixed or movable entry points
//! - **Non-Resident Name Table**: located relative to the file start

mod entry;
mod header;
mod print;
mod resource;

pub use entry::{Entry, EntryTableBundle, MOVABLE_SEGMENT, NameTableEntry, UNUSED_SEGMENT};
pub use header::{DEFAULT_ALIGNMENT_SHIFT, Header, NE_SIGNATURE, SegmentTableEntry};
pub use resource::{
    INTEGER_ID_FLAG, ResourceTable, ResourceTypeInformationEntry, ResourceTypeResourceEntry,
};

use crate::cursor::{ByteCursor, Encoding};
use crate::error::recover;
use crate::mz;
use crate::{BinaryFormat, DecodeOptions, Result};
use std::collections::BTreeMap;

/// New executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Executable {
    /// MS-DOS stub
    pub stub: Option<mz::Executable>,
    /// NE header
    pub header: Option<Header>,
    /// Segment table
    pub segment_table: Vec<SegmentTableEntry>,
    /// Resource table
    pub resource_table: Option<ResourceTable>,
    /// Resident name table
    pub resident_name_table: Vec<NameTableEntry>,
    /// Module reference table
    pub module_reference_table: Vec<u16>,
    /// Imported names keyed by offset from the imported names table
    pub imported_name_table: BTreeMap<u16, String>,
    /// Entry table
    pub entry_table: Vec<EntryTableBundle>,
    /// Non-resident name table
    pub non_resident_name_table: Vec<NameTableEntry>,
}

impl Executable {
    /// File offset of `offset` inside segment `segment_number` (1-based)
    ///
    /// The result is relative to the start of the stub. Segments without
    /// data and unknown segment numbers resolve to `None`.
    pub fn segment_file_offset(&self, segment_number: u16, offset: u16) -> Option<u64> {
        let header = self.header.as_ref()?;
        let index = usize::from(segment_number.checked_sub(1)?);
        let segment = self.segment_table.get(index)?;
        if segment.offset == 0 {
            return None;
        }
        let shift = u32::from(header.alignment_shift().min(31));
        Some((u64::from(segment.offset) << shift) + u64::from(offset))
    }

    /// Name of an imported module, by module reference index (0-based)
    pub fn module_name(&self, index: usize) -> Option<&str> {
        let offset = self.module_reference_table.get(index)?;
        self.imported_name_table.get(offset).map(String::as_str)
    }
}

impl BinaryFormat for Executable {
    const NAME: &'static str = "New Executable";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let (stub, header_offset) = mz::Executable::read_stub(data, offset, options)?;
        let mut cursor = ByteCursor::at(data, header_offset)?;
        let header: Header = cursor.read()?;
        let limit = options.max_table_entries;
        let table = |relative: u16| header_offset + u64::from(relative);

        let mut segment_table = Vec::new();
        if cursor.seek_to(table(header.segment_table_offset)).is_ok() {
            segment_table = cursor.read_counted(
                u64::from(header.file_segment_count),
                limit,
                |c| c.read::<SegmentTableEntry>(),
            )?;
        }

        // Equal offsets mean the resource table is empty
        let resource_table = if header.resource_table_offset != header.resident_name_table_offset
            && cursor.seek_to(table(header.resource_table_offset)).is_ok()
        {
            recover(
                "ne resource table",
                ResourceTable::read_from(&mut cursor, limit),
            )?
        } else {
            None
        };

        let mut resident_name_table = Vec::new();
        if cursor.seek_to(table(header.resident_name_table_offset)).is_ok() {
            resident_name_table = cursor.read_until(limit, NameTableEntry::read_from)?;
        }

        let mut module_reference_table = Vec::new();
        if cursor.seek_to(table(header.module_reference_table_offset)).is_ok() {
            module_reference_table = cursor.read_counted(
                u64::from(header.module_reference_table_size),
                limit,
                |c| c.read_u16_le(),
            )?;
        }

        let mut imported_name_table = BTreeMap::new();
        let imports_start = table(header.imported_names_table_offset);
        for &name_offset in &module_reference_table {
            if imported_name_table.contains_key(&name_offset) {
                continue;
            }
            if cursor.seek_to(imports_start + u64::from(name_offset)).is_ok()
                && let Ok(name) = cursor.read_prefixed_u8(Encoding::Ascii)
            {
                imported_name_table.insert(name_offset, name);
            }
        }

        let mut entry_table = Vec::new();
        if header.entry_table_size > 0
            && cursor.seek_to(table(header.entry_table_offset)).is_ok()
        {
            let length = u64::from(header.entry_table_size).min(cursor.remaining());
            let mut entries = ByteCursor::new(cursor.take(length)?);
            entry_table = entries.read_until(limit, EntryTableBundle::read_from)?;
        }

        let mut non_resident_name_table = Vec::new();
        if header.non_resident_name_table_size > 0
            && cursor
                .seek_to(offset + u64::from(header.non_resident_names_table_offset))
                .is_ok()
        {
            let length = u64::from(header.non_resident_name_table_size).min(cursor.remaining());
            let mut names = ByteCursor::new(cursor.take(length)?);
            non_resident_name_table = names.read_until(limit, NameTableEntry::read_from)?;
        }

        Ok(Self {
            stub: Some(stub),
            header: Some(header),
            segment_table,
            resource_table,
            resident_name_table,
            module_reference_table,
            imported_name_table,
            entry_table,
            non_resident_name_table,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}
