//! NE resource table
//!
//! The table starts with an alignment shift, followed by type blocks until a
//! type id of zero. Type and resource ids without the high bit set are
//! offsets of length-prefixed names stored after the last type block.

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;
use std::collections::BTreeMap;

/// Id bit marking an integer id rather than a name offset
pub const INTEGER_ID_FLAG: u16 = 0x8000;

/// Resource entry (12 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ResourceTypeResourceEntry {
    /// Data offset in alignment units
    pub offset: u16,
    /// Data length in alignment units
    pub length: u16,
    /// Resource flags
    pub flag_word: u16,
    /// Integer id or name offset
    pub resource_id: u16,
    /// Reserved
    pub reserved: u32,
}

/// One type block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeInformationEntry {
    /// Integer type id or name offset
    pub type_id: u16,
    /// Number of resources of this type
    pub resource_count: u16,
    /// Reserved
    pub reserved: u32,
    /// Resources of this type
    pub resources: Vec<ResourceTypeResourceEntry>,
}

/// Resource table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    /// Alignment shift for resource data
    pub alignment_shift_count: u16,
    /// Type blocks
    pub resource_types: Vec<ResourceTypeInformationEntry>,
    /// Type and resource names keyed by offset from the table start
    pub type_and_name_strings: BTreeMap<u16, String>,
}

impl ResourceTable {
    /// Name referenced by `id`, if the id is a name offset that was read
    pub fn name(&self, id: u16) -> Option<&str> {
        self.type_and_name_strings.get(&id).map(String::as_str)
    }

    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<Self> {
        let start = cursor.position();
        let alignment_shift_count = cursor.read_u16_le()?;

        let resource_types = cursor.read_until(limit, |c| {
            let type_id = c.read_u16_le()?;
            if type_id == 0 {
                return Ok(None);
            }
            let resource_count = c.read_u16_le()?;
            let reserved = c.read_u32_le()?;
            let resources = c.read_counted(u64::from(resource_count), limit, |c| c.read())?;
            Ok(Some(ResourceTypeInformationEntry {
                type_id,
                resource_count,
                reserved,
                resources,
            }))
        })?;

        let ids = resource_types.iter().flat_map(|ty| {
            std::iter::once(ty.type_id).chain(ty.resources.iter().map(|r| r.resource_id))
        });
        let mut type_and_name_strings = BTreeMap::new();
        for id in ids.filter(|id| id & INTEGER_ID_FLAG == 0) {
            if type_and_name_strings.contains_key(&id) {
                continue;
            }
            if cursor.seek_to(start + u64::from(id)).is_ok()
                && let Ok(name) = cursor.read_prefixed_u8(Encoding::Ascii)
            {
                type_and_name_strings.insert(id, name);
            }
        }

        Ok(Self {
            alignment_shift_count,
            resource_types,
            type_and_name_strings,
        })
    }
}
