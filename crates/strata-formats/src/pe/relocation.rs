//! Base relocation blocks

use super::{DataDirectory, Image};
use crate::error::Result;
use tracing::trace;

/// Size of a block header
const BLOCK_HEADER_SIZE: u32 = 8;

/// One relocation inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRelocationEntry {
    /// Relocation type, the top 4 bits
    pub relocation_type: u8,
    /// Offset from the block's page RVA, the low 12 bits
    pub offset: u16,
}

impl From<u16> for BaseRelocationEntry {
    fn from(raw: u16) -> Self {
        Self {
            relocation_type: (raw >> 12) as u8,
            offset: raw & 0x0FFF,
        }
    }
}

/// Relocations for one 4K page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRelocationBlock {
    /// Page RVA
    pub page_rva: u32,
    /// Size of the block, header included
    pub block_size: u32,
    /// Relocation entries
    pub entries: Vec<BaseRelocationEntry>,
}

/// Read every block inside the base relocation directory
pub(crate) fn read_base_relocations(
    image: &Image<'_>,
    location: &DataDirectory,
) -> Result<Vec<BaseRelocationBlock>> {
    let Some(mut cursor) = image.cursor_at(location.virtual_address) else {
        return Ok(Vec::new());
    };
    let end = cursor.position() + u64::from(location.size);
    let mut blocks = Vec::new();
    while cursor.position() + u64::from(BLOCK_HEADER_SIZE) <= end && blocks.len() < image.limit {
        let Ok(page_rva) = cursor.read_u32_le() else {
            break;
        };
        let Ok(block_size) = cursor.read_u32_le() else {
            break;
        };
        if block_size < BLOCK_HEADER_SIZE {
            trace!(block_size, "base relocation block too small");
            break;
        }
        let count = (block_size - BLOCK_HEADER_SIZE) / 2;
        let entries = cursor
            .read_counted(u64::from(count), image.limit, |c| c.read_u16_le())?
            .into_iter()
            .map(BaseRelocationEntry::from)
            .collect::<Vec<_>>();
        let complete = entries.len() as u32 == count;
        blocks.push(BaseRelocationBlock {
            page_rva,
            block_size,
            entries,
        });
        if !complete {
            break;
        }
    }
    Ok(blocks)
}
