//! COFF symbol table and string table

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;
use std::collections::BTreeMap;

/// Size of every symbol table record
pub const SYMBOL_RECORD_SIZE: u64 = 18;

/// Name field of a standard symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolName {
    /// Name stored inline, up to 8 bytes
    Short(String),
    /// Offset into the string table
    Long(u32),
}

/// Standard symbol record (18 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct StandardSymbol {
    /// Raw name field
    pub name_field: [u8; 8],
    /// Value, meaning depends on section and storage class
    pub value: u32,
    /// 1-based section index, or a special negative value
    pub section_number: i16,
    /// Symbol type
    pub symbol_type: u16,
    /// Storage class
    pub storage_class: u8,
    /// Number of auxiliary records that follow
    pub number_of_aux_symbols: u8,
}

impl StandardSymbol {
    /// Decoded name field
    pub fn name(&self) -> SymbolName {
        if self.name_field[..4] == [0; 4] {
            let mut offset = [0u8; 4];
            offset.copy_from_slice(&self.name_field[4..]);
            SymbolName::Long(u32::from_le_bytes(offset))
        } else {
            SymbolName::Short(Encoding::Utf8.decode_fixed(&self.name_field))
        }
    }
}

/// One slot of the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolRecord {
    /// Standard symbol
    Standard(StandardSymbol),
    /// Auxiliary record, kept raw
    Auxiliary([u8; 18]),
}

/// Read `count` symbol table slots, auxiliary records included
pub(crate) fn read_symbols(
    cursor: &mut ByteCursor<'_>,
    count: u32,
    limit: usize,
) -> Result<Vec<SymbolRecord>> {
    let mut pending_aux = 0u8;
    cursor.read_counted(u64::from(count), limit, |c| {
        if pending_aux > 0 {
            pending_aux -= 1;
            return Ok(SymbolRecord::Auxiliary(c.read_array()?));
        }
        let symbol: StandardSymbol = c.read()?;
        pending_aux = symbol.number_of_aux_symbols;
        Ok(SymbolRecord::Standard(symbol))
    })
}

/// Read the string table that follows the symbol table
///
/// Strings are keyed by their offset from the start of the table, which
/// includes the 4-byte size field.
pub(crate) fn read_string_table(
    cursor: &mut ByteCursor<'_>,
    limit: usize,
) -> Result<BTreeMap<u32, String>> {
    let start = cursor.position();
    let size = cursor.read_u32_le()?;
    let end = start + u64::from(size).min(cursor.remaining() + 4);
    let mut strings = BTreeMap::new();
    while cursor.position() < end && strings.len() < limit {
        let offset = (cursor.position() - start) as u32;
        match cursor.read_cstring(Encoding::Utf8) {
            Ok(text) => {
                strings.insert(offset, text);
            }
            Err(_) => break,
        }
    }
    Ok(strings)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::SampleBuilder;

    #[test]
    fn test_aux_records_follow_their_symbol() {
        let data = SampleBuilder::new()
            .text(".text", 8)
            .u32le(0)
            .u16le(1)
            .u16le(0)
            .u8(3)
            .u8(1)
            .zeros(18)
            .u32le(0)
            .u32le(4)
            .u32le(0x10)
            .u16le(1)
            .u16le(0x20)
            .u8(2)
            .u8(0)
            .build();
        let mut cursor = ByteCursor::new(&data);
        let records = read_symbols(&mut cursor, 3, 16).unwrap();
        assert_eq!(records.len(), 3);
        assert!(matches!(
            &records[0],
            SymbolRecord::Standard(symbol) if symbol.name() == SymbolName::Short(".text".to_string())
        ));
        assert!(matches!(records[1], SymbolRecord::Auxiliary(_)));
        assert!(matches!(
            &records[2],
            SymbolRecord::Standard(symbol) if symbol.name() == SymbolName::Long(4)
        ));
    }

    #[test]
    fn test_string_table_keyed_by_offset() {
        let data = SampleBuilder::new()
            .u32le(4 + 12 + 5)
            .cstr("long_symbol")
            .cstr("next")
            .build();
        let strings = read_string_table(&mut ByteCursor::new(&data), 16).unwrap();
        assert_eq!(strings.get(&4).map(String::as_str), Some("long_symbol"));
        assert_eq!(strings.get(&16).map(String::as_str), Some("next"));
    }
}
