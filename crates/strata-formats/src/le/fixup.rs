//! LE/LX fixup records
//!
//! Each record starts with a source type and a target flags byte. The low
//! two bits of the flags select the target shape; the remaining bits decide
//! the width of every following field. A record whose flags use the
//! reserved bit cannot be sized, so it ends the page it appears in.

use crate::cursor::ByteCursor;
use crate::error::Result;
use binrw::Endian;

/// Source type bit: a list of source offsets follows instead of one offset
pub const SOURCE_LIST_FLAG: u8 = 0x20;

/// Source type of a 16-bit selector fixup, which has no target offset
pub const SELECTOR_16_SOURCE: u8 = 0x02;

/// Mask of the source type value
pub const SOURCE_TYPE_MASK: u8 = 0x0F;

/// Target flag bits
pub mod target_flags {
    /// Mask of the target type
    pub const TARGET_TYPE_MASK: u8 = 0x03;
    /// Internal reference
    pub const INTERNAL_REFERENCE: u8 = 0x00;
    /// Imported reference by ordinal
    pub const IMPORTED_REFERENCE_BY_ORDINAL: u8 = 0x01;
    /// Imported reference by name
    pub const IMPORTED_REFERENCE_BY_NAME: u8 = 0x02;
    /// Internal reference via the entry table
    pub const INTERNAL_REFERENCE_VIA_ENTRY_TABLE: u8 = 0x03;
    /// An additive value follows the target
    pub const ADDITIVE_FIXUP: u8 = 0x04;
    /// Reserved, no known record uses it
    pub const RESERVED: u8 = 0x08;
    /// Target offsets are 32 bits wide
    pub const TARGET_OFFSET_32: u8 = 0x10;
    /// The additive value is 32 bits wide
    pub const ADDITIVE_32: u8 = 0x20;
    /// Object numbers and module ordinals are 16 bits wide
    pub const OBJECT_NUMBER_16: u8 = 0x40;
    /// Import ordinals are 8 bits wide
    pub const ORDINAL_8: u8 = 0x80;
}

use target_flags::{
    ADDITIVE_32, ADDITIVE_FIXUP, IMPORTED_REFERENCE_BY_NAME, IMPORTED_REFERENCE_BY_ORDINAL,
    INTERNAL_REFERENCE, OBJECT_NUMBER_16, ORDINAL_8, RESERVED, TARGET_OFFSET_32,
    TARGET_TYPE_MASK,
};

/// Where the fixup applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupSource {
    /// A single offset inside the page
    Offset(i16),
    /// A list of offsets, stored after the target
    List {
        /// Number of offsets
        count: u8,
        /// Offsets inside the page
        offsets: Vec<u16>,
    },
}

/// What the fixup points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupTarget {
    /// Internal reference
    Internal {
        /// Target object
        object_number: u16,
        /// Offset inside the object, absent for 16-bit selector fixups
        target_offset: Option<u32>,
    },
    /// Import by ordinal
    ImportedByOrdinal {
        /// Ordinal of the imported module
        module_ordinal: u16,
        /// Ordinal of the imported procedure
        import_ordinal: u32,
    },
    /// Import by name
    ImportedByName {
        /// Ordinal of the imported module
        module_ordinal: u16,
        /// Offset in the import procedure name table
        procedure_name_offset: u32,
    },
    /// Internal reference through the entry table
    EntryTable {
        /// Ordinal in the entry table
        ordinal_number: u16,
    },
}

/// One fixup record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupRecord {
    /// Record whose shape was fully decoded
    Decoded {
        /// Source type
        source_type: u8,
        /// Target flags
        target_flags: u8,
        /// Fixup source
        source: FixupSource,
        /// Fixup target
        target: FixupTarget,
        /// Additive value, when flagged
        additive_value: Option<u32>,
    },
    /// Record with an unknown entry format
    Unknown {
        /// Source type
        source_type: u8,
        /// Target flags
        target_flags: u8,
    },
}

/// Fixup records of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixupPage {
    /// Records in page order
    pub records: Vec<FixupRecord>,
}

impl FixupRecord {
    /// Read one record
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>, endian: Endian) -> Result<Self> {
        let source_type = cursor.read_u8()?;
        let target_flags = cursor.read_u8()?;
        if target_flags & RESERVED != 0 {
            return Ok(Self::Unknown {
                source_type,
                target_flags,
            });
        }

        let list_count = if source_type & SOURCE_LIST_FLAG != 0 {
            Some(cursor.read_u8()?)
        } else {
            None
        };
        let single_offset = match list_count {
            Some(_) => None,
            None => Some(cursor.read_u16(endian)? as i16),
        };

        let read_object = |c: &mut ByteCursor<'_>| -> Result<u16> {
            if target_flags & OBJECT_NUMBER_16 != 0 {
                c.read_u16(endian)
            } else {
                c.read_u8().map(u16::from)
            }
        };
        let read_offset = |c: &mut ByteCursor<'_>| -> Result<u32> {
            if target_flags & TARGET_OFFSET_32 != 0 {
                c.read_u32(endian)
            } else {
                c.read_u16(endian).map(u32::from)
            }
        };

        let target = match target_flags & TARGET_TYPE_MASK {
            INTERNAL_REFERENCE => {
                let object_number = read_object(cursor)?;
                let target_offset = if source_type & SOURCE_TYPE_MASK == SELECTOR_16_SOURCE {
                    None
                } else {
                    Some(read_offset(cursor)?)
                };
                FixupTarget::Internal {
                    object_number,
                    target_offset,
                }
            }
            IMPORTED_REFERENCE_BY_ORDINAL => {
                let module_ordinal = read_object(cursor)?;
                let import_ordinal = if target_flags & ORDINAL_8 != 0 {
                    u32::from(cursor.read_u8()?)
                } else {
                    read_offset(cursor)?
                };
                FixupTarget::ImportedByOrdinal {
                    module_ordinal,
                    import_ordinal,
                }
            }
            IMPORTED_REFERENCE_BY_NAME => FixupTarget::ImportedByName {
                module_ordinal: read_object(cursor)?,
                procedure_name_offset: read_offset(cursor)?,
            },
            _ => FixupTarget::EntryTable {
                ordinal_number: read_object(cursor)?,
            },
        };

        let additive_value = if target_flags & ADDITIVE_FIXUP != 0 {
            Some(if target_flags & ADDITIVE_32 != 0 {
                cursor.read_u32(endian)?
            } else {
                u32::from(cursor.read_u16(endian)?)
            })
        } else {
            None
        };

        let source = match (list_count, single_offset) {
            (Some(count), _) => {
                let mut offsets = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    offsets.push(cursor.read_u16(endian)?);
                }
                FixupSource::List { count, offsets }
            }
            (None, offset) => FixupSource::Offset(offset.unwrap_or_default()),
        };

        Ok(Self::Decoded {
            source_type,
            target_flags,
            source,
            target,
            additive_value,
        })
    }
}

impl FixupPage {
    /// Read the records stored in `[start, end)`
    ///
    /// Stops after an unknown record or at the first record that does not fit.
    pub(crate) fn read_from(
        cursor: &mut ByteCursor<'_>,
        end: u64,
        endian: Endian,
        limit: usize,
    ) -> Result<Self> {
        let mut records = Vec::new();
        while cursor.position() < end && records.len() < limit {
            match FixupRecord::read_from(cursor, endian) {
                Ok(record) => {
                    let unknown = matches!(record, FixupRecord::Unknown { .. });
                    records.push(record);
                    if unknown {
                        break;
                    }
                }
                Err(err) if err.is_recoverable() => break,
                Err(err) => return Err(err),
            }
        }
        Ok(Self { records })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::SampleBuilder;

    fn read(bytes: &[u8]) -> FixupRecord {
        FixupRecord::read_from(&mut ByteCursor::new(bytes), Endian::Little).unwrap()
    }

    #[test]
    fn test_internal_reference_32bit_offset() {
        let bytes = SampleBuilder::new()
            .u8(0x07)
            .u8(TARGET_OFFSET_32)
            .u16le(0x0010)
            .u8(2)
            .u32le(0x0001_2345)
            .build();
        assert_eq!(
            read(&bytes),
            FixupRecord::Decoded {
                source_type: 0x07,
                target_flags: TARGET_OFFSET_32,
                source: FixupSource::Offset(0x10),
                target: FixupTarget::Internal {
                    object_number: 2,
                    target_offset: Some(0x0001_2345)
                },
                additive_value: None,
            }
        );
    }

    #[test]
    fn test_selector_fixup_has_no_target_offset() {
        let bytes = SampleBuilder::new().u8(SELECTOR_16_SOURCE).u8(0).u16le(4).u8(1).build();
        assert!(matches!(
            read(&bytes),
            FixupRecord::Decoded {
                target: FixupTarget::Internal {
                    object_number: 1,
                    target_offset: None
                },
                ..
            }
        ));
    }

    #[test]
    fn test_import_by_ordinal_with_source_list_and_additive() {
        let bytes = SampleBuilder::new()
            .u8(0x07 | SOURCE_LIST_FLAG)
            .u8(IMPORTED_REFERENCE_BY_ORDINAL | ORDINAL_8 | ADDITIVE_FIXUP)
            .u8(2)
            .u8(1)
            .u8(0x42)
            .u16le(8)
            .u16le(0x100)
            .u16le(0x200)
            .build();
        assert_eq!(
            read(&bytes),
            FixupRecord::Decoded {
                source_type: 0x27,
                target_flags: 0x85,
                source: FixupSource::List {
                    count: 2,
                    offsets: vec![0x100, 0x200]
                },
                target: FixupTarget::ImportedByOrdinal {
                    module_ordinal: 1,
                    import_ordinal: 0x42
                },
                additive_value: Some(8),
            }
        );
    }

    #[test]
    fn test_reserved_flag_is_unknown_and_stops_page() {
        let bytes = SampleBuilder::new()
            .u8(0x07)
            .u8(target_flags::RESERVED)
            .u8(0x07)
            .u8(0)
            .u16le(0)
            .u8(1)
            .u16le(0)
            .build();
        let mut cursor = ByteCursor::new(&bytes);
        let page = FixupPage::read_from(&mut cursor, bytes.len() as u64, Endian::Little, 100).unwrap();
        assert_eq!(
            page.records,
            vec![FixupRecord::Unknown {
                source_type: 0x07,
                target_flags: target_flags::RESERVED
            }]
        );
    }

    #[test]
    fn test_big_endian_fields() {
        let bytes = SampleBuilder::new()
            .u8(0x07)
            .u8(IMPORTED_REFERENCE_BY_NAME | OBJECT_NUMBER_16)
            .u16be(0x0102)
            .u16be(0x0003)
            .u16be(0x0456)
            .build();
        let record = FixupRecord::read_from(&mut ByteCursor::new(&bytes), Endian::Big).unwrap();
        assert!(matches!(
            record,
            FixupRecord::Decoded {
                source: FixupSource::Offset(0x0102),
                target: FixupTarget::ImportedByName {
                    module_ordinal: 3,
                    procedure_name_offset: 0x456
                },
                ..
            }
        ));
    }
}
