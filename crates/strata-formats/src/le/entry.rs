//! LE/LX entry table bundles

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use binrw::Endian;

/// Bundle type bit flagging parameter typing information
pub const PARAMETER_TYPING_PRESENT: u8 = 0x80;

/// Entry shape, selected by the bundle type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// 16-bit entry (3 bytes)
    SixteenBit {
        /// Entry flags
        flags: u8,
        /// Offset inside the object
        offset: u16,
    },
    /// 286 call gate entry (5 bytes)
    CallGate {
        /// Entry flags
        flags: u8,
        /// Offset inside the object
        offset: u16,
        /// Call gate selector, filled in by the loader
        call_gate_selector: u16,
    },
    /// 32-bit entry (5 bytes)
    ThirtyTwoBit {
        /// Entry flags
        flags: u8,
        /// Offset inside the object
        offset: u32,
    },
    /// Forwarder entry (7 bytes)
    Forwarder {
        /// Forwarder flags
        flags: u8,
        /// Ordinal of the imported module
        module_ordinal: u16,
        /// Procedure name offset or import ordinal
        procedure_name_or_ordinal: u32,
    },
}

/// Bundle body, keyed by the bundle type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleKind {
    /// Unused entries, no body
    Unused,
    /// Entries sharing an object (or a reserved word for forwarders)
    Entries {
        /// Object number, reserved for forwarder bundles
        object_number: u16,
        /// Entries
        entries: Vec<Entry>,
    },
}

/// Run of entries sharing a bundle type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTableBundle {
    /// Number of entries in the bundle
    pub entries: u8,
    /// Bundle type, including the parameter typing bit
    pub bundle_type: u8,
    /// Bundle body
    pub kind: BundleKind,
}

impl EntryTableBundle {
    /// Bundle type without the parameter typing bit
    pub fn base_type(&self) -> u8 {
        self.bundle_type & !PARAMETER_TYPING_PRESENT
    }

    /// Read one bundle, `None` at the terminating zero count
    pub(crate) fn read_from(cursor: &mut ByteCursor<'_>, endian: Endian) -> Result<Option<Self>> {
        let entries = cursor.read_u8()?;
        if entries == 0 {
            return Ok(None);
        }
        let bundle_type = cursor.read_u8()?;
        let base_type = bundle_type & !PARAMETER_TYPING_PRESENT;
        if base_type == 0x00 {
            return Ok(Some(Self {
                entries,
                bundle_type,
                kind: BundleKind::Unused,
            }));
        }
        if base_type > 0x04 {
            return Err(DecodeError::Unsupported {
                what: "entry bundle type",
                value: u64::from(bundle_type),
            });
        }

        let object_number = cursor.read_u16(endian)?;
        let mut list = Vec::with_capacity(usize::from(entries));
        for _ in 0..entries {
            let flags = cursor.read_u8()?;
            let entry = match base_type {
                0x01 => Entry::SixteenBit {
                    flags,
                    offset: cursor.read_u16(endian)?,
                },
                0x02 => Entry::CallGate {
                    flags,
                    offset: cursor.read_u16(endian)?,
                    call_gate_selector: cursor.read_u16(endian)?,
                },
                0x03 => Entry::ThirtyTwoBit {
                    flags,
                    offset: cursor.read_u32(endian)?,
                },
                _ => Entry::Forwarder {
                    flags,
                    module_ordinal: cursor.read_u16(endian)?,
                    procedure_name_or_ordinal: cursor.read_u32(endian)?,
                },
            };
            list.push(entry);
        }

        Ok(Some(Self {
            entries,
            bundle_type,
            kind: BundleKind::Entries {
                object_number,
                entries: list,
            },
        }))
    }
}
