//! Import directory, lookup tables, hint/name table and delay-load imports

use super::{DataDirectory, Image};
use crate::cursor::Encoding;
use crate::error::{DecodeError, Result};
use binrw::BinRead;
use std::collections::BTreeMap;

/// Import directory table entry (20 bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ImportDirectoryTableEntry {
    /// RVA of the import lookup table
    pub import_lookup_table_rva: u32,
    /// Zero until the image is bound
    pub time_date_stamp: u32,
    /// Index of the first forwarder reference
    pub forwarder_chain: u32,
    /// RVA of the DLL name
    pub name_rva: u32,
    /// RVA of the import address table
    pub import_address_table_rva: u32,
}

impl ImportDirectoryTableEntry {
    /// The all-zero entry ending the directory table
    pub fn is_terminator(&self) -> bool {
        *self == Self::default()
    }
}

/// Import lookup or address table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportLookupEntry {
    /// Import by ordinal
    Ordinal(u16),
    /// Import by name, through a hint/name table RVA
    HintName(u32),
}

impl ImportLookupEntry {
    fn from_raw(raw: u64, pe32_plus: bool) -> Option<Self> {
        if raw == 0 {
            return None;
        }
        let ordinal_flag = if pe32_plus { 1 << 63 } else { 1 << 31 };
        Some(if raw & ordinal_flag != 0 {
            Self::Ordinal(raw as u16)
        } else {
            Self::HintName((raw & 0x7FFF_FFFF) as u32)
        })
    }
}

/// Hint/name table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintNameEntry {
    /// Index into the exporting DLL's name pointer table
    pub hint: u16,
    /// Imported name
    pub name: String,
}

/// One imported DLL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDescriptor {
    /// Directory table entry
    pub entry: ImportDirectoryTableEntry,
    /// DLL name
    pub name: Option<String>,
    /// Import lookup table
    pub lookup_table: Vec<ImportLookupEntry>,
    /// Import address table, as stored on disk
    pub address_table: Vec<ImportLookupEntry>,
}

/// Import data of an image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    /// Imported DLLs, in directory order
    pub descriptors: Vec<ImportDescriptor>,
    /// Hint/name entries keyed by RVA
    pub hint_name_table: BTreeMap<u32, HintNameEntry>,
}

impl ImportTable {
    pub(crate) fn read(image: &Image<'_>, location: &DataDirectory) -> Result<Self> {
        let mut cursor = image
            .cursor_at(location.virtual_address)
            .ok_or(DecodeError::Unsupported {
                what: "unmapped import directory RVA",
                value: u64::from(location.virtual_address),
            })?;
        let entries = cursor.read_until(image.limit, |c| {
            let entry: ImportDirectoryTableEntry = c.read()?;
            Ok((!entry.is_terminator()).then_some(entry))
        })?;

        let mut table = Self::default();
        for entry in entries {
            let lookup_table = read_lookup_table(image, entry.import_lookup_table_rva)?;
            let address_table = read_lookup_table(image, entry.import_address_table_rva)?;
            for lookup in lookup_table.iter().chain(&address_table) {
                if let ImportLookupEntry::HintName(rva) = *lookup
                    && !table.hint_name_table.contains_key(&rva)
                    && let Some(hint_name) = read_hint_name(image, rva)
                {
                    table.hint_name_table.insert(rva, hint_name);
                }
            }
            table.descriptors.push(ImportDescriptor {
                name: image.cstring_at(entry.name_rva),
                entry,
                lookup_table,
                address_table,
            });
        }
        Ok(table)
    }
}

fn read_lookup_table(image: &Image<'_>, rva: u32) -> Result<Vec<ImportLookupEntry>> {
    let Some(mut cursor) = image.cursor_at(rva) else {
        return Ok(Vec::new());
    };
    let pe32_plus = image.pe32_plus;
    cursor.read_until(image.limit, |c| {
        let raw = if pe32_plus {
            c.read_u64_le()?
        } else {
            u64::from(c.read_u32_le()?)
        };
        Ok(ImportLookupEntry::from_raw(raw, pe32_plus))
    })
}

fn read_hint_name(image: &Image<'_>, rva: u32) -> Option<HintNameEntry> {
    let mut cursor = image.cursor_at(rva)?;
    let hint = cursor.read_u16_le().ok()?;
    let name = cursor.read_cstring(Encoding::Ascii).ok()?;
    Some(HintNameEntry { hint, name })
}

/// Delay-load directory table entry (32 bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DelayLoadDirectoryEntry {
    /// Must be zero
    pub attributes: u32,
    /// RVA of the DLL name
    pub name_rva: u32,
    /// RVA of the module handle
    pub module_handle: u32,
    /// RVA of the delay-load import address table
    pub delay_import_address_table: u32,
    /// RVA of the delay-load name table
    pub delay_import_name_table: u32,
    /// RVA of the bound delay-load address table
    pub bound_delay_import_table: u32,
    /// RVA of the unload delay-load address table
    pub unload_delay_import_table: u32,
    /// Timestamp of the bound DLL
    pub time_stamp: u32,
}

/// Read delay-load entries up to the all-zero terminator
pub(crate) fn read_delay_load_directory(
    image: &Image<'_>,
    location: &DataDirectory,
) -> Result<Vec<DelayLoadDirectoryEntry>> {
    let Some(mut cursor) = image.cursor_at(location.virtual_address) else {
        return Ok(Vec::new());
    };
    cursor.read_until(image.limit, |c| {
        let entry: DelayLoadDirectoryEntry = c.read()?;
        Ok((entry != DelayLoadDirectoryEntry::default()).then_some(entry))
    })
}
