//! Export directory and its tables

use super::{DataDirectory, Image};
use crate::cursor::Encoding;
use crate::error::{DecodeError, Result};
use binrw::BinRead;

/// Export directory table (40 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExportDirectoryTable {
    /// Reserved, must be 0
    pub export_flags: u32,
    /// Time the export data was created
    pub time_date_stamp: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// RVA of the DLL name
    pub name_rva: u32,
    /// Ordinal of the first export address table entry
    pub ordinal_base: u32,
    /// Number of export address table entries
    pub address_table_entries: u32,
    /// Number of name pointer and ordinal table entries
    pub number_of_name_pointers: u32,
    /// RVA of the export address table
    pub export_address_table_rva: u32,
    /// RVA of the name pointer table
    pub name_pointer_rva: u32,
    /// RVA of the ordinal table
    pub ordinal_table_rva: u32,
}

/// Export address table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportAddress {
    /// RVA of exported code or data
    Export(u32),
    /// RVA pointing back into the export section, naming another DLL's export
    Forwarder {
        /// RVA of the forwarder string
        rva: u32,
        /// Forwarder string, e.g. `NTDLL.RtlAllocateHeap`
        name: Option<String>,
    },
}

/// Export data of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// Directory table
    pub directory: ExportDirectoryTable,
    /// DLL name
    pub name: Option<String>,
    /// Export address table
    pub address_table: Vec<ExportAddress>,
    /// Name pointer table
    pub name_pointer_table: Vec<u32>,
    /// Ordinal table, parallel to the name pointer table
    pub ordinal_table: Vec<u16>,
    /// Export names, parallel to the name pointer table
    pub names: Vec<String>,
}

impl ExportTable {
    pub(crate) fn read(image: &Image<'_>, location: &DataDirectory) -> Result<Self> {
        let mut cursor = image
            .cursor_at(location.virtual_address)
            .ok_or(DecodeError::Unsupported {
                what: "unmapped export directory RVA",
                value: u64::from(location.virtual_address),
            })?;
        let directory: ExportDirectoryTable = cursor.read()?;
        let name = image.cstring_at(directory.name_rva);

        let section_start = location.virtual_address;
        let section_end = section_start.saturating_add(location.size);
        let mut address_table = Vec::new();
        if let Some(mut c) = image.cursor_at(directory.export_address_table_rva) {
            address_table = c.read_counted(
                u64::from(directory.address_table_entries),
                image.limit,
                |c| {
                    let rva = c.read_u32_le()?;
                    Ok(if (section_start..section_end).contains(&rva) {
                        ExportAddress::Forwarder {
                            rva,
                            name: image.cstring_at(rva),
                        }
                    } else {
                        ExportAddress::Export(rva)
                    })
                },
            )?;
        }

        let mut name_pointer_table = Vec::new();
        if let Some(mut c) = image.cursor_at(directory.name_pointer_rva) {
            name_pointer_table = c.read_counted(
                u64::from(directory.number_of_name_pointers),
                image.limit,
                |c| c.read_u32_le(),
            )?;
        }

        let mut ordinal_table = Vec::new();
        if let Some(mut c) = image.cursor_at(directory.ordinal_table_rva) {
            ordinal_table = c.read_counted(
                u64::from(directory.number_of_name_pointers),
                image.limit,
                |c| c.read_u16_le(),
            )?;
        }

        let names = name_pointer_table
            .iter()
            .map_while(|&rva| {
                image
                    .cursor_at(rva)
                    .and_then(|mut c| c.read_cstring(Encoding::Ascii).ok())
            })
            .collect();

        Ok(Self {
            directory,
            name,
            address_table,
            name_pointer_table,
            ordinal_table,
            names,
        })
    }
}
