//! PE signature, COFF file header, optional header and section table

use crate::address::SectionRange;
use crate::cursor::Encoding;
use binrw::BinRead;

/// Signature preceding the COFF file header
pub const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";

/// Optional header magic of 32-bit images
pub const PE32_MAGIC: u16 = 0x10B;

/// Optional header magic of 64-bit images
pub const PE32_PLUS_MAGIC: u16 = 0x20B;

/// Most data directories an optional header can describe
pub const MAX_DATA_DIRECTORIES: u32 = 16;

/// Data directory slots
pub mod directory {
    /// Export table
    pub const EXPORT: usize = 0;
    /// Import table
    pub const IMPORT: usize = 1;
    /// Resource table
    pub const RESOURCE: usize = 2;
    /// Exception table
    pub const EXCEPTION: usize = 3;
    /// Attribute certificate table, addressed by file offset
    pub const CERTIFICATE: usize = 4;
    /// Base relocation table
    pub const BASE_RELOCATION: usize = 5;
    /// Debug directory
    pub const DEBUG: usize = 6;
    /// Delay-load import descriptors
    pub const DELAY_IMPORT: usize = 13;
}

/// PE signature and COFF file header (24 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FileHeader {
    /// Signature, always `PE\0\0`
    #[br(assert(signature == PE_SIGNATURE, "expected PE signature, got {:?}", signature))]
    pub signature: [u8; 4],
    /// Target machine
    pub machine: u16,
    /// Number of section table entries
    pub number_of_sections: u16,
    /// Link time
    pub time_date_stamp: u32,
    /// File offset of the COFF symbol table
    pub pointer_to_symbol_table: u32,
    /// Number of COFF symbol records
    pub number_of_symbols: u32,
    /// Size of the optional header
    pub size_of_optional_header: u16,
    /// Image characteristics
    pub characteristics: u16,
}

/// Location and size of a table inside the image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DataDirectory {
    /// RVA of the table (a file offset for the certificate table)
    pub virtual_address: u32,
    /// Size in bytes
    pub size: u32,
}

impl DataDirectory {
    /// Whether the directory points at anything
    pub fn is_present(&self) -> bool {
        self.virtual_address != 0 && self.size != 0
    }
}

/// Optional header of a PE32 image
///
/// Field names follow Microsoft's PE format documentation.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct OptionalHeader32 {
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_code: u32,
    pub size_of_initialized_data: u32,
    pub size_of_uninitialized_data: u32,
    pub address_of_entry_point: u32,
    pub base_of_code: u32,
    /// Start of the data section, absent from PE32+
    pub base_of_data: u32,
    pub image_base: u32,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version: u16,
    pub minor_image_version: u16,
    pub major_subsystem_version: u16,
    pub minor_subsystem_version: u16,
    pub win32_version_value: u32,
    pub size_of_image: u32,
    pub size_of_headers: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub size_of_stack_reserve: u32,
    pub size_of_stack_commit: u32,
    pub size_of_heap_reserve: u32,
    pub size_of_heap_commit: u32,
    pub loader_flags: u32,
    pub number_of_rva_and_sizes: u32,
    #[br(count = number_of_rva_and_sizes.min(MAX_DATA_DIRECTORIES))]
    pub data_directories: Vec<DataDirectory>,
}

/// Optional header of a PE32+ image
///
/// Field names follow Microsoft's PE format documentation.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct OptionalHeader64 {
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_code: u32,
    pub size_of_initialized_data: u32,
    pub size_of_uninitialized_data: u32,
    pub address_of_entry_point: u32,
    pub base_of_code: u32,
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version: u16,
    pub minor_image_version: u16,
    pub major_subsystem_version: u16,
    pub minor_subsystem_version: u16,
    pub win32_version_value: u32,
    pub size_of_image: u32,
    pub size_of_headers: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub size_of_stack_reserve: u64,
    pub size_of_stack_commit: u64,
    pub size_of_heap_reserve: u64,
    pub size_of_heap_commit: u64,
    pub loader_flags: u32,
    pub number_of_rva_and_sizes: u32,
    #[br(count = number_of_rva_and_sizes.min(MAX_DATA_DIRECTORIES))]
    pub data_directories: Vec<DataDirectory>,
}

/// Optional header, keyed by its magic
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub enum OptionalHeader {
    /// 32-bit image (magic 0x10B)
    #[br(magic = 0x10Bu16)]
    Pe32(OptionalHeader32),
    /// 64-bit image (magic 0x20B)
    #[br(magic = 0x20Bu16)]
    Pe32Plus(OptionalHeader64),
}

impl OptionalHeader {
    /// Magic value selecting this variant
    pub fn magic(&self) -> u16 {
        match self {
            Self::Pe32(_) => PE32_MAGIC,
            Self::Pe32Plus(_) => PE32_PLUS_MAGIC,
        }
    }

    /// Whether lookup tables use 64-bit entries
    pub fn is_pe32_plus(&self) -> bool {
        matches!(self, Self::Pe32Plus(_))
    }

    /// RVA of the entry point
    pub fn address_of_entry_point(&self) -> u32 {
        match self {
            Self::Pe32(header) => header.address_of_entry_point,
            Self::Pe32Plus(header) => header.address_of_entry_point,
        }
    }

    /// Preferred load address
    pub fn image_base(&self) -> u64 {
        match self {
            Self::Pe32(header) => u64::from(header.image_base),
            Self::Pe32Plus(header) => header.image_base,
        }
    }

    /// Every data directory the header describes
    pub fn data_directories(&self) -> &[DataDirectory] {
        match self {
            Self::Pe32(header) => &header.data_directories,
            Self::Pe32Plus(header) => &header.data_directories,
        }
    }

    /// One present data directory, by slot
    pub fn data_directory(&self, slot: usize) -> Option<&DataDirectory> {
        self.data_directories()
            .get(slot)
            .filter(|directory| directory.is_present())
    }
}

/// Section table entry (40 bytes)
///
/// Field names follow Microsoft's PE format documentation.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct SectionHeader {
    /// NUL-padded section name
    pub name: [u8; 8],
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
    pub pointer_to_relocations: u32,
    pub pointer_to_linenumbers: u32,
    pub number_of_relocations: u16,
    pub number_of_linenumbers: u16,
    pub characteristics: u32,
}

impl SectionHeader {
    /// Section name with padding removed
    pub fn name(&self) -> String {
        Encoding::Utf8.decode_fixed(&self.name)
    }
}

impl SectionRange for SectionHeader {
    fn virtual_address(&self) -> u64 {
        u64::from(self.virtual_address)
    }

    // Object files and some packers leave VirtualSize zero
    fn virtual_size(&self) -> u64 {
        if self.virtual_size == 0 {
            u64::from(self.size_of_raw_data)
        } else {
            u64::from(self.virtual_size)
        }
    }

    fn raw_pointer(&self) -> u64 {
        u64::from(self.pointer_to_raw_data)
    }
}
