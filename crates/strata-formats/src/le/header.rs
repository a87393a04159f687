//! LE/LX information block and fixed-size table records
//!
//! Records here carry no byte order of their own: the decoder reads them in
//! the order named by the information block's byte-order field.

use binrw::BinRead;

/// Linear executable signature
pub const LE_SIGNATURE: [u8; 2] = *b"LE";

/// Linear executable (extended) signature
pub const LX_SIGNATURE: [u8; 2] = *b"LX";

/// Byte-order value selecting big-endian fields
pub const BIG_ENDIAN_BYTE_ORDER: u8 = 0x01;

/// Information block (172 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
pub struct InformationBlock {
    /// Signature, `LE` or `LX`
    #[br(assert(signature == LE_SIGNATURE || signature == LX_SIGNATURE, "expected LE or LX, got {:?}", signature))]
    pub signature: [u8; 2],
    /// Byte order, 0 little-endian, 1 big-endian
    pub byte_order: u8,
    /// Word order, 0 little-endian, 1 big-endian
    pub word_order: u8,
    /// Executable format level
    pub executable_format_level: u32,
    /// CPU type
    pub cpu_type: u16,
    /// Target operating system
    pub module_os: u16,
    /// Module version
    pub module_version: u32,
    /// Module type flags
    pub module_type_flags: u32,
    /// Number of memory pages
    pub module_number_pages: u32,
    /// Object of the initial CS
    pub initial_object_cs: u32,
    /// Initial EIP
    pub initial_eip: u32,
    /// Object of the initial SS
    pub initial_object_ss: u32,
    /// Initial ESP
    pub initial_esp: u32,
    /// Memory page size
    pub memory_page_size: u32,
    /// Bytes on the last page (LE) or page offset shift (LX)
    pub bytes_on_last_page: u32,
    /// Fixup section size
    pub fixup_section_size: u32,
    /// Fixup section checksum
    pub fixup_section_checksum: u32,
    /// Loader section size
    pub loader_section_size: u32,
    /// Loader section checksum
    pub loader_section_checksum: u32,
    /// Offset of the object table
    pub object_table_offset: u32,
    /// Number of object table entries
    pub object_table_count: u32,
    /// Offset of the object page map
    pub object_page_map_offset: u32,
    /// Offset of the object iterated data map
    pub object_iterate_data_map_offset: u32,
    /// Offset of the resource table
    pub resource_table_offset: u32,
    /// Number of resource table entries
    pub resource_table_count: u32,
    /// Offset of the resident names table
    pub resident_names_table_offset: u32,
    /// Offset of the entry table
    pub entry_table_offset: u32,
    /// Offset of the module directives table
    pub module_directives_table_offset: u32,
    /// Number of module directives
    pub module_directives_count: u32,
    /// Offset of the fixup page table
    pub fixup_page_table_offset: u32,
    /// Offset of the fixup record table
    pub fixup_record_table_offset: u32,
    /// Offset of the imported module names table
    pub imported_modules_name_table_offset: u32,
    /// Number of imported modules
    pub imported_modules_count: u32,
    /// Offset of the import procedure names table
    pub import_procedure_name_table_offset: u32,
    /// Offset of the per-page checksum table
    pub per_page_checksum_table_offset: u32,
    /// File offset of the data pages
    pub data_pages_offset: u32,
    /// Number of preload pages
    pub preload_page_count: u32,
    /// File offset of the non-resident names table
    pub non_resident_names_table_offset: u32,
    /// Length of the non-resident names table
    pub non_resident_names_table_length: u32,
    /// Checksum of the non-resident names table
    pub non_resident_names_table_checksum: u32,
    /// Automatic data object
    pub automatic_data_object: u32,
    /// File offset of the debug information
    pub debug_information_offset: u32,
    /// Length of the debug information
    pub debug_information_length: u32,
    /// Number of preload instance pages
    pub preload_instance_pages_number: u32,
    /// Number of demand instance pages
    pub demand_instance_pages_number: u32,
    /// Extra heap allocation
    pub extra_heap_allocation: u32,
}

impl InformationBlock {
    /// Whether this is the extended LX variant
    pub fn is_lx(&self) -> bool {
        self.signature == LX_SIGNATURE
    }
}

/// Object table entry (24 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
pub struct ObjectTableEntry {
    /// Virtual size of the object
    pub virtual_segment_size: u32,
    /// Relocation base address
    pub relocation_base_address: u32,
    /// Object flags
    pub object_flags: u32,
    /// First page map entry of the object, 1-based
    pub page_table_index: u32,
    /// Number of page map entries
    pub page_table_entries: u32,
    /// Reserved
    pub reserved: u32,
}

/// Object page map entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPageMapEntry {
    /// LE entry (4 bytes)
    Le {
        /// 24-bit page number, 1-based
        page_number: u32,
        /// Page flags
        flags: u8,
    },
    /// LX entry (8 bytes)
    Lx {
        /// Page data offset, shifted by the page offset shift
        page_data_offset: u32,
        /// Size of the page data
        data_size: u16,
        /// Page flags
        flags: u16,
    },
}

/// Resource table entry (14 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
pub struct ResourceTableEntry {
    /// Resource type
    pub type_id: u16,
    /// Resource name id
    pub name_id: u16,
    /// Resource size
    pub resource_size: u32,
    /// Object holding the resource
    pub object_number: u16,
    /// Offset inside the object
    pub offset: u32,
}

/// Module directive (8 bytes) and its decoded data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDirective {
    /// Directive number
    pub directive_number: u16,
    /// Length of the directive data
    pub directive_data_length: u16,
    /// Offset of the directive data
    pub directive_data_offset: u32,
    /// Data the directive points at
    pub data: DirectiveData,
}

/// Verify record directive number
pub const VERIFY_RECORD_DIRECTIVE: u16 = 0x8001;

/// Verify record entry (12 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
pub struct VerifyRecordEntry {
    /// Ordinal of the imported module
    pub ordinal_index: u16,
    /// Expected module version
    pub version: u16,
    /// Number of object entries
    pub object_entries_count: u16,
    /// Object number in the module
    pub object_number_in_module: u16,
    /// Expected load base address
    pub object_load_base_address: u16,
    /// Expected virtual size
    pub object_virtual_address_size: u16,
}

/// Data of one module directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveData {
    /// Verify record table
    VerifyRecord {
        /// Number of entries stated by the table
        entry_count: u16,
        /// Entries
        entries: Vec<VerifyRecordEntry>,
    },
    /// Directive without a decoded shape
    Unparsed,
}

/// Debug information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInformation {
    /// Signature, `NB0` for CodeView
    pub signature: String,
    /// Debug format type
    pub format_type: u8,
    /// Debugger data
    pub debugger_data: Vec<u8>,
}
