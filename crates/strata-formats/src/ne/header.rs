//! NE header and segment table

use binrw::BinRead;

/// New executable signature
pub const NE_SIGNATURE: [u8; 2] = *b"NE";

/// Segment alignment used when the header stores a shift of zero
pub const DEFAULT_ALIGNMENT_SHIFT: u16 = 9;

/// NE header (64 bytes)
///
/// Table offsets are relative to the start of this header, except the
/// non-resident name table which is relative to the start of the file.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Signature, always `NE`
    #[br(assert(magic == NE_SIGNATURE, "expected NE, got {:?}", magic))]
    pub magic: [u8; 2],
    /// Linker version
    pub linker_version: u8,
    /// Linker revision
    pub linker_revision: u8,
    /// Offset of the entry table
    pub entry_table_offset: u16,
    /// Size of the entry table in bytes
    pub entry_table_size: u16,
    /// CRC of the whole file
    pub crc_checksum: u32,
    /// Module flags
    pub flag_word: u16,
    /// Automatic data segment number
    pub automatic_data_segment_number: u16,
    /// Initial local heap size
    pub initial_heap_alloc: u16,
    /// Initial stack size
    pub initial_stack_alloc: u16,
    /// Initial CS:IP
    pub initial_cs_ip_setting: u32,
    /// Initial SS:SP
    pub initial_ss_sp_setting: u32,
    /// Number of segment table entries
    pub file_segment_count: u16,
    /// Number of module reference table entries
    pub module_reference_table_size: u16,
    /// Size of the non-resident name table in bytes
    pub non_resident_name_table_size: u16,
    /// Offset of the segment table
    pub segment_table_offset: u16,
    /// Offset of the resource table
    pub resource_table_offset: u16,
    /// Offset of the resident name table
    pub resident_name_table_offset: u16,
    /// Offset of the module reference table
    pub module_reference_table_offset: u16,
    /// Offset of the imported names table
    pub imported_names_table_offset: u16,
    /// File offset of the non-resident name table
    pub non_resident_names_table_offset: u32,
    /// Number of movable entries
    pub movable_entries_count: u16,
    /// Segment alignment shift
    pub segment_alignment_shift_count: u16,
    /// Number of resource entries
    pub resource_entries_count: u16,
    /// Target operating system
    pub target_operating_system: u8,
    /// Additional flags
    pub additional_flags: u8,
    /// Offset of the return thunks
    pub return_thunk_offset: u16,
    /// Offset of the segment reference thunks
    pub segment_reference_thunk_offset: u16,
    /// Minimum code swap area size
    pub min_code_swap_area_size: u16,
    /// Expected Windows revision
    pub windows_sdk_revision: u8,
    /// Expected Windows version
    pub windows_sdk_version: u8,
}

impl Header {
    /// Effective segment alignment shift
    pub fn alignment_shift(&self) -> u16 {
        match self.segment_alignment_shift_count {
            0 => DEFAULT_ALIGNMENT_SHIFT,
            shift => shift,
        }
    }
}

/// Segment table entry (8 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct SegmentTableEntry {
    /// Segment data offset in alignment units, zero when there is no data
    pub offset: u16,
    /// Segment length, zero meaning 64K
    pub length: u16,
    /// Segment flags
    pub flag_word: u16,
    /// Minimum allocation size, zero meaning 64K
    pub minimum_allocation_size: u16,
}
