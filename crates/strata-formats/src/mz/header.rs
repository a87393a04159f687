//! MS-DOS executable header records

use binrw::BinRead;

/// MS-DOS signature
pub const MZ_SIGNATURE: [u8; 2] = *b"MZ";

/// Header (28 bytes, 64 with the extension)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Signature, always `MZ`
    #[br(assert(magic == MZ_SIGNATURE, "expected MZ, got {:?}", magic))]
    pub magic: [u8; 2],
    /// Bytes used on the last page
    pub last_page_bytes: u16,
    /// Number of 512-byte pages
    pub pages: u16,
    /// Number of relocation entries
    pub relocation_items: u16,
    /// Header size in paragraphs
    pub header_paragraph_size: u16,
    /// Minimum extra paragraphs
    pub minimum_extra_paragraphs: u16,
    /// Maximum extra paragraphs
    pub maximum_extra_paragraphs: u16,
    /// Initial SS value
    pub initial_ss_value: u16,
    /// Initial SP value
    pub initial_sp_value: u16,
    /// Checksum
    pub checksum: u16,
    /// Initial IP value
    pub initial_ip_value: u16,
    /// Initial CS value
    pub initial_cs_value: u16,
    /// Offset of the relocation table
    pub relocation_table_addr: u16,
    /// Overlay number
    pub overlay_number: u16,
    /// Extension carried by headers of at least four paragraphs
    #[br(if(header_paragraph_size >= 4))]
    pub extension: Option<HeaderExtension>,
}

impl Header {
    /// Offset of the new executable header, if the extension is present
    pub fn new_exe_header_addr(&self) -> Option<u32> {
        self.extension.as_ref().map(|ext| ext.new_exe_header_addr)
    }
}

/// Header extension (36 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct HeaderExtension {
    /// Reserved
    pub reserved1: [u16; 4],
    /// OEM identifier
    pub oem_identifier: u16,
    /// OEM information
    pub oem_information: u16,
    /// Reserved
    pub reserved2: [u16; 10],
    /// Offset of the new executable header
    pub new_exe_header_addr: u32,
}

/// Relocation entry (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct RelocationEntry {
    /// Offset of the fixup
    pub offset: u16,
    /// Segment of the fixup
    pub segment: u16,
}
