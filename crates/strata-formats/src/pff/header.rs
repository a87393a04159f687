//! PFF header, segment and footer records

use crate::cursor::Encoding;
use binrw::BinRead;

/// Version 2 signature
pub const SIGNATURE_PFF2: [u8; 4] = *b"PFF2";
/// Version 3 signature
pub const SIGNATURE_PFF3: [u8; 4] = *b"PFF3";
/// Version 4 signature
pub const SIGNATURE_PFF4: [u8; 4] = *b"PFF4";

/// Tag closing the footer
pub const KING_TAG: [u8; 4] = *b"KING";

/// Segment size that adds the modified date
pub const SEGMENT_SIZE_MODIFIED_DATE: u32 = 0x24;
/// Segment size that adds the compression level
pub const SEGMENT_SIZE_COMPRESSION_LEVEL: u32 = 0x28;

/// Archive header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Size of this header
    pub header_size: u32,
    /// Signature, `PFF2`, `PFF3` or `PFF4`
    #[br(assert(
        [SIGNATURE_PFF2, SIGNATURE_PFF3, SIGNATURE_PFF4].contains(&signature),
        "expected PFF2, PFF3 or PFF4, got {:?}",
        signature
    ))]
    pub signature: [u8; 4],
    /// Number of file segments
    pub number_of_files: u32,
    /// Size of each file segment
    pub file_segment_size: u32,
    /// Offset of the first file segment
    pub file_list_offset: u32,
}

/// File segment
///
/// Later archive versions grow the segment; the trailing fields are only
/// present when the header's segment size covers them.
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(segment_size: u32))]
pub struct Segment {
    /// Nonzero when the file was deleted
    pub deleted: u32,
    /// Offset of the file data
    pub file_location: u32,
    /// Size of the file data
    pub file_size: u32,
    /// Packed date
    pub packed_date: u32,
    /// File name
    #[br(map = |raw: [u8; 16]| Encoding::Ascii.decode_fixed(&raw))]
    pub file_name: String,
    /// Modified date
    #[br(if(segment_size >= SEGMENT_SIZE_MODIFIED_DATE))]
    pub modified_date: Option<u32>,
    /// Compression level
    #[br(if(segment_size >= SEGMENT_SIZE_COMPRESSION_LEVEL))]
    pub compression_level: Option<u32>,
}

/// Archive footer
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Footer {
    /// IP address of the packing system
    pub system_ip: u32,
    /// Reserved
    pub reserved: u32,
    /// Tag, always `KING`
    #[br(assert(king_tag == KING_TAG, "expected KING, got {:?}", king_tag))]
    pub king_tag: [u8; 4],
}
