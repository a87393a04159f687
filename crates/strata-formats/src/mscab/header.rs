//! CFHEADER, CFFOLDER, CFFILE and CFDATA records

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::{BinRead, NullString};

/// Signature at the start of every cabinet
pub const SIGNATURE: [u8; 4] = *b"MSCF";

/// A previous cabinet is named in the header
pub const FLAG_PREV_CABINET: u16 = 0x0001;
/// A next cabinet is named in the header
pub const FLAG_NEXT_CABINET: u16 = 0x0002;
/// Reserve sizes and the header reserve area are present
pub const FLAG_RESERVE_PRESENT: u16 = 0x0004;

/// File name is UTF-8 rather than the local code page
pub const ATTRIBUTE_NAME_IS_UTF: u16 = 0x0080;

/// Cabinet header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CabinetHeader {
    /// Signature, always `MSCF`
    #[br(assert(signature == SIGNATURE, "expected MSCF, got {:?}", signature))]
    pub signature: [u8; 4],
    /// Reserved
    pub reserved_1: u32,
    /// Size of the cabinet in bytes
    pub cabinet_size: u32,
    /// Reserved
    pub reserved_2: u32,
    /// Offset of the first file entry
    pub files_offset: u32,
    /// Reserved
    pub reserved_3: u32,
    /// Minor format version
    pub version_minor: u8,
    /// Major format version
    pub version_major: u8,
    /// Number of folders
    pub folder_count: u16,
    /// Number of files
    pub file_count: u16,
    /// Header flags
    pub flags: u16,
    /// Set ID shared by every cabinet of a set
    pub set_id: u16,
    /// Index of this cabinet in the set
    pub cabinet_index: u16,
    /// Size of the header reserve area
    #[br(if(flags & FLAG_RESERVE_PRESENT != 0))]
    pub header_reserved_size: Option<u16>,
    /// Size of each folder's reserve area
    #[br(if(flags & FLAG_RESERVE_PRESENT != 0))]
    pub folder_reserved_size: Option<u8>,
    /// Size of each data block's reserve area
    #[br(if(flags & FLAG_RESERVE_PRESENT != 0))]
    pub data_reserved_size: Option<u8>,
    /// Header reserve area
    #[br(count = header_reserved_size.unwrap_or(0))]
    pub reserved_data: Vec<u8>,
    /// Name of the previous cabinet
    #[br(if(flags & FLAG_PREV_CABINET != 0))]
    pub cabinet_prev: Option<NullString>,
    /// Name of the disk holding the previous cabinet
    #[br(if(flags & FLAG_PREV_CABINET != 0))]
    pub disk_prev: Option<NullString>,
    /// Name of the next cabinet
    #[br(if(flags & FLAG_NEXT_CABINET != 0))]
    pub cabinet_next: Option<NullString>,
    /// Name of the disk holding the next cabinet
    #[br(if(flags & FLAG_NEXT_CABINET != 0))]
    pub disk_next: Option<NullString>,
}

impl CabinetHeader {
    /// Reserve area size of each folder entry
    pub fn folder_reserve(&self) -> u8 {
        self.folder_reserved_size.unwrap_or(0)
    }

    /// Reserve area size of each data block
    pub fn data_reserve(&self) -> u8 {
        self.data_reserved_size.unwrap_or(0)
    }
}

/// Folder entry and the data blocks it owns
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little, import(reserved_size: u8))]
pub struct Folder {
    /// Offset of the first data block
    pub data_offset: u32,
    /// Number of data blocks
    pub data_count: u16,
    /// Compression type
    pub compression_type: u16,
    /// Folder reserve area
    #[br(count = reserved_size)]
    pub reserved_data: Vec<u8>,
    /// Data blocks, filled in after the folder table is read
    #[br(ignore)]
    pub data_blocks: Vec<DataBlock>,
}

impl Folder {
    /// Compression method in the low nibble of the compression type
    pub fn compression_name(&self) -> &'static str {
        match self.compression_type & 0x000F {
            0 => "None",
            1 => "MSZIP",
            2 => "Quantum",
            3 => "LZX",
            _ => "Unknown",
        }
    }
}

/// Data block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Checksum of the block
    pub checksum: u32,
    /// Compressed size
    pub compressed_size: u16,
    /// Uncompressed size
    pub uncompressed_size: u16,
    /// Block reserve area
    pub reserved_data: Vec<u8>,
    /// Absolute offset of the compressed bytes
    pub compressed_data_offset: u64,
}

impl DataBlock {
    /// Read a block header and step over its compressed bytes
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, reserved_size: u8) -> Result<Self> {
        let checksum = cursor.read_u32_le()?;
        let compressed_size = cursor.read_u16_le()?;
        let uncompressed_size = cursor.read_u16_le()?;
        let reserved_data = cursor.read_bytes(u64::from(reserved_size))?;
        let compressed_data_offset = cursor.position();
        cursor.skip(u64::from(compressed_size))?;
        Ok(Self {
            checksum,
            compressed_size,
            uncompressed_size,
            reserved_data,
            compressed_data_offset,
        })
    }
}

/// File entry
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FileEntry {
    /// Uncompressed size
    pub file_size: u32,
    /// Uncompressed offset inside the folder
    pub folder_start_offset: u32,
    /// Folder index, or a continuation marker
    pub folder_index: u16,
    /// MS-DOS date
    pub date: u16,
    /// MS-DOS time
    pub time: u16,
    /// Attributes
    pub attributes: u16,
    /// File name
    #[br(map = |raw: NullString| decode_name(&raw, attributes))]
    pub name: String,
}

fn decode_name(raw: &[u8], attributes: u16) -> String {
    if attributes & ATTRIBUTE_NAME_IS_UTF == 0 {
        Encoding::Latin1.decode(raw)
    } else {
        Encoding::Utf8.decode(raw)
    }
}
