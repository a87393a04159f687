//! NCCH partitions, their extended headers and filesystem headers

use super::exheader::ExtendedHeader;
use super::fs::{ExeFsHeader, RomFsHeader};
use crate::cursor::{ByteCursor, Encoding};
use crate::error::{Result, recover};
use binrw::BinRead;
use tracing::debug;

/// NCCH magic at offset 0x100 of a partition
pub const NCCH_MAGIC: [u8; 4] = *b"NCCH";

/// Size of the NCCH header
pub const NCCH_HEADER_SIZE: u64 = 0x200;

/// NCCH header (0x200 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct NcchHeader {
    /// RSA-2048 signature of the header
    pub rsa_2048_signature: [u8; 0x100],
    /// Magic, `NCCH` for a valid partition
    pub magic: [u8; 4],
    /// Content size in media units
    pub content_size_in_media_units: u32,
    /// Partition ID
    pub partition_id: u64,
    /// Maker code
    pub maker_code: u16,
    /// Version
    pub version: u16,
    /// Verification hash
    pub verification_hash: u32,
    /// Program ID
    pub program_id: u64,
    /// Reserved
    pub reserved_1: [u8; 0x10],
    /// SHA-256 of the logo region
    pub logo_region_hash: [u8; 0x20],
    /// Product code, e.g. `CTR-P-ABCD`
    #[br(map = |raw: [u8; 0x10]| Encoding::Ascii.decode_fixed(&raw))]
    pub product_code: String,
    /// SHA-256 of the first 0x400 bytes of the extended header
    pub extended_header_hash: [u8; 0x20],
    /// Size of the extended header, without the access descriptor
    pub extended_header_size_in_bytes: u32,
    /// Reserved
    pub reserved_2: u32,
    /// Partition flags
    pub flags: [u8; 8],
    /// Plain region offset in media units
    pub plain_region_offset_in_media_units: u32,
    /// Plain region size in media units
    pub plain_region_size_in_media_units: u32,
    /// Logo region offset in media units
    pub logo_region_offset_in_media_units: u32,
    /// Logo region size in media units
    pub logo_region_size_in_media_units: u32,
    /// ExeFS offset in media units
    pub exefs_offset_in_media_units: u32,
    /// ExeFS size in media units
    pub exefs_size_in_media_units: u32,
    /// ExeFS hash region size in media units
    pub exefs_hash_region_size_in_media_units: u32,
    /// Reserved
    pub reserved_3: u32,
    /// RomFS offset in media units
    pub romfs_offset_in_media_units: u32,
    /// RomFS size in media units
    pub romfs_size_in_media_units: u32,
    /// RomFS hash region size in media units
    pub romfs_hash_region_size_in_media_units: u32,
    /// Reserved
    pub reserved_4: u32,
    /// SHA-256 of the ExeFS superblock
    pub exefs_superblock_hash: [u8; 0x20],
    /// SHA-256 of the RomFS superblock
    pub romfs_superblock_hash: [u8; 0x20],
}

/// A valid NCCH partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcchPartition {
    /// NCCH header
    pub header: NcchHeader,
    /// Extended header, when the header declares one
    pub extended_header: Option<ExtendedHeader>,
    /// ExeFS header
    pub exefs_header: Option<ExeFsHeader>,
    /// RomFS header
    pub romfs_header: Option<RomFsHeader>,
}

/// Outcome of decoding one partition slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// Zero-length slot or an all-zero magic
    Empty,
    /// Data present but not an NCCH header
    Unrecognized,
    /// Valid NCCH partition
    Ncch(Box<NcchPartition>),
}

impl Partition {
    /// Decode the partition starting at `offset`
    ///
    /// Sub-region offsets inside the NCCH header are scaled by `media_unit`.
    pub(crate) fn read(data: &[u8], offset: u64, media_unit: u64) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: NcchHeader = cursor.read()?;
        if header.magic == [0; 4] {
            return Ok(Self::Empty);
        }
        if header.magic != NCCH_MAGIC {
            debug!(offset, magic = ?header.magic, "unrecognized partition");
            return Ok(Self::Unrecognized);
        }

        let extended_header = if header.extended_header_size_in_bytes == 0 {
            None
        } else {
            cursor.seek_to(offset + NCCH_HEADER_SIZE)?;
            recover("ncch extended header", cursor.read::<ExtendedHeader>())?
        };

        let region = |region_offset: u32, region_size: u32| {
            (region_offset != 0 && region_size != 0)
                .then(|| offset + u64::from(region_offset) * media_unit)
        };
        let exefs_header = match region(
            header.exefs_offset_in_media_units,
            header.exefs_size_in_media_units,
        ) {
            Some(start) => recover(
                "exefs header",
                ByteCursor::at(data, start).and_then(|mut c| c.read::<ExeFsHeader>()),
            )?,
            None => None,
        };
        let romfs_header = match region(
            header.romfs_offset_in_media_units,
            header.romfs_size_in_media_units,
        ) {
            Some(start) => recover(
                "romfs header",
                ByteCursor::at(data, start).and_then(|mut c| c.read::<RomFsHeader>()),
            )?,
            None => None,
        };

        Ok(Self::Ncch(Box::new(NcchPartition {
            header,
            extended_header,
            exefs_header,
            romfs_header,
        })))
    }
}
