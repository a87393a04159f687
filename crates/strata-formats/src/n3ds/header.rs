//! NCSD header, card info header and development card info

use binrw::BinRead;

/// NCSD magic at offset 0x100
pub const NCSD_MAGIC: [u8; 4] = *b"NCSD";

/// Number of partition slots in an NCSD image
pub const PARTITION_COUNT: usize = 8;

/// Smallest media unit, scaled by the media unit size flag
pub const BASE_MEDIA_UNIT: u64 = 0x200;

/// Index of the media unit size in the partition flags
pub const MEDIA_UNIT_SIZE_FLAG: usize = 6;

/// Offset and length of a partition, in media units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct PartitionTableEntry {
    /// Offset in media units
    pub offset: u32,
    /// Length in media units
    pub length: u32,
}

/// NCSD header (0x200 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct NcsdHeader {
    /// RSA-2048 SHA-256 signature of the header
    pub rsa_2048_signature: [u8; 0x100],
    /// Magic, always `NCSD`
    #[br(assert(magic == NCSD_MAGIC, "expected NCSD, got {:?}", magic))]
    pub magic: [u8; 4],
    /// Image size in media units
    pub image_size_in_media_units: u32,
    /// Media ID
    pub media_id: u64,
    /// Partition filesystem types
    pub partitions_fs_type: [u8; 8],
    /// Partition crypt types
    pub partitions_crypt_type: [u8; 8],
    /// Partition offsets and lengths
    pub partitions_table: [PartitionTableEntry; PARTITION_COUNT],
    /// SHA-256 of the first partition's extended header
    pub extended_header_sha256_hash: [u8; 0x20],
    /// Size of the additional header
    pub additional_header_size: u32,
    /// Offset of sector zero
    pub sector_zero_offset: u32,
    /// Partition flags; index 6 holds the media unit size exponent
    pub partition_flags: [u8; 8],
    /// Title ID of every partition
    pub partition_id_table: [u64; PARTITION_COUNT],
    /// Anti-piracy byte
    #[br(pad_before = 0x2E)]
    pub firmware_update_byte_1: u8,
    /// Save crypto byte
    pub firmware_update_byte_2: u8,
}

impl NcsdHeader {
    /// Size of one media unit in bytes
    pub fn media_unit_size(&self) -> u64 {
        let exponent = u32::from(self.partition_flags[MEDIA_UNIT_SIZE_FLAG]).min(16);
        BASE_MEDIA_UNIT << exponent
    }
}

/// Card info header at 0x200, including the initial data at 0x1000
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CardInfoHeader {
    /// Writable region address in media units
    pub writable_address_media_units: u32,
    /// Card info bitmask
    pub card_info_bitmask: u32,
    /// Filled size of the cartridge
    #[br(pad_before = 0xF8)]
    pub filled_size: u64,
    /// Title version
    #[br(pad_before = 0x0C)]
    pub title_version: u16,
    /// Card revision
    pub card_revision: u16,
    /// Card seed KeyY
    #[br(pad_before = 0xCE8)]
    pub card_seed_key_y: [u8; 0x10],
    /// Encrypted card seed
    pub encrypted_card_seed: [u8; 0x10],
    /// Card seed AES-MAC
    pub card_seed_aes_mac: [u8; 0x10],
    /// Card seed nonce
    pub card_seed_nonce: [u8; 0x0C],
    /// Copy of the first partition's NCCH header, signature excluded
    #[br(pad_before = 0xC4)]
    pub backup_header: [u8; 0x100],
}

/// Development card info header at 0x1200
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct DevelopmentCardInfoHeader {
    /// Card device reserved area
    #[br(count = 0x200)]
    pub card_device_reserved_1: Vec<u8>,
    /// Title key
    pub title_key: [u8; 0x10],
    /// Card device reserved area
    #[br(count = 0x1BF0)]
    pub card_device_reserved_2: Vec<u8>,
    /// Test data
    #[br(count = 0x1000)]
    pub test_data: Vec<u8>,
}
