//! DS common header and DSi extended header

use crate::cursor::Encoding;
use binrw::BinRead;

/// DS-only cart
pub const UNIT_CODE_NDS: u8 = 0x00;
/// DSi-enhanced cart
pub const UNIT_CODE_NDS_DSI: u8 = 0x02;
/// DSi-exclusive cart
pub const UNIT_CODE_DSI: u8 = 0x03;

/// Size of the common header
pub const COMMON_HEADER_SIZE: u64 = 0x180;

/// Common header (0x180 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CommonHeader {
    /// Game title
    #[br(map = |raw: [u8; 12]| Encoding::Ascii.decode_fixed(&raw))]
    pub game_title: String,
    /// Game code
    pub game_code: u32,
    /// Maker code
    #[br(map = |raw: [u8; 2]| Encoding::Ascii.decode_fixed(&raw))]
    pub maker_code: String,
    /// Unit code, selects the DSi extended header
    pub unit_code: u8,
    /// Encryption seed select
    pub encryption_seed_select: u8,
    /// Device capacity, `128 KiB << n`
    pub device_capacity: u8,
    /// Reserved
    pub reserved_1: [u8; 7],
    /// Game revision
    pub game_revision: u16,
    /// ROM version
    pub rom_version: u8,
    /// Internal flags
    pub internal_flags: u8,
    /// ARM9 ROM offset
    pub arm9_rom_offset: u32,
    /// ARM9 entry address
    pub arm9_entry_address: u32,
    /// ARM9 load address
    pub arm9_load_address: u32,
    /// ARM9 size
    pub arm9_size: u32,
    /// ARM7 ROM offset
    pub arm7_rom_offset: u32,
    /// ARM7 entry address
    pub arm7_entry_address: u32,
    /// ARM7 load address
    pub arm7_load_address: u32,
    /// ARM7 size
    pub arm7_size: u32,
    /// File name table offset
    pub file_name_table_offset: u32,
    /// File name table length
    pub file_name_table_length: u32,
    /// File allocation table offset
    pub file_allocation_table_offset: u32,
    /// File allocation table length
    pub file_allocation_table_length: u32,
    /// ARM9 overlay offset
    pub arm9_overlay_offset: u32,
    /// ARM9 overlay length
    pub arm9_overlay_length: u32,
    /// ARM7 overlay offset
    pub arm7_overlay_offset: u32,
    /// ARM7 overlay length
    pub arm7_overlay_length: u32,
    /// Normal card control register settings
    pub normal_card_control_register_settings: u32,
    /// Secure card control register settings
    pub secure_card_control_register_settings: u32,
    /// Icon and banner offset
    pub icon_banner_offset: u32,
    /// Secure area CRC
    pub secure_area_crc: u16,
    /// Secure transfer timeout
    pub secure_transfer_timeout: u16,
    /// ARM9 autoload
    pub arm9_autoload: u32,
    /// ARM7 autoload
    pub arm7_autoload: u32,
    /// Secure disable
    pub secure_disable: [u8; 8],
    /// NTR region ROM size
    pub ntr_region_rom_size: u32,
    /// Header size
    pub header_size: u32,
    /// Reserved
    pub reserved_2: [u8; 56],
    /// Nintendo logo
    pub nintendo_logo: [u8; 156],
    /// Nintendo logo CRC
    pub nintendo_logo_crc: u16,
    /// Header CRC
    pub header_crc: u16,
    /// Reserved for debuggers
    pub debugger_reserved: [u8; 0x20],
}

impl CommonHeader {
    /// Whether the unit code announces a DSi extended header
    pub fn has_dsi_header(&self) -> bool {
        matches!(self.unit_code, UNIT_CODE_NDS_DSI | UNIT_CODE_DSI)
    }
}

/// DSi extended header (0xE80 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExtendedDsiHeader {
    /// Global MBK1 to MBK5 settings
    pub global_mbk_1_to_5_settings: [u32; 5],
    /// Local MBK6 to MBK8 settings for ARM9
    pub local_mbk_6_to_8_settings_arm9: [u32; 3],
    /// Local MBK6 to MBK8 settings for ARM7
    pub local_mbk_6_to_8_settings_arm7: [u32; 3],
    /// Global MBK9 setting
    pub global_mbk_9_setting: u32,
    /// Region flags
    pub region_flags: u32,
    /// Access control
    pub access_control: u32,
    /// ARM7 SCFG EXT mask
    pub arm7_scfg_ext_mask: u32,
    /// Reserved flags
    pub reserved_flags: u32,
    /// ARM9i ROM offset
    pub arm9i_rom_offset: u32,
    /// Reserved
    pub reserved_3: u32,
    /// ARM9i load address
    pub arm9i_load_address: u32,
    /// ARM9i size
    pub arm9i_size: u32,
    /// ARM7i ROM offset
    pub arm7i_rom_offset: u32,
    /// Reserved
    pub reserved_4: u32,
    /// ARM7i load address
    pub arm7i_load_address: u32,
    /// ARM7i size
    pub arm7i_size: u32,
    /// Digest NTR region offset
    pub digest_ntr_region_offset: u32,
    /// Digest NTR region length
    pub digest_ntr_region_length: u32,
    /// Digest TWL region offset
    pub digest_twl_region_offset: u32,
    /// Digest TWL region length
    pub digest_twl_region_length: u32,
    /// Digest sector hashtable region offset
    pub digest_sector_hashtable_region_offset: u32,
    /// Digest sector hashtable region length
    pub digest_sector_hashtable_region_length: u32,
    /// Digest block hashtable region offset
    pub digest_block_hashtable_region_offset: u32,
    /// Digest block hashtable region length
    pub digest_block_hashtable_region_length: u32,
    /// Digest sector size
    pub digest_sector_size: u32,
    /// Digest block sector count
    pub digest_block_sector_count: u32,
    /// Icon and banner size
    pub icon_banner_size: u32,
    /// Unknown
    pub unknown_1: u32,
    /// NTR and TWL region ROM size
    pub ntr_twl_region_rom_size: u32,
    /// Unknown
    pub unknown_2: [u8; 0x0C],
    /// Modcrypt area 1 offset
    pub modcrypt_area_1_offset: u32,
    /// Modcrypt area 1 size
    pub modcrypt_area_1_size: u32,
    /// Modcrypt area 2 offset
    pub modcrypt_area_2_offset: u32,
    /// Modcrypt area 2 size
    pub modcrypt_area_2_size: u32,
    /// Title ID
    pub title_id: [u8; 8],
    /// DSiWare public.sav size
    pub dsiware_public_sav_size: u32,
    /// DSiWare private.sav size
    pub dsiware_private_sav_size: u32,
    /// Reserved, zero
    pub reserved_zero: [u8; 0xB0],
    /// Age ratings
    pub age_ratings: [u8; 0x10],
    /// ARM9 (with secure area) SHA-1 HMAC
    pub arm9_with_secure_area_sha1_hmac_hash: [u8; 20],
    /// ARM7 SHA-1 HMAC
    pub arm7_sha1_hmac_hash: [u8; 20],
    /// Digest master SHA-1 HMAC
    pub digest_master_sha1_hmac_hash: [u8; 20],
    /// Banner SHA-1 HMAC
    pub banner_sha1_hmac_hash: [u8; 20],
    /// ARM9i (decrypted) SHA-1 HMAC
    pub arm9i_decrypted_sha1_hmac_hash: [u8; 20],
    /// ARM7i (decrypted) SHA-1 HMAC
    pub arm7i_decrypted_sha1_hmac_hash: [u8; 20],
    /// Reserved
    pub reserved_5: [u8; 0x28],
    /// ARM9 (without secure area) SHA-1 HMAC
    pub arm9_no_secure_area_sha1_hmac_hash: [u8; 20],
    /// Reserved
    #[br(count = 0xA4C)]
    pub reserved_6: Vec<u8>,
    /// Reserved and unchecked region
    #[br(count = 0x180)]
    pub reserved_and_unchecked: Vec<u8>,
    /// RSA signature
    pub rsa_signature: [u8; 0x80],
}

/// Cart header, shaped by the unit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// DS cart, common header only
    Nds(CommonHeader),
    /// DSi-enhanced or DSi-exclusive cart
    Dsi {
        /// Common header
        common: CommonHeader,
        /// Extended header, absent when truncated
        extended: Option<Box<ExtendedDsiHeader>>,
    },
}

impl Header {
    /// The common header of either shape
    pub fn common(&self) -> &CommonHeader {
        match self {
            Self::Nds(common) | Self::Dsi { common, .. } => common,
        }
    }

    /// The DSi extended header, when there is one
    pub fn extended(&self) -> Option<&ExtendedDsiHeader> {
        match self {
            Self::Nds(_) => None,
            Self::Dsi { extended, .. } => extended.as_deref(),
        }
    }
}
