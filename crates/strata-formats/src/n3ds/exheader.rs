//! NCCH extended header (0x800 bytes)

use crate::cursor::Encoding;
use binrw::BinRead;

/// Decode fixed 8-byte service names, dropping unused slots
fn service_names<const N: usize>(raw: [[u8; 8]; N]) -> Vec<String> {
    raw.iter()
        .map(|name| Encoding::Ascii.decode_fixed(name))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Address and size of a code segment
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct CodeSetInfo {
    /// Load address
    pub address: u32,
    /// Physical region size in pages
    pub physical_region_size_in_pages: u32,
    /// Size in bytes
    pub size_in_bytes: u32,
}

/// System control info (0x200 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct SystemControlInfo {
    /// Application title
    #[br(map = |raw: [u8; 8]| Encoding::Ascii.decode_fixed(&raw))]
    pub application_title: String,
    /// Flags, bit 0 compresses `.code`, bit 1 marks SD applications
    #[br(pad_before = 5)]
    pub flag: u8,
    /// Remaster version
    pub remaster_version: u16,
    /// Text code set
    pub text_code_set_info: CodeSetInfo,
    /// Stack size
    pub stack_size: u32,
    /// Read-only code set
    pub read_only_code_set_info: CodeSetInfo,
    /// Data code set
    #[br(pad_before = 4)]
    pub data_code_set_info: CodeSetInfo,
    /// BSS size
    pub bss_size: u32,
    /// Title IDs of required modules
    pub dependency_module_list: [u64; 48],
    /// Save data size
    pub save_data_size: u64,
    /// Jump ID
    #[br(pad_after = 0x30)]
    pub jump_id: u64,
}

/// Storage access rights
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct StorageInfo {
    /// Extdata ID
    pub extdata_id: u64,
    /// System savedata IDs
    pub system_savedata_ids: [u8; 8],
    /// Storage accessible unique IDs
    pub storage_accessible_unique_ids: [u8; 8],
    /// Filesystem access info
    pub file_system_access_info: [u8; 7],
    /// Other attributes
    pub other_attributes: u8,
}

/// ARM11 local system capabilities (0x170 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Arm11LocalSystemCapabilities {
    /// Program ID
    pub program_id: u64,
    /// Core version
    pub core_version: u32,
    /// Flag 1
    pub flag_1: u8,
    /// Flag 2
    pub flag_2: u8,
    /// Flag 0
    pub flag_0: u8,
    /// Thread priority
    pub priority: u8,
    /// Resource limit descriptors
    pub resource_limit_descriptors: [u16; 16],
    /// Storage info
    pub storage_info: StorageInfo,
    /// Accessible services
    #[br(map = |raw: [[u8; 8]; 32]| service_names(raw))]
    pub service_access_control: Vec<String>,
    /// Extended accessible services
    #[br(map = |raw: [[u8; 8]; 2]| service_names(raw))]
    pub extended_service_access_control: Vec<String>,
    /// Resource limit category
    #[br(pad_before = 0x0F)]
    pub resource_limit_category: u8,
}

/// ARM11 kernel capabilities (0x80 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Arm11KernelCapabilities {
    /// Kernel capability descriptors
    #[br(pad_after = 0x10)]
    pub descriptors: [u32; 28],
}

/// ARM9 access control (0x10 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Arm9AccessControl {
    /// Access descriptors
    pub descriptors: [u8; 15],
    /// Descriptor version
    pub descriptor_version: u8,
}

/// Access control info (0x200 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct AccessControlInfo {
    /// ARM11 local system capabilities
    pub arm11_local_system_capabilities: Arm11LocalSystemCapabilities,
    /// ARM11 kernel capabilities
    pub arm11_kernel_capabilities: Arm11KernelCapabilities,
    /// ARM9 access control
    pub arm9_access_control: Arm9AccessControl,
}

/// Extended header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ExtendedHeader {
    /// System control info
    pub system_control_info: SystemControlInfo,
    /// Access control info
    pub access_control_info: AccessControlInfo,
    /// Signature of the access descriptor
    pub access_descriptor_signature: [u8; 0x100],
    /// NCCH header public key
    pub ncch_hdr_public_key: [u8; 0x100],
    /// Access control info used as the limit for the first one
    pub access_control_info_for_limitations: AccessControlInfo,
}
