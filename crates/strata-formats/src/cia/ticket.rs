//! Ticket (big-endian)

use super::certificate::Signature;
use crate::cursor::Encoding;
use binrw::BinRead;

/// Upper bound for the variable content index
pub const MAX_CONTENT_INDEX_SIZE: u32 = 0x1_0000;

/// Title ticket
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct Ticket {
    /// Signature over the ticket body
    pub signature: Signature,
    /// Issuer
    #[br(map = |raw: [u8; 0x40]| Encoding::Ascii.decode_fixed(&raw))]
    pub issuer: String,
    /// ECC public key
    pub ecc_public_key: [u8; 0x3C],
    /// Ticket format version
    pub version: u8,
    /// CA CRL version
    pub ca_crl_version: u8,
    /// Signer CRL version
    pub signer_crl_version: u8,
    /// Encrypted title key
    pub title_key: [u8; 0x10],
    /// Reserved
    pub reserved_1: u8,
    /// Ticket ID
    pub ticket_id: u64,
    /// Console ID
    pub console_id: u32,
    /// Title ID
    pub title_id: u64,
    /// Reserved
    pub reserved_2: [u8; 2],
    /// Title version the ticket applies to
    pub ticket_title_version: u16,
    /// Reserved
    pub reserved_3: [u8; 8],
    /// License type
    pub license_type: u8,
    /// Common KeyY index
    pub common_key_y_index: u8,
    /// Reserved
    pub reserved_4: [u8; 0x2A],
    /// eShop account ID
    pub eshop_account_id: u32,
    /// Reserved
    pub reserved_5: u8,
    /// Audit
    pub audit: u8,
    /// Reserved
    pub reserved_6: [u8; 0x42],
    /// Limits
    pub limits: [u32; 0x10],
    /// Content index header words
    pub content_index_header: [u8; 4],
    /// Total size of the content index, header included
    pub content_index_size: u32,
    /// Rest of the content index
    #[br(count = content_index_size.saturating_sub(8).min(MAX_CONTENT_INDEX_SIZE))]
    pub content_index: Vec<u8>,
}
