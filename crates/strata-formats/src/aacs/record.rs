//! Media key block records
//!
//! Every record starts with a one-byte type and a 24-bit big-endian length
//! that counts the four header bytes. Bodies are decoded from their own
//! bounded slice, so a malformed body can never read into the next record.

use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;
use binrw::BinRead;

/// End of media key block
pub const RECORD_END_OF_MEDIA_KEY_BLOCK: u8 = 0x02;
/// Explicit subset-difference record
pub const RECORD_EXPLICIT_SUBSET_DIFFERENCE: u8 = 0x04;
/// Media key data record
pub const RECORD_MEDIA_KEY_DATA: u8 = 0x05;
/// Subset-difference index record
pub const RECORD_SUBSET_DIFFERENCE_INDEX: u8 = 0x07;
/// Type and version record
pub const RECORD_TYPE_AND_VERSION: u8 = 0x10;
/// Drive revocation list record
pub const RECORD_DRIVE_REVOCATION_LIST: u8 = 0x20;
/// Host revocation list record
pub const RECORD_HOST_REVOCATION_LIST: u8 = 0x21;
/// Copyright record
pub const RECORD_COPYRIGHT: u8 = 0x7F;
/// Verify media key record
pub const RECORD_VERIFY_MEDIA_KEY: u8 = 0x81;

/// Size of the signature closing each revocation list block
pub const REVOCATION_SIGNATURE_SIZE: u64 = 40;

/// One record of a media key block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record type
    pub record_type: u8,
    /// Record length, header included
    pub length: u32,
    /// Type-specific body
    pub body: RecordBody,
}

impl Record {
    /// Read one record and step over its full stated length
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<Self> {
        let start = cursor.position();
        let record_type = cursor.read_u8()?;
        let length = cursor.read_u24_be()?;
        let body = match cursor.take(u64::from(length).saturating_sub(4)) {
            Ok(bytes) => RecordBody::read(record_type, &mut ByteCursor::new(bytes), limit),
            Err(err) => Err(err),
        };
        body.map(|body| Self {
            record_type,
            length,
            body,
        })
        .inspect_err(|_| {
            let _ = cursor.seek_to(start);
        })
    }

    /// Whether this record closes the block
    pub fn is_end(&self) -> bool {
        matches!(self.body, RecordBody::EndOfMediaKeyBlock { .. })
    }
}

/// Record body, keyed by the record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    /// Signature over the whole block
    EndOfMediaKeyBlock {
        /// Signature data
        signature_data: Vec<u8>,
    },
    /// Subset differences listed explicitly
    ExplicitSubsetDifference {
        /// Subset differences
        subset_differences: Vec<SubsetDifference>,
    },
    /// Encrypted media keys, one per subset difference
    MediaKeyData {
        /// 16-byte media keys
        media_keys: Vec<[u8; 16]>,
    },
    /// Index speeding up subset-difference lookup
    SubsetDifferenceIndex {
        /// Number of devices per index offset
        span: u32,
        /// 24-bit offsets into the explicit subset-difference record
        offsets: Vec<u32>,
    },
    /// Block type and version number
    TypeAndVersion {
        /// Media key block type
        media_key_block_type: u32,
        /// Version number
        version_number: u32,
    },
    /// Revoked drive IDs
    DriveRevocationList {
        /// Total entries across every block
        total_number_of_entries: u32,
        /// Signed blocks of entries
        signature_blocks: Vec<RevocationSignatureBlock>,
    },
    /// Revoked host IDs
    HostRevocationList {
        /// Total entries across every block
        total_number_of_entries: u32,
        /// Signed blocks of entries
        signature_blocks: Vec<RevocationSignatureBlock>,
    },
    /// Encrypted verification value
    VerifyMediaKey {
        /// 16-byte ciphertext
        ciphertext_value: [u8; 16],
    },
    /// Copyright notice
    Copyright {
        /// Copyright text
        copyright: String,
    },
    /// A record type with no structured decoder
    Unknown {
        /// Raw body bytes
        data: Vec<u8>,
    },
}

impl RecordBody {
    fn read(record_type: u8, body: &mut ByteCursor<'_>, limit: usize) -> Result<Self> {
        Ok(match record_type {
            RECORD_END_OF_MEDIA_KEY_BLOCK => Self::EndOfMediaKeyBlock {
                signature_data: rest(body),
            },
            RECORD_EXPLICIT_SUBSET_DIFFERENCE => Self::ExplicitSubsetDifference {
                subset_differences: until_end(body, limit, |c| c.read::<SubsetDifference>())?,
            },
            RECORD_MEDIA_KEY_DATA => Self::MediaKeyData {
                media_keys: until_end(body, limit, |c| c.read_array::<16>())?,
            },
            RECORD_SUBSET_DIFFERENCE_INDEX => Self::SubsetDifferenceIndex {
                span: body.read_u32_be()?,
                offsets: until_end(body, limit, |c| c.read_u24_be())?,
            },
            RECORD_TYPE_AND_VERSION => Self::TypeAndVersion {
                media_key_block_type: body.read_u32_be()?,
                version_number: body.read_u32_be()?,
            },
            RECORD_DRIVE_REVOCATION_LIST => Self::DriveRevocationList {
                total_number_of_entries: body.read_u32_be()?,
                signature_blocks: until_end(body, limit, |c| {
                    RevocationSignatureBlock::read(c, limit)
                })?,
            },
            RECORD_HOST_REVOCATION_LIST => Self::HostRevocationList {
                total_number_of_entries: body.read_u32_be()?,
                signature_blocks: until_end(body, limit, |c| {
                    RevocationSignatureBlock::read(c, limit)
                })?,
            },
            RECORD_VERIFY_MEDIA_KEY => Self::VerifyMediaKey {
                ciphertext_value: body.read_array()?,
            },
            RECORD_COPYRIGHT => Self::Copyright {
                copyright: Encoding::Ascii.decode_fixed(&rest(body)),
            },
            _ => Self::Unknown { data: rest(body) },
        })
    }
}

/// Explicit subset difference
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct SubsetDifference {
    /// Number of low-order bits masked off the UV number
    pub mask: u8,
    /// UV number
    pub number: u32,
}

/// A run of revocation entries closed by a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationSignatureBlock {
    /// Number of entries in this block
    pub number_of_entries: u32,
    /// Revoked ID ranges
    pub entry_fields: Vec<RevocationEntry>,
    /// Signature over the block
    pub signature: Vec<u8>,
}

impl RevocationSignatureBlock {
    fn read(cursor: &mut ByteCursor<'_>, limit: usize) -> Result<Self> {
        let number_of_entries = cursor.read_u32_be()?;
        let entry_fields = cursor.read_counted(u64::from(number_of_entries), limit, |c| {
            c.read::<RevocationEntry>()
        })?;
        let signature = cursor.read_bytes(REVOCATION_SIGNATURE_SIZE.min(cursor.remaining()))?;
        Ok(Self {
            number_of_entries,
            entry_fields,
            signature,
        })
    }
}

/// Revoked drive or host ID range
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct RevocationEntry {
    /// Number of IDs following `id` that are also revoked
    pub range: u16,
    /// First revoked ID
    pub id: [u8; 6],
}

fn rest(body: &mut ByteCursor<'_>) -> Vec<u8> {
    body.read_bytes(body.remaining()).unwrap_or_default()
}

/// Read entries until the body is consumed, keeping those read before a short tail
fn until_end<T>(
    body: &mut ByteCursor<'_>,
    limit: usize,
    mut read: impl FnMut(&mut ByteCursor<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    body.read_until(limit, |c| {
        if c.remaining() == 0 {
            return Ok(None);
        }
        read(c).map(Some)
    })
}

/// Human-readable name of a record type
pub fn record_type_name(record_type: u8) -> &'static str {
    match record_type {
        RECORD_END_OF_MEDIA_KEY_BLOCK => "End of Media Key Block",
        RECORD_EXPLICIT_SUBSET_DIFFERENCE => "Explicit Subset-Difference",
        RECORD_MEDIA_KEY_DATA => "Media Key Data",
        RECORD_SUBSET_DIFFERENCE_INDEX => "Subset-Difference Index",
        RECORD_TYPE_AND_VERSION => "Type and Version",
        RECORD_DRIVE_REVOCATION_LIST => "Drive Revocation List",
        RECORD_HOST_REVOCATION_LIST => "Host Revocation List",
        RECORD_COPYRIGHT => "Copyright",
        RECORD_VERIFY_MEDIA_KEY => "Verify Media Key",
        _ => "Unknown",
    }
}
