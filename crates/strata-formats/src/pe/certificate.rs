//! Attribute certificate table

use crate::cursor::ByteCursor;
use crate::error::Result;

/// Size of a certificate header
const CERTIFICATE_HEADER_SIZE: u32 = 8;

/// One attribute certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCertificate {
    /// Length of the entry, header included
    pub length: u32,
    /// Certificate revision
    pub revision: u16,
    /// Certificate type
    pub certificate_type: u16,
    /// Certificate bytes
    pub certificate: Vec<u8>,
}

/// Read certificates from `start` (a file offset) up to `start + size`
///
/// Entries are aligned on 8-byte boundaries.
pub(crate) fn read_certificates(
    data: &[u8],
    start: u64,
    size: u32,
    limit: usize,
) -> Vec<AttributeCertificate> {
    let Ok(mut cursor) = ByteCursor::at(data, start) else {
        return Vec::new();
    };
    let end = start + u64::from(size);
    let mut certificates = Vec::new();
    while cursor.position() + u64::from(CERTIFICATE_HEADER_SIZE) <= end
        && certificates.len() < limit
    {
        let read = |c: &mut ByteCursor<'_>| -> Result<AttributeCertificate> {
            let length = c.read_u32_le()?;
            let revision = c.read_u16_le()?;
            let certificate_type = c.read_u16_le()?;
            let body = length.saturating_sub(CERTIFICATE_HEADER_SIZE);
            Ok(AttributeCertificate {
                length,
                revision,
                certificate_type,
                certificate: c.read_bytes(u64::from(body))?,
            })
        };
        let Ok(certificate) = read(&mut cursor) else {
            break;
        };
        let stalled = certificate.length < CERTIFICATE_HEADER_SIZE;
        certificates.push(certificate);
        if stalled || cursor.align(8).is_err() {
            break;
        }
    }
    certificates
}
