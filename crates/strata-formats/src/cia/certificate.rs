//! Signatures, public keys and certificates
//!
//! Everything in this file is big-endian. The signature and public key
//! shapes are selected by the type word read in front of them.

use crate::cursor::Encoding;
use binrw::BinRead;

/// RSA-4096 signature over SHA-1
pub const RSA_4096_SHA1: u32 = 0x0001_0000;
/// RSA-2048 signature over SHA-1
pub const RSA_2048_SHA1: u32 = 0x0001_0001;
/// ECDSA signature over SHA-1
pub const ECDSA_SHA1: u32 = 0x0001_0002;
/// RSA-4096 signature over SHA-256
pub const RSA_4096_SHA256: u32 = 0x0001_0003;
/// RSA-2048 signature over SHA-256
pub const RSA_2048_SHA256: u32 = 0x0001_0004;
/// ECDSA signature over SHA-256
pub const ECDSA_SHA256: u32 = 0x0001_0005;

/// Signature block, sized by its type word
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub enum Signature {
    /// RSA-4096 with SHA-1
    #[br(magic = 0x0001_0000u32)]
    Rsa4096Sha1(#[br(count = 0x200, pad_after = 0x3C)] Vec<u8>),
    /// RSA-2048 with SHA-1
    #[br(magic = 0x0001_0001u32)]
    Rsa2048Sha1(#[br(count = 0x100, pad_after = 0x3C)] Vec<u8>),
    /// ECDSA with SHA-1
    #[br(magic = 0x0001_0002u32)]
    EcdsaSha1(#[br(count = 0x3C, pad_after = 0x40)] Vec<u8>),
    /// RSA-4096 with SHA-256
    #[br(magic = 0x0001_0003u32)]
    Rsa4096Sha256(#[br(count = 0x200, pad_after = 0x3C)] Vec<u8>),
    /// RSA-2048 with SHA-256
    #[br(magic = 0x0001_0004u32)]
    Rsa2048Sha256(#[br(count = 0x100, pad_after = 0x3C)] Vec<u8>),
    /// ECDSA with SHA-256
    #[br(magic = 0x0001_0005u32)]
    EcdsaSha256(#[br(count = 0x3C, pad_after = 0x40)] Vec<u8>),
}

impl Signature {
    /// Type word stored in front of the signature
    pub fn signature_type(&self) -> u32 {
        match self {
            Self::Rsa4096Sha1(_) => RSA_4096_SHA1,
            Self::Rsa2048Sha1(_) => RSA_2048_SHA1,
            Self::EcdsaSha1(_) => ECDSA_SHA1,
            Self::Rsa4096Sha256(_) => RSA_4096_SHA256,
            Self::Rsa2048Sha256(_) => RSA_2048_SHA256,
            Self::EcdsaSha256(_) => ECDSA_SHA256,
        }
    }

    /// Signature bytes without padding
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Rsa4096Sha1(bytes)
            | Self::Rsa2048Sha1(bytes)
            | Self::EcdsaSha1(bytes)
            | Self::Rsa4096Sha256(bytes)
            | Self::Rsa2048Sha256(bytes)
            | Self::EcdsaSha256(bytes) => bytes,
        }
    }

    /// Size of the padding that follows the signature
    pub fn padding_size(&self) -> usize {
        match self {
            Self::EcdsaSha1(_) | Self::EcdsaSha256(_) => 0x40,
            _ => 0x3C,
        }
    }
}

/// Public key, shaped by the certificate's key type
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big, import(key_type: u32))]
pub enum PublicKey {
    /// RSA-4096 modulus and exponent
    #[br(pre_assert(key_type == 0))]
    Rsa4096 {
        /// Modulus
        #[br(count = 0x200)]
        modulus: Vec<u8>,
        /// Public exponent
        #[br(pad_after = 0x34)]
        public_exponent: u32,
    },
    /// RSA-2048 modulus and exponent
    #[br(pre_assert(key_type == 1))]
    Rsa2048 {
        /// Modulus
        #[br(count = 0x100)]
        modulus: Vec<u8>,
        /// Public exponent
        #[br(pad_after = 0x34)]
        public_exponent: u32,
    },
    /// ECC public key
    #[br(pre_assert(key_type == 2))]
    Ecdsa {
        /// Public key
        #[br(count = 0x3C, pad_after = 0x3C)]
        public_key: Vec<u8>,
    },
}

/// Certificate from a certificate chain
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct Certificate {
    /// Signature over the rest of the certificate
    pub signature: Signature,
    /// Issuer, e.g. `Root-CA00000003`
    #[br(map = |raw: [u8; 0x40]| Encoding::Ascii.decode_fixed(&raw))]
    pub issuer: String,
    /// Key type: 0 RSA-4096, 1 RSA-2048, 2 ECDSA
    pub key_type: u32,
    /// Certificate name
    #[br(map = |raw: [u8; 0x40]| Encoding::Ascii.decode_fixed(&raw))]
    pub name: String,
    /// Expiration time as a Unix timestamp
    pub expiration_time: u32,
    /// Public key
    #[br(args(key_type))]
    pub public_key: PublicKey,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::cursor::ByteCursor;
    use crate::test_utils::SampleBuilder;

    pub(crate) fn certificate(name: &str) -> SampleBuilder {
        SampleBuilder::new()
            .u32be(RSA_2048_SHA256)
            .bytes(&[0xAB; 0x100])
            .zeros(0x3C)
            .text("Root-CA00000003", 0x40)
            .u32be(1)
            .text(name, 0x40)
            .u32be(0x5000_0000)
            .bytes(&[0xCD; 0x100])
            .u32be(0x10001)
            .zeros(0x34)
    }

    #[test]
    fn test_reads_rsa_2048_certificate() {
        let data = certificate("XS0000000c").build();
        assert_eq!(data.len(), 0x300);
        let mut cursor = ByteCursor::new(&data);
        let cert: Certificate = cursor.read().unwrap();

        assert_eq!(cert.signature.signature_type(), RSA_2048_SHA256);
        assert_eq!(cert.signature.bytes().len(), 0x100);
        assert_eq!(cert.issuer, "Root-CA00000003");
        assert_eq!(cert.name, "XS0000000c");
        assert!(matches!(
            cert.public_key,
            PublicKey::Rsa2048 { public_exponent: 0x10001, .. }
        ));
        assert_eq!(cursor.position(), 0x300);
    }

    #[test]
    fn test_ecdsa_signature_padding() {
        let data = SampleBuilder::new()
            .u32be(ECDSA_SHA256)
            .zeros(0x3C + 0x40)
            .build();
        let signature: Signature = ByteCursor::new(&data).read().unwrap();
        assert_eq!(signature.bytes().len(), 0x3C);
        assert_eq!(signature.padding_size(), 0x40);
    }

    #[test]
    fn test_unknown_types_fail() {
        let data = SampleBuilder::new().u32be(0x0002_0000).zeros(0x400).build();
        assert!(ByteCursor::new(&data).read::<Signature>().is_err());

        let mut data = certificate("CP0000000b").build();
        data[0x183] = 7;
        assert!(ByteCursor::new(&data).read::<Certificate>().is_err());
    }
}
