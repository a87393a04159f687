//! BD+ security virtual machine (SVM) image support
//!
//! - **Header** (0x18 bytes, big-endian): signature "BDSVM_CC", reserved
//!   bytes, build date and the length of the code that follows
//! - **Data**: the content code image, located but never disassembled

mod print;

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::BinRead;

/// Signature at the start of every SVM image
pub const SIGNATURE: [u8; 8] = *b"BDSVM_CC";

/// SVM image header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct SvmHeader {
    /// Signature, always `BDSVM_CC`
    #[br(assert(signature == SIGNATURE, "expected BDSVM_CC, got {:?}", signature))]
    pub signature: [u8; 8],
    /// Unknown
    pub unknown_1: [u8; 5],
    /// Build year
    pub year: u16,
    /// Build month
    pub month: u8,
    /// Build day
    pub day: u8,
    /// Unknown
    pub unknown_2: [u8; 4],
    /// Length of the code image
    pub length: u32,
}

impl SvmHeader {
    /// Build date as `YYYY-MM-DD`
    pub fn date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Complete SVM image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Svm {
    /// Image header
    pub header: Option<SvmHeader>,
    /// Code image, absent when the stated length runs past the data
    pub data: Option<Vec<u8>>,
}

impl BinaryFormat for Svm {
    const NAME: &'static str = "BD+ SVM";

    fn decode_with(data: &[u8], offset: u64, _options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: SvmHeader = cursor.read()?;
        let data = recover("bd+ code image", cursor.read_bytes(u64::from(header.length)))?;

        Ok(Self {
            header: Some(header),
            data,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    fn sample(length: u32) -> Vec<u8> {
        SampleBuilder::new()
            .bytes(b"BDSVM_CC")
            .zeros(5)
            .u16be(2008)
            .u8(6)
            .u8(17)
            .zeros(4)
            .u32be(length)
            .bytes(&[0xC0, 0xDE, 0x00, 0x01])
            .build()
    }

    #[test]
    fn test_decode_sample() {
        let svm = Svm::decode(&sample(4), 0).unwrap();
        let header = svm.header.as_ref().unwrap();
        assert_eq!(header.year, 2008);
        assert_eq!(header.date(), "2008-06-17");
        assert_eq!(svm.data.as_deref(), Some(&[0xC0, 0xDE, 0x00, 0x01][..]));
    }

    #[test]
    fn test_overlong_length_drops_data() {
        let svm = Svm::decode(&sample(0x1000), 0).unwrap();
        assert!(svm.header.is_some());
        assert!(svm.data.is_none());
        assert!(svm.report().contains("  No code data\n"));
    }

    #[test]
    fn test_bad_signature_fails() {
        let mut data = sample(4);
        data[7] = b'X';
        assert!(Svm::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let svm = Svm::decode(&sample(4), 0).unwrap();
        let report = assert_idempotent(&svm);
        assert!(report.contains("  Signature: BDSVM_CC\n"));
        assert!(report.contains("  Year: 2008 (0x07D8)\n"));
        assert!(report.contains("  Date: 2008-06-17\n"));
        assert!(report.contains("  Length: 4 (0x00000004)\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Svm::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No code data"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Svm>(&sample(4));
    }
}
