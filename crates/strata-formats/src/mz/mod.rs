//! MS-DOS (MZ) executable support
//!
//! The MZ header doubles as the stub of every later executable format: its
//! extension holds the offset of the NE, LE/LX or PE header.

mod header;
pub(crate) mod print;

pub use header::{Header, HeaderExtension, MZ_SIGNATURE, RelocationEntry};

use crate::cursor::ByteCursor;
use crate::{BinaryFormat, DecodeError, DecodeOptions, Result};

/// MS-DOS executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Executable {
    /// Executable header
    pub header: Option<Header>,
    /// Relocation table
    pub relocation_table: Vec<RelocationEntry>,
}

impl Executable {
    /// Offset of the new executable header, relative to the stub start
    pub fn new_exe_header_addr(&self) -> Option<u32> {
        self.header.as_ref().and_then(Header::new_exe_header_addr)
    }

    /// Decode a stub and return it with the absolute offset of the header it
    /// points to
    pub(crate) fn read_stub(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<(Self, u64)> {
        let stub = Self::decode_with(data, offset, options)?;
        let addr = stub.new_exe_header_addr().ok_or(DecodeError::Unsupported {
            what: "MS-DOS stub without new executable header",
            value: 0,
        })?;
        Ok((stub, offset + u64::from(addr)))
    }
}

impl BinaryFormat for Executable {
    const NAME: &'static str = "MS-DOS Executable";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let mut relocation_table = Vec::new();
        if header.relocation_items > 0
            && cursor.seek_to(offset + u64::from(header.relocation_table_addr)).is_ok()
        {
            relocation_table = cursor.read_counted(
                u64::from(header.relocation_items),
                options.max_table_entries,
                |c| c.read::<RelocationEntry>(),
            )?;
        }

        Ok(Self {
            header: Some(header),
            relocation_table,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    /// 64-byte stub pointing at `new_header`, no relocations
    pub(crate) fn stub(new_header: u32) -> SampleBuilder {
        SampleBuilder::new()
            .bytes(&MZ_SIGNATURE)
            .u16le(0x90)
            .u16le(3)
            .u16le(0)
            .u16le(4)
            .u16le(0)
            .u16le(0xFFFF)
            .u16le(0)
            .u16le(0xB8)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0x40)
            .u16le(0)
            .zeros(32)
            .u32le(new_header)
    }

    fn sample_with_relocations() -> Vec<u8> {
        SampleBuilder::new()
            .bytes(&MZ_SIGNATURE)
            .u16le(0x90)
            .u16le(1)
            .u16le(2)
            .u16le(2)
            .u16le(0)
            .u16le(0xFFFF)
            .u16le(0)
            .u16le(0xB8)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0x1C)
            .u16le(0)
            .u16le(0x10)
            .u16le(0x00)
            .u16le(0x20)
            .u16le(0x01)
            .build()
    }

    #[test]
    fn test_decode_short_header() {
        let exe = Executable::decode(&sample_with_relocations(), 0).unwrap();
        let header = exe.header.as_ref().unwrap();
        assert!(header.extension.is_none());
        assert_eq!(exe.new_exe_header_addr(), None);
        assert_eq!(exe.relocation_table.len(), 2);
        assert_eq!(exe.relocation_table[1].offset, 0x20);
        assert_eq!(exe.relocation_table[1].segment, 0x01);
    }

    #[test]
    fn test_decode_extended_header() {
        let data = stub(0x80).pad_to(0x80).build();
        let exe = Executable::decode(&data, 0).unwrap();
        assert_eq!(exe.new_exe_header_addr(), Some(0x80));
        let (_, header_offset) = Executable::read_stub(&data, 0, &DecodeOptions::default()).unwrap();
        assert_eq!(header_offset, 0x80);
    }

    #[test]
    fn test_stub_at_offset() {
        let data = SampleBuilder::new().zeros(16).bytes(&stub(0x40).build()).build();
        let (_, header_offset) = Executable::read_stub(&data, 16, &DecodeOptions::default()).unwrap();
        assert_eq!(header_offset, 0x50);
    }

    #[test]
    fn test_bad_magic_fails() {
        assert!(Executable::decode(b"ZM\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0", 0).is_err());
        assert!(Executable::decode(&[], 0).is_err());
    }

    #[test]
    fn test_print() {
        let exe = Executable::decode(&sample_with_relocations(), 0).unwrap();
        let report = assert_idempotent(&exe);
        assert!(report.starts_with("MS-DOS Executable Information:\n"));
        assert!(report.contains("  Magic number: MZ\n"));
        assert!(report.contains("  Relocation Table Entry 1\n    Offset: 32 (0x0020)\n"));
        assert!(!report.contains("OEM identifier"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Executable::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No relocation table items"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Executable>(&sample_with_relocations());
        assert_truncation_safe::<Executable>(&stub(0x40).build());
    }
}
