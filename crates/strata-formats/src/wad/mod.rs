//! Half-Life texture package (WAD3) support
//!
//! - **Header** (12 bytes): magic "WAD3", lump count, lump table offset
//! - **Lump Table**: 32-byte entries locating each lump's data
//! - **Lump Info**: miptex headers for uncompressed texture lumps
//!
//! The lump count is a hint. Decoding stops at the first lump whose data
//! range falls outside the file, so a truncated package yields the lumps
//! that are actually present.

mod lump;
mod print;

pub use lump::{Header, LUMP_TYPE_MIPTEX, Lump, LumpInfo, WAD_MAGIC};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use tracing::debug;

/// Complete texture package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// Package header
    pub header: Option<Header>,
    /// Lump directory
    pub lumps: Vec<Lump>,
    /// Parsed lump headers, one slot per lump
    pub lump_infos: Vec<Option<LumpInfo>>,
}

impl BinaryFormat for File {
    const NAME: &'static str = "Half-Life Texture Package";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let lumps = match cursor.seek_to(offset + u64::from(header.lump_offset)) {
            Ok(()) => read_lumps(&mut cursor, &header, offset, options)?,
            Err(_) => Vec::new(),
        };

        let mut lump_infos = Vec::with_capacity(lumps.len());
        for lump in &lumps {
            let info = if lump.has_info() {
                recover(
                    "wad lump info",
                    ByteCursor::at(data, offset + u64::from(lump.offset))
                        .and_then(|mut c| c.read::<LumpInfo>()),
                )?
            } else {
                None
            };
            lump_infos.push(info);
        }

        Ok(Self {
            header: Some(header),
            lumps,
            lump_infos,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

fn read_lumps(
    cursor: &mut ByteCursor<'_>,
    header: &Header,
    base: u64,
    options: &DecodeOptions,
) -> Result<Vec<Lump>> {
    let length = cursor.len();
    let mut lumps = cursor.read_counted(
        u64::from(header.lump_count),
        options.max_table_entries,
        |c| c.read::<Lump>(),
    )?;

    if let Some(index) = lumps
        .iter()
        .position(|lump| base + u64::from(lump.offset) + u64::from(lump.disk_length) > length)
    {
        debug!(index, "lump data lies outside the file, ignoring remaining lumps");
        lumps.truncate(index);
    }
    Ok(lumps)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    fn sample() -> Vec<u8> {
        SampleBuilder::new()
            .bytes(b"WAD3")
            .u32le(2)
            .u32le(12)
            // lump 0: miptex at 76
            .u32le(76)
            .u32le(32)
            .u32le(32)
            .u8(LUMP_TYPE_MIPTEX)
            .u8(0)
            .zeros(2)
            .text("BRICK", 16)
            // lump 1: palette data at 108
            .u32le(108)
            .u32le(4)
            .u32le(4)
            .u8(0x40)
            .u8(0)
            .zeros(2)
            .text("PAL", 16)
            // miptex header
            .text("BRICK", 16)
            .u32le(64)
            .u32le(32)
            .u32le(40)
            .u32le(40 + 64 * 32)
            .u32le(40 + 64 * 32 + 32 * 16)
            .u32le(40 + 64 * 32 + 32 * 16 + 16 * 8)
            .build()
    }

    #[test]
    fn test_decode_sample() {
        let file = File::decode(&sample(), 0).unwrap();
        assert_eq!(file.lumps.len(), 2);
        assert_eq!(file.lumps[0].name, "BRICK");
        let info = file.lump_infos[0].as_ref().unwrap();
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 32);
        assert!(file.lump_infos[1].is_none());
    }

    #[test]
    fn test_lump_past_end_yields_no_lumps() {
        // Header claims one lump at offset 12, but the file ends there
        let data = SampleBuilder::new()
            .bytes(b"WAD3")
            .u32le(1)
            .u32le(12)
            .build();
        let file = File::decode(&data, 0).unwrap();
        assert_eq!(file.header.as_ref().unwrap().lump_count, 1);
        assert!(file.lumps.is_empty());
        assert!(file.report().contains("No lumps"));
    }

    #[test]
    fn test_lump_data_past_end_is_dropped() {
        let data = SampleBuilder::new()
            .bytes(b"WAD3")
            .u32le(1)
            .u32le(12)
            .u32le(0x1000)
            .u32le(16)
            .u32le(16)
            .u8(LUMP_TYPE_MIPTEX)
            .u8(0)
            .zeros(2)
            .text("GONE", 16)
            .build();
        let file = File::decode(&data, 0).unwrap();
        assert_eq!(file.header.as_ref().unwrap().lump_count, 1);
        assert!(file.lumps.is_empty());
        assert!(file.report().contains("  No lumps\n"));
    }

    #[test]
    fn test_print() {
        let file = File::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&file);
        assert!(report.contains("  Signature: WAD3\n"));
        assert!(report.contains("  Lump 0\n    Offset: 76 (0x0000004C)\n"));
        assert!(report.contains("  Lump Info 1\n    [NULL]\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = File::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No lumps"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<File>(&sample());
    }
}
