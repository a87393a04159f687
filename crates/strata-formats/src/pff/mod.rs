//! NovaLogic PFF archive support
//!
//! - **Header** (20 bytes): header size, signature "PFF2"/"PFF3"/"PFF4",
//!   file count, segment size and file list offset
//! - **Segments**: one per file, `file_segment_size` bytes apart; the
//!   modified date and compression level exist only in larger segments
//! - **Footer** (12 bytes): follows the segment list, ends with "KING"

mod header;
mod print;

pub use header::{
    Footer, Header, KING_TAG, SEGMENT_SIZE_COMPRESSION_LEVEL, SEGMENT_SIZE_MODIFIED_DATE,
    SIGNATURE_PFF2, SIGNATURE_PFF3, SIGNATURE_PFF4, Segment,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;

/// Complete archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Archive header
    pub header: Option<Header>,
    /// File segments
    pub segments: Vec<Segment>,
    /// Archive footer
    pub footer: Option<Footer>,
}

impl BinaryFormat for Archive {
    const NAME: &'static str = "NovaLogic PFF Archive";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let list_offset = offset + u64::from(header.file_list_offset);
        let segment_size = header.file_segment_size;
        let stride = u64::from(segment_size);
        let mut index = 0u64;
        let segments = if cursor.seek_to(list_offset).is_ok() {
            cursor.read_counted(
                u64::from(header.number_of_files),
                options.max_table_entries,
                |c| {
                    c.seek_to(list_offset + index * stride)?;
                    index += 1;
                    c.read_with::<Segment>(Endian::Little, (segment_size,))
                },
            )?
        } else {
            Vec::new()
        };

        let footer_offset = list_offset + u64::from(header.number_of_files) * stride;
        let footer = recover(
            "pff footer",
            ByteCursor::at(data, footer_offset).and_then(|mut c| c.read::<Footer>()),
        )?;

        Ok(Self {
            header: Some(header),
            segments,
            footer,
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

    fn sample(signature: &[u8; 4], segment_size: u32) -> Vec<u8> {
        let mut builder = SampleBuilder::new()
            .u32le(20)
            .bytes(signature)
            .u32le(2)
            .u32le(segment_size)
            .u32le(20);
        for (index, name) in ["ONE.TXT", "TWO.TXT"].iter().enumerate() {
            let start = builder.len();
            builder = builder
                .u32le(index as u32)
                .u32le(0x1000 * (index as u32 + 1))
                .u32le(64)
                .u32le(0x3A00_0000)
                .text(name, 16);
            if segment_size >= SEGMENT_SIZE_MODIFIED_DATE {
                builder = builder.u32le(0x3B00_0000);
            }
            if segment_size >= SEGMENT_SIZE_COMPRESSION_LEVEL {
                builder = builder.u32le(9);
            }
            builder = builder.pad_to(start + segment_size as usize);
        }
        builder.u32le(0x0100_007F).u32le(0).bytes(b"KING").build()
    }

    #[test]
    fn test_decode_pff2() {
        let archive = Archive::decode(&sample(b"PFF2", 0x20), 0).unwrap();
        assert_eq!(archive.segments.len(), 2);
        assert_eq!(archive.segments[1].file_name, "TWO.TXT");
        assert_eq!(archive.segments[1].file_location, 0x2000);
        assert!(archive.segments[0].modified_date.is_none());
        assert!(archive.segments[0].compression_level.is_none());
        assert_eq!(archive.footer.as_ref().unwrap().system_ip, 0x0100_007F);
    }

    #[test]
    fn test_segment_size_gates_fields() {
        let archive = Archive::decode(&sample(b"PFF3", 0x24), 0).unwrap();
        assert_eq!(archive.segments[1].modified_date, Some(0x3B00_0000));
        assert!(archive.segments[1].compression_level.is_none());

        let archive = Archive::decode(&sample(b"PFF4", 0x28), 0).unwrap();
        assert_eq!(archive.segments[0].compression_level, Some(9));
        assert!(archive.footer.is_some());
    }

    #[test]
    fn test_oversized_segments_are_strided() {
        let archive = Archive::decode(&sample(b"PFF4", 0x30), 0).unwrap();
        assert_eq!(archive.segments[1].file_name, "TWO.TXT");
        assert_eq!(archive.segments[1].compression_level, Some(9));
        assert!(archive.footer.is_some());
    }

    #[test]
    fn test_missing_footer() {
        let mut data = sample(b"PFF2", 0x20);
        let tag = data.len() - 4;
        data[tag] = b'Q';
        let archive = Archive::decode(&data, 0).unwrap();
        assert_eq!(archive.segments.len(), 2);
        assert!(archive.footer.is_none());
    }

    #[test]
    fn test_bad_signature_fails() {
        assert!(Archive::decode(&sample(b"PFF9", 0x20), 0).is_err());
    }

    #[test]
    fn test_print() {
        let archive = Archive::decode(&sample(b"PFF3", 0x24), 0).unwrap();
        let report = assert_idempotent(&archive);
        assert!(report.contains("  Signature: PFF3\n"));
        assert!(report.contains("    File name: ONE.TXT\n"));
        assert!(report.contains("    Compression level: [NULL]\n"));
        assert!(report.contains("  King tag: KING\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Archive::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No segments"));
        assert!(report.contains("No footer"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Archive>(&sample(b"PFF4", 0x28));
    }
}
