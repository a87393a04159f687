//! Nintendo 3DS cart image (NCSD) support
//!
//! A cart image starts with the NCSD header, followed by the card info header
//! and the development card info. Eight partition slots point at NCCH
//! partitions, each of which may carry:
//!
//! - **Extended header**: system control and access control info
//! - **ExeFS header**: up to ten executable files and their hashes
//! - **RomFS header**: the IVFC hash tree levels
//!
//! Slots are classified as empty, unrecognized or NCCH, and only the last
//! kind is decoded further.

mod exheader;
mod fs;
mod header;
mod ncch;
pub(crate) mod print;

pub use exheader::{
    AccessControlInfo, Arm9AccessControl, Arm11KernelCapabilities, Arm11LocalSystemCapabilities,
    CodeSetInfo, ExtendedHeader, StorageInfo, SystemControlInfo,
};
pub use fs::{EXEFS_FILE_COUNT, ExeFsFileHeader, ExeFsHeader, IVFC_MAGIC, RomFsHeader, RomFsLevel};
pub use header::{
    BASE_MEDIA_UNIT, CardInfoHeader, DevelopmentCardInfoHeader, MEDIA_UNIT_SIZE_FLAG,
    NCSD_MAGIC, NcsdHeader, PARTITION_COUNT, PartitionTableEntry,
};
pub use ncch::{NCCH_HEADER_SIZE, NCCH_MAGIC, NcchHeader, NcchPartition, Partition};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};

/// Offset of the card info header
const CARD_INFO_HEADER_OFFSET: u64 = 0x200;

/// Offset of the development card info header
const DEVELOPMENT_CARD_INFO_OFFSET: u64 = 0x1200;

/// 3DS cart image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    /// NCSD header
    pub header: Option<NcsdHeader>,
    /// Card info header
    pub card_info_header: Option<CardInfoHeader>,
    /// Development card info header
    pub development_card_info_header: Option<DevelopmentCardInfoHeader>,
    /// One entry per partition slot, absent when the slot could not be read
    pub partitions: Vec<Option<Partition>>,
}

impl Cart {
    /// Size of one media unit, 0x200 when there is no header
    pub fn media_unit_size(&self) -> u64 {
        self.header
            .as_ref()
            .map_or(BASE_MEDIA_UNIT, NcsdHeader::media_unit_size)
    }

    /// Byte offset of partition `index`, relative to the image start
    pub fn partition_offset(&self, index: usize) -> Option<u64> {
        let entry = self.header.as_ref()?.partitions_table.get(index)?;
        (entry.length != 0).then(|| u64::from(entry.offset) * self.media_unit_size())
    }
}

impl BinaryFormat for Cart {
    const NAME: &'static str = "3DS Cart Image";

    fn decode_with(data: &[u8], offset: u64, _options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: NcsdHeader = cursor.read()?;

        let card_info_header = recover(
            "card info header",
            ByteCursor::at(data, offset + CARD_INFO_HEADER_OFFSET)
                .and_then(|mut c| c.read::<CardInfoHeader>()),
        )?;
        let development_card_info_header = recover(
            "development card info header",
            ByteCursor::at(data, offset + DEVELOPMENT_CARD_INFO_OFFSET)
                .and_then(|mut c| c.read::<DevelopmentCardInfoHeader>()),
        )?;

        let media_unit = header.media_unit_size();
        let mut partitions = Vec::with_capacity(PARTITION_COUNT);
        for entry in &header.partitions_table {
            let partition = if entry.length == 0 {
                Some(Partition::Empty)
            } else {
                let start = offset + u64::from(entry.offset) * media_unit;
                recover("ncch partition", Partition::read(data, start, media_unit))?
            };
            partitions.push(partition);
        }

        Ok(Self {
            header: Some(header),
            card_info_header,
            development_card_info_header,
            partitions,
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
    use crate::test_utils::{SampleBuilder, assert_idempotent};

    fn ncsd_header(table: &[(u32, u32)]) -> SampleBuilder {
        let mut builder = SampleBuilder::new()
            .zeros(0x100)
            .bytes(b"NCSD")
            .u32le(0x28)
            .u64le(0x0004_0000_0012_3400)
            .zeros(16);
        for slot in 0..PARTITION_COUNT {
            let (offset, length) = table.get(slot).copied().unwrap_or((0, 0));
            builder = builder.u32le(offset).u32le(length);
        }
        builder
            .zeros(0x20)
            .u32le(0)
            .u32le(0)
            .zeros(8)
            .u64le(0x0004_0000_0012_3400)
            .zeros(7 * 8)
            .zeros(0x2E)
            .u8(1)
            .u8(2)
    }

    fn ncch_header(magic: &[u8; 4]) -> SampleBuilder {
        SampleBuilder::new()
            .zeros(0x100)
            .bytes(magic)
            .u32le(7)
            .u64le(0x0004_0000_0012_3400)
            .u16le(0x3031)
            .u16le(2)
            .u32le(0)
            .u64le(0x0004_0000_0012_3400)
            .zeros(0x10)
            .zeros(0x20)
            .text("CTR-P-DEMO", 0x10)
            .zeros(0x20)
            .u32le(0x400)
            .u32le(0)
            .zeros(8)
            // plain, logo
            .u32le(0)
            .u32le(0)
            .u32le(0)
            .u32le(0)
            // exefs
            .u32le(5)
            .u32le(1)
            .u32le(1)
            .u32le(0)
            // romfs
            .u32le(6)
            .u32le(1)
            .u32le(1)
            .u32le(0)
            .zeros(0x40)
    }

    fn sample() -> Vec<u8> {
        let builder = ncsd_header(&[(0x20, 7), (0, 0), (0x27, 1), (0x100, 1)])
            .pad_to(0x4000)
            .bytes(&ncch_header(b"NCCH").build())
            .text("DEMO", 8)
            .pad_to(0x4A00)
            .text(".code", 8)
            .u32le(0)
            .u32le(0x100)
            .pad_to(0x4C00)
            .bytes(b"IVFC")
            .u32le(0x10000)
            .u32le(0x20)
            .u64le(0)
            .u64le(0x20)
            .u32le(12)
            .zeros(4)
            .u64le(0x1000)
            .u64le(0x20)
            .u32le(12)
            .zeros(4)
            .u64le(0x2000)
            .u64le(0x100)
            .u32le(12)
            .zeros(4)
            .zeros(4)
            .u32le(0x5C)
            .pad_to(0x4E00);
        builder
            .bytes(&ncch_header(b"XXXX").build())
            .pad_to(0x5000)
            .build()
    }

    #[test]
    fn test_decodes_partitions() {
        let data = sample();
        let cart = Cart::decode(&data, 0).unwrap();

        assert_eq!(cart.media_unit_size(), 0x200);
        assert_eq!(cart.partition_offset(0), Some(0x4000));
        assert_eq!(cart.partition_offset(1), None);
        assert!(cart.card_info_header.is_some());
        assert!(cart.development_card_info_header.is_some());
        assert_eq!(cart.partitions.len(), PARTITION_COUNT);

        let Some(Some(Partition::Ncch(ncch))) = cart.partitions.first() else {
            unreachable!("partition 0 is NCCH");
        };
        assert_eq!(ncch.header.product_code, "CTR-P-DEMO");
        let exheader = ncch.extended_header.as_ref().unwrap();
        assert_eq!(exheader.system_control_info.application_title, "DEMO");
        let exefs = ncch.exefs_header.as_ref().unwrap();
        assert_eq!(exefs.file_headers[0].file_name, ".code");
        assert_eq!(exefs.file_headers[0].file_size, 0x100);
        let romfs = ncch.romfs_header.as_ref().unwrap();
        assert_eq!(romfs.level_2.logical_offset, 0x1000);
        assert_eq!(romfs.optional_info_size, 0x5C);

        assert_eq!(cart.partitions[1], Some(Partition::Empty));
        assert_eq!(cart.partitions[2], Some(Partition::Unrecognized));
        assert_eq!(cart.partitions[3], None);
        assert_eq!(cart.partitions[7], Some(Partition::Empty));
    }

    #[test]
    fn test_media_unit_flag_scales_offsets() {
        let mut data = ncsd_header(&[]).build();
        data[0x188 + MEDIA_UNIT_SIZE_FLAG] = 2;
        let cart = Cart::decode(&data, 0).unwrap();
        assert_eq!(cart.media_unit_size(), 0x800);
        assert!(cart.card_info_header.is_none());
        assert!(
            cart.partitions
                .iter()
                .all(|p| *p == Some(Partition::Empty))
        );
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut data = sample();
        data[0x100] = b'X';
        assert!(Cart::decode(&data, 0).is_err());
        assert!(Cart::decode(&[], 0).is_err());
    }

    #[test]
    fn test_print() {
        let cart = Cart::decode(&sample(), 0).unwrap();
        let text = assert_idempotent(&cart);
        assert!(text.starts_with("3DS Cart Information:\n"));
        assert!(text.contains("Magic number: NCSD"));
        assert!(text.contains("Product code: CTR-P-DEMO"));
        assert!(text.contains("Application title: DEMO"));
        assert!(text.contains("File name: .code"));
        assert!(text.contains("Magic string: IVFC"));
        assert!(text.contains("Empty partition, no data can be parsed"));
        assert!(text.contains("Unrecognized partition data, no data can be parsed"));
        assert!(text.contains("  Partition 3\n    [NULL]"));
    }

    #[test]
    fn test_print_empty() {
        let text = Cart::default().report();
        assert!(text.contains("No NCSD header"));
        assert!(text.contains("No card info header"));
        assert!(text.contains("No development card info header"));
        assert!(text.contains("No partitions"));
    }

    #[test]
    fn test_truncation_safe() {
        let data = sample();
        for length in (0..=data.len()).step_by(61).chain([data.len() - 1]) {
            if let Ok(cart) = Cart::decode(&data[..length], 0) {
                let _ = cart.report();
            }
        }
    }
}
