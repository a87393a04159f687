//! Microsoft cabinet (MSCF) support
//!
//! - **CFHEADER**: signature, sizes, counts and flags, followed by the
//!   optional reserve area and the previous/next cabinet names the flags
//!   announce
//! - **CFFOLDER**: one entry per folder, pointing at its run of data blocks
//! - **CFFILE**: one entry per file, located through the header's file offset
//! - **CFDATA**: block headers preceding each run of compressed bytes
//!
//! Compressed data is located but never inflated.

mod header;
mod print;

pub use header::{
    ATTRIBUTE_NAME_IS_UTF, CabinetHeader, DataBlock, FLAG_NEXT_CABINET, FLAG_PREV_CABINET,
    FLAG_RESERVE_PRESENT, FileEntry, Folder, SIGNATURE,
};

use crate::cursor::ByteCursor;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;
use tracing::debug;

/// Complete cabinet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cabinet {
    /// Cabinet header
    pub header: Option<CabinetHeader>,
    /// Folders with their data blocks
    pub folders: Vec<Folder>,
    /// File entries
    pub files: Vec<FileEntry>,
}

impl BinaryFormat for Cabinet {
    const NAME: &'static str = "Microsoft Cabinet";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: CabinetHeader = cursor.read()?;

        let folder_reserve = header.folder_reserve();
        let mut folders = cursor.read_counted(
            u64::from(header.folder_count),
            options.max_table_entries,
            |c| c.read_with::<Folder>(Endian::Little, (folder_reserve,)),
        )?;

        let data_reserve = header.data_reserve();
        for folder in &mut folders {
            folder.data_blocks = read_data_blocks(data, offset, folder, data_reserve, options)?;
        }

        let files = match cursor.seek_to(offset + u64::from(header.files_offset)) {
            Ok(()) => cursor.read_counted(
                u64::from(header.file_count),
                options.max_table_entries,
                |c| c.read::<FileEntry>(),
            )?,
            Err(err) => {
                debug!(%err, "file table lies outside the cabinet");
                Vec::new()
            }
        };

        Ok(Self {
            header: Some(header),
            folders,
            files,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

fn read_data_blocks(
    data: &[u8],
    base: u64,
    folder: &Folder,
    reserved_size: u8,
    options: &DecodeOptions,
) -> Result<Vec<DataBlock>> {
    let Ok(mut cursor) = ByteCursor::at(data, base + u64::from(folder.data_offset)) else {
        debug!(offset = folder.data_offset, "folder data lies outside the cabinet");
        return Ok(Vec::new());
    };
    cursor.read_counted(
        u64::from(folder.data_count),
        options.max_table_entries,
        |c| DataBlock::read(c, reserved_size),
    )
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    /// Reserve-carrying cabinet naming a next cabinet, one folder, two files
    fn sample(data_count: u16) -> Vec<u8> {
        SampleBuilder::new()
            .bytes(b"MSCF")
            .u32le(0)
            .u32le(135)
            .u32le(0)
            .u32le(66)
            .u32le(0)
            .u8(3)
            .u8(1)
            .u16le(1)
            .u16le(2)
            .u16le(FLAG_RESERVE_PRESENT | FLAG_NEXT_CABINET)
            .u16le(0x1234)
            .u16le(0)
            .u16le(4)
            .u8(2)
            .u8(1)
            .bytes(&[0xAA; 4])
            .cstr("b.cab")
            .cstr("Disk2")
            // folder at 56
            .u32le(112)
            .u16le(data_count)
            .u16le(1)
            .bytes(&[0xBB; 2])
            // files at 66
            .u32le(10)
            .u32le(0)
            .u16le(0)
            .u16le(0x5A21)
            .u16le(0x6000)
            .u16le(0x20)
            .cstr("a.txt")
            .u32le(5)
            .u32le(10)
            .u16le(0)
            .u16le(0x5A21)
            .u16le(0x6000)
            .u16le(ATTRIBUTE_NAME_IS_UTF)
            .bytes("é.txt".as_bytes())
            .u8(0)
            // data blocks at 112
            .pad_to(112)
            .u32le(0xDEAD_BEEF)
            .u16le(3)
            .u16le(10)
            .u8(0xCC)
            .bytes(&[1, 2, 3])
            .u32le(0)
            .u16le(2)
            .u16le(5)
            .u8(0xCC)
            .bytes(&[4, 5])
            .build()
    }

    #[test]
    fn test_decode_sample() {
        let data = sample(2);
        assert_eq!(data.len(), 135);
        let cabinet = Cabinet::decode(&data, 0).unwrap();

        let header = cabinet.header.as_ref().unwrap();
        assert_eq!(header.reserved_data, [0xAA; 4]);
        assert!(header.cabinet_prev.is_none());
        assert_eq!(header.cabinet_next.as_ref().unwrap().to_string(), "b.cab");
        assert_eq!(header.disk_next.as_ref().unwrap().to_string(), "Disk2");

        assert_eq!(cabinet.folders.len(), 1);
        let folder = &cabinet.folders[0];
        assert_eq!(folder.reserved_data, [0xBB; 2]);
        assert_eq!(folder.compression_name(), "MSZIP");
        assert_eq!(folder.data_blocks.len(), 2);
        assert_eq!(folder.data_blocks[0].checksum, 0xDEAD_BEEF);
        assert_eq!(folder.data_blocks[0].compressed_data_offset, 121);
        assert_eq!(folder.data_blocks[1].uncompressed_size, 5);

        assert_eq!(cabinet.files.len(), 2);
        assert_eq!(cabinet.files[0].name, "a.txt");
        assert_eq!(cabinet.files[1].name, "é.txt");
        assert_eq!(cabinet.files[1].folder_start_offset, 10);
    }

    #[test]
    fn test_data_block_count_is_a_hint() {
        let cabinet = Cabinet::decode(&sample(9), 0).unwrap();
        assert_eq!(cabinet.folders[0].data_count, 9);
        assert_eq!(cabinet.folders[0].data_blocks.len(), 2);
    }

    #[test]
    fn test_plain_header_has_no_optional_fields() {
        let data = SampleBuilder::new()
            .bytes(b"MSCF")
            .zeros(4)
            .u32le(36)
            .zeros(4)
            .u32le(36)
            .zeros(4)
            .u8(3)
            .u8(1)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .build();
        let cabinet = Cabinet::decode(&data, 0).unwrap();
        let header = cabinet.header.as_ref().unwrap();
        assert!(header.header_reserved_size.is_none());
        assert!(header.reserved_data.is_empty());
        assert!(header.cabinet_next.is_none());
        assert!(cabinet.folders.is_empty());
        assert!(cabinet.files.is_empty());
    }

    #[test]
    fn test_bad_signature_fails() {
        let mut data = sample(2);
        data[0] = b'X';
        assert!(Cabinet::decode(&data, 0).is_err());
    }

    #[test]
    fn test_print() {
        let cabinet = Cabinet::decode(&sample(2), 0).unwrap();
        let report = assert_idempotent(&cabinet);
        assert!(report.starts_with("Microsoft Cabinet Information:\n"));
        assert!(report.contains("  Signature: MSCF\n"));
        assert!(report.contains("  Previous cabinet: [NULL]\n"));
        assert!(report.contains("  Next cabinet: b.cab\n"));
        assert!(report.contains("    Compression type: 1 (0x0001) (MSZIP)\n"));
        assert!(report.contains("    Data Block 1\n"));
        assert!(report.contains("    Name: é.txt\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Cabinet::default().report();
        assert!(report.contains("No header"));
        assert!(report.contains("No folders"));
        assert!(report.contains("No files"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Cabinet>(&sample(2));
    }
}
