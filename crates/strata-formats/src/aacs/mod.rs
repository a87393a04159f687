//! AACS media key block support
//!
//! A media key block is a flat run of big-endian records, each introduced
//! by a one-byte type and a 24-bit length. Decoding stops after the end of
//! media key block record, or at the first record that runs past the data.

mod print;
mod record;

pub use record::{
    RECORD_COPYRIGHT, RECORD_DRIVE_REVOCATION_LIST, RECORD_END_OF_MEDIA_KEY_BLOCK,
    RECORD_EXPLICIT_SUBSET_DIFFERENCE, RECORD_HOST_REVOCATION_LIST, RECORD_MEDIA_KEY_DATA,
    RECORD_SUBSET_DIFFERENCE_INDEX, RECORD_TYPE_AND_VERSION, RECORD_VERIFY_MEDIA_KEY,
    REVOCATION_SIGNATURE_SIZE, Record, RecordBody, RevocationEntry, RevocationSignatureBlock,
    SubsetDifference, record_type_name,
};

use crate::cursor::ByteCursor;
use crate::{BinaryFormat, DecodeOptions, Result};
use tracing::trace;

/// Complete media key block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaKeyBlock {
    /// Records in file order, the end record included
    pub records: Vec<Record>,
}

impl MediaKeyBlock {
    /// Block type and version, when the block carries them
    pub fn type_and_version(&self) -> Option<(u32, u32)> {
        self.records.iter().find_map(|record| match record.body {
            RecordBody::TypeAndVersion {
                media_key_block_type,
                version_number,
            } => Some((media_key_block_type, version_number)),
            _ => None,
        })
    }
}

impl BinaryFormat for MediaKeyBlock {
    const NAME: &'static str = "AACS Media Key Block";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let limit = options.max_table_entries;

        let first = Record::read(&mut cursor, limit)?;
        let mut ended = first.is_end();
        let mut records = vec![first];

        records.extend(cursor.read_until(limit, |c| {
            if ended || c.remaining() == 0 {
                return Ok(None);
            }
            let record = Record::read(c, limit)?;
            ended = record.is_end();
            Ok(Some(record))
        })?);

        if !ended {
            trace!(records = records.len(), "media key block has no end record");
        }

        Ok(Self { records })
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

    fn record(builder: SampleBuilder, record_type: u8, body: &[u8]) -> SampleBuilder {
        let length = (body.len() + 4) as u32;
        builder
            .u8(record_type)
            .bytes(&length.to_be_bytes()[1..])
            .bytes(body)
    }

    fn sample() -> Vec<u8> {
        let mut drive_list = vec![0, 0, 0, 1, 0, 0, 0, 1, 0, 3];
        drive_list.extend_from_slice(&[0x11; 6]);
        drive_list.extend_from_slice(&[0x22; 40]);

        let mut builder = SampleBuilder::new();
        builder = record(
            builder,
            RECORD_TYPE_AND_VERSION,
            &[0x00, 0x03, 0x10, 0x03, 0, 0, 0, 0x4A],
        );
        builder = record(
            builder,
            RECORD_EXPLICIT_SUBSET_DIFFERENCE,
            &[1, 0, 0, 1, 0, 2, 0, 0, 2, 0],
        );
        builder = record(
            builder,
            RECORD_SUBSET_DIFFERENCE_INDEX,
            &[0, 0, 0, 4, 0, 0, 0, 0, 0, 5],
        );
        builder = record(builder, RECORD_MEDIA_KEY_DATA, &[0x33; 32]);
        builder = record(builder, RECORD_VERIFY_MEDIA_KEY, &[0x44; 16]);
        builder = record(builder, RECORD_DRIVE_REVOCATION_LIST, &drive_list);
        builder = record(builder, RECORD_COPYRIGHT, b"(C) AACS\0\0\0\0");
        builder = record(builder, 0x99, &[0xAB, 0xCD]);
        builder = record(builder, RECORD_END_OF_MEDIA_KEY_BLOCK, &[0x55; 8]);
        // Anything after the end record is padding
        record(builder, RECORD_TYPE_AND_VERSION, &[0; 8]).build()
    }

    #[test]
    fn test_decode_sample() {
        let block = MediaKeyBlock::decode(&sample(), 0).unwrap();
        assert_eq!(block.records.len(), 9);
        assert!(block.records[8].is_end());
        assert_eq!(block.type_and_version(), Some((0x0003_1003, 0x4A)));

        match &block.records[1].body {
            RecordBody::ExplicitSubsetDifference { subset_differences } => {
                assert_eq!(subset_differences.len(), 2);
                assert_eq!(subset_differences[1].mask, 2);
                assert_eq!(subset_differences[1].number, 0x200);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(
            block.records[2].body,
            RecordBody::SubsetDifferenceIndex {
                span: 4,
                offsets: vec![0, 5],
            }
        );
        match &block.records[3].body {
            RecordBody::MediaKeyData { media_keys } => assert_eq!(media_keys.len(), 2),
            other => panic!("unexpected body {other:?}"),
        }
        match &block.records[5].body {
            RecordBody::DriveRevocationList {
                total_number_of_entries,
                signature_blocks,
            } => {
                assert_eq!(*total_number_of_entries, 1);
                assert_eq!(signature_blocks.len(), 1);
                assert_eq!(signature_blocks[0].entry_fields[0].range, 3);
                assert_eq!(signature_blocks[0].entry_fields[0].id, [0x11; 6]);
                assert_eq!(signature_blocks[0].signature, vec![0x22; 40]);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(
            block.records[6].body,
            RecordBody::Copyright {
                copyright: "(C) AACS".to_string(),
            }
        );
        assert_eq!(block.records[7].record_type, 0x99);
        assert_eq!(
            block.records[7].body,
            RecordBody::Unknown {
                data: vec![0xAB, 0xCD],
            }
        );
    }

    #[test]
    fn test_record_past_end_stops_block() {
        let mut data = record(SampleBuilder::new(), RECORD_TYPE_AND_VERSION, &[0; 8]).build();
        data.extend_from_slice(&[RECORD_MEDIA_KEY_DATA, 0, 0, 0x40, 0x33]);
        let block = MediaKeyBlock::decode(&data, 0).unwrap();
        assert_eq!(block.records.len(), 1);
    }

    #[test]
    fn test_truncated_first_record_fails() {
        let data = [RECORD_TYPE_AND_VERSION, 0, 0, 12, 0, 0];
        assert!(MediaKeyBlock::decode(&data, 0).is_err());
        assert!(MediaKeyBlock::decode(&[], 0).is_err());
    }

    #[test]
    fn test_print() {
        let block = MediaKeyBlock::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&block);
        assert!(report.starts_with("AACS Media Key Block Information:\n"));
        assert!(report.contains("  Record 0\n    Record type: 16 (0x10) (Type and Version)\n"));
        assert!(report.contains("    Media key block type: 200707 (0x00031003)\n"));
        assert!(report.contains("    Copyright: (C) AACS\n"));
        assert!(report.contains("    Data: AB CD\n"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = MediaKeyBlock::default().report();
        assert!(report.contains("No records"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<MediaKeyBlock>(&sample());
    }
}
