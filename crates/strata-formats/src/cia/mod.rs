//! CTR importable archive (CIA) support
//!
//! A CIA stores its sections back to back, each starting on a 64-byte
//! boundary:
//!
//! - **Header**: section sizes and the content index bitmap (little-endian)
//! - **Certificate Chain**: signed certificates (big-endian)
//! - **Ticket**: title key and rights (big-endian)
//! - **Title Metadata**: content info and content chunk records (big-endian)
//! - **Contents**: one NCCH partition per content chunk record
//! - **Meta**: dependency list, core version and icon (optional)

mod certificate;
mod header;
mod print;
mod ticket;
mod tmd;

pub use certificate::{
    Certificate, ECDSA_SHA1, ECDSA_SHA256, PublicKey, RSA_2048_SHA1, RSA_2048_SHA256,
    RSA_4096_SHA1, RSA_4096_SHA256, Signature,
};
pub use header::{CONTENT_INDEX_SIZE, CiaHeader, DEPENDENCY_COUNT, MetaData, SECTION_ALIGNMENT};
pub use ticket::{MAX_CONTENT_INDEX_SIZE, Ticket};
pub use tmd::{CONTENT_INFO_RECORD_COUNT, ContentChunkRecord, ContentInfoRecord, TitleMetadata};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::n3ds::{BASE_MEDIA_UNIT, Partition};
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;
use tracing::trace;

/// Round `offset` up to the next section boundary
fn align_section(offset: u64) -> u64 {
    offset
        .checked_next_multiple_of(SECTION_ALIGNMENT)
        .unwrap_or(u64::MAX)
}

/// CTR importable archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cia {
    /// CIA header
    pub header: Option<CiaHeader>,
    /// Certificate chain
    pub certificate_chain: Vec<Certificate>,
    /// Ticket
    pub ticket: Option<Ticket>,
    /// Title metadata
    pub title_metadata: Option<TitleMetadata>,
    /// One partition per content chunk record
    pub partitions: Vec<Option<Partition>>,
    /// Meta block
    pub meta_data: Option<MetaData>,
}

/// Absolute start of every section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    /// Certificate chain
    pub certificate_chain: u64,
    /// Ticket
    pub ticket: u64,
    /// Title metadata
    pub title_metadata: u64,
    /// First content
    pub content: u64,
    /// Meta block
    pub meta: u64,
}

impl SectionLayout {
    /// Lay out the sections of a CIA starting at `offset`
    pub fn new(header: &CiaHeader, offset: u64) -> Self {
        let certificate_chain = align_section(offset.saturating_add(u64::from(header.header_size)));
        let ticket = align_section(
            certificate_chain.saturating_add(u64::from(header.certificate_chain_size)),
        );
        let title_metadata = align_section(ticket.saturating_add(u64::from(header.ticket_size)));
        let content = align_section(title_metadata.saturating_add(u64::from(header.tmd_file_size)));
        let meta = align_section(content.saturating_add(header.content_size));
        Self {
            certificate_chain,
            ticket,
            title_metadata,
            content,
            meta,
        }
    }
}

impl Cia {
    /// Section offsets, when the header is present
    pub fn layout(&self, offset: u64) -> Option<SectionLayout> {
        self.header
            .as_ref()
            .map(|header| SectionLayout::new(header, offset))
    }
}

fn read_certificate_chain(
    data: &[u8],
    start: u64,
    size: u32,
    limit: usize,
) -> Result<Vec<Certificate>> {
    let end = start.saturating_add(u64::from(size));
    let mut cursor = ByteCursor::at(data, start)?;
    cursor.read_until(limit, |c| {
        if c.position() >= end {
            return Ok(None);
        }
        c.read::<Certificate>().map(Some)
    })
}

fn read_contents(
    data: &[u8],
    start: u64,
    records: &[ContentChunkRecord],
) -> Result<Vec<Option<Partition>>> {
    let mut partitions = Vec::with_capacity(records.len());
    let mut offset = start;
    for record in records {
        if offset >= data.len() as u64 {
            trace!(offset, "content starts past the end of the data");
            partitions.push(None);
        } else {
            partitions.push(recover(
                "cia content partition",
                Partition::read(data, offset, BASE_MEDIA_UNIT),
            )?);
        }
        offset = offset.saturating_add(record.content_size);
    }
    Ok(partitions)
}

impl BinaryFormat for Cia {
    const NAME: &'static str = "CTR Importable Archive";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: CiaHeader = cursor.read()?;
        let layout = SectionLayout::new(&header, offset);
        let limit = options.max_table_entries;

        let certificate_chain = if header.certificate_chain_size == 0 {
            Vec::new()
        } else {
            recover(
                "cia certificate chain",
                read_certificate_chain(
                    data,
                    layout.certificate_chain,
                    header.certificate_chain_size,
                    limit,
                ),
            )?
            .unwrap_or_default()
        };

        let ticket = if header.ticket_size == 0 {
            None
        } else {
            recover(
                "cia ticket",
                ByteCursor::at(data, layout.ticket).and_then(|mut c| c.read::<Ticket>()),
            )?
        };

        let title_metadata = if header.tmd_file_size == 0 {
            None
        } else {
            recover(
                "cia title metadata",
                ByteCursor::at(data, layout.title_metadata)
                    .and_then(|mut c| c.read_with::<TitleMetadata>(Endian::Big, (limit,))),
            )?
        };

        let partitions = match &title_metadata {
            Some(tmd) if header.content_size != 0 => {
                read_contents(data, layout.content, &tmd.content_chunk_records)?
            }
            _ => Vec::new(),
        };

        let meta_data = if header.meta_size == 0 {
            None
        } else {
            recover(
                "cia meta",
                ByteCursor::at(data, layout.meta).and_then(|mut c| c.read::<MetaData>()),
            )?
        };

        Ok(Self {
            header: Some(header),
            certificate_chain,
            ticket,
            title_metadata,
            partitions,
            meta_data,
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
    use super::certificate::tests::certificate;

    const TITLE_ID: u64 = 0x0004_0000_0012_3400;

    fn signature() -> SampleBuilder {
        SampleBuilder::new()
            .u32be(RSA_2048_SHA256)
            .bytes(&[0x5A; 0x100])
            .zeros(0x3C)
    }

    fn ticket() -> SampleBuilder {
        signature()
            .text("Root-CA00000003-XS0000000c", 0x40)
            .zeros(0x3C)
            .u8(1)
            .u8(0)
            .u8(0)
            .bytes(&[0x11; 0x10])
            .u8(0)
            .u64be(0x0001_0203_0405_0607)
            .u32be(0)
            .u64be(TITLE_ID)
            .zeros(2)
            .u16be(0)
            .zeros(8)
            .u8(0)
            .u8(1)
            .zeros(0x2A)
            .u32be(0)
            .u8(0)
            .u8(0)
            .zeros(0x42)
            .zeros(0x40)
            .u32be(0x0001_0014)
            .u32be(0xAC)
            .zeros(0xA4)
    }

    fn title_metadata(content_size: u64) -> SampleBuilder {
        signature()
            .text("Root-CA00000003-CP0000000b", 0x40)
            .u8(1)
            .u8(0)
            .u8(0)
            .u8(0)
            .u64be(0)
            .u64be(TITLE_ID)
            .u32be(0x40)
            .u16be(0)
            .u32be(0x8_0000)
            .u32be(0)
            .zeros(4)
            .u8(0)
            .zeros(0x31)
            .u32be(0)
            .u16be(0x10)
            .u16be(1)
            .u16be(0)
            .zeros(2)
            .zeros(0x20)
            // one info record covering the only chunk record
            .u16be(0)
            .u16be(1)
            .zeros(0x20)
            .zeros(63 * 0x24)
            .u32be(0)
            .u16be(0)
            .u16be(1)
            .u64be(content_size)
            .zeros(0x20)
    }

    fn sample(content_size: u64) -> Vec<u8> {
        let header = SampleBuilder::new()
            .u32le(0x2020)
            .u16le(0)
            .u16le(0)
            .u32le(0x600)
            .u32le(0x350)
            .u32le(0xB34)
            .u32le(0x3AC0)
            .u64le(0x400)
            .u8(0x80)
            .pad_to(0x2020);
        header
            .pad_to(0x2040)
            .bytes(&certificate("CA00000003").build())
            .bytes(&certificate("CP0000000b").build())
            .bytes(&ticket().build())
            .pad_to(0x29C0)
            .bytes(&title_metadata(content_size).build())
            .pad_to(0x3500)
            .zeros(0x100)
            .bytes(b"NCCH")
            .pad_to(0x3900)
            .u64le(0x0004_0130_0000_1502)
            .zeros(0x180 - 8)
            .zeros(0x180)
            .u32le(2)
            .zeros(0xFC)
            .zeros(0x36C0)
            .build()
    }

    #[test]
    fn test_section_layout() {
        let cia = Cia::decode(&sample(0x400), 0).unwrap();
        let layout = cia.layout(0).unwrap();
        assert_eq!(layout.certificate_chain, 0x2040);
        assert_eq!(layout.ticket, 0x2640);
        assert_eq!(layout.title_metadata, 0x29C0);
        assert_eq!(layout.content, 0x3500);
        assert_eq!(layout.meta, 0x3900);
    }

    #[test]
    fn test_decodes_sections() {
        let data = sample(0x400);
        assert_eq!(data.len(), 0x73C0);
        let cia = Cia::decode(&data, 0).unwrap();

        let names: Vec<_> = cia.certificate_chain.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["CA00000003", "CP0000000b"]);

        let ticket = cia.ticket.as_ref().unwrap();
        assert_eq!(ticket.title_id, TITLE_ID);
        assert_eq!(ticket.title_key, [0x11; 0x10]);
        assert_eq!(ticket.content_index.len(), 0xA4);

        let tmd = cia.title_metadata.as_ref().unwrap();
        assert_eq!(tmd.content_count, 1);
        assert_eq!(tmd.content_info_records.len(), CONTENT_INFO_RECORD_COUNT);
        assert_eq!(tmd.content_chunk_records[0].content_size, 0x400);

        assert_eq!(cia.partitions.len(), 1);
        assert!(matches!(cia.partitions[0], Some(Partition::Ncch(_))));

        let meta = cia.meta_data.as_ref().unwrap();
        assert_eq!(meta.title_id_dependency_list[0], 0x0004_0130_0000_1502);
        assert_eq!(meta.core_version, 2);
    }

    #[test]
    fn test_content_past_end_is_absent() {
        let data = sample(0x400);
        let cia = Cia::decode(&data[..0x3500], 0).unwrap();
        assert_eq!(cia.partitions, vec![None]);
        assert!(cia.meta_data.is_none());
        assert!(cia.title_metadata.is_some());
    }

    #[test]
    fn test_print() {
        let cia = Cia::decode(&sample(0x400), 0).unwrap();
        let text = assert_idempotent(&cia);
        assert!(text.starts_with("CIA Archive Information:\n"));
        assert!(text.contains("Signature type: RSA_2048_SHA256 (0x00010004)"));
        assert!(text.contains("Name: CP0000000b"));
        assert!(text.contains("Issuer: Root-CA00000003-XS0000000c"));
        assert!(text.contains("Content info record 0"));
        assert!(!text.contains("Content info record 1\n"));
        assert!(text.contains("Content size: 1024 (0x0000000000000400)"));
        assert!(text.contains("Magic number: NCCH"));
        assert!(text.contains("Icon data: [Icon data not printed]"));
    }

    #[test]
    fn test_print_empty() {
        let text = Cia::default().report();
        assert!(text.contains("No header"));
        assert!(text.contains("No certificates, expected 3"));
        assert!(text.contains("No ticket"));
        assert!(text.contains("No title metadata"));
        assert!(text.contains("No partitions"));
        assert!(text.contains("No meta file data"));
        assert!(Cia::decode(&[], 0).is_err());
    }

    #[test]
    fn test_truncation_safe() {
        let data = sample(0x400);
        for length in (0..=data.len()).step_by(97).chain([data.len() - 1]) {
            if let Ok(cia) = Cia::decode(&data[..length], 0) {
                let _ = cia.report();
            }
        }
    }
}
