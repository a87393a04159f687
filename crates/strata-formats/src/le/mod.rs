//! Linear Executable (LE/LX) support
//!
//! The MS-DOS stub points at the information block. Its byte-order field
//! selects the byte order of every later field. Loader and fixup tables are
//! located relative to the information block; the data pages, the
//! non-resident names and the debug information relative to the file start.

mod entry;
mod fixup;
mod header;
mod print;

pub use entry::{BundleKind, Entry, EntryTableBundle, PARAMETER_TYPING_PRESENT};
pub use fixup::{
    FixupPage, FixupRecord, FixupSource, FixupTarget, SELECTOR_16_SOURCE, SOURCE_LIST_FLAG,
    SOURCE_TYPE_MASK, target_flags,
};
pub use header::{
    BIG_ENDIAN_BYTE_ORDER, DebugInformation, DirectiveData, InformationBlock, LE_SIGNATURE,
    LX_SIGNATURE, ModuleDirective, ObjectPageMapEntry, ObjectTableEntry, ResourceTableEntry,
    VERIFY_RECORD_DIRECTIVE, VerifyRecordEntry,
};

use crate::cursor::{ByteCursor, Encoding};
use crate::error::recover;
use crate::mz;
use crate::ne::NameTableEntry;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Linear executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Executable {
    /// MS-DOS stub
    pub stub: Option<mz::Executable>,
    /// Information block
    pub header: Option<InformationBlock>,
    /// Object table
    pub object_table: Vec<ObjectTableEntry>,
    /// Object page map, one entry per module page
    pub object_page_map: Vec<ObjectPageMapEntry>,
    /// Resource table
    pub resource_table: Vec<ResourceTableEntry>,
    /// Resident names table
    pub resident_names_table: Vec<NameTableEntry>,
    /// Entry table
    pub entry_table: Vec<EntryTableBundle>,
    /// Module directives
    pub module_directives: Vec<ModuleDirective>,
    /// Per-page checksums
    pub per_page_checksums: Vec<u32>,
    /// Fixup page table, one offset per page plus the end offset
    pub fixup_page_table: Vec<u32>,
    /// Fixup records, grouped by page
    pub fixup_record_table: Vec<FixupPage>,
    /// Imported module names, in ordinal order
    pub imported_module_names: Vec<String>,
    /// Import procedure names keyed by offset from the table start
    pub import_procedure_names: BTreeMap<u32, String>,
    /// Non-resident names table
    pub non_resident_names_table: Vec<NameTableEntry>,
    /// Debug information
    pub debug_information: Option<DebugInformation>,
}

impl Executable {
    /// Byte order named by the information block
    pub fn endian(&self) -> Endian {
        match &self.header {
            Some(header) if header.byte_order == BIG_ENDIAN_BYTE_ORDER => Endian::Big,
            _ => Endian::Little,
        }
    }

    /// File offset of page `page` (0-based) of object `object` (0-based)
    ///
    /// The result is relative to the start of the stub.
    pub fn object_page_file_offset(&self, object: usize, page: u32) -> Option<u64> {
        let header = self.header.as_ref()?;
        let entry = self.object_table.get(object)?;
        if page >= entry.page_table_entries {
            return None;
        }
        let index = entry.page_table_index.checked_sub(1)?.checked_add(page)?;
        let map = self.object_page_map.get(usize::try_from(index).ok()?)?;
        let data_pages = u64::from(header.data_pages_offset);
        match map {
            ObjectPageMapEntry::Le { page_number, .. } => {
                let page_index = u64::from(page_number.checked_sub(1)?);
                Some(data_pages + page_index * u64::from(header.memory_page_size))
            }
            ObjectPageMapEntry::Lx {
                page_data_offset, ..
            } => {
                let shift = header.bytes_on_last_page.min(31);
                Some(data_pages + (u64::from(*page_data_offset) << shift))
            }
        }
    }
}

/// Table readers over one information block
struct Tables<'h> {
    header: &'h InformationBlock,
    base: u64,
    file_start: u64,
    endian: Endian,
    limit: usize,
}

impl Tables<'_> {
    /// Seek to a header-relative table, `false` when it is absent or out of range
    fn seek(&self, cursor: &mut ByteCursor<'_>, relative: u32) -> bool {
        relative != 0 && cursor.seek_to(self.base + u64::from(relative)).is_ok()
    }

    fn object_page_map(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<ObjectPageMapEntry>> {
        if !self.seek(cursor, self.header.object_page_map_offset) {
            return Ok(Vec::new());
        }
        let endian = self.endian;
        let lx = self.header.is_lx();
        cursor.read_counted(
            u64::from(self.header.module_number_pages),
            self.limit,
            |c| {
                if lx {
                    Ok(ObjectPageMapEntry::Lx {
                        page_data_offset: c.read_u32(endian)?,
                        data_size: c.read_u16(endian)?,
                        flags: c.read_u16(endian)?,
                    })
                } else {
                    let high = c.read_u16(endian)?;
                    let low = c.read_u8()?;
                    Ok(ObjectPageMapEntry::Le {
                        page_number: (u32::from(high) << 8) | u32::from(low),
                        flags: c.read_u8()?,
                    })
                }
            },
        )
    }

    fn module_directives(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<ModuleDirective>> {
        if !self.seek(cursor, self.header.module_directives_table_offset) {
            return Ok(Vec::new());
        }
        let endian = self.endian;
        let mut directives = cursor.read_counted(
            u64::from(self.header.module_directives_count),
            self.limit,
            |c| {
                Ok(ModuleDirective {
                    directive_number: c.read_u16(endian)?,
                    directive_data_length: c.read_u16(endian)?,
                    directive_data_offset: c.read_u32(endian)?,
                    data: DirectiveData::Unparsed,
                })
            },
        )?;

        for directive in &mut directives {
            if directive.directive_number != VERIFY_RECORD_DIRECTIVE
                || !self.seek(cursor, directive.directive_data_offset)
            {
                continue;
            }
            let Some(entry_count) = recover("verify record", cursor.read_u16(endian))? else {
                continue;
            };
            let entries = cursor.read_counted(u64::from(entry_count), self.limit, |c| {
                c.read_endian::<VerifyRecordEntry>(endian)
            })?;
            directive.data = DirectiveData::VerifyRecord {
                entry_count,
                entries,
            };
        }
        Ok(directives)
    }

    fn fixup_records(
        &self,
        cursor: &mut ByteCursor<'_>,
        page_table: &[u32],
    ) -> Result<Vec<FixupPage>> {
        let records_start = self.base + u64::from(self.header.fixup_record_table_offset);
        let mut pages = Vec::with_capacity(page_table.len().saturating_sub(1));
        for bounds in page_table.windows(2) {
            let (start, end) = (bounds[0], bounds[1]);
            let page = if end > start
                && cursor.seek_to(records_start + u64::from(start)).is_ok()
            {
                FixupPage::read_from(
                    cursor,
                    records_start + u64::from(end),
                    self.endian,
                    self.limit,
                )?
            } else {
                FixupPage::default()
            };
            pages.push(page);
        }
        Ok(pages)
    }

    fn import_procedure_names(&self, cursor: &mut ByteCursor<'_>) -> BTreeMap<u32, String> {
        let mut names = BTreeMap::new();
        if !self.seek(cursor, self.header.import_procedure_name_table_offset) {
            return names;
        }
        let table_start = cursor.position();
        let fixup_end = self.base
            + u64::from(self.header.fixup_page_table_offset)
            + u64::from(self.header.fixup_section_size);
        while cursor.position() < fixup_end && names.len() < self.limit {
            let offset = (cursor.position() - table_start) as u32;
            match cursor.read_prefixed_u8(Encoding::Ascii) {
                Ok(name) => {
                    names.insert(offset, name);
                }
                Err(_) => break,
            }
        }
        names
    }

    fn debug_information(&self, cursor: &mut ByteCursor<'_>) -> Result<Option<DebugInformation>> {
        let header = self.header;
        if header.debug_information_offset == 0 || header.debug_information_length < 4 {
            return Ok(None);
        }
        if cursor
            .seek_to(self.file_start + u64::from(header.debug_information_offset))
            .is_err()
        {
            return Ok(None);
        }
        let read = |c: &mut ByteCursor<'_>| -> Result<DebugInformation> {
            let signature = c.read_fixed_string(3, Encoding::Ascii)?;
            let format_type = c.read_u8()?;
            let length = u64::from(header.debug_information_length - 4).min(c.remaining());
            Ok(DebugInformation {
                signature,
                format_type,
                debugger_data: c.read_bytes(length)?,
            })
        };
        recover("le debug information", read(cursor))
    }
}

impl BinaryFormat for Executable {
    const NAME: &'static str = "Linear Executable";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let (stub, header_offset) = mz::Executable::read_stub(data, offset, options)?;
        let mut cursor = ByteCursor::at(data, header_offset)?;
        let (byte_order, word_order) = match cursor.peek(4) {
            Ok(&[_, _, byte_order, word_order]) => (byte_order, word_order),
            _ => (0, 0),
        };
        if byte_order != word_order {
            warn!(byte_order, word_order, "mixed byte and word order, using the byte order");
        }
        let endian = if byte_order == BIG_ENDIAN_BYTE_ORDER {
            Endian::Big
        } else {
            Endian::Little
        };
        let header: InformationBlock = cursor.read_endian(endian)?;
        debug!(lx = header.is_lx(), ?endian, "linear executable header");

        let tables = Tables {
            header: &header,
            base: header_offset,
            file_start: offset,
            endian,
            limit: options.max_table_entries,
        };
        let limit = tables.limit;

        let mut object_table = Vec::new();
        if tables.seek(&mut cursor, header.object_table_offset) {
            object_table = cursor.read_counted(u64::from(header.object_table_count), limit, |c| {
                c.read_endian::<ObjectTableEntry>(endian)
            })?;
        }

        let object_page_map = tables.object_page_map(&mut cursor)?;

        let mut resource_table = Vec::new();
        if header.resource_table_count > 0 && tables.seek(&mut cursor, header.resource_table_offset)
        {
            resource_table =
                cursor.read_counted(u64::from(header.resource_table_count), limit, |c| {
                    c.read_endian::<ResourceTableEntry>(endian)
                })?;
        }

        let mut resident_names_table = Vec::new();
        if tables.seek(&mut cursor, header.resident_names_table_offset) {
            resident_names_table =
                cursor.read_until(limit, |c| NameTableEntry::read_endian(c, endian))?;
        }

        let mut entry_table = Vec::new();
        if tables.seek(&mut cursor, header.entry_table_offset) {
            entry_table = cursor.read_until(limit, |c| EntryTableBundle::read_from(c, endian))?;
        }

        let module_directives = tables.module_directives(&mut cursor)?;

        let mut per_page_checksums = Vec::new();
        if tables.seek(&mut cursor, header.per_page_checksum_table_offset) {
            per_page_checksums =
                cursor.read_counted(u64::from(header.module_number_pages), limit, |c| {
                    c.read_u32(endian)
                })?;
        }

        let mut fixup_page_table = Vec::new();
        if tables.seek(&mut cursor, header.fixup_page_table_offset) {
            fixup_page_table = cursor.read_counted(
                u64::from(header.module_number_pages) + 1,
                limit,
                |c| c.read_u32(endian),
            )?;
        }
        let fixup_record_table = tables.fixup_records(&mut cursor, &fixup_page_table)?;

        let mut imported_module_names = Vec::new();
        if tables.seek(&mut cursor, header.imported_modules_name_table_offset) {
            imported_module_names = cursor.read_counted(
                u64::from(header.imported_modules_count),
                limit,
                |c| c.read_prefixed_u8(Encoding::Ascii),
            )?;
        }

        let import_procedure_names = tables.import_procedure_names(&mut cursor);

        let mut non_resident_names_table = Vec::new();
        if header.non_resident_names_table_offset != 0
            && header.non_resident_names_table_length > 0
            && cursor
                .seek_to(offset + u64::from(header.non_resident_names_table_offset))
                .is_ok()
        {
            let length =
                u64::from(header.non_resident_names_table_length).min(cursor.remaining());
            let mut names = ByteCursor::new(cursor.take(length)?);
            non_resident_names_table =
                names.read_until(limit, |c| NameTableEntry::read_endian(c, endian))?;
        }

        let debug_information = tables.debug_information(&mut cursor)?;

        Ok(Self {
            stub: Some(stub),
            header: Some(header),
            object_table,
            object_page_map,
            resource_table,
            resident_names_table,
            entry_table,
            module_directives,
            per_page_checksums,
            fixup_page_table,
            fixup_record_table,
            imported_module_names,
            import_procedure_names,
            non_resident_names_table,
            debug_information,
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
    use crate::mz::tests::stub;
    use crate::test_utils::{assert_idempotent, assert_truncation_safe};

    const HEADER: u32 = 0x40;

    /// Byte writer honoring the sample's byte order
    struct Writer {
        bytes: Vec<u8>,
        big: bool,
    }

    impl Writer {
        fn u8(&mut self, value: u8) -> &mut Self {
            self.bytes.push(value);
            self
        }

        fn u16(&mut self, value: u16) -> &mut Self {
            let raw = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
            self.bytes.extend_from_slice(&raw);
            self
        }

        fn u32(&mut self, value: u32) -> &mut Self {
            let raw = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
            self.bytes.extend_from_slice(&raw);
            self
        }

        fn raw(&mut self, bytes: &[u8]) -> &mut Self {
            self.bytes.extend_from_slice(bytes);
            self
        }
    }

    /// One object with one page, every table populated
    fn sample(signature: [u8; 2], big: bool) -> Vec<u8> {
        let lx = signature == LX_SIGNATURE;
        let objects = 0xACu32;
        let page_map = objects + 24;
        let resources = page_map + if lx { 8 } else { 4 };
        let resident = resources + 14;
        let entries = resident + 8;
        let directives = entries + 10;
        let verify = directives + 8;
        let checksums = verify + 14;
        let fixup_pages = checksums + 4;
        let fixup_records = fixup_pages + 8;
        let imports = fixup_records + 9;
        let procedures = imports + 7;
        let loader_end = procedures + 6;
        let non_resident = HEADER + loader_end;
        let debug = non_resident + 11;
        let data_pages = debug + 8;

        let mut w = Writer {
            bytes: stub(HEADER).build(),
            big,
        };
        w.raw(&signature).u8(u8::from(big)).u8(u8::from(big));
        w.u32(0).u16(2).u16(1).u32(0).u32(0x8000).u32(1);
        w.u32(1).u32(0x10).u32(1).u32(0x1000);
        w.u32(0x1000).u32(if lx { 4 } else { 0x200 });
        w.u32(loader_end - fixup_pages).u32(0).u32(0).u32(0);
        w.u32(objects).u32(1).u32(page_map).u32(0);
        w.u32(resources).u32(1).u32(resident).u32(entries);
        w.u32(directives).u32(1).u32(fixup_pages).u32(fixup_records);
        w.u32(imports).u32(1).u32(procedures).u32(checksums);
        w.u32(data_pages).u32(0).u32(non_resident).u32(11).u32(0);
        w.u32(1).u32(debug).u32(8).u32(0).u32(0).u32(0);
        assert_eq!(w.bytes.len() as u32, HEADER + objects);

        // object table
        w.u32(0x1000).u32(0x0001_0000).u32(0x2045).u32(1).u32(1).u32(0);
        // object page map
        if lx {
            w.u32(1).u16(0x20).u16(0);
        } else {
            w.u16(0).u8(1).u8(0);
        }
        // resource table
        w.u16(10).u16(1).u32(0x40).u16(1).u32(0x100);
        // resident names
        w.u8(4).raw(b"DEMO").u16(0).u8(0);
        // entry table: one 32-bit entry
        w.u8(1).u8(0x03).u16(1).u8(0x01).u32(0x0000_1234).u8(0);
        // module directive and its verify record
        w.u16(VERIFY_RECORD_DIRECTIVE).u16(14).u32(verify);
        w.u16(1).u16(1).u16(2).u16(1).u16(1).u16(0).u16(0x1000);
        // per-page checksums
        w.u32(0xABCD_EF01);
        // fixup page table and one internal fixup
        w.u32(0).u32(9);
        w.u8(0x07).u8(target_flags::TARGET_OFFSET_32).u16(0x10).u8(1).u32(0x20);
        // imported modules and procedure names
        w.u8(6).raw(b"KERNEL");
        w.u8(0).u8(4).raw(b"Exit");
        // non-resident names
        w.u8(7).raw(b"DEMO.LX").u16(0).u8(0);
        // debug information
        w.raw(b"NB0").u8(0).raw(&[1, 2, 3, 4]);
        // data pages
        w.raw(&[0x90; 32]);
        w.bytes.clone()
    }

    #[test]
    fn test_decode_lx() {
        let exe = Executable::decode(&sample(LX_SIGNATURE, false), 0).unwrap();
        let header = exe.header.as_ref().unwrap();
        assert!(header.is_lx());
        assert_eq!(exe.endian(), Endian::Little);
        assert_eq!(exe.object_table.len(), 1);
        assert_eq!(
            exe.object_page_map,
            vec![ObjectPageMapEntry::Lx {
                page_data_offset: 1,
                data_size: 0x20,
                flags: 0
            }]
        );
        assert_eq!(exe.resource_table[0].resource_size, 0x40);
        assert_eq!(exe.resident_names_table[0].name, "DEMO");
        assert_eq!(
            exe.entry_table[0].kind,
            BundleKind::Entries {
                object_number: 1,
                entries: vec![Entry::ThirtyTwoBit {
                    flags: 1,
                    offset: 0x1234
                }]
            }
        );
        assert!(matches!(
            &exe.module_directives[0].data,
            DirectiveData::VerifyRecord { entry_count: 1, entries } if entries[0].object_virtual_address_size == 0x1000
        ));
        assert_eq!(exe.per_page_checksums, vec![0xABCD_EF01]);
        assert_eq!(exe.fixup_page_table, vec![0, 9]);
        assert_eq!(exe.fixup_record_table.len(), 1);
        assert_eq!(exe.fixup_record_table[0].records.len(), 1);
        assert_eq!(exe.imported_module_names, vec!["KERNEL".to_string()]);
        assert_eq!(exe.import_procedure_names.get(&0).map(String::as_str), Some(""));
        assert_eq!(exe.import_procedure_names.get(&1).map(String::as_str), Some("Exit"));
        assert_eq!(exe.non_resident_names_table[0].name, "DEMO.LX");
        let debug = exe.debug_information.as_ref().unwrap();
        assert_eq!(debug.signature, "NB0");
        assert_eq!(debug.debugger_data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_big_endian_le() {
        let exe = Executable::decode(&sample(LE_SIGNATURE, true), 0).unwrap();
        let header = exe.header.as_ref().unwrap();
        assert!(!header.is_lx());
        assert_eq!(exe.endian(), Endian::Big);
        assert_eq!(header.cpu_type, 2);
        assert_eq!(header.memory_page_size, 0x1000);
        assert_eq!(exe.object_table[0].object_flags, 0x2045);
        assert_eq!(
            exe.object_page_map,
            vec![ObjectPageMapEntry::Le {
                page_number: 1,
                flags: 0
            }]
        );
        assert_eq!(exe.resident_names_table[0].name, "DEMO");
        assert!(matches!(
            exe.fixup_record_table[0].records[0],
            FixupRecord::Decoded {
                source: FixupSource::Offset(0x10),
                target: FixupTarget::Internal {
                    object_number: 1,
                    target_offset: Some(0x20)
                },
                ..
            }
        ));
    }

    #[test]
    fn test_mixed_word_order_follows_byte_order() {
        let mut data = sample(LE_SIGNATURE, false);
        data[HEADER as usize + 3] = 1;
        let exe = Executable::decode(&data, 0).unwrap();
        let header = exe.header.as_ref().unwrap();
        assert_eq!(header.word_order, 1);
        assert_eq!(exe.endian(), Endian::Little);
        assert_eq!(header.memory_page_size, 0x1000);
        assert_eq!(exe.object_table[0].object_flags, 0x2045);
    }

    #[test]
    fn test_object_page_file_offset() {
        let lx = Executable::decode(&sample(LX_SIGNATURE, false), 0).unwrap();
        let data_pages = u64::from(lx.header.as_ref().unwrap().data_pages_offset);
        assert_eq!(lx.object_page_file_offset(0, 0), Some(data_pages + (1 << 4)));
        assert_eq!(lx.object_page_file_offset(0, 1), None);
        assert_eq!(lx.object_page_file_offset(1, 0), None);

        let le = Executable::decode(&sample(LE_SIGNATURE, true), 0).unwrap();
        let data_pages = u64::from(le.header.as_ref().unwrap().data_pages_offset);
        assert_eq!(le.object_page_file_offset(0, 0), Some(data_pages));
    }

    #[test]
    fn test_unknown_fixup_is_printed() {
        let mut data = sample(LX_SIGNATURE, false);
        let exe = Executable::decode(&data, 0).unwrap();
        let header = exe.header.as_ref().unwrap();
        let flags_at = (HEADER + header.fixup_record_table_offset + 1) as usize;
        data[flags_at] = target_flags::RESERVED;

        let exe = Executable::decode(&data, 0).unwrap();
        assert_eq!(
            exe.fixup_record_table[0].records,
            vec![FixupRecord::Unknown {
                source_type: 0x07,
                target_flags: target_flags::RESERVED
            }]
        );
        let report = exe.report();
        assert!(report.contains("Unknown entry format"));
        assert!(!report.contains("Target object number"));
    }

    #[test]
    fn test_print() {
        let exe = Executable::decode(&sample(LX_SIGNATURE, false), 0).unwrap();
        let report = assert_idempotent(&exe);
        assert!(report.starts_with("Linear Executable Information:\n"));
        assert!(report.contains("  Signature: LX\n"));
        assert!(report.contains("Type: 32-bit"));
        assert!(report.contains("Target object number: 1 (0x0001)"));
        assert!(report.contains("Procedure name: [EMPTY]"));
    }

    #[test]
    fn test_print_empty_root() {
        let report = Executable::default().report();
        assert!(report.contains("No MS-DOS stub header"));
        assert!(report.contains("No information block"));
        assert!(report.contains("No fixup record table items"));
        assert!(report.contains("No debug information"));
    }

    #[test]
    fn test_truncation_safety() {
        assert_truncation_safe::<Executable>(&sample(LX_SIGNATURE, false));
        assert_truncation_safe::<Executable>(&sample(LE_SIGNATURE, true));
    }
}
