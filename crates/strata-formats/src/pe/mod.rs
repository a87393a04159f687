//! Portable Executable (PE32 / PE32+) support
//!
//! An MS-DOS stub points at the `PE\0\0` signature. After it come the COFF
//! file header, the optional header and the section table. Everything else
//! is found through the optional header's data directories, whose RVAs are
//! mapped to file offsets with the section table:
//!
//! - **COFF symbol and string tables**: file offsets from the file header
//! - **Attribute certificates**: the one directory holding a file offset
//! - **Exports, imports, delay-load imports**
//! - **Base relocations** and the **debug directory**
//! - **Resources**: a recursive tree whose leaves are interpreted by type

mod certificate;
mod coff;
mod debug_directory;
mod export;
mod header;
mod import;
mod print;
mod relocation;
mod resource;

pub use certificate::AttributeCertificate;
pub use coff::{StandardSymbol, SymbolName, SymbolRecord};
pub use debug_directory::{CodeViewPdb70, DebugData, DebugDirectoryEntry, DebugEntry, RSDS_SIGNATURE};
pub use export::{ExportAddress, ExportDirectoryTable, ExportTable};
pub use header::{
    DataDirectory, FileHeader, MAX_DATA_DIRECTORIES, OptionalHeader, OptionalHeader32,
    OptionalHeader64, PE_SIGNATURE, PE32_MAGIC, PE32_PLUS_MAGIC, SectionHeader, directory,
};
pub use import::{
    DelayLoadDirectoryEntry, HintNameEntry, ImportDescriptor, ImportDirectoryTableEntry,
    ImportLookupEntry, ImportTable,
};
pub use relocation::{BaseRelocationBlock, BaseRelocationEntry};
pub use resource::{
    FixedFileInfo, RT_MANIFEST, RT_STRING, RT_VERSION, ResourceData, ResourceDataEntry,
    ResourceDirectoryEntry, ResourceDirectoryHeader, ResourceDirectoryTable, ResourceName,
    ResourceNode, VersionInfo,
};

use crate::address::{find_virtual_address, resolve_virtual_address};
use crate::cursor::{ByteCursor, Encoding};
use crate::error::recover;
use crate::mz;
use crate::{BinaryFormat, DecodeOptions, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Portable executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Executable {
    /// MS-DOS stub
    pub stub: Option<mz::Executable>,
    /// Signature and COFF file header
    pub file_header: Option<FileHeader>,
    /// Optional header
    pub optional_header: Option<OptionalHeader>,
    /// Section table
    pub section_table: Vec<SectionHeader>,
    /// COFF symbol table, auxiliary records included
    pub coff_symbol_table: Vec<SymbolRecord>,
    /// COFF string table keyed by offset
    pub coff_string_table: BTreeMap<u32, String>,
    /// Attribute certificate table
    pub attribute_certificates: Vec<AttributeCertificate>,
    /// Export data
    pub export_table: Option<ExportTable>,
    /// Import data
    pub import_table: Option<ImportTable>,
    /// Delay-load directory table
    pub delay_load_directory: Vec<DelayLoadDirectoryEntry>,
    /// Base relocation blocks
    pub base_relocation_table: Vec<BaseRelocationBlock>,
    /// Debug directory
    pub debug_table: Vec<DebugEntry>,
    /// Root of the resource tree
    pub resource_directory: Option<ResourceDirectoryTable>,
}

impl Executable {
    /// File offset of `rva`, relative to the start of the stub
    ///
    /// Addresses outside every section resolve to 0.
    pub fn file_offset(&self, rva: u32) -> u64 {
        resolve_virtual_address(u64::from(rva), &self.section_table)
    }

    /// Whether the optional header is the PE32+ variant
    pub fn is_pe32_plus(&self) -> bool {
        self.optional_header
            .as_ref()
            .is_some_and(OptionalHeader::is_pe32_plus)
    }

    /// Name of a COFF symbol, looking long names up in the string table
    pub fn symbol_name(&self, symbol: &StandardSymbol) -> Option<String> {
        match symbol.name() {
            SymbolName::Short(name) => Some(name),
            SymbolName::Long(offset) => self.coff_string_table.get(&offset).cloned(),
        }
    }
}

/// RVA-addressed reads over one image
pub(crate) struct Image<'a> {
    data: &'a [u8],
    file_start: u64,
    sections: &'a [SectionHeader],
    limit: usize,
    pe32_plus: bool,
}

impl<'a> Image<'a> {
    /// Absolute file offset of `rva`, `None` when zero or unmapped
    fn file_offset(&self, rva: u32) -> Option<u64> {
        if rva == 0 {
            return None;
        }
        find_virtual_address(u64::from(rva), self.sections).map(|raw| self.file_start + raw)
    }

    fn cursor_at(&self, rva: u32) -> Option<ByteCursor<'a>> {
        ByteCursor::at(self.data, self.file_offset(rva)?).ok()
    }

    fn cstring_at(&self, rva: u32) -> Option<String> {
        self.cursor_at(rva)?.read_cstring(Encoding::Ascii).ok()
    }
}

/// Decode one data directory, leaving it absent when missing or malformed
fn read_directory<T>(
    section: &'static str,
    location: Option<DataDirectory>,
    read: impl FnOnce(&DataDirectory) -> Result<T>,
) -> Result<Option<T>> {
    match location {
        Some(location) => recover(section, read(&location)),
        None => Ok(None),
    }
}

impl BinaryFormat for Executable {
    const NAME: &'static str = "Portable Executable";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let (stub, header_offset) = mz::Executable::read_stub(data, offset, options)?;
        let mut cursor = ByteCursor::at(data, header_offset)?;
        let file_header: FileHeader = cursor.read()?;
        let limit = options.max_table_entries;

        let optional_start = cursor.position();
        let optional_size = u64::from(file_header.size_of_optional_header);
        let optional_header = if optional_size == 0 {
            None
        } else {
            let available = optional_size.min(cursor.remaining());
            let mut optional = ByteCursor::new(cursor.take(available)?);
            recover("pe optional header", optional.read::<OptionalHeader>())?
        };
        debug!(
            pe32_plus = optional_header.as_ref().map(OptionalHeader::is_pe32_plus),
            "portable executable header"
        );

        let mut section_table = Vec::new();
        if cursor.seek_to(optional_start + optional_size).is_ok() {
            section_table = cursor.read_counted(
                u64::from(file_header.number_of_sections),
                limit,
                |c| c.read::<SectionHeader>(),
            )?;
        }

        let mut coff_symbol_table = Vec::new();
        let mut coff_string_table = BTreeMap::new();
        if file_header.pointer_to_symbol_table != 0
            && cursor
                .seek_to(offset + u64::from(file_header.pointer_to_symbol_table))
                .is_ok()
        {
            coff_symbol_table =
                coff::read_symbols(&mut cursor, file_header.number_of_symbols, limit)?;
            if coff_symbol_table.len() as u64 == u64::from(file_header.number_of_symbols) {
                coff_string_table = recover(
                    "coff string table",
                    coff::read_string_table(&mut cursor, limit),
                )?
                .unwrap_or_default();
            }
        }

        let image = Image {
            data,
            file_start: offset,
            sections: &section_table,
            limit,
            pe32_plus: optional_header
                .as_ref()
                .is_some_and(OptionalHeader::is_pe32_plus),
        };
        let location = |slot: usize| {
            optional_header
                .as_ref()
                .and_then(|header| header.data_directory(slot))
                .copied()
        };

        let attribute_certificates = location(directory::CERTIFICATE)
            .map(|certificates| {
                certificate::read_certificates(
                    data,
                    offset + u64::from(certificates.virtual_address),
                    certificates.size,
                    limit,
                )
            })
            .unwrap_or_default();
        let export_table = read_directory("pe export table", location(directory::EXPORT), |l| {
            ExportTable::read(&image, l)
        })?;
        let import_table = read_directory("pe import table", location(directory::IMPORT), |l| {
            ImportTable::read(&image, l)
        })?;
        let delay_load_directory = read_directory(
            "pe delay-load directory",
            location(directory::DELAY_IMPORT),
            |l| import::read_delay_load_directory(&image, l),
        )?
        .unwrap_or_default();
        let base_relocation_table = read_directory(
            "pe base relocation table",
            location(directory::BASE_RELOCATION),
            |l| relocation::read_base_relocations(&image, l),
        )?
        .unwrap_or_default();
        let debug_table = read_directory("pe debug directory", location(directory::DEBUG), |l| {
            debug_directory::read_debug_directory(&image, l)
        })?
        .unwrap_or_default();
        let resource_directory =
            read_directory("pe resource directory", location(directory::RESOURCE), |l| {
                resource::read_resource_directory(&image, l, options.max_resource_depth)
            })?;

        Ok(Self {
            stub: Some(stub),
            file_header: Some(file_header),
            optional_header,
            section_table,
            coff_symbol_table,
            coff_string_table,
            attribute_certificates,
            export_table,
            import_table,
            delay_load_directory,
            base_relocation_table,
            debug_table,
            resource_directory,
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

    const SECTION_RVA: u32 = 0x1000;
    const SECTION_FILE: usize = 0x200;
    const SYMBOLS: usize = 0x400;
    const CERTIFICATES: usize = 0x438;

    /// File offset of an RVA inside the only section
    fn at(rva: u32) -> usize {
        SECTION_FILE + (rva - SECTION_RVA) as usize
    }

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    /// PE32 image with one `.rdata` section holding every directory
    fn sample() -> Vec<u8> {
        let directories: [(u32, u32); 16] = [
            (0x1080, 0x60),
            (0x1000, 40),
            (0x1130, 0x80),
            (0, 0),
            (CERTIFICATES as u32, 16),
            (0x10E0, 12),
            (0x10F0, 28),
            (0, 0),
            (0, 0),
            (0, 0),
            (0, 0),
            (0, 0),
            (0, 0),
            (0x11B0, 64),
            (0, 0),
            (0, 0),
        ];

        let mut b = stub(0x40)
            .bytes(&PE_SIGNATURE)
            .u16le(0x14C)
            .u16le(1)
            .u32le(0)
            .u32le(SYMBOLS as u32)
            .u32le(2)
            .u16le(224)
            .u16le(0x0102)
            // Optional header
            .u16le(PE32_MAGIC)
            .u8(14)
            .u8(0)
            .u32le(0x200)
            .u32le(0x200)
            .u32le(0)
            .u32le(0x2000)
            .u32le(0x2000)
            .u32le(0x1000)
            .u32le(0x0040_0000)
            .u32le(0x1000)
            .u32le(0x200)
            .u16le(6)
            .u16le(0)
            .u16le(0)
            .u16le(0)
            .u16le(6)
            .u16le(0)
            .u32le(0)
            .u32le(0x3000)
            .u32le(0x200)
            .u32le(0)
            .u16le(2)
            .u16le(0)
            .u32le(0x10_0000)
            .u32le(0x1000)
            .u32le(0x10_0000)
            .u32le(0x1000)
            .u32le(0)
            .u32le(16);
        for (address, size) in directories {
            b = b.u32le(address).u32le(size);
        }
        assert_eq!(b.len(), 0x138);

        b = b
            .text(".rdata", 8)
            .u32le(0x200)
            .u32le(SECTION_RVA)
            .u32le(0x200)
            .u32le(SECTION_FILE as u32)
            .zeros(12)
            .u32le(0x4000_0040)
            .pad_to(SECTION_FILE)
            // Import directory and terminator
            .u32le(0x1040)
            .u32le(0)
            .u32le(0)
            .u32le(0x1060)
            .u32le(0x1050)
            .zeros(20)
            .pad_to(at(0x1040))
            .u32le(0x1070)
            .u32le(0x8000_0005)
            .u32le(0)
            .pad_to(at(0x1050))
            .u32le(0x1070)
            .u32le(0x8000_0005)
            .u32le(0)
            .pad_to(at(0x1060))
            .cstr("KERNEL32.dll")
            .pad_to(at(0x1070))
            .u16le(0x10)
            .cstr("ExitProcess")
            // Export directory
            .pad_to(at(0x1080))
            .u32le(0)
            .u32le(0)
            .u16le(0)
            .u16le(0)
            .u32le(0x10C0)
            .u32le(1)
            .u32le(2)
            .u32le(1)
            .u32le(0x10B0)
            .u32le(0x10B8)
            .u32le(0x10BC)
            .pad_to(at(0x10B0))
            .u32le(0x2000)
            .u32le(0x10D0)
            .u32le(0x10CC)
            .u16le(0)
            .pad_to(at(0x10C0))
            .cstr("DEMO.dll")
            .pad_to(at(0x10CC))
            .cstr("Run")
            .cstr("NTDLL.Sleep")
            // Base relocations
            .pad_to(at(0x10E0))
            .u32le(0x1000)
            .u32le(12)
            .u16le(0x3004)
            .u16le(0)
            // Debug directory and its CodeView record
            .pad_to(at(0x10F0))
            .u32le(0)
            .u32le(0)
            .u16le(0)
            .u16le(0)
            .u32le(2)
            .u32le(30)
            .u32le(0x1110)
            .u32le(at(0x1110) as u32)
            .pad_to(at(0x1110))
            .bytes(&RSDS_SIGNATURE)
            .bytes(&[0xAB; 16])
            .u32le(1)
            .cstr("a.pdb");

        // Resource tree: manifest type, named entry, language leaf
        let root = at(0x1130);
        b = b
            .pad_to(root)
            .zeros(12)
            .u16le(0)
            .u16le(1)
            .u32le(RT_MANIFEST)
            .u32le(0x8000_0018)
            .zeros(12)
            .u16le(1)
            .u16le(0)
            .u32le(0x8000_0060)
            .u32le(0x8000_0030)
            .zeros(12)
            .u16le(0)
            .u16le(1)
            .u32le(0x409)
            .u32le(0x48)
            .u32le(0x11A0)
            .u32le(11)
            .u32le(0)
            .u32le(0)
            .pad_to(root + 0x60)
            .u16le(4)
            .bytes(&utf16("DEMO"))
            .pad_to(root + 0x70)
            .bytes(b"<assembly/>")
            // Delay-load descriptor and terminator
            .pad_to(at(0x11B0))
            .u32le(1)
            .u32le(0x1060)
            .zeros(24)
            .zeros(32)
            .pad_to(SECTION_FILE + 0x200);

        // COFF symbols and string table
        b = b
            .pad_to(SYMBOLS)
            .text(".text", 8)
            .u32le(0)
            .u16le(1)
            .u16le(0)
            .u8(3)
            .u8(1)
            .zeros(18)
            .u32le(4 + 10)
            .cstr("long_name")
            // Attribute certificate
            .pad_to(CERTIFICATES)
            .u32le(12)
            .u16le(0x200)
            .u16le(2)
            .bytes(&[1, 2, 3, 4])
            .pad_to(CERTIFICATES + 16);
        b.build()
    }

    #[test]
    fn test_decode_headers_and_sections() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        let header = exe.file_header.as_ref().unwrap();
        assert_eq!(header.machine, 0x14C);
        assert!(!exe.is_pe32_plus());
        let optional = exe.optional_header.as_ref().unwrap();
        assert_eq!(optional.magic(), PE32_MAGIC);
        assert_eq!(optional.image_base(), 0x0040_0000);
        assert_eq!(optional.data_directories().len(), 16);
        assert_eq!(exe.section_table[0].name(), ".rdata");
        assert_eq!(exe.file_offset(0x1010), 0x210);
        assert_eq!(exe.file_offset(0x5000), 0);
    }

    #[test]
    fn test_decode_symbols_and_certificates() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        assert_eq!(exe.coff_symbol_table.len(), 2);
        assert!(matches!(exe.coff_symbol_table[1], SymbolRecord::Auxiliary(_)));
        assert_eq!(
            exe.coff_string_table.get(&4).map(String::as_str),
            Some("long_name")
        );
        assert_eq!(exe.attribute_certificates.len(), 1);
        assert_eq!(exe.attribute_certificates[0].certificate, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_imports_and_exports() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        let imports = exe.import_table.as_ref().unwrap();
        assert_eq!(imports.descriptors.len(), 1);
        let kernel = &imports.descriptors[0];
        assert_eq!(kernel.name.as_deref(), Some("KERNEL32.dll"));
        assert_eq!(
            kernel.lookup_table,
            vec![
                ImportLookupEntry::HintName(0x1070),
                ImportLookupEntry::Ordinal(5)
            ]
        );
        assert_eq!(kernel.address_table, kernel.lookup_table);
        let exit = imports.hint_name_table.get(&0x1070).unwrap();
        assert_eq!(exit.hint, 0x10);
        assert_eq!(exit.name, "ExitProcess");

        let exports = exe.export_table.as_ref().unwrap();
        assert_eq!(exports.name.as_deref(), Some("DEMO.dll"));
        assert_eq!(exports.names, vec!["Run".to_string()]);
        assert_eq!(exports.ordinal_table, vec![0]);
        assert_eq!(
            exports.address_table,
            vec![
                ExportAddress::Export(0x2000),
                ExportAddress::Forwarder {
                    rva: 0x10D0,
                    name: Some("NTDLL.Sleep".to_string())
                }
            ]
        );

        assert_eq!(exe.delay_load_directory.len(), 1);
        assert_eq!(exe.delay_load_directory[0].name_rva, 0x1060);
    }

    #[test]
    fn test_decode_relocations_and_debug() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        let block = &exe.base_relocation_table[0];
        assert_eq!(block.page_rva, 0x1000);
        assert_eq!(
            block.entries[0],
            BaseRelocationEntry {
                relocation_type: 3,
                offset: 4
            }
        );
        assert_eq!(block.entries[1].relocation_type, 0);

        let DebugData::CodeView(codeview) = exe.debug_table[0].data.as_ref().unwrap() else {
            unreachable!("expected a CodeView record");
        };
        assert_eq!(codeview.age, 1);
        assert_eq!(codeview.path, "a.pdb");
    }

    #[test]
    fn test_decode_resource_tree() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        let root = exe.resource_directory.as_ref().unwrap();
        assert_eq!(root.entries[0].name, ResourceName::Id(RT_MANIFEST));
        let Some(ResourceNode::Directory(names)) = &root.entries[0].node else {
            unreachable!("expected a name directory");
        };
        assert_eq!(names.entries[0].name, ResourceName::Name("DEMO".to_string()));
        let Some(ResourceNode::Directory(languages)) = &names.entries[0].node else {
            unreachable!("expected a language directory");
        };
        let Some(ResourceNode::Data(leaf)) = &languages.entries[0].node else {
            unreachable!("expected a data entry");
        };
        assert_eq!(
            leaf.data,
            Some(ResourceData::Manifest("<assembly/>".to_string()))
        );
    }

    #[test]
    fn test_self_referencing_resource_directory_is_dropped() {
        let mut data = sample();
        let entry_target = at(0x1130) + 16 + 4;
        data[entry_target..entry_target + 4].copy_from_slice(&0x8000_0000u32.to_le_bytes());

        let exe = Executable::decode(&data, 0).unwrap();
        let root = exe.resource_directory.as_ref().unwrap();
        assert_eq!(root.entries.len(), 1);
        assert_eq!(root.entries[0].name, ResourceName::Id(RT_MANIFEST));
        assert!(root.entries[0].node.is_none());
    }

    #[test]
    fn test_section_data_at_file_start_is_mapped() {
        let sections = [SectionHeader {
            name: *b".text\0\0\0",
            virtual_size: 0x100,
            virtual_address: SECTION_RVA,
            size_of_raw_data: 0x100,
            pointer_to_raw_data: 0,
            pointer_to_relocations: 0,
            pointer_to_linenumbers: 0,
            number_of_relocations: 0,
            number_of_linenumbers: 0,
            characteristics: 0,
        }];
        let data = [0u8; 0x100];
        let image = Image {
            data: &data,
            file_start: 0,
            sections: &sections,
            limit: 16,
            pe32_plus: false,
        };
        assert_eq!(image.file_offset(SECTION_RVA), Some(0));
        assert_eq!(image.file_offset(SECTION_RVA + 8), Some(8));
        assert_eq!(image.file_offset(0), None);
        assert_eq!(image.file_offset(SECTION_RVA + 0x100), None);
    }

    #[test]
    fn test_resource_depth_ceiling() {
        let options = DecodeOptions::default().with_max_resource_depth(1);
        let exe = Executable::decode_with(&sample(), 0, &options).unwrap();
        let root = exe.resource_directory.as_ref().unwrap();
        let Some(ResourceNode::Directory(names)) = &root.entries[0].node else {
            unreachable!("expected a name directory");
        };
        assert!(names.entries[0].node.is_none());
    }

    #[test]
    fn test_pe32_plus_variant() {
        let mut b = stub(0x40)
            .bytes(&PE_SIGNATURE)
            .u16le(0x8664)
            .u16le(0)
            .u32le(0)
            .u32le(0)
            .u32le(0)
            .u16le(112)
            .u16le(0x22)
            .u16le(PE32_PLUS_MAGIC)
            .zeros(22)
            .u64le(0x1_4000_0000);
        b = b.zeros(112 - 2 - 22 - 8 - 4).u32le(0);
        let exe = Executable::decode(&b.build(), 0).unwrap();
        assert!(exe.is_pe32_plus());
        let optional = exe.optional_header.as_ref().unwrap();
        assert_eq!(optional.image_base(), 0x1_4000_0000);
        assert!(optional.data_directories().is_empty());
        assert!(exe.import_table.is_none());
    }

    #[test]
    fn test_zero_virtual_size_uses_raw_size() {
        let mut data = sample();
        let virtual_size = 0x138 + 8;
        data[virtual_size..virtual_size + 4].copy_from_slice(&0u32.to_le_bytes());
        let exe = Executable::decode(&data, 0).unwrap();
        assert_eq!(exe.file_offset(0x11FF), 0x3FF);
    }

    #[test]
    fn test_print() {
        let exe = Executable::decode(&sample(), 0).unwrap();
        let report = assert_idempotent(&exe);
        assert!(report.starts_with("Portable Executable Information:\n"));
        assert!(report.contains("  Signature: PE\n"));
        assert!(report.contains("Name: KERNEL32.dll"));
        assert!(report.contains("Forwarder: NTDLL.Sleep"));
        assert!(report.contains("PDB path: a.pdb"));
        assert!(report.contains("Manifest: <assembly/>"));
        assert!(report.contains(&format!("GUID: {}", "AB".repeat(16))));
    }

    #[test]
    fn test_print_empty() {
        let report = Executable::default().report();
        assert!(report.contains("No MS-DOS stub header"));
        assert!(report.contains("No COFF file header"));
        assert!(report.contains("No optional header"));
        assert!(report.contains("No section table items"));
        assert!(report.contains("No resource directory table"));
    }

    #[test]
    fn test_truncated() {
        assert_truncation_safe::<Executable>(&sample());
        assert!(Executable::decode(&[], 0).is_err());
    }
}
