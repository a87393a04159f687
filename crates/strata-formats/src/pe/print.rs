//! PE report rendering

use super::{
    DebugData, Executable, ExportAddress, ImportLookupEntry, OptionalHeader, ResourceData,
    ResourceDirectoryTable, ResourceName, ResourceNode, SymbolName, SymbolRecord,
};
use crate::mz::print::print_stub;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, executable: &Executable) {
    let mut report = Report::new(builder);
    report.title("Portable Executable Information:");
    report.blank();

    let mut section = report.indented();
    print_stub(&mut section, executable.stub.as_ref());

    section.section(
        "COFF File Header Information:",
        "No COFF file header",
        executable.file_header.as_ref(),
        |r, h| {
            r.field("Signature", &String::from_utf8_lossy(&h.signature[..2]).into_owned());
            r.field("Machine", &h.machine);
            r.field("Number of sections", &h.number_of_sections);
            r.field("Time/Date stamp", &h.time_date_stamp);
            r.field("Pointer to symbol table", &h.pointer_to_symbol_table);
            r.field("Number of symbols", &h.number_of_symbols);
            r.field("Size of optional header", &h.size_of_optional_header);
            r.field("Characteristics", &h.characteristics);
        },
    );

    section.section(
        "Optional Header Information:",
        "No optional header",
        executable.optional_header.as_ref(),
        print_optional_header,
    );

    section.table(
        "Section Table Information:",
        "No section table items",
        "Section Table Entry",
        &executable.section_table,
        |r, s| {
            r.name("Name", &s.name());
            r.field("Virtual size", &s.virtual_size);
            r.field("Virtual address", &s.virtual_address);
            r.field("Physical address", &executable.file_offset(s.virtual_address));
            r.field("Size of raw data", &s.size_of_raw_data);
            r.field("Pointer to raw data", &s.pointer_to_raw_data);
            r.field("Pointer to relocations", &s.pointer_to_relocations);
            r.field("Pointer to linenumbers", &s.pointer_to_linenumbers);
            r.field("Number of relocations", &s.number_of_relocations);
            r.field("Number of linenumbers", &s.number_of_linenumbers);
            r.field("Characteristics", &s.characteristics);
            // TODO: decode COFF relocations and line numbers
            r.line("COFF Relocations and Line Numbers not parsed yet");
        },
    );

    section.table(
        "COFF Symbol Table Information:",
        "No COFF symbol table items",
        "COFF Symbol Table Entry",
        &executable.coff_symbol_table,
        |r, record| match record {
            SymbolRecord::Standard(symbol) => {
                match symbol.name() {
                    SymbolName::Short(name) => r.name("Short name", &name),
                    SymbolName::Long(offset) => {
                        r.field("Offset", &offset);
                        r.field("Name", &executable.symbol_name(symbol));
                    }
                }
                r.field("Value", &symbol.value);
                r.field("Section number", &symbol.section_number);
                r.field("Symbol type", &symbol.symbol_type);
                r.field("Storage class", &symbol.storage_class);
                r.field("Number of aux symbols", &symbol.number_of_aux_symbols);
            }
            SymbolRecord::Auxiliary(bytes) => {
                r.line("Auxiliary symbol record");
                r.field("Data", bytes);
            }
        },
    );

    section.table(
        "COFF String Table Information:",
        "No COFF string table items",
        "COFF String Table Entry",
        &executable.coff_string_table.iter().collect::<Vec<_>>(),
        |r, (offset, text)| {
            r.field("Offset", *offset);
            r.name("String", text);
        },
    );

    section.table(
        "Attribute Certificate Table Information:",
        "No attribute certificate table items",
        "Attribute Certificate Table Entry",
        &executable.attribute_certificates,
        |r, certificate| {
            r.field("Length", &certificate.length);
            r.field("Revision", &certificate.revision);
            r.field("Certificate type", &certificate.certificate_type);
            r.field("Certificate data length", &(certificate.certificate.len() as u64));
        },
    );

    section.section(
        "Export Table Information:",
        "No export table",
        executable.export_table.as_ref(),
        |r, exports| {
            let d = &exports.directory;
            r.field("Export flags", &d.export_flags);
            r.field("Time/Date stamp", &d.time_date_stamp);
            r.field("Major version", &d.major_version);
            r.field("Minor version", &d.minor_version);
            r.field("Name RVA", &d.name_rva);
            r.field("Name", &exports.name.as_deref());
            r.field("Ordinal base", &d.ordinal_base);
            r.field("Address table entries", &d.address_table_entries);
            r.field("Number of name pointers", &d.number_of_name_pointers);
            r.field("Export address table RVA", &d.export_address_table_rva);
            r.field("Name pointer table RVA", &d.name_pointer_rva);
            r.field("Ordinal table RVA", &d.ordinal_table_rva);
            r.blank();

            r.table(
                "Export Address Table Information:",
                "No export address table items",
                "Export Address Table Entry",
                &exports.address_table,
                |r, address| match address {
                    ExportAddress::Export(rva) => r.field("Export RVA", rva),
                    ExportAddress::Forwarder { rva, name } => {
                        r.field("Forwarder RVA", rva);
                        r.field("Forwarder", &name.as_deref());
                    }
                },
            );
            r.table(
                "Name Pointer Table Information:",
                "No name pointer table items",
                "Name Pointer Table Entry",
                &exports.name_pointer_table,
                |r, pointer| r.field("Pointer", pointer),
            );
            r.table(
                "Ordinal Table Information:",
                "No ordinal table items",
                "Ordinal Table Entry",
                &exports.ordinal_table,
                |r, ordinal| r.field("Ordinal", ordinal),
            );
            r.table(
                "Export Name Table Information:",
                "No export name table items",
                "Export Name Table Entry",
                &exports.names,
                |r, name| r.name("Name", name),
            );
        },
    );

    section.section(
        "Import Table Information:",
        "No import table",
        executable.import_table.as_ref(),
        |r, imports| {
            r.table(
                "Import Directory Table Information:",
                "No import directory table items",
                "Import Directory Table Entry",
                &imports.descriptors,
                |r, descriptor| {
                    let e = &descriptor.entry;
                    r.field("Import lookup table RVA", &e.import_lookup_table_rva);
                    r.field("Time/Date stamp", &e.time_date_stamp);
                    r.field("Forwarder chain", &e.forwarder_chain);
                    r.field("Name RVA", &e.name_rva);
                    r.field("Name", &descriptor.name.as_deref());
                    r.field("Import address table RVA", &e.import_address_table_rva);
                    print_lookup_table(r, "Import Lookup Table", &descriptor.lookup_table);
                    print_lookup_table(r, "Import Address Table", &descriptor.address_table);
                },
            );
            r.table(
                "Hint/Name Table Information:",
                "No hint/name table items",
                "Hint/Name Table Entry",
                &imports.hint_name_table.iter().collect::<Vec<_>>(),
                |r, (rva, entry)| {
                    r.field("RVA", *rva);
                    r.field("Hint", &entry.hint);
                    r.name("Name", &entry.name);
                },
            );
        },
    );

    section.table(
        "Delay-Load Directory Table Information:",
        "No delay-load directory table items",
        "Delay-Load Directory Table Entry",
        &executable.delay_load_directory,
        |r, entry| {
            r.field("Attributes", &entry.attributes);
            r.field("Name RVA", &entry.name_rva);
            r.field("Module handle", &entry.module_handle);
            r.field("Delay import address table", &entry.delay_import_address_table);
            r.field("Delay import name table", &entry.delay_import_name_table);
            r.field("Bound delay import table", &entry.bound_delay_import_table);
            r.field("Unload delay import table", &entry.unload_delay_import_table);
            r.field("Time stamp", &entry.time_stamp);
        },
    );

    section.table(
        "Base Relocation Table Information:",
        "No base relocation table items",
        "Base Relocation Block",
        &executable.base_relocation_table,
        |r, block| {
            r.field("Page RVA", &block.page_rva);
            r.field("Block size", &block.block_size);
            for (index, entry) in block.entries.iter().enumerate() {
                r.line(format!("Type or Offset Entry {index}"));
                let mut r = r.indented();
                r.field("Type", &entry.relocation_type);
                r.field("Offset", &entry.offset);
            }
        },
    );

    section.table(
        "Debug Table Information:",
        "No debug table items",
        "Debug Directory Entry",
        &executable.debug_table,
        |r, debug| {
            let e = &debug.entry;
            r.field("Characteristics", &e.characteristics);
            r.field("Time/Date stamp", &e.time_date_stamp);
            r.field("Major version", &e.major_version);
            r.field("Minor version", &e.minor_version);
            r.field("Debug type", &e.debug_type);
            r.field("Size of data", &e.size_of_data);
            r.field("Address of raw data", &e.address_of_raw_data);
            r.field("Pointer to raw data", &e.pointer_to_raw_data);
            match &debug.data {
                Some(DebugData::CodeView(codeview)) => {
                    r.field("CodeView signature", &String::from_utf8_lossy(&codeview.signature).into_owned());
                    r.field("GUID", &hex::encode_upper(codeview.guid));
                    r.field("Age", &codeview.age);
                    r.name("PDB path", &codeview.path);
                }
                Some(DebugData::Raw(bytes)) => {
                    r.field("Raw data length", &(bytes.len() as u64));
                }
                None => r.line("No debug data"),
            }
        },
    );

    section.section(
        "Resource Directory Table Information:",
        "No resource directory table",
        executable.resource_directory.as_ref(),
        |r, table| print_resource_table(r, table, 0),
    );
}

fn print_optional_header(r: &mut Report<'_>, header: &OptionalHeader) {
    r.field("Magic", &header.magic());
    match header {
        OptionalHeader::Pe32(h) => {
            r.field("Major linker version", &h.major_linker_version);
            r.field("Minor linker version", &h.minor_linker_version);
            r.field("Size of code", &h.size_of_code);
            r.field("Size of initialized data", &h.size_of_initialized_data);
            r.field("Size of uninitialized data", &h.size_of_uninitialized_data);
            r.field("Address of entry point", &h.address_of_entry_point);
            r.field("Base of code", &h.base_of_code);
            r.field("Base of data", &h.base_of_data);
            r.field("Image base", &h.image_base);
            r.field("Section alignment", &h.section_alignment);
            r.field("File alignment", &h.file_alignment);
            r.field("Major operating system version", &h.major_operating_system_version);
            r.field("Minor operating system version", &h.minor_operating_system_version);
            r.field("Major image version", &h.major_image_version);
            r.field("Minor image version", &h.minor_image_version);
            r.field("Major subsystem version", &h.major_subsystem_version);
            r.field("Minor subsystem version", &h.minor_subsystem_version);
            r.field("Win32 version value", &h.win32_version_value);
            r.field("Size of image", &h.size_of_image);
            r.field("Size of headers", &h.size_of_headers);
            r.field("Checksum", &h.checksum);
            r.field("Subsystem", &h.subsystem);
            r.field("DLL characteristics", &h.dll_characteristics);
            r.field("Size of stack reserve", &h.size_of_stack_reserve);
            r.field("Size of stack commit", &h.size_of_stack_commit);
            r.field("Size of heap reserve", &h.size_of_heap_reserve);
            r.field("Size of heap commit", &h.size_of_heap_commit);
            r.field("Loader flags", &h.loader_flags);
            r.field("Number of data-directory entries", &h.number_of_rva_and_sizes);
        }
        OptionalHeader::Pe32Plus(h) => {
            r.field("Major linker version", &h.major_linker_version);
            r.field("Minor linker version", &h.minor_linker_version);
            r.field("Size of code", &h.size_of_code);
            r.field("Size of initialized data", &h.size_of_initialized_data);
            r.field("Size of uninitialized data", &h.size_of_uninitialized_data);
            r.field("Address of entry point", &h.address_of_entry_point);
            r.field("Base of code", &h.base_of_code);
            r.field("Image base", &h.image_base);
            r.field("Section alignment", &h.section_alignment);
            r.field("File alignment", &h.file_alignment);
            r.field("Major operating system version", &h.major_operating_system_version);
            r.field("Minor operating system version", &h.minor_operating_system_version);
            r.field("Major image version", &h.major_image_version);
            r.field("Minor image version", &h.minor_image_version);
            r.field("Major subsystem version", &h.major_subsystem_version);
            r.field("Minor subsystem version", &h.minor_subsystem_version);
            r.field("Win32 version value", &h.win32_version_value);
            r.field("Size of image", &h.size_of_image);
            r.field("Size of headers", &h.size_of_headers);
            r.field("Checksum", &h.checksum);
            r.field("Subsystem", &h.subsystem);
            r.field("DLL characteristics", &h.dll_characteristics);
            r.field("Size of stack reserve", &h.size_of_stack_reserve);
            r.field("Size of stack commit", &h.size_of_stack_commit);
            r.field("Size of heap reserve", &h.size_of_heap_reserve);
            r.field("Size of heap commit", &h.size_of_heap_commit);
            r.field("Loader flags", &h.loader_flags);
            r.field("Number of data-directory entries", &h.number_of_rva_and_sizes);
        }
    }

    for (index, directory) in header.data_directories().iter().enumerate() {
        r.line(format!("Data Directory {index}"));
        let mut r = r.indented();
        r.field("Virtual address", &directory.virtual_address);
        r.field("Size", &directory.size);
    }
}

fn print_lookup_table(r: &mut Report<'_>, title: &str, entries: &[ImportLookupEntry]) {
    if entries.is_empty() {
        r.line(format!("No {} items", title.to_lowercase()));
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        r.line(format!("{title} Entry {index}"));
        let mut r = r.indented();
        match entry {
            ImportLookupEntry::Ordinal(ordinal) => {
                r.line("Ordinal/Name flag: true");
                r.field("Ordinal number", ordinal);
            }
            ImportLookupEntry::HintName(rva) => {
                r.line("Ordinal/Name flag: false");
                r.field("Hint/Name RVA", rva);
            }
        }
    }
}

fn print_resource_table(r: &mut Report<'_>, table: &ResourceDirectoryTable, level: usize) {
    let h = &table.header;
    r.field("Table level", &(level as u64));
    r.field("Characteristics", &h.characteristics);
    r.field("Time/Date stamp", &h.time_date_stamp);
    r.field("Major version", &h.major_version);
    r.field("Minor version", &h.minor_version);
    r.field("Number of name entries", &h.number_of_name_entries);
    r.field("Number of ID entries", &h.number_of_id_entries);
    if table.entries.is_empty() {
        r.line("No resource directory entries");
    }
    for (index, entry) in table.entries.iter().enumerate() {
        r.line(format!("Level {level} Entry {index}"));
        let mut r = r.indented();
        match &entry.name {
            ResourceName::Id(id) => r.field("Integer ID", id),
            ResourceName::Name(name) => r.name("Name", name),
        }
        match &entry.node {
            Some(ResourceNode::Directory(child)) => {
                r.line("Subdirectory");
                print_resource_table(&mut r.indented(), child, level + 1);
            }
            Some(ResourceNode::Data(data)) => {
                r.field("Data RVA", &data.data_rva);
                r.field("Size", &data.size);
                r.field("Codepage", &data.codepage);
                r.field("Reserved", &data.reserved);
                print_resource_data(&mut r, data.data.as_ref());
            }
            None => r.null(),
        }
    }
}

fn print_resource_data(r: &mut Report<'_>, data: Option<&ResourceData>) {
    match data {
        None => r.line("Data: [NULL]"),
        Some(ResourceData::StringTable(strings)) => {
            r.line("String table resource");
            let mut r = r.indented();
            for (index, text) in strings.iter().enumerate() {
                r.name(&format!("String {index}"), text);
            }
        }
        Some(ResourceData::Version(version)) => {
            r.line("Version resource");
            let mut r = r.indented();
            r.field("Length", &version.length);
            r.field("Value length", &version.value_length);
            r.field("Value type", &version.value_type);
            r.name("Key", &version.key);
            match &version.fixed_file_info {
                Some(info) => {
                    r.field("Signature", &info.signature);
                    r.field("Struct version", &info.struct_version);
                    r.field("File version (MS)", &info.file_version_ms);
                    r.field("File version (LS)", &info.file_version_ls);
                    r.field("Product version (MS)", &info.product_version_ms);
                    r.field("Product version (LS)", &info.product_version_ls);
                    r.field("File flags mask", &info.file_flags_mask);
                    r.field("File flags", &info.file_flags);
                    r.field("File OS", &info.file_os);
                    r.field("File type", &info.file_type);
                    r.field("File subtype", &info.file_subtype);
                    r.field("File date (MS)", &info.file_date_ms);
                    r.field("File date (LS)", &info.file_date_ls);
                }
                None => r.line("No fixed file info"),
            }
            r.line("String and variable file info not parsed yet");
        }
        Some(ResourceData::Manifest(text)) => {
            r.line("Manifest resource");
            r.indented().name("Manifest", text);
        }
        Some(ResourceData::Unparsed(bytes)) => {
            r.line("Resource data not parsed yet");
            r.field("Data length", &(bytes.len() as u64));
        }
    }
}
