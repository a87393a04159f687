//! LE/LX report rendering

use super::{
    BundleKind, DirectiveData, Entry, Executable, FixupRecord, FixupSource, FixupTarget,
    InformationBlock, ObjectPageMapEntry,
};
use crate::mz::print::print_stub;
use crate::ne::NameTableEntry;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, executable: &Executable) {
    let mut report = Report::new(builder);
    report.title("Linear Executable Information:");
    report.blank();

    let mut section = report.indented();
    print_stub(&mut section, executable.stub.as_ref());
    section.section(
        "Information Block Information:",
        "No information block",
        executable.header.as_ref(),
        print_information_block,
    );

    section.table(
        "Object Table Information:",
        "No object table items",
        "Object Table Entry",
        &executable.object_table,
        |r, object| {
            r.field("Virtual segment size", &object.virtual_segment_size);
            r.field("Relocation base address", &object.relocation_base_address);
            r.field("Object flags", &object.object_flags);
            r.field("Page table index", &object.page_table_index);
            r.field("Page table entries", &object.page_table_entries);
            r.field("Reserved", &object.reserved);
        },
    );

    section.table(
        "Object Page Map Information:",
        "No object page map items",
        "Object Page Map Entry",
        &executable.object_page_map,
        |r, entry| match entry {
            ObjectPageMapEntry::Le { page_number, flags } => {
                r.field("Page number", page_number);
                r.field("Flags", flags);
            }
            ObjectPageMapEntry::Lx {
                page_data_offset,
                data_size,
                flags,
            } => {
                r.field("Page data offset", page_data_offset);
                r.field("Data size", data_size);
                r.field("Flags", flags);
            }
        },
    );

    section.table(
        "Resource Table Information:",
        "No resource table items",
        "Resource Table Entry",
        &executable.resource_table,
        |r, resource| {
            r.field("Type ID", &resource.type_id);
            r.field("Name ID", &resource.name_id);
            r.field("Resource size", &resource.resource_size);
            r.field("Object number", &resource.object_number);
            r.field("Offset", &resource.offset);
        },
    );

    section.table(
        "Resident Names Table Information:",
        "No resident names table items",
        "Resident Names Table Entry",
        &executable.resident_names_table,
        print_name_entry,
    );

    section.table(
        "Entry Table Information:",
        "No entry table items",
        "Entry Table Entry",
        &executable.entry_table,
        |r, bundle| {
            r.field("Entries", &bundle.entries);
            r.field("Bundle type", &bundle.bundle_type);
            match &bundle.kind {
                BundleKind::Unused => r.line("Type: Unused"),
                BundleKind::Entries {
                    object_number,
                    entries,
                } => {
                    r.field("Object number", object_number);
                    for (index, entry) in entries.iter().enumerate() {
                        r.line(format!("Entry {index}"));
                        print_entry(&mut r.indented(), entry);
                    }
                }
            }
        },
    );

    section.table(
        "Module Format Directives Table Information:",
        "No module format directives table items",
        "Module Format Directives Table Entry",
        &executable.module_directives,
        |r, directive| {
            r.field("Directive number", &directive.directive_number);
            r.field("Directive data length", &directive.directive_data_length);
            r.field("Directive data offset", &directive.directive_data_offset);
            match &directive.data {
                DirectiveData::VerifyRecord {
                    entry_count,
                    entries,
                } => {
                    r.field("Verify record entry count", entry_count);
                    for (index, entry) in entries.iter().enumerate() {
                        r.line(format!("Verify Record Entry {index}"));
                        let mut r = r.indented();
                        r.field("Ordinal index", &entry.ordinal_index);
                        r.field("Version", &entry.version);
                        r.field("Object entries count", &entry.object_entries_count);
                        r.field("Object number in module", &entry.object_number_in_module);
                        r.field("Object load base address", &entry.object_load_base_address);
                        r.field("Object virtual address size", &entry.object_virtual_address_size);
                    }
                }
                DirectiveData::Unparsed => r.line("Directive data not parsed yet"),
            }
        },
    );

    section.table(
        "Per-Page Checksum Table Information:",
        "No per-page checksum table items",
        "Per-Page Checksum Table Entry",
        &executable.per_page_checksums,
        |r, checksum| r.field("Checksum", checksum),
    );

    section.table(
        "Fix-up Page Table Information:",
        "No fix-up page table items",
        "Fix-up Page Table Entry",
        &executable.fixup_page_table,
        |r, offset| r.field("Offset", offset),
    );

    section.table(
        "Fix-up Record Table Information:",
        "No fixup record table items",
        "Fix-up Page",
        &executable.fixup_record_table,
        |r, page| {
            if page.records.is_empty() {
                r.line("No fix-up records");
            }
            for (index, record) in page.records.iter().enumerate() {
                r.line(format!("Fix-up Record {index}"));
                print_fixup(&mut r.indented(), record);
            }
        },
    );

    section.table(
        "Import Module Name Table Information:",
        "No import module name table items",
        "Import Module Name Table Entry",
        &executable.imported_module_names,
        |r, name| r.name("Name", name),
    );

    section.table(
        "Import Procedure Name Table Information:",
        "No import procedure name table items",
        "Import Procedure Name Table Entry",
        &executable.import_procedure_names.iter().collect::<Vec<_>>(),
        |r, (offset, name)| {
            r.field("Offset", *offset);
            r.name("Procedure name", name);
        },
    );

    section.table(
        "Non-Resident Names Table Information:",
        "No non-resident names table items",
        "Non-Resident Names Table Entry",
        &executable.non_resident_names_table,
        print_name_entry,
    );

    section.section(
        "Debug Information:",
        "No debug information",
        executable.debug_information.as_ref(),
        |r, debug| {
            r.field("Signature", &debug.signature);
            r.field("Format type", &debug.format_type);
            r.field("Debugger data length", &(debug.debugger_data.len() as u64));
        },
    );
}

fn print_information_block(r: &mut Report<'_>, h: &InformationBlock) {
    r.field("Signature", &String::from_utf8_lossy(&h.signature).into_owned());
    r.field("Byte order", &h.byte_order);
    r.field("Word order", &h.word_order);
    r.field("Executable format level", &h.executable_format_level);
    r.field("CPU type", &h.cpu_type);
    r.field("Module OS", &h.module_os);
    r.field("Module version", &h.module_version);
    r.field("Module type flags", &h.module_type_flags);
    r.field("Module number pages", &h.module_number_pages);
    r.field("Initial object CS", &h.initial_object_cs);
    r.field("Initial EIP", &h.initial_eip);
    r.field("Initial object SS", &h.initial_object_ss);
    r.field("Initial ESP", &h.initial_esp);
    r.field("Memory page size", &h.memory_page_size);
    if h.is_lx() {
        r.field("Page offset shift", &h.bytes_on_last_page);
    } else {
        r.field("Bytes on last page", &h.bytes_on_last_page);
    }
    r.field("Fix-up section size", &h.fixup_section_size);
    r.field("Fix-up section checksum", &h.fixup_section_checksum);
    r.field("Loader section size", &h.loader_section_size);
    r.field("Loader section checksum", &h.loader_section_checksum);
    r.field("Object table offset", &h.object_table_offset);
    r.field("Object table count", &h.object_table_count);
    r.field("Object page map offset", &h.object_page_map_offset);
    r.field("Object iterate data map offset", &h.object_iterate_data_map_offset);
    r.field("Resource table offset", &h.resource_table_offset);
    r.field("Resource table count", &h.resource_table_count);
    r.field("Resident names table offset", &h.resident_names_table_offset);
    r.field("Entry table offset", &h.entry_table_offset);
    r.field("Module directives table offset", &h.module_directives_table_offset);
    r.field("Module directives count", &h.module_directives_count);
    r.field("Fix-up page table offset", &h.fixup_page_table_offset);
    r.field("Fix-up record table offset", &h.fixup_record_table_offset);
    r.field("Imported modules name table offset", &h.imported_modules_name_table_offset);
    r.field("Imported modules count", &h.imported_modules_count);
    r.field("Import procedure name table offset", &h.import_procedure_name_table_offset);
    r.field("Per-page checksum table offset", &h.per_page_checksum_table_offset);
    r.field("Data pages offset", &h.data_pages_offset);
    r.field("Preload page count", &h.preload_page_count);
    r.field("Non-resident names table offset", &h.non_resident_names_table_offset);
    r.field("Non-resident names table length", &h.non_resident_names_table_length);
    r.field("Non-resident names table checksum", &h.non_resident_names_table_checksum);
    r.field("Automatic data object", &h.automatic_data_object);
    r.field("Debug information offset", &h.debug_information_offset);
    r.field("Debug information length", &h.debug_information_length);
    r.field("Preload instance pages number", &h.preload_instance_pages_number);
    r.field("Demand instance pages number", &h.demand_instance_pages_number);
    r.field("Extra heap allocation", &h.extra_heap_allocation);
}

fn print_entry(r: &mut Report<'_>, entry: &Entry) {
    match entry {
        Entry::SixteenBit { flags, offset } => {
            r.line("Type: 16-bit");
            r.field("Flags", flags);
            r.field("Offset", offset);
        }
        Entry::CallGate {
            flags,
            offset,
            call_gate_selector,
        } => {
            r.line("Type: 286 call gate");
            r.field("Flags", flags);
            r.field("Offset", offset);
            r.field("Call gate selector", call_gate_selector);
        }
        Entry::ThirtyTwoBit { flags, offset } => {
            r.line("Type: 32-bit");
            r.field("Flags", flags);
            r.field("Offset", offset);
        }
        Entry::Forwarder {
            flags,
            module_ordinal,
            procedure_name_or_ordinal,
        } => {
            r.line("Type: Forwarder");
            r.field("Flags", flags);
            r.field("Module ordinal number", module_ordinal);
            r.field("Procedure name offset / import ordinal", procedure_name_or_ordinal);
        }
    }
}

fn print_fixup(r: &mut Report<'_>, record: &FixupRecord) {
    let (source_type, target_flags, source, target, additive_value) = match record {
        FixupRecord::Decoded {
            source_type,
            target_flags,
            source,
            target,
            additive_value,
        } => (source_type, target_flags, source, target, additive_value),
        FixupRecord::Unknown {
            source_type,
            target_flags,
        } => {
            r.field("Source type", source_type);
            r.field("Target flags", target_flags);
            r.line("Unknown entry format");
            return;
        }
    };

    r.field("Source type", source_type);
    r.field("Target flags", target_flags);
    match source {
        FixupSource::Offset(offset) => r.field("Source offset", offset),
        FixupSource::List { count, .. } => r.field("Source offset list count", count),
    }
    match target {
        FixupTarget::Internal {
            object_number,
            target_offset,
        } => {
            r.field("Target object number", object_number);
            r.field("Target offset", target_offset);
        }
        FixupTarget::ImportedByOrdinal {
            module_ordinal,
            import_ordinal,
        } => {
            r.field("Ordinal index import module name table", module_ordinal);
            r.field("Imported ordinal number", import_ordinal);
        }
        FixupTarget::ImportedByName {
            module_ordinal,
            procedure_name_offset,
        } => {
            r.field("Ordinal index import module name table", module_ordinal);
            r.field("Offset import procedure name table", procedure_name_offset);
        }
        FixupTarget::EntryTable { ordinal_number } => {
            r.field("Ordinal index into entry table", ordinal_number);
        }
    }
    if let Some(additive_value) = additive_value {
        r.field("Additive fixup value", additive_value);
    }
    if let FixupSource::List { offsets, .. } = source {
        r.field("Source offset list", offsets);
    }
}

fn print_name_entry(r: &mut Report<'_>, entry: &NameTableEntry) {
    r.field("Length", &entry.length);
    r.name("Name", &entry.name);
    r.field("Ordinal number", &entry.ordinal_number);
}
