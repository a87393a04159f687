//! NE report rendering

use super::{Entry, Executable, INTEGER_ID_FLAG, NameTableEntry, ResourceTable};
use crate::mz::print::print_stub;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, executable: &Executable) {
    let mut report = Report::new(builder);
    report.title("New Executable Information:");
    report.blank();

    let mut section = report.indented();
    print_stub(&mut section, executable.stub.as_ref());

    section.section("Header Information:", "No header", executable.header.as_ref(), |r, h| {
        r.field("Magic number", &String::from_utf8_lossy(&h.magic).into_owned());
        r.field("Linker version", &h.linker_version);
        r.field("Linker revision", &h.linker_revision);
        r.field("Entry table offset", &h.entry_table_offset);
        r.field("Entry table size", &h.entry_table_size);
        r.field("CRC checksum", &h.crc_checksum);
        r.field("Flag word", &h.flag_word);
        r.field("Automatic data segment number", &h.automatic_data_segment_number);
        r.field("Initial heap allocation", &h.initial_heap_alloc);
        r.field("Initial stack allocation", &h.initial_stack_alloc);
        r.field("Initial CS:IP setting", &h.initial_cs_ip_setting);
        r.field("Initial SS:SP setting", &h.initial_ss_sp_setting);
        r.field("File segment count", &h.file_segment_count);
        r.field("Module reference table size", &h.module_reference_table_size);
        r.field("Non-resident name table size", &h.non_resident_name_table_size);
        r.field("Segment table offset", &h.segment_table_offset);
        r.field("Resource table offset", &h.resource_table_offset);
        r.field("Resident name table offset", &h.resident_name_table_offset);
        r.field("Module reference table offset", &h.module_reference_table_offset);
        r.field("Imported names table offset", &h.imported_names_table_offset);
        r.field("Non-resident name table offset", &h.non_resident_names_table_offset);
        r.field("Moveable entries count", &h.movable_entries_count);
        r.field("Segment alignment shift count", &h.segment_alignment_shift_count);
        r.field("Resource entries count", &h.resource_entries_count);
        r.field("Target operating system", &h.target_operating_system);
        r.field("Additional flags", &h.additional_flags);
        r.field("Return thunk offset", &h.return_thunk_offset);
        r.field("Segment reference thunk offset", &h.segment_reference_thunk_offset);
        r.field("Minimum code swap area size", &h.min_code_swap_area_size);
        r.field("Windows SDK revision", &h.windows_sdk_revision);
        r.field("Windows SDK version", &h.windows_sdk_version);
    });

    section.table(
        "Segment Table Information:",
        "No segment table items",
        "Segment Table Entry",
        &executable.segment_table,
        |r, segment| {
            r.field("Offset", &segment.offset);
            r.field("Length", &segment.length);
            r.field("Flag word", &segment.flag_word);
            r.field("Minimum allocation size", &segment.minimum_allocation_size);
        },
    );

    section.section(
        "Resource Table Information:",
        "No resource table",
        executable.resource_table.as_ref(),
        print_resource_table,
    );

    section.table(
        "Resident-Name Table Information:",
        "No resident-name table items",
        "Resident-Name Table Entry",
        &executable.resident_name_table,
        print_name_entry,
    );

    section.table(
        "Module-Reference Table Information:",
        "No module-reference table items",
        "Module-Reference Table Entry",
        &executable.module_reference_table,
        |r, offset| {
            r.field("Offset", offset);
            r.field(
                "Module name",
                &executable.imported_name_table.get(offset).map(String::as_str),
            );
        },
    );

    section.table(
        "Imported-Name Table Information:",
        "No imported-name table items",
        "Imported-Name Table Entry",
        &executable.imported_name_table.iter().collect::<Vec<_>>(),
        |r, (offset, name)| {
            r.field("Offset", *offset);
            r.name("Name", name);
        },
    );

    section.table(
        "Entry Table Information:",
        "No entry table items",
        "Entry Table Bundle",
        &executable.entry_table,
        |r, bundle| {
            r.field("Entry count", &bundle.entry_count);
            r.field("Segment indicator", &bundle.segment_indicator);
            for (index, entry) in bundle.entries.iter().enumerate() {
                r.line(format!("Entry {index}"));
                let mut r = r.indented();
                match entry {
                    Entry::Fixed { flag_word, offset } => {
                        r.line("Type: Fixed");
                        r.field("Flag word", flag_word);
                        r.field("Offset", offset);
                    }
                    Entry::Movable {
                        flag_word,
                        int3f,
                        segment_number,
                        offset,
                    } => {
                        r.line("Type: Movable");
                        r.field("Flag word", flag_word);
                        r.field("Reserved", int3f);
                        r.field("Segment number", segment_number);
                        r.field("Offset", offset);
                    }
                }
            }
        },
    );

    section.table(
        "Nonresident-Name Table Information:",
        "No nonresident-name table items",
        "Nonresident-Name Table Entry",
        &executable.non_resident_name_table,
        print_name_entry,
    );
}

fn print_resource_table(report: &mut Report<'_>, table: &ResourceTable) {
    let name = |id: u16| {
        if id & INTEGER_ID_FLAG == 0 {
            table.name(id)
        } else {
            None
        }
    };
    report.field("Alignment shift count", &table.alignment_shift_count);
    if table.resource_types.is_empty() {
        report.line("No resource table items");
    }
    for (index, entry) in table.resource_types.iter().enumerate() {
        report.line(format!("Resource Table Entry {index}"));
        let mut r = report.indented();
        r.field("Type ID", &entry.type_id);
        r.field("Type name", &name(entry.type_id));
        r.field("Resource count", &entry.resource_count);
        r.field("Reserved", &entry.reserved);
        for (index, resource) in entry.resources.iter().enumerate() {
            r.line(format!("Resource {index}"));
            let mut r = r.indented();
            r.field("Offset", &resource.offset);
            r.field("Length", &resource.length);
            r.field("Flag word", &resource.flag_word);
            r.field("Resource ID", &resource.resource_id);
            r.field("Resource name", &name(resource.resource_id));
            r.field("Reserved", &resource.reserved);
        }
    }
}

fn print_name_entry(report: &mut Report<'_>, entry: &NameTableEntry) {
    report.field("Length", &entry.length);
    report.name("Name string", &entry.name);
    report.field("Ordinal number", &entry.ordinal_number);
}
