//! MS-DOS report rendering

use super::{Executable, Header};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, executable: &Executable) {
    let mut report = Report::new(builder);
    report.title("MS-DOS Executable Information:");
    report.blank();

    let mut section = report.indented();
    section.section(
        "Header Information:",
        "No header",
        executable.header.as_ref(),
        print_header_fields,
    );

    section.table(
        "Relocation Table Information:",
        "No relocation table items",
        "Relocation Table Entry",
        &executable.relocation_table,
        |r, entry| {
            r.field("Offset", &entry.offset);
            r.field("Segment", &entry.segment);
        },
    );
}

/// Stub header as printed by the NE, LE and PE reports
pub(crate) fn print_stub(report: &mut Report<'_>, stub: Option<&Executable>) {
    report.section(
        "MS-DOS Stub Header Information:",
        "No MS-DOS stub header",
        stub.and_then(|stub| stub.header.as_ref()),
        print_header_fields,
    );
}

fn print_header_fields(report: &mut Report<'_>, header: &Header) {
    report.field("Magic number", &String::from_utf8_lossy(&header.magic).into_owned());
    report.field("Last page bytes", &header.last_page_bytes);
    report.field("Pages", &header.pages);
    report.field("Relocation items", &header.relocation_items);
    report.field("Header paragraph size", &header.header_paragraph_size);
    report.field("Minimum extra paragraphs", &header.minimum_extra_paragraphs);
    report.field("Maximum extra paragraphs", &header.maximum_extra_paragraphs);
    report.field("Initial SS value", &header.initial_ss_value);
    report.field("Initial SP value", &header.initial_sp_value);
    report.field("Checksum", &header.checksum);
    report.field("Initial IP value", &header.initial_ip_value);
    report.field("Initial CS value", &header.initial_cs_value);
    report.field("Relocation table address", &header.relocation_table_addr);
    report.field("Overlay number", &header.overlay_number);
    if let Some(extension) = &header.extension {
        report.field("Reserved words", &extension.reserved1);
        report.field("OEM identifier", &extension.oem_identifier);
        report.field("OEM information", &extension.oem_information);
        report.field("Reserved words", &extension.reserved2);
        report.field("New EXE header address", &extension.new_exe_header_addr);
    }
}
