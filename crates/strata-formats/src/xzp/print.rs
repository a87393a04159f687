//! XZP report rendering

use super::{DirectoryEntry, File};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("Xbox Package File Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", file.header.as_ref(), |r, header| {
        r.field("Signature", &String::from_utf8_lossy(&header.signature).into_owned());
        r.field("Version", &header.version);
        r.field("Preload directory entry count", &header.preload_directory_entry_count);
        r.field("Directory entry count", &header.directory_entry_count);
        r.field("Preload bytes", &header.preload_bytes);
        r.field("Header length", &header.header_length);
        r.field("Directory item count", &header.directory_item_count);
        r.field("Directory item offset", &header.directory_item_offset);
        r.field("Directory item length", &header.directory_item_length);
    });

    section.table(
        "Directory Entries Information:",
        "No directory entries",
        "Directory Entry",
        &file.directory_entries,
        print_entry,
    );
    section.table(
        "Preload Directory Entries Information:",
        "No preload directory entries",
        "Preload Directory Entry",
        &file.preload_directory_entries,
        print_entry,
    );
    section.table(
        "Preload Directory Mappings Information:",
        "No preload directory mappings",
        "Preload Directory Mapping",
        &file.preload_directory_mappings,
        |r, mapping| {
            r.field("Preload directory entry index", &mapping.preload_directory_entry_index);
        },
    );
    section.table(
        "Directory Items Information:",
        "No directory items",
        "Directory Item",
        &file.directory_items,
        |r, item| {
            r.field("File name CRC", &item.file_name_crc);
            r.field("Name offset", &item.name_offset);
            r.field("Name", &item.name);
            r.field("Time created", &item.time_created);
        },
    );

    section.section("Footer Information:", "No footer", file.footer.as_ref(), |r, footer| {
        r.field("File length", &footer.file_length);
        r.field("Signature", &String::from_utf8_lossy(&footer.signature).into_owned());
    });
}

fn print_entry(report: &mut Report<'_>, entry: &DirectoryEntry) {
    report.field("File name CRC", &entry.file_name_crc);
    report.field("Entry length", &entry.entry_length);
    report.field("Entry offset", &entry.entry_offset);
}
