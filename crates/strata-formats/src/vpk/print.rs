//! VPK report rendering

use super::File;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("Valve Package Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", file.header.as_ref(), |r, header| {
        r.field("Signature", &header.signature);
        r.field("Version", &header.version);
        r.field("Directory length", &header.directory_length);
    });

    section.section(
        "Extended Header Information:",
        "No extended header",
        file.extended_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Archive hash length", &header.archive_hash_length);
            r.field("Extra length", &header.extra_length);
            r.field("Dummy 1", &header.dummy1);
        },
    );

    section.table(
        "Archive Hashes Information:",
        "No archive hashes",
        "Archive Hash",
        &file.archive_hashes,
        |r, hash| {
            r.field("Archive index", &hash.archive_index);
            r.field("Archive offset", &hash.archive_offset);
            r.field("Length", &hash.length);
            r.field("Hash", &hash.hash);
        },
    );

    section.table(
        "Directory Items Information:",
        "No directory items",
        "Directory Item",
        &file.directory_items,
        |r, item| {
            r.field("Extension", &item.extension);
            r.field("Path", &item.path);
            r.field("Name", &item.name);
            let entry = &item.directory_entry;
            r.field("CRC", &entry.crc);
            r.field("Preload bytes", &entry.preload_bytes);
            r.field("Archive index", &entry.archive_index);
            r.field("Entry offset", &entry.entry_offset);
            r.field("Entry length", &entry.entry_length);
            r.field("Dummy 0", &entry.dummy0);
            r.field("Preload data", &item.preload_data);
        },
    );
}
