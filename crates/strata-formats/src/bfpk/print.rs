//! BFPK report rendering

use super::{Archive, FileEntry, Header};
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, archive: &Archive) {
    let mut report = Report::new(builder);
    report.title("BFPK Information:");
    report.blank();

    let mut section = report.indented();
    print_header(&mut section, archive.header.as_ref());
    print_files(&mut section, &archive.files);
}

fn print_header(report: &mut Report<'_>, header: Option<&Header>) {
    report.section("Header Information:", "No header", header, |r, header| {
        r.field("Magic", &Encoding::Ascii.decode(&header.magic));
        r.field("Version", &header.version);
        r.field("Files", &header.files);
    });
}

fn print_files(report: &mut Report<'_>, files: &[FileEntry]) {
    report.table(
        "File Table Information:",
        "No file table items",
        "File Table Entry",
        files,
        |r, entry| {
            r.field("Name size", &entry.name_size);
            r.field("Name", &entry.name);
            r.field("Uncompressed size", &entry.uncompressed_size);
            r.field("Offset", &entry.offset);
            r.field("Compressed size", &entry.compressed_size);
        },
    );
}
