//! Quantum archive report rendering

use super::Archive;
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, archive: &Archive) {
    let mut report = Report::new(builder);
    report.title("Quantum Archive Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", archive.header.as_ref(), |r, header| {
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Major version", &header.major_version);
        r.field("Minor version", &header.minor_version);
        r.field("File count", &header.file_count);
        r.field("Table size", &header.table_size);
        r.field("Compression flags", &header.compression_flags);
    });

    section.table("File List Information:", "No files", "File", &archive.file_list, |r, file| {
        r.field("File name size", &file.file_name_size);
        r.name("File name", &file.file_name);
        r.field("Comment field size", &file.comment_field_size);
        r.name("Comment", &file.comment_field);
        r.field("Expanded file size", &file.expanded_file_size);
        r.field("File time", &file.file_time);
        r.field("File date", &file.file_date);
        r.field("Unknown", &file.unknown);
    });

    section.field("Compressed data offset", &archive.compressed_data_offset);
}
