//! PFF archive report rendering

use super::Archive;
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, archive: &Archive) {
    let mut report = Report::new(builder);
    report.title("NovaLogic PFF Archive Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", archive.header.as_ref(), |r, header| {
        r.field("Header size", &header.header_size);
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Number of files", &header.number_of_files);
        r.field("File segment size", &header.file_segment_size);
        r.field("File list offset", &header.file_list_offset);
    });

    section.table("Segments Information:", "No segments", "Segment", &archive.segments, |r, segment| {
        r.field("Deleted", &segment.deleted);
        r.field("File location", &segment.file_location);
        r.field("File size", &segment.file_size);
        r.field("Packed date", &segment.packed_date);
        r.name("File name", &segment.file_name);
        r.field("Modified date", &segment.modified_date);
        r.field("Compression level", &segment.compression_level);
    });

    section.section("Footer Information:", "No footer", archive.footer.as_ref(), |r, footer| {
        r.field("System IP", &footer.system_ip);
        r.field("Reserved", &footer.reserved);
        r.field("King tag", &Encoding::Ascii.decode(&footer.king_tag));
    });
}
