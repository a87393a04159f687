//! Cabinet report rendering

use super::Cabinet;
use crate::cursor::Encoding;
use crate::printer::{Field, Report};
use binrw::NullString;

pub(crate) fn print(builder: &mut String, cabinet: &Cabinet) {
    let mut report = Report::new(builder);
    report.title("Microsoft Cabinet Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", cabinet.header.as_ref(), |r, header| {
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Reserved 1", &header.reserved_1);
        r.field("Cabinet size", &header.cabinet_size);
        r.field("Reserved 2", &header.reserved_2);
        r.field("Files offset", &header.files_offset);
        r.field("Reserved 3", &header.reserved_3);
        r.field("Minor version", &header.version_minor);
        r.field("Major version", &header.version_major);
        r.field("Folder count", &header.folder_count);
        r.field("File count", &header.file_count);
        r.field("Flags", &header.flags);
        r.field("Set ID", &header.set_id);
        r.field("Cabinet index", &header.cabinet_index);
        r.field("Header reserved size", &header.header_reserved_size);
        r.field("Folder reserved size", &header.folder_reserved_size);
        r.field("Data reserved size", &header.data_reserved_size);
        r.field("Reserved data", &header.reserved_data);
        r.field("Previous cabinet", &text(header.cabinet_prev.as_ref()));
        r.field("Previous disk", &text(header.disk_prev.as_ref()));
        r.field("Next cabinet", &text(header.cabinet_next.as_ref()));
        r.field("Next disk", &text(header.disk_next.as_ref()));
    });

    section.table("Folders Information:", "No folders", "Folder", &cabinet.folders, |r, folder| {
        r.field("Data offset", &folder.data_offset);
        r.field("Data count", &folder.data_count);
        r.line(format!(
            "Compression type: {} ({})",
            folder.compression_type.render(),
            folder.compression_name()
        ));
        r.field("Reserved data", &folder.reserved_data);
        r.table(
            "Data Blocks Information:",
            "No data blocks",
            "Data Block",
            &folder.data_blocks,
            |r, block| {
                r.field("Checksum", &block.checksum);
                r.field("Compressed size", &block.compressed_size);
                r.field("Uncompressed size", &block.uncompressed_size);
                r.field("Reserved data", &block.reserved_data);
                r.field("Compressed data offset", &block.compressed_data_offset);
            },
        );
    });

    section.table("Files Information:", "No files", "File", &cabinet.files, |r, file| {
        r.field("File size", &file.file_size);
        r.field("Folder start offset", &file.folder_start_offset);
        r.field("Folder index", &file.folder_index);
        r.field("Date", &file.date);
        r.field("Time", &file.time);
        r.field("Attributes", &file.attributes);
        r.name("Name", &file.name);
    });
}

fn text(value: Option<&NullString>) -> Option<String> {
    value.map(ToString::to_string)
}
