//! SGA report rendering

use super::{Archive, FileEntry, HeaderVersion};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, archive: &Archive) {
    let mut report = Report::new(builder);
    report.title("SGA Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", archive.header.as_ref(), |r, header| {
        r.field("Signature", &String::from_utf8_lossy(&header.signature).into_owned());
        r.field("Major version", &header.major_version);
        r.field("Minor version", &header.minor_version);
        match &header.version {
            HeaderVersion::V4 {
                file_md5,
                name,
                header_md5,
                header_length,
                file_data_offset,
                dummy0,
            } => {
                r.field("File MD5", file_md5);
                r.field("Name", name);
                r.field("Header MD5", header_md5);
                r.field("Header length", header_length);
                r.field("File data offset", file_data_offset);
                r.field("Dummy 0", dummy0);
            }
            HeaderVersion::V6 {
                name,
                header_length,
                file_data_offset,
                dummy0,
            } => {
                r.field("Name", name);
                r.field("Header length", header_length);
                r.field("File data offset", file_data_offset);
                r.field("Dummy 0", dummy0);
            }
        }
    });

    section.section(
        "Directory Header Information:",
        "No directory header",
        archive.directory_header.as_ref(),
        |r, directory| {
            r.field("Section offset", &directory.section_offset);
            r.field("Section count", &directory.section_count);
            r.field("Folder offset", &directory.folder_offset);
            r.field("Folder count", &directory.folder_count);
            r.field("File offset", &directory.file_offset);
            r.field("File count", &directory.file_count);
            r.field("String table offset", &directory.string_table_offset);
            r.field("String table count", &directory.string_table_count);
        },
    );

    section.table("Sections Information:", "No sections", "Section", &archive.sections, |r, s| {
        r.field("Alias", &s.alias);
        r.field("Name", &s.name);
        r.field("Folder start index", &s.folder_start_index);
        r.field("Folder end index", &s.folder_end_index);
        r.field("File start index", &s.file_start_index);
        r.field("File end index", &s.file_end_index);
        r.field("Folder root index", &s.folder_root_index);
    });

    section.table("Folders Information:", "No folders", "Folder", &archive.folders, |r, folder| {
        r.field("Name offset", &folder.name_offset);
        r.field("Name", &archive.name(folder.name_offset));
        r.field("Folder start index", &folder.folder_start_index);
        r.field("Folder end index", &folder.folder_end_index);
        r.field("File start index", &folder.file_start_index);
        r.field("File end index", &folder.file_end_index);
    });

    section.table("Files Information:", "No files", "File", &archive.files, |r, file| {
        let common = file.common();
        r.field("Name offset", &common.name_offset);
        r.field("Name", &archive.name(common.name_offset));
        r.field("Offset", &common.offset);
        r.field("Size on disk", &common.size_on_disk);
        r.field("Size", &common.size);
        r.field("Time modified", &common.time_modified);
        r.field("Dummy 0", &common.dummy0);
        r.field("File type", &common.file_type);
        match file {
            FileEntry::V4(_) => {}
            FileEntry::V6 { crc32, .. } => r.field("CRC32", crc32),
            FileEntry::V7 {
                crc32, hash_offset, ..
            } => {
                r.field("CRC32", crc32);
                r.field("Hash offset", hash_offset);
            }
        }
    });

    section.table(
        "String Table Information:",
        "No string table items",
        "String Table Entry",
        &archive.string_table.iter().collect::<Vec<_>>(),
        |r, (offset, name)| {
            r.field("Offset", *offset);
            r.field("Name", *name);
        },
    );
}
