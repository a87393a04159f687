//! Shared rendering of the cache directory and checksum sections

use super::{ChecksumSection, DirectorySection, Header};
use crate::printer::Report;

pub(crate) fn print_header(report: &mut Report<'_>, header: Option<&Header>) {
    report.section("Header Information:", "No header", header, |r, header| {
        r.field("Dummy 0", &header.dummy0);
        r.field("Major version", &header.major_version);
        r.field("Minor version", &header.minor_version);
        r.field("Cache ID", &header.cache_id);
        r.field("Last version played", &header.last_version_played);
        r.field("Dummy 1", &header.dummy1);
        r.field("Dummy 2", &header.dummy2);
        r.field("File size", &header.file_size);
        r.field("Block size", &header.block_size);
        r.field("Block count", &header.block_count);
        r.field("Dummy 3", &header.dummy3);
    });
}

pub(crate) fn print_directory(report: &mut Report<'_>, directory: &DirectorySection) {
    report.section(
        "Directory Header Information:",
        "No directory header",
        directory.directory_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Cache ID", &header.cache_id);
            r.field("Last version played", &header.last_version_played);
            r.field("Item count", &header.item_count);
            r.field("File count", &header.file_count);
            r.field("Dummy 1", &header.dummy1);
            r.field("Directory size", &header.directory_size);
            r.field("Name size", &header.name_size);
            r.field("Info 1 count", &header.info1_count);
            r.field("Copy count", &header.copy_count);
            r.field("Local count", &header.local_count);
            r.field("Dummy 2", &header.dummy2);
            r.field("Dummy 3", &header.dummy3);
            r.field("Checksum", &header.checksum);
        },
    );

    report.table(
        "Directory Entries Information:",
        "No directory entries",
        "Directory Entry",
        &directory.directory_entries,
        |r, entry| {
            r.field("Name offset", &entry.name_offset);
            r.field("Name", &directory.name(entry));
            r.field("Item size", &entry.item_size);
            r.field("Checksum index", &entry.checksum_index);
            r.field("Directory flags", &entry.directory_flags);
            r.field("Parent index", &entry.parent_index);
            r.field("Next index", &entry.next_index);
            r.field("First index", &entry.first_index);
        },
    );

    let lists = [
        (
            "Directory Info 1 Entries Information:",
            "No directory info 1 entries",
            "Directory Info 1 Entry",
            "Dummy 0",
            &directory.info1_entries,
        ),
        (
            "Directory Info 2 Entries Information:",
            "No directory info 2 entries",
            "Directory Info 2 Entry",
            "Dummy 0",
            &directory.info2_entries,
        ),
        (
            "Directory Copy Entries Information:",
            "No directory copy entries",
            "Directory Copy Entry",
            "Directory index",
            &directory.copy_entries,
        ),
        (
            "Directory Local Entries Information:",
            "No directory local entries",
            "Directory Local Entry",
            "Directory index",
            &directory.local_entries,
        ),
    ];
    for (title, empty, entry, label, values) in lists {
        report.table(title, empty, entry, values, |r, value| r.field(label, value));
    }
}

pub(crate) fn print_checksums(report: &mut Report<'_>, checksums: &ChecksumSection) {
    report.section(
        "Checksum Header Information:",
        "No checksum header",
        checksums.checksum_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Checksum size", &header.checksum_size);
        },
    );

    report.section(
        "Checksum Map Header Information:",
        "No checksum map header",
        checksums.checksum_map_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Dummy 1", &header.dummy1);
            r.field("Item count", &header.item_count);
            r.field("Checksum count", &header.checksum_count);
        },
    );

    report.table(
        "Checksum Map Entries Information:",
        "No checksum map entries",
        "Checksum Map Entry",
        &checksums.checksum_map_entries,
        |r, entry| {
            r.field("Checksum count", &entry.checksum_count);
            r.field("First checksum index", &entry.first_checksum_index);
        },
    );

    report.table(
        "Checksum Entries Information:",
        "No checksum entries",
        "Checksum Entry",
        &checksums.checksum_entries,
        |r, checksum| r.field("Checksum", checksum),
    );
}
