//! GCF report rendering

use super::File;
use crate::printer::Report;
use crate::steam_cache::print::{print_checksums, print_directory, print_header};

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("Game Cache File Information:");
    report.blank();

    let mut section = report.indented();
    print_header(&mut section, file.header.as_ref());

    section.section(
        "Block Entry Header Information:",
        "No block entry header",
        file.block_entry_header.as_ref(),
        |r, header| {
            r.field("Block count", &header.block_count);
            r.field("Blocks used", &header.blocks_used);
            r.field("Dummy 0", &header.dummy0);
            r.field("Dummy 1", &header.dummy1);
            r.field("Dummy 2", &header.dummy2);
            r.field("Dummy 3", &header.dummy3);
            r.field("Dummy 4", &header.dummy4);
            r.field("Checksum", &header.checksum);
        },
    );
    section.table(
        "Block Entries Information:",
        "No block entries",
        "Block Entry",
        &file.block_entries,
        |r, entry| {
            r.field("Entry flags", &entry.entry_flags);
            r.field("File data offset", &entry.file_data_offset);
            r.field("File data size", &entry.file_data_size);
            r.field("First data block index", &entry.first_data_block_index);
            r.field("Next block entry index", &entry.next_block_entry_index);
            r.field("Previous block entry index", &entry.previous_block_entry_index);
            r.field("Directory index", &entry.directory_index);
        },
    );

    section.section(
        "Fragmentation Map Header Information:",
        "No fragmentation map header",
        file.fragmentation_map_header.as_ref(),
        |r, header| {
            r.field("Block count", &header.block_count);
            r.field("First unused entry", &header.first_unused_entry);
            r.field("Terminator", &header.terminator);
            r.field("Checksum", &header.checksum);
        },
    );
    section.table(
        "Fragmentation Maps Information:",
        "No fragmentation maps",
        "Fragmentation Map",
        &file.fragmentation_maps,
        |r, next| r.field("Next data block index", next),
    );

    section.section(
        "Block Entry Map Header Information:",
        "No block entry map header",
        file.block_entry_map_header.as_ref(),
        |r, header| {
            r.field("Block count", &header.block_count);
            r.field("First block entry index", &header.first_block_entry_index);
            r.field("Last block entry index", &header.last_block_entry_index);
            r.field("Dummy 0", &header.dummy0);
            r.field("Checksum", &header.checksum);
        },
    );
    section.table(
        "Block Entry Maps Information:",
        "No block entry maps",
        "Block Entry Map",
        &file.block_entry_maps,
        |r, map| {
            r.field("Previous block entry index", &map.previous_block_entry_index);
            r.field("Next block entry index", &map.next_block_entry_index);
        },
    );

    print_directory(&mut section, &file.directory);

    section.section(
        "Directory Map Header Information:",
        "No directory map header",
        file.directory_map_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Dummy 1", &header.dummy1);
        },
    );
    section.table(
        "Directory Map Entries Information:",
        "No directory map entries",
        "Directory Map Entry",
        &file.directory_map_entries,
        |r, first| r.field("First block index", first),
    );

    print_checksums(&mut section, &file.checksums);

    section.section(
        "Data Block Header Information:",
        "No data block header",
        file.data_block_header.as_ref(),
        |r, header| {
            if let Some(last_version_played) = header.last_version_played {
                r.field("Last version played", &last_version_played);
            }
            r.field("Block count", &header.block_count);
            r.field("Block size", &header.block_size);
            r.field("First block offset", &header.first_block_offset);
            r.field("Blocks used", &header.blocks_used);
            r.field("Checksum", &header.checksum);
        },
    );
}
