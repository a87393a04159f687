//! Audio file and playlist report rendering

use super::{AudioFile, AudioHeader, Playlist, TrackStrings};
use crate::printer::Report;

pub(crate) fn print_audio_file(builder: &mut String, file: &AudioFile) {
    let mut report = Report::new(builder);
    report.title("PlayJ Audio File Information:");
    report.blank();
    print_audio_body(&mut report.indented(), file);
}

pub(crate) fn print_playlist(builder: &mut String, playlist: &Playlist) {
    let mut report = Report::new(builder);
    report.title("PlayJ Playlist Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", playlist.header.as_ref(), |r, header| {
        r.field("Track count", &header.track_count);
        r.field("Data", &header.data);
    });
    section.table(
        "Audio Files Information:",
        "No audio files",
        "Audio File",
        &playlist.audio_files,
        print_audio_body,
    );
}

fn print_audio_body(r: &mut Report<'_>, file: &AudioFile) {
    r.section("Header Information:", "No header", file.header.as_ref(), |r, header| {
        match header {
            AudioHeader::V1(header) => {
                r.field("Signature", &header.signature);
                r.field("Version", &header.version);
                r.field("Track ID", &header.track_id);
                r.field("Unknown offset 1", &header.unknown_offset_1);
                r.field("Unknown offset 2", &header.unknown_offset_2);
                r.field("Unknown offset 3", &header.unknown_offset_3);
                r.field("Unknown 1", &header.unknown_1);
                r.field("Unknown 2", &header.unknown_2);
                r.field("Year", &header.year);
            }
            AudioHeader::V2(header) => {
                r.field("Signature", &header.signature);
                r.field("Version", &header.version);
                r.field("Unknown", &header.unknown);
                r.field("Track ID", &header.track_id);
                r.field("Unknown offset 1", &header.unknown_offset_1);
                r.field("Unknown offset 2", &header.unknown_offset_2);
                r.field("Year", &header.year);
                r.field("Track number", &header.track_number);
            }
        }
        print_strings(r, header.strings());
    });

    r.section(
        "Unknown Block 1 Information:",
        "No unknown block 1",
        file.unknown_block_1.as_ref(),
        |r, block| {
            r.field("Length", &block.length);
            r.field("Data", &block.data);
        },
    );

    r.field("Data files count", &file.data_files_count);
    r.table("Data Files Information:", "No data files", "Data File", &file.data_files, |r, entry| {
        r.name("File name", &entry.file_name);
        r.field("Data length", &entry.data_length);
        r.line("Data: [Data file contents not printed]");
    });
}

fn print_strings(r: &mut Report<'_>, strings: &TrackStrings) {
    r.name("Track", &strings.track);
    r.name("Artist", &strings.artist);
    r.name("Album", &strings.album);
    r.name("Writer", &strings.writer);
    r.name("Publisher", &strings.publisher);
    r.name("Label", &strings.label);
    r.name("Comments", &strings.comments);
}
