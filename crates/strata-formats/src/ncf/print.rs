//! NCF report rendering

use super::File;
use crate::printer::Report;
use crate::steam_cache::print::{print_checksums, print_directory, print_header};

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("No Cache File Information:");
    report.blank();

    let mut section = report.indented();
    print_header(&mut section, file.header.as_ref());
    print_directory(&mut section, &file.directory);

    section.section(
        "Unknown Header Information:",
        "No unknown header",
        file.unknown_header.as_ref(),
        |r, header| {
            r.field("Dummy 0", &header.dummy0);
            r.field("Dummy 1", &header.dummy1);
        },
    );
    section.table(
        "Unknown Entries Information:",
        "No unknown entries",
        "Unknown Entry",
        &file.unknown_entries,
        |r, value| r.field("Dummy 0", value),
    );

    print_checksums(&mut section, &file.checksums);
}
