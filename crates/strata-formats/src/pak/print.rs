//! Half-Life package report rendering

use super::Package;
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, package: &Package) {
    let mut report = Report::new(builder);
    report.title("Half-Life Package Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", package.header.as_ref(), |r, header| {
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Directory offset", &header.directory_offset);
        r.field("Directory length", &header.directory_length);
    });

    section.table(
        "Directory Items Information:",
        "No directory items",
        "Directory Item",
        &package.directory_items,
        |r, item| {
            r.field("Item name", &item.item_name);
            r.field("Item offset", &item.item_offset);
            r.field("Item length", &item.item_length);
        },
    );
}
