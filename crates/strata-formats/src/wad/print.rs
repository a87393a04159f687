//! Texture package report rendering

use super::File;
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("Half-Life Texture Package Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", file.header.as_ref(), |r, header| {
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Lump count", &header.lump_count);
        r.field("Lump offset", &header.lump_offset);
    });

    section.table("Lumps Information:", "No lumps", "Lump", &file.lumps, |r, lump| {
        r.field("Offset", &lump.offset);
        r.field("Disk length", &lump.disk_length);
        r.field("Length", &lump.length);
        r.field("Type", &lump.lump_type);
        r.field("Compression", &lump.compression);
        r.field("Padding 0", &lump.padding0);
        r.field("Padding 1", &lump.padding1);
        r.field("Name", &lump.name);
    });

    section.sparse_table(
        "Lump Infos Information:",
        "No lump infos",
        "Lump Info",
        &file.lump_infos,
        |r, info| {
            r.field("Name", &info.name);
            r.field("Width", &info.width);
            r.field("Height", &info.height);
            r.field("Mipmap offsets", &info.mip_offsets);
            // TODO: decode the palette that follows the last mip level
            r.line("Pixel data: [not printed]");
        },
    );
}
