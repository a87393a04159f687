//! Level report rendering

use super::{File, LUMP_NAMES};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, file: &File) {
    let mut report = Report::new(builder);
    report.title("Half-Life Level Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", file.header.as_ref(), |r, header| {
        r.field("Version", &header.version);
    });

    let lumps = file.header.as_ref().map(|h| h.lumps.as_slice()).unwrap_or_default();
    section.title("Lumps Information:");
    if lumps.is_empty() {
        section.line("No lumps");
    }
    for (index, lump) in lumps.iter().enumerate() {
        let name = LUMP_NAMES.get(index).copied().unwrap_or("Unknown");
        section.line(format!("Lump {index} ({name})"));
        let mut entry = section.indented();
        entry.field("Offset", &lump.offset);
        entry.field("Length", &lump.length);
    }
    section.blank();

    section.section(
        "Texture Header Information:",
        "No texture header",
        file.texture_header.as_ref(),
        |r, header| {
            r.field("Texture count", &header.texture_count);
            r.field("Offsets", &header.offsets);
        },
    );

    section.sparse_table("Textures Information:", "No textures", "Texture", &file.textures, |r, texture| {
        r.field("Name", &texture.name);
        r.field("Width", &texture.width);
        r.field("Height", &texture.height);
        r.field("Offsets", &texture.offsets);
    });
}
