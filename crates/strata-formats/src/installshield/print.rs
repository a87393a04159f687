//! InstallShield report rendering

use super::{Cabinet, Component, FileDescriptor, FileGroup, OffsetList, VolumeHeader};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, cabinet: &Cabinet) {
    let mut report = Report::new(builder);
    report.title("InstallShield Cabinet Information:");
    report.blank();

    let mut section = report.indented();
    section.section(
        "Common Header Information:",
        "No common header",
        cabinet.common_header.as_ref(),
        |r, h| {
            r.field("Signature", &String::from_utf8_lossy(&h.signature).into_owned());
            r.field("Encoded version", &h.version);
            r.field("Calculated version", &h.major_version());
            r.field("Volume info", &h.volume_info);
            r.field("Descriptor offset", &h.descriptor_offset);
            r.field("Descriptor size", &h.descriptor_size);
        },
    );

    section.section(
        "Volume Header Information:",
        "No volume header",
        cabinet.volume_header.as_ref(),
        print_volume_header,
    );

    section.section(
        "Descriptor Information:",
        "No descriptor",
        cabinet.descriptor.as_ref(),
        |r, d| {
            r.field("Strings offset", &d.strings_offset);
            r.field("Reserved 0", &d.reserved_0);
            r.field("Component list offset", &d.component_list_offset);
            r.field("File table offset", &d.file_table_offset);
            r.field("Reserved 1", &d.reserved_1);
            r.field("File table size", &d.file_table_size);
            r.field("File table size 2", &d.file_table_size_2);
            r.field("Directory count", &d.directory_count);
            r.field("Reserved 2", &d.reserved_2);
            r.field("Reserved 3", &d.reserved_3);
            r.field("Reserved 4", &d.reserved_4);
            r.field("File count", &d.file_count);
            r.field("File table offset 2", &d.file_table_offset_2);
            r.field("Component table info count", &d.component_table_info_count);
            r.field("Component table offset", &d.component_table_offset);
            r.field("Reserved 5", &d.reserved_5);
            r.field("Reserved 6", &d.reserved_6);
            r.blank();

            r.line("File group offsets:");
            print_offset_heads(&mut r.indented(), &d.file_group_offsets);
            r.blank();
            r.line("Component offsets:");
            print_offset_heads(&mut r.indented(), &d.component_offsets);
            r.blank();

            r.field("Setup types offset", &d.setup_types_offset);
            r.field("Setup table offset", &d.setup_table_offset);
            r.field("Reserved 7", &d.reserved_7);
            r.field("Reserved 8", &d.reserved_8);
        },
    );

    section.table(
        "File Descriptor Offsets:",
        "No file descriptor offsets",
        "File Descriptor Offset",
        &cabinet.file_descriptor_offsets,
        |r, offset| r.field("Offset", offset),
    );

    section.table(
        "Directory Names:",
        "No directory names",
        "Directory Name",
        &cabinet.directory_names,
        |r, name| r.name("Name", name),
    );

    section.table(
        "File Descriptors:",
        "No file descriptors",
        "File Descriptor",
        &cabinet.file_descriptors,
        |r, file| print_file_descriptor(r, cabinet, file),
    );

    let file_group_offsets: Vec<_> = cabinet.file_group_offsets.iter().collect();
    section.table(
        "File Group Offsets:",
        "No file group offsets",
        "File Group Offset",
        &file_group_offsets,
        |r, (offset, list)| print_offset_list(r, **offset, list),
    );
    section.table(
        "File Groups:",
        "No file groups",
        "File Group",
        &cabinet.file_groups,
        print_file_group,
    );

    let component_offsets: Vec<_> = cabinet.component_offsets.iter().collect();
    section.table(
        "Component Offsets:",
        "No component offsets",
        "Component Offset",
        &component_offsets,
        |r, (offset, list)| print_offset_list(r, **offset, list),
    );
    section.table(
        "Components:",
        "No components",
        "Component",
        &cabinet.components,
        print_component,
    );
}

fn print_offset_heads(r: &mut Report<'_>, heads: &[u32]) {
    let present: Vec<_> = heads
        .iter()
        .enumerate()
        .filter(|&(_, &offset)| offset != 0)
        .collect();
    if present.is_empty() {
        r.line("No offsets");
    }
    for (index, offset) in present {
        r.field(&format!("{index}"), offset);
    }
}

fn print_volume_header(r: &mut Report<'_>, header: &VolumeHeader) {
    match header {
        VolumeHeader::V5 {
            data_offset,
            unknown,
            first_file_index,
            last_file_index,
            first_file_offset,
            first_file_size_expanded,
            first_file_size_compressed,
            last_file_offset,
            last_file_size_expanded,
            last_file_size_compressed,
        } => {
            r.field("Data offset", data_offset);
            r.field("Unknown", unknown);
            r.field("First file index", first_file_index);
            r.field("Last file index", last_file_index);
            r.field("First file offset", first_file_offset);
            r.field("First file size expanded", first_file_size_expanded);
            r.field("First file size compressed", first_file_size_compressed);
            r.field("Last file offset", last_file_offset);
            r.field("Last file size expanded", last_file_size_expanded);
            r.field("Last file size compressed", last_file_size_compressed);
        }
        VolumeHeader::V6 {
            data_offset,
            first_file_index,
            last_file_index,
            first_file_offset,
            first_file_size_expanded,
            first_file_size_compressed,
            last_file_offset,
            last_file_size_expanded,
            last_file_size_compressed,
        } => {
            r.field("Data offset", data_offset);
            r.field("First file index", first_file_index);
            r.field("Last file index", last_file_index);
            r.field("First file offset", first_file_offset);
            r.field("First file size expanded", first_file_size_expanded);
            r.field("First file size compressed", first_file_size_compressed);
            r.field("Last file offset", last_file_offset);
            r.field("Last file size expanded", last_file_size_expanded);
            r.field("Last file size compressed", last_file_size_compressed);
        }
    }
}

fn print_file_descriptor(r: &mut Report<'_>, cabinet: &Cabinet, file: &FileDescriptor) {
    r.field("Name offset", &file.name_offset());
    r.field("Name", &cabinet.file_name(file));
    r.field("Directory index", &file.directory_index());
    r.field("Directory name", &cabinet.directory_name(file));
    r.field("Flags", &file.flags());
    r.field("Expanded size", &file.expanded_size());
    r.field("Compressed size", &file.compressed_size());
    r.field("Data offset", &file.data_offset());
    match file {
        FileDescriptor::V5(fd) => {
            r.field("Reserved", &fd.reserved);
            r.field("MD5", &fd.md5);
        }
        FileDescriptor::V6(fd) => {
            r.field("MD5", &fd.md5);
            r.field("Reserved 0", &fd.reserved_0);
            r.field("Reserved 1", &fd.reserved_1);
            r.field("Link previous", &fd.link_previous);
            r.field("Link next", &fd.link_next);
            r.field("Link flags", &fd.link_flags);
            r.field("Volume", &fd.volume);
        }
    }
}

fn print_offset_list(r: &mut Report<'_>, offset: u32, list: &OffsetList) {
    r.field("Offset", &offset);
    r.field("Name offset", &list.name_offset);
    r.name("Name", &list.name);
    r.field("Descriptor offset", &list.descriptor_offset);
    r.field("Next offset", &list.next_offset);
}

fn print_file_group(r: &mut Report<'_>, group: &FileGroup) {
    r.field("Name offset", &group.name_offset);
    r.name("Name", &group.name);
    r.field("Expanded size", &group.expanded_size);
    r.field("Compressed size", &group.compressed_size);
    r.field("Attribute 1", &group.attribute_1);
    r.field("Attribute 2", &group.attribute_2);
    r.field("First file", &group.first_file);
    r.field("Last file", &group.last_file);
    r.field("Unknown offset", &group.unknown_offset);
    r.field("Var 4 offset", &group.var4_offset);
    r.field("Var 1 offset", &group.var1_offset);
    r.field("HTTP location offset", &group.http_location_offset);
    r.field("FTP location offset", &group.ftp_location_offset);
    r.field("Misc offset", &group.misc_offset);
    r.field("Var 2 offset", &group.var2_offset);
    r.field("Target directory offset", &group.target_directory_offset);
}

fn print_component(r: &mut Report<'_>, c: &Component) {
    r.field("Identifier offset", &c.identifier_offset);
    r.name("Identifier", &c.identifier);
    r.field("Descriptor offset", &c.descriptor_offset);
    r.field("Display name offset", &c.display_name_offset);
    r.field("Display name", &c.display_name);
    r.field("Status", &c.status);
    r.field("Password offset", &c.password_offset);
    r.field("Misc offset", &c.misc_offset);
    r.field("Component index", &c.component_index);
    r.field("Name offset", &c.name_offset);
    r.field("Name", &c.name);
    r.field("CD-ROM folder offset", &c.cd_rom_folder_offset);
    r.field("HTTP location offset", &c.http_location_offset);
    r.field("FTP location offset", &c.ftp_location_offset);
    r.field("GUID", &c.guid);
    r.field("CLSID offset", &c.clsid_offset);
    r.field("Reserved", &c.reserved);
    r.field("Depends count", &c.depends_count);
    r.field("Depends offset", &c.depends_offset);
    r.field("File group count", &c.file_group_count);
    r.field("File group names offset", &c.file_group_names_offset);
    r.table(
        "File group names:",
        "No file group names",
        "File Group Name",
        &c.file_group_names,
        |r, name| r.name("Name", name),
    );
    r.field("X3 count", &c.x3_count);
    r.field("X3 offset", &c.x3_offset);
    r.field("Sub-components count", &c.sub_components_count);
    r.field("Sub-components offset", &c.sub_components_offset);
    r.field("Next component offset", &c.next_component_offset);
    r.field("On installing offset", &c.on_installing_offset);
    r.field("On installed offset", &c.on_installed_offset);
    r.field("On uninstalling offset", &c.on_uninstalling_offset);
    r.field("On uninstalled offset", &c.on_uninstalled_offset);
}
