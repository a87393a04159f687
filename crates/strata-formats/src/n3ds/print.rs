//! 3DS report rendering
//!
//! The partition printer is shared with CIA content partitions.

use super::{
    AccessControlInfo, Cart, CodeSetInfo, ExeFsHeader, ExtendedHeader, NcchHeader, Partition,
    RomFsHeader, RomFsLevel,
};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, cart: &Cart) {
    let mut report = Report::new(builder);
    report.title("3DS Cart Information:");
    report.blank();

    let mut section = report.indented();
    section.section("NCSD Header Information:", "No NCSD header", cart.header.as_ref(), |r, h| {
        r.field("RSA-2048 SHA-256 signature", &h.rsa_2048_signature);
        r.field("Magic number", &String::from_utf8_lossy(&h.magic).into_owned());
        r.field("Image size in media units", &h.image_size_in_media_units);
        r.field("Media ID", &h.media_id);
        r.field("Partitions filesystem type", &h.partitions_fs_type);
        r.field("Partitions crypt type", &h.partitions_crypt_type);
        r.blank();

        r.table(
            "Partition table:",
            "No partition table entries",
            "Partition table entry",
            &h.partitions_table,
            |r, entry| {
                r.field("Offset", &entry.offset);
                r.field("Length", &entry.length);
            },
        );

        r.field("Extended header SHA-256 hash", &h.extended_header_sha256_hash);
        r.field("Additional header size", &h.additional_header_size);
        r.field("Sector zero offset", &h.sector_zero_offset);
        r.field("Partition flags", &h.partition_flags);
        r.field("Partition ID table", &h.partition_id_table);
        r.field("Firmware update byte 1", &h.firmware_update_byte_1);
        r.field("Firmware update byte 2", &h.firmware_update_byte_2);
    });

    section.section(
        "Card Info Header Information:",
        "No card info header",
        cart.card_info_header.as_ref(),
        |r, h| {
            r.field("Writable address in media units", &h.writable_address_media_units);
            r.field("Card info bitmask", &h.card_info_bitmask);
            r.field("Filled size", &h.filled_size);
            r.field("Title version", &h.title_version);
            r.field("Card revision", &h.card_revision);
            r.field("Card seed KeyY", &h.card_seed_key_y);
            r.field("Encrypted card seed", &h.encrypted_card_seed);
            r.field("Card seed AES-MAC", &h.card_seed_aes_mac);
            r.field("Card seed nonce", &h.card_seed_nonce);
            r.field("Backup header", &h.backup_header);
        },
    );

    section.section(
        "Development Card Info Header Information:",
        "No development card info header",
        cart.development_card_info_header.as_ref(),
        |r, h| {
            r.field("Card device reserved 1", &h.card_device_reserved_1);
            r.field("Title key", &h.title_key);
            r.field("Card device reserved 2", &h.card_device_reserved_2);
            r.field("Test data", &h.test_data);
        },
    );

    print_partitions(&mut section, &cart.partitions);
}

/// Partition table shared by carts and CIA contents
pub(crate) fn print_partitions(report: &mut Report<'_>, partitions: &[Option<Partition>]) {
    report.sparse_table(
        "Partitions Information:",
        "No partitions",
        "Partition",
        partitions,
        print_partition,
    );
}

fn print_partition(report: &mut Report<'_>, partition: &Partition) {
    match partition {
        Partition::Empty => report.line("Empty partition, no data can be parsed"),
        Partition::Unrecognized => report.line("Unrecognized partition data, no data can be parsed"),
        Partition::Ncch(ncch) => {
            print_ncch_header(report, &ncch.header);
            report.blank();
            report.section(
                "Extended Header Information:",
                "No extended header",
                ncch.extended_header.as_ref(),
                print_extended_header,
            );
            report.section(
                "ExeFS Header Information:",
                "No ExeFS header",
                ncch.exefs_header.as_ref(),
                print_exefs_header,
            );
            report.section(
                "RomFS Header Information:",
                "No RomFS header",
                ncch.romfs_header.as_ref(),
                print_romfs_header,
            );
        }
    }
}

fn print_ncch_header(r: &mut Report<'_>, h: &NcchHeader) {
    r.field("RSA-2048 SHA-256 signature", &h.rsa_2048_signature);
    r.field("Magic number", &String::from_utf8_lossy(&h.magic).into_owned());
    r.field("Content size in media units", &h.content_size_in_media_units);
    r.field("Partition ID", &h.partition_id);
    r.field("Maker code", &h.maker_code);
    r.field("Version", &h.version);
    r.field("Verification hash", &h.verification_hash);
    r.field("Program ID", &h.program_id);
    r.field("Reserved 1", &h.reserved_1);
    r.field("Logo region SHA-256 hash", &h.logo_region_hash);
    r.name("Product code", &h.product_code);
    r.field("Extended header SHA-256 hash", &h.extended_header_hash);
    r.field("Extended header size in bytes", &h.extended_header_size_in_bytes);
    r.field("Reserved 2", &h.reserved_2);
    r.field("Flags", &h.flags);
    r.field("Plain region offset, in media units", &h.plain_region_offset_in_media_units);
    r.field("Plain region size, in media units", &h.plain_region_size_in_media_units);
    r.field("Logo region offset, in media units", &h.logo_region_offset_in_media_units);
    r.field("Logo region size, in media units", &h.logo_region_size_in_media_units);
    r.field("ExeFS offset, in media units", &h.exefs_offset_in_media_units);
    r.field("ExeFS size, in media units", &h.exefs_size_in_media_units);
    r.field("ExeFS hash region size, in media units", &h.exefs_hash_region_size_in_media_units);
    r.field("Reserved 3", &h.reserved_3);
    r.field("RomFS offset, in media units", &h.romfs_offset_in_media_units);
    r.field("RomFS size, in media units", &h.romfs_size_in_media_units);
    r.field("RomFS hash region size, in media units", &h.romfs_hash_region_size_in_media_units);
    r.field("Reserved 4", &h.reserved_4);
    r.field("ExeFS superblock SHA-256 hash", &h.exefs_superblock_hash);
    r.field("RomFS superblock SHA-256 hash", &h.romfs_superblock_hash);
}

fn print_code_set(r: &mut Report<'_>, label: &str, info: &CodeSetInfo) {
    r.line(format!("{label}:"));
    let mut r = r.indented();
    r.field("Address", &info.address);
    r.field("Physical region size (in page-multiples)", &info.physical_region_size_in_pages);
    r.field("Size (in bytes)", &info.size_in_bytes);
}

fn print_extended_header(r: &mut Report<'_>, h: &ExtendedHeader) {
    let sci = &h.system_control_info;
    r.name("Application title", &sci.application_title);
    r.field("Flag", &sci.flag);
    r.field("Remaster version", &sci.remaster_version);
    print_code_set(r, "Text code set info", &sci.text_code_set_info);
    r.field("Stack size", &sci.stack_size);
    print_code_set(r, "Read-only code set info", &sci.read_only_code_set_info);
    print_code_set(r, "Data code set info", &sci.data_code_set_info);
    r.field("BSS size", &sci.bss_size);
    r.field("Dependency module list", &sci.dependency_module_list);
    r.field("Save data size", &sci.save_data_size);
    r.field("Jump ID", &sci.jump_id);

    r.line("Access control info:");
    print_access_control(&mut r.indented(), &h.access_control_info);
    r.field("AccessDec signature (RSA-2048-SHA256)", &h.access_descriptor_signature);
    r.field("NCCH HDR RSA-2048 public key", &h.ncch_hdr_public_key);
    r.line("Access control info (for limitations of first ACI):");
    print_access_control(&mut r.indented(), &h.access_control_info_for_limitations);
}

fn print_access_control(r: &mut Report<'_>, aci: &AccessControlInfo) {
    let local = &aci.arm11_local_system_capabilities;
    r.field("Program ID", &local.program_id);
    r.field("Core version", &local.core_version);
    r.field("Flag 1", &local.flag_1);
    r.field("Flag 2", &local.flag_2);
    r.field("Flag 0", &local.flag_0);
    r.field("Priority", &local.priority);
    r.field("Resource limit descriptors", &local.resource_limit_descriptors);

    let storage = &local.storage_info;
    r.field("Extdata ID", &storage.extdata_id);
    r.field("System savedata IDs", &storage.system_savedata_ids);
    r.field("Storage accessible unique IDs", &storage.storage_accessible_unique_ids);
    r.field("Filesystem access info", &storage.file_system_access_info);
    r.field("Other attributes", &storage.other_attributes);

    r.name("Service access control", &local.service_access_control.join(", "));
    r.name(
        "Extended service access control",
        &local.extended_service_access_control.join(", "),
    );
    r.field("Resource limit category", &local.resource_limit_category);
    r.field("Kernel capability descriptors", &aci.arm11_kernel_capabilities.descriptors);
    r.field("ARM9 descriptors", &aci.arm9_access_control.descriptors);
    r.field("ARM9 descriptor version", &aci.arm9_access_control.descriptor_version);
}

fn print_exefs_header(r: &mut Report<'_>, h: &ExeFsHeader) {
    r.table(
        "File headers:",
        "No file headers",
        "File header",
        &h.file_headers,
        |r, file| {
            r.name("File name", &file.file_name);
            r.field("File offset", &file.file_offset);
            r.field("File size", &file.file_size);
        },
    );
    r.table("File hashes:", "No file hashes", "File hash", &h.file_hashes, |r, hash| {
        r.field("SHA-256", hash);
    });
}

fn print_romfs_level(r: &mut Report<'_>, label: &str, level: &RomFsLevel) {
    r.line(format!("{label}:"));
    let mut r = r.indented();
    r.field("Logical offset", &level.logical_offset);
    r.field("Hash data size", &level.hash_data_size);
    r.field("Block size (log2)", &level.block_size_log2);
}

fn print_romfs_header(r: &mut Report<'_>, h: &RomFsHeader) {
    r.field("Magic string", &String::from_utf8_lossy(&h.magic).into_owned());
    r.field("Magic number", &h.magic_number);
    r.field("Master hash size", &h.master_hash_size);
    print_romfs_level(r, "Level 1", &h.level_1);
    print_romfs_level(r, "Level 2", &h.level_2);
    print_romfs_level(r, "Level 3", &h.level_3);
    r.field("Optional info size", &h.optional_info_size);
}
