//! DS report rendering

use super::{Cart, CommonHeader, ExtendedDsiHeader, Header, NameListEntry, NameTable};
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, cart: &Cart) {
    let mut report = Report::new(builder);
    report.title("NDS Cart Information:");
    report.blank();

    let mut section = report.indented();
    section.section(
        "Common Header Information:",
        "No common header",
        cart.header.as_ref().map(Header::common),
        print_common_header,
    );
    section.section(
        "Extended DSi Header Information:",
        "No extended DSi header",
        cart.header.as_ref().and_then(Header::extended),
        print_extended_header,
    );
    section.section(
        "Secure Area Information:",
        "No secure area",
        cart.secure_area_length.as_ref(),
        |r, length| {
            r.field("Secure area length", length);
            r.line("Secure area data not printed");
        },
    );
    section.section(
        "Name Table Information:",
        "No name table",
        cart.name_table.as_ref(),
        print_name_table,
    );
    section.table(
        "File Allocation Table Information:",
        "No file allocation table items",
        "File Allocation Table Entry",
        &cart.file_allocation_table,
        |r, entry| {
            r.field("Start offset", &entry.start_offset);
            r.field("End offset", &entry.end_offset);
        },
    );
}

fn print_common_header(r: &mut Report<'_>, h: &CommonHeader) {
    r.name("Game title", &h.game_title);
    r.field("Game code", &h.game_code);
    r.name("Maker code", &h.maker_code);
    r.field("Unit code", &h.unit_code);
    r.field("Encryption seed select", &h.encryption_seed_select);
    r.field("Device capacity", &h.device_capacity);
    r.field("Reserved 1", &h.reserved_1);
    r.field("Game revision", &h.game_revision);
    r.field("Rom version", &h.rom_version);
    r.field("Internal flags", &h.internal_flags);
    r.field("ARM9 rom offset", &h.arm9_rom_offset);
    r.field("ARM9 entry address", &h.arm9_entry_address);
    r.field("ARM9 load address", &h.arm9_load_address);
    r.field("ARM9 size", &h.arm9_size);
    r.field("ARM7 rom offset", &h.arm7_rom_offset);
    r.field("ARM7 entry address", &h.arm7_entry_address);
    r.field("ARM7 load address", &h.arm7_load_address);
    r.field("ARM7 size", &h.arm7_size);
    r.field("File name table offset", &h.file_name_table_offset);
    r.field("File name table length", &h.file_name_table_length);
    r.field("File allocation table offset", &h.file_allocation_table_offset);
    r.field("File allocation table length", &h.file_allocation_table_length);
    r.field("ARM9 overlay offset", &h.arm9_overlay_offset);
    r.field("ARM9 overlay length", &h.arm9_overlay_length);
    r.field("ARM7 overlay offset", &h.arm7_overlay_offset);
    r.field("ARM7 overlay length", &h.arm7_overlay_length);
    r.field(
        "Normal card control register settings",
        &h.normal_card_control_register_settings,
    );
    r.field(
        "Secure card control register settings",
        &h.secure_card_control_register_settings,
    );
    r.field("Icon banner offset", &h.icon_banner_offset);
    r.field("Secure area CRC", &h.secure_area_crc);
    r.field("Secure transfer timeout", &h.secure_transfer_timeout);
    r.field("ARM9 autoload", &h.arm9_autoload);
    r.field("ARM7 autoload", &h.arm7_autoload);
    r.field("Secure disable", &h.secure_disable);
    r.field("NTR region rom size", &h.ntr_region_rom_size);
    r.field("Header size", &h.header_size);
    r.field("Reserved 2", &h.reserved_2);
    r.field("Nintendo logo", &h.nintendo_logo);
    r.field("Nintendo logo CRC", &h.nintendo_logo_crc);
    r.field("Header CRC", &h.header_crc);
    r.field("Debugger reserved", &h.debugger_reserved);
}

fn print_extended_header(r: &mut Report<'_>, h: &ExtendedDsiHeader) {
    r.field("Global MBK1..MBK5 settings", &h.global_mbk_1_to_5_settings);
    r.field("Local MBK6..MBK8 settings for ARM9", &h.local_mbk_6_to_8_settings_arm9);
    r.field("Local MBK6..MBK8 settings for ARM7", &h.local_mbk_6_to_8_settings_arm7);
    r.field("Global MBK9 setting", &h.global_mbk_9_setting);
    r.field("Region flags", &h.region_flags);
    r.field("Access control", &h.access_control);
    r.field("ARM7 SCFG EXT mask", &h.arm7_scfg_ext_mask);
    r.field("Reserved/flags?", &h.reserved_flags);
    r.field("ARM9i rom offset", &h.arm9i_rom_offset);
    r.field("Reserved 3", &h.reserved_3);
    r.field("ARM9i load address", &h.arm9i_load_address);
    r.field("ARM9i size", &h.arm9i_size);
    r.field("ARM7i rom offset", &h.arm7i_rom_offset);
    r.field("Reserved 4", &h.reserved_4);
    r.field("ARM7i load address", &h.arm7i_load_address);
    r.field("ARM7i size", &h.arm7i_size);
    r.field("Digest NTR region offset", &h.digest_ntr_region_offset);
    r.field("Digest NTR region length", &h.digest_ntr_region_length);
    r.field("Digest TWL region offset", &h.digest_twl_region_offset);
    r.field("Digest TWL region length", &h.digest_twl_region_length);
    r.field(
        "Digest sector hashtable region offset",
        &h.digest_sector_hashtable_region_offset,
    );
    r.field(
        "Digest sector hashtable region length",
        &h.digest_sector_hashtable_region_length,
    );
    r.field(
        "Digest block hashtable region offset",
        &h.digest_block_hashtable_region_offset,
    );
    r.field(
        "Digest block hashtable region length",
        &h.digest_block_hashtable_region_length,
    );
    r.field("Digest sector size", &h.digest_sector_size);
    r.field("Digest block sector count", &h.digest_block_sector_count);
    r.field("Icon banner size", &h.icon_banner_size);
    r.field("Unknown 1", &h.unknown_1);
    r.field("NTR+TWL region rom size", &h.ntr_twl_region_rom_size);
    r.field("Unknown 2", &h.unknown_2);
    r.field("Modcrypt area 1 offset", &h.modcrypt_area_1_offset);
    r.field("Modcrypt area 1 size", &h.modcrypt_area_1_size);
    r.field("Modcrypt area 2 offset", &h.modcrypt_area_2_offset);
    r.field("Modcrypt area 2 size", &h.modcrypt_area_2_size);
    r.field("Title ID", &h.title_id);
    r.field("DSiWare 'public.sav' size", &h.dsiware_public_sav_size);
    r.field("DSiWare 'private.sav' size", &h.dsiware_private_sav_size);
    r.field("Reserved (zero)", &h.reserved_zero);
    r.field("Age ratings", &h.age_ratings);
    r.field(
        "ARM9 (with encrypted secure area) SHA1 HMAC hash",
        &h.arm9_with_secure_area_sha1_hmac_hash,
    );
    r.field("ARM7 SHA1 HMAC hash", &h.arm7_sha1_hmac_hash);
    r.field("Digest master SHA1 HMAC hash", &h.digest_master_sha1_hmac_hash);
    r.field("Banner SHA1 HMAC hash", &h.banner_sha1_hmac_hash);
    r.field("ARM9i (decrypted) SHA1 HMAC hash", &h.arm9i_decrypted_sha1_hmac_hash);
    r.field("ARM7i (decrypted) SHA1 HMAC hash", &h.arm7i_decrypted_sha1_hmac_hash);
    r.field("Reserved 5", &h.reserved_5);
    r.field(
        "ARM9 (without secure area) SHA1 HMAC hash",
        &h.arm9_no_secure_area_sha1_hmac_hash,
    );
    r.field("Reserved 6", &h.reserved_6);
    r.field("Reserved and unchecked region", &h.reserved_and_unchecked);
    r.field("RSA signature", &h.rsa_signature);
}

fn print_name_table(r: &mut Report<'_>, table: &NameTable) {
    r.table(
        "Folder Allocation Table:",
        "No folder allocation table items",
        "Folder Allocation Table Entry",
        &table.folder_allocation_table,
        |r, entry| {
            r.field("Start offset", &entry.start_offset);
            r.field("First file index", &entry.first_file_index);
            r.field("Parent folder index", &entry.parent_folder_index);
        },
    );
    r.table(
        "Name List:",
        "No name list items",
        "Folder",
        &table.name_lists,
        |r, list| {
            if list.is_empty() {
                r.line("No name list entries");
            }
            for entry in list {
                match entry {
                    NameListEntry::File { name } => r.name("File", name),
                    NameListEntry::Folder { name, index } => {
                        r.name("Folder", name);
                        r.indented().field("Index", index);
                    }
                }
            }
        },
    );
}
