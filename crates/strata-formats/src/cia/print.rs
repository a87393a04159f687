//! CIA report rendering

use super::{Certificate, Cia, PublicKey, Signature, Ticket, TitleMetadata};
use crate::n3ds::print::print_partitions;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, cia: &Cia) {
    let mut report = Report::new(builder);
    report.title("CIA Archive Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", cia.header.as_ref(), |r, h| {
        r.field("Header size", &h.header_size);
        r.field("Type", &h.cia_type);
        r.field("Version", &h.version);
        r.field("Certificate chain size", &h.certificate_chain_size);
        r.field("Ticket size", &h.ticket_size);
        r.field("TMD file size", &h.tmd_file_size);
        r.field("Meta size", &h.meta_size);
        r.field("Content size", &h.content_size);
        r.field("Content index", &h.content_index);
    });

    section.table(
        "Certificate Chain Information:",
        "No certificates, expected 3",
        "Certificate",
        &cia.certificate_chain,
        print_certificate,
    );

    section.section("Ticket Information:", "No ticket", cia.ticket.as_ref(), print_ticket);

    section.section(
        "Title Metadata Information:",
        "No title metadata",
        cia.title_metadata.as_ref(),
        print_title_metadata,
    );

    print_partitions(&mut section, &cia.partitions);

    section.section("Meta Data Information:", "No meta file data", cia.meta_data.as_ref(), |r, m| {
        r.field("Title ID dependency list", &m.title_id_dependency_list);
        r.field("Core version", &m.core_version);
        r.line("Icon data: [Icon data not printed]");
    });
}

fn signature_name(signature: &Signature) -> &'static str {
    match signature {
        Signature::Rsa4096Sha1(_) => "RSA_4096_SHA1",
        Signature::Rsa2048Sha1(_) => "RSA_2048_SHA1",
        Signature::EcdsaSha1(_) => "ECDSA_SHA1",
        Signature::Rsa4096Sha256(_) => "RSA_4096_SHA256",
        Signature::Rsa2048Sha256(_) => "RSA_2048_SHA256",
        Signature::EcdsaSha256(_) => "ECDSA_SHA256",
    }
}

fn print_signature(r: &mut Report<'_>, signature: &Signature) {
    r.line(format!(
        "Signature type: {} (0x{:08X})",
        signature_name(signature),
        signature.signature_type()
    ));
    r.field("Signature size", &(signature.bytes().len() as u32));
    r.field("Padding size", &(signature.padding_size() as u32));
    r.field("Signature", signature.bytes());
}

fn print_certificate(r: &mut Report<'_>, certificate: &Certificate) {
    print_signature(r, &certificate.signature);
    r.name("Issuer", &certificate.issuer);
    r.field("Key type", &certificate.key_type);
    r.name("Name", &certificate.name);
    r.field("Expiration time", &certificate.expiration_time);
    match &certificate.public_key {
        PublicKey::Rsa4096 {
            modulus,
            public_exponent,
        }
        | PublicKey::Rsa2048 {
            modulus,
            public_exponent,
        } => {
            r.field("Modulus", modulus);
            r.field("Public exponent", public_exponent);
        }
        PublicKey::Ecdsa { public_key } => r.field("Public key", public_key),
    }
}

fn print_ticket(r: &mut Report<'_>, t: &Ticket) {
    print_signature(r, &t.signature);
    r.name("Issuer", &t.issuer);
    r.field("ECC public key", &t.ecc_public_key);
    r.field("Version", &t.version);
    r.field("CaCrlVersion", &t.ca_crl_version);
    r.field("SignerCrlVersion", &t.signer_crl_version);
    r.field("Title key", &t.title_key);
    r.field("Reserved 1", &t.reserved_1);
    r.field("Ticket ID", &t.ticket_id);
    r.field("Console ID", &t.console_id);
    r.field("Title ID", &t.title_id);
    r.field("Reserved 2", &t.reserved_2);
    r.field("Ticket title version", &t.ticket_title_version);
    r.field("Reserved 3", &t.reserved_3);
    r.field("License type", &t.license_type);
    r.field("Common key Y index", &t.common_key_y_index);
    r.field("Reserved 4", &t.reserved_4);
    r.field("eShop Account ID", &t.eshop_account_id);
    r.field("Reserved 5", &t.reserved_5);
    r.field("Audit", &t.audit);
    r.field("Reserved 6", &t.reserved_6);
    r.field("Limits", &t.limits);
    r.field("Content index header", &t.content_index_header);
    r.field("Content index size", &t.content_index_size);
    r.field("Content index", &t.content_index);
}

fn print_title_metadata(r: &mut Report<'_>, t: &TitleMetadata) {
    print_signature(r, &t.signature);
    r.name("Issuer", &t.issuer);
    r.field("Version", &t.version);
    r.field("CaCrlVersion", &t.ca_crl_version);
    r.field("SignerCrlVersion", &t.signer_crl_version);
    r.field("Reserved 1", &t.reserved_1);
    r.field("System version", &t.system_version);
    r.field("Title ID", &t.title_id);
    r.field("Title type", &t.title_type);
    r.field("Group ID", &t.group_id);
    r.field("Save data size", &t.save_data_size);
    r.field("SRL private save data size", &t.srl_private_save_data_size);
    r.field("Reserved 2", &t.reserved_2);
    r.field("SRL flag", &t.srl_flag);
    r.field("Reserved 3", &t.reserved_3);
    r.field("Access rights", &t.access_rights);
    r.field("Title version", &t.title_version);
    r.field("Content count", &t.content_count);
    r.field("Boot content", &t.boot_content);
    r.field("Padding", &t.padding);
    r.field("SHA-256 hash of the content info records", &t.sha256_hash_content_info_records);
    r.blank();

    // Only records that cover at least one content are interesting
    let info_records: Vec<_> = t
        .content_info_records
        .iter()
        .filter(|record| record.content_command_count != 0)
        .collect();
    r.table(
        "Content Info Records:",
        "No content info records",
        "Content info record",
        &info_records,
        |r, record| {
            r.field("Content index offset", &record.content_index_offset);
            r.field("Content command count", &record.content_command_count);
            r.field(
                "SHA-256 hash of the next k content records not hashed yet",
                &record.unhashed_content_records_sha256_hash,
            );
        },
    );

    r.table(
        "Content Chunk Records:",
        "No content chunk records",
        "Content chunk record",
        &t.content_chunk_records,
        |r, record| {
            r.field("Content ID", &record.content_id);
            r.field("Content index", &record.content_index);
            r.field("Content type", &record.content_type);
            r.field("Content size", &record.content_size);
            r.field("SHA-256 hash", &record.sha256_hash);
        },
    );
}
