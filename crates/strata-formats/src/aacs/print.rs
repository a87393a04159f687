//! Media key block report rendering

use super::{MediaKeyBlock, RecordBody, RevocationSignatureBlock, record_type_name};
use crate::printer::{Field, Report};

pub(crate) fn print(builder: &mut String, block: &MediaKeyBlock) {
    let mut report = Report::new(builder);
    report.title("AACS Media Key Block Information:");
    report.blank();

    let mut section = report.indented();
    section.table("Records Information:", "No records", "Record", &block.records, |r, record| {
        r.line(format!(
            "Record type: {} ({})",
            record.record_type.render(),
            record_type_name(record.record_type)
        ));
        r.field("Record length", &record.length);
        print_body(r, &record.body);
    });
}

fn print_body(r: &mut Report<'_>, body: &RecordBody) {
    match body {
        RecordBody::EndOfMediaKeyBlock { signature_data } => {
            r.field("Signature data", signature_data);
        }
        RecordBody::ExplicitSubsetDifference { subset_differences } => {
            r.table(
                "Subset Differences:",
                "No subset differences",
                "Subset Difference",
                subset_differences,
                |r, difference| {
                    r.field("Mask", &difference.mask);
                    r.field("Number", &difference.number);
                },
            );
        }
        RecordBody::MediaKeyData { media_keys } => {
            r.table("Media Keys:", "No media keys", "Media Key", media_keys, |r, key| {
                r.field("Key", key);
            });
        }
        RecordBody::SubsetDifferenceIndex { span, offsets } => {
            r.field("Span", span);
            r.field("Offsets", offsets);
        }
        RecordBody::TypeAndVersion {
            media_key_block_type,
            version_number,
        } => {
            r.field("Media key block type", media_key_block_type);
            r.field("Version number", version_number);
        }
        RecordBody::DriveRevocationList {
            total_number_of_entries,
            signature_blocks,
        }
        | RecordBody::HostRevocationList {
            total_number_of_entries,
            signature_blocks,
        } => {
            r.field("Total number of entries", total_number_of_entries);
            print_signature_blocks(r, signature_blocks);
        }
        RecordBody::VerifyMediaKey { ciphertext_value } => {
            r.field("Ciphertext value", ciphertext_value);
        }
        RecordBody::Copyright { copyright } => {
            r.field("Copyright", copyright);
        }
        RecordBody::Unknown { data } => {
            r.field("Data", data);
        }
    }
}

fn print_signature_blocks(r: &mut Report<'_>, blocks: &[RevocationSignatureBlock]) {
    r.table(
        "Signature Blocks:",
        "No signature blocks",
        "Signature Block",
        blocks,
        |r, block| {
            r.field("Number of entries", &block.number_of_entries);
            r.table("Entry Fields:", "No entry fields", "Entry", &block.entry_fields, |r, entry| {
                r.field("Range", &entry.range);
                r.field("ID", &entry.id);
            });
            r.field("Signature", &block.signature);
        },
    );
}
