#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Format recognition and one-call dumps through the registry

use strata_formats::FormatKind;

fn le32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

fn microsoft_cabinet() -> Vec<u8> {
    let mut data = b"MSCF".to_vec();
    for value in [0, 36, 0, 36, 0] {
        data.extend(le32(value));
    }
    data.extend([3, 1]);
    data.extend([0; 10]);
    data
}

fn pff() -> Vec<u8> {
    let mut data = le32(20).to_vec();
    data.extend(b"PFF2");
    data.extend(le32(0));
    data.extend(le32(0x20));
    data.extend(le32(20));
    data.extend(le32(0x0100_007F));
    data.extend(le32(0));
    data.extend(b"KING");
    data
}

fn bdplus() -> Vec<u8> {
    let mut data = b"BDSVM_CC".to_vec();
    data.extend([0; 5]);
    data.extend(2009u16.to_be_bytes());
    data.extend([1, 2, 0, 0, 0, 0]);
    data.extend(2u32.to_be_bytes());
    data.extend([0xAA, 0xBB]);
    data
}

fn quantum() -> Vec<u8> {
    let mut data = b"DS".to_vec();
    data.extend([0, 22, 1, 0, 20, 0]);
    data.extend([1, b'x', 0]);
    data.extend(le32(1));
    data.extend([0; 6]);
    data
}

fn media_key_block() -> Vec<u8> {
    vec![0x10, 0, 0, 12, 0, 3, 0x10, 3, 0, 0, 0, 1, 0x02, 0, 0, 4]
}

fn wad() -> Vec<u8> {
    let mut data = b"WAD3".to_vec();
    data.extend(le32(0));
    data.extend(le32(12));
    data
}

fn samples() -> Vec<(FormatKind, Vec<u8>)> {
    vec![
        (FormatKind::MicrosoftCabinet, microsoft_cabinet()),
        (FormatKind::Pff, pff()),
        (FormatKind::BdPlusSvm, bdplus()),
        (FormatKind::Quantum, quantum()),
        (FormatKind::AacsMediaKeyBlock, media_key_block()),
        (FormatKind::Wad, wad()),
    ]
}

#[test]
fn sniff_recognizes_samples() {
    for (kind, data) in samples() {
        assert_eq!(FormatKind::sniff(&data), Some(kind), "{kind}");
    }
}

#[test]
fn dump_prints_titled_reports() {
    for (kind, data) in samples() {
        let mut report = String::new();
        kind.dump(&data, 0, &mut report)
            .unwrap_or_else(|err| panic!("{kind} failed to decode: {err}"));
        let title = format!("{} Information:\n", kind.name());
        assert!(report.starts_with(&title), "{kind} report starts with\n{report}");
        assert!(!report.contains("No header"), "{kind} lost its header");
    }
}

#[test]
fn dump_honors_offset() {
    let mut data = vec![0xEE; 7];
    data.extend(bdplus());
    let mut report = String::new();
    FormatKind::BdPlusSvm.dump(&data, 7, &mut report).unwrap();
    assert!(report.contains("Date: 2009-01-02"));
    assert!(FormatKind::BdPlusSvm.dump(&data, 0, &mut String::new()).is_err());
}

#[test]
fn every_format_rejects_empty_input() {
    for kind in FormatKind::ALL {
        let mut report = String::new();
        assert!(kind.dump(&[], 0, &mut report).is_err(), "{kind}");
        assert!(report.is_empty(), "{kind} printed a failed decode");
    }
}

#[test]
fn offset_past_end_is_an_error() {
    let data = pff();
    let mut report = String::new();
    assert!(FormatKind::Pff.dump(&data, 1 << 40, &mut report).is_err());
}
