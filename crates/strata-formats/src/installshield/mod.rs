//! InstallShield cabinet support
//!
//! Header files (`data1.hdr`) and the first cabinet volume carry the same
//! layout:
//!
//! - **Common Header**: signature, encoded version and the descriptor location
//! - **Volume Header**: 32-bit fields up to major version 5, 64-bit afterwards
//! - **Descriptor**: file table location, counts and the heads of the file
//!   group and component lists
//! - **File Table**: directory name offsets, file descriptor offsets
//!   (major version 5 and below) and file descriptors
//! - **File Groups** and **Components**: linked lists of named records
//!
//! The major version is decoded once from the common header and selects the
//! layout of every version-gated record. Strings are UTF-16 from major
//! version 17.

mod file;
mod group;
mod header;
mod print;

pub use file::{
    FILE_COMPRESSED, FILE_DESCRIPTOR_V6_SIZE, FILE_INVALID, FILE_OBFUSCATED, FILE_SPLIT,
    FileDescriptor, FileDescriptorV5, FileDescriptorV6,
};
pub use group::{Component, FileGroup, OffsetList};
pub use header::{
    CommonHeader, Descriptor, MAX_FILE_GROUP_COUNT, SIGNATURE, UTF16_MAJOR_VERSION, VolumeHeader,
    major_version,
};

use crate::cursor::ByteCursor;
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::Endian;
use group::Strings;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// InstallShield cabinet or header file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cabinet {
    /// Common header
    pub common_header: Option<CommonHeader>,
    /// Volume header
    pub volume_header: Option<VolumeHeader>,
    /// Descriptor
    pub descriptor: Option<Descriptor>,
    /// Directory name offsets, relative to the file table
    pub directory_offsets: Vec<u32>,
    /// Directory names, by directory index
    pub directory_names: Vec<String>,
    /// File descriptor offsets, relative to the file table
    pub file_descriptor_offsets: Vec<u32>,
    /// File descriptors
    pub file_descriptors: Vec<FileDescriptor>,
    /// File names keyed by their offset in the file table
    pub file_names: BTreeMap<u32, String>,
    /// File group list nodes keyed by their descriptor-relative offset
    pub file_group_offsets: BTreeMap<u32, OffsetList>,
    /// File groups, in list order
    pub file_groups: Vec<FileGroup>,
    /// Component list nodes keyed by their descriptor-relative offset
    pub component_offsets: BTreeMap<u32, OffsetList>,
    /// Components, in list order
    pub components: Vec<Component>,
}

impl Cabinet {
    /// Major version, 0 when there is no common header
    pub fn major_version(&self) -> u32 {
        self.common_header
            .as_ref()
            .map_or(0, CommonHeader::major_version)
    }

    /// Directory name of a file descriptor
    pub fn directory_name(&self, file: &FileDescriptor) -> Option<&str> {
        let index = usize::try_from(file.directory_index()).ok()?;
        self.directory_names.get(index).map(String::as_str)
    }

    /// Name of a file descriptor
    pub fn file_name(&self, file: &FileDescriptor) -> Option<&str> {
        self.file_names.get(&file.name_offset()).map(String::as_str)
    }
}

/// Walk every linked list starting at `heads`, keyed by node offset
///
/// Visited nodes end a list, so cycles terminate.
fn read_offset_lists(
    data: &[u8],
    strings: &Strings<'_>,
    descriptor_start: u64,
    heads: &[u32],
    limit: usize,
) -> Vec<(u32, OffsetList)> {
    let mut seen = BTreeSet::new();
    let mut nodes = Vec::new();
    for &head in heads {
        let mut offset = head;
        while offset != 0 && nodes.len() < limit && seen.insert(offset) {
            let node = ByteCursor::at(data, descriptor_start + u64::from(offset))
                .and_then(|mut c| OffsetList::read(&mut c, strings));
            match node {
                Ok(node) => {
                    let next = node.next_offset;
                    nodes.push((offset, node));
                    offset = next;
                }
                Err(err) => {
                    trace!(offset, %err, "offset list ended early");
                    break;
                }
            }
        }
    }
    nodes
}

impl BinaryFormat for Cabinet {
    const NAME: &'static str = "InstallShield Cabinet";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let common_header: CommonHeader = cursor.read()?;
        let major = common_header.major_version();
        let limit = options.max_table_entries;

        let mut cabinet = Self {
            volume_header: recover(
                "installshield volume header",
                cursor.read_with::<VolumeHeader>(Endian::Little, (major,)),
            )?,
            ..Self::default()
        };

        let descriptor_start = offset + u64::from(common_header.descriptor_offset);
        cabinet.descriptor = if common_header.descriptor_offset == 0 {
            None
        } else {
            recover(
                "installshield descriptor",
                ByteCursor::at(data, descriptor_start).and_then(|mut c| c.read::<Descriptor>()),
            )?
        };

        if let Some(descriptor) = &cabinet.descriptor {
            let file_table = descriptor_start + u64::from(descriptor.file_table_offset);
            let file_strings = Strings::new(data, file_table, major);
            let directory_count = u64::from(descriptor.directory_count);
            let file_count = u64::from(descriptor.file_count);

            if let Ok(mut table) = ByteCursor::at(data, file_table) {
                cabinet.directory_offsets =
                    table.read_counted(directory_count, limit, ByteCursor::read_u32_le)?;
                if major <= 5 {
                    cabinet.file_descriptor_offsets =
                        table.read_counted(file_count, limit, ByteCursor::read_u32_le)?;
                }
            }
            if major > 5 {
                let count = usize::try_from(file_count).unwrap_or(usize::MAX).min(limit);
                cabinet.file_descriptor_offsets = (0..count as u64)
                    .map(|index| {
                        u64::from(descriptor.file_table_offset_2) + index * FILE_DESCRIPTOR_V6_SIZE
                    })
                    .map_while(|offset| u32::try_from(offset).ok())
                    .collect();
            }

            cabinet.directory_names = cabinet
                .directory_offsets
                .iter()
                .map_while(|&offset| file_strings.get(offset).ok())
                .collect();

            for &descriptor_offset in &cabinet.file_descriptor_offsets {
                let file = ByteCursor::at(data, file_table + u64::from(descriptor_offset))
                    .and_then(|mut c| {
                        if major <= 5 {
                            c.read_with::<FileDescriptorV5>(Endian::Little, (major,))
                                .map(FileDescriptor::V5)
                        } else {
                            c.read::<FileDescriptorV6>().map(FileDescriptor::V6)
                        }
                    });
                let Some(file) = recover("installshield file descriptor", file)? else {
                    break;
                };
                if let Ok(name) = file_strings.get(file.name_offset()) {
                    cabinet.file_names.insert(file.name_offset(), name);
                }
                cabinet.file_descriptors.push(file);
            }

            let strings = Strings::new(data, descriptor_start, major);
            for (node_offset, node) in read_offset_lists(
                data,
                &strings,
                descriptor_start,
                &descriptor.file_group_offsets,
                limit,
            ) {
                let start = descriptor_start + u64::from(node.descriptor_offset);
                let group = ByteCursor::at(data, start)
                    .and_then(|mut c| FileGroup::read(&mut c, &strings, major));
                if let Some(group) = recover("installshield file group", group)? {
                    cabinet.file_groups.push(group);
                }
                cabinet.file_group_offsets.insert(node_offset, node);
            }

            for (node_offset, node) in read_offset_lists(
                data,
                &strings,
                descriptor_start,
                &descriptor.component_offsets,
                limit,
            ) {
                let start = descriptor_start + u64::from(node.descriptor_offset);
                let component = ByteCursor::at(data, start)
                    .and_then(|mut c| Component::read(&mut c, &strings, major, limit));
                if let Some(component) = recover("installshield component", component)? {
                    cabinet.components.push(component);
                }
                cabinet.component_offsets.insert(node_offset, node);
            }
        }

        cabinet.common_header = Some(common_header);
        Ok(cabinet)
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{SampleBuilder, assert_idempotent, assert_truncation_safe};

    const DESCRIPTOR: usize = 0x200;
    const FILE_TABLE: usize = DESCRIPTOR + 0x300;

    fn string(builder: SampleBuilder, text: &str, utf16: bool) -> SampleBuilder {
        if utf16 {
            let units: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
            builder.bytes(&units).u16le(0)
        } else {
            builder.cstr(text)
        }
    }

    fn sample(version: u32) -> Vec<u8> {
        let major = major_version(version);
        let utf16 = major >= UTF16_MAJOR_VERSION;

        let mut b = SampleBuilder::new()
            .bytes(&SIGNATURE)
            .u32le(version)
            .u32le(0)
            .u32le(DESCRIPTOR as u32)
            .u32le(0x300)
            // volume header, same leading values in both widths
            .u32le(0x900)
            .pad_to(DESCRIPTOR)
            // descriptor
            .u32le(0)
            .zeros(4)
            .u32le(0)
            .u32le(0x300)
            .zeros(4)
            .u32le(0x100)
            .u32le(0x100)
            .u16le(1)
            .zeros(10)
            .u32le(1)
            .u32le(0x20)
            .u16le(0)
            .u32le(0)
            .zeros(8)
            .u32le(0x400)
            .zeros(70 * 4)
            .u32le(0x440)
            .zeros(70 * 4)
            .zeros(16);

        // file table
        b = b.pad_to(FILE_TABLE).u32le(0x10);
        if major <= 5 {
            b = b.u32le(0x20);
        }
        b = string(b.pad_to(FILE_TABLE + 0x10), "app", utf16).pad_to(FILE_TABLE + 0x20);
        b = if major <= 5 {
            let b = b
                .u32le(0x80)
                .u32le(0)
                .u16le(FILE_COMPRESSED)
                .u32le(0x1234)
                .u32le(0x400)
                .zeros(0x14)
                .u32le(0x40);
            if major == 5 { b.bytes(&[0xAA; 16]) } else { b }
        } else {
            b.u16le(FILE_COMPRESSED)
                .u64le(0x1234)
                .u64le(0x400)
                .u64le(0x40)
                .bytes(&[0xAA; 16])
                .zeros(16)
                .u32le(0x80)
                .u16le(0)
                .zeros(12)
                .u32le(0)
                .u32le(0)
                .u8(0)
                .u16le(1)
        };
        b = string(b.pad_to(FILE_TABLE + 0x80), "a.txt", utf16);

        // file group and component list nodes
        b = b
            .pad_to(DESCRIPTOR + 0x400)
            .u32le(0x600)
            .u32le(0x480)
            .u32le(0)
            .pad_to(DESCRIPTOR + 0x440)
            .u32le(0x610)
            .u32le(0x500)
            .u32le(0);

        // file group
        b = b
            .pad_to(DESCRIPTOR + 0x480)
            .u32le(0x600)
            .u32le(100)
            .zeros(4)
            .u32le(50)
            .zeros(2)
            .u16le(1)
            .u16le(2);
        if major <= 5 {
            b = b.zeros(0x36);
        }
        b = b.u32le(0).u32le(0).zeros(8 * 4);

        // component
        b = b
            .pad_to(DESCRIPTOR + 0x500)
            .u32le(0x610)
            .zeros(4 + 4 + 2 + 4 + 4 + 2 + 4 + 4 + 4 + 4 + 0x20 + 4 + 0x1C)
            .zeros(if major <= 5 { 2 } else { 1 })
            .u16le(0)
            .u32le(0)
            .u16le(1)
            .u32le(0x620)
            .zeros(2 + 4 + 2 + 4 + 4 + 16);

        // descriptor strings
        b = string(b.pad_to(DESCRIPTOR + 0x600), "Group", utf16);
        b = string(b.pad_to(DESCRIPTOR + 0x610), "Comp", utf16);
        b.pad_to(DESCRIPTOR + 0x620).u32le(0x600).pad_to(0x900).build()
    }

    fn assert_common_tree(cabinet: &Cabinet) {
        assert_eq!(cabinet.directory_names, ["app"]);
        assert_eq!(cabinet.file_descriptors.len(), 1);
        let file = &cabinet.file_descriptors[0];
        assert_eq!(cabinet.file_name(file), Some("a.txt"));
        assert_eq!(cabinet.directory_name(file), Some("app"));
        assert_eq!(file.expanded_size(), 0x1234);
        assert_eq!(file.compressed_size(), 0x400);
        assert_eq!(file.data_offset(), 0x40);

        assert_eq!(cabinet.file_group_offsets.len(), 1);
        assert_eq!(cabinet.file_group_offsets[&0x400].name, "Group");
        assert_eq!(cabinet.file_groups.len(), 1);
        assert_eq!(cabinet.file_groups[0].name, "Group");
        assert_eq!(cabinet.file_groups[0].expanded_size, 100);
        assert_eq!(cabinet.file_groups[0].attribute_2, 2);

        assert_eq!(cabinet.component_offsets[&0x440].descriptor_offset, 0x500);
        assert_eq!(cabinet.components.len(), 1);
        assert_eq!(cabinet.components[0].identifier, "Comp");
        assert_eq!(cabinet.components[0].file_group_names, ["Group"]);
        assert_eq!(cabinet.components[0].display_name, None);
    }

    #[test]
    fn test_decodes_v5_layout() {
        let cabinet = Cabinet::decode(&sample(0x0100_5000), 0).unwrap();
        assert_eq!(cabinet.major_version(), 5);
        assert!(matches!(
            cabinet.volume_header,
            Some(VolumeHeader::V5 { data_offset: 0x900, .. })
        ));
        assert_eq!(cabinet.directory_offsets, [0x10]);
        assert_eq!(cabinet.file_descriptor_offsets, [0x20]);
        assert!(matches!(
            &cabinet.file_descriptors[0],
            FileDescriptor::V5(fd) if fd.md5 == Some([0xAA; 16])
        ));
        assert_common_tree(&cabinet);
    }

    #[test]
    fn test_decodes_v3_without_md5() {
        let cabinet = Cabinet::decode(&sample(0x0100_3000), 0).unwrap();
        assert_eq!(cabinet.major_version(), 3);
        assert!(matches!(
            &cabinet.file_descriptors[0],
            FileDescriptor::V5(fd) if fd.md5.is_none()
        ));
        assert_common_tree(&cabinet);
    }

    #[test]
    fn test_decodes_v6_layout() {
        let cabinet = Cabinet::decode(&sample(0x0200_0258), 0).unwrap();
        assert_eq!(cabinet.major_version(), 6);
        assert!(matches!(
            cabinet.volume_header,
            Some(VolumeHeader::V6 { data_offset: 0x900, .. })
        ));
        assert_eq!(cabinet.file_descriptor_offsets, [0x20]);
        assert!(matches!(
            &cabinet.file_descriptors[0],
            FileDescriptor::V6(fd) if fd.volume == 1
        ));
        assert_common_tree(&cabinet);
    }

    #[test]
    fn test_utf16_strings_from_v17() {
        let cabinet = Cabinet::decode(&sample(0x0200_0708), 0).unwrap();
        assert_eq!(cabinet.major_version(), 18);
        assert_common_tree(&cabinet);
    }

    #[test]
    fn test_rejects_bad_signature() {
        let mut data = sample(0x0100_5000);
        data[3] = b'X';
        assert!(Cabinet::decode(&data, 0).is_err());
        assert!(Cabinet::decode(&[], 0).is_err());
    }

    #[test]
    fn test_list_cycles_terminate() {
        let mut data = sample(0x0200_0258);
        // point the file group node back at itself
        let next = DESCRIPTOR + 0x400 + 8;
        data[next..next + 4].copy_from_slice(&0x400u32.to_le_bytes());
        let cabinet = Cabinet::decode(&data, 0).unwrap();
        assert_eq!(cabinet.file_group_offsets.len(), 1);
        assert_eq!(cabinet.file_groups.len(), 1);
    }

    #[test]
    fn test_print() {
        let cabinet = Cabinet::decode(&sample(0x0100_5000), 0).unwrap();
        let text = assert_idempotent(&cabinet);
        assert!(text.starts_with("InstallShield Cabinet Information:\n"));
        assert!(text.contains("Signature: ISc("));
        assert!(text.contains("Calculated version: 5 (0x00000005)"));
        assert!(text.contains("Name: a.txt"));
        assert!(text.contains("Directory name: app"));
        assert!(text.contains("Name: Group"));
        assert!(text.contains("Identifier: Comp"));
        assert!(text.contains("Display name: [NULL]"));
    }

    #[test]
    fn test_print_empty() {
        let text = Cabinet::default().report();
        assert!(text.contains("No common header"));
        assert!(text.contains("No volume header"));
        assert!(text.contains("No descriptor"));
        assert!(text.contains("No file descriptors"));
        assert!(text.contains("No components"));
    }

    #[test]
    fn test_truncation_safe() {
        assert_truncation_safe::<Cabinet>(&sample(0x0100_5000));
        assert_truncation_safe::<Cabinet>(&sample(0x0200_0258));
    }
}
