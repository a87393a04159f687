//! File group and component lists

use super::header::UTF16_MAJOR_VERSION;
use crate::cursor::{ByteCursor, Encoding};
use crate::error::Result;

/// Reads NUL-terminated strings relative to a base offset
#[derive(Debug, Clone, Copy)]
pub(crate) struct Strings<'a> {
    data: &'a [u8],
    base: u64,
    encoding: Encoding,
}

impl<'a> Strings<'a> {
    pub(crate) fn new(data: &'a [u8], base: u64, major_version: u32) -> Self {
        let encoding = if major_version >= UTF16_MAJOR_VERSION {
            Encoding::Utf16Le
        } else {
            Encoding::Latin1
        };
        Self {
            data,
            base,
            encoding,
        }
    }

    pub(crate) fn get(&self, offset: u32) -> Result<String> {
        ByteCursor::at(self.data, self.base + u64::from(offset))?.read_cstring(self.encoding)
    }
}

/// Linked-list node pointing at a file group or component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetList {
    /// Name offset, relative to the descriptor
    pub name_offset: u32,
    /// Name
    pub name: String,
    /// Offset of the described record, relative to the descriptor
    pub descriptor_offset: u32,
    /// Offset of the next node, 0 at the end of the list
    pub next_offset: u32,
}

impl OffsetList {
    pub(crate) fn read(cursor: &mut ByteCursor<'_>, strings: &Strings<'_>) -> Result<Self> {
        let name_offset = cursor.read_u32_le()?;
        let descriptor_offset = cursor.read_u32_le()?;
        let next_offset = cursor.read_u32_le()?;
        Ok(Self {
            name_offset,
            name: strings.get(name_offset)?,
            descriptor_offset,
            next_offset,
        })
    }
}

/// File group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Name offset
    pub name_offset: u32,
    /// Name
    pub name: String,
    /// Expanded size
    pub expanded_size: u32,
    /// Compressed size
    pub compressed_size: u32,
    /// Attribute 1
    pub attribute_1: u16,
    /// Attribute 2
    pub attribute_2: u16,
    /// Index of the first file
    pub first_file: u32,
    /// Index of the last file
    pub last_file: u32,
    /// Unknown offset
    pub unknown_offset: u32,
    /// Var 4 offset
    pub var4_offset: u32,
    /// Var 1 offset
    pub var1_offset: u32,
    /// HTTP location offset
    pub http_location_offset: u32,
    /// FTP location offset
    pub ftp_location_offset: u32,
    /// Misc offset
    pub misc_offset: u32,
    /// Var 2 offset
    pub var2_offset: u32,
    /// Target directory offset
    pub target_directory_offset: u32,
}

impl FileGroup {
    /// Unknown area between the attributes and the file range up to v5
    const V5_GAP: u64 = 0x36;

    pub(crate) fn read(
        cursor: &mut ByteCursor<'_>,
        strings: &Strings<'_>,
        major_version: u32,
    ) -> Result<Self> {
        let name_offset = cursor.read_u32_le()?;
        let expanded_size = cursor.read_u32_le()?;
        cursor.skip(4)?;
        let compressed_size = cursor.read_u32_le()?;
        cursor.skip(2)?;
        let attribute_1 = cursor.read_u16_le()?;
        let attribute_2 = cursor.read_u16_le()?;
        if major_version <= 5 {
            cursor.skip(Self::V5_GAP)?;
        }
        let first_file = cursor.read_u32_le()?;
        let last_file = cursor.read_u32_le()?;
        let mut offsets = [0u32; 8];
        for offset in &mut offsets {
            *offset = cursor.read_u32_le()?;
        }
        let [
            unknown_offset,
            var4_offset,
            var1_offset,
            http_location_offset,
            ftp_location_offset,
            misc_offset,
            var2_offset,
            target_directory_offset,
        ] = offsets;

        Ok(Self {
            name_offset,
            name: strings.get(name_offset)?,
            expanded_size,
            compressed_size,
            attribute_1,
            attribute_2,
            first_file,
            last_file,
            unknown_offset,
            var4_offset,
            var1_offset,
            http_location_offset,
            ftp_location_offset,
            misc_offset,
            var2_offset,
            target_directory_offset,
        })
    }
}

/// Component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Identifier offset
    pub identifier_offset: u32,
    /// Identifier
    pub identifier: String,
    /// Descriptor offset
    pub descriptor_offset: u32,
    /// Display name offset
    pub display_name_offset: u32,
    /// Display name
    pub display_name: Option<String>,
    /// Status
    pub status: u16,
    /// Password offset
    pub password_offset: u32,
    /// Misc offset
    pub misc_offset: u32,
    /// Component index
    pub component_index: u16,
    /// Name offset
    pub name_offset: u32,
    /// Name
    pub name: Option<String>,
    /// CD-ROM folder offset
    pub cd_rom_folder_offset: u32,
    /// HTTP location offset
    pub http_location_offset: u32,
    /// FTP location offset
    pub ftp_location_offset: u32,
    /// Two GUIDs
    pub guid: [u8; 0x20],
    /// CLSID offset
    pub clsid_offset: u32,
    /// Reserved, two bytes up to major version 5 and one byte afterwards
    pub reserved: Vec<u8>,
    /// Number of dependencies
    pub depends_count: u16,
    /// Dependencies offset
    pub depends_offset: u32,
    /// Number of file groups
    pub file_group_count: u16,
    /// Offset of the file group name offsets
    pub file_group_names_offset: u32,
    /// File group names
    pub file_group_names: Vec<String>,
    /// Number of X3 entries
    pub x3_count: u16,
    /// X3 offset
    pub x3_offset: u32,
    /// Number of sub-components
    pub sub_components_count: u16,
    /// Sub-components offset
    pub sub_components_offset: u32,
    /// Next component offset
    pub next_component_offset: u32,
    /// On-installing script offset
    pub on_installing_offset: u32,
    /// On-installed script offset
    pub on_installed_offset: u32,
    /// On-uninstalling script offset
    pub on_uninstalling_offset: u32,
    /// On-uninstalled script offset
    pub on_uninstalled_offset: u32,
}

impl Component {
    pub(crate) fn read(
        cursor: &mut ByteCursor<'_>,
        strings: &Strings<'_>,
        major_version: u32,
        limit: usize,
    ) -> Result<Self> {
        let optional = |offset: u32| (offset != 0).then(|| strings.get(offset).ok()).flatten();

        let identifier_offset = cursor.read_u32_le()?;
        let descriptor_offset = cursor.read_u32_le()?;
        let display_name_offset = cursor.read_u32_le()?;
        let status = cursor.read_u16_le()?;
        let password_offset = cursor.read_u32_le()?;
        let misc_offset = cursor.read_u32_le()?;
        let component_index = cursor.read_u16_le()?;
        let name_offset = cursor.read_u32_le()?;
        let cd_rom_folder_offset = cursor.read_u32_le()?;
        let http_location_offset = cursor.read_u32_le()?;
        let ftp_location_offset = cursor.read_u32_le()?;
        let guid = cursor.read_array::<0x20>()?;
        let clsid_offset = cursor.read_u32_le()?;
        cursor.skip(0x1C)?;
        let reserved = cursor.read_bytes(if major_version <= 5 { 2 } else { 1 })?;
        let depends_count = cursor.read_u16_le()?;
        let depends_offset = cursor.read_u32_le()?;
        let file_group_count = cursor.read_u16_le()?;
        let file_group_names_offset = cursor.read_u32_le()?;
        let x3_count = cursor.read_u16_le()?;
        let x3_offset = cursor.read_u32_le()?;
        let sub_components_count = cursor.read_u16_le()?;
        let sub_components_offset = cursor.read_u32_le()?;
        let next_component_offset = cursor.read_u32_le()?;
        let on_installing_offset = cursor.read_u32_le()?;
        let on_installed_offset = cursor.read_u32_le()?;
        let on_uninstalling_offset = cursor.read_u32_le()?;
        let on_uninstalled_offset = cursor.read_u32_le()?;

        let file_group_names = if file_group_count == 0 || file_group_names_offset == 0 {
            Vec::new()
        } else {
            let start = strings.base + u64::from(file_group_names_offset);
            let mut names = ByteCursor::at(cursor.data(), start)?;
            names.read_counted(u64::from(file_group_count), limit, |c| {
                let offset = c.read_u32_le()?;
                strings.get(offset)
            })?
        };

        Ok(Self {
            identifier_offset,
            identifier: strings.get(identifier_offset)?,
            descriptor_offset,
            display_name_offset,
            display_name: optional(display_name_offset),
            status,
            password_offset,
            misc_offset,
            component_index,
            name_offset,
            name: optional(name_offset),
            cd_rom_folder_offset,
            http_location_offset,
            ftp_location_offset,
            guid,
            clsid_offset,
            reserved,
            depends_count,
            depends_offset,
            file_group_count,
            file_group_names_offset,
            file_group_names,
            x3_count,
            x3_offset,
            sub_components_count,
            sub_components_offset,
            next_component_offset,
            on_installing_offset,
            on_installed_offset,
            on_uninstalling_offset,
            on_uninstalled_offset,
        })
    }
}
