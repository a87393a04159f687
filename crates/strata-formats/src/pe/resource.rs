//! Resource directory tree
//!
//! The tree has three levels in practice (type, name, language), but nothing
//! in the format stops a directory from pointing at itself, so recursion is
//! capped by [`DecodeOptions::max_resource_depth`](crate::DecodeOptions).

use super::{DataDirectory, Image};
use crate::cursor::{ByteCursor, Encoding};
use crate::error::{DecodeError, Result, recover};
use binrw::BinRead;
use tracing::warn;

/// High bit of a name or offset field
const HIGH_BIT: u32 = 0x8000_0000;

/// Resource type of string tables
pub const RT_STRING: u32 = 6;

/// Resource type of version information
pub const RT_VERSION: u32 = 16;

/// Resource type of side-by-side manifests
pub const RT_MANIFEST: u32 = 24;

/// Signature of `VS_FIXEDFILEINFO`
pub const FIXED_FILE_INFO_SIGNATURE: u32 = 0xFEEF_04BD;

/// Strings per string table block
const STRINGS_PER_BLOCK: u64 = 16;

/// Resource directory table header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ResourceDirectoryHeader {
    /// Reserved flags
    pub characteristics: u32,
    /// Time the resource data was created
    pub time_date_stamp: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Entries identified by name, stored first
    pub number_of_name_entries: u16,
    /// Entries identified by integer ID
    pub number_of_id_entries: u16,
}

/// Directory table and its entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirectoryTable {
    /// Table header
    pub header: ResourceDirectoryHeader,
    /// Name entries followed by ID entries
    pub entries: Vec<ResourceDirectoryEntry>,
}

/// How a directory entry is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceName {
    /// Integer ID
    Id(u32),
    /// UTF-16 name stored in the resource section
    Name(String),
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirectoryEntry {
    /// Name or ID
    pub name: ResourceName,
    /// Target, absent when it could not be decoded
    pub node: Option<ResourceNode>,
}

/// What a directory entry points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceNode {
    /// Another directory level
    Directory(ResourceDirectoryTable),
    /// Leaf describing resource data
    Data(ResourceDataEntry),
}

/// Leaf of the resource tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDataEntry {
    /// RVA of the resource data
    pub data_rva: u32,
    /// Size of the resource data
    pub size: u32,
    /// Code page used to decode code point values
    pub codepage: u32,
    /// Reserved
    pub reserved: u32,
    /// Resource data, interpreted by the type at the top of the tree
    pub data: Option<ResourceData>,
}

/// Resource data interpreted by resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceData {
    /// Block of 16 length-prefixed strings
    StringTable(Vec<String>),
    /// Version information
    Version(VersionInfo),
    /// Manifest text
    Manifest(String),
    /// Any other type, kept raw
    Unparsed(Vec<u8>),
}

/// Version information block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Length of the whole block
    pub length: u16,
    /// Length of the fixed file info
    pub value_length: u16,
    /// 0 for binary data, 1 for text
    pub value_type: u16,
    /// `VS_VERSION_INFO`
    pub key: String,
    /// Fixed file info, absent when `value_length` is zero
    pub fixed_file_info: Option<FixedFileInfo>,
}

/// `VS_FIXEDFILEINFO` (52 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct FixedFileInfo {
    /// Always 0xFEEF04BD
    #[br(assert(signature == FIXED_FILE_INFO_SIGNATURE, "bad fixed file info signature {:#x}", signature))]
    pub signature: u32,
    /// Structure version
    pub struct_version: u32,
    /// Most significant half of the file version
    pub file_version_ms: u32,
    /// Least significant half of the file version
    pub file_version_ls: u32,
    /// Most significant half of the product version
    pub product_version_ms: u32,
    /// Least significant half of the product version
    pub product_version_ls: u32,
    /// Valid bits in `file_flags`
    pub file_flags_mask: u32,
    /// File attributes
    pub file_flags: u32,
    /// Target operating system
    pub file_os: u32,
    /// General file type
    pub file_type: u32,
    /// Specific file type
    pub file_subtype: u32,
    /// Most significant half of the file date
    pub file_date_ms: u32,
    /// Least significant half of the file date
    pub file_date_ls: u32,
}

/// Read the whole resource tree described by `location`
pub(crate) fn read_resource_directory(
    image: &Image<'_>,
    location: &DataDirectory,
    max_depth: usize,
) -> Result<ResourceDirectoryTable> {
    let root = image
        .file_offset(location.virtual_address)
        .ok_or(DecodeError::Unsupported {
            what: "unmapped resource directory RVA",
            value: u64::from(location.virtual_address),
        })?;
    ResourceReader::new(image, root, max_depth).read_table(0, 0, None)
}

/// Walks the tree rooted at one resource section
struct ResourceReader<'i, 'a> {
    image: &'i Image<'a>,
    /// File offset of the root directory
    root: u64,
    max_depth: usize,
    /// Offsets of the directories currently being walked
    ancestors: Vec<u32>,
    /// Entries still allowed across the whole tree
    entries_left: usize,
}

impl<'i, 'a> ResourceReader<'i, 'a> {
    fn new(image: &'i Image<'a>, root: u64, max_depth: usize) -> Self {
        Self {
            image,
            root,
            max_depth,
            ancestors: Vec::new(),
            entries_left: image.limit,
        }
    }

    /// Read the directory at `offset` from the root, `depth` levels down
    ///
    /// `resource_type` is the ID of the top-level entry being walked. A
    /// directory that is one of its own ancestors is rejected, and the
    /// entries of the whole tree share one `max_table_entries` budget.
    fn read_table(
        &mut self,
        offset: u32,
        depth: usize,
        resource_type: Option<u32>,
    ) -> Result<ResourceDirectoryTable> {
        if depth > self.max_depth {
            warn!(depth, limit = self.max_depth, "resource tree nested too deep");
            return Err(DecodeError::RecursionLimit {
                limit: self.max_depth,
            });
        }
        if self.ancestors.contains(&offset) {
            warn!(offset, "resource directory refers to itself");
            return Err(DecodeError::Unsupported {
                what: "resource directory cycle",
                value: u64::from(offset),
            });
        }
        let mut cursor = ByteCursor::at(self.image.data, self.root + u64::from(offset))?;
        let header: ResourceDirectoryHeader = cursor.read()?;
        let count =
            u64::from(header.number_of_name_entries) + u64::from(header.number_of_id_entries);
        let mut raw_entries = cursor.read_counted(count, self.image.limit, |c| {
            Ok((c.read_u32_le()?, c.read_u32_le()?))
        })?;
        if raw_entries.len() > self.entries_left {
            warn!(limit = self.image.limit, "resource tree has too many entries");
            raw_entries.truncate(self.entries_left);
        }
        self.entries_left -= raw_entries.len();

        self.ancestors.push(offset);
        let entries = self.read_entries(raw_entries, depth, resource_type);
        self.ancestors.pop();
        Ok(ResourceDirectoryTable {
            header,
            entries: entries?,
        })
    }

    fn read_entries(
        &mut self,
        raw_entries: Vec<(u32, u32)>,
        depth: usize,
        resource_type: Option<u32>,
    ) -> Result<Vec<ResourceDirectoryEntry>> {
        let mut entries = Vec::with_capacity(raw_entries.len());
        for (name_field, target) in raw_entries {
            let name = self.read_name(name_field);
            let entry_type = match (depth, &name) {
                (0, ResourceName::Id(id)) => Some(*id),
                _ => resource_type,
            };
            let node = if target & HIGH_BIT == 0 {
                recover("pe resource data entry", self.read_data_entry(target, entry_type))?
                    .map(ResourceNode::Data)
            } else {
                recover(
                    "pe resource directory",
                    self.read_table(target & !HIGH_BIT, depth + 1, entry_type),
                )?
                .map(ResourceNode::Directory)
            };
            entries.push(ResourceDirectoryEntry { name, node });
        }
        Ok(entries)
    }

    fn read_name(&self, field: u32) -> ResourceName {
        if field & HIGH_BIT == 0 {
            return ResourceName::Id(field);
        }
        let read = || -> Result<String> {
            let offset = self.root + u64::from(field & !HIGH_BIT);
            let mut cursor = ByteCursor::at(self.image.data, offset)?;
            let length = cursor.read_u16_le()?;
            let bytes = cursor.take(u64::from(length) * 2)?;
            Ok(Encoding::Utf16Le.decode(bytes))
        };
        ResourceName::Name(read().unwrap_or_default())
    }

    fn read_data_entry(&self, offset: u32, resource_type: Option<u32>) -> Result<ResourceDataEntry> {
        let mut cursor = ByteCursor::at(self.image.data, self.root + u64::from(offset))?;
        let data_rva = cursor.read_u32_le()?;
        let size = cursor.read_u32_le()?;
        let codepage = cursor.read_u32_le()?;
        let reserved = cursor.read_u32_le()?;
        let data = self
            .image
            .cursor_at(data_rva)
            .and_then(|mut c| c.take(u64::from(size)).ok())
            .map(|bytes| interpret(bytes, resource_type));
        Ok(ResourceDataEntry {
            data_rva,
            size,
            codepage,
            reserved,
            data,
        })
    }
}

/// Interpret leaf bytes by resource type, falling back to raw bytes
fn interpret(bytes: &[u8], resource_type: Option<u32>) -> ResourceData {
    let parsed = match resource_type {
        Some(RT_STRING) => read_string_table(bytes).map(ResourceData::StringTable),
        Some(RT_VERSION) => read_version_info(bytes).map(ResourceData::Version),
        Some(RT_MANIFEST) => Ok(ResourceData::Manifest(Encoding::Utf8.decode(bytes))),
        _ => Ok(ResourceData::Unparsed(bytes.to_vec())),
    };
    parsed.unwrap_or_else(|_| ResourceData::Unparsed(bytes.to_vec()))
}

fn read_string_table(bytes: &[u8]) -> Result<Vec<String>> {
    let mut cursor = ByteCursor::new(bytes);
    cursor.read_counted(STRINGS_PER_BLOCK, usize::MAX, |c| {
        let length = c.read_u16_le()?;
        let units = c.take(u64::from(length) * 2)?;
        Ok(Encoding::Utf16Le.decode(units))
    })
}

fn read_version_info(bytes: &[u8]) -> Result<VersionInfo> {
    let mut cursor = ByteCursor::new(bytes);
    let length = cursor.read_u16_le()?;
    let value_length = cursor.read_u16_le()?;
    let value_type = cursor.read_u16_le()?;
    let key = cursor.read_cstring(Encoding::Utf16Le)?;
    cursor.align(4)?;
    let fixed_file_info = if value_length == 0 {
        None
    } else {
        recover("fixed file info", cursor.read::<FixedFileInfo>())?
    };
    Ok(VersionInfo {
        length,
        value_length,
        value_type,
        key,
        fixed_file_info,
    })
}
