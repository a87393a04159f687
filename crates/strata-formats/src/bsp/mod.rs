//! Half-Life level (BSP v30) support
//!
//! - **Header**: version 30 followed by 15 `(offset, length)` lump entries
//! - **Texture Lump**: texture count, per-texture offsets, miptex headers

mod print;

use crate::cursor::{ByteCursor, Encoding};
use crate::error::recover;
use crate::{BinaryFormat, DecodeOptions, Result};
use binrw::BinRead;

/// Only supported BSP version
pub const BSP_VERSION: u32 = 30;

/// Number of lumps in a version 30 header
pub const LUMP_COUNT: usize = 15;

/// Index of the texture lump
pub const TEXTURES_LUMP: usize = 2;

/// Names of the 15 lumps, in header order
pub const LUMP_NAMES: [&str; LUMP_COUNT] = [
    "Entities",
    "Planes",
    "Textures",
    "Vertices",
    "Visibility",
    "Nodes",
    "Texture info",
    "Faces",
    "Lighting",
    "Clip nodes",
    "Leaves",
    "Mark surfaces",
    "Edges",
    "Surface edges",
    "Models",
];

/// Lump locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Lump {
    /// Offset of the lump data
    pub offset: u32,
    /// Length of the lump data
    pub length: u32,
}

/// Level header
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Header {
    /// Format version, always 30
    #[br(assert(version == BSP_VERSION, "expected version 30, got {}", version))]
    pub version: u32,
    /// Lump locators
    pub lumps: [Lump; LUMP_COUNT],
}

/// Header of the texture lump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHeader {
    /// Number of textures stated by the lump
    pub texture_count: u32,
    /// Texture offsets relative to the lump start
    pub offsets: Vec<u32>,
}

/// Miptex header of one embedded texture
#[derive(Debug, Clone, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Texture {
    /// Texture name
    #[br(map = |raw: [u8; 16]| Encoding::Ascii.decode_fixed(&raw))]
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Offsets of the four mip levels, 0 when the texture lives in a WAD
    pub offsets: [u32; 4],
}

/// Complete level file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// Level header
    pub header: Option<Header>,
    /// Texture lump header
    pub texture_header: Option<TextureHeader>,
    /// Textures, one slot per texture offset
    pub textures: Vec<Option<Texture>>,
}

impl BinaryFormat for File {
    const NAME: &'static str = "Half-Life Level";

    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::at(data, offset)?;
        let header: Header = cursor.read()?;

        let lump_start = offset + u64::from(header.lumps[TEXTURES_LUMP].offset);
        let texture_header = if header.lumps[TEXTURES_LUMP].length == 0 {
            None
        } else {
            recover(
                "bsp texture header",
                read_texture_header(data, lump_start, options),
            )?
        };

        let mut textures = Vec::new();
        if let Some(texture_header) = &texture_header {
            for &texture_offset in &texture_header.offsets {
                // -1 marks a texture slot with no data
                let texture = if texture_offset == u32::MAX {
                    None
                } else {
                    recover(
                        "bsp texture",
                        ByteCursor::at(data, lump_start + u64::from(texture_offset))
                            .and_then(|mut c| c.read::<Texture>()),
                    )?
                };
                textures.push(texture);
            }
        }

        Ok(Self {
            header: Some(header),
            texture_header,
            textures,
        })
    }

    fn print(&self, builder: &mut String) {
        print::print(builder, self);
    }
}

fn read_texture_header(data: &[u8], start: u64, options: &DecodeOptions) -> Result<TextureHeader> {
    let mut cursor = ByteCursor::at(data, start)?;
    let texture_count = cursor.read_u32_le()?;
    let offsets = cursor.read_counted(
        u64::from(texture_count),
        options.max_table_entries,
        ByteCursor::read_u32_le,
    )?;
    Ok(TextureHeader {
        texture_count,
        offsets,
    })
}
