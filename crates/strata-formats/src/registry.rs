//! Compile-time registry of every supported format
//!
//! [`FormatKind`] pairs each format with its decoder and printer, and can
//! guess a format from the magic numbers at the start of a buffer. Formats
//! without a usable magic (PlayJ playlists) are never sniffed but can still
//! be dumped explicitly.

use crate::{BinaryFormat, DecodeOptions, Result};
use crate::{
    aacs, bdplus, bfpk, bsp, cia, gcf, installshield, le, mscab, mz, n3ds, ncf, nds, ne, pak, pe,
    pff, playj, quantum, sga, vpk, wad, xzp,
};
use std::fmt;

/// Offset of the new executable header pointer in an MZ stub
const NEW_EXE_POINTER_OFFSET: usize = 0x3C;

/// Offset and value of the Nintendo logo checksum in a DS cart header
const NDS_LOGO_CRC_OFFSET: usize = 0x15C;
const NDS_LOGO_CRC: u16 = 0xCF56;

/// Offset of the NCSD magic in a 3DS cart image
const NCSD_MAGIC_OFFSET: usize = 0x100;

/// Header size stated by every CIA archive
const CIA_HEADER_SIZE: u32 = 0x2020;

/// Every format with a decoder and a printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// AACS media key block
    AacsMediaKeyBlock,
    /// BD+ SVM image
    BdPlusSvm,
    /// BFPK archive
    Bfpk,
    /// Half-Life level
    Bsp,
    /// CTR importable archive
    Cia,
    /// Steam game cache
    Gcf,
    /// InstallShield cabinet
    InstallShieldCabinet,
    /// Linear executable
    LinearExecutable,
    /// Microsoft cabinet
    MicrosoftCabinet,
    /// MS-DOS executable
    MsDosExecutable,
    /// Nintendo 3DS cart image
    N3ds,
    /// Steam no-cache file
    Ncf,
    /// Nintendo DS cart image
    Nds,
    /// New executable
    NewExecutable,
    /// Half-Life package
    Pak,
    /// Portable executable
    PortableExecutable,
    /// NovaLogic PFF archive
    Pff,
    /// PlayJ audio file
    PlayJAudioFile,
    /// PlayJ playlist
    PlayJPlaylist,
    /// Quantum archive
    Quantum,
    /// Relic SGA archive
    Sga,
    /// Valve pack file
    Vpk,
    /// Half-Life texture package
    Wad,
    /// Xbox package
    Xzp,
}

impl FormatKind {
    /// Every registered format
    pub const ALL: [Self; 24] = [
        Self::AacsMediaKeyBlock,
        Self::BdPlusSvm,
        Self::Bfpk,
        Self::Bsp,
        Self::Cia,
        Self::Gcf,
        Self::InstallShieldCabinet,
        Self::LinearExecutable,
        Self::MicrosoftCabinet,
        Self::MsDosExecutable,
        Self::N3ds,
        Self::Ncf,
        Self::Nds,
        Self::NewExecutable,
        Self::Pak,
        Self::PortableExecutable,
        Self::Pff,
        Self::PlayJAudioFile,
        Self::PlayJPlaylist,
        Self::Quantum,
        Self::Sga,
        Self::Vpk,
        Self::Wad,
        Self::Xzp,
    ];

    /// Display name of the format
    pub fn name(self) -> &'static str {
        match self {
            Self::AacsMediaKeyBlock => aacs::MediaKeyBlock::NAME,
            Self::BdPlusSvm => bdplus::Svm::NAME,
            Self::Bfpk => bfpk::Archive::NAME,
            Self::Bsp => bsp::File::NAME,
            Self::Cia => cia::Cia::NAME,
            Self::Gcf => gcf::File::NAME,
            Self::InstallShieldCabinet => installshield::Cabinet::NAME,
            Self::LinearExecutable => le::Executable::NAME,
            Self::MicrosoftCabinet => mscab::Cabinet::NAME,
            Self::MsDosExecutable => mz::Executable::NAME,
            Self::N3ds => n3ds::Cart::NAME,
            Self::Ncf => ncf::File::NAME,
            Self::Nds => nds::Cart::NAME,
            Self::NewExecutable => ne::Executable::NAME,
            Self::Pak => pak::Package::NAME,
            Self::PortableExecutable => pe::Executable::NAME,
            Self::Pff => pff::Archive::NAME,
            Self::PlayJAudioFile => playj::AudioFile::NAME,
            Self::PlayJPlaylist => playj::Playlist::NAME,
            Self::Quantum => quantum::Archive::NAME,
            Self::Sga => sga::Archive::NAME,
            Self::Vpk => vpk::File::NAME,
            Self::Wad => wad::File::NAME,
            Self::Xzp => xzp::File::NAME,
        }
    }

    /// Guess the format of `data` from its magic numbers
    ///
    /// Executables are refined through the MZ stub: a stub pointing at a
    /// `PE\0\0`, `LE`/`LX` or `NE` header reports that format instead.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let starts = |magic: &[u8]| data.starts_with(magic);
        let at = |offset: usize, magic: &[u8]| {
            data.get(offset..offset + magic.len()) == Some(magic)
        };

        if starts(&mz::MZ_SIGNATURE) {
            return Some(sniff_executable(data));
        }
        if starts(&bdplus::SIGNATURE) {
            return Some(Self::BdPlusSvm);
        }
        if starts(&sga::SGA_SIGNATURE) {
            return Some(Self::Sga);
        }
        if starts(&mscab::SIGNATURE) {
            return Some(Self::MicrosoftCabinet);
        }
        if starts(&installshield::SIGNATURE) {
            return Some(Self::InstallShieldCabinet);
        }
        if starts(&bfpk::BFPK_MAGIC) {
            return Some(Self::Bfpk);
        }
        if starts(&pak::PAK_MAGIC) {
            return Some(Self::Pak);
        }
        if starts(&wad::WAD_MAGIC) {
            return Some(Self::Wad);
        }
        if starts(&xzp::XZP_SIGNATURE) {
            return Some(Self::Xzp);
        }
        if starts(&vpk::VPK_SIGNATURE.to_le_bytes()) {
            return Some(Self::Vpk);
        }
        if starts(&playj::SIGNATURE.to_le_bytes()) {
            return Some(Self::PlayJAudioFile);
        }
        if [pff::SIGNATURE_PFF2, pff::SIGNATURE_PFF3, pff::SIGNATURE_PFF4]
            .iter()
            .any(|signature| at(4, signature))
        {
            return Some(Self::Pff);
        }
        if at(NCSD_MAGIC_OFFSET, &n3ds::NCSD_MAGIC) {
            return Some(Self::N3ds);
        }
        if at(NDS_LOGO_CRC_OFFSET, &NDS_LOGO_CRC.to_le_bytes()) {
            return Some(Self::Nds);
        }
        if starts(&CIA_HEADER_SIZE.to_le_bytes()) {
            return Some(Self::Cia);
        }
        if starts(&1u32.to_le_bytes()) {
            if at(4, &gcf::GCF_MAJOR_VERSION.to_le_bytes()) {
                return Some(Self::Gcf);
            }
            if at(4, &ncf::NCF_MAJOR_VERSION.to_le_bytes()) {
                return Some(Self::Ncf);
            }
        }
        if starts(&bsp::BSP_VERSION.to_le_bytes()) {
            return Some(Self::Bsp);
        }
        if starts(&[aacs::RECORD_TYPE_AND_VERSION, 0, 0, 12]) {
            return Some(Self::AacsMediaKeyBlock);
        }
        if starts(&quantum::SIGNATURE) {
            return Some(Self::Quantum);
        }
        None
    }

    /// Decode `data` at `offset` as this format and append its report
    ///
    /// Fails only when the format's primary header cannot be decoded.
    pub fn dump(self, data: &[u8], offset: u64, builder: &mut String) -> Result<()> {
        self.dump_with(data, offset, &DecodeOptions::default(), builder)
    }

    /// [`FormatKind::dump`] with explicit decoder limits
    pub fn dump_with(
        self,
        data: &[u8],
        offset: u64,
        options: &DecodeOptions,
        builder: &mut String,
    ) -> Result<()> {
        match self {
            Self::AacsMediaKeyBlock => dump::<aacs::MediaKeyBlock>(data, offset, options, builder),
            Self::BdPlusSvm => dump::<bdplus::Svm>(data, offset, options, builder),
            Self::Bfpk => dump::<bfpk::Archive>(data, offset, options, builder),
            Self::Bsp => dump::<bsp::File>(data, offset, options, builder),
            Self::Cia => dump::<cia::Cia>(data, offset, options, builder),
            Self::Gcf => dump::<gcf::File>(data, offset, options, builder),
            Self::InstallShieldCabinet => {
                dump::<installshield::Cabinet>(data, offset, options, builder)
            }
            Self::LinearExecutable => dump::<le::Executable>(data, offset, options, builder),
            Self::MicrosoftCabinet => dump::<mscab::Cabinet>(data, offset, options, builder),
            Self::MsDosExecutable => dump::<mz::Executable>(data, offset, options, builder),
            Self::N3ds => dump::<n3ds::Cart>(data, offset, options, builder),
            Self::Ncf => dump::<ncf::File>(data, offset, options, builder),
            Self::Nds => dump::<nds::Cart>(data, offset, options, builder),
            Self::NewExecutable => dump::<ne::Executable>(data, offset, options, builder),
            Self::Pak => dump::<pak::Package>(data, offset, options, builder),
            Self::PortableExecutable => dump::<pe::Executable>(data, offset, options, builder),
            Self::Pff => dump::<pff::Archive>(data, offset, options, builder),
            Self::PlayJAudioFile => dump::<playj::AudioFile>(data, offset, options, builder),
            Self::PlayJPlaylist => dump::<playj::Playlist>(data, offset, options, builder),
            Self::Quantum => dump::<quantum::Archive>(data, offset, options, builder),
            Self::Sga => dump::<sga::Archive>(data, offset, options, builder),
            Self::Vpk => dump::<vpk::File>(data, offset, options, builder),
            Self::Wad => dump::<wad::File>(data, offset, options, builder),
            Self::Xzp => dump::<xzp::File>(data, offset, options, builder),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn dump<T: BinaryFormat>(
    data: &[u8],
    offset: u64,
    options: &DecodeOptions,
    builder: &mut String,
) -> Result<()> {
    T::decode_with(data, offset, options)?.print(builder);
    Ok(())
}

fn sniff_executable(data: &[u8]) -> FormatKind {
    let header_offset = data
        .get(NEW_EXE_POINTER_OFFSET..NEW_EXE_POINTER_OFFSET + 4)
        .and_then(|raw| <[u8; 4]>::try_from(raw).ok())
        .and_then(|raw| usize::try_from(u32::from_le_bytes(raw)).ok());
    let Some(header) = header_offset.and_then(|offset| data.get(offset..)) else {
        return FormatKind::MsDosExecutable;
    };

    if header.starts_with(&pe::PE_SIGNATURE) {
        FormatKind::PortableExecutable
    } else if header.starts_with(&le::LE_SIGNATURE) || header.starts_with(&le::LX_SIGNATURE) {
        FormatKind::LinearExecutable
    } else if header.starts_with(&ne::NE_SIGNATURE) {
        FormatKind::NewExecutable
    } else {
        FormatKind::MsDosExecutable
    }
}
