//! Structural decoders and diagnostic printers for legacy binary formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::derive_partial_eq_without_eq)] // Binary format structs
#![allow(clippy::large_enum_variant)] // Record variants mirror on-disk sizes
#![allow(clippy::struct_excessive_bools)] // Flag-heavy headers
//! This crate reads dozens of legacy container and executable formats into
//! strongly-typed record trees and renders those trees as deterministic,
//! human-readable reports.
//!
//! # Supported Formats
//!
//! - **Executables**: MS-DOS (MZ), New Executable (NE), Linear Executable
//!   (LE/LX), Portable Executable (PE32/PE32+)
//! - **Nintendo**: 3DS cart images (NCSD/NCCH/ExeFS/RomFS), CIA archives,
//!   DS/DSi cart images
//! - **Valve**: WAD3, BSP, VPK, PAK, XZP, GCF, NCF
//! - **Installers**: InstallShield cabinets, Microsoft cabinets
//! - **Media protection**: AACS media key blocks, BD+ SVM
//! - **Other archives**: PlayJ audio/playlists, Quantum, Relic SGA, BFPK,
//!   NovaLogic PFF
//!
//! # Design Principles
//!
//! Every format follows the same pipeline:
//! raw bytes → [`cursor::ByteCursor`] → decoder → record tree → printer.
//!
//! - **Resilient decoding**: a table count is a hint, truncated or malformed
//!   sub-sections become `None`/empty instead of failing the whole decode.
//!   Only an unreadable primary header fails a root decode.
//! - **Tagged shapes**: records whose layout depends on a flag or version
//!   are enums, so inapplicable fields cannot be read.
//! - **Independent traversals**: printers never re-read bytes, they walk the
//!   finished tree and print placeholders (`No header`, `[NULL]`) for
//!   everything absent.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_formats::{BinaryFormat, pe};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("setup.exe")?;
//! let executable = pe::Executable::decode(&data, 0)?;
//!
//! let mut report = String::new();
//! executable.print(&mut report);
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod cursor;
pub mod error;
pub mod options;
pub mod printer;
pub mod registry;

/// AACS media key blocks
pub mod aacs;
/// BD+ security virtual machine images
pub mod bdplus;
/// BFPK archives
pub mod bfpk;
/// Half-Life level files
pub mod bsp;
/// CTR importable archives
pub mod cia;
/// Steam game cache files
pub mod gcf;
/// InstallShield cabinets
pub mod installshield;
/// Linear executables (LE/LX)
pub mod le;
/// Microsoft cabinets
pub mod mscab;
/// MS-DOS executables
pub mod mz;
/// Nintendo 3DS cart images
pub mod n3ds;
/// Steam no-cache files
pub mod ncf;
/// Nintendo DS and DSi cart images
pub mod nds;
/// New executables (NE)
pub mod ne;
/// Half-Life package files
pub mod pak;
/// Portable executables
pub mod pe;
/// NovaLogic PFF archives
pub mod pff;
/// PlayJ audio files and playlists
pub mod playj;
/// Quantum compressed archives
pub mod quantum;
/// Relic SGA archives
pub mod sga;
/// Directory structures shared by GCF and NCF
pub mod steam_cache;
/// Valve pack files
pub mod vpk;
/// Half-Life texture packages
pub mod wad;
/// Xbox package files
pub mod xzp;

pub use error::{DecodeError, Result};
pub use options::DecodeOptions;
pub use registry::FormatKind;

/// Decode and print pair implemented by every format root
pub trait BinaryFormat: Sized {
    /// Display name of the format
    const NAME: &'static str;

    /// Decode a root starting at `offset`, using explicit limits
    ///
    /// Returns an error only when the primary header cannot be read; every
    /// other problem leaves the affected section absent.
    fn decode_with(data: &[u8], offset: u64, options: &DecodeOptions) -> Result<Self>;

    /// Append this root's diagnostic report to `builder`
    fn print(&self, builder: &mut String);

    /// Decode a root starting at `offset` with default limits
    fn decode(data: &[u8], offset: u64) -> Result<Self> {
        Self::decode_with(data, offset, &DecodeOptions::default())
    }

    /// Render the diagnostic report into a fresh string
    fn report(&self) -> String {
        let mut builder = String::new();
        self.print(&mut builder);
        builder
    }
}

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;
