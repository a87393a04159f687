//! Print the diagnostic report of a file.
//!
//! Usage:
//!   cargo run --example dump -p strata-formats -- <file> [format] [offset]
//!
//! Without a format the magic numbers at the start of the file pick one.
//! The format may be given by display name ("Portable Executable") or by
//! variant name ("PortableExecutable"), case-insensitively. Decoder limits
//! come from `STRATA_MAX_RESOURCE_DEPTH` and `STRATA_MAX_TABLE_ENTRIES`.
//!
//! Set `RUST_LOG=strata_formats=debug` to see which sections were dropped.

use anyhow::{Context, Result, bail};
use strata_formats::{DecodeOptions, FormatKind};
use tracing::info;

fn parse_kind(name: &str) -> Option<FormatKind> {
    FormatKind::ALL.into_iter().find(|kind| {
        kind.name().eq_ignore_ascii_case(name) || format!("{kind:?}").eq_ignore_ascii_case(name)
    })
}

fn parse_offset(text: &str) -> Result<u64> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid offset {text:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: dump <file> [format] [offset]");
    };
    let data = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;

    let kind = match args.next() {
        Some(name) => parse_kind(&name).with_context(|| {
            let known: Vec<_> = FormatKind::ALL.iter().map(|kind| kind.name()).collect();
            format!("unknown format {name:?}, expected one of: {}", known.join(", "))
        })?,
        None => FormatKind::sniff(&data).context("could not recognize the file format")?,
    };
    let offset = args.next().as_deref().map(parse_offset).transpose()?.unwrap_or(0);

    info!(%path, format = %kind, offset, size = data.len(), "decoding");

    let mut report = String::new();
    kind.dump_with(&data, offset, &DecodeOptions::from_env(), &mut report)
        .with_context(|| format!("{path} is not a valid {kind}"))?;
    print!("{report}");
    Ok(())
}
