//! Error taxonomy shared by every format decoder

use thiserror::Error;
use tracing::debug;

/// Errors raised while decoding a structure
///
/// Everything except [`DecodeError::Io`] is recoverable: a decoder that hits
/// one of them while reading a sub-section drops that section and carries on
/// with its siblings. Only the primary header of a format is allowed to turn
/// a recoverable error into a failed root decode.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A primitive read asked for more bytes than remain
    #[error("read of {requested} bytes at offset {offset} exceeds data length {available}")]
    OutOfBounds {
        /// Absolute offset of the failed read
        offset: u64,
        /// Number of bytes requested
        requested: u64,
        /// Total length of the data
        available: u64,
    },

    /// A record ran past the end of the data
    #[error("{structure} truncated at offset {offset}")]
    Truncated {
        /// Record type being read
        structure: &'static str,
        /// Absolute offset where the record started
        offset: u64,
    },

    /// A signature or magic field did not match
    #[error("invalid {structure} magic at offset {offset}: {message}")]
    InvalidMagic {
        /// Record type being read
        structure: &'static str,
        /// Absolute offset where the record started
        offset: u64,
        /// Description of the mismatch
        message: String,
    },

    /// A recognized but unmodeled variant prevented decoding
    #[error("unsupported {what}: {value:#x}")]
    Unsupported {
        /// What was unsupported
        what: &'static str,
        /// Discriminant value found
        value: u64,
    },

    /// Nested structures went deeper than the configured ceiling
    #[error("nesting depth exceeds the limit of {limit}")]
    RecursionLimit {
        /// Configured ceiling
        limit: usize,
    },

    /// Any other `binrw` failure
    #[error("binary format error: {0}")]
    Binary(binrw::Error),

    /// I/O failure of the underlying source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Whether a decoder may substitute an absent section for this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Classify a `binrw` failure raised while reading `T` at `offset`
    pub(crate) fn from_binrw<T>(err: binrw::Error, offset: u64) -> Self {
        let structure = short_type_name::<T>();
        if err.is_eof() {
            return Self::Truncated { structure, offset };
        }
        match err {
            binrw::Error::AssertFail { message, .. } => Self::InvalidMagic {
                structure,
                offset,
                message,
            },
            binrw::Error::BadMagic { found, .. } => Self::InvalidMagic {
                structure,
                offset,
                message: format!("found {found:?}"),
            },
            binrw::Error::Backtrace(backtrace) => Self::from_binrw::<T>(*backtrace.error, offset),
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::Binary(other),
        }
    }
}

impl From<binrw::Error> for DecodeError {
    fn from(err: binrw::Error) -> Self {
        Self::from_binrw::<()>(err, 0)
    }
}

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Turn a recoverable failure into an absent section
///
/// Fatal errors are still returned so the caller can propagate them.
pub(crate) fn recover<T>(section: &'static str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_recoverable() => {
            debug!(section, %err, "section could not be decoded");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recover_drops_recoverable_errors() {
        let result: Result<u8> = Err(DecodeError::Truncated {
            structure: "Header",
            offset: 4,
        });
        assert!(recover("header", result).unwrap().is_none());
    }

    #[test]
    fn test_recover_propagates_io_errors() {
        let result: Result<u8> = Err(DecodeError::Io(std::io::Error::other("closed")));
        assert!(recover("header", result).is_err());
    }

    #[test]
    fn test_binrw_eof_is_truncation() {
        let err = binrw::Error::Io(std::io::ErrorKind::UnexpectedEof.into());
        let decoded = DecodeError::from_binrw::<u32>(err, 12);
        assert!(matches!(
            decoded,
            DecodeError::Truncated {
                structure: "u32",
                offset: 12
            }
        ));
    }

    #[test]
    fn test_binrw_assertion_is_invalid_magic() {
        let err = binrw::Error::AssertFail {
            pos: 0,
            message: "bad".to_string(),
        };
        let decoded = DecodeError::from_binrw::<u32>(err, 0);
        assert!(matches!(decoded, DecodeError::InvalidMagic { .. }));
        assert!(decoded.is_recoverable());
    }
}
