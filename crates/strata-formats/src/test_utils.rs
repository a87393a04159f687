//! Test utilities for building synthetic samples
//!
//! This module provides a small byte builder and the shared truncation and
//! printing checks used by every format's unit tests.

use crate::BinaryFormat;

/// Little helper for assembling sample files byte by byte
#[derive(Debug, Default, Clone)]
pub struct SampleBuilder {
    bytes: Vec<u8>,
}

impl SampleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn u8(self, value: u8) -> Self {
        self.bytes(&[value])
    }

    pub fn u16le(self, value: u16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u16be(self, value: u16) -> Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn u32le(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32be(self, value: u32) -> Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn u64le(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u64be(self, value: u64) -> Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn zeros(self, count: usize) -> Self {
        self.bytes(&vec![0; count])
    }

    /// Zero-pad up to an absolute length
    pub fn pad_to(self, length: usize) -> Self {
        let missing = length.saturating_sub(self.bytes.len());
        self.zeros(missing)
    }

    /// Fixed-width, NUL-padded ASCII text
    pub fn text(self, text: &str, width: usize) -> Self {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, 0);
        self.bytes(&field)
    }

    /// NUL-terminated ASCII text
    pub fn cstr(self, text: &str) -> Self {
        self.bytes(text.as_bytes()).u8(0)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Decode every prefix of `data` and print whatever comes out
///
/// Panics (failing the test) only if decoding or printing panics.
pub fn assert_truncation_safe<T: BinaryFormat>(data: &[u8]) {
    for length in 0..=data.len() {
        if let Ok(root) = T::decode(&data[..length], 0) {
            let _ = root.report();
        }
    }
}

/// Print a root twice and check the output is identical
pub fn assert_idempotent<T: BinaryFormat>(root: &T) -> String {
    let first = root.report();
    let mut second = String::new();
    root.print(&mut second);
    assert_eq!(first, second, "printing is not deterministic");
    first
}
