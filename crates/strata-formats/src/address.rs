//! Relative virtual address to file offset resolution

/// A table entry mapping a virtual range onto file data
pub trait SectionRange {
    /// Start of the virtual range
    fn virtual_address(&self) -> u64;

    /// Length of the virtual range
    fn virtual_size(&self) -> u64;

    /// File offset backing the start of the range
    fn raw_pointer(&self) -> u64;
}

/// Map `rva` to a file offset through `sections`
///
/// The first section whose `[virtual_address, virtual_address + virtual_size)`
/// range contains `rva` wins. Addresses outside every section resolve to 0,
/// which callers print as-is rather than treating as an error.
pub fn resolve_virtual_address<S: SectionRange>(rva: u64, sections: &[S]) -> u64 {
    find_virtual_address(rva, sections).unwrap_or(0)
}

/// Like [`resolve_virtual_address`], but `None` when no section maps `rva`
///
/// A section whose data starts at file offset 0 still maps its first byte
/// to `Some(0)`.
pub fn find_virtual_address<S: SectionRange>(rva: u64, sections: &[S]) -> Option<u64> {
    sections
        .iter()
        .find(|section| {
            let start = section.virtual_address();
            let end = start.saturating_add(section.virtual_size());
            (start..end).contains(&rva)
        })
        .map(|section| rva - section.virtual_address() + section.raw_pointer())
}
