//! Decoder configuration

/// Limits applied while decoding untrusted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest nesting allowed for recursive structures (PE resource trees)
    pub max_resource_depth: usize,

    /// Upper bound applied to any header-stated entry count
    pub max_table_entries: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_resource_depth: 32,
            max_table_entries: 65_536,
        }
    }
}

impl DecodeOptions {
    /// Create options from environment variables, falling back to defaults
    ///
    /// - `STRATA_MAX_RESOURCE_DEPTH`
    /// - `STRATA_MAX_TABLE_ENTRIES`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_resource_depth: env_or("STRATA_MAX_RESOURCE_DEPTH", defaults.max_resource_depth),
            max_table_entries: env_or("STRATA_MAX_TABLE_ENTRIES", defaults.max_table_entries),
        }
    }

    /// Override the resource depth ceiling
    pub fn with_max_resource_depth(mut self, depth: usize) -> Self {
        self.max_resource_depth = depth;
        self
    }

    /// Override the table entry ceiling
    pub fn with_max_table_entries(mut self, entries: usize) -> Self {
        self.max_table_entries = entries;
        self
    }
}

fn env_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.max_resource_depth, 32);
        assert_eq!(options.max_table_entries, 65_536);
    }

    #[test]
    fn test_builders() {
        let options = DecodeOptions::default()
            .with_max_resource_depth(4)
            .with_max_table_entries(10);
        assert_eq!(options.max_resource_depth, 4);
        assert_eq!(options.max_table_entries, 10);
    }
}
