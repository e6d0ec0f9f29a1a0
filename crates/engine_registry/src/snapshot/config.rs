//! Snapshot configuration.

use crate::snapshot::format::FormatVersion;

/// Default I/O buffer size for snapshot files.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Configuration for a [`RegistrySerializer`](crate::RegistrySerializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Layout used when writing. Reading always auto-detects.
    pub format: FormatVersion,
    /// Capacity of the buffered reader / writer wrapped around files.
    pub buffer_capacity: usize,
}

impl SnapshotConfig {
    /// Create a config with the default buffer capacity.
    #[must_use]
    pub fn new(format: FormatVersion) -> Self {
        Self {
            format,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Override the written layout.
    #[must_use]
    pub fn with_format(mut self, format: FormatVersion) -> Self {
        self.format = format;
        self
    }

    /// Override the I/O buffer capacity.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new(FormatVersion::V1)
    }
}
