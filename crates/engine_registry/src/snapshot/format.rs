//! Snapshot header and format detection.

use crate::snapshot::error::SnapshotError;

/// Magic bytes opening a versioned snapshot.
pub const MAGIC: [u8; 4] = *b"SNOW";

/// Header version written by [`FormatVersion::V1`].
pub const CURRENT_VERSION: u16 = 1;

/// Length of the kind id leading every component record.
pub const KIND_ID_LEN: usize = 8;

/// Snapshot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// No header: the file starts with the entity count.
    Legacy,
    /// [`MAGIC`], version and a reserved word precede the entity count.
    V1,
}

impl FormatVersion {
    /// The 8-byte header this layout writes, if any.
    #[must_use]
    pub fn header(self) -> Option<[u8; 8]> {
        match self {
            Self::Legacy => None,
            Self::V1 => {
                let mut header = [0u8; 8];
                header[..4].copy_from_slice(&MAGIC);
                header[4..6].copy_from_slice(&CURRENT_VERSION.to_le_bytes());
                Some(header)
            }
        }
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::V1 => f.write_str("v1"),
        }
    }
}

/// What the first eight bytes of a snapshot turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// A v1 header; the entity count follows.
    Header(FormatVersion),
    /// No header; these bytes were the legacy entity count.
    LegacyCount(u64),
}

/// Classify the first eight bytes of a snapshot.
///
/// A legacy file whose entity count happens to begin with the magic bytes
/// would be misread, which would need more than 1.4e9 entities.
///
/// # Errors
///
/// [`SnapshotError::UnsupportedVersion`] or [`SnapshotError::MalformedHeader`]
/// for a header this build does not understand.
pub fn detect(prefix: [u8; 8]) -> Result<Prefix, SnapshotError> {
    if prefix[..4] != MAGIC {
        return Ok(Prefix::LegacyCount(u64::from_le_bytes(prefix)));
    }
    let version = u16::from_le_bytes([prefix[4], prefix[5]]);
    let reserved = u16::from_le_bytes([prefix[6], prefix[7]]);
    if version != CURRENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }
    if reserved != 0 {
        return Err(SnapshotError::MalformedHeader(reserved));
    }
    Ok(Prefix::Header(FormatVersion::V1))
}
