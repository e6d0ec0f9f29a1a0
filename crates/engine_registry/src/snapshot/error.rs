//! Snapshot error types.

use std::path::PathBuf;

use engine_component::Entity;

use crate::error::RegistryError;

/// Errors that can occur while writing or reading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file could not be created or opened.
    #[error("cannot open snapshot {}: {source}", path.display())]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading, writing or flushing the stream failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file announces a header version this build cannot read.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),

    /// The header's reserved field is not zero.
    #[error("malformed snapshot header (reserved field {0:#06x})")]
    MalformedHeader(u16),

    /// A record does not fit the payload length declared for its entity.
    #[error(
        "entity #{index} declares {declared} payload bytes but a record of {record} bytes \
         arrives after {consumed}"
    )]
    PayloadMismatch {
        /// Position of the entity in the file.
        index: u64,
        /// Payload length declared for the entity.
        declared: u32,
        /// Bytes consumed before the offending record.
        consumed: u64,
        /// Size of the offending record.
        record: u64,
    },

    /// A record is too short to hold its leading kind id.
    #[error("component record of {0} bytes is shorter than its kind id")]
    RecordTooShort(u64),

    /// An entity's components do not fit in a `u32` payload length.
    #[error("{entity} carries {bytes} component bytes, more than a snapshot entity can hold")]
    PayloadOverflow {
        /// The entity being written.
        entity: Entity,
        /// Total record bytes.
        bytes: u64,
    },

    /// Attaching a loaded component to the registry failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
