//! Binary snapshots of a [`Registry`](crate::Registry).
//!
//! - [`format`]: header constants, [`FormatVersion`] and detection.
//! - [`codec`]: little-endian framing helpers over `Read` / `Write`.
//! - [`config`]: [`SnapshotConfig`].
//! - [`serializer`]: [`RegistrySerializer`], the file-level entry point.
//! - [`error`]: [`SnapshotError`].
//!
//! ## Layout
//!
//! ```text
//! File            := Header? EntityCount:u64 Entity*
//! Header          := "SNOW" Version:u16 Reserved:u16      (v1 only)
//! Entity          := PayloadLength:u32 ComponentRecord*
//! ComponentRecord := Size:u64 KindId:u64 Payload[Size - 8]
//! ```
//!
//! Integers are little-endian. `PayloadLength` is the sum of the entity's
//! record `Size`s. Component payloads are the records' plain-old-data bytes.

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod serializer;

pub use config::SnapshotConfig;
pub use error::SnapshotError;
pub use format::FormatVersion;
pub use serializer::{RegistrySerializer, SnapshotStats};
