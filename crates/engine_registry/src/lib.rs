//! # engine_registry
//!
//! The orchestrating layer over [`engine_component`]: a [`Registry`] that
//! owns entities, kind metadata and per-kind pools, keeps the per-entity kind
//! index in step with pool membership, runs multi-kind queries, and
//! round-trips itself through binary snapshots.
//!
//! - [`Registry`]: entity lifecycle, component CRUD, `for_each`, `execute`.
//! - [`ComponentSet`] / [`Query`]: tuple-based kind sets.
//! - [`RegistryError`]: invalid handles and kind disagreements.
//! - [`snapshot`]: [`RegistrySerializer`] and the file format.

pub mod error;
pub mod query;
pub mod registry;
pub mod snapshot;

pub use error::RegistryError;
pub use query::{ComponentSet, Query};
pub use registry::Registry;
pub use snapshot::{FormatVersion, RegistrySerializer, SnapshotConfig, SnapshotError, SnapshotStats};
