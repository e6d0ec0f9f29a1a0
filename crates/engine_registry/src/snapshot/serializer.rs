//! Registry serializer.
//!
//! Writes every live entity, in live-list order, with its components in the
//! order they were attached. Reading needs no Rust types: each record carries
//! its kind id and size, and lands in the target registry through the raw
//! ingestion path. Typed code can pick the values up afterwards.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use engine_component::ComponentKindId;

use crate::registry::Registry;
use crate::snapshot::codec::{read_array, read_bytes, read_u32, read_u64, write_u32, write_u64};
use crate::snapshot::config::SnapshotConfig;
use crate::snapshot::error::SnapshotError;
use crate::snapshot::format::{self, FormatVersion, KIND_ID_LEN, Prefix};

/// Counts reported after a snapshot is written or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotStats {
    /// Layout of the stream.
    pub format: FormatVersion,
    /// Entities written or created.
    pub entities: u64,
    /// Component records written or attached.
    pub components: u64,
}

impl SnapshotStats {
    fn new(format: FormatVersion) -> Self {
        Self {
            format,
            entities: 0,
            components: 0,
        }
    }
}

/// Writes registries to, and restores them from, binary snapshots.
#[derive(Debug, Clone, Default)]
pub struct RegistrySerializer {
    config: SnapshotConfig,
}

impl RegistrySerializer {
    /// Create a serializer with the given configuration.
    #[must_use]
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Write `registry` to the file at `path`, replacing it.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Open`] if the file cannot be created,
    /// [`SnapshotError::Io`] if writing or flushing fails, and
    /// [`SnapshotError::PayloadOverflow`] for an oversized entity. The file
    /// may hold a partial snapshot after a failure.
    pub fn serialize(
        &self,
        registry: &Registry,
        path: impl AsRef<Path>,
    ) -> Result<SnapshotStats, SnapshotError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SnapshotError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::with_capacity(self.config.buffer_capacity, file);
        let stats = self.write_to(registry, &mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        info!(
            path = %path.display(),
            format = %stats.format,
            entities = stats.entities,
            components = stats.components,
            "snapshot written"
        );
        Ok(stats)
    }

    /// Load the snapshot at `path` into `registry`.
    ///
    /// Every entity in the file becomes a freshly created entity, appended
    /// after any already live in `registry`.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Open`] if the file cannot be opened; any other
    /// variant for I/O failure or corruption. Entities created before the
    /// failure stay in `registry`.
    pub fn deserialize(
        &self,
        registry: &mut Registry,
        path: impl AsRef<Path>,
    ) -> Result<SnapshotStats, SnapshotError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SnapshotError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::with_capacity(self.config.buffer_capacity, file);
        let stats = self.read_from(registry, reader)?;

        info!(
            path = %path.display(),
            format = %stats.format,
            entities = stats.entities,
            components = stats.components,
            "snapshot loaded"
        );
        Ok(stats)
    }

    /// Write `registry` to `writer` in the configured layout.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Io`] or [`SnapshotError::PayloadOverflow`].
    pub fn write_to<W: Write>(
        &self,
        registry: &Registry,
        mut writer: W,
    ) -> Result<SnapshotStats, SnapshotError> {
        let mut stats = SnapshotStats::new(self.config.format);
        if let Some(header) = self.config.format.header() {
            writer.write_all(&header)?;
        }
        write_u64(&mut writer, registry.entity_count() as u64)?;

        for &entity in registry.entities() {
            let records: Vec<(ComponentKindId, Vec<u8>)> = registry
                .entity_kinds(entity)?
                .iter()
                .filter_map(|&kind| Some((kind, registry.component_bytes(entity, kind)?)))
                .collect();

            let payload: u64 = records
                .iter()
                .map(|(_, bytes)| (KIND_ID_LEN + bytes.len()) as u64)
                .sum();
            let payload = u32::try_from(payload).map_err(|_| SnapshotError::PayloadOverflow {
                entity,
                bytes: payload,
            })?;
            write_u32(&mut writer, payload)?;

            for (kind, bytes) in &records {
                write_u64(&mut writer, (KIND_ID_LEN + bytes.len()) as u64)?;
                writer.write_all(&kind.to_le_bytes())?;
                writer.write_all(bytes)?;
            }

            debug!(%entity, payload, components = records.len(), "entity written");
            stats.entities += 1;
            stats.components += records.len() as u64;
        }

        writer.flush()?;
        Ok(stats)
    }

    /// Read a snapshot of either layout from `reader` into `registry`.
    ///
    /// # Errors
    ///
    /// See [`RegistrySerializer::deserialize`].
    pub fn read_from<R: Read>(
        &self,
        registry: &mut Registry,
        mut reader: R,
    ) -> Result<SnapshotStats, SnapshotError> {
        let (format, count) = match format::detect(read_array(&mut reader)?)? {
            Prefix::Header(format) => (format, read_u64(&mut reader)?),
            Prefix::LegacyCount(count) => (FormatVersion::Legacy, count),
        };
        debug!(%format, count, "reading snapshot");

        let mut stats = SnapshotStats::new(format);
        for index in 0..count {
            let declared = read_u32(&mut reader)?;
            let entity = registry.create_entity();
            stats.entities += 1;

            let mut consumed = 0u64;
            while consumed < u64::from(declared) {
                let size = read_u64(&mut reader)?;
                if size > u64::from(declared) - consumed {
                    return Err(SnapshotError::PayloadMismatch {
                        index,
                        declared,
                        consumed,
                        record: size,
                    });
                }
                if size < KIND_ID_LEN as u64 {
                    return Err(SnapshotError::RecordTooShort(size));
                }

                let kind = ComponentKindId::from_le_bytes(read_array(&mut reader)?);
                // `size` is bounded by a u32 payload length here.
                let payload = read_bytes(&mut reader, size as usize - KIND_ID_LEN)?;
                registry.add_component_from_data(&payload, kind, entity)?;

                consumed += size;
                stats.components += 1;
            }
        }
        Ok(stats)
    }
}
