//! Kind metadata table.
//!
//! Once stored, component bytes carry no type tag of their own. The
//! [`KindTable`] remembers, per [`ComponentKindId`], the fixed record size and
//! (when a Rust type has claimed the kind) its type name. Entries are created
//! on first use and never removed.

use std::collections::HashMap;

use crate::component::{Component, ComponentKindId};
use crate::error::ComponentError;

/// Metadata recorded for one component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Size of one record in bytes.
    pub size: usize,
    /// Type name, if a Rust type has claimed the kind. Kinds first seen in a
    /// snapshot have no name until typed code touches them.
    pub name: Option<&'static str>,
}

impl KindInfo {
    /// Metadata for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            name: Some(T::type_name()),
        }
    }

    /// Metadata for a kind known only by its record size.
    #[must_use]
    pub const fn sized(size: usize) -> Self {
        Self { size, name: None }
    }
}

/// Per-registry mapping from kind id to [`KindInfo`].
#[derive(Debug, Clone, Default)]
pub struct KindTable {
    kinds: HashMap<ComponentKindId, KindInfo>,
}

impl KindTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `info` for `kind`, or check it against the existing entry.
    ///
    /// A name fills in a previously anonymous entry. Sizes must always agree,
    /// and two distinct names may not share one id.
    ///
    /// # Errors
    ///
    /// [`ComponentError::SizeMismatch`] or [`ComponentError::NameCollision`].
    pub fn record(
        &mut self,
        kind: ComponentKindId,
        info: KindInfo,
    ) -> Result<KindInfo, ComponentError> {
        let entry = self.kinds.entry(kind).or_insert(info);
        if entry.size != info.size {
            return Err(ComponentError::SizeMismatch {
                kind,
                expected: entry.size,
                actual: info.size,
            });
        }
        match (entry.name, info.name) {
            (Some(existing), Some(requested)) if existing != requested => {
                return Err(ComponentError::NameCollision {
                    kind,
                    existing,
                    requested,
                });
            }
            (None, Some(requested)) => entry.name = Some(requested),
            _ => {}
        }
        Ok(*entry)
    }

    /// Metadata for `kind`, if it has been seen.
    #[must_use]
    pub fn get(&self, kind: ComponentKindId) -> Option<&KindInfo> {
        self.kinds.get(&kind)
    }

    /// Record size for `kind`, if it has been seen.
    #[must_use]
    pub fn size_of(&self, kind: ComponentKindId) -> Option<usize> {
        self.kinds.get(&kind).map(|info| info.size)
    }

    /// Returns `true` if `kind` has an entry.
    #[must_use]
    pub fn contains(&self, kind: ComponentKindId) -> bool {
        self.kinds.contains_key(&kind)
    }

    /// Number of known kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kind has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all entries in ascending kind id order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKindId, &KindInfo)> {
        let mut entries: Vec<_> = self.kinds.iter().map(|(&k, v)| (k, v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    #[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
    #[repr(C)]
    struct Transform {
        x: f32,
        y: f32,
    }

    impl Component for Transform {
        fn type_name() -> &'static str {
            "Transform"
        }
    }

    #[test]
    fn test_record_typed_kind() {
        let mut table = KindTable::new();
        let info = table
            .record(Transform::kind_id(), KindInfo::of::<Transform>())
            .unwrap();
        assert_eq!(info.size, 8);
        assert_eq!(info.name, Some("Transform"));
        assert_eq!(table.size_of(Transform::kind_id()), Some(8));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_anonymous_entry_gains_name() {
        let mut table = KindTable::new();
        table
            .record(Transform::kind_id(), KindInfo::sized(8))
            .unwrap();
        assert_eq!(table.get(Transform::kind_id()).unwrap().name, None);

        table
            .record(Transform::kind_id(), KindInfo::of::<Transform>())
            .unwrap();
        assert_eq!(
            table.get(Transform::kind_id()).unwrap().name,
            Some("Transform")
        );
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let mut table = KindTable::new();
        let kind = ComponentKindId(7);
        table.record(kind, KindInfo::sized(4)).unwrap();
        let err = table.record(kind, KindInfo::sized(12)).unwrap_err();
        assert_eq!(
            err,
            ComponentError::SizeMismatch {
                kind,
                expected: 4,
                actual: 12
            }
        );
        // The original entry is untouched.
        assert_eq!(table.size_of(kind), Some(4));
    }

    #[test]
    fn test_name_collision_is_rejected() {
        let mut table = KindTable::new();
        let kind = ComponentKindId(7);
        table
            .record(kind, KindInfo { size: 8, name: Some("A") })
            .unwrap();
        let err = table
            .record(kind, KindInfo { size: 8, name: Some("B") })
            .unwrap_err();
        assert!(matches!(err, ComponentError::NameCollision { .. }));
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut table = KindTable::new();
        table.record(ComponentKindId(3), KindInfo::sized(1)).unwrap();
        table.record(ComponentKindId(1), KindInfo::sized(2)).unwrap();
        table.record(ComponentKindId(2), KindInfo::sized(3)).unwrap();
        let ids: Vec<_> = table.iter().map(|(k, _)| k.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
