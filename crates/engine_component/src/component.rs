//! Core [`Component`] trait and kind identity.
//!
//! Every piece of data stored in a registry must implement [`Component`]. The
//! trait requires [`bytemuck::Pod`] so a record can be copied in and out of
//! type-erased storage as raw bytes without reinterpreting pointers.
//!
//! ## Stable kind identity
//!
//! [`ComponentKindId`] is derived from the component's **type name** using
//! the FNV-1a 64-bit hash. The id is reproducible across runs and platforms,
//! which is what lets a snapshot written by one build be read by another.

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

/// Identifies a component kind in pools, kind tables and snapshot records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentKindId(pub u64);

impl ComponentKindId {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    /// Hash `name`'s UTF-8 bytes. Usable in `const` context.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash = (hash ^ bytes[i] as u64).wrapping_mul(Self::PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The [`ComponentKindId`] of component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        T::kind_id()
    }

    /// Little-endian encoding used in snapshot records.
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Inverse of [`ComponentKindId::to_le_bytes`].
    #[must_use]
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }
}

impl std::fmt::Display for ComponentKindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// The core component trait.
///
/// Components are fixed-size plain-old-data: no pointers, no drop glue,
/// copyable as raw bytes. A new record starts as `Default::default()`.
///
/// # Examples
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Pod + Default + Send + Sync + 'static {
    /// A stable, human-readable name for this component kind.
    ///
    /// Renaming a component changes its kind id and orphans any snapshot
    /// records written under the old name.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentKindId`] for this component.
    fn kind_id() -> ComponentKindId {
        ComponentKindId::from_name(Self::type_name())
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::Zeroable;

    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
    #[repr(C)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    #[test]
    fn test_kind_id_matches_from_name() {
        assert_eq!(Health::kind_id(), ComponentKindId::from_name("Health"));
        assert_eq!(ComponentKindId::of::<Health>(), Health::kind_id());
    }

    #[test]
    fn test_kind_id_differs_between_types() {
        assert_ne!(Health::kind_id(), Velocity::kind_id());
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        // FNV-1a 64-bit of the empty string is the offset basis itself.
        assert_eq!(
            ComponentKindId::from_name(""),
            ComponentKindId(0xcbf2_9ce4_8422_2325)
        );
        assert_eq!(
            ComponentKindId::from_name("a"),
            ComponentKindId(0xaf63_dc4c_8601_ec8c)
        );
    }

    #[test]
    fn test_kind_id_le_bytes_roundtrip() {
        let id = Health::kind_id();
        assert_eq!(ComponentKindId::from_le_bytes(id.to_le_bytes()), id);
        assert_eq!(ComponentKindId(1).to_le_bytes(), [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_component_bytes_are_plain_data() {
        let health = Health {
            current: 80.0,
            max: 100.0,
        };
        let bytes = bytemuck::bytes_of(&health);
        assert_eq!(bytes.len(), std::mem::size_of::<Health>());
        let restored: Health = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(health, restored);
    }
}
