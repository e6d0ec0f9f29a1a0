//! Per-kind component pools.
//!
//! A pool stores, for every entity holding its kind, one fixed-size record.
//! Registries keep pools behind the [`ComponentPool`] capability trait, keyed
//! by [`ComponentKindId`], and reach typed storage only through checked
//! [`Any`] downcasts.
//!
//! Two implementations exist:
//!
//! - [`TypedPool<T>`]: records stored as `T`, used whenever Rust code names
//!   the kind.
//! - [`RawPool`]: records stored as bytes, used for kinds ingested from a
//!   snapshot before any Rust type has claimed them. A raw pool is promoted
//!   with [`RawPool::to_typed`] on first typed access.

use std::any::Any;
use std::collections::HashMap;

use crate::component::{Component, ComponentKindId};
use crate::entity::Entity;
use crate::error::ComponentError;

/// Type-erased capability set shared by every pool.
pub trait ComponentPool: Any {
    /// The kind this pool stores.
    fn kind(&self) -> ComponentKindId;

    /// Size of one record in bytes.
    fn item_size(&self) -> usize;

    /// Number of registered entities.
    fn len(&self) -> usize;

    /// Returns `true` if no entity is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `entity` has a record in this pool.
    fn is_registered(&self, entity: Entity) -> bool;

    /// Store a copy of `bytes` for `entity` unless it is already registered.
    ///
    /// The first registration wins; returns `true` if a record was inserted.
    ///
    /// # Errors
    ///
    /// [`ComponentError::SizeMismatch`] if `bytes` is not exactly
    /// [`item_size`](ComponentPool::item_size) long.
    fn register_bytes(&mut self, entity: Entity, bytes: &[u8]) -> Result<bool, ComponentError>;

    /// Remove the record for `entity`. Returns `true` if one existed.
    fn deregister(&mut self, entity: Entity) -> bool;

    /// A copy of the raw record bytes for `entity`.
    fn component_bytes(&self, entity: Entity) -> Option<Vec<u8>>;

    /// Upcast for checked downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for checked mutable downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

fn check_size(kind: ComponentKindId, expected: usize, bytes: &[u8]) -> Result<(), ComponentError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(ComponentError::SizeMismatch {
            kind,
            expected,
            actual: bytes.len(),
        })
    }
}

/// Typed storage for component kind `T`.
#[derive(Debug)]
pub struct TypedPool<T: Component> {
    records: HashMap<Entity, T>,
}

impl<T: Component> TypedPool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Register `value` for `entity` unless it already has a record.
    ///
    /// Returns `true` if the value was inserted.
    pub fn register(&mut self, entity: Entity, value: T) -> bool {
        match self.records.entry(entity) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Shared reference to the record for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.records.get(&entity)
    }

    /// Mutable reference to the record for `entity`.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.records.get_mut(&entity)
    }

    /// Iterate over all `(entity, &record)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.records.iter().map(|(&e, v)| (e, v))
    }
}

impl<T: Component> Default for TypedPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentPool for TypedPool<T> {
    fn kind(&self) -> ComponentKindId {
        T::kind_id()
    }

    fn item_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_registered(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    fn register_bytes(&mut self, entity: Entity, bytes: &[u8]) -> Result<bool, ComponentError> {
        check_size(T::kind_id(), self.item_size(), bytes)?;
        Ok(self.register(entity, bytemuck::pod_read_unaligned(bytes)))
    }

    fn deregister(&mut self, entity: Entity) -> bool {
        self.records.remove(&entity).is_some()
    }

    fn component_bytes(&self, entity: Entity) -> Option<Vec<u8>> {
        self.records
            .get(&entity)
            .map(|value| bytemuck::bytes_of(value).to_vec())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Byte storage for a kind no Rust type has claimed yet.
#[derive(Debug, Clone)]
pub struct RawPool {
    kind: ComponentKindId,
    item_size: usize,
    records: HashMap<Entity, Box<[u8]>>,
}

impl RawPool {
    /// Create an empty pool of `item_size`-byte records.
    #[must_use]
    pub fn new(kind: ComponentKindId, item_size: usize) -> Self {
        Self {
            kind,
            item_size,
            records: HashMap::new(),
        }
    }

    /// Raw record bytes for `entity`, without copying.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&[u8]> {
        self.records.get(&entity).map(AsRef::as_ref)
    }

    /// Decode every record as `T` and return the equivalent typed pool.
    ///
    /// # Errors
    ///
    /// [`ComponentError::SizeMismatch`] if `T` does not have this pool's
    /// record size.
    pub fn to_typed<T: Component>(&self) -> Result<TypedPool<T>, ComponentError> {
        let expected = std::mem::size_of::<T>();
        if expected != self.item_size {
            return Err(ComponentError::SizeMismatch {
                kind: self.kind,
                expected: self.item_size,
                actual: expected,
            });
        }
        let records = self
            .records
            .iter()
            .map(|(&entity, bytes)| (entity, bytemuck::pod_read_unaligned::<T>(bytes)))
            .collect();
        Ok(TypedPool { records })
    }
}

impl ComponentPool for RawPool {
    fn kind(&self) -> ComponentKindId {
        self.kind
    }

    fn item_size(&self) -> usize {
        self.item_size
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_registered(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    fn register_bytes(&mut self, entity: Entity, bytes: &[u8]) -> Result<bool, ComponentError> {
        check_size(self.kind, self.item_size, bytes)?;
        if self.records.contains_key(&entity) {
            return Ok(false);
        }
        self.records.insert(entity, bytes.into());
        Ok(true)
    }

    fn deregister(&mut self, entity: Entity) -> bool {
        self.records.remove(&entity).is_some()
    }

    fn component_bytes(&self, entity: Entity) -> Option<Vec<u8>> {
        self.records.get(&entity).map(|bytes| bytes.to_vec())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
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
    fn test_first_registration_wins() {
        let mut pool = TypedPool::<Transform>::new();
        let e = Entity(0);
        assert!(pool.register(e, Transform { x: 1.0, y: 2.0 }));
        assert!(!pool.register(e, Transform::default()));
        assert_eq!(pool.get(e), Some(&Transform { x: 1.0, y: 2.0 }));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_deregister() {
        let mut pool = TypedPool::<Transform>::new();
        let e = Entity(3);
        pool.register(e, Transform::default());
        assert!(pool.is_registered(e));
        assert!(pool.deregister(e));
        assert!(!pool.is_registered(e));
        assert!(!pool.deregister(e));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_typed_pool_bytes_roundtrip() {
        let mut pool = TypedPool::<Transform>::new();
        let e = Entity(1);
        pool.register(e, Transform { x: 4.0, y: -1.5 });

        let bytes = pool.component_bytes(e).unwrap();
        assert_eq!(bytes.len(), 8);

        let mut other = TypedPool::<Transform>::new();
        assert!(other.register_bytes(Entity(9), &bytes).unwrap());
        assert_eq!(other.get(Entity(9)), Some(&Transform { x: 4.0, y: -1.5 }));
    }

    #[test]
    fn test_register_bytes_rejects_wrong_size() {
        let mut pool = TypedPool::<Transform>::new();
        let err = pool.register_bytes(Entity(0), &[0u8; 4]).unwrap_err();
        assert!(matches!(
            err,
            ComponentError::SizeMismatch {
                expected: 8,
                actual: 4,
                ..
            }
        ));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_raw_pool_promotion() {
        let mut raw = RawPool::new(Transform::kind_id(), 8);
        let value = Transform { x: 10.0, y: 20.0 };
        raw.register_bytes(Entity(2), bytemuck::bytes_of(&value))
            .unwrap();
        assert_eq!(raw.get(Entity(2)), Some(bytemuck::bytes_of(&value)));

        let typed = raw.to_typed::<Transform>().unwrap();
        assert_eq!(typed.get(Entity(2)), Some(&value));
    }

    #[test]
    fn test_raw_pool_promotion_size_mismatch() {
        let raw = RawPool::new(Transform::kind_id(), 12);
        assert!(raw.to_typed::<Transform>().is_err());
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let mut pool: Box<dyn ComponentPool> = Box::new(TypedPool::<Transform>::new());
        pool.register_bytes(Entity(0), &[0u8; 8]).unwrap();
        assert!(pool.as_any().is::<TypedPool<Transform>>());
        assert!(pool.as_any().downcast_ref::<RawPool>().is_none());
        let typed = pool
            .as_any_mut()
            .downcast_mut::<TypedPool<Transform>>()
            .unwrap();
        typed.get_mut(Entity(0)).unwrap().x = 5.0;
        assert_eq!(pool.kind(), Transform::kind_id());
        assert_eq!(pool.item_size(), 8);
    }
}
