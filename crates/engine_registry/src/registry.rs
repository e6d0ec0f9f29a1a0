//! The entity registry.
//!
//! The [`Registry`] owns the entity allocator, the kind metadata table, one
//! pool per component kind, and the per-entity list of attached kinds. The
//! last two must always agree: an entity is registered in a pool iff that
//! pool's kind appears in the entity's list. Every mutating operation below
//! updates both or neither.

use std::collections::HashMap;

use tracing::trace;

use engine_component::{
    Component, ComponentKindId, ComponentPool, Entity, EntityAllocator, KindInfo, KindTable,
    RawPool, TypedPool,
};

use crate::error::RegistryError;
use crate::query::{ComponentSet, Query};

type PoolMap = HashMap<ComponentKindId, Box<dyn ComponentPool>>;

/// Entity set, component pools and per-entity kind index.
#[derive(Default)]
pub struct Registry {
    /// Live entity handles.
    allocator: EntityAllocator,
    /// Record size (and type name) per kind.
    kinds: KindTable,
    /// One pool per kind seen so far.
    pools: PoolMap,
    /// Kinds attached to each live entity, in insertion order.
    entity_kinds: HashMap<Entity, Vec<ComponentKindId>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.allocator.len())
            .field("kinds", &self.kinds.len())
            .field("pools", &self.pools.len())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a new entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entity_kinds.insert(entity, Vec::new());
        trace!(%entity, "entity created");
        entity
    }

    /// Destroy `entity`, detaching every component it holds.
    ///
    /// On success the caller's handle is overwritten with
    /// [`Entity::INVALID`] so later use is detectable. Returns `false`, and
    /// changes nothing, for the sentinel or a handle that is not live.
    pub fn destroy_entity(&mut self, entity: &mut Entity) -> bool {
        if !self.allocator.deallocate(*entity) {
            return false;
        }
        for kind in self.entity_kinds.remove(&*entity).unwrap_or_default() {
            if let Some(pool) = self.pools.get_mut(&kind) {
                pool.deregister(*entity);
            }
        }
        trace!(entity = %*entity, "entity destroyed");
        *entity = Entity::INVALID;
        true
    }

    /// Returns `true` if `entity` is live.
    #[must_use]
    pub fn validate_entity(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Live entities in live-list order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.allocator.live()
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.len()
    }

    // -- Component operations --

    /// Attach a default-constructed `T` to `entity` and return it.
    ///
    /// If the entity already holds a `T`, the existing value is kept and
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle;
    /// [`RegistryError::Kind`] / [`RegistryError::KindCollision`] if `T`
    /// disagrees with what is already recorded for its kind id.
    pub fn add_component<T: Component>(&mut self, entity: Entity) -> Result<&mut T, RegistryError> {
        self.ensure_alive(entity)?;
        let kind = T::kind_id();
        let pool = Self::typed_pool_in::<T>(&mut self.kinds, &mut self.pools)?;
        if pool.register(entity, T::default()) {
            self.entity_kinds.entry(entity).or_default().push(kind);
        }
        pool.get_mut(entity).ok_or(RegistryError::MissingComponent {
            entity,
            component: T::type_name(),
        })
    }

    /// Mutable access to `entity`'s `T`, or `None` if it has none.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn try_get_component<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<Option<&mut T>, RegistryError> {
        self.ensure_alive(entity)?;
        if !self.has_kind(entity, T::kind_id()) {
            return Ok(None);
        }
        Ok(self.typed_pool_mut::<T>()?.get_mut(entity))
    }

    /// Mutable access to `entity`'s `T`, which must be present.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle,
    /// [`RegistryError::MissingComponent`] if the entity has no `T`.
    pub fn get_component<T: Component>(&mut self, entity: Entity) -> Result<&mut T, RegistryError> {
        self.try_get_component::<T>(entity)?
            .ok_or(RegistryError::MissingComponent {
                entity,
                component: T::type_name(),
            })
    }

    /// Detach `T` from `entity`. Returns `false` if it had none.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<bool, RegistryError> {
        self.remove_kind(entity, T::kind_id())
    }

    /// Detach the component of `kind` from `entity`. Returns `false` if it
    /// had none.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn remove_kind(
        &mut self,
        entity: Entity,
        kind: ComponentKindId,
    ) -> Result<bool, RegistryError> {
        self.ensure_alive(entity)?;
        let removed = self
            .pools
            .get_mut(&kind)
            .is_some_and(|pool| pool.deregister(entity));
        if removed && let Some(list) = self.entity_kinds.get_mut(&entity) {
            list.retain(|&k| k != kind);
        }
        Ok(removed)
    }

    /// Returns `true` if `entity` holds a `T`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, RegistryError> {
        self.ensure_alive(entity)?;
        Ok(self.has_kind(entity, T::kind_id()))
    }

    /// Returns `true` if `entity` holds every kind in the tuple `S`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn has_components<S: ComponentSet>(&self, entity: Entity) -> Result<bool, RegistryError> {
        self.ensure_alive(entity)?;
        Ok(S::kind_ids()
            .into_iter()
            .all(|kind| self.has_kind(entity, kind)))
    }

    /// Returns `true` if `entity` is registered in the pool for `kind`.
    #[must_use]
    pub fn has_kind(&self, entity: Entity, kind: ComponentKindId) -> bool {
        self.pools
            .get(&kind)
            .is_some_and(|pool| pool.is_registered(entity))
    }

    /// Kinds attached to `entity`, in the order they were attached.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidEntity`] for the sentinel or a dead handle.
    pub fn entity_kinds(&self, entity: Entity) -> Result<&[ComponentKindId], RegistryError> {
        self.ensure_alive(entity)?;
        Ok(self
            .entity_kinds
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// A copy of the raw record bytes of `entity`'s component of `kind`.
    #[must_use]
    pub fn component_bytes(&self, entity: Entity, kind: ComponentKindId) -> Option<Vec<u8>> {
        self.pools.get(&kind)?.component_bytes(entity)
    }

    /// Make sure `T` has a typed pool, promoting any snapshot-only records.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Kind`] / [`RegistryError::KindCollision`] if `T`
    /// disagrees with what is already recorded for its kind id.
    pub fn register_kind<T: Component>(&mut self) -> Result<(), RegistryError> {
        self.typed_pool_mut::<T>().map(|_| ())
    }

    /// The kind metadata table.
    #[must_use]
    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// Number of entities registered in the pool for `kind`.
    #[must_use]
    pub fn pool_len(&self, kind: ComponentKindId) -> usize {
        self.pools.get(&kind).map_or(0, |pool| pool.len())
    }

    // -- Iteration --

    /// Call `visit` for every live entity, in live-list order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(Entity),
    {
        for &entity in self.allocator.live() {
            visit(entity);
        }
    }

    /// Call `visit` with mutable references to each kind in `Q`, for every
    /// live entity holding all of them, in live-list order.
    ///
    /// ```rust,ignore
    /// registry.execute::<(Transform, Test)>(|_, (transform, test)| {
    ///     transform.x = 100.0;
    ///     test.a = 100.0;
    /// })?;
    /// ```
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateQueryKind`] if `Q` lists a kind twice, or a
    /// kind error if a member type disagrees with its recorded metadata.
    pub fn execute<Q, F>(&mut self, visit: F) -> Result<(), RegistryError>
    where
        Q: Query,
        F: FnMut(Entity, Q::Item<'_>),
    {
        Q::run(self, visit)
    }

    // -- Internal --

    fn ensure_alive(&self, entity: Entity) -> Result<(), RegistryError> {
        if self.allocator.is_alive(entity) {
            Ok(())
        } else {
            Err(RegistryError::InvalidEntity(entity))
        }
    }

    /// Attach a component known only by its kind id and raw bytes.
    ///
    /// Creates the kind-table entry and a [`RawPool`] sized to `bytes` if the
    /// kind is unseen. Used by snapshot loading, where no Rust type is at hand.
    pub(crate) fn add_component_from_data(
        &mut self,
        bytes: &[u8],
        kind: ComponentKindId,
        entity: Entity,
    ) -> Result<(), RegistryError> {
        self.ensure_alive(entity)?;
        self.kinds.record(kind, KindInfo::sized(bytes.len()))?;
        let pool = self
            .pools
            .entry(kind)
            .or_insert_with(|| Box::new(RawPool::new(kind, bytes.len())));
        if pool.register_bytes(entity, bytes)? {
            self.entity_kinds.entry(entity).or_default().push(kind);
        }
        Ok(())
    }

    pub(crate) fn typed_pool_mut<T: Component>(
        &mut self,
    ) -> Result<&mut TypedPool<T>, RegistryError> {
        Self::typed_pool_in::<T>(&mut self.kinds, &mut self.pools)
    }

    /// Live list and pool map, borrowed together for queries.
    pub(crate) fn query_parts(&mut self) -> (&[Entity], &mut PoolMap) {
        (self.allocator.live(), &mut self.pools)
    }

    fn typed_pool_in<'p, T: Component>(
        kinds: &mut KindTable,
        pools: &'p mut PoolMap,
    ) -> Result<&'p mut TypedPool<T>, RegistryError> {
        let kind = T::kind_id();
        kinds.record(kind, KindInfo::of::<T>())?;
        let slot = pools
            .entry(kind)
            .or_insert_with(|| Box::new(TypedPool::<T>::new()));

        if let Some(raw) = slot.as_any().downcast_ref::<RawPool>() {
            let typed = raw.to_typed::<T>()?;
            *slot = Box::new(typed);
        }

        slot.as_any_mut()
            .downcast_mut::<TypedPool<T>>()
            .ok_or(RegistryError::KindCollision {
                kind,
                component: T::type_name(),
            })
    }
}
