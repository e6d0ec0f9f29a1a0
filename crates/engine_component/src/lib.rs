//! # engine_component
//!
//! Storage primitives for the entity–component registry: what a component
//! is, how its kind is identified, how entities are allocated, and how
//! records are held in type-erased pools.
//!
//! This crate provides:
//!
//! - [`Component`] trait: the plain-old-data contract every record satisfies.
//! - [`ComponentKindId`]: stable FNV-1a kind identifiers.
//! - [`Entity`] / [`EntityAllocator`]: `u32` handles with O(1) swap-remove.
//! - [`KindTable`]: kind id → record size metadata.
//! - [`ComponentPool`], [`TypedPool`], [`RawPool`]: per-kind storage.

pub mod component;
pub mod entity;
pub mod error;
pub mod kind;
pub mod pool;

pub use component::{Component, ComponentKindId};
pub use entity::{Entity, EntityAllocator};
pub use error::ComponentError;
pub use kind::{KindInfo, KindTable};
pub use pool::{ComponentPool, RawPool, TypedPool};
