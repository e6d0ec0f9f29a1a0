//! Component sets and multi-kind queries.
//!
//! A [`ComponentSet`] is a tuple of component types, used by
//! [`Registry::has_components`]. A [`Query`] additionally knows how to walk
//! the registry and hand out one mutable reference per listed kind, which is
//! what [`Registry::execute`] runs on.
//!
//! Both are implemented for tuples of one to eight components:
//!
//! ```rust,ignore
//! registry.execute::<(Transform, Velocity)>(|entity, (transform, velocity)| {
//!     transform.x += velocity.x;
//! })?;
//! ```

use engine_component::{Component, ComponentKindId, Entity, TypedPool};

use crate::error::RegistryError;
use crate::registry::Registry;

mod sealed {
    pub trait Sealed {}
}

/// A tuple of component types.
pub trait ComponentSet: sealed::Sealed + 'static {
    /// Kind ids of the members, in tuple order.
    fn kind_ids() -> Vec<ComponentKindId>;
}

/// A tuple of component types that can be fetched mutably together.
pub trait Query: ComponentSet {
    /// One mutable reference per member, in tuple order.
    type Item<'a>;

    /// Visit every live entity holding all member kinds, in live-list order.
    ///
    /// Fails with [`RegistryError::DuplicateQueryKind`] before touching any
    /// pool if a kind is listed twice.
    #[doc(hidden)]
    fn run<F>(registry: &mut Registry, visit: F) -> Result<(), RegistryError>
    where
        F: FnMut(Entity, Self::Item<'_>);
}

/// Returns the first kind id that occurs twice in `kinds`.
fn first_duplicate(kinds: &[ComponentKindId]) -> Option<ComponentKindId> {
    kinds
        .iter()
        .enumerate()
        .find(|(i, kind)| kinds[..*i].contains(kind))
        .map(|(_, &kind)| kind)
}

macro_rules! impl_query {
    ($(($ty:ident, $var:ident)),+) => {
        impl<$($ty: Component),+> sealed::Sealed for ($($ty,)+) {}

        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            fn kind_ids() -> Vec<ComponentKindId> {
                vec![$(<$ty as Component>::kind_id()),+]
            }
        }

        impl<$($ty: Component),+> Query for ($($ty,)+) {
            type Item<'a> = ($(&'a mut $ty,)+);

            fn run<F>(registry: &mut Registry, mut visit: F) -> Result<(), RegistryError>
            where
                F: FnMut(Entity, Self::Item<'_>),
            {
                if let Some(kind) = first_duplicate(&Self::kind_ids()) {
                    return Err(RegistryError::DuplicateQueryKind(kind));
                }

                // Snapshot-only kinds are promoted before any borrow is taken.
                $( registry.typed_pool_mut::<$ty>()?; )+

                let (live, pools) = registry.query_parts();
                let [$($var),+] = pools.get_disjoint_mut([$(&<$ty as Component>::kind_id()),+]);
                $(
                    let Some($var) = $var
                        .and_then(|pool| pool.as_any_mut().downcast_mut::<TypedPool<$ty>>())
                    else {
                        return Ok(());
                    };
                )+

                for &entity in live {
                    if let ($(Some($var),)+) = ($($var.get_mut(entity),)+) {
                        visit(entity, ($($var,)+));
                    }
                }
                Ok(())
            }
        }
    };
}

impl_query!((A, a));
impl_query!((A, a), (B, b));
impl_query!((A, a), (B, b), (C, c));
impl_query!((A, a), (B, b), (C, c), (D, d));
impl_query!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_query!((A, a), (B, b), (C, c), (D, d), (E, e), (F1, f));
impl_query!((A, a), (B, b), (C, c), (D, d), (E, e), (F1, f), (G, g));
impl_query!((A, a), (B, b), (C, c), (D, d), (E, e), (F1, f), (G, g), (H, h));

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    #[test]
    fn test_first_duplicate() {
        let a = ComponentKindId(1);
        let b = ComponentKindId(2);
        assert_eq!(first_duplicate(&[a, b]), None);
        assert_eq!(first_duplicate(&[a, b, a]), Some(a));
        assert_eq!(first_duplicate(&[]), None);
    }

    #[test]
    fn test_run_rejects_duplicate_kinds() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component::<Position>(e).unwrap();

        let mut calls = 0;
        let err = <(Position, Position) as Query>::run(
            &mut registry,
            |_: Entity, _: (&mut Position, &mut Position)| calls += 1,
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateQueryKind(Position::kind_id()));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_run_visits_matching_entities() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component::<Position>(e).unwrap();
        registry.create_entity();

        let mut visited = Vec::new();
        <(Position,) as Query>::run(&mut registry, |entity: Entity, (p,): (&mut Position,)| {
            p.y = 2.0;
            visited.push(entity);
        })
        .unwrap();
        assert_eq!(visited, vec![e]);
        assert_eq!(registry.get_component::<Position>(e).unwrap().y, 2.0);
    }
}
