//! Registry error types.

use engine_component::{ComponentError, ComponentKindId, Entity};

/// Errors raised by [`Registry`](crate::Registry) operations.
///
/// An entity lacking a component is not an error for `has_*` and
/// `try_get_*` calls; those report absence through `false` / `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The handle is the sentinel or no longer live.
    #[error("{0} is not a live entity")]
    InvalidEntity(Entity),

    /// `get_component` was asked for a kind the entity does not hold.
    #[error("{entity} has no `{component}` component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Type name of the requested component.
        component: &'static str,
    },

    /// A query listed the same component kind more than once.
    #[error("query names kind {0} more than once")]
    DuplicateQueryKind(ComponentKindId),

    /// The pool for a kind holds a different Rust type than the one requested.
    #[error("pool for kind {kind} does not store `{component}`")]
    KindCollision {
        /// The contested kind id.
        kind: ComponentKindId,
        /// Type name of the requested component.
        component: &'static str,
    },

    /// Kind metadata or record size disagreement.
    #[error(transparent)]
    Kind(#[from] ComponentError),
}
