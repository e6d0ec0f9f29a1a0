//! Storage-layer error types.

use crate::component::ComponentKindId;

/// Errors raised by the kind table and component pools.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// A record's byte length disagrees with the size recorded for its kind.
    #[error("kind {kind} holds {expected}-byte records, got {actual} bytes")]
    SizeMismatch {
        /// The component kind.
        kind: ComponentKindId,
        /// Size recorded in the kind table or pool.
        expected: usize,
        /// Size that was offered.
        actual: usize,
    },

    /// Two different component types claim the same kind id.
    #[error("kind {kind} is already registered as `{existing}`, cannot reuse it for `{requested}`")]
    NameCollision {
        /// The contested kind id.
        kind: ComponentKindId,
        /// Type name already bound to the id.
        existing: &'static str,
        /// Type name that tried to bind it.
        requested: &'static str,
    },
}
