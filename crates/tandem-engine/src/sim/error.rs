use thiserror::Error;

use super::object::Lifecycle;

/// Failures raised by the simulation core.
///
/// None of these are transient. They propagate to the frame loop, which
/// reports them once and stops scheduling frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A device allocation could not be satisfied.
    #[error("cannot allocate {requested} bytes for `{label}` (limit {limit} bytes)")]
    Allocation {
        label: String,
        requested: u64,
        limit: u64,
    },

    /// A stage ran before the object reached the state it depends on.
    #[error("`{object}` requires state {expected:?} but is {actual:?}")]
    Precondition {
        object: String,
        expected: Lifecycle,
        actual: Lifecycle,
    },

    /// A bind set was used after the handles it references were replaced.
    #[error("bind sets `{label}` reference replaced resources; rebuild required")]
    StaleBinding { label: String },

    /// A host upload does not match the size of its destination.
    #[error("upload to `{label}` is {actual} bytes, destination holds {expected} bytes")]
    SizeMismatch {
        label: String,
        expected: u64,
        actual: u64,
    },
}
