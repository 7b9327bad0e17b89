//! Error types shared by the splay map, the splay set and their cursors.

use std::result;
use thiserror::Error;

/// Errors returned by fallible operations on `SplayMap` and `SplaySet`.
///
/// A failing operation never leaves the container half-modified: the root, the length and both
/// internal modification counters are exactly as they were before the call.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// A positioned cursor was advanced after an element was added to or removed from the
    /// container it walks.
    #[error("concurrent modification during iteration")]
    ConcurrentModification,

    /// The container's key-validity predicate rejected a key that the operation needs.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operation is not defined for the current contents of the container.
    #[error("bad state: {0}")]
    BadState(&'static str),

    /// `update` was called on an absent key without a fallback.
    #[error("invalid argument (key): key not in map")]
    KeyNotFound,
}

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = result::Result<T, Error>;
