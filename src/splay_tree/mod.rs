//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.
//!
//! `SplayMap` and `SplaySet` share one engine. Lookups restructure the tree, so most of their
//! accessors take `&mut self`. Borrowing iterators (`iter`, `keys`, `values`) never restructure
//! the tree. `MapCursor` and `SetCursor` are detached: they do not borrow the container between
//! steps, so lookups may be interleaved with a walk, while insertions and removals make the walk
//! fail with `Error::ConcurrentModification`.

mod compare;
mod cursor;
mod map;
mod node;
mod set;
mod tree;

pub use self::compare::{AcceptAll, Compare, KeyValidity, Natural};
pub use self::map::{Keys, MapCursor, SplayMap, SplayMapIntoIter, SplayMapIter, Values};
pub use self::set::{SetCursor, SplaySet, SplaySetIntoIter, SplaySetIter};
