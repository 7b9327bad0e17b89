//! Ordered maps and sets backed by a top-down splay tree.
//!
//! # Examples
//!
//! ```
//! use splay_collections::splay_tree::SplayMap;
//!
//! let mut map = SplayMap::new();
//! map.insert(2, "two").unwrap();
//! map.insert(1, "one").unwrap();
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.first_key(), Some(&1));
//! assert_eq!(map.iter().collect::<Vec<_>>(), vec![(&1, &"one"), (&2, &"two")]);
//! ```

mod arena;
mod error;
pub mod splay_tree;

pub use crate::error::{Error, Result};
