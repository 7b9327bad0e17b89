//! The epoch-checked in-order cursor shared by `MapCursor` and `SetCursor`.
//!
//! A cursor does not borrow the tree between steps. Instead it keeps the ancestor path of its
//! current position and a snapshot of the tree's two epochs. At every step it compares the
//! snapshot with the tree:
//!
//! - a different structural epoch means an element was added or removed since the last step, and
//!   the cursor fails with `Error::ConcurrentModification`;
//! - a different reshape epoch means the tree was only rearranged (a lookup splayed it, or a value
//!   was replaced), so the cursor splays its current key back to the root and carries on.
//!
//! The snapshot also names the tree it was taken from. Handles are only meaningful in that tree's
//! arena, so a cursor stepped with any other tree fails with `Error::BadState` before it reads a
//! single node.

use crate::arena::Handle;
use crate::error::{Error, Result};
use crate::splay_tree::compare::{Compare, KeyValidity};
use crate::splay_tree::node::Node;
use crate::splay_tree::tree::SplayTree;
use log::{debug, trace};

/// What a cursor may do to the tree it walks.
pub(crate) trait Traversal<K, V> {
    fn id(&self) -> u64;

    fn root(&self) -> Option<Handle>;

    fn len(&self) -> usize;

    fn structural_epoch(&self) -> u64;

    fn reshape_epoch(&self) -> u64;

    fn splay(&mut self, key: &K);

    fn node(&self, handle: Handle) -> &Node<K, V>;

    /// Copy-on-write replacement of the value at `handle`, relinking `parent` (or the root).
    fn replace_value(&mut self, handle: Handle, parent: Option<Handle>, value: V) -> (Handle, V);
}

impl<K, V, C, P> Traversal<K, V> for SplayTree<K, V, C, P>
where
    C: Compare<K>,
    P: KeyValidity<K>,
{
    fn id(&self) -> u64 {
        SplayTree::id(self)
    }

    fn root(&self) -> Option<Handle> {
        SplayTree::root(self)
    }

    fn len(&self) -> usize {
        SplayTree::len(self)
    }

    fn structural_epoch(&self) -> u64 {
        SplayTree::structural_epoch(self)
    }

    fn reshape_epoch(&self) -> u64 {
        SplayTree::reshape_epoch(self)
    }

    fn splay(&mut self, key: &K) {
        SplayTree::splay(self, key);
    }

    fn node(&self, handle: Handle) -> &Node<K, V> {
        SplayTree::node(self, handle)
    }

    fn replace_value(&mut self, handle: Handle, parent: Option<Handle>, value: V) -> (Handle, V) {
        SplayTree::replace_value(self, handle, parent, value)
    }
}

#[derive(Clone, Copy, Debug)]
struct Epochs {
    tree: u64,
    structural: u64,
    reshape: u64,
}

/// An in-order cursor.
///
/// `epochs` is `None` until the first step. After that, an empty `path` means the cursor is
/// exhausted, and `current` is a copy of the key at the top of `path`.
pub(crate) struct Cursor<K> {
    path: Vec<Handle>,
    epochs: Option<Epochs>,
    current: Option<K>,
}

impl<K> Cursor<K> {
    pub fn new() -> Self {
        Cursor {
            path: Vec::new(),
            epochs: None,
            current: None,
        }
    }
}

impl<K> Cursor<K>
where
    K: Clone,
{
    /// Moves to the next element in order and returns its handle, or `None` once the cursor is
    /// exhausted. Exhaustion is terminal: later steps keep returning `None`, whatever happens to
    /// the tree in the meantime.
    pub fn advance<V, T>(&mut self, tree: &mut T) -> Result<Option<Handle>>
    where
        T: Traversal<K, V>,
    {
        let epochs = match self.epochs {
            Some(epochs) => epochs,
            None => {
                self.seed(tree);
                return Ok(self.path.last().copied());
            },
        };
        check_tree::<K, V, T>(epochs, tree)?;
        if self.path.is_empty() {
            return Ok(None);
        }
        self.synchronize(tree)?;

        let mut node = match self.path.last() {
            Some(&node) => node,
            None => return Ok(None),
        };
        match tree.node(node).right {
            Some(right) => self.push_left_spine(tree, Some(right)),
            None => {
                self.path.pop();
                while let Some(&parent) = self.path.last() {
                    if tree.node(parent).right != Some(node) {
                        break;
                    }
                    node = parent;
                    self.path.pop();
                }
            },
        }
        debug_assert!(self.path.len() <= tree.len());
        self.remember_current(tree);
        Ok(self.path.last().copied())
    }

    /// Replaces the value of the element the cursor is positioned at and returns the old value.
    ///
    /// The reshape epoch advances so that other positioned cursors rebuild their paths; this
    /// cursor adopts the new epoch and stays where it is.
    pub fn replace_value<V, T>(&mut self, tree: &mut T, value: V) -> Result<V>
    where
        T: Traversal<K, V>,
    {
        if self.epochs.is_none() || self.path.is_empty() {
            return Err(Error::BadState("cursor is not positioned on an element"));
        }
        self.synchronize(tree)?;

        let handle = self
            .path
            .pop()
            .ok_or(Error::BadState("cursor is not positioned on an element"))?;
        let parent = self.path.last().copied();
        let (replacement, old_value) = tree.replace_value(handle, parent, value);
        self.path.push(replacement);
        if let Some(epochs) = self.epochs.as_mut() {
            epochs.reshape = tree.reshape_epoch();
        }
        Ok(old_value)
    }

    fn seed<V, T>(&mut self, tree: &T)
    where
        T: Traversal<K, V>,
    {
        self.path.clear();
        self.push_left_spine(tree, tree.root());
        self.epochs = Some(Epochs {
            tree: tree.id(),
            structural: tree.structural_epoch(),
            reshape: tree.reshape_epoch(),
        });
        self.remember_current(tree);
    }

    /// Checks the snapshot against the tree. Fails on a structural change and rebuilds the path
    /// after a reshape.
    fn synchronize<V, T>(&mut self, tree: &mut T) -> Result<()>
    where
        T: Traversal<K, V>,
    {
        let epochs = match self.epochs {
            Some(epochs) => epochs,
            None => return Ok(()),
        };
        check_tree::<K, V, T>(epochs, tree)?;
        if epochs.structural != tree.structural_epoch() {
            debug!(
                "cursor expected structural epoch {} but the tree is at {}",
                epochs.structural,
                tree.structural_epoch(),
            );
            return Err(Error::ConcurrentModification);
        }
        if epochs.reshape != tree.reshape_epoch() {
            trace!(
                "rebuilding cursor path after reshape ({} -> {})",
                epochs.reshape,
                tree.reshape_epoch(),
            );
            if let Some(key) = &self.current {
                tree.splay(key);
            }
            self.path.clear();
            self.path.extend(tree.root());
            self.epochs = Some(Epochs {
                reshape: tree.reshape_epoch(),
                ..epochs
            });
        }
        Ok(())
    }

    fn push_left_spine<V, T>(&mut self, tree: &T, mut next: Option<Handle>)
    where
        T: Traversal<K, V>,
    {
        while let Some(handle) = next {
            self.path.push(handle);
            next = tree.node(handle).left;
        }
    }

    fn remember_current<V, T>(&mut self, tree: &T)
    where
        T: Traversal<K, V>,
    {
        self.current = self.path.last().map(|&handle| tree.node(handle).key.clone());
    }
}

fn check_tree<K, V, T>(epochs: Epochs, tree: &T) -> Result<()>
where
    T: Traversal<K, V>,
{
    if epochs.tree == tree.id() {
        Ok(())
    } else {
        debug!("cursor of tree {} was stepped with tree {}", epochs.tree, tree.id());
        Err(Error::BadState("cursor was started on a different container"))
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::error::Error;
    use crate::splay_tree::compare::{AcceptAll, Natural};
    use crate::splay_tree::tree::SplayTree;
    use std::cmp::Ordering;

    type Tree = SplayTree<u32, u32, Natural, AcceptAll>;

    fn tree_from(keys: &[u32]) -> Tree {
        let mut tree = SplayTree::new(Natural, AcceptAll);
        for key in keys {
            let comp = tree.splay(key);
            if comp != Some(Ordering::Equal) {
                tree.insert_root(*key, *key, comp);
            }
        }
        tree
    }

    fn next_key(cursor: &mut Cursor<u32>, tree: &mut Tree) -> Result<Option<u32>, Error> {
        cursor
            .advance(tree)
            .map(|handle| handle.map(|handle| tree.node(handle).key))
    }

    #[test]
    fn test_walk_in_order() {
        let mut tree = tree_from(&[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let mut cursor = Cursor::new();
        let mut keys = Vec::new();
        while let Some(key) = next_key(&mut cursor, &mut tree).unwrap() {
            keys.push(key);
        }
        assert_eq!(keys, (1..10).collect::<Vec<u32>>());
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = tree_from(&[]);
        let mut cursor = Cursor::new();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
    }

    #[test]
    fn test_unseeded_cursor_sees_later_inserts() {
        let mut tree = tree_from(&[2]);
        let mut cursor = Cursor::new();
        let comp = tree.splay(&1);
        tree.insert_root(1, 1, comp);
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(1)));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(2)));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
    }

    #[test]
    fn test_structural_change_fails() {
        let mut tree = tree_from(&[1, 2, 3]);
        let mut cursor = Cursor::new();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(1)));
        tree.remove(&3);
        assert_eq!(
            next_key(&mut cursor, &mut tree),
            Err(Error::ConcurrentModification),
        );
    }

    #[test]
    fn test_reshape_heals() {
        let mut tree = tree_from(&[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let mut cursor = Cursor::new();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(1)));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(2)));
        tree.splay(&9);
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(3)));
        tree.splay(&1);
        tree.last();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(4)));
        let mut rest = Vec::new();
        while let Some(key) = next_key(&mut cursor, &mut tree).unwrap() {
            tree.splay(&(10 - key));
            rest.push(key);
        }
        assert_eq!(rest, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_replace_value_keeps_position() {
        let mut tree = tree_from(&[2, 1, 3]);
        let mut cursor = Cursor::new();
        while let Some(handle) = cursor.advance(&mut tree).unwrap() {
            let value = tree.node(handle).value;
            assert_eq!(cursor.replace_value(&mut tree, value * 10), Ok(value));
        }
        assert_eq!(
            tree.iter().map(|(key, value)| (*key, *value)).collect::<Vec<_>>(),
            vec![(1, 10), (2, 20), (3, 30)],
        );
    }

    #[test]
    fn test_replace_value_heals_other_cursor() {
        let mut tree = tree_from(&[4, 2, 6, 1, 3, 5, 7]);
        let mut writer = Cursor::new();
        let mut reader = Cursor::new();
        assert_eq!(next_key(&mut reader, &mut tree), Ok(Some(1)));
        assert_eq!(next_key(&mut reader, &mut tree), Ok(Some(2)));

        for _ in 0..4 {
            writer.advance(&mut tree).unwrap();
        }
        assert_eq!(writer.replace_value(&mut tree, 40), Ok(4));
        assert_eq!(next_key(&mut writer, &mut tree), Ok(Some(5)));

        assert_eq!(next_key(&mut reader, &mut tree), Ok(Some(3)));
        assert_eq!(next_key(&mut reader, &mut tree), Ok(Some(4)));
        let four = tree.find(&4).unwrap();
        assert_eq!(tree.node(four).value, 40);
    }

    #[test]
    fn test_replace_value_unpositioned() {
        let mut tree = tree_from(&[1]);
        let mut cursor = Cursor::new();
        assert!(matches!(
            cursor.replace_value(&mut tree, 0),
            Err(Error::BadState(_))
        ));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(1)));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
        assert!(cursor.replace_value(&mut tree, 0).is_err());
    }

    #[test]
    fn test_other_tree_is_rejected() {
        let mut tree = tree_from(&[1, 2, 3]);
        let mut other = tree_from(&[10]);
        other.remove(&10);
        let comp = other.splay(&20);
        other.insert_root(20, 20, comp);
        assert_eq!(tree.structural_epoch(), other.structural_epoch());

        let mut cursor = Cursor::new();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(1)));
        assert!(matches!(
            next_key(&mut cursor, &mut other),
            Err(Error::BadState(_))
        ));
        assert!(matches!(
            cursor.replace_value(&mut other, 0),
            Err(Error::BadState(_))
        ));
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(Some(2)));
    }

    #[test]
    fn test_exhausted_cursor_stays_exhausted() {
        let mut tree = tree_from(&[]);
        let mut cursor = Cursor::new();
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
        let comp = tree.splay(&1);
        tree.insert_root(1, 1, comp);
        assert_eq!(next_key(&mut cursor, &mut tree), Ok(None));
    }
}
