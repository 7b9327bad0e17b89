use crate::arena::{Arena, Handle};
use crate::splay_tree::compare::{Compare, KeyValidity};
use crate::splay_tree::node::Node;
use log::{debug, trace};
use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicU64};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

/// The splay tree engine shared by `SplayMap` and `SplaySet`.
///
/// Besides the nodes, the engine keeps two counters. `structural_epoch` moves whenever the key set
/// changes (insert, remove, clear); `reshape_epoch` moves whenever the root changes identity
/// without changing the key set (splaying, copy-on-write value replacement). Cursors compare both
/// against their own snapshot at every step, together with `id`, which no other tree shares.
pub struct SplayTree<K, V, C, P> {
    id: u64,
    arena: Arena<Node<K, V>>,
    root: Option<Handle>,
    len: usize,
    structural_epoch: u64,
    reshape_epoch: u64,
    comparator: C,
    validity: P,
}

impl<K, V, C, P> SplayTree<K, V, C, P> {
    pub fn new(comparator: C, validity: P) -> Self {
        SplayTree {
            id: next_tree_id(),
            arena: Arena::new(),
            root: None,
            len: 0,
            structural_epoch: 0,
            reshape_epoch: 0,
            comparator,
            validity,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn validity(&self) -> &P {
        &self.validity
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    pub fn structural_epoch(&self) -> u64 {
        self.structural_epoch
    }

    pub fn reshape_epoch(&self) -> u64 {
        self.reshape_epoch
    }

    pub fn node(&self, handle: Handle) -> &Node<K, V> {
        &self.arena[handle]
    }

    pub fn root_node(&self) -> Option<&Node<K, V>> {
        self.root.map(|root| &self.arena[root])
    }

    /// Rotates the leftmost node of the subtree rooted at `handle` up to the subtree's root and
    /// returns it.
    pub fn splay_min(&mut self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.arena[current].left {
            self.arena[current].left = self.arena[left].right;
            self.arena[left].right = Some(current);
            current = left;
        }
        current
    }

    /// Rotates the rightmost node of the subtree rooted at `handle` up to the subtree's root and
    /// returns it.
    pub fn splay_max(&mut self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(right) = self.arena[current].right {
            self.arena[current].right = self.arena[right].left;
            self.arena[right].left = Some(current);
            current = right;
        }
        current
    }

    /// Splays the minimum to the root and returns it.
    pub fn first(&mut self) -> Option<Handle> {
        let root = self.root?;
        let min = self.splay_min(root);
        self.set_splayed_root(min);
        Some(min)
    }

    /// Splays the maximum to the root and returns it.
    pub fn last(&mut self) -> Option<Handle> {
        let root = self.root?;
        let max = self.splay_max(root);
        self.set_splayed_root(max);
        Some(max)
    }

    fn set_splayed_root(&mut self, root: Handle) {
        if self.root != Some(root) {
            self.root = Some(root);
            self.reshape_epoch += 1;
        }
    }

    /// Makes a new node the root. Must directly follow a `splay(&key)` that did not find `key`,
    /// with `comp` being what that splay returned.
    pub fn insert_root(&mut self, key: K, value: V, comp: Option<Ordering>) -> Handle {
        debug_assert_ne!(comp, Some(Ordering::Equal));
        let mut node = Node::new(key, value);
        if let Some(root) = self.root {
            if comp == Some(Ordering::Less) {
                // The old root and everything left of it precede the new key.
                node.left = Some(root);
                node.right = self.arena[root].right.take();
            } else {
                node.right = Some(root);
                node.left = self.arena[root].left.take();
            }
        }
        let handle = self.arena.allocate(node);
        self.root = Some(handle);
        self.len += 1;
        self.structural_epoch += 1;
        debug_assert_eq!(self.len, self.arena.len());
        handle
    }

    /// Copy-on-write replacement of the value stored at `handle`. `parent` is the node whose child
    /// slot holds `handle`, or `None` if `handle` is the root. Returns the replacement's handle
    /// and the old value.
    ///
    /// The arena hands the freed slot straight back, so the replacement usually has the same
    /// handle as the node it replaces. Cursors must not rely on handle identity to notice the
    /// change: the reshape epoch moves instead.
    pub fn replace_value(&mut self, handle: Handle, parent: Option<Handle>, value: V) -> (Handle, V) {
        let (node, old_value) = self.arena.free(handle).replace_value(value);
        let replacement = self.arena.allocate(node);
        match parent {
            None => self.root = Some(replacement),
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(handle) {
                    parent.left = Some(replacement);
                } else {
                    parent.right = Some(replacement);
                }
            },
        }
        self.reshape_epoch += 1;
        (replacement, old_value)
    }

    pub fn clear(&mut self) {
        trace!("clearing splay tree of {} nodes", self.len);
        self.arena.clear();
        self.root = None;
        self.len = 0;
        self.structural_epoch += 1;
    }

    /// Replaces the whole contents of the tree with the contents of `other`.
    pub fn adopt(&mut self, other: SplayTree<K, V, C, P>) {
        debug!("replacing {} nodes with {} nodes", self.len, other.len);
        self.arena = other.arena;
        self.root = other.root;
        self.len = other.len;
        self.structural_epoch += 1;
    }

    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            arena: &self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<K, V, C, P> IntoIterator for SplayTree<K, V, C, P> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            arena: self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<K, V, C, P> SplayTree<K, V, C, P>
where
    P: KeyValidity<K>,
{
    pub fn is_valid(&self, key: &K) -> bool {
        self.validity.is_valid(key)
    }
}

impl<K, V, C, P> SplayTree<K, V, C, P>
where
    C: Compare<K>,
    P: KeyValidity<K>,
{
    /// Top-down splay. Brings `key` to the root if it is present, otherwise the last node on its
    /// search path. Returns the comparison of the new root's key against `key`, or `None` if the
    /// tree is empty.
    pub fn splay(&mut self, key: &K) -> Option<Ordering> {
        let root = match self.root {
            Some(root) => root,
            None => {
                // Surfaces a misbehaving comparator even when there is nothing to compare against.
                self.comparator.compare(key, key);
                return None;
            },
        };

        // `left_*` collects nodes less than `key` chained through right children, `right_*`
        // collects nodes greater than `key` chained through left children.
        let mut left_head: Option<Handle> = None;
        let mut left_tail: Option<Handle> = None;
        let mut right_head: Option<Handle> = None;
        let mut right_tail: Option<Handle> = None;
        let mut current = root;
        let mut comp;
        loop {
            comp = self.comparator.compare(&self.arena[current].key, key);
            match comp {
                Ordering::Greater => {
                    let mut next = match self.arena[current].left {
                        Some(next) => next,
                        None => break,
                    };
                    comp = self.comparator.compare(&self.arena[next].key, key);
                    if comp == Ordering::Greater {
                        self.arena[current].left = self.arena[next].right;
                        self.arena[next].right = Some(current);
                        current = next;
                        next = match self.arena[current].left {
                            Some(next) => next,
                            None => break,
                        };
                    }
                    match right_tail {
                        Some(tail) => self.arena[tail].left = Some(current),
                        None => right_head = Some(current),
                    }
                    right_tail = Some(current);
                    current = next;
                },
                Ordering::Less => {
                    let mut next = match self.arena[current].right {
                        Some(next) => next,
                        None => break,
                    };
                    comp = self.comparator.compare(&self.arena[next].key, key);
                    if comp == Ordering::Less {
                        self.arena[current].right = self.arena[next].left;
                        self.arena[next].left = Some(current);
                        current = next;
                        next = match self.arena[current].right {
                            Some(next) => next,
                            None => break,
                        };
                    }
                    match left_tail {
                        Some(tail) => self.arena[tail].right = Some(current),
                        None => left_head = Some(current),
                    }
                    left_tail = Some(current);
                    current = next;
                },
                Ordering::Equal => break,
            }
        }

        if let Some(tail) = left_tail {
            self.arena[tail].right = self.arena[current].left;
            self.arena[current].left = left_head;
        }
        if let Some(tail) = right_tail {
            self.arena[tail].left = self.arena[current].right;
            self.arena[current].right = right_head;
        }
        self.set_splayed_root(current);
        Some(comp)
    }

    pub fn has(&mut self, key: &K) -> bool {
        self.is_valid(key) && self.splay(key) == Some(Ordering::Equal)
    }

    /// Splays `key` and returns the root if it holds `key`.
    pub fn get(&mut self, key: &K) -> Option<Handle> {
        if !self.is_valid(key) {
            return None;
        }
        match self.splay(key) {
            Some(Ordering::Equal) => self.root,
            _ => None,
        }
    }

    /// Searches for `key` without restructuring the tree.
    pub fn find(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = &self.arena[handle];
            current = match self.comparator.compare(&node.key, key) {
                Ordering::Greater => node.left,
                Ordering::Less => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        if self.splay(key)? != Ordering::Equal {
            return None;
        }
        let root = self.root?;
        let Node {
            key,
            value,
            left,
            right,
        } = self.arena.free(root);
        self.root = match left {
            Some(left) => {
                let max = self.splay_max(left);
                self.arena[max].right = right;
                Some(max)
            },
            None => right,
        };
        self.len -= 1;
        self.structural_epoch += 1;
        debug_assert_eq!(self.len, self.arena.len());
        Some((key, value))
    }

    /// Returns the node with the greatest key strictly less than `key`.
    pub fn last_before(&mut self, key: &K) -> Option<Handle> {
        let comp = self.splay(key)?;
        let root = self.root?;
        if comp == Ordering::Less {
            return Some(root);
        }
        let mut node = self.arena[root].left?;
        while let Some(right) = self.arena[node].right {
            node = right;
        }
        Some(node)
    }

    /// Returns the node with the least key strictly greater than `key`.
    pub fn first_after(&mut self, key: &K) -> Option<Handle> {
        let comp = self.splay(key)?;
        let root = self.root?;
        if comp == Ordering::Greater {
            return Some(root);
        }
        let mut node = self.arena[root].right?;
        while let Some(left) = self.arena[node].left {
            node = left;
        }
        Some(node)
    }
}

impl<K, V, C, P> SplayTree<K, V, C, P>
where
    K: Clone,
    V: Clone,
{
    fn copy_node(&self, handle: Handle) -> Node<K, V> {
        let node = &self.arena[handle];
        Node::new(node.key.clone(), node.value.clone())
    }
}

impl<K, V, C, P> Clone for SplayTree<K, V, C, P>
where
    K: Clone,
    V: Clone,
    C: Clone,
    P: Clone,
{
    /// Deep copy: every node is duplicated into a fresh arena with the same shape.
    fn clone(&self) -> Self {
        let mut arena = Arena::new();
        let root = self.root.map(|root| {
            let copy_root = arena.allocate(self.copy_node(root));
            let mut stack = vec![(root, copy_root)];
            while let Some((source, copy)) = stack.pop() {
                let (left, right) = (self.arena[source].left, self.arena[source].right);
                if let Some(left) = left {
                    let copy_left = arena.allocate(self.copy_node(left));
                    arena[copy].left = Some(copy_left);
                    stack.push((left, copy_left));
                }
                if let Some(right) = right {
                    let copy_right = arena.allocate(self.copy_node(right));
                    arena[copy].right = Some(copy_right);
                    stack.push((right, copy_right));
                }
            }
            copy_root
        });
        SplayTree {
            id: next_tree_id(),
            arena,
            root,
            len: self.len,
            structural_epoch: 0,
            reshape_epoch: 0,
            comparator: self.comparator.clone(),
            validity: self.validity.clone(),
        }
    }
}

/// In-order iterator over a tree borrowed immutably. It never splays.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<Node<K, V>>,
    current: Option<Handle>,
    stack: Vec<Handle>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let node = &arena[handle];
            self.current = node.right;
            (&node.key, &node.value)
        })
    }
}

/// In-order iterator that consumes the tree.
pub struct IntoIter<K, V> {
    arena: Arena<Node<K, V>>,
    current: Option<Handle>,
    stack: Vec<Handle>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = self.arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let Node {
                key, value, right, ..
            } = self.arena.free(handle);
            self.current = right;
            (key, value)
        })
    }
}
