use crate::error::{Error, Result};
use crate::splay_tree::compare::{AcceptAll, Compare, KeyValidity, Natural};
use crate::splay_tree::cursor::Cursor;
use crate::splay_tree::tree::{self, SplayTree};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// An ordered map implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary tree with the additional property that recently
/// accessed items are quick to access again. Lookups, insertions and removals "splay" the accessed
/// key to the root of the tree, which is why `get` and `contains_key` need a mutable reference.
///
/// Keys are ordered by an injected comparator (`Natural` by default) and admitted by an injected
/// validity predicate (every key by default). Values are never mutated in place: replacing a value
/// swaps in a new node, which keeps paused cursors consistent.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayMap;
///
/// let mut map = SplayMap::new();
/// map.insert(0, 1).unwrap();
/// map.insert(3, 4).unwrap();
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.first_key(), Some(&0));
/// assert_eq!(map.first_key_after(&0), Ok(Some(&3)));
///
/// assert_eq!(map.insert(0, 2), Ok(Some(1)));
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct SplayMap<K, V, C = Natural, P = AcceptAll> {
    tree: SplayTree<K, V, C, P>,
}

impl<K, V> SplayMap<K, V>
where
    K: Ord,
{
    /// Constructs a new, empty `SplayMap<K, V>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// ```
    pub fn new() -> Self {
        SplayMap {
            tree: SplayTree::new(Natural, AcceptAll),
        }
    }
}

impl<K, V, C, P> SplayMap<K, V, C, P> {
    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values. Positioned cursors fail on their next step.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(2, 2).unwrap();
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns `true` if some key maps to `value`. Does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, "one").unwrap();
    /// assert!(map.has_value(&"one"));
    /// assert!(!map.has_value(&"two"));
    /// ```
    pub fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|other| other == value)
    }

    /// Calls `f` on every key-value pair in order. Does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(2, 20).unwrap();
    /// map.insert(1, 10).unwrap();
    ///
    /// let mut sum = 0;
    /// map.for_each(|key, value| sum += key * value);
    /// assert_eq!(sum, 50);
    /// ```
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            f(key, value);
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal and does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(2, 2).unwrap();
    /// map.insert(1, 1).unwrap();
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplayMapIter<K, V> {
        SplayMapIter {
            inner: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys of the map, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(2, 'b').unwrap();
    /// map.insert(1, 'a').unwrap();
    /// assert_eq!(map.keys().collect::<Vec<&u32>>(), vec![&1, &2]);
    /// ```
    pub fn keys(&self) -> Keys<K, V> {
        Keys {
            inner: self.tree.iter(),
        }
    }

    /// Returns an iterator over the values of the map, ordered by their keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(2, 'b').unwrap();
    /// map.insert(1, 'a').unwrap();
    /// assert_eq!(map.values().collect::<Vec<&char>>(), vec![&'a', &'b']);
    /// ```
    pub fn values(&self) -> Values<K, V> {
        Values {
            inner: self.tree.iter(),
        }
    }

    /// Returns a detached cursor over the map. See `MapCursor`.
    pub fn cursor(&self) -> MapCursor<K, V> {
        MapCursor::new()
    }
}

impl<K, V, C> SplayMap<K, V, C>
where
    C: Compare<K>,
{
    /// Constructs a new, empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::with_comparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
    /// map.insert(-3, "three").unwrap();
    /// map.insert(1, "one").unwrap();
    /// assert_eq!(map.get(&3), Some(&"three"));
    /// assert_eq!(map.keys().collect::<Vec<&i32>>(), vec![&1, &-3]);
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        SplayMap {
            tree: SplayTree::new(comparator, AcceptAll),
        }
    }
}

impl<K, V, C, P> SplayMap<K, V, C, P>
where
    C: Compare<K>,
    P: KeyValidity<K>,
{
    /// Constructs a new, empty map ordered by `comparator` that only admits keys accepted by
    /// `validity`. Any `Fn(&K) -> bool` can be used as `validity`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    /// use splay_collections::Error;
    ///
    /// let mut map = SplayMap::with_comparator_and_validity(
    ///     |a: &f64, b: &f64| a.partial_cmp(b).unwrap(),
    ///     |key: &f64| !key.is_nan(),
    /// );
    /// assert!(map.insert(1.5, ()).is_ok());
    /// assert!(matches!(map.insert(f64::NAN, ()), Err(Error::InvalidArgument(_))));
    /// ```
    pub fn with_comparator_and_validity(comparator: C, validity: P) -> Self {
        SplayMap {
            tree: SplayTree::new(comparator, validity),
        }
    }

    fn check_key(&self, key: &K) -> Result<()> {
        if self.tree.is_valid(key) {
            Ok(())
        } else {
            Err(Error::InvalidArgument("key rejected by the map's validity predicate"))
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, the value is
    /// replaced and the old value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.insert(1, 1), Ok(None));
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Ok(Some(1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.check_key(&key)?;
        let comp = self.tree.splay(&key);
        match (comp, self.tree.root()) {
            (Some(Ordering::Equal), Some(root)) => {
                let (_, old_value) = self.tree.replace_value(root, None, value);
                Ok(Some(old_value))
            },
            _ => {
                self.tree.insert_root(key, value, comp);
                Ok(None)
            },
        }
    }

    /// Inserts every key-value pair of `entries`, replacing the values of existing keys.
    ///
    /// # Errors
    ///
    /// Stops at the first key the validity predicate rejects and returns
    /// `Error::InvalidArgument`. Pairs before it stay inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 'x').unwrap();
    /// map.set_all(vec![(1, 'a'), (2, 'b')]).unwrap();
    /// assert_eq!(map.iter().collect::<Vec<_>>(), vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    pub fn set_all<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Returns the value of `key`, inserting the value computed by `if_absent` first if the key
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.set_if_absent(1, || 10), Ok(&10));
    /// assert_eq!(map.set_if_absent(1, || 20), Ok(&10));
    /// ```
    pub fn set_if_absent<F>(&mut self, key: K, if_absent: F) -> Result<&V>
    where
        F: FnOnce() -> V,
    {
        self.check_key(&key)?;
        let comp = self.tree.splay(&key);
        let handle = match (comp, self.tree.root()) {
            (Some(Ordering::Equal), Some(root)) => root,
            _ => self.tree.insert_root(key, if_absent(), comp),
        };
        Ok(&self.tree.node(handle).value)
    }

    /// Replaces the value of `key` with `update` applied to the current value and returns the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key` and
    /// `Error::KeyNotFound` if the key does not exist. In both cases the map is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    /// use splay_collections::Error;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert("a", 1).unwrap();
    /// assert_eq!(map.update(&"a", |value| value + 1), Ok(&2));
    /// assert_eq!(map.update(&"b", |value| value + 1), Err(Error::KeyNotFound));
    /// ```
    pub fn update<F>(&mut self, key: &K, update: F) -> Result<&V>
    where
        F: FnOnce(&V) -> V,
    {
        self.check_key(key)?;
        if self.tree.find(key).is_none() {
            return Err(Error::KeyNotFound);
        }
        let root = self.tree.get(key).ok_or(Error::KeyNotFound)?;
        let value = update(&self.tree.node(root).value);
        let (replacement, _) = self.tree.replace_value(root, None, value);
        Ok(&self.tree.node(replacement).value)
    }

    /// Like `update`, but inserts the value computed by `if_absent` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut counts = SplayMap::new();
    /// for word in "a b a".split(' ') {
    ///     counts.update_or_insert(word, |count| count + 1, || 1).unwrap();
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// assert_eq!(counts.get(&"b"), Some(&1));
    /// ```
    pub fn update_or_insert<F, G>(&mut self, key: K, update: F, if_absent: G) -> Result<&V>
    where
        F: FnOnce(&V) -> V,
        G: FnOnce() -> V,
    {
        self.check_key(&key)?;
        let comp = self.tree.splay(&key);
        let handle = match (comp, self.tree.root()) {
            (Some(Ordering::Equal), Some(root)) => {
                let value = update(&self.tree.node(root).value);
                self.tree.replace_value(root, None, value).0
            },
            _ => self.tree.insert_root(key, if_absent(), comp),
        };
        Ok(&self.tree.node(handle).value)
    }

    /// Replaces every value with `f` applied to its key and current value, walking the map in
    /// order with a cursor.
    ///
    /// # Errors
    ///
    /// Propagates cursor errors. None can occur while the map is exclusively borrowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(2, 2).unwrap();
    /// map.update_all(|key, value| key * 10 + value).unwrap();
    /// assert_eq!(map.iter().collect::<Vec<_>>(), vec![(&1, &11), (&2, &22)]);
    /// ```
    pub fn update_all<F>(&mut self, mut f: F) -> Result<()>
    where
        K: Clone,
        F: FnMut(&K, &V) -> V,
    {
        let mut cursor = Cursor::new();
        while let Some(handle) = cursor.advance(&mut self.tree)? {
            let node = self.tree.node(handle);
            let value = f(&node.key, &node.value);
            cursor.replace_value(&mut self.tree, value)?;
        }
        Ok(())
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        if !self.tree.is_valid(key) {
            return None;
        }
        self.tree.remove(key)
    }

    /// Checks if a key exists in the map. Splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&mut self, key: &K) -> bool {
        self.tree.has(key)
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map. Splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let handle = self.tree.get(key)?;
        Some(&self.tree.node(handle).value)
    }

    /// Returns the minimum key of the map, or `None` if the map is empty. Splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    /// assert_eq!(map.first_key(), Some(&1));
    /// ```
    pub fn first_key(&mut self) -> Option<&K> {
        let handle = self.tree.first()?;
        Some(&self.tree.node(handle).key)
    }

    /// Returns the maximum key of the map, or `None` if the map is empty. Splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    /// assert_eq!(map.last_key(), Some(&3));
    /// ```
    pub fn last_key(&mut self) -> Option<&K> {
        let handle = self.tree.last()?;
        Some(&self.tree.node(handle).key)
    }

    /// Returns the greatest key strictly less than `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    /// assert_eq!(map.last_key_before(&3), Ok(Some(&1)));
    /// assert_eq!(map.last_key_before(&1), Ok(None));
    /// ```
    pub fn last_key_before(&mut self, key: &K) -> Result<Option<&K>> {
        self.check_key(key)?;
        let handle = self.tree.last_before(key);
        let tree = &self.tree;
        Ok(handle.map(move |handle| &tree.node(handle).key))
    }

    /// Returns the least key strictly greater than `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1).unwrap();
    /// map.insert(3, 3).unwrap();
    /// assert_eq!(map.first_key_after(&1), Ok(Some(&3)));
    /// assert_eq!(map.first_key_after(&3), Ok(None));
    /// ```
    pub fn first_key_after(&mut self, key: &K) -> Result<Option<&K>> {
        self.check_key(key)?;
        let handle = self.tree.first_after(key);
        let tree = &self.tree;
        Ok(handle.map(move |handle| &tree.node(handle).key))
    }
}

impl<K, V, C, P> IntoIterator for SplayMap<K, V, C, P> {
    type IntoIter = SplayMapIntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        SplayMapIntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, K, V, C, P> IntoIterator for &'a SplayMap<K, V, C, P>
where
    K: 'a,
    V: 'a,
{
    type IntoIter = SplayMapIter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplayMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct SplayMapIntoIter<K, V> {
    inner: tree::IntoIter<K, V>,
}

impl<K, V> Iterator for SplayMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An iterator for `SplayMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    inner: tree::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for SplayMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An iterator over the keys of a `SplayMap<K, V, C>`.
pub struct Keys<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    inner: tree::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// An iterator over the values of a `SplayMap<K, V, C>`.
pub struct Values<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    inner: tree::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}

/// A detached in-order cursor over a `SplayMap<K, V, C>`.
///
/// Unlike `SplayMapIter`, a cursor does not borrow the map between steps: every step is handed the
/// map, so the map can be used while the cursor is paused. Lookups and value replacements in the
/// meantime are fine, the cursor finds its place again. Inserting or removing a key (or clearing
/// the map) makes the next step of a positioned cursor fail with
/// `Error::ConcurrentModification`. A cursor belongs to the map it was first stepped with;
/// stepping it with any other map fails with `Error::BadState`.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplayMap;
/// use splay_collections::Error;
///
/// let mut map = SplayMap::new();
/// map.insert(1, 'a').unwrap();
/// map.insert(2, 'b').unwrap();
/// map.insert(3, 'c').unwrap();
///
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.next(&mut map), Ok(Some((&1, &'a'))));
///
/// // A lookup splays the tree; the cursor heals.
/// assert_eq!(map.get(&3), Some(&'c'));
/// assert_eq!(cursor.next(&mut map), Ok(Some((&2, &'b'))));
///
/// // Removing a key invalidates it.
/// map.remove(&3);
/// assert_eq!(cursor.next(&mut map), Err(Error::ConcurrentModification));
/// ```
pub struct MapCursor<K, V> {
    raw: Cursor<K>,
    marker: PhantomData<V>,
}

impl<K, V> MapCursor<K, V> {
    /// Constructs a cursor that will start at the smallest key on its first step.
    pub fn new() -> Self {
        MapCursor {
            raw: Cursor::new(),
            marker: PhantomData,
        }
    }
}

impl<K, V> MapCursor<K, V>
where
    K: Clone,
{
    /// Advances the cursor and returns the next key-value pair, or `None` once every pair has been
    /// visited. Once a cursor has returned `None` it is exhausted for good: it keeps returning
    /// `None` even if keys are inserted afterwards. Start a new cursor to see them.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConcurrentModification` if a key was inserted or removed since the previous
    /// step, and `Error::BadState` if `map` is not the map the cursor was started on.
    pub fn next<'a, C, P>(
        &mut self,
        map: &'a mut SplayMap<K, V, C, P>,
    ) -> Result<Option<(&'a K, &'a V)>>
    where
        C: Compare<K>,
        P: KeyValidity<K>,
    {
        let handle = self.raw.advance(&mut map.tree)?;
        let tree = &map.tree;
        Ok(handle.map(move |handle| {
            let node = tree.node(handle);
            (&node.key, &node.value)
        }))
    }

    /// Replaces the value of the pair the cursor is positioned at and returns the old value.
    /// Other positioned cursors over the same map stay valid.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadState` if the cursor has not produced an element yet, is exhausted or
    /// was started on another map, and `Error::ConcurrentModification` if a key was inserted or
    /// removed since the previous step.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 10).unwrap();
    ///
    /// let mut cursor = map.cursor();
    /// cursor.next(&mut map).unwrap();
    /// assert_eq!(cursor.replace_value(&mut map, 11), Ok(10));
    /// assert_eq!(map.get(&1), Some(&11));
    /// ```
    pub fn replace_value<C, P>(&mut self, map: &mut SplayMap<K, V, C, P>, value: V) -> Result<V>
    where
        C: Compare<K>,
        P: KeyValidity<K>,
    {
        self.raw.replace_value(&mut map.tree, value)
    }
}

impl<K, V> Default for MapCursor<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Default for SplayMap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, P> Clone for SplayMap<K, V, C, P>
where
    K: Clone,
    V: Clone,
    C: Clone,
    P: Clone,
{
    /// Deep copy. The clone shares no nodes with `self`.
    fn clone(&self) -> Self {
        SplayMap {
            tree: self.tree.clone(),
        }
    }
}

impl<K, V, C, P> fmt::Debug for SplayMap<K, V, C, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
