use crate::error::{Error, Result};
use crate::splay_tree::compare::{AcceptAll, Compare, KeyValidity, Natural};
use crate::splay_tree::cursor::Cursor;
use crate::splay_tree::tree::{self, SplayTree};
use std::cmp::Ordering;
use std::fmt;

/// An ordered set implemented using a splay tree.
///
/// Every lookup splays the accessed key (or its nearest neighbour) to the root, so sequences of
/// accesses with locality are cheap. Elements are ordered by an injected comparator (`Natural` by
/// default) and admitted by an injected validity predicate (every element by default).
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::new();
/// for key in &[5, 3, 8, 1, 4] {
///     set.insert(*key).unwrap();
/// }
///
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &4, &5, &8]);
/// assert_eq!(set.first(), Ok(&1));
/// assert_eq!(set.last(), Ok(&8));
/// assert_eq!(set.last_before(&4), Ok(Some(&3)));
/// assert_eq!(set.first_after(&4), Ok(Some(&5)));
///
/// assert!(set.remove(&3));
/// assert_eq!(set.len(), 4);
/// ```
pub struct SplaySet<K, C = Natural, P = AcceptAll> {
    tree: SplayTree<K, (), C, P>,
}

impl<K> SplaySet<K>
where
    K: Ord,
{
    /// Constructs a new, empty `SplaySet<K>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self {
        SplaySet {
            tree: SplayTree::new(Natural, AcceptAll),
        }
    }
}

impl<K, C, P> SplaySet<K, C, P> {
    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all elements. Positioned cursors fail on their next step.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the only element of the set. Does not splay the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadState` if the set is empty or has more than one element.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert!(set.single().is_err());
    /// set.insert(1).unwrap();
    /// assert_eq!(set.single(), Ok(&1));
    /// set.insert(2).unwrap();
    /// assert!(set.single().is_err());
    /// ```
    pub fn single(&self) -> Result<&K> {
        match self.len() {
            0 => Err(Error::BadState("no element")),
            1 => self
                .tree
                .root_node()
                .map(|node| &node.key)
                .ok_or(Error::BadState("no element")),
            _ => Err(Error::BadState("too many elements")),
        }
    }

    /// Calls `f` on every element in order. Does not splay the tree.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        for key in self.iter() {
            f(key);
        }
    }

    /// Returns an iterator over the set. The iterator will yield elements using in-order
    /// traversal and does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(2).unwrap();
    /// set.insert(1).unwrap();
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplaySetIter<K> {
        SplaySetIter {
            inner: self.tree.iter(),
        }
    }

    /// Returns a detached cursor over the set. See `SetCursor`.
    pub fn cursor(&self) -> SetCursor<K> {
        SetCursor::new()
    }
}

impl<K, C> SplaySet<K, C>
where
    C: Compare<K>,
{
    /// Constructs a new, empty set ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::with_comparator(|a: &String, b: &String| {
    ///     a.to_lowercase().cmp(&b.to_lowercase())
    /// });
    /// set.insert("Apple".to_string()).unwrap();
    /// assert_eq!(set.insert("APPLE".to_string()), Ok(false));
    /// assert_eq!(set.lookup(&"apple".to_string()), Some(&"Apple".to_string()));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        SplaySet {
            tree: SplayTree::new(comparator, AcceptAll),
        }
    }
}

impl<K, C, P> SplaySet<K, C, P>
where
    C: Compare<K>,
    P: KeyValidity<K>,
{
    /// Constructs a new, empty set ordered by `comparator` that only admits elements accepted by
    /// `validity`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{Natural, SplaySet};
    ///
    /// let limit = 100;
    /// let mut set = SplaySet::with_comparator_and_validity(Natural, move |key: &u32| *key < limit);
    /// assert_eq!(set.insert(99), Ok(true));
    /// assert!(set.insert(100).is_err());
    /// ```
    pub fn with_comparator_and_validity(comparator: C, validity: P) -> Self {
        SplaySet {
            tree: SplayTree::new(comparator, validity),
        }
    }

    fn check_key(&self, key: &K) -> Result<()> {
        if self.tree.is_valid(key) {
            Ok(())
        } else {
            Err(Error::InvalidArgument("element rejected by the set's validity predicate"))
        }
    }

    /// Searches without splaying. Used where `self` is only borrowed immutably.
    fn holds(&self, key: &K) -> bool {
        self.tree.is_valid(key) && self.tree.find(key).is_some()
    }

    /// Adds an already validated element. Returns `true` if it was not present.
    fn add(&mut self, key: K) -> bool {
        let comp = self.tree.splay(&key);
        if comp == Some(Ordering::Equal) {
            return false;
        }
        self.tree.insert_root(key, (), comp);
        true
    }

    /// Adds an element to the set. Returns `true` if the element was not already present; an
    /// existing equal element is kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.insert(1), Ok(true));
    /// assert_eq!(set.insert(1), Ok(false));
    /// assert!(set.contains(&1));
    /// ```
    pub fn insert(&mut self, key: K) -> Result<bool> {
        self.check_key(&key)?;
        Ok(self.add(key))
    }

    /// Adds every element of `keys`.
    ///
    /// # Errors
    ///
    /// Stops at the first element the validity predicate rejects and returns
    /// `Error::InvalidArgument`. Elements before it stay inserted.
    pub fn insert_all<I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.insert(key)?;
        }
        Ok(())
    }

    /// Removes an element from the set. Returns `true` if the element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.tree.is_valid(key) && self.tree.remove(key).is_some()
    }

    /// Removes every element of `keys`.
    pub fn remove_all<'a, I>(&mut self, keys: I)
    where
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        for key in keys {
            self.remove(key);
        }
    }

    /// Checks if an element exists in the set. Splays the tree.
    pub fn contains(&mut self, key: &K) -> bool {
        self.tree.has(key)
    }

    /// Returns the stored element equal to `key` under the comparator. Splays the tree.
    pub fn lookup(&mut self, key: &K) -> Option<&K> {
        let handle = self.tree.get(key)?;
        Some(&self.tree.node(handle).key)
    }

    /// Returns the minimum element. Splays the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadState` if the set is empty.
    pub fn first(&mut self) -> Result<&K> {
        let handle = self.tree.first().ok_or(Error::BadState("no element"))?;
        Ok(&self.tree.node(handle).key)
    }

    /// Returns the maximum element. Splays the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadState` if the set is empty.
    pub fn last(&mut self) -> Result<&K> {
        let handle = self.tree.last().ok_or(Error::BadState("no element"))?;
        Ok(&self.tree.node(handle).key)
    }

    /// Returns the greatest element strictly less than `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    pub fn last_before(&mut self, key: &K) -> Result<Option<&K>> {
        self.check_key(key)?;
        let handle = self.tree.last_before(key);
        let tree = &self.tree;
        Ok(handle.map(move |handle| &tree.node(handle).key))
    }

    /// Returns the least element strictly greater than `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the validity predicate rejects `key`.
    pub fn first_after(&mut self, key: &K) -> Result<Option<&K>> {
        self.check_key(key)?;
        let handle = self.tree.first_after(key);
        let tree = &self.tree;
        Ok(handle.map(move |handle| &tree.node(handle).key))
    }

    /// Keeps only the elements that are equal to some element of `keys`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert_all(vec![1, 2, 3, 4]).unwrap();
    /// set.retain_all(&[2, 4, 6]);
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &4]);
    /// ```
    pub fn retain_all<'a, I>(&mut self, keys: I)
    where
        K: Clone + 'a,
        C: Clone,
        P: Clone,
        I: IntoIterator<Item = &'a K>,
    {
        let mut retained = SplayTree::new(
            self.tree.comparator().clone(),
            self.tree.validity().clone(),
        );
        for key in keys {
            if let Some(handle) = self.tree.get(key) {
                let key = self.tree.node(handle).key.clone();
                let comp = retained.splay(&key);
                if comp != Some(Ordering::Equal) {
                    retained.insert_root(key, (), comp);
                }
            }
        }
        if retained.len() != self.tree.len() {
            self.tree.adopt(retained);
        }
    }

    fn empty_like(&self) -> Self
    where
        C: Clone,
        P: Clone,
    {
        Self::with_comparator_and_validity(
            self.tree.comparator().clone(),
            self.tree.validity().clone(),
        )
    }

    /// Returns a new set with the elements of `self` that are also in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut a = SplaySet::new();
    /// a.insert_all(vec![1, 2, 3]).unwrap();
    /// let mut b = SplaySet::new();
    /// b.insert_all(vec![2, 3, 4]).unwrap();
    /// assert_eq!(a.intersection(&b).iter().collect::<Vec<&u32>>(), vec![&2, &3]);
    /// ```
    pub fn intersection<D, Q>(&self, other: &SplaySet<K, D, Q>) -> Self
    where
        K: Clone,
        C: Clone,
        P: Clone,
        D: Compare<K>,
        Q: KeyValidity<K>,
    {
        let mut result = self.empty_like();
        for key in self.iter().filter(|key| other.holds(key)) {
            result.add(key.clone());
        }
        result
    }

    /// Returns a new set with the elements of `self` that are not in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut a = SplaySet::new();
    /// a.insert_all(vec![1, 2, 3]).unwrap();
    /// let mut b = SplaySet::new();
    /// b.insert_all(vec![2, 3, 4]).unwrap();
    /// assert_eq!(a.difference(&b).iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn difference<D, Q>(&self, other: &SplaySet<K, D, Q>) -> Self
    where
        K: Clone,
        C: Clone,
        P: Clone,
        D: Compare<K>,
        Q: KeyValidity<K>,
    {
        let mut result = self.empty_like();
        for key in self.iter().filter(|key| !other.holds(key)) {
            result.add(key.clone());
        }
        result
    }

    /// Returns a new set with the elements of both `self` and `other`. Where both hold equal
    /// elements, the one from `self` is kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if an element of `other` is rejected by the validity
    /// predicate of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut a = SplaySet::new();
    /// a.insert_all(vec![1, 2]).unwrap();
    /// let mut b = SplaySet::new();
    /// b.insert_all(vec![2, 3]).unwrap();
    /// let union = a.union(&b).unwrap();
    /// assert_eq!(union.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// ```
    pub fn union<D, Q>(&self, other: &SplaySet<K, D, Q>) -> Result<Self>
    where
        K: Clone,
        C: Clone,
        P: Clone,
    {
        let mut result = self.clone();
        for key in other.iter() {
            result.insert(key.clone())?;
        }
        Ok(result)
    }
}

impl<K, C, P> IntoIterator for SplaySet<K, C, P> {
    type IntoIter = SplaySetIntoIter<K>;
    type Item = K;

    fn into_iter(self) -> Self::IntoIter {
        SplaySetIntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, K, C, P> IntoIterator for &'a SplaySet<K, C, P>
where
    K: 'a,
{
    type IntoIter = SplaySetIter<'a, K>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplaySet<K, C>`.
///
/// This iterator traverses the elements of the set in-order and yields owned elements.
pub struct SplaySetIntoIter<K> {
    inner: tree::IntoIter<K, ()>,
}

impl<K> Iterator for SplaySetIntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// An iterator for `SplaySet<K, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct SplaySetIter<'a, K>
where
    K: 'a,
{
    inner: tree::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for SplaySetIter<'a, K>
where
    K: 'a,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// A detached in-order cursor over a `SplaySet<K, C>`.
///
/// Same contract as `MapCursor`: lookups between steps are fine, insertions and removals make the
/// next step of a positioned cursor fail with `Error::ConcurrentModification`, and stepping it
/// with a set other than the one it started on fails with `Error::BadState`.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
/// use splay_collections::Error;
///
/// let mut set = SplaySet::new();
/// set.insert_all(vec![1, 2, 3]).unwrap();
///
/// let mut cursor = set.cursor();
/// assert_eq!(cursor.next(&mut set), Ok(Some(&1)));
/// assert!(set.contains(&3));
/// assert_eq!(cursor.next(&mut set), Ok(Some(&2)));
/// set.insert(4).unwrap();
/// assert_eq!(cursor.next(&mut set), Err(Error::ConcurrentModification));
/// ```
pub struct SetCursor<K> {
    raw: Cursor<K>,
}

impl<K> SetCursor<K> {
    /// Constructs a cursor that will start at the smallest element on its first step.
    pub fn new() -> Self {
        SetCursor { raw: Cursor::new() }
    }
}

impl<K> SetCursor<K>
where
    K: Clone,
{
    /// Advances the cursor and returns the next element, or `None` once every element has been
    /// visited. Once a cursor has returned `None` it is exhausted for good: it keeps returning
    /// `None` even if elements are inserted afterwards. Start a new cursor to see them.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConcurrentModification` if an element was inserted or removed since the
    /// previous step, and `Error::BadState` if `set` is not the set the cursor was started on.
    pub fn next<'a, C, P>(&mut self, set: &'a mut SplaySet<K, C, P>) -> Result<Option<&'a K>>
    where
        C: Compare<K>,
        P: KeyValidity<K>,
    {
        let handle = self.raw.advance(&mut set.tree)?;
        let tree = &set.tree;
        Ok(handle.map(move |handle| &tree.node(handle).key))
    }
}

impl<K> Default for SetCursor<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Default for SplaySet<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C, P> Clone for SplaySet<K, C, P>
where
    K: Clone,
    C: Clone,
    P: Clone,
{
    /// Deep copy. The clone shares no nodes with `self`.
    fn clone(&self) -> Self {
        SplaySet {
            tree: self.tree.clone(),
        }
    }
}

impl<K, C, P> fmt::Debug for SplaySet<K, C, P>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
