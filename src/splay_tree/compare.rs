use std::cmp::Ordering;

/// A three-way comparator injected into a splay tree.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator, so closures can be passed directly.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// set.insert(1).unwrap();
/// set.insert(2).unwrap();
/// assert_eq!(set.iter().collect::<Vec<&i32>>(), vec![&2, &1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The comparator of keys that implement `Ord`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<K> Compare<K> for Natural
where
    K: Ord + ?Sized,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Predicate deciding which keys a container accepts.
///
/// Any `Fn(&K) -> bool` is a predicate, so closures (including ones that capture state) can be
/// passed directly.
pub trait KeyValidity<K: ?Sized> {
    /// Returns `true` if `key` may be stored in or searched for in the container.
    fn is_valid(&self, key: &K) -> bool;
}

/// The predicate that accepts every key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AcceptAll;

impl<K> KeyValidity<K> for AcceptAll
where
    K: ?Sized,
{
    fn is_valid(&self, _: &K) -> bool {
        true
    }
}

impl<K, F> KeyValidity<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> bool,
{
    fn is_valid(&self, key: &K) -> bool {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{AcceptAll, Compare, KeyValidity, Natural};
    use std::cmp::Ordering;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_closure() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        assert_eq!(by_len.compare(&"ab".to_string(), &"c".to_string()), Ordering::Greater);
        assert_eq!(by_len.compare(&"ab".to_string(), &"cd".to_string()), Ordering::Equal);
    }

    #[test]
    fn test_validity() {
        assert!(AcceptAll.is_valid(&f64::NAN));
        let limit = 10;
        let below_limit = move |key: &u32| *key < limit;
        assert!(below_limit.is_valid(&9));
        assert!(!below_limit.is_valid(&10));
    }
}
