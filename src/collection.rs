//! Pure helpers over in-memory sequences.
//!
//! None of these functions mutate their input; each returns a new
//! collection. They are used to normalise participant lists, submission
//! batches and the like before handing them to a contract call.
//!
//! - [`dedupe`] / [`dedupe_hashed`] - Keep first occurrences, in order
//! - [`chunk`] - Split into fixed-size batches
//! - [`group_by_func`] / [`group_by_keys`] - Partition into ordered [`Groups`]
//! - [`sequence_equals`] - Order-sensitive element-wise equality
//!
//! # Example
//!
//! ```rust
//! use tidewait::collection::{chunk, dedupe, group_by_func};
//!
//! let participants = vec!["0xa1", "0xb2", "0xa1", "0xc3"];
//! let unique = dedupe(&participants);
//! assert_eq!(unique, vec!["0xa1", "0xb2", "0xc3"]);
//!
//! let batches = chunk(&unique, 2).unwrap();
//! assert_eq!(batches, vec![vec!["0xa1", "0xb2"], vec!["0xc3"]]);
//!
//! let by_prefix = group_by_func(&unique, |addr| addr[..3].to_string());
//! assert_eq!(by_prefix.get(&"0xa".to_string()), Some(&vec!["0xa1"]));
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Error for arguments outside a function's domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    name: &'static str,
    reason: String,
}

impl InvalidArgument {
    /// Create an error for argument `name`.
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }

    /// The offending argument.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Why it was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument `{}`: {}", self.name, self.reason)
    }
}

impl std::error::Error for InvalidArgument {}

/// Keep the first occurrence of each distinct element, preserving order.
///
/// Equality is `PartialEq`, so this compares every element against the
/// ones already kept: O(n²). Fine for the short lists scripts deal with;
/// use [`dedupe_hashed`] for large inputs.
pub fn dedupe<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }
    unique
}

/// [`dedupe`] for hashable elements, in O(n).
pub fn dedupe_hashed<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/// Split `items` into consecutive chunks of `chunk_size`.
///
/// Every chunk but the last has exactly `chunk_size` elements. An empty
/// input yields no chunks.
///
/// # Errors
///
/// Returns [`InvalidArgument`] when `chunk_size` is zero.
///
/// # Examples
///
/// ```rust
/// use tidewait::collection::chunk;
///
/// assert_eq!(chunk(&[1, 2, 3, 4, 5], 2).unwrap(), vec![vec![1, 2], vec![3, 4], vec![5]]);
/// assert!(chunk(&[1, 2, 3], 0).is_err());
/// ```
pub fn chunk<T: Clone>(
    items: &[T],
    chunk_size: usize,
) -> Result<Vec<Vec<T>>, InvalidArgument> {
    if chunk_size == 0 {
        return Err(InvalidArgument::new("chunk_size", "must be a positive integer"));
    }
    Ok(items.chunks(chunk_size).map(<[T]>::to_vec).collect())
}

/// An insertion-ordered mapping from group key to group members.
///
/// Groups appear in the order their key was first seen; members keep their
/// input order.
#[derive(Debug, Clone)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
    index: HashMap<K, usize>,
}

impl<K: PartialEq, T: PartialEq> PartialEq for Groups<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, T: Eq> Eq for Groups<K, T> {}

impl<K, T> Default for Groups<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, T> Groups<K, T> {
    fn push(&mut self, key: K, item: T) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.push(item),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![item]));
            }
        }
    }

    /// Members of the group with `key`.
    pub fn get(&self, key: &K) -> Option<&Vec<T>> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Returns true if a group with `key` exists.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K, T> Groups<K, T> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// `(key, members)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Vec<T>)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Concatenate all groups in order.
    pub fn flatten(self) -> Vec<T> {
        self.entries.into_iter().flat_map(|(_, v)| v).collect()
    }

    /// Unwrap into ordered `(key, members)` pairs.
    pub fn into_vec(self) -> Vec<(K, Vec<T>)> {
        self.entries
    }
}

impl<K, T> IntoIterator for Groups<K, T> {
    type Item = (K, Vec<T>);
    type IntoIter = std::vec::IntoIter<(K, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partition `items` by the key `key_fn` computes for each element.
///
/// # Examples
///
/// ```rust
/// use tidewait::collection::group_by_func;
///
/// let cycles = [3, 8, 4, 9, 6];
/// let groups = group_by_func(&cycles, |n| n % 2 == 0);
///
/// assert_eq!(groups.keys().collect::<Vec<_>>(), vec![&false, &true]);
/// assert_eq!(groups.get(&true), Some(&vec![8, 4, 6]));
/// ```
pub fn group_by_func<T, K, F>(items: &[T], key_fn: F) -> Groups<K, T>
where
    T: Clone,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut groups = Groups::default();
    for item in items {
        groups.push(key_fn(item), item.clone());
    }
    groups
}

/// Partition `items` by a composite key made of several projected fields.
///
/// The key is the ordered list of projected values, compared structurally,
/// so values containing any separator character cannot collide.
///
/// # Examples
///
/// ```rust
/// use tidewait::collection::group_by_keys;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Submission { cycle: String, author: String, url: String }
///
/// fn cycle(s: &Submission) -> String { s.cycle.clone() }
/// fn author(s: &Submission) -> String { s.author.clone() }
///
/// let subs = vec![
///     Submission { cycle: "1".into(), author: "ann".into(), url: "a".into() },
///     Submission { cycle: "1".into(), author: "bo".into(), url: "b".into() },
///     Submission { cycle: "1".into(), author: "ann".into(), url: "c".into() },
/// ];
///
/// let groups = group_by_keys(&subs, &[&cycle, &author]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.get(&vec!["1".to_string(), "ann".to_string()]).unwrap().len(), 2);
/// ```
pub fn group_by_keys<T, K>(items: &[T], selectors: &[&dyn Fn(&T) -> K]) -> Groups<Vec<K>, T>
where
    T: Clone,
    K: Eq + Hash + Clone,
{
    group_by_func(items, |item| {
        selectors.iter().map(|select| select(item)).collect()
    })
}

/// Order-sensitive equality of two optional sequences.
///
/// True when both are absent, both are the same slice, or both have the
/// same length and equal elements at every position.
///
/// # Examples
///
/// ```rust
/// use tidewait::collection::sequence_equals;
///
/// let a = [1, 2, 3];
/// assert!(sequence_equals(Some(&a[..]), Some(&[1, 2, 3][..])));
/// assert!(!sequence_equals(Some(&a[..]), Some(&[3, 2, 1][..])));
/// assert!(!sequence_equals(Some(&a[..]), None));
/// assert!(sequence_equals::<i32>(None, None));
/// ```
pub fn sequence_equals<T: PartialEq>(a: Option<&[T]>, b: Option<&[T]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::eq(a, b) || a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Member {
        team: String,
        role: String,
        name: &'static str,
    }

    fn member(team: &str, role: &str, name: &'static str) -> Member {
        Member {
            team: team.to_string(),
            role: role.to_string(),
            name,
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(dedupe(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert_eq!(dedupe::<i32>(&[]), Vec::<i32>::new());
    }

    #[test]
    fn test_dedupe_with_partial_eq_only() {
        // f64 is PartialEq but not Hash.
        assert_eq!(dedupe(&[1.5, 2.0, 1.5]), vec![1.5, 2.0]);
    }

    #[test]
    fn test_chunk_exact_and_remainder() {
        assert_eq!(chunk(&[1, 2, 3, 4], 2).unwrap(), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(chunk(&[1, 2, 3], 5).unwrap(), vec![vec![1, 2, 3]]);
        assert!(chunk::<u8>(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_zero_size() {
        let err = chunk(&[1], 0).unwrap_err();
        assert_eq!(err.name(), "chunk_size");
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_group_by_keys_avoids_separator_collisions() {
        // Joined with "-" both would read "a-b-c".
        let members = vec![member("a-b", "c", "first"), member("a", "b-c", "second")];
        let team = |m: &Member| m.team.clone();
        let role = |m: &Member| m.role.clone();

        let groups = group_by_keys(&members, &[&team, &role]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_group_by_keys_orders_groups_and_members() {
        let members = vec![
            member("core", "dev", "ann"),
            member("ops", "dev", "bo"),
            member("core", "dev", "cy"),
            member("core", "lead", "di"),
        ];
        let team = |m: &Member| m.team.clone();
        let role = |m: &Member| m.role.clone();

        let groups = group_by_keys(&members, &[&team, &role]);
        let names: Vec<Vec<&str>> = groups
            .iter()
            .map(|(_, ms)| ms.iter().map(|m| m.name).collect())
            .collect();

        assert_eq!(names, vec![vec!["ann", "cy"], vec!["bo"], vec!["di"]]);
        assert!(groups.contains_key(&vec!["ops".to_string(), "dev".to_string()]));
    }

    #[test]
    fn test_groups_into_vec() {
        let groups = group_by_func(&["x", "yy", "z"], |s| s.len());
        assert_eq!(groups.into_vec(), vec![(1, vec!["x", "z"]), (2, vec!["yy"])]);
    }

    #[test]
    fn test_sequence_equals_same_slice() {
        let v = vec![1, 2];
        assert!(sequence_equals(Some(v.as_slice()), Some(v.as_slice())));
        assert!(!sequence_equals(Some(&v[..]), Some(&[1, 2, 3][..])));
    }
}
