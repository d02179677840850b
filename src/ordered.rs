//! Ordered list of names
//!
//! Used for the installed-app list and the middleware chain, where position
//! matters and repeated configuration must not produce duplicates.

use serde::{Deserialize, Serialize};

/// An ordered list of dotted names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedList(Vec<String>);

impl OrderedList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|existing| existing == item)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Count of entries equal to `item`.
    pub fn occurrences(&self, item: &str) -> usize {
        self.0.iter().filter(|existing| *existing == item).count()
    }

    /// Append `item` unless already present. Returns whether the list changed.
    pub fn push_if_absent(&mut self, item: &str) -> bool {
        if self.contains(item) {
            return false;
        }
        self.0.push(item.to_string());
        true
    }

    /// Make `item` the first entry, exactly once.
    ///
    /// Inserts it when absent; an occurrence elsewhere in the list is moved to
    /// the front. Returns whether the list changed.
    pub fn insert_front_if_absent(&mut self, item: &str) -> bool {
        if self.first() == Some(item) && self.occurrences(item) == 1 {
            return false;
        }
        self.0.retain(|existing| existing != item);
        self.0.insert(0, item.to_string());
        true
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_if_absent() {
        let mut list = OrderedList::new();
        assert!(list.push_if_absent("debug_toolbar"));
        assert!(!list.push_if_absent("debug_toolbar"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insert_front_if_absent_is_idempotent() {
        let mut list: OrderedList = ["a", "b"].into_iter().collect();
        assert!(list.insert_front_if_absent("x"));
        assert!(!list.insert_front_if_absent("x"));
        assert_eq!(list.as_slice(), ["x", "a", "b"]);
    }

    #[test]
    fn test_insert_front_moves_existing_entry() {
        let mut list: OrderedList = ["a", "x", "b", "x"].into_iter().collect();
        assert!(list.insert_front_if_absent("x"));
        assert_eq!(list.as_slice(), ["x", "a", "b"]);
        assert_eq!(list.occurrences("x"), 1);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list: OrderedList = ["a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
    }
}
