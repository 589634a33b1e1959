use std::fmt;

use serde::{Deserialize, Serialize};

/// The ordered string key columns of a table row.
///
/// Key tuples are compared component-wise. A tuple `k` matches a prefix `p`
/// when `p.len() <= k.len()` and `k[i] == p[i]` for every `i < p.len()`;
/// trailing key columns are unconstrained. The empty prefix matches every
/// tuple.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyTuple(Vec<String>);

impl KeyTuple {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    /// Number of key columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Returns `true` if the leading columns of this tuple equal `prefix`.
    pub fn has_prefix<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        prefix.len() <= self.0.len()
            && self
                .0
                .iter()
                .zip(prefix)
                .all(|(column, wanted)| column == wanted.as_ref())
    }
}

impl fmt::Debug for KeyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyTuple{self}")
    }
}

impl fmt::Display for KeyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<Vec<String>> for KeyTuple {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}

impl From<&[String]> for KeyTuple {
    fn from(columns: &[String]) -> Self {
        Self(columns.to_vec())
    }
}

impl<S: Into<String>> FromIterator<S> for KeyTuple {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(parts: &[&str]) -> KeyTuple {
        parts.iter().copied().collect()
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let empty: [&str; 0] = [];
        assert!(key(&["2017", "TR", "100"]).has_prefix(&empty));
        assert!(KeyTuple::default().has_prefix(&empty));
    }

    #[test]
    fn leading_columns_must_match() {
        let k = key(&["2017", "TR", "100"]);
        assert!(k.has_prefix(&["2017"]));
        assert!(k.has_prefix(&["2017", "TR"]));
        assert!(k.has_prefix(&["2017", "TR", "100"]));
        assert!(!k.has_prefix(&["2016"]));
        assert!(!k.has_prefix(&["2017", "AH"]));
        assert!(!k.has_prefix(&["TR"]));
    }

    #[test]
    fn longer_prefix_never_matches() {
        let k = key(&["a", "b"]);
        assert!(!k.has_prefix(&["a", "b", "c"]));
    }

    #[test]
    fn column_equality_is_exact() {
        // "20" is a string prefix of "2017" but not an equal column.
        assert!(!key(&["2017", "x"]).has_prefix(&["20"]));
    }

    #[test]
    fn display_format() {
        assert_eq!(key(&["2017", "TR", "100"]).to_string(), "[2017, TR, 100]");
        assert_eq!(KeyTuple::default().to_string(), "[]");
    }

    #[test]
    fn serde_json_roundtrip() {
        let k = key(&["a", "b"]);
        let json = serde_json::to_string(&k).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: KeyTuple = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);
    }

    proptest! {
        #[test]
        fn every_leading_slice_is_a_prefix(parts in proptest::collection::vec("[a-z0-9]{0,4}", 0..5)) {
            let k = KeyTuple::new(parts.clone());
            for n in 0..=parts.len() {
                prop_assert!(k.has_prefix(&parts[..n]));
            }
        }
    }
}
