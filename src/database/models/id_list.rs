//! Ordered list of integer ids (user ids, plugin ids).
//!
//! Persisted as a comma-delimited string; everywhere else it is a typed
//! sequence. Request bodies may send either form.

use std::fmt;
use std::num::ParseIntError;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Separator used when persisting id lists.
pub const DELIMITER: char = ',';

/// An ordered sequence of integer ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdList(Vec<i64>);

impl IdList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a delimited string.
    ///
    /// Whitespace around segments and empty segments are ignored, so an
    /// empty string yields an empty list.
    pub fn parse_delimited(raw: &str) -> Result<Self, ParseIntError> {
        raw.split(DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<i64>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Render as a delimited string for persistence.
    pub fn to_delimited(&self) -> String {
        self.0
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(&DELIMITER.to_string())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    /// Append every id from `ids` that is not already present.
    ///
    /// Returns the number of ids added.
    pub fn merge(&mut self, ids: impl IntoIterator<Item = i64>) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.0.contains(&id) {
                self.0.push(id);
                added += 1;
            }
        }
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i64>> for IdList {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl FromIterator<i64> for IdList {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for IdList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdListVisitor;

        impl<'de> Visitor<'de> for IdListVisitor {
            type Value = IdList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of integers or a comma-delimited string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<IdList, E> {
                IdList::parse_delimited(v)
                    .map_err(|e| E::custom(format!("invalid id list {v:?}: {e}")))
            }

            fn visit_unit<E: de::Error>(self) -> Result<IdList, E> {
                Ok(IdList::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<IdList, E> {
                Ok(IdList::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<IdList, A::Error> {
                let mut ids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(id) = seq.next_element::<i64>()? {
                    ids.push(id);
                }
                Ok(IdList(ids))
            }
        }

        deserializer.deserialize_any(IdListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_string() {
        let list = IdList::parse_delimited("").unwrap();
        assert!(list.is_empty());
        assert_eq!(list.to_delimited(), "");
    }

    #[test]
    fn test_delimited_preserves_order() {
        let list = IdList::from(vec![42, -1001, 7, 42]);
        let raw = list.to_delimited();
        assert_eq!(raw, "42,-1001,7,42");
        assert_eq!(IdList::parse_delimited(&raw).unwrap(), list);
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_gaps() {
        let list = IdList::parse_delimited(" 1, 2,,3 ,").unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(IdList::parse_delimited("1,abc").is_err());
    }

    #[test]
    fn test_merge_dedups() {
        let mut list = IdList::from(vec![1, 2]);
        let added = list.merge([2, 3, 3, 4]);
        assert_eq!(added, 2);
        assert_eq!(list.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_deserialize_array_or_string() {
        let from_array: IdList = serde_json::from_str("[5, 6]").unwrap();
        let from_string: IdList = serde_json::from_str("\"5,6\"").unwrap();
        let from_null: IdList = serde_json::from_str("null").unwrap();

        assert_eq!(from_array, from_string);
        assert!(from_null.is_empty());
        assert_eq!(serde_json::to_string(&from_array).unwrap(), "[5,6]");
    }
}
