use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a word group, e.g. `out_001`.
///
/// Joins remote object names, cache file names and UI cards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be embedded in an object path as a single segment.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GroupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Manifest published as `index.json`, listing the groups that exist remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupIndex {
    pub groups: Vec<GroupId>,
    pub last_updated: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_path_safety() {
        assert!(GroupId::from("out_001").is_path_safe());
        assert!(GroupId::from("basic-2.v1").is_path_safe());

        assert!(!GroupId::from("").is_path_safe());
        assert!(!GroupId::from("..").is_path_safe());
        assert!(!GroupId::from("words/out").is_path_safe());
        assert!(!GroupId::from("out 001").is_path_safe());
        assert!(!GroupId::from("out?x=1").is_path_safe());
    }

    #[test]
    fn test_group_ids_sort_lexicographically() {
        let mut ids: Vec<GroupId> = ["out_010", "basic", "out_002"]
            .into_iter()
            .map(GroupId::from)
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(GroupId::as_str).collect();
        assert_eq!(sorted, vec!["basic", "out_002", "out_010"]);
    }

    #[test]
    fn test_parse_index_with_optional_fields() {
        let json = r#"{"groups": ["out_002", "out_001"], "last_updated": "2025-06-25"}"#;
        let index: GroupIndex = serde_json::from_str(json).expect("parse index");
        assert_eq!(index.groups, vec![GroupId::from("out_002"), GroupId::from("out_001")]);
        assert_eq!(index.last_updated.as_deref(), Some("2025-06-25"));
        assert!(index.description.is_none());
    }

    #[test]
    fn test_parse_index_requires_groups() {
        assert!(serde_json::from_str::<GroupIndex>(r#"{"description": "x"}"#).is_err());
    }
}
