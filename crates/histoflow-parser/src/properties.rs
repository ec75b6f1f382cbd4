//! `Key: Value` settings declared alongside the group edges.

use indexmap::IndexMap;

/// Property naming the histogram row every lookup reads.
pub const GROUP_NAME_KEY: &str = "GroupName";

/// Config properties in declaration order. Later assignments to the same
/// key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: IndexMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The row label selected by the `GroupName` property.
    pub fn group_name(&self) -> Option<&str> {
        self.get(GROUP_NAME_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_assignment_wins() {
        let mut properties = Properties::new();
        properties.insert("GroupName", "Control_20250131");
        properties.insert("Owner", "media");
        properties.insert("GroupName", "Enabled_20250131");

        assert_eq!(properties.group_name(), Some("Enabled_20250131"));
        assert_eq!(properties.len(), 2);
        let keys: Vec<&str> = properties.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["GroupName", "Owner"]);
    }

    #[test]
    fn test_missing_group_name() {
        assert!(Properties::new().group_name().is_none());
    }
}
