//! Single-key label selector evaluated client-side and rendered for server-side filtering.

use std::collections::BTreeMap;

/// Label filter configured once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorConfig {
    key: String,
    value: Option<String>,
}

impl SelectorConfig {
    /// Build a selector; an empty value is treated as "any value".
    #[must_use]
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value: value.filter(|value| !value.is_empty()),
        }
    }

    /// Selector that accepts every resource.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Required label key; empty means no filtering.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Required label value, if one was configured.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether a label set satisfies the selector. Exact key and value equality only.
    #[must_use]
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        if self.key.is_empty() {
            return true;
        }
        match (&self.value, labels.get(&self.key)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        }
    }

    /// Label selector expression for list/watch requests (`key` or `key=value`).
    #[must_use]
    pub fn to_query(&self) -> Option<String> {
        if self.key.is_empty() {
            return None;
        }
        Some(self.value.as_ref().map_or_else(
            || self.key.clone(),
            |value| format!("{}={value}", self.key),
        ))
    }
}
