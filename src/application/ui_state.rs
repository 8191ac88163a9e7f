// UI-only state owned by the dashboard containers: expanded-section maps,
// selections, and client-side list filters. Created with defaults, mutated
// only by explicit user actions, never persisted.
use std::collections::HashMap;

/// Section-id → expanded flag. Sections default to collapsed; ids are
/// free-form strings, material topics use `topic-{module_id}-{topic_id}`.
#[derive(Debug, Clone, Default)]
pub struct SectionToggles {
    expanded: HashMap<String, bool>,
}

impl SectionToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one section independently of all others. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        let entry = self.expanded.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Key convention for material-topic sections.
    pub fn topic_key(module_id: &str, topic_id: &str) -> String {
        format!("topic-{module_id}-{topic_id}")
    }
}

/// Exact-match filter over already-fetched lists. The value `"all"` is a
/// wildcard that matches everything; filtering never refetches.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    values: HashMap<String, String>,
}

impl ListFilter {
    pub const ALL: &'static str = "all";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or(Self::ALL, String::as_str)
    }

    pub fn matches(&self, key: &str, candidate: &str) -> bool {
        let wanted = self.value(key);
        wanted == Self::ALL || wanted == candidate
    }

    /// Filter a cached list by one field.
    pub fn apply<T: Clone>(&self, items: &[T], key: &str, field: impl Fn(&T) -> &str) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(key, field(item)))
            .cloned()
            .collect()
    }
}
