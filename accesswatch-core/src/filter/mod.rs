//! Stream filter criteria and the matcher that applies them.

use crate::event::AccessEvent;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Criteria an event must satisfy to be aggregated.
///
/// Every field is optional; an empty string matches everything. Replacing the
/// filter is an identity change: any field that differs starts a new epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamFilter {
    /// Case-insensitive substring of the request host.
    pub host: String,
    /// Case-insensitive substring of the request path.
    pub path: String,
    /// Exact HTTP method, e.g. "POST".
    pub method: String,
}

impl StreamFilter {
    pub fn new(host: impl Into<String>, path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            method: method.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty() && self.path.is_empty() && self.method.is_empty()
    }

    pub fn matches(&self, event: &AccessEvent) -> bool {
        contains_ignore_case(&event.host, &self.host)
            && contains_ignore_case(&event.path, &self.path)
            && (self.method.is_empty() || event.method == self.method)
    }
}

/// Pure predicate: does `event` pass `filter`?
pub fn matches(event: &AccessEvent, filter: &StreamFilter) -> bool {
    filter.matches(event)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
