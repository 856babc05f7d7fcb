use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Entry, Resolved, Sections};

/// Merged view of every config source loaded so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    sections: Sections,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `incoming` on top of the store.
    /// Sections are created as needed; for each incoming key, `incoming` wins.
    pub fn merge(&mut self, incoming: Sections) {
        for (section, keys) in incoming {
            let target = self.sections.entry(section).or_default();
            for (key, entry) in keys {
                target.insert(key, entry);
            }
        }
    }

    /// Copy out the entry stored at `(section, key)`. Absence is not an error.
    pub fn lookup(&self, section: &str, key: &str) -> Resolved {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .cloned()
            .map_or(Resolved::Missing, Resolved::from)
    }

    pub fn get_section(&self, section: &str) -> Option<&BTreeMap<String, Entry>> {
        self.sections.get(section)
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
