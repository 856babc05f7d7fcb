use std::collections::BTreeMap;

use serde::Serialize;

/// Section name → key name → entry, as produced by one config source.
pub type Sections = BTreeMap<String, BTreeMap<String, Entry>>;

/// A value stored in the config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Scalar(String),
    /// Produced by formats that support repetition (TOML/JSON arrays).
    Sequence(Vec<String>),
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        Entry::Scalar(s.to_string())
    }
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Entry::Scalar(s)
    }
}

impl From<Vec<String>> for Entry {
    fn from(items: Vec<String>) -> Self {
        Entry::Sequence(items)
    }
}

/// Outcome of looking up a `(section, key)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Missing,
    Scalar(String),
    Sequence(Vec<String>),
}

impl From<Entry> for Resolved {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Scalar(s) => Resolved::Scalar(s),
            Entry::Sequence(items) => Resolved::Sequence(items),
        }
    }
}

/// One input handed to a flag's setter.
///
/// `Reset` marks the end of one source's input: the next `Value` starts a new
/// list instead of extending the current one. Scalar flags ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Value(&'a str),
    Reset,
}

/// Where a flag's current value came from. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Binding {
    /// Still holding its compiled-in default.
    #[default]
    Unbound,
    FileBound,
    ArgBound,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Unbound => write!(f, "default"),
            Binding::FileBound => write!(f, "file"),
            Binding::ArgBound => write!(f, "args"),
        }
    }
}
