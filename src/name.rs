//! Flag name addressing: `section<sep>key`, optionally suffixed with a list
//! marker (`key[]`).

/// Split `identifier` at the first occurrence of `separator`.
///
/// Without a separator the whole identifier is a key in the default (empty)
/// section. Everything after the first separator, including further
/// separators, is the key verbatim. An empty separator never splits.
pub fn split_name<'a>(identifier: &'a str, separator: &str) -> (&'a str, &'a str) {
    if separator.is_empty() {
        return ("", identifier);
    }
    match identifier.split_once(separator) {
        Some((section, key)) => (section, key),
        None => ("", identifier),
    }
}

/// A flag name resolved to its config address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagPath<'a> {
    pub section: &'a str,
    pub key: &'a str,
    /// The name carried the list marker.
    pub list: bool,
}

impl<'a> FlagPath<'a> {
    /// Strip one trailing `list_marker` (if non-empty and present), then split.
    pub fn parse(name: &'a str, separator: &str, list_marker: &str) -> Self {
        let (base, list) = match name.strip_suffix(list_marker) {
            Some(stripped) if !list_marker.is_empty() => (stripped, true),
            _ => (name, false),
        };
        let (section, key) = split_name(base, separator);
        FlagPath { section, key, list }
    }
}
