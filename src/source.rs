//! Config sources: turn a file into [`Sections`].
//!
//! # Format mapping
//!
//! Top-level keys holding plain values belong to the default (empty) section.
//! A top-level table is a section. Inside a section:
//!
//! - strings are stored verbatim; numbers, booleans and datetimes in their
//!   textual form,
//! - arrays of plain values become sequences,
//! - nested tables are flattened into dotted keys, so `[server.tls] cert = ..`
//!   lands at section `server`, key `tls.cert`.
//!
//! JSON `null` means "not specified" and is skipped. Arrays holding tables or
//! other arrays are rejected as malformed.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::FlagfigError;
use crate::types::{Entry, Sections};

/// Something that can load one config file.
pub trait Source {
    /// Must report a missing file as [`FlagfigError::FileNotFound`] and a
    /// syntax error as [`FlagfigError::MalformedConfig`].
    fn load(&self, path: &Path) -> Result<Sections, FlagfigError>;
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Toml,
    Json,
}

impl Format {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

/// Reads config files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource {
    format: Option<Format>,
}

impl FileSource {
    /// Pick the format from each file's extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every file as `format`, whatever its extension.
    pub fn with_format(format: Format) -> Self {
        Self {
            format: Some(format),
        }
    }
}

impl Source for FileSource {
    fn load(&self, path: &Path) -> Result<Sections, FlagfigError> {
        let content = read_file(path)?;
        let format = self.format.unwrap_or_else(|| Format::from_path(path));
        parse_str(format, &content, path)
    }
}

fn read_file(path: &Path) -> Result<String, FlagfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FlagfigError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(e) => Err(FlagfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parse already-loaded file contents. `path` is only used in errors.
pub fn parse_str(format: Format, content: &str, path: &Path) -> Result<Sections, FlagfigError> {
    let malformed = |reason: String| FlagfigError::MalformedConfig {
        path: path.to_path_buf(),
        reason,
    };
    match format {
        Format::Toml => {
            let table: toml::Table = content.parse().map_err(|e: toml::de::Error| malformed(e.to_string()))?;
            toml_sections(table).map_err(malformed)
        }
        Format::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
            json_sections(value).map_err(malformed)
        }
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn nested_in_array(key: &str) -> String {
    format!("key '{key}': arrays may only hold plain values")
}

// --- TOML ---

fn toml_sections(table: toml::Table) -> Result<Sections, String> {
    let mut sections = Sections::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(inner) => {
                flatten_toml(sections.entry(key).or_default(), "", inner)?;
            }
            other => {
                let entry = toml_entry(&key, other)?;
                sections.entry(String::new()).or_default().insert(key, entry);
            }
        }
    }
    Ok(sections)
}

fn flatten_toml(
    keys: &mut BTreeMap<String, Entry>,
    prefix: &str,
    table: toml::Table,
) -> Result<(), String> {
    for (key, value) in table {
        let path = dotted(prefix, &key);
        match value {
            toml::Value::Table(inner) => flatten_toml(keys, &path, inner)?,
            other => {
                let entry = toml_entry(&path, other)?;
                keys.insert(path, entry);
            }
        }
    }
    Ok(())
}

fn toml_entry(key: &str, value: toml::Value) -> Result<Entry, String> {
    match value {
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| toml_text(item).ok_or_else(|| nested_in_array(key)))
            .collect::<Result<Vec<_>, _>>()
            .map(Entry::Sequence),
        other => toml_text(other)
            .map(Entry::Scalar)
            .ok_or_else(|| format!("key '{key}': unsupported value")),
    }
}

fn toml_text(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        // `{:?}` keeps the fractional part: 1.0 stays "1.0".
        toml::Value::Float(f) => Some(format!("{f:?}")),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

// --- JSON ---

fn json_sections(value: serde_json::Value) -> Result<Sections, String> {
    let serde_json::Value::Object(map) = value else {
        return Err("top level must be an object".into());
    };
    let mut sections = Sections::new();
    for (key, value) in map {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Object(inner) => {
                flatten_json(sections.entry(key).or_default(), "", inner)?;
            }
            other => {
                let entry = json_entry(&key, other)?;
                sections.entry(String::new()).or_default().insert(key, entry);
            }
        }
    }
    Ok(sections)
}

fn flatten_json(
    keys: &mut BTreeMap<String, Entry>,
    prefix: &str,
    map: serde_json::Map<String, serde_json::Value>,
) -> Result<(), String> {
    for (key, value) in map {
        let path = dotted(prefix, &key);
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Object(inner) => flatten_json(keys, &path, inner)?,
            other => {
                let entry = json_entry(&path, other)?;
                keys.insert(path, entry);
            }
        }
    }
    Ok(())
}

fn json_entry(key: &str, value: serde_json::Value) -> Result<Entry, String> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| json_text(item).ok_or_else(|| nested_in_array(key)))
            .collect::<Result<Vec<_>, _>>()
            .map(Entry::Sequence),
        other => json_text(other)
            .map(Entry::Scalar)
            .ok_or_else(|| format!("key '{key}': unsupported value")),
    }
}

fn json_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => None,
    }
}
