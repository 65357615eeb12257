//! Export option bag
//!
//! [`ExportConfig`] is the opaque set of options sent to the export server
//! (chart configuration, template, output type and so on). This layer does
//! not enforce any schema: the server decides what each option means.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single export option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOptionValue", into = "RawOptionValue")]
pub enum OptionValue {
    /// Plain text, sent verbatim
    Text(String),

    /// Local file whose contents are uploaded with the request
    Path(PathBuf),

    /// Embedded JSON document, sent serialized
    Json(serde_json::Value),
}

impl OptionValue {
    /// Text form of the value for a form field
    ///
    /// Returns `None` for [`OptionValue::Path`], which travels as a file part.
    pub fn as_form_text(&self) -> Option<String> {
        match self {
            OptionValue::Text(text) => Some(text.clone()),
            OptionValue::Json(value) => Some(value.to_string()),
            OptionValue::Path(_) => None,
        }
    }

    /// Returns the path if this is a file option
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            OptionValue::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<PathBuf> for OptionValue {
    fn from(value: PathBuf) -> Self {
        OptionValue::Path(value)
    }
}

impl From<&Path> for OptionValue {
    fn from(value: &Path) -> Self {
        OptionValue::Path(value.to_path_buf())
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        OptionValue::Json(value)
    }
}

/// On-disk representation: strings are text, `{ path = "..." }` tables are
/// files, anything else is embedded JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawOptionValue {
    Text(String),
    Path(PathRef),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathRef {
    path: PathBuf,
}

impl From<RawOptionValue> for OptionValue {
    fn from(raw: RawOptionValue) -> Self {
        match raw {
            RawOptionValue::Text(text) => OptionValue::Text(text),
            RawOptionValue::Path(PathRef { path }) => OptionValue::Path(path),
            RawOptionValue::Json(value) => OptionValue::Json(value),
        }
    }
}

impl From<OptionValue> for RawOptionValue {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Text(text) => RawOptionValue::Text(text),
            OptionValue::Path(path) => RawOptionValue::Path(PathRef { path }),
            OptionValue::Json(value) => RawOptionValue::Json(value),
        }
    }
}

/// Mapping from option name to value describing what to export
///
/// # Example
///
/// ```
/// use chartex::domain::ExportConfig;
/// use std::path::PathBuf;
///
/// let mut config = ExportConfig::new();
/// config.set("type", "png");
/// config.set("chartConfig", PathBuf::from("resources/multiple.json"));
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportConfig {
    options: BTreeMap<String, OptionValue>,
}

impl ExportConfig {
    /// Creates an empty option bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Gets an option
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Removes an option, returning its value
    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.options.remove(name)
    }

    /// Whether an option is set
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Removes every option
    pub fn clear(&mut self) {
        self.options.clear();
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates options in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }
}
