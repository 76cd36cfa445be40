//! User configuration for format selection.
//!
//! Settings live in a host-style JSON document under the `insertGuid`
//! namespace, either as flat keys (`"insertGuid.showUppercase": true`) or as
//! a nested object (`"insertGuid": { "showUppercase": true }`). Flat keys win
//! when both are present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::formats::{RenderFormat, Visibility, visible_formats};

/// Configuration namespace.
pub const NAMESPACE: &str = "insertGuid";

/// Errors that can occur while loading or saving settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Settings document must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_lowercase: bool,
    pub show_uppercase: bool,
    pub show_code_snippets: bool,
    /// Non-empty: insert this template without asking.
    pub paste_automatically: String,
    /// Explicit format templates. Takes precedence over the `show*` flags
    /// when present and non-empty.
    pub formats: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_lowercase: true,
            show_uppercase: false,
            show_code_snippets: true,
            paste_automatically: String::new(),
            formats: None,
        }
    }
}

impl Settings {
    pub fn visibility(&self) -> Visibility {
        Visibility {
            lowercase: self.show_lowercase,
            uppercase: self.show_uppercase,
            snippets: self.show_code_snippets,
        }
    }

    /// Configured template list, if present and non-empty.
    pub fn explicit_formats(&self) -> Option<&[String]> {
        self.formats.as_deref().filter(|formats| !formats.is_empty())
    }

    /// Formats to offer: the explicit list if set, otherwise the built-ins
    /// selected by the visibility flags.
    pub fn render_formats(&self) -> Vec<RenderFormat> {
        match self.explicit_formats() {
            Some(templates) => {
                tracing::debug!(count = templates.len(), "using configured format list");
                templates.iter().map(RenderFormat::custom).collect()
            }
            None => {
                tracing::debug!(visibility = ?self.visibility(), "using built-in formats");
                visible_formats(self.visibility())
            }
        }
    }

    /// Template for non-interactive insertion, if set.
    pub fn paste_template(&self) -> Option<&str> {
        Some(self.paste_automatically.as_str()).filter(|t| !t.is_empty())
    }

    /// Populate an absent or empty `formats` list from the visibility flags.
    /// Returns whether anything changed.
    pub fn seed_formats(&mut self) -> bool {
        if self.explicit_formats().is_some() {
            return false;
        }
        let seeded = visible_formats(self.visibility())
            .iter()
            .map(|format| format.seed_template().into_owned())
            .collect();
        self.formats = Some(seeded);
        true
    }

    /// Read settings from a host-style JSON document.
    pub fn from_json(data: &str) -> Result<Self, SettingsError> {
        let Value::Object(root) = serde_json::from_str::<Value>(data)? else {
            return Err(SettingsError::NotAnObject);
        };

        let mut scoped = match root.get(NAMESPACE) {
            Some(Value::Object(nested)) => nested.clone(),
            _ => Map::new(),
        };
        let prefix = format!("{NAMESPACE}.");
        for (key, value) in &root {
            if let Some(name) = key.strip_prefix(&prefix) {
                scoped.insert(name.to_string(), value.clone());
            }
        }

        Ok(serde_json::from_value(Value::Object(scoped))?)
    }

    /// Nested JSON document for these settings.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        let mut root = Map::new();
        root.insert(NAMESPACE.to_string(), serde_json::to_value(self)?);
        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::FormatKind;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.show_lowercase);
        assert!(!s.show_uppercase);
        assert!(s.show_code_snippets);
        assert_eq!(s.paste_template(), None);
        assert_eq!(s.formats, None);
        assert_eq!(Settings::from_json("{}").unwrap(), s);
    }

    #[test]
    fn test_flat_keys() {
        let s = Settings::from_json(
            r#"{
                "editor.tabSize": 4,
                "insertGuid.showUppercase": true,
                "insertGuid.pasteAutomatically": "{B}"
            }"#,
        )
        .unwrap();
        assert!(s.show_uppercase);
        assert!(s.show_lowercase);
        assert_eq!(s.paste_template(), Some("{B}"));
    }

    #[test]
    fn test_nested_keys_and_flat_override() {
        let s = Settings::from_json(
            r#"{
                "insertGuid": { "showLowercase": false, "showCodeSnippets": false },
                "insertGuid.showCodeSnippets": true
            }"#,
        )
        .unwrap();
        assert!(!s.show_lowercase);
        assert!(s.show_code_snippets);
    }

    #[test]
    fn test_null_formats() {
        let s = Settings::from_json(r#"{"insertGuid.formats": null}"#).unwrap();
        assert_eq!(s.formats, None);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            Settings::from_json("[1, 2]"),
            Err(SettingsError::NotAnObject)
        ));
        assert!(matches!(
            Settings::from_json(r#"{"insertGuid.showUppercase": "yes"}"#),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json("{"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_explicit_formats_take_precedence() {
        let s = Settings {
            show_uppercase: true,
            formats: Some(vec!["{N}".to_string(), "id: {d}".to_string()]),
            ..Settings::default()
        };
        let formats = s.render_formats();
        assert_eq!(formats.len(), 2);
        assert!(formats.iter().all(|f| f.kind() == FormatKind::Custom));
    }

    #[test]
    fn test_empty_format_list_uses_flags() {
        let s = Settings {
            formats: Some(Vec::new()),
            ..Settings::default()
        };
        assert_eq!(s.render_formats().len(), 7);
    }

    #[test]
    fn test_seed_formats() {
        let mut s = Settings::default();
        assert!(s.seed_formats());
        let seeded = s.formats.clone().unwrap();
        assert_eq!(seeded.len(), 7);
        assert_eq!(seeded[0], "{d}");
        assert_eq!(seeded[1], "{b}");
        assert!(!s.seed_formats());
        assert_eq!(s.formats.as_ref(), Some(&seeded));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        let mut s = Settings::default();
        s.show_uppercase = true;
        s.seed_formats();
        s.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, s);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"insertGuid\""));
        assert!(raw.contains("\"showUppercase\": true"));
    }
}
