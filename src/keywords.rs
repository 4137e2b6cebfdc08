//! The keyword surface a test framework calls into.
//!
//! Keywords never modify the document they are given: mutating keywords
//! return an updated copy.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::JsonLibError;
use crate::output::{self, Style};
use crate::path::JsonPath;
use crate::{navigate, ops, schema};

/// Library-wide behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `get_value_from_json` fails instead of returning an empty list.
    pub fail_on_empty: bool,
    /// Updates and additions on a missing key/index path create it.
    pub create_missing: bool,
    /// Indentation for `convert_json_to_string` and `dump_json_to_file`;
    /// `None` writes a single line.
    pub indent: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fail_on_empty: false,
            create_missing: true,
            indent: Some(2),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonLibrary {
    settings: Settings,
}

impl JsonLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        JsonLibrary { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn style(&self) -> Style {
        Style {
            indent: self.settings.indent,
            ..Style::default()
        }
    }

    pub fn load_json_from_file(&self, path: impl AsRef<Path>) -> Result<Value, JsonLibError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading json");
        let text = std::fs::read_to_string(path)?;
        self.convert_string_to_json(&text)
    }

    /// Write `doc` to `path`, replacing any existing file atomically.
    pub fn dump_json_to_file(
        &self,
        path: impl AsRef<Path>,
        doc: &Value,
    ) -> Result<PathBuf, JsonLibError> {
        let path = path.as_ref();
        let mut text = self.convert_json_to_string(doc)?;
        text.push('\n');
        write_atomic(path, text.as_bytes())?;
        info!(path = %path.display(), "wrote json");
        Ok(path.to_path_buf())
    }

    pub fn convert_string_to_json(&self, text: &str) -> Result<Value, JsonLibError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn convert_json_to_string(&self, doc: &Value) -> Result<String, JsonLibError> {
        output::format_value(doc, &self.style())
    }

    /// Every value `path` selects, in document order.
    pub fn get_value_from_json(&self, doc: &Value, path: &str) -> Result<Vec<Value>, JsonLibError> {
        let path = JsonPath::compile(path)?;
        let values = ops::get(doc, &path, self.settings.fail_on_empty)?;
        Ok(values.into_iter().cloned().collect())
    }

    pub fn update_value_to_json(
        &self,
        doc: &Value,
        path: &str,
        new_value: Value,
    ) -> Result<Value, JsonLibError> {
        let path = JsonPath::compile(path)?;
        let mut updated = doc.clone();
        ops::set(&mut updated, &path, new_value, self.settings.create_missing)?;
        Ok(updated)
    }

    /// Append to matched arrays, merge into matched objects.
    pub fn add_object_to_json(
        &self,
        doc: &Value,
        path: &str,
        object: Value,
    ) -> Result<Value, JsonLibError> {
        let path = JsonPath::compile(path)?;
        let mut updated = doc.clone();
        ops::append(&mut updated, &path, object, self.settings.create_missing)?;
        Ok(updated)
    }

    pub fn delete_object_from_json(&self, doc: &Value, path: &str) -> Result<Value, JsonLibError> {
        let path = JsonPath::compile(path)?;
        let mut updated = doc.clone();
        ops::delete(&mut updated, &path)?;
        Ok(updated)
    }

    pub fn should_have_value_in_json(&self, doc: &Value, path: &str) -> Result<(), JsonLibError> {
        let path = JsonPath::compile(path)?;
        if navigate::find(&path, doc).is_empty() {
            return Err(JsonLibError::PathNotFound(path.to_string()));
        }
        Ok(())
    }

    pub fn should_not_have_value_in_json(
        &self,
        doc: &Value,
        path: &str,
    ) -> Result<(), JsonLibError> {
        let path = JsonPath::compile(path)?;
        match navigate::find(&path, doc).first() {
            Some(m) => Err(JsonLibError::UnexpectedMatch {
                path: m.location.to_string(),
                value: m.value.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn validate_json_by_schema(&self, doc: &Value, schema: &Value) -> Result<(), JsonLibError> {
        schema::validate(doc, schema)
    }

    pub fn validate_json_by_schema_file(
        &self,
        doc: &Value,
        schema_path: impl AsRef<Path>,
    ) -> Result<(), JsonLibError> {
        let schema = self.load_json_from_file(schema_path)?;
        schema::validate(doc, &schema)
    }
}

/// Replace `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), JsonLibError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|e| JsonLibError::Io(e.error))?;
    Ok(())
}
