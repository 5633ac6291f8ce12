//! The uniform sidecar: a JSON object mapping uniform names to
//! `{"func": "<glUniform*>", "args": [numbers]}`.
//!
//! Entries are kept in document order and duplicate keys are preserved, so
//! a sidecar naming the same uniform twice is reported instead of silently
//! collapsing to the last entry.

use crate::error::RenderError;
use crate::fs::FileSystem;
use crate::params::RenderParams;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;

/// Parsed uniform specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSpec {
    entries: Vec<(String, Value)>,
}

/// A validated entry borrowed from a [`UniformSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformEntry<'a> {
    pub func: &'a str,
    pub args: &'a [Value],
}

impl<'de> Deserialize<'de> for UniformSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecVisitor;

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = UniformSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping uniform names to {func, args}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<UniformSpec, A::Error> {
                let mut entries = Vec::new();
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    entries.push((name, value));
                }
                Ok(UniformSpec { entries })
            }
        }

        deserializer.deserialize_map(SpecVisitor)
    }
}

impl UniformSpec {
    /// Parses a sidecar document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `text` is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Entries used when no sidecar exists: `injectionSwitch`, `time`,
    /// `mouse`, and `resolution` set to the configured framebuffer size.
    pub fn defaults(width: u32, height: u32) -> Self {
        let entries = vec![
            (
                "injectionSwitch".to_string(),
                json!({"func": "glUniform2f", "args": [0.0, 1.0]}),
            ),
            (
                "time".to_string(),
                json!({"func": "glUniform1f", "args": [0.0]}),
            ),
            (
                "mouse".to_string(),
                json!({"func": "glUniform2f", "args": [0.0, 0.0]}),
            ),
            (
                "resolution".to_string(),
                json!({"func": "glUniform2f", "args": [width as f32, height as f32]}),
            ),
        ];
        Self { entries }
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the spec has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the single entry for `name` and checks its shape.
    ///
    /// # Errors
    ///
    /// - `MissingUniformSpec` if no entry is named `name`.
    /// - `AmbiguousUniformSpec` if more than one is.
    /// - `MalformedUniformSpec` if `func` is not a string or `args` is not an array.
    pub fn entry(&self, name: &str) -> Result<UniformEntry<'_>, RenderError> {
        let mut matches = self.entries.iter().filter(|(k, _)| k == name);
        let value = match (matches.next(), matches.next()) {
            (None, _) => return Err(RenderError::MissingUniformSpec(name.to_string())),
            (Some(_), Some(_)) => return Err(RenderError::AmbiguousUniformSpec(name.to_string())),
            (Some((_, v)), None) => v,
        };

        let malformed = |field| RenderError::MalformedUniformSpec {
            name: name.to_string(),
            field,
        };
        let func = value
            .get("func")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("func"))?;
        let args = value
            .get("args")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("args"))?;

        Ok(UniformEntry { func, args })
    }
}

/// Sidecar path for a fragment shader: its last four characters become `json`.
///
/// `shader.frag` maps to `shader.json`. The replacement is positional, so a
/// three-letter extension also eats its dot: `a.fsh` maps to `ajson`.
pub fn sidecar_path(params: &RenderParams) -> PathBuf {
    let frag = params.frag_path.to_string_lossy();
    let keep = frag.chars().count().saturating_sub(4);
    let mut path: String = frag.chars().take(keep).collect();
    path.push_str("json");
    PathBuf::from(path)
}

/// Reads the sidecar for `params`, or falls back to [`UniformSpec::defaults`].
///
/// # Errors
///
/// Returns `FileNotFound` if the sidecar exists but cannot be read, and
/// `InvalidUniformJson` if it does not parse as a JSON object.
pub fn load_uniform_spec<F: FileSystem>(
    fs: &F,
    params: &RenderParams,
) -> Result<UniformSpec, RenderError> {
    let path = sidecar_path(params);
    if !fs.exists(&path) {
        tracing::warn!(
            path = %path.display(),
            "uniform file not found, will rely on default uniform values only"
        );
        return Ok(UniformSpec::defaults(params.width, params.height));
    }

    let text = fs.read_to_string(&path)?;
    UniformSpec::from_json(&text).map_err(|e| RenderError::InvalidUniformJson {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
