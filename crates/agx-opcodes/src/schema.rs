//! Opcode schema definitions for header generation.
//!
//! This module defines the schema format the generator reads:
//! - Opcode names, in enumerant order
//! - Immediate kinds, in flag-bit order
//! - Enum groups mapping integer keys to symbolic labels
//!
//! Schemas are normally loaded from TOML (`opcodes.toml`), but any file with a
//! `.json` extension is read as JSON with the same structure.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a schema file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// An enumerant value with no declared label was passed to a reflection lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("nonexhaustive enum: {group} has no value {key}")]
pub struct ReflectionLookupError {
    pub group: String,
    pub key: u64,
}

/// Normalizes a name into the form used inside C symbols.
///
/// Dots become underscores and letters are upper-cased, so the label
/// `thread_position_in_grid.x` becomes `THREAD_POSITION_IN_GRID_X`.
pub fn normalize(name: &str) -> String {
    name.replace('.', "_").to_uppercase()
}

/// A single integer key and its label within an enum group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Integer value of the enumerant (at most `INT_MAX`)
    pub key: u64,
    /// Label as written in the schema (returned by reflection)
    pub label: String,
}

impl EnumValue {
    pub fn new(key: u64, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }

    /// Returns the normalized label used in the enumerant symbol.
    pub fn symbol_suffix(&self) -> String {
        normalize(&self.label)
    }
}

/// A named, closed set of integer-keyed labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumGroup {
    /// Group name (e.g., "dim", "format")
    pub name: String,
    /// Values in declaration order
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl EnumGroup {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (u64, S)>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values
                .into_iter()
                .map(|(key, label)| EnumValue::new(key, label))
                .collect(),
        }
    }

    /// Returns the C type name (e.g., "agx_dim" for group "dim").
    pub fn type_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.name)
    }

    /// Returns the name of the generated reflection function.
    pub fn as_str_name(&self, prefix: &str) -> String {
        format!("{}_{}_as_str", prefix, self.name)
    }

    /// Returns the enumerant symbol for a value (e.g., "AGX_DIM_2D").
    pub fn enumerant(&self, prefix: &str, value: &EnumValue) -> String {
        format!(
            "{}_{}_{}",
            prefix.to_uppercase(),
            self.name.to_uppercase(),
            value.symbol_suffix()
        )
    }

    /// Returns the original label declared for `key`.
    ///
    /// Mirrors the generated `*_as_str` function: keys outside the declared
    /// set are an error, never a default label.
    pub fn lookup(&self, key: u64) -> Result<&str, ReflectionLookupError> {
        self.values
            .iter()
            .find(|value| value.key == key)
            .map(|value| value.label.as_str())
            .ok_or_else(|| ReflectionLookupError {
                group: self.name.clone(),
                key,
            })
    }
}

/// Settings that shape the emitted header but not its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Lower-case symbol prefix (types use it as is, constants upper-cased)
    pub prefix: String,
    /// Include guard macro; derived from the prefix when unset
    pub guard: Option<String>,
    /// Copyright line for the license comment
    pub copyright: Option<String>,
    /// SPDX license identifier for the license comment
    pub license: Option<String>,
    /// Headers included with angle brackets
    pub system_includes: Vec<String>,
    /// Headers included with quotes
    pub includes: Vec<String>,
    /// Macro invoked by reflection functions on undeclared values
    pub unreachable: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "agx".to_string(),
            guard: None,
            copyright: None,
            license: None,
            system_includes: vec!["stdbool.h".to_string(), "stdint.h".to_string()],
            includes: vec!["util/macros.h".to_string()],
            unreachable: "UNREACHABLE".to_string(),
        }
    }
}

impl OutputConfig {
    /// Returns the upper-case prefix used for constants.
    pub fn constant_prefix(&self) -> String {
        self.prefix.to_uppercase()
    }

    /// Returns the include guard macro.
    pub fn guard(&self) -> String {
        self.guard
            .clone()
            .unwrap_or_else(|| format!("_{}_OPCODES_", self.constant_prefix()))
    }
}

/// Root schema containing everything the generator reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeSchema {
    /// Opcode names; position is the enumerant value
    #[serde(default)]
    pub opcodes: Vec<String>,
    /// Immediate kinds; position is the flag bit
    #[serde(default)]
    pub immediates: Vec<String>,
    /// Enum groups in declaration order
    #[serde(default)]
    pub enums: Vec<EnumGroup>,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl OpcodeSchema {
    pub fn new<O, I>(opcodes: O, immediates: I, enums: Vec<EnumGroup>) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            opcodes: opcodes.into_iter().map(Into::into).collect(),
            immediates: immediates.into_iter().map(Into::into).collect(),
            enums,
            output: OutputConfig::default(),
        }
    }

    /// Parse a schema from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(contents)?)
    }

    /// Parse a schema from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load schema from a file, choosing the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Load the default schema from opcodes.toml.
    pub fn load_default() -> Result<Self, LoadError> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("opcodes.toml");
        Self::from_file(path)
    }

    /// Returns the enumerant value of an opcode.
    pub fn opcode_index(&self, name: &str) -> Option<usize> {
        self.opcodes.iter().position(|op| op == name)
    }

    /// Returns the opcode enumerant symbol (e.g., "AGX_OPCODE_FADD").
    pub fn opcode_enumerant(&self, name: &str) -> String {
        format!("{}_OPCODE_{}", self.output.constant_prefix(), normalize(name))
    }

    /// Returns the name of the trailing opcode count sentinel.
    pub fn sentinel(&self) -> String {
        format!("{}_NUM_OPCODES", self.output.constant_prefix())
    }

    /// Find an enum group by name.
    pub fn find_enum(&self, name: &str) -> Option<&EnumGroup> {
        self.enums.iter().find(|group| group.name == name)
    }
}
