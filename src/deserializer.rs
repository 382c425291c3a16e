//! Configured entry point for deserializing whole documents.

use crate::convert::{self, JsonDeserializable};
use crate::error::{DeserializeError, Result};
use serde_json::Value;
use std::io::{BufRead, Read};
use tracing::debug;

/// Configuration for deserialization
#[derive(Debug, Clone)]
pub struct DeserializeConfig {
    /// Maximum nesting depth of arrays/objects in a document (the root container counts as 1)
    pub max_depth: usize,
}

impl Default for DeserializeConfig {
    fn default() -> Self {
        DeserializeConfig { max_depth: 128 }
    }
}

/// Deserializes documents into declared types under a [`DeserializeConfig`]
#[derive(Debug, Clone, Default)]
pub struct Deserializer {
    config: DeserializeConfig,
}

impl Deserializer {
    pub fn new(config: DeserializeConfig) -> Self {
        Deserializer { config }
    }

    pub fn config(&self) -> &DeserializeConfig {
        &self.config
    }

    /// Deserialize a `T` from a document value.
    ///
    /// A Null document yields `T::default()`. Documents nested deeper than
    /// `max_depth` are rejected before any field is written.
    pub fn from_value<T>(&self, document: &Value) -> Result<T>
    where
        T: JsonDeserializable + Default,
    {
        if exceeds_depth(document, self.config.max_depth) {
            debug!(limit = self.config.max_depth, "document too deep");
            return Err(DeserializeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(convert::nested(document)?.unwrap_or_default())
    }

    pub fn from_str<T>(&self, text: &str) -> Result<T>
    where
        T: JsonDeserializable + Default,
    {
        let document: Value = serde_json::from_str(text)?;
        self.from_value(&document)
    }

    /// Read one JSON document from `reader`.
    pub fn from_reader<T, R>(&self, reader: R) -> Result<T>
    where
        T: JsonDeserializable + Default,
        R: Read,
    {
        let document: Value = serde_json::from_reader(reader)?;
        self.from_value(&document)
    }

    /// Newline-delimited JSON: one `T` per non-blank line.
    pub fn from_lines<'a, T, R>(&'a self, reader: R) -> impl Iterator<Item = Result<T>> + 'a
    where
        T: JsonDeserializable + Default + 'a,
        R: BufRead + 'a,
    {
        reader.lines().filter_map(move |line| {
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            Some(self.from_str(line))
        })
    }
}

/// Whether `value` nests containers deeper than `remaining` levels.
fn exceeds_depth(value: &Value, remaining: usize) -> bool {
    match value {
        Value::Array(items) => {
            remaining == 0 || items.iter().any(|child| exceeds_depth(child, remaining - 1))
        }
        Value::Object(map) => {
            remaining == 0 || map.values().any(|child| exceeds_depth(child, remaining - 1))
        }
        _ => false,
    }
}
