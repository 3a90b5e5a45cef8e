//! Registry of stream definitions

use super::types::StreamDefinition;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Built-in stream metadata
const BUILTIN_STREAMS: &str = include_str!("streams.yaml");

#[derive(Deserialize)]
struct RegistryFile {
    streams: Vec<StreamDefinition>,
}

/// Ordered, immutable set of stream definitions
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRegistry {
    streams: Vec<StreamDefinition>,
}

impl StreamRegistry {
    /// The streams shipped with the tap
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_STREAMS)
    }

    /// Parse and validate a registry from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse stream registry YAML: {e}")))?;
        Self::new(file.streams)
    }

    /// Load a registry from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read stream registry '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build a registry from definitions, validating them
    pub fn new(streams: Vec<StreamDefinition>) -> Result<Self> {
        let registry = Self { streams };
        registry.validate()?;
        Ok(registry)
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Result<&StreamDefinition> {
        self.streams
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::stream_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.streams.iter().any(|s| s.name == name)
    }

    /// Stream definitions in declaration order
    pub fn streams(&self) -> &[StreamDefinition] {
        &self.streams
    }

    pub fn names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Check internal consistency of every definition
    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for stream in &self.streams {
            if stream.name.is_empty() {
                return Err(Error::config("Stream name cannot be empty"));
            }
            if !names.insert(stream.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate stream name: {}",
                    stream.name
                )));
            }
            if stream.report_code.is_empty() {
                return Err(Error::config(format!(
                    "Stream '{}' has no report code",
                    stream.name
                )));
            }
            validate_fields(stream)?;
        }
        Ok(())
    }
}

fn validate_fields(stream: &StreamDefinition) -> Result<()> {
    let mut targets = HashSet::new();
    for field in &stream.fields {
        if field.target == stream.key_field {
            return Err(Error::config(format!(
                "Stream '{}' maps '{}' onto its key field '{}'",
                stream.name, field.source, stream.key_field
            )));
        }
        if !targets.insert(field.target.as_str()) {
            return Err(Error::config(format!(
                "Stream '{}' maps more than one column onto '{}'",
                stream.name, field.target
            )));
        }
    }

    if let Some(bookmark) = &stream.bookmark {
        for name in bookmark.fields() {
            if !targets.contains(name) {
                return Err(Error::config(format!(
                    "Stream '{}' bookmarks on '{name}', which is not a mapped field",
                    stream.name
                )));
            }
        }
    }

    if let Some(reshape) = &stream.reshape {
        let groups = &reshape.groups;
        if groups.count == 0 {
            return Err(Error::config(format!(
                "Stream '{}' reshapes zero groups",
                stream.name
            )));
        }
        if !stream.fields.iter().any(|f| f.source == groups.target) {
            return Err(Error::config(format!(
                "Stream '{}' builds '{}' but does not map it",
                stream.name, groups.target
            )));
        }
    }

    Ok(())
}
