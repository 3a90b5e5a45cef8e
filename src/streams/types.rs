//! Stream definition types
//!
//! Declarative stream metadata for YAML parsing.

use crate::types::{KeyStrategy, ReplicationMethod};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Stream Definition
// ============================================================================

/// One logical stream, backed by a single remote report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StreamDefinition {
    /// Unique stream identifier
    pub name: String,
    /// Remote report code the stream is read from (e.g. "410")
    pub report_code: String,
    /// Human description, used in log lines
    #[serde(default)]
    pub description: String,
    /// Output field carrying the primary key
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default)]
    pub replication_method: ReplicationMethod,
    /// Field advertised as replication key in the catalog
    #[serde(default = "default_key_field")]
    pub replication_key: String,
    /// Key under which the bookmark is stored in the state document
    #[serde(default = "default_bookmark_field")]
    pub bookmark_field: String,
    #[serde(default)]
    pub key_strategy: KeyStrategy,
    /// Where the month of a row lives in the raw report line
    pub period: PeriodField,
    /// Where the month of a row lives in the cleaned record; `None` disables bookmarking
    #[serde(default)]
    pub bookmark: Option<PeriodField>,
    #[serde(default)]
    pub reshape: Option<Reshape>,
    /// Ordered field mapping
    pub fields: Vec<FieldMapping>,
}

fn default_key_field() -> String {
    "id".to_string()
}

fn default_bookmark_field() -> String {
    "start_date".to_string()
}

impl StreamDefinition {
    /// Human label used in log lines, e.g. "bank transactions (410)"
    pub fn label(&self) -> String {
        let description = if self.description.is_empty() {
            self.name.replace('_', " ")
        } else {
            self.description.clone()
        };
        format!("{description} ({})", self.report_code)
    }

    /// Names of every field a cleaned record carries, key first
    pub fn output_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key_field.as_str()).chain(self.fields.iter().map(|f| f.target.as_str()))
    }

    /// Record fields the bookmark is derived from; empty for full-table streams
    pub fn bookmark_properties(&self) -> Vec<String> {
        match (&self.bookmark, self.replication_method) {
            (Some(period), ReplicationMethod::Incremental) => {
                period.fields().into_iter().map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Look up the mapping that produces `target`
    pub fn field(&self, target: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.target == target)
    }
}

// ============================================================================
// Period Field
// ============================================================================

/// Location of a row's calendar month.
///
/// Written as `{ field: Periode }` or `{ year: Jaar, period: Periode }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodField {
    /// A single `YYYY/MM` value
    YearPeriod { field: String },
    /// Separate year and period-number values
    YearAndPeriod { year: String, period: String },
}

impl PeriodField {
    /// Field names this location reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::YearPeriod { field } => vec![field.as_str()],
            Self::YearAndPeriod { year, period } => vec![year.as_str(), period.as_str()],
        }
    }
}

// ============================================================================
// Reshape
// ============================================================================

/// Restructuring applied to a raw row before the field mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reshape {
    pub groups: GroupReshape,
}

/// Folds numbered group/group-name column pairs into one nested list.
///
/// With `group_prefix: Groep` and `count: 5` the columns `Groep 1`..`Groep 5`
/// and `Groepnaam 1`..`Groepnaam 5` become a five element list under `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReshape {
    #[serde(default = "default_groups_target")]
    pub target: String,
    #[serde(default = "default_group_count")]
    pub count: usize,
    pub group_prefix: String,
    pub name_prefix: String,
}

fn default_groups_target() -> String {
    "groups".to_string()
}

fn default_group_count() -> usize {
    5
}

impl GroupReshape {
    /// Raw column label of the n-th group (1-based)
    pub fn group_column(&self, n: usize) -> String {
        format!("{} {n}", self.group_prefix)
    }

    /// Raw column label of the n-th group name (1-based)
    pub fn name_column(&self, n: usize) -> String {
        format!("{} {n}", self.name_prefix)
    }
}

// ============================================================================
// Field Mapping
// ============================================================================

/// One entry of a stream's field mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Column label in the raw (or reshaped) row
    pub source: String,
    /// Field name in the cleaned record
    pub target: String,
    #[serde(rename = "type", default)]
    pub target_type: TargetType,
    /// Normalize empty values to null
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl FieldMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            target_type: TargetType::Identity,
            nullable: true,
        }
    }

    pub fn typed(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Declared output type of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    String,
    Integer,
    Decimal,
    /// Parsed date/time, emitted as RFC 3339
    Timestamp,
    /// No conversion
    #[default]
    Identity,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Timestamp => "timestamp",
            Self::Identity => "identity",
        };
        f.write_str(name)
    }
}
