//! Decoded browse data

use crate::types::RawRow;

/// Header labels and rows of one browse response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseTable {
    /// Column labels in response order
    pub columns: Vec<String>,
    /// Rows in response order
    pub rows: Vec<RawRow>,
}

impl BrowseTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.columns.iter().any(|c| c == label)
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        self.rows
    }
}
