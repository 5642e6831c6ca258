//! Table types for the in-memory airline dataset.
//!
//! A [`Table`] wraps a Polars DataFrame with its source table name and the
//! name of its row-identifier column. A [`TableSet`] is the full collection a
//! pipeline stage consumes and produces.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

/// Substring that marks a leading column as the row identifier.
pub const INDEX_MARKER: &str = "_id";

/// A single relational table.
///
/// # Fields
///
/// - `name`: source table name (e.g., "flight", "booking")
/// - `data`: the rows as a Polars DataFrame
/// - `index`: the identifier column, when the first column follows the `_id` convention
#[derive(Debug, Clone)]
pub struct Table {
    /// Source table name.
    pub name: String,
    /// Table contents.
    pub data: DataFrame,
    /// Row identifier column, if any.
    pub index: Option<String>,
}

impl Table {
    /// Create a table, detecting the identifier column from the first column name.
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        let index = detect_index(&data);
        Self {
            name: name.into(),
            data,
            index,
        }
    }

    /// Returns the number of rows.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Replace the contents, keeping the name.
    ///
    /// The identifier is kept while its column survives; a frame that no
    /// longer has it falls back to detection.
    #[must_use]
    pub fn with_data(&self, data: DataFrame) -> Self {
        let index = match &self.index {
            Some(existing) if data.column(existing).is_ok() => Some(existing.clone()),
            _ => detect_index(&data),
        };
        Self {
            name: self.name.clone(),
            data,
            index,
        }
    }
}

fn detect_index(data: &DataFrame) -> Option<String> {
    let first = data.get_column_names().into_iter().next()?;
    if first.contains(INDEX_MARKER) {
        Some(first.to_string())
    } else {
        None
    }
}

/// Ordered collection of tables keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, Table>,
}

impl TableSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a table.
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns true when a table with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true when the set holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total rows across every table.
    pub fn total_records(&self) -> usize {
        self.tables.values().map(Table::record_count).sum()
    }

    /// Iterate tables in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}

impl IntoIterator for TableSet {
    type Item = Table;
    type IntoIter = std::collections::btree_map::IntoValues<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_values()
    }
}

impl FromIterator<Table> for TableSet {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut set = Self::new();
        for table in iter {
            set.insert(table);
        }
        set
    }
}
