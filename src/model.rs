use std::collections::BTreeMap;

use serde::Serialize;

/// Canonical column order of the `media` table.
pub const MEDIA_COLUMNS: [&str; 25] = [
    "id",
    "name",
    "english_name",
    "japanese_name",
    "other_name",
    "russian",
    "type",
    "episodes",
    "episodes_aired",
    "volumes",
    "chapters",
    "aired",
    "aired_on",
    "released_on",
    "premiered",
    "producers",
    "licensors",
    "studios",
    "source",
    "duration",
    "rating",
    "genres",
    "status",
    "synopsis",
    "poster_url",
];

/// Columns declared `INTEGER` in the store; every other column is `TEXT`.
pub const INTEGER_COLUMNS: [&str; 5] = ["id", "episodes", "episodes_aired", "volumes", "chapters"];

pub fn is_integer_column(column: &str) -> bool {
    INTEGER_COLUMNS.contains(&column)
}

/// Canonical column name to raw text, as produced by either ingest adapter.
pub type FieldMap = BTreeMap<&'static str, String>;

/// One normalized catalog entry. Values stay untyped text until they reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    values: Vec<Option<String>>,
}

impl MediaRecord {
    /// Projects a field map onto [`MEDIA_COLUMNS`]; names outside the canonical set are dropped.
    pub fn from_fields(mut fields: FieldMap) -> Self {
        let values = MEDIA_COLUMNS
            .iter()
            .map(|column| fields.remove(*column))
            .collect();
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let index = MEDIA_COLUMNS.iter().position(|name| *name == column)?;
        self.values[index].as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.values[0].as_deref()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        MEDIA_COLUMNS
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_deref))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoreStatus {
    pub db_path: String,
    pub db_exists: bool,
    pub db_schema_version: Option<String>,
    pub media_rows: i64,
    pub populated_integer_columns: Vec<ColumnCount>,
    pub tabular_inputs: usize,
    pub document_inputs: usize,
}

/// Number of non-NULL values stored in one column.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColumnCount {
    pub column: String,
    pub populated: i64,
}
