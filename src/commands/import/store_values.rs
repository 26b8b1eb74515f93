use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value};
use thiserror::Error;

use crate::model::{MEDIA_COLUMNS, MediaRecord, is_integer_column};

/// A record value after typing for the `media` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreValue {
    Null,
    Integer(i64),
    Text(String),
}

impl ToSql for StoreValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            StoreValue::Null => Ok(ToSqlOutput::Owned(Value::Null)),
            StoreValue::Integer(value) => value.to_sql(),
            StoreValue::Text(value) => value.to_sql(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum StoreValueError {
    #[error("column {column} expects an integer, got {value:?}")]
    NotAnInteger { column: &'static str, value: String },

    #[error("record has no id (name: {name:?})")]
    MissingIdentifier { name: Option<String> },
}

/// Types every column of `record` in canonical order.
///
/// Text columns pass through. Integer columns are trimmed and parsed, blank
/// text becomes NULL. The `id` column must end up non-NULL.
pub(crate) fn coerce_record(record: &MediaRecord) -> Result<Vec<StoreValue>, StoreValueError> {
    let mut values = Vec::with_capacity(MEDIA_COLUMNS.len());

    for (column, raw) in record.columns() {
        let value = match raw {
            None => StoreValue::Null,
            Some(raw) if is_integer_column(column) => coerce_integer(column, raw)?,
            Some(raw) => StoreValue::Text(raw.to_string()),
        };

        if column == "id" && value == StoreValue::Null {
            return Err(StoreValueError::MissingIdentifier {
                name: record.get("name").map(ToOwned::to_owned),
            });
        }
        values.push(value);
    }

    Ok(values)
}

fn coerce_integer(column: &'static str, raw: &str) -> Result<StoreValue, StoreValueError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(StoreValue::Null);
    }

    trimmed
        .parse::<i64>()
        .map(StoreValue::Integer)
        .map_err(|_| StoreValueError::NotAnInteger {
            column,
            value: raw.to_string(),
        })
}
