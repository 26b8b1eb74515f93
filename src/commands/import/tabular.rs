use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use super::headers::reconcile;
use crate::model::MediaRecord;

/// Reads a header-named CSV file into canonical records, one per data row, in file order.
///
/// Integer columns are passed through as raw text; coercion happens at the store.
pub(crate) fn ingest_tabular(path: &Path) -> Result<Vec<MediaRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| {
            format!("failed to parse data row {} of {}", index + 1, path.display())
        })?;

        // Repeated header names keep the last cell, cells past the header are ignored.
        let source: HashMap<&str, &str> = headers.iter().zip(row.iter()).collect();
        records.push(MediaRecord::from_fields(reconcile(&source)));
    }

    Ok(records)
}
