use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use super::db_setup::{
    PersistStats, configure_connection, ensure_schema, persist_records, remove_duplicates,
};
use super::discovery::{InputFiles, discover_inputs};
use super::documents::ingest_documents;
use super::references::IdentifierExtractor;
use super::tabular::ingest_tabular;
use crate::cli::ImportArgs;
use crate::util::display_file_name;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub tabular_files: usize,
    pub document_files: usize,
    pub records_written: usize,
    pub skipped_unidentified: usize,
    pub duplicates_removed: usize,
}

impl ImportSummary {
    fn absorb(&mut self, stats: PersistStats) {
        self.records_written += stats.written;
        self.skipped_unidentified += stats.skipped_unidentified;
    }
}

pub fn run(args: ImportArgs) -> Result<()> {
    let db_path = args.resolved_db_path();

    info!(
        input_dir = %args.input_dir.display(),
        db_path = %db_path.display(),
        "starting import"
    );

    let inputs = discover_inputs(&args.input_dir)?;
    if inputs.is_empty() {
        info!(
            input_dir = %args.input_dir.display(),
            "no CSV or JSON files found, nothing to import"
        );
        return Ok(());
    }

    let mut connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;

    let summary = import_inputs(&mut connection, &inputs, args.skip_unidentified)?;

    info!(
        db_path = %db_path.display(),
        files = summary.tabular_files + summary.document_files,
        records = summary.records_written,
        skipped = summary.skipped_unidentified,
        "database updated successfully"
    );

    Ok(())
}

/// Imports every discovered file inside one transaction, CSV files first.
///
/// Any failure drops the transaction, so a run either lands completely or not at all.
pub(crate) fn import_inputs(
    connection: &mut Connection,
    inputs: &InputFiles,
    skip_unidentified: bool,
) -> Result<ImportSummary> {
    let extractor = IdentifierExtractor::new()?;
    let tx = connection
        .transaction()
        .context("failed to begin import transaction")?;
    ensure_schema(&tx)?;

    let mut summary = ImportSummary::default();

    for path in &inputs.tabular {
        let records = ingest_tabular(path)?;
        let stats = persist_records(&tx, &records, skip_unidentified)
            .with_context(|| format!("failed to store rows from {}", path.display()))?;
        summary.absorb(stats);
        summary.tabular_files += 1;
        info!(file = %display_file_name(path), rows = records.len(), "imported tabular file");
    }

    for path in &inputs.documents {
        let records = ingest_documents(path, &extractor)?;
        let stats = persist_records(&tx, &records, skip_unidentified)
            .with_context(|| format!("failed to store entries from {}", path.display()))?;
        summary.absorb(stats);
        summary.document_files += 1;
        info!(
            file = %display_file_name(path),
            entries = records.len(),
            skipped = stats.skipped_unidentified,
            "imported document file"
        );
    }

    summary.duplicates_removed = remove_duplicates(&tx)?;
    info!(removed = summary.duplicates_removed, "removed duplicate rows");

    tx.commit().context("failed to commit import")?;

    Ok(summary)
}
