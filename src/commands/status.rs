use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::import::{count_rows, discover_inputs, read_schema_version};
use crate::model::{ColumnCount, INTEGER_COLUMNS, StoreStatus};

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args.resolved_db_path();
    info!(db_path = %db_path.display(), "status requested");

    let status = collect_status(&args.input_dir, &db_path)?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&status).context("failed to serialize status")?;
        println!("{rendered}");
        return Ok(());
    }

    if status.db_exists {
        info!(
            path = %status.db_path,
            schema_version = %status.db_schema_version.as_deref().unwrap_or("unknown"),
            media = status.media_rows,
            "database status"
        );
        for count in &status.populated_integer_columns {
            info!(column = %count.column, rows = count.populated, "populated integer column");
        }
    } else {
        warn!(path = %status.db_path, "database file missing");
    }
    info!(
        csv = status.tabular_inputs,
        json = status.document_inputs,
        "input files available"
    );

    Ok(())
}

fn collect_status(input_dir: &Path, db_path: &Path) -> Result<StoreStatus> {
    let (tabular_inputs, document_inputs) = match discover_inputs(input_dir) {
        Ok(inputs) => (inputs.tabular.len(), inputs.documents.len()),
        Err(err) => {
            warn!(input_dir = %input_dir.display(), error = %err, "input directory unreadable");
            (0, 0)
        }
    };

    let mut status = StoreStatus {
        db_path: db_path.display().to_string(),
        db_exists: db_path.exists(),
        db_schema_version: None,
        media_rows: 0,
        populated_integer_columns: Vec::new(),
        tabular_inputs,
        document_inputs,
    };

    if status.db_exists {
        let connection = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        status.db_schema_version = read_schema_version(&connection).unwrap_or(None);
        status.media_rows = count_rows(&connection, "SELECT COUNT(*) FROM media").unwrap_or(0);
        status.populated_integer_columns = INTEGER_COLUMNS
            .iter()
            .map(|column| ColumnCount {
                column: (*column).to_string(),
                populated: count_rows(&connection, &format!("SELECT COUNT({column}) FROM media"))
                    .unwrap_or(0),
            })
            .collect();
    }

    Ok(status)
}
