use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::has_extension;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct InputFiles {
    pub tabular: Vec<PathBuf>,
    pub documents: Vec<PathBuf>,
}

impl InputFiles {
    pub(crate) fn is_empty(&self) -> bool {
        self.tabular.is_empty() && self.documents.is_empty()
    }
}

/// Lists `.csv` and `.json` files directly inside `input_dir`, each set sorted by path.
pub(crate) fn discover_inputs(input_dir: &Path) -> Result<InputFiles> {
    let mut inputs = InputFiles::default();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        // Follows symlinks, so linked datasets count as regular files.
        if !path.is_file() {
            continue;
        }

        if has_extension(&path, "csv") {
            inputs.tabular.push(path);
        } else if has_extension(&path, "json") {
            inputs.documents.push(path);
        }
    }

    inputs.tabular.sort();
    inputs.documents.sort();

    Ok(inputs)
}
