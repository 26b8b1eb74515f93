use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_DB_FILE: &str = "media.db";

/// Running without a subcommand performs a full import of the input directory.
#[derive(Parser, Debug)]
#[command(
    name = "media-import",
    version,
    about = "Normalize anime catalog CSV and JSON datasets into one SQLite table",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub import: ImportArgs,
}

impl Cli {
    /// The subcommand to run; a bare invocation imports with the top-level flags.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Import(self.import))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Import(ImportArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Drop documents whose sources carry no known catalog link instead of failing the run.
    #[arg(long, default_value_t = false)]
    pub skip_unidentified: bool,
}

impl ImportArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_db_path(&self.input_dir, self.db_path.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl StatusArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_db_path(&self.input_dir, self.db_path.as_deref())
    }
}

fn resolve_db_path(input_dir: &Path, db_path: Option<&Path>) -> PathBuf {
    db_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_dir.join(DEFAULT_DB_FILE))
}
