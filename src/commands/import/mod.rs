mod db_setup;
mod discovery;
mod documents;
mod headers;
mod references;
mod run;
mod store_values;
mod tabular;

pub use run::run;
pub(crate) use db_setup::{count_rows, read_schema_version};
pub(crate) use discovery::discover_inputs;
