//! `ccd cli`: local client configuration

use std::path::Path;

use tracing::instrument;

use crate::cli::args::CliConfigCommands;
use crate::cli::commands::print_table;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::table::Table;
use crate::cli::CliError;
use crate::config::{ensure_config_file, global_config_path, ConfigFile, ConfigKey, Settings};

pub fn execute(command: &CliConfigCommands) -> CliResult<()> {
    let path = global_config_path()
        .ok_or_else(|| CliError::Usage("cannot determine config directory".to_string()))?;
    ensure_config_file(&path)?;

    match command {
        CliConfigCommands::List => _list(&path),
        CliConfigCommands::Set { key, value } => _set(&path, *key, value),
    }
}

#[instrument]
fn _list(path: &Path) -> CliResult<()> {
    let file = ConfigFile::read(path)?;
    let mut table = Table::new(&["Key", "Value"]);
    for (key, value) in file.entries() {
        table.add_row([key, value]);
    }
    print_table(&table);
    Ok(())
}

#[instrument(skip(value))]
fn _set(path: &Path, key: ConfigKey, value: &str) -> CliResult<()> {
    Settings::store(path, key, value)?;
    output::info(&format!("{}={}", key.as_str(), value));
    Ok(())
}
