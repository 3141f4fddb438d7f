//! `ccd config`: service-side configuration

use tracing::instrument;

use crate::application::services::KNOWN_CONFIG_KEYS;
use crate::cli::args::ConfigCommands;
use crate::cli::commands::print_table;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::table::{cell, Table};
use crate::infrastructure::di::ServiceContainer;

pub fn execute(command: &ConfigCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        ConfigCommands::List => _list(container),
        ConfigCommands::Set { key, value } => _set(container, key, value),
        ConfigCommands::Unset { key } => _unset(container, key),
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer) -> CliResult<()> {
    let entries = container.config.list()?;
    let mut table = Table::new(&["Key", "Value"]);
    for entry in entries {
        let value = cell("value", entry.value.as_deref());
        table.add_row([entry.key, value]);
    }
    print_table(&table);
    Ok(())
}

#[instrument(skip(container, value))]
fn _set(container: &ServiceContainer, key: &str, value: &str) -> CliResult<()> {
    if !KNOWN_CONFIG_KEYS.contains(&key) {
        output::warning(&format!(
            "unknown config key {key}, known keys: {}",
            KNOWN_CONFIG_KEYS.join(", ")
        ));
    }
    let result = container.config.set(key, value)?;
    output::response(&result);
    Ok(())
}

#[instrument(skip(container))]
fn _unset(container: &ServiceContainer, key: &str) -> CliResult<()> {
    let result = container.config.unset(key)?;
    output::response(&result);
    Ok(())
}
