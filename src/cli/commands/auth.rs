//! `ccd auth`: git authentication keys

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::{public_key_of, KeySource};
use crate::cli::args::AuthCommands;
use crate::cli::commands::{name_or_select, print_table, select_name};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::table::{cell, render_kv, Table};
use crate::domain::{expand_path, AuthType};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute(command: &AuthCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        AuthCommands::List { filter } => _list(container, filter.as_deref().unwrap_or_default()),
        AuthCommands::View { name } => _view(container, name),
        AuthCommands::Create {
            name,
            ssh,
            pat,
            import,
        } => _create(
            container,
            name.as_deref(),
            *ssh,
            pat.as_deref(),
            import.as_deref(),
        ),
        AuthCommands::Delete { name } => _delete(container, name.as_deref()),
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer, filter: &str) -> CliResult<()> {
    let keys = container.auth.list(filter)?;
    if keys.is_empty() {
        output::info("No Authentication Keys found");
        return Ok(());
    }
    let mut table = Table::new(&["Name", "Type", "Updated"]);
    for key in &keys {
        table.add_row([
            cell("name", Some(key.name.as_str())),
            cell("auth_type", key.auth_type.as_deref()),
            cell("updated_at", key.updated_at.as_deref()),
        ]);
    }
    print_table(&table);
    Ok(())
}

#[instrument(skip(container))]
fn _view(container: &ServiceContainer, name: &str) -> CliResult<()> {
    let key = container.auth.view(name)?;
    print!("{}", render_kv(&key));
    Ok(())
}

#[instrument(skip(container, pat))]
fn _create(
    container: &ServiceContainer,
    name: Option<&str>,
    ssh: bool,
    pat: Option<&str>,
    import: Option<&Path>,
) -> CliResult<()> {
    let source = if let Some(path) = import {
        KeySource::Import(expand_path(&path.to_string_lossy()))
    } else if ssh {
        KeySource::GenerateSsh
    } else if let Some(token) = pat {
        KeySource::Pat(token.to_string())
    } else {
        prompt_key_source(container)?
    };

    let key = container.auth.prepare(name, source)?;
    debug!("creating {} key {:?}", key.auth_type, key.name);
    let result = container.auth.create(&key)?;

    match public_key_of(&result) {
        Some(public_key) if key.auth_type == AuthType::Ssh => output::info(public_key),
        _ => output::response(&result),
    }
    Ok(())
}

/// Ask for the authentication method, and for the token when it is a PAT.
fn prompt_key_source(container: &ServiceContainer) -> CliResult<KeySource> {
    let methods = AuthType::ALL.iter().map(|t| t.as_str().to_string()).collect();
    let method = select_name(container, methods, "Authentication Method")?
        .ok_or(CliError::Cancelled)?;

    if method == AuthType::Pat.as_str() {
        let token = container.input.secret("PAT").map_err(InfraError::prompt)?;
        Ok(KeySource::Pat(token))
    } else {
        Ok(KeySource::GenerateSsh)
    }
}

#[instrument(skip(container))]
fn _delete(container: &ServiceContainer, name: Option<&str>) -> CliResult<()> {
    let Some(name) = name_or_select(container, name, || container.auth.names(), "Select Key")?
    else {
        return Ok(());
    };
    output::action("Deleting Git Key", &name);
    let result = container.auth.delete(&name)?;
    output::response(&result);
    Ok(())
}
