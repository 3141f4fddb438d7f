//! Command dispatch
//!
//! `completion` and `cli` run without contacting the service; every other
//! command loads [`Settings`] and wires a [`ServiceContainer`].

mod auth;
mod cli_config;
mod completion;
mod config;
mod page;
mod project;
mod redirect;

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::InfraError;

pub use completion::render_completion;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.install_completion {
        return completion::_install(shell);
    }
    if let Some(shell) = cli.show_completion {
        return completion::_show(shell);
    }

    match &cli.command {
        Some(Commands::Completion { shell }) => completion::_generate(*shell),
        Some(Commands::Cli { command }) => cli_config::execute(command),
        Some(command) => {
            let settings = Settings::load()?;
            let container = ServiceContainer::new(settings)?;
            execute_service_command(command, &container)
        }
        None => Ok(()),
    }
}

/// Run a command against the canary-cd service.
#[instrument(skip_all, fields(command = command.name()))]
pub fn execute_service_command(command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    debug!("api_url: {}", container.settings.api_url);
    match command {
        Commands::Config { command } => config::execute(command, container),
        Commands::Auth { command } => auth::execute(command, container),
        Commands::Project { command } => project::execute(command, container),
        Commands::Page { command } => page::execute(command, container),
        Commands::Redirect { command } => redirect::execute(command, container),
        Commands::Cli { command } => cli_config::execute(command),
        Commands::Completion { shell } => completion::_generate(*shell),
    }
}

/// Fuzzy-select one name. `None` when the list is empty or the user aborts.
pub(crate) fn select_name(
    container: &ServiceContainer,
    names: Vec<String>,
    prompt: &str,
) -> CliResult<Option<String>> {
    if names.is_empty() {
        return Ok(None);
    }
    let items: Vec<SelectionItem> = names.into_iter().map(SelectionItem::plain).collect();
    let selected = container
        .selector
        .select_one(&items, prompt)
        .map_err(InfraError::prompt)?;
    Ok(selected.map(|item| item.value))
}

/// Use the given name or let the user pick one from `names`.
pub(crate) fn name_or_select(
    container: &ServiceContainer,
    name: Option<&str>,
    names: impl FnOnce() -> ApplicationResult<Vec<String>>,
    prompt: &str,
) -> CliResult<Option<String>> {
    match name {
        Some(name) => Ok(Some(name.to_string())),
        None => select_name(container, names()?, prompt),
    }
}

/// Print a table, or "No Results" when it has no rows.
pub(crate) fn print_table(table: &crate::cli::table::Table) {
    if table.is_empty() {
        output::info("No Results");
    } else {
        print!("{}", table.render());
    }
}
