//! `ccd redirect`: host redirects

use tracing::instrument;

use crate::cli::args::RedirectCommands;
use crate::cli::commands::print_table;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::table::{cell, Table};
use crate::infrastructure::di::ServiceContainer;

pub fn execute(command: &RedirectCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        RedirectCommands::List => _list(container),
        RedirectCommands::Create {
            source,
            destination,
        } => {
            let result = container.redirects.create(source, destination)?;
            output::response(&result);
            Ok(())
        }
        RedirectCommands::Update {
            source,
            destination,
        } => {
            let result = container.redirects.update(source, destination)?;
            output::response(&result);
            Ok(())
        }
        RedirectCommands::Delete { source } => {
            let result = container.redirects.delete(source)?;
            output::response(&result);
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer) -> CliResult<()> {
    let redirects = container.redirects.list()?;
    let mut table = Table::new(&["Source", "Destination", "Updated"]);
    for r in &redirects {
        table.add_row([
            cell("source", Some(r.source.as_str())),
            cell("destination", Some(r.destination.as_str())),
            cell("updated_at", r.updated_at.as_deref()),
        ]);
    }
    print_table(&table);
    Ok(())
}
