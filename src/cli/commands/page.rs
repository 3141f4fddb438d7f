//! `ccd page`: static pages

use std::path::Path;

use colored::Colorize;
use tracing::instrument;

use crate::cli::args::PageCommands;
use crate::cli::commands::{name_or_select, print_table};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::table::{cell, Table};
use crate::domain::expand_path;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute(command: &PageCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        PageCommands::List => _list(container),
        PageCommands::Create {
            fqdn,
            cors,
            redirect,
        } => _create(container, fqdn, cors, redirect),
        PageCommands::Delete { fqdn } => _delete(container, fqdn.as_deref()),
        PageCommands::RefreshToken { fqdn } => _refresh_token(container, fqdn),
        PageCommands::Deploy { fqdn, path, view } => _deploy(container, fqdn, path, *view),
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer) -> CliResult<()> {
    let pages = container.pages.list()?;
    let mut table = Table::new(&["FQDN", "Updated"]);
    for page in &pages {
        table.add_row([
            cell("fqdn", Some(page.fqdn.as_str())),
            cell("updated_at", page.updated_at.as_deref()),
        ]);
    }
    print_table(&table);
    Ok(())
}

#[instrument(skip(container))]
fn _create(
    container: &ServiceContainer,
    fqdn: &str,
    cors: &[String],
    redirects: &[String],
) -> CliResult<()> {
    let result = container.pages.create(fqdn, cors)?;
    output::result_details(
        &format!("Creating Page {}..", fqdn.bright_cyan().bold()),
        &result,
    );

    for source in redirects {
        let pb = output::spinner("Creating Redirect..");
        let result = container.pages.add_redirect(fqdn, source);
        pb.finish_and_clear();
        output::result_details(&format!("Redirect: {source}"), &result?);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _delete(container: &ServiceContainer, fqdn: Option<&str>) -> CliResult<()> {
    let Some(fqdn) = name_or_select(
        container,
        fqdn,
        || container.pages.names(),
        "Select a Page for removal",
    )?
    else {
        return Ok(());
    };
    output::action("Deleting Page", &fqdn);
    let result = container.pages.delete(&fqdn)?;
    output::response(&result);
    Ok(())
}

#[instrument(skip(container))]
fn _refresh_token(container: &ServiceContainer, fqdn: &str) -> CliResult<()> {
    let pb = output::spinner(format!("Generating New Token for {fqdn}..."));
    let result = container.pages.refresh_token(fqdn);
    pb.finish_and_clear();
    let result = result?;

    output::action("Refreshing Page Deploy Token for", fqdn);
    output::info(&result.token.yellow());
    Ok(())
}

#[instrument(skip(container))]
fn _deploy(container: &ServiceContainer, fqdn: &str, path: &Path, view: bool) -> CliResult<()> {
    println!("Deploying page {}", fqdn.green().bold());
    let path = expand_path(&path.to_string_lossy());
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let pb = output::spinner(format!("Uploading {file_name}..."));
    let result = container.pages.deploy(fqdn, &path);
    pb.finish_and_clear();
    result?;
    output::info("Successfully Uploaded");

    let url = container.pages.page_url(fqdn);
    output::success(&format!("Deployed {url}"));
    if view {
        container
            .launcher
            .open(&url)
            .map_err(|e| InfraError::io(format!("open {url}"), e))?;
    }
    Ok(())
}
