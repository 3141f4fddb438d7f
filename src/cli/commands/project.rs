//! `ccd project`: projects, their secrets and deployments

use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::services::DeployAction;
use crate::cli::args::ProjectCommands;
use crate::cli::commands::{name_or_select, print_table, select_name};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::table::{cell, render_kv, Table};
use crate::domain::{
    expand_path, normalize_project_name, Container, DeployStatus, ProjectChanges, SecretAssignment,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute(command: &ProjectCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        ProjectCommands::List { filter } => _list(container, filter.as_deref().unwrap_or_default()),
        ProjectCommands::View {
            project,
            secrets,
            web,
        } => _view(container, project, *secrets, *web),
        ProjectCommands::Create {
            name,
            remote,
            branch,
            key,
        } => _create(
            container,
            name.as_deref(),
            remote.as_deref(),
            branch.as_deref(),
            key.as_deref(),
        ),
        ProjectCommands::Update {
            project,
            remote,
            key,
            branch,
            set,
            unset,
            import_env,
        } => _update(
            container,
            project,
            Update {
                remote: remote.as_deref(),
                key: key.as_deref(),
                branch: branch.as_deref(),
                set,
                unset,
                import_env: import_env.as_deref(),
            },
        ),
        ProjectCommands::Delete { name } => _delete(container, name.as_deref()),
        ProjectCommands::Deploy {
            name,
            start: _,
            stop,
            status,
            logs,
        } => _deploy(container, name, *stop, *status, *logs),
        ProjectCommands::Status { name } => _status(container, name),
        ProjectCommands::RefreshToken { name } => _refresh_token(container, name),
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer, filter: &str) -> CliResult<()> {
    let projects = container.projects.list(filter)?;
    if projects.is_empty() {
        output::info("No Projects found");
        return Ok(());
    }
    let mut table = Table::new(&["Name", "Remote", "Branch", "Key", "Updated"]);
    for p in &projects {
        table.add_row([
            cell("name", Some(p.name.as_str())),
            cell("remote", p.remote.as_deref()),
            cell("branch", p.branch.as_deref()),
            cell("key", p.key.as_deref()),
            cell("updated_at", p.updated_at.as_deref()),
        ]);
    }
    print_table(&table);
    Ok(())
}

#[instrument(skip(container))]
fn _view(container: &ServiceContainer, project: &str, secrets: bool, web: bool) -> CliResult<()> {
    if secrets {
        let secrets = container.projects.secrets(project)?;
        println!("Secrets for {}", project.bright_cyan().bold());
        let mut table = Table::new(&["Key", "Value", "Updated"]);
        for s in &secrets {
            table.add_row([
                cell("key", Some(s.key.as_str())),
                cell("value", s.value.as_deref()),
                cell("updated_at", s.updated_at.as_deref()),
            ]);
        }
        print_table(&table);
    } else {
        let details = container.projects.view(project)?;
        print!("{}", render_kv(&details));
    }

    if web {
        let url = &container.settings.api_url;
        output::info(&format!("Opening {url} .."));
        container
            .launcher
            .open(url)
            .map_err(|e| InfraError::io(format!("open {url}"), e))?;
    }
    Ok(())
}

#[instrument(skip(container))]
fn _create(
    container: &ServiceContainer,
    name: Option<&str>,
    remote: Option<&str>,
    branch: Option<&str>,
    key: Option<&str>,
) -> CliResult<()> {
    let remote = match remote {
        Some(remote) => remote.to_string(),
        None => container
            .input
            .text("Enter Git Remote", Some(""))
            .map_err(InfraError::prompt)?,
    };
    let resolved = container.projects.resolve_remote(&remote, branch)?;
    if container.fs.is_dir(Path::new(&remote)) {
        println!("{} {}", "found remote origin:".green(), resolved.remote);
    } else {
        output::info(&format!(
            "{} {}",
            resolved.remote,
            resolved.branch.as_deref().unwrap_or("-")
        ));
    }

    let name = match name {
        Some(raw) => Some(normalize_project_name(raw, &current_dir()?)),
        None => None,
    };

    let key = match key {
        Some(key) => Some(key.to_string()),
        None => {
            let names = container.auth.names()?;
            if names.is_empty() {
                output::warning("you have no git keys, skipping selection");
                None
            } else {
                select_name(container, names, "Select a Git Key")?
            }
        }
    };

    let project = ProjectChanges {
        name,
        remote: Some(resolved.remote),
        branch: resolved.branch,
        key,
    };
    debug!("project: {:?}", project);

    let pb = output::spinner("Creating Project..");
    let result = container.projects.create(&project);
    pb.finish_and_clear();
    let result = result?;

    if let Some(name) = result.get("name").and_then(serde_json::Value::as_str) {
        output::header(name);
    }
    print!("{}", render_kv(&result));
    Ok(())
}

fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CliError::from(InfraError::io("resolve current directory", e)))
}

/// Options of `project update`.
#[derive(Debug)]
struct Update<'a> {
    remote: Option<&'a str>,
    key: Option<&'a str>,
    branch: Option<&'a str>,
    set: &'a [String],
    unset: &'a [String],
    import_env: Option<&'a Path>,
}

impl Update<'_> {
    fn is_empty(&self) -> bool {
        self.remote.is_none()
            && self.key.is_none()
            && self.branch.is_none()
            && self.set.is_empty()
            && self.unset.is_empty()
            && self.import_env.is_none()
    }
}

#[instrument(skip(container, update))]
fn _update(container: &ServiceContainer, project: &str, update: Update<'_>) -> CliResult<()> {
    if update.is_empty() {
        return Err(CliError::Usage("option required: --help".to_string()));
    }

    let mut changes = ProjectChanges {
        key: update.key.map(str::to_string),
        branch: update.branch.map(str::to_string),
        ..ProjectChanges::default()
    };
    if let Some(remote) = update.remote {
        let resolved = container.projects.resolve_remote(remote, update.branch)?;
        changes.remote = Some(resolved.remote);
        changes.branch = resolved.branch;
    }

    if !changes.is_empty() {
        output::action("Updating project", project);
        let result = container.projects.update(project, &changes)?;
        print!("{}", render_kv(&result));
    }

    for raw in update.set {
        let assignment = match SecretAssignment::parse(raw) {
            Ok(assignment) => assignment,
            Err(e) => {
                debug!("{e}");
                output::warning(&format!("skipping {raw}"));
                continue;
            }
        };
        let pb = output::spinner("Pushing Secret..");
        let secret = container
            .projects
            .set_secret(project, &assignment.key, &assignment.value);
        pb.finish_and_clear();
        output::success(&secret?.key.bright_cyan().bold());
    }

    for key in update.unset {
        let pb = output::spinner("Deleting Secret..");
        let result = container.projects.unset_secret(project, key);
        pb.finish_and_clear();
        result?;
        output::success(&key.bright_cyan().bold());
    }

    if let Some(path) = update.import_env {
        let path = expand_path(&path.to_string_lossy());
        output::info(&format!("importing {}", path.display().to_string().yellow()));
        let env = container.projects.read_env_file(&path)?;
        for (key, value) in &env.entries {
            container.projects.set_secret(project, key, value)?;
            output::success(&format!("{}: {}", key.cyan().bold(), value));
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _delete(container: &ServiceContainer, name: Option<&str>) -> CliResult<()> {
    let Some(name) = name_or_select(
        container,
        name,
        || container.projects.names(),
        "Select a Project for removal",
    )?
    else {
        return Ok(());
    };
    output::action("Deleting project", &name);
    let result = container.projects.delete(&name)?;
    output::response(&result);
    Ok(())
}

#[instrument(skip(container))]
fn _deploy(
    container: &ServiceContainer,
    name: &str,
    stop: bool,
    status: bool,
    logs: bool,
) -> CliResult<()> {
    let result = if status || logs {
        let result = container.projects.deploy(name, DeployAction::Status)?;
        if status {
            if let Some(ps) = &result.ps {
                print_table(&containers_table(ps));
            }
        }
        if logs && result.logs.is_some() {
            print!("{}", logs_table(&result).render());
        }
        result
    } else if stop {
        container.projects.deploy(name, DeployAction::Stop)?
    } else {
        container.projects.deploy(name, DeployAction::Start)?
    };

    if let Some(detail) = &result.detail {
        output::info(detail);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _status(container: &ServiceContainer, name: &str) -> CliResult<()> {
    let result = container.projects.status(name)?;
    if let Some(ps) = &result.ps {
        print!("{}", containers_table(ps).with_title("Container").render());
    }
    if result.logs.is_some() {
        print!("{}", logs_table(&result).with_title("Logs").render());
    }
    Ok(())
}

fn containers_table(containers: &[Container]) -> Table {
    let mut table = Table::new(&["Name", "Image", "State", "Status"]);
    for c in containers {
        table.add_row([
            cell("Name", c.name.as_deref()),
            cell("Image", c.image.as_deref()),
            cell("State", c.state.as_deref()),
            cell("Status", c.status.as_deref()),
        ]);
    }
    table
}

fn logs_table(status: &DeployStatus) -> Table {
    let mut table = Table::headless();
    for line in status.log_lines() {
        table.add_row([line]);
    }
    table
}

#[instrument(skip(container))]
fn _refresh_token(container: &ServiceContainer, name: &str) -> CliResult<()> {
    let pb = output::spinner(format!("Generating New Token for {name}..."));
    let result = container.projects.refresh_token(name);
    pb.finish_and_clear();
    let result = result?;

    println!("New Deploy Token for {}", name.bright_cyan().bold());
    output::secret(&result.token);
    output::info(&format!(
        "curl -X POST {}",
        container.projects.webhook_url(&result.token)
    ));
    Ok(())
}
