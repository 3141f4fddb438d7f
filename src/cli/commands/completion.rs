//! Shell completion: print, show and install

use std::io::Write;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use directories::BaseDirs;
use tracing::{debug, instrument};

use crate::application::services::{detect_shell, CompletionService};
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::infrastructure::traits::RealFileSystem;
use crate::infrastructure::InfraError;

const BIN_NAME: &str = "ccd";

/// Completion script for `shell`.
pub fn render_completion(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn resolve_shell(shell: Option<Shell>) -> CliResult<Shell> {
    if let Some(shell) = shell {
        return Ok(shell);
    }
    let shell_var = std::env::var("SHELL").ok();
    debug!("SHELL={:?}", shell_var);
    detect_shell(shell_var.as_deref()).ok_or_else(|| {
        CliError::Usage("cannot detect shell from $SHELL; pass it explicitly".to_string())
    })
}

#[instrument]
pub(super) fn _generate(shell: Shell) -> CliResult<()> {
    write_stdout(&render_completion(shell))
}

#[instrument]
pub(super) fn _show(shell: Option<Shell>) -> CliResult<()> {
    let shell = resolve_shell(shell)?;
    write_stdout(&render_completion(shell))
}

#[instrument]
pub(super) fn _install(shell: Option<Shell>) -> CliResult<()> {
    let shell = resolve_shell(shell)?;
    let home = BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| CliError::Usage("cannot determine home directory".to_string()))?;

    let service = CompletionService::new(Arc::new(RealFileSystem), home);
    let installed = service.install(shell, BIN_NAME, &render_completion(shell))?;

    output::success(&format!(
        "{shell} completion installed in {}",
        installed.script_path.display()
    ));
    if let (Some(rc_path), true) = (&installed.rc_path, installed.rc_updated) {
        output::detail(&format!("updated {}", rc_path.display()));
    }
    output::info("Completion will take effect once you restart the terminal");
    Ok(())
}

fn write_stdout(script: &str) -> CliResult<()> {
    std::io::stdout()
        .write_all(script.as_bytes())
        .map_err(|e| CliError::from(InfraError::io("write completion script", e)))
}
