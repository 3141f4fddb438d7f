//! Shell completion installation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap_complete::Shell;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Where a completion script was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInstall {
    pub shell: Shell,
    pub script_path: PathBuf,
    /// rc file that sources the script, if the shell needs one
    pub rc_path: Option<PathBuf>,
    /// false when the rc file already had the sourcing lines
    pub rc_updated: bool,
}

/// Detect the user's shell from a `$SHELL`-style path.
pub fn detect_shell(shell_var: Option<&str>) -> Option<Shell> {
    let name = Path::new(shell_var?).file_name()?.to_str()?;
    match name {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "pwsh" | "powershell" => Some(Shell::PowerShell),
        _ => None,
    }
}

/// Installs completion scripts below a home directory.
pub struct CompletionService {
    fs: Arc<dyn FileSystem>,
    home: PathBuf,
}

impl CompletionService {
    pub fn new(fs: Arc<dyn FileSystem>, home: PathBuf) -> Self {
        Self { fs, home }
    }

    /// Write `script` for `shell` and hook it into the shell's rc file.
    pub fn install(
        &self,
        shell: Shell,
        bin_name: &str,
        script: &str,
    ) -> ApplicationResult<CompletionInstall> {
        let (script_path, rc) = match shell {
            Shell::Bash => {
                let script_path = self
                    .home
                    .join(".bash_completions")
                    .join(format!("{bin_name}.sh"));
                let hook = format!("source \"{}\"\n", script_path.display());
                (script_path, Some((self.home.join(".bashrc"), hook)))
            }
            Shell::Zsh => {
                let zfunc = self.home.join(".zfunc");
                let hook = format!(
                    "fpath+=\"{}\"\nautoload -Uz compinit && compinit\n",
                    zfunc.display()
                );
                (
                    zfunc.join(format!("_{bin_name}")),
                    Some((self.home.join(".zshrc"), hook)),
                )
            }
            Shell::Fish => (
                self.home
                    .join(".config")
                    .join("fish")
                    .join("completions")
                    .join(format!("{bin_name}.fish")),
                None,
            ),
            other => {
                return Err(ApplicationError::InvalidInput(format!(
                    "automatic installation is not supported for {other}; \
                     use `{bin_name} completion {other}` and source the output"
                )))
            }
        };

        debug!("installing {} completion to {}", shell, script_path.display());
        self.fs
            .write(&script_path, script)
            .with_path_context("write completion script", &script_path)?;

        let (rc_path, rc_updated) = match rc {
            Some((rc_path, hook)) => {
                let updated = self.ensure_hook(&rc_path, &hook)?;
                (Some(rc_path), updated)
            }
            None => (None, false),
        };

        Ok(CompletionInstall {
            shell,
            script_path,
            rc_path,
            rc_updated,
        })
    }

    /// Append `hook` to the rc file unless it is already present.
    fn ensure_hook(&self, rc_path: &Path, hook: &str) -> ApplicationResult<bool> {
        let existing = if self.fs.exists(rc_path) {
            self.fs
                .read_to_string(rc_path)
                .with_path_context("read rc file", rc_path)?
        } else {
            String::new()
        };
        if existing.contains(hook.trim_end()) {
            return Ok(false);
        }

        let separator = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        self.fs
            .append(rc_path, &format!("{separator}{hook}"))
            .with_path_context("update rc file", rc_path)?;
        Ok(true)
    }
}
