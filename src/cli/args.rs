//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

use crate::config::ConfigKey;

/// Command-line client for the canary-cd deployment service
#[derive(Parser, Debug)]
#[command(name = "ccd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Install completion for the current shell (or the given one)
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub install_completion: Option<Option<Shell>>,

    /// Show completion for the current shell (or the given one)
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub show_completion: Option<Option<Shell>>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure this CLI (API_URL, API_KEY)
    #[command(arg_required_else_help = true)]
    Cli {
        #[command(subcommand)]
        command: CliConfigCommands,
    },

    /// Manage service config
    #[command(arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage authentication keys
    #[command(arg_required_else_help = true)]
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage projects
    #[command(arg_required_else_help = true)]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage static pages
    #[command(arg_required_else_help = true)]
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Manage redirects
    #[command(arg_required_else_help = true)]
    Redirect {
        #[command(subcommand)]
        command: RedirectCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Subcommand name, safe to log (argument values may hold secrets).
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Cli { .. } => "cli",
            Commands::Config { .. } => "config",
            Commands::Auth { .. } => "auth",
            Commands::Project { .. } => "project",
            Commands::Page { .. } => "page",
            Commands::Redirect { .. } => "redirect",
            Commands::Completion { .. } => "completion",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CliConfigCommands {
    /// List cli config
    List,

    /// Set cli config variable
    #[command(arg_required_else_help = true)]
    Set {
        /// Config key
        #[arg(value_enum)]
        key: ConfigKey,
        /// New value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// List config
    List,

    /// Set config
    #[command(arg_required_else_help = true)]
    Set {
        /// Config key (e.g. DISCORD_WEBHOOK)
        key: String,
        /// New value
        value: String,
    },

    /// Unset config
    #[command(arg_required_else_help = true)]
    Unset {
        /// Config key
        key: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Show all keys
    List {
        /// Only keys whose name contains this text
        filter: Option<String>,
    },

    /// Show key details
    #[command(arg_required_else_help = true)]
    View {
        /// Key name
        name: String,
    },

    /// Create key (prompts for the method if none is given)
    Create {
        /// Key name
        name: Option<String>,
        /// Generate an SSH key pair on the server
        #[arg(long, conflicts_with_all = ["pat", "import"])]
        ssh: bool,
        /// Use a personal access token
        #[arg(long, value_name = "TOKEN", conflicts_with = "import")]
        pat: Option<String>,
        /// Import an SSH private key from a file
        #[arg(long = "import", value_name = "FILE", value_hint = ValueHint::FilePath)]
        import: Option<PathBuf>,
    },

    /// Delete key (select interactively if no name is given)
    Delete {
        /// Key name
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List available projects
    List {
        /// Only projects whose name contains this text
        filter: Option<String>,
    },

    /// Show project details
    #[command(arg_required_else_help = true)]
    View {
        /// Project name
        project: String,
        /// Show project secrets
        #[arg(long)]
        secrets: bool,
        /// Open page in browser
        #[arg(long)]
        web: bool,
    },

    /// Create a new project
    Create {
        /// Project name ("." for the current directory's name)
        name: Option<String>,
        /// Git remote, `user/repo[@branch]` or a local checkout
        #[arg(long, value_hint = ValueHint::AnyPath)]
        remote: Option<String>,
        /// Branch to deploy
        #[arg(long)]
        branch: Option<String>,
        /// Authentication key name
        #[arg(long)]
        key: Option<String>,
    },

    /// Update a project and its secrets
    #[command(arg_required_else_help = true)]
    Update {
        /// Project name
        project: String,
        /// New git remote
        #[arg(long, value_hint = ValueHint::AnyPath)]
        remote: Option<String>,
        /// New authentication key
        #[arg(long)]
        key: Option<String>,
        /// New branch
        #[arg(long)]
        branch: Option<String>,
        /// Set secret KEY=VALUE (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Remove secret KEY (repeatable)
        #[arg(long = "unset", value_name = "KEY")]
        unset: Vec<String>,
        /// Import secrets from a dotenv file
        #[arg(long = "import-env", value_name = "FILE", value_hint = ValueHint::FilePath)]
        import_env: Option<PathBuf>,
    },

    /// Delete a project (select interactively if no name is given)
    Delete {
        /// Project name
        name: Option<String>,
    },

    /// Run deployment for environment
    #[command(arg_required_else_help = true)]
    Deploy {
        /// Project name
        name: String,
        /// Start deployment (default)
        #[arg(long, conflicts_with_all = ["stop", "status", "logs"])]
        start: bool,
        /// Stop deployment
        #[arg(long, conflicts_with_all = ["status", "logs"])]
        stop: bool,
        /// Get status
        #[arg(long)]
        status: bool,
        /// Get logs
        #[arg(long)]
        logs: bool,
    },

    /// Get deployment status
    #[command(arg_required_else_help = true)]
    Status {
        /// Project name
        name: String,
    },

    /// Refresh deployment token
    #[command(name = "refresh-token", arg_required_else_help = true)]
    RefreshToken {
        /// Project name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PageCommands {
    /// List pages
    List,

    /// Create new page
    #[command(arg_required_else_help = true)]
    Create {
        /// FQDN
        fqdn: String,
        /// Allowed CORS host (repeatable)
        #[arg(long = "cors", value_name = "HOST")]
        cors: Vec<String>,
        /// Redirect this host to the page (repeatable)
        #[arg(long = "redirect", value_name = "SOURCE")]
        redirect: Vec<String>,
    },

    /// Delete page (select interactively if no FQDN is given)
    Delete {
        /// FQDN
        fqdn: Option<String>,
    },

    /// Refresh token
    #[command(name = "refresh-token", arg_required_else_help = true)]
    RefreshToken {
        /// FQDN
        fqdn: String,
    },

    /// Deploy page
    #[command(arg_required_else_help = true)]
    Deploy {
        /// FQDN
        fqdn: String,
        /// Archive to upload
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Open the page after deploying
        #[arg(long)]
        view: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RedirectCommands {
    /// List redirects
    List,

    /// Create redirect
    #[command(arg_required_else_help = true)]
    Create {
        /// Source FQDN
        source: String,
        /// Destination FQDN
        destination: String,
    },

    /// Update redirect
    #[command(arg_required_else_help = true)]
    Update {
        /// Source FQDN
        source: String,
        /// Destination FQDN
        destination: String,
    },

    /// Delete redirect
    #[command(arg_required_else_help = true)]
    Delete {
        /// Source FQDN
        source: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_set_flags_when_parsing_then_collects_all() {
        let cli = Cli::try_parse_from([
            "ccd", "project", "update", "web", "--set", "A=1", "--set", "B=2", "--unset", "C",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Project {
                command: ProjectCommands::Update { set, unset, .. },
            }) => {
                assert_eq!(set, vec!["A=1", "B=2"]);
                assert_eq!(unset, vec!["C"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn given_install_completion_without_shell_when_parsing_then_some_none() {
        let cli = Cli::try_parse_from(["ccd", "--install-completion"]).unwrap();
        assert_eq!(cli.install_completion, Some(None));
    }

    #[test]
    fn given_install_completion_with_shell_when_parsing_then_uses_it() {
        let cli = Cli::try_parse_from(["ccd", "--install-completion", "zsh"]).unwrap();
        assert_eq!(cli.install_completion, Some(Some(Shell::Zsh)));
    }

    #[test]
    fn given_unknown_cli_key_when_parsing_then_rejected() {
        assert!(Cli::try_parse_from(["ccd", "cli", "set", "FOO", "bar"]).is_err());
    }

    #[test]
    fn given_ssh_and_pat_when_parsing_then_conflict() {
        assert!(
            Cli::try_parse_from(["ccd", "auth", "create", "k", "--ssh", "--pat", "x"]).is_err()
        );
    }

    #[test]
    fn given_start_and_stop_when_parsing_then_conflict() {
        assert!(
            Cli::try_parse_from(["ccd", "project", "deploy", "web", "--start", "--stop"]).is_err()
        );
    }
}
