//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::application::detail_of;
use crate::cli::table;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print indented error detail (red) to stderr
pub fn error_detail(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("  {}", msg.to_string().red());
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✔".bright_green().bold(), msg);
}

/// Print failure status (red X)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✗".bright_red().bold(), msg);
}

/// Print completed action (label followed by a highlighted name)
pub fn action(label: &str, name: &str) {
    println!("{} {}", label, name.cyan().bold());
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().bright_cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data and pre-rendered tables)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a token or other value the user has to copy
pub fn secret(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().bright_red());
}

/// Report the outcome of a create call: ✗ with the service's detail, or ✓.
pub fn result_details(label: &str, result: &Value) {
    match detail_of(result) {
        Some(detail) => failure(&format!("{label} {detail}")),
        None => success(label),
    }
}

/// Print a service response: its detail, a key/value view, or nothing.
pub fn response(result: &Value) {
    match result {
        Value::Null => {}
        Value::Object(_) => match detail_of(result) {
            Some(detail) => info(detail),
            None => print!("{}", table::render_kv(result)),
        },
        Value::String(s) => info(s),
        other => info(other),
    }
}

/// Spinner on stderr; call `finish_and_clear` when the work is done.
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(50));
    pb
}
