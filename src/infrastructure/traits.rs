//! I/O boundary traits for testability
//!
//! These traits abstract the network, the filesystem and the terminal,
//! allowing services and commands to be tested with mock implementations.

use std::fmt;
use std::io;
use std::path::Path;

use reqwest::Url;

/// HTTP methods used against the canary-cd API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Raw(Vec<u8>),
}

/// Fully resolved request handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: String,
    pub body: Option<Body>,
}

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Network abstraction: one blocking request/response exchange.
pub trait HttpTransport: Send + Sync {
    /// Send the request. Errors are connection-level only; HTTP error
    /// statuses come back as a normal `ApiResponse`.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, String>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write string content to file, creating parent directories.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Append string content to file, creating it if missing.
    fn append(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Actual value (e.g., project name)
    pub value: String,
}

impl SelectionItem {
    /// Item whose display text is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
        }
    }
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

/// Free-text prompt abstraction.
pub trait TextInput: Send + Sync {
    /// Ask for a line of text. Empty input is allowed and returned as "".
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String, String>;

    /// Ask for a secret without echoing it.
    fn secret(&self, prompt: &str) -> Result<String, String>;
}

/// Opens URLs in the user's browser.
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
    }

    fn append(&self, path: &Path, content: &str) -> io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(content.as_bytes())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("{prompt}: ");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(&prompt))
            .height(Some("40%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let source = item_reader.of_bufread(Cursor::new(input));

        match Skim::run_with(&options, Some(source)) {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => Ok(out.selected_items.first().and_then(|selected| {
                let display = selected.output().to_string();
                items.iter().find(|i| i.display == display).cloned()
            })),
            None => Ok(None),
        }
    }
}

/// Real text prompts using dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerInput;

impl TextInput for DialoguerInput {
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String, String> {
        let mut input = dialoguer::Input::<String>::new();
        input.with_prompt(prompt).allow_empty(true);
        if let Some(d) = default {
            input.default(d.to_string());
        }
        input.interact_text().map_err(|e| e.to_string())
    }

    fn secret(&self, prompt: &str) -> Result<String, String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| e.to_string())
    }
}

/// Opens URLs with the platform opener (`open`, `xdg-open`, `start`).
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> io::Result<()> {
        use std::process::Command;

        let status = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).status()?
        } else if cfg!(windows) {
            Command::new("cmd").args(["/C", "start", "", url]).status()?
        } else {
            Command::new("xdg-open").arg(url).status()?
        };

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("browser launcher exited with status: {status}"),
            ))
        }
    }
}
