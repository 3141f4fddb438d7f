//! Dotenv parsing for secret import and `.env` configuration

use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Parsed dotenv file. Entries keep file order; a repeated key keeps its
/// first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotEnv {
    pub entries: Vec<(String, String)>,
}

impl DotEnv {
    /// Parse dotenv content, failing on the first malformed line.
    ///
    /// Accepts `KEY=value` and `export KEY=value`. Blank lines and `#`
    /// comments are skipped; surrounding quotes and trailing comments are
    /// stripped from values. A quoted value may span several lines.
    pub fn parse(content: &str, path: &Path) -> Result<Self, DomainError> {
        Self::parse_with(content, path, Err)
    }

    /// Parse dotenv content, collecting malformed lines instead of failing.
    pub fn parse_lenient(content: &str, path: &Path) -> (Self, Vec<DomainError>) {
        let mut skipped = Vec::new();
        let env = Self::parse_with(content, path, |e| {
            skipped.push(e);
            Ok(())
        })
        .unwrap_or_default();
        (env, skipped)
    }

    fn parse_with(
        content: &str,
        path: &Path,
        mut on_invalid: impl FnMut(DomainError) -> Result<(), DomainError>,
    ) -> Result<Self, DomainError> {
        let invalid = |line: usize, message: String| DomainError::InvalidEnvFile {
            path: path.to_path_buf(),
            line,
            message,
        };
        let lines: Vec<&str> = content.lines().collect();
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut idx = 0;

        while idx < lines.len() {
            let line_no = idx + 1;
            let trimmed = lines[idx].trim();
            idx += 1;
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, raw)) = rest.split_once('=') else {
                on_invalid(invalid(line_no, format!("expected KEY=VALUE, got '{trimmed}'")))?;
                continue;
            };
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                on_invalid(invalid(line_no, format!("invalid key '{key}'")))?;
                continue;
            }

            let raw = raw.trim();
            let value = match open_quote(raw) {
                Some(quote) => {
                    let mut value = raw[1..].to_string();
                    let mut closed = false;
                    while idx < lines.len() {
                        let next = lines[idx];
                        idx += 1;
                        value.push('\n');
                        if let Some(end) = next.find(quote) {
                            value.push_str(&next[..end]);
                            closed = true;
                            break;
                        }
                        value.push_str(next);
                    }
                    if !closed {
                        let message = format!("unterminated quoted value for '{key}'");
                        on_invalid(invalid(line_no, message))?;
                        continue;
                    }
                    value
                }
                None => strip_quotes(strip_trailing_comment(raw)),
            };

            match entries.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value,
                None => entries.push((key.to_string(), value)),
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Quote character of a value whose closing quote is on a later line.
fn open_quote(raw: &str) -> Option<char> {
    let quote = raw.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    (!raw[1..].contains(quote)).then_some(quote)
}

/// `'val#ue'  # note` keeps `'val#ue'`; a `#` inside quotes is literal.
fn strip_trailing_comment(s: &str) -> &str {
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for (i, b) in s.bytes().enumerate() {
        match b {
            b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
            b'"' if !in_single_quote => in_double_quote = !in_double_quote,
            // only a comment when preceded by whitespace (or at start)
            b'#' if !in_single_quote
                && !in_double_quote
                && (i == 0 || s.as_bytes()[i - 1].is_ascii_whitespace()) =>
            {
                return s[..i].trim_end();
            }
            _ => {}
        }
    }
    s
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if quoted {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(
        shellexpand::full(path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string()),
    )
}
