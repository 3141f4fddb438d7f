//! Plain-text tables and key/value views for service responses

use std::fmt::Write as _;

use colored::Colorize;
use serde_json::Value;

use crate::domain::{display_remote, time_since};

/// Column-aligned table with an optional title and header row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Table with upper-cased column headers.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_uppercase()).collect(),
            ..Self::default()
        }
    }

    /// Table without a header row.
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        (0..columns)
            .map(|i| {
                self.rows
                    .iter()
                    .chain(std::iter::once(&self.headers))
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render the table. Padding is computed before colouring.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        if let Some(title) = &self.title {
            let _ = writeln!(out, "{}", title.bold());
        }
        if !self.headers.is_empty() {
            let header = join_padded(&self.headers, &widths);
            let _ = writeln!(out, " {}", header.blue().bold());
            let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
            let _ = writeln!(out, " {}", "─".repeat(rule_len).blue());
        }
        for row in &self.rows {
            let _ = writeln!(out, " {}", join_padded(row, &widths));
        }
        out
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render one table cell.
///
/// Missing or empty values show as `-`, `*_at` fields as relative time,
/// and GitHub SSH remotes without their `git@github.com:` prefix.
pub fn cell(field: &str, value: Option<&str>) -> String {
    match value {
        None | Some("") => "-".to_string(),
        Some(v) if field.ends_with("_at") => time_since(v).unwrap_or_else(|_| v.to_string()),
        Some(v) => display_remote(v).to_string(),
    }
}

/// Render a JSON object as an aligned key/value view, last field first.
pub fn render_kv(value: &Value) -> String {
    let Some(map) = value.as_object() else {
        return format!("{value}\n");
    };

    let width = map.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, v) in map.iter().rev() {
        let label = format!("{:<width$}", key.to_uppercase());
        let _ = writeln!(out, " {}  {}", label.cyan(), kv_value(key, v));
    }
    out
}

fn kv_value(key: &str, value: &Value) -> String {
    match (key, value) {
        ("git_key", Value::Null) => "NO KEY ASSIGNED".red().to_string(),
        ("git_key", v) => v
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .green()
            .to_string(),
        ("token", v) => scalar(v).yellow().to_string(),
        ("projects", Value::Array(projects)) => {
            let names: Vec<&str> = projects
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .collect();
            if names.is_empty() {
                "-".to_string()
            } else {
                names.join(", ")
            }
        }
        (_, v) => scalar(v).white().to_string(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn given_rows_when_rendering_then_columns_align() {
        plain();
        let mut t = Table::new(&["Name", "Branch"]);
        t.add_row(["web", "main"]);
        t.add_row(["api-gateway", "-"]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " NAME         BRANCH");
        assert_eq!(lines[2], " web          main");
        assert_eq!(lines[3], " api-gateway  -");
    }

    #[test]
    fn given_headless_table_when_rendering_then_no_header_rule() {
        plain();
        let mut t = Table::headless();
        t.add_row(["line one"]);
        assert_eq!(t.render(), " line one\n");
    }

    #[test]
    fn given_missing_value_when_rendering_cell_then_dash() {
        assert_eq!(cell("branch", None), "-");
        assert_eq!(cell("branch", Some("")), "-");
    }

    #[test]
    fn given_github_remote_when_rendering_cell_then_prefix_stripped() {
        assert_eq!(cell("remote", Some("git@github.com:acme/web.git")), "acme/web.git");
    }

    #[test]
    fn given_timestamp_field_when_rendering_cell_then_relative() {
        let rendered = cell("updated_at", Some("2000-01-01T00:00:00"));
        assert!(rendered.ends_with("years ago"), "{rendered}");
    }

    #[test]
    fn given_object_when_rendering_kv_then_reverse_order_and_special_fields() {
        plain();
        let value = json!({
            "name": "web",
            "git_key": null,
            "projects": [{"name": "a"}, {"name": "b"}],
        });
        let out = render_kv(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " PROJECTS  a, b");
        assert_eq!(lines[1], " GIT_KEY   NO KEY ASSIGNED");
        assert_eq!(lines[2], " NAME      web");
    }
}
