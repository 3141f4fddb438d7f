//! Git remote resolution
//!
//! Remotes may be given as full git URLs, as GitHub `user/repo[@branch]`
//! shorthand, or as a local checkout whose `origin` is looked up.

use std::sync::OnceLock;

use regex::Regex;

const GITHUB_SSH_PREFIX: &str = "git@github.com:";

fn shorthand_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<user>[\w-]+)/(?P<repo>[\w-]+)(?:@(?P<branch>[\w./-]+))?$").unwrap()
    })
}

/// Remote URL plus the branch to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRemote {
    pub remote: String,
    pub branch: Option<String>,
}

/// Expand GitHub shorthand into an SSH remote.
///
/// `acme/web@release` becomes `git@github.com:acme/web.git` with branch
/// `release`. An explicit `branch` always wins over the shorthand's branch.
/// Anything that is not shorthand passes through unchanged.
pub fn parse_remote(remote: &str, branch: Option<&str>) -> ResolvedRemote {
    let branch = branch.map(str::to_string);
    match shorthand_regex().captures(remote) {
        Some(caps) => ResolvedRemote {
            remote: format!("{GITHUB_SSH_PREFIX}{}/{}.git", &caps["user"], &caps["repo"]),
            branch: branch.or_else(|| caps.name("branch").map(|m| m.as_str().to_string())),
        },
        None => ResolvedRemote {
            remote: remote.to_string(),
            branch,
        },
    }
}

/// Extract `[remote "origin"] url` from the content of a `.git/config` file.
pub fn origin_url_from_git_config(content: &str) -> Option<String> {
    let mut in_origin = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.starts_with('[') {
            in_origin = is_origin_section(trimmed);
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            if key.trim() == "url" {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

fn is_origin_section(header: &str) -> bool {
    let inner = header.trim_start_matches('[').trim_end_matches(']').trim();
    match inner.split_once(char::is_whitespace) {
        Some((section, name)) => {
            section.eq_ignore_ascii_case("remote") && name.trim().trim_matches('"') == "origin"
        }
        None => false,
    }
}

/// Shorten a remote for table display by dropping the GitHub SSH prefix.
pub fn display_remote(remote: &str) -> &str {
    remote.strip_prefix(GITHUB_SSH_PREFIX).unwrap_or(remote)
}
