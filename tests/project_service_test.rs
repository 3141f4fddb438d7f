//! Tests for ProjectService: remotes, project CRUD, secrets and deployments

mod common;

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use ccd::application::services::DeployAction;
use ccd::application::ApplicationError;
use ccd::domain::{DomainError, ProjectChanges};
use ccd::infrastructure::traits::Method;
use common::{json_body, Harness};

fn git_checkout(origin: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    let git_dir = temp.path().join(".git");
    fs::create_dir_all(&git_dir).unwrap();
    let mut config = String::from("[core]\n\trepositoryformatversion = 0\n");
    if let Some(url) = origin {
        config.push_str(&format!(
            "[remote \"origin\"]\n\turl = {url}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n"
        ));
    }
    fs::write(git_dir.join("config"), config).unwrap();
    temp
}

// ============================================================
// Remote resolution
// ============================================================

#[test]
fn given_shorthand_with_branch_when_resolving_then_github_ssh_remote() {
    let h = Harness::simple();
    let resolved = h
        .container
        .projects
        .resolve_remote("acme/web@release", None)
        .unwrap();
    assert_eq!(resolved.remote, "git@github.com:acme/web.git");
    assert_eq!(resolved.branch.as_deref(), Some("release"));
}

#[test]
fn given_explicit_branch_when_resolving_shorthand_then_explicit_wins() {
    let h = Harness::simple();
    let resolved = h
        .container
        .projects
        .resolve_remote("acme/web@release", Some("main"))
        .unwrap();
    assert_eq!(resolved.branch.as_deref(), Some("main"));
}

#[test]
fn given_checkout_directory_when_resolving_then_uses_origin_url() {
    let checkout = git_checkout(Some("https://git.example.com/acme/web.git"));
    let h = Harness::simple();

    let resolved = h
        .container
        .projects
        .resolve_remote(checkout.path().to_str().unwrap(), Some("main"))
        .unwrap();

    assert_eq!(resolved.remote, "https://git.example.com/acme/web.git");
    assert_eq!(resolved.branch.as_deref(), Some("main"));
}

#[test]
fn given_checkout_without_origin_when_resolving_then_error() {
    let checkout = git_checkout(None);
    let h = Harness::simple();

    let err = h
        .container
        .projects
        .resolve_remote(checkout.path().to_str().unwrap(), None)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NoOriginRemote(_))
    ));
}

#[test]
fn given_empty_remote_when_resolving_then_missing_remote() {
    let h = Harness::simple();
    let err = h.container.projects.resolve_remote("  ", None).unwrap_err();
    assert!(matches!(err, ApplicationError::Domain(DomainError::MissingRemote)));
}

// ============================================================
// Project CRUD
// ============================================================

#[test]
fn given_filter_when_listing_then_sends_filter_by() {
    let h = Harness::simple();
    h.transport.respond(
        200,
        r#"[{"name": "web", "remote": "git@github.com:acme/web.git", "branch": "main", "updated_at": "2024-01-01T00:00:00"}]"#,
    );

    let projects = h.container.projects.list("we").unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].branch.as_deref(), Some("main"));
    assert_eq!(h.transport.calls(), vec!["GET http://cd.test/project?filter_by=we"]);
}

#[test]
fn given_project_without_key_when_creating_then_key_is_omitted() {
    let h = Harness::simple();
    h.transport.respond(200, r#"{"name": "web"}"#);

    let changes = ProjectChanges {
        name: Some("web".into()),
        remote: Some("git@github.com:acme/web.git".into()),
        branch: None,
        key: None,
    };
    h.container.projects.create(&changes).unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "http://cd.test/project");
    assert_eq!(
        json_body(&request),
        json!({"name": "web", "remote": "git@github.com:acme/web.git"})
    );
}

#[test]
fn given_only_branch_when_updating_then_puts_branch_only() {
    let h = Harness::simple();
    let changes = ProjectChanges {
        branch: Some("develop".into()),
        ..ProjectChanges::default()
    };

    h.container.projects.update("web", &changes).unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url.as_str(), "http://cd.test/project/web");
    assert_eq!(json_body(&request), json!({"branch": "develop"}));
}

#[test]
fn given_no_changes_when_updating_then_invalid_input_without_request() {
    let h = Harness::simple();
    let err = h
        .container
        .projects
        .update("web", &ProjectChanges::default())
        .unwrap_err();
    assert!(matches!(err, ApplicationError::InvalidInput(_)));
    assert!(h.transport.requests().is_empty());
}

// ============================================================
// Secrets
// ============================================================

#[test]
fn given_secret_when_setting_then_puts_key_and_value() {
    let h = Harness::simple();
    h.transport
        .respond(200, r#"{"key": "DATABASE_URL", "value": "postgres://db"}"#);

    let secret = h
        .container
        .projects
        .set_secret("web", "DATABASE_URL", "postgres://db")
        .unwrap();

    assert_eq!(secret.key, "DATABASE_URL");
    let request = h.transport.last();
    assert_eq!(request.url.as_str(), "http://cd.test/secret/web");
    assert_eq!(
        json_body(&request),
        json!({"key": "DATABASE_URL", "value": "postgres://db"})
    );
}

#[test]
fn given_secret_key_when_unsetting_then_deletes_path() {
    let h = Harness::simple();
    h.container.projects.unset_secret("web", "TOKEN").unwrap();
    assert_eq!(h.transport.calls(), vec!["DELETE http://cd.test/secret/web/TOKEN"]);
}

#[test]
fn given_dotenv_file_when_reading_then_entries_in_file_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("prod.env");
    fs::write(
        &path,
        "# production\nexport B=2\nA=\"quoted value\" # trailing\n\nC='x#y'\n",
    )
    .unwrap();
    let h = Harness::simple();

    let env = h.container.projects.read_env_file(&path).unwrap();

    assert_eq!(
        env.entries,
        vec![
            ("B".to_string(), "2".to_string()),
            ("A".to_string(), "quoted value".to_string()),
            ("C".to_string(), "x#y".to_string()),
        ]
    );
}

#[test]
fn given_missing_dotenv_file_when_reading_then_operation_failed_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.env");
    let h = Harness::simple();

    let err = h.container.projects.read_env_file(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("missing.env"));
}

// ============================================================
// Deployments
// ============================================================

#[test]
fn given_deploy_actions_when_deploying_then_hits_action_paths() {
    let h = Harness::simple();
    h.transport.respond(200, r#"{"detail": "started"}"#);
    h.transport.respond(200, r#"{"detail": "stopped"}"#);
    h.transport.respond(
        200,
        r#"{"ps": [{"Name": "web-1", "Image": "web:latest", "State": "running", "Status": "Up 2 hours"}], "logs": "a\nb"}"#,
    );

    let started = h.container.projects.deploy("web", DeployAction::Start).unwrap();
    let stopped = h.container.projects.deploy("web", DeployAction::Stop).unwrap();
    let status = h.container.projects.deploy("web", DeployAction::Status).unwrap();

    assert_eq!(started.detail.as_deref(), Some("started"));
    assert_eq!(stopped.detail.as_deref(), Some("stopped"));
    let ps = status.ps.as_ref().unwrap();
    assert_eq!(ps[0].state.as_deref(), Some("running"));
    assert_eq!(status.log_lines(), vec!["a", "b"]);
    assert_eq!(
        h.transport.calls(),
        vec![
            "GET http://cd.test/deploy/web/start",
            "GET http://cd.test/deploy/web/stop",
            "GET http://cd.test/deploy/web/status",
        ]
    );
}

#[test]
fn given_refreshed_token_when_building_webhook_then_uses_api_url() {
    let h = Harness::simple();
    h.transport.respond(200, r#"{"token": "abc123"}"#);

    let token = h.container.projects.refresh_token("web").unwrap();

    assert_eq!(token.token, "abc123");
    assert_eq!(
        h.transport.calls(),
        vec!["GET http://cd.test/project/web/refresh-token"]
    );
    assert_eq!(
        h.container.projects.webhook_url(&token.token),
        "http://cd.test/webhook/project/abc123"
    );
}
