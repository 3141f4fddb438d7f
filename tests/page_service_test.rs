//! Tests for PageService: page creation, redirects and archive upload

mod common;

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use ccd::application::ApplicationError;
use ccd::infrastructure::traits::{Body, Method};
use common::{json_body, Harness};

#[test]
fn given_cors_hosts_when_creating_page_then_hosts_are_comma_joined() {
    let h = Harness::simple();

    h.container
        .pages
        .create("www.example.com", &["a.test".into(), "b.test".into()])
        .unwrap();

    assert_eq!(
        json_body(&h.transport.last()),
        json!({"fqdn": "www.example.com", "cors_hosts": "a.test,b.test"})
    );
}

#[test]
fn given_no_cors_hosts_when_creating_page_then_null() {
    let h = Harness::simple();

    h.container.pages.create("www.example.com", &[]).unwrap();

    assert_eq!(
        json_body(&h.transport.last()),
        json!({"fqdn": "www.example.com", "cors_hosts": null})
    );
}

#[test]
fn given_source_when_adding_redirect_then_destination_is_page() {
    let h = Harness::simple();

    h.container
        .pages
        .add_redirect("www.example.com", "example.com")
        .unwrap();

    let request = h.transport.last();
    assert_eq!(request.url.as_str(), "http://cd.test/redirect");
    assert_eq!(
        json_body(&request),
        json!({"source": "example.com", "destination": "www.example.com"})
    );
}

#[test]
fn given_archive_when_deploying_then_uploads_raw_bytes() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("payload.tar");
    fs::write(&archive, b"tar bytes").unwrap();
    let h = Harness::simple();

    h.container.pages.deploy("www.example.com", &archive).unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "http://cd.test/upload/www.example.com");
    assert_eq!(request.body, Some(Body::Raw(b"tar bytes".to_vec())));
}

#[test]
fn given_directory_when_deploying_then_refused_without_request() {
    let temp = TempDir::new().unwrap();
    let h = Harness::simple();

    let err = h
        .container
        .pages
        .deploy("www.example.com", temp.path())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidInput(_)));
    assert!(err.to_string().contains("tar cvf"));
    assert!(h.transport.requests().is_empty());
}

#[test]
fn given_pages_when_listing_names_then_fqdns() {
    let h = Harness::simple();
    h.transport.respond(
        200,
        r#"[{"fqdn": "a.example.com"}, {"fqdn": "b.example.com", "cors_hosts": "x"}]"#,
    );

    assert_eq!(
        h.container.pages.names().unwrap(),
        vec!["a.example.com", "b.example.com"]
    );
}

#[test]
fn given_page_when_refreshing_token_then_returns_token() {
    let h = Harness::simple();
    h.transport.respond(200, r#"{"token": "t0k"}"#);

    let token = h.container.pages.refresh_token("www.example.com").unwrap();

    assert_eq!(token.token, "t0k");
    assert_eq!(
        h.transport.calls(),
        vec!["GET http://cd.test/page/www.example.com/refresh-token"]
    );
}

#[test]
fn given_fqdn_when_building_page_url_then_https() {
    let h = Harness::simple();
    assert_eq!(
        h.container.pages.page_url("www.example.com"),
        "https://www.example.com/"
    );
}
