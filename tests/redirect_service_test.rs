//! Tests for RedirectService and RemoteConfigService request shapes

mod common;

use serde_json::json;

use ccd::infrastructure::traits::Method;
use common::{json_body, Harness};

#[test]
fn given_redirect_when_creating_then_posts_source_and_destination() {
    let h = Harness::simple();

    h.container
        .redirects
        .create("old.example.com", "new.example.com")
        .unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "http://cd.test/redirect");
    assert_eq!(
        json_body(&request),
        json!({"source": "old.example.com", "destination": "new.example.com"})
    );
}

#[test]
fn given_redirect_when_updating_then_puts_destination_only() {
    let h = Harness::simple();

    h.container
        .redirects
        .update("old.example.com", "other.example.com")
        .unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url.as_str(), "http://cd.test/redirect/old.example.com");
    assert_eq!(json_body(&request), json!({"destination": "other.example.com"}));
}

#[test]
fn given_redirect_when_deleting_then_deletes_source_path() {
    let h = Harness::simple();
    h.container.redirects.delete("old.example.com").unwrap();
    assert_eq!(
        h.transport.calls(),
        vec!["DELETE http://cd.test/redirect/old.example.com"]
    );
}

#[test]
fn given_redirects_when_listing_then_decodes_rows() {
    let h = Harness::simple();
    h.transport.respond(
        200,
        r#"[{"source": "a.test", "destination": "b.test", "updated_at": null}]"#,
    );

    let redirects = h.container.redirects.list().unwrap();

    assert_eq!(redirects.len(), 1);
    assert_eq!(redirects[0].destination, "b.test");
    assert_eq!(redirects[0].updated_at, None);
}

#[test]
fn given_config_value_when_setting_then_puts_key_value() {
    let h = Harness::simple();

    h.container
        .config
        .set("DISCORD_WEBHOOK", "https://discord.test/hook")
        .unwrap();

    let request = h.transport.last();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url.as_str(), "http://cd.test/config");
    assert_eq!(
        json_body(&request),
        json!({"key": "DISCORD_WEBHOOK", "value": "https://discord.test/hook"})
    );
}

#[test]
fn given_config_key_when_unsetting_then_deletes_key_path() {
    let h = Harness::simple();
    h.container.config.unset("DISCORD_WEBHOOK").unwrap();
    assert_eq!(
        h.transport.calls(),
        vec!["DELETE http://cd.test/config/DISCORD_WEBHOOK"]
    );
}

#[test]
fn given_config_entries_when_listing_then_decodes_null_values() {
    let h = Harness::simple();
    h.transport.respond(
        200,
        r#"[{"key": "DISCORD_WEBHOOK", "value": null}, {"key": "OTHER", "value": "x"}]"#,
    );

    let entries = h.container.config.list().unwrap();

    assert_eq!(entries[0].value, None);
    assert_eq!(entries[1].value.as_deref(), Some("x"));
}
