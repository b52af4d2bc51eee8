#![allow(clippy::unwrap_used)]
// Integration tests for `M7350Client` against a wiremock device.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use m7350_api::{Error, M7350Client, Mailbox, Module, SendPoll, SendStatus, login_digest};

const AUTH_PATH: &str = "/cgi-bin/auth_cgi";
const WEB_PATH: &str = "/cgi-bin/web_cgi";
const NONCE: &str = "8f1d3c";
const TOKEN: &str = "tok-42";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, M7350Client) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = M7350Client::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("admin".to_owned()),
    )
    .unwrap()
    .with_send_poll(SendPoll {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    });
    (server, client)
}

fn reply(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_nonce(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({"module": "authenticator", "action": 0})))
        .respond_with(reply(json!({"nonce": NONCE, "result": 0})))
        .mount(server)
        .await;
}

/// Nonce plus a login that only succeeds with the expected digest.
async fn mount_login(server: &MockServer) {
    mount_nonce(server).await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({
            "module": "authenticator",
            "action": 1,
            "digest": login_digest("admin", NONCE),
        })))
        .respond_with(reply(json!({
            "token": TOKEN,
            "authedIP": "192.168.0.100",
            "result": 0
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn web_call(module: &str, action: u8) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(WEB_PATH))
        .and(body_partial_json(json!({
            "module": module,
            "action": action,
            "token": TOKEN,
        })))
}

fn inbox_page(range: std::ops::Range<u32>) -> Vec<Value> {
    range
        .map(|i| {
            json!({
                "index": i,
                "from": "+15550100",
                "content": format!("message {i}"),
                "receivedTime": "2024-03-01 08:00:00",
                "unread": i % 2 == 0
            })
        })
        .collect()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_salted_digest() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    client.login().await.unwrap();

    let session = client.session().unwrap();
    assert_eq!(session.token(), TOKEN);
    assert_eq!(session.authed_ip(), Some("192.168.0.100"));
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_login_without_nonce() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(reply(json!({"result": 0})))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_rejected_wrong_password() {
    let (server, client) = setup().await;
    mount_nonce(&server).await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({"module": "authenticator", "action": 1})))
        .respond_with(reply(json!({"result": 1})))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(
            result,
            Err(Error::LoginRejected {
                code: m7350_api::AuthResult::NotMatch
            })
        ),
        "expected LoginRejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Http { status: 500, .. })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({
            "module": "authenticator",
            "action": 3,
            "token": TOKEN
        })))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    client.logout().await.unwrap();
    assert!(!client.is_logged_in());

    // Second logout has nothing to end.
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_change_password_drops_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({
            "module": "authenticator",
            "action": 4,
            "password": "admin",
            "newPassword": "s3cret"
        })))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .change_password(
            &SecretString::from("admin".to_owned()),
            &SecretString::from("s3cret".to_owned()),
        )
        .await
        .unwrap();
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_attempts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_partial_json(json!({"module": "authenticator", "action": 2})))
        .respond_with(reply(json!({
            "attempt": 1,
            "remainingAttempts": 9,
            "remainingTime": 0,
            "result": 0
        })))
        .mount(&server)
        .await;

    let attempts = client.login_attempts().await.unwrap();
    assert_eq!(attempts.attempt, Some(1));
    assert_eq!(attempts.remaining_attempts, Some(9));
    assert!(!client.is_logged_in());
}

// ── Session handling tests ──────────────────────────────────────────

#[tokio::test]
async fn test_first_call_logs_in_lazily() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("status", 0)
        .respond_with(reply(json!({
            "result": 0,
            "battery": {"voltage": 80},
            "wan": {"networkType": 3}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert_eq!(status["battery"]["voltage"], 80);

    // Session is reused; `mount_login` expects exactly one login.
    client.status().await.unwrap();
}

#[tokio::test]
async fn test_kicked_out_drops_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("wan", 0)
        .respond_with(reply(json!({"result": -2})))
        .mount(&server)
        .await;

    let result = client.wan_settings().await;
    assert!(
        matches!(result, Err(Error::KickedOut)),
        "expected KickedOut, got: {result:?}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_token_error_drops_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("lan", 0)
        .respond_with(reply(json!({"result": -3})))
        .mount(&server)
        .await;

    let err = client.lan_settings().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(matches!(err, Error::TokenError));
    assert!(!client.is_logged_in());
}

// ── Message tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_read_messages_walks_pages() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 2)
        .and(body_partial_json(json!({
            "box": 0,
            "amountPerPage": 8,
            "pageNumber": 1
        })))
        .respond_with(reply(json!({
            "result": 0,
            "totalNumber": 10,
            "messageList": inbox_page(0..8)
        })))
        .expect(1)
        .mount(&server)
        .await;

    web_call("message", 2)
        .and(body_partial_json(json!({"box": 0, "pageNumber": 2})))
        .respond_with(reply(json!({
            "result": 0,
            "totalNumber": 10,
            "messageList": inbox_page(8..10)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client.read_messages(Mailbox::Inbox).await.unwrap();
    assert_eq!(messages.len(), 10);
    assert_eq!(messages[9].index, 9);
    assert_eq!(messages[9].content, "message 9");
    assert!(messages[0].unread);
    assert_eq!(messages[0].mailbox(), Mailbox::Inbox);
}

#[tokio::test]
async fn test_read_messages_stops_on_empty_page() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 2)
        .and(body_partial_json(json!({"box": 1, "pageNumber": 1})))
        .respond_with(reply(json!({
            "result": 0,
            "totalNumber": 20,
            "messageList": [{"index": 0, "to": "555", "content": "hi"}]
        })))
        .mount(&server)
        .await;

    web_call("message", 2)
        .and(body_partial_json(json!({"box": 1, "pageNumber": 2})))
        .respond_with(reply(json!({"result": 0, "totalNumber": 20, "messageList": []})))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client.read_messages(Mailbox::Outbox).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].peer(), "555");
}

#[tokio::test]
async fn test_read_messages_missing_total() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 2)
        .respond_with(reply(json!({"result": 0, "messageList": []})))
        .mount(&server)
        .await;

    let result = client.read_messages(Mailbox::Inbox).await;
    assert!(
        matches!(
            result,
            Err(Error::MissingField {
                field: "totalNumber"
            })
        ),
        "expected MissingField, got: {result:?}"
    );
}

#[tokio::test]
async fn test_read_messages_error_result_keeps_code() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 2)
        .respond_with(reply(json!({"result": -5})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.read_messages(Mailbox::Inbox).await.unwrap_err();
    assert!(
        matches!(
            err,
            Error::Api {
                module: Module::Message,
                action: 2,
                code: -5
            }
        ),
        "expected Api error, got: {err:?}"
    );
    assert_eq!(err.result_code(), Some(-5));
}

#[tokio::test]
async fn test_send_message_polls_until_done() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 3)
        .and(body_partial_json(json!({
            "sendMessage": {"to": "+15550100", "textContent": "ping"}
        })))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    web_call("message", 7)
        .respond_with(reply(json!({"result": 4})))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    web_call("message", 7)
        .respond_with(reply(json!({"result": 0})))
        .mount(&server)
        .await;

    let status = client.send_message("+15550100", "ping").await.unwrap();
    assert_eq!(status, SendStatus::SendSuccessSaveSuccess);
    assert!(status.into_result().is_ok());
}

#[tokio::test]
async fn test_send_message_reports_failure_status() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 3)
        .respond_with(reply(json!({"result": 0})))
        .mount(&server)
        .await;
    web_call("message", 7)
        .respond_with(reply(json!({"result": 2})))
        .mount(&server)
        .await;

    let status = client.send_message("123", "x").await.unwrap();
    assert_eq!(status, SendStatus::SendFailSaveSuccess);
    assert!(matches!(
        status.into_result(),
        Err(Error::SendFailed {
            status: SendStatus::SendFailSaveSuccess
        })
    ));
}

#[tokio::test]
async fn test_send_message_times_out() {
    let (server, client) = setup().await;
    mount_login(&server).await;
    let client = client.with_send_poll(SendPoll {
        interval: Duration::from_millis(10),
        timeout: Duration::from_millis(50),
    });

    web_call("message", 3)
        .respond_with(reply(json!({"result": 0})))
        .mount(&server)
        .await;
    web_call("message", 7)
        .respond_with(reply(json!({"result": 4})))
        .mount(&server)
        .await;

    let result = client.send_message("123", "stuck").await;
    assert!(
        matches!(result, Err(Error::SendTimeout { .. })),
        "expected SendTimeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_send_message_rejected_skips_status_poll() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 3)
        .respond_with(reply(json!({"result": -1})))
        .expect(1)
        .mount(&server)
        .await;
    // A stale status from an earlier send must not be reported.
    web_call("message", 7)
        .respond_with(reply(json!({"result": 0})))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.send_message("123", "refused").await;
    assert!(
        matches!(
            result,
            Err(Error::Api {
                module: Module::Message,
                action: 3,
                code: -1
            })
        ),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_save_message() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 4)
        .and(body_partial_json(json!({
            "saveMessage": {"to": "777", "textContent": "draft"}
        })))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client.save_message("777", "draft").await.unwrap();
}

#[tokio::test]
async fn test_delete_messages() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 5)
        .and(body_partial_json(json!({"box": 1, "deleteMessages": [1, 3]})))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_messages(Mailbox::Outbox, &[1, 3])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_messages_rejected() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 5)
        .respond_with(reply(json!({"result": 1})))
        .mount(&server)
        .await;

    let result = client.delete_messages(Mailbox::Inbox, &[0]).await;
    assert!(
        matches!(
            result,
            Err(Error::Api {
                module: Module::Message,
                action: 5,
                code: 1
            })
        ),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_nothing_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(reply(json!({"result": 0})))
        .expect(0)
        .mount(&server)
        .await;

    client.delete_messages(Mailbox::Inbox, &[]).await.unwrap();
}

#[tokio::test]
async fn test_mark_read() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("message", 6)
        .and(body_partial_json(json!({"box": 0, "markReadMessage": [2]})))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client.mark_read(Mailbox::Inbox, &[2]).await.unwrap();
}

// ── Settings tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_config_any_module() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("power_save", 0)
        .respond_with(reply(json!({"result": 0, "enable": true, "time": 10})))
        .mount(&server)
        .await;

    let config = client.get_config(Module::PowerSave).await.unwrap();
    assert_eq!(config["time"], 10);
}

#[tokio::test]
async fn test_set_config_merges_payload() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("lan", 1)
        .and(body_partial_json(json!({"ipAddress": "192.168.1.1"})))
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_lan_settings(json!({"ipAddress": "192.168.1.1"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_set_config_rejects_non_object() {
    let (_server, client) = setup().await;

    let result = client.set_config(Module::Dmz, json!([1, 2])).await;
    assert!(matches!(result, Err(Error::InvalidPayload)));
}

#[tokio::test]
async fn test_set_config_device_error() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("upnp", 1)
        .respond_with(reply(json!({"result": 3})))
        .mount(&server)
        .await;

    let err = client
        .set_upnp_settings(json!({"enable": false}))
        .await
        .unwrap_err();
    assert_eq!(err.result_code(), Some(3));
}

#[tokio::test]
async fn test_scan_ap() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("apBridge", 3)
        .respond_with(reply(json!({"result": 0, "apList": [{"ssid": "cafe"}]})))
        .mount(&server)
        .await;

    let scan = client.scan_ap().await.unwrap();
    assert_eq!(scan["apList"][0]["ssid"], "cafe");
}

// ── System tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_reboot_failure_code() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("reboot", 0)
        .respond_with(reply(json!({"result": -1})))
        .mount(&server)
        .await;

    let result = client.reboot().await;
    assert!(
        matches!(
            result,
            Err(Error::Api {
                module: Module::Reboot,
                code: -1,
                ..
            })
        ),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_shutdown_drops_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("reboot", 1)
        .respond_with(reply(json!({"result": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client.shutdown().await.unwrap();
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_read_log() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("log", 0)
        .and(body_partial_json(json!({
            "type": 0,
            "level": 0,
            "pageNumber": 1
        })))
        .respond_with(reply(json!({
            "result": 0,
            "totalNumber": 2,
            "logList": [
                {"time": "2024-03-01 08:00:00", "content": "wan up"},
                {"time": "2024-03-01 08:00:05", "content": "sms received"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let log = client.read_log().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1]["content"], "sms received");
}

#[tokio::test]
async fn test_invalid_json_reply() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    web_call("log", 1)
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.clear_log().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
