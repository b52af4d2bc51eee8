// M7350 HTTP client
//
// Wraps `reqwest::Client` with the device's request envelope, session token
// handling, result-code interpretation, and paged list retrieval. Endpoint
// groups (auth, messages, settings, system) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use url::Url;

use crate::codes::{AuthResult, AuthenticatorAction, Module, ModuleAction, WebResult};
use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// Page size the firmware uses for `messageList` and `logList`.
pub const PAGE_SIZE: u64 = 8;

/// Default modem address on a factory-reset device.
pub const DEFAULT_URL: &str = "http://192.168.0.1";

/// How `send_message` waits for the modem to finish transmitting.
#[derive(Debug, Clone, Copy)]
pub struct SendPoll {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for SendPoll {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Everything needed to talk to one modem.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Modem base URL, e.g. `http://192.168.0.1`.
    pub url: Url,
    /// Admin password. Only its salted digest ever leaves the process.
    pub password: SecretString,
    pub transport: TransportConfig,
    pub send_poll: SendPoll,
}

impl ClientConfig {
    pub fn new(url: Url, password: SecretString) -> Self {
        Self {
            url,
            password,
            transport: TransportConfig::default(),
            send_poll: SendPoll::default(),
        }
    }
}

/// An authenticated session on the device.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    authed_ip: Option<String>,
}

impl Session {
    pub(crate) fn new(token: String, authed_ip: Option<String>) -> Self {
        Self {
            token: SecretString::from(token),
            authed_ip,
        }
    }

    /// Token echoed in every request.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Client address the device bound the session to.
    pub fn authed_ip(&self) -> Option<&str> {
        self.authed_ip.as_deref()
    }
}

/// Client for the M7350 web gateway.
///
/// Holds at most one session. Calls that need a session log in lazily;
/// a `KickedOut` or `TokenError` reply drops the session so the next call
/// logs in again. Nothing is retried automatically.
pub struct M7350Client {
    http: reqwest::Client,
    base_url: Url,
    auth_url: Url,
    web_url: Url,
    password: RwLock<SecretString>,
    session: RwLock<Option<Session>>,
    send_poll: SendPoll,
}

impl M7350Client {
    /// Create a client from a [`ClientConfig`].
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let mut client = Self::with_client(http, config.url, config.password)?;
        client.send_poll = config.send_poll;
        Ok(client)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        password: SecretString,
    ) -> Result<Self, Error> {
        let base = base_url.as_str().trim_end_matches('/');
        let auth_url = Url::parse(&format!("{base}/cgi-bin/auth_cgi"))?;
        let web_url = Url::parse(&format!("{base}/cgi-bin/web_cgi"))?;
        Ok(Self {
            http,
            base_url,
            auth_url,
            web_url,
            password: RwLock::new(password),
            session: RwLock::new(None),
            send_poll: SendPoll::default(),
        })
    }

    /// Override the send-status polling policy.
    pub fn with_send_poll(mut self, send_poll: SendPoll) -> Self {
        self.send_poll = send_poll;
        self
    }

    /// The modem base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn send_poll(&self) -> SendPoll {
        self.send_poll
    }

    // ── Session state ────────────────────────────────────────────────

    pub fn is_logged_in(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// A copy of the current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub(crate) fn set_password(&self, password: SecretString) {
        *self.password.write().unwrap_or_else(PoisonError::into_inner) = password;
    }

    /// Run `f` with the admin password exposed.
    pub(crate) fn with_password<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        let guard = self.password.read().unwrap_or_else(PoisonError::into_inner);
        f(guard.expose_secret())
    }

    /// Log in unless a session is already held.
    pub async fn ensure_session(&self) -> Result<(), Error> {
        if !self.is_logged_in() {
            self.login().await?;
        }
        Ok(())
    }

    // ── Request envelope ─────────────────────────────────────────────

    /// Build `{"module": .., "action": .., "token": ..}` for an action.
    ///
    /// The token is empty when no session is held, as the firmware expects
    /// during the login handshake.
    pub fn build_request(&self, action: impl ModuleAction) -> Map<String, Value> {
        let token = self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token().to_owned())
            .unwrap_or_default();

        let mut req = Map::new();
        req.insert("module".into(), Value::from(action.module().as_str()));
        req.insert("action".into(), Value::from(action.code()));
        req.insert("token".into(), Value::from(token));
        req
    }

    fn endpoint(&self, module: Module) -> Url {
        if module == Module::Authenticator {
            self.auth_url.clone()
        } else {
            self.web_url.clone()
        }
    }

    /// POST an envelope plus payload without touching session state.
    pub(crate) async fn post_action(
        &self,
        action: impl ModuleAction,
        payload: Map<String, Value>,
    ) -> Result<Value, Error> {
        // Envelope fields win over payload members of the same name.
        let mut body = payload;
        body.extend(self.build_request(action));

        debug!(
            module = action.module().as_str(),
            action = action.code(),
            "device request"
        );
        transport::post_data(&self.http, self.endpoint(action.module()), &Value::Object(body))
            .await
    }

    // ── Dispatcher ───────────────────────────────────────────────────

    /// Send an action with no payload and return the raw reply.
    pub async fn request(&self, action: impl ModuleAction) -> Result<Value, Error> {
        self.request_with(action, Map::new()).await
    }

    /// Send an action with payload members merged into the envelope.
    ///
    /// Logs in first when needed. Session errors reported by `web_cgi`
    /// drop the session and surface as [`Error::KickedOut`] or
    /// [`Error::TokenError`]; every other `result` is left to the caller.
    pub async fn request_with(
        &self,
        action: impl ModuleAction,
        payload: Map<String, Value>,
    ) -> Result<Value, Error> {
        self.ensure_session().await?;

        let reply = self.post_action(action, payload).await?;

        if action.module() != Module::Authenticator {
            if let Some(code) = result_of(&reply) {
                match WebResult::from_code(code) {
                    WebResult::KickedOut => {
                        warn!("session kicked out by device");
                        self.set_session(None);
                        return Err(Error::KickedOut);
                    }
                    WebResult::TokenError => {
                        warn!("session token rejected by device");
                        self.set_session(None);
                        return Err(Error::TokenError);
                    }
                    WebResult::Success | WebResult::Other(_) => {}
                }
            }
        }

        Ok(reply)
    }

    /// Send an action that must report `result == 0`.
    pub async fn execute(
        &self,
        action: impl ModuleAction,
        payload: Map<String, Value>,
    ) -> Result<Value, Error> {
        let reply = self.request_with(action, payload).await?;
        match result_of(&reply) {
            Some(0) => Ok(reply),
            Some(code) if action.module() == Module::Authenticator => Err(Error::AuthCgi {
                action: action.code(),
                code: AuthResult::from_code(code),
            }),
            Some(code) => Err(Error::Api {
                module: action.module(),
                action: action.code(),
                code,
            }),
            None => Err(Error::MissingField { field: "result" }),
        }
    }

    /// Call an authenticator action directly, outside the session logic.
    pub(crate) async fn auth_call(
        &self,
        action: AuthenticatorAction,
        payload: Map<String, Value>,
    ) -> Result<Value, Error> {
        self.post_action(action, payload).await
    }

    /// Collect a list the firmware pages eight entries at a time.
    ///
    /// The first reply's `totalNumber` bounds the walk; an empty page ends
    /// it early so a shrinking list cannot loop forever. A page reporting a
    /// non-zero `result` fails the whole read with [`Error::Api`].
    pub async fn fetch_paged(
        &self,
        action: impl ModuleAction,
        mut payload: Map<String, Value>,
        field: &'static str,
    ) -> Result<Vec<Value>, Error> {
        payload.insert("amountPerPage".into(), Value::from(PAGE_SIZE));

        let mut items = Vec::new();
        let mut first_total = None;
        let mut page: u64 = 1;

        loop {
            payload.insert("pageNumber".into(), Value::from(page));
            let mut reply = self.request_with(action, payload.clone()).await?;
            match result_of(&reply) {
                Some(0) | None => {}
                Some(code) => {
                    return Err(Error::Api {
                        module: action.module(),
                        action: action.code(),
                        code,
                    });
                }
            }

            let total = if let Some(total) = first_total {
                total
            } else {
                let count = reply
                    .get("totalNumber")
                    .and_then(as_count)
                    .ok_or(Error::MissingField {
                        field: "totalNumber",
                    })?;
                first_total = Some(count);
                count
            };

            let batch = match reply.get_mut(field) {
                Some(Value::Array(entries)) => std::mem::take(entries),
                _ => Vec::new(),
            };
            trace!(field, page, got = batch.len(), total, "page fetched");

            let empty = batch.is_empty();
            items.extend(batch);

            if empty || u64::try_from(items.len()).unwrap_or(u64::MAX) >= total {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

// ── Reply helpers ────────────────────────────────────────────────────

/// The integer `result` of a reply.
pub(crate) fn result_of(reply: &Value) -> Option<i64> {
    match reply.get("result")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A string field that is present and non-empty.
pub(crate) fn non_empty_str<'a>(reply: &'a Value, field: &str) -> Option<&'a str> {
    reply
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Counts arrive as numbers on most firmware builds and as strings on some.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Require a JSON object for payload merging.
pub(crate) fn into_payload(value: Value) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidPayload),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::codes::{ConfigAction, MessageAction};

    fn client() -> M7350Client {
        M7350Client::with_client(
            reqwest::Client::new(),
            Url::parse("http://192.168.0.1/").unwrap(),
            SecretString::from("admin".to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn endpoints_derive_from_base_url() {
        let client = client();
        assert_eq!(client.auth_url.as_str(), "http://192.168.0.1/cgi-bin/auth_cgi");
        assert_eq!(client.web_url.as_str(), "http://192.168.0.1/cgi-bin/web_cgi");
    }

    #[test]
    fn envelope_without_session_has_empty_token() {
        let client = client();
        let req = client.build_request(MessageAction::GetSendStatus);
        assert_eq!(
            Value::Object(req),
            json!({"module": "message", "action": 7, "token": ""})
        );
    }

    #[test]
    fn envelope_carries_session_token() {
        let client = client();
        client.set_session(Some(Session::new("tok".into(), None)));
        let req = client.build_request((Module::Wan, ConfigAction::Get));
        assert_eq!(req["token"], "tok");
        assert_eq!(req["module"], "wan");
        assert_eq!(req["action"], 0);
    }

    #[test]
    fn result_parsing() {
        assert_eq!(result_of(&json!({"result": -2})), Some(-2));
        assert_eq!(result_of(&json!({"result": "3"})), Some(3));
        assert_eq!(result_of(&json!({})), None);
        assert_eq!(non_empty_str(&json!({"nonce": ""}), "nonce"), None);
        assert_eq!(non_empty_str(&json!({"nonce": "x"}), "nonce"), Some("x"));
        assert_eq!(as_count(&json!("12")), Some(12));
    }

    #[test]
    fn payload_must_be_object() {
        assert!(into_payload(json!({"a": 1})).is_ok());
        assert!(matches!(into_payload(json!([1])), Err(Error::InvalidPayload)));
    }
}
