use thiserror::Error;

use crate::codes::{AuthResult, Module, SendStatus};

/// Top-level error type for the `m7350-api` crate.
///
/// Covers every failure mode of a device call: the login handshake,
/// session invalidation, device-reported result codes, transport, and
/// malformed replies. Numeric device codes are kept so callers can surface
/// them verbatim.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The handshake could not complete (no nonce, empty reply, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The device refused the login digest.
    #[error("Login rejected by device: {code}")]
    LoginRejected { code: AuthResult },

    /// An authenticator call other than login reported a failure.
    #[error("Authenticator action {action} failed: {code}")]
    AuthCgi { action: u8, code: AuthResult },

    /// The session token was revoked (another client logged in).
    #[error("Session kicked out by device -- log in again")]
    KickedOut,

    /// The device does not recognise the session token.
    #[error("Session token rejected by device")]
    TokenError,

    // ── Device results ──────────────────────────────────────────────
    /// The device answered with a non-zero `result`.
    #[error("Device error in module '{module}' action {action}: result {code}")]
    Api {
        module: Module,
        action: u8,
        code: i64,
    },

    /// An SMS send finished in any state other than "sent and saved".
    #[error("Message send failed: {status}")]
    SendFailed { status: SendStatus },

    /// The device kept reporting "sending" past the configured limit.
    #[error("Message still sending after {waited_secs}s")]
    SendTimeout { waited_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// A reply lacked a field the operation depends on.
    #[error("Device reply is missing '{field}'")]
    MissingField { field: &'static str },

    /// Configuration payloads must be JSON objects.
    #[error("Payload must be a JSON object")]
    InvalidPayload,

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The web server answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Returns `true` if the session is gone and logging in again
    /// might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::KickedOut | Self::TokenError)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::SendTimeout { .. } => true,
            _ => false,
        }
    }

    /// The numeric code reported by the device, if there is one.
    pub fn result_code(&self) -> Option<i64> {
        match self {
            Self::LoginRejected { code } | Self::AuthCgi { code, .. } => Some(code.code()),
            Self::KickedOut => Some(-2),
            Self::TokenError => Some(-3),
            Self::Api { code, .. } => Some(*code),
            Self::SendFailed { status } => Some(status.code()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_are_auth_expired() {
        assert!(Error::KickedOut.is_auth_expired());
        assert!(Error::TokenError.is_auth_expired());
        assert!(
            !Error::LoginRejected {
                code: AuthResult::NotMatch
            }
            .is_auth_expired()
        );
    }

    #[test]
    fn result_codes_surface() {
        let err = Error::Api {
            module: Module::Reboot,
            action: 0,
            code: -1,
        };
        assert_eq!(err.result_code(), Some(-1));
        assert_eq!(Error::KickedOut.result_code(), Some(-2));
        assert_eq!(
            Error::SendFailed {
                status: SendStatus::SendFailSaveSuccess
            }
            .result_code(),
            Some(2)
        );
        assert_eq!(Error::InvalidPayload.result_code(), None);
    }

    #[test]
    fn display_names_module() {
        let err = Error::Api {
            module: Module::PortTrigger,
            action: 2,
            code: 5,
        };
        assert_eq!(
            err.to_string(),
            "Device error in module 'portTrigger' action 2: result 5"
        );
    }
}
