//! CLI error types with miette diagnostics.
//!
//! Maps `m7350_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use m7350_api::Error as ApiError;
use m7350_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the router at {url}")]
    #[diagnostic(
        code(m7350::connection_failed),
        help(
            "Check that you are on the router's network and the URL is right.\n\
             URL: {url}\n\
             Try: m7350 auth check --url http://192.168.0.1"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(m7350::tls_error),
        help(
            "Use --insecure (-k) to accept a self-signed certificate,\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {reason}")]
    #[diagnostic(
        code(m7350::auth_failed),
        help(
            "Verify the admin password.\n\
             Run: m7350 config set-password"
        )
    )]
    AuthFailed { reason: String },

    #[error("Session ended by the router: {reason}")]
    #[diagnostic(
        code(m7350::session_lost),
        help("Another client probably logged in to the web UI. Run the command again.")
    )]
    SessionLost { reason: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(m7350::no_credentials),
        help(
            "Configure a password with: m7350 config set-password\n\
             Or set the M7350_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(m7350::rejected),
        help("The router refused the request (result {code}).")
    )]
    Rejected { message: String, code: i64 },

    #[error("Message was not sent: {status}")]
    #[diagnostic(
        code(m7350::send_failed),
        help("Check the SIM balance and signal, then see: m7350 sms list --box outbox")
    )]
    SendFailed { status: String },

    #[error("Unexpected reply from the router: {message}")]
    #[diagnostic(code(m7350::unexpected_reply))]
    UnexpectedReply { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(m7350::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(m7350::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: m7350 config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(m7350::no_config),
        help(
            "Create one with: m7350 config init\n\
             Or pass --url and --password.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(m7350::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(m7350::keyring),
        help("Store the password in the config file or M7350_PASSWORD instead.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(m7350::prompt),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    Prompt { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out after {seconds}s")]
    #[diagnostic(
        code(m7350::timeout),
        help("Increase the limit with --timeout, or send_timeout_secs for SMS sends.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(m7350::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionLost { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Rejected { .. } | Self::SendFailed { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Prompt { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the router URL and request timeout, which the library
    /// error does not carry.
    pub fn with_context(self, url: &str, timeout_secs: u64) -> Self {
        match self {
            Self::ConnectionFailed { source, .. } => Self::ConnectionFailed {
                url: url.to_owned(),
                source,
            },
            Self::Timeout { seconds: 0 } => Self::Timeout {
                seconds: timeout_secs,
            },
            other => other,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { message } => CliError::AuthFailed { reason: message },
            ApiError::LoginRejected { code } => CliError::AuthFailed {
                reason: format!("login rejected ({code})"),
            },
            ApiError::KickedOut | ApiError::TokenError => CliError::SessionLost {
                reason: err.to_string(),
            },

            ApiError::AuthCgi { code, .. } => CliError::Rejected {
                message: err.to_string(),
                code: code.code(),
            },
            ApiError::Api { code, .. } => CliError::Rejected {
                message: err.to_string(),
                code,
            },
            ApiError::SendFailed { status } => CliError::SendFailed {
                status: status.to_string(),
            },
            ApiError::SendTimeout { waited_secs } => CliError::Timeout {
                seconds: waited_secs,
            },

            ApiError::Http { status, .. } => CliError::Rejected {
                message: err.to_string(),
                code: i64::from(status),
            },
            ApiError::MissingField { .. }
            | ApiError::InvalidPayload
            | ApiError::Deserialization { .. } => CliError::UnexpectedReply {
                message: err.to_string(),
            },
            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(message) => CliError::TlsError { message },

            ApiError::Transport(ref e) if e.is_timeout() => CliError::Timeout { seconds: 0 },
            ApiError::Transport(_) => CliError::ConnectionFailed {
                url: "(unknown)".into(),
                source: err,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use m7350_api::{AuthResult, Module, SendStatus};

    use super::*;

    #[test]
    fn device_errors_map_to_exit_codes() {
        let rejected = CliError::from(ApiError::Api {
            module: Module::Reboot,
            action: 0,
            code: -1,
        });
        assert_eq!(rejected.exit_code(), exit_code::REJECTED);

        let auth = CliError::from(ApiError::LoginRejected {
            code: AuthResult::NotMatch,
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let kicked = CliError::from(ApiError::KickedOut);
        assert_eq!(kicked.exit_code(), exit_code::AUTH);

        let send = CliError::from(ApiError::SendFailed {
            status: SendStatus::SendFailSaveFail,
        });
        assert_eq!(send.exit_code(), exit_code::REJECTED);

        let timeout = CliError::from(ApiError::SendTimeout { waited_secs: 60 });
        assert!(matches!(timeout, CliError::Timeout { seconds: 60 }));
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn config_errors_map() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(ConfigError::Validation {
            field: "url".into(),
            reason: "bad".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
