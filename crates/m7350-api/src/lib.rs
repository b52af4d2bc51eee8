// m7350-api: Async Rust client for the TP-Link M7350 web gateway
//
// The device exposes two CGI endpoints that both speak JSON over POST:
// `auth_cgi` for the authenticator module and `web_cgi` for everything
// else. Requests are addressed by a module name and a numeric action code;
// replies carry an integer `result` whose meaning depends on the endpoint.

pub mod auth;
pub mod client;
pub mod codes;
pub mod digest;
pub mod error;
pub mod messages;
pub mod models;
pub mod settings;
pub mod system;
pub mod transport;

pub use client::{ClientConfig, M7350Client, SendPoll, Session};
pub use codes::{
    AlgAction, ApBridgeAction, ApSecurity, AuthResult, AuthenticatorAction, ConfigAction,
    ConnectedDevicesAction, DmzAction, FlowStatAction, LanAction, LogAction, MacFiltersAction,
    Mailbox, MessageAction, Module, ModuleAction, PortTriggeringAction, PowerSaveAction,
    RebootAction, RestoreDefaultsAction, SendStatus, SimLockAction, StorageShareAction,
    TimeAction, UpdateAction, UpnpAction, VirtualServerAction, VoiceAction, WanAction,
    WebResult, WebServerAction, WlanAction, WpsAction,
};
pub use digest::{get_md5_hash, hexdigest, login_digest};
pub use error::Error;
pub use models::{LoginAttempts, SmsMessage};
pub use transport::{TlsMode, TransportConfig};
