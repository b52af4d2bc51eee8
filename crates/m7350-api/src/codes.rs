// Device API codes
//
// Module names, per-module action codes, and the numeric return codes the
// two CGI endpoints reply with. The firmware addresses every request by
// `(module, action)`; the action enums below carry the codes for each
// module so the dispatcher can stay generic over them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

// ── Modules ─────────────────────────────────────────────────────────

/// Device-side module a request is addressed to.
///
/// The string form is exactly what the firmware expects in the `module`
/// field. Parsing is case-insensitive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Module {
    Authenticator,
    WebServer,
    Status,
    Wan,
    SimLock,
    Message,
    Wlan,
    Wps,
    #[strum(serialize = "power_save")]
    PowerSave,
    #[strum(serialize = "flowstat")]
    FlowStat,
    ConnectedDevices,
    MacFilters,
    Lan,
    Update,
    StorageShare,
    Reboot,
    RestoreDefaults,
    Time,
    Log,
    ApBridge,
    Voice,
    Upnp,
    Dmz,
    Alg,
    VirtualServer,
    PortTrigger,
}

impl Module {
    /// Wire name of the module.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether the module answers the generic get/set configuration pair.
    pub fn is_configurable(self) -> bool {
        !matches!(
            self,
            Self::Authenticator | Self::Reboot | Self::RestoreDefaults | Self::Log
        )
    }

    /// Whether action 1 stores a configuration document.
    ///
    /// Some configurable modules reuse action 1 for something else:
    /// `voice` sends USSD, `simLock` enables the PIN and `update` checks
    /// for new firmware.
    pub fn is_settable(self) -> bool {
        matches!(
            self,
            Self::Message
                | Self::Wan
                | Self::Wps
                | Self::PowerSave
                | Self::FlowStat
                | Self::MacFilters
                | Self::Lan
                | Self::StorageShare
                | Self::Time
                | Self::Upnp
                | Self::Dmz
                | Self::Alg
                | Self::VirtualServer
                | Self::PortTrigger
                | Self::Wlan
                | Self::ApBridge
        )
    }
}

impl Serialize for Module {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Module {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Actions ─────────────────────────────────────────────────────────

/// A `(module, action)` pair the device can execute.
///
/// Implemented by every per-module action enum, and by
/// `(Module, ConfigAction)` for the generic get/set configuration pair.
pub trait ModuleAction: Copy + fmt::Debug {
    /// Module the action belongs to.
    fn module(self) -> Module;

    /// Numeric action code.
    fn code(self) -> u8;
}

macro_rules! module_action {
    ($action:ty => $module:expr) => {
        impl ModuleAction for $action {
            fn module(self) -> Module {
                $module
            }

            #[allow(clippy::as_conversions)]
            fn code(self) -> u8 {
                self as u8
            }
        }
    };
}

/// Generic configuration actions shared by most modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConfigAction {
    Get = 0,
    Set = 1,
}

impl ModuleAction for (Module, ConfigAction) {
    fn module(self) -> Module {
        self.0
    }

    #[allow(clippy::as_conversions)]
    fn code(self) -> u8 {
        self.1 as u8
    }
}

/// Authenticator module (served by `auth_cgi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AuthenticatorAction {
    /// Fetch the login nonce.
    Load = 0,
    Login = 1,
    /// Number of failed login attempts.
    GetAttempts = 2,
    Logout = 3,
    /// Change the admin password.
    Update = 4,
}
module_action!(AuthenticatorAction => Module::Authenticator);

/// Message (SMS) module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageAction {
    GetConfig = 0,
    SetConfig = 1,
    ReadMsg = 2,
    SendMsg = 3,
    SaveMsg = 4,
    DelMsg = 5,
    MarkRead = 6,
    GetSendStatus = 7,
}
module_action!(MessageAction => Module::Message);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlgAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(AlgAction => Module::Alg);

/// Access point bridge module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ApBridgeAction {
    GetConfig = 0,
    SetConfig = 1,
    ConnectAp = 2,
    ScanAp = 3,
    CheckConnectionStatus = 4,
}
module_action!(ApBridgeAction => Module::ApBridge);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectedDevicesAction {
    GetConfig = 0,
}
module_action!(ConnectedDevicesAction => Module::ConnectedDevices);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DmzAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(DmzAction => Module::Dmz);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlowStatAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(FlowStatAction => Module::FlowStat);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LanAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(LanAction => Module::Lan);

/// System log module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogAction {
    GetLog = 0,
    ClearLog = 1,
    SaveLog = 2,
    Refresh = 3,
    /// Read log settings.
    GetMdLog = 4,
    /// Write log settings.
    SetMdLog = 5,
}
module_action!(LogAction => Module::Log);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MacFiltersAction {
    GetBlackList = 0,
    SetBlackList = 1,
}
module_action!(MacFiltersAction => Module::MacFilters);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PortTriggeringAction {
    GetConfig = 0,
    SetConfig = 1,
    DeleteEntry = 2,
}
module_action!(PortTriggeringAction => Module::PortTrigger);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PowerSaveAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(PowerSaveAction => Module::PowerSave);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RebootAction {
    Reboot = 0,
    Shutdown = 1,
}
module_action!(RebootAction => Module::Reboot);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RestoreDefaultsAction {
    Restore = 0,
}
module_action!(RestoreDefaultsAction => Module::RestoreDefaults);

/// SIM lock module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SimLockAction {
    GetConfig = 0,
    EnablePin = 1,
    DisablePin = 2,
    UpdatePin = 3,
    UnlockPin = 4,
    UnlockPuk = 5,
    AutoUnlock = 6,
}
module_action!(SimLockAction => Module::SimLock);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StorageShareAction {
    GetConfig = 0,
    SetConfig = 1,
}
module_action!(StorageShareAction => Module::StorageShare);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimeAction {
    GetConfig = 0,
    SetConfig = 1,
    QueryTime = 2,
}
module_action!(TimeAction => Module::Time);

/// Firmware update module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UpdateAction {
    GetConfig = 0,
    CheckNew = 1,
    ServerUpdate = 2,
    PauseLoad = 3,
    RequestLoadPercentage = 4,
    CheckUploadResult = 5,
    StartUpgrade = 6,
    ClearCache = 7,
}
module_action!(UpdateAction => Module::Update);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UpnpAction {
    GetConfig = 0,
    SetConfig = 1,
    GetDeviceList = 2,
}
module_action!(UpnpAction => Module::Upnp);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VirtualServerAction {
    GetConfig = 0,
    SetConfig = 1,
    DeleteVirtualServer = 2,
}
module_action!(VirtualServerAction => Module::VirtualServer);

/// Voice module (USSD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VoiceAction {
    GetConfig = 0,
    SendUssd = 1,
    CancelUssd = 2,
    GetSendStatus = 3,
}
module_action!(VoiceAction => Module::Voice);

/// WAN module. Codes are not contiguous on this firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WanAction {
    GetConfig = 0,
    SetConfig = 1,
    AddProfile = 2,
    DeleteProfile = 3,
    SetNetworkSelectionMode = 8,
    QueryAvailableNetworks = 9,
    GetNetworkSelectionStatus = 10,
    GetDisconnectionReason = 11,
    CancelSearch = 14,
    UpdateIsp = 15,
}
module_action!(WanAction => Module::Wan);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WebServerAction {
    GetLanguage = 0,
    SetLanguage = 1,
    KeepAlive = 2,
    UnsetDefault = 3,
    GetModuleList = 4,
    GetFeatureList = 5,
}
module_action!(WebServerAction => Module::WebServer);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WlanAction {
    GetConfig = 0,
    SetConfig = 1,
    SetNoWlan = 2,
}
module_action!(WlanAction => Module::Wlan);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WpsAction {
    GetConfig = 0,
    SetConfig = 1,
    Start = 2,
    Cancel = 3,
}
module_action!(WpsAction => Module::Wps);

// ── Return codes ────────────────────────────────────────────────────

/// `result` values returned by `auth_cgi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthResult {
    Success,
    /// One or more parameters were incorrect (e.g. wrong password).
    NotMatch,
    Failure,
    Unknown(i64),
}

impl AuthResult {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NotMatch,
            2 => Self::Failure,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::NotMatch => 1,
            Self::Failure => 2,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::NotMatch => f.write_str("parameters do not match"),
            Self::Failure => f.write_str("failure"),
            Self::Unknown(code) => write!(f, "unknown result {code}"),
        }
    }
}

/// `result` values returned by `web_cgi` that concern the session.
///
/// Message actions reuse `result` for [`SendStatus`], so anything that is
/// not a session error is kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebResult {
    Success,
    /// The token was revoked, usually because another client logged in.
    KickedOut,
    /// The token does not match the one the device holds.
    TokenError,
    Other(i64),
}

impl WebResult {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Success,
            -2 => Self::KickedOut,
            -3 => Self::TokenError,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::KickedOut => -2,
            Self::TokenError => -3,
            Self::Other(code) => code,
        }
    }

    pub fn is_session_error(self) -> bool {
        matches!(self, Self::KickedOut | Self::TokenError)
    }
}

/// Outcome of an SMS send, as reported by `GetSendStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStatus {
    SendSuccessSaveSuccess,
    SendSuccessSaveFail,
    SendFailSaveSuccess,
    SendFailSaveFail,
    Sending,
    Unknown(i64),
}

impl SendStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::SendSuccessSaveSuccess,
            1 => Self::SendSuccessSaveFail,
            2 => Self::SendFailSaveSuccess,
            3 => Self::SendFailSaveFail,
            4 => Self::Sending,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::SendSuccessSaveSuccess => 0,
            Self::SendSuccessSaveFail => 1,
            Self::SendFailSaveSuccess => 2,
            Self::SendFailSaveFail => 3,
            Self::Sending => 4,
            Self::Unknown(code) => code,
        }
    }

    pub fn is_sent(self) -> bool {
        matches!(self, Self::SendSuccessSaveSuccess | Self::SendSuccessSaveFail)
    }

    pub fn is_saved(self) -> bool {
        matches!(self, Self::SendSuccessSaveSuccess | Self::SendFailSaveSuccess)
    }

    /// `false` while the modem is still transmitting.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Sending)
    }

    /// Treat anything short of "sent and saved" as an error.
    pub fn into_result(self) -> Result<(), crate::Error> {
        match self {
            Self::SendSuccessSaveSuccess => Ok(()),
            status => Err(crate::Error::SendFailed { status }),
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendSuccessSaveSuccess => f.write_str("sent, saved"),
            Self::SendSuccessSaveFail => f.write_str("sent, not saved"),
            Self::SendFailSaveSuccess => f.write_str("not sent, saved"),
            Self::SendFailSaveFail => f.write_str("not sent, not saved"),
            Self::Sending => f.write_str("sending"),
            Self::Unknown(code) => write!(f, "unknown status {code}"),
        }
    }
}

impl Serialize for SendStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ── Mailboxes ───────────────────────────────────────────────────────

/// SMS storage location on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum Mailbox {
    Inbox = 0,
    Outbox = 1,
}

impl Mailbox {
    #[allow(clippy::as_conversions)]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for Mailbox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// ── WLAN security ───────────────────────────────────────────────────

/// WLAN security modes as named by the `wlan` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
pub enum ApSecurity {
    #[strum(serialize = "noPassword")]
    NoPassword,
    #[strum(serialize = "wepSecurity")]
    Wep,
    #[strum(serialize = "wpaTkipSecurity")]
    WpaTkip,
    #[strum(serialize = "wpaAesSecurity")]
    WpaAes,
    #[strum(serialize = "wpa2TkipSecurity")]
    Wpa2Tkip,
    #[strum(serialize = "wpa2AesSecurity")]
    Wpa2Aes,
    #[strum(serialize = "wpaWpa2Security")]
    WpaWpa2,
    #[strum(serialize = "ieee8021XSecurity")]
    Ieee8021X,
    #[strum(serialize = "unknownSecurity")]
    Unknown,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn module_wire_names() {
        assert_eq!(Module::Authenticator.as_str(), "authenticator");
        assert_eq!(Module::WebServer.as_str(), "webServer");
        assert_eq!(Module::SimLock.as_str(), "simLock");
        assert_eq!(Module::PowerSave.as_str(), "power_save");
        assert_eq!(Module::FlowStat.as_str(), "flowstat");
        assert_eq!(Module::ConnectedDevices.as_str(), "connectedDevices");
        assert_eq!(Module::RestoreDefaults.as_str(), "restoreDefaults");
        assert_eq!(Module::Upnp.as_str(), "upnp");
        assert_eq!(Module::PortTrigger.as_str(), "portTrigger");
    }

    #[test]
    fn every_module_parses_back() {
        for module in Module::iter() {
            let parsed: Module = module.as_str().parse().unwrap();
            assert_eq!(parsed, module);
        }
        assert_eq!("WEBSERVER".parse::<Module>().unwrap(), Module::WebServer);
        assert!("bogus".parse::<Module>().is_err());
    }

    #[test]
    fn settable_modules_are_configurable() {
        for module in Module::iter().filter(|m| m.is_settable()) {
            assert!(module.is_configurable(), "{module} settable but not configurable");
        }
        assert!(Module::Lan.is_settable());
        assert!(!Module::Voice.is_settable());
        assert!(!Module::SimLock.is_settable());
        assert!(!Module::Update.is_settable());
        assert!(!Module::Status.is_settable());
    }

    #[test]
    fn action_codes() {
        assert_eq!(AuthenticatorAction::Load.code(), 0);
        assert_eq!(AuthenticatorAction::Update.code(), 4);
        assert_eq!(MessageAction::DelMsg.code(), 5);
        assert_eq!(MessageAction::GetSendStatus.code(), 7);
        assert_eq!(WanAction::CancelSearch.code(), 14);
        assert_eq!(WanAction::UpdateIsp.code(), 15);
        assert_eq!(RebootAction::Shutdown.module(), Module::Reboot);
        assert_eq!(PortTriggeringAction::DeleteEntry.module(), Module::PortTrigger);

        let pair = (Module::Lan, ConfigAction::Set);
        assert_eq!(pair.module(), Module::Lan);
        assert_eq!(pair.code(), 1);
    }

    #[test]
    fn unknown_result_codes_are_preserved() {
        assert_eq!(AuthResult::from_code(7), AuthResult::Unknown(7));
        assert_eq!(AuthResult::from_code(7).code(), 7);
        assert_eq!(WebResult::from_code(-2), WebResult::KickedOut);
        assert_eq!(WebResult::from_code(-3), WebResult::TokenError);
        assert_eq!(WebResult::from_code(4), WebResult::Other(4));
        assert!(WebResult::TokenError.is_session_error());
        assert!(!WebResult::Other(-1).is_session_error());
        assert_eq!(SendStatus::from_code(9).code(), 9);
    }

    #[test]
    fn send_status_flags() {
        assert!(SendStatus::SendSuccessSaveFail.is_sent());
        assert!(!SendStatus::SendSuccessSaveFail.is_saved());
        assert!(SendStatus::SendFailSaveSuccess.is_saved());
        assert!(!SendStatus::Sending.is_final());
        assert!(SendStatus::SendSuccessSaveSuccess.into_result().is_ok());
        assert!(SendStatus::SendFailSaveFail.into_result().is_err());
    }

    #[test]
    fn mailbox_codes_and_parsing() {
        assert_eq!(Mailbox::Inbox.code(), 0);
        assert_eq!(Mailbox::Outbox.code(), 1);
        assert_eq!("Outbox".parse::<Mailbox>().unwrap(), Mailbox::Outbox);
        assert_eq!(serde_json::to_value(Mailbox::Outbox).unwrap(), 1);
    }

    #[test]
    fn ap_security_strings() {
        assert_eq!(ApSecurity::Wpa2Aes.as_ref(), "wpa2AesSecurity");
        assert_eq!(
            "ieee8021XSecurity".parse::<ApSecurity>().unwrap(),
            ApSecurity::Ieee8021X
        );
    }
}
