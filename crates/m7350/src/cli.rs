//! Clap derive structures for the `m7350` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man page generation, so it may only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// m7350 -- command-line access to TP-Link M7350 mobile routers
#[derive(Debug, Parser)]
#[command(
    name = "m7350",
    version,
    about = "Manage a TP-Link M7350 mobile router from the command line",
    long_about = "Talks to the router's web gateway (auth_cgi / web_cgi) the same way the\n\
        built-in web UI does: read and send SMS, inspect and change module\n\
        settings, read the system log, and reboot or reset the device.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "M7350_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router URL (overrides profile)
    #[arg(long, short = 'u', env = "M7350_URL", global = true)]
    pub url: Option<String>,

    /// Admin password
    #[arg(long, env = "M7350_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "M7350_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (HTTPS setups only)
    #[arg(long, short = 'k', env = "M7350_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: profile, then config defaults (30)]
    #[arg(long, env = "M7350_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// SMS mailbox selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MailboxArg {
    /// Received messages
    Inbox,
    /// Sent and saved messages
    Outbox,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Session and admin password
    Auth(AuthArgs),

    /// Read, send, and manage SMS messages
    #[command(alias = "msg")]
    Sms(SmsArgs),

    /// Read and write module settings
    Settings(SettingsArgs),

    /// Show the device status overview
    Status,

    /// Read or clear the system log
    Log(LogArgs),

    /// Reboot, shut down, or factory-reset the device
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and report the session details
    Check,

    /// Show failed login attempts recorded by the device
    Attempts,

    /// Take over the device's web session and end it
    Logout,

    /// Change the admin password
    ChangePassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SmsArgs {
    #[command(subcommand)]
    pub command: SmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SmsCommand {
    /// List messages in a mailbox
    #[command(alias = "ls")]
    List {
        /// Mailbox to read
        #[arg(long = "box", short = 'b', default_value = "inbox")]
        mailbox: MailboxArg,

        /// Only show unread messages
        #[arg(long)]
        unread: bool,
    },

    /// Send a message and wait for the result
    Send {
        /// Recipient phone number
        to: String,

        /// Message text
        text: String,

        /// Return as soon as the device accepts the message
        #[arg(long)]
        no_wait: bool,
    },

    /// Save a message to the outbox without sending it
    Save {
        /// Recipient phone number
        to: String,

        /// Message text
        text: String,
    },

    /// Delete messages by index
    #[command(alias = "rm")]
    Delete {
        /// Mailbox the indices refer to
        #[arg(long = "box", short = 'b')]
        mailbox: MailboxArg,

        /// Message indices (see `sms list`)
        #[arg(required = true)]
        indices: Vec<u32>,
    },

    /// Mark messages as read by index
    MarkRead {
        /// Mailbox the indices refer to
        #[arg(long = "box", short = 'b', default_value = "inbox")]
        mailbox: MailboxArg,

        /// Message indices (see `sms list`)
        #[arg(required = true)]
        indices: Vec<u32>,
    },

    /// Show the status of the last send
    Status,

    /// Message module settings
    Config(SmsConfigArgs),
}

#[derive(Debug, Args)]
pub struct SmsConfigArgs {
    #[command(subcommand)]
    pub command: SmsConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum SmsConfigCommand {
    /// Show message settings
    Get,

    /// Write message settings
    Set(PayloadArgs),
}

/// A JSON object given inline or from a file.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Inline JSON object
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Read the JSON object from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// List modules that accept get/set
    Modules,

    /// Show a module's settings
    Get {
        /// Module name (e.g. wan, lan, wlan, power_save)
        module: String,
    },

    /// Write a module's settings
    Set {
        /// Module name (e.g. wan, lan, wlan, power_save)
        module: String,

        #[command(flatten)]
        payload: PayloadArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Print the system log
    #[command(alias = "ls")]
    List,

    /// Clear the system log
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYSTEM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Reboot the device
    Reboot,

    /// Power the device off
    Shutdown,

    /// Reset all settings to factory defaults
    RestoreDefaults,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (url, password_env, insecure, timeout, ca_cert,
        /// send_poll_interval_ms, send_timeout_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the admin password in the system keyring (uses --profile)
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
