//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod log;
pub mod settings;
pub mod sms;
pub mod status;
pub mod system;
pub mod util;

use m7350_api::M7350Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &M7350Client,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(client, args, global).await,
        Command::Sms(args) => sms::handle(client, args, global).await,
        Command::Settings(args) => settings::handle(client, args, global).await,
        Command::Status => status::handle(client, global).await,
        Command::Log(args) => log::handle(client, args, global).await,
        Command::System(args) => system::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
