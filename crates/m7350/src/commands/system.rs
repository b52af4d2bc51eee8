//! System command handlers.

use m7350_api::M7350Client;

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &M7350Client,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Reboot => {
            if !util::confirm("Reboot the router?", global.yes)? {
                return Ok(());
            }
            client.reboot().await?;
            if !global.quiet {
                eprintln!("Router reboot initiated");
            }
            Ok(())
        }

        SystemCommand::Shutdown => {
            if !util::confirm(
                "Power off the router? It must be switched on again by hand.",
                global.yes,
            )? {
                return Ok(());
            }
            client.shutdown().await?;
            if !global.quiet {
                eprintln!("Router power-off initiated");
            }
            Ok(())
        }

        SystemCommand::RestoreDefaults => {
            if !util::confirm(
                "Restore factory defaults? All settings, including the admin password, are lost.",
                global.yes,
            )? {
                return Ok(());
            }
            client.restore_defaults().await?;
            if !global.quiet {
                eprintln!("Factory reset initiated");
            }
            Ok(())
        }
    }
}
