//! Settings command handlers.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use m7350_api::{M7350Client, Module};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled, Serialize)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    name: &'static str,
    #[tabled(rename = "Settable")]
    settable: bool,
}

fn parse_module(name: &str) -> Result<Module, CliError> {
    let module: Module = name.parse().map_err(|_| CliError::Validation {
        field: "module".into(),
        reason: format!("unknown module '{name}'. Run: m7350 settings modules"),
    })?;

    if module.is_configurable() {
        Ok(module)
    } else {
        Err(CliError::Validation {
            field: "module".into(),
            reason: format!("'{module}' has no settings to get or set"),
        })
    }
}

fn parse_settable_module(name: &str) -> Result<Module, CliError> {
    let module = parse_module(name)?;
    if module.is_settable() {
        Ok(module)
    } else {
        Err(CliError::Validation {
            field: "module".into(),
            reason: format!("'{module}' settings are read-only"),
        })
    }
}

pub async fn handle(
    client: &M7350Client,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Modules => {
            let modules: Vec<ModuleRow> = Module::iter()
                .filter(|m| m.is_configurable())
                .map(|m| ModuleRow {
                    name: m.as_str(),
                    settable: m.is_settable(),
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &modules,
                |m| ModuleRow {
                    name: m.name,
                    settable: m.settable,
                },
                |m| m.name.to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Get { module } => {
            let module = parse_module(&module)?;
            let config = client.get_config(module).await?;
            let out = output::render_document(&global.output, &config)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { module, payload } => {
            let module = parse_settable_module(&module)?;
            let config = util::read_payload(&payload)?;
            client.set_config(module, config).await?;
            if !global.quiet {
                eprintln!("Settings for '{module}' updated");
            }
            Ok(())
        }
    }
}
