//! Auth command handlers.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use m7350_api::{LoginAttempts, M7350Client};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

#[derive(Serialize)]
struct SessionInfo {
    url: String,
    authed_ip: Option<String>,
}

fn detail_attempts(a: &LoginAttempts) -> String {
    let show = |v: Option<i64>| v.map_or_else(|| "-".into(), |n| n.to_string());
    format!(
        "Failed attempts:    {}\nRemaining attempts: {}\nLockout remaining:  {}s",
        show(a.attempt),
        show(a.remaining_attempts),
        show(a.remaining_time),
    )
}

fn prompt_secret(label: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(label).map_err(prompt_err)?;
    if value.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(value))
}

pub async fn handle(
    client: &M7350Client,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Check => {
            client.login().await?;
            let info = SessionInfo {
                url: client.base_url().to_string(),
                authed_ip: client.session().and_then(|s| s.authed_ip().map(str::to_owned)),
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &info,
                |i| {
                    format!(
                        "{} Logged in to {} (client {})",
                        output::accent("✓", color),
                        i.url,
                        i.authed_ip.as_deref().unwrap_or("unknown")
                    )
                },
                |i| i.authed_ip.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Attempts => {
            let attempts = client.login_attempts().await?;
            let out = output::render_single(&global.output, &attempts, detail_attempts, |a| {
                a.attempt.unwrap_or_default().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            // The router holds a single web session; logging in takes it over.
            client.login().await?;
            client.logout().await?;
            if !global.quiet {
                eprintln!("Web session ended");
            }
            Ok(())
        }

        AuthCommand::ChangePassword => {
            let current = prompt_secret("Current password: ")?;
            let new = prompt_secret("New password: ")?;
            let repeat = prompt_secret("Repeat new password: ")?;
            if new.expose_secret() != repeat.expose_secret() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }

            client.change_password(&current, &new).await?;
            if !global.quiet {
                eprintln!("Admin password changed");
                eprintln!("  Update stored credentials: m7350 config set-password");
            }
            Ok(())
        }
    }
}
