//! SMS command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use m7350_api::{M7350Client, SendStatus, SmsMessage};

use crate::cli::{GlobalOpts, SmsArgs, SmsCommand, SmsConfigCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const PREVIEW_CHARS: usize = 60;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "#")]
    index: u32,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Number")]
    peer: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Message")]
    content: String,
}

impl MessageRow {
    fn new(m: &SmsMessage, color: bool) -> Self {
        Self {
            index: m.index,
            unread: if m.unread {
                output::accent("●", color)
            } else {
                String::new()
            },
            peer: m.peer().to_owned(),
            time: m.time().to_owned(),
            content: preview(&m.content),
        }
    }
}

fn preview(content: &str) -> String {
    let flat = content.replace(['\r', '\n'], " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        flat
    }
}

fn spinner(global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Sending…");
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &M7350Client,
    args: SmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SmsCommand::List { mailbox, unread } => {
            let mut messages = client.read_messages(util::mailbox(mailbox)).await?;
            if unread {
                messages.retain(|m| m.unread);
            }

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &messages,
                |m| MessageRow::new(m, color),
                |m| m.index.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SmsCommand::Send { to, text, no_wait } => {
            if no_wait {
                client.start_send_message(&to, &text).await?;
                if !global.quiet {
                    eprintln!("Message handed to the modem");
                }
                return Ok(());
            }

            let bar = spinner(global);
            let result = client.send_message(&to, &text).await;
            if let Some(bar) = bar {
                bar.finish_and_clear();
            }

            let status = result?;
            status.into_result()?;
            if !global.quiet {
                eprintln!("Message sent to {to}");
            }
            Ok(())
        }

        SmsCommand::Save { to, text } => {
            client.save_message(&to, &text).await?;
            if !global.quiet {
                eprintln!("Message saved to outbox");
            }
            Ok(())
        }

        SmsCommand::Delete { mailbox, indices } => {
            let mailbox = util::mailbox(mailbox);
            if !util::confirm(
                &format!("Delete {} message(s) from {mailbox}?", indices.len()),
                global.yes,
            )? {
                return Ok(());
            }
            client.delete_messages(mailbox, &indices).await?;
            if !global.quiet {
                eprintln!("Deleted {} message(s)", indices.len());
            }
            Ok(())
        }

        SmsCommand::MarkRead { mailbox, indices } => {
            client
                .mark_read(util::mailbox(mailbox), &indices)
                .await?;
            if !global.quiet {
                eprintln!("Marked {} message(s) read", indices.len());
            }
            Ok(())
        }

        SmsCommand::Status => {
            let status = client.send_status().await?;
            let out = output::render_single(
                &global.output,
                &status,
                SendStatus::to_string,
                |s| s.code().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SmsCommand::Config(config_args) => match config_args.command {
            SmsConfigCommand::Get => {
                let config = client.message_config().await?;
                let out = output::render_document(&global.output, &config)?;
                output::print_output(&out, global.quiet);
                Ok(())
            }
            SmsConfigCommand::Set(payload) => {
                let config = util::read_payload(&payload)?;
                client.set_message_config(config).await?;
                if !global.quiet {
                    eprintln!("Message settings updated");
                }
                Ok(())
            }
        },
    }
}
