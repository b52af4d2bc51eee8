//! System log command handlers.

use serde_json::Value;
use tabled::Tabled;

use m7350_api::M7350Client;

use crate::cli::{GlobalOpts, LogArgs, LogCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    content: String,
}

fn field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl From<&Value> for LogRow {
    fn from(entry: &Value) -> Self {
        Self {
            time: field(entry, "time"),
            kind: field(entry, "type"),
            level: field(entry, "level"),
            content: field(entry, "content"),
        }
    }
}

pub async fn handle(
    client: &M7350Client,
    args: LogArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LogCommand::List => {
            let entries = client.read_log().await?;
            let out = output::render_list(&global.output, &entries, |e| LogRow::from(e), |e| {
                format!("{} {}", field(e, "time"), field(e, "content"))
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LogCommand::Clear => {
            if !util::confirm("Clear the system log?", global.yes)? {
                return Ok(());
            }
            client.clear_log().await?;
            if !global.quiet {
                eprintln!("System log cleared");
            }
            Ok(())
        }
    }
}
