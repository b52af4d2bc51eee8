//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::Value;

use m7350_api::Mailbox;

use crate::cli::{MailboxArg, PayloadArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        message: e.to_string(),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Resolve `--data` / `--from-file` into a JSON object.
pub fn read_payload(args: &PayloadArgs) -> Result<Value, CliError> {
    let value = match (&args.data, &args.from_file) {
        (Some(data), _) => serde_json::from_str(data).map_err(|e| CliError::Validation {
            field: "data".into(),
            reason: format!("invalid JSON: {e}"),
        })?,
        (None, Some(path)) => read_json_file(path)?,
        (None, None) => {
            return Err(CliError::Validation {
                field: "data".into(),
                reason: "pass --data or --from-file".into(),
            });
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::Validation {
            field: "data".into(),
            reason: "settings must be a JSON object".into(),
        })
    }
}

pub fn mailbox(arg: MailboxArg) -> Mailbox {
    match arg {
        MailboxArg::Inbox => Mailbox::Inbox,
        MailboxArg::Outbox => Mailbox::Outbox,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use super::*;

    fn inline(data: &str) -> PayloadArgs {
        PayloadArgs {
            data: Some(data.into()),
            from_file: None,
        }
    }

    #[test]
    fn inline_object_payload() {
        let value = read_payload(&inline(r#"{"enable": true}"#)).unwrap();
        assert_eq!(value["enable"], true);
    }

    #[test]
    fn non_object_payload_rejected() {
        let err = read_payload(&inline("[1, 2]")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
        let err = read_payload(&inline("{not json")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"time": 15}}"#).unwrap();
        let args = PayloadArgs {
            data: None,
            from_file: Some(file.path().to_path_buf()),
        };
        assert_eq!(read_payload(&args).unwrap()["time"], 15);
    }

    #[test]
    fn confirm_with_yes_skips_prompt() {
        assert!(confirm("Really?", true).unwrap());
    }
}
