//! Shared helpers for command handlers.

use roomctl_core::{Console, NoticeLevel};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Resume the stored session; a missing or rejected token means the
/// operator has to log in again.
pub async fn require_session(console: &Console) -> Result<(), CliError> {
    if console.restore().await {
        Ok(())
    } else {
        Err(CliError::SessionExpired)
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Print success notices to stderr. Error notices are not repeated: the
/// failing command's diagnostic already carries the message.
pub fn print_notices(console: &Console, global: &GlobalOpts) {
    let notices = console.notices().drain();
    if global.quiet {
        return;
    }
    let color = output::should_color(&global.color);
    for notice in notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Success)
    {
        eprintln!("{}", output::format_notice(notice, color));
    }
}

/// Render an optional cell.
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
