pub mod catalog;
pub mod session;
pub mod time;

use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use worktrace_types::SessionStatus;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Status label, colored when stdout is a terminal.
pub fn status_label(status: SessionStatus) -> String {
    let label = status.as_str();
    if !std::io::stdout().is_terminal() {
        return label.to_string();
    }

    match status {
        SessionStatus::Running => label.green().to_string(),
        SessionStatus::Paused => label.yellow().to_string(),
        SessionStatus::Finished => label.cyan().to_string(),
        SessionStatus::Cancelled => label.red().to_string(),
    }
}

/// First block of the uuid, enough to tell sessions apart in a personal log.
pub fn short_id(id: impl std::fmt::Display) -> String {
    let full = id.to_string();
    full.chars().take(8).collect()
}
