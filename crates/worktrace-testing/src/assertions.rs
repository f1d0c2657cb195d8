//! Custom assertions over the CLI's JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that a `session list` JSON payload holds the expected number of
/// rows.
pub fn assert_session_count(json: &Value, expected: usize) -> Result<()> {
    let sessions = json.as_array().context("Expected a JSON array of sessions")?;

    if sessions.len() != expected {
        anyhow::bail!("Expected {} sessions, got {}", expected, sessions.len());
    }

    Ok(())
}

/// Assert the status of a session JSON object (works for both a bare
/// session and a view/overview wrapping one).
pub fn assert_session_status(json: &Value, expected: &str) -> Result<()> {
    let status = json["status"]
        .as_str()
        .or_else(|| json["session"]["status"].as_str())
        .context("Expected a 'status' field")?;

    if status != expected {
        anyhow::bail!("Expected status {}, got {}", expected, status);
    }

    Ok(())
}

/// Assert the derived effective duration of a view/overview.
pub fn assert_effective_ms(json: &Value, expected: i64) -> Result<()> {
    let effective = json["durations"]["effective_ms"]
        .as_i64()
        .context("Expected 'durations.effective_ms'")?;

    if effective != expected {
        anyhow::bail!("Expected effective_ms {}, got {}", expected, effective);
    }

    Ok(())
}
