//! Reusable formatting utilities for CLI output

use chrono::{DateTime, Utc};

/// Format an expiry instant relative to `now`.
///
/// # Example output
/// - `expires in 2h 15m`
/// - `expires in 45m`
/// - `expired 3h 2m ago`
pub fn format_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expires_at.signed_duration_since(now);
    let minutes = remaining.num_minutes().abs();
    let span = if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    };

    if remaining.num_seconds() > 0 {
        format!("expires in {}", span)
    } else {
        format!("expired {} ago", span)
    }
}

/// Format a UTC instant in the local timezone, `YYYY-MM-DD HH:MM`.
pub fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Truncate string to max length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
