//! Text helpers shared by the list view, the detail view and the CLI.

use chrono::{DateTime, Utc};

use crate::models::ReportStatus;

/// Preview length used by the report list.
pub const PREVIEW_CHARS: usize = 100;

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Parse a backend timestamp. RFC 3339 first, then the naive
/// `YYYY-MM-DD HH:MM:SS` form some endpoints return (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        })
}

/// Short relative description of `raw` as seen at `now`. Anything older
/// than a week falls back to the calendar date; unparsable input is
/// returned unchanged.
pub fn relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(ts) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        format_date(ts)
    }
}

/// Calendar date as shown in the UI.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Full timestamp for the detail view.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// CSS class of the status badge.
pub fn status_badge_class(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending => "badge badge-warning",
        ReportStatus::Reviewed => "badge badge-success",
        ReportStatus::Dismissed => "badge badge-muted",
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
