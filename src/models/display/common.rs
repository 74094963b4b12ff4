//! Common display utilities and helpers

use chrono::{DateTime, Utc};

use crate::audit::SsoType;
use crate::client::ObjectKind;

/// Placeholder for absent values
pub const EMPTY: &str = "-";

/// Truncate string to max characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Calendar date of an expiration, `Never` when absent
pub fn format_expiration(end: Option<DateTime<Utc>>) -> String {
    end.map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Never".to_string())
}

/// Days column: remaining days, or negative days past expiration
pub fn format_days(days_remaining: Option<i64>, days_past: Option<i64>) -> String {
    match (days_past, days_remaining) {
        (Some(past), _) => format!("-{}", past),
        (None, Some(days)) => days.to_string(),
        (None, None) => EMPTY.to_string(),
    }
}

pub fn format_optional(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| EMPTY.to_string())
}

pub fn format_sso(sso: Option<&SsoType>) -> String {
    sso.map(ToString::to_string)
        .unwrap_or_else(|| EMPTY.to_string())
}

pub fn format_kind(kind: ObjectKind) -> String {
    match kind {
        ObjectKind::Application => "App".to_string(),
        ObjectKind::ServicePrincipal => "SP".to_string(),
    }
}
