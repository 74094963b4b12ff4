//! Credential expiration classification

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Days at or below which a credential counts as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Days at or below which a credential counts as expiring in the medium term
pub const EXPIRING_MEDIUM_DAYS: i64 = 90;

const SECONDS_PER_DAY: i64 = 86_400;

/// Expiration status of a credential.
///
/// Variants are declared from most to least severe, so the derived `Ord`
/// sorts the worst status first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CredentialStatus {
    Expired,
    ExpiringToday,
    ExpiringSoon,
    ExpiringMedium,
    Valid,
    NoExpiration,
}

impl CredentialStatus {
    /// Statuses grouped as "expiring soon" in summaries
    pub fn is_expiring_soon(&self) -> bool {
        matches!(self, CredentialStatus::ExpiringToday | CredentialStatus::ExpiringSoon)
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CredentialStatus::Expired => "Expired",
            CredentialStatus::ExpiringToday => "ExpiringToday",
            CredentialStatus::ExpiringSoon => "ExpiringSoon",
            CredentialStatus::ExpiringMedium => "ExpiringMedium",
            CredentialStatus::Valid => "Valid",
            CredentialStatus::NoExpiration => "NoExpiration",
        };
        f.write_str(s)
    }
}

/// Result of classifying one credential against a reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whole days left; `0` once expired, `None` when the credential never expires
    pub days_remaining: Option<i64>,
    /// Whole days since expiry; only set for expired credentials
    pub days_past_expiration: Option<i64>,
    pub status: CredentialStatus,
}

/// Classify a credential's expiration relative to `reference`.
///
/// The whole-day difference is floored toward negative infinity, not truncated
/// toward zero. A credential that expired an hour ago is therefore `Expired`
/// and one day past expiration, never `ExpiringToday`; one expiring in 23 hours
/// is `ExpiringToday`. Callers should use one reference timestamp for a whole run.
pub fn classify_credential(
    expiration: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> Classification {
    let Some(expiration) = expiration else {
        return Classification {
            days_remaining: None,
            days_past_expiration: None,
            status: CredentialStatus::NoExpiration,
        };
    };

    let diff = (expiration - reference)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY);

    if diff < 0 {
        return Classification {
            days_remaining: Some(0),
            days_past_expiration: Some(diff.abs()),
            status: CredentialStatus::Expired,
        };
    }

    let status = match diff {
        0 => CredentialStatus::ExpiringToday,
        d if d <= EXPIRING_SOON_DAYS => CredentialStatus::ExpiringSoon,
        d if d <= EXPIRING_MEDIUM_DAYS => CredentialStatus::ExpiringMedium,
        _ => CredentialStatus::Valid,
    };

    Classification {
        days_remaining: Some(diff),
        days_past_expiration: None,
        status,
    }
}
