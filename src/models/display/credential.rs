//! Credential report display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{
    EMPTY, format_days, format_expiration, format_kind, format_optional, format_sso,
    truncate_string,
};
use crate::audit::{CredentialRow, ObjectSummary};

/// One credential per row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CredentialDisplay {
    #[tabled(rename = "TYPE")]
    pub object_type: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "APP ID")]
    pub app_id: String,

    #[tabled(rename = "SSO")]
    pub sso_type: String,

    #[tabled(rename = "KIND")]
    pub kind: String,

    #[tabled(rename = "CREDENTIAL")]
    pub credential_name: String,

    #[tabled(rename = "EXPIRES")]
    pub expires: String,

    #[tabled(rename = "DAYS")]
    pub days: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "OWNERS")]
    pub owners: String,
}

impl From<&CredentialRow> for CredentialDisplay {
    fn from(row: &CredentialRow) -> Self {
        Self {
            object_type: format_kind(row.object_kind),
            name: truncate_string(&row.display_name, 40),
            app_id: row.app_id.clone(),
            sso_type: format_sso(row.sso_type.as_ref()),
            kind: row.kind.to_string(),
            credential_name: truncate_string(
                &format_optional(row.credential_name.as_deref()),
                40,
            ),
            expires: format_expiration(row.end),
            days: format_days(row.days_remaining, row.days_past_expiration),
            status: row.status.to_string(),
            owners: format_optional(row.owners.as_deref()),
        }
    }
}

/// One object per row with credential counts
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ObjectSummaryDisplay {
    #[tabled(rename = "TYPE")]
    pub object_type: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "APP ID")]
    pub app_id: String,

    #[tabled(rename = "SSO")]
    pub sso_type: String,

    #[tabled(rename = "TOTAL")]
    pub total: usize,

    #[tabled(rename = "SECRETS")]
    pub secrets: usize,

    #[tabled(rename = "CERTS")]
    pub certificates: usize,

    #[tabled(rename = "SAML SIGNING")]
    pub saml_signing: usize,

    #[tabled(rename = "EXPIRED")]
    pub expired: usize,

    #[tabled(rename = "EXPIRING SOON")]
    pub expiring_soon: usize,

    #[tabled(rename = "EARLIEST")]
    pub earliest: String,

    #[tabled(rename = "DAYS")]
    pub days: String,

    #[tabled(rename = "WORST STATUS")]
    pub worst_status: String,

    #[tabled(rename = "OWNERS")]
    pub owners: String,
}

impl From<&ObjectSummary> for ObjectSummaryDisplay {
    fn from(summary: &ObjectSummary) -> Self {
        Self {
            object_type: format_kind(summary.object_kind),
            name: truncate_string(&summary.display_name, 40),
            app_id: summary.app_id.clone(),
            sso_type: format_sso(summary.sso_type.as_ref()),
            total: summary.total_credentials,
            secrets: summary.secrets,
            certificates: summary.certificates,
            saml_signing: summary.saml_signing_certificates,
            expired: summary.expired,
            expiring_soon: summary.expiring_soon,
            earliest: format_expiration(summary.earliest_expiration),
            days: summary
                .earliest_days_remaining
                .map(|d| d.to_string())
                .unwrap_or_else(|| EMPTY.to_string()),
            worst_status: summary.worst_status.to_string(),
            owners: format_optional(summary.owners.as_deref()),
        }
    }
}
