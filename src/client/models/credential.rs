//! Secret and certificate credential models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client secret (`passwordCredentials` entry)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCredential {
    /// Key identifier, shared with a certificate when this is its private-key password
    #[serde(default)]
    pub key_id: Option<String>,

    /// Friendly name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// First characters of the secret value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,

    /// Absent means the secret never expires
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
}

/// Certificate (`keyCredentials` entry)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCredential {
    #[serde(default)]
    pub key_id: Option<String>,

    /// Friendly name, usually the certificate subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Key type, e.g. `AsymmetricX509Cert` or `X509CertAndPassword`
    #[serde(default, rename = "type")]
    pub key_type: Option<String>,

    /// Key usage, `Sign` or `Verify`
    #[serde(default)]
    pub usage: Option<String>,

    /// Base64 thumbprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_key_identifier: Option<String>,

    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
}

impl KeyCredential {
    /// True for the SAML token-signing certificate of an enterprise app
    pub fn is_signing_certificate(&self) -> bool {
        self.key_type.as_deref() == Some(super::ASYMMETRIC_X509)
            && self.usage.as_deref() == Some(super::USAGE_SIGN)
    }
}
