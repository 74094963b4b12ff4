//! Application registration model

use serde::{Deserialize, Serialize};

use super::{KeyCredential, PasswordCredential};

/// App registration (`/applications`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Object ID
    pub id: String,

    /// Client (application) ID
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub publisher_domain: Option<String>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub password_credentials: Vec<PasswordCredential>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub key_credentials: Vec<KeyCredential>,
}

impl Application {
    /// Attributes requested with `$select`
    pub const SELECT: &'static str =
        "id,appId,displayName,publisherDomain,passwordCredentials,keyCredentials";
}
