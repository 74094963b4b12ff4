//! Service principal (enterprise application) model

use serde::{Deserialize, Serialize};

use super::{KeyCredential, PasswordCredential};

/// SAML settings block of a service principal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlSingleSignOnSettings {
    #[serde(default)]
    pub relay_state: Option<String>,
}

/// Service principal (`/servicePrincipals`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipal {
    /// Object ID
    pub id: String,

    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Tenant that owns the backing application registration
    #[serde(default)]
    pub app_owner_organization_id: Option<String>,

    /// `Application`, `ManagedIdentity`, `Legacy`, `SocialIdp`
    #[serde(default)]
    pub service_principal_type: Option<String>,

    /// Identifier URIs and app ID the principal is known by
    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub service_principal_names: Vec<String>,

    #[serde(default)]
    pub preferred_single_sign_on_mode: Option<String>,

    #[serde(default)]
    pub saml_single_sign_on_settings: Option<SamlSingleSignOnSettings>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub notification_email_addresses: Vec<String>,

    #[serde(default)]
    pub login_url: Option<String>,

    #[serde(default)]
    pub logout_url: Option<String>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub reply_urls: Vec<String>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub password_credentials: Vec<PasswordCredential>,

    #[serde(default, deserialize_with = "super::nullable_vec")]
    pub key_credentials: Vec<KeyCredential>,
}

impl ServicePrincipal {
    /// Attributes requested with `$select`
    pub const SELECT: &'static str = "id,appId,displayName,appOwnerOrganizationId,\
servicePrincipalType,servicePrincipalNames,preferredSingleSignOnMode,\
samlSingleSignOnSettings,notificationEmailAddresses,loginUrl,logoutUrl,replyUrls,\
passwordCredentials,keyCredentials";
}
