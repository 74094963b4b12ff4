//! Credential-owning directory objects

use serde::Serialize;

use super::managed::{ManagedAppDefinition, match_managed_app};
use super::sso::{SsoAttributes, SsoResolution, resolve_sso_type};
use crate::client::models::{KeyCredential, PasswordCredential};
use crate::client::{Application, ObjectKind, ServicePrincipal};

/// Kind of credential entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CredentialKind {
    Secret,
    Certificate,
    SamlSigningCertificate,
}

impl CredentialKind {
    /// Filter match; `Certificate` also selects SAML signing certificates
    pub fn selected_by(&self, filter: CredentialKind) -> bool {
        match filter {
            CredentialKind::Certificate => *self != CredentialKind::Secret,
            other => *self == other,
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CredentialKind::Secret => "Secret",
            CredentialKind::Certificate => "Certificate",
            CredentialKind::SamlSigningCertificate => "SamlSigningCertificate",
        };
        f.write_str(s)
    }
}

/// An application or service principal with its credentials and derived annotations
#[derive(Debug, Clone)]
pub struct OwningObject {
    pub kind: ObjectKind,
    pub id: String,
    pub app_id: String,
    pub display_name: String,
    pub owner_tenant_id: Option<String>,
    pub service_principal_type: Option<String>,
    pub password_credentials: Vec<PasswordCredential>,
    pub key_credentials: Vec<KeyCredential>,
    /// Only resolved for service principals
    pub sso: Option<SsoResolution>,
    /// Name of the matched vendor-managed definition, if any
    pub managed_app: Option<String>,
}

impl OwningObject {
    pub fn from_application(app: Application) -> Self {
        Self {
            kind: ObjectKind::Application,
            display_name: app.display_name.unwrap_or_default(),
            id: app.id,
            app_id: app.app_id,
            owner_tenant_id: None,
            service_principal_type: None,
            password_credentials: app.password_credentials,
            key_credentials: app.key_credentials,
            sso: None,
            managed_app: None,
        }
    }

    /// Build from a service principal, resolving SSO type and managed-app status
    pub fn from_service_principal(
        sp: ServicePrincipal,
        definitions: &[ManagedAppDefinition],
    ) -> Self {
        let sso = resolve_sso_type(&SsoAttributes::from(&sp));
        let managed = match_managed_app(&sp, definitions);

        Self {
            kind: ObjectKind::ServicePrincipal,
            display_name: sp.display_name.unwrap_or_default(),
            id: sp.id,
            app_id: sp.app_id,
            owner_tenant_id: sp.app_owner_organization_id,
            service_principal_type: sp.service_principal_type,
            password_credentials: sp.password_credentials,
            key_credentials: sp.key_credentials,
            sso: Some(sso),
            managed_app: managed.matched_definition_name,
        }
    }

    pub fn is_managed_identity(&self) -> bool {
        self.service_principal_type.as_deref()
            == Some(crate::client::models::MANAGED_IDENTITY_TYPE)
    }
}
