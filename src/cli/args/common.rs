//! Common CLI types shared across commands

use crate::audit::{CredentialKind, SsoType};
use crate::client::ObjectKind;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting
    Pretty,
    /// Table format - machine-parseable, one row per entry (global default)
    #[default]
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}

/// Which object collections a report reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ScopeArg {
    Applications,
    ServicePrincipals,
    #[default]
    All,
}

impl ScopeArg {
    pub fn includes(&self, kind: ObjectKind) -> bool {
        match self {
            ScopeArg::All => true,
            ScopeArg::Applications => kind == ObjectKind::Application,
            ScopeArg::ServicePrincipals => kind == ObjectKind::ServicePrincipal,
        }
    }
}

/// Credential kind filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// Password credentials
    Secret,
    /// Key credentials, SAML signing certificates included
    Certificate,
}

impl From<KindArg> for CredentialKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Secret => CredentialKind::Secret,
            KindArg::Certificate => CredentialKind::Certificate,
        }
    }
}

/// Collection queried by `filter-test`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetArg {
    #[default]
    ServicePrincipals,
    Applications,
}

impl From<TargetArg> for ObjectKind {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::ServicePrincipals => ObjectKind::ServicePrincipal,
            TargetArg::Applications => ObjectKind::Application,
        }
    }
}

/// Value parser for `--sso-type`
pub fn parse_sso_type(value: &str) -> Result<SsoType, String> {
    SsoType::parse_filter(value).ok_or_else(|| {
        format!(
            "unknown SSO type '{}' (expected saml, oidc, password, notSupported, none or unknown)",
            value
        )
    })
}
