//! Single sign-on type detection for service principals

use std::fmt;

use serde::Serialize;

use crate::client::ServicePrincipal;

/// How a service principal performs single sign-on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SsoType {
    Saml,
    Oidc,
    Password,
    NotSupported,
    None,
    /// A preferred mode value this tool does not recognise
    Unknown(String),
}

impl SsoType {
    /// Map an explicit `preferredSingleSignOnMode` value (case-insensitive)
    pub fn from_preferred_mode(mode: &str) -> Self {
        match mode.to_ascii_lowercase().as_str() {
            "saml" => SsoType::Saml,
            "oidc" => SsoType::Oidc,
            "password" => SsoType::Password,
            "notsupported" => SsoType::NotSupported,
            _ => SsoType::Unknown(mode.to_string()),
        }
    }

    /// Parse a user-supplied filter value; unlike [`from_preferred_mode`](Self::from_preferred_mode)
    /// this also accepts `none` and rejects anything unrecognised.
    pub fn parse_filter(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(SsoType::None),
            "unknown" => Some(SsoType::Unknown(String::new())),
            other => match SsoType::from_preferred_mode(other) {
                SsoType::Unknown(_) => None,
                known => Some(known),
            },
        }
    }

    /// Filter match that treats every `Unknown` value as the same type
    pub fn matches(&self, other: &SsoType) -> bool {
        match (self, other) {
            (SsoType::Unknown(_), SsoType::Unknown(_)) => true,
            _ => self == other,
        }
    }
}

impl fmt::Display for SsoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsoType::Saml => f.write_str("SAML"),
            SsoType::Oidc => f.write_str("OIDC"),
            SsoType::Password => f.write_str("Password"),
            SsoType::NotSupported => f.write_str("NotSupported"),
            SsoType::None => f.write_str("None"),
            SsoType::Unknown(mode) if mode.is_empty() => f.write_str("Unknown"),
            SsoType::Unknown(mode) => write!(f, "Unknown ({})", mode),
        }
    }
}

/// Which signal decided the SSO type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SsoTypeSource {
    PreferredMode,
    SigningCertificate,
    SamlIndicators,
    NoIndicators,
}

impl fmt::Display for SsoTypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SsoTypeSource::PreferredMode => "PreferredMode",
            SsoTypeSource::SigningCertificate => "SigningCertificate",
            SsoTypeSource::SamlIndicators => "SamlIndicators",
            SsoTypeSource::NoIndicators => "NoIndicators",
        };
        f.write_str(s)
    }
}

/// The SSO-related attributes of a service principal
#[derive(Debug, Clone, Default)]
pub struct SsoAttributes {
    pub preferred_mode: Option<String>,
    /// `(type, usage)` of each certificate
    pub certificates: Vec<(Option<String>, Option<String>)>,
    pub has_relay_state: bool,
    pub notification_emails: Vec<String>,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
    pub reply_url_count: usize,
}

impl From<&ServicePrincipal> for SsoAttributes {
    fn from(sp: &ServicePrincipal) -> Self {
        Self {
            preferred_mode: sp.preferred_single_sign_on_mode.clone(),
            certificates: sp
                .key_credentials
                .iter()
                .map(|k| (k.key_type.clone(), k.usage.clone()))
                .collect(),
            has_relay_state: sp
                .saml_single_sign_on_settings
                .as_ref()
                .and_then(|s| s.relay_state.as_deref())
                .is_some_and(|r| !r.is_empty()),
            notification_emails: sp.notification_email_addresses.clone(),
            login_url: sp.login_url.clone(),
            logout_url: sp.logout_url.clone(),
            reply_url_count: sp.reply_urls.len(),
        }
    }
}

/// SSO type plus the diagnostic signals that were inspected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsoResolution {
    pub sso_type: SsoType,
    pub source: SsoTypeSource,
    pub has_signing_certificate: bool,
    pub has_saml_indicators: bool,
    pub notification_email_count: usize,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
    pub reply_url_count: usize,
}

/// Resolve the SSO type from the first signal that applies.
///
/// An explicit preferred mode always wins. Certificate and SAML-settings
/// signals are only consulted for records that predate the explicit mode.
pub fn resolve_sso_type(attrs: &SsoAttributes) -> SsoResolution {
    let has_signing_certificate = attrs.certificates.iter().any(|(key_type, usage)| {
        key_type.as_deref() == Some(crate::client::models::ASYMMETRIC_X509)
            && usage.as_deref() == Some(crate::client::models::USAGE_SIGN)
    });
    let has_saml_indicators = attrs.has_relay_state || !attrs.notification_emails.is_empty();

    let (sso_type, source) = match attrs.preferred_mode.as_deref().map(str::trim) {
        Some(mode) if !mode.is_empty() => {
            (SsoType::from_preferred_mode(mode), SsoTypeSource::PreferredMode)
        }
        _ if has_signing_certificate => (SsoType::Saml, SsoTypeSource::SigningCertificate),
        _ if has_saml_indicators => (SsoType::Saml, SsoTypeSource::SamlIndicators),
        _ => (SsoType::None, SsoTypeSource::NoIndicators),
    };

    SsoResolution {
        sso_type,
        source,
        has_signing_certificate,
        has_saml_indicators,
        notification_email_count: attrs.notification_emails.len(),
        login_url: attrs.login_url.clone(),
        logout_url: attrs.logout_url.clone(),
        reply_url_count: attrs.reply_url_count,
    }
}
