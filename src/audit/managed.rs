//! Vendor-managed service principal detection
//!
//! Some service principals carry credentials that the platform rotates on the
//! tenant's behalf (device P2P certificates, Domain Services sync). They are
//! recognised by a primary identifier plus a mandatory secondary validation,
//! so a third-party app that happens to reuse an identifier is never excluded.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::ServicePrincipal;

/// Microsoft's own tenant, owner of first-party application registrations
pub const MICROSOFT_TENANT_ID: &str = "f8cdef31-a31e-4b4a-93e4-5f571e91255a";

/// Attribute a secondary validation reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePath {
    /// A top-level attribute such as `appOwnerOrganizationId`
    Flat(String),
    /// A field of every element of a collection, such as `keyCredentials.displayName`
    NestedCollection { collection: String, field: String },
}

impl FromStr for AttributePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        match parts.as_slice() {
            [attr] if !attr.is_empty() => Ok(AttributePath::Flat(attr.to_string())),
            [collection, field] if !collection.is_empty() && !field.is_empty() => {
                Ok(AttributePath::NestedCollection {
                    collection: collection.to_string(),
                    field: field.to_string(),
                })
            }
            _ => Err(format!(
                "invalid attribute path '{}': expected 'attribute' or 'collection.field'",
                s
            )),
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributePath::Flat(attr) => f.write_str(attr),
            AttributePath::NestedCollection { collection, field } => {
                write!(f, "{}.{}", collection, field)
            }
        }
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How the expected value is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    #[serde(alias = "regex")]
    Regex,
    #[serde(alias = "equals")]
    Equals,
}

/// Second check that must pass after a primary identifier hit
#[derive(Debug, Clone, Serialize)]
pub struct SecondaryValidation {
    pub kind: ValidationKind,
    pub path: AttributePath,
    pub expected: String,
    /// Compiled `expected` for regex validations; `None` if it failed to compile
    #[serde(skip)]
    pattern: Option<Regex>,
}

/// A known vendor-managed application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedAppDefinition {
    pub name: String,

    /// Any of these appearing among the principal's names is a primary hit
    pub identifiers: Vec<String>,

    /// Definitions without a validation never match
    #[serde(default, deserialize_with = "lenient_validation")]
    pub validation: Option<SecondaryValidation>,
}

#[derive(Deserialize)]
struct RawValidation {
    kind: ValidationKind,
    path: String,
    expected: String,
}

/// Drop validations whose path cannot be parsed instead of failing the whole config
fn lenient_validation<'de, D>(deserializer: D) -> Result<Option<SecondaryValidation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValidation>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| match r.path.parse::<AttributePath>() {
        Ok(path) => Some(SecondaryValidation::new(r.kind, path, r.expected)),
        Err(e) => {
            warn!("Ignoring managed-app validation: {}", e);
            None
        }
    }))
}

/// Outcome of matching one service principal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManagedAppMatch {
    pub is_managed: bool,
    pub matched_definition_name: Option<String>,
    pub match_reason: Option<String>,
}

/// Definitions shipped with the tool, evaluated before any from config
pub fn builtin_definitions() -> Vec<ManagedAppDefinition> {
    vec![
        ManagedAppDefinition {
            name: "P2P Server".to_string(),
            identifiers: vec!["urn:p2p_cert".to_string()],
            validation: Some(SecondaryValidation::new(
                ValidationKind::Regex,
                AttributePath::NestedCollection {
                    collection: "keyCredentials".to_string(),
                    field: "displayName".to_string(),
                },
                "^CN=MS-Organization-P2P-Access",
            )),
        },
        ManagedAppDefinition {
            name: "Microsoft Entra Domain Services".to_string(),
            identifiers: vec!["2565bd9d-da50-47d4-8b85-4c97f669dc36".to_string()],
            validation: Some(SecondaryValidation::new(
                ValidationKind::Equals,
                AttributePath::Flat("appOwnerOrganizationId".to_string()),
                MICROSOFT_TENANT_ID,
            )),
        },
    ]
}

/// Values of a top-level attribute; `None` if the attribute is not supported
fn flat_values<'a>(sp: &'a ServicePrincipal, attr: &str) -> Option<Vec<&'a str>> {
    let single = |v: &'a Option<String>| v.as_deref().into_iter().collect::<Vec<_>>();
    let list = |v: &'a Vec<String>| v.iter().map(String::as_str).collect::<Vec<_>>();

    let values = match attr {
        "id" => vec![sp.id.as_str()],
        "appId" => vec![sp.app_id.as_str()],
        "displayName" => single(&sp.display_name),
        "appOwnerOrganizationId" => single(&sp.app_owner_organization_id),
        "servicePrincipalType" => single(&sp.service_principal_type),
        "preferredSingleSignOnMode" => single(&sp.preferred_single_sign_on_mode),
        "loginUrl" => single(&sp.login_url),
        "logoutUrl" => single(&sp.logout_url),
        "servicePrincipalNames" => list(&sp.service_principal_names),
        "notificationEmailAddresses" => list(&sp.notification_email_addresses),
        "replyUrls" => list(&sp.reply_urls),
        _ => return None,
    };
    Some(values)
}

/// Field values across a credential collection; `None` if not supported
fn nested_values<'a>(
    sp: &'a ServicePrincipal,
    collection: &str,
    field: &str,
) -> Option<Vec<&'a str>> {
    let values = match (collection, field) {
        ("keyCredentials", "displayName") => sp
            .key_credentials
            .iter()
            .filter_map(|k| k.display_name.as_deref())
            .collect(),
        ("keyCredentials", "type") => sp
            .key_credentials
            .iter()
            .filter_map(|k| k.key_type.as_deref())
            .collect(),
        ("keyCredentials", "usage") => sp
            .key_credentials
            .iter()
            .filter_map(|k| k.usage.as_deref())
            .collect(),
        ("keyCredentials", "keyId") => sp
            .key_credentials
            .iter()
            .filter_map(|k| k.key_id.as_deref())
            .collect(),
        ("passwordCredentials", "displayName") => sp
            .password_credentials
            .iter()
            .filter_map(|p| p.display_name.as_deref())
            .collect(),
        ("passwordCredentials", "hint") => sp
            .password_credentials
            .iter()
            .filter_map(|p| p.hint.as_deref())
            .collect(),
        ("passwordCredentials", "keyId") => sp
            .password_credentials
            .iter()
            .filter_map(|p| p.key_id.as_deref())
            .collect(),
        _ => return None,
    };
    Some(values)
}

impl SecondaryValidation {
    pub fn new(kind: ValidationKind, path: AttributePath, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        let pattern = match kind {
            ValidationKind::Regex => Regex::new(&expected)
                .map_err(|e| warn!("Invalid managed-app pattern '{}': {}", expected, e))
                .ok(),
            ValidationKind::Equals => None,
        };

        Self {
            kind,
            path,
            expected,
            pattern,
        }
    }

    /// Evaluate against a principal. Unknown paths and bad patterns never pass.
    pub fn passes(&self, sp: &ServicePrincipal) -> bool {
        let values = match &self.path {
            AttributePath::Flat(attr) => flat_values(sp, attr),
            AttributePath::NestedCollection { collection, field } => {
                nested_values(sp, collection, field)
            }
        };
        let Some(values) = values else {
            debug!("Unsupported validation path {}", self.path);
            return false;
        };

        match self.kind {
            ValidationKind::Regex => self
                .pattern
                .as_ref()
                .is_some_and(|re| values.iter().any(|v| re.is_match(v))),
            ValidationKind::Equals => values.iter().any(|v| *v == self.expected),
        }
    }
}

/// Find the first definition whose identifier and validation both match.
pub fn match_managed_app(
    sp: &ServicePrincipal,
    definitions: &[ManagedAppDefinition],
) -> ManagedAppMatch {
    for definition in definitions {
        let hit = definition.identifiers.iter().find(|id| {
            sp.app_id == **id || sp.service_principal_names.iter().any(|n| n == *id)
        });
        let Some(identifier) = hit else {
            continue;
        };

        let Some(validation) = &definition.validation else {
            debug!(
                "Skipping managed-app definition '{}': no secondary validation",
                definition.name
            );
            continue;
        };

        if validation.passes(sp) {
            return ManagedAppMatch {
                is_managed: true,
                matched_definition_name: Some(definition.name.clone()),
                match_reason: Some(format!(
                    "identifier '{}' and {} {:?} '{}'",
                    identifier, validation.path, validation.kind, validation.expected
                )),
            };
        }
    }

    ManagedAppMatch::default()
}
