//! Microsoft Graph data models
//!
//! Only the attributes the audit reads are modelled; everything else in the
//! Graph payload is ignored during deserialization.

use serde::{Deserialize, Deserializer};

mod application;
mod collection;
mod credential;
mod owner;
mod service_principal;

pub use application::Application;
pub use collection::GraphCollection;
pub use credential::{KeyCredential, PasswordCredential};
pub use owner::DirectoryOwner;
pub use service_principal::ServicePrincipal;

/// Key credential `type` for X.509 certificates carrying a public key
pub const ASYMMETRIC_X509: &str = "AsymmetricX509Cert";

/// Key credential `usage` for signing certificates
pub const USAGE_SIGN: &str = "Sign";

/// `servicePrincipalType` value for managed identities
pub const MANAGED_IDENTITY_TYPE: &str = "ManagedIdentity";

/// Treat an explicit JSON `null` collection the same as a missing one
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
