//! Microsoft Graph directory client

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

pub mod graph;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use graph::GraphClient;
#[cfg(test)]
pub use mock::MockDirectoryClient;
pub use models::{Application, DirectoryOwner, ServicePrincipal};

/// The two directory object types that carry credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ObjectKind {
    Application,
    ServicePrincipal,
}

impl ObjectKind {
    /// Graph collection segment for this kind
    pub fn collection(&self) -> &'static str {
        match self {
            ObjectKind::Application => "applications",
            ObjectKind::ServicePrincipal => "servicePrincipals",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Application => write!(f, "Application"),
            ObjectKind::ServicePrincipal => write!(f, "ServicePrincipal"),
        }
    }
}

/// Directory queries consumed by the audit.
///
/// Implementations return complete result sets; paging is handled inside the
/// client. Any error means the whole query failed.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// List app registrations, optionally narrowed by an OData `$filter`
    async fn list_applications(&self, filter: Option<&str>) -> Result<Vec<Application>>;

    /// List service principals, optionally narrowed by an OData `$filter`
    async fn list_service_principals(&self, filter: Option<&str>)
    -> Result<Vec<ServicePrincipal>>;

    /// List the owners of one application or service principal
    async fn list_owners(&self, kind: ObjectKind, object_id: &str) -> Result<Vec<DirectoryOwner>>;
}
