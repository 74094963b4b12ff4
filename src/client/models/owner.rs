//! Directory object owner model

use serde::{Deserialize, Serialize};

/// Owner of an application or service principal
///
/// Owners can be users or service principals, so only the common fields are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryOwner {
    /// OData type, e.g. `#microsoft.graph.user`
    #[serde(default, rename = "@odata.type")]
    pub odata_type: Option<String>,

    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Only present for user owners
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

impl DirectoryOwner {
    /// Short type tag (`user`, `servicePrincipal`, ...) from the OData type
    pub fn type_tag(&self) -> String {
        self.odata_type
            .as_deref()
            .map(|t| t.trim_start_matches("#microsoft.graph.").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
