//! In-memory owner cache
//!
//! Owner lookups are one Graph request per object, so results are kept for the
//! rest of the run. A failed lookup is cached as a single `<<Error>>` owner and
//! never retried within the run.

use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, warn};
use serde::Serialize;

use crate::audit::OwningObject;
use crate::client::{DirectoryApi, DirectoryOwner, ObjectKind};

/// Display name of the placeholder owner recorded for failed lookups
pub const ERROR_OWNER_NAME: &str = "<<Error>>";

/// Text shown for objects that have no owners
pub const NO_OWNER_TEXT: &str = "<<No Owner>>";

/// Owner details kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerInfo {
    pub display_name: String,
    pub user_principal_name: Option<String>,
    pub object_id: String,
    /// `user`, `servicePrincipal`, ...
    pub type_tag: String,
}

impl OwnerInfo {
    pub fn error_placeholder() -> Self {
        Self {
            display_name: ERROR_OWNER_NAME.to_string(),
            user_principal_name: None,
            object_id: String::new(),
            type_tag: "unknown".to_string(),
        }
    }
}

impl From<DirectoryOwner> for OwnerInfo {
    fn from(owner: DirectoryOwner) -> Self {
        let type_tag = owner.type_tag();
        Self {
            display_name: owner.display_name.unwrap_or_else(|| owner.id.clone()),
            user_principal_name: owner.user_principal_name,
            object_id: owner.id,
            type_tag,
        }
    }
}

impl std::fmt::Display for OwnerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.user_principal_name {
            Some(upn) => write!(f, "{} ({})", self.display_name, upn),
            None => f.write_str(&self.display_name),
        }
    }
}

/// Owners keyed by object ID
#[derive(Debug, Default)]
pub struct OwnerCache {
    entries: Mutex<HashMap<String, Vec<OwnerInfo>>>,
}

impl OwnerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object_id: &str) -> Option<Vec<OwnerInfo>> {
        self.entries.lock().ok()?.get(object_id).cloned()
    }

    pub fn insert(&self, object_id: &str, owners: Vec<OwnerInfo>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(object_id.to_string(), owners);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached lookup
    #[allow(dead_code)]
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Owners joined for display, or `None` when the object was never looked up
    pub fn describe(&self, object_id: &str) -> Option<String> {
        let owners = self.get(object_id)?;
        if owners.is_empty() {
            return Some(NO_OWNER_TEXT.to_string());
        }
        Some(
            owners
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Cached owners of an object, fetching them on first use
    pub async fn resolve<C>(&self, client: &C, kind: ObjectKind, object_id: &str) -> Vec<OwnerInfo>
    where
        C: DirectoryApi + ?Sized,
    {
        if let Some(owners) = self.get(object_id) {
            debug!("Owner cache hit: {}", object_id);
            return owners;
        }

        let owners = match client.list_owners(kind, object_id).await {
            Ok(owners) => owners.into_iter().map(OwnerInfo::from).collect(),
            Err(e) => {
                warn!("Owner lookup failed for {} {}: {}", kind, object_id, e);
                vec![OwnerInfo::error_placeholder()]
            }
        };
        self.insert(object_id, owners.clone());
        owners
    }

    /// Resolve owners for every object, calling `on_done` after each one
    pub async fn prefetch<C>(&self, client: &C, objects: &[OwningObject], mut on_done: impl FnMut())
    where
        C: DirectoryApi + ?Sized,
    {
        for object in objects {
            self.resolve(client, object.kind, &object.id).await;
            on_done();
        }
        debug!("Owner cache holds {} objects", self.len());
    }
}
