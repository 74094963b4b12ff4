//! Mock directory client for testing
//!
//! Provides an in-memory implementation of [`DirectoryApi`] for unit tests
//! without making real Graph calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Application, DirectoryApi, DirectoryOwner, ObjectKind, ServicePrincipal};
use crate::error::{ApiError, Result};

/// Mock directory client.
///
/// Configure fixtures via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockDirectoryClient::new()
///     .with_service_principals(vec![sp("Salesforce")])
///     .with_filter_limit(15);
///
/// let sps = mock.list_service_principals(None).await?;
/// ```
#[derive(Default)]
pub struct MockDirectoryClient {
    applications: Arc<Mutex<Vec<Application>>>,
    service_principals: Arc<Mutex<Vec<ServicePrincipal>>>,
    owners: Arc<Mutex<HashMap<String, Vec<DirectoryOwner>>>>,
    /// Object IDs whose owner lookup fails
    failing_owner_ids: Arc<Mutex<HashSet<String>>>,
    /// Reject `in` filters carrying more values than this
    filter_limit: Arc<Mutex<Option<usize>>>,
    /// Error to return from the next listing call - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    call_count: Arc<Mutex<CallCounts>>,
    captured_filters: Arc<Mutex<Vec<String>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_applications: usize,
    pub list_service_principals: usize,
    pub list_owners: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.list_applications + self.list_service_principals + self.list_owners
    }
}

impl MockDirectoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(self, apps: Vec<Application>) -> Self {
        *self.applications.try_lock().expect("fresh mock") = apps;
        self
    }

    pub fn with_service_principals(self, sps: Vec<ServicePrincipal>) -> Self {
        *self.service_principals.try_lock().expect("fresh mock") = sps;
        self
    }

    pub fn with_owners(self, object_id: &str, owners: Vec<DirectoryOwner>) -> Self {
        self.owners
            .try_lock()
            .expect("fresh mock")
            .insert(object_id.to_string(), owners);
        self
    }

    pub fn with_owner_failure(self, object_id: &str) -> Self {
        self.failing_owner_ids
            .try_lock()
            .expect("fresh mock")
            .insert(object_id.to_string());
        self
    }

    /// Simulate Graph rejecting `in` clauses with more than `limit` values
    pub fn with_filter_limit(self, limit: usize) -> Self {
        *self.filter_limit.try_lock().expect("fresh mock") = Some(limit);
        self
    }

    pub fn with_error(self, error: ApiError) -> Self {
        *self.error.try_lock().expect("fresh mock") = Some(error);
        self
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    pub async fn captured_filters(&self) -> Vec<String> {
        self.captured_filters.lock().await.clone()
    }

    /// Shared filter handling: capture, inject errors, enforce the limit
    async fn check_filter(&self, filter: Option<&str>) -> Result<Option<HashSet<String>>> {
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }

        let Some(filter) = filter else {
            return Ok(None);
        };
        self.captured_filters.lock().await.push(filter.to_string());

        let values = parse_in_values(filter);
        if let Some(limit) = *self.filter_limit.lock().await
            && values.len() > limit
        {
            return Err(ApiError::BadRequest(format!(
                "Request_UnsupportedQuery: Too many child clauses specified in search filter expression: {}. Max allowed: {}.",
                values.len(),
                limit
            ))
            .into());
        }

        Ok(Some(values.into_iter().collect()))
    }
}

/// Extract quoted values from `prop in ('a','b')`
fn parse_in_values(filter: &str) -> Vec<String> {
    let Some(start) = filter.find('(') else {
        return Vec::new();
    };
    let end = filter.rfind(')').unwrap_or(filter.len());
    filter[start + 1..end]
        .split(',')
        .map(|v| v.trim().trim_matches('\'').replace("''", "'"))
        .filter(|v| !v.is_empty())
        .collect()
}

#[async_trait]
impl DirectoryApi for MockDirectoryClient {
    async fn list_applications(&self, filter: Option<&str>) -> Result<Vec<Application>> {
        self.call_count.lock().await.list_applications += 1;
        let wanted = self.check_filter(filter).await?;

        let apps = self.applications.lock().await;
        Ok(apps
            .iter()
            .filter(|a| wanted.as_ref().is_none_or(|w| w.contains(&a.app_id)))
            .cloned()
            .collect())
    }

    async fn list_service_principals(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<ServicePrincipal>> {
        self.call_count.lock().await.list_service_principals += 1;
        let wanted = self.check_filter(filter).await?;

        let sps = self.service_principals.lock().await;
        Ok(sps
            .iter()
            .filter(|sp| wanted.as_ref().is_none_or(|w| w.contains(&sp.app_id)))
            .cloned()
            .collect())
    }

    async fn list_owners(&self, _kind: ObjectKind, object_id: &str) -> Result<Vec<DirectoryOwner>> {
        self.call_count.lock().await.list_owners += 1;

        if self.failing_owner_ids.lock().await.contains(object_id) {
            return Err(ApiError::Forbidden.into());
        }

        Ok(self
            .owners
            .lock()
            .await
            .get(object_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(app_id: &str) -> ServicePrincipal {
        ServicePrincipal {
            id: format!("obj-{}", app_id),
            app_id: app_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_in_values() {
        let values = parse_in_values("appId in ('a','b', 'c')");
        assert_eq!(values, vec!["a", "b", "c"]);
        assert!(parse_in_values("displayName eq 'x'").is_empty());
    }

    #[tokio::test]
    async fn test_mock_filters_by_app_id() {
        let mock = MockDirectoryClient::new().with_service_principals(vec![sp("a"), sp("b")]);

        let all = mock.list_service_principals(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let some = mock
            .list_service_principals(Some("appId in ('b')"))
            .await
            .unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].app_id, "b");

        assert_eq!(mock.call_counts().await.list_service_principals, 2);
        assert_eq!(mock.captured_filters().await, vec!["appId in ('b')"]);
    }

    #[tokio::test]
    async fn test_mock_filter_limit() {
        let mock = MockDirectoryClient::new().with_filter_limit(2);

        let err = mock
            .list_service_principals(Some("appId in ('a','b','c')"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Max allowed: 2"));

        assert!(mock
            .list_service_principals(Some("appId in ('a','b')"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_mock_error_consumed_once() {
        let mock = MockDirectoryClient::new().with_error(ApiError::Unauthorized);

        assert!(mock.list_applications(None).await.is_err());
        assert!(mock.list_applications(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_owner_failure() {
        let mock = MockDirectoryClient::new().with_owner_failure("obj-1");

        assert!(mock.list_owners(ObjectKind::Application, "obj-1").await.is_err());
        assert!(mock
            .list_owners(ObjectKind::Application, "obj-2")
            .await
            .unwrap()
            .is_empty());
        assert_eq!(mock.call_counts().await.total(), 2);
    }
}
