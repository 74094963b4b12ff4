//! Microsoft Graph API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use super::models::GraphCollection;
use super::{Application, DirectoryApi, DirectoryOwner, ObjectKind, ServicePrincipal};
use crate::error::{ApiError, Result};

/// Graph v1.0 base URL
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Client-side pacing, well under Graph's per-app directory throttling limits
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Page size for collection queries (`$top`)
const PAGE_SIZE: &str = "999";

/// Microsoft Graph API client
pub struct GraphClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GraphClient {
    /// Create a client with an optional base URL override (national clouds, tests)
    pub fn with_host(token: String, api_host: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(std::num::NonZeroU32::MIN),
        );

        let base_url = api_host
            .map(|h| h.trim_end_matches('/').to_string())
            .unwrap_or_else(|| GRAPH_BASE_URL.to_string());

        Ok(Self {
            http,
            base_url,
            token,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every page of a collection, following `@odata.nextLink`
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let first_url = format!("{}{}", self.base_url, path);
        let mut page: GraphCollection<T> = self.get_json(&first_url, query).await?;
        let mut items = std::mem::take(&mut page.value);
        let mut pages = 1;

        while let Some(next) = page.next_link.take() {
            // nextLink already carries the original query plus the skip token
            page = self.get_json(&next, &[]).await?;
            pages += 1;
            items.append(&mut page.value);
        }

        debug!("GET {} returned {} items over {} pages", path, items.len(), pages);
        Ok(items)
    }

    /// Issue one authenticated GET and decode the body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::NotFound(graph_error_message(&body, "Resource not found")).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::URI_TOO_LONG => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::BadRequest(graph_error_message(&body, "Bad request")).into())
            }
            status if status.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                let fallback = format!("Server error: {}", status);
                Err(ApiError::ServerError(graph_error_message(&body, &fallback)).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

/// Pull `error.code: error.message` out of a Graph error body
fn graph_error_message(body: &str, fallback: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    match error {
        Some(err) => {
            let code = err.get("code").and_then(|c| c.as_str()).unwrap_or("Unknown");
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(fallback);
            format!("{}: {}", code, message)
        }
        None if body.trim().is_empty() => fallback.to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl DirectoryApi for GraphClient {
    async fn list_applications(&self, filter: Option<&str>) -> Result<Vec<Application>> {
        let mut query = vec![("$select", Application::SELECT), ("$top", PAGE_SIZE)];
        if let Some(f) = filter {
            query.push(("$filter", f));
        }
        self.get_all("/applications", &query).await
    }

    async fn list_service_principals(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<ServicePrincipal>> {
        let mut query = vec![("$select", ServicePrincipal::SELECT), ("$top", PAGE_SIZE)];
        if let Some(f) = filter {
            query.push(("$filter", f));
        }
        self.get_all("/servicePrincipals", &query).await
    }

    async fn list_owners(&self, kind: ObjectKind, object_id: &str) -> Result<Vec<DirectoryOwner>> {
        let path = format!("/{}/{}/owners", kind.collection(), object_id);
        let query = [("$select", "id,displayName,userPrincipalName")];
        self.get_all(&path, &query).await
    }
}
