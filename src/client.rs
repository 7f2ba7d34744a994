//! JSON-over-HTTP wrapper for the group-listings backend.
//!
//! Failure policy: HTTP errors and transport failures are absorbed here into
//! safe defaults (empty list / `None` / `false`) and logged, so callers never
//! see them as errors. The one exception is a fetch response body that is not
//! valid JSON: that propagates, because upstream code needs to distinguish
//! "no data" from a corrupt server response.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Map, Value};

use crate::model::{Activity, GroupListing};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The four logical backend operations the synchronization core drives.
///
/// `GroupsClient` is the production implementation; tests drive the core
/// through an in-memory fake.
#[async_trait]
pub trait ListingsApi: Send + Sync {
    /// Fetch all listings, optionally filtered by activity.
    async fn fetch_listings(&self, filter: Option<Activity>) -> Result<Vec<GroupListing>>;

    /// Create a listing from a draft; returns the canonical server copy.
    async fn create_listing(&self, draft: &GroupListing) -> Option<GroupListing>;

    /// Delete a listing by id; true only on a 2xx response.
    async fn delete_listing(&self, id: &str) -> bool;

    /// Partial update: PATCH only the supplied fields.
    async fn update_listing(&self, id: &str, fields: Map<String, Value>)
        -> Option<GroupListing>;
}

/// Stateless request/response wrapper over the backend's REST API.
///
/// Each call is exactly one network round trip (no retries, no caching)
/// and is safe to call from the background worker.
pub struct GroupsClient {
    http: HttpClient,
    base_url: String,
}

impl GroupsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        // A server that accepts but never answers must become a transport
        // failure, not a stuck request
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn groups_url(&self) -> String {
        format!("{}/api/groups", self.base_url)
    }

    fn group_url(&self, id: &str) -> String {
        format!("{}/api/groups/{}", self.base_url, id)
    }
}

#[async_trait]
impl ListingsApi for GroupsClient {
    async fn fetch_listings(&self, filter: Option<Activity>) -> Result<Vec<GroupListing>> {
        let mut request = self.http.get(self.groups_url());
        if let Some(activity) = filter {
            request = request.query(&[("activity", activity.machine_name())]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch groups: {e}");
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Failed to fetch groups: HTTP {}", response.status());
            return Ok(Vec::new());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read groups response: {e}");
                return Ok(Vec::new());
            }
        };

        serde_json::from_str(&body).context("malformed groups response")
    }

    async fn create_listing(&self, draft: &GroupListing) -> Option<GroupListing> {
        let response = match self.http.post(self.groups_url()).json(draft).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to create group: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Failed to create group: HTTP {}", response.status());
            return None;
        }

        match response.json().await {
            Ok(created) => Some(created),
            Err(e) => {
                tracing::warn!("Failed to decode created group: {e}");
                None
            }
        }
    }

    async fn delete_listing(&self, id: &str) -> bool {
        match self.http.delete(self.group_url(id)).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!("Failed to delete group: HTTP {}", response.status());
                false
            }
            Err(e) => {
                tracing::warn!("Failed to delete group: {e}");
                false
            }
        }
    }

    async fn update_listing(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Option<GroupListing> {
        let response = match self.http.patch(self.group_url(id)).json(&fields).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to update group: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Failed to update group: HTTP {}", response.status());
            return None;
        }

        match response.json().await {
            Ok(updated) => Some(updated),
            Err(e) => {
                tracing::warn!("Failed to decode updated group: {e}");
                None
            }
        }
    }
}
