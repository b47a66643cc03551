//! Developer-tracking admin endpoints.

use super::{ApiClient, ApiError};
use crate::model::{Developer, Platform};
use serde::Serialize;

/// Body for `POST /developers`. The backend infers the platform and the
/// store-native developer id from the submitted store URL.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddDeveloperBody<'a> {
    #[serde(rename = "developerURL")]
    developer_url: &'a str,
    is_publisher: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetPublisherBody {
    is_publisher: bool,
}

#[derive(Serialize)]
struct ManualSyncBody<'a> {
    platform: &'a str,
}

impl ApiClient {
    /// Fetch all tracked developers. The backend returns a bare array here,
    /// not the usual `{ data }` envelope.
    pub async fn fetch_developers(&self) -> Result<Vec<Developer>, ApiError> {
        let url = self.endpoint("developers")?;
        self.get_json(url).await
    }

    /// Register a developer by store URL.
    pub async fn add_developer(
        &self,
        developer_url: &str,
        is_publisher: bool,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("developers")?;
        self.post_json(
            url,
            &AddDeveloperBody {
                developer_url,
                is_publisher,
            },
        )
        .await
    }

    /// Remove a developer and its tracked apps.
    pub async fn delete_developer(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint_with_segment("developers", id)?;
        self.delete_empty(url).await
    }

    /// Flip scraping on or off for one developer. Keyed by the store-native
    /// developer id, not the record id.
    pub async fn set_developer_active(
        &self,
        developer_id: &str,
        active: bool,
    ) -> Result<(), ApiError> {
        let action = if active { "activate" } else { "deactivate" };
        let mut url = self.endpoint_with_segment("developers", developer_id)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl("base URL cannot carry segments".into()))?
            .push(action);
        self.patch_empty(url).await
    }

    /// Flip the publisher flag on one developer. Keyed by the store-native
    /// developer id, like activate/deactivate; only delete takes the record
    /// id.
    pub async fn set_developer_publisher(
        &self,
        developer_id: &str,
        is_publisher: bool,
    ) -> Result<(), ApiError> {
        let mut url = self.endpoint_with_segment("developers", developer_id)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl("base URL cannot carry segments".into()))?
            .push("publisher");
        self.patch_json(url, &SetPublisherBody { is_publisher }).await
    }

    /// Queue an out-of-band scrape of one developer's catalog. Keyed by the
    /// store-native developer id.
    pub async fn manual_sync_developer(
        &self,
        developer_id: &str,
        platform: Platform,
    ) -> Result<(), ApiError> {
        let url = self.endpoint_with_segment("developers/manual-sync", developer_id)?;
        self.post_json(
            url,
            &ManualSyncBody {
                platform: platform.as_str(),
            },
        )
        .await
    }
}
