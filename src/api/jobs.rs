//! Scraper job endpoints: status readout and manual trigger.

use super::{ApiClient, ApiError, DataEnvelope};
use crate::model::{Platform, SyncStatus};

impl ApiClient {
    /// Current per-platform scraper status, for the admin dashboard.
    pub async fn fetch_sync_status(&self) -> Result<Vec<SyncStatus>, ApiError> {
        let url = self.endpoint("jobs/sync-status")?;
        let envelope: DataEnvelope<Vec<SyncStatus>> = self.get_json(url).await?;
        Ok(envelope.data)
    }

    /// Kick off a full scrape of one platform's tracked developers.
    pub async fn trigger_sync(&self, platform: Platform) -> Result<(), ApiError> {
        let mut url = self.endpoint("jobs/sync")?;
        url.query_pairs_mut()
            .append_pair("platform", platform.as_str());
        self.post_empty(url).await
    }
}
