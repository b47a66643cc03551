//! Feed endpoints: the date-range feed and the bookmarked-apps feed.

use super::{ApiClient, ApiError};
use crate::filters::FilterState;
use crate::model::{App, Page};

impl ApiClient {
    /// Fetch one page of the filtered app feed.
    ///
    /// A folder scope routes the request to `/apps/bookmarked`; otherwise the
    /// ordinary `/apps/date-range` feed is queried. The publisher flag only
    /// exists on the date-range feed.
    pub async fn fetch_feed_page(
        &self,
        filters: &FilterState,
        page: u32,
        limit: u32,
    ) -> Result<Page<App>, ApiError> {
        let path = if filters.folder.is_some() {
            "apps/bookmarked"
        } else {
            "apps/date-range"
        };
        let mut url = self.endpoint(path)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("start", &filters.start_str())
                .append_pair("end", &filters.end_str())
                .append_pair("platform", filters.platform.as_str())
                .append_pair("page", &page.to_string())
                .append_pair("limit", &limit.to_string());
            if filters.publishers_only {
                query.append_pair("isPublisher", "true");
            }
            if let Some(folder) = &filters.folder {
                query.append_pair("folder", folder);
            }
        }
        self.get_json(url).await
    }
}
