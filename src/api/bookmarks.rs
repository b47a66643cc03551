//! Bookmark and bookmark-folder endpoints.

use super::{ApiClient, ApiError, DataEnvelope};
use crate::model::{App, AppKey, BookmarkFolder, Page};
use serde::Serialize;

/// Body for `POST /users/me/bookmarks`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBookmarkBody<'a> {
    app_id: &'a str,
    platform: &'a str,
    folder_name: &'a str,
}

/// Body for `DELETE /users/me/bookmarks/:id` — the id in the path is the
/// platform-specific one, so the body disambiguates platform and folder.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveBookmarkBody<'a> {
    platform: &'a str,
    folder_name: &'a str,
}

#[derive(Serialize)]
struct CreateFolderBody<'a> {
    name: &'a str,
}

impl ApiClient {
    /// Fetch the user's complete folder list with memberships.
    pub async fn fetch_bookmark_folders(&self) -> Result<Vec<BookmarkFolder>, ApiError> {
        let url = self.endpoint("users/me/bookmarks")?;
        let envelope: DataEnvelope<Vec<BookmarkFolder>> = self.get_json(url).await?;
        Ok(envelope.data)
    }

    /// Add one app to one folder.
    pub async fn add_bookmark(&self, key: &AppKey, folder: &str) -> Result<(), ApiError> {
        let url = self.endpoint("users/me/bookmarks")?;
        self.post_json(
            url,
            &AddBookmarkBody {
                app_id: key.id(),
                platform: key.platform().as_str(),
                folder_name: folder,
            },
        )
        .await
    }

    /// Remove one app from one folder.
    pub async fn remove_bookmark(&self, key: &AppKey, folder: &str) -> Result<(), ApiError> {
        let url = self.endpoint_with_segment("users/me/bookmarks", key.id())?;
        self.delete_json(
            url,
            &RemoveBookmarkBody {
                platform: key.platform().as_str(),
                folder_name: folder,
            },
        )
        .await
    }

    /// Create an empty named folder.
    pub async fn create_bookmark_folder(&self, name: &str) -> Result<(), ApiError> {
        let url = self.endpoint("users/me/bookmark-folders")?;
        self.post_json(url, &CreateFolderBody { name }).await
    }

    /// Delete a folder by name.
    pub async fn delete_bookmark_folder(&self, name: &str) -> Result<(), ApiError> {
        let url = self.endpoint_with_segment("users/me/bookmark-folders", name)?;
        self.delete_empty(url).await
    }

    /// Fetch the first `limit` apps of one folder for its grid preview.
    pub async fn fetch_folder_preview(
        &self,
        folder: &str,
        limit: u32,
    ) -> Result<Page<App>, ApiError> {
        let mut url = self.endpoint("apps/bookmarked")?;
        url.query_pairs_mut()
            .append_pair("folder", folder)
            .append_pair("platform", "all")
            .append_pair("page", "1")
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }
}
