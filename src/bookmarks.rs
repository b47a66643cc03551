//! Client-side folder state and the optimistic bookmark toggle.
//!
//! Toggles are two-phase: the membership change is applied to local state
//! immediately (phase one), the API call runs afterwards, and a failed call
//! reverts the local change (phase two). The UI therefore reflects the
//! user's intent instantly and only snaps back on a confirmed failure.

use crate::model::{App, AppKey, BookmarkFolder};
use std::collections::HashMap;

/// Direction a toggle moved the membership in phase one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
}

/// All folders the signed-in user owns, plus the per-folder grid previews.
#[derive(Debug, Default)]
pub struct FolderStore {
    folders: Vec<BookmarkFolder>,
    previews: HashMap<String, Vec<App>>,
}

impl FolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the folder list from a fresh fetch. Previews for folders that
    /// no longer exist are dropped.
    pub fn set_folders(&mut self, folders: Vec<BookmarkFolder>) {
        self.previews
            .retain(|name, _| folders.iter().any(|f| &f.name == name));
        self.folders = folders;
    }

    pub fn folders(&self) -> &[BookmarkFolder] {
        &self.folders
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn folder(&self, name: &str) -> Option<&BookmarkFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    fn folder_mut(&mut self, name: &str) -> Option<&mut BookmarkFolder> {
        self.folders.iter_mut().find(|f| f.name == name)
    }

    /// Is this app bookmarked in ANY folder?
    pub fn is_bookmarked(&self, key: &AppKey) -> bool {
        self.folders.iter().any(|f| f.contains(key))
    }

    /// Names of the folders containing this app, in display order.
    pub fn folders_containing(&self, key: &AppKey) -> Vec<&str> {
        self.folders
            .iter()
            .filter(|f| f.contains(key))
            .map(|f| f.name.as_str())
            .collect()
    }

    // ------------------------------------------------------------------
    // Two-phase toggle
    // ------------------------------------------------------------------

    /// Phase one: flip membership of `key` in `folder` locally and report
    /// which direction it moved. `None` if the folder does not exist.
    ///
    /// The caller then performs the matching API call and, on failure, must
    /// call [`FolderStore::revert_toggle`] with the returned action.
    pub fn begin_toggle(&mut self, folder: &str, key: &AppKey) -> Option<ToggleAction> {
        let entry = self.folder_mut(folder)?;
        if let Some(pos) = entry.apps.iter().position(|b| b.matches(key)) {
            entry.apps.remove(pos);
            Some(ToggleAction::Removed)
        } else {
            entry.apps.push(key.into());
            Some(ToggleAction::Added)
        }
    }

    /// Phase two, failure path: undo a phase-one change.
    pub fn revert_toggle(&mut self, folder: &str, key: &AppKey, action: ToggleAction) {
        let Some(entry) = self.folder_mut(folder) else {
            return;
        };
        match action {
            ToggleAction::Added => {
                entry.apps.retain(|b| !b.matches(key));
            }
            ToggleAction::Removed => {
                if !entry.contains(key) {
                    entry.apps.push(key.into());
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Folder lifecycle
    // ------------------------------------------------------------------

    /// Validate and register a new folder locally. The name is trimmed;
    /// whitespace-only input and duplicates yield `None` and must not reach
    /// the network.
    pub fn begin_create(&mut self, raw_name: &str) -> Option<String> {
        let name = raw_name.trim();
        if name.is_empty() || self.folder(name).is_some() {
            return None;
        }
        self.folders.push(BookmarkFolder::empty(name));
        Some(name.to_string())
    }

    /// Roll back a locally registered folder whose creation call failed.
    pub fn revert_create(&mut self, name: &str) {
        self.folders.retain(|f| f.name != name);
        self.previews.remove(name);
    }

    /// Whether deletion may be offered for this folder. Default folders are
    /// permanent.
    pub fn can_delete(&self, name: &str) -> bool {
        self.folder(name).is_some_and(|f| !f.is_default)
    }

    /// Drop a folder and its preview after the backend confirmed deletion.
    pub fn remove_folder(&mut self, name: &str) {
        self.folders.retain(|f| f.name != name);
        self.previews.remove(name);
    }

    // ------------------------------------------------------------------
    // Previews
    // ------------------------------------------------------------------

    /// Store the fetched grid preview for one folder. Ignored if the folder
    /// disappeared while the fetch was in flight.
    pub fn set_preview(&mut self, folder: &str, apps: Vec<App>) {
        if self.folder(folder).is_some() {
            self.previews.insert(folder.to_string(), apps);
        }
    }

    pub fn preview(&self, folder: &str) -> &[App] {
        self.previews.get(folder).map_or(&[], Vec::as_slice)
    }

    /// Folders whose previews still need fetching, in display order.
    pub fn folders_without_preview(&self) -> Vec<String> {
        self.folders
            .iter()
            .filter(|f| !self.previews.contains_key(&f.name))
            .map(|f| f.name.clone())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
