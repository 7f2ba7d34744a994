//! Shared test doubles and fixtures for the core's unit tests.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::ListingsApi;
use crate::host::{DisplaySink, FriendsChatSnapshot, HostSession};
use crate::model::{Activity, GroupListing};
use crate::session::ManagementMode;
use crate::sync::GroupFinder;

/// Canonical test listing, mirroring what the backend would return.
pub fn listing() -> GroupListing {
    GroupListing {
        id: Some("test-id".to_string()),
        player_name: "Alice".to_string(),
        friends_chat_name: Some("AliceFC".to_string()),
        activity: Activity::ChambersOfXeric,
        current_size: 1,
        max_size: 3,
        description: Some("Test description".to_string()),
    }
}

/// In-memory `ListingsApi` that records every call and serves canned
/// results. Defaults to "everything succeeds".
pub struct FakeApi {
    listings: Mutex<Vec<GroupListing>>,
    fetch_fails: Mutex<bool>,
    create_result: Mutex<Option<GroupListing>>,
    delete_result: Mutex<bool>,
    update_result: Mutex<Option<GroupListing>>,
    fetch_calls: Mutex<Vec<Option<Activity>>>,
    create_calls: Mutex<Vec<GroupListing>>,
    delete_calls: Mutex<Vec<String>>,
    update_calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            listings: Mutex::new(Vec::new()),
            fetch_fails: Mutex::new(false),
            create_result: Mutex::new(Some(listing())),
            delete_result: Mutex::new(true),
            update_result: Mutex::new(Some(listing())),
            fetch_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_listings(&self, listings: Vec<GroupListing>) {
        *self.listings.lock().unwrap() = listings;
    }

    /// Make the next fetches fail the way a malformed response body does.
    pub fn set_fetch_fails(&self, fails: bool) {
        *self.fetch_fails.lock().unwrap() = fails;
    }

    pub fn set_create_result(&self, result: Option<GroupListing>) {
        *self.create_result.lock().unwrap() = result;
    }

    pub fn set_delete_result(&self, result: bool) {
        *self.delete_result.lock().unwrap() = result;
    }

    pub fn set_update_result(&self, result: Option<GroupListing>) {
        *self.update_result.lock().unwrap() = result;
    }

    pub fn fetch_calls(&self) -> Vec<Option<Activity>> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<GroupListing> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.fetch_calls.lock().unwrap().clear();
        self.create_calls.lock().unwrap().clear();
        self.delete_calls.lock().unwrap().clear();
        self.update_calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl ListingsApi for FakeApi {
    async fn fetch_listings(
        &self,
        filter: Option<Activity>,
    ) -> anyhow::Result<Vec<GroupListing>> {
        self.fetch_calls.lock().unwrap().push(filter);
        if *self.fetch_fails.lock().unwrap() {
            return Err(anyhow!("malformed groups response"));
        }
        Ok(self.listings.lock().unwrap().clone())
    }

    async fn create_listing(&self, draft: &GroupListing) -> Option<GroupListing> {
        self.create_calls.lock().unwrap().push(draft.clone());
        self.create_result.lock().unwrap().clone()
    }

    async fn delete_listing(&self, id: &str) -> bool {
        self.delete_calls.lock().unwrap().push(id.to_string());
        *self.delete_result.lock().unwrap()
    }

    async fn update_listing(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Option<GroupListing> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_string(), fields));
        self.update_result.lock().unwrap().clone()
    }
}

/// Scriptable `HostSession`.
pub struct FakeHost {
    player_name: Mutex<Option<String>>,
    friends_chat: Mutex<Option<FriendsChatSnapshot>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            player_name: Mutex::new(None),
            friends_chat: Mutex::new(None),
        }
    }

    pub fn set_player_name(&self, name: Option<&str>) {
        *self.player_name.lock().unwrap() = name.map(str::to_string);
    }

    pub fn set_friends_chat(&self, fc: Option<(&str, usize)>) {
        *self.friends_chat.lock().unwrap() = fc.map(|(owner, member_count)| FriendsChatSnapshot {
            owner: owner.to_string(),
            member_count,
        });
    }
}

impl HostSession for FakeHost {
    fn local_player_name(&self) -> Option<String> {
        self.player_name.lock().unwrap().clone()
    }

    fn friends_chat(&self) -> Option<FriendsChatSnapshot> {
        self.friends_chat.lock().unwrap().clone()
    }
}

/// `DisplaySink` that records everything it is shown.
pub struct RecordingSink {
    updates: Mutex<Vec<Vec<GroupListing>>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn updates(&self) -> Vec<Vec<GroupListing>> {
        self.updates.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingSink {
    fn update_listings(&self, listings: Vec<GroupListing>) {
        self.updates.lock().unwrap().push(listings);
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// A wired-up core with fakes on every seam.
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub host: Arc<FakeHost>,
    pub sink: Arc<RecordingSink>,
    pub finder: GroupFinder,
}

/// Build a harness. Must run inside a Tokio runtime (`#[tokio::test]`).
pub fn harness(mode: ManagementMode) -> Harness {
    let api = Arc::new(FakeApi::new());
    let host = Arc::new(FakeHost::new());
    let sink = Arc::new(RecordingSink::new());
    let finder = GroupFinder::new(
        Arc::clone(&api) as Arc<dyn ListingsApi>,
        Arc::clone(&host) as Arc<dyn HostSession>,
        Arc::clone(&sink) as Arc<dyn DisplaySink>,
        mode,
    );
    Harness {
        api,
        host,
        sink,
        finder,
    }
}

/// Give the background worker (and any spawned callbacks) a chance to drain
/// everything that is currently runnable.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}
