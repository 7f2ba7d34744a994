//! The synchronization core.
//!
//! [`GroupFinder`] owns a single background worker fed by a command queue:
//! every poll and every mutation runs on that worker, one at a time, in
//! submission order, so at most one network operation ever touches the
//! shared session state. A separate ticker task enqueues polls at a fixed
//! interval; cancelling the schedule never interrupts an in-flight run.
//!
//! Every successful mutation is followed by exactly one refresh; every
//! failure surfaces exactly one fixed error string and no refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::ListingsApi;
use crate::host::{DisplaySink, HostSession};
use crate::model::{Activity, GroupListing};
use crate::names::normalize_name;
use crate::session::{ManagementMode, SessionState};

/// Callback invoked (on the runtime, never inline) after every Friends Chat
/// status change.
pub type StatusCallback = Arc<dyn Fn() + Send + Sync>;

enum Command {
    Poll,
    /// Poll from the ticker, tagged with the schedule generation it belongs
    /// to. Ticks from a cancelled schedule are dropped by the worker.
    ScheduledPoll(u64),
    Create(GroupListing),
    Delete(String),
    UpdateSize { id: String, new_size: u32 },
}

/// State shared between the public handle and the background worker.
struct Shared {
    api: Arc<dyn ListingsApi>,
    sink: Arc<dyn DisplaySink>,
    session: Mutex<SessionState>,
    /// Bumped whenever a poll schedule is cancelled; a queued scheduled poll
    /// with an older generation is stale.
    poll_generation: AtomicU64,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Public handle to the group-finder core.
///
/// Cheap operations (validation, state reads, event handling) run on the
/// caller's thread; everything that talks to the backend is enqueued for
/// the background worker.
pub struct GroupFinder {
    shared: Arc<Shared>,
    pub(crate) host: Arc<dyn HostSession>,
    tx: UnboundedSender<Command>,
    pub(crate) rt: Handle,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    status_callback: Mutex<Option<StatusCallback>>,
}

impl GroupFinder {
    /// Build the core and spawn its worker. Must be called from within a
    /// Tokio runtime; the worker exits when the handle is dropped.
    pub fn new(
        api: Arc<dyn ListingsApi>,
        host: Arc<dyn HostSession>,
        sink: Arc<dyn DisplaySink>,
        management_mode: ManagementMode,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            api,
            sink,
            session: Mutex::new(SessionState::new(management_mode)),
            poll_generation: AtomicU64::new(0),
        });
        let rt = Handle::current();
        rt.spawn(run_worker(Arc::clone(&shared), rx));

        Self {
            shared,
            host,
            tx,
            rt,
            poll_task: Mutex::new(None),
            status_callback: Mutex::new(None),
        }
    }

    // ── Polling ─────────────────────────────────────────────────────

    /// Enqueue one refresh of the listing set.
    pub fn refresh_listings(&self) {
        let _ = self.tx.send(Command::Poll);
    }

    /// Poll immediately and then at the given fixed interval. Any existing
    /// schedule is cancelled first; at most one is ever active.
    pub fn start_polling(&self, interval: Duration) {
        self.stop_polling();

        // A zero interval would busy-loop the worker queue
        let interval = interval.max(Duration::from_secs(1));
        let generation = self.shared.poll_generation.load(Ordering::SeqCst);
        let tx = self.tx.clone();
        let task = self.rt.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Command::ScheduledPoll(generation)).is_err() {
                    break;
                }
            }
        });
        *self.poll_task() = Some(task);
    }

    /// Cancel pending and future scheduled polls, including any tick already
    /// sitting in the worker queue. An in-flight poll on the worker is
    /// allowed to finish; manual refreshes and mutations are unaffected.
    pub fn stop_polling(&self) {
        if let Some(task) = self.poll_task().take() {
            task.abort();
        }
        self.shared.poll_generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Store the filter and trigger one refresh with it.
    pub fn set_filter(&self, activity: Option<Activity>) {
        self.shared.session().current_filter = activity;
        self.refresh_listings();
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Validate and enqueue creation of `draft`.
    ///
    /// The identity check always runs first; the Friends Chat check only
    /// applies in [`ManagementMode::FriendsChat`] and is skipped entirely in
    /// manual mode. Validation failures never reach the backend.
    pub fn create_group(&self, mut draft: GroupListing) {
        if let Some(name) = self.host.local_player_name() {
            draft.player_name = normalize_name(&name);
        }

        if draft.player_name.is_empty() {
            self.shared
                .sink
                .show_error("You must be logged in to create a group");
            return;
        }

        {
            let session = self.shared.session();
            if session.management_mode == ManagementMode::FriendsChat {
                let Some(fc_name) = session.current_fc_name.clone() else {
                    drop(session);
                    self.shared
                        .sink
                        .show_error("Join a Friends Chat before creating a group");
                    return;
                };
                draft.friends_chat_name = Some(normalize_name(&fc_name));
            }
        }

        let _ = self.tx.send(Command::Create(draft));
    }

    /// Enqueue deletion of the listing with `id`.
    pub fn delete_group(&self, id: String) {
        let _ = self.tx.send(Command::Delete(id));
    }

    /// Enqueue a size update for the listing with `id`.
    pub fn update_group_size(&self, id: String, new_size: u32) {
        let _ = self.tx.send(Command::UpdateSize { id, new_size });
    }

    // ── Session & host ──────────────────────────────────────────────

    /// Normalized display name of the local player, if logged in.
    pub fn local_player_name(&self) -> Option<String> {
        self.host.local_player_name().map(|name| normalize_name(&name))
    }

    /// Seed Friends Chat presence from the host, e.g. at startup when the
    /// session may already be in a chat.
    pub fn sync_from_host(&self) {
        let fc = self.host.friends_chat();
        let mut session = self.shared.session();
        session.in_friends_chat = fc.is_some();
        if let Some(fc) = fc {
            session.current_fc_name = Some(normalize_name(&fc.owner));
            session.current_fc_member_count = fc.member_count;
        }
    }

    /// Switch management mode and refresh so mode-dependent rendering
    /// (own-listing controls) updates.
    pub fn set_management_mode(&self, mode: ManagementMode) {
        self.shared.session().management_mode = mode;
        self.refresh_listings();
    }

    pub fn management_mode(&self) -> ManagementMode {
        self.shared.session().management_mode
    }

    pub fn is_in_friends_chat(&self) -> bool {
        self.shared.session().in_friends_chat
    }

    pub fn current_fc_name(&self) -> Option<String> {
        self.shared.session().current_fc_name.clone()
    }

    pub fn current_fc_member_count(&self) -> usize {
        self.shared.session().current_fc_member_count
    }

    pub fn active_group_id(&self) -> Option<String> {
        self.shared.session().active_group_id.clone()
    }

    /// Register (or clear) the Friends Chat status-change callback.
    pub fn set_status_callback(&self, callback: Option<StatusCallback>) {
        *self.status_cb() = callback;
    }

    // ── Internals shared with the membership tracker ────────────────

    pub(crate) fn session(&self) -> MutexGuard<'_, SessionState> {
        self.shared.session()
    }

    /// Dispatch the registered status callback onto the runtime; a missing
    /// callback is a no-op. Never runs inline with event handling.
    pub(crate) fn notify_status(&self) {
        let callback = self.status_cb().clone();
        if let Some(callback) = callback {
            self.rt.spawn(async move { callback() });
        }
    }

    fn poll_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.poll_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn status_cb(&self) -> MutexGuard<'_, Option<StatusCallback>> {
        self.status_callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GroupFinder {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

/// Sequentially drain the command queue. Exits when every sender is gone.
async fn run_worker(shared: Arc<Shared>, mut rx: UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Poll => poll_once(&shared).await,
            Command::ScheduledPoll(generation) => {
                if generation == shared.poll_generation.load(Ordering::SeqCst) {
                    poll_once(&shared).await;
                }
            }
            Command::Create(draft) => match shared.api.create_listing(&draft).await {
                Some(created) => {
                    shared.session().active_group_id = created.id.clone();
                    poll_once(&shared).await;
                }
                None => shared.sink.show_error("Failed to create group"),
            },
            Command::Delete(id) => {
                if shared.api.delete_listing(&id).await {
                    {
                        let mut session = shared.session();
                        if session.active_group_id.as_deref() == Some(id.as_str()) {
                            session.active_group_id = None;
                        }
                    }
                    poll_once(&shared).await;
                } else {
                    shared.sink.show_error("Failed to delete group");
                }
            }
            Command::UpdateSize { id, new_size } => {
                let mut fields = serde_json::Map::new();
                fields.insert("currentSize".to_string(), serde_json::Value::from(new_size));
                match shared.api.update_listing(&id, fields).await {
                    Some(_) => poll_once(&shared).await,
                    None => shared.sink.show_error("Failed to update group"),
                }
            }
        }
    }
    tracing::debug!("group finder worker stopped");
}

/// Fetch with the current filter and hand the result to the sink.
///
/// A fetch that absorbed an HTTP or transport failure yields an empty-list
/// update; only an error raised out of the fetch itself (a malformed
/// response body) produces the connection-error message.
async fn poll_once(shared: &Shared) {
    let filter = shared.session().current_filter;
    match shared.api.fetch_listings(filter).await {
        Ok(listings) => shared.sink.update_listings(listings),
        Err(e) => {
            tracing::warn!("Error polling groups: {e:#}");
            shared.sink.show_error("Could not connect to server");
        }
    }
}
