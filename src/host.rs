//! Seams to the two external collaborators.
//!
//! - [`HostSession`]: read-only view of the game host session (identity,
//!   Friends Chat presence). The core never depends on the host's event
//!   bus; membership events arrive as plain method calls on the core.
//! - [`DisplaySink`]: where refreshed listings and user-facing error strings
//!   go. Rendering is out of scope here; a sink applies updates on its own
//!   UI context.

use crate::model::GroupListing;

/// Read-only view of the host game session.
pub trait HostSession: Send + Sync {
    /// Raw (unnormalized) display name of the local player, if logged in.
    fn local_player_name(&self) -> Option<String>;

    /// The Friends Chat this session has joined, if any.
    fn friends_chat(&self) -> Option<FriendsChatSnapshot>;
}

/// Point-in-time view of the joined Friends Chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendsChatSnapshot {
    /// Raw owner name; normalize before caching or sending.
    pub owner: String,
    pub member_count: usize,
}

/// Host connection state, as reported by session-state-changed events.
/// `LoginScreen` and `Hopping` are disconnect transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    LoggedIn,
    LoginScreen,
    Hopping,
}

/// Consumer of refreshed listing sets and error strings.
///
/// Both methods must be callable from the background worker at any time and
/// must not block it; implementations redispatch to their UI thread.
pub trait DisplaySink: Send + Sync {
    /// Replace the displayed listing set.
    fn update_listings(&self, listings: Vec<GroupListing>);

    /// Show a user-facing error. Messages are fixed literals, never raw
    /// error text.
    fn show_error(&self, message: &str);
}
