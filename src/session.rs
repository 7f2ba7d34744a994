use serde::{Deserialize, Serialize};

use crate::model::Activity;

/// How listing size is managed after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagementMode {
    /// Listing size tracks the linked Friends Chat's member count, and
    /// creating a group requires being in a Friends Chat.
    FriendsChat,
    /// The player adjusts listing size by hand; Friends Chat state is
    /// ignored entirely.
    Manual,
}

impl Default for ManagementMode {
    fn default() -> Self {
        ManagementMode::FriendsChat
    }
}

/// Mutable per-session state owned by the synchronization core.
///
/// Mutated only from the background worker or the synchronous host-event
/// path; UI-facing reads are snapshots and tolerate eventual consistency.
/// The fields are independently-updated flags, not a transactional unit.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Last activity filter applied to fetches.
    pub current_filter: Option<Activity>,
    pub in_friends_chat: bool,
    /// Normalized owner name of the joined Friends Chat.
    pub current_fc_name: Option<String>,
    /// Last-observed size of the Friends Chat member set.
    pub current_fc_member_count: usize,
    /// Listing id this session currently owns. Set only after a successful
    /// creation; cleared only by deleting that same id or by a disconnect.
    pub active_group_id: Option<String>,
    pub management_mode: ManagementMode,
}

impl SessionState {
    pub fn new(management_mode: ManagementMode) -> Self {
        Self {
            current_filter: None,
            in_friends_chat: false,
            current_fc_name: None,
            current_fc_member_count: 0,
            active_group_id: None,
            management_mode,
        }
    }
}
