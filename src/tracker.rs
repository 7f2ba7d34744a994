//! Friends Chat membership tracking.
//!
//! The host delivers membership changes as plain method calls (no event-bus
//! dependency): room joined/left, member joined/left, and host connection
//! state changes. State mutation is immediate and non-blocking; any
//! resulting size update is enqueued on the background worker, and the
//! status callback is redispatched onto the runtime rather than run inline.

use crate::host::HostState;
use crate::names::normalize_name;
use crate::session::ManagementMode;
use crate::sync::GroupFinder;

impl GroupFinder {
    /// The session joined or left a Friends Chat.
    ///
    /// On join, the owner name (normalized) and member count are read from
    /// the host and cached; on leave, both are cleared.
    pub fn on_friends_chat_changed(&self, joined: bool) {
        let fc = if joined { self.host.friends_chat() } else { None };
        {
            let mut session = self.session();
            session.in_friends_chat = joined;
            match fc {
                Some(fc) => {
                    session.current_fc_name = Some(normalize_name(&fc.owner));
                    session.current_fc_member_count = fc.member_count;
                }
                None => {
                    session.current_fc_name = None;
                    session.current_fc_member_count = 0;
                }
            }
        }
        self.notify_status();
    }

    /// Someone joined the Friends Chat.
    pub fn on_member_joined(&self) {
        self.member_count_changed();
    }

    /// Someone left the Friends Chat.
    pub fn on_member_left(&self) {
        self.member_count_changed();
    }

    /// The host's connection state changed. Returning to the login screen
    /// or hopping worlds invalidates the whole session: Friends Chat state
    /// is cleared and any group this session believed it owned is forgotten.
    pub fn on_host_state_changed(&self, state: HostState) {
        if !matches!(state, HostState::LoginScreen | HostState::Hopping) {
            return;
        }
        {
            let mut session = self.session();
            session.in_friends_chat = false;
            session.current_fc_name = None;
            session.current_fc_member_count = 0;
            session.active_group_id = None;
        }
        self.notify_status();
    }

    /// Re-read the live member count; the joined/left state is untouched.
    fn member_count_changed(&self) {
        if let Some(fc) = self.host.friends_chat() {
            self.session().current_fc_member_count = fc.member_count;
        }
        self.notify_status();
        self.auto_update_group_size();
    }

    /// In Friends Chat mode with an active group, push the new member count
    /// to the backend. Manual mode never auto-updates.
    fn auto_update_group_size(&self) {
        let (mode, active_id, count) = {
            let session = self.session();
            (
                session.management_mode,
                session.active_group_id.clone(),
                session.current_fc_member_count,
            )
        };
        if mode == ManagementMode::FriendsChat {
            if let Some(id) = active_id {
                self.update_group_size(id, count as u32);
            }
        }
    }
}
