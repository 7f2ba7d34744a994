//! Client-side core for a group-finder service.
//!
//! Talks to a JSON/HTTP listings backend, keeps listings fresh via a polling
//! schedule, and tracks Friends Chat membership so listing sizes can follow
//! the room. The embedding client provides the seams: a [`HostSession`] for
//! identity and room state, and a [`DisplaySink`] for listing updates and
//! error messages.

pub mod client;
pub mod config;
pub mod host;
pub mod model;
pub mod names;
pub mod session;
pub mod sync;

mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{GroupsClient, ListingsApi};
pub use config::Config;
pub use host::{DisplaySink, FriendsChatSnapshot, HostSession, HostState};
pub use model::{Activity, GroupListing};
pub use names::normalize_name;
pub use session::{ManagementMode, SessionState};
pub use sync::{GroupFinder, StatusCallback};
