//! Headless group-finder client.
//!
//! Polls the configured backend and prints listings to stdout. Intended for
//! watching a server from a terminal; pass an activity machine name (e.g.
//! `CHAMBERS_OF_XERIC`) to filter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use groupfinder::{
    Activity, Config, DisplaySink, FriendsChatSnapshot, GroupFinder, GroupListing, GroupsClient,
    HostSession,
};

/// Prints every listing update as a table row per group.
struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn update_listings(&self, listings: Vec<GroupListing>) {
        if listings.is_empty() {
            println!("No groups listed.");
            return;
        }
        for listing in listings {
            let fc = listing.friends_chat_name.as_deref().unwrap_or("-");
            let description = listing.description.as_deref().unwrap_or("");
            println!(
                "{:<20} {:<24} {:>2}/{:<2}  fc:{:<14} {}",
                listing.player_name, listing.activity, listing.current_size, listing.max_size, fc,
                description
            );
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// No player, no Friends Chat. The binary only observes listings.
struct HeadlessHost;

impl HostSession for HeadlessHost {
    fn local_player_name(&self) -> Option<String> {
        None
    }

    fn friends_chat(&self) -> Option<FriendsChatSnapshot> {
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    let filter = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse::<Activity>()?),
        None => None,
    };

    tracing::info!("Polling {} every {}s", config.server.url, config.server.poll_interval_secs);

    let client = Arc::new(GroupsClient::new(&config.server.url));
    let finder = GroupFinder::new(
        client,
        Arc::new(HeadlessHost),
        Arc::new(TerminalSink),
        config.groups.management_mode,
    );

    if filter.is_some() {
        finder.set_filter(filter);
    }
    finder.start_polling(Duration::from_secs(config.server.poll_interval_secs));

    tokio::signal::ctrl_c().await?;
    finder.stop_polling();

    Ok(())
}
