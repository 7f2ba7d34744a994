use serde::{Deserialize, Serialize};

/// Closed set of activities a group can be advertised for.
///
/// Each activity has two names: the machine name (the SCREAMING_SNAKE wire
/// value used in the fetch query parameter and in listing JSON) and a
/// human-readable display label. `Display` always yields the label; the
/// machine name never appears in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activity {
    ChambersOfXeric,
    TheatreOfBlood,
    TombsOfAmascut,
    Nightmare,
    Nex,
    CorporealBeast,
    BarbarianAssault,
    Other,
}

impl Activity {
    pub const ALL: [Activity; 8] = [
        Activity::ChambersOfXeric,
        Activity::TheatreOfBlood,
        Activity::TombsOfAmascut,
        Activity::Nightmare,
        Activity::Nex,
        Activity::CorporealBeast,
        Activity::BarbarianAssault,
        Activity::Other,
    ];

    /// Wire-level machine name, e.g. `CHAMBERS_OF_XERIC`.
    pub fn machine_name(self) -> &'static str {
        match self {
            Activity::ChambersOfXeric => "CHAMBERS_OF_XERIC",
            Activity::TheatreOfBlood => "THEATRE_OF_BLOOD",
            Activity::TombsOfAmascut => "TOMBS_OF_AMASCUT",
            Activity::Nightmare => "NIGHTMARE",
            Activity::Nex => "NEX",
            Activity::CorporealBeast => "CORPOREAL_BEAST",
            Activity::BarbarianAssault => "BARBARIAN_ASSAULT",
            Activity::Other => "OTHER",
        }
    }

    /// Human-readable label shown in the UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Activity::ChambersOfXeric => "Chambers of Xeric",
            Activity::TheatreOfBlood => "Theatre of Blood",
            Activity::TombsOfAmascut => "Tombs of Amascut",
            Activity::Nightmare => "The Nightmare",
            Activity::Nex => "Nex",
            Activity::CorporealBeast => "Corporeal Beast",
            Activity::BarbarianAssault => "Barbarian Assault",
            Activity::Other => "Other",
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Activity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .iter()
            .copied()
            .find(|a| a.machine_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown activity: {}", s))
    }
}

/// One advertised group-recruitment post.
///
/// Constructed client-side as a draft (no `id`); the backend returns the
/// canonical copy with `id` populated on creation, and that id never changes
/// afterwards. Listings are never cached long-term; every refresh replaces
/// the full set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListing {
    /// Server-assigned identifier; absent on client-created drafts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Advertiser's normalized display name. Empty means "not set yet";
    /// never empty by the time the listing reaches the backend.
    #[serde(default)]
    pub player_name: String,
    /// Normalized owner name of the linked Friends Chat, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends_chat_name: Option<String>,
    pub activity: Activity,
    pub current_size: u32,
    pub max_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupListing {
    /// Client-side draft: no server id, player name filled in at create time.
    pub fn draft(
        activity: Activity,
        current_size: u32,
        max_size: u32,
        description: Option<String>,
    ) -> Self {
        Self {
            id: None,
            player_name: String::new(),
            friends_chat_name: None,
            activity,
            current_size,
            max_size,
            description,
        }
    }
}
