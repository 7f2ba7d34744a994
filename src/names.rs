//! Display-name normalization.
//!
//! The game host encodes the space in player and chat-channel names as a
//! non-breaking space (U+00A0). Everything that leaves this plugin, API
//! payloads and name comparisons alike, wants ordinary ASCII spaces.

/// Replace every U+00A0 in `name` with a regular space (U+0020).
///
/// The result has the same length as the input and normalizing twice is the
/// same as normalizing once. Callers guard optional names before calling.
pub fn normalize_name(name: &str) -> String {
    name.replace('\u{00A0}', " ")
}
