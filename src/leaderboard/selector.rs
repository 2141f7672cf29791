use tracing::debug;

use super::{Participant, TrackedPlayer};
use crate::config::PlayerGroup;

/// Which players to watch. Resolved once from configuration; the grouped form
/// takes precedence over the flat list when both are configured.
#[derive(Debug, Clone)]
pub enum TrackingConfig {
    /// Flat name list, no display annotation.
    Flat(Vec<String>),
    /// Named groups, each carrying an emoji shown next to its members.
    Grouped(Vec<PlayerGroup>),
}

impl TrackingConfig {
    pub fn new(players: &[String], groups: &[PlayerGroup]) -> Self {
        if groups.is_empty() {
            TrackingConfig::Flat(players.to_vec())
        } else {
            TrackingConfig::Grouped(groups.to_vec())
        }
    }

    /// Group emoji for a tracked name, or empty for the flat form. Matching is
    /// case-insensitive, like selection itself.
    fn annotation(&self, name: &str) -> String {
        match self {
            TrackingConfig::Flat(_) => String::new(),
            TrackingConfig::Grouped(groups) => groups
                .iter()
                .find(|g| g.players.iter().any(|p| names_match(p, name)))
                .map(|g| g.emoji.clone())
                .unwrap_or_default(),
        }
    }

    fn is_tracked(&self, name: &str) -> bool {
        match self {
            TrackingConfig::Flat(players) => players.iter().any(|p| names_match(p, name)),
            TrackingConfig::Grouped(groups) => groups
                .iter()
                .any(|g| g.players.iter().any(|p| names_match(p, name))),
        }
    }
}

/// Case-insensitive exact name comparison. The same lower-cased form is the
/// join key the differ uses across runs.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Filters the full leaderboard down to tracked players, preserving the
/// leaderboard's iteration order. Global rank is the 1-based position in the
/// full list; local rank is a dense 1-based counter over matches only, so it
/// is always exactly `1..=k` regardless of group order.
pub fn select_tracked(leaderboard: &[Participant], tracking: &TrackingConfig) -> Vec<TrackedPlayer> {
    let mut local_rank = 0;
    let tracked: Vec<TrackedPlayer> = leaderboard
        .iter()
        .enumerate()
        .filter(|(_, p)| tracking.is_tracked(&p.name))
        .map(|(index, p)| {
            local_rank += 1;
            TrackedPlayer {
                player: p.clone(),
                global_rank: index + 1,
                local_rank,
                emoji: tracking.annotation(&p.name),
            }
        })
        .collect();

    debug!(
        leaderboard_size = leaderboard.len(),
        tracked = tracked.len(),
        "Selected tracked players"
    );

    tracked
}
