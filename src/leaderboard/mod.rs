pub mod differ;
pub mod renderer;
pub mod selector;

use serde::{Deserialize, Serialize};

/// Raw leaderboard entry as returned by the scoring API. Fields the notifier
/// does not interpret are kept opaque so they survive snapshot round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub ranking_points: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A participant the operator is tracking, annotated with its position in the
/// full leaderboard and its dense position among the tracked subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPlayer {
    #[serde(flatten)]
    pub player: Participant,
    pub global_rank: usize,
    pub local_rank: usize,
    #[serde(default)]
    pub emoji: String,
}

impl TrackedPlayer {
    pub fn name(&self) -> &str {
        &self.player.name
    }

    pub fn ranking_points(&self) -> i64 {
        self.player.ranking_points
    }
}
