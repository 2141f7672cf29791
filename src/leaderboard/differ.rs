use super::TrackedPlayer;
use super::selector::names_match;

/// Direction of a tracked player's local-rank movement since the previous
/// snapshot. `New` is a distinct state, not a zero movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    New,
    Up,
    Down,
    Unchanged,
}

/// Movement of one tracked player between the previous snapshot and now.
/// `score_change` is present exactly when the player had a snapshot entry;
/// suppression of uninteresting values happens at render time, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub rank_change: RankChange,
    pub score_change: Option<i64>,
}

/// Joins the current tracked players against the previous snapshot by
/// lower-cased name and computes one delta per current player. The first
/// snapshot match wins if the snapshot somehow holds duplicate names. Players
/// only present in the snapshot simply drop out.
pub fn diff(current: &[TrackedPlayer], previous: &[TrackedPlayer]) -> Vec<Delta> {
    current
        .iter()
        .map(|player| {
            let prior = previous
                .iter()
                .find(|last| names_match(last.name(), player.name()));

            match prior {
                None => Delta {
                    rank_change: RankChange::New,
                    score_change: None,
                },
                Some(last) => Delta {
                    rank_change: rank_change(last.local_rank, player.local_rank),
                    score_change: Some(player.ranking_points() - last.ranking_points()),
                },
            }
        })
        .collect()
}

fn rank_change(previous_local: usize, current_local: usize) -> RankChange {
    // Signed as previous - current: positive means the player climbed.
    if previous_local > current_local {
        RankChange::Up
    } else if previous_local < current_local {
        RankChange::Down
    } else {
        RankChange::Unchanged
    }
}
