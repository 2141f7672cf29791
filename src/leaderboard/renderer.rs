use super::TrackedPlayer;
use super::differ::{Delta, RankChange};
use crate::util::numbers::group_thousands;
use crate::{fmt, str};

/// Static title line delivered once per run, before the line batches.
pub const PREAMBLE: &str = "🏆 **ITL Leaderboard Update** 🏆";

/// Discord caps how much fits comfortably in one webhook message; 25 lines per
/// batch keeps every batch under the content limit.
pub const LINES_PER_MESSAGE: usize = 25;

/// Medals for local positions 1-10. Keyed by local rank, not global.
const MEDALS: [&str; 10] = ["🥇", "🥈", "🥉", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟"];

/// The unchanged marker is a fixed literal, deliberately not configurable.
const UNCHANGED_MARKER: &str = "`--`";

/// Change icons for the three movement outcomes, overridable from config.
#[derive(Debug, Clone)]
pub struct ChangeIcons {
    pub up: String,
    pub down: String,
    pub new: String,
}

impl Default for ChangeIcons {
    fn default() -> Self {
        Self {
            up: str!("⬆️"),
            down: str!("⬇️"),
            new: str!("🆕"),
        }
    }
}

impl ChangeIcons {
    fn for_change(&self, change: RankChange) -> &str {
        match change {
            RankChange::New => &self.new,
            RankChange::Up => &self.up,
            RankChange::Down => &self.down,
            RankChange::Unchanged => UNCHANGED_MARKER,
        }
    }
}

/// Renders one line per (player, delta) pair, in order.
pub fn render_lines(
    players: &[TrackedPlayer],
    deltas: &[Delta],
    icons: &ChangeIcons,
) -> Vec<String> {
    let width = global_rank_width(players);

    players
        .iter()
        .zip(deltas)
        .map(|(player, delta)| render_line(player, delta, icons, width))
        .collect()
}

/// `<medal> `#<global, padded>` <icon> **<name>** <emoji> - <points> RP (+<gain>)`
fn render_line(player: &TrackedPlayer, delta: &Delta, icons: &ChangeIcons, width: usize) -> String {
    let marker = position_marker(player.local_rank);
    let icon = icons.for_change(delta.rank_change);

    let annotation = if player.emoji.is_empty() {
        String::new()
    } else {
        fmt!(" {}", player.emoji)
    };

    // Zero and negative score movement is computed but not shown.
    let gain = match delta.score_change {
        Some(change) if change > 0 => fmt!(" (+{})", group_thousands(change)),
        _ => String::new(),
    };

    fmt!(
        "{marker} `#{:<width$}` {icon} **{}**{annotation} - {} RP{gain}",
        player.global_rank,
        player.name(),
        group_thousands(player.ranking_points()),
    )
}

fn position_marker(local_rank: usize) -> String {
    MEDALS
        .get(local_rank.wrapping_sub(1))
        .map(|m| str!(m))
        .unwrap_or_else(|| fmt!("`{local_rank}`"))
}

/// Digit width of the largest global rank among tracked players, so the rank
/// column lines up across every rendered line.
fn global_rank_width(players: &[TrackedPlayer]) -> usize {
    players
        .iter()
        .map(|p| p.global_rank)
        .max()
        .map(|max| max.to_string().len())
        .unwrap_or(1)
}

/// Splits the ordered lines into delivery batches of at most
/// [`LINES_PER_MESSAGE`] lines each, preserving order. The preamble is not
/// included; callers deliver it separately, first.
pub fn batch_lines(lines: &[String]) -> Vec<String> {
    lines
        .chunks(LINES_PER_MESSAGE)
        .map(|chunk| chunk.join("\n"))
        .collect()
}
