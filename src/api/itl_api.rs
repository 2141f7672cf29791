use serde::Deserialize;
use tracing::info;

use crate::Error;
use crate::leaderboard::Participant;

const LEADERBOARD_URL: &str = "https://itl2023.groovestats.com/api/entrant/leaderboard";

/// Ranked-leaderboard document returned by the ITL API. Rank is implied by
/// position in `data.leaderboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: LeaderboardData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardData {
    pub leaderboard: Vec<Participant>,
}

/// Source of the full ranked leaderboard, one read per run.
#[allow(async_fn_in_trait)]
pub trait LeaderboardSource {
    async fn fetch_leaderboard(&self) -> Result<LeaderboardResponse, Error>;
}

/// Live ITL entrant leaderboard over HTTP.
#[derive(Debug, Clone, Default)]
pub struct ItlApi;

impl LeaderboardSource for ItlApi {
    async fn fetch_leaderboard(&self) -> Result<LeaderboardResponse, Error> {
        info!(url = LEADERBOARD_URL, "Fetching leaderboard");
        let response = reqwest::Client::new()
            .get(LEADERBOARD_URL)
            .send()
            .await?
            .error_for_status()?;

        let leaderboard = response.json::<LeaderboardResponse>().await?;
        info!(
            success = leaderboard.success,
            message = leaderboard.message,
            entrants = leaderboard.data.leaderboard.len(),
            "Fetched leaderboard"
        );

        Ok(leaderboard)
    }
}
