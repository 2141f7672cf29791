use serde::Serialize;
use tracing::{error, info, warn};

use crate::Error;
use crate::api::itl_api::{ItlApi, LeaderboardSource};
use crate::config::AppConfig;
use crate::data::snapshot_store::{FileSnapshotStore, SNAPSHOT_KEY, SnapshotStore};
use crate::leaderboard::selector::TrackingConfig;
use crate::leaderboard::{TrackedPlayer, differ, renderer, selector};
use crate::webhook::{DiscordWebhook, Publisher};

/// What one run computed; echoed as JSON by the request trigger.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub lines: Vec<String>,
    pub players: Vec<TrackedPlayer>,
}

/// Runs one pipeline pass with the production collaborators.
pub async fn run_once(cfg: &AppConfig) -> Result<RunOutcome, Error> {
    let store = FileSnapshotStore::new(cfg.snapshot_dir.clone());
    let publisher = DiscordWebhook::new(cfg.webhook.clone());
    run(cfg, &store, &ItlApi, &publisher).await
}

/// One full pass: read snapshot, fetch leaderboard, select, diff, overwrite
/// the snapshot, render, deliver. The snapshot is written before anything is
/// delivered, so a delivery failure never holds back the next run's baseline.
#[tracing::instrument(level = "info", skip_all)]
pub async fn run<S, L, P>(
    cfg: &AppConfig,
    store: &S,
    source: &L,
    publisher: &P,
) -> Result<RunOutcome, Error>
where
    S: SnapshotStore,
    L: LeaderboardSource,
    P: Publisher,
{
    let previous = read_previous_snapshot(store).await?;

    let response = source.fetch_leaderboard().await?;
    if !response.success {
        warn!(
            message = response.message,
            "Leaderboard payload reported failure, proceeding with what it carried"
        );
    }

    let tracking = TrackingConfig::new(&cfg.players, &cfg.player_groups);
    let tracked = selector::select_tracked(&response.data.leaderboard, &tracking);
    let deltas = differ::diff(&tracked, &previous);

    store
        .put(SNAPSHOT_KEY, &serde_json::to_string(&tracked)?)
        .await?;

    let lines = renderer::render_lines(&tracked, &deltas, &cfg.custom_emoji.to_icons());
    let batches = renderer::batch_lines(&lines);

    info!(
        tracked = tracked.len(),
        batches = batches.len(),
        "Delivering leaderboard update"
    );

    deliver(publisher, renderer::PREAMBLE).await;
    for batch in &batches {
        deliver(publisher, batch).await;
    }

    Ok(RunOutcome {
        lines,
        players: tracked,
    })
}

/// Absent and unparseable snapshots both mean "no prior data".
async fn read_previous_snapshot<S: SnapshotStore>(store: &S) -> Result<Vec<TrackedPlayer>, Error> {
    let Some(text) = store.get(SNAPSHOT_KEY).await? else {
        info!("No previous snapshot, every tracked player will be new");
        return Ok(Vec::new());
    };

    match serde_json::from_str(&text) {
        Ok(players) => Ok(players),
        Err(e) => {
            warn!(error = %e, "Previous snapshot is unreadable, starting from an empty baseline");
            Ok(Vec::new())
        }
    }
}

/// Failures are logged and swallowed so the remaining batches still go out.
async fn deliver<P: Publisher>(publisher: &P, content: &str) {
    match publisher.post(content).await {
        Ok(result) if !result.ok => {
            warn!(status = result.status, "Webhook rejected a batch, continuing");
        }
        Ok(_) => {}
        Err(e) => {
            error!(error = %e, "Webhook delivery failed, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::api::itl_api::{LeaderboardData, LeaderboardResponse};
    use crate::config::{CustomEmoji, LogConfig, SchedulerConfig};
    use crate::leaderboard::Participant;
    use crate::webhook::DeliveryResult;

    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }

        fn seed(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }
    }

    impl SnapshotStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, Error> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: &str) -> Result<(), Error> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct StaticSource {
        board: Vec<Participant>,
    }

    impl LeaderboardSource for StaticSource {
        async fn fetch_leaderboard(&self) -> Result<LeaderboardResponse, Error> {
            Ok(LeaderboardResponse {
                success: true,
                message: "ok".to_string(),
                data: LeaderboardData {
                    leaderboard: self.board.clone(),
                },
            })
        }
    }

    struct RecordingPublisher {
        posts: Mutex<Vec<String>>,
        accept: bool,
    }

    impl RecordingPublisher {
        fn new(accept: bool) -> Self {
            Self {
                posts: Mutex::new(Vec::new()),
                accept,
            }
        }

        fn posts(&self) -> Vec<String> {
            self.posts.lock().unwrap().clone()
        }
    }

    impl Publisher for RecordingPublisher {
        async fn post(&self, content: &str) -> Result<DeliveryResult, Error> {
            self.posts.lock().unwrap().push(content.to_string());
            Ok(DeliveryResult {
                ok: self.accept,
                status: if self.accept { 204 } else { 500 },
            })
        }
    }

    fn participant(name: &str, points: i64) -> Participant {
        Participant {
            name: name.to_string(),
            ranking_points: points,
            extra: serde_json::Map::new(),
        }
    }

    fn test_config(players: &[&str]) -> AppConfig {
        AppConfig {
            api_key: "secret".to_string(),
            webhook: "https://example.test/hook".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            snapshot_dir: std::env::temp_dir(),
            players: players.iter().map(|p| p.to_string()).collect(),
            player_groups: Vec::new(),
            custom_emoji: CustomEmoji::default(),
            log: LogConfig {
                level: "info".to_string(),
                path: std::env::temp_dir().join("rankcord-test.log"),
                json_path: std::env::temp_dir().join("rankcord-test.json"),
            },
            scheduler: SchedulerConfig {
                enabled: false,
                interval_minutes: 60,
            },
        }
    }

    #[tokio::test]
    async fn first_run_marks_everyone_new_and_writes_the_snapshot() {
        let cfg = test_config(&["al", "bob"]);
        let store = MemoryStore::new();
        let source = StaticSource {
            board: vec![participant("Bob", 500), participant("Al", 300)],
        };
        let publisher = RecordingPublisher::new(true);

        let outcome = run(&cfg, &store, &source, &publisher).await.unwrap();

        assert_eq!(outcome.players.len(), 2);
        assert_eq!(outcome.players[0].name(), "Bob");
        assert_eq!(outcome.players[0].global_rank, 1);
        assert_eq!(outcome.players[0].local_rank, 1);
        assert_eq!(outcome.players[1].name(), "Al");
        assert_eq!(outcome.players[1].global_rank, 2);
        assert_eq!(outcome.players[1].local_rank, 2);
        assert!(outcome.lines.iter().all(|l| l.contains("🆕")));

        let stored = store.get(SNAPSHOT_KEY).await.unwrap().unwrap();
        let snapshot: Vec<TrackedPlayer> = serde_json::from_str(&stored).unwrap();
        assert_eq!(snapshot, outcome.players);

        let posts = publisher.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], renderer::PREAMBLE);
    }

    #[tokio::test]
    async fn unchanged_board_renders_no_movement_on_the_second_run() {
        let cfg = test_config(&["al", "bob"]);
        let store = MemoryStore::new();
        let source = StaticSource {
            board: vec![participant("Bob", 500), participant("Al", 300)],
        };
        let publisher = RecordingPublisher::new(true);

        run(&cfg, &store, &source, &publisher).await.unwrap();
        let second = run(&cfg, &store, &source, &publisher).await.unwrap();

        assert!(second.lines.iter().all(|l| l.contains("`--`")));
        assert!(second.lines.iter().all(|l| !l.contains("(+")));
    }

    #[tokio::test]
    async fn rank_swap_is_reported_as_up_and_down() {
        let cfg = test_config(&["al", "bob"]);
        let store = MemoryStore::new();
        let first_source = StaticSource {
            board: vec![participant("Al", 450), participant("Bob", 400)],
        };
        let publisher = RecordingPublisher::new(true);
        run(&cfg, &store, &first_source, &publisher).await.unwrap();

        let second_source = StaticSource {
            board: vec![participant("Bob", 500), participant("Al", 460)],
        };
        let outcome = run(&cfg, &store, &second_source, &publisher).await.unwrap();

        assert!(outcome.lines[0].contains("⬆️"), "{}", outcome.lines[0]);
        assert!(outcome.lines[0].contains("(+100)"));
        assert!(outcome.lines[1].contains("⬇️"), "{}", outcome.lines[1]);
    }

    #[tokio::test]
    async fn snapshot_advances_even_when_every_delivery_fails() {
        let cfg = test_config(&["bob"]);
        let store = MemoryStore::new();
        let source = StaticSource {
            board: vec![participant("Bob", 500)],
        };
        let publisher = RecordingPublisher::new(false);

        let outcome = run(&cfg, &store, &source, &publisher).await;

        assert!(outcome.is_ok());
        assert!(store.get(SNAPSHOT_KEY).await.unwrap().is_some());
        // Preamble and batch were both still attempted.
        assert_eq!(publisher.posts().len(), 2);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_empty_baseline() {
        let cfg = test_config(&["bob"]);
        let store = MemoryStore::new().seed(SNAPSHOT_KEY, "{not json[");
        let source = StaticSource {
            board: vec![participant("Bob", 500)],
        };
        let publisher = RecordingPublisher::new(true);

        let outcome = run(&cfg, &store, &source, &publisher).await.unwrap();
        assert!(outcome.lines[0].contains("🆕"));
    }

    #[tokio::test]
    async fn forty_tracked_players_go_out_as_preamble_plus_two_batches() {
        let names: Vec<String> = (1..=40).map(|i| format!("player{i}")).collect();
        let tracked_names: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let cfg = test_config(&tracked_names);
        let store = MemoryStore::new();
        let source = StaticSource {
            board: names
                .iter()
                .enumerate()
                .map(|(i, n)| participant(n, 1000 - i as i64))
                .collect(),
        };
        let publisher = RecordingPublisher::new(true);

        run(&cfg, &store, &source, &publisher).await.unwrap();

        let posts = publisher.posts();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0], renderer::PREAMBLE);
        assert_eq!(posts[1].lines().count(), 25);
        assert_eq!(posts[2].lines().count(), 15);
        assert!(posts[1].contains("**player1**"));
        assert!(posts[2].contains("**player40**"));
    }

    #[tokio::test]
    async fn empty_leaderboard_is_degenerate_but_clean() {
        let cfg = test_config(&["bob"]);
        let store = MemoryStore::new();
        let source = StaticSource { board: Vec::new() };
        let publisher = RecordingPublisher::new(true);

        let outcome = run(&cfg, &store, &source, &publisher).await.unwrap();
        assert!(outcome.players.is_empty());
        assert!(outcome.lines.is_empty());
    }
}
