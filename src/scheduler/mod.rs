use std::time::Duration;

use tokio::time;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::pipeline;

/// Timer trigger: fires the pipeline unconditionally on a fixed interval.
/// Each tick runs to completion before the next is considered; a failed run
/// is logged and the loop keeps going.
pub fn spawn_scheduler(config: AppConfig) {
    if !config.scheduler.enabled {
        info!("Scheduler is disabled in configuration");
        return;
    }

    let interval_mins = config.scheduler.interval_minutes;
    info!(interval_mins, "Starting leaderboard scheduler task");

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(interval_mins * 60));
        // The first tick fires immediately; skip it so startup does not post.
        interval.tick().await;
        loop {
            interval.tick().await;
            match pipeline::run_once(&config).await {
                Ok(outcome) => {
                    info!(
                        players = outcome.players.len(),
                        lines = outcome.lines.len(),
                        "Scheduled leaderboard run finished"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Scheduled leaderboard run failed");
                }
            }
        }
    });
}
